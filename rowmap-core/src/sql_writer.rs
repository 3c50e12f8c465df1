use crate::{
    ColumnDescriptor, EntityDescriptor, InsertMode, Query, SemanticType, Value, separated_by,
};

/// Dialect printer converting descriptors and values into concrete SQL strings.
///
/// Every method appends exactly one statement to its output, without the
/// trailing `;`. The defaults target MySQL-like syntax, drivers override the
/// pieces their database spells differently.
pub trait SqlWriter {
    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(&self, out: &mut String, value: &str, search: char, replace: &str) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    fn write_identifier(&self, out: &mut String, value: &str) {
        out.push_str(value);
    }

    /// Render `schema.table`, the schema is omitted when empty.
    fn write_table_ref(&self, out: &mut String, schema: &str, table: &str) {
        if !schema.is_empty() {
            self.write_identifier(out, schema);
            out.push('.');
        }
        self.write_identifier(out, table);
    }

    /// Render the SQL type of a column holding values of `value` kind.
    fn write_column_type(&self, out: &mut String, value: SemanticType) {
        out.push_str(match value {
            SemanticType::Integer => "INT",
            SemanticType::Text => "VARCHAR(50)",
            SemanticType::Timestamp => "DATETIME",
        });
    }

    /// Quote a string literal doubling inner quotes.
    fn write_value_string(&self, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(out, value, '\'', "''");
        out.push('\'');
    }

    /// Render a value as a SQL literal.
    ///
    /// Every kind is written as a quoted string, the database converts it to
    /// the column type.
    fn write_value(&self, out: &mut String, value: &Value) {
        match value {
            Value::Null => out.push_str("NULL"),
            Value::Text(v) => self.write_value_string(out, v),
            v => self.write_value_string(out, &v.to_string()),
        }
    }

    fn write_create_schema(&self, out: &mut String, schema: &str) {
        out.push_str("CREATE SCHEMA IF NOT EXISTS ");
        self.write_identifier(out, schema);
    }

    fn write_drop_schema(&self, out: &mut String, schema: &str) {
        out.push_str("DROP SCHEMA IF EXISTS ");
        self.write_identifier(out, schema);
    }

    fn write_create_table(&self, out: &mut String, schema: &str, descriptor: &EntityDescriptor) {
        out.reserve(64 + descriptor.columns().len() * 24);
        out.push_str("CREATE TABLE IF NOT EXISTS ");
        self.write_table_ref(out, schema, descriptor.table_name());
        out.push('(');
        separated_by(
            out,
            descriptor.columns(),
            |out, column| self.write_column_definition(out, column),
            ", ",
        );
        out.push(')');
    }

    /// Render `name TYPE`.
    fn write_column_definition(&self, out: &mut String, column: &ColumnDescriptor) {
        self.write_identifier(out, column.name());
        out.push(' ');
        self.write_column_type(out, column.semantic_type);
    }

    /// Turn `column` into an auto incremented integer and make it the primary key.
    fn write_set_primary_key(&self, out: &mut String, schema: &str, table: &str, column: &str) {
        out.push_str("ALTER TABLE ");
        self.write_table_ref(out, schema, table);
        out.push_str(" MODIFY COLUMN ");
        self.write_identifier(out, column);
        out.push(' ');
        self.write_column_type(out, SemanticType::Integer);
        out.push_str(" NOT NULL AUTO_INCREMENT, ADD CONSTRAINT PK_");
        out.push_str(column);
        out.push_str(" PRIMARY KEY(");
        self.write_identifier(out, column);
        out.push(')');
    }

    /// Remove auto increment from `column` and drop the primary key of the table.
    fn write_drop_primary_key(&self, out: &mut String, schema: &str, table: &str, column: &str) {
        out.push_str("ALTER TABLE ");
        self.write_table_ref(out, schema, table);
        out.push_str(" MODIFY COLUMN ");
        self.write_identifier(out, column);
        out.push(' ');
        self.write_column_type(out, SemanticType::Integer);
        out.push_str(", DROP PRIMARY KEY");
    }

    fn write_add_column(&self, out: &mut String, schema: &str, table: &str, column: &ColumnDescriptor) {
        out.push_str("ALTER TABLE ");
        self.write_table_ref(out, schema, table);
        out.push_str(" ADD ");
        self.write_column_definition(out, column);
    }

    fn write_drop_column(&self, out: &mut String, schema: &str, table: &str, column: &str) {
        out.push_str("ALTER TABLE ");
        self.write_table_ref(out, schema, table);
        out.push_str(" DROP ");
        self.write_identifier(out, column);
    }

    /// Render an INSERT of `row` (column name and value pairs, in order).
    ///
    /// `InsertMode::Bound` writes placeholders and pushes the values in
    /// `query.params`, `InsertMode::Literal` writes the values inline.
    fn write_insert(
        &self,
        query: &mut Query,
        schema: &str,
        table: &str,
        row: Vec<(&str, Value)>,
        mode: InsertMode,
    ) {
        let out = &mut query.sql;
        out.reserve(64 + row.len() * 32);
        out.push_str("INSERT INTO ");
        self.write_table_ref(out, schema, table);
        out.push('(');
        separated_by(
            out,
            row.iter(),
            |out, (name, _)| self.write_identifier(out, name),
            ", ",
        );
        out.push_str(") VALUES(");
        match mode {
            InsertMode::Bound => {
                separated_by(out, row.iter(), |out, _| out.push('?'), ",");
                query.params.extend(row.into_iter().map(|(_, v)| v));
            }
            InsertMode::Literal => {
                separated_by(out, row.iter(), |out, (_, v)| self.write_value(out, v), ",");
            }
        }
        query.sql.push(')');
    }

    /// Render an UPDATE of every column in `row`, keyed by `key`.
    ///
    /// Values are always bound, the key comes last.
    fn write_update(
        &self,
        query: &mut Query,
        schema: &str,
        table: &str,
        row: Vec<(&str, Value)>,
        key: (&str, Value),
    ) {
        let out = &mut query.sql;
        out.reserve(64 + row.len() * 24);
        out.push_str("UPDATE ");
        self.write_table_ref(out, schema, table);
        out.push_str(" SET ");
        separated_by(
            out,
            row.iter(),
            |out, (name, _)| {
                self.write_identifier(out, name);
                out.push_str(" = ?");
            },
            ", ",
        );
        out.push_str(" WHERE ");
        self.write_identifier(out, key.0);
        out.push_str(" = ?");
        query.params.extend(row.into_iter().map(|(_, v)| v));
        query.params.push(key.1);
    }

    /// Render `SELECT *` with the caller supplied predicate copied verbatim.
    fn write_select(
        &self,
        out: &mut String,
        schema: &str,
        table: &str,
        predicate: Option<&str>,
        limit: Option<u32>,
    ) {
        out.push_str("SELECT * FROM ");
        self.write_table_ref(out, schema, table);
        if let Some(predicate) = predicate {
            out.push_str(" WHERE ");
            out.push_str(predicate);
        }
        if let Some(limit) = limit {
            out.push_str(" LIMIT ");
            out.push_str(&limit.to_string());
        }
    }

    /// Render a DELETE of the row whose `column` equals `key`.
    fn write_delete(
        &self,
        query: &mut Query,
        schema: &str,
        table: &str,
        column: &str,
        key: Value,
        mode: InsertMode,
    ) {
        let out = &mut query.sql;
        out.push_str("DELETE FROM ");
        self.write_table_ref(out, schema, table);
        out.push_str(" WHERE ");
        self.write_identifier(out, column);
        out.push_str(" = ");
        match (mode, key) {
            (InsertMode::Literal, Value::Integer(v)) => out.push_str(&v.to_string()),
            (InsertMode::Literal, v) => self.write_value(out, &v),
            (InsertMode::Bound, v) => {
                out.push('?');
                query.params.push(v);
            }
        }
    }

    /// Query returning one row labeled `name` when `schema.table` exists.
    fn write_table_exists_query(&self, schema: &str, table: &str) -> Query {
        Query::raw(
            "SELECT table_name AS name FROM information_schema.tables \
             WHERE table_schema = ? AND table_name = ?",
        )
        .bind(schema)
        .bind(table)
    }

    /// Query returning the columns of `schema.table` labeled `name` and `db_type`.
    fn write_columns_query(&self, schema: &str, table: &str) -> Query {
        Query::raw(
            "SELECT column_name AS name, data_type AS db_type FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind(schema)
        .bind(table)
    }

    /// Query returning the primary key column of `schema.table` labeled `name`.
    fn write_primary_key_query(&self, schema: &str, table: &str) -> Query {
        Query::raw(
            "SELECT k.column_name AS name FROM information_schema.table_constraints t \
             JOIN information_schema.key_column_usage k \
             ON k.constraint_name = t.constraint_name \
             AND k.table_schema = t.table_schema AND k.table_name = t.table_name \
             WHERE t.constraint_type = 'PRIMARY KEY' AND t.table_schema = ? AND t.table_name = ?",
        )
        .bind(schema)
        .bind(table)
    }
}

/// Fallback generic SQL writer.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;
impl GenericSqlWriter {
    /// Construct a new generic writer.
    pub fn new() -> Self {
        Self {}
    }
}
impl SqlWriter for GenericSqlWriter {}
