use rowmap_core::{Query, SqlWriter};

#[derive(Debug, Default, Clone, Copy)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    /// Backslash is an escape character in MySQL string literals, it is doubled as well as quotes.
    fn write_value_string(&self, out: &mut String, value: &str) {
        out.reserve(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                c => out.push(c),
            }
        }
        out.push('\'');
    }

    fn write_create_schema(&self, out: &mut String, schema: &str) {
        out.push_str("CREATE DATABASE IF NOT EXISTS `");
        self.write_escaped(out, schema, '`', "``");
        out.push('`');
    }

    fn write_drop_schema(&self, out: &mut String, schema: &str) {
        out.push_str("DROP DATABASE IF EXISTS `");
        self.write_escaped(out, schema, '`', "``");
        out.push('`');
    }

    /// `column_type` carries the length, `varchar(50)` rather than `varchar`.
    fn write_columns_query(&self, schema: &str, table: &str) -> Query {
        Query::raw(
            "SELECT column_name AS name, column_type AS db_type FROM information_schema.columns \
             WHERE table_schema = ? AND table_name = ? ORDER BY ordinal_position",
        )
        .bind(schema)
        .bind(table)
    }

    fn write_primary_key_query(&self, schema: &str, table: &str) -> Query {
        Query::raw(
            "SELECT column_name AS name FROM information_schema.key_column_usage \
             WHERE constraint_name = 'PRIMARY' AND table_schema = ? AND table_name = ? \
             ORDER BY ordinal_position",
        )
        .bind(schema)
        .bind(table)
    }
}
