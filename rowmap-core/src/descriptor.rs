use crate::{OrmError, Result, SemanticType};
use std::{borrow::Cow, collections::HashSet};

/// Mapping of one record field to a table column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name, compared case-sensitively against the live schema.
    pub name: Cow<'static, str>,
    pub semantic_type: SemanticType,
    pub primary_key: bool,
    /// The field accepts `NULL` (it is an `Option`).
    pub nullable: bool,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<Cow<'static, str>>, semantic_type: SemanticType) -> Self {
        Self {
            name: name.into(),
            semantic_type,
            primary_key: false,
            nullable: false,
        }
    }

    /// Declare a column from a type name such as `"Integer"`, `"String"` or `"DATETIME"`.
    pub fn declared(name: impl Into<Cow<'static, str>>, type_name: &str) -> Result<Self> {
        let name = name.into();
        let semantic_type = type_name.parse::<SemanticType>().map_err(|_| OrmError::UnsupportedType {
            column: name.to_string(),
            type_name: type_name.to_string(),
        })?;
        Ok(Self::new(name, semantic_type))
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Static description of an entity: its table and ordered columns.
///
/// Column order drives the order of every generated statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    pub table_name: Cow<'static, str>,
    pub columns: Vec<ColumnDescriptor>,
}

impl EntityDescriptor {
    pub fn new(table_name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnDescriptor) -> Self {
        self.columns.push(column);
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    pub fn column_named(&self, name: &str) -> Option<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> Result<&ColumnDescriptor> {
        self.columns.iter().find(|c| c.primary_key).ok_or_else(|| {
            OrmError::catalog(self.table_name(), "the entity does not declare a primary key").into()
        })
    }

    pub fn non_key_columns(&self) -> impl Iterator<Item = &ColumnDescriptor> {
        self.columns.iter().filter(|c| !c.primary_key)
    }

    /// Check the invariants every registered descriptor must hold.
    ///
    /// `entity` names the declaring type in the error.
    pub fn validate(&self, entity: &str) -> Result<()> {
        let fail = |reason: String| -> Result<()> {
            Err(OrmError::catalog(entity, reason).into())
        };
        if self.table_name.trim().is_empty() {
            return fail("the table name is empty".into());
        }
        let mut names = HashSet::with_capacity(self.columns.len());
        for column in &self.columns {
            if column.name.trim().is_empty() {
                return fail(format!("table `{}` has a column without name", self.table_name));
            }
            if !names.insert(column.name()) {
                return fail(format!(
                    "column `{}` is declared more than once in table `{}`",
                    column.name, self.table_name
                ));
            }
        }
        let keys: Vec<_> = self.columns.iter().filter(|c| c.primary_key).collect();
        match keys.as_slice() {
            [] => fail(format!(
                "table `{}` does not declare a primary key",
                self.table_name
            )),
            [key] if key.semantic_type != SemanticType::Integer => fail(format!(
                "primary key `{}` of table `{}` must be an Integer, found {}",
                key.name, self.table_name, key.semantic_type
            )),
            [..] if keys.len() > 1 => fail(format!(
                "table `{}` declares {} primary keys, exactly one is required",
                self.table_name,
                keys.len()
            )),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> EntityDescriptor {
        EntityDescriptor::new("users")
            .column(ColumnDescriptor::new("id", SemanticType::Integer).primary_key())
            .column(ColumnDescriptor::new("user_name", SemanticType::Text))
            .column(ColumnDescriptor::new("age", SemanticType::Integer))
    }

    #[test]
    fn accessors() {
        let users = users();
        assert_eq!(users.table_name(), "users");
        assert_eq!(users.primary_key().unwrap().name(), "id");
        assert_eq!(
            users.non_key_columns().map(|c| c.name()).collect::<Vec<_>>(),
            ["user_name", "age"]
        );
        assert!(users.column_named("age").is_some());
        assert!(users.column_named("Age").is_none());
        assert!(users.validate("User").is_ok());
    }

    #[test]
    fn declared_type_names() {
        let column = ColumnDescriptor::declared("registration_date", "Date").unwrap();
        assert_eq!(column.semantic_type, SemanticType::Timestamp);
        let error = ColumnDescriptor::declared("price", "Decimal").unwrap_err();
        assert_eq!(
            error.downcast_ref::<OrmError>(),
            Some(&OrmError::UnsupportedType {
                column: "price".into(),
                type_name: "Decimal".into(),
            })
        );
    }

    #[test]
    fn invalid_descriptors() {
        let reason = |descriptor: EntityDescriptor| match descriptor
            .validate("Sample")
            .unwrap_err()
            .downcast::<OrmError>()
        {
            Ok(OrmError::Catalog { entity, reason }) => {
                assert_eq!(entity, "Sample");
                reason
            }
            other => panic!("Unexpected result {:?}", other),
        };
        assert!(reason(EntityDescriptor::new(" ")).contains("table name is empty"));
        assert!(
            reason(
                EntityDescriptor::new("towns")
                    .column(ColumnDescriptor::new("name", SemanticType::Text))
            )
            .contains("does not declare a primary key")
        );
        assert!(
            reason(
                EntityDescriptor::new("towns")
                    .column(ColumnDescriptor::new("id", SemanticType::Integer).primary_key())
                    .column(ColumnDescriptor::new("code", SemanticType::Integer).primary_key())
            )
            .contains("2 primary keys")
        );
        assert!(
            reason(users().column(ColumnDescriptor::new("age", SemanticType::Integer)))
                .contains("`age` is declared more than once")
        );
        assert!(
            reason(
                EntityDescriptor::new("towns")
                    .column(ColumnDescriptor::new("id", SemanticType::Text).primary_key())
            )
            .contains("must be an Integer")
        );
    }
}
