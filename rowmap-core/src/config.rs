use crate::{OrmError, Result, Strategy};

/// How INSERT and DELETE statements carry their values.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertMode {
    /// Placeholders with bound parameters.
    #[default]
    Bound,
    /// Values inlined as quoted literals, kept for compatibility with existing SQL logs.
    ///
    /// Quotes are doubled, drivers whose literals have other escape characters
    /// handle them in their [`crate::SqlWriter::write_value_string`].
    Literal,
}

/// Everything a [`crate::Session`] needs besides the connection and the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Target schema (database) name.
    pub schema: String,
    pub strategy: Strategy,
    pub insert_mode: InsertMode,
}

impl Config {
    pub fn new(schema: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            schema: schema.into(),
            strategy,
            insert_mode: InsertMode::default(),
        }
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = schema.into();
        self
    }

    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn insert_mode(mut self, insert_mode: InsertMode) -> Self {
        self.insert_mode = insert_mode;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.schema.is_empty() {
            return Err(OrmError::Configuration("the schema name is empty".into()).into());
        }
        if let Some(c) = self
            .schema
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '_' || *c == '$'))
        {
            return Err(OrmError::Configuration(format!(
                "the schema name `{}` contains the invalid character {:?}",
                self.schema, c
            ))
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate() {
        let config = Config::new("orm_db", Strategy::Update);
        assert!(config.validate().is_ok());
        assert_eq!(config.insert_mode, InsertMode::Bound);
        assert!(config.clone().schema("shop$2").validate().is_ok());
        for schema in ["", "my db", "db;DROP", "`db`", "schéma"] {
            let error = config.clone().schema(schema).validate().unwrap_err();
            assert!(
                matches!(
                    error.downcast_ref::<OrmError>(),
                    Some(OrmError::Configuration(..))
                ),
                "{schema:?} should be rejected"
            );
        }
    }

    #[test]
    fn setters() {
        let config = Config::new("a", Strategy::Update)
            .strategy(Strategy::DropCreate)
            .insert_mode(InsertMode::Literal);
        assert_eq!(config.strategy, Strategy::DropCreate);
        assert_eq!(config.insert_mode, InsertMode::Literal);
    }
}
