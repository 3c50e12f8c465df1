use crate::{Error, OrmError, Result};
use proc_macro2::TokenStream;
use quote::{ToTokens, TokenStreamExt, quote};
use std::{
    any,
    fmt::{self, Display},
    str::FromStr,
};
use time::{
    PrimitiveDateTime, format_description::BorrowedFormatItem, macros::format_description,
};

/// Format used for timestamp literals and parameters.
pub const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// The value kinds a column can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SemanticType {
    Integer,
    Text,
    Timestamp,
}

impl SemanticType {
    /// Convert a value read from a driver into the representation of this kind.
    ///
    /// Drivers using a text protocol hand back integers and timestamps as text,
    /// those are parsed here. `NULL` always passes through.
    pub fn coerce(self, value: Value) -> std::result::Result<Value, String> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),
            (SemanticType::Integer, v @ Value::Integer(..)) => Ok(v),
            (SemanticType::Integer, Value::Text(v)) => v
                .trim()
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| format!("`{}` is not an integer ({})", v, e)),
            (SemanticType::Text, v @ Value::Text(..)) => Ok(v),
            (SemanticType::Text, Value::Integer(v)) => Ok(Value::Text(v.to_string())),
            (SemanticType::Timestamp, v @ Value::Timestamp(..)) => Ok(v),
            (SemanticType::Timestamp, Value::Text(v)) => {
                PrimitiveDateTime::parse(v.trim(), TIMESTAMP_FORMAT)
                    .map(Value::Timestamp)
                    .map_err(|e| format!("`{}` is not a timestamp ({})", v, e))
            }
            (ty, v) => Err(format!("{:?} cannot be read as {}", v, ty)),
        }
    }
}

impl Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SemanticType::Integer => "Integer",
            SemanticType::Text => "Text",
            SemanticType::Timestamp => "Timestamp",
        })
    }
}

impl FromStr for SemanticType {
    type Err = Error;

    /// Accepts the semantic names as well as the common Rust and SQL spellings.
    fn from_str(s: &str) -> Result<Self> {
        Ok(match s.trim() {
            "Integer" | "integer" | "int" | "INT" | "INTEGER" | "i8" | "i16" | "i32" | "i64"
            | "u8" | "u16" | "u32" => SemanticType::Integer,
            "Text" | "text" | "String" | "string" | "VARCHAR" | "varchar" => SemanticType::Text,
            "Timestamp" | "timestamp" | "Date" | "DATETIME" | "datetime" | "PrimitiveDateTime" => {
                SemanticType::Timestamp
            }
            other => {
                return Err(OrmError::UnsupportedType {
                    column: String::new(),
                    type_name: other.to_string(),
                }
                .into());
            }
        })
    }
}

impl ToTokens for SemanticType {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        tokens.append_all(match self {
            SemanticType::Integer => quote!(::rowmap::SemanticType::Integer),
            SemanticType::Text => quote!(::rowmap::SemanticType::Text),
            SemanticType::Timestamp => quote!(::rowmap::SemanticType::Timestamp),
        });
    }
}

/// A single field value, the closed set of kinds a record carries.
#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub enum Value {
    #[default]
    Null,
    Integer(i64),
    Text(String),
    Timestamp(PrimitiveDateTime),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// Plain textual rendering, as it appears inside a quoted SQL literal.
impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Text(v) => f.write_str(v),
            Value::Timestamp(v) => match v.format(TIMESTAMP_FORMAT) {
                Ok(v) => f.write_str(&v),
                Err(..) => Err(fmt::Error),
            },
        }
    }
}

/// Conversion between native field types and [`Value`].
pub trait AsValue {
    fn as_value(&self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
}

fn conversion_error<T>(value: &Value) -> Error {
    Error::msg(format!(
        "Cannot convert {:?} into {}",
        value,
        any::type_name::<T>()
    ))
}

macro_rules! impl_as_value_integer {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl AsValue for $ty {
                fn as_value(&self) -> Value {
                    Value::Integer(i64::from(*self))
                }
                fn try_from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::Integer(v) => <$ty>::try_from(v).map_err(|_| {
                            Error::msg(format!(
                                "Value {} is out of range for {}",
                                v,
                                stringify!($ty)
                            ))
                        }),
                        v => Err(conversion_error::<$ty>(&v)),
                    }
                }
            }
            impl From<$ty> for Value {
                fn from(value: $ty) -> Self {
                    value.as_value()
                }
            }
        )+
    };
}

impl_as_value_integer!(i8, i16, i32, i64, u8, u16, u32);

impl AsValue for String {
    fn as_value(&self) -> Value {
        Value::Text(self.clone())
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Text(v) => Ok(v),
            v => Err(conversion_error::<String>(&v)),
        }
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_value(&self) -> Value {
        Value::Timestamp(*self)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(v) => Ok(v),
            v => Err(conversion_error::<PrimitiveDateTime>(&v)),
        }
    }
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_value(&self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => Value::Null,
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            Ok(None)
        } else {
            T::try_from_value(value).map(Some)
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_owned())
    }
}

impl From<PrimitiveDateTime> for Value {
    fn from(value: PrimitiveDateTime) -> Self {
        Value::Timestamp(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
