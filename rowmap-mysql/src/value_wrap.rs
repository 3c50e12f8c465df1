use rowmap_core::{Error, Value};
use time::{Date, Month, PrimitiveDateTime, Time};

pub(crate) struct ValueWrap(pub(crate) Value);

impl From<Value> for ValueWrap {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
impl From<ValueWrap> for Value {
    fn from(value: ValueWrap) -> Self {
        value.0
    }
}

impl mysql_async::prelude::FromValue for ValueWrap {
    type Intermediate = ValueWrap;
}

/// The text protocol returns every column as bytes, those become `Value::Text`
/// and are parsed later by the semantic type of the column.
impl TryFrom<mysql_async::Value> for ValueWrap {
    type Error = mysql_async::FromValueError;
    fn try_from(value: mysql_async::Value) -> Result<Self, Self::Error> {
        Ok(match value {
            mysql_async::Value::NULL => Value::Null,
            mysql_async::Value::Bytes(v) => Value::Text(match String::from_utf8(v) {
                Ok(v) => v,
                Err(e) => return Err(mysql_async::FromValueError(e.into_bytes().into())),
            }),
            mysql_async::Value::Int(v) => Value::Integer(v),
            mysql_async::Value::UInt(v) => match i64::try_from(v) {
                Ok(v) => Value::Integer(v),
                Err(..) => return Err(mysql_async::FromValueError(value)),
            },
            mysql_async::Value::Float(v) => Value::Text(v.to_string()),
            mysql_async::Value::Double(v) => Value::Text(v.to_string()),
            mysql_async::Value::Date(year, month, day, hour, minute, second, microsecond) => {
                let Ok(month) = Month::try_from(month) else {
                    return Err(mysql_async::FromValueError(value));
                };
                let (Ok(date), Ok(time)) = (
                    Date::from_calendar_date(year as _, month, day),
                    Time::from_hms_micro(hour, minute, second, microsecond),
                ) else {
                    return Err(mysql_async::FromValueError(value));
                };
                Value::Timestamp(PrimitiveDateTime::new(date, time))
            }
            mysql_async::Value::Time(..) => return Err(mysql_async::FromValueError(value)),
        }
        .into())
    }
}

impl TryFrom<ValueWrap> for mysql_async::Value {
    type Error = Error;

    fn try_from(value: ValueWrap) -> Result<Self, Self::Error> {
        type MySQLValue = mysql_async::Value;
        Ok(match value.0 {
            Value::Null => MySQLValue::NULL,
            Value::Integer(v) => MySQLValue::from(v),
            Value::Text(v) => MySQLValue::from(v),
            Value::Timestamp(v) => {
                let year = v.year();
                if year != year.clamp(0, 9999) {
                    return Err(Error::msg(format!(
                        "Date {} is out of range for MySQL",
                        v
                    )));
                }
                MySQLValue::Date(
                    year as _,
                    v.month().into(),
                    v.day(),
                    v.hour(),
                    v.minute(),
                    v.second(),
                    v.microsecond(),
                )
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn from_mysql() {
        let value = |v: mysql_async::Value| ValueWrap::try_from(v).map(|v| v.0).ok();
        assert_eq!(
            value(mysql_async::Value::Bytes(b"ann".to_vec())),
            Some(Value::Text("ann".into()))
        );
        assert_eq!(value(mysql_async::Value::Int(-4)), Some(Value::Integer(-4)));
        assert_eq!(value(mysql_async::Value::UInt(u64::MAX)), None);
        assert_eq!(
            value(mysql_async::Value::Date(2024, 3, 5, 14, 7, 9, 0)),
            Some(Value::Timestamp(datetime!(2024-03-05 14:07:09)))
        );
        assert_eq!(value(mysql_async::Value::Date(2024, 13, 5, 0, 0, 0, 0)), None);
        assert_eq!(value(mysql_async::Value::NULL), Some(Value::Null));
    }

    #[test]
    fn into_mysql() {
        let value = |v: Value| mysql_async::Value::try_from(ValueWrap(v)).ok();
        assert_eq!(value(Value::Integer(30)), Some(mysql_async::Value::Int(30)));
        assert_eq!(
            value(Value::Timestamp(datetime!(2023-11-02 08:30:00))),
            Some(mysql_async::Value::Date(2023, 11, 2, 8, 30, 0, 0))
        );
        assert_eq!(value(Value::Null), Some(mysql_async::Value::NULL));
        assert_eq!(
            value(Value::Text("ann".into())),
            Some(mysql_async::Value::Bytes(b"ann".to_vec()))
        );
    }
}
