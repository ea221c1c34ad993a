use crate::Value;
use anyhow::{Error, Result};
use std::{any, str::FromStr};
use time::{
    Date, PrimitiveDateTime, Time, format_description::BorrowedFormatItem,
    macros::format_description,
};
use uuid::Uuid;

/// Conversion between Rust types and [`Value`].
///
/// Implemented by every type a field of an entity can have, it is what the derived getters and
/// setters use to move data in and out of a struct.
pub trait AsValue {
    /// The typed NULL of this type.
    fn as_empty_value() -> Value;
    fn as_value(self) -> Value;
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parses the textual representation, used when a driver reports a column as text.
    fn parse(value: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse '{}' as {}",
            value.as_ref(),
            any::type_name::<Self>()
        )))
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&'static str> for Value {
    fn from(value: &'static str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn null_error<T>() -> Error {
    Error::msg(format!("Cannot convert NULL to {}", any::type_name::<T>()))
}

fn parse_from_str<T>(value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse::<T>().map_err(|e| {
        Error::new(e).context(format!(
            "Cannot parse '{value}' as {}",
            any::type_name::<T>()
        ))
    })
}

macro_rules! impl_as_value {
    ($source:ty, $destination:path, $parse:expr $(, $pat_rest:pat => $expr_rest:expr)* $(,)?) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self.into()))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                match value {
                    $destination(Some(v), ..) => Ok(v.into()),
                    $($pat_rest => $expr_rest,)*
                    #[allow(unreachable_patterns)]
                    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
                    ref v if v.is_null() => Err(null_error::<Self>()),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} to {}",
                        any::type_name::<Self>(),
                    ))),
                }
            }
            fn parse(value: impl AsRef<str>) -> Result<Self> {
                $parse(value.as_ref())
            }
        }
    };
}

impl_as_value!(bool, Value::Boolean, parse_from_str, Value::Int32(Some(v)) => Ok(v != 0));
impl_as_value!(
    i32,
    Value::Int32,
    parse_from_str,
    Value::Int64(Some(v)) => i32::try_from(v)
        .map_err(|_| Error::msg(format!("Value {v}: i64 is out of range for i32"))),
);
impl_as_value!(i64, Value::Int64, parse_from_str, Value::Int32(Some(v)) => Ok(v as _));
impl_as_value!(
    f32,
    Value::Float32,
    parse_from_str,
    Value::Float64(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
);
impl_as_value!(
    f64,
    Value::Float64,
    parse_from_str,
    Value::Float32(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
);

impl AsValue for String {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn as_value(self) -> Value {
        Value::Varchar(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) => Ok(v),
            Value::Int32(Some(..))
            | Value::Int64(Some(..))
            | Value::Float32(Some(..))
            | Value::Float64(Some(..))
            | Value::Uuid(Some(..)) => Ok(value.to_string()),
            v if v.is_null() => Err(null_error::<Self>()),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to String"))),
        }
    }
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        Ok(value.as_ref().to_owned())
    }
}

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");
const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
const TIME_FORMAT_SUBSECOND: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second].[subsecond]");

impl_as_value!(Date, Value::Date, parse_date, Value::Timestamp(Some(v)) => Ok(v.date()));

impl_as_value!(
    PrimitiveDateTime,
    Value::Timestamp,
    parse_timestamp,
    Value::Date(Some(v)) => Ok(v.midnight()),
);

impl_as_value!(Uuid, Value::Uuid, parse_from_str);

fn parse_date(value: &str) -> Result<Date> {
    Date::parse(value.trim(), DATE_FORMAT)
        .map_err(|e| Error::new(e).context(format!("Cannot parse '{value}' as a date")))
}

fn parse_timestamp(value: &str) -> Result<PrimitiveDateTime> {
    let value = value.trim();
    let Some((date, time)) = value.split_once([' ', 'T']) else {
        return Ok(parse_date(value)?.midnight());
    };
    let time = Time::parse(time, TIME_FORMAT)
        .or_else(|_| Time::parse(time, TIME_FORMAT_SUBSECOND))
        .map_err(|e| Error::new(e).context(format!("Cannot parse '{value}' as a timestamp")))?;
    Ok(PrimitiveDateTime::new(parse_date(date)?, time))
}

impl<T: AsValue> AsValue for Option<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        match self {
            Some(v) => v.as_value(),
            None => T::as_empty_value(),
        }
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if value.is_null() {
            return Ok(None);
        }
        Ok(Some(T::try_from_value(value)?))
    }
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        Ok(Some(T::parse(value)?))
    }
}

impl<T: AsValue> AsValue for Box<T> {
    fn as_empty_value() -> Value {
        T::as_empty_value()
    }
    fn as_value(self) -> Value {
        (*self).as_value()
    }
    fn try_from_value(value: Value) -> Result<Self> {
        Ok(Box::new(T::try_from_value(value)?))
    }
    fn parse(value: impl AsRef<str>) -> Result<Self> {
        Ok(Box::new(T::parse(value)?))
    }
}
