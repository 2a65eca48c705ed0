use crate::{Error, Result, Value, truncate_long};
use anyhow::Context;
use rust_decimal::{Decimal, prelude::FromPrimitive, prelude::ToPrimitive};
use std::{any, str::FromStr};
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time, format_description::parse_borrowed,
    format_description::well_known::Rfc3339,
};
use uuid::Uuid;

/// Conversion between native Rust types and the dynamically typed [`Value`].
///
/// This is the abstraction that moves data in and out of query arguments, record fields
/// and fetched rows.
///
/// # Error semantics
/// - Conversions between integer widths are range checked, the message names both the
///   offending value and the target type.
/// - Textual values (as returned by databases storing temporal, decimal or uuid data as
///   text) are parsed through [`AsValue::parse`].
///
/// # Examples
/// ```rust
/// use rowmap_core::{AsValue, Value};
/// let v = 42i32.as_value();
/// assert!(matches!(v, Value::Int32(Some(42))));
/// let n: i64 = AsValue::try_from_value(v).unwrap();
/// assert_eq!(n, 42);
/// ```
pub trait AsValue {
    /// The typed NULL of this type. Also acts as the prototype describing the logical
    /// kind of a field or column.
    fn as_empty_value() -> Value;
    /// Convert this value into its owned [`Value`] representation.
    fn as_value(self) -> Value;
    /// Attempt to convert a dynamic [`Value`] into `Self`.
    fn try_from_value(value: Value) -> Result<Self>
    where
        Self: Sized;
    /// Parse a full string into `Self`.
    fn parse(input: impl AsRef<str>) -> Result<Self>
    where
        Self: Sized,
    {
        Err(Error::msg(format!(
            "Cannot parse `{}` as {}",
            truncate_long!(input.as_ref()),
            any::type_name::<Self>()
        )))
    }
}

impl<T: AsValue> From<T> for Value {
    fn from(value: T) -> Self {
        value.as_value()
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Varchar(Some(value.into()))
    }
}

fn integer(value: &Value) -> Option<i128> {
    match *value {
        Value::Int8(Some(v)) => Some(v as _),
        Value::Int16(Some(v)) => Some(v as _),
        Value::Int32(Some(v)) => Some(v as _),
        Value::Int64(Some(v)) => Some(v as _),
        Value::UInt8(Some(v)) => Some(v as _),
        Value::UInt16(Some(v)) => Some(v as _),
        Value::UInt32(Some(v)) => Some(v as _),
        Value::UInt64(Some(v)) => Some(v as _),
        _ => None,
    }
}

fn parse_from_str<T: FromStr>(input: &str) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    input.trim().parse::<T>().with_context(|| {
        format!(
            "Cannot parse `{}` as {}",
            truncate_long!(input),
            any::type_name::<T>()
        )
    })
}

macro_rules! impl_as_value_integer {
    ($source:ty, $destination:path) => {
        impl AsValue for $source {
            fn as_empty_value() -> Value {
                $destination(None)
            }
            fn as_value(self) -> Value {
                $destination(Some(self))
            }
            fn try_from_value(value: Value) -> Result<Self> {
                if let $destination(Some(v)) = value {
                    return Ok(v);
                }
                if let Some(v) = integer(&value) {
                    return <$source>::try_from(v).map_err(|_| {
                        Error::msg(format!(
                            "Value {v}: {} is out of range for {}",
                            value.type_name(),
                            any::type_name::<Self>(),
                        ))
                    });
                }
                match value {
                    Value::Boolean(Some(v)) => Ok(v as _),
                    Value::Decimal(Some(v), ..) => {
                        let error = Error::msg(format!(
                            "Value {v}: Decimal does not fit into {}",
                            any::type_name::<Self>()
                        ));
                        if !v.is_integer() {
                            return Err(error.context("The value is not a integer"));
                        }
                        v.to_i128()
                            .and_then(|v| <$source>::try_from(v).ok())
                            .ok_or(error)
                    }
                    Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} to {}",
                        any::type_name::<Self>(),
                    ))),
                }
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                parse_from_str(input.as_ref())
            }
        }
    };
}
impl_as_value_integer!(i8, Value::Int8);
impl_as_value_integer!(i16, Value::Int16);
impl_as_value_integer!(i32, Value::Int32);
impl_as_value_integer!(i64, Value::Int64);
impl_as_value_integer!(u8, Value::UInt8);
impl_as_value_integer!(u16, Value::UInt16);
impl_as_value_integer!(u32, Value::UInt32);
impl_as_value_integer!(u64, Value::UInt64);

fn unparsable<T>(input: &str) -> Result<T> {
    Err(Error::msg(format!(
        "Cannot parse `{}` as {}",
        truncate_long!(input),
        any::type_name::<T>()
    )))
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
                    _ => Err(Error::msg(format!(
                        "Cannot convert {value:?} to {}",
                        any::type_name::<Self>(),
                    ))),
                }
            }
            fn parse(input: impl AsRef<str>) -> Result<Self> {
                $parse(input.as_ref())
            }
        }
    };
}
impl_as_value!(
    bool,
    Value::Boolean,
    |v: &str| match v.trim() {
        x if x.eq_ignore_ascii_case("true") || x.eq_ignore_ascii_case("t") || x == "1" => Ok(true),
        x if x.eq_ignore_ascii_case("false") || x.eq_ignore_ascii_case("f") || x == "0" => Ok(false),
        _ => unparsable(v),
    },
    Value::Int8(Some(v)) => Ok(v != 0),
    Value::Int16(Some(v)) => Ok(v != 0),
    Value::Int32(Some(v)) => Ok(v != 0),
    Value::Int64(Some(v)) => Ok(v != 0),
    Value::UInt8(Some(v)) => Ok(v != 0),
    Value::UInt16(Some(v)) => Ok(v != 0),
    Value::UInt32(Some(v)) => Ok(v != 0),
    Value::UInt64(Some(v)) => Ok(v != 0),
);
impl_as_value!(
    f32,
    Value::Float32,
    parse_from_str::<f32>,
    Value::Float64(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
    Value::Decimal(Some(v), ..) => Ok(v.try_into()?),
);
impl_as_value!(
    f64,
    Value::Float64,
    parse_from_str::<f64>,
    Value::Float32(Some(v)) => Ok(v as _),
    Value::Int32(Some(v)) => Ok(v as _),
    Value::Int64(Some(v)) => Ok(v as _),
    Value::Decimal(Some(v), ..) => Ok(v.try_into()?),
);
impl_as_value!(
    String,
    Value::Varchar,
    |v: &str| Ok(v.to_string()),
    Value::Blob(Some(v)) => String::from_utf8(v.into_vec()).context("Blob is not valid utf-8"),
    Value::Uuid(Some(v)) => Ok(v.to_string()),
);
impl_as_value!(
    Box<[u8]>,
    Value::Blob,
    unparsable::<Box<[u8]>>,
    Value::Varchar(Some(v)) => Ok(v.into_bytes().into()),
);
impl_as_value!(
    Vec<u8>,
    Value::Blob,
    unparsable::<Vec<u8>>,
    Value::Varchar(Some(v)) => Ok(v.into_bytes()),
);
impl_as_value!(
    Uuid,
    Value::Uuid,
    parse_from_str::<Uuid>,
    Value::Blob(Some(v)) => Uuid::from_slice(&v).context("Cannot read the blob as a uuid"),
);

macro_rules! parse_time {
    ($value: ident, $($formats:literal),+ $(,)?) => {
        'value: {
            for format in [$($formats,)+] {
                let format = parse_borrowed::<2>(format)?;
                let mut parsed = time::parsing::Parsed::new();
                let remaining = parsed.parse_items($value.as_bytes(), &format);
                if let Ok(remaining) = remaining
                    && remaining.is_empty()
                {
                    break 'value Ok(parsed.try_into()?);
                }
            }
            Err(Error::msg(format!(
                "Cannot parse `{}` as {}",
                truncate_long!($value),
                any::type_name::<Self>()
            )))
        }
    };
}

impl AsValue for Date {
    fn as_empty_value() -> Value {
        Value::Date(None)
    }
    fn as_value(self) -> Value {
        Value::Date(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Date(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.date()),
            Value::TimestampWithTimezone(Some(v)) => Ok(v.date()),
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to Date"))),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let v = input.as_ref().trim();
        parse_time!(v, "[year]-[month]-[day]")
    }
}

impl AsValue for Time {
    fn as_empty_value() -> Value {
        Value::Time(None)
    }
    fn as_value(self) -> Value {
        Value::Time(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Time(Some(v)) => Ok(v),
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to Time"))),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let v = input.as_ref().trim();
        parse_time!(
            v,
            "[hour]:[minute]:[second].[subsecond]",
            "[hour]:[minute]:[second]",
            "[hour]:[minute]",
        )
    }
}

impl AsValue for PrimitiveDateTime {
    fn as_empty_value() -> Value {
        Value::Timestamp(None)
    }
    fn as_value(self) -> Value {
        Value::Timestamp(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Timestamp(Some(v)) => Ok(v),
            Value::TimestampWithTimezone(Some(v)) => {
                let v = v.to_offset(time::UtcOffset::UTC);
                Ok(PrimitiveDateTime::new(v.date(), v.time()))
            }
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to Timestamp"))),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let v = input.as_ref().trim();
        if let Ok(v) = OffsetDateTime::parse(v, &Rfc3339) {
            let v = v.to_offset(time::UtcOffset::UTC);
            return Ok(PrimitiveDateTime::new(v.date(), v.time()));
        }
        parse_time!(
            v,
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]",
            "[year]-[month]-[day]T[hour]:[minute]:[second]",
            "[year]-[month]-[day]T[hour]:[minute]",
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]",
            "[year]-[month]-[day] [hour]:[minute]:[second]",
            "[year]-[month]-[day] [hour]:[minute]",
        )
    }
}

impl AsValue for OffsetDateTime {
    fn as_empty_value() -> Value {
        Value::TimestampWithTimezone(None)
    }
    fn as_value(self) -> Value {
        Value::TimestampWithTimezone(Some(self))
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::TimestampWithTimezone(Some(v)) => Ok(v),
            Value::Timestamp(Some(v)) => Ok(v.assume_utc()),
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(Error::msg(format!(
                "Cannot convert {value:?} to TimestampWithTimezone"
            ))),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        let v = input.as_ref().trim();
        OffsetDateTime::parse(v, &Rfc3339)
            .or_else(|_| <PrimitiveDateTime as AsValue>::parse(v).map(PrimitiveDateTime::assume_utc))
    }
}

impl AsValue for Decimal {
    fn as_empty_value() -> Value {
        Value::Decimal(None, 0, 0)
    }
    fn as_value(self) -> Value {
        Value::Decimal(Some(self), 0, self.scale() as _)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        if let Some(v) = integer(&value) {
            return Decimal::from_i128(v)
                .ok_or_else(|| Error::msg(format!("Could not create a Decimal from {v}")));
        }
        match value {
            Value::Decimal(Some(v), ..) => Ok(v),
            Value::Float32(Some(v)) => Decimal::from_f32(v)
                .ok_or_else(|| Error::msg(format!("Cannot convert {value:?} to Decimal"))),
            Value::Float64(Some(v)) => Decimal::from_f64(v)
                .ok_or_else(|| Error::msg(format!("Cannot convert {value:?} to Decimal"))),
            Value::Varchar(Some(ref v)) => <Self as AsValue>::parse(v),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to Decimal"))),
        }
    }
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        parse_from_str(input.as_ref())
    }
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
    fn parse(input: impl AsRef<str>) -> Result<Self> {
        Ok(Some(T::parse(input)?))
    }
}
