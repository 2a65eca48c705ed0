use crate::{Error, Result};
use rust_decimal::Decimal;
use std::{any, mem};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Dynamically typed database value.
///
/// Every variant carries an `Option` payload: `None` is the typed NULL, which keeps the
/// logical kind of a column even when no data is present.
#[derive(Default, Debug, Clone)]
pub enum Value {
    #[default]
    Null,
    Boolean(Option<bool>),
    Int8(Option<i8>),
    Int16(Option<i16>),
    Int32(Option<i32>),
    Int64(Option<i64>),
    UInt8(Option<u8>),
    UInt16(Option<u16>),
    UInt32(Option<u32>),
    UInt64(Option<u64>),
    Float32(Option<f32>),
    Float64(Option<f64>),
    Decimal(Option<Decimal>, /* prec: */ u8, /* scale: */ u8),
    Varchar(Option<String>),
    Blob(Option<Box<[u8]>>),
    Date(Option<Date>),
    Time(Option<Time>),
    Timestamp(Option<PrimitiveDateTime>),
    TimestampWithTimezone(Option<OffsetDateTime>),
    Uuid(Option<Uuid>),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Boolean(l), Self::Boolean(r)) => l == r,
            (Self::Int8(l), Self::Int8(r)) => l == r,
            (Self::Int16(l), Self::Int16(r)) => l == r,
            (Self::Int32(l), Self::Int32(r)) => l == r,
            (Self::Int64(l), Self::Int64(r)) => l == r,
            (Self::UInt8(l), Self::UInt8(r)) => l == r,
            (Self::UInt16(l), Self::UInt16(r)) => l == r,
            (Self::UInt32(l), Self::UInt32(r)) => l == r,
            (Self::UInt64(l), Self::UInt64(r)) => l == r,
            (Self::Float32(l), Self::Float32(r)) => l == r,
            (Self::Float64(l), Self::Float64(r)) => l == r,
            (Self::Decimal(l, ..), Self::Decimal(r, ..)) => l == r,
            (Self::Varchar(l), Self::Varchar(r)) => l == r,
            (Self::Blob(l), Self::Blob(r)) => l == r,
            (Self::Date(l), Self::Date(r)) => l == r,
            (Self::Time(l), Self::Time(r)) => l == r,
            (Self::Timestamp(l), Self::Timestamp(r)) => l == r,
            (Self::TimestampWithTimezone(l), Self::TimestampWithTimezone(r)) => l == r,
            (Self::Uuid(l), Self::Uuid(r)) => l == r,
            _ => false,
        }
    }
}

impl Value {
    /// True when both values have the same variant, payload ignored.
    pub fn same_type(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }

    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => v.is_none(),
            Value::Int8(v) => v.is_none(),
            Value::Int16(v) => v.is_none(),
            Value::Int32(v) => v.is_none(),
            Value::Int64(v) => v.is_none(),
            Value::UInt8(v) => v.is_none(),
            Value::UInt16(v) => v.is_none(),
            Value::UInt32(v) => v.is_none(),
            Value::UInt64(v) => v.is_none(),
            Value::Float32(v) => v.is_none(),
            Value::Float64(v) => v.is_none(),
            Value::Decimal(v, ..) => v.is_none(),
            Value::Varchar(v) => v.is_none(),
            Value::Blob(v) => v.is_none(),
            Value::Date(v) => v.is_none(),
            Value::Time(v) => v.is_none(),
            Value::Timestamp(v) => v.is_none(),
            Value::TimestampWithTimezone(v) => v.is_none(),
            Value::Uuid(v) => v.is_none(),
        }
    }

    /// True for NULL and for the zero payload of the variant (`0`, `""`, empty blob,
    /// `false`, the unix epoch, the nil uuid).
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Boolean(v) => !v.unwrap_or_default(),
            Value::Int8(v) => v.unwrap_or_default() == 0,
            Value::Int16(v) => v.unwrap_or_default() == 0,
            Value::Int32(v) => v.unwrap_or_default() == 0,
            Value::Int64(v) => v.unwrap_or_default() == 0,
            Value::UInt8(v) => v.unwrap_or_default() == 0,
            Value::UInt16(v) => v.unwrap_or_default() == 0,
            Value::UInt32(v) => v.unwrap_or_default() == 0,
            Value::UInt64(v) => v.unwrap_or_default() == 0,
            Value::Float32(v) => v.unwrap_or_default() == 0.0,
            Value::Float64(v) => v.unwrap_or_default() == 0.0,
            Value::Decimal(v, ..) => v.is_none_or(|v| v.is_zero()),
            Value::Varchar(v) => v.as_ref().is_none_or(String::is_empty),
            Value::Blob(v) => v.as_ref().is_none_or(|v| v.is_empty()),
            Value::Date(v) => v.is_none_or(|v| v == OffsetDateTime::UNIX_EPOCH.date()),
            Value::Time(v) => v.is_none_or(|v| v == Time::MIDNIGHT),
            Value::Timestamp(v) => {
                v.is_none_or(|v| v == OffsetDateTime::UNIX_EPOCH.date().midnight())
            }
            Value::TimestampWithTimezone(v) => v.is_none_or(|v| v == OffsetDateTime::UNIX_EPOCH),
            Value::Uuid(v) => v.is_none_or(|v| v.is_nil()),
        }
    }

    /// Same variant carrying the zero payload.
    pub fn zeroed(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(Some(false)),
            Value::Int8(..) => Value::Int8(Some(0)),
            Value::Int16(..) => Value::Int16(Some(0)),
            Value::Int32(..) => Value::Int32(Some(0)),
            Value::Int64(..) => Value::Int64(Some(0)),
            Value::UInt8(..) => Value::UInt8(Some(0)),
            Value::UInt16(..) => Value::UInt16(Some(0)),
            Value::UInt32(..) => Value::UInt32(Some(0)),
            Value::UInt64(..) => Value::UInt64(Some(0)),
            Value::Float32(..) => Value::Float32(Some(0.0)),
            Value::Float64(..) => Value::Float64(Some(0.0)),
            Value::Decimal(_, p, s) => Value::Decimal(Some(Decimal::ZERO), *p, *s),
            Value::Varchar(..) => Value::Varchar(Some(String::new())),
            Value::Blob(..) => Value::Blob(Some(Box::default())),
            Value::Date(..) => Value::Date(Some(OffsetDateTime::UNIX_EPOCH.date())),
            Value::Time(..) => Value::Time(Some(Time::MIDNIGHT)),
            Value::Timestamp(..) => {
                Value::Timestamp(Some(OffsetDateTime::UNIX_EPOCH.date().midnight()))
            }
            Value::TimestampWithTimezone(..) => {
                Value::TimestampWithTimezone(Some(OffsetDateTime::UNIX_EPOCH))
            }
            Value::Uuid(..) => Value::Uuid(Some(Uuid::nil())),
        }
    }

    /// Same variant carrying no payload.
    pub fn as_null(&self) -> Value {
        match self {
            Value::Null => Value::Null,
            Value::Boolean(..) => Value::Boolean(None),
            Value::Int8(..) => Value::Int8(None),
            Value::Int16(..) => Value::Int16(None),
            Value::Int32(..) => Value::Int32(None),
            Value::Int64(..) => Value::Int64(None),
            Value::UInt8(..) => Value::UInt8(None),
            Value::UInt16(..) => Value::UInt16(None),
            Value::UInt32(..) => Value::UInt32(None),
            Value::UInt64(..) => Value::UInt64(None),
            Value::Float32(..) => Value::Float32(None),
            Value::Float64(..) => Value::Float64(None),
            Value::Decimal(_, p, s) => Value::Decimal(None, *p, *s),
            Value::Varchar(..) => Value::Varchar(None),
            Value::Blob(..) => Value::Blob(None),
            Value::Date(..) => Value::Date(None),
            Value::Time(..) => Value::Time(None),
            Value::Timestamp(..) => Value::Timestamp(None),
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(None),
            Value::Uuid(..) => Value::Uuid(None),
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            Value::Int8(..)
                | Value::Int16(..)
                | Value::Int32(..)
                | Value::Int64(..)
                | Value::UInt8(..)
                | Value::UInt16(..)
                | Value::UInt32(..)
                | Value::UInt64(..)
        )
    }

    pub fn is_unsigned(&self) -> bool {
        matches!(
            self,
            Value::UInt8(..) | Value::UInt16(..) | Value::UInt32(..) | Value::UInt64(..)
        )
    }

    /// Kinds able to hold a point in time: timestamps, 32 bits integers (unix seconds)
    /// and 64 bits integers (unix milliseconds).
    pub fn is_time(&self) -> bool {
        matches!(
            self,
            Value::Int32(..)
                | Value::UInt32(..)
                | Value::Int64(..)
                | Value::UInt64(..)
                | Value::Timestamp(..)
                | Value::TimestampWithTimezone(..)
        )
    }

    /// Integer payload widened to `i64`, `None` when null or not integral.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Int8(v) => v.map(Into::into),
            Value::Int16(v) => v.map(Into::into),
            Value::Int32(v) => v.map(Into::into),
            Value::Int64(v) => v,
            Value::UInt8(v) => v.map(Into::into),
            Value::UInt16(v) => v.map(Into::into),
            Value::UInt32(v) => v.map(Into::into),
            Value::UInt64(v) => v.and_then(|v| i64::try_from(v).ok()),
            _ => None,
        }
    }

    /// Builds a value of the same integer variant holding `n`.
    pub fn with_integer(&self, n: i64) -> Result<Value> {
        let error = || {
            Error::msg(format!(
                "Value {n}: i64 is out of range for {}",
                self.type_name()
            ))
        };
        Ok(match self {
            Value::Int8(..) => Value::Int8(Some(n.try_into().map_err(|_| error())?)),
            Value::Int16(..) => Value::Int16(Some(n.try_into().map_err(|_| error())?)),
            Value::Int32(..) => Value::Int32(Some(n.try_into().map_err(|_| error())?)),
            Value::Int64(..) => Value::Int64(Some(n)),
            Value::UInt8(..) => Value::UInt8(Some(n.try_into().map_err(|_| error())?)),
            Value::UInt16(..) => Value::UInt16(Some(n.try_into().map_err(|_| error())?)),
            Value::UInt32(..) => Value::UInt32(Some(n.try_into().map_err(|_| error())?)),
            Value::UInt64(..) => Value::UInt64(Some(n.try_into().map_err(|_| error())?)),
            _ => {
                return Err(Error::msg(format!(
                    "Cannot store the integer {n} into {}",
                    self.type_name()
                )));
            }
        })
    }

    /// Builds a value of the same time-capable variant holding `instant`.
    pub fn with_time(&self, instant: OffsetDateTime) -> Result<Value> {
        let millis = (instant.unix_timestamp_nanos() / 1_000_000) as i64;
        let seconds = instant.unix_timestamp();
        Ok(match self {
            Value::TimestampWithTimezone(..) => Value::TimestampWithTimezone(Some(instant)),
            Value::Timestamp(..) => {
                let utc = instant.to_offset(time::UtcOffset::UTC);
                Value::Timestamp(Some(PrimitiveDateTime::new(utc.date(), utc.time())))
            }
            Value::Int32(..) | Value::UInt32(..) => self.with_integer(seconds)?,
            Value::Int64(..) | Value::UInt64(..) => self.with_integer(millis)?,
            _ => {
                return Err(Error::msg(format!(
                    "Cannot store a point in time into {}",
                    self.type_name()
                )));
            }
        })
    }

    /// Short variant name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Boolean(..) => "Boolean",
            Value::Int8(..) => "Int8",
            Value::Int16(..) => "Int16",
            Value::Int32(..) => "Int32",
            Value::Int64(..) => "Int64",
            Value::UInt8(..) => "UInt8",
            Value::UInt16(..) => "UInt16",
            Value::UInt32(..) => "UInt32",
            Value::UInt64(..) => "UInt64",
            Value::Float32(..) => "Float32",
            Value::Float64(..) => "Float64",
            Value::Decimal(..) => "Decimal",
            Value::Varchar(..) => "Varchar",
            Value::Blob(..) => "Blob",
            Value::Date(..) => "Date",
            Value::Time(..) => "Time",
            Value::Timestamp(..) => "Timestamp",
            Value::TimestampWithTimezone(..) => "TimestampWithTimezone",
            Value::Uuid(..) => "Uuid",
        }
    }

    /// Raw bytes of a `Blob` or `Varchar`, `None` for null.
    pub fn as_bytes(&self) -> Result<Option<&[u8]>> {
        match self {
            Value::Null => Ok(None),
            Value::Blob(v) => Ok(v.as_deref()),
            Value::Varchar(v) => Ok(v.as_deref().map(str::as_bytes)),
            _ => Err(Error::msg(format!(
                "Cannot read {} as {}",
                self.type_name(),
                any::type_name::<&[u8]>()
            ))),
        }
    }
}
