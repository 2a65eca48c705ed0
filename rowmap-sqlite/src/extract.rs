use rowmap_core::{Error, Result, Value};
use rusqlite::types::{Value as SqliteValue, ValueRef};
use time::{format_description::well_known::Rfc3339, macros::format_description};

/// Storage value of a query argument. Temporal values, decimals and uuids are stored as
/// text.
pub(crate) fn bind_value(value: &Value) -> Result<SqliteValue> {
    if value.is_null() {
        return Ok(SqliteValue::Null);
    }
    let text = |v: String| Ok(SqliteValue::Text(v));
    match value {
        Value::Boolean(Some(v)) => Ok(SqliteValue::Integer(*v as i64)),
        Value::Int8(Some(v)) => Ok(SqliteValue::Integer(*v as i64)),
        Value::Int16(Some(v)) => Ok(SqliteValue::Integer(*v as i64)),
        Value::Int32(Some(v)) => Ok(SqliteValue::Integer(*v as i64)),
        Value::Int64(Some(v)) => Ok(SqliteValue::Integer(*v)),
        Value::UInt8(Some(v)) => Ok(SqliteValue::Integer(*v as i64)),
        Value::UInt16(Some(v)) => Ok(SqliteValue::Integer(*v as i64)),
        Value::UInt32(Some(v)) => Ok(SqliteValue::Integer(*v as i64)),
        Value::UInt64(Some(v)) => i64::try_from(*v).map(SqliteValue::Integer).map_err(|_| {
            Error::msg(format!(
                "Cannot bind u64 value `{v}` into sqlite integer because it's out of bounds"
            ))
        }),
        Value::Float32(Some(v)) => Ok(SqliteValue::Real(*v as f64)),
        Value::Float64(Some(v)) => Ok(SqliteValue::Real(*v)),
        Value::Decimal(Some(v), ..) => text(v.to_string()),
        Value::Varchar(Some(v)) => text(v.clone()),
        Value::Blob(Some(v)) => Ok(SqliteValue::Blob(v.to_vec())),
        Value::Date(Some(v)) => text(v.format(format_description!("[year]-[month]-[day]"))?),
        Value::Time(Some(v)) => text(v.format(format_description!(
            "[hour]:[minute]:[second].[subsecond]"
        ))?),
        Value::Timestamp(Some(v)) => text(v.format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"
        ))?),
        Value::TimestampWithTimezone(Some(v)) => text(v.format(&Rfc3339)?),
        Value::Uuid(Some(v)) => text(v.to_string()),
        _ => {
            let error = Error::msg(format!("Cannot use a {value:?} as a query parameter"));
            log::error!("{:#}", error);
            Err(error)
        }
    }
}

pub(crate) fn extract_value(value: ValueRef<'_>) -> Result<Value> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(v) => Value::Int64(Some(v)),
        ValueRef::Real(v) => Value::Float64(Some(v)),
        ValueRef::Text(v) => Value::Varchar(Some(String::from_utf8(v.to_vec())?)),
        ValueRef::Blob(v) => Value::Blob(Some(v.into())),
    })
}
