use crate::{Error, Result, Value};
use anyhow::Context;
use serde::{Serialize, de::DeserializeOwned};

/// Serialization used to store a structured field in a single column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Encoding {
    /// Binary payload (`bincode`), stored as a blob.
    Gob,
    /// JSON text.
    Json,
    /// XML text.
    Xml,
}

impl Encoding {
    pub fn name(self) -> &'static str {
        match self {
            Encoding::Gob => "gob",
            Encoding::Json => "json",
            Encoding::Xml => "xml",
        }
    }

    /// Typed NULL of the column storing this encoding.
    pub fn prototype(self) -> Value {
        match self {
            Encoding::Gob => Value::Blob(None),
            Encoding::Json | Encoding::Xml => Value::Varchar(None),
        }
    }

    /// Wraps an encoded payload into the column value.
    pub fn wrap(self, payload: Vec<u8>) -> Result<Value> {
        Ok(match self {
            Encoding::Gob => Value::Blob(Some(payload.into_boxed_slice())),
            Encoding::Json | Encoding::Xml => Value::Varchar(Some(
                String::from_utf8(payload).context("Encoded payload is not valid UTF-8")?,
            )),
        })
    }
}

/// Field stored through an [`Encoding`].
pub trait Encoded {
    fn encode(&self, encoding: Encoding) -> Result<Vec<u8>>;
    fn decode(&mut self, encoding: Encoding, payload: &[u8]) -> Result<()>;
    /// True when equal to the default value.
    fn is_zero(&self) -> bool;
    /// Resets to the default value.
    fn reset(&mut self);
}

impl<T: Serialize + DeserializeOwned + Default + PartialEq> Encoded for T {
    fn encode(&self, encoding: Encoding) -> Result<Vec<u8>> {
        match encoding {
            Encoding::Gob => bincode::serialize(self).map_err(Error::from),
            Encoding::Json => serde_json::to_vec(self).map_err(Error::from),
            Encoding::Xml => quick_xml::se::to_string_with_root("value", self)
                .map(String::into_bytes)
                .map_err(Error::from),
        }
        .with_context(|| format!("While encoding {}", encoding.name()))
    }

    fn decode(&mut self, encoding: Encoding, payload: &[u8]) -> Result<()> {
        *self = match encoding {
            Encoding::Gob => bincode::deserialize(payload).map_err(Error::from),
            Encoding::Json => serde_json::from_slice(payload).map_err(Error::from),
            Encoding::Xml => std::str::from_utf8(payload)
                .map_err(Error::from)
                .and_then(|v| quick_xml::de::from_str(v).map_err(Error::from)),
        }
        .with_context(|| format!("While decoding {}", encoding.name()))?;
        Ok(())
    }

    fn is_zero(&self) -> bool {
        *self == T::default()
    }

    fn reset(&mut self) {
        *self = T::default();
    }
}
