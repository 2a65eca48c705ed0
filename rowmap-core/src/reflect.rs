use crate::{AsValue, Encoded, Result, Value};
use std::{any::TypeId, fmt::Debug};

/// Static description of a record type, produced by `#[derive(Record)]`.
#[derive(Debug)]
pub struct RecordType {
    /// Rust type name.
    pub name: &'static str,
    /// Table name, the snake case type name unless declared.
    pub table: &'static str,
    pub type_id: fn() -> TypeId,
    pub fields: &'static [FieldDef],
}

/// One declared struct field.
#[derive(Debug)]
pub struct FieldDef {
    pub name: &'static str,
    /// Raw `#[rowmap("...")]` tag, parsed when the type is first resolved.
    pub tag: &'static str,
    pub kind: FieldKind,
}

/// Shape of a field, as seen by the schema builder.
#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    /// Value converted through [`AsValue`].
    Scalar {
        /// Typed NULL describing the stored kind.
        prototype: fn() -> Value,
        /// Converts a fetched value into the field representation.
        normalize: fn(Value) -> Result<Value>,
        /// The field is an `Option`.
        nullable: bool,
    },
    /// Serde value stored through an encoding option.
    Encoded { nullable: bool },
    /// Nested record, inline or target of a one relation.
    Record {
        target: fn() -> &'static RecordType,
        /// The field is an `Option`.
        optional: bool,
    },
    /// Collection of records, target of a many relation.
    Many {
        target: fn() -> &'static RecordType,
        /// Key prototype when the collection is a map.
        key: Option<fn() -> Value>,
    },
}

impl FieldKind {
    pub fn target(&self) -> Option<&'static RecordType> {
        match self {
            FieldKind::Record { target, .. } | FieldKind::Many { target, .. } => Some(target()),
            _ => None,
        }
    }

    pub fn is_nullable(&self) -> bool {
        match *self {
            FieldKind::Scalar { nullable, .. } | FieldKind::Encoded { nullable } => nullable,
            FieldKind::Record { optional, .. } => optional,
            FieldKind::Many { .. } => true,
        }
    }
}

/// Shared access to a field.
pub enum FieldRef<'a> {
    Scalar(&'a dyn Scalar),
    Encoded(&'a dyn Encoded),
    /// `None` when an optional nested record is absent.
    Record(Option<&'a dyn Reflect>),
    Many,
}

/// Exclusive access to a field. Optional nested records are allocated on access.
pub enum FieldMut<'a> {
    Scalar(&'a mut dyn Scalar),
    Encoded(&'a mut dyn Encoded),
    Record(&'a mut dyn Reflect),
    Many,
}

impl Debug for FieldRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldRef::Scalar(v) => write!(f, "Scalar({:?})", v.get()),
            FieldRef::Encoded(..) => f.write_str("Encoded"),
            FieldRef::Record(v) => write!(f, "Record({})", v.is_some()),
            FieldRef::Many => f.write_str("Many"),
        }
    }
}

/// Dynamic field access on a record, implemented by `#[derive(Record)]`.
pub trait Reflect: 'static {
    fn record_type(&self) -> &'static RecordType;
    fn field(&self, index: usize) -> FieldRef<'_>;
    fn field_mut(&mut self, index: usize) -> FieldMut<'_>;
    /// Sets an optional field to `None`, other fields are left untouched.
    fn clear_field(&mut self, index: usize);
}

/// Record type mapped to a table.
///
/// ```rust,ignore
/// #[derive(Record, Default, Clone, Debug)]
/// struct User {
///     #[rowmap("id,primary_key,auto_increment")]
///     id: i64,
///     name: String,
///     #[rowmap(",version")]
///     version: i32,
/// }
/// ```
pub trait Record: Reflect + Default + Clone + Sized {
    fn describe() -> &'static RecordType;
}

/// Field converted to and from a single [`Value`].
pub trait Scalar {
    fn get(&self) -> Value;
    fn set(&mut self, value: Value) -> Result<()>;
}

impl<T: AsValue + Clone> Scalar for T {
    fn get(&self) -> Value {
        self.clone().as_value()
    }

    fn set(&mut self, value: Value) -> Result<()> {
        *self = T::try_from_value(value)?;
        Ok(())
    }
}

/// Converts a fetched value into the canonical value of `T`.
pub fn normalize<T: AsValue>(value: Value) -> Result<Value> {
    Ok(T::try_from_value(value)?.as_value())
}
