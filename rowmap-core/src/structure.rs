use crate::{FieldKind, Options, RecordType};
use std::{any::TypeId, fmt::Debug, sync::Arc};

/// Index of a [`Struct`] in its registry.
pub type StructId = usize;

/// Reflected field with its parsed tag.
#[derive(Clone, Debug)]
pub struct Field {
    /// Rust field name.
    pub name: &'static str,
    /// Name declared in the tag, empty when none.
    pub alias: String,
    /// Position in the declaring record, used for field access.
    pub index: usize,
    pub options: Options,
    /// Declared maximum length, 0 when none.
    pub size: u32,
    pub kind: FieldKind,
    /// Struct declaring the field.
    pub belong: StructId,
    /// Struct of the nested record, for inline fields and relations.
    pub own: Option<StructId>,
}

impl Field {
    pub fn is(&self, option: Options) -> bool {
        self.options.contains(option)
    }

    pub fn is_inline(&self) -> bool {
        self.options.is_inline()
    }

    pub fn is_one(&self) -> bool {
        self.options.is_one()
    }

    pub fn is_many(&self) -> bool {
        self.options.is_many()
    }

    pub fn is_nullable(&self) -> bool {
        self.kind.is_nullable()
    }

    /// Alias when declared, field name otherwise.
    pub fn column_name(&self) -> &str {
        if self.alias.is_empty() {
            self.name
        } else {
            &self.alias
        }
    }
}

/// Ordered fields of one record type.
#[derive(Debug)]
pub struct Struct {
    pub id: StructId,
    pub type_id: TypeId,
    pub record_type: &'static RecordType,
    pub fields: Vec<Arc<Field>>,
}

impl Struct {
    pub fn name(&self) -> &'static str {
        self.record_type.name
    }
}
