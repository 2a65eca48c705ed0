use crate::{
    Encoding, Error, Field, FieldKind, FieldMut, FieldRef, Identifier, Operand, Options,
    Qualifier, Reflect, Result, Value, limit_time_precision,
};
use std::{fmt::Debug, sync::Arc};
use time::OffsetDateTime;

/// Index of a [`Table`](crate::Table) in its registry.
pub type TableId = usize;

/// Physical column of a table.
///
/// The field chain addresses the stored value starting from the root record: one field
/// for plain columns, the inline path followed by the terminal field for flattened
/// columns, the relation field followed by the remote primary key chain for one
/// relations.
#[derive(Clone, Debug)]
pub struct Column {
    pub name: String,
    /// Position in the table.
    pub index: usize,
    /// Name of the owning table.
    pub table: String,
    pub(crate) fields: Vec<Arc<Field>>,
    pub(crate) flags: Options,
    /// Target table of relation columns.
    pub related: Option<TableId>,
}

impl Column {
    pub(crate) fn new(table: &str, index: usize, fields: Vec<Arc<Field>>) -> Self {
        Self {
            name: String::new(),
            index,
            table: table.to_string(),
            fields,
            flags: Options::empty(),
            related: None,
        }
    }

    pub fn fields(&self) -> &[Arc<Field>] {
        &self.fields
    }

    pub(crate) fn first(&self) -> &Field {
        &self.fields[0]
    }

    pub fn last(&self) -> &Field {
        &self.fields[self.fields.len() - 1]
    }

    /// Relation field of the chain.
    pub(crate) fn one(&self) -> Option<&Field> {
        self.fields.iter().find(|v| v.is_one()).map(AsRef::as_ref)
    }

    pub fn is(&self, flag: Options) -> bool {
        self.flags.contains(flag)
    }

    pub fn is_auto_increment(&self) -> bool {
        self.is(Options::AUTO_INCREMENT)
    }

    pub fn is_auto_now(&self) -> bool {
        self.is(Options::AUTO_NOW)
    }

    pub fn is_auto_now_add(&self) -> bool {
        self.is(Options::AUTO_NOW_ADD)
    }

    /// Zero values are stored as NULL and NULL is read back as zero.
    pub fn is_collapse(&self) -> bool {
        self.is(Options::COLLAPSE)
    }

    pub fn is_primary_key(&self) -> bool {
        self.is(Options::PRIMARY_KEY)
    }

    pub fn is_version(&self) -> bool {
        self.is(Options::VERSION)
    }

    pub fn is_unique(&self) -> bool {
        self.is(Options::UNIQUE)
    }

    /// Some field of the chain is an `Option`.
    pub fn is_nullable(&self) -> bool {
        self.is(Options::NULLABLE)
    }

    pub fn is_many(&self) -> bool {
        self.is(Options::MANY)
    }

    pub fn is_one(&self) -> bool {
        self.is(Options::ONE)
    }

    pub fn encoding(&self) -> Option<Encoding> {
        self.last().options.encoding()
    }

    /// Declared maximum length.
    pub fn size(&self) -> u32 {
        self.last().size
    }

    /// Typed NULL of the stored kind.
    pub fn prototype(&self) -> Value {
        match self.last().kind {
            FieldKind::Scalar { prototype, .. } => prototype(),
            FieldKind::Encoded { .. } => self
                .encoding()
                .map_or(Value::Blob(None), Encoding::prototype),
            _ => Value::Null,
        }
    }

    pub fn operand(&self) -> Operand {
        Operand::new(Identifier::new(self.name.clone()))
    }

    /// Column operand qualified by the table name and the given prefixes.
    pub fn qualifier(&self, prefix: &[&str]) -> Operand {
        let parts = prefix
            .iter()
            .map(|v| v.to_string())
            .chain([self.table.clone(), self.name.clone()]);
        Operand::new(Qualifier::new(parts))
    }

    pub(crate) fn error(&self, message: &str) -> Error {
        Error::msg(format!(
            "table {} column:{} {}: {message}",
            self.table,
            self.index + 1,
            self.name
        ))
    }

    /// Walks the chain for reading, `None` when an optional nested record is absent.
    pub fn field<'a>(&self, record: &'a dyn Reflect) -> Option<FieldRef<'a>> {
        if self.is_many() {
            panic!("column {} is a many relation", self.name);
        }
        let mut current = record;
        let (last, path) = self.fields.split_last()?;
        for field in path {
            match current.field(field.index) {
                FieldRef::Record(Some(next)) => current = next,
                FieldRef::Record(None) => return None,
                other => panic!("field {} is not a record: {other:?}", field.name),
            }
        }
        Some(current.field(last.index))
    }

    /// Walks the chain for writing, allocating absent optional nested records.
    pub fn field_mut<'a>(&self, record: &'a mut dyn Reflect) -> FieldMut<'a> {
        if self.is_many() {
            panic!("column {} is a many relation", self.name);
        }
        let mut current = record;
        let (last, path) = self
            .fields
            .split_last()
            .unwrap_or_else(|| panic!("column {} has no fields", self.name));
        for field in path {
            let parent = current;
            current = match parent.field_mut(field.index) {
                FieldMut::Record(next) => next,
                _ => panic!("field {} is not a record", field.name),
            };
        }
        current.field_mut(last.index)
    }

    /// Reads the column value: zero values of collapsible columns become NULL, encoded
    /// fields are serialized.
    pub fn get(&self, record: &dyn Reflect) -> Result<Value> {
        self.get_by(true, record)
    }

    pub fn get_by(&self, collapse: bool, record: &dyn Reflect) -> Result<Value> {
        let Some(field) = self.field(record) else {
            if self.is_nullable() || (collapse && self.is_collapse()) {
                return Ok(self.prototype().as_null());
            }
            return Err(self.error_get());
        };
        self.convert(collapse, field)
    }

    fn convert(&self, collapse: bool, field: FieldRef) -> Result<Value> {
        match field {
            FieldRef::Scalar(scalar) => {
                let value = scalar.get();
                if collapse && self.is_collapse() && value.is_zero() {
                    return Ok(value.as_null());
                }
                Ok(value)
            }
            FieldRef::Encoded(encoded) => {
                let Some(encoding) = self.encoding() else {
                    return Err(self.error_get());
                };
                if collapse && self.is_collapse() && encoded.is_zero() {
                    return Ok(encoding.prototype());
                }
                let payload = encoded
                    .encode(encoding)
                    .map_err(|e| e.context(self.error_get()))?;
                if collapse && self.is_collapse() && payload.is_empty() {
                    return Ok(encoding.prototype());
                }
                encoding.wrap(payload)
            }
            _ => Err(self.error_get()),
        }
    }

    /// Writes a fetched value into the record field.
    pub fn scan(&self, record: &mut dyn Reflect, value: Value) -> Result<()> {
        if value.is_null() {
            if self.is_one()
                && let Some(one) = self.one()
                && one.is_nullable()
            {
                let position = self
                    .fields
                    .iter()
                    .position(|v| v.is_one())
                    .unwrap_or_default();
                return self.clear_at(record, position);
            }
            if self.is_nullable() && self.field(record).is_none() {
                return Ok(());
            }
        }
        match self.field_mut(record) {
            FieldMut::Scalar(scalar) => {
                let value = if value.is_null() && self.is_collapse() {
                    self.prototype().zeroed()
                } else {
                    value
                };
                scalar
                    .set(value)
                    .map_err(|e| e.context(self.error_set()))
            }
            FieldMut::Encoded(encoded) => {
                let Some(encoding) = self.encoding() else {
                    return Err(self.error_set());
                };
                let payload = value.as_bytes()?.unwrap_or_default();
                if payload.is_empty() && (self.is_collapse() || value.is_null()) {
                    encoded.reset();
                    return Ok(());
                }
                encoded
                    .decode(encoding, payload)
                    .map_err(|e| e.context(self.error_set()))
            }
            _ => Err(self.error_set()),
        }
    }

    /// Clears the field at `position` in the chain.
    fn clear_at(&self, record: &mut dyn Reflect, position: usize) -> Result<()> {
        let mut current = record;
        for field in &self.fields[..position] {
            let parent = current;
            current = match parent.field_mut(field.index) {
                FieldMut::Record(next) => next,
                _ => return Err(self.error_set()),
            };
        }
        current.clear_field(self.fields[position].index);
        Ok(())
    }

    /// Normalizes a fetched value when there is no record to write into.
    pub fn scan_new(&self, value: Value) -> Result<Value> {
        if value.is_null() {
            if self.is_collapse() {
                return Ok(self.prototype().zeroed());
            }
            return Ok(self.prototype().as_null());
        }
        match self.last().kind {
            FieldKind::Scalar { normalize, .. } => {
                normalize(value).map_err(|e| e.context(self.error_set()))
            }
            FieldKind::Encoded { .. } => {
                if self.is_collapse() && value.as_bytes()?.is_some_and(<[u8]>::is_empty) {
                    return Ok(self.prototype().as_null());
                }
                Ok(value)
            }
            _ => Err(self.error_set()),
        }
    }

    /// Integer value of the field, `None` when unreachable or not integral.
    pub fn get_integer(&self, record: &dyn Reflect) -> Option<i64> {
        match self.field(record)? {
            FieldRef::Scalar(scalar) => scalar.get().as_i64(),
            _ => None,
        }
    }

    pub fn set_integer(&self, record: &mut dyn Reflect, n: i64) -> Result<()> {
        let value = self.prototype().with_integer(n)?;
        match self.field_mut(record) {
            FieldMut::Scalar(scalar) => scalar.set(value),
            _ => Err(self.error_set()),
        }
    }

    /// Value of a point in time for this column: a timestamp limited to `precision`
    /// fractional digits, unix seconds for 32 bits integers or unix milliseconds for 64
    /// bits integers.
    pub fn convert_time(&self, precision: u8, instant: OffsetDateTime) -> Result<Value> {
        let prototype = self.prototype();
        let instant = if matches!(
            prototype,
            Value::Timestamp(..) | Value::TimestampWithTimezone(..)
        ) {
            limit_time_precision(precision, instant)
        } else {
            instant
        };
        prototype
            .with_time(instant)
            .map_err(|e| e.context(self.error_set()))
    }

    pub fn set_time(
        &self,
        record: &mut dyn Reflect,
        precision: u8,
        instant: OffsetDateTime,
    ) -> Result<()> {
        let value = self.convert_time(precision, instant)?;
        match self.field_mut(record) {
            FieldMut::Scalar(scalar) => scalar.set(value),
            _ => Err(self.error_set()),
        }
    }

    /// Argument for a key compared against this column, collapsed like stored values.
    pub fn convert_key(&self, key: Value) -> Result<Value> {
        if !key.same_type(&self.prototype()) {
            return Err(self.error(&format!("key type mismatch: {}", key.type_name())));
        }
        if self.is_collapse() && key.is_zero() {
            return Ok(key.as_null());
        }
        Ok(key)
    }

    pub(crate) fn error_get(&self) -> Error {
        self.error("can not get")
    }

    pub(crate) fn error_set(&self) -> Error {
        self.error("can not set")
    }

    pub(crate) fn error_zero(&self) -> Error {
        self.error("zero")
    }

    pub(crate) fn error_duplicate(&self) -> Error {
        self.error("duplicate")
    }
}

/// Names of the columns, in order.
pub fn column_names(columns: &[&Column]) -> Vec<String> {
    columns.iter().map(|v| v.name.clone()).collect()
}
