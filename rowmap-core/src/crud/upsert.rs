use crate::{Db, Executor, Record, Result, Value};

/// How [`Db::upsert`] chooses between inserting and updating.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Upsert {
    /// Reads the primary key: update when the row exists, insert otherwise.
    Probe,
    Create,
    Update,
    /// Leaves the record alone.
    Skip,
}

impl Upsert {
    /// Decision carried by an integer primary key: 0 creates, a positive key updates and a
    /// negative key is skipped. `None` for non integer or NULL keys.
    ///
    /// ```rust
    /// use rowmap_core::{Upsert, Value};
    /// assert_eq!(Upsert::from_key(&Value::Int64(Some(0))), Some(Upsert::Create));
    /// assert_eq!(Upsert::from_key(&Value::Int32(Some(7))), Some(Upsert::Update));
    /// assert_eq!(Upsert::from_key(&Value::Int64(Some(-1))), Some(Upsert::Skip));
    /// assert_eq!(Upsert::from_key(&Value::Int64(None)), None);
    /// ```
    pub fn from_key(key: &Value) -> Option<Upsert> {
        Some(match key.as_i64()? {
            0 => Upsert::Create,
            n if n > 0 => Upsert::Update,
            _ => Upsert::Skip,
        })
    }
}

impl<E: Executor> Db<E> {
    /// Creates or updates a single record, `columns` selects the updated fields.
    ///
    /// A version column must hold a negative value: the write is not pinned to a version.
    /// Returns whether a row was written.
    pub fn upsert<T: Record>(&self, record: &mut T, mode: Upsert, columns: &[&str]) -> Result<bool> {
        let table = self.table::<T>()?;
        let key = table.expect_primary_key();
        if let Some(version) = table.version()
            && !version.get_integer(&*record).is_some_and(|v| v < 0)
        {
            return Err(version.error_get());
        }
        let exists = match mode {
            Upsert::Skip => return Ok(false),
            Upsert::Create => false,
            Upsert::Update => true,
            Upsert::Probe => self.read(record, &[key.name.as_str()])?,
        };
        if exists {
            self.update(record, columns)
        } else {
            self.create(record)
        }
    }
}
