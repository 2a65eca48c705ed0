use crate::{AsValue, Column, Context, Reflect, Result, Table, Value};
use std::collections::{BTreeMap, HashMap};

impl Table {
    fn converted(&self, columns: &[&str]) -> Result<Vec<&Column>> {
        let columns = self.filter(columns);
        if columns.is_empty() {
            return Err(self.error_no_columns());
        }
        Ok(columns)
    }

    fn check_type(&self, record: &dyn Reflect) -> Result<()> {
        let record_type = record.record_type();
        if (record_type.type_id)() != (self.record_type.type_id)() {
            return Err(self.error(&format!("record type mismatch: {}", record_type.name)));
        }
        Ok(())
    }

    fn values(
        &self,
        columns: &[&Column],
        collapse: bool,
        record: &dyn Reflect,
    ) -> Result<Vec<Value>> {
        self.check_type(record)?;
        columns.iter().map(|c| c.get_by(collapse, record)).collect()
    }

    fn named(
        &self,
        columns: &[&Column],
        collapse: bool,
        record: &dyn Reflect,
    ) -> Result<HashMap<String, Value>> {
        self.check_type(record)?;
        columns
            .iter()
            .map(|c| Ok((c.name.clone(), c.get_by(collapse, record)?)))
            .collect()
    }

    /// Values of the selected columns of a record, in column order.
    ///
    /// Columns are selected like [`Table::filter`]. With `collapse` the zero values of
    /// collapsible columns become NULL, as they are written to the database. Encoded
    /// fields are serialized.
    pub fn convert(
        &self,
        record: &dyn Reflect,
        collapse: bool,
        columns: &[&str],
    ) -> Result<Vec<Value>> {
        let columns = self.converted(columns)?;
        self.values(&columns, collapse, record)
    }

    /// Like [`Table::convert`], keyed by column name.
    pub fn convert_map(
        &self,
        record: &dyn Reflect,
        collapse: bool,
        columns: &[&str],
    ) -> Result<HashMap<String, Value>> {
        let columns = self.converted(columns)?;
        self.named(&columns, collapse, record)
    }

    /// One value list per record, in iteration order.
    pub fn convert_all<'a, R: Reflect>(
        &self,
        records: impl IntoIterator<Item = &'a R>,
        collapse: bool,
        columns: &[&str],
    ) -> Result<Vec<Vec<Value>>> {
        let columns = self.converted(columns)?;
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                self.values(&columns, collapse, record)
                    .with_context(|| format!("record {i}"))
            })
            .collect()
    }

    /// One name to value map per record, in iteration order.
    pub fn convert_all_maps<'a, R: Reflect>(
        &self,
        records: impl IntoIterator<Item = &'a R>,
        collapse: bool,
        columns: &[&str],
    ) -> Result<Vec<HashMap<String, Value>>> {
        let columns = self.converted(columns)?;
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                self.named(&columns, collapse, record)
                    .with_context(|| format!("record {i}"))
            })
            .collect()
    }

    /// Value lists keyed by the primary key of each record. Two records with the same
    /// key are an error.
    pub fn convert_by_key<'a, K: AsValue + Ord, R: Reflect>(
        &self,
        records: impl IntoIterator<Item = &'a R>,
        collapse: bool,
        columns: &[&str],
    ) -> Result<BTreeMap<K, Vec<Value>>> {
        let columns = self.converted(columns)?;
        self.keyed(records, |record| self.values(&columns, collapse, record))
    }

    /// Name to value maps keyed by the primary key of each record.
    pub fn convert_maps_by_key<'a, K: AsValue + Ord, R: Reflect>(
        &self,
        records: impl IntoIterator<Item = &'a R>,
        collapse: bool,
        columns: &[&str],
    ) -> Result<BTreeMap<K, HashMap<String, Value>>> {
        let columns = self.converted(columns)?;
        self.keyed(records, |record| self.named(&columns, collapse, record))
    }

    fn keyed<'a, K: AsValue + Ord, R: Reflect, V>(
        &self,
        records: impl IntoIterator<Item = &'a R>,
        mut convert: impl FnMut(&dyn Reflect) -> Result<V>,
    ) -> Result<BTreeMap<K, V>> {
        let key = self.primary_key().ok_or_else(|| self.error_no_primary_key())?;
        let mut result = BTreeMap::new();
        for (i, record) in records.into_iter().enumerate() {
            let entry = convert(record)
                .and_then(|values| {
                    let value = key.get_by(false, record)?;
                    if !value.same_type(&K::as_empty_value()) {
                        let message = format!("key type mismatch: {}", value.type_name());
                        return Err(key.error(&message));
                    }
                    Ok((K::try_from_value(value)?, values))
                })
                .with_context(|| format!("record {i}"))?;
            if result.contains_key(&entry.0) {
                return Err(key.error_duplicate().context(format!("record {i}")));
            }
            result.insert(entry.0, entry.1);
        }
        Ok(result)
    }
}
