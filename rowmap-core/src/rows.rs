use crate::{
    AsValue, Column, Error, Record, Reflect, Registry, Result, Row, RowLabeled, RowNames, Table,
    Value,
};
use std::{
    collections::{BTreeMap, HashMap, HashSet, btree_map::Entry},
    sync::Arc,
};

/// Fetched rows, decoded on demand into records, maps or raw values.
///
/// Labels are matched against record columns case insensitively, after the optional
/// rename function of the [`Config`](crate::Config).
#[derive(Debug)]
pub struct Rows {
    labels: RowNames,
    rows: Vec<Row>,
    registry: Arc<Registry>,
}

impl Rows {
    pub(crate) fn new(
        rows: Vec<RowLabeled>,
        rename: Option<fn(&str) -> String>,
        registry: Arc<Registry>,
    ) -> Self {
        let labels: RowNames = match (rows.first(), rename) {
            (Some(row), Some(rename)) => row.labels.iter().map(|v| rename(v)).collect(),
            (Some(row), None) => row.labels.clone(),
            (None, _) => Arc::new([]),
        };
        Self {
            labels,
            rows: rows.into_iter().map(Row::from).collect(),
            registry,
        }
    }

    /// Column labels, empty when there are no rows.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn columns<'t>(&self, table: &'t Table) -> Result<Vec<&'t Column>> {
        let mut seen = HashSet::with_capacity(self.labels.len());
        self.labels
            .iter()
            .map(|label| {
                let Some(column) = table.find(label) else {
                    return Err(Error::msg(format!("column not found: {label}")));
                };
                if !seen.insert(column.index) {
                    return Err(Error::msg(format!("duplicate column: {label}")));
                }
                Ok(column)
            })
            .collect()
    }

    fn scan_into(columns: &[&Column], row: Row, record: &mut dyn Reflect) -> Result<()> {
        for (column, value) in columns.iter().zip(row.into_vec()) {
            column.scan(record, value)?;
        }
        Ok(())
    }

    /// First row as a new record, `None` when there are no rows.
    pub fn one<T: Record>(self) -> Result<Option<T>> {
        let mut record = T::default();
        Ok(self.one_into(&mut record)?.then_some(record))
    }

    /// Scans the first row into an existing record, `false` when there are no rows.
    pub fn one_into<T: Record>(self, record: &mut T) -> Result<bool> {
        if self.rows.is_empty() {
            return Ok(false);
        }
        let table = self.registry.table::<T>()?;
        let columns = self.columns(&table)?;
        for row in self.rows.into_iter().take(1) {
            Self::scan_into(&columns, row, record)?;
        }
        Ok(true)
    }

    pub fn all<T: Record>(self) -> Result<Vec<T>> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        let table = self.registry.table::<T>()?;
        let columns = self.columns(&table)?;
        self.rows
            .into_iter()
            .map(|row| {
                let mut record = T::default();
                Self::scan_into(&columns, row, &mut record)?;
                Ok(record)
            })
            .collect()
    }

    /// Records keyed by primary key. The primary key column must be selected, a key
    /// found twice is an error.
    pub fn all_by_key<K: AsValue + Ord, T: Record>(self) -> Result<BTreeMap<K, T>> {
        let mut result = BTreeMap::new();
        if self.rows.is_empty() {
            return Ok(result);
        }
        let table = self.registry.table::<T>()?;
        let key = table.expect_primary_key();
        let columns = self.columns(&table)?;
        if !columns.iter().any(|c| c.index == key.index) {
            return Err(Error::msg("primary key column not exist"));
        }
        for row in self.rows {
            let mut record = T::default();
            Self::scan_into(&columns, row, &mut record)?;
            match result.entry(K::try_from_value(key.get_by(false, &record)?)?) {
                Entry::Vacant(entry) => {
                    entry.insert(record);
                }
                Entry::Occupied(..) => return Err(key.error_duplicate()),
            }
        }
        Ok(result)
    }

    fn check_labels(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.labels.len());
        for label in self.labels.iter() {
            if !seen.insert(label) {
                return Err(Error::msg(format!("duplicate column: {label}")));
            }
        }
        Ok(())
    }

    /// Rows as label to value maps, values as returned by the driver.
    pub fn maps(self) -> Result<Vec<HashMap<String, Value>>> {
        self.check_labels()?;
        let labels = self.labels;
        Ok(self
            .rows
            .into_iter()
            .map(|row| labels.iter().cloned().zip(row.into_vec()).collect())
            .collect())
    }

    /// Rows as label to value maps, every value normalized to the kind of the matching
    /// column of `T`.
    pub fn maps_of<T: Record>(self) -> Result<Vec<HashMap<String, Value>>> {
        if self.rows.is_empty() {
            return Ok(Vec::new());
        }
        let table = self.registry.table::<T>()?;
        let columns = self.columns(&table)?;
        let labels = self.labels.clone();
        self.rows
            .into_iter()
            .map(|row| {
                labels
                    .iter()
                    .zip(&columns)
                    .zip(row.into_vec())
                    .map(|((label, column), value)| {
                        Ok::<_, Error>((label.clone(), column.scan_new(value)?))
                    })
                    .collect()
            })
            .collect()
    }

    /// Raw values, one slice per row.
    pub fn values(self) -> Vec<Row> {
        self.rows
    }
}
