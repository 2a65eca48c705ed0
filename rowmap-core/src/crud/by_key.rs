use crate::{
    AsValue, Clause, Column, Db, Executor, Pairs, Record, Reflect, Result, Rows, Table, Value,
    Version, column_names, delete, expr, from, q, select, update, where_,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// `WHERE key = ?` for one key, `WHERE key IN (...)` for several, followed by the version
/// pin when given. `None` without keys.
fn key_clause(
    key: &Column,
    keys: Vec<Value>,
    version: Option<(&Column, Value)>,
) -> Option<Clause> {
    let condition = match keys.len() {
        0 => return None,
        1 => key.operand().eq(keys.into_iter().next()?),
        _ => key.operand().in_values(keys),
    };
    let mut conditions = vec![condition];
    if let Some((column, value)) = version {
        conditions.push(column.operand().eq(value));
    }
    Some(where_(conditions))
}

fn convert_keys<K: AsValue>(
    key: &Column,
    keys: impl IntoIterator<Item = K>,
) -> Result<Vec<Value>> {
    keys.into_iter()
        .map(|k| key.convert_key(k.as_value()))
        .collect()
}

/// Version column and value pinning a template row.
fn pin<'t>(table: &'t Table, row: &dyn Reflect) -> Result<Option<(&'t Column, Value)>> {
    Ok(match (table.get_version(row)?, table.version()) {
        (Version::Pinned(_, value), Some(column)) => Some((column, value)),
        _ => None,
    })
}

impl<E: Executor> Db<E> {
    fn select_by<T: Record, K: AsValue>(
        &self,
        keys: impl IntoIterator<Item = K>,
        columns: &[&str],
    ) -> Result<Option<Rows>> {
        let table = self.table::<T>()?;
        let key = table.expect_primary_key();
        let selected = table.filter(columns);
        if selected.is_empty() {
            return Err(table.error_no_columns());
        }
        let Some(clause) = key_clause(key, convert_keys(key, keys)?, None) else {
            return Ok(None);
        };
        self.query(&q([
            expr(select(column_names(&selected))),
            expr(from([table.name.as_str()])),
            expr(clause),
        ]))
        .map(Some)
    }

    /// Record with the given primary key, `None` when there is none.
    pub fn read_by_key<T: Record, K: AsValue>(
        &self,
        key: K,
        columns: &[&str],
    ) -> Result<Option<T>> {
        match self.select_by::<T, K>([key], columns)? {
            Some(rows) => rows.one(),
            None => Ok(None),
        }
    }

    /// Records with the given primary keys, in database order.
    pub fn read_by<T: Record, K: AsValue>(
        &self,
        keys: impl IntoIterator<Item = K>,
        columns: &[&str],
    ) -> Result<Vec<T>> {
        match self.select_by::<T, K>(keys, columns)? {
            Some(rows) => rows.all(),
            None => Ok(Vec::new()),
        }
    }

    /// Records with the given primary keys, keyed by primary key. The primary key must be
    /// among the selected columns.
    pub fn read_by_map<K: AsValue + Ord, T: Record>(
        &self,
        keys: impl IntoIterator<Item = K>,
        columns: &[&str],
    ) -> Result<BTreeMap<K, T>> {
        match self.select_by::<T, K>(keys, columns)? {
            Some(rows) => rows.all_by_key(),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Writes the fields of `row` into every row with one of the given primary keys and
    /// returns the number of rows affected.
    ///
    /// A positive version in `row` restricts the update to that version. On success the
    /// version and auto now fields of `row` are refreshed.
    pub fn update_by<T: Record, K: AsValue>(
        &self,
        keys: impl IntoIterator<Item = K>,
        row: &mut T,
        columns: &[&str],
    ) -> Result<u64> {
        let table = self.table::<T>()?;
        let key = table.expect_primary_key();
        let written = table.update_filter(columns);
        if written.is_empty() {
            return Err(table.error_no_columns());
        }
        let version = table.get_version(&*row)?;
        let Some(clause) = key_clause(key, convert_keys(key, keys)?, pin(&table, &*row)?) else {
            return Ok(0);
        };
        let now = OffsetDateTime::now_utc();
        let mut pairs = Pairs::set();
        for column in &written {
            if column.is_version() {
                pairs.push(column.name.clone(), column.operand().inc());
            } else if column.is_auto_now() {
                let value = column.convert_time(self.time_precision(), now)?;
                pairs.push(column.name.clone(), value);
            } else {
                pairs.push(column.name.clone(), column.get(&*row)?);
            }
        }
        let result = self.exec(&q([
            expr(update(table.name.clone())),
            expr(pairs),
            expr(clause),
        ]))?;
        if result.rows_affected > 0 {
            if let (Version::Pinned(n, _), Some(column)) = (&version, table.version()) {
                column.set_integer(row, n + 1)?;
            }
            self.write_back_updated(&table, row, now)?;
        }
        Ok(result.rows_affected)
    }

    /// Deletes every row with one of the given primary keys, restricted to the version of
    /// `row` when positive, and returns the number of rows affected.
    pub fn delete_by<T: Record, K: AsValue>(
        &self,
        keys: impl IntoIterator<Item = K>,
        row: &T,
    ) -> Result<u64> {
        let table = self.table::<T>()?;
        let key = table.expect_primary_key();
        let Some(clause) = key_clause(key, convert_keys(key, keys)?, pin(&table, row)?) else {
            return Ok(0);
        };
        let result = self.exec(&q([expr(delete(table.name.clone())), expr(clause)]))?;
        Ok(result.rows_affected)
    }
}
