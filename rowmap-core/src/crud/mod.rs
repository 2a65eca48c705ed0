mod by_key;
mod create;
mod delete;
mod load;
mod read;
mod update;
mod upsert;

pub use upsert::*;

use crate::{Context, Error, Prepared, Record, Result, Statement, Value};
use std::{
    collections::{BTreeMap, BTreeSet, HashMap, HashSet},
    fmt::Debug,
    hash::Hash,
};

/// Shape of the records given to a bulk operation, which decides the shape of its result.
///
/// | input            | matched (read, update, delete) | inserted (create, load) |
/// |------------------|--------------------------------|-------------------------|
/// | record `T`       | `bool`                         | `bool`                  |
/// | `[T]`, `Vec<T>`  | `BTreeSet<usize>` of positions | `usize` count           |
/// | `BTreeMap<K, T>` | `BTreeSet<K>`                  | `BTreeSet<K>`           |
/// | `HashMap<K, T>`  | `HashSet<K>`                   | `HashSet<K>`            |
///
/// Records are visited in order and the first error stops the operation.
pub trait Input {
    type Record: Record;
    type Matched;
    type Inserted;

    fn matched(
        &mut self,
        f: impl FnMut(&mut Self::Record) -> Result<bool>,
    ) -> Result<Self::Matched>;

    fn inserted(
        &mut self,
        f: impl FnMut(&mut Self::Record) -> Result<()>,
    ) -> Result<Self::Inserted>;
}

impl<T: Record> Input for T {
    type Record = T;
    type Matched = bool;
    type Inserted = bool;

    fn matched(&mut self, mut f: impl FnMut(&mut T) -> Result<bool>) -> Result<bool> {
        f(self)
    }

    fn inserted(&mut self, mut f: impl FnMut(&mut T) -> Result<()>) -> Result<bool> {
        f(self).map(|_| true)
    }
}

impl<T: Record> Input for [T] {
    type Record = T;
    type Matched = BTreeSet<usize>;
    type Inserted = usize;

    fn matched(&mut self, mut f: impl FnMut(&mut T) -> Result<bool>) -> Result<BTreeSet<usize>> {
        let mut result = BTreeSet::new();
        for (i, record) in self.iter_mut().enumerate() {
            if f(record).with_context(|| format!("record {i}"))? {
                result.insert(i);
            }
        }
        Ok(result)
    }

    fn inserted(&mut self, mut f: impl FnMut(&mut T) -> Result<()>) -> Result<usize> {
        for (i, record) in self.iter_mut().enumerate() {
            f(record).with_context(|| format!("record {i}"))?;
        }
        Ok(self.len())
    }
}

impl<T: Record> Input for Vec<T> {
    type Record = T;
    type Matched = BTreeSet<usize>;
    type Inserted = usize;

    fn matched(&mut self, f: impl FnMut(&mut T) -> Result<bool>) -> Result<BTreeSet<usize>> {
        self.as_mut_slice().matched(f)
    }

    fn inserted(&mut self, f: impl FnMut(&mut T) -> Result<()>) -> Result<usize> {
        self.as_mut_slice().inserted(f)
    }
}

impl<K: Ord + Clone + Debug, T: Record> Input for BTreeMap<K, T> {
    type Record = T;
    type Matched = BTreeSet<K>;
    type Inserted = BTreeSet<K>;

    fn matched(&mut self, mut f: impl FnMut(&mut T) -> Result<bool>) -> Result<BTreeSet<K>> {
        let mut result = BTreeSet::new();
        for (key, record) in self.iter_mut() {
            if f(record).with_context(|| format!("record {key:?}"))? {
                result.insert(key.clone());
            }
        }
        Ok(result)
    }

    fn inserted(&mut self, mut f: impl FnMut(&mut T) -> Result<()>) -> Result<BTreeSet<K>> {
        self.matched(|record| f(record).map(|_| true))
    }
}

impl<K: Eq + Hash + Clone + Debug, T: Record> Input for HashMap<K, T> {
    type Record = T;
    type Matched = HashSet<K>;
    type Inserted = HashSet<K>;

    fn matched(&mut self, mut f: impl FnMut(&mut T) -> Result<bool>) -> Result<HashSet<K>> {
        let mut result = HashSet::new();
        for (key, record) in self.iter_mut() {
            if f(record).with_context(|| format!("record {key:?}"))? {
                result.insert(key.clone());
            }
        }
        Ok(result)
    }

    fn inserted(&mut self, mut f: impl FnMut(&mut T) -> Result<()>) -> Result<HashSet<K>> {
        self.matched(|record| f(record).map(|_| true))
    }
}

/// Argument rendered while preparing: its placeholder position, the real value is bound
/// on execution.
fn slot(position: usize) -> Value {
    Value::Int64(Some(position as i64))
}

/// Statement of `slot`, prepared on first use.
fn prepared<P: Prepared>(
    slot: &mut Option<Statement<P>>,
    prepare: impl FnOnce() -> Result<Statement<P>>,
) -> Result<&mut Statement<P>> {
    if slot.is_none() {
        *slot = Some(prepare()?);
    }
    slot.as_mut()
        .ok_or_else(|| Error::msg("statement not prepared"))
}

/// The only value of a single column `RETURNING` row.
fn returned(row: Option<crate::RowLabeled>) -> Option<Value> {
    row.and_then(|v| v.values.into_vec().into_iter().next())
}
