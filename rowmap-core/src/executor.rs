use crate::{Dialect, Error, Result, Value, dialect_by_name, truncate_long};
use std::{fmt::Debug, sync::Arc};

/// Metadata about modify operations (INSERT/UPDATE/DELETE).
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowsAffected {
    /// Total number of rows impacted.
    pub rows_affected: u64,
    /// Backend-specific last inserted identifier when available.
    pub last_affected_id: Option<i64>,
}

impl Extend<RowsAffected> for RowsAffected {
    fn extend<T: IntoIterator<Item = RowsAffected>>(&mut self, iter: T) {
        for elem in iter {
            self.rows_affected += elem.rows_affected;
            if elem.last_affected_id.is_some() {
                self.last_affected_id = elem.last_affected_id;
            }
        }
    }
}

/// Shared reference-counted column name list.
pub type RowNames = Arc<[String]>;
/// Owned row value slice matching `RowNames` length.
pub type Row = Box<[Value]>;

/// A result row with its corresponding column labels.
#[derive(Debug, Clone)]
pub struct RowLabeled {
    /// Column names.
    pub labels: RowNames,
    /// Data values (aligned by index with `labels`).
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }
    pub fn names(&self) -> &[String] {
        &self.labels
    }
    pub fn values(&self) -> &[Value] {
        &self.values
    }
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v == name)
            .map(|i| &self.values[i])
    }
}

impl From<RowLabeled> for Row {
    fn from(value: RowLabeled) -> Self {
        value.values
    }
}

/// Database backend identity.
pub trait Driver: Debug {
    /// Name used in URL schemes, also selects the default dialect.
    const NAME: &'static str;

    fn dialect(&self) -> Arc<dyn Dialect> {
        dialect_by_name(Self::NAME)
    }
}

/// A statement parsed once by the backend and run with different arguments.
///
/// Arguments are bound in placeholder order.
pub trait Prepared {
    fn execute(&mut self, args: &[Value]) -> Result<RowsAffected>;

    fn fetch(&mut self, args: &[Value]) -> Result<Vec<RowLabeled>>;

    /// First row of the result, `None` when there is none.
    fn fetch_one(&mut self, args: &[Value]) -> Result<Option<RowLabeled>> {
        Ok(self.fetch(args)?.into_iter().next())
    }

    /// Releases the statement.
    fn close(self) -> Result<()>
    where
        Self: Sized;
}

/// Runs SQL text against a database: a connection or a transaction.
pub trait Executor {
    type Driver: Driver;
    type Prepared<'s>: Prepared
    where
        Self: 's;

    fn driver(&self) -> &Self::Driver;

    /// Execute the statement and return the number of rows affected.
    fn execute(&self, sql: &str, args: &[Value]) -> Result<RowsAffected>;

    /// Execute the query and return the rows.
    fn fetch(&self, sql: &str, args: &[Value]) -> Result<Vec<RowLabeled>>;

    fn fetch_one(&self, sql: &str, args: &[Value]) -> Result<Option<RowLabeled>> {
        Ok(self.fetch(sql, args)?.into_iter().next())
    }

    fn prepare(&self, sql: &str) -> Result<Self::Prepared<'_>>;
}

/// Executor owning a database session.
pub trait Connection: Executor + Sized {
    type Transaction<'c>: Transaction
    where
        Self: 'c;

    /// Opens a connection to the given URL.
    fn connect(url: &str) -> Result<Self>;

    fn begin(&mut self) -> Result<Self::Transaction<'_>>;
}

pub trait Transaction: Executor {
    fn commit(self) -> Result<()>;
    fn rollback(self) -> Result<()>;
}

/// Prepared statement released when dropped, close failures are logged.
pub struct Statement<P: Prepared> {
    sql: String,
    prepared: Option<P>,
}

impl<P: Prepared> Statement<P> {
    pub fn new(sql: String, prepared: P) -> Self {
        Self {
            sql,
            prepared: Some(prepared),
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    fn inner(&mut self) -> Result<&mut P> {
        self.prepared
            .as_mut()
            .ok_or_else(|| Error::msg(format!("closed statement: {}", truncate_long!(self.sql))))
    }

    pub fn execute(&mut self, args: &[Value]) -> Result<RowsAffected> {
        self.inner()?.execute(args)
    }

    pub fn fetch(&mut self, args: &[Value]) -> Result<Vec<RowLabeled>> {
        self.inner()?.fetch(args)
    }

    pub fn fetch_one(&mut self, args: &[Value]) -> Result<Option<RowLabeled>> {
        self.inner()?.fetch_one(args)
    }

    /// Releases the statement reporting the failure instead of logging it.
    pub fn close(mut self) -> Result<()> {
        match self.prepared.take() {
            Some(prepared) => prepared.close(),
            None => Ok(()),
        }
    }
}

impl<P: Prepared> Drop for Statement<P> {
    fn drop(&mut self) {
        if let Some(prepared) = self.prepared.take()
            && let Err(e) = prepared.close()
        {
            log::warn!("{e:#}");
        }
    }
}

impl<P: Prepared> Debug for Statement<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Statement")
            .field("sql", &self.sql)
            .field("closed", &self.prepared.is_none())
            .finish()
    }
}
