use crate::{SqliteConnection, SqliteDriver, SqlitePrepared};
use rowmap_core::{Driver, Executor, Result, RowLabeled, RowsAffected, Transaction, Value};

/// Transaction on a borrowed connection. Rolled back when dropped unfinished.
pub struct SqliteTransaction<'c> {
    connection: &'c mut SqliteConnection,
    finished: bool,
}

impl<'c> SqliteTransaction<'c> {
    pub fn new(connection: &'c mut SqliteConnection) -> Result<Self> {
        let mut sql = String::new();
        connection
            .driver()
            .dialect()
            .write_transaction_begin(&mut sql);
        connection.execute(&sql, &[])?;
        Ok(Self {
            connection,
            finished: false,
        })
    }

    fn finish(mut self, commit: bool) -> Result<()> {
        self.finished = true;
        let mut sql = String::new();
        let dialect = self.connection.driver().dialect();
        if commit {
            dialect.write_transaction_commit(&mut sql);
        } else {
            dialect.write_transaction_rollback(&mut sql);
        }
        self.connection.execute(&sql, &[]).map(|_| ())
    }
}

impl Executor for SqliteTransaction<'_> {
    type Driver = SqliteDriver;
    type Prepared<'s>
        = SqlitePrepared<'s>
    where
        Self: 's;

    fn driver(&self) -> &SqliteDriver {
        self.connection.driver()
    }

    fn execute(&self, sql: &str, args: &[Value]) -> Result<RowsAffected> {
        self.connection.execute(sql, args)
    }

    fn fetch(&self, sql: &str, args: &[Value]) -> Result<Vec<RowLabeled>> {
        self.connection.fetch(sql, args)
    }

    fn prepare(&self, sql: &str) -> Result<SqlitePrepared<'_>> {
        self.connection.prepare(sql)
    }
}

impl Transaction for SqliteTransaction<'_> {
    fn commit(self) -> Result<()> {
        self.finish(true)
    }

    fn rollback(self) -> Result<()> {
        self.finish(false)
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        log::warn!("Transaction dropped without commit, rolling back");
        let mut sql = String::new();
        self.connection
            .driver()
            .dialect()
            .write_transaction_rollback(&mut sql);
        if let Err(e) = self.connection.execute(&sql, &[]) {
            log::warn!("{e:#}");
        }
    }
}
