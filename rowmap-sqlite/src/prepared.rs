use crate::{
    SqliteConnection,
    connection::{bind_all, fetch_rows},
    driver_error,
};
use rowmap_core::{Prepared, Result, RowLabeled, RowsAffected, Value, truncate_long};
use rusqlite::params_from_iter;
use std::fmt::{self, Debug};

pub struct SqlitePrepared<'c> {
    connection: &'c SqliteConnection,
    sql: String,
    statement: rusqlite::Statement<'c>,
}

impl<'c> SqlitePrepared<'c> {
    pub(crate) fn new(
        connection: &'c SqliteConnection,
        sql: &str,
        statement: rusqlite::Statement<'c>,
    ) -> Self {
        Self {
            connection,
            sql: sql.to_string(),
            statement,
        }
    }
}

impl Prepared for SqlitePrepared<'_> {
    fn execute(&mut self, args: &[Value]) -> Result<RowsAffected> {
        let changes = self
            .statement
            .execute(params_from_iter(bind_all(args)?))
            .map_err(|e| {
                driver_error(e, format!("While executing `{}`", truncate_long!(self.sql)))
            })?;
        Ok(self.connection.rows_affected(changes))
    }

    fn fetch(&mut self, args: &[Value]) -> Result<Vec<RowLabeled>> {
        fetch_rows(&mut self.statement, &self.sql, args)
    }

    fn close(self) -> Result<()> {
        let sql = self.sql;
        self.statement
            .finalize()
            .map_err(|e| driver_error(e, format!("While closing `{}`", truncate_long!(sql))))
    }
}

impl Debug for SqlitePrepared<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlitePrepared")
            .field("sql", &self.sql)
            .finish()
    }
}
