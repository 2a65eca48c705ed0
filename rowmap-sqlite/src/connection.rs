use crate::{
    SqliteDriver, SqlitePrepared, SqliteTransaction, driver_error,
    extract::{bind_value, extract_value},
};
use rowmap_core::{
    Connection, Driver, Error, Executor, Result, RowLabeled, RowNames, RowsAffected, Value,
    truncate_long,
};
use rusqlite::{OpenFlags, params_from_iter, types::Value as SqliteValue};

/// Connection to a SQLite database, opened from `sqlite://path[?mode=...]` or
/// `sqlite://:memory:`.
pub struct SqliteConnection {
    pub(crate) connection: rusqlite::Connection,
}

pub(crate) fn bind_all(args: &[Value]) -> Result<Vec<SqliteValue>> {
    args.iter().map(bind_value).collect()
}

pub(crate) fn fetch_rows(
    statement: &mut rusqlite::Statement<'_>,
    sql: &str,
    args: &[Value],
) -> Result<Vec<RowLabeled>> {
    let labels: RowNames = statement
        .column_names()
        .into_iter()
        .map(String::from)
        .collect();
    let count = labels.len();
    let mut rows = statement
        .query(params_from_iter(bind_all(args)?))
        .map_err(|e| driver_error(e, format!("While fetching `{}`", truncate_long!(sql))))?;
    let mut result = Vec::new();
    while let Some(row) = rows.next().map_err(|e| driver_error(e, "While reading a row"))? {
        let values = (0..count)
            .map(|i| {
                row.get_ref(i)
                    .map_err(|e| driver_error(e, "While reading a column"))
                    .and_then(extract_value)
            })
            .collect::<Result<_>>()?;
        result.push(RowLabeled::new(labels.clone(), values));
    }
    Ok(result)
}

impl SqliteConnection {
    pub(crate) fn rows_affected(&self, changes: usize) -> RowsAffected {
        RowsAffected {
            rows_affected: changes as u64,
            last_affected_id: Some(self.connection.last_insert_rowid()),
        }
    }
}

impl Executor for SqliteConnection {
    type Driver = SqliteDriver;
    type Prepared<'s> = SqlitePrepared<'s>;

    fn driver(&self) -> &SqliteDriver {
        &SqliteDriver {}
    }

    fn execute(&self, sql: &str, args: &[Value]) -> Result<RowsAffected> {
        let sql = sql.trim_end();
        let changes = self
            .connection
            .execute(sql, params_from_iter(bind_all(args)?))
            .map_err(|e| driver_error(e, format!("While executing `{}`", truncate_long!(sql))))?;
        Ok(self.rows_affected(changes))
    }

    fn fetch(&self, sql: &str, args: &[Value]) -> Result<Vec<RowLabeled>> {
        let sql = sql.trim_end();
        let mut statement = self
            .connection
            .prepare(sql)
            .map_err(|e| driver_error(e, format!("While preparing `{}`", truncate_long!(sql))))?;
        fetch_rows(&mut statement, sql, args)
    }

    fn prepare(&self, sql: &str) -> Result<SqlitePrepared<'_>> {
        let sql = sql.trim_end();
        let statement = self
            .connection
            .prepare(sql)
            .map_err(|e| driver_error(e, format!("While preparing `{}`", truncate_long!(sql))))?;
        Ok(SqlitePrepared::new(self, sql, statement))
    }
}

impl Connection for SqliteConnection {
    type Transaction<'c> = SqliteTransaction<'c>;

    fn connect(url: &str) -> Result<SqliteConnection> {
        let prefix = format!("{}://", SqliteDriver::NAME);
        let Some(path) = url.strip_prefix(&prefix) else {
            let error = Error::msg(format!(
                "Expected sqlite connection url to start with `{}`",
                &prefix
            ));
            log::error!("{:#}", error);
            return Err(error);
        };
        let connection = if path == ":memory:" {
            rusqlite::Connection::open_in_memory()
        } else {
            rusqlite::Connection::open_with_flags(format!("file:{path}"), OpenFlags::default())
        }
        .map_err(|e| driver_error(e, format!("While opening `{}`", truncate_long!(url))))?;
        Ok(Self { connection })
    }

    fn begin(&mut self) -> Result<SqliteTransaction<'_>> {
        SqliteTransaction::new(self)
    }
}
