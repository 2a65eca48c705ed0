use crate::{
    Config, Connection, Context, Dialect, Driver, Executor, Expression, IntoExpr, Record, Registry,
    Result, Rows, RowsAffected, Statement, Table, Transaction, Value, expand,
    limit_time_precision, q, truncate_long,
};
use std::sync::Arc;
use time::OffsetDateTime;

/// Entry point of the record operations.
///
/// Couples an [`Executor`] with the dialect rendering its statements and the schema
/// cache of the record types. Transactions started with [`Db::begin`] share the cache.
pub struct Db<E: Executor> {
    executor: E,
    dialect: Arc<dyn Dialect>,
    registry: Arc<Registry>,
    time_precision: u8,
    rename: Option<fn(&str) -> String>,
}

impl<E: Executor> Db<E> {
    /// Uses the dialect of the executor's driver.
    pub fn new(executor: E) -> Self {
        Self::with_config(executor, Config::default())
    }

    pub fn with_config(executor: E, config: Config) -> Self {
        let dialect = config.resolve_dialect(executor.driver().dialect());
        let time_precision = config
            .time_precision
            .unwrap_or_else(|| dialect.time_precision());
        Self {
            executor,
            dialect,
            registry: Arc::new(Registry::new()),
            time_precision,
            rename: config.rename,
        }
    }

    /// Shares the schema cache of another handle.
    pub fn with_registry(mut self, registry: Arc<Registry>) -> Self {
        self.registry = registry;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    pub fn dialect(&self) -> &dyn Dialect {
        self.dialect.as_ref()
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn time_precision(&self) -> u8 {
        self.time_precision
    }

    /// Table of `T`, resolved once and cached.
    pub fn table<T: Record>(&self) -> Result<Arc<Table>> {
        self.registry.table::<T>()
    }

    /// Current time limited to the configured precision.
    pub fn now(&self) -> OffsetDateTime {
        self.limit_time(OffsetDateTime::now_utc())
    }

    pub fn limit_time(&self, instant: OffsetDateTime) -> OffsetDateTime {
        limit_time_precision(self.time_precision, instant)
    }

    /// Renders the expression, placeholders numbered from 1.
    pub fn expand(&self, expression: &dyn Expression) -> Result<(String, Vec<Value>)> {
        let result = expand(expression, false, self.dialect.as_ref(), 1);
        match &result {
            Ok((sql, args)) => log::debug!("{} {:?}", truncate_long!(sql), args),
            Err(e) => log::debug!("{e:#}"),
        }
        result
    }

    pub fn exec(&self, expression: &dyn Expression) -> Result<RowsAffected> {
        let (sql, args) = self.expand(expression)?;
        self.executor
            .execute(&sql, &args)
            .with_context(|| format!("While executing `{}`", truncate_long!(sql)))
    }

    /// Prepares the statement, returned together with the arguments of the rendering.
    pub fn prepare(
        &self,
        expression: &dyn Expression,
    ) -> Result<(Statement<E::Prepared<'_>>, Vec<Value>)> {
        let (sql, args) = self.expand(expression)?;
        let prepared = self
            .executor
            .prepare(&sql)
            .with_context(|| format!("While preparing `{}`", truncate_long!(sql)))?;
        Ok((Statement::new(sql, prepared), args))
    }

    pub fn query(&self, expression: &dyn Expression) -> Result<Rows> {
        let (sql, args) = self.expand(expression)?;
        let rows = self
            .executor
            .fetch(&sql, &args)
            .with_context(|| format!("While fetching `{}`", truncate_long!(sql)))?;
        Ok(Rows::new(rows, self.rename, self.registry.clone()))
    }

    /// Queries the space separated parts.
    pub fn q<X: IntoExpr>(&self, parts: impl IntoIterator<Item = X>) -> Result<Rows> {
        self.query(&q(parts))
    }

    /// `CREATE TABLE` statement of `T`, executed as well when `execute` is set.
    pub fn create_table<T: Record>(
        &self,
        temporary: bool,
        if_not_exists: bool,
        execute: bool,
    ) -> Result<String> {
        let table = self.table::<T>()?;
        let sql = table.create_table(self.dialect.as_ref(), temporary, if_not_exists)?;
        log::debug!("{}", truncate_long!(sql));
        if execute {
            self.executor
                .execute(&sql, &[])
                .with_context(|| format!("While creating the table {}", table.name))?;
        }
        Ok(sql)
    }
}

impl<C: Connection> Db<C> {
    /// Opens a connection and uses the dialect of its driver.
    pub fn connect(url: &str) -> Result<Self> {
        Ok(Self::new(C::connect(url)?))
    }

    pub fn connect_with(url: &str, config: Config) -> Result<Self> {
        Ok(Self::with_config(C::connect(url)?, config))
    }

    /// Starts a transaction sharing the configuration and the schema cache.
    pub fn begin(&mut self) -> Result<Db<C::Transaction<'_>>> {
        let transaction = self.executor.begin()?;
        Ok(Db {
            executor: transaction,
            dialect: self.dialect.clone(),
            registry: self.registry.clone(),
            time_precision: self.time_precision,
            rename: self.rename,
        })
    }
}

impl<T: Transaction> Db<T> {
    pub fn commit(self) -> Result<()> {
        self.executor.commit()
    }

    pub fn rollback(self) -> Result<()> {
        self.executor.rollback()
    }
}
