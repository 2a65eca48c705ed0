use crate::{Context, Dialect, Error, Result, dialect_by_name, truncate_long};
use std::sync::Arc;
use url::Url;

/// Settings of a [`Db`](crate::Db).
///
/// Fields left empty fall back to what the driver provides: its dialect and the
/// dialect's time precision.
#[derive(Default, Clone, Debug)]
pub struct Config {
    /// Dialect name, see [`dialect_by_name`].
    pub dialect: Option<String>,
    /// Fractional second digits kept by automatic timestamps.
    pub time_precision: Option<u8>,
    /// Normalizes result column labels before they are matched against record columns.
    pub rename: Option<fn(&str) -> String>,
}

impl Config {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads the dialect from the URL scheme, `dialect` and `time_precision` query
    /// parameters override it.
    ///
    /// ```rust
    /// use rowmap_core::Config;
    /// let config = Config::from_url("postgres://localhost/app?time_precision=3").unwrap();
    /// assert_eq!(config.dialect.as_deref(), Some("postgres"));
    /// assert_eq!(config.time_precision, Some(3));
    /// ```
    pub fn from_url(url: &str) -> Result<Self> {
        let context = || format!("While reading the configuration of `{}`", truncate_long!(url));
        let parsed = Url::parse(url).with_context(context)?;
        let mut config = Config {
            dialect: Some(parsed.scheme().to_string()),
            ..Default::default()
        };
        for (key, value) in parsed.query_pairs() {
            match key.as_ref() {
                "dialect" => config.dialect = Some(value.into_owned()),
                "time_precision" => {
                    let precision = value
                        .parse::<u8>()
                        .map_err(|e| Error::new(e).context(format!("time_precision={value}")))
                        .with_context(context)?;
                    config.time_precision = Some(precision);
                }
                _ => {}
            }
        }
        Ok(config)
    }

    pub fn dialect(mut self, name: impl Into<String>) -> Self {
        self.dialect = Some(name.into());
        self
    }

    pub fn time_precision(mut self, precision: u8) -> Self {
        self.time_precision = Some(precision);
        self
    }

    pub fn rename(mut self, rename: fn(&str) -> String) -> Self {
        self.rename = Some(rename);
        self
    }

    /// The configured dialect, `fallback` when none.
    pub(crate) fn resolve_dialect(&self, fallback: Arc<dyn Dialect>) -> Arc<dyn Dialect> {
        match &self.dialect {
            Some(name) => dialect_by_name(name),
            None => fallback,
        }
    }
}
