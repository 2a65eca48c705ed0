mod mysql;
mod postgres;
mod sqlite;
mod standard;

pub use mysql::*;
pub use postgres::*;
pub use sqlite::*;
pub use standard::*;

use crate::{Encoding, Expr, Value};
use std::{fmt::Debug, sync::Arc};

/// Longest identifier any dialect accepts unquoted or quoted.
pub const MAX_IDENTIFIER_LENGTH: usize = 63;

/// Role of a column in a CREATE TABLE statement, selects the default clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Modifier {
    ZeroValue,
    AutoIncrement,
    AutoNow,
    AutoNowAdd,
    Version,
}

/// Statement kinds that can ask the database to return a column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Returning {
    Create,
    Update,
}

/// Logical description of a column used to choose the native type.
#[derive(Clone, Copy, Debug)]
pub struct ColumnType<'a> {
    pub name: &'a str,
    /// Prototype of the stored value, only its variant matters.
    pub value: &'a Value,
    pub encoding: Option<Encoding>,
    /// Declared maximum length, 0 when not declared.
    pub size: u32,
    pub modifier: Modifier,
}

/// SQL flavour: placeholders, identifier quoting, DDL types and transactions.
pub trait Dialect: Send + Sync + Debug {
    fn name(&self) -> &'static str;

    /// Default number of fractional second digits kept by automatic timestamps.
    fn time_precision(&self) -> u8;

    /// Reserved words, uppercase and sorted.
    fn keywords(&self) -> &[&'static str];

    fn is_keyword(&self, word: &str) -> bool {
        let upper = word.to_ascii_uppercase();
        self.keywords().binary_search(&upper.as_str()).is_ok()
    }

    /// Writes the placeholder for the `index`-th (1 based) argument. Returns `false` when
    /// the requested form (numbered or not) is not supported.
    fn write_parameter(&self, out: &mut String, numbered: bool, index: usize) -> bool;

    /// Writes the identifier quoting it only when needed. Returns `false` when the name
    /// cannot be represented.
    fn write_identifier(&self, out: &mut String, name: &str) -> bool;

    /// Writes a quoted region (delimiters included) found in a template. Returns `false`
    /// when the region cannot be represented.
    fn write_quoted(&self, out: &mut String, region: &str) -> bool;

    /// Native type and default clause for a column, `None` when unsupported.
    fn column_type(&self, column: &ColumnType) -> Option<(String, String)>;

    /// Clause appended to a statement so that it returns `column`.
    fn returning(&self, _kind: Returning, _column: &str) -> Option<Expr> {
        None
    }

    fn write_create_table(
        &self,
        out: &mut String,
        table: &str,
        columns: &[String],
        temporary: bool,
        if_not_exists: bool,
    ) {
        out.push_str("CREATE");
        if temporary {
            out.push_str(" TEMPORARY");
        }
        out.push_str(" TABLE");
        if if_not_exists {
            out.push_str(" IF NOT EXISTS");
        }
        out.push(' ');
        out.push_str(table);
        out.push_str(" (\n");
        for (i, column) in columns.iter().enumerate() {
            if i > 0 {
                out.push_str(",\n");
            }
            out.push('\t');
            out.push_str(column);
        }
        out.push_str("\n);\n");
    }

    fn write_transaction_begin(&self, out: &mut String) {
        out.push_str("BEGIN;");
    }

    fn write_transaction_commit(&self, out: &mut String) {
        out.push_str("COMMIT;");
    }

    fn write_transaction_rollback(&self, out: &mut String) {
        out.push_str("ROLLBACK;");
    }
}

/// Dialect for a driver or URL scheme name, the standard dialect when unknown.
pub fn dialect_by_name(name: &str) -> Arc<dyn Dialect> {
    match name.to_ascii_lowercase().as_str() {
        "mysql" | "mariadb" => Arc::new(MySqlDialect),
        "postgres" | "postgresql" => Arc::new(PostgresDialect),
        "sqlite" | "sqlite3" => Arc::new(SqliteDialect),
        _ => Arc::new(StandardDialect),
    }
}

fn not_allowed(c: char) -> bool {
    matches!(c, '\0' | '"' | '\'' | '\\' | '`' | '\u{FFFD}')
}

/// Shared identifier rule: rejects empty, too long or disallowed names, quotes with
/// `quote` when a character falls outside `[0-9a-z_]`, the first one is not a letter or
/// underscore, or the name is a keyword.
pub fn write_identifier_with(
    dialect: &dyn Dialect,
    out: &mut String,
    name: &str,
    quote: char,
) -> bool {
    if name.is_empty() || name.len() > MAX_IDENTIFIER_LENGTH {
        return false;
    }
    let mut needs_quote = false;
    for c in name.chars() {
        if not_allowed(c) {
            return false;
        }
        if !(c.is_ascii_digit() || c.is_ascii_lowercase() || c == '_') {
            needs_quote = true;
        }
    }
    if !needs_quote {
        let first = name.chars().next().unwrap_or_default();
        needs_quote = !first.is_ascii_alphabetic() && first != '_';
    }
    if !needs_quote {
        needs_quote = dialect.is_keyword(name);
    }
    if needs_quote {
        out.push(quote);
        out.push_str(name);
        out.push(quote);
    } else {
        out.push_str(name);
    }
    true
}

/// Shared quoted region rule: single quoted literals pass through, any other delimiter
/// is treated as an identifier.
pub fn write_quoted_with(dialect: &dyn Dialect, out: &mut String, region: &str) -> bool {
    if region.starts_with('\'') {
        out.push_str(region);
        return true;
    }
    let mut chars = region.chars();
    let Some(delimiter) = chars.next() else {
        return false;
    };
    match chars.as_str().strip_suffix(delimiter) {
        Some(inner) => dialect.write_identifier(out, inner),
        None => false,
    }
}

/// Keyword list sorted once, for binary search.
pub(crate) fn sorted(words: &[&'static str]) -> Vec<&'static str> {
    let mut words = words.to_vec();
    words.sort_unstable();
    words.dedup();
    words
}

/// Logical family of a column prototype shared by the dialect mappings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Family {
    Bool,
    Integer,
    Float,
    Time,
    Bytes,
    Gob,
    Text,
    Other,
}

impl Family {
    pub(crate) fn of(column: &ColumnType) -> Self {
        match column.encoding {
            Some(Encoding::Gob) => return Family::Gob,
            Some(_) => return Family::Text,
            None => {}
        }
        match column.value {
            Value::Boolean(..) => Family::Bool,
            v if v.is_integer() => Family::Integer,
            Value::Float32(..) | Value::Float64(..) => Family::Float,
            Value::Timestamp(..) | Value::TimestampWithTimezone(..) => Family::Time,
            Value::Blob(..) => Family::Bytes,
            Value::Varchar(..) => Family::Text,
            _ => Family::Other,
        }
    }
}
