use crate::{
    Arg, Empty, Expr, Expression, Identifier, IntoExpr, Invalid, Literal, Pairs, Query,
    QueryKind, Template, template,
};
use std::{borrow::Cow, sync::Arc};

pub fn insert(table: impl Into<Cow<'static, str>>) -> Template {
    template!("INSERT INTO ?", Identifier::new(table))
}

pub fn update(table: impl Into<Cow<'static, str>>) -> Template {
    template!("UPDATE ?", Identifier::new(table))
}

pub fn delete(table: impl Into<Cow<'static, str>>) -> Template {
    template!("DELETE FROM ?", Identifier::new(table))
}

/// `(column) VALUES (value)`, extended with [`Pairs::add`].
pub fn values(column: impl Into<Cow<'static, str>>, value: impl Into<Arg>) -> Pairs {
    Pairs::values().add(column, value)
}

/// `SET column = value`, extended with [`Pairs::add`].
pub fn set(column: impl Into<Cow<'static, str>>, value: impl Into<Arg>) -> Pairs {
    Pairs::set().add(column, value)
}

pub fn select_count() -> Literal {
    Literal::new("SELECT COUNT(*)")
}

/// `SELECT a, b`, or `SELECT *` when no column is given.
pub fn select<S: AsRef<str>>(columns: impl IntoIterator<Item = S>) -> Query {
    Query::new(QueryKind::Star, "SELECT ", ", ", "").add(columns)
}

pub fn select_distinct<S: AsRef<str>>(columns: impl IntoIterator<Item = S>) -> Query {
    Query::new(QueryKind::Star, "SELECT DISTINCT ", ", ", "").add(columns)
}

pub fn from<S: AsRef<str>>(tables: impl IntoIterator<Item = S>) -> Query {
    Query::new(QueryKind::Never, "FROM ", ", ", "").add(tables)
}

pub fn group_by<S: AsRef<str>>(columns: impl IntoIterator<Item = S>) -> Query {
    Query::new(QueryKind::Omit, "GROUP BY ", ", ", "").add(columns)
}

/// `ORDER BY` list, `+name` sorts ascending and `-name` descending.
pub fn order_by<S: AsRef<str>>(columns: impl IntoIterator<Item = S>) -> Query {
    Query::new(QueryKind::Order, "ORDER BY ", ", ", "").add(columns)
}

pub fn union<E: IntoExpr>(queries: impl IntoIterator<Item = E>) -> Query {
    Query::new(QueryKind::Never, "", " UNION ", "").append(queries)
}

pub fn union_all<E: IntoExpr>(queries: impl IntoIterator<Item = E>) -> Query {
    Query::new(QueryKind::Never, "", " UNION ALL ", "").append(queries)
}

/// Statement made of space separated parts, empty parts are skipped.
///
/// ```rust
/// use rowmap_core::{SqliteDialect, column, expand, expr, from, limit, q, select, where_};
/// let query = q([
///     expr(select(["a"])),
///     expr(from(["t"])),
///     expr(where_([column::eq("a", 1)])),
///     limit(&[]),
/// ]);
/// let (sql, _) = expand(&query, false, &SqliteDialect, 1).unwrap();
/// assert_eq!(sql, "SELECT a FROM t WHERE a = ?1");
/// ```
pub fn q<E: IntoExpr>(parts: impl IntoIterator<Item = E>) -> Query {
    Query::new(QueryKind::Omit, "", " ", "").append(parts)
}

/// `LIMIT` clause.
///
/// - `[]` renders nothing
/// - `[limit]`
/// - `[offset, limit]`, a negative side is left out
pub fn limit(values: &[i64]) -> Expr {
    match *values {
        [] => Arc::new(Empty),
        [n] => limit_only(n),
        [o, l] if o < 0 => limit_only(l),
        [o, l] if l < 0 => offset(o),
        [o, l] => Arc::new(Literal::new(format!("LIMIT {l} OFFSET {o}"))),
        _ => Arc::new(Invalid::new(format!("limit: {values:?}"))),
    }
}

fn limit_only(n: i64) -> Expr {
    if n < 0 {
        return Arc::new(Empty);
    }
    Arc::new(Literal::new(format!("LIMIT {n}")))
}

pub fn offset(n: i64) -> Expr {
    if n < 0 {
        return Arc::new(Empty);
    }
    Arc::new(Literal::new(format!("OFFSET {n}")))
}

/// Turns any expression into a shared one, for heterogeneous lists.
pub fn expr(expression: impl Expression + 'static) -> Expr {
    Arc::new(expression)
}
