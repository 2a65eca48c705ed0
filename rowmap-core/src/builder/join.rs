use crate::{
    Condition, Expr, Expression, IntoExpr, Query, QueryKind, RenderContext, Result, conditions,
    impl_expression_conversions,
};
use std::sync::Arc;

#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinType {
    #[default]
    Default,
    Inner,
    Left,
    Right,
}

impl JoinType {
    fn keyword(self, natural: bool) -> &'static str {
        match (natural, self) {
            (false, JoinType::Default) => "JOIN",
            (false, JoinType::Inner) => "INNER JOIN",
            (false, JoinType::Left) => "LEFT JOIN",
            (false, JoinType::Right) => "RIGHT JOIN",
            (true, JoinType::Default) => "NATURAL JOIN",
            (true, JoinType::Inner) => "NATURAL INNER JOIN",
            (true, JoinType::Left) => "NATURAL LEFT JOIN",
            (true, JoinType::Right) => "NATURAL RIGHT JOIN",
        }
    }
}

fn binary(operator: &'static str, lhs: Expr, rhs: Expr) -> Expr {
    Arc::new(
        Query::new(QueryKind::Never, "", format!(" {operator} "), "").append([lhs, rhs]),
    )
}

/// Complete join chain, usable inside `FROM` and extensible with further joins.
///
/// ```rust
/// use rowmap_core::{SqliteDialect, column, expand, left_join};
/// let join = left_join("a", "b").on([column::eq("x", 1)]);
/// let (sql, _) = expand(&join, false, &SqliteDialect, 1).unwrap();
/// assert_eq!(sql, "a LEFT JOIN b ON x = ?1");
/// ```
#[derive(Clone, Debug)]
pub struct Join(pub Expr);

/// Join still missing its `ON` or `USING` part.
#[derive(Clone, Debug)]
pub struct PendingJoin(Expr);

impl PendingJoin {
    pub fn on(self, on: impl IntoIterator<Item = Condition>) -> Join {
        let on: Vec<_> = on.into_iter().collect();
        if on.is_empty() {
            return Join(self.0);
        }
        Join(binary("ON", self.0, Arc::new(conditions(on))))
    }

    pub fn using<S: AsRef<str>>(self, columns: impl IntoIterator<Item = S>) -> Join {
        let columns = Query::new(QueryKind::Never, "(", ", ", ")").add(columns);
        if columns.is_empty() {
            return Join(self.0);
        }
        Join(binary("USING", self.0, Arc::new(columns)))
    }
}

impl Join {
    pub fn join(self, join: JoinType, other: impl IntoExpr) -> PendingJoin {
        PendingJoin(binary(join.keyword(false), self.0, other.into_expr()))
    }

    pub fn inner_join(self, other: impl IntoExpr) -> PendingJoin {
        self.join(JoinType::Inner, other)
    }

    pub fn left_join(self, other: impl IntoExpr) -> PendingJoin {
        self.join(JoinType::Left, other)
    }

    pub fn right_join(self, other: impl IntoExpr) -> PendingJoin {
        self.join(JoinType::Right, other)
    }

    pub fn natural_join(self, join: JoinType, other: impl IntoExpr) -> Join {
        Join(binary(join.keyword(true), self.0, other.into_expr()))
    }

    pub fn natural_left_join(self, other: impl IntoExpr) -> Join {
        self.natural_join(JoinType::Left, other)
    }

    pub fn natural_right_join(self, other: impl IntoExpr) -> Join {
        self.natural_join(JoinType::Right, other)
    }
}

impl Expression for Join {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        context.expand(self.0.as_ref(), false, out)
    }
}

impl Expression for PendingJoin {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        context.expand(self.0.as_ref(), false, out)
    }
}

impl_expression_conversions!(Join, PendingJoin);

/// Table names convert into identifiers.
pub fn join(kind: JoinType, lhs: impl IntoExpr, rhs: impl IntoExpr) -> PendingJoin {
    PendingJoin(binary(kind.keyword(false), lhs.into_expr(), rhs.into_expr()))
}

pub fn inner_join(lhs: impl IntoExpr, rhs: impl IntoExpr) -> PendingJoin {
    join(JoinType::Inner, lhs, rhs)
}

pub fn left_join(lhs: impl IntoExpr, rhs: impl IntoExpr) -> PendingJoin {
    join(JoinType::Left, lhs, rhs)
}

pub fn right_join(lhs: impl IntoExpr, rhs: impl IntoExpr) -> PendingJoin {
    join(JoinType::Right, lhs, rhs)
}

pub fn natural_join(kind: JoinType, lhs: impl IntoExpr, rhs: impl IntoExpr) -> Join {
    Join(binary(kind.keyword(true), lhs.into_expr(), rhs.into_expr()))
}

pub fn natural_left_join(lhs: impl IntoExpr, rhs: impl IntoExpr) -> Join {
    natural_join(JoinType::Left, lhs, rhs)
}

pub fn natural_right_join(lhs: impl IntoExpr, rhs: impl IntoExpr) -> Join {
    natural_join(JoinType::Right, lhs, rhs)
}
