use crate::{
    Error, Expr, Expression, IntoExpr, RenderContext, Result, impl_expression_conversions,
};
use std::borrow::Cow;

/// Boolean expression tree.
///
/// Children of a logic group are each parenthesized. Groups flatten: ANDing onto an AND
/// group appends to it, ORing onto an OR group likewise; a group of one collapses to its
/// child. `not` pushes the negation down to the leaves (De Morgan).
#[derive(Clone, Debug)]
pub enum Condition {
    Expr { negated: bool, expr: Expr },
    Logic { or: bool, children: Vec<Condition> },
}

impl Condition {
    pub fn new(expression: impl IntoExpr) -> Self {
        Condition::Expr {
            negated: false,
            expr: expression.into_expr(),
        }
    }

    /// Group of conditions joined by `AND`, the single child itself when only one.
    pub fn all(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::group(false, conditions.into_iter().collect())
    }

    /// Group of conditions joined by `OR`, the single child itself when only one.
    pub fn any(conditions: impl IntoIterator<Item = Condition>) -> Self {
        Self::group(true, conditions.into_iter().collect())
    }

    fn group(or: bool, mut children: Vec<Condition>) -> Self {
        if children.len() == 1 {
            return children.remove(0);
        }
        Condition::Logic { or, children }
    }

    /// True for a logic group without children.
    pub fn is_empty_group(&self) -> bool {
        matches!(self, Condition::Logic { children, .. } if children.is_empty())
    }

    pub fn not(self) -> Self {
        match self {
            Condition::Expr { negated, expr } => Condition::Expr {
                negated: !negated,
                expr,
            },
            Condition::Logic { or, children } => Condition::Logic {
                or: !or,
                children: children.into_iter().map(Condition::not).collect(),
            },
        }
    }

    pub fn and(self, others: impl IntoIterator<Item = Condition>) -> Self {
        self.combine(false, others)
    }

    pub fn or(self, others: impl IntoIterator<Item = Condition>) -> Self {
        self.combine(true, others)
    }

    fn combine(self, or: bool, others: impl IntoIterator<Item = Condition>) -> Self {
        match self {
            Condition::Logic {
                or: group,
                mut children,
            } if group == or || children.is_empty() => {
                children.extend(others);
                Self::group(or, children)
            }
            condition => Self::group(or, std::iter::once(condition).chain(others).collect()),
        }
    }
}

impl Expression for Condition {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        match self {
            Condition::Expr { negated, expr } => {
                if *negated {
                    out.push_str("NOT (");
                }
                context.expand(expr.as_ref(), false, out)?;
                if *negated {
                    out.push(')');
                }
            }
            Condition::Logic { or, children } => {
                if children.is_empty() {
                    return Err(Error::msg(if *or { "empty or" } else { "empty and" }));
                }
                for (k, child) in children.iter().enumerate() {
                    if k > 0 {
                        out.push_str(if *or { " OR " } else { " AND " });
                    }
                    out.push('(');
                    context.expand(child, false, out)?;
                    out.push(')');
                }
            }
        }
        Ok(())
    }
}

/// Builds a [`Condition`] from a template.
#[macro_export]
macro_rules! cond {
    ($($arg:tt)*) => {
        $crate::Condition::new($crate::template!($($arg)*))
    };
}

/// Optional condition introduced by a keyword, e.g. `WHERE `. Renders nothing while no
/// condition has been added.
#[derive(Clone, Debug)]
pub struct Clause {
    pub prefix: Cow<'static, str>,
    pub condition: Option<Condition>,
}

impl Clause {
    pub fn new(prefix: impl Into<Cow<'static, str>>) -> Self {
        Self {
            prefix: prefix.into(),
            condition: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.condition.is_none()
    }

    pub fn not(mut self) -> Self {
        self.condition = self.condition.map(Condition::not);
        self
    }

    pub fn and(self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.add(false, conditions)
    }

    pub fn or(self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.add(true, conditions)
    }

    fn add(mut self, or: bool, conditions: impl IntoIterator<Item = Condition>) -> Self {
        let conditions: Vec<_> = conditions
            .into_iter()
            .filter(|v| !v.is_empty_group())
            .collect();
        if conditions.is_empty() {
            return self;
        }
        self.condition = Some(match self.condition.take() {
            Some(condition) => condition.combine(or, conditions),
            None => Condition::group(or, conditions),
        });
        self
    }
}

impl Expression for Clause {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        if let Some(condition) = &self.condition {
            out.push_str(&self.prefix);
            context.expand(condition, false, out)?;
        }
        Ok(())
    }
}

impl_expression_conversions!(Condition, Clause);

/// Clause with a custom prefix.
pub fn clause(
    prefix: impl Into<Cow<'static, str>>,
    conditions: impl IntoIterator<Item = Condition>,
) -> Clause {
    Clause::new(prefix).and(conditions)
}

/// Conditions without prefix, used for join `ON` parts and nested filters.
pub fn conditions(conditions: impl IntoIterator<Item = Condition>) -> Clause {
    clause("", conditions)
}

pub fn where_(conditions: impl IntoIterator<Item = Condition>) -> Clause {
    clause("WHERE ", conditions)
}

pub fn having(conditions: impl IntoIterator<Item = Condition>) -> Clause {
    clause("HAVING ", conditions)
}
