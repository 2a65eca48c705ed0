use crate::{
    Arg, Condition, Expr, Expression, Identifier, IntoExpr, Invalid, Qualifier, RenderContext,
    Result, Template, escape_like, impl_expression_conversions, quote, template,
};
use std::{borrow::Cow, sync::Arc};

/// Left hand side of comparisons and the subject of aggregates, sort keys and joins.
#[derive(Clone, Debug)]
pub struct Operand(pub Expr);

impl Expression for Operand {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        context.expand(self.0.as_ref(), false, out)
    }
}

impl_expression_conversions!(Operand);

/// Operand naming a column (`iq(&["c"])`) or a qualified path (`iq(&["t", "c"])`).
pub fn iq<S: Into<Cow<'static, str>> + Clone>(parts: &[S]) -> Operand {
    if parts.len() == 1 {
        Operand(Arc::new(Identifier::new(parts[0].clone())))
    } else {
        Operand(Arc::new(Qualifier::new(parts.iter().cloned())))
    }
}

impl Operand {
    pub fn new(expression: impl IntoExpr) -> Self {
        Operand(expression.into_expr())
    }

    pub fn column(name: impl Into<Cow<'static, str>>) -> Self {
        Operand(Arc::new(Identifier::new(name)))
    }

    fn condition(&self, format: &'static str, arg: impl Into<Arg>) -> Condition {
        let arg: Arg = arg.into();
        Condition::new(template!(format, self.clone(), arg))
    }

    fn expression(&self, format: &'static str) -> Template {
        template!(format, self.clone())
    }

    pub fn is_null(&self) -> Condition {
        Condition::new(template!("? IS NULL", self.clone()))
    }

    /// Equality, `IS NULL` when comparing with a NULL value.
    pub fn eq(&self, arg: impl Into<Arg>) -> Condition {
        let arg: Arg = arg.into();
        if arg.is_null() {
            return self.is_null();
        }
        self.condition("? = ?", arg)
    }

    pub fn lt(&self, arg: impl Into<Arg>) -> Condition {
        self.condition("? < ?", arg)
    }

    pub fn le(&self, arg: impl Into<Arg>) -> Condition {
        self.condition("? <= ?", arg)
    }

    pub fn gt(&self, arg: impl Into<Arg>) -> Condition {
        self.condition("? > ?", arg)
    }

    pub fn ge(&self, arg: impl Into<Arg>) -> Condition {
        self.condition("? >= ?", arg)
    }

    /// `IN` with the integers written inline.
    pub fn in_ints(&self, values: &[i64]) -> Condition {
        if values.is_empty() {
            return Condition::new(Invalid::new(format!("empty in: {self:?}")));
        }
        let mut format = String::from("? IN (");
        let mut buffer = itoa::Buffer::new();
        for (k, v) in values.iter().enumerate() {
            if k > 0 {
                format.push_str(", ");
            }
            format.push_str(buffer.format(*v));
        }
        format.push(')');
        Condition::new(template!(format, self.clone()))
    }

    /// `IN` with the strings written inline as quoted literals.
    pub fn in_strings(&self, values: &[&str]) -> Condition {
        if values.is_empty() {
            return Condition::new(Invalid::new(format!("empty in: {self:?}")));
        }
        let mut format = String::from("? IN (");
        for (k, v) in values.iter().enumerate() {
            if k > 0 {
                format.push_str(", ");
            }
            format.push_str(&quote(v, '\''));
        }
        format.push(')');
        Condition::new(template!(format, self.clone()))
    }

    /// `IN` with one placeholder per value. NULL values are rejected.
    pub fn in_values<A: Into<Arg>>(&self, values: impl IntoIterator<Item = A>) -> Condition {
        let mut args = vec![Arg::from(self.clone())];
        let mut format = String::from("? IN (");
        for (k, v) in values.into_iter().enumerate() {
            let v: Arg = v.into();
            if v.is_null() {
                return Condition::new(Invalid::new(format!("null in: {self:?}")));
            }
            if k > 0 {
                format.push_str(", ");
            }
            format.push('?');
            args.push(v);
        }
        if args.len() == 1 {
            return Condition::new(Invalid::new(format!("empty in: {self:?}")));
        }
        format.push(')');
        Condition::new(Template::new(format, args))
    }

    pub fn between(&self, low: impl Into<Arg>, high: impl Into<Arg>) -> Condition {
        let (low, high): (Arg, Arg) = (low.into(), high.into());
        Condition::new(template!("? BETWEEN ? AND ?", self.clone(), low, high))
    }

    pub fn like(&self, pattern: impl Into<String>) -> Condition {
        let pattern: String = pattern.into();
        self.condition("? LIKE ?", pattern)
    }

    pub fn contains(&self, value: &str) -> Condition {
        self.like(format!("%{}%", escape_like(value)))
    }

    pub fn has_prefix(&self, value: &str) -> Condition {
        self.like(format!("{}%", escape_like(value)))
    }

    pub fn has_suffix(&self, value: &str) -> Condition {
        self.like(format!("%{}", escape_like(value)))
    }

    pub fn asc(&self) -> Template {
        self.expression("? ASC")
    }

    pub fn desc(&self) -> Template {
        self.expression("? DESC")
    }

    pub fn inc(&self) -> Template {
        self.expression("? + 1")
    }

    pub fn dec(&self) -> Template {
        self.expression("? - 1")
    }

    pub fn avg(&self) -> Template {
        self.expression("AVG(?)")
    }

    pub fn count(&self) -> Template {
        self.expression("COUNT(?)")
    }

    pub fn max(&self) -> Template {
        self.expression("MAX(?)")
    }

    pub fn min(&self) -> Template {
        self.expression("MIN(?)")
    }

    pub fn sum(&self) -> Template {
        self.expression("SUM(?)")
    }

    pub fn alias(&self, name: impl Into<Cow<'static, str>>) -> Template {
        template!("? AS ?", self.clone(), Identifier::new(name))
    }

    pub fn inner_join(&self, other: impl IntoExpr) -> Template {
        template!("? INNER JOIN ?", self.clone(), other.into_expr())
    }

    pub fn left_join(&self, other: impl IntoExpr) -> Template {
        template!("? LEFT JOIN ?", self.clone(), other.into_expr())
    }

    pub fn right_join(&self, other: impl IntoExpr) -> Template {
        template!("? RIGHT JOIN ?", self.clone(), other.into_expr())
    }

    pub fn full_join(&self, other: impl IntoExpr) -> Template {
        template!("? FULL JOIN ?", self.clone(), other.into_expr())
    }

    pub fn union(&self, other: impl IntoExpr) -> Template {
        template!("? UNION ?", self.clone(), other.into_expr())
    }

    pub fn union_all(&self, other: impl IntoExpr) -> Template {
        template!("? UNION ALL ?", self.clone(), other.into_expr())
    }
}

/// Column-name shorthands for the [`Operand`] methods.
pub mod column {
    use super::*;

    pub fn is_null(column: &'static str) -> Condition {
        Operand::column(column).is_null()
    }
    pub fn eq(column: &'static str, arg: impl Into<Arg>) -> Condition {
        Operand::column(column).eq(arg)
    }
    pub fn lt(column: &'static str, arg: impl Into<Arg>) -> Condition {
        Operand::column(column).lt(arg)
    }
    pub fn le(column: &'static str, arg: impl Into<Arg>) -> Condition {
        Operand::column(column).le(arg)
    }
    pub fn gt(column: &'static str, arg: impl Into<Arg>) -> Condition {
        Operand::column(column).gt(arg)
    }
    pub fn ge(column: &'static str, arg: impl Into<Arg>) -> Condition {
        Operand::column(column).ge(arg)
    }
    pub fn in_ints(column: &'static str, values: &[i64]) -> Condition {
        Operand::column(column).in_ints(values)
    }
    pub fn in_strings(column: &'static str, values: &[&str]) -> Condition {
        Operand::column(column).in_strings(values)
    }
    pub fn in_values<A: Into<Arg>>(
        column: &'static str,
        values: impl IntoIterator<Item = A>,
    ) -> Condition {
        Operand::column(column).in_values(values)
    }
    pub fn between(column: &'static str, low: impl Into<Arg>, high: impl Into<Arg>) -> Condition {
        Operand::column(column).between(low, high)
    }
    pub fn like(column: &'static str, pattern: impl Into<String>) -> Condition {
        Operand::column(column).like(pattern)
    }
    pub fn contains(column: &'static str, value: &str) -> Condition {
        Operand::column(column).contains(value)
    }
    pub fn has_prefix(column: &'static str, value: &str) -> Condition {
        Operand::column(column).has_prefix(value)
    }
    pub fn has_suffix(column: &'static str, value: &str) -> Condition {
        Operand::column(column).has_suffix(value)
    }
    pub fn asc(column: &'static str) -> Template {
        Operand::column(column).asc()
    }
    pub fn desc(column: &'static str) -> Template {
        Operand::column(column).desc()
    }
    pub fn inc(column: &'static str) -> Template {
        Operand::column(column).inc()
    }
    pub fn dec(column: &'static str) -> Template {
        Operand::column(column).dec()
    }
    pub fn avg(column: &'static str) -> Template {
        Operand::column(column).avg()
    }
    pub fn count(column: &'static str) -> Template {
        Operand::column(column).count()
    }
    pub fn max(column: &'static str) -> Template {
        Operand::column(column).max()
    }
    pub fn min(column: &'static str) -> Template {
        Operand::column(column).min()
    }
    pub fn sum(column: &'static str) -> Template {
        Operand::column(column).sum()
    }
    pub fn alias(column: &'static str, name: &'static str) -> Template {
        Operand::column(column).alias(name)
    }
}
