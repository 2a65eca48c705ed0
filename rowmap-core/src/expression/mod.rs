mod operand;
mod primitive;
mod template;

pub use operand::*;
pub use primitive::*;
pub use template::*;

use crate::{AsValue, Dialect, Error, Result, Value};
use std::{fmt::Debug, sync::Arc};

/// Shared, type erased expression.
pub type Expr = Arc<dyn Expression>;

/// A fragment of SQL able to render itself for a dialect.
///
/// Rendering appends the SQL text to `out` and the bound values to the context, in
/// placeholder order. Implementations must not leave partial output behind on error: the
/// caller discards the whole buffer.
pub trait Expression: Debug + Send + Sync {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()>;
}

impl<E: Expression + ?Sized> Expression for Arc<E> {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        (**self).write(context, out)
    }
}

impl<E: Expression + ?Sized> Expression for &E {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        (**self).write(context, out)
    }
}

/// Rendering state shared by a whole expression tree.
pub struct RenderContext<'d> {
    pub dialect: &'d dyn Dialect,
    /// Number of the first placeholder of the tree (1 based).
    pub offset: usize,
    /// Values bound so far, in placeholder order.
    pub args: Vec<Value>,
}

impl<'d> RenderContext<'d> {
    pub fn new(dialect: &'d dyn Dialect, offset: usize) -> Self {
        Self {
            dialect,
            offset,
            args: Vec::new(),
        }
    }

    /// Number of the placeholder the next bound value will take.
    pub fn next_parameter(&self) -> usize {
        self.offset + self.args.len()
    }

    /// Renders a nested expression, checking that it produced well formed output.
    pub fn expand(
        &mut self,
        expression: &dyn Expression,
        omit_empty: bool,
        out: &mut String,
    ) -> Result<()> {
        let start = out.len();
        let bound = self.args.len();
        expression.write(self, out)?;
        let written = out.len() - start;
        if written < self.args.len() - bound {
            return Err(Error::msg(format!("malformed expression: {expression:?}")));
        }
        if written == 0 && !omit_empty {
            return Err(Error::msg(format!("empty expression: {expression:?}")));
        }
        Ok(())
    }
}

/// Renders `expression` to SQL text and its ordered arguments.
///
/// `offset` is the number given to the first placeholder, normally 1. An empty
/// rendering is an error unless `omit_empty` is set.
pub fn expand(
    expression: &dyn Expression,
    omit_empty: bool,
    dialect: &dyn Dialect,
    offset: usize,
) -> Result<(String, Vec<Value>)> {
    let mut context = RenderContext::new(dialect, offset);
    let mut out = String::with_capacity(128);
    context.expand(expression, omit_empty, &mut out)?;
    Ok((out, context.args))
}

/// Template argument: either a value bound to a placeholder or an expression rendered
/// inline.
#[derive(Clone, Debug)]
pub enum Arg {
    Value(Value),
    Expr(Expr),
}

impl Arg {
    /// True for a bound NULL value.
    pub fn is_null(&self) -> bool {
        matches!(self, Arg::Value(v) if v.is_null())
    }
}

impl<T: AsValue> From<T> for Arg {
    fn from(value: T) -> Self {
        Arg::Value(value.as_value())
    }
}

impl From<&str> for Arg {
    fn from(value: &str) -> Self {
        Arg::Value(value.into())
    }
}

impl From<Value> for Arg {
    fn from(value: Value) -> Self {
        Arg::Value(value)
    }
}

impl From<Expr> for Arg {
    fn from(value: Expr) -> Self {
        Arg::Expr(value)
    }
}

/// Conversion into an expression operand. Strings become identifiers.
pub trait IntoExpr {
    fn into_expr(self) -> Expr;
}

impl IntoExpr for &str {
    fn into_expr(self) -> Expr {
        Arc::new(Identifier::new(self.to_string()))
    }
}

impl IntoExpr for String {
    fn into_expr(self) -> Expr {
        Arc::new(Identifier::new(self))
    }
}

impl IntoExpr for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

/// Implements [`IntoExpr`] and `From<_> for Arg` for expression types.
#[macro_export]
macro_rules! impl_expression_conversions {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::IntoExpr for $ty {
                fn into_expr(self) -> $crate::Expr {
                    ::std::sync::Arc::new(self)
                }
            }
            impl From<$ty> for $crate::Arg {
                fn from(value: $ty) -> Self {
                    $crate::Arg::Expr(::std::sync::Arc::new(value))
                }
            }
        )+
    };
}
