use crate::{
    Arg, Error, Expression, Identifier, Placeholder, RenderContext, Result,
    impl_expression_conversions,
};
use std::borrow::Cow;

/// Alternating `column, value` list rendered through one of two layouts.
///
/// - [`Pairs::set`]: `SET a = ?, b = ?`
/// - [`Pairs::values`]: `(a, b) VALUES (?, ?)`
///
/// Plain values become placeholders, expressions render inline.
#[derive(Clone, Debug)]
pub struct Pairs {
    layout: Layout,
    pub args: Vec<Arg>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layout {
    Set,
    Values,
}

impl Pairs {
    pub fn set() -> Self {
        Self {
            layout: Layout::Set,
            args: Vec::new(),
        }
    }

    pub fn values() -> Self {
        Self {
            layout: Layout::Values,
            args: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Number of entries, columns and values counted separately.
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Appends raw entries. They must alternate column and value.
    pub fn append<A: Into<Arg>>(mut self, args: impl IntoIterator<Item = A>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn add(mut self, column: impl Into<Cow<'static, str>>, value: impl Into<Arg>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: impl Into<Cow<'static, str>>, value: impl Into<Arg>) {
        self.args.push(Identifier::new(column).into());
        self.args.push(value.into());
    }

    fn write_entry(context: &mut RenderContext, arg: &Arg, out: &mut String) -> Result<()> {
        match arg {
            Arg::Value(value) => context.expand(&Placeholder(value.clone()), false, out),
            Arg::Expr(expression) => context.expand(expression.as_ref(), false, out),
        }
    }
}

impl Expression for Pairs {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        if self.args.len() % 2 == 1 {
            return Err(Error::msg(format!(
                "odd pairs: {self:?}:{}",
                self.args.len()
            )));
        }
        if self.args.is_empty() {
            return Err(Error::msg(format!("empty pairs: {self:?}")));
        }
        match self.layout {
            Layout::Set => {
                out.push_str("SET ");
                for (k, arg) in self.args.iter().enumerate() {
                    if k % 2 == 1 {
                        out.push_str(" = ");
                    } else if k > 0 {
                        out.push_str(", ");
                    }
                    Self::write_entry(context, arg, out)?;
                }
            }
            Layout::Values => {
                out.push('(');
                for (k, arg) in self.args.iter().step_by(2).enumerate() {
                    if k > 0 {
                        out.push_str(", ");
                    }
                    Self::write_entry(context, arg, out)?;
                }
                out.push_str(") VALUES (");
                for (k, arg) in self.args.iter().skip(1).step_by(2).enumerate() {
                    if k > 0 {
                        out.push_str(", ");
                    }
                    Self::write_entry(context, arg, out)?;
                }
                out.push(')');
            }
        }
        Ok(())
    }
}

impl_expression_conversions!(Pairs);
