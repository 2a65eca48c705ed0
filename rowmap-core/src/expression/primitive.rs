use crate::{
    Error, Expression, RenderContext, Result, Value, impl_expression_conversions,
};
use std::borrow::Cow;

/// Expression that always fails to render with the carried message.
#[derive(Clone, Debug)]
pub struct Invalid(pub Cow<'static, str>);

impl Invalid {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self(message.into())
    }
}

impl Expression for Invalid {
    fn write(&self, _context: &mut RenderContext, _out: &mut String) -> Result<()> {
        Err(Error::msg(self.0.to_string()))
    }
}

/// Expression rendering nothing, skipped by composite queries that omit empty children.
#[derive(Clone, Copy, Default, Debug)]
pub struct Empty;

impl Expression for Empty {
    fn write(&self, _context: &mut RenderContext, _out: &mut String) -> Result<()> {
        Ok(())
    }
}

/// A single bound value rendered as a placeholder.
#[derive(Clone, Debug)]
pub struct Placeholder(pub Value);

impl Expression for Placeholder {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        let index = context.next_parameter();
        if !context.dialect.write_parameter(out, true, index)
            && !context.dialect.write_parameter(out, false, index)
        {
            return Err(Error::msg(format!(
                "unsupported parameter:{index}: {:?}",
                self.0
            )));
        }
        context.args.push(self.0.clone());
        Ok(())
    }
}

/// SQL text copied verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal(pub Cow<'static, str>);

impl Literal {
    pub fn new(sql: impl Into<Cow<'static, str>>) -> Self {
        Self(sql.into())
    }
}

impl Expression for Literal {
    fn write(&self, _context: &mut RenderContext, out: &mut String) -> Result<()> {
        out.push_str(&self.0);
        Ok(())
    }
}

/// Table, column or alias name, quoted by the dialect when needed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier(pub Cow<'static, str>);

impl Identifier {
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }
}

impl Expression for Identifier {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        if !context.dialect.write_identifier(out, &self.0) {
            return Err(Error::msg(format!("unsupported identifier: {}", self.0)));
        }
        Ok(())
    }
}

/// Dotted identifier path, e.g. `schema.table.column`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Qualifier(pub Vec<Cow<'static, str>>);

impl Qualifier {
    pub fn new<S: Into<Cow<'static, str>>>(parts: impl IntoIterator<Item = S>) -> Self {
        Self(parts.into_iter().map(Into::into).collect())
    }
}

impl Expression for Qualifier {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        if self.0.is_empty() {
            return Err(Error::msg("empty qualifier"));
        }
        let start = out.len();
        for (k, part) in self.0.iter().enumerate() {
            if k > 0 {
                out.push('.');
            }
            if !context.dialect.write_identifier(out, part) {
                out.truncate(start);
                return Err(Error::msg(format!(
                    "unsupported qualifier: {:?}:{k}",
                    self.0
                )));
            }
        }
        Ok(())
    }
}

impl_expression_conversions!(Invalid, Empty, Placeholder, Literal, Identifier, Qualifier);
