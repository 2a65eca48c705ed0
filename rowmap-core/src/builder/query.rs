use crate::{
    Error, Expr, Expression, Identifier, IntoExpr, Operand, RenderContext, Result, Template,
    impl_expression_conversions, template,
};
use std::{borrow::Cow, sync::Arc};

/// How a [`Query`] treats children rendering to nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryKind {
    /// Empty children are an error, the whole query must render something.
    Never,
    /// Empty children are skipped, a query without output renders nothing.
    Omit,
    /// Like `Omit`, names added with a leading `+` / `-` become `ASC` / `DESC`.
    Order,
    /// Like `Never`, but no children at all renders `*`.
    Star,
}

/// Children joined by a delimiter between a prefix and a suffix.
#[derive(Clone, Debug)]
pub struct Query {
    pub kind: QueryKind,
    pub prefix: Cow<'static, str>,
    pub delimiter: Cow<'static, str>,
    pub suffix: Cow<'static, str>,
    pub children: Vec<Expr>,
}

impl Query {
    pub fn new(
        kind: QueryKind,
        prefix: impl Into<Cow<'static, str>>,
        delimiter: impl Into<Cow<'static, str>>,
        suffix: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            kind,
            prefix: prefix.into(),
            delimiter: delimiter.into(),
            suffix: suffix.into(),
            children: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn push(&mut self, child: impl IntoExpr) -> &mut Self {
        self.children.push(child.into_expr());
        self
    }

    /// Appends expressions.
    pub fn append<E: IntoExpr>(mut self, children: impl IntoIterator<Item = E>) -> Self {
        self.children
            .extend(children.into_iter().map(IntoExpr::into_expr));
        self
    }

    /// Appends column names, honoring the sort prefixes of an order query.
    pub fn add<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        for name in names {
            let name = name.as_ref();
            let child: Expr = match (self.kind, name.as_bytes().first()) {
                (QueryKind::Order, Some(b'+')) => Arc::new(Operand::column(name[1..].to_string()).asc()),
                (QueryKind::Order, Some(b'-')) => {
                    Arc::new(Operand::column(name[1..].to_string()).desc())
                }
                _ => Arc::new(Identifier::new(name.to_string())),
            };
            self.children.push(child);
        }
        self
    }

    /// `(query) AS name`, for subqueries in `FROM` lists.
    pub fn alias(self, name: impl Into<Cow<'static, str>>) -> Template {
        template!("(?) AS ?", self, Identifier::new(name))
    }
}

impl Expression for Query {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        if self.kind == QueryKind::Star && self.children.is_empty() {
            out.push_str(&self.prefix);
            out.push('*');
            out.push_str(&self.suffix);
            return Ok(());
        }
        let omit = matches!(self.kind, QueryKind::Omit | QueryKind::Order);
        let start = out.len();
        out.push_str(&self.prefix);
        let mut written = 0;
        for child in &self.children {
            let mark = out.len();
            if written > 0 {
                out.push_str(&self.delimiter);
            }
            let before = out.len();
            context.expand(child.as_ref(), omit, out)?;
            if out.len() == before {
                out.truncate(mark);
                continue;
            }
            written += 1;
        }
        if written == 0 {
            out.truncate(start);
            if !omit {
                return Err(Error::msg(format!("empty query: {self:?}")));
            }
            return Ok(());
        }
        out.push_str(&self.suffix);
        Ok(())
    }
}

impl_expression_conversions!(Query);
