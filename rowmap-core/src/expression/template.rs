use crate::{
    Arg, Error, Expression, RenderContext, Result, impl_expression_conversions,
};
use std::{borrow::Cow, collections::HashMap};

const META: &[u8] = b"\"$'?`";

const MARKS: [&str; 5] = [
    "double quote",
    "dollar sign",
    "single quote",
    "question mark",
    "back quote",
];

/// SQL text with placeholders.
///
/// - `?` and `$` take the next argument; `?N` / `$N` take the N-th (1 based). The first
///   occurrence of a value argument binds it, later ones reuse its placeholder.
/// - Expression arguments are rendered inline.
/// - Regions delimited by `'`, `"` or `` ` `` (doubled delimiter as escape) are handed to
///   the dialect, which passes literals through and quotes identifiers its own way.
/// - Every argument must be referenced at least once.
///
/// ```rust
/// use rowmap_core::{Identifier, SqliteDialect, expand, template};
/// let (sql, args) = expand(&template!("? = ?", Identifier::new("x"), 5), false, &SqliteDialect, 1).unwrap();
/// assert_eq!(sql, "x = ?1");
/// assert_eq!(args.len(), 1);
/// ```
#[derive(Clone, Debug)]
pub struct Template {
    pub format: Cow<'static, str>,
    pub args: Vec<Arg>,
}

impl Template {
    pub fn new(format: impl Into<Cow<'static, str>>, args: Vec<Arg>) -> Self {
        Self {
            format: format.into(),
            args,
        }
    }

    fn error(&self, message: &str, position: usize) -> Error {
        Error::msg(format!(
            "{message}: {}:{position} {:?}",
            self.format, self.args
        ))
    }
}

impl Expression for Template {
    fn write(&self, context: &mut RenderContext, out: &mut String) -> Result<()> {
        let format = self.format.as_ref();
        let bytes = format.as_bytes();
        // Argument index to its position in the bound values.
        let mut bound = HashMap::<usize, usize>::with_capacity(self.args.len());
        let mut counter = 0;
        let mut j = 0;
        while j < bytes.len() {
            let Some(k) = META.iter().position(|m| *m == bytes[j]) else {
                let next = bytes[j..]
                    .iter()
                    .position(|b| META.contains(b))
                    .map_or(bytes.len(), |p| j + p);
                out.push_str(&format[j..next]);
                j = next;
                continue;
            };
            let mut l = j + 1;
            match k {
                0 | 2 | 4 => {
                    let mut closed = false;
                    while l < bytes.len() {
                        l += 1;
                        if bytes[l - 1] == bytes[j] {
                            if l < bytes.len() && bytes[l] == bytes[j] {
                                l += 1;
                            } else {
                                closed = true;
                                break;
                            }
                        }
                    }
                    if !closed {
                        return Err(self.error(&format!("unclosed {}", MARKS[k]), j));
                    }
                    if !context.dialect.write_quoted(out, &format[j..l]) {
                        return Err(self.error(&format!("unsupported {}", MARKS[k]), j));
                    }
                }
                _ => {
                    while l < bytes.len() && bytes[l].is_ascii_digit() {
                        l += 1;
                    }
                    let h = if j + 1 == l {
                        counter += 1;
                        counter
                    } else if bytes[j + 1] == b'0' {
                        return Err(self.error("leading zero", j));
                    } else {
                        format[j + 1..l]
                            .parse::<usize>()
                            .map_err(|_| self.error("out of range", j))?
                    };
                    if h < 1 {
                        return Err(self.error("out of range", j));
                    }
                    if h > self.args.len() {
                        return Err(self.error(&format!("too few arguments:{h}"), j));
                    }
                    let h = h - 1;
                    let first = !bound.contains_key(&h);
                    let position = *bound.entry(h).or_insert(context.args.len());
                    match &self.args[h] {
                        Arg::Expr(expression) => {
                            context.expand(expression.as_ref(), false, out)?;
                        }
                        Arg::Value(value) => {
                            let bind = if context.dialect.write_parameter(
                                out,
                                true,
                                context.offset + position,
                            ) {
                                first
                            } else if context.dialect.write_parameter(
                                out,
                                false,
                                context.next_parameter(),
                            ) {
                                true
                            } else {
                                return Err(self.error(
                                    &format!(
                                        "unsupported {} parameter:{}",
                                        MARKS[k],
                                        context.next_parameter()
                                    ),
                                    j,
                                ));
                            };
                            if bind {
                                context.args.push(value.clone());
                            }
                        }
                    }
                }
            }
            j = l;
        }
        if bound.len() < self.args.len() {
            return Err(self.error(&format!("too many arguments:{}", bound.len()), j));
        }
        Ok(())
    }
}

impl_expression_conversions!(Template);

/// Builds a [`Template`] converting every argument into an [`Arg`].
#[macro_export]
macro_rules! template {
    ($format:expr $(, $arg:expr)* $(,)?) => {
        $crate::Template::new($format, vec![$($crate::Arg::from($arg)),*])
    };
}
