/// Wraps `value` into the `quote` character, doubling any occurrence of it.
pub fn quote(value: &str, quote: char) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push(quote);
    for c in value.chars() {
        if c == quote {
            out.push(c);
        }
        out.push(c);
    }
    out.push(quote);
    out
}

/// Converts a quoted region (delimited by any quote character, doubled delimiters as
/// escapes) into the same text quoted with `quote`. `None` when the region is malformed.
pub fn quoted(region: &str, quote: char) -> Option<String> {
    let mut chars = region.chars();
    let delimiter = chars.next()?;
    let inner = chars.as_str().strip_suffix(delimiter)?;
    let mut out = String::with_capacity(region.len() + 2);
    out.push(quote);
    let mut chars = inner.chars().peekable();
    while let Some(c) = chars.next() {
        if c == delimiter {
            if chars.next() != Some(delimiter) {
                return None;
            }
            out.push(c);
            if c == quote {
                out.push(c);
            }
        } else if c == quote {
            out.push(c);
            out.push(c);
        } else {
            out.push(c);
        }
    }
    out.push(quote);
    Some(out)
}

/// Escapes the LIKE wildcards `%`, `_` and the escape character itself with `\`.
pub fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '_' | '%') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Escapes every regular expression meta character with `\`.
pub fn escape_regexp(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '\\' | '.' | '+' | '*' | '?' | '(' | ')' | '|' | '[' | ']' | '{' | '}' | '^' | '$'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Longest prefix of `value` not exceeding `max` bytes that ends on a char boundary.
pub fn prefix_at_most(value: &str, max: usize) -> &str {
    let mut end = value.len().min(max);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

#[macro_export]
macro_rules! truncate_long {
    ($query:expr) => {
        format_args!(
            "{}{}",
            $crate::prefix_at_most(&$query, 497).trim_end(),
            if $query.len() > 497 { "..." } else { "" },
        )
    };
}
