use super::{Family, sorted};
use crate::{ColumnType, Dialect, Modifier, quoted, write_identifier_with};
use std::sync::LazyLock;

/// Dialect used when the database is not recognized: `?` placeholders, `"` identifiers.
#[derive(Default, Clone, Copy, Debug)]
pub struct StandardDialect;

impl Dialect for StandardDialect {
    fn name(&self) -> &'static str {
        "standard"
    }

    fn time_precision(&self) -> u8 {
        6
    }

    fn keywords(&self) -> &[&'static str] {
        &STANDARD_KEYWORDS
    }

    fn write_parameter(&self, out: &mut String, numbered: bool, _index: usize) -> bool {
        if numbered {
            return false;
        }
        out.push('?');
        true
    }

    fn write_identifier(&self, out: &mut String, name: &str) -> bool {
        write_identifier_with(self, out, name, '"')
    }

    fn write_quoted(&self, out: &mut String, region: &str) -> bool {
        if region.starts_with('\'') {
            return match quoted(region, '\'') {
                Some(literal) => {
                    out.push_str(&literal);
                    true
                }
                None => false,
            };
        }
        let mut chars = region.chars();
        let Some(delimiter) = chars.next() else {
            return false;
        };
        match chars.as_str().strip_suffix(delimiter) {
            Some(inner) => self.write_identifier(out, inner),
            None => false,
        }
    }

    fn column_type(&self, column: &ColumnType) -> Option<(String, String)> {
        let family = Family::of(column);
        let option = match (column.modifier, family) {
            (Modifier::AutoNow | Modifier::AutoNowAdd, Family::Time) => "DEFAULT CURRENT_TIMESTAMP",
            (Modifier::AutoNow | Modifier::AutoNowAdd, _) => "DEFAULT 0",
            (Modifier::Version, _) => "DEFAULT 1",
            (Modifier::ZeroValue, Family::Integer | Family::Float) => "0",
            (Modifier::ZeroValue, Family::Bool) => "FALSE",
            (Modifier::ZeroValue, Family::Text) => "''",
            _ => "",
        };
        let sql = match family {
            Family::Bool => "BOOLEAN".into(),
            Family::Integer => "BIGINT".into(),
            Family::Float => "DOUBLE PRECISION".into(),
            Family::Time => "TIMESTAMP".into(),
            Family::Bytes | Family::Gob => "BLOB".into(),
            Family::Text | Family::Other => match column.size {
                0 => "VARCHAR(255)".into(),
                n => format!("VARCHAR({n})"),
            },
        };
        Some((sql, option.into()))
    }
}

pub static STANDARD_KEYWORDS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    sorted(&[
        "ALL",
        "ALTER",
        "AND",
        "ANY",
        "AS",
        "ASC",
        "BETWEEN",
        "BY",
        "CASE",
        "CAST",
        "CHECK",
        "COLUMN",
        "CONSTRAINT",
        "CREATE",
        "CROSS",
        "CURRENT_DATE",
        "CURRENT_TIME",
        "CURRENT_TIMESTAMP",
        "DEFAULT",
        "DELETE",
        "DESC",
        "DISTINCT",
        "DROP",
        "ELSE",
        "END",
        "EXCEPT",
        "EXISTS",
        "FALSE",
        "FOR",
        "FOREIGN",
        "FROM",
        "FULL",
        "GROUP",
        "HAVING",
        "IN",
        "INNER",
        "INSERT",
        "INTERSECT",
        "INTO",
        "IS",
        "JOIN",
        "KEY",
        "LEFT",
        "LIKE",
        "LIMIT",
        "NATURAL",
        "NOT",
        "NULL",
        "OFFSET",
        "ON",
        "OR",
        "ORDER",
        "OUTER",
        "PRIMARY",
        "REFERENCES",
        "RIGHT",
        "SELECT",
        "SET",
        "TABLE",
        "THEN",
        "TO",
        "TRUE",
        "UNION",
        "UNIQUE",
        "UPDATE",
        "USING",
        "VALUES",
        "WHEN",
        "WHERE",
        "WITH",
    ])
});
