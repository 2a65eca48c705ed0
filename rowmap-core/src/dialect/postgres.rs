use super::{Family, sorted};
use crate::{
    ColumnType, Dialect, Expr, Identifier, Modifier, Returning, Value, template,
    write_identifier_with, write_quoted_with,
};
use std::sync::{Arc, LazyLock};

#[derive(Default, Clone, Copy, Debug)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn time_precision(&self) -> u8 {
        6
    }

    fn keywords(&self) -> &[&'static str] {
        &POSTGRES_KEYWORDS
    }

    fn write_parameter(&self, out: &mut String, numbered: bool, index: usize) -> bool {
        if !numbered {
            return false;
        }
        out.push('$');
        out.push_str(itoa::Buffer::new().format(index));
        true
    }

    fn write_identifier(&self, out: &mut String, name: &str) -> bool {
        write_identifier_with(self, out, name, '"')
    }

    fn write_quoted(&self, out: &mut String, region: &str) -> bool {
        write_quoted_with(self, out, region)
    }

    fn column_type(&self, column: &ColumnType) -> Option<(String, String)> {
        let family = Family::of(column);
        if column.modifier == Modifier::AutoIncrement && family == Family::Integer {
            let sql = match column.value {
                Value::Int8(..) | Value::UInt8(..) | Value::Int16(..) | Value::UInt16(..) => {
                    "SMALLSERIAL"
                }
                Value::Int32(..) | Value::UInt32(..) => "SERIAL",
                _ => "BIGSERIAL",
            };
            return Some((sql.into(), String::new()));
        }
        let mut option = match column.modifier {
            Modifier::AutoIncrement | Modifier::ZeroValue => "",
            Modifier::AutoNow | Modifier::AutoNowAdd if family == Family::Time => {
                "DEFAULT CURRENT_TIMESTAMP"
            }
            Modifier::AutoNow | Modifier::AutoNowAdd => "DEFAULT 0",
            Modifier::Version => "DEFAULT 1",
        };
        let zero = column.modifier == Modifier::ZeroValue;
        let sql: String = match family {
            Family::Bool => return Some(("BOOLEAN".into(), "FALSE".into())),
            Family::Integer => {
                if zero {
                    option = "0";
                }
                match column.value {
                    Value::Int8(..) | Value::UInt8(..) | Value::Int16(..) => "SMALLINT",
                    Value::UInt16(..) | Value::Int32(..) => "INTEGER",
                    _ => "BIGINT",
                }
                .into()
            }
            Family::Float => {
                let sql = if matches!(column.value, Value::Float32(..)) {
                    "REAL"
                } else {
                    "DOUBLE PRECISION"
                };
                return Some((sql.into(), "0".into()));
            }
            Family::Time => {
                if zero {
                    option = "'1970-01-01T00:00:00Z'";
                }
                "TIMESTAMP WITH TIME ZONE".into()
            }
            Family::Bytes | Family::Gob => return Some(("BYTEA".into(), String::new())),
            Family::Text | Family::Other => {
                if family == Family::Text {
                    option = "''";
                }
                match column.size {
                    0 => "VARCHAR(255)".into(),
                    n @ 1..=10485760 => format!("VARCHAR({n})"),
                    _ => "TEXT".into(),
                }
            }
        };
        Some((sql, option.into()))
    }

    fn returning(&self, kind: Returning, column: &str) -> Option<Expr> {
        match kind {
            Returning::Create | Returning::Update => Some(Arc::new(template!(
                "RETURNING ?",
                Identifier::new(column.to_string())
            ))),
        }
    }
}

pub static POSTGRES_KEYWORDS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    sorted(&[
        "ALL",
        "ANALYSE",
        "ANALYZE",
        "AND",
        "ANY",
        "ARRAY",
        "AS",
        "ASC",
        "ASYMMETRIC",
        "AUTHORIZATION",
        "BINARY",
        "BOTH",
        "CASE",
        "CAST",
        "CHECK",
        "COLLATE",
        "COLLATION",
        "COLUMN",
        "CONCURRENTLY",
        "CONSTRAINT",
        "CREATE",
        "CROSS",
        "CURRENT_CATALOG",
        "CURRENT_DATE",
        "CURRENT_ROLE",
        "CURRENT_SCHEMA",
        "CURRENT_TIME",
        "CURRENT_TIMESTAMP",
        "CURRENT_USER",
        "DEFAULT",
        "DEFERRABLE",
        "DESC",
        "DISTINCT",
        "DO",
        "ELSE",
        "END",
        "EXCEPT",
        "FALSE",
        "FETCH",
        "FOR",
        "FOREIGN",
        "FREEZE",
        "FROM",
        "FULL",
        "GRANT",
        "GROUP",
        "HAVING",
        "ILIKE",
        "IN",
        "INITIALLY",
        "INNER",
        "INTERSECT",
        "INTO",
        "IS",
        "ISNULL",
        "JOIN",
        "LATERAL",
        "LEADING",
        "LEFT",
        "LIKE",
        "LIMIT",
        "LOCALTIME",
        "LOCALTIMESTAMP",
        "NATURAL",
        "NOT",
        "NOTNULL",
        "NULL",
        "OFFSET",
        "ON",
        "ONLY",
        "OR",
        "ORDER",
        "OUTER",
        "OVERLAPS",
        "PLACING",
        "PRIMARY",
        "REFERENCES",
        "RETURNING",
        "RIGHT",
        "SELECT",
        "SESSION_USER",
        "SIMILAR",
        "SOME",
        "SYMMETRIC",
        "TABLE",
        "TABLESAMPLE",
        "THEN",
        "TO",
        "TRAILING",
        "TRUE",
        "UNION",
        "UNIQUE",
        "USER",
        "USING",
        "VARIADIC",
        "VERBOSE",
        "WHEN",
        "WHERE",
        "WINDOW",
        "WITH",
    ])
});
