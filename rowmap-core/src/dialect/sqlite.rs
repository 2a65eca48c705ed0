use super::{Family, sorted};
use crate::{ColumnType, Dialect, Modifier, write_identifier_with, write_quoted_with};
use std::sync::LazyLock;

#[derive(Default, Clone, Copy, Debug)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite3"
    }

    fn time_precision(&self) -> u8 {
        9
    }

    fn keywords(&self) -> &[&'static str] {
        &SQLITE_KEYWORDS
    }

    fn write_parameter(&self, out: &mut String, numbered: bool, index: usize) -> bool {
        out.push('?');
        if numbered {
            out.push_str(itoa::Buffer::new().format(index));
        }
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
        let mut option = match column.modifier {
            Modifier::AutoIncrement => "AUTOINCREMENT",
            Modifier::AutoNow | Modifier::AutoNowAdd if family == Family::Time => {
                "DEFAULT CURRENT_TIMESTAMP"
            }
            Modifier::AutoNow | Modifier::AutoNowAdd => "DEFAULT 0",
            Modifier::Version => "DEFAULT 1",
            Modifier::ZeroValue => "",
        };
        let zero = column.modifier == Modifier::ZeroValue;
        let result = match family {
            Family::Bool => ("BOOLEAN".into(), "FALSE"),
            Family::Integer => {
                if zero {
                    option = "0";
                }
                ("INTEGER".into(), option)
            }
            Family::Float => ("REAL".into(), "0"),
            Family::Time => {
                if zero {
                    option = "'1970-01-01T00:00:00Z'";
                }
                ("DATETIME".into(), option)
            }
            Family::Bytes | Family::Gob => ("BLOB".into(), ""),
            Family::Text | Family::Other => {
                if family == Family::Text {
                    option = "''";
                }
                let sql = match column.size {
                    0 => "VARCHAR(255)".into(),
                    n @ 1..=255 => format!("VARCHAR({n})"),
                    _ => "TEXT".into(),
                };
                (sql, option)
            }
        };
        Some((result.0, result.1.into()))
    }
}

pub static SQLITE_KEYWORDS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    sorted(&[
        "ABORT",
        "ACTION",
        "ADD",
        "AFTER",
        "ALL",
        "ALTER",
        "ANALYZE",
        "AND",
        "AS",
        "ASC",
        "ATTACH",
        "AUTOINCREMENT",
        "BEFORE",
        "BEGIN",
        "BETWEEN",
        "BY",
        "CASCADE",
        "CASE",
        "CAST",
        "CHECK",
        "COLLATE",
        "COLUMN",
        "COMMIT",
        "CONFLICT",
        "CONSTRAINT",
        "CREATE",
        "CROSS",
        "CURRENT_DATE",
        "CURRENT_TIME",
        "CURRENT_TIMESTAMP",
        "DATABASE",
        "DEFAULT",
        "DEFERRABLE",
        "DEFERRED",
        "DELETE",
        "DESC",
        "DETACH",
        "DISTINCT",
        "DROP",
        "EACH",
        "ELSE",
        "END",
        "ESCAPE",
        "EXCEPT",
        "EXCLUSIVE",
        "EXISTS",
        "EXPLAIN",
        "FAIL",
        "FOR",
        "FOREIGN",
        "FROM",
        "FULL",
        "GLOB",
        "GROUP",
        "HAVING",
        "IF",
        "IGNORE",
        "IMMEDIATE",
        "IN",
        "INDEX",
        "INDEXED",
        "INITIALLY",
        "INNER",
        "INSERT",
        "INSTEAD",
        "INTERSECT",
        "INTO",
        "IS",
        "ISNULL",
        "JOIN",
        "KEY",
        "LEFT",
        "LIKE",
        "LIMIT",
        "MATCH",
        "NATURAL",
        "NO",
        "NOT",
        "NOTNULL",
        "NULL",
        "OF",
        "OFFSET",
        "ON",
        "OR",
        "ORDER",
        "OUTER",
        "PLAN",
        "PRAGMA",
        "PRIMARY",
        "QUERY",
        "RAISE",
        "RECURSIVE",
        "REFERENCES",
        "REGEXP",
        "REINDEX",
        "RELEASE",
        "RENAME",
        "REPLACE",
        "RESTRICT",
        "RIGHT",
        "ROLLBACK",
        "ROW",
        "SAVEPOINT",
        "SELECT",
        "SET",
        "TABLE",
        "TEMP",
        "TEMPORARY",
        "THEN",
        "TO",
        "TRANSACTION",
        "TRIGGER",
        "UNION",
        "UNIQUE",
        "UPDATE",
        "USING",
        "VACUUM",
        "VALUES",
        "VIEW",
        "VIRTUAL",
        "WHEN",
        "WHERE",
        "WITH",
        "WITHOUT",
    ])
});
