use super::{Family, sorted};
use crate::{ColumnType, Dialect, Modifier, Value, quoted, write_identifier_with};
use std::sync::LazyLock;

#[derive(Default, Clone, Copy, Debug)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn time_precision(&self) -> u8 {
        0
    }

    fn keywords(&self) -> &[&'static str] {
        &MYSQL_KEYWORDS
    }

    fn write_parameter(&self, out: &mut String, numbered: bool, _index: usize) -> bool {
        if numbered {
            return false;
        }
        out.push('?');
        true
    }

    fn write_identifier(&self, out: &mut String, name: &str) -> bool {
        write_identifier_with(self, out, name, '`')
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
        let mut option = match column.modifier {
            Modifier::AutoIncrement => "AUTO_INCREMENT",
            Modifier::AutoNow if family == Family::Time => {
                "DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP"
            }
            Modifier::AutoNowAdd if family == Family::Time => "DEFAULT CURRENT_TIMESTAMP",
            Modifier::AutoNow | Modifier::AutoNowAdd => "DEFAULT 0",
            Modifier::Version => "DEFAULT 1",
            Modifier::ZeroValue => "",
        };
        let zero = column.modifier == Modifier::ZeroValue;
        let sql: String = match family {
            Family::Bool => return Some(("BOOLEAN".into(), "FALSE".into())),
            Family::Integer => {
                if zero {
                    option = "0";
                }
                let sql = match column.value {
                    Value::Int8(..) | Value::UInt8(..) => "TINYINT",
                    Value::Int16(..) | Value::UInt16(..) => "SMALLINT",
                    Value::Int32(..) | Value::UInt32(..) => "INT",
                    _ => "BIGINT",
                };
                if column.value.is_unsigned() {
                    format!("{sql} UNSIGNED")
                } else {
                    sql.into()
                }
            }
            Family::Float => {
                let sql = if matches!(column.value, Value::Float32(..)) {
                    "FLOAT"
                } else {
                    "DOUBLE"
                };
                return Some((sql.into(), "0".into()));
            }
            Family::Time => {
                if zero {
                    option = "'1970-01-01 00:00:01'";
                }
                "DATETIME".into()
            }
            Family::Bytes | Family::Gob => return Some(("LONGBLOB".into(), String::new())),
            Family::Text | Family::Other => {
                match column.size {
                    0 => "VARCHAR(255)".into(),
                    n @ 1..=65535 => format!("VARCHAR({n})"),
                    _ => return Some(("LONGTEXT".into(), String::new())),
                }
            }
        };
        if family == Family::Text {
            option = "''";
        }
        Some((sql, option.into()))
    }
}

pub static MYSQL_KEYWORDS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    sorted(&[
        "ACCESSIBLE",
        "ADD",
        "ALL",
        "ALTER",
        "ANALYZE",
        "AND",
        "AS",
        "ASC",
        "ASENSITIVE",
        "BEFORE",
        "BETWEEN",
        "BIGINT",
        "BINARY",
        "BLOB",
        "BOTH",
        "BY",
        "CALL",
        "CASCADE",
        "CASE",
        "CHANGE",
        "CHAR",
        "CHARACTER",
        "CHECK",
        "COLLATE",
        "COLUMN",
        "CONDITION",
        "CONSTRAINT",
        "CONTINUE",
        "CONVERT",
        "CREATE",
        "CROSS",
        "CURRENT_DATE",
        "CURRENT_TIME",
        "CURRENT_TIMESTAMP",
        "CURRENT_USER",
        "CURSOR",
        "DATABASE",
        "DATABASES",
        "DAY_HOUR",
        "DAY_MICROSECOND",
        "DAY_MINUTE",
        "DAY_SECOND",
        "DEC",
        "DECIMAL",
        "DECLARE",
        "DEFAULT",
        "DELAYED",
        "DELETE",
        "DESC",
        "DESCRIBE",
        "DETERMINISTIC",
        "DISTINCT",
        "DISTINCTROW",
        "DIV",
        "DOUBLE",
        "DROP",
        "DUAL",
        "EACH",
        "ELSE",
        "ELSEIF",
        "ENCLOSED",
        "ESCAPED",
        "EXISTS",
        "EXIT",
        "EXPLAIN",
        "FALSE",
        "FETCH",
        "FLOAT",
        "FOR",
        "FORCE",
        "FOREIGN",
        "FROM",
        "FULLTEXT",
        "GRANT",
        "GROUP",
        "HAVING",
        "HIGH_PRIORITY",
        "HOUR_MICROSECOND",
        "HOUR_MINUTE",
        "HOUR_SECOND",
        "IF",
        "IGNORE",
        "IN",
        "INDEX",
        "INFILE",
        "INNER",
        "INOUT",
        "INSENSITIVE",
        "INSERT",
        "INT",
        "INTEGER",
        "INTERVAL",
        "INTO",
        "IS",
        "ITERATE",
        "JOIN",
        "KEY",
        "KEYS",
        "KILL",
        "LEADING",
        "LEAVE",
        "LEFT",
        "LIKE",
        "LIMIT",
        "LINEAR",
        "LINES",
        "LOAD",
        "LOCALTIME",
        "LOCALTIMESTAMP",
        "LOCK",
        "LONG",
        "LONGBLOB",
        "LONGTEXT",
        "LOOP",
        "LOW_PRIORITY",
        "MATCH",
        "MEDIUMBLOB",
        "MEDIUMINT",
        "MEDIUMTEXT",
        "MINUTE_MICROSECOND",
        "MINUTE_SECOND",
        "MOD",
        "MODIFIES",
        "NATURAL",
        "NOT",
        "NO_WRITE_TO_BINLOG",
        "NULL",
        "NUMERIC",
        "ON",
        "OPTIMIZE",
        "OPTION",
        "OPTIONALLY",
        "OR",
        "ORDER",
        "OUT",
        "OUTER",
        "OUTFILE",
        "PRECISION",
        "PRIMARY",
        "PROCEDURE",
        "PURGE",
        "RANGE",
        "READ",
        "READS",
        "REAL",
        "REFERENCES",
        "REGEXP",
        "RELEASE",
        "RENAME",
        "REPEAT",
        "REPLACE",
        "REQUIRE",
        "RESTRICT",
        "RETURN",
        "REVOKE",
        "RIGHT",
        "RLIKE",
        "SCHEMA",
        "SCHEMAS",
        "SECOND_MICROSECOND",
        "SELECT",
        "SENSITIVE",
        "SEPARATOR",
        "SET",
        "SHOW",
        "SMALLINT",
        "SPATIAL",
        "SPECIFIC",
        "SQL",
        "SQLEXCEPTION",
        "SQLSTATE",
        "SQLWARNING",
        "SQL_BIG_RESULT",
        "SQL_CALC_FOUND_ROWS",
        "SQL_SMALL_RESULT",
        "SSL",
        "STARTING",
        "STRAIGHT_JOIN",
        "TABLE",
        "TERMINATED",
        "THEN",
        "TINYBLOB",
        "TINYINT",
        "TINYTEXT",
        "TO",
        "TRAILING",
        "TRIGGER",
        "TRUE",
        "UNDO",
        "UNION",
        "UNIQUE",
        "UNLOCK",
        "UNSIGNED",
        "UPDATE",
        "USAGE",
        "USE",
        "USING",
        "UTC_DATE",
        "UTC_TIME",
        "UTC_TIMESTAMP",
        "VALUES",
        "VARBINARY",
        "VARCHAR",
        "VARCHARACTER",
        "VARYING",
        "WHEN",
        "WHERE",
        "WHILE",
        "WITH",
        "WRITE",
        "XOR",
        "YEAR_MONTH",
        "ZEROFILL",
    ])
});
