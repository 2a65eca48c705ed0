#[cfg(test)]
mod tests {
    use rowmap_core::{
        ColumnType, Dialect, Encoding, Modifier, MySqlDialect, PostgresDialect, Returning,
        SqliteDialect, StandardDialect, Value, dialect_by_name, expand,
    };

    const DIALECTS: [&dyn Dialect; 4] = [
        &StandardDialect,
        &MySqlDialect,
        &PostgresDialect,
        &SqliteDialect,
    ];

    fn identifier(dialect: &dyn Dialect, name: &str) -> Option<String> {
        let mut out = String::new();
        dialect.write_identifier(&mut out, name).then_some(out)
    }

    fn parameter(dialect: &dyn Dialect, numbered: bool, index: usize) -> Option<String> {
        let mut out = String::new();
        dialect
            .write_parameter(&mut out, numbered, index)
            .then_some(out)
    }

    fn column(
        dialect: &dyn Dialect,
        value: Value,
        encoding: Option<Encoding>,
        size: u32,
        modifier: Modifier,
    ) -> (String, String) {
        dialect
            .column_type(&ColumnType {
                name: "c",
                value: &value,
                encoding,
                size,
                modifier,
            })
            .expect("The column type should be supported")
    }

    fn pair(sql: &str, option: &str) -> (String, String) {
        (sql.to_string(), option.to_string())
    }

    #[test]
    fn names() {
        assert_eq!(dialect_by_name("mysql").name(), "mysql");
        assert_eq!(dialect_by_name("MariaDB").name(), "mysql");
        assert_eq!(dialect_by_name("postgresql").name(), "postgres");
        assert_eq!(dialect_by_name("Postgres").name(), "postgres");
        assert_eq!(dialect_by_name("sqlite").name(), "sqlite3");
        assert_eq!(dialect_by_name("sqlite3").name(), "sqlite3");
        assert_eq!(dialect_by_name("oracle").name(), "standard");
        assert_eq!(dialect_by_name("").name(), "standard");

        assert_eq!(MySqlDialect.time_precision(), 0);
        assert_eq!(PostgresDialect.time_precision(), 6);
        assert_eq!(SqliteDialect.time_precision(), 9);
    }

    #[test]
    fn keywords() {
        for dialect in DIALECTS {
            let keywords = dialect.keywords();
            assert!(!keywords.is_empty());
            assert!(
                keywords.windows(2).all(|v| v[0] < v[1]),
                "{} keywords are sorted",
                dialect.name()
            );
            assert!(keywords.iter().all(|v| v.to_ascii_uppercase() == *v));
            assert!(dialect.is_keyword("select"));
            assert!(dialect.is_keyword("Where"));
            assert!(!dialect.is_keyword("customer"));
        }
        assert!(SqliteDialect.is_keyword("autoincrement"));
        assert!(!PostgresDialect.is_keyword("autoincrement"));
        assert!(MySqlDialect.is_keyword("unsigned"));
        assert!(PostgresDialect.is_keyword("returning"));
    }

    #[test]
    fn identifiers() {
        for dialect in DIALECTS {
            assert_eq!(identifier(dialect, "name").as_deref(), Some("name"));
            assert_eq!(identifier(dialect, "_n2").as_deref(), Some("_n2"));
            assert_eq!(identifier(dialect, ""), None);
            assert_eq!(identifier(dialect, "a\"b"), None);
            assert_eq!(identifier(dialect, "a'b"), None);
            assert_eq!(identifier(dialect, "a`b"), None);
            assert_eq!(identifier(dialect, "a\\b"), None);
            assert_eq!(identifier(dialect, "a\0b"), None);
            assert_eq!(identifier(dialect, &"x".repeat(64)), None);
            assert!(identifier(dialect, &"x".repeat(63)).is_some());
        }
        assert_eq!(identifier(&SqliteDialect, "Name").as_deref(), Some("\"Name\""));
        assert_eq!(identifier(&SqliteDialect, "1st").as_deref(), Some("\"1st\""));
        assert_eq!(identifier(&SqliteDialect, "two words").as_deref(), Some("\"two words\""));
        assert_eq!(identifier(&SqliteDialect, "table").as_deref(), Some("\"table\""));
        assert_eq!(identifier(&MySqlDialect, "order").as_deref(), Some("`order`"));
        assert_eq!(identifier(&MySqlDialect, "Name").as_deref(), Some("`Name`"));
        assert_eq!(identifier(&PostgresDialect, "user").as_deref(), Some("\"user\""));
        assert_eq!(identifier(&StandardDialect, "user").as_deref(), Some("user"));
    }

    #[test]
    fn parameters() {
        assert_eq!(parameter(&StandardDialect, false, 4).as_deref(), Some("?"));
        assert_eq!(parameter(&StandardDialect, true, 4), None);
        assert_eq!(parameter(&MySqlDialect, false, 4).as_deref(), Some("?"));
        assert_eq!(parameter(&MySqlDialect, true, 4), None);
        assert_eq!(parameter(&PostgresDialect, false, 4), None);
        assert_eq!(parameter(&PostgresDialect, true, 4).as_deref(), Some("$4"));
        assert_eq!(parameter(&SqliteDialect, false, 4).as_deref(), Some("?"));
        assert_eq!(parameter(&SqliteDialect, true, 12).as_deref(), Some("?12"));
    }

    #[test]
    fn quoted_regions() {
        let quoted = |dialect: &dyn Dialect, region: &str| {
            let mut out = String::new();
            dialect.write_quoted(&mut out, region).then_some(out)
        };
        for dialect in DIALECTS {
            assert_eq!(quoted(dialect, "'it''s'").as_deref(), Some("'it''s'"));
            assert_eq!(quoted(dialect, "\"plain\"").as_deref(), Some("plain"));
            assert_eq!(quoted(dialect, "\"a\"\"b\""), None);
        }
        assert_eq!(quoted(&MySqlDialect, "\"Mixed\"").as_deref(), Some("`Mixed`"));
        assert_eq!(quoted(&StandardDialect, "`Mixed`").as_deref(), Some("\"Mixed\""));
        assert_eq!(quoted(&StandardDialect, "'bad'x'"), None);
    }

    #[test]
    fn auto_increment_types() {
        let id = |dialect: &dyn Dialect, value: Value| {
            column(dialect, value, None, 0, Modifier::AutoIncrement)
        };
        assert_eq!(id(&PostgresDialect, Value::Int64(None)), pair("BIGSERIAL", ""));
        assert_eq!(id(&PostgresDialect, Value::Int32(None)), pair("SERIAL", ""));
        assert_eq!(id(&PostgresDialect, Value::Int16(None)), pair("SMALLSERIAL", ""));
        assert_eq!(id(&MySqlDialect, Value::Int64(None)), pair("BIGINT", "AUTO_INCREMENT"));
        assert_eq!(
            id(&MySqlDialect, Value::UInt32(None)),
            pair("INT UNSIGNED", "AUTO_INCREMENT")
        );
        assert_eq!(id(&SqliteDialect, Value::Int64(None)), pair("INTEGER", "AUTOINCREMENT"));
    }

    #[test]
    fn scalar_types() {
        let zero = Modifier::ZeroValue;
        assert_eq!(
            column(&StandardDialect, Value::Int64(None), None, 0, zero),
            pair("BIGINT", "0")
        );
        assert_eq!(
            column(&StandardDialect, Value::Varchar(None), None, 0, zero),
            pair("VARCHAR(255)", "''")
        );
        assert_eq!(
            column(&MySqlDialect, Value::Int8(None), None, 0, zero),
            pair("TINYINT", "0")
        );
        assert_eq!(
            column(&MySqlDialect, Value::UInt16(None), None, 0, zero),
            pair("SMALLINT UNSIGNED", "0")
        );
        assert_eq!(
            column(&MySqlDialect, Value::Float32(None), None, 0, zero),
            pair("FLOAT", "0")
        );
        assert_eq!(
            column(&MySqlDialect, Value::Varchar(None), None, 70000, zero),
            pair("LONGTEXT", "")
        );
        assert_eq!(
            column(&MySqlDialect, Value::Blob(None), None, 0, zero),
            pair("LONGBLOB", "")
        );
        assert_eq!(
            column(&PostgresDialect, Value::Float32(None), None, 0, zero),
            pair("REAL", "0")
        );
        assert_eq!(
            column(&PostgresDialect, Value::UInt16(None), None, 0, zero),
            pair("INTEGER", "0")
        );
        assert_eq!(
            column(&PostgresDialect, Value::Varchar(None), None, 20, zero),
            pair("VARCHAR(20)", "''")
        );
        assert_eq!(
            column(&PostgresDialect, Value::Blob(None), None, 0, zero),
            pair("BYTEA", "")
        );
        assert_eq!(
            column(&SqliteDialect, Value::Varchar(None), None, 300, zero),
            pair("TEXT", "''")
        );
        assert_eq!(
            column(&SqliteDialect, Value::Float64(None), None, 0, zero),
            pair("REAL", "0")
        );
        for dialect in DIALECTS {
            assert_eq!(
                column(dialect, Value::Boolean(None), None, 0, zero),
                pair("BOOLEAN", "FALSE")
            );
        }
    }

    #[test]
    fn temporal_types() {
        let time = Value::TimestampWithTimezone(None);
        assert_eq!(
            column(&PostgresDialect, time.clone(), None, 0, Modifier::ZeroValue),
            pair("TIMESTAMP WITH TIME ZONE", "'1970-01-01T00:00:00Z'")
        );
        assert_eq!(
            column(&PostgresDialect, time.clone(), None, 0, Modifier::AutoNow),
            pair("TIMESTAMP WITH TIME ZONE", "DEFAULT CURRENT_TIMESTAMP")
        );
        assert_eq!(
            column(&MySqlDialect, time.clone(), None, 0, Modifier::AutoNow),
            pair(
                "DATETIME",
                "DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP"
            )
        );
        assert_eq!(
            column(&MySqlDialect, time.clone(), None, 0, Modifier::AutoNowAdd),
            pair("DATETIME", "DEFAULT CURRENT_TIMESTAMP")
        );
        assert_eq!(
            column(&SqliteDialect, time, None, 0, Modifier::ZeroValue),
            pair("DATETIME", "'1970-01-01T00:00:00Z'")
        );
        assert_eq!(
            column(&MySqlDialect, Value::Int64(None), None, 0, Modifier::AutoNowAdd),
            pair("BIGINT", "DEFAULT 0")
        );
        assert_eq!(
            column(&MySqlDialect, Value::Int32(None), None, 0, Modifier::Version),
            pair("INT", "DEFAULT 1")
        );
        assert_eq!(
            column(&SqliteDialect, Value::Int16(None), None, 0, Modifier::Version),
            pair("INTEGER", "DEFAULT 1")
        );
    }

    #[test]
    fn encoded_types() {
        let gob = Some(Encoding::Gob);
        let json = Some(Encoding::Json);
        assert_eq!(
            column(&MySqlDialect, Value::Blob(None), gob, 0, Modifier::ZeroValue),
            pair("LONGBLOB", "")
        );
        assert_eq!(
            column(&PostgresDialect, Value::Blob(None), gob, 0, Modifier::ZeroValue),
            pair("BYTEA", "")
        );
        assert_eq!(
            column(&SqliteDialect, Value::Varchar(None), json, 0, Modifier::ZeroValue),
            pair("VARCHAR(255)", "''")
        );
        assert_eq!(
            column(&PostgresDialect, Value::Varchar(None), json, 20000000, Modifier::ZeroValue),
            pair("TEXT", "''")
        );
    }

    #[test]
    fn statements() {
        let mut out = String::new();
        StandardDialect.write_create_table(
            &mut out,
            "t",
            &["a BIGINT".to_string(), "b BOOLEAN".to_string()],
            true,
            true,
        );
        assert_eq!(
            out,
            "CREATE TEMPORARY TABLE IF NOT EXISTS t (\n\ta BIGINT,\n\tb BOOLEAN\n);\n"
        );
        let mut out = String::new();
        SqliteDialect.write_create_table(&mut out, "t", &["a INTEGER".to_string()], false, false);
        assert_eq!(out, "CREATE TABLE t (\n\ta INTEGER\n);\n");

        for dialect in DIALECTS {
            let mut out = String::new();
            dialect.write_transaction_begin(&mut out);
            dialect.write_transaction_commit(&mut out);
            dialect.write_transaction_rollback(&mut out);
            assert_eq!(out, "BEGIN;COMMIT;ROLLBACK;");
        }

        let returning = PostgresDialect
            .returning(Returning::Create, "id")
            .expect("Postgres returns generated columns");
        let (sql, args) = expand(&returning, false, &PostgresDialect, 1).unwrap();
        assert_eq!(sql, "RETURNING id");
        assert!(args.is_empty());
        assert!(PostgresDialect.returning(Returning::Update, "version").is_some());
        assert!(SqliteDialect.returning(Returning::Create, "id").is_none());
        assert!(MySqlDialect.returning(Returning::Create, "id").is_none());
    }
}
