#[cfg(test)]
mod tests {
    use rowmap_core::{Connection, Executor, Prepared, Value};
    use rowmap_sqlite::SqliteConnection;
    use rowmap_tests::{init_logs, silent_logs};
    use std::{fs, path::Path, sync::Mutex};

    static MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn create_database() {
        init_logs();
        const DB_PATH: &str = "../target/debug/creation.sqlite";
        let _guard = MUTEX.lock().unwrap();
        if Path::new(DB_PATH).exists() {
            fs::remove_file(DB_PATH)
                .unwrap_or_else(|_| panic!("Failed to remove test database file {DB_PATH}"));
        }
        assert!(
            !Path::new(DB_PATH).exists(),
            "Database file should not exist before test"
        );
        SqliteConnection::connect(&format!("sqlite://{DB_PATH}?mode=rwc"))
            .expect("Could not open the database");
        assert!(
            Path::new(DB_PATH).exists(),
            "Database file should be created after connection"
        );
        SqliteConnection::connect(&format!("sqlite://{DB_PATH}?mode=ro"))
            .expect("Could not open the database");
        fs::remove_file(DB_PATH)
            .unwrap_or_else(|_| panic!("Failed to remove existing test database file {DB_PATH}"));
        silent_logs! {
            assert!(
                SqliteConnection::connect(&format!("sqlite://{DB_PATH}?mode=ro")).is_err(),
                "Should not be able to open in read only unexisting database"
            );
        }
    }

    #[test]
    fn in_memory() {
        init_logs();
        let connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        let rows = connection
            .fetch("SELECT ?1 + ?2 AS total", &[2i64.into(), 40i64.into()])
            .expect("Could not run the query");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].names(), ["total".to_string()]);
        assert_eq!(rows[0].values()[0], Value::Int64(Some(42)));
    }

    #[test]
    fn wrong_url() {
        silent_logs! {
            assert!(SqliteConnection::connect("postgres://some_value").is_err());
        }
    }

    #[test]
    fn prepared_statement() {
        init_logs();
        let connection =
            SqliteConnection::connect("sqlite://:memory:").expect("Could not open the database");
        connection
            .execute("CREATE TABLE pairs (a INTEGER, b VARCHAR(255))", &[])
            .expect("Could not create the table");
        {
            let mut prepared = connection
                .prepare("INSERT INTO pairs (a, b) VALUES (?1, ?2)")
                .expect("Could not prepare the insert");
            for (a, b) in [(1i64, "one"), (2, "two"), (3, "three")] {
                let result = prepared
                    .execute(&[a.into(), b.into()])
                    .expect("Could not insert");
                assert_eq!(result.rows_affected, 1);
                assert_eq!(result.last_affected_id, Some(a));
            }
            prepared.close().expect("Could not close the statement");
        }
        let rows = connection
            .fetch("SELECT b FROM pairs WHERE a >= ?1 ORDER BY a", &[2i64.into()])
            .expect("Could not select");
        let names: Vec<_> = rows.iter().map(|v| v.values()[0].clone()).collect();
        let expected: [Value; 2] = ["two".into(), "three".into()];
        assert_eq!(names, expected);
    }
}
