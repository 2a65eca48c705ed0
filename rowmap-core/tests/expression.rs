#[cfg(test)]
mod tests {
    use rowmap_core::{
        Condition, Dialect, Empty, Expression, Identifier, Invalid, Literal, MySqlDialect,
        Operand, PostgresDialect, Qualifier, SqliteDialect, StandardDialect, Value, column, cond,
        expand, iq, template,
    };

    fn render(dialect: &dyn Dialect, expression: &dyn Expression) -> (String, Vec<Value>) {
        expand(expression, false, dialect, 1).expect("Failed to render the expression")
    }

    fn error(expression: &dyn Expression) -> String {
        let error = expand(expression, false, &SqliteDialect, 1)
            .expect_err("The expression should not render");
        format!("{error:#}")
    }

    macro_rules! test_sql {
        ($expression:expr, $sql:literal $(, $arg:expr)* $(,)?) => {{
            let (sql, args) = render(&SqliteDialect, &$expression);
            assert_eq!(sql, $sql);
            let expected: Vec<Value> = vec![$(Value::from($arg)),*];
            assert_eq!(args, expected);
        }};
    }

    #[test]
    fn placeholders() {
        test_sql!(template!("? = ?", Identifier::new("x"), 5), "x = ?1", 5);
        test_sql!(template!("?1 + ?1 + ?2", 1, 2), "?1 + ?1 + ?2", 1, 2);
        test_sql!(template!("?2 > ?1", 1, 2), "?1 > ?2", 2, 1);
        test_sql!(template!("$ < $", 1, 2), "?1 < ?2", 1, 2);
        test_sql!(template!("COUNT(*)"), "COUNT(*)");

        let reused = template!("?1 + ?1 + ?2", 1, 2);
        let (sql, args) = render(&MySqlDialect, &reused);
        assert_eq!(sql, "? + ? + ?");
        assert_eq!(args, [Value::from(1), Value::from(1), Value::from(2)]);
        let (sql, args) = render(&PostgresDialect, &reused);
        assert_eq!(sql, "$1 + $1 + $2");
        assert_eq!(args.len(), 2);
        let (sql, _) = render(&StandardDialect, &reused);
        assert_eq!(sql, "? + ? + ?");

        let (sql, _) = expand(&template!("a = ?", 1), false, &PostgresDialect, 3).unwrap();
        assert_eq!(sql, "a = $3", "Numbering starts at the offset");
    }

    #[test]
    fn nested() {
        let inner = template!("? + ?", Identifier::new("a"), 1);
        test_sql!(template!("? < ?", inner, 10), "a + ?1 < ?2", 1, 10);
        test_sql!(
            template!("? AND ?", cond!("a = ?", 1), cond!("b = ?", 2)),
            "a = ?1 AND b = ?2",
            1,
            2
        );
        let shared = template!("?", 7);
        test_sql!(
            template!("?1 OR ?1", shared),
            "?1 OR ?2",
            7,
            7
        );
    }

    #[test]
    fn quoted_regions() {
        test_sql!(template!("name = 'it''s'"), "name = 'it''s'");
        test_sql!(template!("SELECT \"Order\" FROM t"), "SELECT \"Order\" FROM t");
        test_sql!(template!("SELECT \"plain\" FROM t"), "SELECT plain FROM t");
        test_sql!(template!("SELECT `select` FROM t"), "SELECT \"select\" FROM t");

        let backquoted = template!("SELECT `Order` FROM t");
        assert_eq!(render(&MySqlDialect, &backquoted).0, "SELECT `Order` FROM t");
        assert_eq!(render(&PostgresDialect, &backquoted).0, "SELECT \"Order\" FROM t");
    }

    #[test]
    fn template_errors() {
        assert!(error(&template!("?0", 1)).contains("leading zero"));
        assert!(error(&template!("? ?", 1)).contains("too few arguments:2"));
        assert!(error(&template!("?", 1, 2)).contains("too many arguments:1"));
        assert!(error(&template!("?3", 1, 2, 3, 4)).contains("too many arguments"));
        assert!(error(&template!("name = 'open")).contains("unclosed single quote"));
        assert!(error(&template!("\"open")).contains("unclosed double quote"));
        assert!(error(&template!("\"a\"\"b\"")).contains("unsupported double quote"));
        assert!(error(&template!("?", Invalid::new("broken"))).contains("broken"));
    }

    #[test]
    fn primitives() {
        test_sql!(Literal::new("SELECT 1"), "SELECT 1");
        test_sql!(Identifier::new("first"), "first");
        test_sql!(Identifier::new("First"), "\"First\"");
        test_sql!(Identifier::new("group"), "\"group\"");
        test_sql!(Qualifier::new(["main", "t", "c"]), "main.t.c");
        test_sql!(iq(&["t", "Order"]), "t.\"Order\"");
        test_sql!(iq(&["c"]), "c");

        assert!(error(&Empty).contains("empty expression"));
        assert_eq!(
            expand(&Empty, true, &SqliteDialect, 1).unwrap(),
            (String::new(), Vec::new())
        );
        assert!(error(&Identifier::new("")).contains("unsupported identifier"));
        assert!(error(&Identifier::new("a\"b")).contains("unsupported identifier"));
        assert!(error(&Qualifier::new(Vec::<&'static str>::new())).contains("empty qualifier"));
        assert!(error(&Invalid::new("invalid on purpose")).contains("invalid on purpose"));
    }

    #[test]
    fn comparisons() {
        test_sql!(column::eq("a", 1), "a = ?1", 1);
        test_sql!(column::eq("a", Value::Int64(None)), "a IS NULL");
        test_sql!(column::lt("a", 1), "a < ?1", 1);
        test_sql!(column::le("a", 1), "a <= ?1", 1);
        test_sql!(column::gt("a", 1), "a > ?1", 1);
        test_sql!(column::ge("a", 1), "a >= ?1", 1);
        test_sql!(column::between("a", 1, 9), "a BETWEEN ?1 AND ?2", 1, 9);
        test_sql!(column::in_ints("a", &[3, -1]), "a IN (3, -1)");
        test_sql!(column::in_strings("a", &["x", "it's"]), "a IN ('x', 'it''s')");
        test_sql!(column::in_values("a", [4, 5]), "a IN (?1, ?2)", 4, 5);
        test_sql!(column::like("a", "x%"), "a LIKE ?1", "x%");
        test_sql!(column::contains("a", "50%"), "a LIKE ?1", "%50\\%%");
        test_sql!(column::has_prefix("a", "p_"), "a LIKE ?1", "p\\_%");
        test_sql!(column::has_suffix("a", "s"), "a LIKE ?1", "%s");
        test_sql!(column::is_null("a"), "a IS NULL");

        assert!(error(&column::in_ints("a", &[])).contains("empty in"));
        assert!(error(&column::in_strings("a", &[])).contains("empty in"));
        assert!(error(&column::in_values("a", Vec::<i32>::new())).contains("empty in"));
        assert!(error(&column::in_values("a", [Value::Int32(None)])).contains("null in"));
    }

    #[test]
    fn operand_expressions() {
        test_sql!(column::asc("a"), "a ASC");
        test_sql!(column::desc("order"), "\"order\" DESC");
        test_sql!(column::inc("n"), "n + 1");
        test_sql!(column::dec("n"), "n - 1");
        test_sql!(column::avg("n"), "AVG(n)");
        test_sql!(column::count("n"), "COUNT(n)");
        test_sql!(column::max("n"), "MAX(n)");
        test_sql!(column::min("n"), "MIN(n)");
        test_sql!(column::sum("n"), "SUM(n)");
        test_sql!(column::alias("n", "total"), "n AS total");
        test_sql!(
            Operand::new(column::sum("n")).alias("Total"),
            "SUM(n) AS \"Total\""
        );
        test_sql!(Operand::column("a").left_join("b"), "a LEFT JOIN b");
        test_sql!(Operand::column("a").union_all("b"), "a UNION ALL b");
    }

    #[test]
    fn condition_trees() {
        let a = || column::eq("a", 1);
        let b = || column::eq("b", 2);
        let c = || column::eq("c", 3);

        test_sql!(Condition::all([a()]), "a = ?1", 1);
        test_sql!(
            Condition::all([a(), b()]).and([c()]),
            "(a = ?1) AND (b = ?2) AND (c = ?3)",
            1,
            2,
            3
        );
        test_sql!(
            Condition::any([a(), b()]).and([c()]),
            "((a = ?1) OR (b = ?2)) AND (c = ?3)",
            1,
            2,
            3
        );
        test_sql!(
            a().or([b()]).or([c()]),
            "(a = ?1) OR (b = ?2) OR (c = ?3)",
            1,
            2,
            3
        );
        test_sql!(a().not(), "NOT (a = ?1)", 1);
        test_sql!(a().not().not(), "a = ?1", 1);
        test_sql!(
            Condition::any([a(), b()]).not(),
            "(NOT (a = ?1)) AND (NOT (b = ?2))",
            1,
            2
        );
        test_sql!(
            Condition::all([]).and([a()]),
            "a = ?1",
            1
        );
        assert!(error(&Condition::all([])).contains("empty and"));
        assert!(error(&Condition::any([])).contains("empty or"));
    }
}
