use rowmap::{
    Condition, Db, Executor, Operand, Record, Value, column, cond, delete, expr, from, group_by, having,
    limit, order_by, q, select, select_count, union_all, where_,
};

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Score {
    id: i64,
    player: String,
    points: i32,
}

pub fn queries<E: Executor>(db: &Db<E>) {
    db.create_table::<Score>(false, true, true)
        .expect("Failed to create the score table");
    db.exec(&delete("score"))
        .expect("Failed to clear the score table");
    let mut scores: Vec<Score> = [("ann", 10), ("bob", 25), ("ann", 30), ("carl", 45), ("bob", 5)]
        .into_iter()
        .map(|(player, points)| Score {
            player: player.into(),
            points,
            ..Default::default()
        })
        .collect();
    db.create(&mut scores).expect("Failed to create the scores");

    // Filter, sort and limit
    let best: Vec<Score> = db
        .q([
            expr(select(["id", "player", "points"])),
            expr(from(["score"])),
            expr(where_([column::ge("points", 20)])),
            expr(order_by(["-points"])),
            limit(&[2]),
        ])
        .expect("Failed to query the best scores")
        .all()
        .expect("Failed to decode the scores");
    assert_eq!(best, [scores[3].clone(), scores[2].clone()]);

    let page: Vec<Score> = db
        .q([
            expr(select(["player", "points"])),
            expr(from(["score"])),
            expr(order_by(["+points"])),
            limit(&[1, 2]),
        ])
        .unwrap()
        .all()
        .unwrap();
    let points: Vec<i32> = page.iter().map(|v| v.points).collect();
    assert_eq!(points, [10, 25]);

    // Aggregates
    let count = db
        .q([expr(select_count()), expr(from(["score"]))])
        .unwrap()
        .values();
    assert_eq!(count[0][0], Value::Int64(Some(5)));

    let totals = db
        .q([
            expr(select(["player"]).append([Operand::new(column::sum("points")).alias("total")])),
            expr(from(["score"])),
            expr(group_by(["player"])),
            expr(having([cond!("SUM(points) > ?", 35)])),
            expr(order_by(["player"])),
        ])
        .unwrap()
        .maps()
        .expect("Failed to read the totals");
    assert_eq!(totals.len(), 2);
    assert_eq!(totals[0]["player"], Value::from("ann"));
    assert_eq!(totals[0]["total"], Value::Int64(Some(40)));
    assert_eq!(totals[1]["player"], Value::from("carl"));

    // Condition trees
    let matched = |clause| {
        db.q([expr(select(["player"])), expr(from(["score"])), expr(clause)])
            .unwrap()
            .len()
    };
    assert_eq!(matched(where_([column::in_values("player", ["ann", "bob"])])), 4);
    assert_eq!(matched(where_([column::in_strings("player", &["carl"])])), 1);
    assert_eq!(matched(where_([column::between("points", 10, 30)])), 3);
    assert_eq!(matched(where_([column::has_prefix("player", "ca")])), 1);
    assert_eq!(
        matched(where_([column::eq("player", "ann")]).or([column::gt("points", 40)])),
        3
    );
    assert_eq!(
        matched(where_([column::eq("player", "ann"), column::lt("points", 20)]).not()),
        4
    );
    assert_eq!(matched(where_([column::is_null("player")])), 0);
    assert_eq!(matched(where_(Vec::<Condition>::new())), 5, "An empty clause renders nothing");

    let both = db
        .q([union_all([
            q([
                expr(select(["player"])),
                expr(from(["score"])),
                expr(where_([column::eq("points", 10)])),
            ]),
            q([
                expr(select(["player"])),
                expr(from(["score"])),
                expr(where_([column::eq("points", 5)])),
            ]),
        ])])
        .unwrap();
    assert_eq!(both.len(), 2);

    // Prepared statements
    let (mut statement, args) = db
        .prepare(&q([
            expr(select(["points"])),
            expr(from(["score"])),
            expr(where_([column::eq("player", "bob")])),
            expr(order_by(["points"])),
        ]))
        .expect("Failed to prepare the query");
    assert_eq!(args, [Value::from("bob")]);
    let rows = statement.fetch(&args).unwrap();
    assert_eq!(rows.len(), 2);
    let rows = statement.fetch(&["carl".into()]).unwrap();
    assert_eq!(rows[0].values()[0], Value::Int64(Some(45)));
    statement.close().expect("Failed to close the statement");

    // Decoding errors
    let nothing = db
        .q([
            expr(select(["id", "player", "points"])),
            expr(from(["score"])),
            expr(where_([column::lt("points", 0)])),
        ])
        .unwrap();
    assert!(nothing.is_empty());
    assert!(nothing.one::<Score>().unwrap().is_none());
    let duplicated = db
        .q([expr(select(["player", "player"])), expr(from(["score"]))])
        .unwrap();
    assert!(duplicated.maps().is_err());
    let unknown = db
        .q([
            expr(select(["player"]).append([Operand::new(column::sum("points")).alias("total")])),
            expr(from(["score"])),
            expr(group_by(["player"])),
        ])
        .unwrap();
    assert!(unknown.all::<Score>().is_err());
}
