use rowmap::{Db, Executor, Record, Upsert, Value, delete};

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Setting {
    id: i64,
    #[rowmap(",unique")]
    name: String,
    value: String,
}

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Counter {
    id: i64,
    hits: i32,
    #[rowmap(",version")]
    version: i16,
}

pub fn upsert<E: Executor>(db: &Db<E>) {
    db.create_table::<Setting>(false, true, true)
        .expect("Failed to create the setting table");
    db.exec(&delete("setting"))
        .expect("Failed to clear the setting table");

    let mut theme = Setting {
        name: "theme".into(),
        value: "dark".into(),
        ..Default::default()
    };
    let mode = Upsert::from_key(&Value::Int64(Some(theme.id))).unwrap();
    assert_eq!(mode, Upsert::Create);
    assert!(db.upsert(&mut theme, mode, &[]).expect("Failed to create the setting"));
    assert!(theme.id > 0);

    let mode = Upsert::from_key(&Value::Int64(Some(theme.id))).unwrap();
    assert_eq!(mode, Upsert::Update);
    theme.value = "light".into();
    assert!(db.upsert(&mut theme, mode, &["value"]).unwrap());

    theme.value = "solarized".into();
    assert!(
        db.upsert(&mut theme, Upsert::Probe, &[]).unwrap(),
        "Probing an existing key updates"
    );
    let stored = db
        .read_by_key::<Setting, i64>(theme.id, &[])
        .unwrap()
        .expect("The setting should exist");
    assert_eq!(stored, theme);

    let mut language = Setting {
        id: theme.id + 1000,
        name: "language".into(),
        value: "en".into(),
    };
    assert!(
        db.upsert(&mut language, Upsert::Probe, &[]).unwrap(),
        "Probing a missing key creates"
    );
    assert_ne!(language.id, theme.id + 1000, "The key is generated on create");

    let mut skipped = Setting {
        id: -1,
        name: "skipped".into(),
        ..Default::default()
    };
    assert_eq!(
        Upsert::from_key(&Value::Int64(Some(skipped.id))),
        Some(Upsert::Skip)
    );
    assert!(!db.upsert(&mut skipped, Upsert::Skip, &[]).unwrap());
    assert!(
        db.read_by::<Setting, i64>([theme.id, language.id], &[])
            .unwrap()
            .iter()
            .all(|v| v.name != "skipped")
    );

    // Versioned records are upserted unpinned
    db.create_table::<Counter>(false, true, true)
        .expect("Failed to create the counter table");
    db.exec(&delete("counter"))
        .expect("Failed to clear the counter table");
    let mut counter = Counter {
        hits: 1,
        version: -1,
        ..Default::default()
    };
    assert!(db.upsert(&mut counter, Upsert::Probe, &[]).unwrap());
    assert_eq!(counter.version, 1);
    assert!(
        db.upsert(&mut counter, Upsert::Update, &[]).is_err(),
        "A pinned version is rejected"
    );
    counter.version = -1;
    counter.hits = 2;
    assert!(db.upsert(&mut counter, Upsert::Update, &[]).unwrap());
    let stored = db
        .read_by_key::<Counter, i64>(counter.id, &[])
        .unwrap()
        .expect("The counter should exist");
    assert_eq!(stored.hits, 2);
    assert_eq!(stored.version, 2);
}
