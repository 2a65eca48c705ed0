use rowmap::{Connection, Db, Record, Value, delete, expr, from, select_count};

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Ledger {
    id: i64,
    entry: String,
}

fn entry(name: &str) -> Ledger {
    Ledger {
        entry: name.into(),
        ..Default::default()
    }
}

pub fn transaction<C: Connection>(db: &mut Db<C>) {
    db.create_table::<Ledger>(false, true, true)
        .expect("Failed to create the ledger table");
    db.exec(&delete("ledger"))
        .expect("Failed to clear the ledger table");

    let transaction = db.begin().expect("Failed to begin the transaction");
    let mut committed = entry("committed");
    transaction
        .create(&mut committed)
        .expect("Failed to create inside the transaction");
    transaction.commit().expect("Failed to commit");
    assert!(committed.id > 0);

    let transaction = db.begin().unwrap();
    transaction.create(&mut entry("rolled back")).unwrap();
    transaction.rollback().expect("Failed to roll back");

    crate::silent_logs! {
        let transaction = db.begin().unwrap();
        transaction.create(&mut entry("dropped")).unwrap();
        drop(transaction);
    }

    let count = db
        .q([expr(select_count()), expr(from(["ledger"]))])
        .unwrap()
        .values();
    assert_eq!(count[0][0], Value::Int64(Some(1)));
    let stored = db
        .read_by_key::<Ledger, i64>(committed.id, &[])
        .unwrap()
        .expect("The committed entry should exist");
    assert_eq!(stored, committed);
}
