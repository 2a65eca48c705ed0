use rowmap::{Db, Executor, Record, delete};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use time::OffsetDateTime;

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Item {
    #[rowmap("code,primary_key,size=16")]
    code: String,
    quantity: i32,
    #[rowmap(",version")]
    version: i64,
}

#[derive(Record, Clone, Debug, PartialEq)]
struct Stamp {
    id: i64,
    label: String,
    #[rowmap(",auto_now_add")]
    created: OffsetDateTime,
    #[rowmap(",auto_now")]
    changed: i64,
}

impl Default for Stamp {
    fn default() -> Self {
        Self {
            id: 0,
            label: String::new(),
            created: OffsetDateTime::UNIX_EPOCH,
            changed: 0,
        }
    }
}

fn stamp(label: &str) -> Stamp {
    Stamp {
        label: label.into(),
        ..Default::default()
    }
}

fn item(code: &str, quantity: i32, version: i64) -> Item {
    Item {
        code: code.into(),
        quantity,
        version,
    }
}

pub fn bulk<E: Executor>(db: &Db<E>) {
    db.create_table::<Item>(false, true, true)
        .expect("Failed to create the item table");
    db.exec(&delete("item"))
        .expect("Failed to clear the item table");

    // Slices
    let mut items = vec![item("a", 1, 0), item("b", 2, 0), item("c", 3, 0)];
    assert_eq!(db.create(&mut items).expect("Failed to create the items"), 3);
    assert!(items.iter().all(|v| v.version == 1));

    let mut restored = vec![item("d", 4, 5), item("e", 5, 7)];
    assert_eq!(db.load(&mut restored).expect("Failed to load the items"), 2);
    let mut lookups = vec![item("d", 0, -1), item("missing", 0, -1), item("e", 0, -1)];
    assert_eq!(
        db.read(&mut lookups, &[]).expect("Failed to read the items"),
        BTreeSet::from([0, 2])
    );
    assert_eq!(lookups[0], item("d", 4, 5), "Load stores the records as they are");
    assert_eq!(lookups[2], item("e", 5, 7));
    assert_eq!(lookups[1], item("missing", 0, -1));

    // Maps keyed by anything
    let mut by_name = BTreeMap::from([
        ("first".to_string(), item("a", 10, 1)),
        ("stale".to_string(), item("b", 20, 9)),
        ("third".to_string(), item("c", 30, -1)),
    ]);
    assert_eq!(
        db.update(&mut by_name, &[]).expect("Failed to update the items"),
        BTreeSet::from(["first".to_string(), "third".to_string()])
    );
    assert_eq!(by_name["first"].version, 2);
    assert_eq!(by_name["stale"].version, 9);
    assert_eq!(
        by_name["third"].version, -1,
        "Unpinned records keep their version"
    );

    let mut by_number = HashMap::from([
        (1u8, item("a", 0, -1)),
        (2, item("b", 0, -1)),
        (3, item("z", 0, -1)),
    ]);
    assert_eq!(
        db.read(&mut by_number, &["quantity"]).unwrap(),
        HashSet::from([1, 2])
    );
    assert_eq!(by_number[&1].quantity, 10);
    assert_eq!(by_number[&2].quantity, 2);
    assert_eq!(
        db.delete(&mut by_number).expect("Failed to delete the items"),
        HashSet::from([1, 2])
    );

    let mut fresh = BTreeMap::from([(7, item("f", 1, 0)), (8, item("g", 1, 0))]);
    assert_eq!(
        db.create(&mut fresh).unwrap(),
        BTreeSet::from([7, 8]),
        "Created map entries are reported by key"
    );

    // The first failure stops the operation and names the record
    let mut duplicates = [item("h", 1, 0), item("f", 1, 0), item("i", 1, 0)];
    let mut error = None;
    crate::silent_logs! {
        error = db.create(&mut duplicates[..]).err();
    }
    let error = format!("{:#}", error.expect("Inserting a duplicate key must fail"));
    assert!(error.contains("record 1"), "{error}");
    assert!(
        db.read_by_key::<Item, String>("i".into(), &[])
            .unwrap()
            .is_none(),
        "Records after the failure are not inserted"
    );

    // One call writes one timestamp
    db.create_table::<Stamp>(false, true, true)
        .expect("Failed to create the stamp table");
    db.exec(&delete("stamp"))
        .expect("Failed to clear the stamp table");
    let mut stamps: Vec<Stamp> = (0..50).map(|i| stamp(&i.to_string())).collect();
    assert_eq!(db.create(&mut stamps).expect("Failed to create the stamps"), 50);
    assert!(stamps[0].created > OffsetDateTime::UNIX_EPOCH);
    assert!(stamps[0].changed > 0);
    assert!(stamps.iter().all(|v| v.created == stamps[0].created));
    assert!(stamps.iter().all(|v| v.changed == stamps[0].changed));
    assert!(stamps.iter().all(|v| v.id > 0));

    for stamp in &mut stamps {
        stamp.changed = 0;
    }
    assert_eq!(
        db.update(&mut stamps, &["label"]).expect("Failed to update the stamps").len(),
        50
    );
    assert!(stamps[0].changed > 0);
    assert!(stamps.iter().all(|v| v.changed == stamps[0].changed));
}
