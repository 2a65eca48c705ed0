use rowmap::{Db, Executor, Record, delete};
use time::OffsetDateTime;

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Document {
    id: i64,
    title: String,
    #[rowmap(",version")]
    version: i32,
    /// Unix milliseconds.
    #[rowmap(",auto_now_add")]
    created: i64,
    #[rowmap(",auto_now")]
    updated: Option<OffsetDateTime>,
}

pub fn versioned<E: Executor>(db: &Db<E>) {
    db.create_table::<Document>(false, true, true)
        .expect("Failed to create the document table");
    db.exec(&delete("document"))
        .expect("Failed to clear the document table");

    let before = OffsetDateTime::now_utc().unix_timestamp() * 1000;
    let mut document = Document {
        title: "draft".into(),
        ..Default::default()
    };
    db.create(&mut document).expect("Failed to create the document");
    assert!(document.id > 0);
    assert_eq!(document.version, 1, "Versions start at 1");
    assert!(document.created >= before, "Auto now add holds unix milliseconds");
    assert!(document.updated.is_some());
    let created = document.created;

    // Optimistic locking
    let mut stale = document.clone();
    document.title = "first".into();
    assert!(db.update(&mut document, &[]).expect("Failed to update the document"));
    assert_eq!(document.version, 2);
    stale.title = "stale".into();
    assert!(
        !db.update(&mut stale, &[]).unwrap(),
        "A stale version must not match"
    );
    assert_eq!(stale.version, 1);
    assert!(!db.read(&mut stale, &[]).unwrap());
    stale.version = -1;
    assert!(db.read(&mut stale, &[]).unwrap(), "Negative versions are not pinned");
    assert_eq!(stale.title, "first");
    assert_eq!(stale.version, 2);
    assert_eq!(stale.created, created, "Updates never touch auto now add");
    assert_eq!(stale.updated, document.updated);

    // Selected columns still bump the version
    document.title = "second".into();
    assert!(db.update(&mut document, &["title"]).unwrap());
    assert_eq!(document.version, 3);
    let mut reloaded = Document {
        id: document.id,
        version: -1,
        ..Default::default()
    };
    assert!(db.read(&mut reloaded, &[]).unwrap());
    assert_eq!(reloaded, document);

    // Zero is not a version
    let mut zero = Document {
        id: document.id,
        ..Default::default()
    };
    assert!(db.read(&mut zero, &[]).is_err());
    assert!(db.delete(&mut zero).is_err());

    // Pinned delete
    stale.version = 2;
    assert!(!db.delete(&mut stale).unwrap());
    assert!(db.delete(&mut document).expect("Failed to delete the document"));
}
