use rowmap::{Db, EXCLUDE, Executor, Record, delete};
use rust_decimal::Decimal;
use std::str::FromStr;
use time::{
    Date, OffsetDateTime, PrimitiveDateTime, Time,
    macros::{date, datetime, time},
};
use uuid::Uuid;

#[derive(Record, Default, Clone, Debug, PartialEq)]
#[table_name("simple_fields")]
struct SimpleFields {
    #[rowmap("id,primary_key,auto_increment")]
    id: i64,
    alpha: Option<u8>,
    bravo: i32,
    charlie: Option<i16>,
    delta: u64,
    echo: Option<Uuid>,
    foxtrot: f64,
    golf: Option<Time>,
    hotel: String,
    india: bool,
    juliet: Option<Date>,
    kilo: Option<PrimitiveDateTime>,
    lima: Option<OffsetDateTime>,
    mike: Option<Decimal>,
    november: Vec<u8>,
    #[rowmap("-")]
    transient: String,
}

pub fn simple<E: Executor>(db: &Db<E>) {
    db.create_table::<SimpleFields>(false, true, true)
        .expect("Failed to create the simple_fields table");
    db.exec(&delete("simple_fields"))
        .expect("Failed to clear the simple_fields table");

    // Every field set
    let mut entity = SimpleFields {
        id: 0,
        alpha: Some(255),
        bravo: -777,
        charlie: Some(-2),
        delta: 9_876_543_210,
        echo: Some(Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").unwrap()),
        foxtrot: 1.5,
        golf: Some(time!(12:00:10)),
        hotel: "Hello world!".into(),
        india: true,
        juliet: Some(date!(2024 - 02 - 29)),
        kilo: Some(datetime!(2024-03-01 10:20:30.5)),
        lima: Some(datetime!(2023-11-05 08:00:01.25 +00:00)),
        mike: Some(Decimal::from_str("12.50").unwrap()),
        november: vec![0, 1, 2, 254, 255],
        transient: "not stored".into(),
    };
    assert!(
        db.create(&mut entity).expect("Failed to create simple 1"),
        "The record should be inserted"
    );
    assert!(entity.id > 0, "The generated key should be written back");

    let mut loaded = SimpleFields {
        id: entity.id,
        ..Default::default()
    };
    assert!(db.read(&mut loaded, &[]).expect("Failed to read simple 1"));
    assert_eq!(
        loaded,
        SimpleFields {
            transient: String::new(),
            ..entity.clone()
        }
    );

    // Nulls and zero values
    let mut empty = SimpleFields::default();
    db.create(&mut empty).expect("Failed to create simple 2");
    assert_ne!(empty.id, entity.id);
    let loaded = db
        .read_by_key::<SimpleFields, i64>(empty.id, &[])
        .expect("Failed to read simple 2")
        .expect("Simple 2 should exist");
    assert_eq!(loaded, empty);
    assert_eq!(loaded.alpha, None);
    assert_eq!(loaded.lima, None);
    assert_eq!(loaded.mike, None);

    // Column selection
    entity.hotel = "Changed".into();
    entity.bravo = 1;
    assert!(db.update(&mut entity, &["hotel"]).expect("Failed to update simple 1"));
    let mut partial = SimpleFields {
        id: entity.id,
        ..Default::default()
    };
    assert!(db.read(&mut partial, &["hotel", "bravo"]).unwrap());
    assert_eq!(partial.hotel, "Changed");
    assert_eq!(partial.bravo, -777, "Only the listed column is updated");
    assert_eq!(partial.alpha, None, "Columns not listed are not read");

    let mut excluded = SimpleFields {
        id: entity.id,
        ..Default::default()
    };
    assert!(db.read(&mut excluded, &[EXCLUDE, "november", "hotel"]).unwrap());
    assert!(excluded.november.is_empty());
    assert!(excluded.hotel.is_empty());
    assert_eq!(excluded.alpha, Some(255));
    assert_eq!(excluded.juliet, Some(date!(2024 - 02 - 29)));

    // Missing records
    let mut missing = SimpleFields {
        id: entity.id + empty.id + 100,
        ..Default::default()
    };
    assert!(!db.read(&mut missing, &[]).unwrap());
    assert!(!db.update(&mut missing, &[]).unwrap());
    assert!(!db.delete(&mut missing).unwrap());
    assert_eq!(missing.hotel, "", "A record not found is left untouched");

    // Delete
    assert!(db.delete(&mut entity).expect("Failed to delete simple 1"));
    assert!(!db.delete(&mut entity).unwrap());
    assert!(
        db.read_by_key::<SimpleFields, i64>(entity.id, &[])
            .unwrap()
            .is_none()
    );
}
