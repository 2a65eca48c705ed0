use rowmap::{Db, Executor, Record, Value, column, delete, expr, from, q, select, where_};
use serde::{Deserialize, Serialize};

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Address {
    street: String,
    city: String,
}

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Owner {
    id: i64,
    name: String,
}

#[derive(Serialize, Deserialize, Default, Clone, Debug, PartialEq)]
struct Collar {
    color: String,
    size: u8,
}

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Pet {
    id: i64,
    name: String,
    #[rowmap("home_,inline")]
    home: Address,
    #[rowmap(",foreign_key")]
    owner: Option<Owner>,
    #[rowmap(",json")]
    tags: Vec<String>,
    #[rowmap(",gob")]
    collar: Collar,
    #[rowmap(",collapse")]
    nickname: String,
}

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Kennel {
    id: i64,
    name: String,
    #[rowmap(",one_to_many")]
    pets: Vec<Pet>,
}

pub fn relations<E: Executor>(db: &Db<E>) {
    db.create_table::<Owner>(false, true, true)
        .expect("Failed to create the owner table");
    db.create_table::<Pet>(false, true, true)
        .expect("Failed to create the pet table");
    db.create_table::<Kennel>(false, true, true)
        .expect("Failed to create the kennel table");
    for table in ["pet", "owner", "kennel"] {
        db.exec(&delete(table))
            .expect("Failed to clear the relation tables");
    }

    let pet_table = db.table::<Pet>().expect("Failed to resolve the pet table");
    let names: Vec<&str> = pet_table.columns.iter().map(|v| v.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "id",
            "name",
            "home_street",
            "home_city",
            "owner_id",
            "tags",
            "collar",
            "nickname"
        ]
    );

    let mut owner = Owner {
        name: "Marta".into(),
        ..Default::default()
    };
    db.create(&mut owner).expect("Failed to create the owner");

    let mut pets = vec![
        Pet {
            name: "Rex".into(),
            home: Address {
                street: "Via Roma 1".into(),
                city: "Torino".into(),
            },
            owner: Some(owner.clone()),
            tags: vec!["good".into(), "loud".into()],
            collar: Collar {
                color: "red".into(),
                size: 3,
            },
            nickname: "Rexy".into(),
            ..Default::default()
        },
        Pet {
            name: "Stray".into(),
            ..Default::default()
        },
    ];
    db.create(&mut pets).expect("Failed to create the pets");

    // Only the key of the related record is stored
    let rex = db
        .read_by_key::<Pet, i64>(pets[0].id, &[])
        .unwrap()
        .expect("Rex should exist");
    assert_eq!(
        rex,
        Pet {
            owner: Some(Owner {
                id: owner.id,
                ..Default::default()
            }),
            ..pets[0].clone()
        }
    );
    let stray = db
        .read_by_key::<Pet, i64>(pets[1].id, &[])
        .unwrap()
        .expect("Stray should exist");
    assert_eq!(stray, pets[1]);
    assert_eq!(stray.owner, None);

    // Collapsed zero values are stored as NULL
    let raw = db
        .q([
            expr(select(["owner_id", "nickname"])),
            expr(from(["pet"])),
            expr(where_([column::eq("id", pets[1].id)])),
        ])
        .expect("Failed to query the pet")
        .values();
    assert!(raw[0][0].is_null());
    assert!(raw[0][1].is_null());

    // Clearing the relation
    let mut rex = rex;
    rex.owner = None;
    assert!(db.update(&mut rex, &["owner_id"]).unwrap());
    let mut reloaded = Pet {
        id: rex.id,
        owner: Some(Owner::default()),
        ..Default::default()
    };
    assert!(db.read(&mut reloaded, &["owner_id"]).unwrap());
    assert_eq!(reloaded.owner, None);

    // Rows decoded by column kind
    let maps = db
        .q([
            expr(select(["name", "tags", "home_city"])),
            expr(from(["pet"])),
            expr(where_([column::eq("id", pets[0].id)])),
        ])
        .unwrap()
        .maps_of::<Pet>()
        .expect("Failed to decode the rows");
    assert_eq!(maps[0]["name"], Value::Varchar(Some("Rex".into())));
    assert_eq!(maps[0]["tags"], Value::Varchar(Some(r#"["good","loud"]"#.into())));
    assert_eq!(maps[0]["home_city"], Value::from("Torino"));

    // Many relations are not stored in the owning table
    let mut kennel = Kennel {
        name: "North".into(),
        pets: pets.clone(),
        ..Default::default()
    };
    db.create(&mut kennel).expect("Failed to create the kennel");
    let loaded = db
        .read_by_key::<Kennel, i64>(kennel.id, &[])
        .unwrap()
        .expect("The kennel should exist");
    assert_eq!(loaded.name, "North");
    assert!(loaded.pets.is_empty());
}
