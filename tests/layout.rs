#[cfg(test)]
mod tests {
    use rowmap::{Options, Record, Registry, Roles, Table, Value};
    use std::{
        collections::{BTreeMap, HashMap},
        sync::Arc,
        thread,
    };

    #[derive(Record, Default, Clone, Debug)]
    struct Address {
        street: String,
        #[rowmap(",collapse")]
        zip: String,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Owner {
        id: i64,
        name: String,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Pet {
        id: i64,
        name: String,
        #[rowmap("home_,inline")]
        home: Address,
        #[rowmap(",inline")]
        work: Option<Address>,
        #[rowmap(",foreign_key")]
        owner: Option<Owner>,
        #[rowmap("keeper,many_to_one")]
        keeper: Owner,
        #[rowmap(",json")]
        tags: Vec<String>,
        #[rowmap("-")]
        #[allow(dead_code)]
        scratch: u8,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Kennel {
        #[rowmap("code,primary_key")]
        code: String,
        #[rowmap(",one_to_many")]
        pets: Vec<Pet>,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Category {
        id: i64,
        label: String,
        #[rowmap(",one_to_many")]
        children: Vec<Category>,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Book {
        id: i64,
        title: String,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Library {
        id: i64,
        #[rowmap(",one_to_many")]
        books: BTreeMap<i64, Book>,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Shelf {
        id: i64,
        #[rowmap(",one_to_many")]
        books: HashMap<String, Book>,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Keyless {
        text: String,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Memo {
        id: i64,
        #[rowmap(",foreign_key")]
        note: Option<Keyless>,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct TwoKeys {
        #[rowmap(",primary_key")]
        a: i64,
        #[rowmap(",primary_key")]
        b: i64,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct SameName {
        id: i64,
        #[rowmap("label")]
        first: String,
        #[rowmap("LABEL")]
        second: String,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct BadTag {
        id: i64,
        #[rowmap(",auto_now")]
        flag: bool,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Chain {
        id: i64,
        #[rowmap(",inline")]
        next: Option<Box<Chain>>,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Outer {
        id: i64,
        #[rowmap(",inline")]
        middle: Middle,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Middle {
        label: String,
        #[rowmap(",inline")]
        inner: Option<Box<Middle>>,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Husband {
        #[rowmap("wife,primary_key,one_to_one")]
        wife: Option<Box<Wife>>,
        name: String,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Wife {
        #[rowmap("husband,primary_key,one_to_one")]
        husband: Option<Box<Husband>>,
        name: String,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Passport {
        #[rowmap(",primary_key,one_to_one")]
        holder: Box<Owner>,
        number: String,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Visa {
        id: i64,
        #[rowmap(",many_to_one")]
        passport: Option<Passport>,
    }

    #[derive(Record, Default, Clone, Debug)]
    struct Gadget {
        id: i64,
        #[rowmap(",many_to_one")]
        maker: Option<Owner>,
        #[rowmap(",one_to_many")]
        parts: Vec<Book>,
    }

    fn names(table: &Table) -> Vec<&str> {
        table.columns.iter().map(|v| v.name.as_str()).collect()
    }

    fn error<T: Record>(registry: &Registry) -> String {
        let error = registry
            .table::<T>()
            .expect_err("The table should be rejected");
        format!("{error:#}")
    }

    #[test]
    fn flattened_columns() {
        let registry = Registry::new();
        let pet = registry.table::<Pet>().expect("Failed to resolve the pet table");
        assert_eq!(pet.name, "pet");
        assert_eq!(
            names(&pet),
            [
                "id",
                "name",
                "home_street",
                "home_zip",
                "street",
                "zip",
                "owner_id",
                "keeper",
                "tags"
            ]
        );
        assert_eq!(
            pet.roles,
            Roles {
                primary_key: Some(0),
                auto_increment: Some(0),
                ..Default::default()
            }
        );
        assert!(pet.columns[0].is_primary_key() && pet.columns[0].is_auto_increment());

        let home_zip = pet.find("HOME_ZIP").expect("home_zip should exist");
        assert_eq!(home_zip.fields().len(), 2);
        assert!(home_zip.is_collapse());
        assert!(!home_zip.is_nullable());

        let zip = pet.find("zip").expect("zip should exist");
        assert!(zip.is_nullable(), "An optional inline record makes its columns nullable");
        assert!(!zip.is_collapse());

        let owner = pet.find("owner_id").expect("owner_id should exist");
        assert_eq!(owner.fields().len(), 2);
        assert_eq!(owner.last().name, "id");
        assert!(owner.is_one() && owner.is_nullable());
        let keeper = pet.find("keeper").expect("keeper should exist");
        assert!(keeper.is_one() && !keeper.is_nullable());
        assert_eq!(owner.related, keeper.related);
        let related = owner
            .related
            .and_then(|id| registry.table_at(id))
            .expect("The owner table should be registered");
        assert_eq!(related.name, "owner");
        assert!(Arc::ptr_eq(
            &related,
            &registry.table::<Owner>().expect("Failed to resolve the owner table")
        ));

        assert_eq!(pet.find("tags").and_then(|v| v.encoding()).map(|v| v.name()), Some("json"));
        assert!(pet.find("scratch").is_none());

        let structure = registry.structure::<Pet>().expect("Failed to resolve the pet struct");
        assert_eq!(structure.name(), "Pet");
        assert_eq!(structure.fields.len(), 7);
    }

    #[test]
    fn concurrent_resolution() {
        let registry = Arc::new(Registry::new());
        let tables: Vec<Arc<Table>> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || registry.table::<Gadget>())
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|v| {
                v.join()
                    .expect("The resolving thread panicked")
                    .expect("Failed to resolve the gadget table")
            })
            .collect();
        for table in &tables {
            assert!(Arc::ptr_eq(table, &tables[0]));
        }
        assert_eq!(names(&tables[0]), ["id", "maker_id", "parts"]);
        assert!(Arc::ptr_eq(
            &tables[0],
            &registry.table::<Gadget>().expect("Failed to resolve the gadget table")
        ));
        let owner = registry.table::<Owner>().expect("Failed to resolve the owner table");
        assert_eq!(tables[0].columns[1].related, Some(owner.id));
    }

    #[test]
    fn many_relations() {
        let registry = Registry::new();
        let kennel = registry
            .table::<Kennel>()
            .expect("Failed to resolve the kennel table");
        assert_eq!(names(&kennel), ["code", "pets"]);
        assert_eq!(kennel.roles.primary_key, Some(0));
        assert_eq!(kennel.roles.auto_increment, None);
        let pets = &kennel.columns[1];
        assert!(pets.is_many());
        assert!(kennel.find("pets").is_none(), "Many relations are not physical columns");
        assert_eq!(
            pets.related.and_then(|id| registry.table_at(id)).map(|v| v.name.clone()),
            Some("pet".into())
        );
        assert!(registry.table::<Owner>().is_ok());

        let category = registry
            .table::<Category>()
            .expect("Failed to resolve the category table");
        assert_eq!(category.columns[2].related, Some(category.id));
        assert!(category.columns[2].is(Options::MANY));

        let library = registry
            .table::<Library>()
            .expect("Failed to resolve the library table");
        assert!(library.columns[1].last().is(Options::MAP));
    }

    #[test]
    fn boxed_relations() {
        let registry = Registry::new();
        let visa = registry.table::<Visa>().expect("Failed to resolve the visa table");
        assert_eq!(names(&visa), ["id", "passport_id"]);
        let passport = visa.find("passport_id").expect("passport_id should exist");
        assert_eq!(passport.fields().len(), 3, "The remote key is itself a relation");
        assert_eq!(
            passport.fields().iter().map(|v| v.name).collect::<Vec<_>>(),
            ["passport", "holder", "id"]
        );

        let mut record = Visa::default();
        passport.scan(&mut record, Value::Int64(Some(9))).unwrap();
        assert_eq!(
            record.passport.as_ref().map(|v| v.holder.id),
            Some(9),
            "Boxed records are allocated on write"
        );
        assert_eq!(
            passport.get(&record).unwrap(),
            Value::Int64(Some(9))
        );
    }

    #[test]
    fn cycles() {
        let registry = Registry::new();
        assert!(error::<Chain>(&registry).contains("struct Chain field:2 next: inline circle"));
        assert!(error::<Outer>(&registry).contains("struct Outer field:2 middle: inline circle"));
        assert!(
            error::<Husband>(&registry).contains("table husband column:1 wife: one_to_one circle")
        );
        assert!(registry.table::<Wife>().is_err());
    }

    #[test]
    fn rejected_layouts() {
        let registry = Registry::new();
        assert!(
            error::<TwoKeys>(&registry).contains("table two_keys: duplicate option primary_key")
        );
        assert!(error::<SameName>(&registry).contains("table same_name: duplicate column name: label"));
        assert!(
            error::<BadTag>(&registry)
                .contains("struct BadTag field:2 flag: type mismatch option auto_now")
        );
        assert!(
            error::<Memo>(&registry)
                .contains("table memo column:2 note: table keyless must have a primary key")
        );
        assert!(error::<Shelf>(&registry).contains(
            "struct Shelf field:2 books: table book must have the map's key type primary key"
        ));

        // Failed builds leave nothing behind
        let keyless = registry
            .table::<Keyless>()
            .expect("Failed to resolve the keyless table");
        assert!(keyless.primary_key().is_none());
        let book = registry.table::<Book>().expect("Failed to resolve the book table");
        assert_eq!(names(&book), ["id", "title"]);
        assert!(registry.table::<Memo>().is_err(), "Errors are not cached as tables");
    }
}
