use rowmap::{Db, Executor, Record, delete};

#[derive(Record, Default, Clone, Debug, PartialEq)]
struct Account {
    #[rowmap(",primary_key,auto_increment")]
    id: i64,
    owner: String,
    balance: i64,
    #[rowmap(",version")]
    version: i32,
}

pub fn keyed<E: Executor>(db: &Db<E>) {
    db.create_table::<Account>(false, true, true)
        .expect("Failed to create the account table");
    db.exec(&delete("account"))
        .expect("Failed to clear the account table");

    let mut accounts: Vec<Account> = ["ann", "bob", "carl", "dora"]
        .into_iter()
        .map(|owner| Account {
            owner: owner.into(),
            balance: 100,
            ..Default::default()
        })
        .collect();
    db.create(&mut accounts)
        .expect("Failed to create the accounts");
    let ids: Vec<i64> = accounts.iter().map(|v| v.id).collect();

    // Reads
    let first = db
        .read_by_key::<Account, i64>(ids[0], &[])
        .expect("Failed to read by key")
        .expect("The account should exist");
    assert_eq!(first, accounts[0]);
    let all = db
        .read_by::<Account, i64>(ids.clone(), &[])
        .expect("Failed to read by keys");
    assert_eq!(all.len(), 4);
    assert!(
        db.read_by::<Account, i64>(Vec::new(), &[])
            .unwrap()
            .is_empty(),
        "No keys reads nothing"
    );
    let map = db
        .read_by_map::<i64, Account>(ids[..2].to_vec(), &["id", "owner"])
        .expect("Failed to read the map");
    assert_eq!(map.len(), 2);
    assert_eq!(map[&ids[1]].owner, "bob");
    assert_eq!(map[&ids[1]].balance, 0, "Columns not listed are not read");
    assert!(
        db.read_by_map::<i64, Account>(ids.clone(), &["owner"])
            .is_err(),
        "The primary key must be selected"
    );
    assert!(
        db.read_by_key::<Account, i32>(1, &[]).is_err(),
        "The key must have the primary key type"
    );

    // Updates through a template row
    let mut template = Account {
        balance: 10,
        version: -1,
        ..Default::default()
    };
    assert_eq!(
        db.update_by(ids[..2].to_vec(), &mut template, &["balance"])
            .expect("Failed to update by keys"),
        2
    );
    assert_eq!(template.version, -1);
    let mut pinned = Account {
        balance: 20,
        version: 2,
        ..Default::default()
    };
    assert_eq!(db.update_by([ids[0]], &mut pinned, &["balance"]).unwrap(), 1);
    assert_eq!(pinned.version, 3);
    pinned.version = 2;
    assert_eq!(
        db.update_by([ids[0]], &mut pinned, &["balance"]).unwrap(),
        0,
        "A stale template matches nothing"
    );
    let updated = db.read_by::<Account, i64>(ids.clone(), &[]).unwrap();
    let balances: Vec<i64> = updated.iter().map(|v| v.balance).collect();
    assert_eq!(balances, [20, 10, 100, 100]);
    let owners: Vec<&str> = updated.iter().map(|v| v.owner.as_str()).collect();
    assert_eq!(owners, ["ann", "bob", "carl", "dora"]);

    // Deletes
    let any = Account {
        version: -1,
        ..Default::default()
    };
    assert_eq!(db.delete_by(ids[2..].to_vec(), &any).unwrap(), 2);
    assert_eq!(db.delete_by(Vec::<i64>::new(), &any).unwrap(), 0);
    let stale = Account {
        version: 1,
        ..Default::default()
    };
    assert_eq!(db.delete_by([ids[0]], &stale).unwrap(), 0);
    assert_eq!(db.delete_by(ids.clone(), &any).unwrap(), 2);
}
