mod bulk;
mod keyed;
mod queries;
mod relations;
mod simple;
mod transaction;
mod upsert;
mod versioned;

use crate::{
    bulk::bulk, keyed::keyed, queries::queries, relations::relations, simple::simple,
    transaction::transaction, upsert::upsert, versioned::versioned,
};
use log::LevelFilter;
use rowmap::{Connection, Db};
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Runs every database suite against a fresh database.
pub fn execute_tests<C: Connection>(mut db: Db<C>) {
    simple(&db);
    versioned(&db);
    bulk(&db);
    keyed(&db);
    upsert(&db);
    relations(&db);
    queries(&db);
    transaction(&mut db);
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
