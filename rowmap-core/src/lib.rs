mod as_value;
mod builder;
mod clock;
mod columns;
mod condition;
mod config;
mod convert;
mod crud;
mod db;
mod dialect;
mod encoding;
mod executor;
mod expression;
mod options;
mod reflect;
mod registry;
mod rows;
mod structure;
mod table;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use builder::*;
pub use clock::*;
pub use columns::*;
pub use condition::*;
pub use config::*;
pub use crud::*;
pub use db::*;
pub use dialect::*;
pub use encoding::*;
pub use executor::*;
pub use expression::*;
pub use options::*;
pub use reflect::*;
pub use registry::*;
pub use rows::*;
pub use structure::*;
pub use table::*;
pub use util::*;
pub use value::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
