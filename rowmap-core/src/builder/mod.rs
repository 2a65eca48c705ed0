mod join;
mod pairs;
mod query;
mod statement;

pub use join::*;
pub use pairs::*;
pub use query::*;
pub use statement::*;
