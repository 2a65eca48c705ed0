mod connection;
mod driver;
mod extract;
mod prepared;
mod transaction;

pub use connection::*;
pub use driver::*;
pub use prepared::*;
pub use transaction::*;

use rowmap_core::Error;

/// Converts a driver error, logging it.
pub(crate) fn driver_error(error: rusqlite::Error, context: impl Into<String>) -> Error {
    let error = Error::new(error).context(context.into());
    log::error!("{:#}", error);
    error
}
