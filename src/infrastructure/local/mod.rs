//! Local recording store
//!
//! An embedded SQLite database laid out like the browser object store, so
//! recordings saved by earlier versions remain readable.

mod backend;
mod context;
mod schema;

pub use backend::LocalBackend;
pub use context::{StoreContext, StoreHandle, StoreLocation};
pub use schema::{COLLECTION, DATABASE_NAME, SCHEMA_VERSION};
