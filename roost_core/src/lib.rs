pub mod error;
pub mod model;
pub mod schema;

pub use error::*;

pub type Database<'a> = &'a mut diesel::SqliteConnection;
