pub mod connection;
pub mod models;
pub mod players;
pub mod setup;
pub mod sink;
pub mod tournaments;

pub use connection::{DbConn, DbPool, create_memory_pool, create_pool, get_connection};
pub use models::*;
