pub mod models;
pub mod progress;

pub use models::*;
pub use progress::BatchTally;
