pub mod refresh;
pub mod search;

pub use refresh::RefreshService;
pub use search::SearchService;
