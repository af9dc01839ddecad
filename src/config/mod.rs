pub mod browsers;
pub mod settings;

pub use settings::AppConfig;
