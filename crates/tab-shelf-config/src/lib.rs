pub mod config;
pub mod logging;
pub mod scope;

pub use config::ShelfConfig;
pub use scope::StorageScope;
