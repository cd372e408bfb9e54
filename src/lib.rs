pub mod config;
pub mod errors;
pub mod ingestor;
pub mod logging;
pub mod merger;
pub mod models;
pub mod output;
pub mod rules;
pub mod sources;
pub mod store;
pub mod utils;

pub use config::Config;
pub use errors::{MergeError, MergeResult};
pub use merger::Merger;
