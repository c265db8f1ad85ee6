pub mod config;
pub mod dataset;
pub mod errors;
pub mod models;
pub mod persistence;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use config::Config;
pub use dataset::Dataset;
pub use errors::{AppError, AppResult};
