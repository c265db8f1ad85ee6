//! Centralized error handling for the cinema administration crate
//!
//! # Error Categories
//!
//! - **Dataset Errors**: index-addressed updates and removals out of range
//! - **Codec Errors**: snapshot files unreadable, unwritable or malformed
//! - **Pipeline Errors**: single-flight rejections and stage failures
//! - **Config Errors**: configuration file and environment problems
//!
//! A missing markup snapshot file is deliberately *not* an error; the markup
//! codec treats it as zero records for that kind.

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for codec Results
pub type CodecResult<T> = Result<T, CodecError>;
