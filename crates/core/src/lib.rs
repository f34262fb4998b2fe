//! Shared configuration and error types for the news/price alignment pipeline.

pub mod config;
pub mod config_loader;
pub mod error;

pub use config::{AlignConfig, AlignSettings, CleanOptions};
pub use config_loader::ConfigLoader;
pub use error::AlignError;

/// Result alias for pipeline operations.
pub type AlignResult<T> = std::result::Result<T, AlignError>;
