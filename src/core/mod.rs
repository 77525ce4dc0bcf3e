// Public modules
pub mod deploy;
pub mod error;
pub mod ssh;
pub mod target;
pub mod trigger;

// Internal modules - not part of public API
pub(crate) mod config;
pub(crate) mod paths;

// Re-export common types for convenience
pub use error::{Error, ErrorCode, Result};
