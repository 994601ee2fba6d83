//! ownerref core library — owner-reference types, injector configuration, errors.
//!
//! - [`types`] — [`OwnerReference`] re-export and constructors
//! - [`config`] — [`InjectConfig`] load / save
//! - [`error`] — [`ConfigError`]

pub mod config;
pub mod error;
pub mod types;

pub use config::{InjectConfig, LogLevel, DEFAULT_MANIFEST_SUFFIX};
pub use error::ConfigError;
pub use types::{owner_reference, OwnerReference};
