//! Storage layer for toolbelt
//!
//! Persists CLI defaults as TOML under the user's config directory.

use crate::error::StorageError;

pub mod config;

type Result<T> = std::result::Result<T, StorageError>;
