//! Utils module - Shared utilities and helpers
//!
//! Helpers used by the bisection front end plus the small standalone
//! utilities the library ships with.

/// Range parsing and argument list validation
pub mod validation;

/// Byte size conversions
pub mod bytes;

/// Clamping, time windows, map helpers, JSON merging
pub mod misc;

/// ROT13 / ROT47
pub mod text;

/// `log` backend used by the binary
pub mod logging;

/// Environment variable overrides
pub mod input;
