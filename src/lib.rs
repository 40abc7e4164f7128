//! # toolbelt
//!
//! A generalized bisection search plus the small utilities built around it.
//!
//! [`core::bisection`] finds where a monotonic predicate flips over an
//! ordered argument list, in O(log N) predicate calls. Arguments may be plain
//! values or tuples unpacked into n-ary predicates, and the search works in
//! both directions. The `toolbelt` binary drives the same search with an
//! external command as the predicate.
//!
//! ```
//! use toolbelt::prelude::*;
//!
//! let args: Vec<u32> = (0..1600).collect();
//! let boundary = bisect(|i: &u32| *i >= 1386, &args)?;
//! assert_eq!(*boundary.value, 1386);
//! assert_eq!(boundary.orientation, Orientation::RightToLeft);
//! # Ok::<(), BisectError>(())
//! ```

pub use error::AppError;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Result;
    pub use crate::error::{AppError, BisectError, TaskError};

    pub use crate::core::args::{Args, Unpack};
    pub use crate::core::bisection::{
        Bisection, Boundary, Orientation, bisect, bisect_unpacked, bisect_with,
    };
    pub use crate::core::probe::{CommandProbe, KillSwitch, ProbeOutcome};
    pub use crate::core::threading::{TaskHandle, threaded, threaded_named, wait_for_results};

    pub use crate::storage::config::Config;
}

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // Bisection, probes, threading
pub mod storage; // Configuration persistence

/// Support modules (used across layers)
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
