//! Core layer - bisection search and the machinery around it

/// Scalar / tuple bisection arguments
pub mod args;

/// Boundary search over monotonic predicates
pub mod bisection;

/// External commands used as predicates
pub mod probe;

/// Thread-backed tasks with awaitable results
pub mod threading;
