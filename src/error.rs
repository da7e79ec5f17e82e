//! # Error Types
//!
//! This module defines the error type shared by every part of the optimizer.
//! None of the failures below are transient: each one is either a bad
//! configuration, malformed input, or a broken internal invariant, so nothing
//! in the crate retries.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use knapsack_ga::error::{GeneticError, Result};
//!
//! fn check_workers(workers: usize) -> Result<()> {
//!     if workers == 0 {
//!         return Err(GeneticError::Configuration(
//!             "Worker count cannot be zero".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_workers(0).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use knapsack_ga::error::{GeneticError, OptionExt};
//!
//! fn first_weight(weights: &[u64]) -> knapsack_ga::error::Result<u64> {
//!     weights.first().copied().ok_or_else_genetic(|| GeneticError::NotFound(0))
//! }
//!
//! assert_eq!(first_weight(&[7]).unwrap(), 7);
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while loading items or running the optimizer.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// Error that occurs when an invalid configuration is provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A crossover strategy code or name that does not map to any strategy.
    #[error("Configuration error: unknown crossover strategy `{0}`")]
    InvalidCrossoverStrategy(String),

    /// An item index outside of the catalog.
    #[error("Item {0} not found in catalog")]
    NotFound(usize),

    /// An individual carries more genes than there are items to look up.
    #[error(
        "Representation mismatch: individual has {genes} genes but the catalog holds {items} items"
    )]
    RepresentationMismatch { genes: usize, items: usize },

    /// A reassembled population does not have the configured size.
    #[error("Internal consistency error: reassembled population has {actual} individuals, expected {expected}")]
    PopulationSizeMismatch { expected: usize, actual: usize },

    /// A worker of a parallel phase did not complete.
    #[error("Worker {worker} failed: {reason}")]
    WorkerFailed { worker: usize, reason: String },

    /// A shared lock was poisoned by a worker that panicked while holding it.
    #[error("Lock poisoned: {0}")]
    LockPoisoned(String),

    /// The worker pool could not be created.
    #[error("Thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Item input could not be interpreted.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for optimizer operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use knapsack_ga::error::ResultExt;
///
/// fn parse_capacity(raw: &str) -> knapsack_ga::error::Result<u64> {
///     raw.trim().parse::<u64>().context("Failed to parse capacity")
/// }
///
/// assert!(parse_capacity("abc").is_err());
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to a `GeneticError::Other` prefixed with `context`.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T, GeneticError>` using
    /// a closure to generate the error.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}
