//! Unified error types for the den2ne ecosystem.
//!
//! This module provides a common error type [`DenError`] that can represent
//! errors from any part of the system (CSV ingestion, graph construction,
//! propagation, selection, balancing). Domain-specific errors are converted
//! to `DenError` for uniform handling at crate boundaries.
//!
//! # Example
//!
//! ```ignore
//! use den2ne_core::{DenError, DenResult};
//!
//! fn run(path: &str) -> DenResult<()> {
//!     let graph = load_graph(path)?;
//!     propagate_and_balance(graph)?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Unified error type for all den2ne operations.
#[derive(Error, Debug)]
pub enum DenError {
    /// I/O errors (file access, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV row or unknown configuration id (spec.md §7, input-format errors).
    #[error("Parse error: {0}")]
    Parse(String),

    /// Data validation errors raised outside of diagnostics collection.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Structural errors: missing root, duplicate switch entry, or a
    /// disconnected component containing load-bearing nodes (spec.md §7).
    #[error("Structural error: {0}")]
    Structural(String),

    /// A load-bearing node remained unreachable from the root after
    /// `MAX_ITER` balance iterations (spec.md §7).
    #[error("unreachable load at node '{node}': {residual_kw:.3} kW residual after MAX_ITER iterations")]
    UnreachableLoad { node: String, residual_kw: f64 },

    /// Configuration errors (CLI args, criterion weights, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic errors (for wrapping external errors).
    #[error("{0}")]
    Other(String),
}

/// Convenience type alias for Results using DenError.
pub type DenResult<T> = Result<T, DenError>;

impl From<anyhow::Error> for DenError {
    fn from(err: anyhow::Error) -> Self {
        DenError::Other(err.to_string())
    }
}

impl From<String> for DenError {
    fn from(s: String) -> Self {
        DenError::Other(s)
    }
}

impl From<&str> for DenError {
    fn from(s: &str) -> Self {
        DenError::Other(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DenError::Structural("missing root".into());
        assert!(err.to_string().contains("Structural error"));
        assert!(err.to_string().contains("missing root"));
    }

    #[test]
    fn test_unreachable_load_display() {
        let err = DenError::UnreachableLoad {
            node: "n7".into(),
            residual_kw: 0.5,
        };
        let msg = err.to_string();
        assert!(msg.contains("n7"));
        assert!(msg.contains("0.5"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let den_err: DenError = io_err.into();
        assert!(matches!(den_err, DenError::Io(_)));
    }

    #[test]
    fn test_result_type_alias() {
        fn example_fn() -> DenResult<i32> {
            Ok(42)
        }
        assert_eq!(example_fn().unwrap(), 42);
    }

    #[test]
    fn test_question_mark_operator() {
        fn inner() -> DenResult<()> {
            Err(DenError::Validation("test".into()))
        }

        fn outer() -> DenResult<()> {
            inner()?;
            Ok(())
        }

        assert!(outer().is_err());
    }
}
