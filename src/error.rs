//! Error types for tableflow
//!
//! The crate surfaces one top-level [`Error`] enum; subsystem errors convert
//! into it via `#[from]`. Layout code returns
//! [`LayoutError`](crate::layout::LayoutError) internally and callers of the
//! public API see it wrapped here.
//!
//! All errors use the `thiserror` crate for minimal boilerplate and proper
//! error trait implementations.

use thiserror::Error;

use crate::layout::LayoutError;

/// Result type alias for tableflow operations
///
/// # Examples
///
/// ```
/// use tableflow::Result;
///
/// fn build_table() -> Result<()> {
///     Ok(())
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for tableflow
///
/// Each variant wraps a more specific error type for that subsystem.
#[derive(Error, Debug)]
pub enum Error {
    /// Layout error
    #[error("Layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The box tree handed to the engine was not usable
    ///
    /// For example a root box whose display is not `table` or `inline-table`.
    #[error("Invalid box tree: {0}")]
    InvalidBoxTree(String),
}
