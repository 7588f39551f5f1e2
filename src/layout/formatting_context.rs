//! The formatting context seam
//!
//! A [`FormattingContext`] turns one box (and its subtree) into a fragment
//! under some constraints. The table engine drives cell and caption content
//! exclusively through this trait, so any block engine can sit behind it;
//! tests plug in stubs with canned sizes.

use thiserror::Error;

use crate::layout::constraints::LayoutConstraints;
use crate::tree::box_tree::BoxNode;
use crate::tree::fragment_tree::FragmentNode;

/// Which intrinsic size is being asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntrinsicSizingMode {
    /// Smallest width that avoids overflow (longest word, widest cell, ...)
    MinContent,
    /// Ideal width with no wrapping
    MaxContent,
}

/// Errors produced during layout
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// The context was handed a box it cannot lay out
    #[error("unsupported box type: {0}")]
    UnsupportedBoxType(String),

    /// A measurement depends on itself
    #[error("circular dependency during layout")]
    CircularDependency,

    /// Required contextual data was missing
    #[error("missing context: {0}")]
    MissingContext(String),
}

/// Lays out boxes into fragments
///
/// Implementors must be thread-safe; layout of independent subtrees may be
/// driven from multiple threads.
pub trait FormattingContext: Send + Sync {
    /// Produces a positioned fragment for `box_node` under `constraints`
    ///
    /// The returned fragment's bounds are positioned at the origin; the
    /// caller places it.
    fn layout(
        &self,
        box_node: &BoxNode,
        constraints: &LayoutConstraints,
    ) -> Result<FragmentNode, LayoutError>;

    /// Computes the min-content or max-content inline size of `box_node`
    fn compute_intrinsic_inline_size(
        &self,
        box_node: &BoxNode,
        mode: IntrinsicSizingMode,
    ) -> Result<f32, LayoutError>;
}
