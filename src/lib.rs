//! tableflow: a CSS 2.1 table layout engine.
//!
//! Takes a styled box tree rooted at a `display: table` box and produces a
//! positioned fragment tree. Covers grid synthesis with anonymous box repair,
//! collapsing border conflict resolution, fixed and automatic column width
//! distribution, row sizing with baseline alignment and rowspan spreading,
//! captions, and incremental per-cell relayout.
//!
//! Cell contents are laid out through the [`layout::FormattingContext`] trait,
//! so any block engine can sit behind the table machinery. A minimal block
//! implementation ships in [`layout::block`] and is what the tests use.

pub mod error;
pub mod geometry;
pub mod layout;
pub mod style;
pub mod tree;

pub use error::{Error, Result};
pub use geometry::{EdgeOffsets, Point, Rect, Size};
pub use layout::TableFormattingContext;
pub use style::color::Rgba;
pub use style::values::{Length, LengthUnit};

use layout::constraints::LayoutConstraints;
use layout::FormattingContext;
use tree::box_tree::BoxNode;
use tree::fragment_tree::FragmentNode;

/// Lays out a table box tree with the built-in block engine
///
/// Convenience entry point over [`TableFormattingContext`]; rejects roots
/// whose display is not `table` or `inline-table` before running layout.
pub fn layout_table(table: &BoxNode, constraints: &LayoutConstraints) -> Result<FragmentNode> {
    if !table.style.display.is_table() {
        return Err(Error::InvalidBoxTree(format!(
            "root display is {:?}, expected a table",
            table.style.display
        )));
    }
    Ok(TableFormattingContext::new().layout(table, constraints)?)
}
