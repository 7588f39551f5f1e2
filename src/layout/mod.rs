//! Layout engine
//!
//! The table machinery lives under [`table`]; cell contents are laid out
//! through the [`FormattingContext`] trait so the table engine never needs
//! to know what is inside a cell. [`block`] provides the minimal block
//! implementation used for cell and caption content.

pub mod block;
pub mod constraints;
pub mod formatting_context;
pub mod table;

pub use block::BlockFormattingContext;
pub use constraints::{AvailableSpace, LayoutConstraints};
pub use formatting_context::{FormattingContext, IntrinsicSizingMode, LayoutError};
pub use table::TableFormattingContext;
