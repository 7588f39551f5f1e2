//! Tree structures for boxes and fragments
//!
//! - **Box tree**: CSS boxes before layout (input to layout)
//! - **Fragment tree**: positioned, sized boxes after layout (output)
//!
//! ```text
//! Styles → Box Tree → Layout → Fragment Tree
//! ```

pub mod box_tree;
pub mod fragment_tree;

pub use box_tree::{AnonymousType, BoxNode, BoxTree, BoxType};
pub use fragment_tree::{BorderSegment, FragmentContent, FragmentNode, SegmentAxis};
