//! Fragment tree: the output of layout
//!
//! A [`FragmentNode`] is a positioned rectangle plus content. Coordinates
//! are always relative to the parent fragment: the table wrapper positions
//! the table grid and captions, the grid positions rows, rows position
//! cells, cells position their content.
//!
//! In the collapsed border model cell fragments carry no borders of their
//! own; the resolved edge segments paint from the table grid fragment's
//! [`FragmentContent::Table`] list.

use std::sync::Arc;

use crate::geometry::{Point, Rect};
use crate::style::color::Rgba;
use crate::style::types::BorderStyle;
use crate::style::ComputedStyle;

/// Axis of a collapsed border segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentAxis {
    /// Runs left to right (an edge between two rows)
    Horizontal,
    /// Runs top to bottom (an edge between two columns)
    Vertical,
}

/// One resolved collapsed-border edge, ready to paint
///
/// The segment is centered on the grid line; `start` is its top-left end in
/// the table grid fragment's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderSegment {
    pub axis: SegmentAxis,
    pub start: Point,
    pub length: f32,
    pub width: f32,
    pub style: BorderStyle,
    pub color: Rgba,
}

/// Content carried by a fragment
#[derive(Debug, Clone, PartialEq)]
pub enum FragmentContent {
    /// Generic block-level fragment
    Block,

    /// A laid-out text run
    Text {
        text: String,
        /// Distance from the fragment top to the text baseline
        baseline_offset: f32,
    },

    /// Replaced content
    Replaced,

    /// The outer table wrapper holding captions and the grid box
    TableWrapper,

    /// The table grid box; owns the collapsed border paint list
    Table {
        border_segments: Vec<BorderSegment>,
    },

    /// A table row
    TableRow,

    /// A table cell
    TableCell {
        /// True when `empty-cells: hide` suppressed this cell's background
        /// and border
        hidden: bool,
    },

    /// A table caption
    TableCaption,
}

/// One positioned fragment
#[derive(Debug, Clone, PartialEq)]
pub struct FragmentNode {
    /// Position and size relative to the parent fragment
    pub bounds: Rect,

    /// Content kind
    pub content: FragmentContent,

    /// Baseline offset from the fragment's top edge
    ///
    /// Set for fragments that participate in baseline alignment: text lines,
    /// cells, rows, and the table itself (first row's baseline).
    pub baseline: Option<f32>,

    /// Child fragments
    pub children: Vec<FragmentNode>,

    /// Style for painting; None for purely structural fragments
    pub style: Option<Arc<ComputedStyle>>,

    /// Id of the box this fragment came from; 0 for synthesized fragments
    pub box_id: usize,
}

impl FragmentNode {
    /// Creates a block fragment
    pub fn new_block(bounds: Rect, children: Vec<FragmentNode>) -> Self {
        Self {
            bounds,
            content: FragmentContent::Block,
            baseline: None,
            children,
            style: None,
            box_id: 0,
        }
    }

    /// Creates a text fragment
    pub fn new_text(bounds: Rect, text: String, baseline_offset: f32) -> Self {
        Self {
            bounds,
            content: FragmentContent::Text {
                text,
                baseline_offset,
            },
            baseline: Some(baseline_offset),
            children: Vec::new(),
            style: None,
            box_id: 0,
        }
    }

    /// Creates a replaced-content fragment
    pub fn new_replaced(bounds: Rect) -> Self {
        Self {
            content: FragmentContent::Replaced,
            ..Self::new_block(bounds, Vec::new())
        }
    }

    /// Sets the style (builder style)
    pub fn with_style(mut self, style: Arc<ComputedStyle>) -> Self {
        self.style = Some(style);
        self
    }

    /// Sets the originating box id (builder style)
    pub fn with_box_id(mut self, box_id: usize) -> Self {
        self.box_id = box_id;
        self
    }

    /// Sets an explicit baseline offset (builder style)
    pub fn with_baseline(mut self, baseline: f32) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Depth-first search for the fragment produced by a given box
    pub fn find_by_box_id(&self, box_id: usize) -> Option<&FragmentNode> {
        if self.box_id == box_id && box_id != 0 {
            return Some(self);
        }
        self
            .children
            .iter()
            .find_map(|child| child.find_by_box_id(box_id))
    }

    /// Mutable variant of [`find_by_box_id`](Self::find_by_box_id)
    pub fn find_by_box_id_mut(&mut self, box_id: usize) -> Option<&mut FragmentNode> {
        if self.box_id == box_id && box_id != 0 {
            return Some(self);
        }
        self
            .children
            .iter_mut()
            .find_map(|child| child.find_by_box_id_mut(box_id))
    }
}
