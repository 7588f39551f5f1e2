//! Box tree: the input to layout
//!
//! A [`BoxNode`] is one CSS box: a computed style, a content kind, and
//! child boxes. The tree arrives already styled; the table engine never
//! consults a DOM. The one DOM remnant is [`BoxNode::tag_name`], kept
//! because table grid repair may consult the element name when the display
//! value alone does not identify a table part.

use std::sync::Arc;

use crate::geometry::Size;
use crate::style::ComputedStyle;

/// What kind of content a box holds
#[derive(Debug, Clone, PartialEq)]
pub enum BoxType {
    /// Block container; children stack vertically
    Block,

    /// Inline-level content container
    Inline,

    /// A text run
    Text(String),

    /// Replaced content (image, canvas) with an intrinsic size
    Replaced {
        /// Natural size of the content in CSS pixels
        intrinsic: Size,
    },

    /// A box synthesized during tree repair rather than generated from an
    /// element
    Anonymous(AnonymousType),
}

/// The role an anonymous box plays
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnonymousType {
    /// Anonymous block wrapper
    Block,
    /// Anonymous `table-row-group` wrapping loose rows
    TableRowGroup,
    /// Anonymous `table-row` wrapping loose cells
    TableRow,
    /// Anonymous `table-cell` wrapping loose content
    TableCell,
}

/// One box in the box tree
#[derive(Debug, Clone, PartialEq)]
pub struct BoxNode {
    /// Computed style for this box
    pub style: Arc<ComputedStyle>,

    /// Content kind
    pub box_type: BoxType,

    /// Child boxes in document order
    pub children: Vec<BoxNode>,

    /// Identifier, unique within a tree once [`BoxTree::new`] has numbered it
    ///
    /// Zero until numbered. Grid provenance and incremental relayout key off
    /// this.
    pub id: usize,

    /// Source element name, lowercased (`"td"`, `"thead"`, ...)
    ///
    /// None for anonymous boxes and non-element content.
    pub tag_name: Option<String>,

    /// `colspan` attribute, already parsed; defaults to 1
    pub col_span: usize,

    /// `rowspan` attribute, already parsed; defaults to 1, 0 meaning
    /// span-to-end-of-row-group
    pub row_span: usize,

    /// `span` attribute of column and column-group elements; defaults to 1
    pub span: usize,
}

impl BoxNode {
    /// Creates a new block box
    pub fn new_block(style: Arc<ComputedStyle>, children: Vec<BoxNode>) -> Self {
        Self {
            style,
            box_type: BoxType::Block,
            children,
            id: 0,
            tag_name: None,
            col_span: 1,
            row_span: 1,
            span: 1,
        }
    }

    /// Creates a text box
    pub fn new_text(style: Arc<ComputedStyle>, text: String) -> Self {
        Self {
            box_type: BoxType::Text(text),
            ..Self::new_block(style, Vec::new())
        }
    }

    /// Creates a replaced box with an intrinsic size
    pub fn new_replaced(style: Arc<ComputedStyle>, intrinsic: Size) -> Self {
        Self {
            box_type: BoxType::Replaced { intrinsic },
            ..Self::new_block(style, Vec::new())
        }
    }

    /// Creates an anonymous box of the given role
    ///
    /// Anonymous boxes inherit no element identity; the caller supplies a
    /// style whose display matches the role.
    pub fn new_anonymous(
        anonymous_type: AnonymousType,
        style: Arc<ComputedStyle>,
        children: Vec<BoxNode>,
    ) -> Self {
        Self {
            box_type: BoxType::Anonymous(anonymous_type),
            ..Self::new_block(style, children)
        }
    }

    /// Sets the source element name (builder style)
    pub fn with_tag_name(mut self, name: &str) -> Self {
        self.tag_name = Some(name.to_ascii_lowercase());
        self
    }

    /// Sets colspan/rowspan (builder style)
    pub fn with_spans(mut self, col_span: usize, row_span: usize) -> Self {
        self.col_span = col_span;
        self.row_span = row_span;
        self
    }

    /// Sets the column `span` attribute (builder style)
    pub fn with_span(mut self, span: usize) -> Self {
        self.span = span;
        self
    }

    /// Returns true if this is a text box containing only whitespace
    pub fn is_whitespace_text(&self) -> bool {
        match &self.box_type {
            BoxType::Text(text) => text.chars().all(char::is_whitespace),
            _ => false,
        }
    }

    /// Returns true if this box was synthesized during repair
    pub fn is_anonymous(&self) -> bool {
        matches!(self.box_type, BoxType::Anonymous(_))
    }

    /// Number of boxes in this subtree including self
    pub fn subtree_size(&self) -> usize {
        1 + self.children.iter().map(BoxNode::subtree_size).sum::<usize>()
    }
}

/// A complete box tree with document-order ids assigned
#[derive(Debug, Clone)]
pub struct BoxTree {
    pub root: BoxNode,
}

impl BoxTree {
    /// Takes ownership of a root box and numbers every box in pre-order
    ///
    /// Ids start at 1 so that 0 can keep meaning "not numbered".
    pub fn new(mut root: BoxNode) -> Self {
        let mut next_id = 1;
        number_boxes(&mut root, &mut next_id);
        Self { root }
    }
}

fn number_boxes(node: &mut BoxNode, next_id: &mut usize) {
    node.id = *next_id;
    *next_id += 1;
    for child in &mut node.children {
        number_boxes(child, next_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> Arc<ComputedStyle> {
        Arc::new(ComputedStyle::default())
    }

    #[test]
    fn ids_assigned_in_preorder() {
        let tree = BoxTree::new(BoxNode::new_block(
            style(),
            vec![
                BoxNode::new_block(style(), vec![BoxNode::new_text(style(), "a".into())]),
                BoxNode::new_block(style(), vec![]),
            ],
        ));
        assert_eq!(tree.root.id, 1);
        assert_eq!(tree.root.children[0].id, 2);
        assert_eq!(tree.root.children[0].children[0].id, 3);
        assert_eq!(tree.root.children[1].id, 4);
    }

    #[test]
    fn whitespace_text_detection() {
        assert!(BoxNode::new_text(style(), "  \n\t".into()).is_whitespace_text());
        assert!(!BoxNode::new_text(style(), " x ".into()).is_whitespace_text());
        assert!(!BoxNode::new_block(style(), vec![]).is_whitespace_text());
    }
}
