//! Minimal block formatting context
//!
//! Lays out cell and caption content: block boxes stack their children
//! vertically, replaced boxes size to their intrinsic dimensions, and text
//! boxes wrap greedily using a fixed-metric font model. This is
//! deliberately small; a host engine substitutes its own
//! [`FormattingContext`] for real content.
//!
//! # Font model
//!
//! Text measures with a monospace approximation: every character advances
//! `0.5 × font-size`, lines are `1.2 × font-size` tall, and the baseline
//! sits at `0.8 × font-size` below the line top. The model is deterministic,
//! which is what the table sizing algorithms need from it.

use crate::geometry::{Point, Rect, Size};
use crate::layout::constraints::{AvailableSpace, LayoutConstraints};
use crate::layout::formatting_context::{FormattingContext, IntrinsicSizingMode, LayoutError};
use crate::tree::box_tree::{BoxNode, BoxType};
use crate::tree::fragment_tree::FragmentNode;

const CHAR_ADVANCE_RATIO: f32 = 0.5;
const LINE_HEIGHT_RATIO: f32 = 1.2;
const ASCENT_RATIO: f32 = 0.8;

/// Advance width of one character at the given font size
pub fn char_advance(font_size: f32) -> f32 {
    font_size * CHAR_ADVANCE_RATIO
}

/// Line box height at the given font size
pub fn line_height(font_size: f32) -> f32 {
    font_size * LINE_HEIGHT_RATIO
}

/// Baseline offset from the line top at the given font size
pub fn ascent(font_size: f32) -> f32 {
    font_size * ASCENT_RATIO
}

/// The block engine used for cell and caption content
#[derive(Debug, Default, Clone, Copy)]
pub struct BlockFormattingContext;

impl BlockFormattingContext {
    pub fn new() -> Self {
        Self
    }

    fn layout_text(&self, box_node: &BoxNode, text: &str, available: f32) -> FragmentNode {
        let font_size = box_node.style.font_size;
        let advance = char_advance(font_size);
        let line = line_height(font_size);

        let mut line_count = 0usize;
        let mut widest = 0.0f32;
        for paragraph in text.split('\n') {
            let mut current = 0.0f32;
            let mut any = false;
            for word in paragraph.split_whitespace() {
                let word_width = word.chars().count() as f32 * advance;
                let space = if any { advance } else { 0.0 };
                if any && current + space + word_width > available {
                    line_count += 1;
                    widest = widest.max(current);
                    current = word_width;
                } else {
                    current += space + word_width;
                    any = true;
                }
            }
            if any || paragraph.is_empty() {
                line_count += 1;
                widest = widest.max(current);
            }
        }
        if line_count == 0 {
            line_count = 1;
        }

        let bounds = Rect::from_xywh(0.0, 0.0, widest, line_count as f32 * line);
        FragmentNode::new_text(bounds, text.to_string(), ascent(font_size))
            .with_style(box_node.style.clone())
            .with_box_id(box_node.id)
    }

    fn layout_replaced(&self, box_node: &BoxNode, intrinsic: Size, base: Option<f32>) -> FragmentNode {
        let width = box_node
            .style
            .width
            .length()
            .map(|l| l.resolve_against(base.unwrap_or(intrinsic.width)))
            .unwrap_or(intrinsic.width);
        let height = box_node
            .style
            .height
            .to_px()
            .unwrap_or(intrinsic.height);
        let bounds = Rect::from_xywh(0.0, 0.0, width, height);
        // Replaced boxes align on their bottom edge
        FragmentNode::new_replaced(bounds)
            .with_style(box_node.style.clone())
            .with_box_id(box_node.id)
            .with_baseline(height)
    }

    fn layout_container(
        &self,
        box_node: &BoxNode,
        constraints: &LayoutConstraints,
    ) -> Result<FragmentNode, LayoutError> {
        let style = &box_node.style;
        let border = style.used_border_widths();
        let edge_h = style.padding.horizontal() + border.horizontal();
        let edge_v = style.padding.vertical() + border.vertical();

        let used_width = match constraints.available_width {
            AvailableSpace::Definite(available) => style
                .width
                .resolve_against(constraints.percentage_base_width.unwrap_or(available))
                .unwrap_or(available),
            AvailableSpace::MinContent => {
                self.compute_intrinsic_inline_size(box_node, IntrinsicSizingMode::MinContent)?
            }
            AvailableSpace::MaxContent => {
                self.compute_intrinsic_inline_size(box_node, IntrinsicSizingMode::MaxContent)?
            }
        };
        let content_width = (used_width - edge_h).max(0.0);

        let child_constraints = LayoutConstraints::new(
            AvailableSpace::Definite(content_width),
            AvailableSpace::MaxContent,
        )
        .with_percentage_bases(Some(content_width), constraints.percentage_base_height);

        let content_origin = Point::new(border.left + style.padding.left, border.top + style.padding.top);
        let mut children = Vec::with_capacity(box_node.children.len());
        let mut cursor_y = 0.0f32;
        let mut baseline = None;
        for child in &box_node.children {
            if child.style.display == crate::style::Display::None {
                continue;
            }
            let mut fragment = self.layout(child, &child_constraints)?;
            fragment.bounds = fragment
                .bounds
                .translate(Point::new(content_origin.x, content_origin.y + cursor_y));
            if baseline.is_none() {
                if let Some(child_baseline) = fragment.baseline {
                    baseline = Some(content_origin.y + cursor_y + child_baseline);
                }
            }
            cursor_y += fragment.bounds.height();
            children.push(fragment);
        }

        let content_height = cursor_y;
        let used_height = style
            .height
            .resolve_against(constraints.percentage_base_height.unwrap_or(0.0))
            .filter(|_| {
                !style.height.is_auto()
                    && (style.height.to_px().is_some() || constraints.percentage_base_height.is_some())
            })
            .unwrap_or(content_height + edge_v)
            .max(content_height + edge_v);

        let mut fragment = FragmentNode::new_block(
            Rect::from_xywh(0.0, 0.0, used_width, used_height),
            children,
        )
        .with_style(style.clone())
        .with_box_id(box_node.id);
        fragment.baseline = baseline;
        Ok(fragment)
    }
}

impl FormattingContext for BlockFormattingContext {
    fn layout(
        &self,
        box_node: &BoxNode,
        constraints: &LayoutConstraints,
    ) -> Result<FragmentNode, LayoutError> {
        match &box_node.box_type {
            BoxType::Text(text) => {
                let available = constraints
                    .available_width
                    .definite_value()
                    .unwrap_or(f32::INFINITY);
                Ok(self.layout_text(box_node, text, available))
            }
            BoxType::Replaced { intrinsic } => Ok(self.layout_replaced(
                box_node,
                *intrinsic,
                constraints.percentage_base_width,
            )),
            BoxType::Block | BoxType::Inline | BoxType::Anonymous(_) => {
                self.layout_container(box_node, constraints)
            }
        }
    }

    fn compute_intrinsic_inline_size(
        &self,
        box_node: &BoxNode,
        mode: IntrinsicSizingMode,
    ) -> Result<f32, LayoutError> {
        let style = &box_node.style;
        match &box_node.box_type {
            BoxType::Text(text) => {
                let advance = char_advance(style.font_size);
                let width = match mode {
                    IntrinsicSizingMode::MinContent => text
                        .split_whitespace()
                        .map(|word| word.chars().count())
                        .max()
                        .unwrap_or(0) as f32,
                    IntrinsicSizingMode::MaxContent => text
                        .split('\n')
                        .map(|line| {
                            let words: Vec<&str> = line.split_whitespace().collect();
                            let chars: usize = words.iter().map(|w| w.chars().count()).sum();
                            let gaps = words.len().saturating_sub(1);
                            chars + gaps
                        })
                        .max()
                        .unwrap_or(0) as f32,
                };
                Ok(width * advance)
            }
            BoxType::Replaced { intrinsic } => Ok(
                style
                    .width
                    .to_px()
                    .unwrap_or(intrinsic.width),
            ),
            BoxType::Block | BoxType::Inline | BoxType::Anonymous(_) => {
                let border = style.used_border_widths();
                let edge_h = style.padding.horizontal() + border.horizontal();
                if let Some(width) = style.width.to_px() {
                    return Ok(width.max(edge_h));
                }
                let mut widest = 0.0f32;
                for child in &box_node.children {
                    if child.style.display == crate::style::Display::None {
                        continue;
                    }
                    widest = widest.max(self.compute_intrinsic_inline_size(child, mode)?);
                }
                Ok(widest + edge_h)
            }
        }
    }
}
