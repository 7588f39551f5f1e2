//! Computed style for a box
//!
//! A plain value struct holding the resolved properties the table engine
//! reads. Lengths that can be percentage-relative (`width`, `height`) stay
//! as [`LengthOrAuto`]; everything else is resolved to pixels.

use crate::geometry::EdgeOffsets;
use crate::style::color::Rgba;
use crate::style::types::{
    BorderCollapse, BorderStyle, CaptionSide, Display, EmptyCells, TableLayout, VerticalAlign,
};
use crate::style::values::LengthOrAuto;

/// Per-side border styles
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderStyles {
    pub top: BorderStyle,
    pub right: BorderStyle,
    pub bottom: BorderStyle,
    pub left: BorderStyle,
}

impl BorderStyles {
    /// The same style on all four sides
    pub fn uniform(style: BorderStyle) -> Self {
        Self {
            top: style,
            right: style,
            bottom: style,
            left: style,
        }
    }
}

/// Per-side border colors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderColors {
    pub top: Rgba,
    pub right: Rgba,
    pub bottom: Rgba,
    pub left: Rgba,
}

impl Default for BorderColors {
    fn default() -> Self {
        Self {
            top: Rgba::BLACK,
            right: Rgba::BLACK,
            bottom: Rgba::BLACK,
            left: Rgba::BLACK,
        }
    }
}

/// One side's border as (width, style, color)
///
/// The unit the collapsing border resolver works in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderEdge {
    pub width: f32,
    pub style: BorderStyle,
    pub color: Rgba,
}

/// Resolved style values for one box
///
/// Shared via `Arc` between the box tree and the fragments produced from it.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,

    /// Specified width; percentages resolve against the containing block
    pub width: LengthOrAuto,
    /// Specified height; percentages resolve against the table height
    pub height: LengthOrAuto,

    /// Padding, resolved to pixels
    pub padding: EdgeOffsets,

    /// Specified border widths, resolved to pixels
    ///
    /// Note these are the specified values; a side whose style is `none` or
    /// `hidden` has a used width of zero (see [`used_border_widths`]).
    ///
    /// [`used_border_widths`]: ComputedStyle::used_border_widths
    pub border_width: EdgeOffsets,
    pub border_style: BorderStyles,
    pub border_color: BorderColors,

    pub border_collapse: BorderCollapse,
    /// Horizontal component of `border-spacing`, pixels
    pub border_spacing_horizontal: f32,
    /// Vertical component of `border-spacing`, pixels
    pub border_spacing_vertical: f32,

    pub table_layout: TableLayout,
    pub caption_side: CaptionSide,
    pub empty_cells: EmptyCells,
    pub vertical_align: VerticalAlign,

    /// Font size in pixels, used for text measurement
    pub font_size: f32,
}

impl ComputedStyle {
    /// Border widths with invisible-style sides zeroed
    ///
    /// CSS 2.1 §8.5.3: if the border style is `none` or `hidden`, the
    /// computed border width is zero.
    pub fn used_border_widths(&self) -> EdgeOffsets {
        let zero_if_invisible = |width: f32, style: BorderStyle| {
            if style.is_invisible() {
                0.0
            } else {
                width
            }
        };
        EdgeOffsets {
            top: zero_if_invisible(self.border_width.top, self.border_style.top),
            right: zero_if_invisible(self.border_width.right, self.border_style.right),
            bottom: zero_if_invisible(self.border_width.bottom, self.border_style.bottom),
            left: zero_if_invisible(self.border_width.left, self.border_style.left),
        }
    }

    /// The top border as a (width, style, color) edge
    pub fn border_top(&self) -> BorderEdge {
        BorderEdge {
            width: self.border_width.top,
            style: self.border_style.top,
            color: self.border_color.top,
        }
    }

    /// The right border as a (width, style, color) edge
    pub fn border_right(&self) -> BorderEdge {
        BorderEdge {
            width: self.border_width.right,
            style: self.border_style.right,
            color: self.border_color.right,
        }
    }

    /// The bottom border as a (width, style, color) edge
    pub fn border_bottom(&self) -> BorderEdge {
        BorderEdge {
            width: self.border_width.bottom,
            style: self.border_style.bottom,
            color: self.border_color.bottom,
        }
    }

    /// The left border as a (width, style, color) edge
    pub fn border_left(&self) -> BorderEdge {
        BorderEdge {
            width: self.border_width.left,
            style: self.border_style.left,
            color: self.border_color.left,
        }
    }
}

impl Default for ComputedStyle {
    /// CSS initial values
    fn default() -> Self {
        Self {
            display: Display::Block,
            width: LengthOrAuto::Auto,
            height: LengthOrAuto::Auto,
            padding: EdgeOffsets::ZERO,
            border_width: EdgeOffsets::ZERO,
            border_style: BorderStyles::default(),
            border_color: BorderColors::default(),
            border_collapse: BorderCollapse::Separate,
            border_spacing_horizontal: 0.0,
            border_spacing_vertical: 0.0,
            table_layout: TableLayout::Auto,
            caption_side: CaptionSide::Top,
            empty_cells: EmptyCells::Show,
            vertical_align: VerticalAlign::Baseline,
            font_size: 16.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invisible_border_styles_zero_the_used_width() {
        let style = ComputedStyle {
            border_width: EdgeOffsets::uniform(3.0),
            border_style: BorderStyles {
                top: BorderStyle::Solid,
                right: BorderStyle::None,
                bottom: BorderStyle::Hidden,
                left: BorderStyle::Dashed,
            },
            ..Default::default()
        };
        let used = style.used_border_widths();
        assert_eq!(used.top, 3.0);
        assert_eq!(used.right, 0.0);
        assert_eq!(used.bottom, 0.0);
        assert_eq!(used.left, 3.0);
    }
}
