//! Cell participation in table sizing
//!
//! A cell is a block container that has surrendered its width: the tracks
//! it spans dictate the border-box width, whatever the cell's own style
//! says. This module measures cells for the column solver and lays them
//! out at their dictated width, handing back the used height and first
//! baseline the row solver needs.
//!
//! In the separated model each cell also carries outer spacing margins:
//! half the border-spacing on interior sides, the full spacing at table
//! edges, so adjacent margins always sum to one spacing. In the collapsed
//! model the cell's own borders are replaced by half of each resolved
//! edge.

use std::sync::Arc;

use crate::geometry::EdgeOffsets;
use crate::layout::constraints::LayoutConstraints;
use crate::layout::formatting_context::{FormattingContext, IntrinsicSizingMode, LayoutError};
use crate::layout::table::grid::{GridCell, TableGrid};
use crate::style::computed::BorderStyles;
use crate::style::types::{BorderStyle, EmptyCells};
use crate::style::values::LengthOrAuto;
use crate::tree::box_tree::BoxNode;
use crate::tree::fragment_tree::FragmentNode;

/// A cell's contribution to column sizing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellMeasure {
    pub min_width: f32,
    pub preferred_width: f32,
}

/// Result of laying a cell out at its dictated width
#[derive(Debug)]
pub struct CellLayout {
    pub fragment: FragmentNode,
    /// Used border-box height, specified height already floored in
    pub height: f32,
    /// First baseline from the cell's top edge
    pub baseline: Option<f32>,
    /// True when `empty-cells: hide` suppresses the cell's paint
    pub hidden: bool,
}

/// Measures a cell's minimum and preferred content width
///
/// The specified width floors the preferred width but never the minimum;
/// an over-narrow specified width cannot squeeze content below its MCW.
pub fn measure_cell(
    cell: &GridCell,
    fc: &dyn FormattingContext,
) -> Result<CellMeasure, LayoutError> {
    // Measure the content, not the declaration: a specified width would
    // otherwise short-circuit the content engine's intrinsic walk
    let mut style = (*cell.node.style).clone();
    style.width = LengthOrAuto::Auto;
    let node = BoxNode {
        style: Arc::new(style),
        ..cell.node.clone()
    };
    let min_width = fc.compute_intrinsic_inline_size(&node, IntrinsicSizingMode::MinContent)?;
    let mut preferred_width =
        fc.compute_intrinsic_inline_size(&node, IntrinsicSizingMode::MaxContent)?;
    if let Some(specified) = cell.style().width.to_px() {
        preferred_width = preferred_width.max(specified);
    }
    Ok(CellMeasure {
        min_width,
        preferred_width: preferred_width.max(min_width),
    })
}

/// Lays a cell out at a dictated border-box width
///
/// `border_override` carries the resolved half-borders in the collapsed
/// model; None keeps the cell's own borders. `percentage_base_height`
/// feeds percent heights inside the cell when the table height is
/// definite.
pub fn layout_cell(
    cell: &GridCell,
    width: f32,
    border_override: Option<EdgeOffsets>,
    percentage_base_height: Option<f32>,
    fc: &dyn FormattingContext,
) -> Result<CellLayout, LayoutError> {
    // The tracks own the width; neutralize the cell's specified width so the
    // content engine fills exactly what it is given
    let mut style = (*cell.node.style).clone();
    style.width = LengthOrAuto::Auto;
    style.height = LengthOrAuto::Auto;
    if let Some(borders) = border_override {
        style.border_width = borders;
        style.border_style = BorderStyles {
            top: override_style(borders.top),
            right: override_style(borders.right),
            bottom: override_style(borders.bottom),
            left: override_style(borders.left),
        };
    }
    let node = BoxNode {
        style: Arc::new(style),
        ..cell.node.clone()
    };

    let constraints =
        LayoutConstraints::definite_width(width).with_percentage_bases(Some(width), percentage_base_height);
    let fragment = fc.layout(&node, &constraints)?;

    let mut height = fragment.bounds.height();
    if let Some(specified) = resolve_height(cell.style().height, percentage_base_height) {
        height = height.max(specified);
    }

    Ok(CellLayout {
        baseline: fragment.baseline,
        hidden: is_hidden_when_empty(cell),
        height,
        fragment,
    })
}

fn override_style(width: f32) -> BorderStyle {
    if width > 0.0 {
        BorderStyle::Solid
    } else {
        BorderStyle::None
    }
}

fn resolve_height(height: LengthOrAuto, base: Option<f32>) -> Option<f32> {
    match height {
        LengthOrAuto::Length(l) if l.unit.is_percentage() => base.map(|b| l.resolve_against(b)),
        LengthOrAuto::Length(l) => Some(l.to_px()),
        LengthOrAuto::Auto => None,
    }
}

/// Whether the cell paints nothing under `empty-cells: hide`
///
/// Separated model only; the grid slot and track contributions remain.
fn is_hidden_when_empty(cell: &GridCell) -> bool {
    cell.style().empty_cells == EmptyCells::Hide && !has_in_flow_content(&cell.node)
}

fn has_in_flow_content(node: &BoxNode) -> bool {
    node.children.iter().any(|child| {
        !child.is_whitespace_text() && child.style.display != crate::style::Display::None
    })
}

/// Shifts a cell's content down, the geometric form of adding top padding
///
/// Used to realize vertical alignment once the row extent is known; the
/// fragment's own bounds are left for the caller to set.
pub fn offset_cell_content(fragment: &mut FragmentNode, offset: f32) {
    if offset == 0.0 {
        return;
    }
    for child in &mut fragment.children {
        child.bounds.origin.y += offset;
    }
    if let Some(baseline) = &mut fragment.baseline {
        *baseline += offset;
    }
}

/// Spacing margins of a cell in the separated model
///
/// Interior sides get half the spacing so neighbors sum to exactly one
/// spacing; sides on the table edge get the whole spacing.
pub fn separation_margins(
    grid: &TableGrid,
    cell: &GridCell,
    horizontal: f32,
    vertical: f32,
) -> EdgeOffsets {
    let at_left = cell.col == 0;
    let at_right = cell.col + cell.col_span >= grid.column_count();
    let at_top = cell.row == 0;
    let at_bottom = cell.row + cell.row_span >= grid.row_count();
    EdgeOffsets {
        left: if at_left { horizontal } else { horizontal / 2.0 },
        right: if at_right { horizontal } else { horizontal / 2.0 },
        top: if at_top { vertical } else { vertical / 2.0 },
        bottom: if at_bottom { vertical } else { vertical / 2.0 },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::block::BlockFormattingContext;
    use crate::layout::table::grid::GridBuilder;
    use crate::style::types::Display;
    use crate::style::ComputedStyle;

    fn cell_node(style: ComputedStyle, children: Vec<BoxNode>) -> BoxNode {
        BoxNode::new_block(
            Arc::new(ComputedStyle {
                display: Display::TableCell,
                ..style
            }),
            children,
        )
    }

    fn grid_with_cell(cell: BoxNode) -> TableGrid {
        let table_style = Arc::new(ComputedStyle {
            display: Display::Table,
            ..ComputedStyle::default()
        });
        let row = BoxNode::new_block(
            Arc::new(ComputedStyle {
                display: Display::TableRow,
                ..ComputedStyle::default()
            }),
            vec![cell],
        );
        let table = BoxNode::new_block(table_style.clone(), vec![row]);
        GridBuilder::new(table_style).build(&table)
    }

    fn text(content: &str) -> BoxNode {
        BoxNode::new_text(Arc::new(ComputedStyle::default()), content.to_string())
    }

    #[test]
    fn specified_width_floors_preferred_but_not_minimum() {
        let grid = grid_with_cell(cell_node(
            ComputedStyle {
                width: LengthOrAuto::px(200.0),
                ..ComputedStyle::default()
            },
            vec![text("hi")],
        ));
        let fc = BlockFormattingContext::new();
        let measure = measure_cell(grid.cell_at(0, 0).unwrap(), &fc).unwrap();
        // "hi" is 16px at the default font; the 200px width lifts preferred only
        assert_eq!(measure.min_width, 16.0);
        assert_eq!(measure.preferred_width, 200.0);
    }

    #[test]
    fn layout_uses_the_dictated_width_not_the_specified_one() {
        let grid = grid_with_cell(cell_node(
            ComputedStyle {
                width: LengthOrAuto::px(500.0),
                ..ComputedStyle::default()
            },
            vec![text("x")],
        ));
        let fc = BlockFormattingContext::new();
        let layout = layout_cell(grid.cell_at(0, 0).unwrap(), 120.0, None, None, &fc).unwrap();
        assert_eq!(layout.fragment.bounds.width(), 120.0);
    }

    #[test]
    fn specified_height_floors_the_used_height() {
        let grid = grid_with_cell(cell_node(
            ComputedStyle {
                height: LengthOrAuto::px(90.0),
                ..ComputedStyle::default()
            },
            vec![text("x")],
        ));
        let fc = BlockFormattingContext::new();
        let layout = layout_cell(grid.cell_at(0, 0).unwrap(), 100.0, None, None, &fc).unwrap();
        assert_eq!(layout.height, 90.0);
    }

    #[test]
    fn border_override_replaces_the_cells_own_borders() {
        let grid = grid_with_cell(cell_node(
            ComputedStyle {
                border_width: EdgeOffsets::uniform(10.0),
                border_style: BorderStyles::uniform(BorderStyle::Solid),
                ..ComputedStyle::default()
            },
            vec![text("x")],
        ));
        let fc = BlockFormattingContext::new();
        let halves = EdgeOffsets::uniform(2.0);
        let layout = layout_cell(grid.cell_at(0, 0).unwrap(), 100.0, Some(halves), None, &fc).unwrap();
        // Content starts past the 2px override, not the 10px specified border
        assert_eq!(layout.fragment.children[0].bounds.x(), 2.0);
    }

    #[test]
    fn empty_cells_hide_flags_cells_without_in_flow_content() {
        let hide_style = ComputedStyle {
            empty_cells: EmptyCells::Hide,
            ..ComputedStyle::default()
        };
        let fc = BlockFormattingContext::new();

        let empty = grid_with_cell(cell_node(hide_style.clone(), vec![text("  ")]));
        let layout = layout_cell(empty.cell_at(0, 0).unwrap(), 50.0, None, None, &fc).unwrap();
        assert!(layout.hidden);

        let full = grid_with_cell(cell_node(hide_style, vec![text("content")]));
        let layout = layout_cell(full.cell_at(0, 0).unwrap(), 50.0, None, None, &fc).unwrap();
        assert!(!layout.hidden);
    }

    #[test]
    fn offset_cell_content_moves_children_and_baseline() {
        let grid = grid_with_cell(cell_node(ComputedStyle::default(), vec![text("x")]));
        let fc = BlockFormattingContext::new();
        let mut layout = layout_cell(grid.cell_at(0, 0).unwrap(), 50.0, None, None, &fc).unwrap();
        let before = layout.fragment.children[0].bounds.y();
        let baseline_before = layout.fragment.baseline.unwrap();
        offset_cell_content(&mut layout.fragment, 7.0);
        assert_eq!(layout.fragment.children[0].bounds.y(), before + 7.0);
        assert_eq!(layout.fragment.baseline.unwrap(), baseline_before + 7.0);
    }

    #[test]
    fn interior_margins_are_half_the_spacing() {
        let table_style = Arc::new(ComputedStyle {
            display: Display::Table,
            ..ComputedStyle::default()
        });
        let cell = || cell_node(ComputedStyle::default(), vec![]);
        let row = |cells: Vec<BoxNode>| {
            BoxNode::new_block(
                Arc::new(ComputedStyle {
                    display: Display::TableRow,
                    ..ComputedStyle::default()
                }),
                cells,
            )
        };
        let table = BoxNode::new_block(
            table_style.clone(),
            vec![row(vec![cell(), cell()]), row(vec![cell(), cell()])],
        );
        let grid = GridBuilder::new(table_style).build(&table);

        let top_left = separation_margins(&grid, grid.cell_at(0, 0).unwrap(), 6.0, 4.0);
        assert_eq!(top_left.left, 6.0);
        assert_eq!(top_left.top, 4.0);
        assert_eq!(top_left.right, 3.0);
        assert_eq!(top_left.bottom, 2.0);

        let bottom_right = separation_margins(&grid, grid.cell_at(1, 1).unwrap(), 6.0, 4.0);
        assert_eq!(bottom_right.left, 3.0);
        assert_eq!(bottom_right.right, 6.0);
        assert_eq!(bottom_right.bottom, 4.0);
        // Neighbors sum to one spacing across the shared gap
        assert_eq!(top_left.right + bottom_right.left, 6.0);
    }
}
