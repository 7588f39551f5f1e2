//! Table layout
//!
//! [`TableFormattingContext`] owns the whole pipeline: synthesize the
//! grid ([`grid`]), resolve collapsed borders ([`borders`]), solve column
//! widths ([`columns`]), lay cells out at their final widths ([`cell`]),
//! solve row heights and baselines ([`rows`]), then assemble the fragment
//! tree. Captions stack above or below the grid box inside an outer
//! wrapper fragment.
//!
//! Cell contents are laid out through the [`FormattingContext`] seam, so
//! any block engine can sit behind the table engine.
//!
//! Set `TABLEFLOW_TRACE_TABLE` to print a one-line summary of every table
//! layout to stderr.

pub mod borders;
pub mod cell;
pub mod columns;
pub mod grid;
pub mod rows;

use std::sync::Arc;

use crate::geometry::{EdgeOffsets, Point, Rect};
use crate::layout::block::BlockFormattingContext;
use crate::layout::constraints::{AvailableSpace, LayoutConstraints};
use crate::layout::formatting_context::{FormattingContext, IntrinsicSizingMode, LayoutError};
use crate::style::types::{BorderCollapse, CaptionSide, TableLayout};
use crate::style::values::{LengthOrAuto, LengthUnit};
use crate::style::ComputedStyle;
use crate::tree::box_tree::BoxNode;
use crate::tree::fragment_tree::{BorderSegment, FragmentContent, FragmentNode, SegmentAxis};

use borders::CollapsedBorders;
use cell::{layout_cell, measure_cell, offset_cell_content, CellLayout};
use columns::{collect_track_constraints, distribute_widths, solve_fixed_layout, CellSizingInput};
use grid::{GridBuilder, GridCell, TableGrid};
use rows::{align_cell_offset, calculate_row_heights, spanned_extent, CellVerticalInput};

pub use borders::ResolvedBorder;
pub use cell::CellMeasure;
pub use columns::ColumnWidths;
pub use grid::CellOrigin;
pub use rows::RowMetrics;

/// Formatting context for `display: table` boxes
pub struct TableFormattingContext {
    content: Arc<dyn FormattingContext>,
}

impl TableFormattingContext {
    /// Uses the built-in block engine for cell and caption content
    pub fn new() -> Self {
        Self {
            content: Arc::new(BlockFormattingContext::new()),
        }
    }

    /// Plugs in a different content engine
    pub fn with_content_context(content: Arc<dyn FormattingContext>) -> Self {
        Self { content }
    }

    /// Re-lays only the given dirty boxes, falling back to a full layout
    ///
    /// Each dirty id names a cell box whose content changed. The cell is
    /// laid out again at its existing width; if its minimum content width
    /// no longer fits that width, or its used height moved, the whole table
    /// reflows. Otherwise the refreshed cell fragments are patched into a
    /// copy of `previous` and every other fragment keeps its geometry.
    pub fn relayout(
        &self,
        table: &BoxNode,
        constraints: &LayoutConstraints,
        previous: &FragmentNode,
        dirty: &[usize],
    ) -> Result<FragmentNode, LayoutError> {
        let style = &table.style;
        if !style.display.is_table() {
            return Err(LayoutError::UnsupportedBoxType(format!(
                "{:?} is not a table",
                style.display
            )));
        }
        let grid = GridBuilder::new(style.clone()).build(table);
        let collapse = style.border_collapse == BorderCollapse::Collapse;
        let collapsed = collapse.then(|| CollapsedBorders::resolve(&grid, style));

        let mut refreshed: Vec<(usize, CellLayout, f32)> = Vec::with_capacity(dirty.len());
        for &id in dirty {
            let Some((_, grid_cell)) = grid.cells().find(|(_, c)| c.node.id == id) else {
                return self.layout(table, constraints);
            };
            let Some(old) = previous.find_by_box_id(id) else {
                return self.layout(table, constraints);
            };
            let width = old.bounds.width();
            let measure = measure_cell(grid_cell, self.content.as_ref())?;
            if measure.min_width > width + 0.5 {
                return self.layout(table, constraints);
            }
            let border_override = collapsed.as_ref().map(|b| b.cell_border_extents(grid_cell));
            let layout = layout_cell(grid_cell, width, border_override, None, self.content.as_ref())?;
            // Growing and shrinking both move the row, so either escalates
            if (layout.height - old.bounds.height()).abs() > 0.5 {
                return self.layout(table, constraints);
            }
            refreshed.push((id, layout, old.bounds.height()));
        }

        let mut patched = previous.clone();
        for (id, mut layout, extent) in refreshed {
            let grid_cell = grid
                .cells()
                .find(|(_, c)| c.node.id == id)
                .map(|(_, c)| c)
                .ok_or_else(|| LayoutError::MissingContext("dirty cell left the grid".into()))?;
            let row_baseline = row_fragment_baseline(&patched, grid_cell.row);
            let input = CellVerticalInput {
                row: grid_cell.row,
                row_span: grid_cell.row_span,
                height: layout.height,
                baseline: layout.baseline,
                vertical_align: grid_cell.style().vertical_align,
            };
            offset_cell_content(
                &mut layout.fragment,
                align_cell_offset(&input, extent, row_baseline),
            );
            let target = patched
                .find_by_box_id_mut(id)
                .ok_or_else(|| LayoutError::MissingContext("dirty cell has no fragment".into()))?;
            target.children = layout.fragment.children;
            target.baseline = layout.fragment.baseline;
        }
        Ok(patched)
    }
}

impl Default for TableFormattingContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared geometry of the table box: its edge widths and cell spacing
#[derive(Debug, Clone, Copy)]
struct TableChrome {
    edges: EdgeOffsets,
    h_spacing: f32,
    v_spacing: f32,
}

impl TableChrome {
    fn resolve(style: &ComputedStyle, collapsed: Option<&CollapsedBorders>) -> Self {
        match collapsed {
            // The collapsed model replaces the table border with half of each
            // outer grid line and drops spacing and padding
            Some(borders) => Self {
                edges: borders.table_outer_extents(),
                h_spacing: 0.0,
                v_spacing: 0.0,
            },
            None => {
                let border = style.used_border_widths();
                Self {
                    edges: EdgeOffsets::new(
                        border.top + style.padding.top,
                        border.right + style.padding.right,
                        border.bottom + style.padding.bottom,
                        border.left + style.padding.left,
                    ),
                    h_spacing: style.border_spacing_horizontal,
                    v_spacing: style.border_spacing_vertical,
                }
            }
        }
    }

    /// Everything the table's width contains besides the tracks
    fn horizontal_extra(&self, column_count: usize) -> f32 {
        let spacing = if column_count > 0 {
            (column_count + 1) as f32 * self.h_spacing
        } else {
            0.0
        };
        self.edges.horizontal() + spacing
    }

    fn vertical_extra(&self, row_count: usize) -> f32 {
        let spacing = if row_count > 0 {
            (row_count + 1) as f32 * self.v_spacing
        } else {
            0.0
        };
        self.edges.vertical() + spacing
    }
}

impl FormattingContext for TableFormattingContext {
    fn layout(
        &self,
        table: &BoxNode,
        constraints: &LayoutConstraints,
    ) -> Result<FragmentNode, LayoutError> {
        let style = &table.style;
        if !style.display.is_table() {
            return Err(LayoutError::UnsupportedBoxType(format!(
                "{:?} is not a table",
                style.display
            )));
        }

        let grid = GridBuilder::new(style.clone()).build(table);
        let collapse = style.border_collapse == BorderCollapse::Collapse;
        let collapsed = collapse.then(|| CollapsedBorders::resolve(&grid, style));
        let chrome = TableChrome::resolve(style, collapsed.as_ref());
        let extra_w = chrome.horizontal_extra(grid.column_count());

        // The table is never narrower than its widest caption's minimum
        let caption_floor = self.caption_min_width(&grid)?;

        // Column pass
        let column_widths = if style.table_layout == TableLayout::Fixed {
            let specified = resolve_width(style.width, constraints);
            let assigned = specified
                .or_else(|| constraints.available_width.definite_value())
                .unwrap_or(0.0)
                .max(caption_floor);
            solve_fixed_layout(&grid, (assigned - extra_w).max(0.0))
        } else {
            let measures = self.measure_cells(&grid)?;
            let tracks = collect_track_constraints(&grid, &measures);
            let min_total = columns::min_width_sum(&tracks) + extra_w;
            let pref_total = columns::preferred_width_sum(&tracks) + extra_w;
            let specified = resolve_width(style.width, constraints);
            let used = match specified {
                Some(w) => w.max(min_total),
                None => match constraints.available_width {
                    AvailableSpace::Definite(available) => available.min(pref_total).max(min_total),
                    AvailableSpace::MinContent => min_total,
                    AvailableSpace::MaxContent => pref_total,
                },
            }
            .max(caption_floor);
            distribute_widths(&tracks, (used - extra_w).max(0.0))
        };
        let used_width = column_widths.total + extra_w;

        // Pass 2: every cell at its final width
        let height_base = resolve_table_height(style, constraints)
            .map(|h| (h - chrome.vertical_extra(grid.row_count())).max(0.0));
        let mut layouts: Vec<(&GridCell, CellLayout)> = Vec::with_capacity(grid.cell_count());
        for (_, grid_cell) in grid.cells() {
            let width = self.cell_border_box_width(grid_cell, &column_widths.widths, &chrome, collapsed.as_ref());
            let border_override = collapsed.as_ref().map(|b| b.cell_border_extents(grid_cell));
            let layout = layout_cell(
                grid_cell,
                width,
                border_override,
                height_base,
                self.content.as_ref(),
            )?;
            layouts.push((grid_cell, layout));
        }

        // Row pass
        let specified_heights: Vec<LengthOrAuto> =
            grid.rows.iter().map(|r| r.specified_height()).collect();
        let vertical_inputs: Vec<CellVerticalInput> = layouts
            .iter()
            .map(|(grid_cell, layout)| CellVerticalInput {
                row: grid_cell.row,
                row_span: grid_cell.row_span,
                height: layout.height,
                baseline: layout.baseline,
                vertical_align: grid_cell.style().vertical_align,
            })
            .collect();
        let mut metrics = calculate_row_heights(
            &specified_heights,
            &vertical_inputs,
            chrome.v_spacing,
            height_base,
        );
        // A definite table height taller than its rows spreads the rest evenly
        if let Some(base) = height_base {
            let content: f32 = metrics.iter().map(|m| m.height).sum();
            rows::distribute_residual_height(&mut metrics, base - content);
        }

        let grid_fragment = self.assemble_grid_fragment(
            table,
            &grid,
            &column_widths.widths,
            &metrics,
            layouts,
            &chrome,
            collapsed.as_ref(),
            used_width,
            resolve_table_height(style, constraints),
        );

        let wrapper = self.assemble_wrapper(table, &grid, grid_fragment, used_width)?;

        if std::env::var_os("TABLEFLOW_TRACE_TABLE").is_some() {
            eprintln!(
                "[table] {}x{} {} {:.1}x{:.1}",
                grid.row_count(),
                grid.column_count(),
                if collapse { "collapse" } else { "separate" },
                wrapper.bounds.width(),
                wrapper.bounds.height(),
            );
        }

        Ok(wrapper)
    }

    fn compute_intrinsic_inline_size(
        &self,
        table: &BoxNode,
        mode: IntrinsicSizingMode,
    ) -> Result<f32, LayoutError> {
        let style = &table.style;
        if !style.display.is_table() {
            return Err(LayoutError::UnsupportedBoxType(format!(
                "{:?} is not a table",
                style.display
            )));
        }
        let grid = GridBuilder::new(style.clone()).build(table);
        let collapsed = (style.border_collapse == BorderCollapse::Collapse)
            .then(|| CollapsedBorders::resolve(&grid, style));
        let chrome = TableChrome::resolve(style, collapsed.as_ref());

        let measures = self.measure_cells(&grid)?;
        let tracks = collect_track_constraints(&grid, &measures);
        let sum = match mode {
            IntrinsicSizingMode::MinContent => columns::min_width_sum(&tracks),
            IntrinsicSizingMode::MaxContent => columns::preferred_width_sum(&tracks),
        };
        let total = sum + chrome.horizontal_extra(grid.column_count());
        Ok(total.max(self.caption_min_width(&grid)?))
    }
}

impl TableFormattingContext {
    fn measure_cells(&self, grid: &TableGrid) -> Result<Vec<CellSizingInput>, LayoutError> {
        let mut measures = Vec::with_capacity(grid.cell_count());
        for (_, grid_cell) in grid.cells() {
            let measure = measure_cell(grid_cell, self.content.as_ref())?;
            measures.push(CellSizingInput {
                col: grid_cell.col,
                col_span: grid_cell.col_span,
                min_width: measure.min_width,
                preferred_width: measure.preferred_width,
                specified: grid_cell.style().width,
            });
        }
        Ok(measures)
    }

    fn caption_min_width(&self, grid: &TableGrid) -> Result<f32, LayoutError> {
        let mut widest = 0.0f32;
        for caption in &grid.captions {
            let mcw = self
                .content
                .compute_intrinsic_inline_size(&caption.node, IntrinsicSizingMode::MinContent)?;
            widest = widest.max(mcw);
        }
        Ok(widest)
    }

    /// A cell's border-box width once its tracks are solved
    ///
    /// Separated model: spanned tracks plus the swallowed interior gaps.
    /// Collapsed model: spanned tracks run center-to-center of the grid
    /// lines, so the resolved half-borders extend the box on both sides.
    fn cell_border_box_width(
        &self,
        grid_cell: &GridCell,
        widths: &[f32],
        chrome: &TableChrome,
        collapsed: Option<&CollapsedBorders>,
    ) -> f32 {
        let end = (grid_cell.col + grid_cell.col_span).min(widths.len());
        let tracks: f32 = widths[grid_cell.col..end].iter().sum();
        match collapsed {
            Some(borders) => {
                let extents = borders.cell_border_extents(grid_cell);
                tracks + extents.left + extents.right
            }
            None => tracks + (end - grid_cell.col).saturating_sub(1) as f32 * chrome.h_spacing,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble_grid_fragment(
        &self,
        table: &BoxNode,
        grid: &TableGrid,
        widths: &[f32],
        metrics: &[rows::RowMetrics],
        layouts: Vec<(&GridCell, CellLayout)>,
        chrome: &TableChrome,
        collapsed: Option<&CollapsedBorders>,
        used_width: f32,
        specified_height: Option<f32>,
    ) -> FragmentNode {
        // Grid line coordinates; in the separated model these are the track
        // origins, spacing already applied
        let mut col_x = Vec::with_capacity(widths.len() + 1);
        let mut x = chrome.edges.left + chrome.h_spacing;
        for width in widths {
            col_x.push(x);
            x += width + chrome.h_spacing;
        }
        col_x.push(x - chrome.h_spacing);

        let mut row_y = Vec::with_capacity(metrics.len() + 1);
        let mut y = chrome.edges.top + chrome.v_spacing;
        for metric in metrics {
            row_y.push(y);
            y += metric.height + chrome.v_spacing;
        }
        row_y.push(y - chrome.v_spacing);

        let content_height = if metrics.is_empty() {
            chrome.edges.vertical()
        } else {
            row_y.last().copied().unwrap_or(0.0) + chrome.v_spacing + chrome.edges.bottom
        };
        // A specified table height is a minimum, never a clip
        let grid_height = content_height.max(specified_height.unwrap_or(0.0));

        // One fragment per row, cells inside in grid order
        let mut row_fragments: Vec<FragmentNode> = metrics
            .iter()
            .enumerate()
            .map(|(i, metric)| {
                let row_x = col_x.first().copied().unwrap_or(chrome.edges.left);
                let row_width = col_x.last().copied().unwrap_or(row_x) - row_x;
                FragmentNode {
                    bounds: Rect::from_xywh(row_x, row_y[i], row_width, metric.height),
                    content: FragmentContent::TableRow,
                    baseline: metric.baseline,
                    children: Vec::new(),
                    style: grid.rows[i].style.clone(),
                    box_id: 0,
                }
            })
            .collect();

        for (grid_cell, mut layout) in layouts {
            let extent = spanned_extent(metrics, grid_cell.row, grid_cell.row_span, chrome.v_spacing);
            let input = CellVerticalInput {
                row: grid_cell.row,
                row_span: grid_cell.row_span,
                height: layout.height,
                baseline: layout.baseline,
                vertical_align: grid_cell.style().vertical_align,
            };
            let row_baseline = metrics.get(grid_cell.row).and_then(|m| m.baseline);
            offset_cell_content(
                &mut layout.fragment,
                align_cell_offset(&input, extent, row_baseline),
            );

            let (cell_x, cell_width) = match collapsed {
                Some(borders) => {
                    let extents = borders.cell_border_extents(grid_cell);
                    (
                        col_x[grid_cell.col] - extents.left,
                        layout.fragment.bounds.width(),
                    )
                }
                None => (col_x[grid_cell.col], layout.fragment.bounds.width()),
            };
            let row_fragment = &mut row_fragments[grid_cell.row];
            let hidden = layout.hidden && collapsed.is_none();
            row_fragment.children.push(FragmentNode {
                bounds: Rect::from_xywh(cell_x - row_fragment.bounds.x(), 0.0, cell_width, extent),
                content: FragmentContent::TableCell { hidden },
                baseline: layout.fragment.baseline,
                children: layout.fragment.children,
                style: Some(grid_cell.style().clone()),
                box_id: grid_cell.node.id,
            });
        }

        let table_baseline = metrics
            .first()
            .and_then(|m| m.baseline)
            .map(|b| row_y.first().copied().unwrap_or(0.0) + b);

        let border_segments = collapsed
            .map(|borders| collect_border_segments(grid, borders, &col_x, &row_y))
            .unwrap_or_default();

        FragmentNode {
            bounds: Rect::from_xywh(0.0, 0.0, used_width, grid_height),
            content: FragmentContent::Table { border_segments },
            baseline: table_baseline,
            children: row_fragments,
            style: Some(table.style.clone()),
            box_id: 0,
        }
    }

    /// Stacks top captions, the grid box, then bottom captions
    fn assemble_wrapper(
        &self,
        table: &BoxNode,
        grid: &TableGrid,
        grid_fragment: FragmentNode,
        used_width: f32,
    ) -> Result<FragmentNode, LayoutError> {
        let mut children = Vec::with_capacity(grid.captions.len() + 1);
        let mut cursor = 0.0f32;
        let caption_constraints = LayoutConstraints::definite_width(used_width);

        for caption in &grid.captions {
            if caption.side != CaptionSide::Top {
                continue;
            }
            let fragment = self.content.layout(&caption.node, &caption_constraints)?;
            cursor += self.push_caption(&mut children, caption, fragment, cursor);
        }

        let mut grid_fragment = grid_fragment;
        let grid_y = cursor;
        grid_fragment.bounds.origin.y = grid_y;
        let baseline = grid_fragment.baseline.map(|b| grid_y + b);
        cursor += grid_fragment.bounds.height();
        children.push(grid_fragment);

        for caption in &grid.captions {
            if caption.side != CaptionSide::Bottom {
                continue;
            }
            let fragment = self.content.layout(&caption.node, &caption_constraints)?;
            cursor += self.push_caption(&mut children, caption, fragment, cursor);
        }

        Ok(FragmentNode {
            bounds: Rect::from_xywh(0.0, 0.0, used_width, cursor),
            content: FragmentContent::TableWrapper,
            baseline,
            children,
            style: None,
            box_id: table.id,
        })
    }

    fn push_caption(
        &self,
        children: &mut Vec<FragmentNode>,
        caption: &grid::Caption,
        mut fragment: FragmentNode,
        y: f32,
    ) -> f32 {
        let height = fragment.bounds.height();
        fragment.bounds.origin = Point::new(0.0, y);
        fragment.content = FragmentContent::TableCaption;
        fragment.style = Some(caption.node.style.clone());
        fragment.box_id = caption.node.id;
        children.push(fragment);
        height
    }
}

/// Builds the collapsed-border paint list, one segment per edge
fn collect_border_segments(
    grid: &TableGrid,
    borders: &CollapsedBorders,
    col_x: &[f32],
    row_y: &[f32],
) -> Vec<BorderSegment> {
    let cols = grid.column_count();
    let rows = grid.row_count();
    let mut segments = Vec::new();

    for line_x in 0..=cols {
        for row in 0..rows {
            let edge = borders.vertical_at(row, line_x);
            if !edge.is_visible() {
                continue;
            }
            segments.push(BorderSegment {
                axis: SegmentAxis::Vertical,
                start: Point::new(col_x[line_x], row_y[row]),
                length: row_y[row + 1] - row_y[row],
                width: edge.width,
                style: edge.style,
                color: edge.color,
            });
        }
    }
    for line_y in 0..=rows {
        for col in 0..cols {
            let edge = borders.horizontal_at(line_y, col);
            if !edge.is_visible() {
                continue;
            }
            segments.push(BorderSegment {
                axis: SegmentAxis::Horizontal,
                start: Point::new(col_x[col], row_y[line_y]),
                length: col_x[col + 1] - col_x[col],
                width: edge.width,
                style: edge.style,
                color: edge.color,
            });
        }
    }
    segments
}

fn resolve_width(width: LengthOrAuto, constraints: &LayoutConstraints) -> Option<f32> {
    match width {
        LengthOrAuto::Length(l) if l.unit == LengthUnit::Percent => constraints
            .percentage_base_width
            .map(|base| l.resolve_against(base)),
        LengthOrAuto::Length(l) => Some(l.to_px()),
        LengthOrAuto::Auto => None,
    }
}

fn resolve_table_height(style: &ComputedStyle, constraints: &LayoutConstraints) -> Option<f32> {
    match style.height {
        LengthOrAuto::Length(l) if l.unit == LengthUnit::Percent => constraints
            .percentage_base_height
            .map(|base| l.resolve_against(base)),
        LengthOrAuto::Length(l) => Some(l.to_px()),
        LengthOrAuto::Auto => None,
    }
}

/// Baseline of the row fragment holding `row`, read from a previous layout
fn row_fragment_baseline(wrapper: &FragmentNode, row: usize) -> Option<f32> {
    let grid_fragment = wrapper
        .children
        .iter()
        .find(|c| matches!(c.content, FragmentContent::Table { .. }))?;
    grid_fragment.children.get(row)?.baseline
}
