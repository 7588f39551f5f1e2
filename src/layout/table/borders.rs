//! Collapsing border conflict resolution
//!
//! In the collapsed model (CSS 2.1 §17.6.2) every grid line segment is
//! shared: the cell, row, row group, column, column group, and table
//! borders that meet there compete, and exactly one wins. Resolution is a
//! pairwise fold over the candidates in precedence order:
//!
//! 1. `hidden` wins immediately and locks the edge at zero width;
//! 2. `none` never wins against a real style;
//! 3. otherwise the strictly wider border wins;
//! 4. at equal widths the higher-ranked style wins
//!    (`double` > `solid` > `dashed` > `dotted` > `ridge` > `outset` >
//!    `groove` > `inset`);
//! 5. an exact tie keeps the earlier winner.
//!
//! Row groups only compete where the groups on either side of the line
//! differ; interior lines of a spanning cell have no edge at all.

use crate::geometry::EdgeOffsets;
use crate::layout::table::grid::{GridCell, TableGrid};
use crate::style::color::Rgba;
use crate::style::computed::BorderEdge;
use crate::style::types::BorderStyle;
use crate::style::ComputedStyle;

/// The winning border for one edge segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedBorder {
    pub width: f32,
    pub style: BorderStyle,
    pub color: Rgba,
}

impl ResolvedBorder {
    /// No border: zero width, style `none`
    pub const NONE: Self = Self {
        width: 0.0,
        style: BorderStyle::None,
        color: Rgba::BLACK,
    };

    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && !self.style.is_invisible()
    }
}

/// Rank used to break width ties, more dominant styles higher
fn style_rank(style: BorderStyle) -> u8 {
    match style {
        BorderStyle::Double => 8,
        BorderStyle::Solid => 7,
        BorderStyle::Dashed => 6,
        BorderStyle::Dotted => 5,
        BorderStyle::Ridge => 4,
        BorderStyle::Outset => 3,
        BorderStyle::Groove => 2,
        BorderStyle::Inset => 1,
        BorderStyle::None | BorderStyle::Hidden => 0,
    }
}

/// Folds one candidate into the running winner
struct EdgeFold {
    winner: ResolvedBorder,
    locked: bool,
}

impl EdgeFold {
    fn new() -> Self {
        Self {
            winner: ResolvedBorder::NONE,
            locked: false,
        }
    }

    fn fold(&mut self, candidate: BorderEdge) {
        if self.locked {
            return;
        }
        if candidate.style == BorderStyle::Hidden {
            self.winner = ResolvedBorder {
                width: 0.0,
                style: BorderStyle::Hidden,
                color: candidate.color,
            };
            self.locked = true;
            return;
        }
        if candidate.style == BorderStyle::None {
            return;
        }
        let wins = candidate.width > self.winner.width
            || (candidate.width == self.winner.width
                && style_rank(candidate.style) > style_rank(self.winner.style));
        if wins {
            self.winner = ResolvedBorder {
                width: candidate.width,
                style: candidate.style,
                color: candidate.color,
            };
        }
    }

    fn finish(self) -> ResolvedBorder {
        self.winner
    }
}

/// All resolved edges of one table grid
///
/// Vertical edges separate columns: `(columns + 1) × rows` of them, one per
/// row of each grid line. Horizontal edges separate rows:
/// `columns × (rows + 1)`.
#[derive(Debug, Clone)]
pub struct CollapsedBorders {
    columns: usize,
    rows: usize,
    /// Indexed `row * (columns + 1) + line_x`
    vertical: Vec<ResolvedBorder>,
    /// Indexed `line_y * columns + col`
    horizontal: Vec<ResolvedBorder>,
}

impl CollapsedBorders {
    /// Resolves every edge of the grid
    pub fn resolve(grid: &TableGrid, table_style: &ComputedStyle) -> Self {
        let columns = grid.column_count();
        let rows = grid.row_count();
        let mut borders = Self {
            columns,
            rows,
            vertical: vec![ResolvedBorder::NONE; (columns + 1) * rows],
            horizontal: vec![ResolvedBorder::NONE; columns * (rows + 1)],
        };

        for y in 0..rows {
            for line_x in 0..=columns {
                borders.vertical[y * (columns + 1) + line_x] =
                    resolve_vertical_edge(grid, table_style, y, line_x);
            }
        }
        for line_y in 0..=rows {
            for x in 0..columns {
                borders.horizontal[line_y * columns + x] =
                    resolve_horizontal_edge(grid, table_style, line_y, x);
            }
        }
        borders
    }

    /// The edge between columns `line_x - 1` and `line_x`, in row `row`
    pub fn vertical_at(&self, row: usize, line_x: usize) -> &ResolvedBorder {
        &self.vertical[row * (self.columns + 1) + line_x]
    }

    /// The edge between rows `line_y - 1` and `line_y`, in column `col`
    pub fn horizontal_at(&self, line_y: usize, col: usize) -> &ResolvedBorder {
        &self.horizontal[line_y * self.columns + col]
    }

    /// Widest resolved border along a vertical grid line
    pub fn vertical_line_max(&self, line_x: usize) -> f32 {
        (0..self.rows)
            .map(|row| self.vertical_at(row, line_x).width)
            .fold(0.0, f32::max)
    }

    /// Widest resolved border along a horizontal grid line
    pub fn horizontal_line_max(&self, line_y: usize) -> f32 {
        (0..self.columns)
            .map(|col| self.horizontal_at(line_y, col).width)
            .fold(0.0, f32::max)
    }

    /// A cell's effective border extents: half the widest resolved edge on
    /// each of its four sides
    pub fn cell_border_extents(&self, cell: &GridCell) -> EdgeOffsets {
        let row_end = cell.row + cell.row_span;
        let col_end = cell.col + cell.col_span;
        let left = (cell.row..row_end)
            .map(|r| self.vertical_at(r, cell.col).width)
            .fold(0.0, f32::max);
        let right = (cell.row..row_end)
            .map(|r| self.vertical_at(r, col_end).width)
            .fold(0.0, f32::max);
        let top = (cell.col..col_end)
            .map(|c| self.horizontal_at(cell.row, c).width)
            .fold(0.0, f32::max);
        let bottom = (cell.col..col_end)
            .map(|c| self.horizontal_at(row_end, c).width)
            .fold(0.0, f32::max);
        EdgeOffsets {
            top: top / 2.0,
            right: right / 2.0,
            bottom: bottom / 2.0,
            left: left / 2.0,
        }
    }

    /// The table's own border extents: half the widest resolved border along
    /// each outer grid line
    pub fn table_outer_extents(&self) -> EdgeOffsets {
        if self.rows == 0 || self.columns == 0 {
            return EdgeOffsets::ZERO;
        }
        EdgeOffsets {
            top: self.horizontal_line_max(0) / 2.0,
            right: self.vertical_line_max(self.columns) / 2.0,
            bottom: self.horizontal_line_max(self.rows) / 2.0,
            left: self.vertical_line_max(0) / 2.0,
        }
    }
}

fn resolve_vertical_edge(
    grid: &TableGrid,
    table_style: &ComputedStyle,
    row: usize,
    line_x: usize,
) -> ResolvedBorder {
    let columns = grid.column_count();

    // Interior of a spanning cell: no edge exists on this line
    if line_x > 0 && line_x < columns {
        let left = grid.handle_at(row, line_x - 1);
        let right = grid.handle_at(row, line_x);
        if left.is_some() && left == right {
            return ResolvedBorder::NONE;
        }
    }

    let mut fold = EdgeFold::new();

    // Cells adjacent to the edge
    if line_x > 0 {
        if let Some(cell) = grid.cell_at(row, line_x - 1) {
            if cell.col + cell.col_span == line_x {
                fold.fold(cell.style().border_right());
            }
        }
    }
    if line_x < columns {
        if let Some(cell) = grid.cell_at(row, line_x) {
            if cell.col == line_x {
                fold.fold(cell.style().border_left());
            }
        }
    }

    // The row's own border at the table's outer lines
    if let Some(style) = &grid.rows[row].style {
        if line_x == 0 {
            fold.fold(style.border_left());
        }
        if line_x == columns {
            fold.fold(style.border_right());
        }
    }
    // Same for the row's group
    if let Some(style) = &grid.row_groups[grid.row_group_of(row)].style {
        if line_x == 0 {
            fold.fold(style.border_left());
        }
        if line_x == columns {
            fold.fold(style.border_right());
        }
    }

    // Columns on either side of the line
    if line_x > 0 {
        if let Some(style) = &grid.columns[line_x - 1].style {
            fold.fold(style.border_right());
        }
    }
    if line_x < columns {
        if let Some(style) = &grid.columns[line_x].style {
            fold.fold(style.border_left());
        }
    }

    // Column groups compete only where the groups across the line differ
    let group_left = if line_x > 0 {
        grid.columns[line_x - 1].group
    } else {
        None
    };
    let group_right = if line_x < columns {
        grid.columns[line_x].group
    } else {
        None
    };
    if group_left != group_right || line_x == 0 || line_x == columns {
        if let Some(g) = group_left {
            fold.fold(grid.column_groups[g].style.border_right());
        }
        if let Some(g) = group_right {
            fold.fold(grid.column_groups[g].style.border_left());
        }
    }

    // The table itself at the outermost lines
    if line_x == 0 {
        fold.fold(table_style.border_left());
    }
    if line_x == columns {
        fold.fold(table_style.border_right());
    }

    fold.finish()
}

fn resolve_horizontal_edge(
    grid: &TableGrid,
    table_style: &ComputedStyle,
    line_y: usize,
    col: usize,
) -> ResolvedBorder {
    let rows = grid.row_count();

    if line_y > 0 && line_y < rows {
        let above = grid.handle_at(line_y - 1, col);
        let below = grid.handle_at(line_y, col);
        if above.is_some() && above == below {
            return ResolvedBorder::NONE;
        }
    }

    let mut fold = EdgeFold::new();

    // Cell above's bottom, cell below's top
    if line_y > 0 {
        if let Some(cell) = grid.cell_at(line_y - 1, col) {
            if cell.row + cell.row_span == line_y {
                fold.fold(cell.style().border_bottom());
            }
        }
    }
    if line_y < rows {
        if let Some(cell) = grid.cell_at(line_y, col) {
            if cell.row == line_y {
                fold.fold(cell.style().border_top());
            }
        }
    }

    // Row above's bottom, row below's top
    if line_y > 0 {
        if let Some(style) = &grid.rows[line_y - 1].style {
            fold.fold(style.border_bottom());
        }
    }
    if line_y < rows {
        if let Some(style) = &grid.rows[line_y].style {
            fold.fold(style.border_top());
        }
    }

    // Row groups compete only at their boundaries
    let group_above = if line_y > 0 {
        Some(grid.row_group_of(line_y - 1))
    } else {
        None
    };
    let group_below = if line_y < rows {
        Some(grid.row_group_of(line_y))
    } else {
        None
    };
    if group_above != group_below {
        if let Some(style) = group_above.and_then(|g| grid.row_groups[g].style.as_ref()) {
            fold.fold(style.border_bottom());
        }
        if let Some(style) = group_below.and_then(|g| grid.row_groups[g].style.as_ref()) {
            fold.fold(style.border_top());
        }
    }

    // The column's border at the table's outer lines
    if let Some(style) = &grid.columns[col].style {
        if line_y == 0 {
            fold.fold(style.border_top());
        }
        if line_y == rows {
            fold.fold(style.border_bottom());
        }
    }
    if let Some(g) = grid.columns[col].group {
        let style = &grid.column_groups[g].style;
        if line_y == 0 {
            fold.fold(style.border_top());
        }
        if line_y == rows {
            fold.fold(style.border_bottom());
        }
    }

    if line_y == 0 {
        fold.fold(table_style.border_top());
    }
    if line_y == rows {
        fold.fold(table_style.border_bottom());
    }

    fold.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::EdgeOffsets;
    use crate::layout::table::grid::GridBuilder;
    use crate::style::computed::BorderStyles;
    use crate::style::types::Display;
    use crate::tree::box_tree::BoxNode;
    use std::sync::Arc;

    fn bordered_style(display: Display, width: f32, style: BorderStyle) -> Arc<ComputedStyle> {
        Arc::new(ComputedStyle {
            display,
            border_width: EdgeOffsets::uniform(width),
            border_style: BorderStyles::uniform(style),
            ..ComputedStyle::default()
        })
    }

    fn cell_with_border(width: f32, style: BorderStyle) -> BoxNode {
        BoxNode::new_block(bordered_style(Display::TableCell, width, style), vec![])
    }

    fn row_of(cells: Vec<BoxNode>) -> BoxNode {
        BoxNode::new_block(
            Arc::new(ComputedStyle {
                display: Display::TableRow,
                ..ComputedStyle::default()
            }),
            cells,
        )
    }

    fn resolve_pair(left: BoxNode, right: BoxNode) -> (TableGrid, CollapsedBorders) {
        let table_style = Arc::new(ComputedStyle {
            display: Display::Table,
            ..ComputedStyle::default()
        });
        let table = BoxNode::new_block(table_style.clone(), vec![row_of(vec![left, right])]);
        let grid = GridBuilder::new(table_style.clone()).build(&table);
        let borders = CollapsedBorders::resolve(&grid, &table_style);
        (grid, borders)
    }

    #[test]
    fn wider_border_wins_regardless_of_style_rank() {
        let (_, borders) = resolve_pair(
            cell_with_border(1.0, BorderStyle::Double),
            cell_with_border(3.0, BorderStyle::Dotted),
        );
        let edge = borders.vertical_at(0, 1);
        assert_eq!(edge.width, 3.0);
        assert_eq!(edge.style, BorderStyle::Dotted);
    }

    #[test]
    fn style_rank_breaks_width_ties() {
        let (_, borders) = resolve_pair(
            cell_with_border(2.0, BorderStyle::Dashed),
            cell_with_border(2.0, BorderStyle::Solid),
        );
        assert_eq!(borders.vertical_at(0, 1).style, BorderStyle::Solid);
    }

    #[test]
    fn exact_tie_keeps_the_earlier_candidate() {
        let left = BoxNode::new_block(
            Arc::new(ComputedStyle {
                display: Display::TableCell,
                border_width: EdgeOffsets::uniform(2.0),
                border_style: BorderStyles::uniform(BorderStyle::Solid),
                border_color: crate::style::computed::BorderColors {
                    right: Rgba::rgb(255, 0, 0),
                    ..Default::default()
                },
                ..ComputedStyle::default()
            }),
            vec![],
        );
        let right = BoxNode::new_block(
            Arc::new(ComputedStyle {
                display: Display::TableCell,
                border_width: EdgeOffsets::uniform(2.0),
                border_style: BorderStyles::uniform(BorderStyle::Solid),
                border_color: crate::style::computed::BorderColors {
                    left: Rgba::rgb(0, 0, 255),
                    ..Default::default()
                },
                ..ComputedStyle::default()
            }),
            vec![],
        );
        let (_, borders) = resolve_pair(left, right);
        // The left cell folded first and the tie keeps it
        assert_eq!(borders.vertical_at(0, 1).color, Rgba::rgb(255, 0, 0));
    }

    #[test]
    fn hidden_suppresses_everything_and_locks() {
        let (_, borders) = resolve_pair(
            cell_with_border(1.0, BorderStyle::Hidden),
            cell_with_border(10.0, BorderStyle::Solid),
        );
        let edge = borders.vertical_at(0, 1);
        assert_eq!(edge.style, BorderStyle::Hidden);
        assert_eq!(edge.width, 0.0);
        assert!(!edge.is_visible());
    }

    #[test]
    fn none_never_wins_against_a_real_style() {
        // The none border is wider on paper; the real style still wins
        let left = BoxNode::new_block(
            Arc::new(ComputedStyle {
                display: Display::TableCell,
                border_width: EdgeOffsets::uniform(10.0),
                border_style: BorderStyles::uniform(BorderStyle::None),
                ..ComputedStyle::default()
            }),
            vec![],
        );
        let (_, borders) = resolve_pair(left, cell_with_border(1.0, BorderStyle::Solid));
        let edge = borders.vertical_at(0, 1);
        assert_eq!(edge.style, BorderStyle::Solid);
        assert_eq!(edge.width, 1.0);
    }

    #[test]
    fn table_border_participates_at_outer_lines_only() {
        let table_style = Arc::new(ComputedStyle {
            display: Display::Table,
            border_collapse: crate::style::BorderCollapse::Collapse,
            border_width: EdgeOffsets::uniform(6.0),
            border_style: BorderStyles::uniform(BorderStyle::Solid),
            ..ComputedStyle::default()
        });
        let table = BoxNode::new_block(
            table_style.clone(),
            vec![row_of(vec![
                cell_with_border(1.0, BorderStyle::Solid),
                cell_with_border(1.0, BorderStyle::Solid),
            ])],
        );
        let grid = GridBuilder::new(table_style.clone()).build(&table);
        let borders = CollapsedBorders::resolve(&grid, &table_style);
        assert_eq!(borders.vertical_at(0, 0).width, 6.0);
        assert_eq!(borders.vertical_at(0, 2).width, 6.0);
        // Interior line has only the 1px cell borders
        assert_eq!(borders.vertical_at(0, 1).width, 1.0);
        // Table extents halve the outer winners
        let outer = borders.table_outer_extents();
        assert_eq!(outer.left, 3.0);
        assert_eq!(outer.top, 3.0);
    }

    #[test]
    fn row_groups_compete_only_at_group_boundaries() {
        let group_style = Arc::new(ComputedStyle {
            display: Display::TableRowGroup,
            border_width: EdgeOffsets::uniform(5.0),
            border_style: BorderStyles::uniform(BorderStyle::Solid),
            ..ComputedStyle::default()
        });
        let plain_cell = || cell_with_border(1.0, BorderStyle::Solid);
        let table_style = Arc::new(ComputedStyle {
            display: Display::Table,
            ..ComputedStyle::default()
        });
        let table = BoxNode::new_block(
            table_style.clone(),
            vec![
                BoxNode::new_block(
                    group_style.clone(),
                    vec![row_of(vec![plain_cell()]), row_of(vec![plain_cell()])],
                ),
                BoxNode::new_block(group_style.clone(), vec![row_of(vec![plain_cell()])]),
            ],
        );
        let grid = GridBuilder::new(table_style.clone()).build(&table);
        let borders = CollapsedBorders::resolve(&grid, &table_style);
        // Inside the first group the 5px group border does not apply
        assert_eq!(borders.horizontal_at(1, 0).width, 1.0);
        // At the boundary between the groups it does
        assert_eq!(borders.horizontal_at(2, 0).width, 5.0);
        // And at the grid top and bottom
        assert_eq!(borders.horizontal_at(0, 0).width, 5.0);
        assert_eq!(borders.horizontal_at(3, 0).width, 5.0);
    }

    #[test]
    fn spanning_cell_interior_lines_have_no_edge() {
        let table_style = Arc::new(ComputedStyle {
            display: Display::Table,
            ..ComputedStyle::default()
        });
        let wide = cell_with_border(4.0, BorderStyle::Solid).with_spans(2, 1);
        let table = BoxNode::new_block(
            table_style.clone(),
            vec![row_of(vec![wide]), row_of(vec![
                cell_with_border(1.0, BorderStyle::Solid),
                cell_with_border(1.0, BorderStyle::Solid),
            ])],
        );
        let grid = GridBuilder::new(table_style.clone()).build(&table);
        let borders = CollapsedBorders::resolve(&grid, &table_style);
        // Line 1 crosses the colspan in row 0: no edge
        assert_eq!(*borders.vertical_at(0, 1), ResolvedBorder::NONE);
        // Same line in row 1 separates two real cells
        assert_eq!(borders.vertical_at(1, 1).width, 1.0);
    }

    #[test]
    fn cell_extents_are_half_the_resolved_widths() {
        let (grid, borders) = resolve_pair(
            cell_with_border(4.0, BorderStyle::Solid),
            cell_with_border(2.0, BorderStyle::Solid),
        );
        let left_cell = grid.cell_at(0, 0).unwrap();
        let extents = borders.cell_border_extents(left_cell);
        assert_eq!(extents.left, 2.0);
        // Shared edge resolved to the 4px border; each neighbor gets half
        assert_eq!(extents.right, 2.0);
        let right_cell = grid.cell_at(0, 1).unwrap();
        assert_eq!(borders.cell_border_extents(right_cell).left, 2.0);
        assert_eq!(borders.cell_border_extents(right_cell).right, 1.0);
    }
}
