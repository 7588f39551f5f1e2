//! Table grid synthesis
//!
//! Turns the children of a table box, well-formed or not, into a
//! rectangular grid of cells. Handles the anonymous-box repair rules of
//! CSS 2.1 §17.2.1: loose cells get an anonymous row, loose content gets
//! an anonymous cell, loose rows get an anonymous row group. Grid
//! occupancy is a flat row-major buffer of handles into a cell arena.
//!
//! Header and footer row groups are remembered during the walk and their
//! rows are stably rotated to the front and back of the grid once all
//! children have been processed, so later phases can lay rows out strictly
//! in grid order.

use std::sync::Arc;

use crate::style::types::{CaptionSide, Display};
use crate::style::values::LengthOrAuto;
use crate::style::ComputedStyle;
use crate::tree::box_tree::{AnonymousType, BoxNode};

/// Index into the grid's cell arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellHandle(pub usize);

/// Where a grid cell came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellOrigin {
    /// Generated from a source box with this id
    FromSource(usize),
    /// Synthesized during grid repair
    Synthetic,
}

/// One cell of the grid
#[derive(Debug, Clone)]
pub struct GridCell {
    /// The cell box; anonymous when the cell was synthesized
    pub node: BoxNode,
    pub origin: CellOrigin,
    /// Grid position of the cell's top-left slot
    pub row: usize,
    pub col: usize,
    /// Resolved spans; always at least 1 after grid construction
    pub row_span: usize,
    pub col_span: usize,
}

impl GridCell {
    /// Style shorthand
    pub fn style(&self) -> &Arc<ComputedStyle> {
        &self.node.style
    }
}

/// Kind of a row group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowGroupKind {
    Header,
    Footer,
    Body,
}

/// A run of rows belonging to one source (or anonymous) row group
#[derive(Debug, Clone)]
pub struct RowGroupInfo {
    pub kind: RowGroupKind,
    /// None for the anonymous group wrapping loose rows
    pub style: Option<Arc<ComputedStyle>>,
    pub start_row: usize,
    pub row_count: usize,
}

/// Per-row data
#[derive(Debug, Clone)]
pub struct RowInfo {
    /// None for rows created by span growth before their source row arrived
    pub style: Option<Arc<ComputedStyle>>,
    /// Index into [`TableGrid::row_groups`]
    pub group: usize,
}

impl RowInfo {
    /// The row's specified height
    pub fn specified_height(&self) -> LengthOrAuto {
        self
            .style
            .as_ref()
            .map(|s| s.height)
            .unwrap_or(LengthOrAuto::Auto)
    }
}

/// Per-column-track data
#[derive(Debug, Clone, Default)]
pub struct ColumnInfo {
    /// Style of the `col` element backing this track, if any
    pub style: Option<Arc<ComputedStyle>>,
    /// Index into [`TableGrid::column_groups`]
    pub group: Option<usize>,
}

impl ColumnInfo {
    /// The track's specified width from its `col` element
    pub fn specified_width(&self) -> LengthOrAuto {
        self
            .style
            .as_ref()
            .map(|s| s.width)
            .unwrap_or(LengthOrAuto::Auto)
    }
}

/// A `colgroup` element's track range
#[derive(Debug, Clone)]
pub struct ColumnGroupInfo {
    pub style: Arc<ComputedStyle>,
    pub start: usize,
    pub span: usize,
}

/// A caption box with its resolved side
#[derive(Debug, Clone)]
pub struct Caption {
    pub node: BoxNode,
    pub side: CaptionSide,
}

/// The synthesized table grid
///
/// Occupancy is a flat row-major buffer: slot `(row, col)` lives at
/// `row * column_count + col` and holds the handle of the cell covering it
/// (a spanning cell covers several slots). Carries no construction state;
/// that lives in [`GridBuilder`] and dies with it.
#[derive(Debug, Clone)]
pub struct TableGrid {
    pub columns: Vec<ColumnInfo>,
    pub column_groups: Vec<ColumnGroupInfo>,
    pub rows: Vec<RowInfo>,
    pub row_groups: Vec<RowGroupInfo>,
    pub captions: Vec<Caption>,
    /// Rows at the front of the grid that came from the header group
    pub header_rows: usize,
    /// Rows at the back of the grid that came from the footer group
    pub footer_rows: usize,
    cells: Vec<GridCell>,
    grid: Vec<Option<CellHandle>>,
}

impl TableGrid {
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Handle of the cell covering a slot, if any
    pub fn handle_at(&self, row: usize, col: usize) -> Option<CellHandle> {
        if row >= self.rows.len() || col >= self.columns.len() {
            return None;
        }
        self.grid[row * self.columns.len() + col]
    }

    pub fn cell(&self, handle: CellHandle) -> &GridCell {
        &self.cells[handle.0]
    }

    /// The cell covering a slot, if any
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&GridCell> {
        self.handle_at(row, col).map(|h| self.cell(h))
    }

    /// True when the slot is the top-left slot of its cell
    pub fn is_cell_origin(&self, row: usize, col: usize) -> bool {
        match self.cell_at(row, col) {
            Some(cell) => cell.row == row && cell.col == col,
            None => false,
        }
    }

    /// All cells in document order with their handles
    pub fn cells(&self) -> impl Iterator<Item = (CellHandle, &GridCell)> {
        self
            .cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (CellHandle(i), cell))
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// The row group a row belongs to
    pub fn row_group_of(&self, row: usize) -> usize {
        self.rows[row].group
    }
}

/// Context a table child is being classified in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChildContext {
    Table,
    RowGroup,
    Row,
}

/// What a child turned out to be in its context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Classified {
    Caption,
    ColumnGroup,
    Column,
    RowGroup(RowGroupKind),
    Row,
    Cell,
    /// display:none or droppable whitespace
    Skip,
    /// Anything that needs anonymous wrapping in this context
    Loose,
}

/// Classifies one child of a table part
///
/// Display is consulted first; the source element name breaks the tie only
/// when display names no table part. Parts that are not legal in the given
/// context come back as `Loose` so the caller wraps them.
fn classify_child(node: &BoxNode, context: ChildContext) -> Classified {
    if node.style.display == Display::None || node.is_whitespace_text() {
        return Classified::Skip;
    }

    let by_display = match node.style.display {
        Display::TableCaption => Some(Classified::Caption),
        Display::TableColumnGroup => Some(Classified::ColumnGroup),
        Display::TableColumn => Some(Classified::Column),
        Display::TableHeaderGroup => Some(Classified::RowGroup(RowGroupKind::Header)),
        Display::TableFooterGroup => Some(Classified::RowGroup(RowGroupKind::Footer)),
        Display::TableRowGroup => Some(Classified::RowGroup(RowGroupKind::Body)),
        Display::TableRow => Some(Classified::Row),
        Display::TableCell => Some(Classified::Cell),
        _ => None,
    };

    let part = by_display.or_else(|| match node.tag_name.as_deref() {
        Some("caption") => Some(Classified::Caption),
        Some("colgroup") => Some(Classified::ColumnGroup),
        Some("col") => Some(Classified::Column),
        Some("thead") => Some(Classified::RowGroup(RowGroupKind::Header)),
        Some("tfoot") => Some(Classified::RowGroup(RowGroupKind::Footer)),
        Some("tbody") => Some(Classified::RowGroup(RowGroupKind::Body)),
        Some("tr") => Some(Classified::Row),
        Some("td") | Some("th") => Some(Classified::Cell),
        _ => None,
    });

    let part = match part {
        Some(part) => part,
        None => return Classified::Loose,
    };

    // Legality depends on where the child sits
    match context {
        ChildContext::Table => part,
        ChildContext::RowGroup => match part {
            Classified::Row | Classified::Cell => part,
            _ => Classified::Loose,
        },
        ChildContext::Row => match part {
            Classified::Cell => part,
            _ => Classified::Loose,
        },
    }
}

/// Builds a [`TableGrid`] from the children of a table box
///
/// A builder is consumed by one [`build`](GridBuilder::build) call; cursor
/// position, the pending header/footer groups, and open anonymous runs all
/// live here and are gone once the grid is returned.
pub struct GridBuilder {
    table_style: Arc<ComputedStyle>,

    columns: Vec<ColumnInfo>,
    column_groups: Vec<ColumnGroupInfo>,
    /// Tracks claimed by `col`/`colgroup` elements so far
    declared_columns: usize,

    rows: Vec<RowInfo>,
    row_groups: Vec<RowGroupInfo>,
    cells: Vec<GridCell>,
    grid: Vec<Option<CellHandle>>,

    captions: Vec<Caption>,

    header_group: Option<usize>,
    footer_group: Option<usize>,
    /// Anonymous body group collecting loose rows/cells, while open
    open_anonymous_group: Option<usize>,

    /// Next source row index; may trail `rows.len()` after span growth
    current_y: usize,
    cursor_x: usize,

    /// Cell boxes collecting into an open anonymous row
    pending_row_cells: Vec<BoxNode>,
    /// Loose boxes collecting into an open anonymous cell
    pending_cell_content: Vec<BoxNode>,

    /// Cells with rowspan 0 in the group being built
    zero_span_cells: Vec<CellHandle>,

    /// Row counts moved to the front/back by the rotation pass
    rotated_header_rows: usize,
    rotated_footer_rows: usize,
}

impl GridBuilder {
    pub fn new(table_style: Arc<ComputedStyle>) -> Self {
        Self {
            table_style,
            columns: Vec::new(),
            column_groups: Vec::new(),
            declared_columns: 0,
            rows: Vec::new(),
            row_groups: Vec::new(),
            cells: Vec::new(),
            grid: Vec::new(),
            captions: Vec::new(),
            header_group: None,
            footer_group: None,
            open_anonymous_group: None,
            current_y: 0,
            cursor_x: 0,
            pending_row_cells: Vec::new(),
            pending_cell_content: Vec::new(),
            zero_span_cells: Vec::new(),
            rotated_header_rows: 0,
            rotated_footer_rows: 0,
        }
    }

    /// Consumes the builder and produces the grid for `table`'s children
    pub fn build(mut self, table: &BoxNode) -> TableGrid {
        for child in &table.children {
            match classify_child(child, ChildContext::Table) {
                Classified::Skip => {}
                Classified::Caption => {
                    self.flush_loose_row();
                    self.captions.push(Caption {
                        side: child.style.caption_side,
                        node: child.clone(),
                    });
                }
                Classified::ColumnGroup => {
                    self.flush_loose_row();
                    self.process_column_group(child);
                }
                Classified::Column => {
                    self.flush_loose_row();
                    self.add_declared_column(child, None);
                }
                Classified::RowGroup(kind) => {
                    self.flush_loose_row();
                    self.end_anonymous_group();
                    self.process_row_group(child, kind);
                }
                Classified::Row => {
                    self.flush_loose_row();
                    let group = self.ensure_anonymous_group();
                    self.process_row(child, group);
                }
                Classified::Cell => {
                    self.flush_pending_cell_content();
                    self.pending_row_cells.push(child.clone());
                }
                Classified::Loose => {
                    self.pending_cell_content.push(child.clone());
                }
            }
        }
        self.flush_loose_row();
        self.end_anonymous_group();
        self.rotate_header_footer();

        TableGrid {
            columns: self.columns,
            column_groups: self.column_groups,
            rows: self.rows,
            row_groups: self.row_groups,
            captions: self.captions,
            header_rows: self.rotated_header_rows,
            footer_rows: self.rotated_footer_rows,
            cells: self.cells,
            grid: self.grid,
        }
    }

    // --- row groups ---

    fn process_row_group(&mut self, node: &BoxNode, kind: RowGroupKind) {
        // Only the first header and footer keep their role
        let kind = match kind {
            RowGroupKind::Header if self.header_group.is_some() => RowGroupKind::Body,
            RowGroupKind::Footer if self.footer_group.is_some() => RowGroupKind::Body,
            other => other,
        };
        let group = self.open_group(kind, Some(node.style.clone()));
        match kind {
            RowGroupKind::Header => self.header_group = Some(group),
            RowGroupKind::Footer => self.footer_group = Some(group),
            RowGroupKind::Body => {}
        }

        for child in &node.children {
            match classify_child(child, ChildContext::RowGroup) {
                Classified::Skip => {}
                Classified::Row => {
                    self.flush_loose_row_into(group);
                    self.process_row(child, group);
                }
                Classified::Cell => {
                    self.flush_pending_cell_content();
                    self.pending_row_cells.push(child.clone());
                }
                Classified::Loose => {
                    self.pending_cell_content.push(child.clone());
                }
                // Unreachable per classify_child's context filtering
                _ => {}
            }
        }
        self.flush_loose_row_into(group);
        self.close_group(group);
    }

    fn open_group(&mut self, kind: RowGroupKind, style: Option<Arc<ComputedStyle>>) -> usize {
        let group = self.row_groups.len();
        self.row_groups.push(RowGroupInfo {
            kind,
            style,
            start_row: self.rows.len(),
            row_count: 0,
        });
        group
    }

    fn close_group(&mut self, group: usize) {
        let end = self.rows.len();
        self.row_groups[group].row_count = end - self.row_groups[group].start_row;

        // Rowspan 0 means to-the-end-of-the-group; the span resolves once the
        // end is known (occupancy was claimed row by row as rows appeared)
        for handle in std::mem::take(&mut self.zero_span_cells) {
            let row = self.cells[handle.0].row;
            self.cells[handle.0].row_span = (end - row).max(1);
        }

        self.current_y = end;
    }

    fn ensure_anonymous_group(&mut self) -> usize {
        match self.open_anonymous_group {
            Some(group) => group,
            None => {
                let group = self.open_group(RowGroupKind::Body, None);
                self.open_anonymous_group = Some(group);
                group
            }
        }
    }

    fn end_anonymous_group(&mut self) {
        if let Some(group) = self.open_anonymous_group.take() {
            self.close_group(group);
        }
    }

    // --- rows and cells ---

    fn process_row(&mut self, node: &BoxNode, group: usize) {
        if self.current_y == self.rows.len() {
            self.append_row(group);
        }
        // A row grown by an earlier rowspan gets its style once its source row
        // arrives
        if !node.is_anonymous() {
            self.rows[self.current_y].style = Some(node.style.clone());
        }
        self.cursor_x = 0;

        for child in &node.children {
            match classify_child(child, ChildContext::Row) {
                Classified::Skip => {}
                Classified::Cell => {
                    self.flush_pending_cell_into_row(group);
                    self.place_cell(child, group);
                }
                Classified::Loose => {
                    self.pending_cell_content.push(child.clone());
                }
                _ => {}
            }
        }
        self.flush_pending_cell_into_row(group);

        self.current_y += 1;
    }

    fn place_cell(&mut self, node: &BoxNode, group: usize) {
        let y = self.current_y;
        debug_assert!(y < self.rows.len());

        // Walk right past slots claimed by earlier spans
        let mut x = self.cursor_x;
        while x < self.columns.len() && self.grid[y * self.columns.len() + x].is_some() {
            x += 1;
        }

        let col_span = node.col_span.max(1);
        let row_span = node.row_span;
        let span_rows = row_span.max(1);

        self.grow_columns(x + col_span);
        if row_span > 0 {
            while self.rows.len() < y + span_rows {
                self.append_row(group);
            }
        }

        let handle = CellHandle(self.cells.len());
        let origin = if node.is_anonymous() {
            CellOrigin::Synthetic
        } else {
            CellOrigin::FromSource(node.id)
        };
        self.cells.push(GridCell {
            node: node.clone(),
            origin,
            row: y,
            col: x,
            row_span: span_rows,
            col_span,
        });

        // Claim the rectangle; slots already claimed by an earlier cell stay
        // with it
        let cols = self.columns.len();
        for r in y..y + span_rows {
            for c in x..x + col_span {
                let slot = &mut self.grid[r * cols + c];
                if slot.is_none() {
                    *slot = Some(handle);
                }
            }
        }

        if row_span == 0 {
            self.zero_span_cells.push(handle);
        }
        self.cursor_x = x + col_span;
    }

    // --- anonymous runs ---

    fn anonymous_style(&self, display: Display) -> Arc<ComputedStyle> {
        Arc::new(ComputedStyle {
            display,
            font_size: self.table_style.font_size,
            border_collapse: self.table_style.border_collapse,
            ..ComputedStyle::default()
        })
    }

    /// Closes the open anonymous cell, if any, appending it to the open
    /// anonymous row
    fn flush_pending_cell_content(&mut self) {
        if self.pending_cell_content.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.pending_cell_content);
        let cell = BoxNode::new_anonymous(
            AnonymousType::TableCell,
            self.anonymous_style(Display::TableCell),
            content,
        );
        self.pending_row_cells.push(cell);
    }

    /// Closes the open anonymous cell and places it in the current row
    fn flush_pending_cell_into_row(&mut self, group: usize) {
        if self.pending_cell_content.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.pending_cell_content);
        let cell = BoxNode::new_anonymous(
            AnonymousType::TableCell,
            self.anonymous_style(Display::TableCell),
            content,
        );
        self.place_cell(&cell, group);
    }

    /// Closes the open anonymous row in table context, wrapping it in the
    /// anonymous body group
    fn flush_loose_row(&mut self) {
        self.flush_pending_cell_content();
        if self.pending_row_cells.is_empty() {
            return;
        }
        let group = self.ensure_anonymous_group();
        self.flush_row_cells_into(group);
    }

    /// Closes the open anonymous row inside an explicit row group
    fn flush_loose_row_into(&mut self, group: usize) {
        self.flush_pending_cell_content();
        if self.pending_row_cells.is_empty() {
            return;
        }
        self.flush_row_cells_into(group);
    }

    fn flush_row_cells_into(&mut self, group: usize) {
        let cells = std::mem::take(&mut self.pending_row_cells);
        let row = BoxNode::new_anonymous(
            AnonymousType::TableRow,
            self.anonymous_style(Display::TableRow),
            cells,
        );
        self.process_row(&row, group);
    }

    // --- columns ---

    fn add_declared_column(&mut self, col: &BoxNode, group: Option<usize>) {
        for _ in 0..col.span.max(1) {
            let idx = self.declared_columns;
            self.grow_columns(idx + 1);
            self.columns[idx].style = Some(col.style.clone());
            self.columns[idx].group = group;
            self.declared_columns += 1;
        }
    }

    fn process_column_group(&mut self, node: &BoxNode) {
        let group = self.column_groups.len();
        let start = self.declared_columns;
        let cols: Vec<&BoxNode> = node
            .children
            .iter()
            .filter(|c| classify_child(c, ChildContext::Table) == Classified::Column)
            .collect();
        if cols.is_empty() {
            // A childless colgroup spans `span` auto tracks
            for _ in 0..node.span.max(1) {
                let idx = self.declared_columns;
                self.grow_columns(idx + 1);
                self.columns[idx].group = Some(group);
                self.declared_columns += 1;
            }
        } else {
            for col in cols {
                self.add_declared_column(col, Some(group));
            }
        }
        self.column_groups.push(ColumnGroupInfo {
            style: node.style.clone(),
            start,
            span: self.declared_columns - start,
        });
    }

    // --- grid growth ---

    fn append_row(&mut self, group: usize) {
        self.rows.push(RowInfo { style: None, group });
        self
            .grid
            .extend(std::iter::repeat(None).take(self.columns.len()));

        // Open-ended rowspans reach into every new row of their group
        let new_row = self.rows.len() - 1;
        let cols = self.columns.len();
        for i in 0..self.zero_span_cells.len() {
            let handle = self.zero_span_cells[i];
            let (col, col_span) = {
                let cell = &self.cells[handle.0];
                (cell.col, cell.col_span)
            };
            for c in col..(col + col_span).min(cols) {
                let slot = &mut self.grid[new_row * cols + c];
                if slot.is_none() {
                    *slot = Some(handle);
                }
            }
        }
    }

    fn grow_columns(&mut self, new_count: usize) {
        let old_count = self.columns.len();
        if new_count <= old_count {
            return;
        }
        let row_count = self.rows.len();
        let mut new_grid = vec![None; row_count * new_count];
        for r in 0..row_count {
            new_grid[r * new_count..r * new_count + old_count]
                .copy_from_slice(&self.grid[r * old_count..(r + 1) * old_count]);
        }
        self.grid = new_grid;
        self
            .columns
            .resize_with(new_count, ColumnInfo::default);
    }

    // --- header/footer rotation ---

    fn rotate_header_footer(&mut self) {
        if self.header_group.is_none() && self.footer_group.is_none() {
            return;
        }

        let rows_of = |groups: &[RowGroupInfo], g: usize| -> Vec<usize> {
            let info = &groups[g];
            (info.start_row..info.start_row + info.row_count).collect()
        };
        let header_rows = self
            .header_group
            .map(|g| rows_of(&self.row_groups, g))
            .unwrap_or_default();
        let footer_rows = self
            .footer_group
            .map(|g| rows_of(&self.row_groups, g))
            .unwrap_or_default();

        let mut order: Vec<usize> = header_rows.clone();
        for y in 0..self.rows.len() {
            if !header_rows.contains(&y) && !footer_rows.contains(&y) {
                order.push(y);
            }
        }
        order.extend(footer_rows.iter().copied());

        self.permute_rows(&order);
        self.rotated_header_rows = header_rows.len();
        self.rotated_footer_rows = footer_rows.len();
    }

    fn permute_rows(&mut self, order: &[usize]) {
        let cols = self.columns.len();
        let mut map = vec![0usize; order.len()];
        let mut new_grid = vec![None; self.grid.len()];
        let mut new_rows = Vec::with_capacity(order.len());
        for (new_idx, &old_idx) in order.iter().enumerate() {
            map[old_idx] = new_idx;
            if cols > 0 {
                new_grid[new_idx * cols..(new_idx + 1) * cols]
                    .copy_from_slice(&self.grid[old_idx * cols..(old_idx + 1) * cols]);
            }
            new_rows.push(self.rows[old_idx].clone());
        }
        self.grid = new_grid;
        self.rows = new_rows;
        for cell in &mut self.cells {
            cell.row = map[cell.row];
        }
        for group in &mut self.row_groups {
            if group.row_count > 0 {
                group.start_row = map[group.start_row];
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::values::LengthOrAuto;
    use crate::tree::box_tree::BoxTree;

    fn style_with(display: Display) -> Arc<ComputedStyle> {
        Arc::new(ComputedStyle {
            display,
            ..ComputedStyle::default()
        })
    }

    fn cell(children: Vec<BoxNode>) -> BoxNode {
        BoxNode::new_block(style_with(Display::TableCell), children)
    }

    fn spanned_cell(col_span: usize, row_span: usize) -> BoxNode {
        cell(vec![]).with_spans(col_span, row_span)
    }

    fn row(cells: Vec<BoxNode>) -> BoxNode {
        BoxNode::new_block(style_with(Display::TableRow), cells)
    }

    fn group(display: Display, rows: Vec<BoxNode>) -> BoxNode {
        BoxNode::new_block(style_with(display), rows)
    }

    fn table(children: Vec<BoxNode>) -> BoxNode {
        BoxNode::new_block(style_with(Display::Table), children)
    }

    fn build(table_box: &BoxNode) -> TableGrid {
        GridBuilder::new(table_box.style.clone()).build(table_box)
    }

    fn text(content: &str) -> BoxNode {
        BoxNode::new_text(Arc::new(ComputedStyle::default()), content.to_string())
    }

    #[test]
    fn simple_two_by_two() {
        let table = table(vec![
            row(vec![cell(vec![]), cell(vec![])]),
            row(vec![cell(vec![]), cell(vec![])]),
        ]);
        let grid = build(&table);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cell_count(), 4);
        assert!(grid.is_cell_origin(1, 1));
        // Loose rows share one anonymous body group
        assert_eq!(grid.row_groups.len(), 1);
        assert_eq!(grid.row_groups[0].kind, RowGroupKind::Body);
        assert_eq!(grid.row_groups[0].row_count, 2);
    }

    #[test]
    fn empty_table_is_valid() {
        let grid = build(&table(vec![]));
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.column_count(), 0);
        assert_eq!(grid.cell_count(), 0);
        assert!(grid.handle_at(0, 0).is_none());
    }

    #[test]
    fn loose_cells_get_an_anonymous_row() {
        let table = table(vec![cell(vec![]), cell(vec![])]);
        let grid = build(&table);
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.cell_count(), 2);
    }

    #[test]
    fn loose_content_shares_one_anonymous_cell() {
        let table = table(vec![text("a"), text("b"), cell(vec![]), text("c")]);
        let grid = build(&table);
        // "a"+"b" fold into one synthetic cell, then the real cell, then "c"
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.cell_count(), 3);
        let first = grid.cell_at(0, 0).unwrap();
        assert_eq!(first.origin, CellOrigin::Synthetic);
        assert_eq!(first.node.children.len(), 2);
        let second = grid.cell_at(0, 1).unwrap();
        assert!(matches!(second.origin, CellOrigin::FromSource(_)));
    }

    #[test]
    fn whitespace_text_is_dropped() {
        let table = table(vec![text("   \n"), row(vec![cell(vec![])])]);
        let grid = build(&table);
        assert_eq!(grid.cell_count(), 1);
        assert!(matches!(
            grid.cell_at(0, 0).unwrap().origin,
            CellOrigin::FromSource(_)
        ));
    }

    #[test]
    fn loose_content_inside_a_row_becomes_a_cell() {
        let table = table(vec![row(vec![text("x"), cell(vec![]), text("y"), text("z")])]);
        let grid = build(&table);
        assert_eq!(grid.cell_count(), 3);
        assert_eq!(grid.cell_at(0, 0).unwrap().origin, CellOrigin::Synthetic);
        assert_eq!(grid.cell_at(0, 2).unwrap().node.children.len(), 2);
    }

    #[test]
    fn provenance_uses_source_ids() {
        let tree = BoxTree::new(table(vec![row(vec![cell(vec![])])]));
        let grid = build(&tree.root);
        let cell = grid.cell_at(0, 0).unwrap();
        // Table is 1, row 2, cell 3 in pre-order
        assert_eq!(cell.origin, CellOrigin::FromSource(3));
    }

    #[test]
    fn colspan_grows_the_grid() {
        let table = table(vec![
            row(vec![spanned_cell(3, 1)]),
            row(vec![cell(vec![]), cell(vec![])]),
        ]);
        let grid = build(&table);
        assert_eq!(grid.column_count(), 3);
        let wide = grid.cell_at(0, 2).unwrap();
        assert_eq!(wide.col, 0);
        assert_eq!(wide.col_span, 3);
    }

    #[test]
    fn cursor_skips_slots_claimed_by_rowspans() {
        let table = table(vec![
            row(vec![spanned_cell(1, 2), cell(vec![])]),
            row(vec![cell(vec![])]),
        ]);
        let grid = build(&table);
        // Second row's cell lands in column 1, under the first row's second cell
        let shifted = grid.cell_at(1, 1).unwrap();
        assert_eq!(shifted.row, 1);
        assert_eq!(shifted.col, 1);
        // Column 0 of row 1 is still the rowspanning cell
        let spanning = grid.cell_at(1, 0).unwrap();
        assert_eq!(spanning.row, 0);
        assert_eq!(spanning.row_span, 2);
    }

    #[test]
    fn rowspan_grows_rows_within_the_group() {
        let table = table(vec![group(
            Display::TableRowGroup,
            vec![row(vec![spanned_cell(1, 3)])],
        )]);
        let grid = build(&table);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.row_groups[0].row_count, 3);
        assert!(grid.cell_at(2, 0).is_some());
    }

    #[test]
    fn rowspan_zero_spans_to_end_of_group() {
        let table = table(vec![group(
            Display::TableRowGroup,
            vec![
                row(vec![spanned_cell(1, 0), cell(vec![])]),
                row(vec![cell(vec![])]),
                row(vec![cell(vec![])]),
            ],
        )]);
        let grid = build(&table);
        assert_eq!(grid.row_count(), 3);
        let tall = grid.cell_at(0, 0).unwrap();
        assert_eq!(tall.row_span, 3);
        assert!(grid.cell_at(2, 0).is_some());
        assert_eq!(grid.cell_at(2, 0).unwrap().row, 0);
        // The per-row cells were pushed to column 1
        assert_eq!(grid.cell_at(1, 1).unwrap().row, 1);
    }

    #[test]
    fn rowspan_zero_does_not_cross_into_next_group() {
        let table = table(vec![
            group(
                Display::TableRowGroup,
                vec![row(vec![spanned_cell(1, 0)]), row(vec![cell(vec![])])],
            ),
            group(Display::TableRowGroup, vec![row(vec![cell(vec![])])]),
        ]);
        let grid = build(&table);
        assert_eq!(grid.cell_at(0, 0).unwrap().row_span, 2);
        // Row 2's slot belongs to the third group's own cell
        assert_eq!(grid.cell_at(2, 0).unwrap().row, 2);
    }

    #[test]
    fn overlapping_claims_keep_the_earlier_cell() {
        // The rowspan claims (1,0) first; the second row's cell starts at
        // column 1 and its colspan reaches over already-claimed territory
        let table = table(vec![
            row(vec![spanned_cell(1, 2), cell(vec![])]),
            row(vec![spanned_cell(2, 1)]),
        ]);
        let grid = build(&table);
        let owner = grid.cell_at(1, 0).unwrap();
        assert_eq!((owner.row, owner.col), (0, 0));
        let late = grid.cell_at(1, 1).unwrap();
        assert_eq!((late.row, late.col), (1, 1));
        assert_eq!(late.col_span, 2);
        assert_eq!(grid.column_count(), 3);
    }

    #[test]
    fn header_rows_rotate_to_the_front() {
        let table = table(vec![
            group(Display::TableRowGroup, vec![row(vec![cell(vec![])])]),
            group(Display::TableHeaderGroup, vec![row(vec![cell(vec![])])]),
        ]);
        let grid = build(&table);
        assert_eq!(grid.header_rows, 1);
        assert_eq!(grid.row_group_of(0), 1);
        assert_eq!(grid.row_groups[1].kind, RowGroupKind::Header);
        assert_eq!(grid.row_groups[1].start_row, 0);
        assert_eq!(grid.row_groups[0].start_row, 1);
        // The header's cell now reports row 0
        assert_eq!(grid.cell_at(0, 0).unwrap().row, 0);
        assert_eq!(grid.cell_at(1, 0).unwrap().row, 1);
    }

    #[test]
    fn footer_rows_rotate_to_the_back() {
        let table = table(vec![
            group(Display::TableFooterGroup, vec![row(vec![cell(vec![])])]),
            group(Display::TableRowGroup, vec![row(vec![cell(vec![])])]),
            group(Display::TableRowGroup, vec![row(vec![cell(vec![])])]),
        ]);
        let grid = build(&table);
        assert_eq!(grid.footer_rows, 1);
        assert_eq!(grid.row_groups[0].kind, RowGroupKind::Footer);
        assert_eq!(grid.row_groups[0].start_row, 2);
        assert_eq!(grid.row_groups[1].start_row, 0);
        assert_eq!(grid.row_groups[2].start_row, 1);
    }

    #[test]
    fn extra_headers_and_footers_demote_to_body() {
        let table = table(vec![
            group(Display::TableHeaderGroup, vec![row(vec![cell(vec![])])]),
            group(Display::TableHeaderGroup, vec![row(vec![cell(vec![])])]),
            group(Display::TableFooterGroup, vec![row(vec![cell(vec![])])]),
            group(Display::TableFooterGroup, vec![row(vec![cell(vec![])])]),
        ]);
        let grid = build(&table);
        assert_eq!(grid.header_rows, 1);
        assert_eq!(grid.footer_rows, 1);
        assert_eq!(grid.row_groups[1].kind, RowGroupKind::Body);
        assert_eq!(grid.row_groups[3].kind, RowGroupKind::Body);
    }

    #[test]
    fn rotation_preserves_spans() {
        let table = table(vec![
            group(
                Display::TableRowGroup,
                vec![
                    row(vec![spanned_cell(1, 2), cell(vec![])]),
                    row(vec![cell(vec![])]),
                ],
            ),
            group(Display::TableHeaderGroup, vec![row(vec![cell(vec![])])]),
        ]);
        let grid = build(&table);
        // Header moved to row 0; the body's rowspan now covers rows 1-2
        let spanning = grid.cell_at(1, 0).unwrap();
        assert_eq!(spanning.row, 1);
        assert_eq!(spanning.row_span, 2);
        assert!(grid.cell_at(2, 0).is_some());
        assert_eq!(grid.cell_at(2, 0).unwrap().row, 1);
    }

    #[test]
    fn columns_and_groups_record_tracks() {
        let col = |width: f32| {
            BoxNode::new_block(
                Arc::new(ComputedStyle {
                    display: Display::TableColumn,
                    width: LengthOrAuto::px(width),
                    ..ComputedStyle::default()
                }),
                vec![],
            )
        };
        let colgroup = BoxNode::new_block(
            style_with(Display::TableColumnGroup),
            vec![col(50.0), col(60.0).with_span(2)],
        );
        let table = table(vec![
            colgroup,
            row(vec![cell(vec![]), cell(vec![]), cell(vec![]), cell(vec![])]),
        ]);
        let grid = build(&table);
        assert_eq!(grid.column_count(), 4);
        assert_eq!(grid.column_groups.len(), 1);
        assert_eq!(grid.column_groups[0].start, 0);
        assert_eq!(grid.column_groups[0].span, 3);
        assert_eq!(grid.columns[0].specified_width(), LengthOrAuto::px(50.0));
        assert_eq!(grid.columns[1].specified_width(), LengthOrAuto::px(60.0));
        assert_eq!(grid.columns[2].specified_width(), LengthOrAuto::px(60.0));
        assert_eq!(grid.columns[3].specified_width(), LengthOrAuto::Auto);
        assert_eq!(grid.columns[2].group, Some(0));
        assert_eq!(grid.columns[3].group, None);
    }

    #[test]
    fn captions_collected_with_sides() {
        let caption = |side: CaptionSide| {
            BoxNode::new_block(
                Arc::new(ComputedStyle {
                    display: Display::TableCaption,
                    caption_side: side,
                    ..ComputedStyle::default()
                }),
                vec![],
            )
        };
        let table = table(vec![
            caption(CaptionSide::Top),
            row(vec![cell(vec![])]),
            caption(CaptionSide::Bottom),
        ]);
        let grid = build(&table);
        assert_eq!(grid.captions.len(), 2);
        assert_eq!(grid.captions[0].side, CaptionSide::Top);
        assert_eq!(grid.captions[1].side, CaptionSide::Bottom);
    }

    #[test]
    fn tag_name_breaks_ties_when_display_is_generic() {
        // display: block but tagged td: the name decides
        let odd_cell = BoxNode::new_block(Arc::new(ComputedStyle::default()), vec![]).with_tag_name("td");
        let table = table(vec![row(vec![odd_cell])]);
        let grid = build(&table);
        assert_eq!(grid.cell_count(), 1);
        assert!(matches!(
            grid.cell_at(0, 0).unwrap().origin,
            CellOrigin::FromSource(_)
        ));
    }

    #[test]
    fn display_wins_over_tag_name() {
        // Tagged div but displayed as a cell: display decides
        let node = BoxNode::new_block(style_with(Display::TableCell), vec![]).with_tag_name("div");
        let table = table(vec![row(vec![node])]);
        let grid = build(&table);
        assert_eq!(grid.cell_count(), 1);
    }
}
