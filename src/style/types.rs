//! Keyword property types
//!
//! Enumerated computed values for the properties the table engine reads.
//! References are to CSS 2.1 unless noted.

use crate::style::values::Length;

/// Computed `display` value
///
/// Only the values the table engine distinguishes are represented; the
/// embedder maps everything else to `Block` or `Inline` before handing the
/// tree over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Display {
    /// Element generates no boxes
    None,

    /// Block-level box
    #[default]
    Block,

    /// Inline-level box
    Inline,

    /// Block-level table wrapper box (`display: table`)
    Table,

    /// Inline-level table wrapper box (`display: inline-table`)
    InlineTable,

    /// Table row group (`display: table-row-group`, the `tbody` default)
    TableRowGroup,

    /// Table header group (`display: table-header-group`, the `thead` default)
    TableHeaderGroup,

    /// Table footer group (`display: table-footer-group`, the `tfoot` default)
    TableFooterGroup,

    /// Table row (`display: table-row`)
    TableRow,

    /// Table cell (`display: table-cell`)
    TableCell,

    /// Table column (`display: table-column`)
    TableColumn,

    /// Table column group (`display: table-column-group`)
    TableColumnGroup,

    /// Table caption (`display: table-caption`)
    TableCaption,
}

impl Display {
    /// Returns true for `table` and `inline-table`
    pub fn is_table(self) -> bool {
        matches!(self, Display::Table | Display::InlineTable)
    }

    /// Returns true for the row group displays (header, footer, body)
    pub fn is_row_group(self) -> bool {
        matches!(
            self,
            Display::TableRowGroup | Display::TableHeaderGroup | Display::TableFooterGroup
        )
    }

    /// Returns true for any internal table display
    ///
    /// Internal displays only make sense inside a table; anywhere else they
    /// trigger anonymous table generation (not handled by this crate).
    pub fn is_internal_table(self) -> bool {
        self.is_row_group()
            || matches!(
                self,
                Display::TableRow
                    | Display::TableCell
                    | Display::TableColumn
                    | Display::TableColumnGroup
                    | Display::TableCaption
            )
    }
}

/// Border line style
///
/// CSS: `border-style`, `border-*-style`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    #[default]
    None,
    Hidden,
    Solid,
    Dashed,
    Dotted,
    Double,
    Groove,
    Ridge,
    Inset,
    Outset,
}

impl BorderStyle {
    /// Returns true if the style draws nothing (`none` or `hidden`)
    pub fn is_invisible(self) -> bool {
        matches!(self, BorderStyle::None | BorderStyle::Hidden)
    }
}

/// Border model selection
///
/// CSS 2.1 §17.6: initial value is `separate`, inherits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderCollapse {
    #[default]
    Separate,
    Collapse,
}

/// Whether borders/backgrounds are drawn for empty table cells.
///
/// CSS 2.1 §17.6.1: initial value is `show`, applies to table cells and
/// inherits. Only honored in the separated border model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyCells {
    #[default]
    Show,
    Hide,
}

/// Caption placement relative to the table box.
///
/// CSS 2.1 §17.4: initial value is `top`, applies to table captions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaptionSide {
    #[default]
    Top,
    Bottom,
}

/// Table layout algorithm selection
///
/// CSS: `table-layout`
/// Reference: CSS 2.1 §17.5.2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableLayout {
    #[default]
    Auto,
    Fixed,
}

/// Vertical alignment of cell content within its row
///
/// Only the values meaningful for table cells are represented; `sub`,
/// `super` and the text-relative keywords compute to `baseline` in cell
/// context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VerticalAlign {
    /// Align the cell's first baseline with the row baseline (initial value)
    #[default]
    Baseline,
    /// Align the cell's top with the row top
    Top,
    /// Center the cell content within the row extent
    Middle,
    /// Align the cell's bottom with the row bottom
    Bottom,
    /// Baseline shifted by a length; treated as `baseline` for row sizing
    Length(Length),
}

impl VerticalAlign {
    /// Returns true if the value participates in baseline alignment
    pub fn is_baseline_relative(self) -> bool {
        matches!(self, VerticalAlign::Baseline | VerticalAlign::Length(_))
    }
}
