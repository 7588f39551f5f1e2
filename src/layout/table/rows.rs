//! Row sizing and vertical alignment
//!
//! Runs after cells have been laid out at their final track widths. A row
//! is as tall as its tallest single-row cell, at least its specified
//! height; baseline-aligned cells first agree on a shared row baseline,
//! which can push the row taller than any one cell. Rowspanning cells that
//! still don't fit spread their height deficit evenly over the rows they
//! span, and leftover table height (a specified height taller than the
//! rows) spreads evenly over every row.
//!
//! Alignment is realized as a top offset handed back to the cell (applied
//! as extra padding), never by nudging fragments afterwards.

use crate::style::types::VerticalAlign;
use crate::style::values::LengthOrAuto;

/// Vertical inputs of one laid-out cell
#[derive(Debug, Clone, Copy)]
pub struct CellVerticalInput {
    /// Origin row of the cell
    pub row: usize,
    pub row_span: usize,
    /// Used border-box height at the cell's final width
    pub height: f32,
    /// First baseline, measured from the cell's top edge; None when the
    /// content has none
    pub baseline: Option<f32>,
    pub vertical_align: VerticalAlign,
}

impl CellVerticalInput {
    /// The baseline used for row alignment
    ///
    /// A baseline-aligned cell without a content baseline synthesizes one at
    /// its bottom edge (CSS 2.1 §17.5.3).
    pub fn effective_baseline(&self) -> f32 {
        self.baseline.unwrap_or(self.height)
    }

    fn is_baseline_aligned(&self) -> bool {
        self.vertical_align.is_baseline_relative()
    }
}

/// Solved vertical metrics of one row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetrics {
    pub height: f32,
    /// Shared baseline offset from the row top; None when no cell in the
    /// row aligns by baseline
    pub baseline: Option<f32>,
}

/// Computes every row's height and baseline
///
/// `specified_heights` has one entry per row; percentages resolve against
/// `table_height_base` when the table height is definite and are otherwise
/// treated as auto. `vertical_spacing` is the separation between adjacent
/// rows, counted once per gap inside a rowspan.
pub fn calculate_row_heights(
    specified_heights: &[LengthOrAuto],
    cells: &[CellVerticalInput],
    vertical_spacing: f32,
    table_height_base: Option<f32>,
) -> Vec<RowMetrics> {
    let row_count = specified_heights.len();
    let mut metrics: Vec<RowMetrics> = specified_heights
        .iter()
        .map(|spec| RowMetrics {
            height: resolve_row_height(*spec, table_height_base),
            baseline: None,
        })
        .collect();

    // Agree on each row's baseline first; a deep-baselined cell pushes the
    // shared baseline down
    for cell in cells {
        if cell.row >= row_count || cell.vertical_align != VerticalAlign::Baseline {
            continue;
        }
        let ascent = cell.effective_baseline();
        let row = &mut metrics[cell.row];
        row.baseline = Some(row.baseline.map_or(ascent, |b| b.max(ascent)));
    }

    // Single-row cells stretch their row; a baseline-aligned cell needs room
    // for its descent below the shared baseline
    for cell in cells.iter().filter(|c| c.row_span <= 1) {
        if cell.row >= row_count {
            continue;
        }
        let row = &mut metrics[cell.row];
        let needed = if cell.is_baseline_aligned() {
            let descent = cell.height - cell.effective_baseline();
            (row.baseline.unwrap_or(0.0) + descent).max(cell.height)
        } else {
            cell.height
        };
        row.height = row.height.max(needed);
    }

    // Rowspanning cells spread any remaining deficit evenly. A baseline
    // aligned spanner sits below its row baseline, so the displacement adds
    // to the height it needs from the rows it spans.
    let mut spanning: Vec<&CellVerticalInput> = cells.iter().filter(|c| c.row_span > 1).collect();
    spanning.sort_by_key(|c| c.row_span);
    for cell in spanning {
        let end = (cell.row + cell.row_span).min(row_count);
        if end <= cell.row {
            continue;
        }
        let displacement = if cell.is_baseline_aligned() {
            let baseline = metrics[cell.row]
                .baseline
                .or_else(|| synthetic_row_baseline(cells, &metrics, cell.row));
            baseline.map_or(0.0, |b| (b - cell.effective_baseline()).max(0.0))
        } else {
            0.0
        };
        let span = (end - cell.row) as f32;
        let gaps = (end - cell.row - 1) as f32;
        let available: f32 =
            metrics[cell.row..end].iter().map(|m| m.height).sum::<f32>() + gaps * vertical_spacing;
        let required = cell.height + displacement;
        if required > available {
            let bump = (required - available) / span;
            for metric in &mut metrics[cell.row..end] {
                metric.height += bump;
            }
        }
    }

    metrics
}

/// Stand-in row baseline for rowspan math when no cell aligns by baseline
///
/// Derived from the single-row cells at their aligned positions: a top
/// cell's baseline sits at its own bottom, a bottom cell's at the row
/// bottom, a middle cell's halfway between. Never stored in [`RowMetrics`].
fn synthetic_row_baseline(
    cells: &[CellVerticalInput],
    metrics: &[RowMetrics],
    row: usize,
) -> Option<f32> {
    let mut baseline: Option<f32> = None;
    for cell in cells.iter().filter(|c| c.row == row && c.row_span <= 1) {
        let candidate = match cell.vertical_align {
            VerticalAlign::Top => cell.height,
            VerticalAlign::Bottom => metrics[row].height,
            VerticalAlign::Middle => (metrics[row].height + cell.height) / 2.0,
            VerticalAlign::Baseline | VerticalAlign::Length(_) => continue,
        };
        baseline = Some(baseline.map_or(candidate, |b| b.max(candidate)));
    }
    baseline
}

/// Spreads leftover table height evenly over the rows
///
/// Runs after rowspan spreading; a definite table height taller than its
/// rows grows every row by the same amount.
pub fn distribute_residual_height(metrics: &mut [RowMetrics], residual: f32) {
    if metrics.is_empty() || residual <= 0.0 {
        return;
    }
    let bump = residual / metrics.len() as f32;
    for metric in metrics {
        metric.height += bump;
    }
}

fn resolve_row_height(spec: LengthOrAuto, table_height_base: Option<f32>) -> f32 {
    match spec {
        LengthOrAuto::Length(l) if l.unit.is_percentage() => table_height_base
            .map(|base| l.resolve_against(base))
            .unwrap_or(0.0),
        LengthOrAuto::Length(l) => l.to_px(),
        LengthOrAuto::Auto => 0.0,
    }
    .max(0.0)
}

/// The extent a cell spans vertically: its rows plus the gaps between them
pub fn spanned_extent(metrics: &[RowMetrics], row: usize, row_span: usize, spacing: f32) -> f32 {
    let end = (row + row_span).min(metrics.len());
    if end <= row {
        return 0.0;
    }
    let heights: f32 = metrics[row..end].iter().map(|m| m.height).sum();
    heights + (end - row - 1) as f32 * spacing
}

/// Top offset aligning a cell inside its row extent
///
/// The offset becomes extra top padding on the cell; its content height
/// allotment shrinks by the same amount.
pub fn align_cell_offset(cell: &CellVerticalInput, extent: f32, row_baseline: Option<f32>) -> f32 {
    let free = (extent - cell.height).max(0.0);
    match cell.vertical_align {
        VerticalAlign::Top => 0.0,
        VerticalAlign::Middle => free / 2.0,
        VerticalAlign::Bottom => free,
        VerticalAlign::Baseline | VerticalAlign::Length(_) => match row_baseline {
            Some(baseline) => (baseline - cell.effective_baseline()).clamp(0.0, free),
            None => 0.0,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::values::Length;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 0.01,
            "expected {expected}, got {actual}"
        );
    }

    fn plain_cell(row: usize, height: f32) -> CellVerticalInput {
        CellVerticalInput {
            row,
            row_span: 1,
            height,
            baseline: None,
            vertical_align: VerticalAlign::Top,
        }
    }

    fn baseline_cell(row: usize, height: f32, baseline: f32) -> CellVerticalInput {
        CellVerticalInput {
            row,
            row_span: 1,
            height,
            baseline: Some(baseline),
            vertical_align: VerticalAlign::Baseline,
        }
    }

    #[test]
    fn row_height_is_the_tallest_cell() {
        let metrics = calculate_row_heights(
            &[LengthOrAuto::Auto],
            &[plain_cell(0, 18.0), plain_cell(0, 42.0)],
            0.0,
            None,
        );
        assert_close(metrics[0].height, 42.0);
        assert_eq!(metrics[0].baseline, None);
    }

    #[test]
    fn specified_row_height_is_a_floor() {
        let metrics = calculate_row_heights(
            &[LengthOrAuto::px(50.0)],
            &[plain_cell(0, 20.0)],
            0.0,
            None,
        );
        assert_close(metrics[0].height, 50.0);
    }

    #[test]
    fn percent_row_height_needs_a_definite_table_height() {
        let spec = [LengthOrAuto::Length(Length::percent(50.0))];
        let with_base = calculate_row_heights(&spec, &[], 0.0, Some(200.0));
        assert_close(with_base[0].height, 100.0);
        let without = calculate_row_heights(&spec, &[], 0.0, None);
        assert_close(without[0].height, 0.0);
    }

    #[test]
    fn baselines_coincide_and_stretch_the_row() {
        // Shared baseline at 30; the first cell's 15px descent hangs below it
        let metrics = calculate_row_heights(
            &[LengthOrAuto::Auto],
            &[baseline_cell(0, 25.0, 10.0), baseline_cell(0, 35.0, 30.0)],
            0.0,
            None,
        );
        assert_eq!(metrics[0].baseline, Some(30.0));
        assert_close(metrics[0].height, 45.0);
    }

    #[test]
    fn baseline_cell_without_content_baseline_uses_its_bottom() {
        let mut cell = baseline_cell(0, 40.0, 0.0);
        cell.baseline = None;
        assert_close(cell.effective_baseline(), 40.0);
        let metrics = calculate_row_heights(&[LengthOrAuto::Auto], &[cell], 0.0, None);
        assert_eq!(metrics[0].baseline, Some(40.0));
        assert_close(metrics[0].height, 40.0);
    }

    #[test]
    fn rowspan_deficit_spreads_evenly() {
        let tall = CellVerticalInput {
            row: 0,
            row_span: 2,
            height: 100.0,
            baseline: None,
            vertical_align: VerticalAlign::Top,
        };
        let metrics = calculate_row_heights(
            &[LengthOrAuto::Auto, LengthOrAuto::Auto],
            &[plain_cell(0, 20.0), plain_cell(1, 20.0), tall],
            10.0,
            None,
        );
        // 20 + 20 + one 10px gap covers 50 of the 100; each row gains 25
        assert_close(metrics[0].height, 45.0);
        assert_close(metrics[1].height, 45.0);
    }

    #[test]
    fn baseline_aligned_rowspan_gets_room_below_the_row_baseline() {
        let spanner = CellVerticalInput {
            row: 0,
            row_span: 2,
            height: 40.0,
            baseline: Some(8.0),
            vertical_align: VerticalAlign::Baseline,
        };
        let metrics = calculate_row_heights(
            &[LengthOrAuto::Auto, LengthOrAuto::Auto],
            &[baseline_cell(0, 20.0, 18.0), plain_cell(1, 10.0), spanner],
            0.0,
            None,
        );
        // The 18px row baseline pushes the spanner down 10px, so it needs 50
        // of the rows' 30; each gains 10
        assert_close(metrics[0].height, 30.0);
        assert_close(metrics[1].height, 20.0);
    }

    #[test]
    fn rowspan_math_synthesizes_a_baseline_when_no_cell_requests_one() {
        let spanner = CellVerticalInput {
            row: 0,
            row_span: 2,
            height: 30.0,
            baseline: Some(5.0),
            vertical_align: VerticalAlign::Length(Length::px(0.0)),
        };
        let bottom = CellVerticalInput {
            row: 0,
            row_span: 1,
            height: 24.0,
            baseline: None,
            vertical_align: VerticalAlign::Bottom,
        };
        let metrics = calculate_row_heights(
            &[LengthOrAuto::Auto, LengthOrAuto::Auto],
            &[bottom, plain_cell(1, 10.0), spanner],
            0.0,
            None,
        );
        // The bottom cell stands in for the row baseline at 24; the spanner's
        // 5px ascent leaves a 19px displacement, 49 needed over 34
        assert_close(metrics[0].height, 31.5);
        assert_close(metrics[1].height, 17.5);
        // The stand-in is for rowspan math only
        assert_eq!(metrics[0].baseline, None);
    }

    #[test]
    fn residual_height_spreads_evenly() {
        let mut metrics = vec![
            RowMetrics {
                height: 10.0,
                baseline: None,
            },
            RowMetrics {
                height: 30.0,
                baseline: None,
            },
        ];
        distribute_residual_height(&mut metrics, 20.0);
        assert_close(metrics[0].height, 20.0);
        assert_close(metrics[1].height, 40.0);
        // Nothing to hand out leaves the rows alone
        distribute_residual_height(&mut metrics, -5.0);
        assert_close(metrics[0].height, 20.0);
    }

    #[test]
    fn rowspan_that_already_fits_changes_nothing() {
        let spanner = CellVerticalInput {
            row: 0,
            row_span: 2,
            height: 30.0,
            baseline: None,
            vertical_align: VerticalAlign::Top,
        };
        let metrics = calculate_row_heights(
            &[LengthOrAuto::Auto, LengthOrAuto::Auto],
            &[plain_cell(0, 25.0), plain_cell(1, 25.0), spanner],
            0.0,
            None,
        );
        assert_close(metrics[0].height, 25.0);
        assert_close(metrics[1].height, 25.0);
    }

    #[test]
    fn alignment_offsets_within_the_row_extent() {
        let mut cell = plain_cell(0, 20.0);
        assert_close(align_cell_offset(&cell, 50.0, None), 0.0);
        cell.vertical_align = VerticalAlign::Middle;
        assert_close(align_cell_offset(&cell, 50.0, None), 15.0);
        cell.vertical_align = VerticalAlign::Bottom;
        assert_close(align_cell_offset(&cell, 50.0, None), 30.0);
    }

    #[test]
    fn baseline_alignment_shifts_to_the_row_baseline() {
        let cell = baseline_cell(0, 20.0, 8.0);
        assert_close(align_cell_offset(&cell, 50.0, Some(30.0)), 22.0);
        // Without a row baseline the cell stays at the top
        assert_close(align_cell_offset(&cell, 50.0, None), 0.0);
    }

    #[test]
    fn spanned_extent_includes_gaps() {
        let metrics = vec![
            RowMetrics {
                height: 10.0,
                baseline: None,
            },
            RowMetrics {
                height: 20.0,
                baseline: None,
            },
        ];
        assert_close(spanned_extent(&metrics, 0, 2, 4.0), 34.0);
        assert_close(spanned_extent(&metrics, 1, 1, 4.0), 20.0);
    }
}
