//! Column width distribution
//!
//! Two algorithms, selected by `table-layout`:
//!
//! - **Fixed** (§17.5.2.1): widths come from `col` elements and the first
//!   row only; the rest of the content never moves a track. Fast, single
//!   pass, and cells below the first row are laid out into whatever width
//!   they get.
//! - **Auto** (§17.5.2.2): every cell is measured for its minimum and
//!   preferred width, tracks aggregate those demands, and slack is handed
//!   out in a strict order: percentage tracks toward their target first,
//!   then even shares capped at each remaining track's preferred deficit,
//!   then even growth over the tracks that already have width, then
//!   everything.
//!
//! A table is never narrower than the sum of its minimum track widths; if
//! the assigned width is smaller, the result is flagged over-constrained
//! and the table overflows.

use crate::layout::table::grid::TableGrid;
use crate::style::values::{LengthOrAuto, LengthUnit};

/// Sizing inputs aggregated per column track
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackConstraints {
    /// Minimum content width: the track can never be narrower
    pub min_width: f32,
    /// Preferred (max-content) width
    pub preferred_width: f32,
    /// Absolute specified width from a `col` element or a cell
    pub fixed_width: Option<f32>,
    /// Percentage of the table width, 0..=100; first specification wins
    pub percentage: Option<f32>,
}

impl TrackConstraints {
    fn apply_fixed(&mut self, width: f32) {
        self.fixed_width = Some(self.fixed_width.map_or(width, |w| w.max(width)));
        self.preferred_width = self.preferred_width.max(width);
    }

    fn apply_percentage(&mut self, pct: f32) {
        if self.percentage.is_none() {
            self.percentage = Some(pct);
        }
    }
}

/// Measured demand of one cell, in track coordinates
#[derive(Debug, Clone, Copy)]
pub struct CellSizingInput {
    pub col: usize,
    pub col_span: usize,
    pub min_width: f32,
    pub preferred_width: f32,
    /// The cell's specified width
    pub specified: LengthOrAuto,
}

/// The solved track widths
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnWidths {
    pub widths: Vec<f32>,
    pub total: f32,
    /// True when the minimum widths alone exceed the assigned width
    pub over_constrained: bool,
}

impl ColumnWidths {
    fn from_widths(widths: Vec<f32>, over_constrained: bool) -> Self {
        let total = widths.iter().sum();
        Self {
            widths,
            total,
            over_constrained,
        }
    }
}

/// Fixed table layout: `col` widths, then the first row, then an even split
///
/// `content_width` is the table width available to tracks, spacing already
/// excluded.
pub fn solve_fixed_layout(grid: &TableGrid, content_width: f32) -> ColumnWidths {
    let count = grid.column_count();
    let mut widths: Vec<Option<f32>> = vec![None; count];

    // Column elements claim their tracks first
    for (i, column) in grid.columns.iter().enumerate() {
        if let Some(width) = resolve_specified(column.specified_width(), content_width) {
            widths[i] = Some(width);
        }
    }

    // Then cells in the first row; a spanning cell divides its width evenly
    for (_, cell) in grid.cells() {
        if cell.row != 0 {
            continue;
        }
        if let Some(width) = resolve_specified(cell.style().width, content_width) {
            let share = width / cell.col_span as f32;
            for track in cell.col..(cell.col + cell.col_span).min(count) {
                if widths[track].is_none() {
                    widths[track] = Some(share);
                }
            }
        }
    }

    // Remaining width splits evenly over the auto tracks
    let assigned: f32 = widths.iter().flatten().sum();
    let auto_tracks = widths.iter().filter(|w| w.is_none()).count();
    let mut resolved: Vec<f32> = if auto_tracks > 0 {
        let share = ((content_width - assigned) / auto_tracks as f32).max(0.0);
        widths.into_iter().map(|w| w.unwrap_or(share)).collect()
    } else {
        widths.into_iter().map(|w| w.unwrap_or(0.0)).collect()
    };

    // A column group wider than its tracks spreads the deficit evenly
    for group in &grid.column_groups {
        if group.span == 0 {
            continue;
        }
        if let Some(group_width) = resolve_specified(group.style.width, content_width) {
            let span_sum: f32 = resolved[group.start..group.start + group.span].iter().sum();
            if group_width > span_sum {
                let bump = (group_width - span_sum) / group.span as f32;
                for track in group.start..group.start + group.span {
                    resolved[track] += bump;
                }
            }
        }
    }

    let total: f32 = resolved.iter().sum();
    ColumnWidths {
        over_constrained: total > content_width + 0.5,
        total,
        widths: resolved,
    }
}

fn resolve_specified(width: LengthOrAuto, base: f32) -> Option<f32> {
    width.length().map(|l| l.resolve_against(base))
}

/// Aggregates measured cell demands into per-track constraints
///
/// Single-span cells feed their track directly; spanning cells spread any
/// demand their tracks do not already cover evenly over the spanned
/// tracks. Percentages are first-wins per track and the running total is
/// capped at 100.
pub fn collect_track_constraints(
    grid: &TableGrid,
    cells: &[CellSizingInput],
) -> Vec<TrackConstraints> {
    let count = grid.column_count();
    let mut tracks = vec![TrackConstraints::default(); count];

    // Column element widths seed the tracks
    for (i, column) in grid.columns.iter().enumerate() {
        match column.specified_width() {
            LengthOrAuto::Length(l) if l.unit == LengthUnit::Percent => {
                tracks[i].apply_percentage(l.value);
            }
            LengthOrAuto::Length(l) => tracks[i].apply_fixed(l.to_px()),
            LengthOrAuto::Auto => {}
        }
    }

    // Single-span cells
    for cell in cells.iter().filter(|c| c.col_span <= 1) {
        let track = &mut tracks[cell.col];
        track.min_width = track.min_width.max(cell.min_width);
        track.preferred_width = track.preferred_width.max(cell.preferred_width);
        match cell.specified {
            LengthOrAuto::Length(l) if l.unit == LengthUnit::Percent => {
                track.apply_percentage(l.value);
            }
            LengthOrAuto::Length(l) => track.apply_fixed(l.to_px().max(cell.min_width)),
            LengthOrAuto::Auto => {}
        }
    }

    // Spanning cells spread uncovered demand evenly
    let mut spanning: Vec<&CellSizingInput> = cells.iter().filter(|c| c.col_span > 1).collect();
    spanning.sort_by_key(|c| c.col_span);
    for cell in spanning {
        let end = (cell.col + cell.col_span).min(count);
        let span = (end - cell.col).max(1) as f32;

        let min_sum: f32 = tracks[cell.col..end].iter().map(|t| t.min_width).sum();
        if cell.min_width > min_sum {
            let bump = (cell.min_width - min_sum) / span;
            for track in &mut tracks[cell.col..end] {
                track.min_width += bump;
            }
        }

        let pref_sum: f32 = tracks[cell.col..end].iter().map(|t| t.preferred_width).sum();
        if cell.preferred_width > pref_sum {
            let bump = (cell.preferred_width - pref_sum) / span;
            for track in &mut tracks[cell.col..end] {
                track.preferred_width += bump;
            }
        }
    }

    // Preferred is never below minimum
    for track in &mut tracks {
        track.preferred_width = track.preferred_width.max(track.min_width);
        if let Some(fixed) = track.fixed_width {
            track.preferred_width = track.preferred_width.max(fixed);
        }
    }

    // Cap the percentage total at 100, earlier tracks first
    let mut accumulated = 0.0f32;
    for track in &mut tracks {
        if let Some(pct) = track.percentage {
            let allowed = (100.0 - accumulated).max(0.0);
            let capped = pct.min(allowed);
            track.percentage = Some(capped);
            accumulated += capped;
        }
    }

    tracks
}

/// Sum of the minimum track widths
pub fn min_width_sum(tracks: &[TrackConstraints]) -> f32 {
    tracks.iter().map(|t| t.min_width).sum()
}

/// Sum of the preferred track widths
pub fn preferred_width_sum(tracks: &[TrackConstraints]) -> f32 {
    tracks.iter().map(|t| t.preferred_width).sum()
}

/// Distributes a definite table content width over the tracks
///
/// Every track starts at its minimum width; slack is handed out in four
/// phases until the target is reached:
///
/// 1. percentage tracks grow toward `pct × target`;
/// 2. non-percentage tracks below their preferred width take even shares,
///    each capped at its deficit, spill-over re-offered to the rest;
/// 3. tracks with any width at all grow evenly;
/// 4. all tracks grow evenly.
pub fn distribute_widths(tracks: &[TrackConstraints], target: f32) -> ColumnWidths {
    if tracks.is_empty() {
        return ColumnWidths::from_widths(Vec::new(), false);
    }

    let min_sum = min_width_sum(tracks);
    let mut widths: Vec<f32> = tracks.iter().map(|t| t.min_width).collect();
    if target <= min_sum {
        return ColumnWidths::from_widths(widths, target < min_sum);
    }
    let mut slack = target - min_sum;

    // Phase 1: percentage tracks toward their target share
    let needs: Vec<f32> = tracks
        .iter()
        .enumerate()
        .map(|(i, t)| match t.percentage {
            Some(pct) => (pct / 100.0 * target - widths[i]).max(0.0),
            None => 0.0,
        })
        .collect();
    slack -= grant_proportional(&mut widths, &needs, slack);

    // Phase 2: non-percentage tracks still below their preferred width
    if slack > 0.0 {
        let mut needs: Vec<f32> = tracks
            .iter()
            .enumerate()
            .map(|(i, t)| match t.percentage {
                Some(_) => 0.0,
                None => (t.preferred_width - widths[i]).max(0.0),
            })
            .collect();
        slack -= grant_even_capped(&mut widths, &mut needs, slack);
    }

    // Phase 3: tracks that already have width grow evenly
    if slack > 0.0 {
        let positive: Vec<usize> = (0..widths.len()).filter(|&i| widths[i] > 0.0).collect();
        if !positive.is_empty() {
            let share = slack / positive.len() as f32;
            for i in positive {
                widths[i] += share;
            }
            slack = 0.0;
        }
    }

    // Phase 4: everything evenly
    if slack > 0.0 {
        let share = slack / tracks.len() as f32;
        for width in &mut widths {
            *width += share;
        }
    }

    ColumnWidths::from_widths(widths, false)
}

/// Grants up to `slack` across `needs`, proportionally when slack is short;
/// returns the amount spent
fn grant_proportional(widths: &mut [f32], needs: &[f32], slack: f32) -> f32 {
    let total_need: f32 = needs.iter().sum();
    if total_need <= 0.0 || slack <= 0.0 {
        return 0.0;
    }
    let scale = (slack / total_need).min(1.0);
    let mut spent = 0.0;
    for (width, need) in widths.iter_mut().zip(needs) {
        let grant = need * scale;
        *width += grant;
        spent += grant;
    }
    spent
}

/// Grants up to `slack` in even shares capped at each track's need,
/// re-offering spill-over until slack or needs run out; returns the amount
/// spent
fn grant_even_capped(widths: &mut [f32], needs: &mut [f32], slack: f32) -> f32 {
    let mut remaining = slack;
    while remaining > 0.0 {
        let open: Vec<usize> = (0..needs.len()).filter(|&i| needs[i] > 0.0).collect();
        if open.is_empty() {
            break;
        }
        let share = remaining / open.len() as f32;
        let mut capped = false;
        for &i in &open {
            if needs[i] <= share {
                capped = true;
                widths[i] += needs[i];
                remaining -= needs[i];
                needs[i] = 0.0;
            }
        }
        if !capped {
            // No cap hit; the even shares consume the rest exactly
            for &i in &open {
                widths[i] += share;
                needs[i] -= share;
            }
            remaining = 0.0;
        }
    }
    slack - remaining
}
