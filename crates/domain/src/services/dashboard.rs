//! Board ranking and donut aggregation for the dashboard.
//!
//! Both work on already-grouped schedules and never fail: missing or
//! unreadable numbers count as zero.

use std::cmp::Ordering;

use serde::Serialize;
use shared::format::hours_rounded;

use super::schedule_groups::{GroupedTask, MachineGroup, ProductGroup};

/// Label of the segment that folds every machine beyond the top N.
pub const OTHER_LABEL: &str = "기타";

/// Machines shown as their own donut segment by default.
pub const DEFAULT_DONUT_TOP_N: usize = 4;

/// One product/operation bar on the board.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardRow<'a> {
    pub product_name: String,
    pub operation_id: String,
    /// First drawable task of the operation, else its first task.
    pub representative: GroupedTask<'a>,
    pub task_count: usize,
    pub volume: f64,
    /// `volume / max volume` across the board.
    pub ratio: f64,
}

fn descending(a: f64, b: f64) -> Ordering {
    b.partial_cmp(&a).unwrap_or(Ordering::Equal)
}

/// Ranks product/operation pairs by volume, largest first.
///
/// Volume is the representative entry's explicit count when it is
/// positive, otherwise the number of tasks. Equal volumes keep input order.
pub fn board_ranking<'a>(groups: &[ProductGroup<'a>], min_span_ms: i64) -> Vec<BoardRow<'a>> {
    let mut rows: Vec<BoardRow<'a>> = groups
        .iter()
        .flat_map(|product| {
            product.operations.iter().filter_map(move |operation| {
                let representative = operation
                    .tasks
                    .iter()
                    .find(|task| task.is_displayable(min_span_ms))
                    .or_else(|| operation.tasks.first())?
                    .clone();

                let task_count = operation.tasks.len();
                let volume = representative
                    .entry
                    .count
                    .filter(|count| count.is_finite() && *count > 0.0)
                    .unwrap_or(task_count as f64);

                Some(BoardRow {
                    product_name: product.product_name.clone(),
                    operation_id: operation.operation_id.clone(),
                    representative,
                    task_count,
                    volume,
                    ratio: 0.0,
                })
            })
        })
        .collect();

    rows.sort_by(|a, b| descending(a.volume, b.volume));

    let max = rows.first().map(|row| row.volume).unwrap_or(0.0);
    let max = if max > 0.0 { max } else { 1.0 };
    for row in rows.iter_mut() {
        row.ratio = row.volume / max;
    }

    rows
}

/// Splits rows into the two board columns; the left one takes the extra row.
pub fn split_columns<T>(rows: &[T]) -> (&[T], &[T]) {
    rows.split_at(rows.len().div_ceil(2))
}

/// One donut segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSegment {
    pub label: String,
    pub minutes: f64,
    /// Share of the donut in `0.0..=1.0`.
    pub ratio: f64,
}

/// Machine load summary for the donut chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    pub segments: Vec<DonutSegment>,
    pub total_minutes: f64,
    pub total_hours: i64,
}

/// Builds a donut from labelled minute totals.
///
/// The `top_n` largest values become segments; the rest are folded into a
/// single [`OTHER_LABEL`] segment. A zero total is treated as 1 so every
/// ratio stays finite.
pub fn donut_from_totals(mut totals: Vec<(String, f64)>, top_n: usize) -> DonutChart {
    for (_, minutes) in totals.iter_mut() {
        if !minutes.is_finite() || *minutes < 0.0 {
            *minutes = 0.0;
        }
    }
    totals.sort_by(|a, b| descending(a.1, b.1));

    let total_minutes: f64 = totals.iter().map(|(_, minutes)| minutes).sum();
    let denominator = if total_minutes > 0.0 { total_minutes } else { 1.0 };

    let rest = totals.split_off(top_n.min(totals.len()));
    let mut segments: Vec<DonutSegment> = totals
        .into_iter()
        .map(|(label, minutes)| DonutSegment {
            label,
            minutes,
            ratio: minutes / denominator,
        })
        .collect();

    if !rest.is_empty() {
        let minutes: f64 = rest.iter().map(|(_, minutes)| minutes).sum();
        segments.push(DonutSegment {
            label: OTHER_LABEL.to_string(),
            minutes,
            ratio: minutes / denominator,
        });
    }

    DonutChart {
        segments,
        total_minutes,
        total_hours: hours_rounded(total_minutes),
    }
}

/// Sums task durations per machine (in minutes) and builds the donut.
pub fn machine_donut(groups: &[MachineGroup<'_>], top_n: usize) -> DonutChart {
    let totals = groups
        .iter()
        .map(|group| {
            let ms: i64 = group
                .tasks
                .iter()
                .map(|task| task.span_ms().unwrap_or(0).max(0))
                .sum();
            (group.title.clone(), ms as f64 / 60_000.0)
        })
        .collect();

    donut_from_totals(totals, top_n)
}
