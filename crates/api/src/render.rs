//! Plain-text rendering of loaded views for the terminal.

use domain::models::{SearchResults, SimulationSummary};
use domain::services::{
    split_columns, BoardRow, DonutChart, GroupedTask, MachineGroup, ProductGroup, TimeWindow,
};
use shared::format::{format_datetime, format_duration_ms, format_percent, format_time, MISSING};

const BAR: char = '█';
const TRACK: char = '·';

/// Display width used for alignment. Hangul and other wide glyphs take two
/// terminal cells.
fn display_width(text: &str) -> usize {
    text.chars()
        .map(|c| match c as u32 {
            0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF
            | 0xFF00..=0xFF60 => 2,
            _ => 1,
        })
        .sum()
}

fn pad(text: &str, width: usize) -> String {
    let fill = width.saturating_sub(display_width(text));
    format!("{}{}", text, " ".repeat(fill))
}

/// Left-aligned columns separated by two spaces.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| display_width(h)).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(display_width(cell));
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell, *width))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = vec![line(headers.to_vec())];
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    lines.extend(
        rows.iter()
            .map(|row| line(row.iter().map(String::as_str).collect())),
    );

    if rows.is_empty() {
        lines.push("(데이터 없음)".to_string());
    }
    lines.join("\n")
}

/// One Gantt track: the task's bar placed inside `window`.
fn gantt_track(task: &GroupedTask<'_>, window: &TimeWindow, width: usize) -> String {
    let (Some(start), Some(end)) = (task.start, task.end) else {
        return TRACK.to_string().repeat(width);
    };

    let from = (window.position(start) * width as f64).floor() as usize;
    let to = ((window.position(end) * width as f64).ceil() as usize)
        .max(from + 1)
        .min(width);
    let from = from.min(to.saturating_sub(1));

    (0..width)
        .map(|i| if (from..to).contains(&i) { BAR } else { TRACK })
        .collect()
}

fn task_line(task: &GroupedTask<'_>, window: &TimeWindow, width: usize) -> String {
    let entry = task.entry;
    format!(
        "    {} {} {}-{} {} {}",
        gantt_track(task, window, width),
        pad(entry.task_id.as_deref().unwrap_or(MISSING), 10),
        format_time(task.start),
        format_time(task.end),
        pad(&format_duration_ms(task.span_ms().unwrap_or(-1)), 10),
        entry.worker_name.as_deref().unwrap_or(MISSING),
    )
}

fn window_header(window: &TimeWindow) -> String {
    format!(
        "{} ~ {} ({})",
        format_datetime(Some(window.start)),
        format_datetime(Some(window.end)),
        format_duration_ms(window.span_ms())
    )
}

/// Gantt rows grouped product → operation.
pub fn gantt_by_product(groups: &[ProductGroup<'_>], window: Option<TimeWindow>, width: usize) -> String {
    let Some(window) = window else {
        return "표시할 작업이 없습니다.".to_string();
    };

    let mut lines = vec![window_header(&window)];
    for product in groups {
        lines.push(product.product_name.clone());
        for operation in &product.operations {
            lines.push(format!("  {} ({})", operation.operation_id, operation.tasks.len()));
            lines.extend(
                operation
                    .tasks
                    .iter()
                    .map(|task| task_line(task, &window, width)),
            );
        }
    }
    lines.join("\n")
}

/// Gantt rows grouped by machine.
pub fn gantt_by_machine(groups: &[MachineGroup<'_>], width: usize) -> String {
    let window = TimeWindow::covering(groups.iter().flat_map(|group| group.tasks.iter()));
    let Some(window) = window else {
        return "표시할 작업이 없습니다.".to_string();
    };

    let mut lines = vec![window_header(&window)];
    for machine in groups {
        lines.push(format!("{} ({})", machine.title, machine.tasks.len()));
        lines.extend(
            machine
                .tasks
                .iter()
                .map(|task| task_line(task, &window, width)),
        );
    }
    lines.join("\n")
}

fn board_line(rank: usize, row: &BoardRow<'_>, width: usize) -> String {
    let filled = (row.ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    format!(
        "{:>3}. {} {} {}{} {}",
        rank,
        pad(&row.product_name, 16),
        pad(&row.operation_id, 10),
        BAR.to_string().repeat(filled),
        " ".repeat(width - filled),
        row.volume
    )
}

/// Board ranking laid out as the dashboard's two columns, one after the other.
pub fn board(rows: &[BoardRow<'_>], top_n: Option<usize>, width: usize) -> String {
    let rows = match top_n {
        Some(n) => &rows[..n.min(rows.len())],
        None => rows,
    };
    if rows.is_empty() {
        return "(데이터 없음)".to_string();
    }

    let (left, right) = split_columns(rows);
    let mut lines = Vec::with_capacity(rows.len());
    lines.extend(
        left.iter()
            .enumerate()
            .map(|(i, row)| board_line(i + 1, row, width)),
    );
    if !right.is_empty() {
        lines.push(String::new());
        lines.extend(
            right
                .iter()
                .enumerate()
                .map(|(i, row)| board_line(left.len() + i + 1, row, width)),
        );
    }
    lines.join("\n")
}

/// Donut segments as a legend with shares.
pub fn donut(chart: &DonutChart) -> String {
    let mut lines = vec![format!("총 가동 {}시간", chart.total_hours)];
    lines.extend(chart.segments.iter().map(|segment| {
        format!(
            "  {} {:>8.1}분  {:>6}",
            pad(&segment.label, 24),
            segment.minutes,
            format_percent(segment.ratio)
        )
    }));
    lines.join("\n")
}

pub fn summary(summary: &SimulationSummary) -> String {
    [
        format!("작업 수      {}", summary.total_tasks),
        format!("지연 작업    {}", summary.late_tasks),
        format!("납기 준수율  {}", format_percent(summary.on_time_ratio())),
        format!("설비 가동률  {}", format_percent(summary.utilization)),
        format!(
            "기간         {} ~ {}",
            format_datetime(summary.start_at),
            format_datetime(summary.end_at)
        ),
    ]
    .join("\n")
}

pub fn search_results(results: &SearchResults) -> String {
    if results.is_empty() {
        return "검색 결과가 없습니다.".to_string();
    }

    let mut lines = Vec::new();
    for (kind, hits) in results.by_kind() {
        lines.push(format!("[{}] {}", kind, hits.len()));
        lines.extend(hits.iter().map(|hit| {
            format!(
                "  {} {} {}",
                pad(&hit.id, 10),
                hit.title,
                hit.subtitle.as_deref().unwrap_or_default()
            )
            .trim_end()
            .to_string()
        }));
    }
    lines.join("\n")
}
