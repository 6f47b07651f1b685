//! Schedule grouping for Gantt and board views.
//!
//! A simulation schedule is a flat list of [`ScheduleEntry`] rows. The
//! views need it as a tree, either product → operation → tasks or
//! machine → tasks. Grouping borrows the entries; nothing is copied
//! except the group keys.
//!
//! Grouping keeps every task. Rendering goes through [`Displayable`],
//! which drops tasks shorter than the minimum bar span and any group
//! left empty by that.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use shared::time::span_ms;

use crate::models::operation::machine_title;
use crate::models::ScheduleEntry;

pub const NO_PRODUCT: &str = "NO_PRODUCT";
pub const NO_OPERATION: &str = "NO_OPERATION";
pub const NO_MACHINE: &str = "NO_MACHINE";

/// Shortest span a task needs to be drawn as a bar.
pub const MIN_DISPLAY_SPAN_MS: i64 = 60_000;

/// A schedule entry with its times parsed once.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedTask<'a> {
    pub entry: &'a ScheduleEntry,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

impl<'a> GroupedTask<'a> {
    pub fn new(entry: &'a ScheduleEntry) -> Self {
        Self {
            entry,
            start: entry.start(),
            end: entry.end(),
        }
    }

    /// `end - start` in milliseconds; `None` if either time is unusable.
    pub fn span_ms(&self) -> Option<i64> {
        span_ms(self.start, self.end)
    }

    pub fn is_displayable(&self, min_span_ms: i64) -> bool {
        self.span_ms().is_some_and(|span| span >= min_span_ms)
    }
}

/// Tasks of one operation within a product.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationGroup<'a> {
    pub operation_id: String,
    pub tasks: Vec<GroupedTask<'a>>,
}

/// Operations of one product, sorted by operation id.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductGroup<'a> {
    pub product_name: String,
    pub operations: Vec<OperationGroup<'a>>,
}

impl<'a> ProductGroup<'a> {
    pub fn tasks(&self) -> impl Iterator<Item = &GroupedTask<'a>> {
        self.operations.iter().flat_map(|op| op.tasks.iter())
    }
}

/// Tasks run on one machine.
#[derive(Debug, Clone, PartialEq)]
pub struct MachineGroup<'a> {
    pub machine_id: String,
    pub machine_name: Option<String>,
    /// `machineId · machineName`, also the sort key.
    pub title: String,
    pub tasks: Vec<GroupedTask<'a>>,
}

/// Orders tasks by parsed start time. Tasks without a usable start go
/// last; equal starts keep input order.
fn sort_by_start(tasks: &mut [GroupedTask<'_>]) {
    tasks.sort_by_key(|task| (task.start.is_none(), task.start));
}

/// Groups entries by product, then by operation.
///
/// Products and operations are ordered lexicographically. Missing keys
/// fall into [`NO_PRODUCT`] / [`NO_OPERATION`].
pub fn group_by_product_operation(entries: &[ScheduleEntry]) -> Vec<ProductGroup<'_>> {
    let mut tree: BTreeMap<&str, BTreeMap<&str, Vec<GroupedTask<'_>>>> = BTreeMap::new();

    for entry in entries {
        let product = entry.product_name.as_deref().unwrap_or(NO_PRODUCT);
        let operation = entry.operation_id.as_deref().unwrap_or(NO_OPERATION);
        tree.entry(product)
            .or_default()
            .entry(operation)
            .or_default()
            .push(GroupedTask::new(entry));
    }

    tree.into_iter()
        .map(|(product, operations)| ProductGroup {
            product_name: product.to_string(),
            operations: operations
                .into_iter()
                .map(|(operation, mut tasks)| {
                    sort_by_start(&mut tasks);
                    OperationGroup {
                        operation_id: operation.to_string(),
                        tasks,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Groups entries by machine.
///
/// Entries lacking either a start or an end value are skipped. Groups are
/// ordered by their display title.
pub fn group_by_machine(entries: &[ScheduleEntry]) -> Vec<MachineGroup<'_>> {
    let mut by_machine: BTreeMap<&str, Vec<&ScheduleEntry>> = BTreeMap::new();

    for entry in entries.iter().filter(|e| e.has_time_span()) {
        let machine = entry.machine_id.as_deref().unwrap_or(NO_MACHINE);
        by_machine.entry(machine).or_default().push(entry);
    }

    let mut groups: Vec<MachineGroup<'_>> = by_machine
        .into_iter()
        .filter(|(_, members)| !members.is_empty())
        .map(|(machine_id, members)| {
            let machine_name = members
                .iter()
                .find_map(|entry| entry.machine_name.clone());
            let mut tasks: Vec<_> = members.into_iter().map(GroupedTask::new).collect();
            sort_by_start(&mut tasks);

            MachineGroup {
                title: machine_title(machine_id, machine_name.as_deref()),
                machine_id: machine_id.to_string(),
                machine_name,
                tasks,
            }
        })
        .collect();

    groups.sort_by(|a, b| a.title.cmp(&b.title));
    groups
}

/// Projection of a group onto its drawable tasks.
pub trait Displayable: Sized {
    /// The group restricted to tasks spanning at least `min_span_ms`, or
    /// `None` when nothing drawable is left.
    fn displayable(&self, min_span_ms: i64) -> Option<Self>;
}

impl<'a> Displayable for OperationGroup<'a> {
    fn displayable(&self, min_span_ms: i64) -> Option<Self> {
        let tasks: Vec<_> = self
            .tasks
            .iter()
            .filter(|task| task.is_displayable(min_span_ms))
            .cloned()
            .collect();

        (!tasks.is_empty()).then(|| Self {
            operation_id: self.operation_id.clone(),
            tasks,
        })
    }
}

impl<'a> Displayable for ProductGroup<'a> {
    fn displayable(&self, min_span_ms: i64) -> Option<Self> {
        let operations = displayable_groups(&self.operations, min_span_ms);
        (!operations.is_empty()).then(|| Self {
            product_name: self.product_name.clone(),
            operations,
        })
    }
}

impl<'a> Displayable for MachineGroup<'a> {
    fn displayable(&self, min_span_ms: i64) -> Option<Self> {
        let tasks: Vec<_> = self
            .tasks
            .iter()
            .filter(|task| task.is_displayable(min_span_ms))
            .cloned()
            .collect();

        (!tasks.is_empty()).then(|| Self {
            machine_id: self.machine_id.clone(),
            machine_name: self.machine_name.clone(),
            title: self.title.clone(),
            tasks,
        })
    }
}

/// Applies [`Displayable::displayable`] to every group, dropping the empty ones.
pub fn displayable_groups<G: Displayable>(groups: &[G], min_span_ms: i64) -> Vec<G> {
    groups
        .iter()
        .filter_map(|group| group.displayable(min_span_ms))
        .collect()
}

/// Time range covered by a set of tasks; scales Gantt bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Earliest start and latest end over tasks that have both times.
    pub fn covering<'t, 'a: 't>(
        tasks: impl IntoIterator<Item = &'t GroupedTask<'a>>,
    ) -> Option<Self> {
        tasks
            .into_iter()
            .filter_map(|task| Some((task.start?, task.end?)))
            .fold(None, |window: Option<Self>, (start, end)| {
                Some(match window {
                    None => Self { start, end },
                    Some(w) => Self {
                        start: w.start.min(start),
                        end: w.end.max(end),
                    },
                })
            })
    }

    pub fn span_ms(&self) -> i64 {
        (self.end - self.start).num_milliseconds()
    }

    /// Position of `at` inside the window in `0.0..=1.0`.
    pub fn position(&self, at: DateTime<Utc>) -> f64 {
        let span = self.span_ms();
        if span <= 0 {
            return 0.0;
        }
        let offset = (at - self.start).num_milliseconds() as f64 / span as f64;
        offset.clamp(0.0, 1.0)
    }
}
