//! Keyword filtering and sorting for list tables.

use std::cmp::Ordering;

use crate::models::{Machine, Member, Notice, Operation, Post, Product, Scenario, ScheduleEntry};

/// Records that can be matched against a free-text keyword.
pub trait Searchable {
    /// Text fields the keyword is matched against.
    fn search_fields(&self) -> Vec<&str>;

    /// Case-insensitive substring match over [`Searchable::search_fields`].
    /// A blank keyword matches everything.
    fn matches(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        keyword.is_empty()
            || self
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&keyword))
    }
}

/// Rows matching `keyword`, in input order.
pub fn filter_by_keyword<'a, T: Searchable>(rows: &'a [T], keyword: Option<&str>) -> Vec<&'a T> {
    match keyword {
        Some(keyword) => rows.iter().filter(|row| row.matches(keyword)).collect(),
        None => rows.iter().collect(),
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Stable sort by a text column. Numeric cells come first in numeric
/// order, then every other cell in text order.
pub fn sort_by_column<T, F>(rows: &mut [T], key: F, order: SortOrder)
where
    F: Fn(&T) -> String,
{
    rows.sort_by(|a, b| {
        let ordering = compare_cells(&key(a), &key(b));
        match order {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    });
}

fn numeric_cell(cell: &str) -> Option<f64> {
    cell.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn compare_cells(a: &str, b: &str) -> Ordering {
    match (numeric_cell(a), numeric_cell(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn fields<'a, const N: usize>(
    required: [&'a str; N],
    optional: &[Option<&'a str>],
) -> Vec<&'a str> {
    required
        .into_iter()
        .chain(optional.iter().flatten().copied())
        .collect()
}

impl Searchable for Product {
    fn search_fields(&self) -> Vec<&str> {
        fields([self.id.as_str(), self.name.as_str()], &[self.category.as_deref()])
    }
}

impl Searchable for Operation {
    fn search_fields(&self) -> Vec<&str> {
        fields([self.id.as_str(), self.name.as_str()], &[self.machine_type.as_deref()])
    }
}

impl Searchable for Machine {
    fn search_fields(&self) -> Vec<&str> {
        fields(
            [self.id.as_str(), self.name.as_str()],
            &[self.machine_type.as_deref(), self.status.as_deref()],
        )
    }
}

impl Searchable for Notice {
    fn search_fields(&self) -> Vec<&str> {
        fields([self.title.as_str(), self.content.as_str()], &[self.author.as_deref()])
    }
}

impl Searchable for Post {
    fn search_fields(&self) -> Vec<&str> {
        fields([self.title.as_str(), self.content.as_str()], &[self.author.as_deref()])
    }
}

impl Searchable for Member {
    fn search_fields(&self) -> Vec<&str> {
        fields(
            [self.id.as_str(), self.name.as_str()],
            &[self.email.as_deref(), self.department.as_deref()],
        )
    }
}

impl Searchable for Scenario {
    fn search_fields(&self) -> Vec<&str> {
        fields([self.id.as_str(), self.name.as_str()], &[self.description.as_deref()])
    }
}

impl Searchable for ScheduleEntry {
    fn search_fields(&self) -> Vec<&str> {
        fields(
            [],
            &[
                self.product_name.as_deref(),
                self.operation_id.as_deref(),
                self.task_id.as_deref(),
                self.machine_id.as_deref(),
                self.machine_name.as_deref(),
                self.worker_name.as_deref(),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine(id: &str, name: &str) -> Machine {
        Machine {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let rows = vec![machine("M1", "CNC Lathe"), machine("M2", "Press")];
        let hits = filter_by_keyword(&rows, Some("lathe"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, "M1");
    }

    #[test]
    fn test_blank_keyword_keeps_everything() {
        let rows = vec![machine("M1", "A"), machine("M2", "B")];
        assert_eq!(filter_by_keyword(&rows, Some("  ")).len(), 2);
        assert_eq!(filter_by_keyword(&rows, None).len(), 2);
    }

    #[test]
    fn test_schedule_entry_matches_worker() {
        let entry = ScheduleEntry {
            worker_name: Some("김민수".into()),
            ..Default::default()
        };
        assert!(entry.matches("민수"));
        assert!(!entry.matches("OP10"));
    }

    #[test]
    fn test_sort_numeric_and_text_columns() {
        let mut rows = vec![machine("10", "b"), machine("9", "c"), machine("100", "a")];
        sort_by_column(&mut rows, |m| m.id.clone(), SortOrder::Ascending);
        let ids: Vec<_> = rows.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["9", "10", "100"]);

        sort_by_column(&mut rows, |m| m.name.clone(), SortOrder::Descending);
        let names: Vec<_> = rows.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["c", "b", "a"]);
    }

    #[test]
    fn test_sort_mixed_column_puts_numbers_first() {
        let mut rows: Vec<Machine> = ["5x", "10", "NaN", "9", "M1", "2.5"]
            .into_iter()
            .map(|id| machine(id, ""))
            .collect();
        sort_by_column(&mut rows, |m| m.id.clone(), SortOrder::Ascending);
        let ids: Vec<_> = rows.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["2.5", "9", "10", "5x", "M1", "NaN"]);

        sort_by_column(&mut rows, |m| m.id.clone(), SortOrder::Descending);
        let ids: Vec<_> = rows.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["NaN", "M1", "5x", "10", "9", "2.5"]);
    }
}
