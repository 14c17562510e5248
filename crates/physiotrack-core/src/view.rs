//! Filter/sort pipeline producing the dashboard view.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::models::{parse_timestamp, Patient};

/// Dashboard sort mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOption {
    #[default]
    DateNewest,
    DateOldest,
    NameAz,
    Status,
}

impl SortOption {
    pub const ALL: [SortOption; 4] = [
        SortOption::DateNewest,
        SortOption::DateOldest,
        SortOption::NameAz,
        SortOption::Status,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            SortOption::DateNewest => "Date Added (Newest)",
            SortOption::DateOldest => "Date Added (Oldest)",
            SortOption::NameAz => "Name (A-Z)",
            SortOption::Status => "Status",
        }
    }

    fn short_name(&self) -> &'static str {
        match self {
            SortOption::DateNewest => "newest",
            SortOption::DateOldest => "oldest",
            SortOption::NameAz => "name",
            SortOption::Status => "status",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortOption {
    type Err = String;

    /// Accepts either the display label or the short name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|opt| opt.label() == s || opt.short_name().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| format!("unknown sort option: {}", s))
    }
}

/// Search, tag and sort inputs for one recomputation of the view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewQuery {
    pub search: String,
    /// Every listed tag must be present on a patient
    pub tags: Vec<String>,
    pub sort: SortOption,
}

impl ViewQuery {
    pub fn new(search: impl Into<String>, tags: Vec<String>, sort: SortOption) -> Self {
        Self {
            search: search.into(),
            tags,
            sort,
        }
    }

    /// Case-insensitive substring match on name, id or any tag.
    pub fn matches_search(&self, patient: &Patient) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        patient.name.to_lowercase().contains(&needle)
            || patient.id.to_lowercase().contains(&needle)
            || patient.tags.iter().any(|t| t.to_lowercase().contains(&needle))
    }

    /// Conjunction over the active tags; an empty set matches everything.
    pub fn matches_tags(&self, patient: &Patient) -> bool {
        self.tags.iter().all(|tag| patient.has_tag(tag))
    }

    pub fn matches(&self, patient: &Patient) -> bool {
        self.matches_search(patient) && self.matches_tags(patient)
    }
}

/// Toggle a tag in the active filter. An empty tag clears the filter.
pub fn toggle_tag(active: &[String], tag: &str) -> Vec<String> {
    if tag.is_empty() {
        return Vec::new();
    }
    if active.iter().any(|t| t == tag) {
        active.iter().filter(|t| *t != tag).cloned().collect()
    } else {
        let mut next = active.to_vec();
        next.push(tag.to_string());
        next
    }
}

/// Filter and sort the roster without copying or mutating it.
pub fn filter_and_sort<'a>(patients: &'a [Patient], query: &ViewQuery) -> Vec<&'a Patient> {
    let mut view: Vec<&Patient> = patients.iter().filter(|p| query.matches(p)).collect();

    match query.sort {
        SortOption::DateNewest => view.sort_by(|a, b| added_at(b).cmp(&added_at(a))),
        SortOption::DateOldest => view.sort_by(|a, b| added_at(a).cmp(&added_at(b))),
        SortOption::NameAz => view.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortOption::Status => view.sort_by(|a, b| a.status.label().cmp(b.status.label())),
    }

    view
}

/// Unparseable timestamps sort as the oldest instant.
fn added_at(patient: &Patient) -> Option<DateTime<Utc>> {
    parse_timestamp(&patient.date_added)
}

/// Case-insensitive ordering, falling back to exact comparison on ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}
