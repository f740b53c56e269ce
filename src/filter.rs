//! Client-side filtering of fetched records.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Project, Task};

/// Case-insensitive substring filters, combined with AND.
///
/// An absent or blank filter places no constraint. A record lacking the
/// filtered field never matches a non-blank filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TaskFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl TaskFilter {
    pub fn is_empty(&self) -> bool {
        needle(&self.project).is_none() && needle(&self.area).is_none() && needle(&self.tag).is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        field_matches(needle(&self.project), task.project.as_deref())
            && field_matches(needle(&self.area), task.area.as_deref())
            && match needle(&self.tag) {
                Some(tag) => task.tags.iter().any(|candidate| contains(candidate, &tag)),
                None => true,
            }
    }

    /// Keep matching tasks, preserving order.
    pub fn apply(&self, tasks: Vec<Task>) -> Vec<Task> {
        if self.is_empty() {
            return tasks;
        }
        tasks.into_iter().filter(|task| self.matches(task)).collect()
    }
}

/// Keep projects whose area contains `area` (case-insensitive).
pub fn filter_projects(projects: Vec<Project>, area: Option<&str>) -> Vec<Project> {
    let needle = area.map(str::trim).filter(|value| !value.is_empty()).map(str::to_lowercase);
    match needle {
        Some(needle) => projects
            .into_iter()
            .filter(|project| field_matches(Some(needle.clone()), project.area.as_deref()))
            .collect(),
        None => projects,
    }
}

/// Reject a zero limit. Absent means unlimited.
pub fn check_limit(limit: Option<usize>) -> Result<()> {
    if limit == Some(0) {
        return Err(Error::Validation("limit must be greater than zero".to_string()));
    }
    Ok(())
}

/// Truncate to `limit` records. A zero limit is rejected.
pub fn apply_limit<T>(records: &mut Vec<T>, limit: Option<usize>) -> Result<()> {
    check_limit(limit)?;
    if let Some(limit) = limit {
        records.truncate(limit);
    }
    Ok(())
}

fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

fn field_matches(needle: Option<String>, field: Option<&str>) -> bool {
    match needle {
        Some(needle) => field.map(|value| contains(value, &needle)).unwrap_or(false),
        None => true,
    }
}

fn contains(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: &str, project: Option<&str>, area: Option<&str>, tags: &[&str]) -> Task {
        let mut task = Task::new(id, format!("Task {id}"));
        task.project = project.map(str::to_string);
        task.area = area.map(str::to_string);
        task.tags = tags.iter().map(|tag| tag.to_string()).collect();
        task
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|task| task.id.as_str()).collect()
    }

    #[test]
    fn project_filter_is_case_insensitive_substring() {
        let tasks = vec![
            task("1", Some("Website Redesign"), None, &[]),
            task("2", Some("Backend"), None, &[]),
            task("3", None, None, &[]),
        ];
        let filter = TaskFilter {
            project: Some("web".to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&filter.apply(tasks)), vec!["1"]);
    }

    #[test]
    fn no_filter_is_identity() {
        let tasks = vec![task("1", None, None, &[]), task("2", Some("P"), None, &[])];
        assert_eq!(ids(&TaskFilter::default().apply(tasks)), vec!["1", "2"]);

        let blank = TaskFilter {
            area: Some("  ".to_string()),
            ..TaskFilter::default()
        };
        assert!(blank.is_empty());
    }

    #[test]
    fn filters_combine_with_and() {
        let tasks = vec![
            task("1", None, Some("Work"), &["Urgent", "email"]),
            task("2", None, Some("Work"), &["later"]),
            task("3", None, Some("Home"), &["urgent"]),
        ];
        let filter = TaskFilter {
            area: Some("work".to_string()),
            tag: Some("URG".to_string()),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&filter.apply(tasks)), vec!["1"]);
    }

    #[test]
    fn tag_filter_never_matches_untagged() {
        let filter = TaskFilter {
            tag: Some("x".to_string()),
            ..TaskFilter::default()
        };
        assert!(!filter.matches(&task("1", None, None, &[])));
    }

    #[test]
    fn filter_projects_by_area() {
        let project = |id: &str, area: Option<&str>| Project {
            id: id.to_string(),
            name: id.to_string(),
            status: Default::default(),
            notes: None,
            area: area.map(str::to_string),
            deadline: None,
        };
        let projects = vec![project("a", Some("Work")), project("b", None), project("c", Some("Home"))];
        let filtered = filter_projects(projects, Some("WOR"));
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a");
    }

    #[test]
    fn limit_truncates_and_rejects_zero() {
        let mut values = vec![1, 2, 3];
        apply_limit(&mut values, Some(2)).expect("limit");
        assert_eq!(values, vec![1, 2]);
        assert!(apply_limit(&mut values, Some(0)).is_err());
        apply_limit(&mut values, None).expect("no limit");
        assert_eq!(values.len(), 2);
    }
}
