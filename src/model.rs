//! Typed records for the Things object graph and the requests that mutate it.
//!
//! Entities live entirely inside the Things app; these types only describe
//! what was observed through the bridge or what should be sent to it.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::Error;

/// Lifecycle state of a to do. `Completed` and `Canceled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Open,
    Completed,
    Canceled,
}

impl TaskStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Open => "open",
            TaskStatus::Completed => "completed",
            TaskStatus::Canceled => "canceled",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "open" => Ok(TaskStatus::Open),
            "completed" => Ok(TaskStatus::Completed),
            "canceled" | "cancelled" => Ok(TaskStatus::Canceled),
            other => Err(Error::Validation(format!(
                "invalid status '{other}': must be open, completed, or canceled"
            ))),
        }
    }
}

/// Kind of entity a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Task,
    Project,
    Area,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EntityKind::Task => "Task",
            EntityKind::Project => "Project",
            EntityKind::Area => "Area",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<NaiveDateTime>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            status: TaskStatus::Open,
            notes: None,
            due_date: None,
            tags: Vec::new(),
            project: None,
            area: None,
            creation_date: None,
            modification_date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Area {
    pub id: String,
    pub name: String,
}

/// One of several tasks sharing a name, as reported by a `MULTIPLE:` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
}

impl Candidate {
    /// Single-line description used when listing ambiguous matches.
    pub fn describe(&self) -> String {
        let mut line = format!("{} [{}]", self.name, self.status);
        if let Some(project) = self.project.as_ref() {
            line.push_str(&format!(" (project: {project})"));
        } else if let Some(area) = self.area.as_ref() {
            line.push_str(&format!(" (area: {area})"));
        }
        line.push_str(&format!(" id {}", self.id));
        line
    }
}

/// A task name resolved to its persistent id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRef {
    pub id: String,
    pub name: String,
}

/// Where a task lives. A task has at most one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Container {
    Project(String),
    Area(String),
}

impl Container {
    /// Build from the mutually exclusive `--project` / `--area` options.
    pub fn from_options(project: Option<String>, area: Option<String>) -> crate::Result<Option<Self>> {
        match (project, area) {
            (Some(_), Some(_)) => Err(Error::Validation(
                "a task belongs to a project or an area, not both".to_string(),
            )),
            (Some(project), None) => Ok(Some(Container::Project(project))),
            (None, Some(area)) => Ok(Some(Container::Area(area))),
            (None, None) => Ok(None),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Container::Project(name) | Container::Area(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub name: String,
    pub notes: Option<String>,
    pub due: Option<String>,
    pub tags: Vec<String>,
    pub container: Option<Container>,
}

/// Fields an edit may change. At least one must be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskEdit {
    pub name: Option<String>,
    pub notes: Option<String>,
    pub due: Option<String>,
    pub tags: Option<Vec<String>>,
    pub add_tags: Option<Vec<String>>,
    pub container: Option<Container>,
}

impl TaskEdit {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.notes.is_none()
            && self.due.is_none()
            && self.tags.is_none()
            && self.add_tags.is_none()
            && self.container.is_none()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub name: String,
    pub notes: Option<String>,
    pub area: Option<String>,
    pub deadline: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewArea {
    pub name: String,
}

/// Result of a create operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Created {
    pub kind: EntityKind,
    pub id: String,
    pub name: String,
}

/// Result of an edit, complete, or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Updated {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
}
