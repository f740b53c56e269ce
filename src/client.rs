//! High-level Things operations, one per CLI command.
//!
//! Each operation validates its input, resolves names when a task is the
//! target, runs at most one lookup and one mutation script, and decodes the
//! reply into a typed result.

use serde::Serialize;

use crate::bridge::{Bridge, Transport};
use crate::error::{Error, Result};
use crate::filter::{apply_limit, check_limit, filter_projects, TaskFilter};
use crate::model::{
    Area, Created, EntityKind, NewArea, NewProject, NewTask, Project, Task, TaskEdit, TaskStatus,
    Updated,
};
use crate::parser::{parse_area_list, parse_project_list, parse_reply, parse_task_list, Reply};
use crate::resolver::resolve_task;
use crate::script::{validate_edit, ListSource, LookupPurpose};

/// What to list and how to narrow it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListQuery {
    pub source: ListSource,
    pub filter: TaskFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

impl ListQuery {
    /// Build a query from raw CLI values. The list name is validated here,
    /// before anything is sent to Things.
    pub fn from_options(
        list: Option<&str>,
        filter: TaskFilter,
        limit: Option<usize>,
    ) -> Result<Self> {
        let source = list.map(str::parse::<ListSource>).transpose()?.unwrap_or_default();
        check_limit(limit)?;
        Ok(Self {
            source,
            filter,
            limit,
        })
    }
}

pub struct Client<T> {
    bridge: Bridge<T>,
}

impl<T: Transport> Client<T> {
    pub fn new(bridge: Bridge<T>) -> Self {
        Self { bridge }
    }

    pub fn bridge(&self) -> &Bridge<T> {
        &self.bridge
    }

    pub fn list_tasks(&self, query: &ListQuery) -> Result<Vec<Task>> {
        let script = self.bridge.scripts().list_tasks(query.source);
        let reply = self.bridge.run(&script)?;
        let mut tasks = query.filter.apply(parse_task_list(&reply));
        apply_limit(&mut tasks, query.limit)?;
        Ok(tasks)
    }

    pub fn add_task(&self, request: &NewTask) -> Result<Created> {
        let script = self.bridge.scripts().add_task(request)?;
        let id = self.run_for_id(&script)?;
        Ok(Created {
            kind: EntityKind::Task,
            id,
            name: request.name.trim().to_string(),
        })
    }

    pub fn edit_task(&self, target: &str, edit: &TaskEdit) -> Result<Updated> {
        validate_edit(edit)?;
        let task = resolve_task(&self.bridge, target, LookupPurpose::Edit)?;
        let script = self.bridge.scripts().edit_task(&task.id, edit)?;
        let reply = self.bridge.run(&script)?;
        let name = match reply.trim() {
            "" => task.name,
            name => name.to_string(),
        };
        Ok(Updated {
            id: task.id,
            name,
            status: None,
        })
    }

    pub fn complete_task(&self, target: &str) -> Result<Updated> {
        let task = resolve_task(&self.bridge, target, LookupPurpose::Complete)?;
        let script = self.bridge.scripts().complete_task(&task.id);
        let reply = parse_reply(&self.bridge.run(&script)?)?;
        match reply {
            Reply::Completed(name) => Ok(Updated {
                id: task.id,
                name,
                status: Some(TaskStatus::Completed),
            }),
            other => Err(unexpected_status_reply(&task.name, other)),
        }
    }

    pub fn cancel_task(&self, target: &str) -> Result<Updated> {
        let task = resolve_task(&self.bridge, target, LookupPurpose::Cancel)?;
        let script = self.bridge.scripts().cancel_task(&task.id);
        let reply = parse_reply(&self.bridge.run(&script)?)?;
        match reply {
            Reply::Canceled(name) => Ok(Updated {
                id: task.id,
                name,
                status: Some(TaskStatus::Canceled),
            }),
            other => Err(unexpected_status_reply(&task.name, other)),
        }
    }

    pub fn create_project(&self, request: &NewProject) -> Result<Created> {
        let script = self.bridge.scripts().create_project(request)?;
        let id = self.run_for_id(&script)?;
        Ok(Created {
            kind: EntityKind::Project,
            id,
            name: request.name.trim().to_string(),
        })
    }

    pub fn create_area(&self, request: &NewArea) -> Result<Created> {
        let script = self.bridge.scripts().create_area(request)?;
        let id = self.run_for_id(&script)?;
        Ok(Created {
            kind: EntityKind::Area,
            id,
            name: request.name.trim().to_string(),
        })
    }

    pub fn list_projects(&self, area: Option<&str>, limit: Option<usize>) -> Result<Vec<Project>> {
        check_limit(limit)?;
        let script = self.bridge.scripts().list_projects();
        let reply = self.bridge.run(&script)?;
        let mut projects = filter_projects(parse_project_list(&reply), area);
        apply_limit(&mut projects, limit)?;
        Ok(projects)
    }

    pub fn list_areas(&self) -> Result<Vec<Area>> {
        let script = self.bridge.scripts().list_areas();
        let reply = self.bridge.run(&script)?;
        Ok(parse_area_list(&reply))
    }

    fn run_for_id(&self, script: &str) -> Result<String> {
        let reply = self.bridge.run(script)?;
        let id = reply.trim();
        if id.is_empty() {
            return Err(Error::ExecutionFailed(
                "Things did not return an id for the new item".to_string(),
            ));
        }
        Ok(id.to_string())
    }
}

fn unexpected_status_reply(name: &str, reply: Reply) -> Error {
    match reply {
        Reply::AlreadyCompleted(existing) => Error::AlreadyInTerminalState {
            name: if existing.is_empty() { name.to_string() } else { existing },
            status: TaskStatus::Completed,
        },
        Reply::AlreadyCanceled(existing) => Error::AlreadyInTerminalState {
            name: if existing.is_empty() { name.to_string() } else { existing },
            status: TaskStatus::Canceled,
        },
        other => Error::ExecutionFailed(format!(
            "unexpected reply while changing status of \"{name}\": {other:?}"
        )),
    }
}
