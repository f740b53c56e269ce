//! Task commands: list, add, edit, complete, cancel

use serde::Serialize;

use crate::bridge::Transport;
use crate::client::{Client, ListQuery};
use crate::error::Result;
use crate::filter::TaskFilter;
use crate::model::{Container, NewTask, Task, TaskEdit, Updated};
use crate::output::{emit_success, format_task_table, Human, HumanOutput, OutputOptions};
use crate::script::ListSource;

/// Options for the list command
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    pub list: Option<String>,
    pub project: Option<String>,
    pub area: Option<String>,
    pub tag: Option<String>,
    pub limit: Option<usize>,
}

/// Options for the add command
#[derive(Debug, Clone, Default)]
pub struct AddOptions {
    pub name: String,
    pub notes: Option<String>,
    pub due: Option<String>,
    pub tags: Vec<String>,
    pub project: Option<String>,
    pub area: Option<String>,
}

/// Options for the edit command
#[derive(Debug, Clone, Default)]
pub struct EditOptions {
    pub task: String,
    pub name: Option<String>,
    pub notes: Option<String>,
    pub due: Option<String>,
    pub tags: Option<Vec<String>>,
    pub add_tags: Option<Vec<String>>,
    pub project: Option<String>,
    pub area: Option<String>,
}

#[derive(Serialize)]
struct ListReport {
    list: ListSource,
    #[serde(skip_serializing_if = "TaskFilter::is_empty")]
    filter: TaskFilter,
    count: usize,
    tasks: Vec<Task>,
}

pub fn run_list<T: Transport>(
    client: &Client<T>,
    options: ListOptions,
    output: OutputOptions,
) -> Result<()> {
    let filter = TaskFilter {
        project: options.project,
        area: options.area,
        tag: options.tag,
    };
    let query = ListQuery::from_options(options.list.as_deref(), filter, options.limit)?;
    let tasks = client.list_tasks(&query)?;

    let table = format_task_table(&tasks);
    let report = ListReport {
        list: query.source,
        filter: query.filter,
        count: tasks.len(),
        tasks,
    };
    emit_success(output, "list", &report, Some(Human::Table(table)))
}

pub fn run_add<T: Transport>(
    client: &Client<T>,
    options: AddOptions,
    output: OutputOptions,
) -> Result<()> {
    let request = NewTask {
        name: options.name,
        notes: options.notes,
        due: options.due,
        tags: options.tags,
        container: Container::from_options(options.project, options.area)?,
    };
    let created = client.add_task(&request)?;

    let mut human = HumanOutput::new(format!("Added task \"{}\"", created.name));
    human.push_summary("id", created.id.clone());
    if let Some(container) = request.container.as_ref() {
        human.push_summary(container_label(container), container.name());
    }
    if let Some(due) = request.due.as_deref() {
        human.push_summary("due", due);
    }
    emit_success(output, "add", &created, Some(Human::Block(&human)))
}

pub fn run_edit<T: Transport>(
    client: &Client<T>,
    options: EditOptions,
    output: OutputOptions,
) -> Result<()> {
    let edit = TaskEdit {
        name: options.name,
        notes: options.notes,
        due: options.due,
        tags: options.tags,
        add_tags: options.add_tags,
        container: Container::from_options(options.project, options.area)?,
    };
    let updated = client.edit_task(&options.task, &edit)?;

    let mut human = HumanOutput::new(format!("Updated task \"{}\"", updated.name));
    human.push_summary("id", updated.id.clone());
    for (label, changed) in [
        ("name", edit.name.is_some()),
        ("notes", edit.notes.is_some()),
        ("due", edit.due.is_some()),
        ("tags", edit.tags.is_some() || edit.add_tags.is_some()),
    ] {
        if changed {
            human.push_detail(format!("{label} changed"));
        }
    }
    if let Some(container) = edit.container.as_ref() {
        human.push_detail(format!(
            "moved to {} \"{}\"",
            container_label(container),
            container.name()
        ));
    }
    emit_success(output, "edit", &updated, Some(Human::Block(&human)))
}

pub fn run_complete<T: Transport>(
    client: &Client<T>,
    task: &str,
    output: OutputOptions,
) -> Result<()> {
    let updated = client.complete_task(task)?;
    emit_status_change(output, "complete", "Completed", &updated)
}

pub fn run_cancel<T: Transport>(
    client: &Client<T>,
    task: &str,
    output: OutputOptions,
) -> Result<()> {
    let updated = client.cancel_task(task)?;
    emit_status_change(output, "cancel", "Canceled", &updated)
}

fn emit_status_change(
    output: OutputOptions,
    command: &str,
    verb: &str,
    updated: &Updated,
) -> Result<()> {
    let mut human = HumanOutput::new(format!("{verb} task \"{}\"", updated.name));
    human.push_summary("id", updated.id.clone());
    emit_success(output, command, updated, Some(Human::Block(&human)))
}

fn container_label(container: &Container) -> &'static str {
    match container {
        Container::Project(_) => "project",
        Container::Area(_) => "area",
    }
}
