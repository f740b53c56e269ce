//! Project commands: create, list

use serde::Serialize;

use crate::bridge::Transport;
use crate::client::Client;
use crate::error::Result;
use crate::model::{NewProject, Project};
use crate::output::{emit_success, format_project_table, Human, HumanOutput, OutputOptions};

/// Options for `project create`
#[derive(Debug, Clone, Default)]
pub struct ProjectCreateOptions {
    pub name: String,
    pub notes: Option<String>,
    pub area: Option<String>,
    pub deadline: Option<String>,
}

/// Options for `project list`
#[derive(Debug, Clone, Default)]
pub struct ProjectListOptions {
    pub area: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
struct ProjectListReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    area: Option<String>,
    count: usize,
    projects: Vec<Project>,
}

pub fn run_create<T: Transport>(
    client: &Client<T>,
    options: ProjectCreateOptions,
    output: OutputOptions,
) -> Result<()> {
    let request = NewProject {
        name: options.name,
        notes: options.notes,
        area: options.area,
        deadline: options.deadline,
    };
    let created = client.create_project(&request)?;

    let mut human = HumanOutput::new(format!("Created project \"{}\"", created.name));
    human.push_summary("id", created.id.clone());
    if let Some(area) = request.area.as_deref() {
        human.push_summary("area", area);
    }
    if let Some(deadline) = request.deadline.as_deref() {
        human.push_summary("deadline", deadline);
    }
    human.push_next_step(format!("thingsctl add \"...\" --project \"{}\"", created.name));
    emit_success(output, "project create", &created, Some(Human::Block(&human)))
}

pub fn run_list<T: Transport>(
    client: &Client<T>,
    options: ProjectListOptions,
    output: OutputOptions,
) -> Result<()> {
    let projects = client.list_projects(options.area.as_deref(), options.limit)?;
    let table = format_project_table(&projects);
    let report = ProjectListReport {
        area: options.area,
        count: projects.len(),
        projects,
    };
    emit_success(output, "project list", &report, Some(Human::Table(table)))
}
