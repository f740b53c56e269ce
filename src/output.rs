//! Shared output formatting for thingsctl commands.

use serde::Serialize;

use crate::error::{Error, JsonError, Result};
use crate::model::{Area, Project, Task};

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

/// What to print in human mode.
pub enum Human<'a> {
    Block(&'a HumanOutput),
    Table(String),
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<Human<'_>>,
) -> Result<()> {
    if options.json {
        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            success: bool,
            command: &'a str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
        }

        let warnings = match human.as_ref() {
            Some(Human::Block(block)) => block.warnings.clone(),
            _ => Vec::new(),
        };
        let payload = Envelope {
            success: true,
            command,
            data,
            warnings,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    match human {
        Some(Human::Block(block)) => println!("{}", format_human(block)),
        Some(Human::Table(table)) => println!("{table}"),
        None => {}
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    if json {
        #[derive(Serialize)]
        struct Envelope<'a> {
            command: &'a str,
            #[serde(flatten)]
            error: JsonError,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            command,
            error: JsonError::from(err),
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = next_steps.first() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    push_section(&mut lines, "Details", &output.details);
    push_section(&mut lines, "Warnings", &output.warnings);
    push_section(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

pub fn format_task_table(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "No tasks found.".to_string();
    }

    let rows = tasks
        .iter()
        .map(|task| {
            let container = match (task.project.as_deref(), task.area.as_deref()) {
                (Some(project), _) => project.to_string(),
                (None, Some(area)) => format!("[{area}]"),
                (None, None) => String::new(),
            };
            vec![
                task.id.clone(),
                task.name.clone(),
                task.status.to_string(),
                task.due_date.clone().unwrap_or_default(),
                container,
                task.tags.join(", "),
            ]
        })
        .collect::<Vec<_>>();

    let mut table = render_table(&["ID", "NAME", "STATUS", "DUE", "PROJECT/AREA", "TAGS"], &rows);
    table.push_str(&format!("\n\n{} task(s)", tasks.len()));
    table
}

pub fn format_project_table(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No projects found.".to_string();
    }

    let rows = projects
        .iter()
        .map(|project| {
            vec![
                project.id.clone(),
                project.name.clone(),
                project.status.to_string(),
                project.area.clone().unwrap_or_default(),
                project.deadline.clone().unwrap_or_default(),
            ]
        })
        .collect::<Vec<_>>();

    render_table(&["ID", "NAME", "STATUS", "AREA", "DEADLINE"], &rows)
}

pub fn format_area_table(areas: &[Area]) -> String {
    if areas.is_empty() {
        return "No areas found.".to_string();
    }

    let rows = areas
        .iter()
        .map(|area| vec![area.id.clone(), area.name.clone()])
        .collect::<Vec<_>>();

    render_table(&["ID", "NAME"], &rows)
}

/// Left-aligned columns separated by two spaces; trailing padding trimmed.
fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in rows {
        for (idx, cell) in row.iter().enumerate() {
            let width = cell.chars().count();
            if width > widths[idx] {
                widths[idx] = width;
            }
        }
    }

    let render_row = |cells: Vec<&str>| {
        let line = cells
            .iter()
            .zip(&widths)
            .map(|(cell, &width)| format!("{cell:<width$}"))
            .collect::<Vec<_>>()
            .join("  ");
        line.trim_end().to_string()
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(render_row(headers.to_vec()));
    for row in rows {
        lines.push(render_row(row.iter().map(String::as_str).collect()));
    }
    lines.join("\n")
}

pub fn infer_command_name_from_args() -> String {
    let mut args = std::env::args().skip(1);
    let mut command = None;
    let mut subcommand = None;

    for arg in args.by_ref() {
        if arg.starts_with('-') {
            continue;
        }
        command = Some(arg);
        break;
    }

    let command = match command {
        Some(cmd) => cmd,
        None => return "thingsctl".to_string(),
    };

    if matches!(command.as_str(), "project" | "area" | "skill") {
        for arg in args.by_ref() {
            if arg.starts_with('-') {
                continue;
            }
            subcommand = Some(arg);
            break;
        }
    }

    if let Some(sub) = subcommand {
        format!("{command} {sub}")
    } else {
        command
    }
}

fn error_next_steps(err: &Error) -> Vec<String> {
    use crate::model::EntityKind;

    match err {
        Error::NotAccessible { app, .. } => vec![format!("open -a {app}")],
        Error::NotFound {
            kind: EntityKind::Task,
            ..
        } => vec!["thingsctl list".to_string()],
        Error::NotFound {
            kind: EntityKind::Project,
            name,
        } => vec![format!("thingsctl project create \"{name}\"")],
        Error::NotFound {
            kind: EntityKind::Area,
            name,
        } => vec![format!("thingsctl area create \"{name}\"")],
        Error::AmbiguousName { .. } => {
            vec!["rename one of the tasks in Things, then retry".to_string()]
        }
        Error::InvalidConfig(_) => vec!["fix the config file then retry".to_string()],
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_section(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}
