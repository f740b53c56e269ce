//! Command-line interface for thingsctl
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command family is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::bridge::{Bridge, OsascriptTransport};
use crate::client::Client;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputOptions;

mod area;
mod project;
mod skill;
mod task;

pub use area::{run_create as run_area_create, run_list as run_area_list};
pub use project::{
    run_create as run_project_create, run_list as run_project_list, ProjectCreateOptions,
    ProjectListOptions,
};
pub use skill::{run_install as run_skill_install, SkillInstallOptions};
pub use task::{
    run_add, run_cancel, run_complete, run_edit, run_list, AddOptions, EditOptions, ListOptions,
};

/// thingsctl - control Things from the command line
///
/// Lists, creates, edits, completes and cancels to dos through the Things
/// AppleScript bridge. Tasks are addressed by exact name.
#[derive(Parser, Debug)]
#[command(name = "thingsctl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to a config file (defaults to the platform config directory)
    #[arg(long, global = true, env = "THINGSCTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Name of the Things application to address
    #[arg(long, global = true, env = "THINGSCTL_APP")]
    pub app: Option<String>,

    /// AppleScript interpreter to run scripts with
    #[arg(long, global = true, env = "THINGSCTL_OSASCRIPT")]
    pub osascript: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List to dos, optionally from one built-in list
    List {
        /// Built-in list: today, upcoming, anytime, someday
        #[arg(long)]
        list: Option<String>,

        /// Only tasks whose project name contains this text
        #[arg(long)]
        project: Option<String>,

        /// Only tasks whose area name contains this text
        #[arg(long)]
        area: Option<String>,

        /// Only tasks with a tag containing this text
        #[arg(long)]
        tag: Option<String>,

        /// Show at most this many tasks
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Create a to do
    Add {
        /// Task name
        name: String,

        /// Notes for the task
        #[arg(long)]
        notes: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Comma-separated tag names
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Project to file the task under
        #[arg(long)]
        project: Option<String>,

        /// Area to file the task under
        #[arg(long)]
        area: Option<String>,
    },

    /// Change fields of an existing to do
    Edit {
        /// Exact name of the task to edit
        task: String,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// Replace the notes
        #[arg(long)]
        notes: Option<String>,

        /// New due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Replace all tags (comma-separated; empty clears)
        #[arg(long, value_delimiter = ',')]
        tags: Option<Vec<String>>,

        /// Add tags, keeping existing ones (comma-separated)
        #[arg(long, value_delimiter = ',')]
        add_tags: Option<Vec<String>>,

        /// Move the task into this project
        #[arg(long)]
        project: Option<String>,

        /// Move the task into this area
        #[arg(long)]
        area: Option<String>,
    },

    /// Mark a to do as completed
    Complete {
        /// Exact name of the task
        task: String,
    },

    /// Mark a to do as canceled
    Cancel {
        /// Exact name of the task
        task: String,
    },

    /// Project management commands
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Area management commands
    #[command(subcommand)]
    Area(AreaCommands),

    /// Agent skill commands
    #[command(subcommand)]
    Skill(SkillCommands),
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    Create {
        /// Project name
        name: String,

        /// Notes for the project
        #[arg(long)]
        notes: Option<String>,

        /// Area to file the project under
        #[arg(long)]
        area: Option<String>,

        /// Deadline (YYYY-MM-DD)
        #[arg(long)]
        deadline: Option<String>,
    },

    /// List projects
    List {
        /// Only projects whose area name contains this text
        #[arg(long)]
        area: Option<String>,

        /// Show at most this many projects
        #[arg(long)]
        limit: Option<usize>,
    },
}

/// Area subcommands
#[derive(Subcommand, Debug)]
pub enum AreaCommands {
    /// Create an area
    Create {
        /// Area name
        name: String,
    },

    /// List areas
    List,
}

/// Skill subcommands
#[derive(Subcommand, Debug)]
pub enum SkillCommands {
    /// Install the bundled SKILL.md for coding agents
    Install {
        /// Destination directory (defaults to ~/.claude/skills/thingsctl)
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Overwrite an existing SKILL.md
        #[arg(long)]
        force: bool,
    },
}

impl Cli {
    /// Whether errors should be reported as JSON.
    ///
    /// The flag wins; otherwise the config file decides. A config that
    /// fails to load counts as human mode.
    pub fn wants_json(&self) -> bool {
        self.json
            || Config::load_or_default(self.config.as_deref())
                .map(|config| config.output.json)
                .unwrap_or(false)
    }

    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let Cli {
            config,
            app,
            osascript,
            json,
            quiet,
            command,
        } = self;

        let config = Config::load_or_default(config.as_deref())?;
        let output = OutputOptions {
            json: json || config.output.json,
            quiet,
        };
        tracing::debug!(?command, json = output.json, "running command");

        // Only commands that talk to Things build a client.
        let client = || connect(&config, app, osascript);
        match command {
            Commands::List {
                list,
                project,
                area,
                tag,
                limit,
            } => run_list(
                &client()?,
                ListOptions {
                    list,
                    project,
                    area,
                    tag,
                    limit,
                },
                output,
            ),
            Commands::Add {
                name,
                notes,
                due,
                tags,
                project,
                area,
            } => run_add(
                &client()?,
                AddOptions {
                    name,
                    notes,
                    due,
                    tags,
                    project,
                    area,
                },
                output,
            ),
            Commands::Edit {
                task,
                name,
                notes,
                due,
                tags,
                add_tags,
                project,
                area,
            } => run_edit(
                &client()?,
                EditOptions {
                    task,
                    name,
                    notes,
                    due,
                    tags,
                    add_tags,
                    project,
                    area,
                },
                output,
            ),
            Commands::Complete { task } => run_complete(&client()?, &task, output),
            Commands::Cancel { task } => run_cancel(&client()?, &task, output),
            Commands::Project(cmd) => match cmd {
                ProjectCommands::Create {
                    name,
                    notes,
                    area,
                    deadline,
                } => run_project_create(
                    &client()?,
                    ProjectCreateOptions {
                        name,
                        notes,
                        area,
                        deadline,
                    },
                    output,
                ),
                ProjectCommands::List { area, limit } => {
                    run_project_list(&client()?, ProjectListOptions { area, limit }, output)
                }
            },
            Commands::Area(cmd) => match cmd {
                AreaCommands::Create { name } => run_area_create(&client()?, name, output),
                AreaCommands::List => run_area_list(&client()?, output),
            },
            Commands::Skill(SkillCommands::Install { dest, force }) => run_skill_install(
                SkillInstallOptions {
                    dest: dest.or_else(|| config.skills.dir.clone()),
                    force,
                },
                output,
            ),
        }
    }
}

/// Build a client from config, with CLI flags taking precedence.
fn connect(
    config: &Config,
    app: Option<String>,
    osascript: Option<PathBuf>,
) -> Result<Client<OsascriptTransport>> {
    let app = app.unwrap_or_else(|| config.bridge.app_name.clone());
    if app.trim().is_empty() {
        return Err(Error::Validation("--app cannot be empty".to_string()));
    }
    let program = osascript.unwrap_or_else(|| config.bridge.osascript.clone());
    tracing::debug!(%app, program = %program.display(), probe = config.bridge.probe, "connecting");

    let bridge = Bridge::new(OsascriptTransport::new(program), app).with_probe(config.bridge.probe);
    Ok(Client::new(bridge))
}
