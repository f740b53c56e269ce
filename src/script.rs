//! AppleScript generation for every bridge operation.
//!
//! Builders validate their request before producing any text, so a rejected
//! request never reaches the bridge. Every user-supplied string is passed
//! through [`escape`] and emitted as a quoted literal.

use std::fmt;
use std::str::FromStr;

use chrono::Datelike;

use crate::date::validate_date;
use crate::error::{Error, Result};
use crate::model::{Container, NewArea, NewProject, NewTask, TaskEdit};
use crate::protocol::{
    keys, ErrorTag, Sentinel, AREA_END, CANDIDATE_FIELD_SEP, FIELD_SEP, PROJECT_END, TASK_END,
};

/// Escape a string for embedding inside an AppleScript string literal.
///
/// Backslashes go first so the escapes added for quotes and line breaks are
/// not escaped a second time.
pub fn escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
}

fn quote(value: &str) -> String {
    format!("\"{}\"", escape(value))
}

/// Which to dos a list operation reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListSource {
    #[default]
    All,
    Today,
    Upcoming,
    Anytime,
    Someday,
}

impl ListSource {
    /// Name of the built-in Things list, if any.
    pub fn list_name(self) -> Option<&'static str> {
        match self {
            ListSource::All => None,
            ListSource::Today => Some("Today"),
            ListSource::Upcoming => Some("Upcoming"),
            ListSource::Anytime => Some("Anytime"),
            ListSource::Someday => Some("Someday"),
        }
    }

    fn expression(self) -> String {
        match self.list_name() {
            Some(name) => format!("to dos of list {}", quote(name)),
            None => "to dos".to_string(),
        }
    }
}

impl fmt::Display for ListSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.list_name().unwrap_or("All"))
    }
}

impl FromStr for ListSource {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" => Ok(ListSource::Today),
            "upcoming" => Ok(ListSource::Upcoming),
            "anytime" => Ok(ListSource::Anytime),
            "someday" => Ok(ListSource::Someday),
            _ => Err(Error::Validation(format!(
                "unknown list '{s}': must be today, upcoming, anytime, or someday"
            ))),
        }
    }
}

/// Why a task is being looked up. Completing and canceling refuse tasks
/// that already reached a terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupPurpose {
    Edit,
    Complete,
    Cancel,
}

impl LookupPurpose {
    fn guards_terminal_status(self) -> bool {
        !matches!(self, LookupPurpose::Edit)
    }
}

/// Indented line accumulator for generated scripts.
struct ScriptWriter {
    lines: Vec<String>,
    depth: usize,
}

impl ScriptWriter {
    fn new() -> Self {
        Self {
            lines: Vec::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.lines
            .push(format!("{}{}", "    ".repeat(self.depth), text.as_ref()));
        self
    }

    fn open(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.line(text);
        self.depth += 1;
        self
    }

    fn close(&mut self, text: impl AsRef<str>) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self.line(text)
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Builds scripts addressed to one Things application.
#[derive(Debug, Clone)]
pub struct ScriptBuilder {
    app: String,
}

impl ScriptBuilder {
    pub fn new(app: impl Into<String>) -> Self {
        Self { app: app.into() }
    }

    pub fn app(&self) -> &str {
        &self.app
    }

    /// Process-existence check, answered with `true` or `false`.
    pub fn probe(&self) -> String {
        format!(
            "tell application \"System Events\" to return (name of processes) contains {}",
            quote(&self.app)
        )
    }

    pub fn list_tasks(&self, source: ListSource) -> String {
        let mut w = self.begin();
        w.line("set output to \"\"");
        w.open(format!("repeat with t in ({})", source.expression()));
        w.line(format!(
            "set rec to {} & (id of t) & {} & (name of t) & {} & ((status of t) as string)",
            first_field(keys::ID),
            field(keys::NAME),
            field(keys::STATUS)
        ));
        w.line("set taskNotes to notes of t");
        w.line(format!(
            "if taskNotes is not \"\" then set rec to rec & {} & taskNotes",
            field(keys::NOTES)
        ));
        w.line("set taskProject to project of t");
        w.line(format!(
            "if taskProject is not missing value then set rec to rec & {} & (name of taskProject)",
            field(keys::PROJECT)
        ));
        w.line("set taskArea to area of t");
        w.line(format!(
            "if taskArea is not missing value then set rec to rec & {} & (name of taskArea)",
            field(keys::AREA)
        ));
        w.line("set taskDue to due date of t");
        w.line(format!(
            "if taskDue is not missing value then set rec to rec & {} & (taskDue as string)",
            field(keys::DUE)
        ));
        w.line("set taskTags to tag names of t");
        w.line(format!(
            "if taskTags is not \"\" then set rec to rec & {} & taskTags",
            field(keys::TAGS)
        ));
        w.line("set taskCreated to creation date of t");
        w.line(format!(
            "if taskCreated is not missing value then set rec to rec & {} & (taskCreated as «class isot» as string)",
            field(keys::CREATED)
        ));
        w.line("set taskModified to modification date of t");
        w.line(format!(
            "if taskModified is not missing value then set rec to rec & {} & (taskModified as «class isot» as string)",
            field(keys::MODIFIED)
        ));
        w.line(format!(
            "set output to output & rec & {} & linefeed",
            quote(TASK_END)
        ));
        w.close("end repeat");
        w.line("return output");
        self.end(w)
    }

    pub fn list_projects(&self) -> String {
        let mut w = self.begin();
        w.line("set output to \"\"");
        w.open("repeat with p in projects");
        w.line(format!(
            "set rec to {} & (id of p) & {} & (name of p) & {} & ((status of p) as string)",
            first_field(keys::ID),
            field(keys::NAME),
            field(keys::STATUS)
        ));
        w.line("set projectNotes to notes of p");
        w.line(format!(
            "if projectNotes is not \"\" then set rec to rec & {} & projectNotes",
            field(keys::NOTES)
        ));
        w.line("set projectArea to area of p");
        w.line(format!(
            "if projectArea is not missing value then set rec to rec & {} & (name of projectArea)",
            field(keys::AREA)
        ));
        w.line("set projectDue to due date of p");
        w.line(format!(
            "if projectDue is not missing value then set rec to rec & {} & (projectDue as string)",
            field(keys::DUE)
        ));
        w.line(format!(
            "set output to output & rec & {} & linefeed",
            quote(PROJECT_END)
        ));
        w.close("end repeat");
        w.line("return output");
        self.end(w)
    }

    pub fn list_areas(&self) -> String {
        let mut w = self.begin();
        w.line("set output to \"\"");
        w.open("repeat with a in areas");
        w.line(format!(
            "set output to output & {} & (id of a) & {} & (name of a) & {} & linefeed",
            first_field(keys::ID),
            field(keys::NAME),
            quote(AREA_END)
        ));
        w.close("end repeat");
        w.line("return output");
        self.end(w)
    }

    /// Exact, case-sensitive lookup of a to do by name.
    ///
    /// Replies `NOT_FOUND:<name>`, `MULTIPLE:<candidates>` or `FOUND:<id>`;
    /// for complete/cancel a single terminal match replies
    /// `ALREADY_COMPLETED:<name>` or `ALREADY_CANCELED:<name>` instead.
    pub fn lookup_task(&self, name: &str, purpose: LookupPurpose) -> Result<String> {
        let name = existing_name("task name", name)?;
        let literal = quote(name);

        let mut w = self.begin();
        w.line("set exactMatches to {}");
        w.open(format!("repeat with t in (to dos whose name is {literal})"));
        w.open("considering case");
        w.line(format!(
            "if (name of t) is {literal} then set end of exactMatches to contents of t"
        ));
        w.close("end considering");
        w.close("end repeat");
        w.line("set matchCount to count of exactMatches");
        w.line(format!(
            "if matchCount is 0 then return {} & {literal}",
            quote(Sentinel::NotFound.prefix())
        ));
        w.open("if matchCount is greater than 1 then");
        w.line(format!(
            "set output to {}",
            quote(Sentinel::Multiple.prefix())
        ));
        w.open("repeat with t in exactMatches");
        w.line(format!(
            "set candidate to {} & (id of t) & {} & (name of t) & {} & ((status of t) as string)",
            first_field(keys::ID),
            candidate_field(keys::NAME),
            candidate_field(keys::STATUS)
        ));
        w.line(format!(
            "if project of t is not missing value then set candidate to candidate & {} & (name of project of t)",
            candidate_field(keys::PROJECT)
        ));
        w.line(format!(
            "if area of t is not missing value then set candidate to candidate & {} & (name of area of t)",
            candidate_field(keys::AREA)
        ));
        w.line(format!("set output to output & candidate & {}", quote(FIELD_SEP)));
        w.close("end repeat");
        w.line("return output");
        w.close("end if");
        w.line("set t to item 1 of exactMatches");
        if purpose.guards_terminal_status() {
            push_terminal_guard(&mut w);
        }
        w.line(format!(
            "return {} & (id of t)",
            quote(Sentinel::Found.prefix())
        ));
        Ok(self.end(w))
    }

    /// Create a to do. Replies with the new id.
    pub fn add_task(&self, request: &NewTask) -> Result<String> {
        let name = created_name("task name", &request.name)?;
        let due = request
            .due
            .as_deref()
            .map(|value| validate_date("due date", value))
            .transpose()?;
        let tags = normalize_tags(&request.tags)?;
        if let Some(container) = request.container.as_ref() {
            existing_name("container name", container.name())?;
        }

        let mut w = self.begin();
        if let Some(container) = request.container.as_ref() {
            push_container_lookup(&mut w, container);
        }
        w.line(format!(
            "set newTodo to make new to do with properties {{name:{}}}",
            quote(name)
        ));
        if let Some(notes) = request.notes.as_deref() {
            w.line(format!("set notes of newTodo to {}", quote(notes)));
        }
        if let Some(due) = due {
            push_date(&mut w, "dueDate", due);
            w.line("set due date of newTodo to dueDate");
        }
        if !tags.is_empty() {
            push_tag_lookups(&mut w, &tags);
            w.line(format!(
                "set tag names of newTodo to {}",
                quote(&tags.join(", "))
            ));
        }
        if let Some(container) = request.container.as_ref() {
            push_container_assignment(&mut w, "newTodo", container);
        }
        w.line("return id of newTodo");
        Ok(self.end(w))
    }

    /// Update a to do addressed by id. Replies with its (possibly new) name.
    pub fn edit_task(&self, id: &str, edit: &TaskEdit) -> Result<String> {
        let CheckedEdit {
            new_name,
            due,
            tags,
            add_tags,
        } = CheckedEdit::from_edit(edit)?;

        let mut w = self.begin();
        w.line(format!("set t to to do id {}", quote(id)));
        if let Some(container) = edit.container.as_ref() {
            push_container_lookup(&mut w, container);
        }
        if let Some(new_name) = new_name {
            w.line(format!("set name of t to {}", quote(new_name)));
        }
        if let Some(notes) = edit.notes.as_deref() {
            w.line(format!("set notes of t to {}", quote(notes)));
        }
        if let Some(due) = due {
            push_date(&mut w, "dueDate", due);
            w.line("set due date of t to dueDate");
        }
        if let Some(tags) = tags.as_ref() {
            push_tag_lookups(&mut w, tags);
            w.line(format!("set tag names of t to {}", quote(&tags.join(", "))));
        }
        if let Some(add_tags) = add_tags.as_ref().filter(|tags| !tags.is_empty()) {
            push_tag_lookups(&mut w, add_tags);
            let joined = quote(&add_tags.join(", "));
            w.line("set existingTags to tag names of t");
            w.open("if existingTags is \"\" then");
            w.line(format!("set tag names of t to {joined}"));
            w.close("else");
            w.depth += 1;
            w.line(format!("set tag names of t to existingTags & \", \" & {joined}"));
            w.close("end if");
        }
        if let Some(container) = edit.container.as_ref() {
            push_container_assignment(&mut w, "t", container);
        }
        w.line("return name of t");
        Ok(self.end(w))
    }

    pub fn complete_task(&self, id: &str) -> String {
        self.set_status(id, "completed", Sentinel::Completed)
    }

    pub fn cancel_task(&self, id: &str) -> String {
        self.set_status(id, "canceled", Sentinel::Canceled)
    }

    fn set_status(&self, id: &str, status: &str, done: Sentinel) -> String {
        let mut w = self.begin();
        w.line(format!("set t to to do id {}", quote(id)));
        push_terminal_guard(&mut w);
        w.line(format!("set status of t to {status}"));
        w.line(format!("return {} & (name of t)", quote(done.prefix())));
        self.end(w)
    }

    /// Create a project. Replies with the new id.
    pub fn create_project(&self, request: &NewProject) -> Result<String> {
        let name = created_name("project name", &request.name)?;
        let deadline = request
            .deadline
            .as_deref()
            .map(|value| validate_date("deadline", value))
            .transpose()?;
        let area = request
            .area
            .as_deref()
            .map(|area| existing_name("area name", area).map(|area| Container::Area(area.to_string())))
            .transpose()?;

        let mut w = self.begin();
        if let Some(area) = area.as_ref() {
            push_container_lookup(&mut w, area);
        }
        w.line(format!(
            "set newProject to make new project with properties {{name:{}}}",
            quote(name)
        ));
        if let Some(notes) = request.notes.as_deref() {
            w.line(format!("set notes of newProject to {}", quote(notes)));
        }
        if let Some(deadline) = deadline {
            push_date(&mut w, "deadlineDate", deadline);
            w.line("set due date of newProject to deadlineDate");
        }
        if area.is_some() {
            w.line("set area of newProject to targetArea");
        }
        w.line("return id of newProject");
        Ok(self.end(w))
    }

    /// Create an area. Replies with the new id.
    pub fn create_area(&self, request: &NewArea) -> Result<String> {
        let name = created_name("area name", &request.name)?;
        let mut w = self.begin();
        w.line(format!(
            "set newArea to make new area with properties {{name:{}}}",
            quote(name)
        ));
        w.line("return id of newArea");
        Ok(self.end(w))
    }

    fn begin(&self) -> ScriptWriter {
        let mut w = ScriptWriter::new();
        w.open(format!("tell application {}", quote(&self.app)));
        w
    }

    fn end(&self, mut w: ScriptWriter) -> String {
        w.close("end tell");
        w.finish()
    }
}

/// Check every field of an edit without building a script.
///
/// Refuses an edit that changes nothing, a blank new name or container, a
/// malformed due date, and tags containing a comma.
pub fn validate_edit(edit: &TaskEdit) -> Result<()> {
    CheckedEdit::from_edit(edit).map(|_| ())
}

/// Edit fields after validation, in the form the script needs.
struct CheckedEdit<'a> {
    new_name: Option<&'a str>,
    due: Option<chrono::NaiveDate>,
    tags: Option<Vec<String>>,
    add_tags: Option<Vec<String>>,
}

impl<'a> CheckedEdit<'a> {
    fn from_edit(edit: &'a TaskEdit) -> Result<Self> {
        if edit.is_empty() {
            return Err(Error::Validation(
                "nothing to update: pass at least one of --name, --notes, --due, --tags, --add-tags, --project, --area"
                    .to_string(),
            ));
        }
        let new_name = edit
            .name
            .as_deref()
            .map(|value| created_name("new task name", value))
            .transpose()?;
        let due = edit
            .due
            .as_deref()
            .map(|value| validate_date("due date", value))
            .transpose()?;
        let tags = edit.tags.as_ref().map(|tags| normalize_tags(tags)).transpose()?;
        let add_tags = edit
            .add_tags
            .as_ref()
            .map(|tags| normalize_tags(tags))
            .transpose()?;
        if let Some(container) = edit.container.as_ref() {
            existing_name("container name", container.name())?;
        }
        Ok(Self {
            new_name,
            due,
            tags,
            add_tags,
        })
    }
}

fn first_field(key: &str) -> String {
    quote(&format!("{key}:"))
}

fn field(key: &str) -> String {
    quote(&format!("{FIELD_SEP}{key}:"))
}

fn candidate_field(key: &str) -> String {
    quote(&format!("{CANDIDATE_FIELD_SEP}{key}:"))
}

/// A name for something being created. Surrounding whitespace is dropped.
fn created_name<'a>(label: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{label} cannot be empty")));
    }
    Ok(trimmed)
}

/// A name that must match an existing item exactly, whitespace included.
fn existing_name<'a>(label: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::Validation(format!("{label} cannot be empty")));
    }
    Ok(value)
}

fn normalize_tags(tags: &[String]) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.trim();
        if tag.is_empty() {
            continue;
        }
        if tag.contains(',') {
            return Err(Error::Validation(format!(
                "tag '{tag}' cannot contain a comma"
            )));
        }
        if !normalized.iter().any(|existing| existing == tag) {
            normalized.push(tag.to_string());
        }
    }
    Ok(normalized)
}

fn push_terminal_guard(w: &mut ScriptWriter) {
    w.line(format!(
        "if status of t is completed then return {} & (name of t)",
        quote(Sentinel::AlreadyCompleted.prefix())
    ));
    w.line(format!(
        "if status of t is canceled then return {} & (name of t)",
        quote(Sentinel::AlreadyCanceled.prefix())
    ));
}

/// Builds a date without going through locale-dependent text coercion.
fn push_date(w: &mut ScriptWriter, var: &str, date: chrono::NaiveDate) {
    w.line(format!("set {var} to current date"));
    w.line(format!("set time of {var} to 0"));
    // Day first, so moving between months never overflows (Jan 31 -> Feb).
    w.line(format!("set day of {var} to 1"));
    w.line(format!("set year of {var} to {}", date.year()));
    w.line(format!("set month of {var} to {}", date.month()));
    w.line(format!("set day of {var} to {}", date.day()));
}

fn push_tag_lookups(w: &mut ScriptWriter, tags: &[String]) {
    for tag in tags {
        let literal = quote(tag);
        w.line(format!(
            "if not (exists tag {literal}) then make new tag with properties {{name:{literal}}}"
        ));
    }
}

/// Resolves the container into `targetProject`/`targetArea`, raising a tagged
/// error when it does not exist.
fn push_container_lookup(w: &mut ScriptWriter, container: &Container) {
    let (var, class, tag) = match container {
        Container::Project(_) => ("targetProject", "project", ErrorTag::ProjectNotFound),
        Container::Area(_) => ("targetArea", "area", ErrorTag::AreaNotFound),
    };
    let literal = quote(container.name());
    w.open("try");
    w.line(format!("set {var} to {class} {literal}"));
    w.close("on error");
    w.depth += 1;
    w.line(format!("error {} & {literal}", quote(tag.prefix())));
    w.close("end try");
}

fn push_container_assignment(w: &mut ScriptWriter, target: &str, container: &Container) {
    match container {
        Container::Project(_) => {
            w.line(format!(
                "if area of {target} is not missing value then set area of {target} to missing value"
            ));
            w.line(format!("set project of {target} to targetProject"));
        }
        Container::Area(_) => {
            w.line(format!(
                "if project of {target} is not missing value then set project of {target} to missing value"
            ));
            w.line(format!("set area of {target} to targetArea"));
        }
    }
}
