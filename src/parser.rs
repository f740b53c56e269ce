//! Decoding of Things bridge replies.
//!
//! Two reply shapes exist:
//! - record lists: `KEY:value||KEY:value...TASK_END\n` repeated
//! - single results: one sentinel-prefixed line such as `FOUND:<id>`
//!
//! List parsing is lenient: malformed records are dropped and unparseable
//! dates are kept verbatim, so one bad record never fails a whole listing.

use crate::date::{normalize_app_date, parse_app_timestamp};
use crate::error::{Error, Result};
use crate::model::{Area, Candidate, Project, Task, TaskStatus};
use crate::protocol::{
    keys, Sentinel, AREA_END, CANDIDATE_FIELD_SEP, FIELD_SEP, KEY_VALUE_SEP, PROJECT_END,
    TASK_END,
};

/// Decoded single-entity reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    NotFound(String),
    Multiple(Vec<Candidate>),
    AlreadyCompleted(String),
    AlreadyCanceled(String),
    Completed(String),
    Canceled(String),
    Found(String),
}

/// Fields of one record in wire order. Keys are always one of [`keys::ALL`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    fields: Vec<(&'static str, String)>,
}

impl RawRecord {
    /// First value for `key`, if present and non-blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.trim().is_empty())
    }

    fn owned(&self, key: &str) -> Option<String> {
        self.get(key).map(|value| value.trim().to_string())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Split a list reply into record bodies.
///
/// A terminator only counts when it ends a line (or the input), so text such
/// as `TASK_ENDING` inside notes stays part of the record. A trailing body
/// without terminator is a partial record and is dropped.
pub fn split_records<'a>(raw: &'a str, terminator: &str) -> Vec<&'a str> {
    let mut records = Vec::new();
    let mut start = 0;
    let mut cursor = 0;

    while let Some(offset) = raw[cursor..].find(terminator) {
        let pos = cursor + offset;
        let after = &raw[pos + terminator.len()..];
        let break_len = if after.starts_with("\r\n") {
            Some(2)
        } else if after.starts_with('\n') {
            Some(1)
        } else if after.trim().is_empty() {
            Some(after.len())
        } else {
            None
        };

        match break_len {
            Some(len) => {
                records.push(&raw[start..pos]);
                start = pos + terminator.len() + len;
                cursor = start;
            }
            None => cursor = pos + terminator.len(),
        }
    }

    let tail = raw[start..].trim();
    if !tail.is_empty() {
        tracing::debug!(tail = %tail, "dropping unterminated record");
    }
    records
}

/// Split one record into key/value fields.
///
/// A segment that does not start with a known key continues the previous
/// field, so values containing the separator survive intact.
pub fn parse_fields(record: &str, separator: &str) -> RawRecord {
    let record = record.trim();
    let segments: Vec<&str> = record.split(separator).collect();
    let last = segments.len().saturating_sub(1);
    let mut fields: Vec<(&'static str, String)> = Vec::new();

    for (idx, segment) in segments.into_iter().enumerate() {
        if let Some((key, value)) = split_key(segment) {
            fields.push((key, value.to_string()));
            continue;
        }
        if segment.is_empty() && idx == last {
            continue;
        }
        match fields.last_mut() {
            Some((_, value)) => {
                value.push_str(separator);
                value.push_str(segment);
            }
            None => tracing::debug!(segment = %segment, "ignoring field without key"),
        }
    }

    RawRecord { fields }
}

fn split_key(segment: &str) -> Option<(&'static str, &str)> {
    let (key, value) = segment.split_once(KEY_VALUE_SEP)?;
    let key = key.trim();
    keys::ALL
        .iter()
        .find(|known| **known == key)
        .map(|known| (*known, value))
}

/// Parse a task list reply. Empty input yields no tasks.
pub fn parse_task_list(raw: &str) -> Vec<Task> {
    split_records(raw, TASK_END)
        .into_iter()
        .filter_map(|record| task_from_record(&parse_fields(record, FIELD_SEP)))
        .collect()
}

/// Parse a project list reply.
pub fn parse_project_list(raw: &str) -> Vec<Project> {
    split_records(raw, PROJECT_END)
        .into_iter()
        .filter_map(|record| {
            let fields = parse_fields(record, FIELD_SEP);
            let (id, name) = identity(&fields)?;
            Some(Project {
                id,
                name,
                status: status_of(&fields),
                notes: fields.get(keys::NOTES).map(str::to_string),
                area: fields.owned(keys::AREA),
                deadline: fields.get(keys::DUE).map(normalize_due),
            })
        })
        .collect()
}

/// Parse an area list reply.
pub fn parse_area_list(raw: &str) -> Vec<Area> {
    split_records(raw, AREA_END)
        .into_iter()
        .filter_map(|record| {
            let (id, name) = identity(&parse_fields(record, FIELD_SEP))?;
            Some(Area { id, name })
        })
        .collect()
}

/// Convert one record into a task; records without `ID` or `NAME` are dropped.
pub fn task_from_record(fields: &RawRecord) -> Option<Task> {
    let (id, name) = identity(fields)?;
    let mut task = Task::new(id, name);
    task.status = status_of(fields);
    task.notes = fields.get(keys::NOTES).map(str::to_string);
    task.project = fields.owned(keys::PROJECT);
    task.area = fields.owned(keys::AREA);
    task.due_date = fields.get(keys::DUE).map(normalize_due);
    task.tags = fields.get(keys::TAGS).map(split_tags).unwrap_or_default();
    task.creation_date = fields.get(keys::CREATED).and_then(parse_app_timestamp);
    task.modification_date = fields.get(keys::MODIFIED).and_then(parse_app_timestamp);
    Some(task)
}

fn identity(fields: &RawRecord) -> Option<(String, String)> {
    match (fields.owned(keys::ID), fields.owned(keys::NAME)) {
        (Some(id), Some(name)) => Some((id, name)),
        _ => {
            tracing::debug!(fields = fields.len(), "dropping record without ID or NAME");
            None
        }
    }
}

fn status_of(fields: &RawRecord) -> TaskStatus {
    match fields.get(keys::STATUS) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            tracing::debug!(status = %raw, "unknown status, treating as open");
            TaskStatus::Open
        }),
        None => TaskStatus::Open,
    }
}

fn normalize_due(raw: &str) -> String {
    normalize_app_date(raw).unwrap_or_else(|| {
        tracing::debug!(due = %raw, "keeping unrecognized date verbatim");
        raw.trim().to_string()
    })
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a single-entity reply: expect a sentinel, dispatch on it, then
/// decode the body.
pub fn parse_reply(raw: &str) -> Result<Reply> {
    let reply = raw.trim();
    if reply.is_empty() {
        return Err(Error::ExecutionFailed("empty reply from Things".to_string()));
    }

    let (sentinel, body) = Sentinel::split(reply).ok_or_else(|| {
        Error::ExecutionFailed(format!("unrecognized reply from Things: {reply}"))
    })?;

    match sentinel {
        Sentinel::NotFound => Ok(Reply::NotFound(body.to_string())),
        Sentinel::Multiple => {
            let candidates = parse_candidates(body);
            if candidates.is_empty() {
                return Err(Error::ExecutionFailed(format!(
                    "malformed {} reply: {body}",
                    Sentinel::Multiple.prefix()
                )));
            }
            Ok(Reply::Multiple(candidates))
        }
        Sentinel::AlreadyCompleted => Ok(Reply::AlreadyCompleted(body.to_string())),
        Sentinel::AlreadyCanceled => Ok(Reply::AlreadyCanceled(body.to_string())),
        Sentinel::Completed => Ok(Reply::Completed(body.to_string())),
        Sentinel::Canceled => Ok(Reply::Canceled(body.to_string())),
        Sentinel::Found => {
            let id = body.trim();
            if id.is_empty() {
                return Err(Error::ExecutionFailed(format!(
                    "{} reply without an id",
                    Sentinel::Found.prefix()
                )));
            }
            Ok(Reply::Found(id.to_string()))
        }
    }
}

/// Decode a `MULTIPLE:` payload into candidates, skipping malformed entries.
///
/// Candidates are joined with `||` and every candidate starts with `ID:`, so
/// a chunk that does not is the rest of a name containing `||` and is glued
/// back onto the previous candidate. A name containing `||ID:` still cannot
/// be told apart from a new candidate; such entries may decode wrongly.
pub fn parse_candidates(body: &str) -> Vec<Candidate> {
    let id_prefix = format!("{}{}", keys::ID, KEY_VALUE_SEP);
    let mut entries: Vec<String> = Vec::new();
    for chunk in body.split(FIELD_SEP) {
        match entries.last_mut() {
            Some(entry) if !chunk.starts_with(&id_prefix) => {
                entry.push_str(FIELD_SEP);
                entry.push_str(chunk);
            }
            _ => entries.push(chunk.to_string()),
        }
    }

    entries
        .iter()
        .map(|entry| entry.trim_end_matches(FIELD_SEP))
        .filter(|entry| !entry.trim().is_empty())
        .filter_map(|entry| {
            let fields = parse_fields(entry, CANDIDATE_FIELD_SEP);
            let Some((id, name)) = identity(&fields) else {
                tracing::debug!(entry = %entry, "dropping malformed candidate");
                return None;
            };
            Some(Candidate {
                id,
                name,
                status: status_of(&fields),
                project: fields.owned(keys::PROJECT),
                area: fields.owned(keys::AREA),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_record_round_trips() {
        let tasks = parse_task_list("ID:1||NAME:X||STATUS:openTASK_END\n");
        assert_eq!(tasks, vec![Task::new("1", "X")]);
        assert!(tasks[0].tags.is_empty());
        assert!(tasks[0].notes.is_none());
        assert!(tasks[0].due_date.is_none());
    }

    #[test]
    fn records_missing_id_or_name_are_dropped() {
        let raw = "ID:1||NAME:A||STATUS:openTASK_END\n\
                   NAME:No id||STATUS:openTASK_END\n\
                   ID:3||NAME:C||STATUS:completedTASK_END\n\
                   ID:4||STATUS:openTASK_END\n";
        let tasks = parse_task_list(raw);
        let ids: Vec<&str> = tasks.iter().map(|task| task.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(tasks[1].status, TaskStatus::Completed);
    }

    #[test]
    fn blank_reply_is_empty_list() {
        assert!(parse_task_list("").is_empty());
        assert!(parse_task_list("  \n\t ").is_empty());
    }

    #[test]
    fn parses_all_fields() {
        let raw = "ID:abc||NAME:Write report||STATUS:open||NOTES:draft first||PROJECT:Q1 \
                   ||DUE:Friday, March 14, 2025 at 12:00:00 AM||TAGS:work, urgent ,||\
                   CREATED:2025-03-01T08:00:00||MODIFIED:2025-03-02T09:15:00TASK_END\r\n";
        let tasks = parse_task_list(raw);
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.notes.as_deref(), Some("draft first"));
        assert_eq!(task.project.as_deref(), Some("Q1"));
        assert_eq!(task.area, None);
        assert_eq!(task.due_date.as_deref(), Some("2025-03-14"));
        assert_eq!(task.tags, vec!["work".to_string(), "urgent".to_string()]);
        assert!(task.creation_date.is_some());
        assert!(task.modification_date.is_some());
    }

    #[test]
    fn unparseable_due_date_is_kept_verbatim() {
        let tasks = parse_task_list("ID:1||NAME:X||DUE:quelque jourTASK_END\n");
        assert_eq!(tasks[0].due_date.as_deref(), Some("quelque jour"));
    }

    #[test]
    fn separators_inside_values_survive() {
        let raw = "ID:1||NAME:X||NOTES:a||b: not a key||PROJECT:PTASK_END\n\
                   ID:2||NAME:Y TASK_ENDING soon||STATUS:openTASK_END\n";
        let tasks = parse_task_list(raw);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].notes.as_deref(), Some("a||b: not a key"));
        assert_eq!(tasks[0].project.as_deref(), Some("P"));
        assert_eq!(tasks[1].name, "Y TASK_ENDING soon");
    }

    #[test]
    fn multiline_notes_stay_in_record() {
        let raw = "ID:1||NAME:X||NOTES:line one\nline twoTASK_END\nID:2||NAME:YTASK_END\n";
        let tasks = parse_task_list(raw);
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].notes.as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn unterminated_tail_is_dropped() {
        let tasks = parse_task_list("ID:1||NAME:XTASK_END\nID:2||NAME:Y");
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn parses_projects_and_areas() {
        let projects = parse_project_list(
            "ID:p1||NAME:Launch||STATUS:open||AREA:Work||DUE:2025-12-01PROJECT_END\n",
        );
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].area.as_deref(), Some("Work"));
        assert_eq!(projects[0].deadline.as_deref(), Some("2025-12-01"));

        let areas = parse_area_list("ID:a1||NAME:WorkAREA_END\nID:a2||NAME:HomeAREA_END\n");
        assert_eq!(areas.len(), 2);
        assert_eq!(areas[1].name, "Home");
    }

    #[test]
    fn reply_sentinels_dispatch() {
        assert_eq!(parse_reply("FOUND:abc\n").unwrap(), Reply::Found("abc".to_string()));
        assert_eq!(
            parse_reply("NOT_FOUND:Foo").unwrap(),
            Reply::NotFound("Foo".to_string())
        );
        assert_eq!(
            parse_reply("ALREADY_CANCELED:Foo").unwrap(),
            Reply::AlreadyCanceled("Foo".to_string())
        );
        assert_eq!(
            parse_reply("COMPLETED:Foo").unwrap(),
            Reply::Completed("Foo".to_string())
        );
    }

    #[test]
    fn candidate_names_may_contain_the_separator() {
        let candidates =
            parse_candidates("ID:1|NAME:A||B|STATUS:completed||ID:2|NAME:A||B|STATUS:open|AREA:Home||");
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].name, "A||B");
        assert_eq!(candidates[0].status, TaskStatus::Completed);
        assert_eq!(candidates[1].name, "A||B");
        assert_eq!(candidates[1].area.as_deref(), Some("Home"));
    }

    #[test]
    fn multiple_reply_lists_candidates() {
        let reply = parse_reply(
            "MULTIPLE:ID:1|NAME:Meeting|STATUS:open|PROJECT:Q1||ID:2|NAME:Meeting|STATUS:open|AREA:Work||",
        )
        .unwrap();
        let Reply::Multiple(candidates) = reply else {
            panic!("expected multiple");
        };
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].project.as_deref(), Some("Q1"));
        assert_eq!(candidates[0].area, None);
        assert_eq!(candidates[1].area.as_deref(), Some("Work"));
    }

    #[test]
    fn unknown_or_empty_reply_is_an_error() {
        assert!(matches!(parse_reply("hello"), Err(Error::ExecutionFailed(_))));
        assert!(matches!(parse_reply("   "), Err(Error::ExecutionFailed(_))));
        assert!(matches!(parse_reply("FOUND:"), Err(Error::ExecutionFailed(_))));
        assert!(matches!(parse_reply("MULTIPLE:||"), Err(Error::ExecutionFailed(_))));
    }
}
