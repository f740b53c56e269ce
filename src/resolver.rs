//! Name to unique task resolution.
//!
//! Every mutation addressed by name goes through [`resolve_task`]. Zero matches
//! is `NotFound`, several matches is `AmbiguousName`; the first match is never
//! picked silently.

use crate::bridge::{Bridge, Transport};
use crate::error::{Error, Result};
use crate::model::{EntityKind, TaskRef, TaskStatus};
use crate::parser::{parse_reply, Reply};
use crate::script::LookupPurpose;

/// Resolve `name` to exactly one to do, by exact match. Whitespace is
/// significant: `" Plan "` never matches `Plan`.
pub fn resolve_task<T: Transport>(
    bridge: &Bridge<T>,
    name: &str,
    purpose: LookupPurpose,
) -> Result<TaskRef> {
    let script = bridge.scripts().lookup_task(name, purpose)?;
    let reply = bridge.run(&script)?;
    interpret_lookup(name, parse_reply(&reply)?)
}

/// Apply the uniqueness policy to a decoded lookup reply.
pub fn interpret_lookup(name: &str, reply: Reply) -> Result<TaskRef> {
    match reply {
        Reply::Found(id) => Ok(TaskRef {
            id,
            name: name.to_string(),
        }),
        Reply::NotFound(_) => Err(Error::NotFound {
            kind: EntityKind::Task,
            name: name.to_string(),
        }),
        Reply::Multiple(candidates) => Err(Error::AmbiguousName {
            name: name.to_string(),
            candidates,
        }),
        Reply::AlreadyCompleted(existing) => Err(Error::AlreadyInTerminalState {
            name: non_empty_or(existing, name),
            status: TaskStatus::Completed,
        }),
        Reply::AlreadyCanceled(existing) => Err(Error::AlreadyInTerminalState {
            name: non_empty_or(existing, name),
            status: TaskStatus::Canceled,
        }),
        Reply::Completed(_) | Reply::Canceled(_) => Err(Error::ExecutionFailed(format!(
            "lookup for \"{name}\" returned a status change"
        ))),
    }
}

fn non_empty_or(value: String, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value
    }
}
