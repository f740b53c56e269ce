//! Wire vocabulary shared by the script builder and the response parser.
//!
//! Every literal that appears on both sides of the bridge lives here so the
//! two halves cannot drift apart.

/// Terminates one task record in a list reply. Always followed by a line break.
pub const TASK_END: &str = "TASK_END";
/// Terminates one project record in a project list reply.
pub const PROJECT_END: &str = "PROJECT_END";
/// Terminates one area record in an area list reply.
pub const AREA_END: &str = "AREA_END";

/// Separates fields inside a record, and candidates inside a `MULTIPLE:` payload.
pub const FIELD_SEP: &str = "||";
/// Separates fields inside a single `MULTIPLE:` candidate.
pub const CANDIDATE_FIELD_SEP: &str = "|";
/// Separates a field key from its value. Only the first occurrence counts.
pub const KEY_VALUE_SEP: char = ':';

/// Field keys of the record format.
pub mod keys {
    pub const ID: &str = "ID";
    pub const NAME: &str = "NAME";
    pub const STATUS: &str = "STATUS";
    pub const NOTES: &str = "NOTES";
    pub const PROJECT: &str = "PROJECT";
    pub const AREA: &str = "AREA";
    pub const DUE: &str = "DUE";
    pub const TAGS: &str = "TAGS";
    pub const CREATED: &str = "CREATED";
    pub const MODIFIED: &str = "MODIFIED";

    pub const ALL: [&str; 10] = [
        ID, NAME, STATUS, NOTES, PROJECT, AREA, DUE, TAGS, CREATED, MODIFIED,
    ];

    pub fn is_known(key: &str) -> bool {
        ALL.contains(&key)
    }
}

/// Prefix tagging a single-entity reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sentinel {
    NotFound,
    /// Candidates joined by `||`, fields within one by `|`. A task name that
    /// contains `||ID:` is indistinguishable from the next candidate.
    Multiple,
    AlreadyCompleted,
    AlreadyCanceled,
    Completed,
    Canceled,
    Found,
}

impl Sentinel {
    pub const ALL: [Sentinel; 7] = [
        Sentinel::NotFound,
        Sentinel::Multiple,
        Sentinel::AlreadyCompleted,
        Sentinel::AlreadyCanceled,
        Sentinel::Completed,
        Sentinel::Canceled,
        Sentinel::Found,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Sentinel::NotFound => "NOT_FOUND:",
            Sentinel::Multiple => "MULTIPLE:",
            Sentinel::AlreadyCompleted => "ALREADY_COMPLETED:",
            Sentinel::AlreadyCanceled => "ALREADY_CANCELED:",
            Sentinel::Completed => "COMPLETED:",
            Sentinel::Canceled => "CANCELED:",
            Sentinel::Found => "FOUND:",
        }
    }

    /// Split a reply into its sentinel and body.
    pub fn split(reply: &str) -> Option<(Sentinel, &str)> {
        Sentinel::ALL
            .iter()
            .find_map(|sentinel| reply.strip_prefix(sentinel.prefix()).map(|body| (*sentinel, body)))
    }
}

/// Tags raised as AppleScript errors by nested lookups inside mutation scripts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorTag {
    ProjectNotFound,
    AreaNotFound,
}

impl ErrorTag {
    pub const ALL: [ErrorTag; 2] = [ErrorTag::ProjectNotFound, ErrorTag::AreaNotFound];

    pub fn prefix(self) -> &'static str {
        match self {
            ErrorTag::ProjectNotFound => "PROJECT_NOT_FOUND:",
            ErrorTag::AreaNotFound => "AREA_NOT_FOUND:",
        }
    }

    /// Locate a tag inside an interpreter error message and extract the name.
    ///
    /// osascript reports errors as `<location>: execution error: <text> (<code>)`,
    /// so the trailing error number is dropped from the name.
    pub fn find(message: &str) -> Option<(ErrorTag, String)> {
        ErrorTag::ALL.iter().find_map(|tag| {
            let start = message.find(tag.prefix())? + tag.prefix().len();
            let rest = message[start..].trim_end();
            let name = match rest.rfind(" (") {
                Some(pos) if is_error_number(&rest[pos + 2..]) => &rest[..pos],
                _ => rest,
            };
            Some((*tag, name.to_string()))
        })
    }
}

fn is_error_number(text: &str) -> bool {
    text.strip_suffix(')')
        .map(|code| {
            let digits = code.strip_prefix('-').unwrap_or(code);
            !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
        })
        .unwrap_or(false)
}
