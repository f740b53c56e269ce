use thingsctl::error::{exit_codes, Error, JsonError};
use thingsctl::model::{Candidate, EntityKind, TaskStatus};

#[test]
fn exit_codes_map_correctly() {
    let user = Error::Validation("bad".to_string());
    assert_eq!(user.exit_code(), exit_codes::USER_ERROR);

    let missing = Error::NotFound {
        kind: EntityKind::Task,
        name: "Foo".to_string(),
    };
    assert_eq!(missing.exit_code(), exit_codes::USER_ERROR);

    let down = Error::NotAccessible {
        app: "Things3".to_string(),
        reason: "not running".to_string(),
    };
    assert_eq!(down.exit_code(), exit_codes::NOT_ACCESSIBLE);

    let failed = Error::ExecutionFailed("boom".to_string());
    assert_eq!(failed.exit_code(), exit_codes::OPERATION_FAILED);

    let other = Error::from(anyhow::anyhow!("disk full"));
    assert_eq!(other.exit_code(), exit_codes::OPERATION_FAILED);
    assert_eq!(other.to_string(), "disk full");
}

#[test]
fn not_accessible_message_tells_user_to_open_things() {
    let err = Error::NotAccessible {
        app: "Things3".to_string(),
        reason: "process not found".to_string(),
    };
    let message = err.to_string();
    assert!(message.contains("Things3 is not accessible"));
    assert!(message.contains("installed and running"));
}

#[test]
fn json_error_carries_kind_code_and_details() {
    let err = Error::AlreadyInTerminalState {
        name: "Ship".to_string(),
        status: TaskStatus::Completed,
    };
    let json = JsonError::from(&err);
    assert!(!json.success);
    assert_eq!(json.kind, "already_in_terminal_state");
    assert_eq!(json.code, exit_codes::USER_ERROR);
    assert!(json.error.contains("already completed"));

    let value = serde_json::to_value(&json).expect("serialize");
    assert_eq!(value["details"]["status"], "completed");
    assert_eq!(value["details"]["name"], "Ship");
}

#[test]
fn ambiguous_details_list_candidates() {
    let err = Error::AmbiguousName {
        name: "Meeting".to_string(),
        candidates: vec![
            Candidate {
                id: "1".to_string(),
                name: "Meeting".to_string(),
                status: TaskStatus::Open,
                project: Some("Q1".to_string()),
                area: None,
            },
            Candidate {
                id: "2".to_string(),
                name: "Meeting".to_string(),
                status: TaskStatus::Completed,
                project: None,
                area: None,
            },
        ],
    };

    let value = serde_json::to_value(JsonError::from(&err)).expect("serialize");
    assert_eq!(value["kind"], "ambiguous_name");
    let candidates = value["details"]["candidates"].as_array().expect("array");
    assert_eq!(candidates.len(), 2);
    assert_eq!(candidates[0]["project"], "Q1");
    assert!(candidates[1].get("project").is_none());

    let lines: Vec<String> = err.to_string().lines().map(str::to_string).collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[2], "  - Meeting [completed] id 2");
}

#[test]
fn errors_without_structure_omit_details() {
    let value = serde_json::to_value(JsonError::from(&Error::ExecutionFailed("x".to_string())))
        .expect("serialize");
    assert!(value.get("details").is_none());
}
