//! thingsctl - command-line control for the Things task manager
//!
//! This library drives Things through its AppleScript dictionary: it builds
//! scripts, runs them through `osascript`, and decodes the sentinel-delimited
//! replies into typed records.
//!
//! # Core Concepts
//!
//! - **Scripts**: generated AppleScript with escaped literals, one per operation
//! - **Replies**: `||`-separated `key:value` records ended by `TASK_END`,
//!   or a single sentinel such as `FOUND:<id>` or `MULTIPLE:<candidates>`
//! - **Resolution**: task names become ids through an exact, case-sensitive
//!   lookup; duplicates are reported, never guessed
//! - **Bridge**: a probe that Things is running, then the script itself,
//!   with interpreter failures mapped onto [`Error`]
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `client`: One method per operation, wiring the pieces below
//! - `script`: AppleScript generation and string escaping
//! - `parser`: Record and sentinel decoding
//! - `protocol`: Wire constants shared by scripts and parser
//! - `resolver`: Name to id resolution
//! - `bridge`: Transport trait, `osascript` transport, error classification
//! - `filter`: Client-side filtering of listed tasks and projects
//! - `model`: Tasks, projects, areas and request types
//! - `date`: `YYYY-MM-DD` validation and date normalization
//! - `config`: Configuration loading from `config.toml`
//! - `output`: JSON envelopes and human rendering
//! - `skills`: Installer for the bundled agent skill
//! - `error`: Error types and result aliases

pub mod bridge;
pub mod cli;
pub mod client;
pub mod config;
pub mod date;
pub mod error;
pub mod filter;
pub mod model;
pub mod output;
pub mod parser;
pub mod protocol;
pub mod resolver;
pub mod script;
pub mod skills;

pub use error::{Error, Result};
