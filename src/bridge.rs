//! Execution bridge to the Things application.
//!
//! Scripts travel through a [`Transport`], which is `osascript` in production
//! and a scripted fake in tests. The bridge probes that Things is running
//! before each script and turns interpreter failures into typed errors.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{Error, Result};
use crate::model::EntityKind;
use crate::protocol::ErrorTag;
use crate::script::ScriptBuilder;

/// Interpreter messages meaning the application cannot be reached.
const NOT_ACCESSIBLE_MARKERS: [&str; 7] = [
    "isn't running",
    "isn’t running",
    "can't get application",
    "can’t get application",
    "application can't be found",
    "application can’t be found",
    "(-600)",
];

/// Failure reported by a transport.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The interpreter could not be started at all.
    #[error("script interpreter unavailable: {0}")]
    Unavailable(String),

    /// The interpreter ran the script and reported an error.
    #[error("{0}")]
    Script(String),
}

/// Capability to run one script and return its textual result.
pub trait Transport {
    fn execute(&self, script: &str) -> std::result::Result<String, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, script: &str) -> std::result::Result<String, TransportError> {
        (**self).execute(script)
    }
}

/// Runs scripts through the `osascript` binary.
#[derive(Debug, Clone)]
pub struct OsascriptTransport {
    program: PathBuf,
}

impl OsascriptTransport {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for OsascriptTransport {
    fn default() -> Self {
        Self::new("osascript")
    }
}

impl Transport for OsascriptTransport {
    fn execute(&self, script: &str) -> std::result::Result<String, TransportError> {
        let output = Command::new(&self.program)
            .arg("-e")
            .arg(script)
            .output()
            .map_err(|err| {
                TransportError::Unavailable(format!("{}: {err}", self.program.display()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TransportError::Script(stderr.trim().to_string()));
        }

        // osascript terminates its result with one line break of its own.
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stdout = stdout.strip_suffix('\n').unwrap_or(&stdout);
        Ok(stdout.to_string())
    }
}

/// Sends scripts to one Things application over a transport.
pub struct Bridge<T> {
    transport: T,
    scripts: ScriptBuilder,
    probe: bool,
}

impl<T: Transport> Bridge<T> {
    pub fn new(transport: T, app: impl Into<String>) -> Self {
        Self {
            transport,
            scripts: ScriptBuilder::new(app),
            probe: true,
        }
    }

    /// Enable or disable the process-existence probe before each script.
    pub fn with_probe(mut self, probe: bool) -> Self {
        self.probe = probe;
        self
    }

    pub fn app(&self) -> &str {
        self.scripts.app()
    }

    pub fn scripts(&self) -> &ScriptBuilder {
        &self.scripts
    }

    /// Check that the application process exists.
    pub fn ensure_accessible(&self) -> Result<()> {
        let reply = self
            .transport
            .execute(&self.scripts.probe())
            .map_err(|err| self.not_accessible(err.to_string()))?;

        if reply.trim().eq_ignore_ascii_case("true") {
            Ok(())
        } else {
            Err(self.not_accessible(format!("{} is not running", self.app())))
        }
    }

    /// Probe (when enabled), then run `script` and return its reply.
    pub fn run(&self, script: &str) -> Result<String> {
        if self.probe {
            self.ensure_accessible()?;
        }

        tracing::debug!(app = %self.app(), bytes = script.len(), "dispatching script");
        match self.transport.execute(script) {
            Ok(reply) => Ok(reply),
            Err(TransportError::Unavailable(reason)) => Err(self.not_accessible(reason)),
            Err(TransportError::Script(message)) => Err(self.classify(message)),
        }
    }

    /// Map an interpreter error message onto the error taxonomy.
    pub fn classify(&self, message: String) -> Error {
        if let Some((tag, name)) = ErrorTag::find(&message) {
            let kind = match tag {
                ErrorTag::ProjectNotFound => EntityKind::Project,
                ErrorTag::AreaNotFound => EntityKind::Area,
            };
            tracing::debug!(%kind, %name, "nested lookup failed");
            return Error::NotFound { kind, name };
        }

        let lowered = message.to_lowercase();
        if NOT_ACCESSIBLE_MARKERS
            .iter()
            .any(|marker| lowered.contains(marker))
        {
            tracing::debug!(%message, "application unreachable");
            return self.not_accessible(message);
        }

        tracing::debug!(%message, "script failed");
        Error::ExecutionFailed(message)
    }

    fn not_accessible(&self, reason: String) -> Error {
        Error::NotAccessible {
            app: self.app().to_string(),
            reason,
        }
    }
}
