//! External analysis script seam.

use std::sync::Mutex;

use thiserror::Error;

/// Command-line arguments for one analysis submission.
///
/// The executable itself (interpreter + script path) is owned by the runner;
/// the executor only decides the argument list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptCommand {
    pub args: Vec<String>,
}

#[derive(Debug, Clone, Error)]
pub enum ScriptError {
    #[error("failed to start analysis process: {0}")]
    Spawn(String),
}

/// Starts the analysis process and returns without waiting for it.
///
/// The process is never joined: its exit status, output, and lifetime are
/// unobserved once `spawn_detached` returns.
pub trait ScriptRunner: Send + Sync {
    fn spawn_detached(&self, command: ScriptCommand) -> Result<(), ScriptError>;
}

impl<R: ScriptRunner> ScriptRunner for std::sync::Arc<R> {
    fn spawn_detached(&self, command: ScriptCommand) -> Result<(), ScriptError> {
        (**self).spawn_detached(command)
    }
}

/// Captures submissions instead of spawning a process. Used in tests and
/// dry-run wiring.
#[derive(Debug, Default)]
pub struct RecordingScriptRunner {
    submissions: Mutex<Vec<ScriptCommand>>,
}

impl RecordingScriptRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<ScriptCommand> {
        self.submissions.lock().unwrap().clone()
    }
}

impl ScriptRunner for RecordingScriptRunner {
    fn spawn_detached(&self, command: ScriptCommand) -> Result<(), ScriptError> {
        self.submissions.lock().unwrap().push(command);
        Ok(())
    }
}
