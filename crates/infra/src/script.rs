//! Analysis process launcher.

use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use cropsight_jobs::{ScriptCommand, ScriptError, ScriptRunner};

/// Spawns the analysis script as a detached child process.
///
/// The child is handed the executor-built argument list after the script
/// path. It is never waited on: stdout/stderr are discarded and the handle is
/// dropped right after spawn, so its exit status is unobserved.
#[derive(Debug, Clone)]
pub struct TokioScriptRunner {
    interpreter: String,
    script: String,
}

impl TokioScriptRunner {
    pub fn new(interpreter: impl Into<String>, script: impl Into<String>) -> Self {
        Self {
            interpreter: interpreter.into(),
            script: script.into(),
        }
    }
}

impl ScriptRunner for TokioScriptRunner {
    fn spawn_detached(&self, command: ScriptCommand) -> Result<(), ScriptError> {
        debug!(
            interpreter = %self.interpreter,
            script = %self.script,
            args = ?command.args,
            "starting analysis process"
        );

        let child = Command::new(&self.interpreter)
            .arg(&self.script)
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| ScriptError::Spawn(e.to_string()))?;

        info!(pid = child.id(), "analysis process started");
        Ok(())
    }
}
