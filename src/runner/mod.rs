//! External command execution abstraction layer
//!
//! Every side-effecting step of a deployment run goes through the
//! [CommandRunner] trait, which executes one shell command and reports its
//! exit code and captured output. The concrete implementations are:
//!
//! - [shell::ShellRunner]: runs the command through `sh -c`, with an optional
//!   dry-run mode that only logs the command line
//! - [mock::MockRunner]: records issued commands and returns scripted exit
//!   codes, for testing the orchestration without touching real processes

pub mod mock;
pub mod shell;

pub use mock::MockRunner;
pub use shell::ShellRunner;

use crate::error::Result;

/// Outcome of one external command invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CommandOutput {
    /// Process exit code; 0 means success.
    pub exit_code: i32,
    /// Captured stdout and stderr, combined.
    pub output: String,
}

impl CommandOutput {
    /// True when the command exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Executes one shell command and reports its outcome.
///
/// Implementations must block until the command has returned; the orchestrator
/// relies on strict ordering of command issuance. A non-zero exit code is a
/// normal [CommandOutput], not an `Err` — errors are reserved for failing to
/// run the command at all.
pub trait CommandRunner: Send + Sync {
    /// Run a single command line to completion.
    ///
    /// # Arguments
    /// * `command` - The full command line, interpreted by the shell
    ///
    /// # Returns
    /// * `Ok(CommandOutput)` - Exit code and captured output
    /// * `Err` - If the command could not be spawned
    fn run(&self, command: &str) -> Result<CommandOutput>;
}
