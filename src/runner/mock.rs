use std::sync::Mutex;

use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner};

/// Mock runner for testing without executing real commands.
///
/// Records every command line it is handed, in order. Failures can be scripted
/// per command substring; everything else succeeds with empty output.
pub struct MockRunner {
    commands: Mutex<Vec<String>>,
    failures: Mutex<Vec<(String, i32)>>,
}

impl MockRunner {
    /// Create a new mock runner where every command succeeds
    pub fn new() -> Self {
        MockRunner {
            commands: Mutex::new(Vec::new()),
            failures: Mutex::new(Vec::new()),
        }
    }

    /// Make any command containing `pattern` return the given exit code
    pub fn fail_on(&self, pattern: impl Into<String>, exit_code: i32) {
        self.failures
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((pattern.into(), exit_code));
    }

    /// Commands issued so far, in order
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(command.to_string());

        let failures = self.failures.lock().unwrap_or_else(|e| e.into_inner());
        for (pattern, exit_code) in failures.iter() {
            if command.contains(pattern.as_str()) {
                return Ok(CommandOutput {
                    exit_code: *exit_code,
                    output: format!("simulated failure for '{}'", command),
                });
            }
        }

        Ok(CommandOutput {
            exit_code: 0,
            output: String::new(),
        })
    }
}
