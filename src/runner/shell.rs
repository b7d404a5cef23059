use std::process::Command;

use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner};
use crate::ui;

/// Runs commands through the system shell.
///
/// In dry-run mode no process is spawned; the command line that would have run
/// is logged and reported as a success.
pub struct ShellRunner {
    dry_run: bool,
}

impl ShellRunner {
    pub fn new(dry_run: bool) -> Self {
        ShellRunner { dry_run }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        if self.dry_run {
            ui::display_status(&format!("Not actually running: {}", command));
            return Ok(CommandOutput {
                exit_code: 0,
                output: String::new(),
            });
        }

        let output = Command::new("sh").arg("-c").arg(command).output()?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(CommandOutput {
            // A missing code means the process was killed by a signal.
            exit_code: output.status.code().unwrap_or(-1),
            output: combined,
        })
    }
}
