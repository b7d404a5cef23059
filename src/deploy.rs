//! Deployment orchestration.
//!
//! Runs the commit/push/deploy-branch command sequence for each release unit.
//! Steps are strictly sequential and fire-and-continue: a failing command is
//! logged and counted but never aborts the steps or units that follow, so a
//! run completes as much of the release as it can. The accumulated error count
//! decides the final process exit status.

use crate::config::Config;
use crate::reconciler::ReleaseUnit;
use crate::runner::CommandRunner;
use crate::template::{self, TemplateVars};
use crate::ui;

/// Aggregate outcome of a deployment run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunResult {
    /// Number of steps that failed across all release units.
    pub error_count: u32,
}

impl RunResult {
    /// True when every step of every unit succeeded.
    pub fn success(&self) -> bool {
        self.error_count == 0
    }
}

/// Sequences the external commands that publish a release.
///
/// Owns no state beyond its collaborators; every side effect goes through the
/// injected [CommandRunner].
pub struct Orchestrator<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
}

impl<'a> Orchestrator<'a> {
    pub fn new(config: &'a Config, runner: &'a dyn CommandRunner) -> Self {
        Orchestrator { config, runner }
    }

    /// Runs the configured steps for every release unit, in order.
    ///
    /// The push and deploy-branch stages are nested under the commit stage:
    /// with `commit` disabled nothing runs at all.
    pub fn run(&self, units: &[ReleaseUnit]) -> RunResult {
        let mut result = RunResult::default();

        if !self.config.commit {
            return result;
        }

        for unit in units {
            let vars = TemplateVars {
                version: &unit.resolved_version,
                orig_version: &unit.origin_version,
            };

            let message = template::expand(&self.config.commit_message, &vars);
            self.commit(unit, &message, &mut result);

            if self.config.push {
                self.push(&mut result);
            }

            if self.config.deploy_branch {
                let branch = template::expand(&self.config.branch_name, &vars);
                self.deploy_branch(&branch, &mut result);
            }
        }

        result
    }

    fn commit(&self, unit: &ReleaseUnit, message: &str, result: &mut RunResult) {
        if self.config.add_all_to_commit {
            ui::display_status("Adding any new files to repository tracking...");
            self.step("git add .", result);
            ui::display_status(&format!("Committing with message: {}", message));
            self.step(&format!("git commit -m \"{}\"", message), result);
        } else {
            ui::display_status(&format!(
                "Committing {} with message: {}",
                unit.file_paths.join(", "),
                message
            ));
            self.step(
                &format!(
                    "git commit -m \"{}\" \"{}\"",
                    message,
                    unit.file_paths.join("\" \"")
                ),
                result,
            );
        }
    }

    fn push(&self, result: &mut RunResult) {
        ui::display_status("Pushing changes to remote");
        self.step("git push", result);
    }

    fn deploy_branch(&self, branch: &str, result: &mut RunResult) {
        // Validated up front, but a missing URL must still never panic here.
        let server_url = match &self.config.deploy_server_url {
            Some(url) => url,
            None => {
                ui::display_error("No deploy_server_url provided; skipping deploy branch.");
                result.error_count += 1;
                return;
            }
        };

        ui::display_status(&format!("Checking out new branch {}", branch));
        self.step(&format!("git checkout -b {}", branch), result);

        ui::display_status(&format!(
            "Building app onto branch and committing {}",
            branch
        ));
        self.step(
            &format!("slc build --onto {} --install --commit", branch),
            result,
        );

        ui::display_status("Pushing branch to remote repository");
        self.step(&format!("git push origin {}", branch), result);

        ui::display_status(&format!("Deploying branch to PM server at: {}", server_url));
        self.step(&format!("slc deploy {} {}", server_url, branch), result);

        ui::display_status(&format!(
            "Returning to {} branch...",
            self.config.primary_branch
        ));
        self.step(
            &format!("git checkout -f {}", self.config.primary_branch),
            result,
        );
    }

    /// Issues one command and records the outcome; never aborts the run.
    fn step(&self, command: &str, result: &mut RunResult) {
        match self.runner.run(command) {
            Ok(output) if output.success() => {}
            Ok(output) => {
                ui::display_error(&format!("Error ({}) {}", output.exit_code, output.output));
                result.error_count += 1;
            }
            Err(e) => {
                ui::display_error(&format!("Failed to run '{}': {}", command, e));
                result.error_count += 1;
            }
        }
    }
}
