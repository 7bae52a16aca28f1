//! External process execution
//!
//! Everything the tool does to the host goes through [`CommandRunner`] so the
//! inspector and settings code can be driven by a recording fake in tests.

use std::time::Duration;

use tracing::{debug, trace};

use crate::error::CommandError;

/// Captured result of a finished process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `-1` when the process was ended by a signal
    pub status: i32,
}

impl CommandOutput {
    /// Success is decided by exit status alone
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// Turn a failure status into [`CommandError::Failed`]
    pub fn check(self, program: &str) -> Result<Self, CommandError> {
        if self.success() {
            Ok(self)
        } else {
            Err(CommandError::failed(program, self.status, &self.stderr))
        }
    }
}

/// Capability to run host programs
pub trait CommandRunner {
    /// Run a program to completion, capturing stdout and stderr
    ///
    /// A failure exit status is not an error here; callers decide with
    /// [`CommandOutput::success`] or [`CommandOutput::check`].
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError>;

    /// Same as [`CommandRunner::run`] with `input` written to stdin
    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<CommandOutput, CommandError>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        (**self).run(program, args)
    }

    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<CommandOutput, CommandError> {
        (**self).run_with_input(program, args, input)
    }
}

/// Runs real processes through `duct`
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    timeout: Option<Duration>,
}

impl SystemCommandRunner {
    /// Create a runner killing processes that outlive `timeout`
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }

    /// Create a runner from a timeout in seconds; `0` disables the timeout
    pub fn with_timeout_secs(secs: u64) -> Self {
        if secs == 0 {
            Self::default()
        } else {
            Self::new(Duration::from_secs(secs))
        }
    }

    fn execute(
        &self,
        program: &str,
        args: &[&str],
        input: Option<&str>,
    ) -> Result<CommandOutput, CommandError> {
        which::which(program).map_err(|_| CommandError::NotFound {
            program: program.to_string(),
        })?;

        debug!("Running: {} {}", program, args.join(" "));

        let mut expression = duct::cmd(program, args.iter().copied())
            .stdout_capture()
            .stderr_capture()
            .unchecked();
        if let Some(input) = input {
            expression = expression.stdin_bytes(input.as_bytes().to_vec());
        }

        let spawn_error = |source: std::io::Error| CommandError::Spawn {
            program: program.to_string(),
            source,
        };

        let handle = expression.start().map_err(spawn_error)?;

        if let Some(timeout) = self.timeout {
            if handle.wait_timeout(timeout).map_err(spawn_error)?.is_none() {
                if let Err(e) = handle.kill() {
                    debug!("Failed to kill {}: {}", program, e);
                }
                return Err(CommandError::Timeout {
                    program: program.to_string(),
                    seconds: timeout.as_secs(),
                });
            }
        }

        let output = handle.into_output().map_err(spawn_error)?;
        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code().unwrap_or(-1),
        };

        trace!("{} exited with {}", program, result.status);
        if !result.stderr.trim().is_empty() {
            debug!("{} stderr: {}", program, result.stderr.trim());
        }

        Ok(result)
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.execute(program, args, None)
    }

    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<CommandOutput, CommandError> {
        self.execute(program, args, Some(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_maps_failure_status() {
        let output = CommandOutput {
            stdout: String::new(),
            stderr: "  Extension “x” does not exist\n".to_string(),
            status: 2,
        };
        match output.check("gnome-extensions") {
            Err(CommandError::Failed { status, stderr, .. }) => {
                assert_eq!(status, 2);
                assert_eq!(stderr, "Extension “x” does not exist");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_missing_program() {
        let runner = SystemCommandRunner::default();
        let err = runner
            .run("gnome-layout-definitely-not-installed", &[])
            .unwrap_err();
        assert!(matches!(err, CommandError::NotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_output_and_status() {
        let runner = SystemCommandRunner::with_timeout_secs(10);
        let output = runner.run("sh", &["-c", "echo out; echo err >&2; exit 3"]).unwrap();
        assert_eq!(output.stdout.trim(), "out");
        assert_eq!(output.stderr.trim(), "err");
        assert_eq!(output.status, 3);
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[test]
    fn test_stdin_is_forwarded() {
        let runner = SystemCommandRunner::with_timeout_secs(10);
        let output = runner.run_with_input("cat", &[], "[/]\nk=v\n").unwrap();
        assert_eq!(output.stdout, "[/]\nk=v\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_timeout_kills_process() {
        let runner = SystemCommandRunner::new(Duration::from_millis(200));
        let started = std::time::Instant::now();
        let err = runner.run("sleep", &["5"]).unwrap_err();
        assert!(matches!(err, CommandError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[cfg(unix)]
    #[test]
    fn test_quick_process_within_timeout() {
        let runner = SystemCommandRunner::new(Duration::from_secs(5));
        let started = std::time::Instant::now();
        let output = runner.run("sh", &["-c", "echo done"]).unwrap();
        assert_eq!(output.stdout.trim(), "done");
        assert!(output.success());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[cfg(unix)]
    #[test]
    fn test_no_timeout_waits_for_exit() {
        let runner = SystemCommandRunner::with_timeout_secs(0);
        let output = runner.run("sh", &["-c", "sleep 0.1; exit 4"]).unwrap();
        assert_eq!(output.status, 4);
    }
}
