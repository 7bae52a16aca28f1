//! Mock implementations for testing
//!
//! Provides fakes of the host command surface and of the registry so the
//! inspector, settings and reconciler can be exercised without side effects.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use gnome_layout_core::{ExtensionId, ShellVersion};
use gnome_layout_extensions::{
    CommandError, CommandOutput, CommandRunner, DownloadOutcome, ExtensionSource, RegistryError,
};

/// Record of a command invocation
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub input: Option<String>,
}

impl Invocation {
    /// `program arg1 arg2 ...`
    pub fn command_line(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

pub fn ok(stdout: &str) -> CommandOutput {
    CommandOutput {
        stdout: stdout.to_string(),
        stderr: String::new(),
        status: 0,
    }
}

pub fn failed(stderr: &str, status: i32) -> CommandOutput {
    CommandOutput {
        stdout: String::new(),
        stderr: stderr.to_string(),
        status,
    }
}

/// Command runner returning canned responses keyed by command line
pub struct MockRunner {
    responses: Mutex<HashMap<String, CommandOutput>>,
    missing: Mutex<HashSet<String>>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
    default_response: CommandOutput,
}

impl Default for MockRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRunner {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            missing: Mutex::new(HashSet::new()),
            invocations: Arc::new(Mutex::new(Vec::new())),
            default_response: ok(""),
        }
    }

    /// Set a response for a full command line (`program args...`)
    pub fn mock(&self, command_line: &str, output: CommandOutput) {
        self.responses
            .lock()
            .unwrap()
            .insert(command_line.to_string(), output);
    }

    pub fn mock_success(&self, command_line: &str, stdout: &str) {
        self.mock(command_line, ok(stdout));
    }

    pub fn mock_failure(&self, command_line: &str, stderr: &str, status: i32) {
        self.mock(command_line, failed(stderr, status));
    }

    /// Make a program behave as if it were not installed
    pub fn mock_missing_program(&self, program: &str) {
        self.missing.lock().unwrap().insert(program.to_string());
    }

    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.invocations()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    pub fn was_invoked(&self, command_line: &str) -> bool {
        self.command_lines().iter().any(|c| c == command_line)
    }

    fn respond(
        &self,
        program: &str,
        args: &[&str],
        input: Option<&str>,
    ) -> Result<CommandOutput, CommandError> {
        let invocation = Invocation {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            input: input.map(str::to_string),
        };
        let key = invocation.command_line();
        self.invocations.lock().unwrap().push(invocation);

        if self.missing.lock().unwrap().contains(program) {
            return Err(CommandError::NotFound {
                program: program.to_string(),
            });
        }

        Ok(self
            .responses
            .lock()
            .unwrap()
            .get(&key)
            .cloned()
            .unwrap_or_else(|| self.default_response.clone()))
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.respond(program, args, None)
    }

    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &str,
    ) -> Result<CommandOutput, CommandError> {
        self.respond(program, args, Some(input))
    }
}

#[derive(Default)]
struct ShellState {
    enabled: BTreeSet<String>,
    disabled: BTreeSet<String>,
    broken_installs: HashSet<String>,
    broken_toggles: HashSet<String>,
}

/// Stateful stand-in for `gnome-extensions` and `gnome-shell`
///
/// `install --force <archive>` installs the extension named by the archive's
/// file name, which is how the reconciler's cache lays archives out.
pub struct FakeShell {
    state: Mutex<ShellState>,
    invocations: Mutex<Vec<Invocation>>,
    version: String,
}

impl FakeShell {
    pub fn new(enabled: &[&str], disabled: &[&str]) -> Self {
        let state = ShellState {
            enabled: enabled.iter().map(|s| s.to_string()).collect(),
            disabled: disabled.iter().map(|s| s.to_string()).collect(),
            ..ShellState::default()
        };
        Self {
            state: Mutex::new(state),
            invocations: Mutex::new(Vec::new()),
            version: "GNOME Shell 45.2".to_string(),
        }
    }

    /// Make `install` fail for this id
    pub fn break_install(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .broken_installs
            .insert(id.to_string());
    }

    /// Make `enable` and `disable` fail for this id
    pub fn break_toggle(&self, id: &str) {
        self.state
            .lock()
            .unwrap()
            .broken_toggles
            .insert(id.to_string());
    }

    pub fn enabled(&self) -> Vec<String> {
        self.state.lock().unwrap().enabled.iter().cloned().collect()
    }

    pub fn disabled(&self) -> Vec<String> {
        self.state.lock().unwrap().disabled.iter().cloned().collect()
    }

    pub fn command_lines(&self) -> Vec<String> {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .map(Invocation::command_line)
            .collect()
    }

    /// Command lines that changed state (everything except `list` and `--version`)
    pub fn mutations(&self) -> Vec<String> {
        self.command_lines()
            .into_iter()
            .filter(|c| !c.contains(" list") && !c.ends_with("--version"))
            .collect()
    }

    fn handle(&self, program: &str, args: &[&str]) -> CommandOutput {
        let mut state = self.state.lock().unwrap();
        match (program, args) {
            ("gnome-shell", ["--version"]) => ok(&format!("{}\n", self.version)),
            ("gnome-extensions", ["list"]) => ok(&lines(state.enabled.union(&state.disabled))),
            ("gnome-extensions", ["list", "--enabled"]) => ok(&lines(state.enabled.iter())),
            ("gnome-extensions", ["list", "--disabled"]) => ok(&lines(state.disabled.iter())),
            ("gnome-extensions", ["enable", id]) => {
                let id = id.to_string();
                if state.broken_toggles.contains(&id) {
                    return failed("Extension could not be enabled", 2);
                }
                if state.disabled.remove(&id) || state.enabled.contains(&id) {
                    state.enabled.insert(id);
                    ok("")
                } else {
                    failed(&format!("Extension “{id}” does not exist"), 2)
                }
            }
            ("gnome-extensions", ["disable", id]) => {
                let id = id.to_string();
                if state.broken_toggles.contains(&id) {
                    return failed("Extension could not be disabled", 2);
                }
                if state.enabled.remove(&id) || state.disabled.contains(&id) {
                    state.disabled.insert(id);
                    ok("")
                } else {
                    failed(&format!("Extension “{id}” does not exist"), 2)
                }
            }
            ("gnome-extensions", ["install", "--force", archive]) => {
                let id = Path::new(archive)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                if state.broken_installs.contains(&id) {
                    return failed("The extension could not be installed", 1);
                }
                if !state.enabled.contains(&id) {
                    state.disabled.insert(id);
                }
                ok("")
            }
            _ => failed(&format!("unexpected command {program} {}", args.join(" ")), 127),
        }
    }
}

fn lines<'a>(ids: impl Iterator<Item = &'a String>) -> String {
    ids.map(|id| format!("{id}\n")).collect()
}

impl CommandRunner for FakeShell {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, CommandError> {
        self.invocations.lock().unwrap().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(|s| s.to_string()).collect(),
            input: None,
        });
        Ok(self.handle(program, args))
    }

    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        _input: &str,
    ) -> Result<CommandOutput, CommandError> {
        self.run(program, args)
    }
}

/// How the fake registry answers for one extension
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FakeArchive {
    /// Archive downloads fine
    Available,
    /// Search returns nothing
    Unknown,
    /// No build for the shell version
    NoBuild,
    /// Server error while downloading
    ServerError,
}

/// In-memory registry writing small archives into the cache directory
#[derive(Default)]
pub struct FakeSource {
    archives: Mutex<HashMap<String, FakeArchive>>,
    requests: Mutex<Vec<String>>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, id: &str, archive: FakeArchive) -> Self {
        self.archives
            .lock()
            .unwrap()
            .insert(id.to_string(), archive);
        self
    }

    /// Ids the reconciler asked for, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl ExtensionSource for FakeSource {
    fn download_extension(
        &self,
        cache_dir: &Path,
        id: &ExtensionId,
        shell_version: &ShellVersion,
    ) -> Result<DownloadOutcome, RegistryError> {
        self.requests.lock().unwrap().push(id.to_string());

        let target = cache_dir.join(id.as_str());
        if target.exists() {
            return Ok(DownloadOutcome::Cached(target));
        }

        let archive = self
            .archives
            .lock()
            .unwrap()
            .get(id.as_str())
            .copied()
            .unwrap_or(FakeArchive::Unknown);

        match archive {
            FakeArchive::Available => {
                fs::create_dir_all(cache_dir)?;
                fs::write(&target, b"PK\x03\x04")?;
                Ok(DownloadOutcome::Downloaded(target))
            }
            FakeArchive::Unknown => Err(RegistryError::not_found(id.as_str())),
            FakeArchive::NoBuild => Err(RegistryError::link_unavailable(
                id.as_str(),
                shell_version.as_str(),
            )),
            FakeArchive::ServerError => Err(RegistryError::Status {
                status: 500,
                url: format!("http://registry.test/download/{id}"),
            }),
        }
    }
}
