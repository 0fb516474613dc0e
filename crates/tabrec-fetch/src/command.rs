//! Fallback producer: an external command printing messages as JSON.
//!
//! The command writes a JSON array of records (`id`, `collector`, `severity`,
//! `summary`, `dataset`, `createdAt`, `metadata`) to stdout. Blank output
//! means no messages.

use std::collections::BTreeMap;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tabrec_model::DomainRecord;
use tracing::{debug, error};

use crate::config::FallbackConfig;
use crate::error::{FetchError, Result};
use crate::source::MessageSource;

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone)]
pub struct CommandSource {
    program: PathBuf,
    args: Vec<String>,
    env: BTreeMap<String, String>,
    timeout: Duration,
}

impl CommandSource {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: BTreeMap::new(),
            timeout: Duration::from_secs(crate::config::DEFAULT_FALLBACK_TIMEOUT_SECS),
        }
    }

    /// Build from configuration; `None` when the fallback is disabled or has no program.
    pub fn from_config(config: &FallbackConfig) -> Option<Self> {
        let program = config.active_program()?;
        Some(
            Self::new(program)
                .with_args(config.args.clone())
                .with_env(config.env.clone())
                .with_timeout(config.timeout()),
        )
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    #[must_use]
    pub fn with_env(mut self, env: BTreeMap<String, String>) -> Self {
        self.env = env;
        self
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    fn program_label(&self) -> String {
        self.program.display().to_string()
    }

    fn run(&self) -> Result<Vec<DomainRecord>> {
        let program = self.program_label();
        debug!(program = %program, args = ?self.args, "running fallback command");

        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(&self.env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        #[cfg(unix)]
        std::os::unix::process::CommandExt::process_group(&mut command, 0);
        let mut child = command.spawn().map_err(|source| FetchError::Spawn {
            program: program.clone(),
            source,
        })?;

        let stdout = capture(child.stdout.take());
        let stderr = capture(child.stderr.take());

        let status = wait_with_deadline(&mut child, self.timeout).map_err(|source| {
            FetchError::Spawn {
                program: program.clone(),
                source,
            }
        })?;

        // Readers are left detached on timeout: a surviving descendant may
        // still hold the pipes open.
        let Some(status) = status else {
            error!(program = %program, timeout = ?self.timeout, "fallback command timed out");
            return Err(FetchError::Timeout {
                program,
                timeout: self.timeout,
            });
        };

        let stdout = join_capture(stdout).map_err(|source| FetchError::Spawn {
            program: program.clone(),
            source,
        })?;
        let stderr = join_capture(stderr).map_err(|source| FetchError::Spawn {
            program: program.clone(),
            source,
        })?;
        if !stderr.trim().is_empty() {
            debug!(program = %program, stderr = %stderr.trim(), "fallback command stderr");
        }

        if !status.success() {
            error!(program = %program, %status, "fallback command exited abnormally");
            return Err(FetchError::CommandFailed {
                program,
                status: status_label(status),
                stdout: stdout.trim().to_string(),
                stderr,
            });
        }

        if stdout.trim().is_empty() {
            debug!(program = %program, "fallback command returned no messages");
            return Ok(Vec::new());
        }

        let records: Vec<DomainRecord> = serde_json::from_str(&stdout)
            .map_err(|source| FetchError::FallbackJson { program: program.clone(), source })?;
        debug!(program = %program, count = records.len(), "fallback command returned messages");
        Ok(records)
    }
}

impl MessageSource for CommandSource {
    fn name(&self) -> &str {
        "command"
    }

    fn fetch_messages(&self) -> Result<Vec<DomainRecord>> {
        self.run()
    }
}

type Capture = Option<JoinHandle<io::Result<String>>>;

/// Drain a pipe on its own thread so a full stderr never blocks stdout.
fn capture<R: Read + Send + 'static>(pipe: Option<R>) -> Capture {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buffer = String::new();
            pipe.read_to_string(&mut buffer)?;
            Ok(buffer)
        })
    })
}

fn join_capture(handle: Capture) -> io::Result<String> {
    match handle {
        Some(handle) => handle
            .join()
            .map_err(|_| io::Error::other("output reader thread panicked"))?,
        None => Ok(String::new()),
    }
}

/// Wait for the child; kill it and its process group and return `None` once
/// `timeout` has passed.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> io::Result<Option<ExitStatus>> {
    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            kill_process_group(child);
            child.kill()?;
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// The child leads its own process group, so this reaches every descendant
/// that did not move to another group.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    use nix::sys::signal::{Signal, killpg};
    use nix::unistd::Pid;

    let Ok(pid) = i32::try_from(child.id()) else {
        return;
    };
    if let Err(errno) = killpg(Pid::from_raw(pid), Signal::SIGKILL) {
        debug!(pid, %errno, "failed to signal fallback process group");
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

fn status_label(status: ExitStatus) -> String {
    match status.code() {
        Some(code) => code.to_string(),
        None => status.to_string(),
    }
}
