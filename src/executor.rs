//! Runs the external linter on a generated script.
//!
//! Each invocation writes the script to its own temporary file, runs the tool
//! once, drains both standard streams until the process exits and removes the
//! file again, whatever the outcome. The tool's exit status is reported but not
//! interpreted: linters exit non-zero when they have findings.

use crate::backend::LintBackend;
use crate::dialect::Dialect;
use std::ffi::OsString;
use std::io::{Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};
use thiserror::Error;

/// Default subprocess timeout in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Result of executing a tool.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, or -1 when the process was terminated by a signal.
    pub exit_code: i32,
}

/// Error during tool execution. All of these abort the run.
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("Empty command")]
    EmptyCommand,
    #[error("Failed to spawn '{tool}': {source}")]
    Spawn { tool: String, source: std::io::Error },
    #[error("Tool '{tool}' timed out after {timeout_ms}ms")]
    Timeout { tool: String, timeout_ms: u64 },
    #[error("Failed to write temporary script: {0}")]
    TempFile(#[source] std::io::Error),
    #[error("I/O error while running '{tool}': {message}")]
    Io { tool: String, message: String },
}

/// Executor for the external linter.
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    /// Timeout in milliseconds; zero waits forever.
    timeout_ms: u64,
}

impl ToolExecutor {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    pub fn timeout_ms(&self) -> u64 {
        self.timeout_ms
    }

    /// Write `script` to a temporary file and lint it with `backend`.
    pub fn lint_script(
        &self,
        backend: &dyn LintBackend,
        dialect: Dialect,
        script: &str,
    ) -> Result<ToolOutput, ExecutorError> {
        let mut file = tempfile::Builder::new()
            .prefix("shdoclint-")
            .suffix(".sh")
            .tempfile()
            .map_err(ExecutorError::TempFile)?;
        file.write_all(script.as_bytes()).map_err(ExecutorError::TempFile)?;
        file.flush().map_err(ExecutorError::TempFile)?;

        // Close our handle so the tool can open the file on every platform;
        // the path is still removed when it goes out of scope.
        let path = file.into_temp_path();
        log::debug!("Auto-generated shell file {}:\n{script}", path.display());

        let output = self.execute(&backend.command(dialect, &path));

        if let Err(e) = path.close() {
            log::debug!("Failed to remove temporary script: {e}");
        }
        output
    }

    /// Run `argv` to completion and capture its output.
    pub fn execute(&self, argv: &[OsString]) -> Result<ToolOutput, ExecutorError> {
        let Some((program, args)) = argv.split_first() else {
            return Err(ExecutorError::EmptyCommand);
        };
        let tool = program.to_string_lossy().into_owned();

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| ExecutorError::Spawn {
                tool: tool.clone(),
                source,
            })?;

        // Both pipes are drained while the child runs so a chatty linter never blocks.
        let drain = Drain::start(&mut child);
        let io_error = |message: String| ExecutorError::Io {
            tool: tool.clone(),
            message,
        };

        let status = match self.wait(&mut child) {
            Ok(Some(status)) => status,
            Ok(None) => {
                abort(&mut child, drain);
                return Err(ExecutorError::Timeout {
                    tool: tool.clone(),
                    timeout_ms: self.timeout_ms,
                });
            }
            Err(e) => {
                abort(&mut child, drain);
                return Err(io_error(format!("wait failed: {e}")));
            }
        };

        let (stdout, stderr) = drain.finish().map_err(io_error)?;
        let exit_code = status.code().unwrap_or(-1);
        log::debug!("{tool} exited with {exit_code}; stdout:\n{stdout}");

        Ok(ToolOutput {
            stdout,
            stderr,
            exit_code,
        })
    }

    /// Wait for `child`; `None` means the timeout expired first.
    fn wait(&self, child: &mut Child) -> std::io::Result<Option<ExitStatus>> {
        if self.timeout_ms == 0 {
            return child.wait().map(Some);
        }
        let deadline = Instant::now() + Duration::from_millis(self.timeout_ms);
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT_MS)
    }
}

/// Kill `child`, reap it and join its readers. Errors are ignored: the run is
/// already failing.
fn abort(child: &mut Child, drain: Drain) {
    let _ = child.kill();
    let _ = child.wait();
    let _ = drain.finish();
}

const POLL_INTERVAL: Duration = Duration::from_millis(10);

type Reader = thread::JoinHandle<std::io::Result<Vec<u8>>>;

/// Background readers for the standard streams of a child process.
struct Drain {
    stdout: Option<Reader>,
    stderr: Option<Reader>,
}

impl Drain {
    fn start(child: &mut Child) -> Self {
        Self {
            stdout: child.stdout.take().map(spawn_reader),
            stderr: child.stderr.take().map(spawn_reader),
        }
    }

    /// Join both readers and decode what they collected.
    fn finish(self) -> Result<(String, String), String> {
        Ok((collect(self.stdout)?, collect(self.stderr)?))
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Reader {
    thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn collect(reader: Option<Reader>) -> Result<String, String> {
    let Some(reader) = reader else {
        return Ok(String::new());
    };
    let bytes = reader
        .join()
        .map_err(|_| "output reader panicked".to_string())?
        .map_err(|e| format!("failed to read output: {e}"))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
