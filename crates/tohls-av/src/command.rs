//! Builder for executing external tool commands with timeout support.

use std::fmt;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use tokio::process::Command;

/// Default command timeout: 5 minutes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing and executing external tool invocations.
///
/// # Example
///
/// ```no_run
/// use tohls_av::ToolCommand;
/// use std::path::PathBuf;
///
/// # async fn example() -> tohls_core::Result<()> {
/// let output = ToolCommand::new(PathBuf::from("ffprobe"))
///     .arg("-v").arg("error")
///     .arg("-show_entries").arg("stream=width,height")
///     .arg("/path/to/video.mp4")
///     .execute()
///     .await?;
/// println!("{}", output.stdout);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        Self {
            program,
            args: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<String>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<String>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// Set the maximum execution time.
    pub fn timeout(&mut self, d: Duration) -> &mut Self {
        self.timeout = d;
        self
    }

    /// Arguments collected so far.
    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    fn program_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// - Returns [`tohls_core::Error::Tool`] if the process times out (message
    ///   includes the timeout duration). The child is killed.
    /// - Returns [`tohls_core::Error::Tool`] if the process exits with a
    ///   non-zero status (message includes stderr).
    /// - Returns [`tohls_core::Error::Tool`] if spawning the process fails.
    pub async fn execute(&self) -> tohls_core::Result<ToolOutput> {
        let program_name = self.program_name();

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        tracing::debug!("Running: {}", self);

        let child = cmd
            .spawn()
            .map_err(|e| tohls_core::Error::tool(&program_name, format!("failed to spawn: {e}")))?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let result = tokio::time::timeout(self.timeout, child.wait_with_output()).await;

        match result {
            Ok(Ok(output)) => {
                let tool_output = ToolOutput {
                    status: output.status,
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                };

                if !output.status.success() {
                    tracing::warn!("failed on command: {}", self);
                    return Err(tohls_core::Error::tool(
                        program_name,
                        format!(
                            "exited with status {}: {}",
                            output.status,
                            tool_output.stderr.trim()
                        ),
                    ));
                }

                Ok(tool_output)
            }
            Ok(Err(e)) => Err(tohls_core::Error::tool(
                program_name,
                format!("I/O error waiting for process: {e}"),
            )),
            Err(_elapsed) => {
                tracing::warn!("timed out on command: {}", self);
                Err(tohls_core::Error::tool(
                    program_name,
                    format!("timed out after {:?}", self.timeout),
                ))
            }
        }
    }
}

impl fmt::Display for ToolCommand {
    /// Shell-like rendering for logs; arguments containing spaces are quoted.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            if arg.contains(' ') {
                write!(f, " \"{arg}\"")?;
            } else {
                write!(f, " {arg}")?;
            }
        }
        Ok(())
    }
}
