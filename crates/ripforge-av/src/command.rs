//! Builder for executing external tool commands.
//!
//! Long-running tools are driven with [`ToolCommand::run_decoded`], which
//! merges stdout and stderr into one line stream, feeds every line to a
//! [`LineDecoder`] and hands each decoded record to a callback. There is no
//! timeout: a tool that never exits keeps the caller waiting.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::protocol::LineDecoder;
use crate::{Error, Result};

const READ_CHUNK: usize = 4096;

/// Output captured from a short-lived tool execution.
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
/// use ripforge_av::ToolCommand;
/// use ripforge_av::protocol::MakeMkvDecoder;
/// use std::path::PathBuf;
///
/// # async fn example() -> ripforge_av::Result<()> {
/// ToolCommand::new(PathBuf::from("makemkvcon"))
///     .args(["-r", "--progress=-stdout", "mkv", "dev:/dev/sr0", "0", "/tmp/out"])
///     .run_decoded(MakeMkvDecoder, |update| println!("{update:?}"))
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<String>,
    name: String,
}

impl ToolCommand {
    /// Create a new command for the given program path.
    pub fn new(program: PathBuf) -> Self {
        let name = program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| program.to_string_lossy().to_string());
        Self {
            program,
            args: Vec::new(),
            name,
        }
    }

    /// Run the program under `stdbuf -o0` when `stdbuf` is on `PATH`, so a
    /// tool that block-buffers a piped stdout still reports progress live.
    ///
    /// Must be called before any argument is added. The tool name used in
    /// errors and logs stays that of the wrapped program. A program that does
    /// not resolve is left unwrapped so it still fails to spawn.
    pub fn unbuffered(mut self) -> Self {
        if which::which(&self.program).is_err() {
            return self;
        }
        if let Ok(stdbuf) = which::which("stdbuf") {
            let wrapped = std::mem::replace(&mut self.program, stdbuf);
            self.args
                .splice(0..0, ["-o0".to_string(), wrapped.to_string_lossy().to_string()]);
        }
        self
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

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    /// Short tool name used in errors and logs.
    pub fn tool_name(&self) -> String {
        self.name.clone()
    }

    /// Run to completion and capture both streams. Used for the quick
    /// presence/version/preset probes.
    pub fn output(&self) -> Result<ToolOutput> {
        let output = std::process::Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::spawn(self.tool_name(), e))?;

        Ok(ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        })
    }

    /// Spawn the tool and call `on_line` for every line of its combined
    /// stdout/stderr until both streams close, then wait for exit.
    ///
    /// Both `\n` and `\r` end a line, so carriage-return progress meters are
    /// seen as they update.
    pub async fn stream_lines<F>(&self, mut on_line: F) -> Result<ExitStatus>
    where
        F: FnMut(&str),
    {
        let tool = self.tool_name();
        tracing::debug!("spawn: {} {}", self.program.display(), self.args.join(" "));

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::spawn(tool.clone(), e))?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::InvalidInput(format!("{tool}: stdout not captured")))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::InvalidInput(format!("{tool}: stderr not captured")))?;

        let mut out_buf = [0u8; READ_CHUNK];
        let mut err_buf = [0u8; READ_CHUNK];
        let mut out_lines = LineBuffer::default();
        let mut err_lines = LineBuffer::default();
        let mut out_open = true;
        let mut err_open = true;
        let mut ready = Vec::new();

        while out_open || err_open {
            tokio::select! {
                n = stdout.read(&mut out_buf), if out_open => {
                    let n = n?;
                    if n == 0 {
                        out_open = false;
                        ready.extend(out_lines.finish());
                    } else {
                        out_lines.push(&out_buf[..n], &mut ready);
                    }
                }
                n = stderr.read(&mut err_buf), if err_open => {
                    let n = n?;
                    if n == 0 {
                        err_open = false;
                        ready.extend(err_lines.finish());
                    } else {
                        err_lines.push(&err_buf[..n], &mut ready);
                    }
                }
            }

            for line in ready.drain(..) {
                on_line(&line);
            }
        }

        let status = child.wait().await?;
        tracing::debug!("{tool} finished: {status}");
        Ok(status)
    }

    /// Stream the tool's output through `decoder`, invoking `on_record` for
    /// every decoded record on the calling task.
    ///
    /// Succeeds iff the process exits with status zero.
    pub async fn run_decoded<D, F>(&self, mut decoder: D, mut on_record: F) -> Result<()>
    where
        D: LineDecoder,
        F: FnMut(D::Record),
    {
        let tool = self.tool_name();

        let status = self
            .stream_lines(|line| {
                tracing::trace!("{tool}: {line}");
                if let Some(record) = decoder.decode(line) {
                    on_record(record);
                }
            })
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::tool_failed(tool, status.to_string()))
        }
    }
}

/// Splits a byte stream into lines on `\n` or `\r`, dropping empty lines.
#[derive(Debug, Default)]
struct LineBuffer {
    pending: Vec<u8>,
}

impl LineBuffer {
    fn push(&mut self, chunk: &[u8], out: &mut Vec<String>) {
        for &b in chunk {
            if b == b'\n' || b == b'\r' {
                if let Some(line) = self.take() {
                    out.push(line);
                }
            } else {
                self.pending.push(b);
            }
        }
    }

    fn finish(&mut self) -> Option<String> {
        self.take()
    }

    fn take(&mut self) -> Option<String> {
        if self.pending.is_empty() {
            return None;
        }
        let line = String::from_utf8_lossy(&self.pending).to_string();
        self.pending.clear();
        Some(line)
    }
}
