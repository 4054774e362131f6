//! Child process spawning with output capture

use crate::execution::error::ExecutionError;
use crate::execution::invocation::{command_text, CommandInvocation};
use std::process::Stdio;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;

/// Raw output of one attempt
#[derive(Debug, Clone)]
pub struct AttemptOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Spawns `argv` once and waits for it. Output is always captured; unless
/// `quiet`, it is also forwarded to our own stdout/stderr as it arrives.
pub async fn run_attempt(
    argv: &[String],
    invocation: &CommandInvocation,
) -> Result<AttemptOutput, ExecutionError> {
    let (program, args) = argv.split_first().ok_or(ExecutionError::EmptyCommand)?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    if let Some(dir) = &invocation.current_dir {
        cmd.current_dir(dir);
    }
    for (key, value) in &invocation.environment {
        cmd.env(key, value);
    }

    let mut child = cmd.spawn().map_err(|source| ExecutionError::Spawn {
        command: command_text(argv),
        source,
    })?;

    let child_stdout = child.stdout.take();
    let child_stderr = child.stderr.take();
    let echo = !invocation.quiet;

    let (stdout, stderr) = tokio::try_join!(
        drain(child_stdout, echo.then(tokio::io::stdout)),
        drain(child_stderr, echo.then(tokio::io::stderr)),
    )?;

    let status = child.wait().await?;

    Ok(AttemptOutput {
        exit_code: status.code().unwrap_or(-1),
        stdout,
        stderr,
    })
}

async fn drain<R, W>(reader: Option<R>, mut echo: Option<W>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut captured = Vec::new();
    let Some(mut reader) = reader else {
        return Ok(captured);
    };

    let mut buf = [0u8; 8192];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        captured.extend_from_slice(&buf[..n]);
        if let Some(out) = echo.as_mut() {
            // A closed terminal must not abort the child
            if out.write_all(&buf[..n]).await.is_err() || out.flush().await.is_err() {
                echo = None;
            }
        }
    }
    Ok(captured)
}

/// Lossy UTF-8 with trailing whitespace removed
pub fn trimmed_text(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).trim_end().to_string()
}
