//! External command execution
//!
//! This is the **only** way gitlink runs external commands. All command
//! execution goes through [`run`] or [`run_with_timeout`] to ensure
//! consistent debug logging and tracing:
//!
//! ```text
//! $ git status [widgets]                 # with context
//! [gitlink-trace] context=widgets cmd="..." dur=12.3ms ok=true
//! ```
//!
//! Network-bound git commands (clone, fetch, pull, ls-remote) must use
//! [`run_with_timeout`]; git has no built-in deadline and an unreachable
//! remote otherwise hangs the whole pass.

use std::io::Read;
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use wait_timeout::ChildExt;

fn command_string(cmd: &Command) -> String {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

fn log_trace(cmd_str: &str, context: Option<&str>, duration_ms: f64, outcome: &str) {
    match context {
        Some(ctx) => log::debug!(
            "[gitlink-trace] context={ctx} cmd=\"{cmd_str}\" dur={duration_ms:.1}ms {outcome}"
        ),
        None => {
            log::debug!("[gitlink-trace] cmd=\"{cmd_str}\" dur={duration_ms:.1}ms {outcome}")
        }
    }
}

/// Execute a command with timing and debug logging.
///
/// The `context` parameter is typically the repository directory name for
/// git commands.
pub fn run(cmd: &mut Command, context: Option<&str>) -> std::io::Result<Output> {
    let cmd_str = command_string(cmd);
    match context {
        Some(ctx) => log::debug!("$ {} [{}]", cmd_str, ctx),
        None => log::debug!("$ {}", cmd_str),
    }

    let t0 = Instant::now();
    let result = cmd.output();
    let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(output) => log_trace(
            &cmd_str,
            context,
            duration_ms,
            &format!("ok={}", output.status.success()),
        ),
        Err(e) => log_trace(&cmd_str, context, duration_ms, &format!("err=\"{e}\"")),
    }

    result
}

/// Execute a command with a deadline.
///
/// Returns `Ok(None)` when the deadline expires; the child is killed and
/// reaped before returning, so no zombie is left behind. Stdout and stderr
/// are drained on background threads to avoid pipe-buffer deadlock with
/// chatty commands.
pub fn run_with_timeout(
    cmd: &mut Command,
    timeout: Duration,
    context: Option<&str>,
) -> std::io::Result<Option<Output>> {
    let cmd_str = command_string(cmd);
    match context {
        Some(ctx) => log::debug!("$ {} [{}] (timeout {:?})", cmd_str, ctx, timeout),
        None => log::debug!("$ {} (timeout {:?})", cmd_str, timeout),
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let t0 = Instant::now();
    let mut child = cmd.spawn()?;

    let stdout_pipe = child.stdout.take();
    let stderr_pipe = child.stderr.take();
    let stdout_reader = std::thread::spawn(move || drain(stdout_pipe));
    let stderr_reader = std::thread::spawn(move || drain(stderr_pipe));

    let status = match child.wait_timeout(timeout)? {
        Some(status) => status,
        None => {
            // Deadline expired: kill, reap, report timeout
            child.kill().ok();
            child.wait()?;
            let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;
            log_trace(&cmd_str, context, duration_ms, "timed-out=true");
            // Join the readers so the threads don't outlive the call
            let _ = stdout_reader.join();
            let _ = stderr_reader.join();
            return Ok(None);
        }
    };

    let stdout = stdout_reader.join().unwrap_or_default();
    let stderr = stderr_reader.join().unwrap_or_default();

    let duration_ms = t0.elapsed().as_secs_f64() * 1000.0;
    log_trace(
        &cmd_str,
        context,
        duration_ms,
        &format!("ok={}", status.success()),
    );

    Ok(Some(Output {
        status,
        stdout,
        stderr,
    }))
}

fn drain(pipe: Option<impl Read>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        // Read errors here mean the child died mid-write; partial output is
        // still worth returning for error messages.
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}
