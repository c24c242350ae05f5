//! Simulator child-process invocation with a bounded wait and bounded
//! output capture.

use std::io::Read;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, warn};
use wait_timeout::ChildExt;

/// Captured simulator output.
#[derive(Debug)]
pub struct SimulatorOutput {
    pub status: ExitStatus,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
    pub stdout_truncated: usize,
    pub stderr_truncated: usize,
    pub timed_out: bool,
}

impl SimulatorOutput {
    /// Bounded, lossy excerpt of stderr for error messages.
    pub fn stderr_excerpt(&self, max_bytes: usize) -> String {
        let end = self.stderr.len().min(max_bytes);
        String::from_utf8_lossy(&self.stderr[..end]).into_owned()
    }
}

/// Run `argv` with `model_file` appended, in `workdir`, inheriting the
/// caller's environment unmodified.
///
/// Blocks until the child exits or `timeout` elapses (`None` waits without
/// bound); a timed-out child is killed and reported via `timed_out`, never
/// silently dropped. Stdout/stderr are drained concurrently to avoid pipe
/// deadlocks, keeping at most `output_limit_bytes` of each.
pub fn run_simulator(
    argv: &[String],
    model_file: &str,
    workdir: &Path,
    timeout: Option<Duration>,
    output_limit_bytes: usize,
) -> Result<SimulatorOutput> {
    let (program, leading_args) = argv
        .split_first()
        .ok_or_else(|| anyhow!("simulator argv is empty"))?;
    let mut cmd = Command::new(program);
    cmd.args(leading_args)
        .arg(model_file)
        .current_dir(workdir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    debug!(program, model_file, workdir = %workdir.display(), "spawning simulator");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, program, "failed to spawn simulator");
            return Err(e).with_context(|| format!("spawn simulator {program}"));
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| anyhow!("stderr was not piped"))?;

    let stdout_handle = thread::spawn(move || read_stream_limited(stdout, output_limit_bytes));
    let stderr_handle = thread::spawn(move || read_stream_limited(stderr, output_limit_bytes));

    let mut timed_out = false;
    let status = match timeout {
        None => child.wait().context("wait for simulator")?,
        Some(timeout) => match child
            .wait_timeout(timeout)
            .context("wait for simulator timeout")?
        {
            Some(status) => status,
            None => {
                warn!(
                    timeout_secs = timeout.as_secs(),
                    "simulator timed out, killing"
                );
                timed_out = true;
                child.kill().context("kill simulator")?;
                child.wait().context("wait simulator after kill")?
            }
        },
    };

    let (stdout, stdout_truncated) = join_output(stdout_handle).context("join stdout")?;
    let (stderr, stderr_truncated) = join_output(stderr_handle).context("join stderr")?;

    if stdout_truncated > 0 || stderr_truncated > 0 {
        warn!(stdout_truncated, stderr_truncated, "simulator output truncated");
    }

    debug!(exit_code = ?status.code(), timed_out, "simulator finished");
    Ok(SimulatorOutput {
        status,
        stdout,
        stderr,
        stdout_truncated,
        stderr_truncated,
        timed_out,
    })
}

fn join_output(handle: thread::JoinHandle<Result<(Vec<u8>, usize)>>) -> Result<(Vec<u8>, usize)> {
    match handle.join() {
        Ok(result) => result,
        Err(_) => Err(anyhow!("output reader thread panicked")),
    }
}

fn read_stream_limited<R: Read>(mut reader: R, limit: usize) -> Result<(Vec<u8>, usize)> {
    let mut buf = Vec::new();
    let mut truncated = 0usize;
    let mut chunk = [0u8; 8192];

    loop {
        let n = reader.read(&mut chunk).context("read output")?;
        if n == 0 {
            break;
        }
        let remaining = limit.saturating_sub(buf.len());
        if remaining > 0 {
            let keep = n.min(remaining);
            buf.extend_from_slice(&chunk[..keep]);
            truncated += n.saturating_sub(keep);
        } else {
            truncated += n;
        }
    }

    Ok((buf, truncated))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| (*p).to_string()).collect()
    }

    #[test]
    fn captures_exit_status_and_output() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = run_simulator(
            &argv(&["echo", "ran"]),
            "model.glm",
            temp.path(),
            Some(Duration::from_secs(5)),
            1024,
        )
        .expect("run");
        assert!(out.status.success());
        assert!(!out.timed_out);
        assert_eq!(String::from_utf8_lossy(&out.stdout), "ran model.glm\n");
    }

    #[test]
    fn nonzero_exit_is_reported_not_erred() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = run_simulator(
            &argv(&["false"]),
            "model.glm",
            temp.path(),
            Some(Duration::from_secs(5)),
            1024,
        )
        .expect("run");
        assert!(!out.status.success());
    }

    #[test]
    fn output_is_bounded() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = run_simulator(
            &argv(&["printf", "%01000d"]),
            "0",
            temp.path(),
            Some(Duration::from_secs(5)),
            100,
        )
        .expect("run");
        assert_eq!(out.stdout.len(), 100);
        assert_eq!(out.stdout_truncated, 900);
    }

    #[test]
    fn timeout_kills_child() {
        let temp = tempfile::tempdir().expect("tempdir");
        let out = run_simulator(
            &argv(&["sleep"]),
            "5",
            temp.path(),
            Some(Duration::from_millis(100)),
            1024,
        )
        .expect("run");
        assert!(out.timed_out);
    }
}
