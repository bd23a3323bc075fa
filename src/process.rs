//! Subprocess execution — foreground, captured, and piped modes.
//!
//! Three ways a child process runs here:
//!
//! | Mode                 | stdio                          | Used by                     |
//! |----------------------|--------------------------------|-----------------------------|
//! | [`run_foreground`]   | all inherited                  | `run --go`, `cli`           |
//! | [`run_captured`]     | stdout/stderr captured         | snapshot + stats queries    |
//! | [`run_pipeline`]     | stage N stdout → N+1 stdin     | `dump`, `decrypt`           |
//!
//! A pipeline waits on **every** stage and reports each non-zero exit by
//! label, so a failure in the extraction stage is not masked by a clean exit
//! from the cipher at the end of the chain. All pipeline stderr is inherited:
//! the progress meter draws on the terminal and engine diagnostics stay
//! visible.
//!
//! Exit codes from foreground children surface as [`CommandFailed`], which
//! `main` unwraps into the process's own exit status.

use std::{
    fs::File,
    path::PathBuf,
    process::{Child, ChildStdout, Command, ExitStatus, Output, Stdio},
};

use anyhow::{Context, Result, bail};
use thiserror::Error;

// ─── Errors ───────────────────────────────────────────────────────────────────

/// A checked child process exited non-zero.
///
/// Carries the exit code so `main` can terminate with the same code instead
/// of a generic failure status.
#[derive(Debug, Error)]
#[error("{command} exited with code {code}")]
pub struct CommandFailed {
    /// Program name or stage label, for the error line.
    pub command: String,
    /// The child's exit code (1 when it died to a signal).
    pub code: i32,
}

fn status_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

// ─── Foreground ───────────────────────────────────────────────────────────────

/// Run a command attached to the terminal, propagating its exit code.
///
/// Used for live engine invocations (`run --go`, `cli` passthrough) where
/// the engine owns the terminal for prompts and progress output.
pub fn run_foreground(program: &str, args: &[String], env: &[(String, String)]) -> Result<()> {
    let status = Command::new(program)
        .args(args)
        .envs(env.iter().map(|(k, v)| (k, v)))
        .status()
        .with_context(|| format!("failed to spawn {program}"))?;

    if status.success() {
        Ok(())
    } else {
        Err(CommandFailed {
            command: program.to_string(),
            code: status_code(status),
        }
        .into())
    }
}

// ─── Captured ─────────────────────────────────────────────────────────────────

/// Run a command to completion and return its stdout for parsing.
///
/// On failure the child's captured stderr is replayed to our stderr first,
/// so the engine's own diagnostics are not lost behind the one-line error.
pub fn run_captured(program: &str, args: &[String], env: &[(String, String)]) -> Result<String> {
    let output: Output = Command::new(program)
        .args(args)
        .envs(env.iter().map(|(k, v)| (k, v)))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .with_context(|| format!("failed to spawn {program}"))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            eprintln!("{}", stderr.trim_end());
        }
        return Err(CommandFailed {
            command: program.to_string(),
            code: status_code(output.status),
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

// ─── Pipelines ────────────────────────────────────────────────────────────────

/// One external process in a dump/decrypt pipeline.
#[derive(Debug)]
pub struct Stage {
    /// Short name used in error lines, e.g. `"restic"`.
    pub label: String,
    pub program: String,
    pub args: Vec<String>,
    pub env: Vec<(String, String)>,
}

impl Stage {
    /// Stage with no special environment; the label defaults to the program
    /// name.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        let program = program.into();
        Self {
            label: program.clone(),
            program,
            args,
            env: vec![],
        }
    }

    /// Attach environment variables to the stage's process.
    pub fn with_env(mut self, env: Vec<(String, String)>) -> Self {
        self.env = env;
        self
    }
}

/// Where the first pipeline stage reads from.
#[derive(Debug)]
pub enum PipelineInput {
    /// No input; the first stage generates its own data.
    Null,
    /// Read from a file.
    File(PathBuf),
    /// Inherit the parent's stdin.
    Stdin,
}

/// Where the last pipeline stage writes to.
#[derive(Debug)]
pub enum PipelineOutput {
    /// Write to a file (created or truncated).
    File(PathBuf),
    /// Inherit the parent's stdout.
    Stdout,
}

/// Execute `stages` as a single OS-level pipeline.
///
/// All stages run concurrently with stage N's stdout wired to stage N+1's
/// stdin; stderr is inherited throughout. The call blocks until every stage
/// has exited and then reports **all** non-zero exits together, identified
/// by stage label. Partial output at the sink is left in place for the
/// caller to deal with.
pub fn run_pipeline(
    stages: Vec<Stage>,
    input: PipelineInput,
    output: PipelineOutput,
) -> Result<()> {
    if stages.is_empty() {
        bail!("cannot run an empty pipeline");
    }

    let last = stages.len() - 1;
    let mut children: Vec<(String, Child)> = Vec::with_capacity(stages.len());
    let mut upstream: Option<ChildStdout> = None;

    for (i, stage) in stages.into_iter().enumerate() {
        let mut cmd = Command::new(&stage.program);
        cmd.args(&stage.args)
            .envs(stage.env.iter().map(|(k, v)| (k, v)))
            .stderr(Stdio::inherit());

        match upstream.take() {
            Some(prev) => {
                cmd.stdin(Stdio::from(prev));
            }
            None => match &input {
                PipelineInput::Null => {
                    cmd.stdin(Stdio::null());
                }
                PipelineInput::File(path) => {
                    let f = File::open(path)
                        .with_context(|| format!("opening {}", path.display()))?;
                    cmd.stdin(Stdio::from(f));
                }
                PipelineInput::Stdin => {
                    cmd.stdin(Stdio::inherit());
                }
            },
        }

        if i < last {
            cmd.stdout(Stdio::piped());
        } else {
            match &output {
                PipelineOutput::File(path) => {
                    let f = File::create(path)
                        .with_context(|| format!("creating {}", path.display()))?;
                    cmd.stdout(Stdio::from(f));
                }
                PipelineOutput::Stdout => {
                    cmd.stdout(Stdio::inherit());
                }
            }
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("failed to spawn {}", stage.label))?;
        if i < last {
            upstream = Some(
                child
                    .stdout
                    .take()
                    .with_context(|| format!("no stdout pipe for {}", stage.label))?,
            );
        }
        children.push((stage.label, child));
    }

    // Wait on every stage so an upstream failure is reported even when the
    // terminal stage exits cleanly on a truncated stream.
    let mut failures: Vec<String> = Vec::new();
    for (label, mut child) in children {
        let status = child.wait().with_context(|| format!("waiting for {label}"))?;
        if !status.success() {
            failures.push(match status.code() {
                Some(code) => format!("{label} returned with error code {code}"),
                None => format!("{label} was terminated by a signal"),
            });
        }
    }

    if !failures.is_empty() {
        bail!("{}. Aborting.", failures.join("; "));
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
