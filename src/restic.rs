//! Engine argument construction helpers.
//!
//! This module is responsible for *building* the argument lists and
//! environment passed to restic. It deliberately does **not** execute
//! anything — process execution lives in [`crate::process`] so the pipeline
//! wiring has a single owner.
//!
//! The split keeps everything in this file pure: argument vectors in,
//! argument vectors out, testable without an engine on the machine.
//!
//! # Credentials
//!
//! Repository passwords travel through the environment ([`env`]), never on a
//! command line, so dry-run output and `command` renderings stay free of
//! secrets. Object-storage backends are not handled at all — restic reads
//! their credentials from the caller's environment, and [`credential_scheme`]
//! exists only so subcommands can warn about that.

use crate::config::{Config, Profile, expand_tilde};

/// Name of the engine executable.
pub const PROGRAM: &str = "restic";

// ─── Base arguments ───────────────────────────────────────────────────────────

/// Builds the argument list shared by every restic invocation:
///
/// ```text
/// -r <profile.repo>  [--cache-dir <cache>]
/// ```
///
/// Callers append the subcommand and extra flags to the returned `Vec`.
/// Note the engine name itself is *not* included; `run`'s dry-run output
/// omits it while `command` prepends it.
pub fn base_args(cfg: &Config, profile: &Profile) -> Vec<String> {
    let mut args: Vec<String> = vec!["-r".into(), profile.repo.clone()];
    if let Some(cache) = &cfg.cache {
        args.push("--cache-dir".into());
        args.push(expand_tilde(cache).display().to_string());
    }
    args
}

// ─── Environment ──────────────────────────────────────────────────────────────

/// Environment variables handed to the engine process.
///
/// A configured `password_file` wins over an inline `password`; with neither
/// set, nothing is exported and restic falls back to the caller's own
/// environment (or prompts).
pub fn env(profile: &Profile) -> Vec<(String, String)> {
    if let Some(file) = &profile.password_file {
        let path = expand_tilde(file);
        return vec![("RESTIC_PASSWORD_FILE".into(), path.display().to_string())];
    }
    if let Some(password) = &profile.password {
        return vec![("RESTIC_PASSWORD".into(), password.clone())];
    }
    vec![]
}

// ─── Backend schemes ──────────────────────────────────────────────────────────

/// Returns a display label when `repo` addresses an object-storage backend
/// whose credentials must come from the caller's environment.
pub fn credential_scheme(repo: &str) -> Option<&'static str> {
    if repo.starts_with("s3:") {
        Some("S3")
    } else if repo.starts_with("b2:") {
        Some("B2")
    } else if repo.starts_with("azure:") {
        Some("Azure")
    } else if repo.starts_with("gs:") {
        Some("Google Cloud")
    } else {
        None
    }
}

// ─── Rendering ────────────────────────────────────────────────────────────────

/// Render an argument list as a single shell-quoted line.
///
/// Plain words pass through untouched; anything a shell would mangle gets
/// backslash-escaped, so the output can be pasted straight into a shell.
pub fn render_command(args: &[String]) -> String {
    args.iter()
        .map(|arg| shellwords::escape(arg))
        .collect::<Vec<_>>()
        .join(" ")
}

// ─── Tests ────────────────────────────────────────────────────────────────────
