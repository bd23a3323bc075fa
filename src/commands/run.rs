//! `run` — execute (or preview) a backup profile.
//!
//! The default is a dry run: the full engine invocation is printed as one
//! shell-quoted line (without the program name) and nothing is executed.
//! `--go` runs the same arguments in the foreground, with the engine owning
//! the terminal and its exit code becoming ours.
//!
//! # Argument order
//!
//! ```text
//! <base>  backup  [--tag T]…  [--exclude P]…  <includes>…  <extra args>…
//! ```
//!
//! Excludes come before includes, and group patterns are appended after the
//! profile's own (see [`Profile::effective_patterns`]) — the engine resolves
//! pattern precedence by position, so this order is part of the contract.

use anyhow::Result;

use crate::{
    config::{Config, Profile},
    process, restic, ui,
};

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Run the named profile, or print its invocation when `go` is false.
pub fn run(cfg: &Config, profile_name: &str, go: bool) -> Result<()> {
    let profile = cfg.profile(profile_name)?;

    ui::info(&format!("Selected profile: {profile_name}"));
    if !go {
        ui::warn("Running in dry-run mode. Run tool again with '--go' option to execute backup.");
    }
    ui::info("Beginning backup...");

    let args = build_backup_args(cfg, profile);

    if go {
        process::run_foreground(restic::PROGRAM, &args, &restic::env(profile))
    } else {
        println!("{}", restic::render_command(&args));
        Ok(())
    }
}

// ─── Argument builder ─────────────────────────────────────────────────────────

/// Full argument list for the engine's `backup` subcommand.
///
/// `pub` so unit tests can call it directly without restic installed.
pub fn build_backup_args(cfg: &Config, profile: &Profile) -> Vec<String> {
    let (include, exclude) = profile.effective_patterns();

    let mut args = restic::base_args(cfg, profile);
    args.push("backup".into());
    for tag in &profile.tags {
        args.push("--tag".into());
        args.push(tag.clone());
    }
    for pattern in &exclude {
        args.push("--exclude".into());
        args.push(pattern.clone());
    }
    args.extend(include);
    args.extend(profile.args.iter().cloned());
    args
}

// ─── Tests ────────────────────────────────────────────────────────────────────
