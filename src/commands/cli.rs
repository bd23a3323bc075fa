//! `cli` — run the engine directly with a profile's base arguments.
//!
//! Everything after the profile name is forwarded verbatim; no flag parsing
//! is applied to the tail, so engine flags like `--json` pass straight
//! through. The engine runs in the foreground and its exit code becomes
//! ours.

use anyhow::Result;

use crate::{
    config::{Config, Profile},
    process, restic,
};

/// Execute `restic <base> <extra…>` attached to the terminal.
pub fn run(cfg: &Config, profile_name: &str, extra: &[String]) -> Result<()> {
    let profile = cfg.profile(profile_name)?;
    let args = passthrough_args(cfg, profile, extra);
    process::run_foreground(restic::PROGRAM, &args, &restic::env(profile))
}

/// Base arguments with the caller's tail appended untouched.
pub fn passthrough_args(cfg: &Config, profile: &Profile, extra: &[String]) -> Vec<String> {
    let mut args = restic::base_args(cfg, profile);
    args.extend(extra.iter().cloned());
    args
}

// ─── Tests ────────────────────────────────────────────────────────────────────
