//! `command` — print the base engine invocation for scripting.
//!
//! The output is written with no trailing newline so it composes with
//! command substitution: `$(restic-vault command home) snapshots`. Warnings
//! go to stderr and never contaminate the captured invocation.

use std::io::Write;

use anyhow::{Context, Result};

use crate::{
    config::{Config, Profile},
    restic, ui,
};

/// Print `restic <base>` for the named profile.
pub fn run(cfg: &Config, profile_name: &str) -> Result<()> {
    let profile = cfg.profile(profile_name)?;

    if let Some(scheme) = restic::credential_scheme(&profile.repo) {
        ui::warn(&format!(
            "{scheme} repos require credential environment variables be set before command execution!"
        ));
    }

    let mut stdout = std::io::stdout();
    write!(stdout, "{}", rendered_invocation(cfg, profile)).context("writing command")?;
    stdout.flush().context("writing command")?;
    Ok(())
}

/// The shell-quoted invocation, engine name included.
pub fn rendered_invocation(cfg: &Config, profile: &Profile) -> String {
    let mut args = vec![restic::PROGRAM.to_string()];
    args.extend(restic::base_args(cfg, profile));
    restic::render_command(&args)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
