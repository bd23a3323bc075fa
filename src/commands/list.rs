//! `list` — show the profiles defined in the config file.
//!
//! Profiles print in name order with a blank line between entries. The
//! include/exclude lists shown are the profile's own, without group merging;
//! `run`'s dry-run output is the place to inspect the fully merged patterns.

use anyhow::Result;

use crate::{config::Config, ui};

/// Print every configured profile. Zero profiles prints nothing at all.
pub fn run(cfg: &Config) -> Result<()> {
    for (i, (name, profile)) in cfg.profiles.iter().enumerate() {
        if i > 0 {
            println!();
        }
        ui::key_val("Name", name);
        ui::key_val("  repo", &profile.repo);
        ui::key_val("  include", &format!("{:?}", profile.include));
        ui::key_val("  exclude", &format!("{:?}", profile.exclude));
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
