//! Configuration types and loading logic.
//!
//! `Config` is a direct 1-to-1 mapping of the TOML config file, loaded once
//! per invocation and immutable afterwards. The file is required: every
//! subcommand needs at least one profile to do anything useful, so a missing
//! or unparseable file is a fatal error rather than a silent default.
//!
//! # File format
//!
//! ```toml
//! cache = "~/.cache/restic"            # optional global engine cache dir
//!
//! [dump]                               # required by `dump` and `decrypt`
//! cache         = "/var/tmp/staging"   # optional archive staging dir
//! password_file = "~/.dump-password"   # archive cipher key material
//!
//! [profiles.home]
//! repo          = "/mnt/backup/home"   # mandatory
//! password_file = "~/.restic-password" # or `password`, or neither
//! tags          = ["home"]
//! include       = ["/home"]
//! exclude       = ["/home/cache"]
//! args          = ["--one-file-system"]
//!
//! [profiles.home.groups.media]         # optional pattern groups
//! include = ["/srv/media"]
//! exclude = ["/srv/media/tmp"]
//! ```
//!
//! Profiles and groups are kept in `BTreeMap`s so iteration order (pattern
//! merging, `list` output) is deterministic: lexicographic by name. Order
//! *within* each pattern list is preserved exactly as configured, because the
//! engine gives earlier patterns precedence.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

// ─── Top-level ────────────────────────────────────────────────────────────────

/// Root configuration object, deserialised from the config file.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Config {
    /// Engine cache directory, passed as `--cache-dir` when set.
    #[serde(default)]
    pub cache: Option<String>,

    /// Options for the `dump`/`decrypt` archive workflow.
    #[serde(default)]
    pub dump: Option<DumpConfig>,

    /// Named backup profiles. May be empty, in which case every profile
    /// lookup fails; the caller warns about that case up front.
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

impl Config {
    /// Look up a profile by name, failing with the user-facing
    /// "no profile defined" message if it is absent.
    pub fn profile(&self, name: &str) -> Result<&Profile> {
        self.profiles
            .get(name)
            .with_context(|| format!("No profile '{name}' defined in config"))
    }

    /// The `[dump]` section, required by `dump` and `decrypt`.
    pub fn dump_options(&self) -> Result<&DumpConfig> {
        self.dump
            .as_ref()
            .context("No dump options defined in config")
    }
}

// ─── [dump] ───────────────────────────────────────────────────────────────────

/// Archive dump options.
///
/// `cache` is an optional staging directory: when set, the archive is built
/// there first and then relocated to the destination (useful when the
/// destination is slow removable media). When unset, the archive is built
/// directly at the destination.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct DumpConfig {
    /// Staging directory for in-progress archives.
    #[serde(default)]
    pub cache: Option<String>,

    /// Path to the file holding the archive cipher password.
    #[serde(default)]
    pub password_file: Option<String>,
}

impl DumpConfig {
    /// Resolve the cipher password file, verifying it exists.
    ///
    /// The password itself is never read by this tool; the path is handed to
    /// the cipher process, so a missing file is caught here rather than as a
    /// confusing cipher error mid-pipeline.
    pub fn password_file(&self) -> Result<PathBuf> {
        let raw = self
            .password_file
            .as_deref()
            .context("No dump password file defined in config")?;
        let path = expand_tilde(raw);
        if !path.is_file() {
            bail!("Dump password file '{}' does not exist", path.display());
        }
        Ok(path)
    }
}

// ─── [profiles.*] ─────────────────────────────────────────────────────────────

/// A named backup target: repository address plus patterns and credentials.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Profile {
    /// Repository address. May carry a backend scheme (`s3:…`, `sftp:…`);
    /// plain paths address a local repository.
    pub repo: String,

    /// Path to a file holding the repository password.
    #[serde(default)]
    pub password_file: Option<String>,

    /// Repository password given inline. Exported to the engine's
    /// environment, never placed on a command line or printed.
    #[serde(default)]
    pub password: Option<String>,

    /// Tags attached to every snapshot this profile creates.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Paths to include in the snapshot.
    #[serde(default)]
    pub include: Vec<String>,

    /// Patterns to exclude, passed before the includes.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Extra engine arguments appended verbatim after the includes.
    #[serde(default)]
    pub args: Vec<String>,

    /// Named pattern groups merged into the profile's own lists.
    #[serde(default)]
    pub groups: BTreeMap<String, Group>,
}

impl Profile {
    /// The profile's include/exclude lists with every group's lists
    /// concatenated on, groups in name order.
    ///
    /// Concatenation, not set union: duplicates survive and within-list
    /// order is untouched, since the engine resolves pattern precedence by
    /// position.
    pub fn effective_patterns(&self) -> (Vec<String>, Vec<String>) {
        let mut include = self.include.clone();
        let mut exclude = self.exclude.clone();
        for group in self.groups.values() {
            include.extend(group.include.iter().cloned());
            exclude.extend(group.exclude.iter().cloned());
        }
        (include, exclude)
    }
}

/// A nested include/exclude pattern list under a profile. Groups do not
/// nest further.
#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Group {
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

// ─── Paths ────────────────────────────────────────────────────────────────────

/// Default config location: `~/.restic-vault.toml`.
pub fn default_path() -> Result<PathBuf> {
    let home = dirs::home_dir().context("cannot locate home directory")?;
    Ok(home.join(".restic-vault.toml"))
}

/// Expand a leading `~` to the user's home directory.
///
/// Only `~` and `~/…` are handled (`~user/…` is not); anything else passes
/// through untouched.
pub fn expand_tilde(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(raw)
}

// ─── Loader ───────────────────────────────────────────────────────────────────

/// Read and parse a `Config` from `path`.
///
/// Returns an error if the file cannot be read or is not valid TOML. The
/// empty-profiles case is *not* an error here; `main` warns about it once
/// and carries on, so `--help` and `list` still work against a skeleton
/// config.
pub fn load_config(path: &Path) -> Result<Config> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;

    toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

// ─── Tests ────────────────────────────────────────────────────────────────────
