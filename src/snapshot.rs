//! Snapshot metadata queries against the engine.
//!
//! The engine answers `snapshots` and `stats` queries as JSON on stdout;
//! both run captured behind a spinner. Parsing is split into pure helpers
//! ([`parse_snapshot_listing`], [`parse_stats`]) so the not-found and
//! bad-output paths are testable without spawning anything.
//!
//! # Timestamps
//!
//! The engine reports snapshot times with anywhere from zero to nine
//! fractional-second digits depending on platform and version.
//! [`normalize_timestamp`] pins them to exactly three digits before RFC 3339
//! parsing; this is an engine-compatibility fix, not a general timestamp
//! parser.

use anyhow::{Context, Result, bail};
use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::{
    config::{Config, Profile},
    process, restic, ui,
};

// ─── Metadata ─────────────────────────────────────────────────────────────────

/// Engine-reported snapshot metadata, straight from the JSON listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Snapshot {
    /// Full hex snapshot id.
    pub id: String,
    /// The engine's own abbreviated id, used in archive filenames.
    pub short_id: String,
    /// Raw timestamp string as reported; see [`Snapshot::parsed_time`].
    pub time: String,
}

impl Snapshot {
    /// First eight characters of the full id, for status lines.
    pub fn abbrev_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }

    /// The snapshot's creation time, normalized and parsed.
    pub fn parsed_time(&self) -> Result<DateTime<FixedOffset>> {
        let normalized = normalize_timestamp(&self.time);
        DateTime::parse_from_rfc3339(&normalized)
            .with_context(|| format!("parsing snapshot timestamp '{}'", self.time))
    }
}

// ─── Timestamp normalization ──────────────────────────────────────────────────

/// Truncate or pad the fractional-seconds part to exactly three digits.
///
/// `2023-01-02T03:04:05.123456789Z` → `2023-01-02T03:04:05.123Z`, and
/// `2023-01-02T03:04:05+01:00` → `2023-01-02T03:04:05.000+01:00`. The
/// timezone suffix (`Z` or `±HH:MM`) is preserved untouched.
pub fn normalize_timestamp(raw: &str) -> String {
    // The timezone marker is the first Z/+/- after the time-of-day part;
    // searching from 'T' keeps the date's own dashes out of it.
    let time_start = raw.find('T').map_or(0, |i| i + 1);
    let tz_start = raw[time_start..]
        .find(['Z', '+', '-'])
        .map_or(raw.len(), |i| time_start + i);
    let (stamp, tz) = raw.split_at(tz_start);

    let (whole, frac) = match stamp.split_once('.') {
        Some((w, f)) => (w, f),
        None => (stamp, ""),
    };
    let frac: String = frac.chars().chain(std::iter::repeat('0')).take(3).collect();

    format!("{whole}.{frac}{tz}")
}

// ─── Queries ──────────────────────────────────────────────────────────────────

/// Look up the snapshot matching `name` (an id, or the sentinel `latest`).
///
/// Runs `restic <base> --quiet snapshots <name> --json` captured; an explicit
/// `null` or an empty listing is the fatal not-found case.
pub fn find(cfg: &Config, profile: &Profile, name: &str) -> Result<Snapshot> {
    let mut args = restic::base_args(cfg, profile);
    args.extend([
        "--quiet".into(),
        "snapshots".into(),
        name.to_string(),
        "--json".into(),
    ]);
    let env = restic::env(profile);

    let stdout = ui::with_spinner(&format!("Querying snapshots for '{name}'..."), || {
        process::run_captured(restic::PROGRAM, &args, &env)
    })?;

    parse_snapshot_listing(&stdout, name)
}

/// Total size in bytes of snapshot `id`, via the engine's stats query.
pub fn total_size(cfg: &Config, profile: &Profile, id: &str) -> Result<u64> {
    let mut args = restic::base_args(cfg, profile);
    args.extend([
        "--quiet".into(),
        "stats".into(),
        id.to_string(),
        "--json".into(),
    ]);
    let env = restic::env(profile);

    let stdout = ui::with_spinner("Querying snapshot size...", || {
        process::run_captured(restic::PROGRAM, &args, &env)
    })?;

    parse_stats(&stdout)
}

// ─── Parsing ──────────────────────────────────────────────────────────────────

/// Pick the first snapshot out of a JSON listing.
///
/// The engine reports "nothing matched" either as the literal `null` or as
/// an empty array; both become the fatal not-found error.
fn parse_snapshot_listing(json: &str, name: &str) -> Result<Snapshot> {
    let listing: Option<Vec<Snapshot>> = serde_json::from_str(json)
        .with_context(|| format!("parsing snapshot listing for '{name}'"))?;

    match listing.and_then(|matches| matches.into_iter().next()) {
        Some(snapshot) => Ok(snapshot),
        None => bail!("Could not find snapshot: '{name}'"),
    }
}

/// Extract `total_size` from a stats query response.
fn parse_stats(json: &str) -> Result<u64> {
    #[derive(Deserialize)]
    struct Stats {
        total_size: u64,
    }

    let stats: Stats = serde_json::from_str(json).context("parsing snapshot stats")?;
    Ok(stats.total_size)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
