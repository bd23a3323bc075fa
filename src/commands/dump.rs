//! `dump` — extract snapshots into encrypted offline archives.
//!
//! For each requested snapshot (default: `latest`) the repository tree is
//! streamed through a four-stage pipeline into a single portable file:
//!
//! ```text
//! restic dump <id> /  →  pv  →  zstd -c  →  openssl enc … -e  →  <staging>/<name>
//! ```
//!
//! # Sequence per snapshot
//!
//! | # | Step                | Fatal when                                    |
//! |---|---------------------|-----------------------------------------------|
//! | 1 | resolve snapshot    | nothing matches the requested name            |
//! | 2 | derive filename     | archive already exists at staging or dest     |
//! | 3 | query size          | stats query fails                             |
//! | 4 | preflight space     | staging or destination is short on free bytes |
//! | 5 | run pipeline        | any stage exits non-zero                      |
//! | 6 | relocate            | the metered copy fails (staged copy kept)     |
//!
//! Snapshots are processed strictly in order and the first failure aborts
//! the whole invocation; a later snapshot is never attempted after an
//! earlier one fails. A failed pipeline leaves its partial output file in
//! place for inspection.

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::{
    archive,
    config::{Config, Profile, expand_tilde},
    process::{PipelineInput, PipelineOutput, run_pipeline},
    snapshot, ui,
};

// ─── Entry point ──────────────────────────────────────────────────────────────

/// Dump the requested snapshots of `profile_name` to `destination`.
pub fn run(
    cfg: &Config,
    destination: &str,
    profile_name: &str,
    snapshots: &[String],
) -> Result<()> {
    let profile = cfg.profile(profile_name)?;
    let dump_cfg = cfg.dump_options()?;
    let password_file = dump_cfg.password_file()?;

    let dest_dir = expand_tilde(destination);
    if !dest_dir.is_dir() {
        bail!("Destination directory '{}' does not exist", dest_dir.display());
    }

    // Archives are staged in the dump cache when one is configured and
    // written straight to the destination otherwise.
    let staging_dir = match &dump_cfg.cache {
        Some(cache) => expand_tilde(cache),
        None => dest_dir.clone(),
    };
    if !staging_dir.is_dir() {
        bail!("Staging directory '{}' does not exist", staging_dir.display());
    }

    let names: Vec<String> = if snapshots.is_empty() {
        vec!["latest".into()]
    } else {
        snapshots.to_vec()
    };

    ui::info(&format!("Selected profile: {profile_name}"));
    ui::info(&format!("Selected snapshots: {}", names.join(", ")));

    for name in &names {
        dump_snapshot(cfg, profile, name, &staging_dir, &dest_dir, &password_file)?;
    }
    Ok(())
}

// ─── Per-snapshot sequence ────────────────────────────────────────────────────

fn dump_snapshot(
    cfg: &Config,
    profile: &Profile,
    name: &str,
    staging_dir: &Path,
    dest_dir: &Path,
    password_file: &Path,
) -> Result<()> {
    ui::info(&format!("Processing '{name}':"));

    ui::detail(&format!("Querying snapshots for '{name}'..."));
    let snap = snapshot::find(cfg, profile, name)?;
    let time = snap.parsed_time()?;

    // The filename is deterministic per (repo, snapshot), so an existing
    // file means this snapshot was already dumped. Checked at both ends
    // before anything expensive runs.
    let filename = archive::filename(&profile.repo, &time, &snap.short_id);
    let staging_file = staging_dir.join(&filename);
    if staging_file.exists() {
        bail!("Archive already exists at '{}'", staging_file.display());
    }
    let dest_file = dest_dir.join(&filename);
    if dest_file.exists() {
        bail!("Final archive already exists at '{}'", dest_file.display());
    }

    ui::detail(&format!(
        "Using snapshot ID '{}' with timestamp '{time}'",
        snap.abbrev_id()
    ));

    ui::detail("Querying snapshot size...");
    let size = snapshot::total_size(cfg, profile, &snap.id)?;
    ui::detail(&format!(
        "Archive should be no larger than (approx.) {}",
        ui::human_bytes(size)
    ));

    preflight_space(staging_dir, dest_dir, size)?;

    ui::detail("Creating archive... (compression and encryption enabled)");
    ui::detail(&format!("Dumping to {}", staging_file.display()));
    run_pipeline(
        vec![
            archive::extract_stage(cfg, profile, &snap.id),
            archive::meter_stage(size),
            archive::compress_stage(),
            archive::encrypt_stage(password_file),
        ],
        PipelineInput::Null,
        PipelineOutput::File(staging_file.clone()),
    )?;

    if !same_directory(staging_dir, dest_dir)? {
        relocate(&staging_file, &dest_file)?;
    }

    ui::success(&format!(
        "Archive is now available at {}",
        dest_file.display()
    ));
    Ok(())
}

// ─── Preflight ────────────────────────────────────────────────────────────────

/// Both the staging and destination filesystems must hold the size estimate.
///
/// The estimate is the uncompressed tree size, so this over-reserves for
/// compressible data; better too strict than a full disk mid-pipeline.
fn preflight_space(staging_dir: &Path, dest_dir: &Path, size: u64) -> Result<()> {
    let staging_free = archive::free_space(staging_dir)?;
    if staging_free < size {
        bail!(
            "Dump archive needs at least {}, but directory only has {} free",
            ui::human_bytes(size),
            ui::human_bytes(staging_free)
        );
    }
    let dest_free = archive::free_space(dest_dir)?;
    if dest_free < size {
        bail!(
            "Dump archive needs at least {}, but destination directory only has {} free",
            ui::human_bytes(size),
            ui::human_bytes(dest_free)
        );
    }
    Ok(())
}

// ─── Relocation ───────────────────────────────────────────────────────────────

/// Whether two existing directories resolve to the same real path.
///
/// The dump cache may reach the destination through a symlink; an aliased
/// pair must stage in place, since relocating onto itself would truncate
/// the archive before the copy reads it.
fn same_directory(a: &Path, b: &Path) -> Result<bool> {
    let a = a
        .canonicalize()
        .with_context(|| format!("resolving {}", a.display()))?;
    let b = b
        .canonicalize()
        .with_context(|| format!("resolving {}", b.display()))?;
    Ok(a == b)
}

/// Copy the staged archive to its final home with a progress meter, then
/// drop the staged copy. On copy failure the staged copy is kept.
fn relocate(staging_file: &Path, dest_file: &Path) -> Result<()> {
    ui::detail("Moving archive to final destination...");

    let size = staging_file
        .metadata()
        .with_context(|| format!("reading size of {}", staging_file.display()))?
        .len();

    let mut copy = archive::copy_stage(size, staging_file);
    copy.label = "Copy command".into();
    run_pipeline(
        vec![copy],
        PipelineInput::Null,
        PipelineOutput::File(dest_file.to_path_buf()),
    )?;

    std::fs::remove_file(staging_file)
        .with_context(|| format!("removing staged archive {}", staging_file.display()))?;
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────
