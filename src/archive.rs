//! Dump-archive naming, pipeline stage builders, and the disk preflight.
//!
//! A dump archive is one snapshot's full tree, streamed out of the engine as
//! a tar stream, compressed, then encrypted:
//!
//! ```text
//! restic dump <id> /  →  pv -pterbs <size>  →  zstd -c -T8  →  openssl enc … -e  →  file
//! ```
//!
//! `decrypt` reverses the cipher and compressor only. The stage builders
//! here are pure — they produce [`Stage`] values for
//! [`crate::process::run_pipeline`] and never execute anything themselves.
//!
//! # Archive format
//!
//! The cipher parameters (AES-256-CBC, PBKDF2 with 100000 iterations over
//! SHA-512, password from a file) and the filename shape
//! `{repo}_{YYYYMMDDHHMMSS}_{short-id}.tar.zst.aes` are a durable contract:
//! archives written by older versions must stay decryptable, so neither may
//! change without a migration story.

use std::path::Path;

use anyhow::Result;
use chrono::{DateTime, FixedOffset};

use crate::{
    config::{Config, Profile},
    process::Stage,
    restic,
};

// ─── External programs ────────────────────────────────────────────────────────

const PV: &str = "pv";
const ZSTD: &str = "zstd";
const OPENSSL: &str = "openssl";

/// Cipher invocation shared by encrypt and decrypt, minus password and
/// direction.
const CIPHER_ARGS: [&str; 7] = [
    "enc",
    "-aes-256-cbc",
    "-md",
    "sha512",
    "-pbkdf2",
    "-iter",
    "100000",
];

// ─── Filename ─────────────────────────────────────────────────────────────────

/// Derived archive filename for one (repository, snapshot) pair:
/// `{repo-basename}_{YYYYMMDDHHMMSS}_{short-id}.tar.zst.aes`.
///
/// Deterministic, so dumping an already-dumped snapshot collides with the
/// existing file and is refused instead of silently duplicated.
pub fn filename(repo: &str, time: &DateTime<FixedOffset>, short_id: &str) -> String {
    let base = Path::new(repo)
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| repo.to_string());
    format!(
        "{base}_{}_{short_id}.tar.zst.aes",
        time.format("%Y%m%d%H%M%S")
    )
}

// ─── Dump stages ──────────────────────────────────────────────────────────────

/// Extraction stage: `restic <base> dump <id> /`, the snapshot's full tree
/// as a tar stream on stdout.
pub fn extract_stage(cfg: &Config, profile: &Profile, snapshot_id: &str) -> Stage {
    let mut args = restic::base_args(cfg, profile);
    args.extend(["dump".into(), snapshot_id.to_string(), "/".into()]);
    Stage::new(restic::PROGRAM, args).with_env(restic::env(profile))
}

/// Progress meter: `pv -pterbs <size>`, a pass-through that draws progress
/// against the expected byte count on stderr.
pub fn meter_stage(expected_size: u64) -> Stage {
    Stage::new(PV, vec!["-pterbs".into(), expected_size.to_string()])
}

/// Meter that reads `source` itself instead of stdin; used for the
/// staging-to-destination copy where the exact size is known.
pub fn copy_stage(actual_size: u64, source: &Path) -> Stage {
    Stage::new(PV, vec![
        "-pterbs".into(),
        actual_size.to_string(),
        source.display().to_string(),
    ])
}

/// Compressor: `zstd -c -T8`.
pub fn compress_stage() -> Stage {
    Stage::new(ZSTD, vec!["-c".into(), "-T8".into()])
}

/// Decompressor: `zstd -dc -T8`.
pub fn decompress_stage() -> Stage {
    Stage::new(ZSTD, vec!["-dc".into(), "-T8".into()])
}

/// Encryption stage for `dump`.
pub fn encrypt_stage(password_file: &Path) -> Stage {
    cipher_stage(password_file, "-e")
}

/// Decryption stage for `decrypt`.
pub fn decrypt_stage(password_file: &Path) -> Stage {
    cipher_stage(password_file, "-d")
}

fn cipher_stage(password_file: &Path, direction: &str) -> Stage {
    let mut args: Vec<String> = CIPHER_ARGS.iter().map(|s| s.to_string()).collect();
    args.push("-pass".into());
    // openssl reads the key material itself; the password never enters this
    // process.
    args.push(format!("file:{}", password_file.display()));
    args.push(direction.into());
    Stage::new(OPENSSL, args)
}

// ─── Disk preflight ───────────────────────────────────────────────────────────

/// Free bytes on the filesystem holding `path`.
///
/// Best-effort guard for the dump preflight; other processes can still eat
/// the space between the check and the write.
#[cfg(unix)]
pub fn free_space(path: &Path) -> Result<u64> {
    use std::os::unix::ffi::OsStrExt;

    use anyhow::Context;

    let cpath = std::ffi::CString::new(path.as_os_str().as_bytes())
        .with_context(|| format!("path {} contains a NUL byte", path.display()))?;

    // statvfs fills the zeroed struct on success.
    let mut stats: libc::statvfs = unsafe { std::mem::zeroed() };
    let rc = unsafe { libc::statvfs(cpath.as_ptr(), &mut stats) };
    if rc != 0 {
        return Err(std::io::Error::last_os_error())
            .with_context(|| format!("statvfs {}", path.display()));
    }

    Ok(stats.f_bavail as u64 * stats.f_frsize as u64)
}

/// The pipeline utilities are Unix-only, and so is the preflight.
#[cfg(not(unix))]
pub fn free_space(_path: &Path) -> Result<u64> {
    anyhow::bail!("dump archives are only supported on Unix systems")
}

// ─── Tests ────────────────────────────────────────────────────────────────────
