//! `decrypt` — reverse an archive produced by `dump`.
//!
//! Two stages, the mirror image of the dump pipeline's tail:
//!
//! ```text
//! <input>  →  openssl enc … -d  →  zstd -dc  →  <output>
//! ```
//!
//! `-` selects stdin/stdout, and writing the raw tar stream to an
//! interactive terminal is refused outright. The input is an opaque archive
//! file; no snapshot or size logic applies here.

use std::io::IsTerminal;

use anyhow::{Result, bail};

use crate::{
    archive,
    config::{Config, expand_tilde},
    process::{PipelineInput, PipelineOutput, run_pipeline},
};

/// Decrypt and decompress `file_input` into `file_output`.
pub fn run(cfg: &Config, file_input: &str, file_output: &str) -> Result<()> {
    let password_file = cfg.dump_options()?.password_file()?;

    let input = if file_input == "-" {
        PipelineInput::Stdin
    } else {
        PipelineInput::File(expand_tilde(file_input))
    };
    let output = resolve_output(file_output, std::io::stdout().is_terminal())?;

    run_pipeline(
        vec![
            archive::decrypt_stage(&password_file),
            archive::decompress_stage(),
        ],
        input,
        output,
    )
}

/// Turn the output argument into a pipeline output.
///
/// `-` streams to stdout, but only when stdout is not an interactive
/// terminal. A tar stream on a terminal helps nobody and wrecks the
/// session, so that combination is refused before any stage spawns.
fn resolve_output(file_output: &str, stdout_is_tty: bool) -> Result<PipelineOutput> {
    if file_output != "-" {
        return Ok(PipelineOutput::File(expand_tilde(file_output)));
    }
    if stdout_is_tty {
        bail!("Stdout is a TTY. Try piping this command instead.");
    }
    Ok(PipelineOutput::Stdout)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
