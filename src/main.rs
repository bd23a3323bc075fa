//! `restic-vault` — a profile-driven restic wrapper with encrypted offline dumps.
//!
//! # Overview
//!
//! This binary is a thin orchestration layer around [`restic`](https://restic.net).
//! Profiles in a single TOML config describe repositories and what goes into
//! them; subcommands turn a profile into engine invocations, and `dump`
//! chains the engine with a progress meter, compressor, and cipher to
//! produce portable encrypted archives that survive without the repository.
//!
//! # Usage
//!
//! ```text
//! restic-vault run home                      # preview the backup invocation
//! restic-vault run home --go                 # actually run it
//! restic-vault cli home snapshots --json     # raw engine passthrough
//! restic-vault command home                  # print the base invocation
//! restic-vault dump /media/usb home          # encrypted offline archive
//! restic-vault decrypt a.tar.zst.aes a.tar   # reverse a dump
//! restic-vault list                          # show configured profiles
//! ```
//!
//! # Module layout
//!
//! | Module       | Responsibility                             |
//! |--------------|--------------------------------------------|
//! | [`cli`]      | Argument types parsed by clap              |
//! | [`config`]   | `Config` struct + TOML loader              |
//! | [`restic`]   | Engine argument/environment construction   |
//! | [`process`]  | Foreground, captured, and piped execution  |
//! | [`snapshot`] | Snapshot metadata queries                  |
//! | [`archive`]  | Archive naming, stages, disk preflight     |
//! | [`ui`]       | Terminal presentation                      |
//! | [`commands`] | One handler per subcommand                 |
//!
//! # Exit behavior
//!
//! `main` is the single fatal exit point: every error bubbles up here as an
//! `anyhow::Error`, is printed as one red line, and sets the exit status.
//! When a checked subprocess failed, its own exit code is propagated;
//! everything else exits 1.

mod archive;
mod cli;
mod commands;
mod config;
mod process;
mod restic;
mod snapshot;
mod ui;

use clap::Parser;
use cli::{Cli, Subcommand};

fn main() {
    if let Err(err) = run() {
        ui::print_error(&err);
        let code = err
            .downcast_ref::<process::CommandFailed>()
            .map_or(1, |failed| failed.code);
        std::process::exit(code);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_path()?,
    };
    let cfg = config::load_config(&config_path)?;

    // Odd but harmless: warn once and carry on, so `list` and `--help`
    // still work against a skeleton config. Profile lookups fail later
    // with their own message.
    if cfg.profiles.is_empty() {
        ui::warn("No profiles defined in config");
    }

    match &cli.command {
        Subcommand::Run { profile, go } => commands::run::run(&cfg, profile, *go),
        Subcommand::Cli { profile, args } => commands::cli::run(&cfg, profile, args),
        Subcommand::Command { profile } => commands::command::run(&cfg, profile),
        Subcommand::Dump {
            destination,
            profile,
            snapshots,
        } => commands::dump::run(&cfg, destination, profile, snapshots),
        Subcommand::Decrypt {
            file_input,
            file_output,
        } => commands::decrypt::run(&cfg, file_input, file_output),
        Subcommand::List => commands::list::run(&cfg),
    }
}
