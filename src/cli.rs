//! Command-line argument types.
//!
//! Everything `clap` touches is confined to this module; the handlers in
//! [`crate::commands`] receive plain strings and booleans and never see the
//! parser. `main` parses exactly once and dispatches on [`Subcommand`].

use std::path::PathBuf;

use clap::Parser;

/// Top-level CLI arguments, shared across every subcommand.
#[derive(Parser, Debug)]
#[command(
    name    = "restic-vault",
    about   = "A profile-driven restic wrapper with encrypted offline dumps",
    version,
    // Name and version on one line, then usage and the argument table.
    help_template = "\
{before-help}{name} {version}
{about}

{usage-heading} {usage}

{all-args}{after-help}"
)]
pub struct Cli {
    /// Path to the configuration file.
    ///
    /// Defaults to `.restic-vault.toml` in your home directory.  Use
    /// `--config /path/to/other.toml` to point at a different config, e.g.
    /// from a cron job that manages several vaults.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Subcommand,
}

/// One variant per subcommand; handlers live in [`crate::commands`].
#[derive(clap::Subcommand, Debug, PartialEq)]
pub enum Subcommand {
    /// Execute a backup profile.
    ///
    /// Without `--go` this is a dry run: the engine arguments are printed,
    /// shell-quoted, and nothing is executed.
    Run {
        /// Name of the profile to back up.
        profile: String,

        /// Actually execute the backup instead of printing it.
        #[arg(short, long)]
        go: bool,
    },

    /// Run the engine directly with a profile's base arguments.
    ///
    /// Everything after the profile name is passed to restic untouched, so
    /// `restic-vault cli home snapshots --json` works as expected.
    Cli {
        /// Name of the profile supplying repo and credentials.
        profile: String,

        /// Arguments forwarded to restic verbatim.
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the base engine invocation for scripting.
    ///
    /// Written without a trailing newline so it composes with command
    /// substitution: `$(restic-vault command home) snapshots`.
    Command {
        /// Name of the profile to render.
        profile: String,
    },

    /// Dump snapshots as encrypted, compressed archives.
    ///
    /// Each snapshot becomes a `.tar.zst.aes` file at DESTINATION.  Only
    /// works on Unix systems (the pipeline utilities are Unix-only).
    Dump {
        /// Directory that receives the finished archives.
        destination: String,

        /// Name of the profile whose repository is dumped.
        profile: String,

        /// Snapshot ids to dump; defaults to 'latest'.
        snapshots: Vec<String>,
    },

    /// Decrypt and decompress an archive produced by `dump`.
    ///
    /// Pass `-` to read from stdin or write to stdout.
    Decrypt {
        /// Archive to read, or `-` for stdin.
        file_input: String,

        /// Tar file to write, or `-` for stdout.
        file_output: String,
    },

    /// List the profiles defined in the config file.
    List,
}

// ─── Tests ────────────────────────────────────────────────────────────────────
