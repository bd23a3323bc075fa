//! Terminal presentation — status lines, warnings, and the fatal error line.
//!
//! # Design goals
//!
//! - **One voice.** Every line the tool prints goes through these helpers, so the prefix and
//!   color conventions stay consistent across subcommands.
//! - **Status to stdout, trouble to stderr.** Informational and key/value lines go to stdout
//!   (they are the command's output); warnings and the fatal error line go to stderr so they
//!   survive redirection of the useful output.
//! - **A single fatal path.** Nothing here terminates the process. Fatal conditions travel up
//!   as `anyhow::Error` values and `main` prints them via [`print_error`] before exiting.
//!
//! Engine queries that capture output run behind an indeterminate spinner via
//! [`with_spinner`] so the terminal shows activity while the engine walks its
//! repository.

use std::time::Duration;

use console::style;
use indicatif::{HumanBytes, ProgressBar, ProgressStyle};

// ─── Status lines ─────────────────────────────────────────────────────────────

/// Print a top-level status line: `:: <msg>`.
pub fn info(msg: &str) {
    println!("{} {msg}", style("::").cyan().bold());
}

/// Print a nested status line, indented under the current [`info`] line.
pub fn detail(msg: &str) {
    println!("   {} {msg}", style("►").dim());
}

/// Print a nested success line with a green `Success!` marker.
pub fn success(msg: &str) {
    println!("   {} {msg}", style("Success!").green().bold());
}

/// Print a `key: value` line with a highlighted key.
///
/// Indentation is the caller's business — pass `"  repo"` to nest under a
/// previous entry, the way `list` renders profile fields.
pub fn key_val(key: &str, value: &str) {
    println!("{} {value}", style(format!("{key}:")).cyan().bold());
}

/// Print a non-fatal warning line to stderr.
pub fn warn(msg: &str) {
    eprintln!("{} {msg}", style("Warning:").yellow().bold());
}

/// Print a fatal error line to stderr.
///
/// The alternate format includes the context chain (`opening config: No such
/// file…`) but never a backtrace — the message is all the operator gets.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {err:#}", style("Error:").red().bold());
}

// ─── Spinner ──────────────────────────────────────────────────────────────────

/// Braille spinner frames.
static SPINNER: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏";

/// Run `f` behind an indeterminate spinner labelled `label`.
///
/// The spinner ticks on its own thread and is cleared once `f` returns, so
/// nothing of it remains in the scrollback. The three-space indent lines it
/// up under the surrounding [`detail`] output. Must not wrap anything that
/// writes to the terminal itself — the dump pipeline's meter owns stderr
/// while it runs, so the pipeline never goes through here.
pub fn with_spinner<T>(label: &str, f: impl FnOnce() -> T) -> T {
    let bar_style = ProgressStyle::with_template("   {spinner:.cyan} {msg}")
        .unwrap()
        .tick_chars(SPINNER);
    let spinner = ProgressBar::new_spinner().with_style(bar_style);
    spinner.set_message(style(label).dim().to_string());
    spinner.enable_steady_tick(Duration::from_millis(80));

    let result = f();
    spinner.finish_and_clear();
    result
}

// ─── Formatting ───────────────────────────────────────────────────────────────

/// Format a byte count for human eyes, e.g. `1.2 GiB`.
pub fn human_bytes(bytes: u64) -> String {
    HumanBytes(bytes).to_string()
}

// ─── Tests ────────────────────────────────────────────────────────────────────
