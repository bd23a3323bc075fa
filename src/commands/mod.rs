//! Subcommand handlers.
//!
//! Each file in this module corresponds to one user-facing command:
//!
//! | File         | Invocation                           | Description                     |
//! |--------------|--------------------------------------|---------------------------------|
//! | `run.rs`     | `restic-vault run PROFILE`           | Execute (or preview) a backup   |
//! | `cli.rs`     | `restic-vault cli PROFILE ARGS…`     | Engine passthrough              |
//! | `command.rs` | `restic-vault command PROFILE`       | Print the base invocation       |
//! | `dump.rs`    | `restic-vault dump DEST PROFILE…`    | Encrypted offline archives      |
//! | `decrypt.rs` | `restic-vault decrypt INPUT OUTPUT`  | Reverse a dump archive          |
//! | `list.rs`    | `restic-vault list`                  | Show configured profiles        |

pub mod cli;
pub mod command;
pub mod decrypt;
pub mod dump;
pub mod list;
pub mod run;
