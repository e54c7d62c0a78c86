//! # CLI Behavior
//!
//! This is **one possible UI client** for questlog, not the application itself.
//! It is the only place that knows about terminal I/O, prompts and exit codes.
//!
//! ### Naked Execution (`questlog`)
//!
//! Running `questlog` with no arguments shows the dashboard (`questlog stats`).
//!
//! ### Confirmations
//!
//! The library refuses destructive operations without a consent value. The CLI
//! obtains it like this:
//!
//! - `questlog import FILE` shows what will be overwritten and asks once.
//!   `--yes` skips the prompt.
//! - `questlog clear` asks twice. `-y` answers the first prompt, `-yy` both.
//!
//! Declining a prompt is not an error: nothing changes and the command exits 0.
//! Without a terminal to ask on, prompts are answered "no".
//!
//! ### Corrupt saved data
//!
//! If the saved data cannot be read, every command fails and leaves the file in
//! place. `--reset-corrupt` starts from an empty tracker instead; the old file is
//! overwritten by the next change.
//!
//! ## Module Structure
//!
//! - `setup`: argument parsing via clap
//! - `commands`: per-command handlers that call the API and print results
//! - `render`: output formatting (lists, stats, messages)

mod commands;
mod render;
pub mod setup;

pub use commands::run;
