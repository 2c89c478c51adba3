//! # CLI Behavior
//!
//! This is **one possible UI client** for todoz, not the application itself.
//! The CLI is the only place that knows about terminal I/O, exit codes, and output formatting.
//!
//! ## Naked Execution (`todoz`)
//!
//! Running `todoz` with no arguments defaults to `todoz list`.
//!
//! ## One-shot vs. Shell
//!
//! One-shot commands (`add`, `toggle`, `edit`, ...) each load the list, apply a
//! single operation, and exit. Row labels are then simply positions in the full
//! list. `todoz shell` keeps one store alive across commands, so the filter,
//! the edit session, and row labels persist for the whole session.
//!
//! ## Loading
//!
//! The list is loaded once at startup, behind a `Loading…` indicator on
//! stderr for the configured `load-delay-ms`. Nothing else runs until it is done.
//!
//! ## Module Structure
//!
//! - `commands`: Context setup, per-command handlers, the terminal confirmation
//! - `render`: Output formatting (list rows, colors, messages)
//! - `setup`: Argument parsing via clap
//! - `shell`: The interactive session

mod commands;
mod render;
pub mod setup;
mod shell;

pub use commands::run;
