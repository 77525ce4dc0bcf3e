//! Terminal I/O utilities for CLI.
//!
//! Provides TTY detection and status chatter kept off stdout.

use std::io::{self, IsTerminal};

pub fn is_stderr_tty() -> bool {
    io::stderr().is_terminal()
}

/// Print a status message to stderr if running in a terminal.
/// Keeps stdout clean JSON for CI consumers.
pub fn status(message: &str) {
    if is_stderr_tty() {
        eprintln!("{}", message);
    }
}
