//! TTY detection.
//!
//! Interactive terminals get colored output by default; pipes and redirects
//! get plain text so the result can be processed by other tools.

use is_terminal::IsTerminal;

/// Detect whether stdout is connected to an interactive terminal.
#[must_use]
pub fn is_interactive() -> bool {
    std::io::stdout().is_terminal()
}

/// Check if colors are allowed by the environment.
///
/// Follows the [NO_COLOR](https://no-color.org/) standard and treats a
/// `dumb` terminal as colorless.
#[must_use]
pub fn colors_allowed() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }

    !std::env::var("TERM").is_ok_and(|t| t == "dumb")
}
