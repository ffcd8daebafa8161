//! Terminal message styling.
//!
//! Uses the anstyle ecosystem: anstream for auto-detecting color support
//! (NO_COLOR, CLICOLOR_FORCE, terminal capabilities) and color-print for
//! embedded styling in message text.
//!
//! ## stdout vs stderr principle
//!
//! - **stdout**: gitlink results (paths, URLs) and status messages
//! - **stderr**: interactive prompts, so they appear even when stdout is
//!   redirected (e.g. `$EDITOR $(gitlink open ...)`)

use color_print::{cformat, cstr};

pub use anstream::{eprint, eprintln, print, println};

/// Progress symbol (cyan ◎)
pub const PROGRESS_SYMBOL: &str = cstr!("<cyan>◎</>");

/// Success symbol (green ✓)
pub const SUCCESS_SYMBOL: &str = cstr!("<green>✓</>");

/// Error symbol (red ✗)
pub const ERROR_SYMBOL: &str = cstr!("<red>✗</>");

/// Warning symbol (yellow ▲)
pub const WARNING_SYMBOL: &str = cstr!("<yellow>▲</>");

/// Hint symbol (dim ↳)
pub const HINT_SYMBOL: &str = cstr!("<dim>↳</>");

/// Info symbol (dim ○) - for neutral status
pub const INFO_SYMBOL: &str = cstr!("<dim>○</>");

/// Prompt symbol (cyan ❯) - for questions requiring user input
pub const PROMPT_SYMBOL: &str = cstr!("<cyan>❯</>");

/// Format an error message with symbol and red styling.
///
/// Content can include inner styling like `<bold>`:
/// ```
/// use color_print::cformat;
/// use gitlink::styling::error_message;
///
/// let branch = "dev";
/// println!("{}", error_message(cformat!("Branch <bold>{branch}</> not found")));
/// ```
pub fn error_message(content: impl AsRef<str>) -> String {
    cformat!("{ERROR_SYMBOL} <red>{}</>", content.as_ref())
}

/// Format a hint message with symbol and dim styling
pub fn hint_message(content: impl AsRef<str>) -> String {
    cformat!("{HINT_SYMBOL} <dim>{}</>", content.as_ref())
}

/// Format a warning message with symbol and yellow styling
pub fn warning_message(content: impl AsRef<str>) -> String {
    cformat!("{WARNING_SYMBOL} <yellow>{}</>", content.as_ref())
}

/// Format a success message with symbol and green styling
pub fn success_message(content: impl AsRef<str>) -> String {
    cformat!("{SUCCESS_SYMBOL} <green>{}</>", content.as_ref())
}

/// Format a progress message with symbol and cyan styling
pub fn progress_message(content: impl AsRef<str>) -> String {
    cformat!("{PROGRESS_SYMBOL} <cyan>{}</>", content.as_ref())
}

/// Format an info message with symbol (no color on text - neutral status)
pub fn info_message(content: impl AsRef<str>) -> String {
    format!("{INFO_SYMBOL} {}", content.as_ref())
}
