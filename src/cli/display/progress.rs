//! Spinner utilities using indicatif for terminal output.
//!
//! Spinners draw to stderr, so they never mix with `--json` output on stdout.

use indicatif::{ProgressBar, ProgressStyle};
use std::future::Future;
use std::time::Duration;

const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg} [{elapsed}]";
const SPINNER_CHARS: &str = "⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ";

/// Create a spinner for indeterminate operations
pub fn create_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars(SPINNER_CHARS);
    spinner.set_style(style);
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

/// Awaits `future` behind a spinner; no spinner in JSON mode.
pub async fn with_spinner<F, T>(json_mode: bool, message: &str, future: F) -> T
where
    F: Future<Output = T>,
{
    if json_mode {
        return future.await;
    }
    let spinner = create_spinner(message);
    let result = future.await;
    spinner.finish_and_clear();
    result
}
