//! Progress indicators
//!
//! Spinners for network calls and a percentage bar for parcel progress.
//! Both are hidden when nobody is watching the terminal.

use indicatif::ProgressStyle;

pub use indicatif::ProgressBar;
use std::time::Duration;

fn attended(pb: ProgressBar) -> ProgressBar {
    if console::user_attended_stderr() {
        pb
    } else {
        ProgressBar::hidden()
    }
}

/// Create a spinner for indeterminate progress
pub fn spinner(message: &str) -> ProgressBar {
    let pb = attended(ProgressBar::new_spinner());
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// A spinner, or a hidden bar when `visible` is false (e.g. JSON output)
pub fn spinner_if(visible: bool, message: &str) -> ProgressBar {
    if visible {
        spinner(message)
    } else {
        ProgressBar::hidden()
    }
}

/// Create a 0-100 bar for delivery progress
pub fn delivery_progress(message: &str) -> ProgressBar {
    let pb = attended(ProgressBar::new(100));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {pos}%")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message(message.to_string());
    pb
}

/// Move a delivery bar to `percent`
pub fn set_delivery_progress(pb: &ProgressBar, percent: f64) {
    pb.set_position(percent.clamp(0.0, 100.0).round() as u64);
}

/// Finish a progress bar with a success message
pub fn finish_success(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✓ {message}"));
}

/// Finish a progress bar with an error message
pub fn finish_error(pb: &ProgressBar, message: &str) {
    pb.finish_with_message(format!("✗ {message}"));
}
