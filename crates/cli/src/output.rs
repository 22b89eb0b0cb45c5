//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use owo_colors::OwoColorize;

/// Status message helpers
pub struct Status;

impl Status {
    /// Print a success message
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Print an error message
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print a warning message
    pub fn warning(message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print an info message
    pub fn info(message: &str) {
        println!("{} {}", "ℹ".blue(), message);
    }

    /// Print a header
    pub fn header(message: &str) {
        println!();
        println!("{}", message.bold());
        println!("{}", "─".repeat(message.chars().count()));
    }

    /// Print an aligned `label: value` line
    pub fn field(label: &str, value: impl std::fmt::Display) {
        println!("  {:<14} {}", format!("{label}:").dimmed(), value);
    }
}

/// Format a duration for display
///
/// Sub-minute durations keep their precision; longer ones round to minutes
/// and carry hours and days, as delivery estimates do.
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 1.0 {
        return format!("{:.0}ms", secs * 1000.0);
    }
    if secs < 60.0 {
        return format!("{secs:.1}s");
    }

    let total_mins = (secs / 60.0).round() as u64;
    let (days, hours, mins) = (total_mins / 1440, (total_mins / 60) % 24, total_mins % 60);
    match (days, hours) {
        (0, 0) => format!("{mins}m"),
        (0, _) => format!("{hours}h {mins}m"),
        _ => format!("{days}d {hours}h {mins}m"),
    }
}

/// Format a distance in kilometers
pub fn format_distance(km: f64) -> String {
    if km < 1.0 {
        format!("{:.0} m", km * 1000.0)
    } else if km < 100.0 {
        format!("{km:.1} km")
    } else {
        format!("{km:.0} km")
    }
}

/// Format an amount in dollars with two decimals
pub fn format_currency(amount: f64) -> String {
    format!("${amount:.2}")
}

/// Format a percentage with no decimals
pub fn format_percent(value: f64) -> String {
    format!("{:.0}%", value.clamp(0.0, 100.0))
}

/// Format a count with singular/plural
pub fn format_count(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_format_duration_ms() {
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
    }

    #[test]
    fn test_format_duration_secs() {
        assert_eq!(format_duration(Duration::from_secs_f32(5.5)), "5.5s");
    }

    #[test]
    fn test_format_duration_mins() {
        assert_eq!(format_duration(Duration::from_secs(125)), "2m");
    }

    #[test]
    fn test_format_duration_hours() {
        // 2h handling plus 559 km at 50 km/h
        let transit = Duration::from_secs_f64((2.0 + 559.0 / 50.0) * 3600.0);
        assert_eq!(format_duration(transit), "13h 11m");
    }

    #[test]
    fn test_format_duration_days() {
        assert_eq!(format_duration(Duration::from_secs(26 * 3600 + 60)), "1d 2h 1m");
    }

    #[test]
    fn test_format_distance() {
        assert_eq!(format_distance(0.25), "250 m");
        assert_eq!(format_distance(12.34), "12.3 km");
        assert_eq!(format_distance(559.12), "559 km");
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(18.0), "$18.00");
        assert_eq!(format_currency(100.62), "$100.62");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(25.0), "25%");
        assert_eq!(format_percent(140.0), "100%");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(1, "shipment", "shipments"), "1 shipment");
        assert_eq!(format_count(5, "shipment", "shipments"), "5 shipments");
    }
}
