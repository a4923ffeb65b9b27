//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a success message
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

/// Print a warning message
pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

/// Colorize a health classification string
pub fn color_classification(classification: &str) -> String {
    match classification {
        "excellent" => classification.green().bold().to_string(),
        "good" => classification.green().to_string(),
        "fair" => classification.yellow().to_string(),
        "needs_optimization" => classification.red().bold().to_string(),
        other => other.to_string(),
    }
}

/// Colorize a component status string
pub fn color_status(status: &str) -> String {
    match status {
        "healthy" => status.green().to_string(),
        "degraded" => status.yellow().to_string(),
        "unhealthy" => status.red().bold().to_string(),
        other => other.to_string(),
    }
}

/// Format a metric value for display, using units where the name implies them
pub fn format_metric_value(metric: &str, value: f64) -> String {
    if metric.ends_with("_bytes") {
        format_bytes(value as u64)
    } else if metric.ends_with("_percent") {
        format!("{:.1}%", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Format bytes as human-readable string
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2}Gi", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2}Mi", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2}Ki", bytes as f64 / KB as f64)
    } else {
        format!("{}B", bytes)
    }
}

/// Format a unix timestamp for display
pub fn format_timestamp(timestamp: i64) -> String {
    chrono::DateTime::from_timestamp(timestamp, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}
