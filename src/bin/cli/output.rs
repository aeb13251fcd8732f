//! Output formatting for CLI operations.

use serde_json::json;
use uncompress::{Error, TaskResult};

/// Trait for output formatting
pub trait OutputFormatter {
    /// Formats a successful task result
    fn format_result(&self, result: &TaskResult) -> String;

    /// Formats a task failure
    fn format_error(&self, error: &Error) -> String;
}

/// Human-readable output formatter
pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_result(&self, result: &TaskResult) -> String {
        let status = if result.changed { "changed" } else { "ok" };
        let mut details = Vec::new();
        if result.content_changed {
            details.push("content written");
        }
        if result.metadata_changed {
            details.push("metadata updated");
        }

        let mut output = format!("{}: {} ({})", status, result.dest.display(), result.format);
        if !details.is_empty() {
            output.push_str(&format!(", {}", details.join(", ")));
        }
        output
    }

    fn format_error(&self, error: &Error) -> String {
        format!("Error: {}", error)
    }
}

/// JSON output formatter
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_result(&self, result: &TaskResult) -> String {
        json!({
            "changed": result.changed,
            "dest": result.dest.display().to_string(),
            "content_changed": result.content_changed,
            "metadata_changed": result.metadata_changed,
            "format": result.format,
        })
        .to_string()
    }

    fn format_error(&self, error: &Error) -> String {
        json!({
            "failed": true,
            "msg": error.to_string(),
        })
        .to_string()
    }
}

/// Creates a formatter based on output format
pub fn create_formatter(format: super::OutputFormat) -> Box<dyn OutputFormatter> {
    match format {
        super::OutputFormat::Human => Box::new(HumanFormatter),
        super::OutputFormat::Json => Box::new(JsonFormatter),
    }
}
