//! Terminal output utilities
//!
//! Provides consistent formatting for CLI output.

use hooksig_core::WebhookVerificationError;
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

    /// Print a rejected delivery with its code and category
    pub fn rejected(err: &WebhookVerificationError) {
        eprintln!("{} {}", "✗".red(), format_rejection(err));
    }

    /// Print an aligned `key: value` detail line
    pub fn field(key: &str, value: &str) {
        println!("  {} {}", format!("{key}:").dimmed(), value);
    }
}

/// One-line description of a verification failure
pub fn format_rejection(err: &WebhookVerificationError) -> String {
    let code = err.code();
    if code.is_authenticity_failure() {
        format!("[{}] Delivery rejected ({}): {}", code, code.category(), err)
    } else {
        format!("[{}] Authentic delivery, unusable body: {}", code, err)
    }
}

/// Format a payload size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
