//! Diagnostic formatting for better error messages
//!
//! This module renders errors and warnings with the offending source line
//! and a caret under the column where the problem starts.

use super::{QuillError, SourceLocation};
use colored::Colorize;

/// How serious a diagnostic is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Makes the program invalid
    Error,
    /// Reported, but the program stays valid
    Warning,
}

/// Diagnostic information for displaying errors with context
pub struct Diagnostic {
    error: QuillError,
    severity: Severity,
    source: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic from an error
    pub fn new(error: QuillError) -> Self {
        Self {
            error,
            severity: Severity::Error,
            source: None,
        }
    }

    /// Create a diagnostic with source code context
    pub fn with_source(error: QuillError, source: &str) -> Self {
        Self {
            error,
            severity: Severity::Error,
            source: Some(source.to_string()),
        }
    }

    /// Override the severity (errors are the default)
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Format the diagnostic with color and context
    pub fn format(&self) -> String {
        let mut output = String::new();
        let location = self.error.location();

        // Header
        let header = match self.severity {
            Severity::Error => self.error.kind().to_string().red().bold(),
            Severity::Warning => format!("{} Warning", self.error.category()).yellow().bold(),
        };
        output.push_str(&format!(
            "{} at line {}, column {}: ",
            header, location.line, location.column
        ));
        output.push_str(&self.error.message());
        output.push('\n');

        // Location and source context
        output.push_str(&format!("  {} {}\n", "-->".blue().bold(), location));

        if let Some(ref source) = self.source {
            output.push_str(&self.format_source_context(source, location));
        }

        output
    }

    /// Format source code context around the error location
    fn format_source_context(&self, source: &str, location: &SourceLocation) -> String {
        let mut output = String::new();
        let lines: Vec<&str> = source.lines().collect();

        if location.line == 0 || location.line > lines.len() {
            return output;
        }

        let line_idx = location.line - 1;
        let line_num_width = (location.line + 1).to_string().len();

        // Show previous line if available
        if line_idx > 0 {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line_idx, width = line_num_width).blue(),
                lines[line_idx - 1]
            ));
        }

        // Show error line
        output.push_str(&format!(
            "  {} {}\n",
            format!("{:width$}", location.line, width = line_num_width)
                .blue()
                .bold(),
            lines[line_idx]
        ));

        // Show error indicator
        let indicator_padding = " ".repeat(line_num_width + 3 + location.column.saturating_sub(1));
        let caret = match self.severity {
            Severity::Error => "^".red().bold(),
            Severity::Warning => "^".yellow().bold(),
        };
        output.push_str(&format!("{}{}\n", indicator_padding, caret));

        // Show next line if available
        if line_idx + 1 < lines.len() {
            output.push_str(&format!(
                "  {} {}\n",
                format!("{:width$}", line_idx + 2, width = line_num_width).blue(),
                lines[line_idx + 1]
            ));
        }

        output
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.format())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{LexErrorKind, SemanticErrorKind};

    #[test]
    fn test_diagnostic_without_source() {
        let loc = SourceLocation::at(1, 1);
        let err = QuillError::lexical(LexErrorKind::InvalidChar, "@", loc);
        let diag = Diagnostic::new(err);

        let formatted = diag.format();
        assert!(formatted.contains("Lexical Error"));
        assert!(formatted.contains("Invalid character '@'"));
    }

    #[test]
    fn test_diagnostic_with_source() {
        let source = "int x;\nx = @;\nprint x;";
        let loc = SourceLocation::at(2, 5);
        let err = QuillError::lexical(LexErrorKind::InvalidChar, "@", loc);
        let diag = Diagnostic::with_source(err, source);

        let formatted = diag.format();
        assert!(formatted.contains("Lexical Error"));
        assert!(formatted.contains("x = @;"));
        assert!(formatted.contains("print x;"));
    }

    #[test]
    fn test_warning_header() {
        let err = QuillError::semantic(
            SemanticErrorKind::UninitializedVariable,
            "x",
            SourceLocation::at(1, 13),
        );
        let formatted = Diagnostic::new(err).severity(Severity::Warning).format();

        assert!(formatted.contains("Semantic Warning"));
        assert!(!formatted.contains("Semantic Error"));
        assert!(formatted.contains("line 1, column 13"));
    }
}
