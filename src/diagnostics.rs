//! Diagnostics collected while preprocessing a project tree.
//!
//! Most problems found while expanding macros are not fatal. An unresolvable
//! hook target leaves the invocation in place and a malformed file is skipped,
//! but both are worth reporting once the run is over. [`Diagnostics`] gathers
//! these reports from all worker threads.
//!
//! # Key Components
//!
//! - [`Diagnostics`] - Thread-safe container for diagnostic entries
//! - [`Diagnostic`] - One entry, with the file and token it concerns
//! - [`DiagnosticSeverity`] - Severity level (Warning, Error)
//! - [`DiagnosticCategory`] - What kind of step produced the entry
//!
//! # Usage Examples
//!
//! ```rust
//! use gdmake::diagnostics::{DiagnosticCategory, Diagnostics};
//!
//! let diagnostics = Diagnostics::new();
//!
//! diagnostics.unresolved_hook("src/menu.cpp", "MenuLayer::nope");
//! diagnostics.skipped_file("src/broken.cpp", DiagnosticCategory::Parse, "Unclosed function body");
//!
//! assert_eq!(diagnostics.warning_count(), 1);
//! assert!(diagnostics.has_errors());
//! println!("{}", diagnostics.summary());
//! ```
//!
//! # Thread Safety
//!
//! [`Diagnostics`] stores entries in a `boxcar::Vec`, so files processed in
//! parallel append without locking.

use std::{
    fmt::{self, Write},
    path::{Path, PathBuf},
};

use strum::Display;

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DiagnosticSeverity {
    /// Something was left as written.
    ///
    /// The output still compiles, but a hook or command may be inert.
    #[strum(serialize = "WARN")]
    Warning,

    /// A file could not be processed and its destination was not touched.
    #[strum(serialize = "ERROR")]
    Error,
}

/// Category indicating which step produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum DiagnosticCategory {
    /// A hook target could not be resolved to an address.
    Resolution,

    /// A macro invocation or signature could not be decomposed.
    Parse,

    /// Reading or writing a file failed.
    Io,

    /// Anything else, such as directory enumeration.
    General,
}

/// A single diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// Category indicating the source of this diagnostic.
    pub category: DiagnosticCategory,

    /// Human-readable description of the issue.
    pub message: String,

    /// Source file the issue was found in.
    pub file: Option<PathBuf>,

    /// Source token the issue concerns, e.g. an unresolved hook target.
    pub token: Option<String>,
}

impl Diagnostic {
    /// Creates a new diagnostic entry.
    ///
    /// # Arguments
    ///
    /// * `severity` - Severity level of the diagnostic
    /// * `category` - Category of the diagnostic source
    /// * `message` - Human-readable description
    pub fn new(
        severity: DiagnosticSeverity,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            category,
            message: message.into(),
            file: None,
            token: None,
        }
    }

    /// Adds the source file to the diagnostic.
    #[must_use]
    pub fn with_file(mut self, file: impl AsRef<Path>) -> Self {
        self.file = Some(file.as_ref().to_path_buf());
        self
    }

    /// Adds the offending source token to the diagnostic.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.category, self.message)?;

        if let Some(token) = &self.token {
            write!(f, " '{}'", token)?;
        }

        if let Some(file) = &self.file {
            write!(f, " ({})", file.display())?;
        }

        Ok(())
    }
}

/// Thread-safe container for collecting diagnostic entries.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Records a hook whose target could not be resolved and was left inert.
    pub fn unresolved_hook(&self, file: impl AsRef<Path>, token: impl Into<String>) {
        self.push(
            Diagnostic::new(
                DiagnosticSeverity::Warning,
                DiagnosticCategory::Resolution,
                "Unable to create hook, not a valid address",
            )
            .with_file(file)
            .with_token(token),
        );
    }

    /// Records a file that was skipped, leaving its destination untouched.
    pub fn skipped_file(
        &self,
        file: impl AsRef<Path>,
        category: DiagnosticCategory,
        message: impl Into<String>,
    ) {
        self.push(Diagnostic::new(DiagnosticSeverity::Error, category, message).with_file(file));
    }

    /// Adds a diagnostic entry directly, for entries that carry a file or token.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any error-level diagnostics have been collected.
    pub fn has_errors(&self) -> bool {
        self.with_severity(DiagnosticSeverity::Error).next().is_some()
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns the number of error-level diagnostics.
    pub fn error_count(&self) -> usize {
        self.with_severity(DiagnosticSeverity::Error).count()
    }

    /// Returns the number of warning-level diagnostics.
    pub fn warning_count(&self) -> usize {
        self.with_severity(DiagnosticSeverity::Warning).count()
    }

    /// Returns an iterator over all diagnostics, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns an iterator over diagnostics of one severity.
    pub fn with_severity(
        &self,
        severity: DiagnosticSeverity,
    ) -> impl Iterator<Item = &Diagnostic> {
        self.iter().filter(move |d| d.severity == severity)
    }

    /// Returns diagnostics filtered by category.
    pub fn by_category(&self, category: DiagnosticCategory) -> Vec<&Diagnostic> {
        self.iter().filter(|d| d.category == category).collect()
    }

    /// Formats a summary of all diagnostics for display.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let error_count = self.error_count();
        let warning_count = self.warning_count();

        let _ = writeln!(
            output,
            "Diagnostics: {} error(s), {} warning(s)",
            error_count, warning_count
        );

        if error_count > 0 {
            output.push_str("\nErrors:\n");
            for diag in self.with_severity(DiagnosticSeverity::Error) {
                let _ = writeln!(output, "  {diag}");
            }
        }

        if warning_count > 0 {
            output.push_str("\nWarnings:\n");
            for diag in self.with_severity(DiagnosticSeverity::Warning) {
                let _ = writeln!(output, "  {diag}");
            }
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_diagnostic_with_context() {
        let diag = Diagnostic::new(
            DiagnosticSeverity::Warning,
            DiagnosticCategory::Resolution,
            "Unknown hook address",
        )
        .with_file("src/menu.cpp")
        .with_token("MenuLayer::nope");

        assert_eq!(diag.file.as_deref(), Some(Path::new("src/menu.cpp")));
        assert_eq!(diag.token.as_deref(), Some("MenuLayer::nope"));

        let display = diag.to_string();
        assert_eq!(
            display,
            "[WARN] Resolution: Unknown hook address 'MenuLayer::nope' (src/menu.cpp)"
        );
    }

    #[test]
    fn test_diagnostics_container() {
        let diagnostics = Diagnostics::new();
        assert_eq!(diagnostics.count(), 0);
        assert!(!diagnostics.has_errors());

        diagnostics.unresolved_hook("a.cpp", "Nope::nope");
        diagnostics.skipped_file("b.cpp", DiagnosticCategory::Io, "permission denied");

        assert_eq!(diagnostics.count(), 2);
        assert_eq!(diagnostics.error_count(), 1);
        assert_eq!(diagnostics.warning_count(), 1);
        assert!(diagnostics.has_errors());

        let io = diagnostics.by_category(DiagnosticCategory::Io);
        assert_eq!(io.len(), 1);
        assert_eq!(io[0].file.as_deref(), Some(Path::new("b.cpp")));
        assert_eq!(io[0].token, None);

        let unresolved = diagnostics.by_category(DiagnosticCategory::Resolution);
        assert_eq!(unresolved[0].severity, DiagnosticSeverity::Warning);
        assert_eq!(unresolved[0].token.as_deref(), Some("Nope::nope"));
    }

    #[test]
    fn test_diagnostics_thread_safety() {
        let diagnostics = Arc::new(Diagnostics::new());
        let mut handles = vec![];

        for i in 0..10 {
            let diag_clone = Arc::clone(&diagnostics);
            handles.push(thread::spawn(move || {
                diag_clone.unresolved_hook(format!("file{}.cpp", i), "Nope::nope");
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(diagnostics.warning_count(), 10);
    }

    #[test]
    fn test_summary() {
        let diagnostics = Diagnostics::new();
        diagnostics.skipped_file("bad.cpp", DiagnosticCategory::Parse, "Unclosed body");

        let summary = diagnostics.summary();
        assert!(summary.starts_with("Diagnostics: 1 error(s), 0 warning(s)"));
        assert!(summary.contains("[ERROR] Parse: Unclosed body (bad.cpp)"));
        assert!(!summary.contains("Warnings:"));
    }
}
