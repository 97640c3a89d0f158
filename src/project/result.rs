//! Preprocessing result types and statistics.

use std::path::PathBuf;

use crate::{
    diagnostics::Diagnostics,
    parser::{debug::DebugCommand, hook::Hook},
    processor::FileOutcome,
};

/// Result of preprocessing a project tree.
///
/// Holds the aggregated hooks and debug commands of every file that could be
/// processed, plus counts and diagnostics for the run.
///
/// # Usage
///
/// ```rust,no_run
/// use gdmake::project::{Preprocessor, PreprocessResult};
///
/// # fn main() -> gdmake::Result<()> {
/// let result: PreprocessResult = Preprocessor::new("mod/src", "mod/build/src").run()?;
///
/// if result.is_complete_success() {
///     println!("{} hooks in {} files", result.hooks.len(), result.success_count());
/// } else {
///     for (file, error) in &result.failed_files {
///         println!("{}: {}", file.display(), error);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct PreprocessResult {
    /// All hooks, ordered by source file and then by position in the file
    pub hooks: Vec<Hook>,
    /// All debug commands, in the same order
    pub commands: Vec<DebugCommand>,
    /// Files that could not be processed (file path, error message)
    pub failed_files: Vec<(PathBuf, String)>,
    /// Number of files processed successfully
    pub processed_count: usize,
    /// Number of destination files (re)written
    pub written_count: usize,
    /// Number of destination files left as they were
    pub unchanged_count: usize,
    /// Number of files that failed
    pub failed_count: usize,
    /// Number of expanded macro invocations
    pub macro_count: usize,
    /// Diagnostics collected during the run
    pub diagnostics: Diagnostics,
}

impl PreprocessResult {
    /// Create a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if every file was processed.
    pub fn is_complete_success(&self) -> bool {
        self.failed_count == 0
    }

    /// Check if any file failed.
    pub fn has_failures(&self) -> bool {
        self.failed_count > 0
    }

    /// Get the number of files processed successfully.
    pub fn success_count(&self) -> usize {
        self.processed_count
    }

    /// Get the number of failed files.
    pub fn failure_count(&self) -> usize {
        self.failed_count
    }

    /// Number of hook targets left unexpanded.
    pub fn unresolved_count(&self) -> usize {
        self.diagnostics
            .by_category(crate::diagnostics::DiagnosticCategory::Resolution)
            .len()
    }

    /// Record a processed file.
    pub(crate) fn record_outcome(&mut self, outcome: FileOutcome) {
        self.processed_count += 1;
        self.macro_count += outcome.macros;
        if outcome.written {
            self.written_count += 1;
        } else {
            self.unchanged_count += 1;
        }
        self.hooks.extend(outcome.hooks);
        self.commands.extend(outcome.commands);
    }

    /// Record a failed file.
    pub(crate) fn record_failure(&mut self, file: PathBuf, error_message: String) {
        self.failed_files.push((file, error_message));
        self.failed_count += 1;
    }
}
