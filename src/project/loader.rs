//! Preprocessor builder API for whole project trees.

use std::{
    fs,
    path::{Path, PathBuf},
};

use rayon::prelude::*;
use walkdir::WalkDir;

use crate::{
    address::AddressTable,
    diagnostics::{DiagnosticCategory, Diagnostics},
    processor::{FileOutcome, FileProcessor, ProcessOptions},
    project::PreprocessResult,
    registry::MacroRegistry,
    Error, Result,
};

/// Extensions of the files the preprocessor rewrites.
pub const SOURCE_EXTENSIONS: &[&str] = &["c", "cpp", "h", "hpp"];

/// Builder for preprocessing a source tree into a destination tree.
///
/// Every `.c`, `.cpp`, `.h` and `.hpp` file below the source root is expanded
/// and written to the same relative path below the destination root. Other
/// files are ignored. Files are processed in parallel; a file that fails is
/// reported in the [`PreprocessResult`] and does not stop the others.
///
/// # Usage Examples
///
/// ## Default Run
/// ```rust,no_run
/// use gdmake::project::Preprocessor;
///
/// let result = Preprocessor::new("mod/src", "mod/build/src").run()?;
/// println!("{} hooks", result.hooks.len());
/// # Ok::<(), gdmake::Error>(())
/// ```
///
/// ## With Overrides
/// ```rust,no_run
/// use gdmake::{project::Preprocessor, settings::Settings};
/// use std::path::Path;
///
/// let settings = Settings::from_file(Path::new("gdmake.json"))?;
/// let result = Preprocessor::new("mod/src", "mod/build/src")
///     .with_addresses(settings.address_table()?)
///     .full_regen(true)
///     .add_log_to_hook(true)
///     .run()?;
/// # Ok::<(), gdmake::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct Preprocessor {
    /// Root of the tree to read
    source_root: PathBuf,
    /// Root of the mirrored tree to write
    destination_root: PathBuf,
    /// Per-run switches
    options: ProcessOptions,
    /// Address table, the built-in one if not set
    addresses: Option<AddressTable>,
    /// Macro catalog, the default one if not set
    registry: Option<MacroRegistry>,
}

impl Preprocessor {
    /// Create a new Preprocessor builder.
    ///
    /// # Arguments
    /// * `source_root` - Directory containing the sources
    /// * `destination_root` - Directory receiving the rewritten tree, created if missing
    #[must_use]
    pub fn new<S: AsRef<Path>, D: AsRef<Path>>(source_root: S, destination_root: D) -> Self {
        Self {
            source_root: source_root.as_ref().to_path_buf(),
            destination_root: destination_root.as_ref().to_path_buf(),
            options: ProcessOptions::default(),
            addresses: None,
            registry: None,
        }
    }

    /// Replace all switches at once.
    #[must_use]
    pub fn options(mut self, options: ProcessOptions) -> Self {
        self.options = options;
        self
    }

    /// Rewrite every destination file regardless of timestamps.
    #[must_use]
    pub fn full_regen(mut self, enabled: bool) -> Self {
        self.options.full_regen = enabled;
        self
    }

    /// Log the number of expanded macros for every file.
    #[must_use]
    pub fn verbose(mut self, enabled: bool) -> Self {
        self.options.verbose = enabled;
        self
    }

    /// Inject call logging into hooks without the `NoLog` attribute.
    #[must_use]
    pub fn add_log_to_hook(mut self, enabled: bool) -> Self {
        self.options.add_log_to_hook = enabled;
        self
    }

    /// Use `addresses` instead of the built-in table.
    ///
    /// Callers that only add overrides should start from
    /// [`AddressTable::with_builtins`].
    #[must_use]
    pub fn with_addresses(mut self, addresses: AddressTable) -> Self {
        self.addresses = Some(addresses);
        self
    }

    /// Use a custom macro catalog.
    #[must_use]
    pub fn with_registry(mut self, registry: MacroRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Preprocess the tree.
    ///
    /// # Errors
    /// Returns an error if the source root is not an existing directory, the
    /// destination root cannot be created, or the source tree cannot be walked.
    /// Failures of individual files are reported in the result instead.
    pub fn run(self) -> Result<PreprocessResult> {
        if !self.source_root.is_dir() {
            return Err(Error::Error(format!(
                "Source root does not exist or is not a directory: {}",
                self.source_root.display()
            )));
        }

        fs::create_dir_all(&self.destination_root)?;
        let source_root = fs::canonicalize(&self.source_root)?;
        let destination_root = fs::canonicalize(&self.destination_root)?;
        if source_root == destination_root {
            return Err(Error::Error(format!(
                "Source and destination root are the same directory: {}",
                source_root.display()
            )));
        }

        let addresses = self.addresses.unwrap_or_else(AddressTable::with_builtins);
        let registry = self.registry.unwrap_or_default();
        let processor = FileProcessor::new(
            &registry,
            &addresses,
            &self.options,
            &source_root,
            &destination_root,
        )?;

        let files = source_files(&source_root, &destination_root)?;
        log::debug!(
            "preprocessing {} files from {} into {}",
            files.len(),
            source_root.display(),
            destination_root.display()
        );

        let outcomes: boxcar::Vec<FileOutcome> = boxcar::Vec::new();
        let failures: boxcar::Vec<(PathBuf, String)> = boxcar::Vec::new();
        let diagnostics = Diagnostics::new();

        files.par_iter().for_each(|source| {
            let processed = source
                .strip_prefix(&source_root)
                .map_err(|_| {
                    Error::Error(format!("{} is outside the source root", source.display()))
                })
                .and_then(|relative| {
                    processor.process_file(source, &destination_root.join(relative))
                });

            match processed {
                Ok(outcome) => {
                    for token in &outcome.unresolved {
                        diagnostics.unresolved_hook(source, token.as_str());
                    }
                    outcomes.push(outcome);
                }
                Err(error) => {
                    log::error!("Unable to preprocess {}: {}", source.display(), error);
                    let category = match error {
                        Error::Malformed { .. } => DiagnosticCategory::Parse,
                        Error::FileError(_) => DiagnosticCategory::Io,
                        _ => DiagnosticCategory::General,
                    };
                    diagnostics.skipped_file(source, category, error.to_string());
                    failures.push((source.clone(), error.to_string()));
                }
            }
        });

        let mut outcomes: Vec<FileOutcome> =
            outcomes.iter().map(|(_, outcome)| outcome.clone()).collect();
        outcomes.sort_by(|a, b| a.source.cmp(&b.source));

        let mut failures: Vec<(PathBuf, String)> =
            failures.iter().map(|(_, failure)| failure.clone()).collect();
        failures.sort_by(|a, b| a.0.cmp(&b.0));

        let mut result = PreprocessResult::new();
        for outcome in outcomes {
            result.record_outcome(outcome);
        }
        for (file, message) in failures {
            result.record_failure(file, message);
        }
        result.diagnostics = diagnostics;

        Ok(result)
    }
}

/// Lists the source files below `root`, sorted, skipping `exclude` if it is nested in `root`.
///
/// # Errors
/// Returns [`Error::Walk`] if a directory cannot be read.
pub fn source_files(root: &Path, exclude: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let nested = exclude != root && exclude.starts_with(root);

    for entry in WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !(nested && entry.path().starts_with(exclude)))
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let is_source = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| SOURCE_EXTENSIONS.contains(&ext));
        if is_source {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}
