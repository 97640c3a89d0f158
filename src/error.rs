use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Errors raised inside the per-file pipeline never abort a whole run: the
/// [`crate::project::Preprocessor`] records them against the offending file and
/// moves on. They only surface directly from the single-file and configuration APIs.
///
/// # Error Categories
///
/// ## Source Parsing Errors
/// - [`Error::Malformed`] - A macro invocation, signature or body could not be decomposed
/// - [`Error::InvalidAddress`] - An address literal in the settings could not be parsed
///
/// ## I/O and External Errors
/// - [`Error::FileError`] - Filesystem I/O errors
/// - [`Error::Walk`] - Directory traversal errors
/// - [`Error::Settings`] - Settings file deserialization errors
///
/// # Examples
///
/// ```rust,no_run
/// use gdmake::{Error, settings::Settings};
/// use std::path::Path;
///
/// match Settings::from_file(Path::new("gdmake.json")) {
///     Ok(settings) => println!("{} address overrides", settings.addresses.len()),
///     Err(Error::Settings(err)) => eprintln!("Broken settings file: {}", err),
///     Err(Error::FileError(io_err)) => eprintln!("I/O error: {}", io_err),
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The source text could not be decomposed.
    ///
    /// Raised when a matched macro span has no balanced delimiters, a hook has
    /// no function signature or body, or a debug command has no name. The
    /// error includes the crate source location where the problem was detected.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// An address override could not be parsed into a 32-bit offset.
    #[error("Invalid address - {0}")]
    InvalidAddress(String),

    /// File I/O error.
    ///
    /// Wraps standard I/O errors that can occur while reading sources, creating
    /// destination directories or writing rewritten files.
    #[error("{0}")]
    FileError(#[from] std::io::Error),

    /// Error while walking the source tree.
    #[error("{0}")]
    Walk(#[from] walkdir::Error),

    /// The settings file is not valid JSON or does not match the expected layout.
    #[error("{0}")]
    Settings(#[from] serde_json::Error),

    /// Generic error for miscellaneous failures.
    ///
    /// Used for errors that don't fit into other categories, such as invalid
    /// builder configuration.
    #[error("{0}")]
    Error(String),
}
