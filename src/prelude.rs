//! # gdmake Prelude
//!
//! The types needed to preprocess a tree and generate its support files.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all gdmake operations
pub use crate::Error;

/// The result type used throughout gdmake
pub use crate::Result;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Whole-tree preprocessing
pub use crate::project::{PreprocessResult, Preprocessor};

/// Single-file expansion
pub use crate::processor::{Expansion, FileOutcome, FileProcessor, ProcessOptions};

/// Generated support files
pub use crate::codegen::Artifacts;

// ================================================================================================
// Configuration
// ================================================================================================

/// Address resolution
pub use crate::address::{AddressTable, HookAddress};

/// Macro catalog
pub use crate::registry::{MacroHandler, MacroRegistry, MacroSpec, ReplaceScope};

/// Settings file
pub use crate::settings::Settings;

// ================================================================================================
// Parse Results
// ================================================================================================

/// Hooks and debug commands
pub use crate::parser::{
    debug::DebugCommand,
    hook::{Hook, HookFlags},
    signature::CallingConvention,
    ParsedMacro,
};

/// Diagnostics
pub use crate::diagnostics::{Diagnostic, DiagnosticCategory, DiagnosticSeverity, Diagnostics};
