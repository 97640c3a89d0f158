//! Semantic handlers for matched macro spans.
//!
//! The file processor locates an invocation with the [`crate::scanner`] and
//! hands its [`MacroSpan`] to the [`MacroParser`] registered for the macro.
//! The parser decomposes the span and returns a [`ParsedMacro`], which carries
//! both the structured record and the text that replaces the span.
//!
//! # Key Components
//!
//! - [`MacroParser`] - Shared handler interface
//! - [`ParseContext`] - Read-only state a handler may consult
//! - [`ParsedMacro`] - Result of handling one invocation
//! - [`hook`] - `GDMAKE_HOOK` handler and the [`hook::Hook`] record
//! - [`debug`] - `GDMAKE_DEBUG` handler and the [`debug::DebugCommand`] record
//! - [`signature`] - Ad-hoc C++ function signature decomposition

pub mod debug;
pub mod hook;
pub mod signature;

use std::path::Path;

use crate::{address::AddressTable, scanner::MacroSpan, Result};

use self::{debug::DebugCommand, hook::Hook};

/// Read-only inputs available to a handler while parsing one invocation.
#[derive(Debug, Clone, Copy)]
pub struct ParseContext<'a> {
    /// Source file the invocation was found in
    pub source: &'a Path,
    /// Address table used to resolve symbolic hook targets
    pub addresses: &'a AddressTable,
    /// Inject a logging statement into hook bodies
    pub add_log_to_hook: bool,
    /// Include, using and forward declaration lines of the enclosing file
    pub context_lines: &'a [String],
}

/// Outcome of handling one macro invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedMacro {
    /// A hook definition.
    Hook {
        /// The parsed hook
        hook: Hook,
        /// Plain function definition replacing the invocation
        replacement: String,
    },
    /// A debug console command.
    Debug {
        /// The parsed command
        command: DebugCommand,
        /// Synthesized handler function replacing the invocation
        replacement: String,
    },
    /// The hook target could not be resolved; the invocation stays as written.
    Unresolved {
        /// The address token as written in source
        token: String,
    },
}

impl ParsedMacro {
    /// Text to splice in place of the span, or `None` if the span stays.
    pub fn replacement(&self) -> Option<&str> {
        match self {
            ParsedMacro::Hook { replacement, .. } | ParsedMacro::Debug { replacement, .. } => {
                Some(replacement)
            }
            ParsedMacro::Unresolved { .. } => None,
        }
    }
}

/// A semantic macro handler.
pub trait MacroParser: Send + Sync {
    /// Parses the invocation described by `span` inside `text`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if the span cannot be decomposed.
    /// Unresolvable hook targets are not errors, see [`ParsedMacro::Unresolved`].
    fn parse(&self, text: &str, span: &MacroSpan, ctx: &ParseContext<'_>) -> Result<ParsedMacro>;
}

/// Strips one pair of surrounding double quotes.
pub(crate) fn unquote(token: &str) -> &str {
    token
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unquote() {
        assert_eq!(unquote("\"dump\""), "dump");
        assert_eq!(unquote("dump"), "dump");
        assert_eq!(unquote("\"half"), "\"half");
        assert_eq!(unquote("\"\""), "");
    }
}
