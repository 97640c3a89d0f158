//! `GDMAKE_DEBUG` handling.
//!
//! `GDMAKE_DEBUG(dump, args) { ... }` becomes
//! `void dbg_dump(std::vector<std::string> args) { ... }` and is registered
//! with the generated console dispatcher under the command `dump`.

use std::path::PathBuf;

use crate::{scanner::MacroSpan, Result};

use super::{unquote, MacroParser, ParseContext, ParsedMacro};

/// Prefix of every synthesized handler function.
pub const HANDLER_PREFIX: &str = "dbg_";

/// A debug console command discovered in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugCommand {
    /// Command as typed on the console
    pub command: String,
    /// Name of the argument vector parameter, may be empty
    pub args_var: String,
    /// Handler body, including its braces
    pub body: String,
    /// Name of the synthesized handler function
    pub handler_name: String,
    /// Source file the command was defined in
    pub source: PathBuf,
}

impl DebugCommand {
    /// The handler's declarator, without a trailing `;` or body.
    pub fn declaration(&self) -> String {
        if self.args_var.is_empty() {
            format!("void {}(std::vector<std::string>)", self.handler_name)
        } else {
            format!(
                "void {}(std::vector<std::string> {})",
                self.handler_name, self.args_var
            )
        }
    }
}

/// Handler name for `command`, with every non identifier character replaced by `_`.
pub fn handler_name(command: &str) -> String {
    let mut name = String::with_capacity(HANDLER_PREFIX.len() + command.len());
    name.push_str(HANDLER_PREFIX);
    name.extend(command.chars().map(|c| {
        if c.is_ascii_alphanumeric() || c == '_' {
            c
        } else {
            '_'
        }
    }));
    name
}

/// Splits at the first top-level comma.
fn split_arguments(arguments: &str) -> (&str, &str) {
    let mut depth = 0usize;
    for (offset, byte) in arguments.bytes().enumerate() {
        match byte {
            b'(' | b'<' | b'[' => depth += 1,
            b')' | b'>' | b']' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                return (arguments[..offset].trim(), arguments[offset + 1..].trim());
            }
            _ => {}
        }
    }
    (arguments.trim(), "")
}

/// Handler for `GDMAKE_DEBUG`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DebugParser;

impl MacroParser for DebugParser {
    fn parse(&self, text: &str, span: &MacroSpan, ctx: &ParseContext<'_>) -> Result<ParsedMacro> {
        let (command, args_var) = split_arguments(&text[span.arguments.clone()]);
        let command = unquote(command).trim();
        if command.is_empty() {
            return Err(malformed_error!(
                "Debug command without a name in {}",
                ctx.source.display()
            ));
        }

        let function = &text[span.function.clone()];
        let body_at = span
            .body_offset(text)
            .ok_or_else(|| malformed_error!("Debug command '{}' has no body", command))?;

        let stray = function[..body_at].trim();
        if !stray.is_empty() {
            log::debug!("ignoring '{}' before body of debug command '{}'", stray, command);
        }

        let command = DebugCommand {
            command: command.to_string(),
            args_var: args_var.to_string(),
            body: function[body_at..].to_string(),
            handler_name: handler_name(command),
            source: ctx.source.to_path_buf(),
        };
        let replacement = format!("{} {}", command.declaration(), command.body);

        Ok(ParsedMacro::Debug {
            command,
            replacement,
        })
    }
}
