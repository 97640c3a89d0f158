//! Comment-aware lexical scanning of C/C++ source text.
//!
//! The scanner never tokenizes the whole language. It answers exactly two
//! questions the expansion engine needs:
//!
//! - Where is the next invocation of a given macro name that is not commented out?
//!   ([`find_macro`])
//! - Where does the delimiter group opened at some offset end? ([`match_delimiter`])
//!
//! On top of those, [`extract_span`] cuts the region a macro handler receives,
//! depending on the macro's [`crate::registry::ReplaceScope`].
//!
//! # Limitations
//!
//! Delimiters inside string and character literals are counted like any other
//! delimiter. A body such as `{ puts("}"); }` therefore ends early. This mirrors
//! the behaviour hook authors already rely on and is kept as is.
//!
//! # Usage Examples
//!
//! ```rust
//! use gdmake::scanner::{find_macro, match_delimiter, Delimiter};
//!
//! let text = "// GDMAKE_HOOK(1)\nGDMAKE_HOOK(f(2)) void f() {}";
//!
//! let at = find_macro(text, "GDMAKE_HOOK", 0).unwrap();
//! assert_eq!(at, 18);
//!
//! let open = at + "GDMAKE_HOOK(".len();
//! let end = match_delimiter(text, open, Delimiter::Paren).unwrap();
//! assert_eq!(&text[at..end], "GDMAKE_HOOK(f(2))");
//! ```

mod buffer;

pub use buffer::SourceBuffer;

use std::ops::Range;

use crate::{registry::ReplaceScope, Result};

/// A pair of matching delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delimiter {
    /// `(` and `)`
    Paren,
    /// `{` and `}`
    Brace,
}

impl Delimiter {
    /// The opening byte.
    pub fn open(self) -> u8 {
        match self {
            Delimiter::Paren => b'(',
            Delimiter::Brace => b'{',
        }
    }

    /// The closing byte.
    pub fn close(self) -> u8 {
        match self {
            Delimiter::Paren => b')',
            Delimiter::Brace => b'}',
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum CommentState {
    Code,
    Line,
    Block,
}

fn is_ident_byte(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Finds the next occurrence of `name` at or after `from` that is outside comments.
///
/// Comment state is always tracked from the start of `text`, so a `/*` opened
/// before `from` still hides occurrences after it. Matches must sit on identifier
/// boundaries: `GDMAKE_ORIG` is not found inside `GDMAKE_ORIG_S`.
///
/// # Arguments
/// * `text` - Full source text
/// * `name` - Macro name to look for
/// * `from` - Minimum byte offset of an accepted match
///
/// # Returns
/// Byte offset of the first character of the match, or `None`.
pub fn find_macro(text: &str, name: &str, from: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let needle = name.as_bytes();
    if needle.is_empty() {
        return None;
    }

    let mut state = CommentState::Code;
    let mut i = 0;
    while i < bytes.len() {
        let current = bytes[i];
        let next = bytes.get(i + 1).copied();

        match state {
            CommentState::Code => {
                if current == b'/' && next == Some(b'/') {
                    state = CommentState::Line;
                    i += 2;
                    continue;
                }
                if current == b'/' && next == Some(b'*') {
                    state = CommentState::Block;
                    i += 2;
                    continue;
                }

                if i >= from
                    && bytes[i..].starts_with(needle)
                    && (i == 0 || !is_ident_byte(bytes[i - 1]))
                    && bytes
                        .get(i + needle.len())
                        .map_or(true, |after| !is_ident_byte(*after))
                {
                    return Some(i);
                }
            }
            CommentState::Line => {
                if current == b'\n' {
                    state = CommentState::Code;
                }
            }
            CommentState::Block => {
                if current == b'*' && next == Some(b'/') {
                    state = CommentState::Code;
                    i += 2;
                    continue;
                }
            }
        }

        i += 1;
    }

    None
}

/// Removes `//` and `/* */` comments from `text`.
///
/// A block comment becomes a single space so the tokens around it stay apart.
/// Line comments are cut up to, but not including, their newline.
pub fn strip_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut state = CommentState::Code;
    let mut chars = text.chars().peekable();

    while let Some(current) = chars.next() {
        let next = chars.peek().copied();
        match state {
            CommentState::Code => match (current, next) {
                ('/', Some('/')) => {
                    chars.next();
                    state = CommentState::Line;
                }
                ('/', Some('*')) => {
                    chars.next();
                    state = CommentState::Block;
                }
                _ => out.push(current),
            },
            CommentState::Line => {
                if current == '\n' {
                    out.push('\n');
                    state = CommentState::Code;
                }
            }
            CommentState::Block => {
                if current == '*' && next == Some('/') {
                    chars.next();
                    out.push(' ');
                    state = CommentState::Code;
                }
            }
        }
    }

    out
}

/// Finds the end of a delimiter group.
///
/// `start` is the offset right after the opening delimiter; counting starts at
/// depth 1 and every nested open/close adjusts the depth.
///
/// # Returns
/// Offset just past the matching closing delimiter, or `None` if the group is
/// never closed.
pub fn match_delimiter(text: &str, start: usize, delimiter: Delimiter) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut depth = 1usize;

    for (offset, byte) in bytes.iter().enumerate().skip(start) {
        if *byte == delimiter.open() {
            depth += 1;
        } else if *byte == delimiter.close() {
            depth -= 1;
            if depth == 0 {
                return Some(offset + 1);
            }
        }
    }

    None
}

/// Byte offset of the next `byte` at or after `from`.
fn find_byte(text: &str, byte: u8, from: usize) -> Option<usize> {
    text.as_bytes()
        .get(from..)?
        .iter()
        .position(|b| *b == byte)
        .map(|pos| pos + from)
}

/// The region of a macro invocation, as byte ranges into the scanned text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSpan {
    /// Whole region replaced by the handler's output.
    pub range: Range<usize>,
    /// Text between the invocation's parentheses (exclusive).
    pub arguments: Range<usize>,
    /// Function text following the invocation, from the end of the closing
    /// parenthesis through the closing brace. Empty for `Inside` macros.
    pub function: Range<usize>,
}

impl MacroSpan {
    /// Offset of the `{` opening the function body, relative to the start of
    /// [`MacroSpan::function`], if there is a body.
    pub fn body_offset(&self, text: &str) -> Option<usize> {
        find_byte(&text[self.function.clone()], b'{', 0)
    }
}

/// Cuts the span of the macro invocation at `at`.
///
/// # Arguments
/// * `text` - Full source text
/// * `at` - Offset of the macro name, as returned by [`find_macro`]
/// * `name` - Macro name
/// * `scope` - How far the invocation reaches
///
/// # Errors
/// Returns [`crate::Error::Malformed`] when the invocation has no argument list,
/// a function-scoped macro has no following body, or delimiters never balance.
pub fn extract_span(text: &str, at: usize, name: &str, scope: ReplaceScope) -> Result<MacroSpan> {
    let after_name = at + name.len();
    let open_paren = find_byte(text, b'(', after_name)
        .ok_or_else(|| malformed_error!("{} at offset {} has no argument list", name, at))?;
    let close_paren = match_delimiter(text, open_paren + 1, Delimiter::Paren)
        .ok_or_else(|| malformed_error!("{} at offset {} has unbalanced parentheses", name, at))?;

    let arguments = open_paren + 1..close_paren - 1;

    match scope {
        ReplaceScope::Inside => Ok(MacroSpan {
            range: at..close_paren,
            arguments,
            function: close_paren..close_paren,
        }),
        ReplaceScope::NextFunction | ReplaceScope::NoReplace => {
            let open_brace = find_byte(text, b'{', close_paren)
                .ok_or_else(|| malformed_error!("{} at offset {} has no function body", name, at))?;
            let close_brace = match_delimiter(text, open_brace + 1, Delimiter::Brace)
                .ok_or_else(|| malformed_error!("{} at offset {} has an unclosed body", name, at))?;

            Ok(MacroSpan {
                range: at..close_brace,
                arguments,
                function: close_paren..close_brace,
            })
        }
    }
}
