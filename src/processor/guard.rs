//! `#pragma once` to include guard conversion.
//!
//! The rewritten tree is compiled from a different location than the sources,
//! so every header gets a guard named after its canonical source path.

use std::path::Path;

const PRAGMA_ONCE: &str = "#pragma once";

/// Guard macro name for `source`: `__GDMAKE_<PATH>__` with every character
/// that is not an ASCII letter or digit replaced by `_`.
pub fn guard_name(source: &Path) -> String {
    let canonical = std::fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
    let sanitized: String = canonical
        .to_string_lossy()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();

    format!("__GDMAKE{}__", sanitized)
}

/// Replaces a leading `#pragma once` with the opening lines of an include guard.
///
/// Returns the rewritten text and the line closing the guard, or `None` and the
/// untouched text if the file does not start with the pragma.
pub fn open_guard(text: &str, source: &Path) -> (String, Option<&'static str>) {
    let trimmed = text.trim_start_matches('\u{feff}').trim_start();
    let Some(rest) = trimmed.strip_prefix(PRAGMA_ONCE) else {
        return (text.to_string(), None);
    };

    let name = guard_name(source);
    (format!("#ifndef {name}\n#define {name}{rest}"), Some("\n#endif\n"))
}
