//! Context lines of a source file.
//!
//! Hooks are declared again in the generated `hooks.h`, far away from the file
//! that defined them. The includes, `using` directives and class names of that
//! file travel with every hook so the declarations still compile there.

use std::path::Path;

use regex::Regex;
use rustc_hash::FxHashSet;

use crate::{
    utils::{include_path, normalize_lexically},
    Error, Result,
};

/// Compiled extraction passes, built once per run and shared by all files.
#[derive(Debug, Clone)]
pub struct ContextExtractor {
    include_pattern: Regex,
    using_pattern: Regex,
    class_pattern: Regex,
}

impl ContextExtractor {
    /// Compiles the extraction patterns.
    ///
    /// # Errors
    /// Returns [`Error::Error`] if a pattern fails to compile.
    pub fn new() -> Result<Self> {
        let include_pattern = Regex::new(r#"(?m)^[ \t]*#[ \t]*include[ \t]*(?:<([^>\n]+)>|"([^"\n]+)")"#)
            .map_err(|e| Error::Error(format!("Failed to compile include regex: {}", e)))?;
        let using_pattern = Regex::new(r#"(?m)^[ \t]*(using[ \t]+[^;"\n]+;)"#)
            .map_err(|e| Error::Error(format!("Failed to compile using regex: {}", e)))?;
        let class_pattern = Regex::new(
            r"(?m)^[ \t]*(class|struct)[ \t]+([A-Za-z_][A-Za-z0-9_]*)\s*(?:final\s*)?(?:\{|:[^:])",
        )
        .map_err(|e| Error::Error(format!("Failed to compile class regex: {}", e)))?;

        Ok(Self {
            include_pattern,
            using_pattern,
            class_pattern,
        })
    }

    /// Extracts the context lines of `text`.
    ///
    /// Lines are deduplicated and ordered includes first, then `using`
    /// directives, then forward declarations. Quoted includes are rewritten
    /// relative to `destination_root`; a target inside `source_root` is
    /// replaced by its mirrored destination first.
    ///
    /// # Arguments
    /// * `text` - Original file contents
    /// * `source` - Path of the file, used to resolve quoted includes
    /// * `source_root` - Root of the source tree
    /// * `destination_root` - Root of the destination tree
    pub fn extract(
        &self,
        text: &str,
        source: &Path,
        source_root: &Path,
        destination_root: &Path,
    ) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut lines = Vec::new();
        let mut push = |line: String| {
            if seen.insert(line.clone()) {
                lines.push(line);
            }
        };

        let source_dir = source.parent().unwrap_or(source_root);
        for captures in self.include_pattern.captures_iter(text) {
            if let Some(system) = captures.get(1) {
                push(format!("#include <{}>", system.as_str().trim()));
            } else if let Some(quoted) = captures.get(2) {
                let target = normalize_lexically(&source_dir.join(quoted.as_str().trim()));
                let target = match target.strip_prefix(source_root) {
                    Ok(inside) => destination_root.join(inside),
                    Err(_) => target,
                };
                push(format!(
                    "#include \"{}\"",
                    include_path(destination_root, &target)
                ));
            }
        }

        for captures in self.using_pattern.captures_iter(text) {
            push(
                captures[1]
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }

        for captures in self.class_pattern.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            if text[..whole.start()].trim_end().ends_with('>') {
                log::debug!("not forward declaring template {}", &captures[2]);
                continue;
            }
            push(format!("{} {};", &captures[1], &captures[2]));
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(text: &str) -> Vec<String> {
        ContextExtractor::new().unwrap().extract(
            text,
            Path::new("/project/src/ui/menu.cpp"),
            Path::new("/project/src"),
            Path::new("/project/build/src"),
        )
    }

    #[test]
    fn test_order_and_dedup() {
        let lines = extract(
            "using namespace cocos2d;\n#include <Windows.h>\nclass Menu : public Layer {};\n#include <Windows.h>\nstruct Data {\n};\n",
        );

        assert_eq!(
            lines,
            [
                "#include <Windows.h>",
                "using namespace cocos2d;",
                "class Menu;",
                "struct Data;"
            ]
        );
    }

    #[test]
    fn test_quoted_includes_are_mirrored() {
        let lines = extract("#include \"helpers.hpp\"\n#include \"../../vendor/lib.h\"\n#include \"../core/state.h\"\n");

        assert_eq!(
            lines,
            [
                "#include \"ui/helpers.hpp\"",
                "#include \"../../vendor/lib.h\"",
                "#include \"core/state.h\"",
            ]
        );
    }

    #[test]
    fn test_using_with_string_is_skipped() {
        let lines = extract("using namespace std::string_literals;\nusing x = decltype(\"a\");\n");
        assert_eq!(lines, ["using namespace std::string_literals;"]);
    }

    #[test]
    fn test_forward_declarations() {
        let lines = extract(
            "class Fwd;\nenum class Color { Red };\ntemplate <typename T>\nclass Box {};\nclass Final final {};\nclass Scoped : ns::Base {};\n",
        );
        assert_eq!(lines, ["class Final;", "class Scoped;"]);
    }
}
