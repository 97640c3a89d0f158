//! Expansion of a single source file.
//!
//! [`FileProcessor`] drives one file through the whole pipeline:
//!
//! 1. extract the context lines of the original text ([`ContextExtractor`])
//! 2. turn a leading `#pragma once` into an include guard ([`guard`])
//! 3. for every semantic macro in registry order, find each invocation, cut its
//!    span, run the macro's parser and splice the result into the buffer
//! 4. prepend the includes of the generated headers the file now depends on
//! 5. write the result if the destination is missing or out of date
//!
//! Any error in steps 1 to 4 aborts the file before the destination is touched.
//!
//! # Usage Examples
//!
//! ```rust
//! use gdmake::prelude::*;
//! use std::path::Path;
//!
//! let registry = MacroRegistry::default();
//! let addresses = AddressTable::with_builtins();
//! let options = ProcessOptions::default();
//! let processor = FileProcessor::new(
//!     &registry,
//!     &addresses,
//!     &options,
//!     Path::new("/project/src"),
//!     Path::new("/project/build"),
//! )?;
//!
//! let expansion = processor.expand(
//!     "GDMAKE_HOOK(0x1234) int __stdcall Foo(int a) { return GDMAKE_ORIG(a); }",
//!     Path::new("/project/src/foo.cpp"),
//!     Path::new("/project/build/foo.cpp"),
//! )?;
//!
//! assert_eq!(expansion.hooks.len(), 1);
//! assert!(expansion.text.starts_with("#include \"hooks.h\""));
//! # Ok::<(), gdmake::Error>(())
//! ```

mod context;
pub mod guard;

pub use context::ContextExtractor;

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    address::AddressTable,
    codegen::{DEBUG_HEADER, HOOKS_HEADER},
    parser::{debug::DebugCommand, hook::Hook, ParseContext, ParsedMacro},
    registry::MacroRegistry,
    scanner::{extract_span, SourceBuffer},
    utils::include_path,
    Result,
};

/// Per-run switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessOptions {
    /// Rewrite every destination file, even when it is newer than its source
    pub full_regen: bool,
    /// Log the number of expanded macros for every file
    pub verbose: bool,
    /// Inject a logging statement into every hook without the `NoLog` attribute
    pub add_log_to_hook: bool,
}

/// The rewritten text of one file and everything found in it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expansion {
    /// Rewritten file contents
    pub text: String,
    /// Hooks, in source order
    pub hooks: Vec<Hook>,
    /// Debug commands, in source order
    pub commands: Vec<DebugCommand>,
    /// Number of expanded invocations
    pub macros: usize,
    /// Hook targets that could not be resolved, as written
    pub unresolved: Vec<String>,
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileOutcome {
    /// Source file
    pub source: PathBuf,
    /// Mirrored destination file
    pub destination: PathBuf,
    /// Hooks found in the file
    pub hooks: Vec<Hook>,
    /// Debug commands found in the file
    pub commands: Vec<DebugCommand>,
    /// Number of expanded invocations
    pub macros: usize,
    /// Unresolved hook targets
    pub unresolved: Vec<String>,
    /// Whether the destination was (re)written
    pub written: bool,
}

/// Expands the macros of individual files.
///
/// Holds only shared references, so one processor serves all worker threads.
#[derive(Debug)]
pub struct FileProcessor<'a> {
    registry: &'a MacroRegistry,
    addresses: &'a AddressTable,
    options: &'a ProcessOptions,
    source_root: &'a Path,
    destination_root: &'a Path,
    context: ContextExtractor,
}

impl<'a> FileProcessor<'a> {
    /// Creates a processor for the tree rooted at `source_root`.
    ///
    /// # Errors
    /// Returns [`crate::Error::Error`] if the context patterns fail to compile.
    pub fn new(
        registry: &'a MacroRegistry,
        addresses: &'a AddressTable,
        options: &'a ProcessOptions,
        source_root: &'a Path,
        destination_root: &'a Path,
    ) -> Result<Self> {
        Ok(Self {
            registry,
            addresses,
            options,
            source_root,
            destination_root,
            context: ContextExtractor::new()?,
        })
    }

    /// Expands every semantic macro in `text`.
    ///
    /// # Arguments
    /// * `text` - Original contents of `source`
    /// * `source` - Path of the file being expanded
    /// * `destination` - Where the rewritten file will be written
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if an invocation cannot be decomposed.
    pub fn expand(&self, text: &str, source: &Path, destination: &Path) -> Result<Expansion> {
        let context_lines = self
            .context
            .extract(text, source, self.source_root, self.destination_root);
        let (guarded, guard_closer) = guard::open_guard(text, source);

        let ctx = ParseContext {
            source,
            addresses: self.addresses,
            add_log_to_hook: self.options.add_log_to_hook,
            context_lines: &context_lines,
        };

        let mut buffer = SourceBuffer::new(guarded);
        let mut expansion = Expansion::default();
        let mut includes: Vec<&str> = Vec::new();

        for spec in self.registry.semantic() {
            let Some(parser) = spec.handler.parser() else {
                continue;
            };

            buffer.rewind();
            while let Some(at) = buffer.find(spec.name) {
                let span = extract_span(buffer.as_str(), at, spec.name, spec.scope)?;

                match parser.parse(buffer.as_str(), &span, &ctx)? {
                    ParsedMacro::Hook { hook, replacement } => {
                        buffer.splice(span.range, &replacement);
                        if !includes.contains(&HOOKS_HEADER) {
                            includes.push(HOOKS_HEADER);
                        }
                        expansion.hooks.push(hook);
                        expansion.macros += 1;
                    }
                    ParsedMacro::Debug {
                        command,
                        replacement,
                    } => {
                        buffer.splice(span.range, &replacement);
                        if !includes.contains(&DEBUG_HEADER) {
                            includes.push(DEBUG_HEADER);
                        }
                        expansion.commands.push(command);
                        expansion.macros += 1;
                    }
                    ParsedMacro::Unresolved { token } => {
                        log::warn!(
                            "Unable to create hook in {}: '{}' is not a valid address",
                            source.display(),
                            token
                        );
                        buffer.skip_to(at + spec.name.len());
                        expansion.unresolved.push(token);
                    }
                }
            }
        }

        let include_dir = destination.parent().unwrap_or(self.destination_root);
        let mut text = String::new();
        for header in includes {
            text.push_str(&format!(
                "#include \"{}\"\n",
                include_path(include_dir, &self.destination_root.join(header))
            ));
        }
        text.push_str(&buffer.into_string());
        if let Some(closer) = guard_closer {
            text.push_str(closer);
        }
        expansion.text = text;

        if self.options.verbose {
            log::info!("{}: {} macros", source.display(), expansion.macros);
        }

        Ok(expansion)
    }

    /// Reads, expands and, if needed, writes one file.
    ///
    /// The destination is written when it does not exist, when full
    /// regeneration is requested, or when the source is strictly newer.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] on I/O failure and
    /// [`crate::Error::Malformed`] if the file cannot be expanded. In both
    /// cases an existing destination is left untouched.
    pub fn process_file(&self, source: &Path, destination: &Path) -> Result<FileOutcome> {
        let text = fs::read_to_string(source)?;
        let expansion = self.expand(&text, source, destination)?;

        let written = if self.needs_write(source, destination) {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(destination, &expansion.text)?;
            true
        } else {
            log::debug!("{} is up to date", destination.display());
            false
        };

        Ok(FileOutcome {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            hooks: expansion.hooks,
            commands: expansion.commands,
            macros: expansion.macros,
            unresolved: expansion.unresolved,
            written,
        })
    }

    fn needs_write(&self, source: &Path, destination: &Path) -> bool {
        if self.options.full_regen {
            return true;
        }

        let modified = |path: &Path| fs::metadata(path).and_then(|meta| meta.modified());
        match (modified(source), modified(destination)) {
            (Ok(source_time), Ok(destination_time)) => source_time > destination_time,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand_with(text: &str, options: ProcessOptions) -> Result<Expansion> {
        let registry = MacroRegistry::default();
        let addresses = AddressTable::with_builtins();
        let processor = FileProcessor::new(
            &registry,
            &addresses,
            &options,
            Path::new("/project/src"),
            Path::new("/project/out"),
        )?;
        processor.expand(
            text,
            Path::new("/project/src/ui/menu.cpp"),
            Path::new("/project/out/ui/menu.cpp"),
        )
    }

    fn expand(text: &str) -> Result<Expansion> {
        expand_with(text, ProcessOptions::default())
    }

    #[test]
    fn test_hook_expansion() {
        let expansion = expand(
            "#include <Windows.h>\nGDMAKE_HOOK(0x1234) int __stdcall Foo(int a) { return GDMAKE_ORIG(a); }\n",
        )
        .unwrap();

        assert_eq!(expansion.hooks.len(), 1);
        assert_eq!(expansion.macros, 1);
        assert_eq!(expansion.hooks[0].context, ["#include <Windows.h>"]);
        assert_eq!(
            expansion.text,
            "#include \"../hooks.h\"\n#include <Windows.h>\nint __stdcall Foo(int a) { return Foo_o(a); }\n"
        );
    }

    #[test]
    fn test_commented_hooks_are_ignored() {
        let text = "// GDMAKE_HOOK(0x1) void a() {}\n/*\nGDMAKE_HOOK(0x2) void b() {}\n*/\nint x;\n";
        let expansion = expand(text).unwrap();

        assert!(expansion.hooks.is_empty());
        assert_eq!(expansion.text, text);
    }

    #[test]
    fn test_unresolved_hook_stays() {
        let text = "GDMAKE_HOOK(Nope::nothing) void a() {}\nGDMAKE_HOOK(0x20) void b() {}\n";
        let expansion = expand(text).unwrap();

        assert_eq!(expansion.unresolved, ["Nope::nothing"]);
        assert_eq!(expansion.hooks.len(), 1);
        assert_eq!(expansion.hooks[0].name, "b");
        assert!(expansion
            .text
            .contains("GDMAKE_HOOK(Nope::nothing) void a() {}\nvoid b() {}"));
    }

    #[test]
    fn test_debug_and_hooks_mixed() {
        let text = "GDMAKE_DEBUG(dump, args) { dump(args); }\nGDMAKE_HOOK(MenuLayer::init) bool __fastcall init(void* self) { return GDMAKE_ORIG(self); }\n";
        let expansion = expand(text).unwrap();

        assert_eq!(expansion.hooks.len(), 1);
        assert_eq!(expansion.commands.len(), 1);
        assert_eq!(expansion.macros, 2);
        assert!(expansion
            .text
            .starts_with("#include \"../hooks.h\"\n#include \"../debug.h\"\n"));
        assert!(expansion
            .text
            .contains("void dbg_dump(std::vector<std::string> args) { dump(args); }"));
    }

    #[test]
    fn test_pragma_once_guard() {
        let expansion = expand("#pragma once\nint x;\n").unwrap();

        assert!(expansion.text.starts_with("#ifndef __GDMAKE"));
        assert!(expansion.text.ends_with("int x;\n\n#endif\n"));
        assert!(!expansion.text.contains("#pragma once"));
    }

    #[test]
    fn test_no_log_attribute_only_affects_its_hook() {
        let text = "GDMAKE_HOOK(0x10) void __fastcall A() { GDMAKE_ORIG_V(); }\nGDMAKE_HOOK(0x20) GDMAKE_ATTR(NoLog) void __fastcall B() { GDMAKE_ORIG_V(); }\n";
        let expansion = expand_with(
            text,
            ProcessOptions {
                add_log_to_hook: true,
                ..Default::default()
            },
        )
        .unwrap();

        assert!(expansion.text.contains("{ GDMAKE_LOG_HOOK(\"A\"); A_o(); }"));
        assert!(expansion.text.contains("void __fastcall B() { B_o(); }"));
    }

    #[test]
    fn test_commented_multiline_signature() {
        let text = "GDMAKE_HOOK(0x10)\nint __stdcall Foo(int a, // count\n                  int b /* ( */) {\n    return GDMAKE_ORIG(a, b);\n}\nint after;\n";
        let expansion = expand(text).unwrap();

        assert_eq!(
            expansion.text,
            "#include \"../hooks.h\"\n\nint __stdcall Foo(int a, // count\n                  int b /* ( */) {\n    return Foo_o(a, b);\n}\nint after;\n"
        );
        assert_eq!(
            expansion.text.lines().count(),
            text.lines().count() + 1
        );

        let hook = &expansion.hooks[0];
        assert_eq!(hook.parameters, "int a, int b");
        assert_eq!(
            crate::codegen::trampoline_declaration(hook),
            "inline int (__stdcall* Foo_o)(int a, int b);"
        );
        assert_eq!(
            crate::codegen::detour_declaration(hook),
            "int __stdcall Foo(int a, int b);"
        );
    }

    #[test]
    fn test_malformed_hook_fails_file() {
        assert!(expand("GDMAKE_HOOK(0x10) void a() { unclosed").is_err());
        assert!(expand("GDMAKE_HOOK(0x10) (int a) { }").is_err());
    }
}
