//! Catalog of the macros the engine recognizes.
//!
//! Every macro is described by a [`MacroSpec`]. Macros with a semantic
//! [`MacroHandler`] are expanded by the engine; all others are left in the
//! source for the C++ compiler, which sees their literal expansion through the
//! header produced by [`MacroRegistry::render_header`].
//!
//! The registry is an immutable value built once per run and shared by
//! reference; [`MacroRegistry::default`] is the standard catalog.
//!
//! # Usage Examples
//!
//! ```rust
//! use gdmake::registry::{MacroHandler, MacroRegistry, ReplaceScope};
//!
//! let registry = MacroRegistry::default();
//!
//! let hook = registry.get("GDMAKE_HOOK").unwrap();
//! assert_eq!(hook.scope, ReplaceScope::NextFunction);
//! assert_eq!(hook.handler, MacroHandler::Hook);
//!
//! let expanded: Vec<_> = registry.semantic().map(|m| m.name).collect();
//! assert_eq!(expanded, ["GDMAKE_HOOK", "GDMAKE_DEBUG"]);
//! ```

use std::fmt::Write;

use crate::parser::{debug::DebugParser, hook::HookParser, MacroParser};

/// Name of the hook marker macro.
pub const HOOK_MACRO: &str = "GDMAKE_HOOK";
/// Name of the debug console command macro.
pub const DEBUG_MACRO: &str = "GDMAKE_DEBUG";
/// Name of the hook attribute marker macro.
pub const ATTR_MACRO: &str = "GDMAKE_ATTR";
/// Name of the call-logging macro injected into hook bodies.
pub const LOG_HOOK_MACRO: &str = "GDMAKE_LOG_HOOK";
/// The call-original placeholder family, rewritten to the trampoline inside hooks.
pub const ORIG_MACROS: &[&str] = &["GDMAKE_ORIG", "GDMAKE_ORIG_V", "GDMAKE_ORIG_S", "GDMAKE_ORIG_P"];

/// How far a macro invocation reaches into the surrounding source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceScope {
    /// From the macro name through the matching `)` of its argument list.
    Inside,
    /// From the macro name through the end of the following function body.
    /// The handler's output stands in for the function without the wrapper.
    NextFunction,
    /// Same span as [`ReplaceScope::NextFunction`]; the handler's output
    /// replaces the span verbatim.
    NoReplace,
}

/// Semantic handler attached to a macro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroHandler {
    /// Left for the C++ preprocessor.
    None,
    /// Expanded into a hook, see [`crate::parser::hook`].
    Hook,
    /// Expanded into a debug console command, see [`crate::parser::debug`].
    Debug,
}

impl MacroHandler {
    /// The parser implementing this handler, if any.
    pub fn parser(self) -> Option<&'static dyn MacroParser> {
        match self {
            MacroHandler::None => None,
            MacroHandler::Hook => Some(&HookParser),
            MacroHandler::Debug => Some(&DebugParser),
        }
    }
}

/// A recognized macro.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSpec {
    /// Macro name as written in source
    pub name: &'static str,
    /// Formal parameter names, `None` for object-like macros
    pub parameters: Option<&'static [&'static str]>,
    /// Literal C++ expansion exported to the compiler
    pub expansion: &'static str,
    /// Human readable description
    pub description: &'static str,
    /// Span extraction rule
    pub scope: ReplaceScope,
    /// Semantic handler
    pub handler: MacroHandler,
}

impl MacroSpec {
    /// Returns true if the engine expands this macro itself.
    pub fn is_semantic(&self) -> bool {
        self.handler != MacroHandler::None
    }

    /// The description as doc comment lines, wrapped after roughly 30 columns.
    pub fn formatted_description(&self) -> String {
        let mut out = String::new();
        let mut line = String::from(" * ");
        let mut collected = 0;

        for word in self.description.split(' ') {
            line.push_str(word);
            line.push(' ');
            collected += word.len() + 1;
            if collected > 30 {
                out.push_str(line.trim_end());
                out.push('\n');
                line = String::from(" * ");
                collected = 0;
            }
        }

        if collected > 0 {
            out.push_str(line.trim_end());
            out.push('\n');
        }

        out
    }

    /// The `#define` line for this macro.
    pub fn define_line(&self) -> String {
        let mut line = format!("#define {}", self.name);
        if let Some(parameters) = self.parameters {
            let _ = write!(line, "({})", parameters.join(", "));
        }
        if !self.expansion.is_empty() {
            line.push(' ');
            line.push_str(self.expansion);
        }
        line
    }
}

const DEFAULT_MACROS: &[MacroSpec] = &[
    MacroSpec {
        name: "GDMAKE_MAIN",
        parameters: None,
        expansion: "bool mod::loadMod(HMODULE)",
        description: "Main entry point for the mod. All default variables should be initialized at this point.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
    MacroSpec {
        name: "GDMAKE_MAIN_HM",
        parameters: Some(&["hModule"]),
        expansion: "bool mod::loadMod(HMODULE hModule)",
        description: "Main entry point for the mod, receiving the module handle of the mod DLL.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
    MacroSpec {
        name: "GDMAKE_UNLOAD",
        parameters: None,
        expansion: "void mod::unloadMod()",
        description: "Called when the mod is unloaded. Default modules are automatically unloaded after this function.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
    MacroSpec {
        name: "GDMAKE_CREATE_HOOK",
        parameters: Some(&["addr", "detour", "orig"]),
        expansion: "MH_CreateHook((PVOID)(gd::base + addr), reinterpret_cast<LPVOID>(detour), reinterpret_cast<LPVOID*>(&orig))",
        description: "Alias macro for creating a hook at an address.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
    MacroSpec {
        name: HOOK_MACRO,
        parameters: Some(&["addr"]),
        expansion: "",
        description: "Turns the function following this macro into a hook at the address. Use GDMAKE_ORIG to call the original function.",
        scope: ReplaceScope::NextFunction,
        handler: MacroHandler::Hook,
    },
    MacroSpec {
        name: DEBUG_MACRO,
        parameters: Some(&["command", "args"]),
        expansion: "void dbg_##command(std::vector<std::string> args)",
        description: "Turns the following block into a debug console command. The arguments of the command are passed in args.",
        scope: ReplaceScope::NoReplace,
        handler: MacroHandler::Debug,
    },
    MacroSpec {
        name: "GDMAKE_ORIG",
        parameters: Some(&["..."]),
        expansion: "0",
        description: "Call the original function from a hook created with GDMAKE_HOOK.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
    MacroSpec {
        name: "GDMAKE_ORIG_V",
        parameters: Some(&["..."]),
        expansion: "",
        description: "Call the original function from a hook returning void.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
    MacroSpec {
        name: "GDMAKE_ORIG_S",
        parameters: Some(&["..."]),
        expansion: "\"\"",
        description: "Call the original function from a hook returning a string.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
    MacroSpec {
        name: "GDMAKE_ORIG_P",
        parameters: Some(&["..."]),
        expansion: "nullptr",
        description: "Call the original function from a hook returning a pointer.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
    MacroSpec {
        name: ATTR_MACRO,
        parameters: Some(&["..."]),
        expansion: "",
        description: "Attributes for a hook, placed before its function name. NoLog disables call logging.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
    MacroSpec {
        name: LOG_HOOK_MACRO,
        parameters: Some(&["name"]),
        expansion: "std::printf(\"[gdmake] hook %s\\n\", name)",
        description: "Logs a call to a hook. Injected automatically when hook logging is enabled.",
        scope: ReplaceScope::Inside,
        handler: MacroHandler::None,
    },
];

/// Ordered, immutable macro catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroRegistry {
    macros: Vec<MacroSpec>,
}

impl Default for MacroRegistry {
    fn default() -> Self {
        Self {
            macros: DEFAULT_MACROS.to_vec(),
        }
    }
}

impl MacroRegistry {
    /// Builds a registry from an explicit list, kept in the given order.
    pub fn new(macros: Vec<MacroSpec>) -> Self {
        Self { macros }
    }

    /// All macros in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = &MacroSpec> {
        self.macros.iter()
    }

    /// Macros the engine expands itself, in declaration order.
    pub fn semantic(&self) -> impl Iterator<Item = &MacroSpec> {
        self.macros.iter().filter(|spec| spec.is_semantic())
    }

    /// Looks up a macro by name.
    pub fn get(&self, name: &str) -> Option<&MacroSpec> {
        self.macros.iter().find(|spec| spec.name == name)
    }

    /// Number of macros.
    pub fn len(&self) -> usize {
        self.macros.len()
    }

    /// Returns true if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.macros.is_empty()
    }

    /// Renders the compiler-visible macro table (`GDMakeMacros.h`).
    pub fn render_header(&self) -> String {
        let mut out = String::new();
        out.push_str(crate::codegen::HEADER_CREDIT);
        out.push_str("#ifndef __GDMAKE_MACROS_H__\n#define __GDMAKE_MACROS_H__\n\n");

        for spec in &self.macros {
            out.push_str("/**\n * Semantic information for GDMake.\n");
            out.push_str(&spec.formatted_description());
            out.push_str(" */\n");
            out.push_str(&spec.define_line());
            out.push_str("\n\n");
        }

        out.push_str("#endif\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_order() {
        let registry = MacroRegistry::default();
        let names: Vec<_> = registry.iter().map(|spec| spec.name).collect();

        assert_eq!(names.first(), Some(&"GDMAKE_MAIN"));
        assert!(
            names.iter().position(|n| *n == HOOK_MACRO)
                < names.iter().position(|n| *n == DEBUG_MACRO)
        );
        for orig in ORIG_MACROS {
            assert!(registry.get(orig).is_some(), "{} missing", orig);
        }
    }

    #[test]
    fn test_handlers() {
        let registry = MacroRegistry::default();

        assert!(registry.get("GDMAKE_MAIN").unwrap().handler.parser().is_none());
        assert!(registry.get(HOOK_MACRO).unwrap().handler.parser().is_some());
        assert_eq!(
            registry.get(DEBUG_MACRO).unwrap().scope,
            ReplaceScope::NoReplace
        );
        assert_eq!(registry.semantic().count(), 2);
    }

    #[test]
    fn test_define_line() {
        let registry = MacroRegistry::default();

        assert_eq!(
            registry.get("GDMAKE_MAIN").unwrap().define_line(),
            "#define GDMAKE_MAIN bool mod::loadMod(HMODULE)"
        );
        assert_eq!(
            registry.get("GDMAKE_ORIG_V").unwrap().define_line(),
            "#define GDMAKE_ORIG_V(...)"
        );
        assert_eq!(
            registry.get("GDMAKE_CREATE_HOOK").unwrap().define_line(),
            "#define GDMAKE_CREATE_HOOK(addr, detour, orig) MH_CreateHook((PVOID)(gd::base + addr), reinterpret_cast<LPVOID>(detour), reinterpret_cast<LPVOID*>(&orig))"
        );
    }

    #[test]
    fn test_formatted_description_wraps() {
        let registry = MacroRegistry::default();
        let desc = registry.get("GDMAKE_UNLOAD").unwrap().formatted_description();

        assert!(desc.lines().count() > 1);
        assert!(desc.lines().all(|line| line.starts_with(" * ")));
        assert!(desc.contains("unloaded"));
    }

    #[test]
    fn test_render_header() {
        let header = MacroRegistry::default().render_header();

        assert!(header.contains("#ifndef __GDMAKE_MACROS_H__"));
        assert!(header.contains("#define GDMAKE_ORIG_S(...) \"\""));
        assert!(header.contains("#define GDMAKE_LOG_HOOK(name) std::printf("));
        assert!(header.trim_end().ends_with("#endif"));
    }
}
