//! `GDMAKE_HOOK` handling.
//!
//! A hook invocation wraps a plain function definition:
//!
//! ```cpp
//! GDMAKE_HOOK(MenuLayer::init)
//! bool __fastcall MenuLayer_init(gd::MenuLayer* self) {
//!     return GDMAKE_ORIG(self);
//! }
//! ```
//!
//! [`HookParser`] resolves the target, decomposes the signature, rewrites the
//! call-original placeholders to the trampoline (`MenuLayer_init_o`) and returns
//! the definition without the wrapper. The resulting [`Hook`] is what the
//! trampoline header and registration code in [`crate::codegen`] are built from.
//!
//! # Address forms
//!
//! Tried in this order:
//!
//! 1. `"module.dll::symbol"` - dynamic, looked up by export name at load time
//! 2. `0x1907b0` - fixed hexadecimal offset
//! 3. `MenuLayer::init` - symbolic, resolved through the [`AddressTable`]
//!
//! A target that fits none of them leaves the invocation unexpanded.

use std::path::PathBuf;

use bitflags::bitflags;

use crate::{
    address::{AddressTable, HookAddress},
    registry::{LOG_HOOK_MACRO, ORIG_MACROS},
    scanner::{find_macro, MacroSpan},
    Result,
};

use super::{
    signature::{parse_signature, CallingConvention},
    unquote, MacroParser, ParseContext, ParsedMacro,
};

bitflags! {
    /// Typed view of the well-known hook attributes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct HookFlags : u32 {
        /// Never inject call logging into this hook
        const NO_LOG = 0x0001;
    }
}

impl HookFlags {
    /// Maps attribute names onto flags. Unknown names are ignored.
    pub fn from_attributes(attributes: &[String]) -> Self {
        let mut flags = HookFlags::empty();
        for attribute in attributes {
            match attribute.as_str() {
                "NoLog" => flags |= HookFlags::NO_LOG,
                other => log::debug!("unknown hook attribute '{}'", other),
            }
        }
        flags
    }
}

/// A hook discovered in source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hook {
    /// Where the hook is installed
    pub address: HookAddress,
    /// Detour function name
    pub name: String,
    /// Return type of the detour
    pub return_type: String,
    /// Parameter list, without parentheses
    pub parameters: String,
    /// Calling convention of the hooked function
    pub calling_convention: Option<CallingConvention>,
    /// Signature as written in source, between the address argument and the body
    pub signature: String,
    /// Raw attribute names
    pub attributes: Vec<String>,
    /// Well-known attributes
    pub flags: HookFlags,
    /// Include, using and forward declaration lines of the enclosing file
    pub context: Vec<String>,
    /// Rewritten body, including its braces
    pub body: String,
    /// Source file the hook was defined in
    pub source: PathBuf,
}

impl Hook {
    /// Name of the trampoline variable holding the original function.
    pub fn trampoline(&self) -> String {
        trampoline_name(&self.name)
    }

    /// Module of a dynamic hook.
    pub fn module(&self) -> Option<&str> {
        match &self.address {
            HookAddress::Dynamic { module, .. } => Some(module),
            HookAddress::Offset(_) => None,
        }
    }

    /// Exported symbol of a dynamic hook.
    pub fn symbol(&self) -> Option<&str> {
        match &self.address {
            HookAddress::Dynamic { symbol, .. } => Some(symbol),
            HookAddress::Offset(_) => None,
        }
    }

    /// The body statements without the surrounding braces, trimmed.
    pub fn statements(&self) -> &str {
        self.body
            .strip_prefix('{')
            .and_then(|inner| inner.strip_suffix('}'))
            .unwrap_or(&self.body)
            .trim()
    }
}

fn trampoline_name(name: &str) -> String {
    format!("{}_o", name)
}

/// Resolves the address argument of a hook invocation.
///
/// Returns `None` if the argument is neither a dynamic pair, a hexadecimal
/// literal nor a known symbol.
pub fn resolve_address(argument: &str, addresses: &AddressTable) -> Option<HookAddress> {
    let argument = argument.trim();

    if argument.starts_with('"') && argument.contains("::") {
        let (module, symbol) = unquote(argument).split_once("::")?;
        let (module, symbol) = (module.trim(), symbol.trim());
        if module.is_empty() || symbol.is_empty() {
            return None;
        }
        return Some(HookAddress::Dynamic {
            module: module.to_string(),
            symbol: symbol.to_string(),
        });
    }

    if let Some(hex) = argument
        .strip_prefix("0x")
        .or_else(|| argument.strip_prefix("0X"))
    {
        if let Ok(offset) = u32::from_str_radix(hex, 16) {
            return Some(HookAddress::Offset(offset));
        }
    }

    addresses
        .resolve(unquote(argument))
        .map(HookAddress::Offset)
}

/// Replaces every call-original placeholder in `body` with the trampoline of
/// `name`, and optionally injects the call logging statement.
pub fn rewrite_body(body: &str, name: &str, log_calls: bool) -> String {
    let trampoline = trampoline_name(name);
    let mut rewritten = body.to_string();

    for placeholder in ORIG_MACROS {
        let mut cursor = 0;
        while let Some(at) = find_macro(&rewritten, placeholder, cursor) {
            rewritten.replace_range(at..at + placeholder.len(), &trampoline);
            cursor = at + trampoline.len();
        }
    }

    if log_calls {
        if let Some(open) = rewritten.find('{') {
            rewritten.insert_str(open + 1, &format!(" {}(\"{}\");", LOG_HOOK_MACRO, name));
        }
    }

    rewritten
}

/// Handler for `GDMAKE_HOOK`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HookParser;

impl MacroParser for HookParser {
    fn parse(&self, text: &str, span: &MacroSpan, ctx: &ParseContext<'_>) -> Result<ParsedMacro> {
        let argument = text[span.arguments.clone()].trim();

        let Some(address) = resolve_address(argument, ctx.addresses) else {
            return Ok(ParsedMacro::Unresolved {
                token: argument.to_string(),
            });
        };

        let function = &text[span.function.clone()];
        let body_at = span
            .body_offset(text)
            .ok_or_else(|| malformed_error!("Hook '{}' has no body", argument))?;
        let written_signature = &function[..body_at];
        let raw_signature = written_signature.trim();

        let signature = parse_signature(written_signature)?;
        let flags = HookFlags::from_attributes(&signature.attributes);
        let log_calls = ctx.add_log_to_hook && !flags.contains(HookFlags::NO_LOG);
        let body = rewrite_body(&function[body_at..], &signature.name, log_calls);

        // Signature goes back as written, minus the attribute marker
        let replacement = format!(
            "{}{}",
            signature.declaration.trim_start_matches([' ', '\t']),
            body
        );

        let hook = Hook {
            address,
            name: signature.name,
            return_type: signature.return_type,
            parameters: signature.parameters,
            calling_convention: signature.calling_convention,
            signature: raw_signature.to_string(),
            attributes: signature.attributes,
            flags,
            context: ctx.context_lines.to_vec(),
            body,
            source: ctx.source.to_path_buf(),
        };

        Ok(ParsedMacro::Hook { hook, replacement })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        registry::{ReplaceScope, HOOK_MACRO},
        scanner::extract_span,
        test::parse_context,
    };

    fn parse(text: &str, addresses: &AddressTable, log: bool) -> ParsedMacro {
        let at = find_macro(text, HOOK_MACRO, 0).unwrap();
        let span = extract_span(text, at, HOOK_MACRO, ReplaceScope::NextFunction).unwrap();
        let lines = vec!["#include <Windows.h>".to_string()];
        HookParser
            .parse(text, &span, &parse_context(addresses, log, &lines))
            .unwrap()
    }

    #[test]
    fn test_hex_hook() {
        let addresses = AddressTable::new();
        let parsed = parse(
            "GDMAKE_HOOK(0x1234) int __stdcall Foo(int a) { return GDMAKE_ORIG(a); }",
            &addresses,
            false,
        );

        let ParsedMacro::Hook { hook, replacement } = parsed else {
            panic!("expected a hook");
        };
        assert_eq!(hook.address, HookAddress::Offset(0x1234));
        assert_eq!(hook.name, "Foo");
        assert_eq!(hook.return_type, "int");
        assert_eq!(hook.parameters, "int a");
        assert_eq!(hook.calling_convention, Some(CallingConvention::Stdcall));
        assert_eq!(hook.signature, "int __stdcall Foo(int a)");
        assert_eq!(hook.statements(), "return Foo_o(a);");
        assert_eq!(hook.trampoline(), "Foo_o");
        assert_eq!(hook.context, ["#include <Windows.h>"]);
        assert_eq!(replacement, "int __stdcall Foo(int a) { return Foo_o(a); }");
    }

    #[test]
    fn test_symbolic_hook() {
        let addresses = AddressTable::with_builtins();
        let parsed = parse(
            "GDMAKE_HOOK(MenuLayer::init) bool __fastcall MenuLayer_init(void* self) { return GDMAKE_ORIG(self); }",
            &addresses,
            false,
        );

        let ParsedMacro::Hook { hook, .. } = parsed else {
            panic!("expected a hook");
        };
        assert_eq!(
            hook.address,
            HookAddress::Offset(addresses.resolve("MenuLayer.init").unwrap())
        );
    }

    #[test]
    fn test_dynamic_hook() {
        let addresses = AddressTable::new();
        let parsed = parse(
            "GDMAKE_HOOK(\"libcocos2d.dll::?update@CCScheduler@cocos2d@@UAEXM@Z\")\nvoid __fastcall update(void* self, void*, float dt) { GDMAKE_ORIG_V(self, 0, dt); }",
            &addresses,
            false,
        );

        let ParsedMacro::Hook { hook, .. } = parsed else {
            panic!("expected a hook");
        };
        assert_eq!(hook.module(), Some("libcocos2d.dll"));
        assert_eq!(hook.symbol(), Some("?update@CCScheduler@cocos2d@@UAEXM@Z"));
        assert_eq!(hook.statements(), "update_o(self, 0, dt);");
    }

    #[test]
    fn test_unresolved_hook() {
        let addresses = AddressTable::with_builtins();
        let parsed = parse(
            "GDMAKE_HOOK(NoSuch::thing) void f() {}",
            &addresses,
            false,
        );

        assert_eq!(
            parsed,
            ParsedMacro::Unresolved {
                token: "NoSuch::thing".to_string()
            }
        );
        assert!(parsed.replacement().is_none());
    }

    #[test]
    fn test_hex_before_symbol() {
        let mut addresses = AddressTable::new();
        addresses.insert("0x10", 0x99);

        assert_eq!(
            resolve_address("0x10", &addresses),
            Some(HookAddress::Offset(0x10))
        );
        assert_eq!(
            resolve_address("0xNOPE", &addresses),
            None
        );

        addresses.insert("0xNOPE", 0x77);
        assert_eq!(
            resolve_address("0xNOPE", &addresses),
            Some(HookAddress::Offset(0x77))
        );
    }

    #[test]
    fn test_quoted_forms() {
        let addresses = AddressTable::with_builtins();

        assert_eq!(
            resolve_address("\"MenuLayer.init\"", &addresses),
            Some(HookAddress::Offset(0x1907b0))
        );
        assert_eq!(resolve_address("\"::symbol\"", &addresses), None);
        assert_eq!(resolve_address("\"module.dll::\"", &addresses), None);
    }

    #[test]
    fn test_log_injection_and_no_log() {
        let addresses = AddressTable::new();

        let ParsedMacro::Hook { hook, .. } = parse(
            "GDMAKE_HOOK(0x10) void __fastcall A(int x) { GDMAKE_ORIG_V(x); }",
            &addresses,
            true,
        ) else {
            panic!("expected a hook");
        };
        assert_eq!(hook.statements(), "GDMAKE_LOG_HOOK(\"A\"); A_o(x);");

        let ParsedMacro::Hook { hook, replacement } = parse(
            "GDMAKE_HOOK(0x10) GDMAKE_ATTR(NoLog) void __fastcall B(int x) { GDMAKE_ORIG_V(x); }",
            &addresses,
            true,
        ) else {
            panic!("expected a hook");
        };
        assert!(hook.flags.contains(HookFlags::NO_LOG));
        assert_eq!(hook.attributes, ["NoLog"]);
        assert_eq!(hook.statements(), "B_o(x);");
        assert!(!replacement.contains("GDMAKE_ATTR"));
        assert!(!replacement.contains("GDMAKE_LOG_HOOK"));
    }

    #[test]
    fn test_rewrite_body_placeholder_family() {
        let body = "{ GDMAKE_ORIG_V(a); auto s = GDMAKE_ORIG_S(a); auto p = GDMAKE_ORIG_P(a); return GDMAKE_ORIG(a); }";
        assert_eq!(
            rewrite_body(body, "F", false),
            "{ F_o(a); auto s = F_o(a); auto p = F_o(a); return F_o(a); }"
        );
    }

    #[test]
    fn test_rewrite_body_keeps_comments() {
        let body = "{\n    // GDMAKE_ORIG(a) is the original\n    return GDMAKE_ORIG(a);\n}";
        assert_eq!(
            rewrite_body(body, "F", false),
            "{\n    // GDMAKE_ORIG(a) is the original\n    return F_o(a);\n}"
        );
    }

    #[test]
    fn test_hook_flags() {
        let flags = HookFlags::from_attributes(&["Custom".to_string(), "NoLog".to_string()]);
        assert_eq!(flags, HookFlags::NO_LOG);
        assert!(HookFlags::from_attributes(&[]).is_empty());
    }
}
