//! Trampoline header and hook registration.

use std::fmt::Write;

use rustc_hash::FxHashSet;

use crate::{address::HookAddress, parser::hook::Hook, utils::escape_cpp};

use super::HEADER_CREDIT;

fn convention_prefix(hook: &Hook) -> String {
    hook.calling_convention
        .map(|convention| format!("{} ", convention.keyword()))
        .unwrap_or_default()
}

/// Trampoline variable holding the original function.
///
/// `inline int (__stdcall* Foo_o)(int a);`
pub fn trampoline_declaration(hook: &Hook) -> String {
    let convention = hook
        .calling_convention
        .map(|convention| convention.keyword())
        .unwrap_or_default();

    format!(
        "inline {} ({}* {})({});",
        hook.return_type,
        convention,
        hook.trampoline(),
        hook.parameters
    )
}

/// Forward declaration of the detour.
///
/// `int __stdcall Foo(int a);`
pub fn detour_declaration(hook: &Hook) -> String {
    format!(
        "{} {}{}({});",
        hook.return_type,
        convention_prefix(hook),
        hook.name,
        hook.parameters
    )
}

/// Renders `hooks.h`.
///
/// The context lines of all hooks come first, deduplicated in first-seen
/// order, followed by the trampoline and detour of every hook.
pub fn render_hooks_header(hooks: &[Hook]) -> String {
    let mut out = String::from(HEADER_CREDIT);
    out.push_str("#ifndef __GDMAKE_HOOKS_H__\n#define __GDMAKE_HOOKS_H__\n\n#include <cstdio>\n");

    let mut seen = FxHashSet::default();
    for line in hooks.iter().flat_map(|hook| &hook.context) {
        if seen.insert(line.as_str()) {
            out.push_str(line);
            out.push('\n');
        }
    }

    for hook in hooks {
        let _ = writeln!(out, "\n// {} @ {}", hook.source.display(), hook.address);
        out.push_str(&trampoline_declaration(hook));
        out.push('\n');
        out.push_str(&detour_declaration(hook));
        out.push('\n');
    }

    out.push_str("\n#endif\n");
    out
}

/// Renders the statements creating every hook, for the body of the mod's load
/// function. Each creation returns `false` from the enclosing function on
/// failure.
pub fn render_hook_registration(hooks: &[Hook]) -> String {
    let mut out = String::from(HEADER_CREDIT);

    for hook in hooks {
        let create = match &hook.address {
            HookAddress::Offset(offset) => format!(
                "GDMAKE_CREATE_HOOK(0x{:x}, {}, {})",
                offset,
                hook.name,
                hook.trampoline()
            ),
            HookAddress::Dynamic { module, symbol } => format!(
                "MH_CreateHook(reinterpret_cast<LPVOID>(GetProcAddress(GetModuleHandleA(\"{}\"), \"{}\")), reinterpret_cast<LPVOID>({}), reinterpret_cast<LPVOID*>(&{}))",
                escape_cpp(module),
                escape_cpp(symbol),
                hook.name,
                hook.trampoline()
            ),
        };

        let _ = writeln!(out, "if ({} != MH_OK) [[unlikely]]\n    return false;", create);
    }

    out
}
