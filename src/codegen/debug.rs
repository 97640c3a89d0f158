//! Debug console header and command dispatcher.

use std::fmt::Write;

use rustc_hash::FxHashSet;

use crate::{parser::debug::DebugCommand, utils::escape_cpp};

use super::HEADER_CREDIT;

/// Renders `debug.h`, declaring every handler once.
pub fn render_debug_header(commands: &[DebugCommand]) -> String {
    let mut out = String::from(HEADER_CREDIT);
    out.push_str("#ifndef __GDMAKE_DEBUG_H__\n#define __GDMAKE_DEBUG_H__\n\n#include <string>\n#include <vector>\n\n");

    let mut seen = FxHashSet::default();
    for command in commands {
        if seen.insert(command.handler_name.as_str()) {
            let _ = writeln!(out, "{};", command.declaration());
        }
    }

    out.push_str("\n#endif\n");
    out
}

/// Renders the dispatcher statements for the console loop.
///
/// Expects the typed line in `inp` and its whitespace separated words in
/// `args`.
pub fn render_debug_dispatcher(commands: &[DebugCommand]) -> String {
    let mut out = String::from(HEADER_CREDIT);

    for command in commands {
        let _ = writeln!(
            out,
            "if (inp.rfind(\"{}\", 0) == 0) {}(args);",
            escape_cpp(&command.command),
            command.handler_name
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::debug_command;

    #[test]
    fn test_debug_header() {
        let header = render_debug_header(&[
            debug_command("dump", "args"),
            debug_command("reload", ""),
            debug_command("dump", "args"),
        ]);

        assert!(header.contains("#include <string>\n#include <vector>\n"));
        assert_eq!(
            header
                .matches("void dbg_dump(std::vector<std::string> args);")
                .count(),
            1
        );
        assert!(header.contains("void dbg_reload(std::vector<std::string>);"));
    }

    #[test]
    fn test_dispatcher() {
        let body = render_debug_dispatcher(&[debug_command("dump", "args"), debug_command("set-speed", "a")]);

        assert!(body.contains("if (inp.rfind(\"dump\", 0) == 0) dbg_dump(args);\n"));
        assert!(body.contains("if (inp.rfind(\"set-speed\", 0) == 0) dbg_set_speed(args);\n"));
    }
}
