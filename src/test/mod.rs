//! Fixtures for unit tests.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    address::{AddressTable, HookAddress},
    parser::{
        debug::{handler_name, DebugCommand},
        hook::{Hook, HookFlags},
        signature::CallingConvention,
        ParseContext,
    },
};

// Helper function to create a ParseContext for a file named test.cpp
pub fn parse_context<'a>(
    addresses: &'a AddressTable,
    add_log_to_hook: bool,
    context_lines: &'a [String],
) -> ParseContext<'a> {
    ParseContext {
        source: Path::new("test.cpp"),
        addresses,
        add_log_to_hook,
        context_lines,
    }
}

// Helper function to create a DebugCommand
pub fn debug_command(command: &str, args_var: &str) -> DebugCommand {
    DebugCommand {
        command: command.to_string(),
        args_var: args_var.to_string(),
        body: "{}".to_string(),
        handler_name: handler_name(command),
        source: PathBuf::from("test.cpp"),
    }
}

/// Builds [`Hook`] records without going through the parser.
pub struct HookBuilder {
    hook: Hook,
}

impl HookBuilder {
    /// A `void name()` hook at offset `0x1000`.
    pub fn new(name: &str) -> Self {
        Self {
            hook: Hook {
                address: HookAddress::Offset(0x1000),
                name: name.to_string(),
                return_type: "void".to_string(),
                parameters: String::new(),
                calling_convention: None,
                signature: format!("void {}()", name),
                attributes: Vec::new(),
                flags: HookFlags::empty(),
                context: Vec::new(),
                body: "{}".to_string(),
                source: PathBuf::from("test.cpp"),
            },
        }
    }

    pub fn offset(mut self, offset: u32) -> Self {
        self.hook.address = HookAddress::Offset(offset);
        self
    }

    pub fn dynamic(mut self, module: &str, symbol: &str) -> Self {
        self.hook.address = HookAddress::Dynamic {
            module: module.to_string(),
            symbol: symbol.to_string(),
        };
        self
    }

    pub fn returns(mut self, return_type: &str) -> Self {
        self.hook.return_type = return_type.to_string();
        self
    }

    pub fn parameters(mut self, parameters: &str) -> Self {
        self.hook.parameters = parameters.to_string();
        self
    }

    pub fn stdcall(mut self) -> Self {
        self.hook.calling_convention = Some(CallingConvention::Stdcall);
        self
    }

    pub fn context(mut self, lines: &[&str]) -> Self {
        self.hook.context = lines.iter().map(|line| line.to_string()).collect();
        self
    }

    pub fn build(self) -> Hook {
        self.hook
    }
}

/// Writes `files` (relative path, contents) below `root`, creating directories.
pub fn write_tree(root: &Path, files: &[(&str, &str)]) {
    for (relative, contents) in files {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }
}
