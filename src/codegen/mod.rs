//! Generated support files.
//!
//! After a run the collected hooks and debug commands are turned into the C++
//! that wires them up:
//!
//! | File | Contents |
//! |---|---|
//! | `hooks.h` | Trampolines and detour declarations, included by every file with a hook |
//! | `hooks.inc` | Hook creation statements for the mod's load function |
//! | `debug.h` | Handler declarations, included by every file with a debug command |
//! | `debug.inc` | Dispatcher statements for the console loop |
//! | `GDMakeMacros.h` | `#define`s of every macro, for the compiler |
//!
//! # Usage Examples
//!
//! ```rust,no_run
//! use gdmake::{codegen::Artifacts, prelude::*};
//! use std::path::Path;
//!
//! let result = Preprocessor::new("mod/src", "mod/build/src").run()?;
//! let artifacts = Artifacts::render(&result.hooks, &result.commands, &MacroRegistry::default());
//! for path in artifacts.write_to(Path::new("mod/build/src"))? {
//!     println!("generated {}", path.display());
//! }
//! # Ok::<(), gdmake::Error>(())
//! ```

mod debug;
mod hooks;

pub use debug::{render_debug_dispatcher, render_debug_header};
pub use hooks::{
    detour_declaration, render_hook_registration, render_hooks_header, trampoline_declaration,
};

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    parser::{debug::DebugCommand, hook::Hook},
    registry::MacroRegistry,
    Result,
};

/// First line of every generated file.
pub const HEADER_CREDIT: &str = "// generated through GDMake https://github.com/HJfod/GDMake\n";

/// Trampoline header included by files containing hooks.
pub const HOOKS_HEADER: &str = "hooks.h";
/// Hook creation statements.
pub const HOOKS_REGISTRATION: &str = "hooks.inc";
/// Handler header included by files containing debug commands.
pub const DEBUG_HEADER: &str = "debug.h";
/// Console dispatcher statements.
pub const DEBUG_DISPATCHER: &str = "debug.inc";
/// Compiler-visible macro table.
pub const MACROS_HEADER: &str = "GDMakeMacros.h";

/// The rendered support files of one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifacts {
    /// `hooks.h`
    pub hooks_header: String,
    /// `hooks.inc`
    pub hook_registration: String,
    /// `debug.h`
    pub debug_header: String,
    /// `debug.inc`
    pub debug_dispatcher: String,
    /// `GDMakeMacros.h`
    pub macros_header: String,
}

impl Artifacts {
    /// Renders every support file.
    pub fn render(hooks: &[Hook], commands: &[DebugCommand], registry: &MacroRegistry) -> Self {
        Self {
            hooks_header: render_hooks_header(hooks),
            hook_registration: render_hook_registration(hooks),
            debug_header: render_debug_header(commands),
            debug_dispatcher: render_debug_dispatcher(commands),
            macros_header: registry.render_header(),
        }
    }

    /// File names paired with their contents.
    pub fn files(&self) -> [(&'static str, &str); 5] {
        [
            (HOOKS_HEADER, &self.hooks_header),
            (HOOKS_REGISTRATION, &self.hook_registration),
            (DEBUG_HEADER, &self.debug_header),
            (DEBUG_DISPATCHER, &self.debug_dispatcher),
            (MACROS_HEADER, &self.macros_header),
        ]
    }

    /// Writes every file into `directory`, creating it if needed.
    ///
    /// Files whose contents did not change are left alone so their timestamps
    /// do not trigger rebuilds.
    ///
    /// # Errors
    /// Returns [`crate::Error::FileError`] if a file cannot be written.
    pub fn write_to(&self, directory: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(directory)?;

        let mut written = Vec::new();
        for (name, contents) in self.files() {
            let path = directory.join(name);
            if fs::read_to_string(&path).is_ok_and(|existing| existing == contents) {
                log::debug!("{} unchanged", path.display());
                continue;
            }
            fs::write(&path, contents)?;
            written.push(path);
        }

        Ok(written)
    }
}
