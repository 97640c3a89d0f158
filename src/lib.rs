// Copyright 2025 gdmake contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # gdmake
//!
//! A macro-expanding preprocessor for native C/C++ mod projects.
//!
//! Mod sources annotate plain C++ with a handful of domain macros: `GDMAKE_HOOK`
//! turns the following function into a detour installed on a game function,
//! `GDMAKE_DEBUG` turns a block into a debug console command. `gdmake` finds
//! those invocations in arbitrary, not necessarily well-formed source text,
//! rewrites them into ordinary C++ and collects everything needed to generate
//! the trampolines, registration code and console dispatcher that wire them up.
//!
//! There is no C++ parser involved. Scanning is comment aware and delimiter
//! balanced, signatures are decomposed ad hoc, and hook targets are resolved
//! from fixed offsets, exported symbols or a symbolic address table.
//!
//! ## Features
//!
//! - **Comment-aware scanning** - invocations inside `//` and `/* */` are never expanded
//! - **Three address forms** - hexadecimal offsets, `Type::method` names and `"module.dll::symbol"` exports
//! - **Incremental output** - unchanged sources never touch their destination file
//! - **Parallel** - files are expanded concurrently with `rayon`
//! - **Lenient** - a broken file or unknown hook target is reported, never fatal for the run
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gdmake::prelude::*;
//! use std::path::Path;
//!
//! let result = Preprocessor::new("mod/src", "mod/build/src")
//!     .add_log_to_hook(true)
//!     .run()?;
//!
//! for hook in &result.hooks {
//!     println!("{} -> {}", hook.name, hook.address);
//! }
//!
//! let artifacts = Artifacts::render(&result.hooks, &result.commands, &MacroRegistry::default());
//! artifacts.write_to(Path::new("mod/build/src"))?;
//! # Ok::<(), gdmake::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`scanner`] - Finding invocations and cutting their spans
//! - [`registry`] - The macro catalog and the exported `GDMakeMacros.h`
//! - [`parser`] - Hook and debug command handlers
//! - [`address`] - Symbolic address table and hook targets
//! - [`processor`] - Expansion and incremental write of one file
//! - [`project`] - Parallel expansion of a whole tree
//! - [`codegen`] - `hooks.h`, `debug.h` and the registration and dispatch code
//! - [`settings`] - The JSON settings file
//! - [`diagnostics`] - Non-fatal problems collected during a run

#[macro_use]
pub(crate) mod error;
pub(crate) mod utils;

/// Shared functionality which is used in unit- and integration-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use gdmake::prelude::*;
///
/// let table = AddressTable::with_builtins();
/// assert!(table.resolve("MenuLayer::init").is_some());
/// ```
pub mod prelude;

pub mod address;
pub mod codegen;
pub mod diagnostics;
pub mod parser;
pub mod processor;
pub mod project;
pub mod registry;
pub mod scanner;
pub mod settings;

/// `gdmake` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
///
/// # Examples
///
/// ```rust,no_run
/// use gdmake::{project::{Preprocessor, PreprocessResult}, Result};
///
/// fn preprocess(src: &str, dst: &str) -> Result<PreprocessResult> {
///     Preprocessor::new(src, dst).run()
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// `gdmake` Error type
///
/// # Examples
///
/// ```rust,no_run
/// use gdmake::{project::Preprocessor, Error};
///
/// match Preprocessor::new("mod/src", "mod/build/src").run() {
///     Ok(result) => println!("{} files", result.success_count()),
///     Err(Error::FileError(e)) => println!("I/O: {}", e),
///     Err(e) => println!("Error: {}", e),
/// }
/// ```
pub use error::Error;

pub use address::{AddressTable, HookAddress};
pub use project::{PreprocessResult, Preprocessor};
