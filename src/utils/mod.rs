//! Path and literal helpers shared by the file processor, the tree driver and codegen.

mod escape;
mod paths;

pub(crate) use escape::escape_cpp;
pub(crate) use paths::{include_path, normalize_lexically};
