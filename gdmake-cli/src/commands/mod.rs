pub mod addresses;
pub mod common;
pub mod macros;
pub mod preprocess;
