//! Whole-tree preprocessing.
//!
//! [`Preprocessor`] mirrors a source tree into a destination tree, expanding
//! every source file on the way, and collects the hooks and debug commands the
//! generated support files are built from.
//!
//! # Key Components
//!
//! - [`Preprocessor`] - Builder configuring and running one pass over a tree
//! - [`PreprocessResult`] - Aggregated hooks, commands, counts and diagnostics
//! - [`source_files`] - The files a pass picks up

mod loader;
mod result;

pub use loader::{source_files, Preprocessor, SOURCE_EXTENSIONS};
pub use result::PreprocessResult;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::write_tree;

    #[test]
    fn test_source_files_filters_extensions() {
        let dir = tempfile::tempdir().unwrap();
        write_tree(
            dir.path(),
            &[
                ("main.cpp", ""),
                ("ui/menu.hpp", ""),
                ("legacy.c", ""),
                ("notes.txt", ""),
                ("CMakeLists.txt", ""),
                ("build/out.cpp", ""),
            ],
        );

        let files = source_files(dir.path(), &dir.path().join("build")).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.strip_prefix(dir.path()).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();

        assert_eq!(names, ["legacy.c", "main.cpp", "ui/menu.hpp"]);
    }

    #[test]
    fn test_run_aggregates_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("src");
        write_tree(
            &src,
            &[
                ("b.cpp", "GDMAKE_HOOK(0x20) void B() { GDMAKE_ORIG_V(); }\n"),
                (
                    "a.cpp",
                    "GDMAKE_HOOK(0x10) void A1() {}\nGDMAKE_HOOK(0x11) void A2() {}\nGDMAKE_DEBUG(dump, args) {}\n",
                ),
                ("broken.cpp", "GDMAKE_HOOK(0x30) void C() {\n"),
                ("unresolved.cpp", "GDMAKE_HOOK(Nope::nope) void D() {}\n"),
            ],
        );

        let result = Preprocessor::new(&src, dir.path().join("out")).run().unwrap();

        let names: Vec<_> = result.hooks.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(names, ["A1", "A2", "B"]);
        assert_eq!(result.commands.len(), 1);
        assert_eq!(result.processed_count, 3);
        assert_eq!(result.written_count, 3);
        assert_eq!(result.failed_count, 1);
        assert_eq!(result.macro_count, 4);
        assert_eq!(result.unresolved_count(), 1);
        assert!(result.failed_files[0].0.ends_with("broken.cpp"));
        assert!(result.diagnostics.has_errors());
        assert!(!dir.path().join("out/broken.cpp").exists());
        assert!(dir.path().join("out/unresolved.cpp").exists());
    }

    #[test]
    fn test_missing_source_root() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Preprocessor::new(dir.path().join("nope"), dir.path().join("out"))
            .run()
            .is_err());
        assert!(Preprocessor::new(dir.path(), dir.path()).run().is_err());
    }
}
