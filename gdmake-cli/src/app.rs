use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// gdmake - macro-expanding preprocessor and hook generator for C++ mods
#[derive(Debug, Parser)]
#[command(name = "gdmake", version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared across all subcommands.
#[derive(Debug, Parser)]
pub struct GlobalOptions {
    /// Emit output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose (debug-level) logging and per-file macro counts.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Expand every macro in a source tree into a mirrored destination tree.
    Preprocess {
        /// Root of the mod sources.
        #[arg(value_name = "SRC")]
        source: PathBuf,

        /// Root of the rewritten tree; created if missing.
        #[arg(value_name = "DST")]
        destination: PathBuf,

        /// Rewrite every file, even when the destination is up to date.
        #[arg(long)]
        full_regen: bool,

        /// Log every hook call unless the hook has the NoLog attribute.
        #[arg(long)]
        log_hooks: bool,

        /// JSON settings file with address overrides.
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Only rewrite sources; do not generate hooks.h, debug.h and friends.
        #[arg(long)]
        no_codegen: bool,
    },

    /// Print or write GDMakeMacros.h.
    Macros {
        /// Write the header to this file instead of stdout.
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// List the merged symbolic address table.
    Addresses {
        /// JSON settings file with address overrides.
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,

        /// Show only names containing this substring.
        #[arg(long, value_name = "TEXT")]
        filter: Option<String>,
    },
}
