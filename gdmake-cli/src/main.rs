mod app;
mod commands;
mod output;

use anyhow::Context;
use clap::Parser;

use crate::app::{Cli, Command};

fn main() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        eprintln!("\nCancelled.");
        std::process::exit(130);
    })
    .context("failed to set Ctrl+C handler")?;

    let cli = Cli::parse();

    // gdmake info+ on stderr unless --json; --verbose enables debug; RUST_LOG overrides
    if !cli.global.json {
        let level = if cli.global.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        };
        env_logger::Builder::new()
            .filter_module("gdmake", level)
            .parse_default_env()
            .target(env_logger::Target::Stderr)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(false)
            .init();
    }

    match &cli.command {
        Command::Preprocess {
            source,
            destination,
            full_regen,
            log_hooks,
            settings,
            no_codegen,
        } => commands::preprocess::run(
            source,
            destination,
            &commands::preprocess::PreprocessOptions {
                full_regen: *full_regen,
                log_hooks: *log_hooks,
                settings: settings.as_deref(),
                codegen: !*no_codegen,
                global: &cli.global,
            },
        ),
        Command::Macros { out } => commands::macros::run(out.as_deref(), &cli.global),
        Command::Addresses { settings, filter } => {
            commands::addresses::run(settings.as_deref(), filter.as_deref(), &cli.global)
        }
    }
}
