use std::path::Path;

use anyhow::Context;
use gdmake::{
    codegen::Artifacts, registry::MacroRegistry, PreprocessResult, Preprocessor,
};
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::load_addresses,
    output::{print_output, print_table, Column},
};

/// Switches of the `preprocess` subcommand.
pub struct PreprocessOptions<'a> {
    pub full_regen: bool,
    pub log_hooks: bool,
    pub settings: Option<&'a Path>,
    pub codegen: bool,
    pub global: &'a GlobalOptions,
}

#[derive(Debug, Serialize)]
struct HookInfo {
    name: String,
    address: String,
    dynamic: bool,
    file: String,
}

#[derive(Debug, Serialize)]
struct CommandInfo {
    command: String,
    handler: String,
    file: String,
}

#[derive(Debug, Serialize)]
struct DiagnosticInfo {
    severity: String,
    category: String,
    message: String,
    file: Option<String>,
    token: Option<String>,
}

#[derive(Debug, Serialize)]
struct PreprocessSummary {
    processed: usize,
    written: usize,
    unchanged: usize,
    failed: usize,
    macros: usize,
    unresolved: usize,
    warnings: usize,
    errors: usize,
    hooks: Vec<HookInfo>,
    commands: Vec<CommandInfo>,
    generated: Vec<String>,
    diagnostics: Vec<DiagnosticInfo>,
}

pub fn run(source: &Path, destination: &Path, options: &PreprocessOptions) -> anyhow::Result<()> {
    let addresses = load_addresses(options.settings)?;

    let result = Preprocessor::new(source, destination)
        .full_regen(options.full_regen)
        .verbose(options.global.verbose)
        .add_log_to_hook(options.log_hooks)
        .with_addresses(addresses)
        .run()
        .with_context(|| format!("failed to preprocess {}", source.display()))?;

    let generated = if options.codegen {
        let artifacts = Artifacts::render(&result.hooks, &result.commands, &MacroRegistry::default());
        artifacts
            .write_to(destination)
            .with_context(|| format!("failed to write support files to {}", destination.display()))?
    } else {
        Vec::new()
    };

    let summary = summarize(&result, source, &generated);

    print_output(&summary, options.global, display_summary)
}

fn relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn summarize(result: &PreprocessResult, source: &Path, generated: &[std::path::PathBuf]) -> PreprocessSummary {
    // Paths in the result are canonical; strip the canonical root for display
    let root = source.canonicalize().unwrap_or_else(|_| source.to_path_buf());

    PreprocessSummary {
        processed: result.processed_count,
        written: result.written_count,
        unchanged: result.unchanged_count,
        failed: result.failed_count,
        macros: result.macro_count,
        unresolved: result.unresolved_count(),
        warnings: result.diagnostics.warning_count(),
        errors: result.diagnostics.error_count(),
        hooks: result
            .hooks
            .iter()
            .map(|hook| HookInfo {
                name: hook.name.clone(),
                address: hook.address.to_string(),
                dynamic: hook.address.is_dynamic(),
                file: relative(&hook.source, &root),
            })
            .collect(),
        commands: result
            .commands
            .iter()
            .map(|command| CommandInfo {
                command: command.command.clone(),
                handler: command.handler_name.clone(),
                file: relative(&command.source, &root),
            })
            .collect(),
        generated: generated.iter().map(|path| path.display().to_string()).collect(),
        diagnostics: result
            .diagnostics
            .iter()
            .map(|diagnostic| DiagnosticInfo {
                severity: diagnostic.severity.to_string(),
                category: diagnostic.category.to_string(),
                message: diagnostic.message.clone(),
                file: diagnostic.file.as_deref().map(|file| relative(file, &root)),
                token: diagnostic.token.clone(),
            })
            .collect(),
    }
}

fn display_summary(summary: &PreprocessSummary) {
    if !summary.hooks.is_empty() {
        println!("Hooks ({} entries):", summary.hooks.len());
        print_table(
            &[Column::left("Name"), Column::left("Address"), Column::left("File")],
            summary
                .hooks
                .iter()
                .map(|hook| vec![hook.name.clone(), hook.address.clone(), hook.file.clone()]),
        );
        println!();
    }

    if !summary.commands.is_empty() {
        println!("Debug commands ({} entries):", summary.commands.len());
        print_table(
            &[Column::left("Command"), Column::left("Handler"), Column::left("File")],
            summary.commands.iter().map(|command| {
                vec![
                    command.command.clone(),
                    command.handler.clone(),
                    command.file.clone(),
                ]
            }),
        );
        println!();
    }

    for diagnostic in &summary.diagnostics {
        let location = diagnostic.file.as_deref().unwrap_or("-");
        match &diagnostic.token {
            Some(token) => println!(
                "[{}] {}: {} '{}' ({})",
                diagnostic.severity, diagnostic.category, diagnostic.message, token, location
            ),
            None => println!(
                "[{}] {}: {} ({})",
                diagnostic.severity, diagnostic.category, diagnostic.message, location
            ),
        }
    }

    println!(
        "Processed {} files: {} written, {} unchanged, {} failed, {} macros expanded",
        summary.processed, summary.written, summary.unchanged, summary.failed, summary.macros
    );
    if summary.warnings + summary.errors > 0 {
        println!("{} warnings, {} errors", summary.warnings, summary.errors);
    }
    if summary.unresolved > 0 {
        println!("{} hooks could not be resolved and were left inert", summary.unresolved);
    }
    if !summary.generated.is_empty() {
        println!("Generated {} support files", summary.generated.len());
    }
}
