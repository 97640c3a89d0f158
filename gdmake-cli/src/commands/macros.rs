use std::path::Path;

use anyhow::Context;
use gdmake::registry::MacroRegistry;
use serde::Serialize;

use crate::{
    app::GlobalOptions,
    output::{print_output, print_table, Column},
};

#[derive(Debug, Serialize)]
struct MacroInfo {
    name: String,
    define: String,
    expanded: bool,
    description: String,
}

pub fn run(out: Option<&Path>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let registry = MacroRegistry::default();

    if let Some(path) = out {
        std::fs::write(path, registry.render_header())
            .with_context(|| format!("failed to write {}", path.display()))?;
        log::info!("wrote {} macros to {}", registry.len(), path.display());
        return Ok(());
    }

    if !opts.json {
        print!("{}", registry.render_header());
        return Ok(());
    }

    let macros: Vec<MacroInfo> = registry
        .iter()
        .map(|spec| MacroInfo {
            name: spec.name.to_string(),
            define: spec.define_line(),
            expanded: spec.is_semantic(),
            description: spec.description.to_string(),
        })
        .collect();

    print_output(&macros, opts, |macros| {
        print_table(
            &[Column::left("Name"), Column::left("Expanded")],
            macros
                .iter()
                .map(|info| vec![info.name.clone(), info.expanded.to_string()]),
        );
    })
}
