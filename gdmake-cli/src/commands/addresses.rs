use std::path::Path;

use serde::Serialize;

use crate::{
    app::GlobalOptions,
    commands::common::{hex, load_addresses},
    output::{print_output, print_table, Column},
};

#[derive(Debug, Serialize)]
struct AddressInfo {
    name: String,
    offset: u32,
}

pub fn run(settings: Option<&Path>, filter: Option<&str>, opts: &GlobalOptions) -> anyhow::Result<()> {
    let table = load_addresses(settings)?;

    let entries: Vec<AddressInfo> = table
        .sorted()
        .into_iter()
        .filter(|(name, _)| filter.map_or(true, |needle| name.contains(needle)))
        .map(|(name, offset)| AddressInfo {
            name: name.to_string(),
            offset,
        })
        .collect();

    print_output(&entries, opts, |entries| {
        if entries.is_empty() {
            println!("No addresses found.");
            return;
        }

        println!("Addresses ({} entries):", entries.len());
        print_table(
            &[Column::left("Name"), Column::right("Offset")],
            entries
                .iter()
                .map(|entry| vec![entry.name.clone(), hex(entry.offset)]),
        );
    })
}
