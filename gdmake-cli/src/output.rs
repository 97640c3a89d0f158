use comfy_table::{presets, CellAlignment, Table};
use serde::Serialize;

use crate::app::GlobalOptions;

/// Prints `data` as pretty JSON with `--json`, otherwise hands it to `display_fn`.
pub fn print_output<T: Serialize>(
    data: &T,
    opts: &GlobalOptions,
    display_fn: impl FnOnce(&T),
) -> anyhow::Result<()> {
    if opts.json {
        println!("{}", serde_json::to_string_pretty(data)?);
    } else {
        display_fn(data);
    }
    Ok(())
}

/// A borderless table column.
pub struct Column<'a> {
    pub header: &'a str,
    pub right: bool,
}

impl<'a> Column<'a> {
    pub fn left(header: &'a str) -> Self {
        Self {
            header,
            right: false,
        }
    }

    pub fn right(header: &'a str) -> Self {
        Self {
            header,
            right: true,
        }
    }
}

/// Prints `rows` as whitespace aligned columns under a two space indent.
pub fn print_table(columns: &[Column], rows: impl IntoIterator<Item = Vec<String>>) {
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    table.set_header(columns.iter().map(|column| column.header));
    table.add_rows(rows);

    for (index, column) in columns.iter().enumerate() {
        if let Some(col) = table.column_mut(index) {
            if column.right {
                col.set_cell_alignment(CellAlignment::Right);
            }
            col.set_padding((0, 2));
        }
    }

    for line in table.lines() {
        println!("  {}", line.trim_end());
    }
}
