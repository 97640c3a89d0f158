use std::path::Path;

use anyhow::Context;
use gdmake::{settings::Settings, AddressTable};

/// The built-in address table, merged with the overrides of `settings` if given.
pub fn load_addresses(settings: Option<&Path>) -> anyhow::Result<AddressTable> {
    let Some(path) = settings else {
        return Ok(AddressTable::with_builtins());
    };

    let settings = Settings::from_file(path)
        .with_context(|| format!("failed to load settings: {}", path.display()))?;
    log::debug!(
        "{} address overrides from {}",
        settings.addresses.len(),
        path.display()
    );

    settings
        .address_table()
        .with_context(|| format!("invalid address in {}", path.display()))
}

/// Format an offset the way generated code spells it.
pub fn hex(offset: u32) -> String {
    format!("0x{offset:x}")
}
