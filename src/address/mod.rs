//! Symbolic hook target resolution.
//!
//! This module provides the [`AddressTable`], the mapping from human readable
//! symbol names such as `MenuLayer::init` to fixed offsets inside the target
//! module, and [`HookAddress`], the resolved target a hook is installed on.
//!
//! # Key Components
//!
//! - [`AddressTable`] - Normalized symbol → offset map, seeded with built-in entries
//! - [`HookAddress`] - Either a fixed offset or a dynamic `(module, symbol)` pair
//! - [`normalize_symbol`] - Canonical `Type.method` spelling used for lookups
//!
//! # Usage Examples
//!
//! ```rust
//! use gdmake::address::AddressTable;
//!
//! let mut table = AddressTable::with_builtins();
//! table.insert("PlayLayer::update", 0x2029c0);
//!
//! assert_eq!(table.resolve("PlayLayer.update"), Some(0x2029c0));
//! assert_eq!(table.resolve("MenuLayer::init"), table.resolve("MenuLayer.init"));
//! assert_eq!(table.resolve("Nope::nothing"), None);
//! ```
//!
//! # Thread Safety
//!
//! The table is built once before a run and only read afterwards, so it is
//! shared by reference between all worker threads.

mod builtin;

use std::fmt;

use rustc_hash::FxHashMap;

use crate::{Error, Result};

/// Canonical spelling of a symbolic hook name.
///
/// Scope separators (`::`) become `.` and all whitespace is removed, so
/// `MenuLayer :: init` and `MenuLayer.init` share a key.
pub fn normalize_symbol(name: &str) -> String {
    name.replace("::", ".")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect()
}

/// Parses a user supplied address literal.
///
/// Accepts `0x`-prefixed hexadecimal and plain decimal.
///
/// # Errors
/// Returns [`Error::InvalidAddress`] if the literal is neither.
pub fn parse_address(literal: &str) -> Result<u32> {
    let literal = literal.trim();
    let parsed = match literal
        .strip_prefix("0x")
        .or_else(|| literal.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => literal.parse::<u32>(),
    };

    parsed.map_err(|_| Error::InvalidAddress(literal.to_string()))
}

/// The target a hook is installed on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HookAddress {
    /// Fixed offset relative to the base of the target module.
    Offset(u32),
    /// Exported symbol looked up at load time.
    Dynamic {
        /// Module exporting the symbol, e.g. `libcocos2d.dll`
        module: String,
        /// Exported symbol name
        symbol: String,
    },
}

impl HookAddress {
    /// Returns the fixed offset, if this is a static hook.
    pub fn offset(&self) -> Option<u32> {
        match self {
            HookAddress::Offset(offset) => Some(*offset),
            HookAddress::Dynamic { .. } => None,
        }
    }

    /// Returns true if the target is resolved at load time.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, HookAddress::Dynamic { .. })
    }
}

impl fmt::Display for HookAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookAddress::Offset(offset) => write!(f, "0x{:x}", offset),
            HookAddress::Dynamic { module, symbol } => write!(f, "{}::{}", module, symbol),
        }
    }
}

/// Mapping from normalized symbol names to offsets.
///
/// Keys are normalized on insertion and on lookup, see [`normalize_symbol`].
/// An offset of `0` is never a valid hook target and resolves to `None`.
#[derive(Debug, Clone, Default)]
pub struct AddressTable {
    entries: FxHashMap<String, u32>,
}

impl AddressTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }

    /// Creates a table seeded with the built-in entries.
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut table = Self::new();
        for (name, offset) in builtin::BUILTIN_ADDRESSES {
            table.insert(name, *offset);
        }
        table
    }

    /// Inserts or overrides an entry.
    ///
    /// Returns the previous offset if the normalized name was already present.
    pub fn insert(&mut self, name: &str, offset: u32) -> Option<u32> {
        self.entries.insert(normalize_symbol(name), offset)
    }

    /// Merges a list of overrides into the table. Later entries win.
    pub fn extend<I, S>(&mut self, overrides: I)
    where
        I: IntoIterator<Item = (S, u32)>,
        S: AsRef<str>,
    {
        for (name, offset) in overrides {
            if let Some(previous) = self.insert(name.as_ref(), offset) {
                log::debug!(
                    "address override {} : 0x{:x} -> 0x{:x}",
                    name.as_ref(),
                    previous,
                    offset
                );
            }
        }
    }

    /// Looks up a symbolic name.
    pub fn resolve(&self, name: &str) -> Option<u32> {
        match self.entries.get(&normalize_symbol(name)) {
            Some(0) | None => None,
            Some(offset) => Some(*offset),
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries sorted by name.
    pub fn sorted(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self
            .entries
            .iter()
            .map(|(name, offset)| (name.as_str(), *offset))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol("MenuLayer::init"), "MenuLayer.init");
        assert_eq!(normalize_symbol(" MenuLayer :: init "), "MenuLayer.init");
        assert_eq!(normalize_symbol("MenuLayer.init"), "MenuLayer.init");
    }

    #[test]
    fn test_builtin_resolution() {
        let table = AddressTable::with_builtins();

        assert_eq!(table.resolve("MenuLayer.init"), Some(0x1907b0));
        assert_eq!(table.resolve("MenuLayer::init"), Some(0x1907b0));
        assert_eq!(table.resolve("PlayLayer::init"), Some(0x1fb780));
        assert!(table.resolve("MenuLayer::nope").is_none());
    }

    #[test]
    fn test_zero_is_unresolved() {
        let mut table = AddressTable::new();
        table.insert("Broken::entry", 0);

        assert_eq!(table.len(), 1);
        assert!(table.resolve("Broken::entry").is_none());
    }

    #[test]
    fn test_overrides_win() {
        let mut table = AddressTable::with_builtins();
        let before = table.len();

        table.extend(vec![("MenuLayer::init", 0x1234_u32), ("Custom.thing", 0x42)]);

        assert_eq!(table.len(), before + 1);
        assert_eq!(table.resolve("MenuLayer.init"), Some(0x1234));
        assert_eq!(table.resolve("Custom::thing"), Some(0x42));
    }

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x1907b0").unwrap(), 0x1907b0);
        assert_eq!(parse_address("0X10").unwrap(), 0x10);
        assert_eq!(parse_address(" 1640368 ").unwrap(), 1640368);
        assert!(matches!(
            parse_address("0xZZ"),
            Err(Error::InvalidAddress(_))
        ));
        assert!(parse_address("MenuLayer").is_err());
    }

    #[test]
    fn test_hook_address_display() {
        assert_eq!(HookAddress::Offset(0x1234).to_string(), "0x1234");

        let dynamic = HookAddress::Dynamic {
            module: "libcocos2d.dll".to_string(),
            symbol: "?update@CCScheduler@cocos2d@@UAEXM@Z".to_string(),
        };
        assert!(dynamic.is_dynamic());
        assert_eq!(dynamic.offset(), None);
        assert_eq!(
            dynamic.to_string(),
            "libcocos2d.dll::?update@CCScheduler@cocos2d@@UAEXM@Z"
        );
    }
}
