//! The global settings file.
//!
//! Only the address overrides are consumed here; unknown keys are ignored so the
//! same file can carry settings for other tools.
//!
//! ```json
//! {
//!     "addresses": [
//!         ["MenuLayer::init", 1640368],
//!         ["PlayLayer.update", "0x2029c0"]
//!     ]
//! }
//! ```

use std::{fs, path::Path, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    address::{parse_address, AddressTable},
    Error, Result,
};

/// An address as written in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressValue {
    /// Plain JSON number
    Number(u64),
    /// `0x` prefixed hexadecimal or decimal string
    Text(String),
}

impl AddressValue {
    /// The offset this value denotes.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAddress`] if the value does not fit 32 bits or is
    /// not a number.
    pub fn resolve(&self) -> Result<u32> {
        match self {
            AddressValue::Number(value) => {
                u32::try_from(*value).map_err(|_| Error::InvalidAddress(value.to_string()))
            }
            AddressValue::Text(text) => parse_address(text),
        }
    }
}

/// One `[name, address]` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressEntry(pub String, pub AddressValue);

/// Contents of the settings file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// User address overrides, applied over the built-in table in order
    #[serde(default)]
    pub addresses: Vec<AddressEntry>,
}

impl Settings {
    /// Loads settings from a JSON file.
    ///
    /// # Errors
    /// Returns [`Error::FileError`] if the file cannot be read and
    /// [`Error::Settings`] if it is not valid.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        text.parse()
    }

    /// The built-in address table with these overrides applied.
    ///
    /// # Errors
    /// Returns [`Error::InvalidAddress`] for the first override whose value is
    /// not a valid address.
    pub fn address_table(&self) -> Result<AddressTable> {
        let mut table = AddressTable::with_builtins();
        let overrides = self
            .addresses
            .iter()
            .map(|AddressEntry(name, value)| value.resolve().map(|offset| (name.as_str(), offset)))
            .collect::<Result<Vec<_>>>()?;

        table.extend(overrides);
        Ok(table)
    }
}

impl FromStr for Settings {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_mixed_values() {
        let settings: Settings = r#"{
            "gdPath": "C:/Games/GD",
            "addresses": [["MenuLayer::init", 1640368], ["PlayLayer.update", "0x2029c0"]]
        }"#
        .parse()
        .unwrap();

        assert_eq!(settings.addresses.len(), 2);
        assert_eq!(settings.addresses[0].1, AddressValue::Number(1640368));

        let table = settings.address_table().unwrap();
        assert_eq!(table.resolve("MenuLayer.init"), Some(1640368));
        assert_eq!(table.resolve("PlayLayer::update"), Some(0x2029c0));
    }

    #[test]
    fn test_missing_addresses_key() {
        let settings: Settings = "{}".parse().unwrap();
        assert!(settings.addresses.is_empty());
        assert_eq!(
            settings.address_table().unwrap().len(),
            AddressTable::with_builtins().len()
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            "{\"addresses\": [[\"A.b\", \"nope\"]]}"
                .parse::<Settings>()
                .unwrap()
                .address_table(),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            "{\"addresses\": [[\"A.b\", 99999999999]]}"
                .parse::<Settings>()
                .unwrap()
                .address_table(),
            Err(Error::InvalidAddress(_))
        ));
        assert!(matches!(
            "{\"addresses\": [\"A.b\"]}".parse::<Settings>(),
            Err(Error::Settings(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"addresses\": [[\"Custom::fn\", \"0x10\"]]}}").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.address_table().unwrap().resolve("Custom.fn"), Some(0x10));

        assert!(matches!(
            Settings::from_file(Path::new("/definitely/not/here.json")),
            Err(Error::FileError(_))
        ));
    }
}
