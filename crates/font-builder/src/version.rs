//! Font version handling.

use font_types::Fixed;

use crate::{Error, Result};

/// Font version information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontVersion {
    pub major: u16,
    pub minor: u16,
    /// Version as given (e.g., "1.0.0").
    pub tag: String,
}

impl FontVersion {
    /// Parse `MAJOR.MINOR` or `MAJOR.MINOR.PATCH`.
    ///
    /// The patch component is kept in the tag only; `head` and the name
    /// table can express three decimal places of minor version.
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = || Error::InvalidVersion(value.to_string());

        let parts: Vec<&str> = value.trim().split('.').collect();
        let (major, minor) = match parts.as_slice() {
            [major, minor] | [major, minor, _] => (*major, *minor),
            _ => return Err(invalid()),
        };
        if let [_, _, patch] = parts.as_slice() {
            patch.parse::<u32>().map_err(|_| invalid())?;
        }

        let major = major.parse::<u16>().map_err(|_| invalid())?;
        let minor = minor.parse::<u16>().map_err(|_| invalid())?;
        if minor > 999 {
            return Err(invalid());
        }

        Ok(Self { major, minor, tag: value.trim().to_string() })
    }

    /// Name ID 5 string (e.g., "Version 1.000").
    pub fn version_string(&self) -> String {
        format!("Version {}.{:03}", self.major, self.minor)
    }

    /// `head.fontRevision` as MAJOR + MINOR/1000.
    pub fn revision(&self) -> Fixed {
        Fixed::from_f64(f64::from(self.major) + f64::from(self.minor) / 1000.0)
    }
}

impl Default for FontVersion {
    fn default() -> Self {
        Self { major: 1, minor: 0, tag: "1.0.0".to_string() }
    }
}
