//! LTE band registry
//!
//! The device reports active bands as numeric indices ("1;3;") but expects
//! writes in its own hex-string encoding. Both directions go through this
//! enum so the magic strings live in exactly one place.

use serde::Serialize;

use crate::error::ApiError;

/// One LTE frequency band supported by the device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Band {
    Band1,
    Band3,
    Band7,
    Band20,
}

impl Band {
    pub const ALL: [Band; 4] = [Band::Band1, Band::Band3, Band::Band7, Band::Band20];

    /// The value the device expects when writing the active-bands node.
    /// Hex-encoded UTF-16 of the band number followed by a `;` terminator.
    pub fn device_code(self) -> &'static str {
        match self {
            Band::Band1 => "0031003B",
            Band::Band3 => "0033003B",
            Band::Band7 => "0037003B",
            Band::Band20 => "00320030003B",
        }
    }

    /// Numeric index the device reports for this band
    pub fn index(self) -> u32 {
        match self {
            Band::Band1 => 1,
            Band::Band3 => 3,
            Band::Band7 => 7,
            Band::Band20 => 20,
        }
    }

    /// Look up a band by the numeric index the device reports.
    pub fn from_index(index: u32) -> Result<Band, ApiError> {
        match index {
            1 => Ok(Band::Band1),
            3 => Ok(Band::Band3),
            7 => Ok(Band::Band7),
            20 => Ok(Band::Band20),
            other => Err(ApiError::InvalidBand(other)),
        }
    }

    /// Parse the cleaned value of the active-bands node, e.g. `"1;3"`.
    pub fn parse_active_list(value: &str) -> Result<Vec<Band>, ApiError> {
        value
            .split(';')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                let index = part.parse::<u32>().map_err(|_| ApiError::Validation {
                    field: "active_bands".to_string(),
                    value: part.to_string(),
                })?;
                Band::from_index(index)
            })
            .collect()
    }
}
