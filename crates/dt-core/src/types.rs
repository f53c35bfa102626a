//! Identifier aliases and validation errors shared across the tracker.

use thiserror::Error;

/// Numeric identifier of a place. `0` means "not assigned yet".
pub type TerritoryId = u16;

/// Numeric identifier of a queue roulette. `0` means "not joined via a roulette".
pub type RouletteId = u32;

/// Numeric identifier of a home world.
pub type WorldId = u16;

/// Validation errors for core values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A session still carries the unassigned territory sentinel.
    #[error("session has no territory assigned")]
    UnassignedTerritory,

    /// A required value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// A settings flag name was not recognized.
    #[error("unknown duty setting: {value}")]
    UnknownSetting { value: String },

    /// A timestamp did not match any accepted format.
    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: String },

    /// A boolean field held something other than true/false/1/0.
    #[error("invalid boolean: {value}")]
    InvalidBool { value: String },

    /// A numeric field could not be parsed.
    #[error("invalid {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

/// Parses a boolean the way spreadsheet exports write them.
pub fn parse_bool(value: &str) -> Result<bool, ValidationError> {
    let value = value.trim();
    if value.eq_ignore_ascii_case("true") || value == "1" {
        Ok(true)
    } else if value.eq_ignore_ascii_case("false") || value == "0" {
        Ok(false)
    } else {
        Err(ValidationError::InvalidBool {
            value: value.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert!(parse_bool("True").unwrap());
        assert!(parse_bool(" true ").unwrap());
        assert!(parse_bool("1").unwrap());
        assert!(!parse_bool("FALSE").unwrap());
        assert!(!parse_bool("0").unwrap());
    }

    #[test]
    fn parse_bool_rejects_other_values() {
        let err = parse_bool("yes").unwrap_err();
        assert_eq!(err.to_string(), "invalid boolean: yes");
    }
}
