//! Queue modifiers recorded with a duty session.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::types::ValidationError;

/// Bitset of optional queue settings chosen when the duty was popped.
///
/// Persisted as its integer representation. Bits outside the named table are
/// dropped on construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct DutySettings(u8);

impl DutySettings {
    pub const UNRESTRICTED_PARTY: Self = Self(1);
    pub const MINIMUM_ITEM_LEVEL: Self = Self(1 << 1);
    pub const LEVEL_SYNC: Self = Self(1 << 2);
    pub const SILENCE_ECHO: Self = Self(1 << 3);
    pub const EXPLORER_MODE: Self = Self(1 << 4);

    const ALL_BITS: u8 = 0b1_1111;

    /// Bit-to-name table, in bit order.
    const NAMED: [(Self, &'static str); 5] = [
        (Self::UNRESTRICTED_PARTY, "UnrestrictedParty"),
        (Self::MINIMUM_ITEM_LEVEL, "MinimumItemLevel"),
        (Self::LEVEL_SYNC, "LevelSync"),
        (Self::SILENCE_ECHO, "SilenceEcho"),
        (Self::EXPLORER_MODE, "ExplorerMode"),
    ];

    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Keeps only the named bits of `bits`.
    #[must_use]
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::ALL_BITS)
    }

    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Names of the set bits, in bit order.
    pub fn names(self) -> impl Iterator<Item = &'static str> {
        Self::NAMED
            .into_iter()
            .filter(move |(flag, _)| self.contains(*flag))
            .map(|(_, name)| name)
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(_, known)| known.eq_ignore_ascii_case(name))
            .map(|(flag, _)| *flag)
    }
}

impl From<u8> for DutySettings {
    fn from(bits: u8) -> Self {
        Self::from_bits_truncate(bits)
    }
}

impl From<DutySettings> for u8 {
    fn from(settings: DutySettings) -> Self {
        settings.0
    }
}

impl BitOr for DutySettings {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DutySettings {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for DutySettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("None");
        }
        let names: Vec<&str> = self.names().collect();
        f.write_str(&names.join(", "))
    }
}

/// Parses either the integer form or a `,`/`|` separated list of flag names.
impl FromStr for DutySettings {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("none") {
            return Ok(Self::empty());
        }
        if let Ok(bits) = s.parse::<u8>() {
            return Ok(Self::from_bits_truncate(bits));
        }

        let mut settings = Self::empty();
        for name in s.split([',', '|']).map(str::trim).filter(|n| !n.is_empty()) {
            let flag = Self::from_name(name).ok_or_else(|| ValidationError::UnknownSetting {
                value: name.to_string(),
            })?;
            settings.insert(flag);
        }
        Ok(settings)
    }
}
