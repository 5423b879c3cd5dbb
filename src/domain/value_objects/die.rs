//! Die variants supported by the roller

use serde::{Deserialize, Serialize};

/// The rule variant a roll is made under.
///
/// The serialized names are the tags the record store already uses for the
/// `die` column, so they must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DieVariant {
    /// Two d10 read as a percentile pair plus an assist d10
    #[serde(rename = "d100")]
    Percentile,
    /// N d10 summed
    #[serde(rename = "d10")]
    Additive,
    /// N d6 where every six explodes into another throw
    #[serde(rename = "d6")]
    Exploding,
}

impl DieVariant {
    pub const ALL: [DieVariant; 3] = [Self::Exploding, Self::Additive, Self::Percentile];

    /// Number of faces on each die thrown for this variant
    pub fn sides(&self) -> u8 {
        match self {
            Self::Percentile | Self::Additive => 10,
            Self::Exploding => 6,
        }
    }

    /// Human readable label shown to players
    pub fn label(&self) -> &'static str {
        match self {
            Self::Percentile => "Skill",
            Self::Additive => "Other",
            Self::Exploding => "Damage or Odic Manifestation",
        }
    }

    /// Wire tag, e.g. `d100`
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Percentile => "d100",
            Self::Additive => "d10",
            Self::Exploding => "d6",
        }
    }
}

impl std::fmt::Display for DieVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}
