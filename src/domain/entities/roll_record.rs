//! Roll record entity - a roll as persisted in the record store
//!
//! The store owns records: it assigns the identity and timestamps. Locally we
//! only ever hold a provisional copy until the store confirms a create.

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{DieVariant, RollOutcome, RollValue};

/// Free-text notes attached to a roll
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollNotes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roller: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl RollNotes {
    pub fn new(roller: impl Into<String>) -> Self {
        Self {
            roller: Some(roller.into()),
            notes: None,
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Roller name, `None` when missing or blank
    pub fn roller_name(&self) -> Option<&str> {
        self.roller
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// What gets sent to the store's create operation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WireRollPayload")]
pub struct RollPayload {
    pub die: DieVariant,
    pub rolls: Vec<RollValue>,
    pub output: RollOutcome,
    pub notes: RollNotes,
}

impl RollPayload {
    /// Build a payload whose tag and flat rolls are derived from the outcome
    pub fn new(output: RollOutcome, notes: RollNotes) -> Self {
        Self {
            die: output.variant(),
            rolls: output.rolled_values(),
            output,
            notes,
        }
    }
}

#[derive(Deserialize)]
struct WireRollPayload {
    die: DieVariant,
    #[serde(default)]
    rolls: Vec<RollValue>,
    output: serde_json::Value,
    #[serde(default)]
    notes: RollNotes,
}

impl TryFrom<WireRollPayload> for RollPayload {
    type Error = String;

    fn try_from(wire: WireRollPayload) -> Result<Self, Self::Error> {
        let output = RollOutcome::from_wire(wire.die, wire.output)
            .map_err(|e| format!("output does not match die {}: {}", wire.die, e))?;

        Ok(Self {
            die: wire.die,
            rolls: wire.rolls,
            output,
            notes: wire.notes,
        })
    }
}

/// A roll record confirmed by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRecord {
    pub id: String,
    #[serde(default)]
    pub collection_id: String,
    #[serde(default)]
    pub collection_name: String,
    pub created: String,
    #[serde(default)]
    pub updated: String,
    #[serde(flatten)]
    pub payload: RollPayload,
}

/// A roll shown locally before the store has confirmed it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionalRoll {
    pub created: String,
    #[serde(flatten)]
    pub payload: RollPayload,
}

/// One entry of the local roll history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryEntry {
    Stored(RollRecord),
    Provisional(ProvisionalRoll),
}

impl HistoryEntry {
    pub fn id(&self) -> Option<&str> {
        match self {
            Self::Stored(record) => Some(&record.id),
            Self::Provisional(_) => None,
        }
    }

    pub fn payload(&self) -> &RollPayload {
        match self {
            Self::Stored(record) => &record.payload,
            Self::Provisional(provisional) => &provisional.payload,
        }
    }

    pub fn is_provisional(&self) -> bool {
        matches!(self, Self::Provisional(_))
    }
}
