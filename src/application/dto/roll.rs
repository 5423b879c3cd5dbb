use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::application::ports::outbound::ListResult;
use crate::domain::entities::{HistoryEntry, RollNotes};
use crate::domain::value_objects::{
    DieVariant, Modifier, PercentileRequest, PoolRequest, RollRequest,
};

pub const MAX_DICE: i32 = 20;
pub const MAX_MODIFIER: u32 = 1000;
const REQUIRED: &str = "This field is required";

/// Per-field validation messages, keyed by wire field name
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Serialize)]
pub struct FieldErrorsDto {
    pub errors: FieldErrors,
}

// ============================================================================
// Roll form
// ============================================================================

/// Body of a roll submission, mirroring the roll form
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRequestDto {
    #[serde(rename = "type")]
    pub die: Option<DieVariant>,
    #[serde(default)]
    pub target: Option<i32>,
    #[serde(default)]
    pub assisted: bool,
    #[serde(default)]
    pub flip_to_fail: bool,
    #[serde(default)]
    pub flip_to_succeed: bool,
    #[serde(default)]
    pub num_dice: Option<i32>,
    #[serde(default)]
    pub modifier: Option<Modifier>,
    #[serde(default)]
    pub roller: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RollRequestDto {
    /// Check form constraints and build the engine request.
    ///
    /// A missing percentile target is left for the roll engine to report.
    pub fn into_request(self) -> Result<(RollRequest, RollNotes), FieldErrors> {
        let mut errors = FieldErrors::new();

        if self.roller.trim().is_empty() {
            errors.insert("roller".to_string(), REQUIRED.to_string());
        }

        let request = match self.die {
            None => {
                errors.insert("type".to_string(), REQUIRED.to_string());
                None
            }
            Some(DieVariant::Percentile) => {
                let target = match self.target {
                    None | Some(0) => None,
                    Some(target) => match u8::try_from(target) {
                        Ok(target) if target <= 100 => Some(target),
                        _ => {
                            errors.insert(
                                "target".to_string(),
                                "Target must be between 1 and 100".to_string(),
                            );
                            None
                        }
                    },
                };
                Some(RollRequest::Percentile(PercentileRequest {
                    target,
                    flip_to_fail: self.flip_to_fail,
                    flip_to_succeed: self.flip_to_succeed,
                    assisted: self.assisted,
                }))
            }
            Some(variant) => {
                let num_dice = self.num_dice.unwrap_or(1);
                if !(1..=MAX_DICE).contains(&num_dice) {
                    errors.insert(
                        "numDice".to_string(),
                        format!("Number of dice must be between 1 and {}", MAX_DICE),
                    );
                }
                if let Some(Modifier::Value(value)) = &self.modifier {
                    if value.unsigned_abs() > MAX_MODIFIER {
                        errors.insert(
                            "modifier".to_string(),
                            format!("Modifier must be between -{0} and {0}", MAX_MODIFIER),
                        );
                    }
                }
                let pool = PoolRequest {
                    num_dice: num_dice.clamp(1, MAX_DICE) as u8,
                    modifier: self.modifier,
                };
                Some(match variant {
                    DieVariant::Additive => RollRequest::Additive(pool),
                    _ => RollRequest::Exploding(pool),
                })
            }
        };

        match request {
            Some(request) if errors.is_empty() => {
                let notes = RollNotes {
                    roller: Some(self.roller.trim().to_string()),
                    notes: self.notes.filter(|notes| !notes.trim().is_empty()),
                };
                Ok((request, notes))
            }
            _ => Err(errors),
        }
    }
}

// ============================================================================
// History table
// ============================================================================

const EMPTY_CELL: &str = "---";

/// One row of the roll history table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RollRowDto {
    pub id: Option<String>,
    pub roller: String,
    pub roll_type: String,
    pub roll: i32,
    pub target: String,
    pub success: String,
    pub pending: bool,
    pub entry: HistoryEntry,
}

impl From<HistoryEntry> for RollRowDto {
    fn from(entry: HistoryEntry) -> Self {
        let payload = entry.payload();
        let output = &payload.output;

        Self {
            id: entry.id().map(str::to_string),
            roller: payload
                .notes
                .roller_name()
                .unwrap_or(EMPTY_CELL)
                .to_string(),
            roll_type: payload.die.label().to_string(),
            roll: output.result(),
            target: output
                .target()
                .map(|target| target.to_string())
                .unwrap_or_else(|| EMPTY_CELL.to_string()),
            success: if output.is_success() {
                "Success".to_string()
            } else {
                "Failure".to_string()
            },
            pending: entry.is_provisional(),
            entry,
        }
    }
}

pub type RollHistoryDto = ListResult<RollRowDto>;
