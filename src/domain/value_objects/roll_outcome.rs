//! Roll outcomes - the result of running the roll engine
//!
//! Field names on the wire follow the schema the record store already holds
//! (`parsedRoll`, `roll`, `initialRolls`, ...), so existing history stays
//! readable.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::{DieVariant, Modifier};

/// Ones digit of a percentile roll.
///
/// A tens digit of 1 paired with a raw ten on the ones die is displayed as the
/// literal `"00"`; its numeric value is 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnesDigit {
    Digit(u8),
    DoubleZero,
}

impl OnesDigit {
    pub fn numeric(&self) -> u8 {
        match self {
            Self::Digit(digit) => *digit,
            Self::DoubleZero => 0,
        }
    }
}

impl Serialize for OnesDigit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Digit(digit) => serializer.serialize_u8(*digit),
            Self::DoubleZero => serializer.serialize_str("00"),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireOnes {
    Number(u8),
    Text(String),
}

impl<'de> Deserialize<'de> for OnesDigit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match WireOnes::deserialize(deserializer)? {
            WireOnes::Number(digit) => Ok(Self::Digit(digit)),
            WireOnes::Text(text) if text == "00" => Ok(Self::DoubleZero),
            WireOnes::Text(text) => text
                .parse::<u8>()
                .map(Self::Digit)
                .map_err(|_| serde::de::Error::custom(format!("invalid ones digit: {}", text))),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireTotal {
    Integer(i64),
    Float(f64),
    Text(String),
}

/// Pool totals written by older clients can be fractional or quoted; they are
/// rounded to the nearest integer and clamped to the `i32` range.
fn lenient_total<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let value = match WireTotal::deserialize(deserializer)? {
        WireTotal::Integer(value) => value as f64,
        WireTotal::Float(value) => value,
        WireTotal::Text(text) => text
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid total: {}", text)))?,
    };
    if !value.is_finite() {
        return Err(serde::de::Error::custom(format!("invalid total: {}", value)));
    }
    Ok(value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32)
}

/// A single flattened rolled value as stored in a record's `rolls` column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RollValue {
    Number(i64),
    Text(String),
}

impl From<u8> for RollValue {
    fn from(value: u8) -> Self {
        Self::Number(i64::from(value))
    }
}

/// Result of a percentile skill roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PercentileOutcome {
    /// Tens digit after the assist was applied
    #[serde(rename = "tens")]
    pub tens_digit: u8,
    #[serde(rename = "ones")]
    pub ones_digit: OnesDigit,
    #[serde(rename = "assist")]
    pub assist_digit: u8,
    /// Final digit pair after flips
    #[serde(rename = "roll")]
    pub final_pair: [u8; 2],
    #[serde(rename = "parsedRoll")]
    pub parsed_value: u8,
    pub target: u8,
    pub flip_to_fail: bool,
    pub flip_to_succeed: bool,
    #[serde(default)]
    pub assisted: bool,
    pub is_success: bool,
    pub is_critical: bool,
    pub is_sublime: bool,
}

/// Result of an additive d10 roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditiveOutcome {
    pub rolls: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Modifier>,
    #[serde(deserialize_with = "lenient_total")]
    pub total: i32,
}

/// Result of an exploding d6 roll
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplodingOutcome {
    pub initial_rolls: Vec<u8>,
    /// Initial rolls followed by every chained explosion
    pub rolls: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modifier: Option<Modifier>,
    #[serde(deserialize_with = "lenient_total")]
    pub total: i32,
}

impl ExplodingOutcome {
    pub fn exploded(&self) -> bool {
        self.rolls.len() > self.initial_rolls.len()
    }
}

/// Outcome of any roll, one case per die variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum RollOutcome {
    Percentile(PercentileOutcome),
    Additive(AdditiveOutcome),
    Exploding(ExplodingOutcome),
}

impl RollOutcome {
    /// Decode an outcome whose case is given by a separate variant tag
    pub fn from_wire(variant: DieVariant, output: serde_json::Value) -> serde_json::Result<Self> {
        Ok(match variant {
            DieVariant::Percentile => Self::Percentile(serde_json::from_value(output)?),
            DieVariant::Additive => Self::Additive(serde_json::from_value(output)?),
            DieVariant::Exploding => Self::Exploding(serde_json::from_value(output)?),
        })
    }

    pub fn variant(&self) -> DieVariant {
        match self {
            Self::Percentile(_) => DieVariant::Percentile,
            Self::Additive(_) => DieVariant::Additive,
            Self::Exploding(_) => DieVariant::Exploding,
        }
    }

    /// Values stored in the record's flat `rolls` column
    pub fn rolled_values(&self) -> Vec<RollValue> {
        let values: &[u8] = match self {
            Self::Percentile(outcome) => &outcome.final_pair,
            Self::Additive(outcome) => &outcome.rolls,
            Self::Exploding(outcome) => &outcome.rolls,
        };
        values.iter().copied().map(RollValue::from).collect()
    }

    /// The headline number: parsed percentile value or pool total
    pub fn result(&self) -> i32 {
        match self {
            Self::Percentile(outcome) => i32::from(outcome.parsed_value),
            Self::Additive(outcome) => outcome.total,
            Self::Exploding(outcome) => outcome.total,
        }
    }

    pub fn target(&self) -> Option<u8> {
        match self {
            Self::Percentile(outcome) => Some(outcome.target),
            _ => None,
        }
    }

    /// Pool rolls have no target and never count as a success
    pub fn is_success(&self) -> bool {
        match self {
            Self::Percentile(outcome) => outcome.is_success,
            _ => false,
        }
    }
}
