//! Roll requests - the parameters a player submits for a roll

use serde::{Deserialize, Deserializer, Serialize};

use super::DieVariant;

/// Flat modifier added to an additive or exploding roll.
///
/// Anything that does not read as an integer is kept verbatim so it can be
/// echoed back, but it contributes nothing to the total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Modifier {
    Value(i32),
    Raw(String),
}

impl Modifier {
    /// Parse free-form input, e.g. from a form field
    pub fn parse(input: &str) -> Self {
        match input.trim().parse::<i32>() {
            Ok(value) => Self::Value(value),
            Err(_) => Self::Raw(input.to_string()),
        }
    }

    /// Contribution to a roll total
    pub fn value(&self) -> i32 {
        match self {
            Self::Value(value) => *value,
            Self::Raw(_) => 0,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Value(_))
    }
}

impl std::fmt::Display for Modifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{}", value),
            Self::Raw(raw) => f.write_str(raw),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireModifier {
    Number(i32),
    Text(String),
    Other(serde_json::Value),
}

impl<'de> Deserialize<'de> for Modifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match WireModifier::deserialize(deserializer)? {
            WireModifier::Number(value) => Self::Value(value),
            WireModifier::Text(text) => Self::parse(&text),
            WireModifier::Other(value) => Self::Raw(value.to_string()),
        })
    }
}

/// Parameters of a percentile skill roll
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PercentileRequest {
    /// Roll at or under this to succeed. Required; checked by the engine.
    pub target: Option<u8>,
    pub flip_to_fail: bool,
    pub flip_to_succeed: bool,
    pub assisted: bool,
}

impl PercentileRequest {
    pub fn new(target: u8) -> Self {
        Self {
            target: Some(target),
            ..Self::default()
        }
    }

    pub fn with_flip_to_fail(mut self) -> Self {
        self.flip_to_fail = true;
        self
    }

    pub fn with_flip_to_succeed(mut self) -> Self {
        self.flip_to_succeed = true;
        self
    }

    pub fn with_assist(mut self) -> Self {
        self.assisted = true;
        self
    }
}

/// Parameters of a dice pool roll (additive or exploding)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolRequest {
    /// 1..=20, validated before the request reaches the engine
    pub num_dice: u8,
    pub modifier: Option<Modifier>,
}

impl PoolRequest {
    pub fn new(num_dice: u8) -> Self {
        Self {
            num_dice,
            modifier: None,
        }
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    pub fn modifier_value(&self) -> i32 {
        self.modifier.as_ref().map(Modifier::value).unwrap_or(0)
    }
}

/// A roll request, one case per die variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollRequest {
    Percentile(PercentileRequest),
    Additive(PoolRequest),
    Exploding(PoolRequest),
}

impl RollRequest {
    pub fn variant(&self) -> DieVariant {
        match self {
            Self::Percentile(_) => DieVariant::Percentile,
            Self::Additive(_) => DieVariant::Additive,
            Self::Exploding(_) => DieVariant::Exploding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_modifier_parse() {
        assert_eq!(Modifier::parse("3"), Modifier::Value(3));
        assert_eq!(Modifier::parse(" -2 "), Modifier::Value(-2));
        assert_eq!(Modifier::parse("two"), Modifier::Raw("two".to_string()));
        assert_eq!(Modifier::parse("two").value(), 0);
    }

    #[test]
    fn test_modifier_wire_forms() {
        let m: Modifier = serde_json::from_str("4").unwrap();
        assert_eq!(m, Modifier::Value(4));

        let m: Modifier = serde_json::from_str("\"-1\"").unwrap();
        assert_eq!(m, Modifier::Value(-1));

        let m: Modifier = serde_json::from_str("1.5").unwrap();
        assert!(!m.is_valid());
        assert_eq!(m.value(), 0);

        assert_eq!(serde_json::to_string(&Modifier::Value(7)).unwrap(), "7");
        assert_eq!(
            serde_json::to_string(&Modifier::Raw("abc".to_string())).unwrap(),
            "\"abc\""
        );
    }

    #[test]
    fn test_pool_modifier_value_defaults_to_zero() {
        assert_eq!(PoolRequest::new(2).modifier_value(), 0);
        assert_eq!(
            PoolRequest::new(2)
                .with_modifier(Modifier::Value(5))
                .modifier_value(),
            5
        );
    }
}
