//! Serde helpers for dashboard form payloads.
//!
//! The dashboard forms submit whatever the input widgets hold: amounts may
//! arrive as JSON numbers or as the raw text of a number field, and cleared
//! text inputs arrive as empty strings. The `deserialize_optional_*` helpers
//! treat blank values as `None` so that create validators report them as
//! missing. Update payloads keep blanks (see [`AmountField`]) and reject them.

use serde::{Deserialize, Deserializer};

/// An amount as submitted: a JSON number or the raw text of a number field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AmountField {
    Number(f64),
    Text(String),
}

impl AmountField {
    pub fn is_blank(&self) -> bool {
        matches!(self, Self::Text(s) if s.trim().is_empty())
    }

    /// The numeric value, or `None` when the text is not a number.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

pub fn deserialize_optional_amount<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<AmountField>::deserialize(deserializer)? {
        None => Ok(None),
        Some(field) if field.is_blank() => Ok(None),
        Some(AmountField::Number(n)) => Ok(Some(n)),
        Some(AmountField::Text(s)) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("amount '{}' is not a number", s))),
    }
}

pub fn deserialize_optional_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()))
}
