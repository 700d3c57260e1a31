//! Validated scoring configuration
//!
//! The host hands over a string-keyed parameter map; it is checked once,
//! when the script is compiled, and is immutable afterwards.

use std::{collections::HashMap, fmt};

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use derivative::Derivative;
use log::{debug, warn};
use serde::Deserialize;

use crate::{
    base::{Score, Timestamp, UNSET_SCORE},
    error::ConfigurationError,
};

/// Standard alphabet; padding is optional
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// How the secondary field value is compared to the threshold.
///
/// The comparison names the condition under which the original score is kept.
/// An unrecognized comparison keeps it whenever the secondary field has a value.
#[derive(Derivative, Debug, Clone, PartialEq, Eq)]
#[derivative(Default)]
pub enum Comparator {
    #[derivative(Default)]
    LessThan,
    GreaterThan,
    Other(String),
}

impl Comparator {
    /// Returns true if the stored value keeps the original score
    #[inline]
    pub fn blocks(&self, stored: Timestamp, threshold: Timestamp) -> bool {
        match self {
            Comparator::LessThan => stored < threshold,
            Comparator::GreaterThan => stored > threshold,
            Comparator::Other(_) => true,
        }
    }
}

impl From<&str> for Comparator {
    fn from(s: &str) -> Self {
        match s {
            "<" | "less_than" => Comparator::LessThan,
            ">" | "greater_than" => Comparator::GreaterThan,
            _ => Comparator::Other(s.to_string()),
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Comparator::LessThan => write!(f, "<"),
            Comparator::GreaterThan => write!(f, ">"),
            Comparator::Other(s) => write!(f, "{}", s),
        }
    }
}

/// Condition on a date field that can veto the skip score
#[derive(Debug, Clone, PartialEq)]
pub struct SecondaryGate {
    pub field: String,
    pub comparator: Comparator,
    pub threshold: Timestamp,
}

impl SecondaryGate {
    #[inline]
    pub fn blocks(&self, stored: Timestamp) -> bool {
        self.comparator.blocks(stored, self.threshold)
    }
}

fn fmt_payload(payload: &Vec<u8>, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "<{} bytes>", payload.len())
}

#[derive(Derivative, Clone, PartialEq)]
#[derivative(Debug)]
pub struct ScoringParams {
    /// Field holding the document identifier
    pub field: String,

    /// Serialized bitmap (base64-decoded)
    #[derivative(Debug(format_with = "fmt_payload"))]
    pub payload: Vec<u8>,

    /// Score applied to matching documents
    pub skip_score: Option<Score>,

    pub gate: Option<SecondaryGate>,
}

/// A parameter value, as given by the host (which only cares
/// about its textual representation)
#[derive(Deserialize, Debug, Clone)]
#[serde(untagged)]
pub enum ParamValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamValue::Text(s) => write!(f, "{}", s),
            ParamValue::Number(n) => write!(f, "{}", n),
            ParamValue::Flag(b) => write!(f, "{}", b),
        }
    }
}

/// Recognized keys of the script parameters (others are ignored)
#[derive(Deserialize, Default, Debug)]
#[serde(rename_all = "camelCase")]
struct RawParams {
    field: Option<ParamValue>,
    data: Option<ParamValue>,
    score: Option<ParamValue>,
    additional_field_to_check: Option<ParamValue>,
    additional_field_value: Option<ParamValue>,
    additional_field_comparator: Option<ParamValue>,
}

impl RawParams {
    fn from_map(params: &HashMap<String, String>) -> Self {
        let get = |key: &str| params.get(key).map(|v| ParamValue::Text(v.clone()));
        Self {
            field: get("field"),
            data: get("data"),
            score: get("score"),
            additional_field_to_check: get("additionalFieldToCheck"),
            additional_field_value: get("additionalFieldValue"),
            additional_field_comparator: get("additionalFieldComparator"),
        }
    }

    fn validate(self) -> Result<ScoringParams, ConfigurationError> {
        let field = self
            .field
            .ok_or(ConfigurationError::MissingParameter("field"))?
            .to_string();
        let data = self
            .data
            .ok_or(ConfigurationError::MissingParameter("data"))?
            .to_string();

        let gate = match self.additional_field_to_check {
            Some(gate_field) => {
                let value = self
                    .additional_field_value
                    .ok_or(ConfigurationError::MissingParameter("additionalFieldValue"))?
                    .to_string();
                // Unlike the score, the threshold is not trimmed
                let threshold = value
                    .parse::<Timestamp>()
                    .map_err(|_| ConfigurationError::InvalidThreshold(value))?;
                let comparator = match self.additional_field_comparator {
                    Some(c) => {
                        let comparator = Comparator::from(c.to_string().as_str());
                        if let Comparator::Other(text) = &comparator {
                            warn!(
                                "Unknown [additionalFieldComparator] {:?}: documents with a value in [{}] keep their score",
                                text, gate_field
                            );
                        }
                        comparator
                    }
                    None => Comparator::default(),
                };
                Some(SecondaryGate {
                    field: gate_field.to_string(),
                    comparator,
                    threshold,
                })
            }
            None => None,
        };

        let payload = PAYLOAD_ENGINE
            .decode(data.as_bytes())
            .map_err(|e| ConfigurationError::InvalidPayloadEncoding(e.to_string()))?;

        // An invalid score is not fatal: no override score is set
        let skip_score = self.score.and_then(|score| {
            let text = score.to_string();
            match text.trim().parse::<Score>() {
                Ok(v) => Some(v),
                Err(e) => {
                    warn!("Ignoring invalid [score] parameter {:?}: {}", text, e);
                    None
                }
            }
        });

        let params = ScoringParams {
            field,
            payload,
            skip_score,
            gate,
        };
        debug!("Scoring parameters: {:?}", params);
        Ok(params)
    }
}

impl ScoringParams {
    /// Validates a plain string map of parameters
    pub fn from_map(params: &HashMap<String, String>) -> Result<Self, ConfigurationError> {
        RawParams::from_map(params).validate()
    }

    /// Validates a JSON object of parameters
    pub fn from_json(params: &serde_json::Value) -> Result<Self, ConfigurationError> {
        let raw = RawParams::deserialize(params).map_err(|e| {
            ConfigurationError::InvalidParameter {
                name: "params".to_string(),
                message: e.to_string(),
            }
        })?;
        raw.validate()
    }

    /// The score applied on a match (the unset sentinel if none was configured)
    #[inline]
    pub fn effective_skip_score(&self) -> Score {
        self.skip_score.unwrap_or(UNSET_SCORE)
    }
}
