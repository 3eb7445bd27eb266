use serde::{Deserialize, Deserializer, Serialize};

use crate::error::DeclarationError;
use crate::rules::SelectionRule;

/// Everything needed to turn one snapshot into comparable text.
///
/// `select` and `remove` keep declaration order; the JSON form accepts either
/// a single rule or an array for both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// Where the snapshot was retrieved; only used as the base for links.
    #[serde(rename = "fetch")]
    pub location: String,
    #[serde(default, deserialize_with = "one_or_many")]
    pub select: Vec<SelectionRule>,
    #[serde(
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub remove: Vec<SelectionRule>,
    #[serde(
        rename = "filter",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub service_filters: Vec<String>,
}

impl RuleSet {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, DeclarationError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_select(mut self, rule: impl Into<SelectionRule>) -> Self {
        self.select.push(rule.into());
        self
    }

    pub fn with_remove(mut self, rule: impl Into<SelectionRule>) -> Self {
        self.remove.push(rule.into());
        self
    }

    pub fn with_filter(mut self, name: impl Into<String>) -> Self {
        self.service_filters.push(name.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

fn one_or_many<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::Many(values) => values,
        OneOrMany::One(value) => vec![value],
    })
}
