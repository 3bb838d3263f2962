//! Single-field match rules used to filter collections.
//!
//! A [`Predicate`] names one field of the target record and one comparison
//! mode. There are no conjunctions or disjunctions: composite queries are
//! built by the resolver out of several single-field lookups.

use std::borrow::Cow;
use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::id::RecordId;

/// How a predicate compares its value against a record field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MatchMode {
    /// Field rendered as a string must equal the value exactly.
    Equals(String),
    /// Field must be a list containing the value.
    InArray(String),
}

/// A single-field, single-mode match rule.
///
/// Serializes as `{"key": "userId", "equals": "u1"}` or
/// `{"key": "subscribedToUserIds", "inArray": "u1"}`.
///
/// # Examples
///
/// ```
/// use social_store::Predicate;
///
/// let p: Predicate = serde_json::from_str(r#"{"key":"userId","equals":"u1"}"#).unwrap();
/// assert_eq!(p, Predicate::equals("userId", "u1"));
/// ```
///
/// Exactly one of `equals` and `inArray` must be present when deserializing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Predicate {
    /// Wire name of the field to test.
    pub key: String,
    /// Comparison mode and value.
    #[serde(flatten)]
    pub mode: MatchMode,
}

impl Predicate {
    /// Field equals `value`.
    #[must_use]
    pub fn equals(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            mode: MatchMode::Equals(value.into()),
        }
    }

    /// List field contains `value`.
    #[must_use]
    pub fn in_array(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            mode: MatchMode::InArray(value.into()),
        }
    }

    /// Shorthand for `equals("id", id)`.
    #[must_use]
    pub fn id(id: &RecordId) -> Self {
        Self::equals("id", id.as_str())
    }

    /// Evaluates the predicate against a record.
    ///
    /// Unknown fields never match.
    pub fn matches<R: Fields + ?Sized>(&self, record: &R) -> bool {
        let Some(field) = record.field(&self.key) else {
            return false;
        };
        match &self.mode {
            MatchMode::Equals(value) => field.render() == value.as_str(),
            MatchMode::InArray(value) => match field {
                FieldValue::List(items) => items.iter().any(|item| *item == value.as_str()),
                FieldValue::Text(_) | FieldValue::Int(_) => false,
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct PredicateRepr {
    key: String,
    #[serde(default)]
    equals: Option<String>,
    #[serde(default)]
    in_array: Option<String>,
}

impl<'de> Deserialize<'de> for Predicate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let repr = PredicateRepr::deserialize(deserializer)?;
        let mode = match (repr.equals, repr.in_array) {
            (Some(value), None) => MatchMode::Equals(value),
            (None, Some(value)) => MatchMode::InArray(value),
            (Some(_), Some(_)) => {
                return Err(de::Error::custom(
                    "predicate must have exactly one of `equals` and `inArray`, found both",
                ))
            }
            (None, None) => {
                return Err(de::Error::custom(
                    "predicate is missing `equals` or `inArray`",
                ))
            }
        };
        Ok(Self { key: repr.key, mode })
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mode {
            MatchMode::Equals(v) => write!(f, "{} == {v:?}", self.key),
            MatchMode::InArray(v) => write!(f, "{v:?} in {}", self.key),
        }
    }
}

/// A borrowed view of one record field, as seen by a predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue<'a> {
    /// A string field.
    Text(&'a str),
    /// An integer field.
    Int(i64),
    /// A list of string ids.
    List(Vec<&'a str>),
}

impl FieldValue<'_> {
    /// Renders the field as a string for `equals` comparison.
    ///
    /// Lists render as their elements joined with `,`.
    #[must_use]
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Int(n) => Cow::Owned(n.to_string()),
            Self::List(items) => Cow::Owned(items.join(",")),
        }
    }
}

/// Field access by wire name.
pub trait Fields {
    /// Returns the named field, or `None` if the record has no such field.
    fn field(&self, name: &str) -> Option<FieldValue<'_>>;
}
