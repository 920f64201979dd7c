//! Structured application error payloads
//!
//! The API reports failures as `{"errors": {...}}` where every group is
//! optional:
//!
//! ```json
//! {
//!   "errors": {
//!     "general": ["Item not found."],
//!     "nonfield": ["Incorrect email or password."],
//!     "field": {"email": "This email address already exists."}
//!   }
//! }
//! ```

use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use tracing::warn;

/// Failure description with three independent message groups.
///
/// Groups are decoded independently: a group of the wrong shape is dropped
/// without affecting the others, and non-string entries inside a group are
/// skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Messages for the ambient notification channel
    #[serde(default, deserialize_with = "lenient_messages", skip_serializing_if = "Vec::is_empty")]
    pub general: Vec<String>,
    /// Messages for a form's non-field error slot
    #[serde(default, deserialize_with = "lenient_messages", skip_serializing_if = "Vec::is_empty")]
    pub nonfield: Vec<String>,
    /// One message per named field
    #[serde(default, deserialize_with = "lenient_fields", skip_serializing_if = "FieldErrors::is_empty")]
    pub field: FieldErrors,
}

impl ErrorPayload {
    /// True when no group carries a message
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.general.is_empty() && self.nonfield.is_empty() && self.field.is_empty()
    }

    /// Payload carrying general messages only
    #[must_use]
    pub fn general<I, S>(messages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            general: messages.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }
}

fn lenient_messages<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let messages = match Value::deserialize(deserializer)? {
        Value::Null => Vec::new(),
        Value::Array(items) => {
            let total = items.len();
            let messages: Vec<String> = items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(message) => Some(message),
                    _ => None,
                })
                .collect();
            if messages.len() < total {
                warn!(skipped = total - messages.len(), "Skipping non-string error messages");
            }
            messages
        }
        other => {
            warn!(kind = value_kind(&other), "Ignoring error message group of unexpected shape");
            Vec::new()
        }
    };
    Ok(messages)
}

fn lenient_fields<'de, D>(deserializer: D) -> Result<FieldErrors, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(LenientFieldsVisitor)
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Accepts anything; keeps the string-valued entries of a map in wire order
struct LenientFieldsVisitor;

impl LenientFieldsVisitor {
    fn ignored(kind: &str) -> FieldErrors {
        warn!(kind, "Ignoring field error group of unexpected shape");
        FieldErrors::new()
    }
}

impl<'de> Visitor<'de> for LenientFieldsVisitor {
    type Value = FieldErrors;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of field names to messages")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut errors = FieldErrors::new();
        while let Some((name, message)) = access.next_entry::<String, Value>()? {
            match message {
                Value::String(message) => errors.insert(name, message),
                other => warn!(field = %name, kind = value_kind(&other), "Skipping non-string field error"),
            }
        }
        Ok(errors)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        while access.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Self::ignored("array"))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldErrors::new())
    }

    fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
        Ok(FieldErrors::new())
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
        Ok(Self::ignored("boolean"))
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
        Ok(Self::ignored("number"))
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
        Ok(Self::ignored("number"))
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
        Ok(Self::ignored("number"))
    }

    fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
        Ok(Self::ignored("string"))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Field name to message mapping, kept in wire order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<(String, String)>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the message for `name`, replacing an earlier one in place
    pub fn insert(&mut self, name: impl Into<String>, message: impl Into<String>) {
        let name = name.into();
        let message = message.into();
        match self.0.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = message,
            None => self.0.push((name, message)),
        }
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, message)| message.as_str())
    }

    #[must_use]
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .map(|(name, message)| (name.as_str(), message.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldErrors
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (name, message) in iter {
            errors.insert(name, message);
        }
        errors
    }
}

impl Serialize for FieldErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, message) in &self.0 {
            map.serialize_entry(name, message)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FieldErrors {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldErrorsVisitor;

        impl<'de> Visitor<'de> for FieldErrorsVisitor {
            type Value = FieldErrors;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to messages")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut errors = FieldErrors::new();
                while let Some((name, message)) = access.next_entry::<String, String>()? {
                    errors.insert(name, message);
                }
                Ok(errors)
            }
        }

        deserializer.deserialize_map(FieldErrorsVisitor)
    }
}

/// Wire envelope around an [`ErrorPayload`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub errors: ErrorPayload,
}

impl ErrorEnvelope {
    /// Extract the payload from an error response body.
    ///
    /// Empty or unparseable bodies yield an empty payload.
    #[must_use]
    pub fn parse(body: &[u8]) -> ErrorPayload {
        if body.iter().all(u8::is_ascii_whitespace) {
            return ErrorPayload::default();
        }

        match serde_json::from_slice::<ErrorEnvelope>(body) {
            Ok(envelope) => envelope.errors,
            Err(err) => {
                warn!("Ignoring malformed error payload: {err}");
                ErrorPayload::default()
            }
        }
    }
}
