use serde::de::Deserializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A text value carried in both supported UI languages.
///
/// Stored documents are not guaranteed to hold this shape: legacy rows may
/// contain a bare string where an `{english, japanese}` pair is expected, or
/// omit the field entirely. Deserialization is therefore tolerant and never
/// fails; see [`LocalizedText::from_value`] for the repair rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocalizedText {
    pub english: String,
    pub japanese: String,
}

impl LocalizedText {
    /// Build a pair with the same text in both languages.
    ///
    /// This is the documented lossy default for legacy single-language data:
    /// the string is broadcast, not translated.
    pub fn broadcast(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            japanese: text.clone(),
            english: text,
        }
    }

    /// Build a pair from explicit per-language values.
    pub fn new(english: impl Into<String>, japanese: impl Into<String>) -> Self {
        Self {
            english: english.into(),
            japanese: japanese.into(),
        }
    }

    /// `true` if both languages are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.english.is_empty() && self.japanese.is_empty()
    }

    /// Repair an arbitrary JSON value into a localized pair.
    ///
    /// - a bare string is broadcast to both languages;
    /// - an object contributes its `english`/`japanese` string members,
    ///   missing or non-string members becoming empty;
    /// - anything else (absent, null, number, array) yields an empty pair.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => Self::broadcast(s.clone()),
            Value::Object(map) => {
                let pick = |key: &str| {
                    map.get(key)
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_owned()
                };
                Self {
                    english: pick("english"),
                    japanese: pick("japanese"),
                }
            }
            _ => Self::default(),
        }
    }
}

impl<'de> Deserialize<'de> for LocalizedText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}
