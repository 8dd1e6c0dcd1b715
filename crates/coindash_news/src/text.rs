use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// First present, non-blank candidate.
pub(crate) fn first_of<const N: usize>(candidates: [Option<String>; N]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .find(|candidate| !candidate.trim().is_empty())
}

pub(crate) fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Text field that tolerates numbers and drops any other JSON type.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(value_to_string(&Value::deserialize(deserializer)?))
}

/// Decodes each array element on its own, skipping the ones that don't fit.
pub(crate) fn decode_each<T: for<'de> Deserialize<'de>>(items: Vec<Value>) -> Vec<T> {
    items
        .into_iter()
        .filter_map(|item| match T::deserialize(item) {
            Ok(decoded) => Some(decoded),
            Err(err) => {
                tracing::debug!(error = %err, "skipping malformed news item");
                None
            }
        })
        .collect()
}
