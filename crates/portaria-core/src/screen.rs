//! Screen-code resolution.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// The reserved permission code meaning "may open this screen".
///
/// Screen access has no schema of its own; a grant carrying this code
/// scoped to a screen id is the whole story.
pub const SCREEN_ACCESS_CODE: &str = "acesso_tela";

/// Mapping from opaque screen codes (route aliases) to numeric screen ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScreenMap(HashMap<String, i64>);

impl ScreenMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a screen code to its numeric id.
    pub fn resolve(&self, code: &str) -> Option<i64> {
        self.0.get(code).copied()
    }

    /// Register or replace a code → id entry.
    pub fn insert(&mut self, code: impl Into<String>, screen_id: i64) {
        self.0.insert(code.into(), screen_id);
    }

    /// Number of registered codes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no codes are registered.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, i64>> for ScreenMap {
    fn from(map: HashMap<String, i64>) -> Self {
        Self(map)
    }
}

impl FromIterator<(String, i64)> for ScreenMap {
    fn from_iter<I: IntoIterator<Item = (String, i64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Decode a persisted screen map from its JSON form.
///
/// Returns an error when the payload is not JSON or not an object;
/// entries whose values are not integers are discarded.
pub fn decode_screen_map(payload: &str) -> Result<ScreenMap> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| CoreError::MalformedPayload(e.to_string()))?;

    let entries = value
        .as_object()
        .ok_or(CoreError::UnexpectedShape { expected: "object" })?;

    Ok(entries
        .iter()
        .filter_map(|(code, id)| id.as_i64().map(|id| (code.clone(), id)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve() {
        let mut map = ScreenMap::new();
        map.insert("atos", 1);
        assert_eq!(map.resolve("atos"), Some(1));
        assert_eq!(map.resolve("assinaturas"), None);
    }

    #[test]
    fn test_decode_rejects_non_object() {
        assert!(decode_screen_map("[]").is_err());
        assert!(decode_screen_map("null").is_err());
    }

    #[test]
    fn test_decode_discards_non_integer_values() {
        let map = decode_screen_map(r#"{"atos": 1, "rascunhos": "two"}"#).unwrap();
        assert_eq!(map.resolve("atos"), Some(1));
        assert_eq!(map.resolve("rascunhos"), None);
        assert_eq!(map.len(), 1);
    }
}
