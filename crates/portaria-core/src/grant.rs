//! Grant records and the grant-set snapshot.
//!
//! A grant says "this permission code is granted for this screen".
//! Grants have no identity beyond the (screen, code) pair: duplicates
//! are kept as-is and the first active match wins during lookup.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::screen::ScreenMap;

/// A single permission grant.
///
/// Serializes with the wire field names of the session payload
/// (`screenId`, `permissionCode`, ...). Absent optional fields stay
/// absent in the serialized form so persisted payloads round-trip
/// byte-identical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grant {
    /// Numeric id of the screen this grant applies to.
    #[serde(default)]
    pub screen_id: i64,

    /// The granted permission code.
    #[serde(default)]
    pub permission_code: String,

    /// Optional human-readable name, used by UI labels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Optional free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Whether the grant is in effect. Defaults to true when absent.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Grant {
    /// Create an active grant for a code on a screen.
    pub fn new(screen_id: i64, permission_code: impl Into<String>) -> Self {
        Self {
            screen_id,
            permission_code: permission_code.into(),
            display_name: None,
            description: None,
            active: true,
        }
    }

    /// Attach a display name.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Mark the grant inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Check whether this grant satisfies a query.
    ///
    /// A match requires an active grant with the queried code. When a
    /// screen id is supplied it must also match; when omitted, a match
    /// on code alone is sufficient.
    pub fn matches(&self, code: &str, screen_id: Option<i64>) -> bool {
        if !self.active {
            return false;
        }
        if self.permission_code != code {
            return false;
        }
        match screen_id {
            Some(id) => self.screen_id == id,
            None => true,
        }
    }
}

/// A consistent snapshot of the session's authorization state.
///
/// Replaced wholesale, never merged. Readers always observe either the
/// previous snapshot or the new one, never a mix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GrantSet {
    /// The grant list, in payload order.
    pub grants: Vec<Grant>,

    /// The screen-code resolution map.
    pub screens: ScreenMap,
}

impl GrantSet {
    /// Create an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Decode a persisted grant array from its JSON form.
///
/// Returns an error when the payload is not JSON or not an array; the
/// caller leaves prior state untouched in that case. Entries that are
/// JSON objects decode leniently (missing fields take defaults, so a
/// malformed entry is accepted and simply never matches a lookup);
/// entries that are not objects are discarded.
pub fn decode_grants(payload: &str) -> Result<Vec<Grant>> {
    let value: serde_json::Value = serde_json::from_str(payload)
        .map_err(|e| CoreError::MalformedPayload(e.to_string()))?;

    let items = value
        .as_array()
        .ok_or(CoreError::UnexpectedShape { expected: "array" })?;

    Ok(items
        .iter()
        .filter(|item| item.is_object())
        .filter_map(|item| serde_json::from_value(item.clone()).ok())
        .collect())
}
