//! Denial taxonomy.
//!
//! Every guard or gate denial is tagged with exactly one of these
//! reasons before the recovery action (redirect or hide) runs. The
//! tags are the only externally observable signal besides the render
//! outcome, so their spelling is part of the diagnostic contract.

use serde::{Deserialize, Serialize};

/// Why a guard or gate denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DenyReason {
    /// The actor's role is not in the allowed set.
    Role,
    /// The actor's department is missing or not in the allowed set.
    Department,
    /// A required permission code is not granted.
    Permission,
    /// Screen access is not granted (or the screen did not resolve).
    Screen,
}

impl DenyReason {
    /// The stable tag emitted in diagnostics.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenyReason::Role => "role",
            DenyReason::Department => "department",
            DenyReason::Permission => "permission",
            DenyReason::Screen => "screen",
        }
    }
}

impl std::fmt::Display for DenyReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
