//! # Portaria Core
//!
//! Pure data model for the Portaria authorization kernel: grants,
//! screens, session contracts, and the denial taxonomy.
//!
//! This crate contains no I/O, no async, no storage. It is pure data
//! over which the other crates make decisions.
//!
//! ## Key Types
//!
//! - [`Grant`] - A single (screen, permission-code, active-flag) record
//! - [`ScreenMap`] - Resolution from opaque screen codes to numeric ids
//! - [`GrantSet`] - A consistent snapshot of grants plus screen map
//! - [`SessionState`] - The identity/session provider contract
//! - [`DenyReason`] - The fixed reason taxonomy for denial diagnostics
//!
//! ## Screen access
//!
//! Screen access is not a separate entity. It is the reserved
//! permission code [`SCREEN_ACCESS_CODE`] granted per screen.

pub mod error;
pub mod grant;
pub mod reason;
pub mod screen;
pub mod session;

pub use error::CoreError;
pub use grant::{decode_grants, Grant, GrantSet};
pub use reason::DenyReason;
pub use screen::{decode_screen_map, ScreenMap, SCREEN_ACCESS_CODE};
pub use session::{Actor, SessionState, GENERIC_USER_ROLE};
