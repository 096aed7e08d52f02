//! # Portaria Testkit
//!
//! Testing utilities for the Portaria kernel.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: Helper structs for setting up test scenarios
//! - **Generators**: Proptest strategies for property-based testing
//!
//! ## Test Fixtures
//!
//! Quickly set up a memory-backed store:
//!
//! ```rust
//! use portaria_testkit::TestFixture;
//!
//! let fixture = TestFixture::new();
//! fixture.seed_screen_access(&[1, 2]);
//! assert_eq!(fixture.store.grants().len(), 2);
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use portaria_testkit::generators::arb_grants;
//!
//! proptest! {
//!     #[test]
//!     fn has_never_panics(grants in arb_grants(16)) {
//!         // ...
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::TestFixture;
pub use generators::{arb_code, arb_grant, arb_grants, arb_screen_id, arb_screen_map};
