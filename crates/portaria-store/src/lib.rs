//! # Portaria Store
//!
//! Grant persistence for the Portaria kernel. Provides the key/value
//! [`Storage`] trait with SQLite and in-memory implementations, and the
//! [`GrantStore`] holding the live grant set.
//!
//! ## Overview
//!
//! [`GrantStore`] is the single owner of the session's authorization
//! state: the grant list and the screen map. Mutations replace the
//! state wholesale, mirror it to storage best-effort, and notify
//! subscribed listeners synchronously. Persistence failures are logged
//! and swallowed; the in-memory state stays correct either way.
//!
//! ## Key Types
//!
//! - [`Storage`] - Key/value persistence trait
//! - [`SqliteStorage`] - SQLite-backed persistent storage
//! - [`MemoryStorage`] - In-memory storage for tests
//! - [`GrantStore`] - The live grant set with observer notifications
//!
//! ## Usage
//!
//! ```rust
//! use portaria_core::Grant;
//! use portaria_store::{GrantStore, MemoryStorage};
//!
//! let store = GrantStore::new(MemoryStorage::new());
//! store.set_permissions(vec![Grant::new(1, "acesso_tela")]);
//! assert_eq!(store.grants().len(), 1);
//! ```
//!
//! ## Design Notes
//!
//! - **Atomic replace**: readers never observe a half-applied grant set
//! - **Best-effort durability**: storage failures never surface
//! - **Listener isolation**: a panicking listener does not poison the rest

pub mod error;
pub mod grant_store;
pub mod memory;
pub mod migration;
pub mod observer;
pub mod sqlite;
pub mod storage;

pub use error::{Result, StoreError};
pub use grant_store::GrantStore;
pub use memory::MemoryStorage;
pub use observer::{Listener, ListenerId, ListenerRegistry};
pub use sqlite::SqliteStorage;
pub use storage::{keys, Storage};
