//! REST client for the external lock store.
//!
//! The lock store owns the persisted record for each published asset:
//! platform/user references, the original and redacted locators and the
//! structured blackout-interval list. This crate only consumes that API;
//! the record schema and its storage engine live elsewhere.

pub mod client;
pub mod error;
pub mod types;

pub use client::{LockStoreClient, LockStoreConfig};
pub use error::{LockStoreError, LockStoreResult};
pub use types::{BlackoutEntry, CreateLockRecord, LockRecord};
