//! Shared secret synchronization domain primitives.
//!
//! This crate owns configuration, secret selection and reconciliation
//! planning, plus the run summary contract. It intentionally excludes AWS SDK
//! and Lambda runtime concerns, which live in `secret_sync_lambda`.

pub mod config;
pub mod error;
pub mod reconcile;
pub mod secret;
pub mod summary;
