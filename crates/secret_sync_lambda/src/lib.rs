//! AWS-oriented adapters and handlers for cross-account secret synchronization.
//!
//! Adapters expose narrow blocking traits over STS, Organizations, Secrets
//! Manager and KMS, with AWS SDK implementations in `adapters::aws`. Handlers
//! hold the synchronization flow and only ever talk to the traits.

pub mod adapters;
pub mod handlers;
pub mod telemetry;
