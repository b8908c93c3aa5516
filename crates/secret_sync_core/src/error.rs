use thiserror::Error;

use crate::summary::AccountSyncReport;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to connect to {target}: {message}")]
    Connection { target: String, message: String },
    #[error("{what} not found: {name}")]
    NotFound { what: &'static str, name: String },
    #[error("{operation} failed: {message}")]
    Api { operation: String, message: String },
}

impl SyncError {
    pub fn connection(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn not_found(what: &'static str, name: impl Into<String>) -> Self {
        Self::NotFound {
            what,
            name: name.into(),
        }
    }

    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Stable label used in structured logs and the run summary.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "config_error",
            Self::Connection { .. } => "connection_error",
            Self::NotFound { .. } => "not_found_error",
            Self::Api { .. } => "api_error",
        }
    }
}

/// An account sync that stopped early. `report` counts what was written
/// before the failure; those writes are not rolled back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct AccountSyncFailure {
    pub report: AccountSyncReport,
    pub error: SyncError,
}

impl AccountSyncFailure {
    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

impl From<SyncError> for AccountSyncFailure {
    fn from(error: SyncError) -> Self {
        Self {
            report: AccountSyncReport::default(),
            error,
        }
    }
}
