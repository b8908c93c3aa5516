use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::SyncError;
use crate::reconcile::SyncAction;

pub const RUN_STATUS_COMPLETED: &str = "completed";
pub const ACCOUNT_STATUS_SYNCED: &str = "synced";
pub const ACCOUNT_STATUS_FAILED: &str = "failed";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountSyncReport {
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl AccountSyncReport {
    pub fn record(&mut self, action: &SyncAction) {
        match action {
            SyncAction::Unchanged { .. } => self.unchanged += 1,
            SyncAction::Update { .. } => self.updated += 1,
            SyncAction::Create { .. } => self.created += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OutcomeError {
    pub kind: String,
    pub message: String,
}

impl From<&SyncError> for OutcomeError {
    fn from(error: &SyncError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountOutcome {
    pub status: String,
    pub created: usize,
    pub updated: usize,
    pub unchanged: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

impl AccountOutcome {
    pub fn synced(report: AccountSyncReport) -> Self {
        Self {
            status: ACCOUNT_STATUS_SYNCED.to_string(),
            created: report.created,
            updated: report.updated,
            unchanged: report.unchanged,
            error: None,
        }
    }

    pub fn failed(error: OutcomeError) -> Self {
        Self::failed_with(AccountSyncReport::default(), error)
    }

    /// Failed account that still reports the writes made before the failure.
    pub fn failed_with(report: AccountSyncReport, error: OutcomeError) -> Self {
        Self {
            status: ACCOUNT_STATUS_FAILED.to_string(),
            created: report.created,
            updated: report.updated,
            unchanged: report.unchanged,
            error: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Result of one invocation. `status` is `completed` once every account task
/// has finished, whatever the individual outcomes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunSummary {
    pub status: String,
    pub caller_account_id: String,
    pub source_secrets: usize,
    pub accounts_total: usize,
    pub accounts_succeeded: usize,
    pub accounts_failed: usize,
    pub dry_run: bool,
    pub started_at: String,
    pub finished_at: String,
    pub accounts: BTreeMap<String, AccountOutcome>,
}

impl RunSummary {
    pub fn completed(
        caller_account_id: String,
        source_secrets: usize,
        dry_run: bool,
        started_at: DateTime<Utc>,
        accounts: BTreeMap<String, AccountOutcome>,
    ) -> Self {
        let accounts_failed = accounts.values().filter(|outcome| outcome.is_failed()).count();
        Self {
            status: RUN_STATUS_COMPLETED.to_string(),
            caller_account_id,
            source_secrets,
            accounts_total: accounts.len(),
            accounts_succeeded: accounts.len() - accounts_failed,
            accounts_failed,
            dry_run,
            started_at: started_at.to_rfc3339(),
            finished_at: Utc::now().to_rfc3339(),
            accounts,
        }
    }
}
