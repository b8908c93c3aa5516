use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use secret_sync_core::config::SyncConfig;
use secret_sync_core::error::SyncError;
use secret_sync_core::secret::{Secret, SecretFilter};
use secret_sync_core::summary::{AccountOutcome, OutcomeError, RunSummary};
use tracing::{error, info, warn};

use crate::adapters::aws::AwsCredentialProvider;
use crate::adapters::credentials::{CredentialProvider, IdentityApi};
use crate::handlers::accounts::list_ou_accounts;
use crate::handlers::catalog::list_secrets;
use crate::handlers::sync::sync_account;

pub const TASK_FAILURE_KIND: &str = "task_failed";

/// Connects with the ambient AWS credentials and runs one synchronization.
pub async fn run_with_aws(config: Arc<SyncConfig>) -> Result<RunSummary, SyncError> {
    let provider = AwsCredentialProvider::connect(&config.region).await?;
    run(Arc::new(provider), config).await
}

/// Collects the source secrets and target accounts, then syncs every account
/// concurrently. Setup failures are returned; per-account failures only show
/// up in the summary.
pub async fn run<P: CredentialProvider>(
    provider: Arc<P>,
    config: Arc<SyncConfig>,
) -> Result<RunSummary, SyncError> {
    let started_at = Utc::now();
    let RunInputs {
        caller_account_id,
        source,
        accounts,
    } = gather_inputs(provider.as_ref(), &config)?;

    let source_count = source.len();
    let outcomes = sync_accounts(provider, Arc::clone(&config), accounts, Arc::new(source)).await;
    let summary = RunSummary::completed(
        caller_account_id,
        source_count,
        config.dry_run,
        started_at,
        outcomes,
    );
    info!(
        accounts_total = summary.accounts_total,
        accounts_failed = summary.accounts_failed,
        "completed secret synchronization"
    );
    Ok(summary)
}

struct RunInputs {
    caller_account_id: String,
    source: Vec<Secret>,
    accounts: Vec<String>,
}

/// Setup phase. Any error here is fatal for the run.
fn gather_inputs<P: CredentialProvider>(
    provider: &P,
    config: &SyncConfig,
) -> Result<RunInputs, SyncError> {
    let base = provider.base_session();

    let caller_account_id = base
        .caller_account_id()
        .map_err(|message| SyncError::api("get_caller_identity", message))?;
    info!(caller_account_id = %caller_account_id, "resolved caller account");

    let source = list_secrets(base, &SecretFilter::ByPrefix(config.prefix.clone()))?;
    info!(
        source_secrets = source.len(),
        prefix = %config.prefix,
        "gathered source secrets"
    );

    let accounts = list_ou_accounts(
        provider,
        &config.org_account_id,
        &config.org_role_name,
        &config.org_unit_name,
    )?;
    if accounts.is_empty() {
        warn!(ou_name = %config.org_unit_name, "organizational unit has no member accounts");
    }

    Ok(RunInputs {
        caller_account_id,
        source,
        accounts,
    })
}

/// One blocking task per account, no cap, all awaited before returning.
/// A failing or panicking task never affects its siblings.
pub async fn sync_accounts<P: CredentialProvider>(
    provider: Arc<P>,
    config: Arc<SyncConfig>,
    accounts: Vec<String>,
    source: Arc<Vec<Secret>>,
) -> BTreeMap<String, AccountOutcome> {
    let tasks: Vec<_> = accounts
        .into_iter()
        .map(|account_id| {
            let provider = Arc::clone(&provider);
            let config = Arc::clone(&config);
            let source = Arc::clone(&source);
            let task_account_id = account_id.clone();
            let handle = tokio::task::spawn_blocking(move || {
                info!(account_id = %task_account_id, "synchronizing secrets");
                sync_account(provider.as_ref(), &config, &task_account_id, &source)
            });
            (account_id, handle)
        })
        .collect();

    let mut outcomes = BTreeMap::new();
    for (account_id, handle) in tasks {
        let outcome = match handle.await {
            Ok(Ok(report)) => {
                info!(
                    account_id = %account_id,
                    created = report.created,
                    updated = report.updated,
                    unchanged = report.unchanged,
                    "synchronization complete"
                );
                AccountOutcome::synced(report)
            }
            Ok(Err(failure)) => {
                error!(
                    account_id = %account_id,
                    kind = failure.kind(),
                    error = %failure.error,
                    created = failure.report.created,
                    updated = failure.report.updated,
                    "failed to synchronize secrets"
                );
                AccountOutcome::failed_with(failure.report, OutcomeError::from(&failure.error))
            }
            Err(join_error) => {
                error!(
                    account_id = %account_id,
                    error = %join_error,
                    "account task did not finish"
                );
                AccountOutcome::failed(OutcomeError {
                    kind: TASK_FAILURE_KIND.to_string(),
                    message: join_error.to_string(),
                })
            }
        };
        outcomes.insert(account_id, outcome);
    }
    outcomes
}
