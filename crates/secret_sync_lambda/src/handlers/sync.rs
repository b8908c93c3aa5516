use secret_sync_core::config::SyncConfig;
use secret_sync_core::error::{AccountSyncFailure, SyncError};
use secret_sync_core::reconcile::{plan_account_sync, tally, SyncAction};
use secret_sync_core::secret::{Secret, SecretFilter};
use secret_sync_core::summary::AccountSyncReport;
use tracing::info;

use crate::adapters::credentials::CredentialProvider;
use crate::adapters::secrets::SecretsApi;
use crate::handlers::catalog::list_secrets;
use crate::handlers::keys::resolve_key_alias;

/// Brings one destination account in line with the source secrets.
///
/// Secrets are only ever updated or created, never deleted. The first failing
/// write aborts the account; writes that already succeeded stay in place and
/// are counted in the failure's report.
pub fn sync_account<P: CredentialProvider>(
    provider: &P,
    config: &SyncConfig,
    account_id: &str,
    source: &[Secret],
) -> Result<AccountSyncReport, AccountSyncFailure> {
    let session = provider
        .assume_role(&config.account_role_arn(account_id))
        .map_err(|message| SyncError::connection(format!("account {account_id}"), message))?;

    let key_id = resolve_key_alias(&session, &config.kms_key_alias)?;
    let destination = list_secrets(&session, &SecretFilter::ByKeyId(key_id.clone()))?;
    let plan = plan_account_sync(source, &destination, &config.prefix);

    if config.dry_run {
        for action in plan.iter().filter(|action| action.is_write()) {
            info!(
                account_id,
                secret_name = action.name(),
                action = action.label(),
                "dry run: skipping write"
            );
        }
        return Ok(tally(&plan));
    }

    let mut report = AccountSyncReport::default();
    for action in &plan {
        if let Err(error) = apply_action(&session, account_id, &key_id, action) {
            return Err(AccountSyncFailure { report, error });
        }
        report.record(action);
    }
    Ok(report)
}

fn apply_action(
    api: &impl SecretsApi,
    account_id: &str,
    key_id: &str,
    action: &SyncAction,
) -> Result<(), SyncError> {
    match action {
        SyncAction::Unchanged { name } => {
            info!(account_id, secret_name = %name, "no update required");
        }
        SyncAction::Update {
            secret_id,
            name,
            value,
        } => {
            let version_id = api
                .update_secret(secret_id, value, key_id)
                .map_err(|message| SyncError::api(format!("update_secret {name}"), message))?;
            info!(
                account_id,
                secret_name = %name,
                version_id = version_id.as_deref().unwrap_or_default(),
                "updated secret"
            );
        }
        SyncAction::Create { name, value } => {
            api.create_secret(name, value, key_id)
                .map_err(|message| SyncError::api(format!("create_secret {name}"), message))?;
            info!(account_id, secret_name = %name, "created secret");
        }
    }
    Ok(())
}
