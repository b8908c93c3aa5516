use std::ops::ControlFlow;

use secret_sync_core::error::SyncError;
use secret_sync_core::secret::{Secret, SecretFilter};
use tracing::debug;

use crate::adapters::secrets::SecretsApi;
use crate::handlers::paging::for_each_page_item;

/// Lists every secret visible to `api` that passes `filter`, then fetches
/// each retained secret's current value. Any failure aborts the whole read.
pub fn list_secrets(
    api: &impl SecretsApi,
    filter: &SecretFilter,
) -> Result<Vec<Secret>, SyncError> {
    let mut secrets = Vec::new();
    for_each_page_item(
        |token| api.list_secrets_page(token),
        |entry| {
            if filter.matches(&entry.name, entry.kms_key_id.as_deref()) {
                secrets.push(Secret::listed(entry.arn, entry.name, entry.kms_key_id));
            }
            ControlFlow::Continue(())
        },
    )
    .map_err(|message| SyncError::api("list_secrets", message))?;

    for secret in &mut secrets {
        secret.value = api.get_secret_value(&secret.id).map_err(|message| {
            SyncError::api(format!("get_secret_value {}", secret.name), message)
        })?;
    }

    debug!(secrets = secrets.len(), ?filter, "listed secrets");
    Ok(secrets)
}
