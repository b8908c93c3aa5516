use std::ops::ControlFlow;

use secret_sync_core::config::role_arn;
use secret_sync_core::error::SyncError;
use tracing::info;

use crate::adapters::credentials::CredentialProvider;
use crate::adapters::organizations::OrganizationsApi;
use crate::handlers::paging::for_each_page_item;

/// Assumes the organization role and returns the ids of every account
/// directly under the organizational unit named `ou_name`.
pub fn list_ou_accounts<P: CredentialProvider>(
    provider: &P,
    org_account_id: &str,
    org_role_name: &str,
    ou_name: &str,
) -> Result<Vec<String>, SyncError> {
    let session = provider
        .assume_role(&role_arn(org_account_id, org_role_name))
        .map_err(|message| {
            SyncError::connection(format!("organization account {org_account_id}"), message)
        })?;
    find_ou_accounts(&session, ou_name)
}

/// Nested units are not searched: only units directly under the root, and
/// only accounts directly under the matched unit.
pub fn find_ou_accounts(
    api: &impl OrganizationsApi,
    ou_name: &str,
) -> Result<Vec<String>, SyncError> {
    let roots = api
        .list_roots()
        .map_err(|message| SyncError::api("list_roots", message))?;
    // An organization has a single root.
    let root_id = roots
        .into_iter()
        .next()
        .ok_or_else(|| SyncError::not_found("organization root", "<none>"))?;

    let wanted = ou_name.to_lowercase();
    let mut ou_id = None;
    for_each_page_item(
        |token| api.list_organizational_units_page(&root_id, token),
        |unit| {
            if unit.name.to_lowercase() == wanted {
                ou_id = Some(unit.id);
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        },
    )
    .map_err(|message| {
        SyncError::api(format!("list_organizational_units {root_id}"), message)
    })?;
    let ou_id = ou_id.ok_or_else(|| SyncError::not_found("organizational unit", ou_name))?;

    let mut accounts = Vec::new();
    for_each_page_item(
        |token| api.list_accounts_page(&ou_id, token),
        |account_id| {
            accounts.push(account_id);
            ControlFlow::Continue(())
        },
    )
    .map_err(|message| SyncError::api(format!("list_accounts {ou_id}"), message))?;

    info!(ou_name, ou_id = %ou_id, accounts = accounts.len(), "resolved organizational unit");
    Ok(accounts)
}
