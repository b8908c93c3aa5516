use std::ops::ControlFlow;

use secret_sync_core::error::SyncError;

use crate::adapters::keys::KeyAliasApi;
use crate::handlers::paging::for_each_page_item;

/// Returns the key id behind `alias_name`. Paging stops at the first
/// case-insensitive match.
pub fn resolve_key_alias(api: &impl KeyAliasApi, alias_name: &str) -> Result<String, SyncError> {
    let mut key_id = None;
    for_each_page_item(
        |marker| api.list_aliases_page(marker),
        |alias| match alias.target_key_id {
            Some(target) if alias.alias_name.eq_ignore_ascii_case(alias_name) => {
                key_id = Some(target);
                ControlFlow::Break(())
            }
            _ => ControlFlow::Continue(()),
        },
    )
    .map_err(|message| SyncError::api("list_aliases", message))?;

    key_id.ok_or_else(|| SyncError::not_found("key alias", alias_name))
}
