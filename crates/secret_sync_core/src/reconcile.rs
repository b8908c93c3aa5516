use crate::secret::{names_match, strip_prefix_name, Secret};
use crate::summary::AccountSyncReport;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncAction {
    Unchanged {
        name: String,
    },
    Update {
        secret_id: String,
        name: String,
        value: String,
    },
    Create {
        name: String,
        value: String,
    },
}

impl SyncAction {
    pub fn name(&self) -> &str {
        match self {
            Self::Unchanged { name } | Self::Update { name, .. } | Self::Create { name, .. } => {
                name
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unchanged { .. } => "unchanged",
            Self::Update { .. } => "update",
            Self::Create { .. } => "create",
        }
    }

    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Unchanged { .. })
    }
}

/// One action per source secret, in source order. The first destination
/// secret whose name matches wins. Destination secrets with no source
/// counterpart are never touched.
pub fn plan_account_sync(
    source: &[Secret],
    destination: &[Secret],
    prefix: &str,
) -> Vec<SyncAction> {
    source
        .iter()
        .map(|src| {
            let matched = destination
                .iter()
                .find(|dst| names_match(&src.name, &dst.name, prefix));
            match matched {
                Some(dst) if dst.value == src.value => SyncAction::Unchanged {
                    name: dst.name.clone(),
                },
                Some(dst) => SyncAction::Update {
                    secret_id: dst.id.clone(),
                    name: dst.name.clone(),
                    value: src.value.clone(),
                },
                None => SyncAction::Create {
                    name: strip_prefix_name(&src.name, prefix).to_string(),
                    value: src.value.clone(),
                },
            }
        })
        .collect()
}

/// Counts what a plan would do, without applying it.
pub fn tally(actions: &[SyncAction]) -> AccountSyncReport {
    let mut report = AccountSyncReport::default();
    for action in actions {
        report.record(action);
    }
    report
}
