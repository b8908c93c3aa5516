#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard};

use secret_sync_core::config::SyncConfig;
use secret_sync_lambda::adapters::credentials::{CredentialProvider, IdentityApi};
use secret_sync_lambda::adapters::keys::{KeyAlias, KeyAliasApi};
use secret_sync_lambda::adapters::organizations::{OrganizationalUnit, OrganizationsApi};
use secret_sync_lambda::adapters::secrets::{SecretListEntry, SecretsApi};
use secret_sync_lambda::adapters::Page;

pub const SOURCE_ACCOUNT: &str = "111111111111";
pub const ORG_ACCOUNT: &str = "999999999999";
pub const ROOT_ID: &str = "r-root";
pub const PROD_OU: &str = "ou-prod";
pub const KEY_ALIAS: &str = "alias/secrets";
pub const ACCOUNT_A: &str = "222222222222";
pub const ACCOUNT_B: &str = "333333333333";
pub const KEY_A: &str = "key-aaaa";
pub const KEY_B: &str = "key-bbbb";

pub fn test_config() -> SyncConfig {
    SyncConfig {
        region: "us-east-1".to_string(),
        prefix: "g-".to_string(),
        org_account_id: ORG_ACCOUNT.to_string(),
        org_role_name: "OrgReader".to_string(),
        org_unit_name: "Prod".to_string(),
        role_name: "SecretSync".to_string(),
        kms_key_alias: KEY_ALIAS.to_string(),
        dry_run: false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Write {
    Update {
        account_id: String,
        secret_id: String,
        value: String,
        kms_key_id: String,
    },
    Create {
        account_id: String,
        name: String,
        value: String,
        kms_key_id: String,
    },
}

impl Write {
    pub fn account_id(&self) -> &str {
        match self {
            Self::Update { account_id, .. } | Self::Create { account_id, .. } => account_id,
        }
    }
}

#[derive(Debug, Clone)]
struct StoredSecret {
    arn: String,
    name: String,
    value: String,
    kms_key_id: Option<String>,
}

#[derive(Debug, Default)]
struct AccountState {
    secrets: Vec<StoredSecret>,
    aliases: Vec<KeyAlias>,
    failing_writes: BTreeSet<String>,
    failing_reads: BTreeSet<String>,
    alias_pages_requested: usize,
}

#[derive(Debug, Default)]
struct World {
    page_size: usize,
    accounts: BTreeMap<String, AccountState>,
    roots: Vec<String>,
    units: Vec<(String, OrganizationalUnit)>,
    members: BTreeMap<String, Vec<String>>,
    denied_roles: BTreeSet<String>,
    assumed_roles: Vec<String>,
    writes: Vec<Write>,
    versions: usize,
}

impl World {
    fn account(&mut self, account_id: &str) -> Result<&mut AccountState, String> {
        self.accounts
            .get_mut(account_id)
            .ok_or_else(|| format!("unknown account {account_id}"))
    }
}

fn paginate<T: Clone>(items: &[T], token: Option<&str>, page_size: usize) -> Page<T> {
    let start = token
        .and_then(|value| value.parse::<usize>().ok())
        .unwrap_or(0)
        .min(items.len());
    let end = (start + page_size).min(items.len());
    Page {
        items: items[start..end].to_vec(),
        next_token: (end < items.len()).then(|| end.to_string()),
    }
}

fn secret_arn(account_id: &str, name: &str) -> String {
    format!("arn:aws:secretsmanager:us-east-1:{account_id}:secret:{name}")
}

/// In-memory organization: a source account, an organization account with a
/// single root, and member accounts with their own secrets and key aliases.
/// Every listing is paginated with a small page size.
pub struct FakeCloud {
    world: Arc<Mutex<World>>,
    base: FakeSession,
}

impl FakeCloud {
    pub fn new() -> Self {
        let mut world = World {
            page_size: 2,
            roots: vec![ROOT_ID.to_string()],
            ..World::default()
        };
        world
            .accounts
            .insert(SOURCE_ACCOUNT.to_string(), AccountState::default());
        world
            .accounts
            .insert(ORG_ACCOUNT.to_string(), AccountState::default());
        for (id, name) in [
            ("ou-sandbox", "Sandbox"),
            ("ou-security", "Security"),
            ("ou-dev", "Dev"),
        ] {
            world.units.push((
                ROOT_ID.to_string(),
                OrganizationalUnit {
                    id: id.to_string(),
                    name: name.to_string(),
                },
            ));
        }

        let world = Arc::new(Mutex::new(world));
        Self {
            base: FakeSession {
                account_id: SOURCE_ACCOUNT.to_string(),
                world: Arc::clone(&world),
            },
            world,
        }
    }

    fn world(&self) -> MutexGuard<'_, World> {
        self.world.lock().expect("poisoned mutex")
    }

    pub fn source_secret(&self, name: &str, value: &str) {
        self.world()
            .accounts
            .get_mut(SOURCE_ACCOUNT)
            .expect("source account should exist")
            .secrets
            .push(StoredSecret {
                arn: secret_arn(SOURCE_ACCOUNT, name),
                name: name.to_string(),
                value: value.to_string(),
                kms_key_id: None,
            });
    }

    pub fn organizational_unit(&self, parent_id: &str, ou_id: &str, name: &str) {
        self.world().units.push((
            parent_id.to_string(),
            OrganizationalUnit {
                id: ou_id.to_string(),
                name: name.to_string(),
            },
        ));
    }

    /// Adds an account under `ou_id` whose `KEY_ALIAS` points at `key_id`,
    /// surrounded by unrelated aliases so resolution has to page.
    pub fn member_account(&self, ou_id: &str, account_id: &str, key_id: &str) {
        let filler = |name: &str| KeyAlias {
            alias_name: name.to_string(),
            target_key_id: Some(format!("{name}-target")),
        };
        let aliases = vec![
            filler("alias/aws/secretsmanager"),
            filler("alias/other-1"),
            filler("alias/other-2"),
            KeyAlias {
                alias_name: KEY_ALIAS.to_string(),
                target_key_id: Some(key_id.to_string()),
            },
            filler("alias/after-1"),
            filler("alias/after-2"),
            filler("alias/after-3"),
        ];

        let mut world = self.world();
        world.accounts.insert(
            account_id.to_string(),
            AccountState {
                aliases,
                ..AccountState::default()
            },
        );
        world
            .members
            .entry(ou_id.to_string())
            .or_default()
            .push(account_id.to_string());
    }

    pub fn remove_aliases(&self, account_id: &str) {
        self.world()
            .accounts
            .get_mut(account_id)
            .expect("account should exist")
            .aliases
            .clear();
    }

    pub fn destination_secret(
        &self,
        account_id: &str,
        name: &str,
        value: &str,
        key_id: &str,
    ) -> String {
        let arn = secret_arn(account_id, name);
        self.world()
            .accounts
            .get_mut(account_id)
            .expect("account should exist")
            .secrets
            .push(StoredSecret {
                arn: arn.clone(),
                name: name.to_string(),
                value: value.to_string(),
                kms_key_id: Some(key_id.to_string()),
            });
        arn
    }

    pub fn deny_role(&self, role_arn: &str) {
        self.world().denied_roles.insert(role_arn.to_string());
    }

    pub fn fail_writes(&self, account_id: &str, secret_name: &str) {
        self.world()
            .accounts
            .get_mut(account_id)
            .expect("account should exist")
            .failing_writes
            .insert(secret_name.to_string());
    }

    pub fn fail_reads(&self, account_id: &str, secret_name: &str) {
        self.world()
            .accounts
            .get_mut(account_id)
            .expect("account should exist")
            .failing_reads
            .insert(secret_name.to_string());
    }

    pub fn writes(&self) -> Vec<Write> {
        self.world().writes.clone()
    }

    pub fn writes_for(&self, account_id: &str) -> Vec<Write> {
        self.writes()
            .into_iter()
            .filter(|write| write.account_id() == account_id)
            .collect()
    }

    pub fn clear_writes(&self) {
        self.world().writes.clear();
    }

    pub fn assumed_roles(&self) -> Vec<String> {
        self.world().assumed_roles.clone()
    }

    pub fn alias_pages_requested(&self, account_id: &str) -> usize {
        self.world()
            .accounts
            .get(account_id)
            .map(|account| account.alias_pages_requested)
            .unwrap_or_default()
    }

    pub fn secret_value(&self, account_id: &str, name: &str) -> Option<String> {
        self.world().accounts.get(account_id).and_then(|account| {
            account
                .secrets
                .iter()
                .find(|secret| secret.name == name)
                .map(|secret| secret.value.clone())
        })
    }

    pub fn secret_names(&self, account_id: &str) -> Vec<String> {
        self.world()
            .accounts
            .get(account_id)
            .map(|account| {
                account
                    .secrets
                    .iter()
                    .map(|secret| secret.name.clone())
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl CredentialProvider for FakeCloud {
    type Session = FakeSession;

    fn base_session(&self) -> &FakeSession {
        &self.base
    }

    fn assume_role(&self, role_arn: &str) -> Result<FakeSession, String> {
        let mut world = self.world();
        world.assumed_roles.push(role_arn.to_string());
        if world.denied_roles.contains(role_arn) {
            return Err(format!("AccessDenied: not authorized to assume {role_arn}"));
        }

        let account_id = role_arn
            .strip_prefix("arn:aws:iam::")
            .and_then(|rest| rest.split_once(":role/"))
            .map(|(account_id, _)| account_id.to_string())
            .ok_or_else(|| format!("malformed role arn {role_arn}"))?;
        if !world.accounts.contains_key(&account_id) {
            return Err(format!("unknown account {account_id}"));
        }

        Ok(FakeSession {
            account_id,
            world: Arc::clone(&self.world),
        })
    }
}

pub struct FakeSession {
    account_id: String,
    world: Arc<Mutex<World>>,
}

impl FakeSession {
    fn world(&self) -> MutexGuard<'_, World> {
        self.world.lock().expect("poisoned mutex")
    }
}

impl IdentityApi for FakeSession {
    fn caller_account_id(&self) -> Result<String, String> {
        Ok(self.account_id.clone())
    }
}

impl SecretsApi for FakeSession {
    fn list_secrets_page(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<SecretListEntry>, String> {
        let mut world = self.world();
        let page_size = world.page_size;
        let entries: Vec<SecretListEntry> = world
            .account(&self.account_id)?
            .secrets
            .iter()
            .map(|secret| SecretListEntry {
                arn: secret.arn.clone(),
                name: secret.name.clone(),
                kms_key_id: secret.kms_key_id.clone(),
            })
            .collect();
        Ok(paginate(&entries, next_token, page_size))
    }

    fn get_secret_value(&self, secret_id: &str) -> Result<String, String> {
        let mut world = self.world();
        let account = world.account(&self.account_id)?;
        let secret = account
            .secrets
            .iter()
            .find(|secret| secret.arn == secret_id)
            .ok_or_else(|| format!("ResourceNotFoundException: {secret_id}"))?;
        if account.failing_reads.contains(&secret.name) {
            return Err(format!("AccessDeniedException: {}", secret.name));
        }
        Ok(secret.value.clone())
    }

    fn update_secret(
        &self,
        secret_id: &str,
        value: &str,
        kms_key_id: &str,
    ) -> Result<Option<String>, String> {
        let mut world = self.world();
        world.versions += 1;
        let version = format!("version-{}", world.versions);
        let account = world.account(&self.account_id)?;
        let secret = account
            .secrets
            .iter_mut()
            .find(|secret| secret.arn == secret_id)
            .ok_or_else(|| format!("ResourceNotFoundException: {secret_id}"))?;
        if account.failing_writes.contains(&secret.name) {
            return Err(format!("AccessDeniedException: {}", secret.name));
        }
        secret.value = value.to_string();
        secret.kms_key_id = Some(kms_key_id.to_string());

        world.writes.push(Write::Update {
            account_id: self.account_id.clone(),
            secret_id: secret_id.to_string(),
            value: value.to_string(),
            kms_key_id: kms_key_id.to_string(),
        });
        Ok(Some(version))
    }

    fn create_secret(&self, name: &str, value: &str, kms_key_id: &str) -> Result<String, String> {
        let mut world = self.world();
        let account = world.account(&self.account_id)?;
        if account.failing_writes.contains(name) {
            return Err(format!("AccessDeniedException: {name}"));
        }
        if account.secrets.iter().any(|secret| secret.name == name) {
            return Err(format!("ResourceExistsException: {name}"));
        }
        let arn = secret_arn(&self.account_id, name);
        account.secrets.push(StoredSecret {
            arn: arn.clone(),
            name: name.to_string(),
            value: value.to_string(),
            kms_key_id: Some(kms_key_id.to_string()),
        });

        world.writes.push(Write::Create {
            account_id: self.account_id.clone(),
            name: name.to_string(),
            value: value.to_string(),
            kms_key_id: kms_key_id.to_string(),
        });
        Ok(arn)
    }
}

impl KeyAliasApi for FakeSession {
    fn list_aliases_page(&self, marker: Option<&str>) -> Result<Page<KeyAlias>, String> {
        let mut world = self.world();
        let page_size = world.page_size;
        let account = world.account(&self.account_id)?;
        account.alias_pages_requested += 1;
        Ok(paginate(&account.aliases, marker, page_size))
    }
}

impl OrganizationsApi for FakeSession {
    fn list_roots(&self) -> Result<Vec<String>, String> {
        Ok(self.world().roots.clone())
    }

    fn list_organizational_units_page(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<OrganizationalUnit>, String> {
        let world = self.world();
        let units: Vec<OrganizationalUnit> = world
            .units
            .iter()
            .filter(|(parent, _)| parent == parent_id)
            .map(|(_, unit)| unit.clone())
            .collect();
        Ok(paginate(&units, next_token, world.page_size))
    }

    fn list_accounts_page(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>, String> {
        let world = self.world();
        let accounts = world.members.get(parent_id).cloned().unwrap_or_default();
        Ok(paginate(&accounts, next_token, world.page_size))
    }
}
