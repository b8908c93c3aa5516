use crate::error::ConfigError;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_PREFIX: &str = "g-";
pub const KMS_ALIAS_PREFIX: &str = "alias/";

pub const ENV_REGION: &str = "REGION";
pub const ENV_PREFIX: &str = "PREFIX";
pub const ENV_ORG_ACCOUNT_ID: &str = "ORG_ACCOUNT_ID";
pub const ENV_ORG_ROLE_NAME: &str = "ORG_ROLE_NAME";
pub const ENV_ORG_UNIT_NAME: &str = "ORG_UNIT_NAME";
pub const ENV_ROLE_NAME: &str = "ROLE_NAME";
pub const ENV_KMS_KEY_ALIAS: &str = "KMS_KEY_ALIAS";
pub const ENV_DRY_RUN: &str = "DRY_RUN";

/// Process-wide settings, read once at startup and shared read-only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub region: String,
    pub prefix: String,
    pub org_account_id: String,
    pub org_role_name: String,
    pub org_unit_name: String,
    pub role_name: String,
    pub kms_key_alias: String,
    pub dry_run: bool,
}

impl SyncConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let optional = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let required = |name: &'static str| optional(name).ok_or(ConfigError::Missing(name));

        let prefix = match lookup(ENV_PREFIX) {
            None => DEFAULT_PREFIX.to_string(),
            Some(value) if value.trim().is_empty() => {
                return Err(ConfigError::Invalid {
                    name: ENV_PREFIX,
                    reason: "an empty prefix would select every secret in the source account"
                        .to_string(),
                });
            }
            Some(value) => value.trim().to_string(),
        };

        let dry_run = match optional(ENV_DRY_RUN) {
            None => false,
            Some(value) => parse_bool(&value).ok_or_else(|| ConfigError::Invalid {
                name: ENV_DRY_RUN,
                reason: format!("expected a boolean, got '{value}'"),
            })?,
        };

        Ok(Self {
            region: optional(ENV_REGION).unwrap_or_else(|| DEFAULT_REGION.to_string()),
            prefix,
            org_account_id: required(ENV_ORG_ACCOUNT_ID)?,
            org_role_name: required(ENV_ORG_ROLE_NAME)?,
            org_unit_name: required(ENV_ORG_UNIT_NAME)?,
            role_name: required(ENV_ROLE_NAME)?,
            kms_key_alias: normalize_alias(&required(ENV_KMS_KEY_ALIAS)?),
            dry_run,
        })
    }

    pub fn org_role_arn(&self) -> String {
        role_arn(&self.org_account_id, &self.org_role_name)
    }

    pub fn account_role_arn(&self, account_id: &str) -> String {
        role_arn(account_id, &self.role_name)
    }
}

pub fn role_arn(account_id: &str, role_name: &str) -> String {
    format!("arn:aws:iam::{account_id}:role/{role_name}")
}

/// KMS reports alias names as `alias/<name>`; operators often configure the bare name.
pub fn normalize_alias(alias: &str) -> String {
    if alias
        .get(..KMS_ALIAS_PREFIX.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(KMS_ALIAS_PREFIX))
    {
        alias.to_string()
    } else {
        format!("{KMS_ALIAS_PREFIX}{alias}")
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
