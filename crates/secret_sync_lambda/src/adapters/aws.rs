use std::future::Future;

use aws_config::sts::AssumeRoleProvider;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use secret_sync_core::error::SyncError;

use super::credentials::{CredentialProvider, IdentityApi};
use super::keys::{KeyAlias, KeyAliasApi};
use super::organizations::{OrganizationalUnit, OrganizationsApi};
use super::secrets::{SecretListEntry, SecretsApi};
use super::Page;

pub const ASSUME_ROLE_SESSION_NAME: &str = "secret-sync";

/// SDK calls are async; handlers are blocking per account task.
fn block_on<T>(future: impl Future<Output = Result<T, String>>) -> Result<T, String> {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

#[derive(Debug, Clone)]
pub struct AwsSession {
    sts: aws_sdk_sts::Client,
    organizations: aws_sdk_organizations::Client,
    secrets: aws_sdk_secretsmanager::Client,
    kms: aws_sdk_kms::Client,
}

impl AwsSession {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            sts: aws_sdk_sts::Client::new(config),
            organizations: aws_sdk_organizations::Client::new(config),
            secrets: aws_sdk_secretsmanager::Client::new(config),
            kms: aws_sdk_kms::Client::new(config),
        }
    }
}

pub struct AwsCredentialProvider {
    region: Region,
    base_config: SdkConfig,
    base: AwsSession,
}

impl AwsCredentialProvider {
    /// Loads the ambient credential chain for `region` and checks that it
    /// actually yields credentials.
    pub async fn connect(region: &str) -> Result<Self, SyncError> {
        let region = Region::new(region.to_string());
        let base_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region.clone())
            .load()
            .await;

        let provider = base_config
            .credentials_provider()
            .ok_or_else(|| SyncError::connection("AWS", "no credentials provider configured"))?;
        provider
            .provide_credentials()
            .await
            .map_err(|error| SyncError::connection("AWS", error.to_string()))?;

        Ok(Self {
            base: AwsSession::new(&base_config),
            region,
            base_config,
        })
    }
}

impl CredentialProvider for AwsCredentialProvider {
    type Session = AwsSession;

    fn base_session(&self) -> &AwsSession {
        &self.base
    }

    fn assume_role(&self, role_arn: &str) -> Result<AwsSession, String> {
        let region = self.region.clone();
        let base_config = self.base_config.clone();
        let role_arn = role_arn.to_string();

        block_on(async move {
            let provider = AssumeRoleProvider::builder(role_arn.clone())
                .session_name(ASSUME_ROLE_SESSION_NAME)
                .region(region.clone())
                .configure(&base_config)
                .build()
                .await;
            // Resolve now so a bad trust policy fails here rather than on the first API call.
            provider
                .provide_credentials()
                .await
                .map_err(|error| format!("failed to assume role {role_arn}: {error}"))?;

            let config = aws_config::defaults(BehaviorVersion::latest())
                .region(region)
                .credentials_provider(provider)
                .load()
                .await;
            Ok(AwsSession::new(&config))
        })
    }
}

impl IdentityApi for AwsSession {
    fn caller_account_id(&self) -> Result<String, String> {
        let client = self.sts.clone();
        block_on(async move {
            let output = client
                .get_caller_identity()
                .send()
                .await
                .map_err(|error| {
                    format!(
                        "failed to get caller identity: {}",
                        aws_sdk_sts::error::DisplayErrorContext(&error)
                    )
                })?;
            output
                .account()
                .map(str::to_string)
                .ok_or_else(|| "caller identity did not include an account id".to_string())
        })
    }
}

impl SecretsApi for AwsSession {
    fn list_secrets_page(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<SecretListEntry>, String> {
        let client = self.secrets.clone();
        let next_token = next_token.map(str::to_string);
        block_on(async move {
            let output = client
                .list_secrets()
                .set_next_token(next_token)
                .send()
                .await
                .map_err(|error| {
                    format!(
                        "failed to list secrets: {}",
                        aws_sdk_secretsmanager::error::DisplayErrorContext(&error)
                    )
                })?;
            let items = output
                .secret_list()
                .iter()
                .map(|entry| SecretListEntry {
                    arn: entry.arn().unwrap_or_default().to_string(),
                    name: entry.name().unwrap_or_default().to_string(),
                    kms_key_id: entry.kms_key_id().map(str::to_string),
                })
                .collect();
            Ok(Page {
                items,
                next_token: output.next_token().map(str::to_string),
            })
        })
    }

    fn get_secret_value(&self, secret_id: &str) -> Result<String, String> {
        let client = self.secrets.clone();
        let secret_id = secret_id.to_string();
        block_on(async move {
            let output = client
                .get_secret_value()
                .secret_id(&secret_id)
                .send()
                .await
                .map_err(|error| {
                    format!(
                        "failed to get secret value: {}",
                        aws_sdk_secretsmanager::error::DisplayErrorContext(&error)
                    )
                })?;
            output
                .secret_string()
                .map(str::to_string)
                .ok_or_else(|| format!("secret {secret_id} has no string value"))
        })
    }

    fn update_secret(
        &self,
        secret_id: &str,
        value: &str,
        kms_key_id: &str,
    ) -> Result<Option<String>, String> {
        let request = self
            .secrets
            .update_secret()
            .secret_id(secret_id)
            .secret_string(value)
            .kms_key_id(kms_key_id);
        block_on(async move {
            let output = request.send().await.map_err(|error| {
                format!(
                    "failed to update secret: {}",
                    aws_sdk_secretsmanager::error::DisplayErrorContext(&error)
                )
            })?;
            Ok(output.version_id().map(str::to_string))
        })
    }

    fn create_secret(&self, name: &str, value: &str, kms_key_id: &str) -> Result<String, String> {
        let request = self
            .secrets
            .create_secret()
            .name(name)
            .secret_string(value)
            .kms_key_id(kms_key_id);
        block_on(async move {
            let output = request.send().await.map_err(|error| {
                format!(
                    "failed to create secret: {}",
                    aws_sdk_secretsmanager::error::DisplayErrorContext(&error)
                )
            })?;
            Ok(output.arn().unwrap_or_default().to_string())
        })
    }
}

impl KeyAliasApi for AwsSession {
    fn list_aliases_page(&self, marker: Option<&str>) -> Result<Page<KeyAlias>, String> {
        let client = self.kms.clone();
        let marker = marker.map(str::to_string);
        block_on(async move {
            let output = client
                .list_aliases()
                .set_marker(marker)
                .send()
                .await
                .map_err(|error| {
                    format!(
                        "failed to list key aliases: {}",
                        aws_sdk_kms::error::DisplayErrorContext(&error)
                    )
                })?;
            let items = output
                .aliases()
                .iter()
                .map(|alias| KeyAlias {
                    alias_name: alias.alias_name().unwrap_or_default().to_string(),
                    target_key_id: alias.target_key_id().map(str::to_string),
                })
                .collect();
            Ok(Page {
                items,
                next_token: output.next_marker().map(str::to_string),
            })
        })
    }
}

impl OrganizationsApi for AwsSession {
    fn list_roots(&self) -> Result<Vec<String>, String> {
        let client = self.organizations.clone();
        block_on(async move {
            let output = client.list_roots().send().await.map_err(|error| {
                format!(
                    "failed to list organization roots: {}",
                    aws_sdk_organizations::error::DisplayErrorContext(&error)
                )
            })?;
            Ok(output
                .roots()
                .iter()
                .filter_map(|root| root.id().map(str::to_string))
                .collect())
        })
    }

    fn list_organizational_units_page(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<OrganizationalUnit>, String> {
        let request = self
            .organizations
            .list_organizational_units_for_parent()
            .parent_id(parent_id)
            .set_next_token(next_token.map(str::to_string));
        block_on(async move {
            let output = request.send().await.map_err(|error| {
                format!(
                    "failed to list organizational units: {}",
                    aws_sdk_organizations::error::DisplayErrorContext(&error)
                )
            })?;
            let items = output
                .organizational_units()
                .iter()
                .map(|unit| OrganizationalUnit {
                    id: unit.id().unwrap_or_default().to_string(),
                    name: unit.name().unwrap_or_default().to_string(),
                })
                .collect();
            Ok(Page {
                items,
                next_token: output.next_token().map(str::to_string),
            })
        })
    }

    fn list_accounts_page(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>, String> {
        let request = self
            .organizations
            .list_accounts_for_parent()
            .parent_id(parent_id)
            .set_next_token(next_token.map(str::to_string));
        block_on(async move {
            let output = request.send().await.map_err(|error| {
                format!(
                    "failed to list accounts: {}",
                    aws_sdk_organizations::error::DisplayErrorContext(&error)
                )
            })?;
            Ok(Page {
                items: output
                    .accounts()
                    .iter()
                    .filter_map(|account| account.id().map(str::to_string))
                    .collect(),
                next_token: output.next_token().map(str::to_string),
            })
        })
    }
}
