use super::keys::KeyAliasApi;
use super::organizations::OrganizationsApi;
use super::secrets::SecretsApi;

pub trait IdentityApi {
    fn caller_account_id(&self) -> Result<String, String>;
}

/// API handles scoped to one set of credentials in one account.
pub trait AccountSession: IdentityApi + SecretsApi + KeyAliasApi + OrganizationsApi {}

impl<T> AccountSession for T where T: IdentityApi + SecretsApi + KeyAliasApi + OrganizationsApi {}

/// Produces sessions for the caller and for assumed roles. Shared by every
/// account task, so implementations must be thread-safe.
pub trait CredentialProvider: Send + Sync + 'static {
    type Session: AccountSession + Send;

    fn base_session(&self) -> &Self::Session;

    fn assume_role(&self, role_arn: &str) -> Result<Self::Session, String>;
}
