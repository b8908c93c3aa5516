use super::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretListEntry {
    pub arn: String,
    pub name: String,
    pub kms_key_id: Option<String>,
}

pub trait SecretsApi {
    fn list_secrets_page(
        &self,
        next_token: Option<&str>,
    ) -> Result<Page<SecretListEntry>, String>;

    fn get_secret_value(&self, secret_id: &str) -> Result<String, String>;

    /// Returns the new version id, when the service reports one.
    fn update_secret(
        &self,
        secret_id: &str,
        value: &str,
        kms_key_id: &str,
    ) -> Result<Option<String>, String>;

    /// Returns the ARN of the created secret.
    fn create_secret(&self, name: &str, value: &str, kms_key_id: &str) -> Result<String, String>;
}
