use super::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrganizationalUnit {
    pub id: String,
    pub name: String,
}

pub trait OrganizationsApi {
    /// Root ids of the organization. A well-formed organization has exactly one.
    fn list_roots(&self) -> Result<Vec<String>, String>;

    fn list_organizational_units_page(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<OrganizationalUnit>, String>;

    /// Account ids directly under `parent_id`.
    fn list_accounts_page(
        &self,
        parent_id: &str,
        next_token: Option<&str>,
    ) -> Result<Page<String>, String>;
}
