use super::Page;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyAlias {
    pub alias_name: String,
    pub target_key_id: Option<String>,
}

pub trait KeyAliasApi {
    fn list_aliases_page(&self, marker: Option<&str>) -> Result<Page<KeyAlias>, String>;
}
