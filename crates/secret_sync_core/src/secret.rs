/// One secret as seen in a single listing pass. `value` is filled in after
/// the listing, once the secret has been selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    pub id: String,
    pub name: String,
    pub value: String,
    pub kms_key_id: Option<String>,
}

impl Secret {
    pub fn listed(
        id: impl Into<String>,
        name: impl Into<String>,
        kms_key_id: Option<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            value: String::new(),
            kms_key_id,
        }
    }
}

/// Selects which listed secrets a catalog read retains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretFilter {
    /// Source side: the name starts with the propagation prefix.
    ByPrefix(String),
    /// Destination side: the secret is encrypted under the given key.
    ByKeyId(String),
}

impl SecretFilter {
    pub fn matches(&self, name: &str, kms_key_id: Option<&str>) -> bool {
        match self {
            Self::ByPrefix(prefix) => name.starts_with(prefix.as_str()),
            Self::ByKeyId(key_id) => {
                kms_key_id.is_some_and(|candidate| key_id_matches(candidate, key_id))
            }
        }
    }
}

/// Secrets Manager reports the owning key either as a bare id or as a key ARN.
fn key_id_matches(candidate: &str, key_id: &str) -> bool {
    if candidate.eq_ignore_ascii_case(key_id) {
        return true;
    }
    candidate
        .rsplit_once(":key/")
        .is_some_and(|(_, tail)| tail.eq_ignore_ascii_case(key_id))
}

/// Destination name for a source secret: the source name without the prefix.
pub fn strip_prefix_name<'a>(source_name: &'a str, prefix: &str) -> &'a str {
    match source_name.get(..prefix.len()) {
        Some(head) if head.eq_ignore_ascii_case(prefix) => &source_name[prefix.len()..],
        _ => source_name,
    }
}

/// A source secret corresponds to a destination secret when the source name
/// equals `prefix + destination name`, ignoring case.
pub fn names_match(source_name: &str, destination_name: &str, prefix: &str) -> bool {
    source_name.to_lowercase() == format!("{prefix}{destination_name}").to_lowercase()
}
