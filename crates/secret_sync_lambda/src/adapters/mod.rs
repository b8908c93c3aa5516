pub mod aws;
pub mod credentials;
pub mod keys;
pub mod organizations;
pub mod secrets;

/// One page of a paginated listing. `next_token` is `None` on the last page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next_token: Option<String>,
}

impl<T> Page<T> {
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_token: None,
        }
    }
}
