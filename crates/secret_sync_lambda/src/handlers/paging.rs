use std::ops::ControlFlow;

use crate::adapters::Page;

/// Walks a token-paginated listing, handing every item to `visit` until it
/// breaks or the last page has been consumed. Pages after a break are never
/// requested.
pub fn for_each_page_item<T>(
    mut fetch_page: impl FnMut(Option<&str>) -> Result<Page<T>, String>,
    mut visit: impl FnMut(T) -> ControlFlow<()>,
) -> Result<(), String> {
    let mut next_token: Option<String> = None;
    loop {
        let page = fetch_page(next_token.as_deref())?;
        for item in page.items {
            if visit(item).is_break() {
                return Ok(());
            }
        }
        next_token = page.next_token.filter(|token| !token.is_empty());
        if next_token.is_none() {
            return Ok(());
        }
    }
}
