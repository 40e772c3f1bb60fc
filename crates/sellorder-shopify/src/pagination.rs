//! Cursor pagination for Admin GraphQL connections.
//!
//! Each page carries `pageInfo { hasNextPage endCursor }`; the next request
//! passes `endCursor` as `after`.

use crate::types::PageInfo;

/// Returns the cursor for the next page, or `None` on the last page.
///
/// A page that claims `hasNextPage` but carries no usable cursor is treated
/// as the last page rather than re-requesting the first page forever.
#[must_use]
pub fn next_cursor(page_info: &PageInfo) -> Option<String> {
    if !page_info.has_next_page {
        return None;
    }
    page_info
        .end_cursor
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_owned)
}
