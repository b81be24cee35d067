use axum::Json;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

/// Pagination metadata for a collection response
///
/// # Example
/// ```
/// use parapet::PageMeta;
///
/// let meta = PageMeta::new(2, 20, 87);
/// assert_eq!(meta.pages, 5);
/// assert_eq!(meta.next, Some(3));
/// assert_eq!(meta.prev, Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(utoipa::ToSchema))]
pub struct PageMeta {
    /// Current page, 1-based
    pub page: u32,
    pub per_page: u32,
    /// Total number of pages
    pub pages: u32,
    /// Total number of items across all pages
    pub total: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<u32>,
}

impl PageMeta {
    pub fn new(page: u32, per_page: u32, total: u64) -> Self {
        let per_page = per_page.max(1);
        let pages = total.div_ceil(u64::from(per_page)) as u32;
        let next = if page < pages { Some(page + 1) } else { None };
        let prev = if page > 1 { Some(page - 1) } else { None };
        Self {
            page,
            per_page,
            pages,
            total,
            next,
            prev,
        }
    }
}

/// A page of items plus its pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, page: u32, per_page: u32, total: u64) -> Self {
        Self {
            items,
            pagination: PageMeta::new(page, per_page, total),
        }
    }
}

impl<T: Serialize> IntoResponse for Page<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page_has_no_prev() {
        let meta = PageMeta::new(1, 10, 35);
        assert_eq!(meta.pages, 4);
        assert_eq!(meta.prev, None);
        assert_eq!(meta.next, Some(2));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let meta = PageMeta::new(4, 10, 35);
        assert_eq!(meta.next, None);
        assert_eq!(meta.prev, Some(3));
    }

    #[test]
    fn test_empty_collection() {
        let meta = PageMeta::new(1, 10, 0);
        assert_eq!(meta.pages, 0);
        assert_eq!(meta.next, None);
        assert_eq!(meta.prev, None);
    }

    #[test]
    fn test_zero_per_page_is_clamped() {
        let meta = PageMeta::new(1, 0, 10);
        assert_eq!(meta.per_page, 1);
        assert_eq!(meta.pages, 10);
    }

    #[test]
    fn test_boundary_serialization_omits_links() {
        let page = Page::new(vec!["a", "b"], 1, 2, 2);
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["pagination"]["page"], 1);
        assert!(json["pagination"].get("next").is_none());
        assert!(json["pagination"].get("prev").is_none());
    }
}
