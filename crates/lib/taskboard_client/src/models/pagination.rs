//! Cursor pagination primitives.

use serde::{Deserialize, Serialize};

/// Cursor pair returned by every list endpoint. Empty string means "none".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub prev_cursor: String,
    #[serde(default)]
    pub next_cursor: String,
}

/// `{data: T[], pagination: {prev_cursor, next_cursor}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ListEnvelope<T> {
    /// The API encodes an empty result as `null`.
    pub data: Option<Vec<T>>,
    #[serde(default)]
    pub pagination: Pagination,
}

/// One page of a collection as held by a store.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub prev_cursor: String,
    pub next_cursor: String,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            prev_cursor: String::new(),
            next_cursor: String::new(),
        }
    }
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        !self.next_cursor.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        !self.prev_cursor.is_empty()
    }
}

impl<T> From<ListEnvelope<T>> for Page<T> {
    fn from(envelope: ListEnvelope<T>) -> Self {
        Self {
            items: envelope.data.unwrap_or_default(),
            prev_cursor: envelope.pagination.prev_cursor,
            next_cursor: envelope.pagination.next_cursor,
        }
    }
}

/// Resource-specific filter set carrying the `{limit, cursor}` controls.
pub trait PageFilter: Clone + Serialize + Send + Sync + 'static {
    fn cursor(&self) -> &str;

    fn set_cursor(&mut self, cursor: String);

    /// Same filters positioned at `cursor`.
    fn at_cursor(&self, cursor: &str) -> Self {
        let mut moved = self.clone();
        moved.set_cursor(cursor.to_string());
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_data_becomes_empty_page() {
        let envelope: ListEnvelope<u32> = serde_json::from_value(serde_json::json!({
            "data": null,
            "pagination": {"prev_cursor": "", "next_cursor": ""}
        }))
        .unwrap();

        let page = Page::from(envelope);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
    }

    #[test]
    fn cursors_carry_through() {
        let envelope: ListEnvelope<u32> = serde_json::from_value(serde_json::json!({
            "data": [1, 2, 3],
            "pagination": {"prev_cursor": "p", "next_cursor": "abc"}
        }))
        .unwrap();

        let page = Page::from(envelope);
        assert_eq!(page.items, vec![1, 2, 3]);
        assert_eq!(page.next_cursor, "abc");
        assert!(page.has_prev());
    }

    #[derive(Debug, Deserialize)]
    struct Named {
        name: String,
    }

    #[test]
    fn missing_data_needs_no_default_items() {
        let envelope: ListEnvelope<Named> = serde_json::from_value(serde_json::json!({
            "pagination": {"prev_cursor": "", "next_cursor": "abc"}
        }))
        .unwrap();
        assert!(envelope.data.is_none());

        let page = Page::from(envelope);
        assert!(page.items.is_empty());
        assert_eq!(page.next_cursor, "abc");
    }

    #[test]
    fn items_without_default_deserialize() {
        let envelope: ListEnvelope<Named> =
            serde_json::from_value(serde_json::json!({"data": [{"name": "Write brief"}]})).unwrap();
        assert_eq!(envelope.data.unwrap()[0].name, "Write brief");
    }

    #[test]
    fn missing_pagination_defaults_to_no_cursors() {
        let envelope: ListEnvelope<u32> =
            serde_json::from_value(serde_json::json!({"data": [7]})).unwrap();
        assert_eq!(envelope.pagination, Pagination::default());
    }
}
