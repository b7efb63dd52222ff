//! Request DTOs for the math service API
//!
//! Math operations take a free-form JSON object whose shape is checked by
//! the operation itself; only the history query has a fixed shape.

use serde::Deserialize;

use crate::history::MAX_PAGE_SIZE;

fn default_page() -> usize {
    1
}

fn default_page_size() -> usize {
    20
}

/// Query string for GET /api/v1/math/history
///
/// # Fields
/// - `operation`: Optional operation name filter
/// - `page`: 1-based page number (default 1)
/// - `page_size`: Records per page, 1 to 100 (default 20)
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub operation: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for HistoryQuery {
    fn default() -> Self {
        Self {
            operation: None,
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl HistoryQuery {
    /// Validates the paging parameters
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.page < 1 {
            return Some("page must be at least 1".to_string());
        }
        if self.page_size < 1 || self.page_size > MAX_PAGE_SIZE {
            return Some(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            ));
        }
        None
    }

    /// Operation filter, with an empty string treated as no filter.
    pub fn operation_filter(&self) -> Option<&str> {
        self.operation.as_deref().filter(|op| !op.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_query_defaults() {
        let query: HistoryQuery = serde_json::from_str("{}").unwrap();
        assert!(query.operation.is_none());
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 20);
        assert!(query.validate().is_none());
    }

    #[test]
    fn test_history_query_with_filter() {
        let json = r#"{"operation": "power", "page": 3, "page_size": 50}"#;
        let query: HistoryQuery = serde_json::from_str(json).unwrap();
        assert_eq!(query.operation_filter(), Some("power"));
        assert_eq!(query.page, 3);
        assert!(query.validate().is_none());
    }

    #[test]
    fn test_validate_rejects_bad_paging() {
        let zero_page = HistoryQuery {
            page: 0,
            ..HistoryQuery::default()
        };
        assert!(zero_page.validate().is_some());

        let huge_page = HistoryQuery {
            page_size: 101,
            ..HistoryQuery::default()
        };
        assert!(huge_page.validate().is_some());

        let empty_page = HistoryQuery {
            page_size: 0,
            ..HistoryQuery::default()
        };
        assert!(empty_page.validate().is_some());
    }

    #[test]
    fn test_empty_operation_is_no_filter() {
        let query = HistoryQuery {
            operation: Some(String::new()),
            ..HistoryQuery::default()
        };
        assert!(query.operation_filter().is_none());
    }
}
