//! Paging configuration loaded from YAML or JSON.
//!
//! ```yaml
//! default_page_size: 50
//! page_size_options: [25, 50, 100]
//! ```
//!
//! Missing keys take the built-in defaults ([`DEFAULT_PAGE_SIZE`] and
//! [`PAGE_SIZE_OPTIONS`]).

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};
use crate::pagination::{PageRequest, DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};

/// Page sizes a table offers and the one it starts with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Page size a new table starts with.
    pub default_page_size: usize,
    /// Page sizes offered to the user, in display order.
    pub page_size_options: Vec<usize>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        QueryConfig {
            default_page_size: DEFAULT_PAGE_SIZE,
            page_size_options: PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

impl QueryConfig {
    /// Parses and validates a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: QueryConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: QueryConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every size is positive and at least one option exists.
    pub fn validate(&self) -> Result<()> {
        if self.page_size_options.is_empty() {
            return Err(QueryError::EmptyPageSizeOptions);
        }
        std::iter::once(&self.default_page_size)
            .chain(&self.page_size_options)
            .find(|size| **size == 0)
            .map_or(Ok(()), |&size| Err(QueryError::InvalidPageSize { size }))
    }

    /// Builds a request for `page` at the default size.
    pub fn page_request(&self, page: usize) -> PageRequest {
        PageRequest::new(page, self.default_page_size)
    }

    /// Returns `requested` if it is one of the options, else the default.
    pub fn normalize_page_size(&self, requested: usize) -> usize {
        if self.page_size_options.contains(&requested) {
            requested
        } else {
            self.default_page_size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = QueryConfig::default();
        assert_eq!(config.default_page_size, 20);
        assert_eq!(config.page_size_options, [10, 20, 50, 100]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn yaml_overrides_and_fills_defaults() {
        let config = QueryConfig::from_yaml_str("default_page_size: 50\n").unwrap();
        assert_eq!(config.default_page_size, 50);
        assert_eq!(config.page_size_options, PAGE_SIZE_OPTIONS);
    }

    #[test]
    fn json_loads() {
        let config =
            QueryConfig::from_json_str(r#"{"default_page_size": 25, "page_size_options": [25, 75]}"#)
                .unwrap();
        assert_eq!(config.page_size_options, [25, 75]);
    }

    #[test]
    fn zero_sizes_are_rejected() {
        let err = QueryConfig::from_yaml_str("default_page_size: 0\n").unwrap_err();
        assert!(matches!(err, QueryError::InvalidPageSize { size: 0 }));

        let err = QueryConfig::from_yaml_str("page_size_options: [10, 0]\n").unwrap_err();
        assert!(matches!(err, QueryError::InvalidPageSize { size: 0 }));
    }

    #[test]
    fn empty_options_are_rejected() {
        let err = QueryConfig::from_json_str(r#"{"page_size_options": []}"#).unwrap_err();
        assert!(matches!(err, QueryError::EmptyPageSizeOptions));
    }

    #[test]
    fn malformed_input_reports_format() {
        assert!(matches!(
            QueryConfig::from_yaml_str("default_page_size: [").unwrap_err(),
            QueryError::Yaml(_)
        ));
        assert!(matches!(
            QueryConfig::from_json_str("{").unwrap_err(),
            QueryError::Json(_)
        ));
    }

    #[test]
    fn page_request_uses_default_size() {
        let config = QueryConfig::default();
        assert_eq!(config.page_request(3), PageRequest::new(3, 20));
    }

    #[test]
    fn normalize_page_size() {
        let config = QueryConfig::default();
        assert_eq!(config.normalize_page_size(50), 50);
        assert_eq!(config.normalize_page_size(7), 20);
        assert_eq!(config.normalize_page_size(0), 20);
    }
}
