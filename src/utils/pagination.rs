use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::utils::errors::AppError;

pub fn deserialize_optional_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<i64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

pub fn deserialize_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    Ok(s.filter(|s| !s.trim().is_empty()))
}

/// Page/PageSize query parameters. Both default when absent or empty; values
/// that are present but not positive are rejected at the boundary.
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PageRequest {
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_i64")]
    pub page_size: Option<i64>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: Some(1),
            page_size: Some(10),
        }
    }
}

/// A validated pagination window.
#[derive(Debug, Clone, Copy)]
pub struct PageWindow {
    pub page: i64,
    pub page_size: i64,
}

impl PageWindow {
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.page_size
    }
}

impl PageRequest {
    pub fn window(&self) -> Result<PageWindow, AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(10);

        if page < 1 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Page must be greater than or equal to 1"
            )));
        }
        if page_size < 1 {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "PageSize must be greater than or equal to 1"
            )));
        }

        Ok(PageWindow { page, page_size })
    }
}

/// Pagination envelope fields shared by every list response.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct PageMeta {
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl PageMeta {
    pub fn new(total_count: i64, window: &PageWindow) -> Self {
        let total_pages = if total_count == 0 {
            0
        } else {
            (total_count + window.page_size - 1) / window.page_size
        };

        Self {
            total_count,
            page: window.page,
            page_size: window.page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_defaults() {
        let params = PageRequest {
            page: None,
            page_size: None,
        };
        let window = params.window().unwrap();
        assert_eq!(window.page, 1);
        assert_eq!(window.page_size, 10);
        assert_eq!(window.offset(), 0);
    }

    #[test]
    fn window_offset_math() {
        let params = PageRequest {
            page: Some(3),
            page_size: Some(25),
        };
        let window = params.window().unwrap();
        assert_eq!(window.offset(), 50);
    }

    #[test]
    fn window_rejects_zero_page() {
        let params = PageRequest {
            page: Some(0),
            page_size: Some(10),
        };
        assert!(params.window().is_err());
    }

    #[test]
    fn window_rejects_negative_page_size() {
        let params = PageRequest {
            page: Some(1),
            page_size: Some(-5),
        };
        assert!(params.window().is_err());
    }

    #[test]
    fn meta_total_pages_rounds_up() {
        let window = PageWindow {
            page: 1,
            page_size: 10,
        };
        assert_eq!(PageMeta::new(0, &window).total_pages, 0);
        assert_eq!(PageMeta::new(1, &window).total_pages, 1);
        assert_eq!(PageMeta::new(10, &window).total_pages, 1);
        assert_eq!(PageMeta::new(11, &window).total_pages, 2);
        assert_eq!(PageMeta::new(101, &window).total_pages, 11);
    }

    #[test]
    fn meta_serializes_pascal_case() {
        let window = PageWindow {
            page: 2,
            page_size: 20,
        };
        let meta = PageMeta::new(45, &window);
        let serialized = serde_json::to_string(&meta).unwrap();
        assert!(serialized.contains(r#""TotalCount":45"#));
        assert!(serialized.contains(r#""Page":2"#));
        assert!(serialized.contains(r#""PageSize":20"#));
        assert!(serialized.contains(r#""TotalPages":3"#));
    }

    #[test]
    fn page_request_deserialize_empty_strings() {
        let params: PageRequest =
            serde_json::from_str(r#"{"Page":"","PageSize":""}"#).unwrap();
        assert!(params.page.is_none());
        assert!(params.page_size.is_none());
    }

    #[test]
    fn page_request_deserialize_values() {
        let params: PageRequest =
            serde_json::from_str(r#"{"Page":"4","PageSize":"50"}"#).unwrap();
        assert_eq!(params.page, Some(4));
        assert_eq!(params.page_size, Some(50));
    }
}
