//! # Query Parameter Parser
//!
//! Turns raw query-string parameters into bounded store queries.
//!
//! Lenient on pagination: a bad `page` or `limit` falls back to its default
//! instead of failing the request. The page size is always capped at
//! [`MAX_LIMIT`].

use std::collections::HashMap;

use serde_json::{json, Number, Value};

use crate::store::product::normalize_category;
use crate::store::{FilterExpr, FilterSet, SortOrder, TextSearch};

use super::errors::{ApiError, ApiResult};

/// Maximum number of records a list page can hold
pub const MAX_LIMIT: usize = 100;

/// Default page size if not specified
pub const DEFAULT_LIMIT: usize = 10;

/// First page; also the floor for any requested page
pub const DEFAULT_PAGE: usize = 1;

/// Maximum number of records a search returns
pub const SEARCH_LIMIT: usize = 50;

/// Minimum trimmed length of a search query
pub const SEARCH_MIN_LEN: usize = 2;

/// A parsed list query
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: FilterSet,
    pub page: usize,
    pub limit: usize,
    pub sort: SortOrder,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filter: FilterSet::new(),
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort: SortOrder::CreatedAtDesc,
        }
    }
}

impl ListQuery {
    /// Parse list parameters: `category`, `inStock`, `minPrice`, `maxPrice`,
    /// `page` and `limit`. Anything else is ignored.
    pub fn from_params(params: &HashMap<String, String>) -> ApiResult<Self> {
        let param = |name: &str| params.get(name).map(String::as_str);

        let category = param("category")
            .filter(|c| !c.trim().is_empty())
            .map(|c| FilterExpr::eq("category", Value::String(normalize_category(c))));
        let in_stock = param("inStock").map(|v| FilterExpr::eq("inStock", Value::Bool(v == "true")));
        let min_price = parse_price_bound("minPrice", param("minPrice"))?
            .map(|min| FilterExpr::gte("price", min));
        let max_price = parse_price_bound("maxPrice", param("maxPrice"))?
            .map(|max| FilterExpr::lte("price", max));

        let filter = [category, in_stock, min_price, max_price]
            .into_iter()
            .flatten()
            .collect();

        Ok(Self {
            filter,
            page: parse_page(param("page")),
            limit: parse_limit(param("limit")),
            sort: SortOrder::CreatedAtDesc,
        })
    }

    /// Number of records to skip
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Parse the search parameter `q`
pub fn parse_search(q: Option<&str>) -> ApiResult<TextSearch> {
    match q {
        Some(q) if q.trim().chars().count() >= SEARCH_MIN_LEN => Ok(TextSearch::new(q)),
        _ => Err(ApiError::bad_request(format!(
            "Query parameter \"q\" must be at least {} characters",
            SEARCH_MIN_LEN
        ))
        .with_details(json!({ "param": "q" }))),
    }
}

/// Parse page parameter; anything but a positive integer means page 1
fn parse_page(value: Option<&str>) -> usize {
    parse_positive(value).unwrap_or(DEFAULT_PAGE)
}

/// Parse limit parameter, falling back to the default and capping at the max
fn parse_limit(value: Option<&str>) -> usize {
    parse_positive(value).unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
}

fn parse_positive(value: Option<&str>) -> Option<usize> {
    let n: i64 = value?.trim().parse().ok()?;
    if n < 1 {
        return None;
    }
    usize::try_from(n).ok()
}

/// Parse a price bound; an empty value is treated as absent
fn parse_price_bound(name: &str, value: Option<&str>) -> ApiResult<Option<Value>> {
    let Some(raw) = value.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };

    raw.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(|n| Some(Value::Number(n)))
        .ok_or_else(|| {
            ApiError::bad_request(format!("Query parameter \"{}\" must be a number", name))
                .with_details(json!({ "param": name }))
        })
}
