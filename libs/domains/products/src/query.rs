//! Listing query parsing
//!
//! Raw query-string values are parsed into typed, always-valid values here so
//! that handlers never see malformed input: anything unusable falls back to a
//! default instead of producing an error.

use mongodb::bson::{Document, doc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
/// Upper bound for `limit`; larger requests are clamped
pub const MAX_PAGE_LIMIT: u64 = 100;
/// The server reads `skip` as a signed 64-bit integer
const MAX_SKIP: u64 = i64::MAX as u64;

/// Query string of `GET /api/products`, as received
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    /// 1-based page number (default 1)
    pub page: Option<String>,
    /// Page size (default 10, max 100)
    pub limit: Option<String>,
    /// Exact, case-sensitive category match
    pub category: Option<String>,
    /// Case-insensitive substring searched in title and description
    pub search: Option<String>,
    /// Field to sort by; prefix with `-` for descending order
    pub sort: Option<String>,
}

/// Typed listing request built from a [`ProductQuery`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListProductsQuery {
    pub page: PageRequest,
    pub filter: ProductFilter,
    pub sort: Option<SortSpec>,
}

impl ListProductsQuery {
    pub fn parse(raw: &ProductQuery) -> Self {
        Self {
            page: PageRequest::parse(raw.page.as_deref(), raw.limit.as_deref()),
            filter: ProductFilter::new(raw.category.clone(), raw.search.clone()),
            sort: raw.sort.as_deref().and_then(SortSpec::parse),
        }
    }
}

impl From<ProductQuery> for ListProductsQuery {
    fn from(raw: ProductQuery) -> Self {
        Self::parse(&raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl PageRequest {
    /// Zero values are replaced by the defaults and `limit` is clamped to
    /// [`MAX_PAGE_LIMIT`].
    pub fn new(page: u64, limit: u64) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = match limit {
            0 => DEFAULT_LIMIT,
            n => n.min(MAX_PAGE_LIMIT),
        };
        Self { page, limit }
    }

    /// Missing, blank, non-numeric, negative or zero values use the defaults.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        Self::new(
            parse_positive(page).unwrap_or(DEFAULT_PAGE),
            parse_positive(limit).unwrap_or(DEFAULT_LIMIT),
        )
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Number of documents to skip: `(page - 1) * limit`, capped at
    /// `i64::MAX` so far-out pages come back empty
    pub fn skip(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit).min(MAX_SKIP)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

fn parse_positive(raw: Option<&str>) -> Option<u64> {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn as_i32(self) -> i32 {
        match self {
            Self::Ascending => 1,
            Self::Descending => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn ascending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Ascending)
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Descending)
    }

    /// `price` sorts ascending, `-price` descending. Returns `None` when no
    /// field name is left.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        let (field, direction) = match token.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Descending),
            None => (token, SortDirection::Ascending),
        };

        if field.is_empty() {
            return None;
        }

        Some(Self::new(field, direction))
    }

    pub fn to_document(&self) -> Document {
        let mut sort = Document::new();
        sort.insert(self.field.as_str(), self.direction.as_i32());
        sort
    }
}

/// Conditions applied to both the listing and its total count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub search: Option<String>,
}

impl ProductFilter {
    /// Empty strings count as absent
    pub fn new(category: Option<String>, search: Option<String>) -> Self {
        Self {
            category: category.filter(|c| !c.is_empty()),
            search: search.filter(|s| !s.is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.search.is_none()
    }

    /// Render the MongoDB filter document.
    ///
    /// The search text is escaped, so it always matches as a literal substring.
    pub fn to_document(&self) -> Document {
        let mut filter = doc! {};

        if let Some(ref category) = self.category {
            filter.insert("category", category.as_str());
        }

        if let Some(ref search) = self.search {
            let pattern = regex::escape(search);
            filter.insert(
                "$or",
                vec![
                    doc! { "title": { "$regex": pattern.as_str(), "$options": "i" } },
                    doc! { "description": { "$regex": pattern.as_str(), "$options": "i" } },
                ],
            );
        }

        filter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ProductQuery {
        let mut raw = ProductQuery::default();
        for (key, value) in pairs {
            let value = Some(value.to_string());
            match *key {
                "page" => raw.page = value,
                "limit" => raw.limit = value,
                "category" => raw.category = value,
                "search" => raw.search = value,
                "sort" => raw.sort = value,
                other => panic!("unknown key {other}"),
            }
        }
        raw
    }

    #[test]
    fn test_defaults_when_nothing_given() {
        let parsed = ListProductsQuery::parse(&ProductQuery::default());

        assert_eq!(parsed.page.page(), 1);
        assert_eq!(parsed.page.limit(), 10);
        assert_eq!(parsed.page.skip(), 0);
        assert!(parsed.filter.is_empty());
        assert_eq!(parsed.filter.to_document(), doc! {});
        assert!(parsed.sort.is_none());
    }

    #[test]
    fn test_page_and_limit_parsed() {
        let parsed = ListProductsQuery::parse(&query(&[("page", "3"), ("limit", "20")]));

        assert_eq!(parsed.page.page(), 3);
        assert_eq!(parsed.page.limit(), 20);
        assert_eq!(parsed.page.skip(), 40);
    }

    #[test]
    fn test_invalid_page_and_limit_fall_back_to_defaults() {
        for bad in ["abc", "", "0", "-2", "1.5", "   "] {
            let page = PageRequest::parse(Some(bad), Some(bad));
            assert_eq!(page, PageRequest::default(), "input {bad:?}");
        }
    }

    #[test]
    fn test_page_values_are_trimmed() {
        let page = PageRequest::parse(Some(" 2 "), Some("5\t"));
        assert_eq!(page.page(), 2);
        assert_eq!(page.limit(), 5);
        assert_eq!(page.skip(), 5);
    }

    #[test]
    fn test_limit_is_clamped() {
        let page = PageRequest::parse(Some("2"), Some("5000"));
        assert_eq!(page.limit(), MAX_PAGE_LIMIT);
        assert_eq!(page.skip(), MAX_PAGE_LIMIT);
    }

    #[test]
    fn test_skip_fits_in_i64_for_huge_pages() {
        let page = PageRequest::new(u64::MAX, MAX_PAGE_LIMIT);
        assert_eq!(page.skip(), i64::MAX as u64);

        let page = PageRequest::parse(Some("92233720368547759"), Some("100"));
        assert!(i64::try_from(page.skip()).is_ok());
    }

    #[test]
    fn test_sort_token_parsing() {
        assert_eq!(SortSpec::parse("price"), Some(SortSpec::ascending("price")));
        assert_eq!(SortSpec::parse("-price"), Some(SortSpec::descending("price")));
        assert_eq!(SortSpec::parse("-"), None);
        assert_eq!(SortSpec::parse(""), None);
    }

    #[test]
    fn test_sort_document() {
        assert_eq!(
            SortSpec::descending("rating").to_document(),
            doc! { "rating": -1 }
        );
        assert_eq!(SortSpec::ascending("price").to_document(), doc! { "price": 1 });
    }

    #[test]
    fn test_category_filter_is_exact() {
        let filter = ProductFilter::new(Some("laptops".to_string()), None);
        assert_eq!(filter.to_document(), doc! { "category": "laptops" });
    }

    #[test]
    fn test_empty_params_are_ignored() {
        let parsed =
            ListProductsQuery::parse(&query(&[("category", ""), ("search", ""), ("sort", "")]));
        assert!(parsed.filter.is_empty());
        assert!(parsed.sort.is_none());
    }

    #[test]
    fn test_search_filter_matches_title_or_description() {
        let filter = ProductFilter::new(None, Some("phone".to_string()));

        assert_eq!(
            filter.to_document(),
            doc! {
                "$or": [
                    { "title": { "$regex": "phone", "$options": "i" } },
                    { "description": { "$regex": "phone", "$options": "i" } },
                ]
            }
        );
    }

    #[test]
    fn test_search_escapes_regex_metacharacters() {
        let filter = ProductFilter::new(None, Some("c++ (v2.0)".to_string()));
        let document = filter.to_document();

        let clauses = document.get_array("$or").unwrap();
        let title = clauses[0].as_document().unwrap().get_document("title").unwrap();
        assert_eq!(title.get_str("$regex").unwrap(), r"c\+\+ \(v2\.0\)");
    }

    #[test]
    fn test_category_and_search_combined() {
        let parsed = ListProductsQuery::parse(&query(&[
            ("category", "smartphones"),
            ("search", "pro"),
            ("sort", "-price"),
            ("page", "2"),
            ("limit", "5"),
        ]));

        let document = parsed.filter.to_document();
        assert_eq!(document.get_str("category").unwrap(), "smartphones");
        assert_eq!(document.get_array("$or").unwrap().len(), 2);
        assert_eq!(parsed.sort, Some(SortSpec::descending("price")));
        assert_eq!(parsed.page.skip(), 5);
    }
}
