//! Search input/output descriptors shared by searchable repositories.
//!
//! # Responsibility
//! - Normalize caller-supplied pagination/sort/filter input.
//! - Carry one result page plus pagination metadata.
//!
//! # Invariants
//! - `page >= 1` and `1 <= per_page <= MAX_PER_PAGE` after construction.
//! - `sort_dir` is set iff `sort` is set.
//! - Malformed input is coerced to defaults, never rejected.
//! - `SearchResult::last_page() >= 1`, even when `total == 0`.

use serde::Serialize;
use std::fmt::Debug;
use std::ops::Range;

/// Page used when input is absent or malformed.
pub const DEFAULT_PAGE: u32 = 1;
/// Page size used when input is absent or malformed.
pub const DEFAULT_PER_PAGE: u32 = 15;
/// Upper bound for page size.
pub const MAX_PER_PAGE: u32 = 100;

/// Sort direction for searchable fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Parses `asc`/`desc` case-insensitively, falling back to `Asc`.
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "desc" => Self::Desc,
            _ => Self::Asc,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Case folding shared by every name filter: in-memory matching and the
/// SQLite `name_search` columns both go through this.
pub(crate) fn fold_name(name: &str) -> String {
    name.to_lowercase()
}

/// Entity-specific filter criterion.
pub trait SearchFilter: Clone + Debug {
    /// Blank filters are dropped during normalization.
    fn is_blank(&self) -> bool;
}

impl SearchFilter for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

/// Raw, query-string shaped search input.
///
/// Numeric fields are kept as text so that non-numeric input can be coerced
/// instead of rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParamsInput<F> {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub filter: Option<F>,
}

impl<F> Default for SearchParamsInput<F> {
    fn default() -> Self {
        Self {
            page: None,
            per_page: None,
            sort: None,
            sort_dir: None,
            filter: None,
        }
    }
}

/// Normalized search parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams<F> {
    page: u32,
    per_page: u32,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<F>,
}

impl<F> Default for SearchParams<F> {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            per_page: DEFAULT_PER_PAGE,
            sort: None,
            sort_dir: None,
            filter: None,
        }
    }
}

impl<F: SearchFilter> SearchParams<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds normalized parameters from raw input.
    pub fn from_input(input: SearchParamsInput<F>) -> Self {
        let page = input
            .page
            .as_deref()
            .and_then(parse_number)
            .map_or(DEFAULT_PAGE, normalize_page);
        let per_page = input
            .per_page
            .as_deref()
            .and_then(parse_number)
            .map_or(DEFAULT_PER_PAGE, normalize_per_page);

        let mut params = Self {
            page,
            per_page,
            ..Self::default()
        };
        params.set_sort(input.sort, input.sort_dir.as_deref().map(SortDirection::parse_lenient));
        params.set_filter(input.filter);
        params
    }

    pub fn with_page(mut self, page: i64) -> Self {
        self.page = normalize_page(page as f64);
        self
    }

    pub fn with_per_page(mut self, per_page: i64) -> Self {
        self.per_page = normalize_per_page(per_page as f64);
        self
    }

    /// Sets the sort field; direction defaults to `Asc` when absent.
    pub fn with_sort(mut self, sort: impl Into<String>, sort_dir: Option<SortDirection>) -> Self {
        self.set_sort(Some(sort.into()), sort_dir);
        self
    }

    pub fn with_filter(mut self, filter: F) -> Self {
        self.set_filter(Some(filter));
        self
    }

    fn set_sort(&mut self, sort: Option<String>, sort_dir: Option<SortDirection>) {
        self.sort = sort.filter(|value| !value.trim().is_empty());
        self.sort_dir = self
            .sort
            .as_ref()
            .map(|_| sort_dir.unwrap_or(SortDirection::Asc));
    }

    fn set_filter(&mut self, filter: Option<F>) {
        self.filter = filter.filter(|value| !value.is_blank());
    }
}

impl<F> SearchParams<F> {
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }

    /// Number of matching rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }

    /// Index window of this page over a sequence of `len` items.
    ///
    /// Pages past the end yield an empty window.
    pub(crate) fn window(&self, len: usize) -> Range<usize> {
        let start = usize::try_from(self.offset()).unwrap_or(usize::MAX).min(len);
        let end = start.saturating_add(self.per_page as usize).min(len);
        start..end
    }
}

/// One page of search results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult<E> {
    items: Vec<E>,
    total: u64,
    current_page: u32,
    per_page: u32,
    last_page: u32,
}

impl<E> SearchResult<E> {
    pub fn new(items: Vec<E>, total: u64, current_page: u32, per_page: u32) -> Self {
        let per_page = per_page.max(1);
        let last_page = total.div_ceil(u64::from(per_page)).max(1);
        Self {
            items,
            total,
            current_page,
            per_page,
            last_page: u32::try_from(last_page).unwrap_or(u32::MAX),
        }
    }

    pub fn items(&self) -> &[E] {
        &self.items
    }

    pub fn into_items(self) -> Vec<E> {
        self.items
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn last_page(&self) -> u32 {
        self.last_page
    }

    /// Converts items while keeping pagination metadata.
    pub fn map_items<T>(self, f: impl FnMut(E) -> T) -> SearchResult<T> {
        SearchResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            current_page: self.current_page,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }
}

fn parse_number(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok()
}

fn normalize_page(value: f64) -> u32 {
    normalize_positive_integer(value).unwrap_or(DEFAULT_PAGE)
}

fn normalize_per_page(value: f64) -> u32 {
    normalize_positive_integer(value)
        .map_or(DEFAULT_PER_PAGE, |value| value.min(MAX_PER_PAGE))
}

fn normalize_positive_integer(value: f64) -> Option<u32> {
    if !value.is_finite() || value <= 0.0 || value.fract() != 0.0 {
        return None;
    }
    if value >= f64::from(u32::MAX) {
        return Some(u32::MAX);
    }
    Some(value as u32)
}

#[cfg(test)]
mod tests {
    use super::{
        SearchParams, SearchParamsInput, SearchResult, SortDirection, DEFAULT_PER_PAGE,
        MAX_PER_PAGE,
    };

    fn raw(page: Option<&str>, per_page: Option<&str>) -> SearchParamsInput<String> {
        SearchParamsInput {
            page: page.map(str::to_string),
            per_page: per_page.map(str::to_string),
            ..SearchParamsInput::default()
        }
    }

    #[test]
    fn defaults_apply_without_input() {
        let params = SearchParams::<String>::from_input(SearchParamsInput::default());
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE);
        assert_eq!(params.sort(), None);
        assert_eq!(params.sort_dir(), None);
        assert_eq!(params.filter(), None);
    }

    #[test]
    fn malformed_page_falls_back_to_first_page() {
        for value in ["", "fake", "0", "-1", "5.5", "NaN", "inf", "true"] {
            let params = SearchParams::<String>::from_input(raw(Some(value), None));
            assert_eq!(params.page(), 1, "page input `{value}`");
        }
        let params = SearchParams::<String>::from_input(raw(Some(" 2 "), None));
        assert_eq!(params.page(), 2);
    }

    #[test]
    fn malformed_per_page_falls_back_to_default() {
        for value in ["", "fake", "0", "-1", "5.5", "-inf"] {
            let params = SearchParams::<String>::from_input(raw(None, Some(value)));
            assert_eq!(params.per_page(), DEFAULT_PER_PAGE, "per_page input `{value}`");
        }
        let params = SearchParams::<String>::from_input(raw(None, Some("10")));
        assert_eq!(params.per_page(), 10);
    }

    #[test]
    fn typed_setters_apply_same_rules() {
        let params = SearchParams::<String>::new().with_page(-3).with_per_page(0);
        assert_eq!(params.page(), 1);
        assert_eq!(params.per_page(), DEFAULT_PER_PAGE);

        let params = SearchParams::<String>::new().with_per_page(10_000);
        assert_eq!(params.per_page(), MAX_PER_PAGE);
    }

    #[test]
    fn sort_dir_is_only_set_with_sort() {
        let input = SearchParamsInput::<String> {
            sort_dir: Some("desc".to_string()),
            ..SearchParamsInput::default()
        };
        assert_eq!(SearchParams::from_input(input).sort_dir(), None);

        let input = SearchParamsInput::<String> {
            sort: Some("name".to_string()),
            sort_dir: Some("DESC".to_string()),
            ..SearchParamsInput::default()
        };
        assert_eq!(
            SearchParams::from_input(input).sort_dir(),
            Some(SortDirection::Desc)
        );

        let input = SearchParamsInput::<String> {
            sort: Some("name".to_string()),
            sort_dir: Some("sideways".to_string()),
            ..SearchParamsInput::default()
        };
        assert_eq!(
            SearchParams::from_input(input).sort_dir(),
            Some(SortDirection::Asc)
        );

        let params = SearchParams::<String>::new().with_sort("", Some(SortDirection::Desc));
        assert_eq!(params.sort(), None);
        assert_eq!(params.sort_dir(), None);
    }

    #[test]
    fn empty_filter_is_dropped() {
        let params = SearchParams::new().with_filter(String::new());
        assert_eq!(params.filter(), None);
        let params = SearchParams::new().with_filter("act".to_string());
        assert_eq!(params.filter().map(String::as_str), Some("act"));
    }

    #[test]
    fn window_clamps_to_sequence_length() {
        let params = SearchParams::<String>::new().with_page(2).with_per_page(15);
        assert_eq!(params.window(20), 15..20);
        let params = SearchParams::<String>::new().with_page(3).with_per_page(15);
        assert_eq!(params.window(20), 20..20);
    }

    #[test]
    fn last_page_is_at_least_one() {
        let empty = SearchResult::<u8>::new(Vec::new(), 0, 1, 15);
        assert_eq!(empty.last_page(), 1);

        let result = SearchResult::new(vec![1, 2], 31, 3, 15);
        assert_eq!(result.last_page(), 3);
        assert_eq!(result.map_items(|value| value * 10).items(), [10, 20]);
    }
}
