//! Table query builder and pipeline.
//!
//! A [`TableQuery`] bundles everything a data table asks of its rows and
//! runs the stages in a fixed order:
//!
//! ```text
//! search → quick filters → filter groups → sort → paginate
//! ```
//!
//! [`TableQuery::select`] stops before pagination (the export path);
//! [`TableQuery::run`] returns one page.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::condition::ConditionEvaluator;
use crate::error::Result;
use crate::filter::{active_quick_filters, apply_filters, apply_quick_filters, FilterGroup};
use crate::ordering::{apply_multi_sorting, apply_sorting, Dir, MultiSortSpec, SortSpec};
use crate::pagination::{apply_pagination, PageRequest, PaginationResult};
use crate::search::apply_search;
use crate::traits::Record;

/// Sorting applied by a [`TableQuery`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sorting {
    /// Keep input order.
    #[default]
    Unsorted,
    /// Sort by one key.
    Single(SortSpec),
    /// Sort by several keys in priority order.
    Multi(MultiSortSpec),
}

/// The full state of a data table query.
///
/// # Example
///
/// ```
/// use serde_json::json;
/// use tableseek::{ConditionEvaluator, FieldKind, FilterCondition, FilterGroup, Operator, TableQuery};
///
/// let rows = vec![
///     json!({"title": "Fix water leak", "status": "pending", "latitude": 40.71}),
///     json!({"title": "Electrical repair", "status": "in_progress", "latitude": 40.76}),
///     json!({"title": "HVAC maintenance", "status": "completed", "latitude": 40.75}),
/// ];
///
/// let north = FilterCondition::new("latitude", Operator::Gt, json!(40.72)).with_kind(FieldKind::Number);
/// let query = TableQuery::new()
///     .group(FilterGroup::all().with(north))
///     .sort_desc("latitude")
///     .page_size(1)
///     .build();
///
/// let page = query.run(&rows, &ConditionEvaluator::default());
/// assert_eq!(page.data[0]["title"], "Electrical repair");
/// assert_eq!(page.pagination.total_items, 2);
/// assert!(page.pagination.has_next_page);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableQuery {
    search_term: String,
    search_fields: Vec<String>,
    quick_filters: BTreeMap<String, String>,
    filter_groups: Vec<FilterGroup>,
    sort: Sorting,
    page: PageRequest,
}

impl TableQuery {
    /// Creates a query that keeps every row, unsorted, on page 1.
    pub fn new() -> Self {
        TableQuery::default()
    }

    /// Parses query state from JSON.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses query state from YAML.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serializes query state to JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    // ========================================================================
    // Search
    // ========================================================================

    /// Sets the free-text search term.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    /// Sets the field paths the search term is matched against.
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    // ========================================================================
    // Filters
    // ========================================================================

    /// Sets a quick filter. A value of `""` or `"all"` disables it.
    pub fn quick_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.quick_filters.insert(field.into(), value.into());
        self
    }

    /// Adds a filter group. Groups combine with OR.
    pub fn group(mut self, group: FilterGroup) -> Self {
        self.filter_groups.push(group);
        self
    }

    /// Adds several filter groups.
    pub fn groups(mut self, groups: impl IntoIterator<Item = FilterGroup>) -> Self {
        self.filter_groups.extend(groups);
        self
    }

    // ========================================================================
    // Sorting
    // ========================================================================

    /// Replaces the sorting.
    pub fn sorting(mut self, sorting: Sorting) -> Self {
        self.sort = sorting;
        self
    }

    /// Sorts by a single key.
    pub fn sort_by(self, spec: SortSpec) -> Self {
        self.sorting(Sorting::Single(spec))
    }

    /// Sorts ascending by one field.
    pub fn sort_asc(self, field: impl Into<String>) -> Self {
        self.sort_by(SortSpec::asc(field))
    }

    /// Sorts descending by one field.
    pub fn sort_desc(self, field: impl Into<String>) -> Self {
        self.sort_by(SortSpec::desc(field))
    }

    /// Sorts by several keys.
    pub fn multi_sort(self, spec: MultiSortSpec) -> Self {
        self.sorting(Sorting::Multi(spec))
    }

    /// Adds a sort key ranked after the existing ones.
    ///
    /// A single-key sort becomes a multi-key sort with that key first.
    pub fn then_by(mut self, field: impl Into<String>, order: Dir) -> Self {
        let spec = match std::mem::take(&mut self.sort) {
            Sorting::Unsorted => MultiSortSpec::new(),
            Sorting::Single(spec) if spec.is_active() => MultiSortSpec::from(spec),
            Sorting::Single(_) => MultiSortSpec::new(),
            Sorting::Multi(spec) => spec,
        };
        self.multi_sort(spec.then_by(field, order))
    }

    // ========================================================================
    // Paging
    // ========================================================================

    /// Sets the 1-based page number.
    pub fn page(mut self, page: usize) -> Self {
        self.page.page = page;
        self
    }

    /// Sets the page size.
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page.page_size = page_size;
        self
    }

    /// Replaces the page request.
    pub fn paginate(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }

    // ========================================================================
    // Build
    // ========================================================================

    /// Finalizes the query.
    pub fn build(self) -> Self {
        self
    }

    // ========================================================================
    // Introspection
    // ========================================================================

    /// Returns the free-text search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Returns the field paths the search term is matched against.
    pub fn fields_searched(&self) -> &[String] {
        &self.search_fields
    }

    /// Returns the quick filters, keyed by field path.
    pub fn quick_filters(&self) -> &BTreeMap<String, String> {
        &self.quick_filters
    }

    /// Returns the filter groups, in display order.
    pub fn filter_groups(&self) -> &[FilterGroup] {
        &self.filter_groups
    }

    /// Returns the sorting, if any.
    pub fn sort(&self) -> &Sorting {
        &self.sort
    }

    /// Returns the requested page and page size.
    pub fn page_request(&self) -> PageRequest {
        self.page
    }

    /// Returns `true` if this query narrows nothing: no search term, no
    /// active quick filter and no filter group. Sorting and paging are
    /// not considered.
    pub fn is_empty(&self) -> bool {
        self.search_term.trim().is_empty()
            && active_quick_filters(&self.quick_filters).next().is_none()
            && self.filter_groups.is_empty()
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Returns the searched, filtered and sorted rows, without paginating.
    pub fn select<'a, R, I>(&self, data: I, evaluator: &ConditionEvaluator<'_>) -> Vec<&'a R>
    where
        I: IntoIterator<Item = &'a R>,
        R: Record + ?Sized + 'a,
    {
        let rows = self.narrow(data, evaluator);
        match &self.sort {
            Sorting::Unsorted => rows,
            Sorting::Single(spec) => apply_sorting(rows, spec),
            Sorting::Multi(spec) => apply_multi_sorting(rows, spec),
        }
    }

    /// Runs the full pipeline and returns the requested page.
    pub fn run<'a, R, I>(&self, data: I, evaluator: &ConditionEvaluator<'_>) -> PaginationResult<&'a R>
    where
        I: IntoIterator<Item = &'a R>,
        R: Record + ?Sized + 'a,
    {
        let rows = self.select(data, evaluator);
        let result = apply_pagination(&rows, self.page.page, self.page.page_size);
        tracing::trace!(
            stage = "paginate",
            page = result.pagination.current_page,
            rows = result.data.len(),
            total = result.pagination.total_items,
            "query stage"
        );
        result
    }

    /// Counts the rows the query selects across all pages.
    pub fn count<'a, R, I>(&self, data: I, evaluator: &ConditionEvaluator<'_>) -> usize
    where
        I: IntoIterator<Item = &'a R>,
        R: Record + ?Sized + 'a,
    {
        self.narrow(data, evaluator).len()
    }

    // Search, quick filters, then filter groups. Order of `data` is kept.
    fn narrow<'a, R, I>(&self, data: I, evaluator: &ConditionEvaluator<'_>) -> Vec<&'a R>
    where
        I: IntoIterator<Item = &'a R>,
        R: Record + ?Sized + 'a,
    {
        let rows = apply_search(data, &self.search_term, &self.search_fields);
        tracing::trace!(stage = "search", rows = rows.len(), "query stage");

        let rows = apply_quick_filters(rows, &self.quick_filters);
        tracing::trace!(stage = "quick_filters", rows = rows.len(), "query stage");

        let rows = apply_filters(rows, &self.filter_groups, evaluator);
        tracing::trace!(stage = "filters", rows = rows.len(), "query stage");

        rows
    }
}
