//! The immutable view state and its transitions.

use std::collections::BTreeMap;
use std::ops::Range;

use serde::Serialize;

use super::ColumnFilter;
use super::Filter;
use super::SortDirection;

/// Snapshot of the pagination, filter and sort parameters of a grid.
///
/// A `ViewState` is never mutated in place. Every transition returns a new
/// value, so a fetch issued for an older snapshot can be recognised as stale
/// by plain equality.
///
/// The window invariant `stop_index - start_index + 1 == rows_per_page` holds
/// for every value this type hands out, and `start_index` is always
/// `page * rows_per_page`.
///
/// # Example
///
/// ```
/// use datagrid_lib::view::ViewState;
///
/// let view = ViewState::new(10).change_page(2);
/// assert_eq!(view.start_index(), 20);
/// assert_eq!(view.stop_index(), 29);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    page: usize,
    rows_per_page: usize,
    start_index: usize,
    stop_index: usize,
    sort_field: Option<String>,
    sort_direction: SortDirection,
    column_filters: BTreeMap<String, ColumnFilter>,
    advanced_filters: Option<Filter>,
}

impl ViewState {
    /// Creates the first page of a view with the given page size.
    ///
    /// A page size of zero is raised to one.
    pub fn new(rows_per_page: usize) -> Self {
        Self {
            page: 0,
            rows_per_page: rows_per_page.max(1),
            start_index: 0,
            stop_index: 0,
            sort_field: None,
            sort_direction: SortDirection::Asc,
            column_filters: BTreeMap::new(),
            advanced_filters: None,
        }
        .at_page(0)
    }

    /// Sets the initial sort, builder style.
    pub fn with_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_field = Some(field.into());
        self.sort_direction = direction;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the zero-based page number.
    pub fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    pub fn rows_per_page(&self) -> usize {
        self.rows_per_page
    }

    /// Returns the index of the first row in the window.
    pub fn start_index(&self) -> usize {
        self.start_index
    }

    /// Returns the index of the last row in the window (inclusive).
    pub fn stop_index(&self) -> usize {
        self.stop_index
    }

    /// Returns the window as a half-open range.
    pub fn window(&self) -> Range<usize> {
        self.start_index..self.stop_index.saturating_add(1)
    }

    /// Returns the sort field, if any.
    pub fn sort_field(&self) -> Option<&str> {
        self.sort_field.as_deref()
    }

    /// Returns the sort direction.
    pub fn sort_direction(&self) -> SortDirection {
        self.sort_direction
    }

    /// Returns the per-column filters, keyed by field.
    pub fn column_filters(&self) -> &BTreeMap<String, ColumnFilter> {
        &self.column_filters
    }

    /// Returns the advanced filter tree, if any.
    pub fn advanced_filters(&self) -> Option<&Filter> {
        self.advanced_filters.as_ref()
    }

    /// Returns `true` if no column or advanced filter is active.
    pub fn is_unfiltered(&self) -> bool {
        self.column_filters.is_empty() && self.advanced_filters.is_none()
    }

    /// Returns `true` if this view asks for every row at once.
    pub fn is_unbounded(&self) -> bool {
        self.rows_per_page == usize::MAX
    }

    // =========================================================================
    // Transitions
    // =========================================================================

    /// Moves the window to `page`.
    pub fn change_page(&self, page: usize) -> Self {
        self.clone().at_page(page)
    }

    /// Changes the page size and returns to the first page.
    pub fn change_rows_per_page(&self, rows_per_page: usize) -> Self {
        let mut next = self.clone();
        next.rows_per_page = rows_per_page.max(1);
        next.reset()
    }

    /// Sorts by `field`; sorting by the current field again flips the direction.
    pub fn change_sort(&self, field: &str) -> Self {
        let mut next = self.clone();
        if next.sort_field.as_deref() == Some(field) {
            next.sort_direction = next.sort_direction.toggled();
        } else {
            next.sort_field = Some(field.to_string());
            next.sort_direction = SortDirection::Asc;
        }
        next.reset()
    }

    /// Sets or clears the filter of one column.
    ///
    /// `None` and empty filters remove the entry.
    pub fn change_column_filter(&self, field: &str, filter: Option<ColumnFilter>) -> Self {
        let mut next = self.clone();
        match filter.filter(|f| !f.is_empty()) {
            Some(filter) => {
                next.column_filters.insert(field.to_string(), filter);
            }
            None => {
                next.column_filters.remove(field);
            }
        }
        next.reset()
    }

    /// Replaces the advanced filter tree.
    pub fn apply_advanced_filters(&self, filters: Option<Filter>) -> Self {
        let mut next = self.clone();
        next.advanced_filters = filters;
        next.reset()
    }

    /// The same view without paging, for exporting every filtered row.
    pub fn unbounded(&self) -> Self {
        let mut next = self.clone();
        next.rows_per_page = usize::MAX;
        next.reset()
    }

    // Shared post-transition step for everything that changes which rows
    // qualify: the window goes back to the first page.
    fn reset(self) -> Self {
        self.at_page(0)
    }

    fn at_page(mut self, page: usize) -> Self {
        self.page = page;
        self.start_index = page.saturating_mul(self.rows_per_page);
        self.stop_index = self.start_index.saturating_add(self.rows_per_page - 1);
        self
    }
}

/// Pagination summary for footer widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Zero-based current page.
    pub page: usize,
    /// Number of pages needed for `total_count` rows.
    pub page_count: usize,
    /// One-based index of the first row on the page, `0` when empty.
    pub from: usize,
    /// One-based index of the last row on the page.
    pub to: usize,
    /// Total number of rows.
    pub total_count: usize,
}

impl PageInfo {
    /// Summarises `view` against a row count.
    pub fn new(view: &ViewState, total_count: usize) -> Self {
        let page_count = total_count.div_ceil(view.rows_per_page());
        let (from, to) = if total_count == 0 || view.start_index() >= total_count {
            (0, 0)
        } else {
            (
                view.start_index() + 1,
                view.stop_index().saturating_add(1).min(total_count),
            )
        };
        Self {
            page: view.page(),
            page_count,
            from,
            to,
            total_count,
        }
    }

    /// Returns `true` if a later page exists.
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.page_count
    }

    /// Returns `true` if an earlier page exists.
    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    /// Zero-based inclusive bounds of the rows actually on this page.
    ///
    /// Unlike [`ViewState::stop_index`], the upper bound is clamped to the row
    /// count. `None` when the page is empty.
    pub fn visible_bounds(&self) -> Option<(usize, usize)> {
        (self.from > 0).then(|| (self.from - 1, self.to - 1))
    }
}
