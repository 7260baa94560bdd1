//! Grid configuration

use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;
use crate::mode::Variant;
use crate::view::SortDirection;
use crate::view::ViewState;

/// Initial sort applied when the grid is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialSort {
    /// Field of a sortable column.
    pub field: String,
    /// Direction to start with.
    #[serde(default)]
    pub direction: SortDirection,
}

/// Configuration for a grid.
///
/// Every field has a default, so options can be partially specified in JSON.
///
/// # Example
///
/// ```
/// use datagrid_lib::GridOptions;
///
/// let options = GridOptions::default()
///     .with_pagination(true)
///     .with_rows_per_page(20);
/// assert_eq!(options.effective_rows_per_page(), 20);
///
/// let options = GridOptions::from_json(r#"{ "pagination": true, "page": 2 }"#).unwrap();
/// assert_eq!(options.effective_rows_per_page(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Whether rows are split into pages.
    ///
    /// Default: `false` (a static grid shows every filtered row)
    pub pagination: bool,

    /// Page sizes offered to the user.
    ///
    /// Default: `[10, 20, 30]`
    pub rows_per_page_options: Vec<usize>,

    /// Initial page size. Falls back to the first of `rows_per_page_options`.
    pub rows_per_page: Option<usize>,

    /// Initial zero-based page.
    pub page: usize,

    /// Whether rows can be selected; adds a selection column.
    pub selection: bool,

    /// Layout variant.
    pub variant: Variant,

    /// Initial sort.
    pub initial_sort: Option<InitialSort>,

    /// Upper bound for a single remote load, in milliseconds.
    pub loader_timeout_ms: Option<u64>,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            pagination: false,
            rows_per_page_options: vec![10, 20, 30],
            rows_per_page: None,
            page: 0,
            selection: false,
            variant: Variant::Auto,
            initial_sort: None,
            loader_timeout_ms: None,
        }
    }
}

impl GridOptions {
    /// Creates options with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses options from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Enables or disables pagination.
    pub fn with_pagination(mut self, pagination: bool) -> Self {
        self.pagination = pagination;
        self
    }

    /// Sets the offered page sizes.
    pub fn with_rows_per_page_options(mut self, options: Vec<usize>) -> Self {
        self.rows_per_page_options = options;
        self
    }

    /// Sets the initial page size.
    pub fn with_rows_per_page(mut self, rows_per_page: usize) -> Self {
        self.rows_per_page = Some(rows_per_page);
        self
    }

    /// Sets the initial page.
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Enables row selection.
    pub fn with_selection(mut self, selection: bool) -> Self {
        self.selection = selection;
        self
    }

    /// Sets the layout variant.
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Sets the initial sort.
    pub fn with_initial_sort(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.initial_sort = Some(InitialSort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Sets the remote loader timeout.
    pub fn with_loader_timeout(mut self, timeout: Duration) -> Self {
        self.loader_timeout_ms = Some(timeout.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    /// Returns the remote loader timeout, if any.
    pub fn loader_timeout(&self) -> Option<Duration> {
        self.loader_timeout_ms.map(Duration::from_millis)
    }

    /// Returns the page size the grid starts with.
    pub fn effective_rows_per_page(&self) -> usize {
        self.rows_per_page
            .or_else(|| self.rows_per_page_options.first().copied())
            .unwrap_or(10)
    }

    /// Checks the options for values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rows_per_page_options.is_empty() {
            return Err(ConfigError::EmptyRowsPerPageOptions);
        }
        if self.rows_per_page_options.contains(&0) || self.rows_per_page == Some(0) {
            return Err(ConfigError::InvalidRowsPerPage);
        }
        Ok(())
    }

    /// Seeds the initial view from these options.
    pub fn initial_view(&self) -> ViewState {
        let view = ViewState::new(self.effective_rows_per_page());
        let view = match &self.initial_sort {
            Some(sort) => view.with_sort(sort.field.clone(), sort.direction),
            None => view,
        };
        view.change_page(self.page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = GridOptions::default();
        assert!(!options.pagination);
        assert_eq!(options.rows_per_page_options, vec![10, 20, 30]);
        assert_eq!(options.effective_rows_per_page(), 10);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_page_size() {
        let options = GridOptions::default().with_rows_per_page(0);
        assert!(matches!(options.validate(), Err(ConfigError::InvalidRowsPerPage)));

        let options = GridOptions::default().with_rows_per_page_options(vec![]);
        assert!(matches!(options.validate(), Err(ConfigError::EmptyRowsPerPageOptions)));
    }

    #[test]
    fn test_initial_view_uses_page_and_sort() {
        let view = GridOptions::default()
            .with_rows_per_page(5)
            .with_page(3)
            .with_initial_sort("name", SortDirection::Desc)
            .initial_view();

        assert_eq!(view.start_index(), 15);
        assert_eq!(view.sort_field(), Some("name"));
        assert_eq!(view.sort_direction(), SortDirection::Desc);
    }

    #[test]
    fn test_from_json_partial() {
        let options = GridOptions::from_json(
            r#"{ "variant": "mobile", "initial_sort": { "field": "age" }, "loader_timeout_ms": 1500 }"#,
        )
        .unwrap();

        assert_eq!(options.variant, Variant::Mobile);
        assert_eq!(options.initial_sort.as_ref().unwrap().direction, SortDirection::Asc);
        assert_eq!(options.loader_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_from_json_invalid() {
        assert!(matches!(
            GridOptions::from_json("{ not json"),
            Err(ConfigError::InvalidOptions(_))
        ));
    }
}
