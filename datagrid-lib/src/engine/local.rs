//! Local filter and sort pipeline for static sources.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use log::trace;

use crate::column::Column;
use crate::model::GridRow;
use crate::model::Value;
use crate::view::ColumnFilter;
use crate::view::Filter;
use crate::view::ViewState;

/// Grid-wide comparator, called with both rows and the sort field.
pub type SortFunc<R> = Arc<dyn Fn(&R, &R, &str) -> Ordering + Send + Sync>;

/// Named predicate for [`Filter::Custom`], called with the row and the filter
/// argument.
pub type Predicate<R> = Arc<dyn Fn(&R, &Value) -> bool + Send + Sync>;

/// Filters and sorts a static collection the way a remote loader would.
pub struct LocalPipeline<R> {
    columns: Arc<Vec<Column<R>>>,
    sort_func: Option<SortFunc<R>>,
    predicates: HashMap<String, Predicate<R>>,
}

impl<R> LocalPipeline<R> {
    /// Creates a pipeline over normalized columns.
    pub fn new(columns: Arc<Vec<Column<R>>>) -> Self {
        Self {
            columns,
            sort_func: None,
            predicates: HashMap::new(),
        }
    }

    /// Uses `sort_func` for columns without a comparator of their own.
    pub fn with_sort_func(mut self, sort_func: SortFunc<R>) -> Self {
        self.sort_func = Some(sort_func);
        self
    }

    /// Registers a predicate for [`Filter::Custom`].
    pub fn with_predicate(mut self, name: impl Into<String>, predicate: Predicate<R>) -> Self {
        self.predicates.insert(name.into(), predicate);
        self
    }

    /// Returns the columns this pipeline renders and sorts with.
    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Returns the custom predicate names in `filter` that are not registered.
    pub fn unknown_predicates<'a>(&self, filter: &'a Filter) -> Vec<&'a str> {
        filter
            .custom_names()
            .into_iter()
            .filter(|name| !self.predicates.contains_key(*name))
            .collect()
    }

    fn column(&self, field: &str) -> Option<&Column<R>> {
        self.columns.iter().find(|c| c.field == field)
    }
}

impl<R: GridRow> LocalPipeline<R> {
    /// Indices of the rows matching `view`, in display order.
    ///
    /// The window of `view` is ignored; slicing is up to the caller.
    pub fn query(&self, rows: &[R], view: &ViewState) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..rows.len())
            .filter(|&i| self.matches(&rows[i], view))
            .collect();
        self.order(rows, &mut indices, view);

        trace!(
            "Local query kept {} of {} rows (sort: {:?})",
            indices.len(),
            rows.len(),
            view.sort_field()
        );
        indices
    }

    /// Filtered and sorted copies of the rows matching `view`.
    pub fn apply(&self, rows: &[R], view: &ViewState) -> Vec<R> {
        self.query(rows, view)
            .into_iter()
            .map(|i| rows[i].clone())
            .collect()
    }

    /// Returns `true` if `row` passes every column filter and the advanced
    /// filter of `view`.
    pub fn matches(&self, row: &R, view: &ViewState) -> bool {
        let columns_match = view
            .column_filters()
            .iter()
            .all(|(field, filter)| self.matches_column(row, field, filter));

        columns_match
            && view
                .advanced_filters()
                .is_none_or(|filter| self.evaluate(row, filter))
    }

    /// Evaluates an advanced filter tree against `row`.
    ///
    /// Ordering comparisons never match nulls. Unregistered custom predicates
    /// never match.
    pub fn evaluate(&self, row: &R, filter: &Filter) -> bool {
        match filter {
            Filter::Eq(field, value) => row.value(field).compare(value) == Ordering::Equal,
            Filter::Ne(field, value) => row.value(field).compare(value) != Ordering::Equal,
            Filter::Gt(field, value) => ordered(row.value(field), value, Ordering::is_gt),
            Filter::Ge(field, value) => ordered(row.value(field), value, Ordering::is_ge),
            Filter::Lt(field, value) => ordered(row.value(field), value, Ordering::is_lt),
            Filter::Le(field, value) => ordered(row.value(field), value, Ordering::is_le),
            Filter::Contains(field, needle) => self.text(row, field).contains(&needle.to_lowercase()),
            Filter::StartsWith(field, needle) => {
                self.text(row, field).starts_with(&needle.to_lowercase())
            }
            Filter::EndsWith(field, needle) => self.text(row, field).ends_with(&needle.to_lowercase()),
            Filter::In(field, values) => {
                let actual = row.value(field);
                values.iter().any(|v| actual.compare(v) == Ordering::Equal)
            }
            Filter::IsNull(field) => row.value(field).is_null(),
            Filter::IsNotNull(field) => !row.value(field).is_null(),
            Filter::Custom(name, argument) => self
                .predicates
                .get(name)
                .is_some_and(|predicate| predicate(row, argument)),
            Filter::And(filters) => filters.iter().all(|f| self.evaluate(row, f)),
            Filter::Or(filters) => filters.iter().any(|f| self.evaluate(row, f)),
            Filter::Not(inner) => !self.evaluate(row, inner),
        }
    }

    fn matches_column(&self, row: &R, field: &str, filter: &ColumnFilter) -> bool {
        match filter {
            ColumnFilter::Text(needle) => self
                .text(row, field)
                .contains(&needle.trim().to_lowercase()),
            ColumnFilter::Exact(value) => row.value(field).compare(value) == Ordering::Equal,
        }
    }

    // Lowercased cell text, through the column's renderer when it has one.
    fn text(&self, row: &R, field: &str) -> String {
        match self.column(field) {
            Some(column) => column.render_cell(row).to_lowercase(),
            None => row.value(field).to_string().to_lowercase(),
        }
    }

    fn order(&self, rows: &[R], indices: &mut [usize], view: &ViewState) {
        let Some(field) = view.sort_field() else {
            return;
        };
        let direction = view.sort_direction();
        let comparator = self.column(field).and_then(Column::comparator);

        // `sort_by` is stable, so equal rows keep their source order in both
        // directions.
        indices.sort_by(|&a, &b| {
            let (a, b) = (&rows[a], &rows[b]);
            let ordering = match (comparator, &self.sort_func) {
                (Some(compare), _) => compare(a, b),
                (None, Some(sort_func)) => sort_func(a, b, field),
                (None, None) => a.value(field).compare(&b.value(field)),
            };
            direction.apply(ordering)
        });
    }
}

fn ordered(actual: Value, expected: &Value, accept: fn(Ordering) -> bool) -> bool {
    !actual.is_null() && !expected.is_null() && accept(actual.compare(expected))
}

impl<R> Clone for LocalPipeline<R> {
    fn clone(&self) -> Self {
        Self {
            columns: Arc::clone(&self.columns),
            sort_func: self.sort_func.clone(),
            predicates: self.predicates.clone(),
        }
    }
}

impl<R> fmt::Debug for LocalPipeline<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalPipeline")
            .field("columns", &self.columns.len())
            .field("sort_func", &self.sort_func.is_some())
            .field("predicates", &self.predicates.keys().collect::<Vec<_>>())
            .finish()
    }
}
