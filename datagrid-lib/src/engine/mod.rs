//! The reconciliation engine.
//!
//! A [`Grid`] owns the current [`ViewState`], the visible rows and the
//! selection. Every `on_*` transition replaces the view and reconciles:
//! static sources are filtered, sorted and sliced synchronously, remote
//! sources produce a [`Fetch`] the caller drives and feeds back through
//! [`Grid::complete`]. Only the most recently issued fetch whose view still
//! matches the grid's view is applied.
//!
//! # Example
//!
//! ```
//! use datagrid_lib::column::Column;
//! use datagrid_lib::model::Record;
//! use datagrid_lib::{Grid, GridOptions};
//!
//! let rows: Vec<Record> = (0..25).map(|i| Record::new().set("id", i)).collect();
//! let mut grid = Grid::builder(rows)
//!     .column(Column::new("id").sortable())
//!     .identity_field("id")
//!     .options(GridOptions::default().with_pagination(true).with_rows_per_page(10))
//!     .build()
//!     .unwrap();
//!
//! assert!(grid.mount().is_none());
//! assert_eq!(grid.visible_rows().len(), 10);
//!
//! grid.on_change_page(2);
//! assert_eq!(grid.visible_rows().len(), 5);
//! assert_eq!(grid.total_count(), 25);
//! ```

mod fetch;
mod local;
mod status;

pub use fetch::Completion;
pub use fetch::Fetch;
pub use fetch::Fetches;
pub use local::LocalPipeline;
pub use local::Predicate;
pub use local::SortFunc;
pub use status::LoadState;

pub(crate) use fetch::load_with_timeout;

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

use log::debug;
use log::warn;

use crate::column::Column;
use crate::column::RowAction;
use crate::column::normalize_columns;
use crate::error::ConfigError;
use crate::error::LoaderError;
use crate::mode::RenderMode;
use crate::mode::derive_mode;
use crate::model::GridRow;
use crate::model::IdentityFn;
use crate::model::RowId;
use crate::model::Value;
use crate::options::GridOptions;
use crate::selection::SelectAllState;
use crate::selection::Selection;
use crate::source::RemoteLoader;
use crate::source::Source;
use crate::view::ColumnFilter;
use crate::view::Filter;
use crate::view::PageInfo;
use crate::view::ViewState;

/// Receives loader failures.
pub type ErrorCallback = Arc<dyn Fn(&LoaderError) + Send + Sync>;

/// Receives the full, sorted selection after every change.
pub type SelectCallback = Arc<dyn Fn(&[RowId]) + Send + Sync>;

/// A data grid bound to one source.
pub struct Grid<R> {
    columns: Arc<Vec<Column<R>>>,
    actions: Vec<RowAction<R>>,
    source: Source<R>,
    pipeline: LocalPipeline<R>,
    identity: IdentityFn<R>,
    options: GridOptions,
    view: ViewState,
    state: LoadState,
    visible: Vec<R>,
    total_count: usize,
    // Filtered and sorted indices into the static rows, keyed by the view
    // without its window.
    ordered: Option<(ViewState, Vec<usize>)>,
    // Source index of `visible[0]`.
    window_offset: usize,
    selection: Selection,
    mode: RenderMode,
    viewport_narrow: Option<bool>,
    next_ticket: u64,
    in_flight: Option<u64>,
    last_error: Option<LoaderError>,
    on_error: Option<ErrorCallback>,
    on_select: Option<SelectCallback>,
    export_loader: Option<Arc<dyn RemoteLoader<R>>>,
    loader_timeout: Option<Duration>,
}

impl<R: GridRow> Grid<R> {
    /// Starts building a grid over `source`.
    pub fn builder(source: impl Into<Source<R>>) -> GridBuilder<R> {
        GridBuilder::new(source.into())
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Runs the first reconciliation.
    pub fn mount(&mut self) -> Option<Fetch<R>> {
        debug!(
            "Mounting {:?} grid with {} columns",
            self.source.kind(),
            self.columns.len()
        );
        self.reconcile(false)
    }

    /// Reloads the current view.
    ///
    /// Remote sources are fetched again. Any fetch still in flight becomes
    /// stale.
    pub fn refresh(&mut self) -> Option<Fetch<R>> {
        self.ordered = None;
        self.reconcile(false)
    }

    /// Replaces the static rows.
    ///
    /// Nothing happens when `rows` is the collection the grid already holds.
    /// Selected identities that are absent from the new rows are dropped.
    /// Remote grids cannot switch to static data; build a new grid instead.
    pub fn set_data(&mut self, rows: impl Into<Arc<Vec<R>>>) {
        let rows = rows.into();
        let Source::Static(current) = &self.source else {
            warn!("Ignoring static data supplied to a remote grid");
            return;
        };
        if Arc::ptr_eq(current, &rows) {
            return;
        }

        let present: HashSet<RowId> = rows.iter().map(|row| (self.identity)(row)).collect();
        let removed = self.selection.retain_present(&present);
        if !removed.is_empty() {
            debug!("Dropped {} selected rows absent from new data", removed.len());
            self.notify_select();
        }

        self.source = Source::Static(rows);
        self.ordered = None;
        self.reconcile(false);
    }

    /// Feeds a finished fetch back into the grid.
    ///
    /// Returns `true` if the result was applied. Results of anything but the
    /// most recently issued fetch, or of a view that has since changed, are
    /// discarded.
    pub fn complete(&mut self, completion: Completion<R>) -> bool {
        let Completion {
            ticket,
            view,
            append,
            result,
        } = completion;

        if self.in_flight != Some(ticket) || view != self.view {
            debug!("Discarding stale result for request #{ticket}");
            return false;
        }

        self.in_flight = None;
        self.state = LoadState::Settled;

        match result {
            Ok(page) => {
                debug!(
                    "Request #{ticket} settled with {} rows of {}",
                    page.len(),
                    page.total_count()
                );
                self.total_count = page.total_count();
                if append && self.mode == RenderMode::Mobile {
                    self.visible.extend(page.into_rows());
                } else {
                    self.visible = page.into_rows();
                    self.window_offset = view.start_index();
                }
                self.last_error = None;
            }
            Err(err) => {
                warn!("Request #{ticket} failed: {err}");
                self.visible.clear();
                self.total_count = 0;
                self.window_offset = view.start_index();
                if let Some(on_error) = &self.on_error {
                    on_error(&err);
                }
                self.last_error = Some(err);
            }
        }
        true
    }

    // =========================================================================
    // View transitions
    // =========================================================================

    /// Moves to `page`.
    pub fn on_change_page(&mut self, page: usize) -> Option<Fetch<R>> {
        self.transition(self.view.change_page(page))
    }

    /// Changes the page size and returns to the first page.
    pub fn on_change_rows_per_page(&mut self, rows_per_page: usize) -> Option<Fetch<R>> {
        if rows_per_page == 0 {
            warn!("Ignoring page size of zero");
            return None;
        }
        self.transition(self.view.change_rows_per_page(rows_per_page))
    }

    /// Sorts by `field`, flipping the direction if it is already the sort
    /// field.
    pub fn on_change_sort(&mut self, field: &str) -> Option<Fetch<R>> {
        let sortable = self
            .data_column(field)
            .is_some_and(|column| column.sortable);
        if !sortable {
            warn!("Ignoring sort on unknown or unsortable column '{field}'");
            return None;
        }
        self.transition(self.view.change_sort(field))
    }

    /// Sets or clears the filter of one column.
    pub fn on_change_filter(&mut self, field: &str, filter: Option<ColumnFilter>) -> Option<Fetch<R>> {
        if self.data_column(field).is_none() {
            warn!("Ignoring filter on unknown column '{field}'");
            return None;
        }
        self.transition(self.view.change_column_filter(field, filter))
    }

    /// Replaces the advanced filter tree.
    pub fn on_apply_advanced_filters(&mut self, filters: Option<Filter>) -> Option<Fetch<R>> {
        if let (Source::Static(_), Some(filter)) = (&self.source, &filters) {
            for name in self.pipeline.unknown_predicates(filter) {
                warn!("Custom filter '{name}' is not registered and matches no rows");
            }
        }
        self.transition(self.view.apply_advanced_filters(filters))
    }

    /// Loads the next window below the visible rows (mobile mode).
    ///
    /// Ignored while a fetch is in flight, so every appended window lands
    /// directly after the rows it extends.
    pub fn on_show_more(&mut self) -> Option<Fetch<R>> {
        if self.mode != RenderMode::Mobile {
            debug!("Show more is only available in mobile mode");
            return None;
        }
        if matches!(self.source, Source::Static(_)) && !self.options.pagination {
            debug!("Show more: pagination is off, every row is visible");
            return None;
        }
        if let Some(ticket) = self.in_flight {
            debug!("Show more: request #{ticket} is still loading");
            return None;
        }
        if self.view.stop_index().saturating_add(1) >= self.total_count {
            debug!("Show more: every row is already visible");
            return None;
        }
        let next = self.view.change_page(self.view.page() + 1);
        self.view = next;
        self.reconcile(true)
    }

    /// Collapses back to the first window (mobile mode).
    pub fn on_show_less(&mut self) -> Option<Fetch<R>> {
        if self.mode != RenderMode::Mobile {
            debug!("Show less is only available in mobile mode");
            return None;
        }
        self.transition(self.view.change_page(0))
    }

    fn transition(&mut self, next: ViewState) -> Option<Fetch<R>> {
        if next == self.view {
            return None;
        }
        self.view = next;
        self.reconcile(false)
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Selects or deselects one row.
    pub fn on_toggle_select(&mut self, id: &str) {
        self.selection.toggle(id);
        self.notify_select();
    }

    /// Selects every visible row, or deselects them all if they already are.
    pub fn on_toggle_select_all(&mut self) {
        let ids = self.visible_ids();
        match self.selection.state_for(&ids) {
            SelectAllState::All => {
                self.selection.deselect_all(&ids);
            }
            SelectAllState::None | SelectAllState::Some => {
                self.selection.select_all(&ids);
            }
        }
        self.notify_select();
    }

    /// Deselects everything.
    pub fn on_clear_selection(&mut self) {
        if !self.selection.clear().is_empty() {
            self.notify_select();
        }
    }

    fn notify_select(&self) {
        if let Some(on_select) = &self.on_select {
            on_select(&self.selection.selected());
        }
    }

    fn visible_ids(&self) -> Vec<RowId> {
        self.visible.iter().map(|row| (self.identity)(row)).collect()
    }

    // =========================================================================
    // Responsive mode
    // =========================================================================

    /// Reports whether the viewport is narrow; `None` while unmeasured.
    ///
    /// Only the render mode changes. The view, the selection and the source
    /// are left alone.
    pub fn set_viewport(&mut self, narrow: impl Into<Option<bool>>) -> RenderMode {
        self.viewport_narrow = narrow.into();
        let mode = derive_mode(self.options.variant, self.viewport_narrow, self.mode);
        if mode != self.mode {
            debug!("Switching render mode from {:?} to {:?}", self.mode, mode);
            self.mode = mode;
            self.rewindow();
        }
        self.mode
    }

    // Re-slices the visible rows for the current mode without fetching.
    fn rewindow(&mut self) {
        match &self.source {
            Source::Static(_) => self.reconcile_static(false),
            Source::Remote(_) => {
                if self.mode == RenderMode::Desktop {
                    let skip = self.view.start_index().saturating_sub(self.window_offset);
                    self.visible.drain(..skip.min(self.visible.len()));
                    self.window_offset = self.view.start_index();
                }
            }
        }
    }

    // =========================================================================
    // Reconciliation
    // =========================================================================

    fn reconcile(&mut self, append: bool) -> Option<Fetch<R>> {
        self.state = LoadState::Loading;
        match &self.source {
            Source::Static(_) => {
                self.reconcile_static(append);
                None
            }
            Source::Remote(loader) => {
                let loader = Arc::clone(loader);
                self.next_ticket += 1;
                let ticket = self.next_ticket;
                self.in_flight = Some(ticket);
                debug!(
                    "Issuing request #{ticket} for rows {}..={}",
                    self.view.start_index(),
                    self.view.stop_index()
                );
                Some(Fetch::new(
                    ticket,
                    self.view.clone(),
                    append,
                    loader,
                    self.loader_timeout,
                ))
            }
        }
    }

    fn reconcile_static(&mut self, append: bool) {
        let Source::Static(rows) = &self.source else {
            return;
        };

        let key = self.view.unbounded();
        let cached = matches!(&self.ordered, Some((cached, _)) if *cached == key);
        if !cached {
            let indices = self.pipeline.query(rows, &self.view);
            self.ordered = Some((key, indices));
        }
        let indices = self
            .ordered
            .as_ref()
            .map(|(_, indices)| indices.as_slice())
            .unwrap_or_default();

        let range = self.static_range(indices.len(), append);
        self.window_offset = range.start;
        self.visible = indices[range].iter().map(|&i| rows[i].clone()).collect();
        self.total_count = indices.len();
        self.in_flight = None;
        self.state = LoadState::Settled;
    }

    // Mobile show-more keeps the first visible row and extends the end, the
    // same window a remote grid builds by appending.
    fn static_range(&self, len: usize, append: bool) -> Range<usize> {
        if !self.options.pagination {
            return 0..len;
        }
        let end = self.view.stop_index().saturating_add(1).min(len);
        let start = if append && self.mode == RenderMode::Mobile {
            self.window_offset
        } else {
            self.view.start_index()
        };
        start.min(end)..end
    }

    fn data_column(&self, field: &str) -> Option<&Column<R>> {
        self.columns
            .iter()
            .find(|column| column.is_data() && column.field == field)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Returns the normalized columns, synthetic ones included.
    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    /// Returns the rows to render.
    pub fn visible_rows(&self) -> &[R] {
        &self.visible
    }

    /// Returns the number of rows matching the current filters.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Returns `true` while a fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        self.state.is_loading()
    }

    /// Returns the load status.
    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Returns the current view.
    pub fn view(&self) -> &ViewState {
        &self.view
    }

    /// Returns the selection.
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Returns `true` if `row` is selected.
    pub fn is_selected(&self, row: &R) -> bool {
        self.selection.is_selected(&(self.identity)(row))
    }

    /// Returns the render mode.
    pub fn mode(&self) -> RenderMode {
        self.mode
    }

    /// Returns the options the grid was built with.
    pub fn options(&self) -> &GridOptions {
        &self.options
    }

    /// Returns the error of the last settled fetch, if it failed.
    pub fn last_error(&self) -> Option<&LoaderError> {
        self.last_error.as_ref()
    }

    /// Returns the actions offered for `row`.
    pub fn actions_for(&self, row: &R) -> Vec<&RowAction<R>> {
        self.actions
            .iter()
            .filter(|action| action.is_visible_for(row))
            .collect()
    }

    /// Returns the pagination summary.
    pub fn page_info(&self) -> PageInfo {
        PageInfo::new(&self.view, self.total_count)
    }

    /// Returns everything a presentation layer needs for one render.
    pub fn snapshot(&self) -> GridSnapshot<'_, R> {
        GridSnapshot {
            columns: &self.columns,
            visible_rows: &self.visible,
            total_count: self.total_count,
            loading: self.state.is_loading(),
            state: self.state,
            view: &self.view,
            selection: self.selection.selected(),
            select_all: self.selection.state_for(&self.visible_ids()),
            mode: self.mode,
            page_info: self.page_info(),
        }
    }

    pub(crate) fn source(&self) -> &Source<R> {
        &self.source
    }

    pub(crate) fn pipeline(&self) -> &LocalPipeline<R> {
        &self.pipeline
    }

    pub(crate) fn export_loader(&self) -> Option<&Arc<dyn RemoteLoader<R>>> {
        self.export_loader.as_ref()
    }

    pub(crate) fn loader_timeout(&self) -> Option<Duration> {
        self.loader_timeout
    }

    pub(crate) fn on_error(&self) -> Option<&ErrorCallback> {
        self.on_error.as_ref()
    }
}

impl<R> fmt::Debug for Grid<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Grid")
            .field("source", &self.source)
            .field("view", &self.view)
            .field("state", &self.state)
            .field("visible", &self.visible.len())
            .field("total_count", &self.total_count)
            .field("mode", &self.mode)
            .field("in_flight", &self.in_flight)
            .finish_non_exhaustive()
    }
}

/// One render cycle's worth of grid output.
#[derive(Debug)]
pub struct GridSnapshot<'a, R> {
    pub columns: &'a [Column<R>],
    pub visible_rows: &'a [R],
    pub total_count: usize,
    pub loading: bool,
    pub state: LoadState,
    pub view: &'a ViewState,
    pub selection: Vec<RowId>,
    pub select_all: SelectAllState,
    pub mode: RenderMode,
    pub page_info: PageInfo,
}

/// Builder for [`Grid`].
pub struct GridBuilder<R> {
    source: Source<R>,
    columns: Vec<Column<R>>,
    actions: Vec<RowAction<R>>,
    options: GridOptions,
    identity: Option<IdentityFn<R>>,
    initial_selection: Vec<RowId>,
    sort_func: Option<SortFunc<R>>,
    predicates: Vec<(String, Predicate<R>)>,
    export_loader: Option<Arc<dyn RemoteLoader<R>>>,
    on_error: Option<ErrorCallback>,
    on_select: Option<SelectCallback>,
    viewport_narrow: Option<bool>,
}

impl<R: GridRow> GridBuilder<R> {
    fn new(source: Source<R>) -> Self {
        Self {
            source,
            columns: Vec::new(),
            actions: Vec::new(),
            options: GridOptions::default(),
            identity: None,
            initial_selection: Vec::new(),
            sort_func: None,
            predicates: Vec::new(),
            export_loader: None,
            on_error: None,
            on_select: None,
            viewport_narrow: None,
        }
    }

    /// Replaces the declared columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = Column<R>>) -> Self {
        self.columns = columns.into_iter().collect();
        self
    }

    /// Adds one column.
    pub fn column(mut self, column: Column<R>) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a row action; the first one adds the actions column.
    pub fn action(mut self, action: RowAction<R>) -> Self {
        self.actions.push(action);
        self
    }

    /// Sets the options.
    pub fn options(mut self, options: GridOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the identity function used for selection.
    pub fn identity(mut self, identity: impl Fn(&R) -> RowId + Send + Sync + 'static) -> Self {
        self.identity = Some(Arc::new(identity));
        self
    }

    /// Uses the text of `field` as the row identity.
    pub fn identity_field(self, field: impl Into<String>) -> Self {
        let field = field.into();
        self.identity(move |row| row.value(&field).to_string())
    }

    /// Seeds the selection.
    pub fn initial_selection(mut self, ids: impl IntoIterator<Item = RowId>) -> Self {
        self.initial_selection = ids.into_iter().collect();
        self
    }

    /// Sets the comparator for columns without their own.
    pub fn sort_func(mut self, sort_func: impl Fn(&R, &R, &str) -> Ordering + Send + Sync + 'static) -> Self {
        self.sort_func = Some(Arc::new(sort_func));
        self
    }

    /// Registers a named predicate for [`Filter::Custom`].
    pub fn predicate(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&R, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicates.push((name.into(), Arc::new(predicate)));
        self
    }

    /// Uses a dedicated loader when exporting every filtered row of a remote
    /// grid.
    pub fn export_loader(mut self, loader: impl RemoteLoader<R> + 'static) -> Self {
        self.export_loader = Some(Arc::new(loader));
        self
    }

    /// Sets the error channel for loader failures.
    pub fn on_error(mut self, callback: impl Fn(&LoaderError) + Send + Sync + 'static) -> Self {
        self.on_error = Some(Arc::new(callback));
        self
    }

    /// Sets the selection callback.
    pub fn on_select(mut self, callback: impl Fn(&[RowId]) + Send + Sync + 'static) -> Self {
        self.on_select = Some(Arc::new(callback));
        self
    }

    /// Sets the initial viewport measurement.
    pub fn viewport(mut self, narrow: impl Into<Option<bool>>) -> Self {
        self.viewport_narrow = narrow.into();
        self
    }

    /// Validates the configuration and builds an idle grid.
    ///
    /// Call [`Grid::mount`] to load the first page.
    pub fn build(self) -> Result<Grid<R>, ConfigError> {
        self.options.validate()?;
        let identity = self.identity.ok_or(ConfigError::MissingIdentity)?;
        let columns = Arc::new(normalize_columns(
            self.columns,
            &self.options,
            &self.actions,
        )?);

        if let Some(sort) = &self.options.initial_sort {
            let sortable = columns
                .iter()
                .any(|c| c.is_data() && c.sortable && c.field == sort.field);
            if !sortable {
                return Err(ConfigError::unknown_sort_field(&sort.field));
            }
        }

        let mut pipeline = LocalPipeline::new(Arc::clone(&columns));
        if let Some(sort_func) = self.sort_func {
            pipeline = pipeline.with_sort_func(sort_func);
        }
        for (name, predicate) in self.predicates {
            pipeline = pipeline.with_predicate(name, predicate);
        }

        let mode = derive_mode(self.options.variant, self.viewport_narrow, RenderMode::Desktop);
        let view = self.options.initial_view();
        let loader_timeout = self.options.loader_timeout();

        debug!(
            "Built grid: {} columns, {} rows per page, {:?} mode",
            columns.len(),
            view.rows_per_page(),
            mode
        );

        Ok(Grid {
            columns,
            actions: self.actions,
            source: self.source,
            pipeline,
            identity,
            options: self.options,
            view,
            state: LoadState::Idle,
            visible: Vec::new(),
            total_count: 0,
            ordered: None,
            window_offset: 0,
            selection: Selection::with_ids(self.initial_selection),
            mode,
            viewport_narrow: self.viewport_narrow,
            next_ticket: 0,
            in_flight: None,
            last_error: None,
            on_error: self.on_error,
            on_select: self.on_select,
            export_loader: self.export_loader,
            loader_timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::model::Record;
    use crate::mode::Variant;
    use crate::source::Page;

    fn rows(count: i64) -> Vec<Record> {
        (0..count)
            .map(|i| Record::new().set("id", i).set("name", format!("row {i}")))
            .collect()
    }

    fn builder(source: impl Into<Source<Record>>) -> GridBuilder<Record> {
        Grid::builder(source)
            .column(Column::new("id").sortable())
            .column(Column::new("name").filterable())
            .identity_field("id")
            .options(GridOptions::default().with_pagination(true).with_rows_per_page(10))
    }

    fn ids(grid: &Grid<Record>) -> Vec<String> {
        grid.visible_rows().iter().map(|r| r.value("id").to_string()).collect()
    }

    #[test]
    fn test_build_requires_identity() {
        let err = Grid::<Record>::builder(rows(1))
            .column(Column::new("id"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::MissingIdentity));
    }

    #[test]
    fn test_build_rejects_unsortable_initial_sort() {
        let err = builder(rows(1))
            .options(GridOptions::default().with_initial_sort("name", Default::default()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownSortField { .. }));
    }

    #[test]
    fn test_build_leaves_grid_idle() {
        let grid = builder(rows(3)).build().unwrap();
        assert_eq!(grid.state(), LoadState::Idle);
        assert!(grid.visible_rows().is_empty());
    }

    #[test]
    fn test_unsortable_and_unknown_columns_are_ignored() {
        let mut grid = builder(rows(3)).build().unwrap();
        grid.mount();
        let before = grid.view().clone();

        assert!(grid.on_change_sort("name").is_none());
        assert!(grid.on_change_sort("missing").is_none());
        assert!(grid.on_change_filter("missing", Some("x".into())).is_none());
        assert!(grid.on_change_rows_per_page(0).is_none());
        assert_eq!(grid.view(), &before);
    }

    #[test]
    fn test_pagination_off_shows_every_row() {
        let mut grid = builder(rows(25))
            .options(GridOptions::default().with_rows_per_page(10))
            .build()
            .unwrap();
        grid.mount();
        assert_eq!(grid.visible_rows().len(), 25);
    }

    #[test]
    fn test_page_change_reuses_ordered_rows() {
        let mut grid = builder(rows(25)).build().unwrap();
        grid.mount();
        grid.on_change_sort("id");
        grid.on_change_sort("id");
        grid.on_change_page(1);

        assert_eq!(ids(&grid)[0], "14");
        assert_eq!(grid.total_count(), 25);
    }

    #[test]
    fn test_mobile_accumulates_static_rows() {
        let mut grid = builder(rows(25))
            .options(
                GridOptions::default()
                    .with_pagination(true)
                    .with_rows_per_page(10)
                    .with_variant(Variant::Mobile),
            )
            .build()
            .unwrap();
        grid.mount();
        assert_eq!(grid.mode(), RenderMode::Mobile);

        grid.on_show_more();
        assert_eq!(grid.visible_rows().len(), 20);
        grid.on_show_more();
        assert_eq!(grid.visible_rows().len(), 25);
        assert!(grid.on_show_more().is_none());
        assert_eq!(grid.view().page(), 2);

        grid.on_show_less();
        assert_eq!(grid.visible_rows().len(), 10);
    }

    #[test]
    fn test_viewport_switch_keeps_view_and_selection() {
        let mut grid = builder(rows(25)).build().unwrap();
        grid.mount();
        grid.on_change_page(1);
        grid.on_toggle_select("12");

        assert_eq!(grid.set_viewport(true), RenderMode::Mobile);
        assert_eq!(grid.visible_rows().len(), 10);
        assert_eq!(grid.view().page(), 1);
        grid.on_show_more();
        assert_eq!(ids(&grid).first().map(String::as_str), Some("10"));
        assert_eq!(grid.visible_rows().len(), 15);

        assert_eq!(grid.set_viewport(None), RenderMode::Mobile);
        assert_eq!(grid.set_viewport(false), RenderMode::Desktop);
        assert_eq!(ids(&grid)[0], "20");
        assert!(grid.selection().is_selected("12"));
    }

    #[test]
    fn test_toggle_select_all_and_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut grid = builder(rows(15))
            .initial_selection(["3".to_string()])
            .on_select(move |ids| sink.lock().unwrap().push(ids.len()))
            .build()
            .unwrap();
        grid.mount();

        assert_eq!(grid.snapshot().select_all, SelectAllState::Some);
        grid.on_toggle_select_all();
        assert_eq!(grid.snapshot().select_all, SelectAllState::All);
        grid.on_toggle_select_all();
        assert_eq!(grid.snapshot().select_all, SelectAllState::None);
        grid.on_clear_selection();

        assert_eq!(*seen.lock().unwrap(), vec![10, 0]);
    }

    #[test]
    fn test_actions_for_row() {
        let grid = builder(rows(2))
            .action(RowAction::new("Open"))
            .action(RowAction::new("Delete").visible_when(|r: &Record| r.value("id") == Value::Int(1)))
            .build()
            .unwrap();

        let labels = |row: &Record| {
            grid.actions_for(row)
                .iter()
                .map(|a| a.label.clone())
                .collect::<Vec<_>>()
        };
        let data = rows(2);
        assert_eq!(labels(&data[0]), vec!["Open"]);
        assert_eq!(labels(&data[1]), vec!["Open", "Delete"]);
        assert_eq!(grid.columns().last().map(|c| c.kind), Some(crate::column::ColumnKind::Actions));
    }

    #[tokio::test]
    async fn test_remote_mount_and_complete() {
        let source = Source::from_fn(|view: ViewState| async move {
            let rows = rows(95)[view.window().start..view.window().end.min(95)].to_vec();
            Ok(Page::new(rows, 95))
        });
        let mut grid = builder(source).build().unwrap();

        let fetch = grid.mount().unwrap();
        assert!(grid.is_loading());
        assert!(grid.complete(fetch.await));
        assert!(!grid.is_loading());
        assert_eq!(grid.visible_rows().len(), 10);
        assert_eq!(grid.total_count(), 95);
    }

    #[tokio::test]
    async fn test_remote_refresh_supersedes_in_flight() {
        let source = Source::from_fn(|_| async { Ok(Page::new(rows(2), 2)) });
        let mut grid = builder(source).build().unwrap();

        let first = grid.mount().unwrap();
        let second = grid.refresh().unwrap();
        assert!(!grid.complete(first.await));
        assert!(grid.is_loading());
        assert!(grid.complete(second.await));
    }

    #[tokio::test]
    async fn test_remote_mobile_show_more_appends() {
        let source = Source::from_fn(|view: ViewState| async move {
            let window = view.window();
            Ok(Page::new(rows(25)[window.start..window.end.min(25)].to_vec(), 25))
        });
        let mut grid = builder(source).viewport(true).build().unwrap();
        grid.set_viewport(true);

        let fetch = grid.mount().unwrap();
        grid.complete(fetch.await);
        let fetch = grid.on_show_more().unwrap();
        grid.complete(fetch.await);
        assert_eq!(grid.visible_rows().len(), 20);

        grid.set_viewport(false);
        assert_eq!(ids(&grid), (10..20).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_show_more_with_pagination_off_keeps_view() {
        let mut grid = builder(rows(25))
            .options(GridOptions::default().with_variant(Variant::Mobile))
            .build()
            .unwrap();
        grid.mount();

        assert!(grid.on_show_more().is_none());
        assert_eq!(grid.view().page(), 0);
        assert_eq!(grid.visible_rows().len(), 25);
    }

    #[test]
    fn test_static_and_remote_mobile_windows_agree() {
        let mut grid = builder(rows(40)).build().unwrap();
        grid.mount();
        grid.on_change_page(2);
        grid.set_viewport(true);
        assert_eq!(ids(&grid)[0], "20");

        grid.on_show_more();
        assert_eq!(ids(&grid), (20..40).map(|i| i.to_string()).collect::<Vec<_>>());

        grid.on_change_page(1);
        assert_eq!(ids(&grid), (10..20).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    fn paged(total: i64) -> Source<Record> {
        Source::from_fn(move |view: ViewState| async move {
            tokio::time::sleep(Duration::from_millis(5)).await;
            let window = view.window();
            let end = window.end.min(total as usize);
            Ok(Page::new(rows(total)[window.start.min(end)..end].to_vec(), total as usize))
        })
    }

    #[tokio::test]
    async fn test_show_more_waits_for_previous_window() {
        let mut grid = builder(paged(40)).viewport(true).build().unwrap();
        let fetch = grid.mount().unwrap();
        grid.complete(fetch.await);

        let mut fetches = Fetches::new();
        fetches.push(grid.on_show_more());
        fetches.push(grid.on_show_more());
        assert_eq!(fetches.len(), 1);
        assert_eq!(fetches.drain_into(&mut grid).await, 1);
        assert_eq!(ids(&grid), (0..20).map(|i| i.to_string()).collect::<Vec<_>>());

        let fetch = grid.on_show_more().unwrap();
        grid.complete(fetch.await);
        assert_eq!(ids(&grid), (0..30).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_show_more_is_ignored_while_filter_loads() {
        let mut grid = builder(paged(40)).viewport(true).build().unwrap();
        let fetch = grid.mount().unwrap();
        grid.complete(fetch.await);

        let filtered = grid.on_change_filter("name", Some("row".into())).unwrap();
        assert!(grid.on_show_more().is_none());
        assert!(grid.complete(filtered.await));
        assert_eq!(grid.view().page(), 0);
        assert_eq!(ids(&grid), (0..10).map(|i| i.to_string()).collect::<Vec<_>>());
    }

    #[test]
    fn test_loader_timeout_outside_tokio_settles_as_failure() {
        let mut grid = builder(paged(5))
            .options(
                GridOptions::default()
                    .with_pagination(true)
                    .with_loader_timeout(Duration::from_millis(50)),
            )
            .build()
            .unwrap();

        let fetch = grid.mount().unwrap();
        assert!(grid.complete(futures::executor::block_on(fetch)));
        assert!(matches!(grid.last_error(), Some(LoaderError::Other(_))));
        assert!(grid.visible_rows().is_empty());
    }

    #[tokio::test]
    async fn test_set_data_is_ignored_for_remote_grids() {
        let source = Source::from_fn(|_| async { Ok(Page::new(rows(1), 1)) });
        let mut grid = builder(source).build().unwrap();
        let fetch = grid.mount().unwrap();
        grid.complete(fetch.await);

        grid.set_data(rows(5));
        assert_eq!(grid.visible_rows().len(), 1);
    }

    #[tokio::test]
    async fn test_loader_timeout() {
        let source = Source::from_fn(|_| async {
            tokio::time::sleep(Duration::from_millis(200)).await;
            Ok(Page::new(rows(1), 1))
        });
        let mut grid = builder(source)
            .options(
                GridOptions::default()
                    .with_pagination(true)
                    .with_loader_timeout(Duration::from_millis(10)),
            )
            .build()
            .unwrap();

        let fetch = grid.mount().unwrap();
        assert!(grid.complete(fetch.await));
        assert!(matches!(grid.last_error(), Some(LoaderError::Timeout(_))));
        assert_eq!(grid.total_count(), 0);
    }
}
