//! Export projection.
//!
//! Materializes the rows a grid shows, or every row matching its filters, for
//! an external writer. Projection reads the view but never changes it.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use log::debug;
use log::warn;
use serde::Serialize;

use crate::column::Column;
use crate::engine::Grid;
use crate::engine::LocalPipeline;
use crate::engine::load_with_timeout;
use crate::error::LoaderError;
use crate::model::GridRow;
use crate::source::Source;
use crate::view::ViewState;

/// Which rows to export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportScope {
    /// The window of the current view.
    #[default]
    CurrentPage,
    /// Every row matching the current filters, in sort order.
    AllFiltered,
}

/// Projects `source` through `view`.
///
/// Static rows are filtered and sorted by `pipeline`. Remote sources are asked
/// for the window of `view`, or for an unbounded window when exporting every
/// filtered row.
pub async fn project<R: GridRow>(
    source: &Source<R>,
    view: &ViewState,
    scope: ExportScope,
    pipeline: &LocalPipeline<R>,
) -> Result<Vec<R>, LoaderError> {
    project_with_timeout(source, view, scope, pipeline, None).await
}

async fn project_with_timeout<R: GridRow>(
    source: &Source<R>,
    view: &ViewState,
    scope: ExportScope,
    pipeline: &LocalPipeline<R>,
    timeout: Option<std::time::Duration>,
) -> Result<Vec<R>, LoaderError> {
    match source {
        Source::Static(rows) => {
            let ordered = pipeline.query(rows, view);
            let window = match scope {
                ExportScope::CurrentPage => {
                    let window = view.window();
                    &ordered[window.start.min(ordered.len())..window.end.min(ordered.len())]
                }
                ExportScope::AllFiltered => ordered.as_slice(),
            };
            Ok(window.iter().map(|&i| rows[i].clone()).collect())
        }
        Source::Remote(loader) => {
            let request = match scope {
                ExportScope::CurrentPage => view.clone(),
                ExportScope::AllFiltered => view.unbounded(),
            };
            let page = load_with_timeout(loader.as_ref(), &request, timeout).await?;
            Ok(page.into_rows())
        }
    }
}

impl<R: GridRow> Grid<R> {
    /// Exports rows without touching the view.
    ///
    /// `CurrentPage` returns the visible rows as they are. `AllFiltered`
    /// re-runs the filters and sort; remote grids call the export loader if
    /// one was given, or the source loader with an unbounded window. A
    /// failing loader is reported through the error callback and yields no
    /// rows.
    pub fn export(&self, scope: ExportScope) -> BoxFuture<'static, Vec<R>> {
        if scope == ExportScope::CurrentPage {
            let rows = self.visible_rows().to_vec();
            return async move { rows }.boxed();
        }

        let source = match (self.source(), self.export_loader()) {
            (Source::Remote(_), Some(loader)) => Source::Remote(Arc::clone(loader)),
            (source, _) => source.clone(),
        };
        let view = self.view().clone();
        let pipeline = self.pipeline().clone();
        let timeout = self.loader_timeout();
        let on_error = self.on_error().cloned();

        async move {
            match project_with_timeout(&source, &view, scope, &pipeline, timeout).await {
                Ok(rows) => {
                    debug!("Exported {} rows", rows.len());
                    rows
                }
                Err(err) => {
                    warn!("Export failed: {err}");
                    if let Some(on_error) = on_error {
                        on_error(&err);
                    }
                    Vec::new()
                }
            }
        }
        .boxed()
    }

    /// Exports rows as rendered cell text under the data column titles.
    pub fn export_table(&self, scope: ExportScope) -> BoxFuture<'static, ExportTable> {
        let columns = self.columns().to_vec();
        let rows = self.export(scope);
        async move { ExportTable::from_rows(&columns, &rows.await) }.boxed()
    }
}

/// Rendered rows ready for a file writer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExportTable {
    /// Titles of the data columns.
    pub headers: Vec<String>,
    /// One entry per row, one cell per header.
    pub rows: Vec<Vec<String>>,
}

impl ExportTable {
    /// Renders `rows` through the data columns; synthetic columns are skipped.
    pub fn from_rows<R: GridRow>(columns: &[Column<R>], rows: &[R]) -> Self {
        let columns: Vec<&Column<R>> = columns.iter().filter(|c| c.is_data()).collect();
        Self {
            headers: columns.iter().map(|c| c.title.clone()).collect(),
            rows: rows
                .iter()
                .map(|row| columns.iter().map(|c| c.render_cell(row)).collect())
                .collect(),
        }
    }

    /// Returns the number of exported rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if no rows were exported.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::normalize_columns;
    use crate::model::Record;
    use crate::options::GridOptions;

    fn data() -> Vec<Record> {
        ["pear", "apple", "fig", "plum"]
            .iter()
            .enumerate()
            .map(|(i, name)| Record::new().set("id", i as i64).set("name", *name))
            .collect()
    }

    fn pipeline() -> LocalPipeline<Record> {
        let columns = normalize_columns(
            vec![Column::new("id"), Column::new("name").title("Fruit").sortable()],
            &GridOptions::default().with_selection(true),
            &[],
        )
        .unwrap();
        LocalPipeline::new(Arc::new(columns))
    }

    fn names(rows: &[Record]) -> Vec<String> {
        rows.iter().map(|r| r.value("name").to_string()).collect()
    }

    #[tokio::test]
    async fn test_static_projection_respects_scope() {
        let source = Source::from(data());
        let view = ViewState::new(2)
            .change_column_filter("name", Some("p".into()))
            .change_sort("name");

        let page = project(&source, &view, ExportScope::CurrentPage, &pipeline())
            .await
            .unwrap();
        assert_eq!(names(&page), vec!["apple", "pear"]);

        let all = project(&source, &view, ExportScope::AllFiltered, &pipeline())
            .await
            .unwrap();
        assert_eq!(names(&all), vec!["apple", "pear", "plum"]);
    }

    #[tokio::test]
    async fn test_remote_projection_requests_unbounded_window() {
        let source = Source::from_fn(|view: ViewState| async move {
            assert!(view.is_unbounded());
            Ok(crate::source::Page::new(data(), 4))
        });

        let rows = project(&source, &ViewState::new(2), ExportScope::AllFiltered, &pipeline())
            .await
            .unwrap();
        assert_eq!(rows.len(), 4);
    }

    #[test]
    fn test_table_skips_synthetic_columns() {
        let pipeline = pipeline();
        let table = ExportTable::from_rows(pipeline.columns(), &data()[..2]);

        assert_eq!(table.headers, vec!["id", "Fruit"]);
        assert_eq!(table.rows, vec![vec!["0", "pear"], vec!["1", "apple"]]);
    }
}
