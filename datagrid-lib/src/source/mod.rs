//! Data sources: a static collection or a remote paged loader.
//!
//! The kind of a source is decided once, when the [`Source`] value is built,
//! and never changes for the lifetime of a grid.

mod loader;
mod page;

pub use loader::LoaderFn;
pub use loader::RemoteLoader;
pub use page::Page;

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::error::LoaderError;
use crate::view::ViewState;

/// The two shapes of data a grid can be fed.
pub enum Source<R> {
    /// Fully materialized rows, filtered, sorted and paged locally.
    Static(Arc<Vec<R>>),
    /// A loader invoked per window.
    Remote(Arc<dyn RemoteLoader<R>>),
}

/// Kind of a [`Source`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Static,
    Remote,
}

impl<R: Send + 'static> Source<R> {
    /// Creates a remote source from a loader.
    pub fn remote(loader: impl RemoteLoader<R> + 'static) -> Self {
        Self::Remote(Arc::new(loader))
    }

    /// Creates a remote source from an async closure.
    ///
    /// # Example
    ///
    /// ```
    /// use datagrid_lib::model::Record;
    /// use datagrid_lib::source::{Page, Source, SourceKind};
    ///
    /// let source = Source::<Record>::from_fn(|view| async move {
    ///     Ok(Page::new(Vec::new(), view.start_index()))
    /// });
    /// assert_eq!(source.kind(), SourceKind::Remote);
    /// ```
    pub fn from_fn<F, Fut>(loader: F) -> Self
    where
        F: Fn(ViewState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Page<R>, LoaderError>> + Send + 'static,
    {
        Self::Remote(Arc::new(LoaderFn(loader)))
    }
}

impl<R> Source<R> {
    /// Returns the kind of this source.
    pub fn kind(&self) -> SourceKind {
        classify(self)
    }
}

/// Classifies a source.
pub fn classify<R>(source: &Source<R>) -> SourceKind {
    match source {
        Source::Static(_) => SourceKind::Static,
        Source::Remote(_) => SourceKind::Remote,
    }
}

impl<R> Clone for Source<R> {
    fn clone(&self) -> Self {
        match self {
            Self::Static(rows) => Self::Static(Arc::clone(rows)),
            Self::Remote(loader) => Self::Remote(Arc::clone(loader)),
        }
    }
}

impl<R> fmt::Debug for Source<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(rows) => f.debug_tuple("Static").field(&rows.len()).finish(),
            Self::Remote(_) => f.debug_tuple("Remote").finish(),
        }
    }
}

impl<R> From<Vec<R>> for Source<R> {
    fn from(rows: Vec<R>) -> Self {
        Self::Static(Arc::new(rows))
    }
}

impl<R> From<Arc<Vec<R>>> for Source<R> {
    fn from(rows: Arc<Vec<R>>) -> Self {
        Self::Static(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Record;

    #[test]
    fn test_classify() {
        let rows: Source<Record> = vec![Record::new()].into();
        assert_eq!(classify(&rows), SourceKind::Static);

        let remote = Source::<Record>::from_fn(|_| async { Ok(Page::empty()) });
        assert_eq!(classify(&remote), SourceKind::Remote);
    }

    #[tokio::test]
    async fn test_loader_fn_receives_view() {
        let loader = LoaderFn(|view: ViewState| async move {
            Ok(Page::new(vec![view.start_index()], 100))
        });

        let page = loader.load(&ViewState::new(10).change_page(3)).await.unwrap();
        assert_eq!(page.rows(), &[30]);
        assert_eq!(page.total_count(), 100);
    }
}
