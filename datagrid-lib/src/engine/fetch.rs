//! Remote fetches and their completions.
//!
//! A [`Fetch`] is an owned future that does not borrow the grid. The caller
//! drives it on whatever executor it likes and hands the resulting
//! [`Completion`] back to [`Grid::complete`](super::Grid::complete), which
//! decides whether the result is still current.
//!
//! A configured loader timeout runs on the tokio timer. Outside a tokio
//! runtime such a fetch settles with [`LoaderError::Other`] instead of
//! loading.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::Context;
use std::task::Poll;
use std::time::Duration;

use futures::FutureExt;
use futures::StreamExt;
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use log::warn;

use super::Grid;
use crate::error::LoaderError;
use crate::model::GridRow;
use crate::source::Page;
use crate::source::RemoteLoader;
use crate::view::ViewState;

/// Result of a finished fetch, tagged with the request it answers.
pub struct Completion<R> {
    /// Sequence number of the request, increasing per grid.
    pub ticket: u64,
    /// The view the request was issued for.
    pub view: ViewState,
    /// Whether the rows extend the visible rows instead of replacing them.
    pub append: bool,
    /// What the loader returned.
    pub result: Result<Page<R>, LoaderError>,
}

impl<R> fmt::Debug for Completion<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("ticket", &self.ticket)
            .field("append", &self.append)
            .field("rows", &self.result.as_ref().map(Page::len))
            .finish_non_exhaustive()
    }
}

/// An in-flight remote load.
#[must_use = "a fetch does nothing unless it is awaited and passed to Grid::complete"]
pub struct Fetch<R> {
    ticket: u64,
    view: ViewState,
    inner: BoxFuture<'static, Completion<R>>,
}

impl<R: Send + 'static> Fetch<R> {
    pub(crate) fn new(
        ticket: u64,
        view: ViewState,
        append: bool,
        loader: Arc<dyn RemoteLoader<R>>,
        timeout: Option<Duration>,
    ) -> Self {
        let request = view.clone();
        let inner = async move {
            let result = load_with_timeout(loader.as_ref(), &request, timeout).await;
            Completion {
                ticket,
                view: request,
                append,
                result,
            }
        }
        .boxed();

        Self {
            ticket,
            view,
            inner,
        }
    }
}

impl<R> Fetch<R> {
    /// Returns the ticket of this fetch.
    pub fn ticket(&self) -> u64 {
        self.ticket
    }

    /// Returns the view this fetch loads.
    pub fn view(&self) -> &ViewState {
        &self.view
    }
}

impl<R> Future for Fetch<R> {
    type Output = Completion<R>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.inner.as_mut().poll(cx)
    }
}

impl<R> fmt::Debug for Fetch<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fetch")
            .field("ticket", &self.ticket)
            .field("view", &self.view)
            .finish_non_exhaustive()
    }
}

/// Invokes `loader`, bounded by `timeout` when one is configured.
pub(crate) async fn load_with_timeout<R: Send>(
    loader: &dyn RemoteLoader<R>,
    view: &ViewState,
    timeout: Option<Duration>,
) -> Result<Page<R>, LoaderError> {
    let Some(limit) = timeout else {
        return loader.load(view).await;
    };
    if let Err(err) = tokio::runtime::Handle::try_current() {
        warn!("Loader timeout of {limit:?} needs a tokio runtime: {err}");
        return Err(LoaderError::other(err));
    }
    tokio::time::timeout(limit, loader.load(view))
        .await
        .map_err(|_| LoaderError::Timeout(limit))?
}

/// A set of fetches that resolve in whatever order their loaders finish.
///
/// # Example
///
/// ```ignore
/// let mut fetches = Fetches::new();
/// fetches.push(grid.on_change_filter("name", Some("ada".into())));
/// fetches.push(grid.on_change_sort("age"));
/// fetches.drain_into(&mut grid).await;
/// ```
pub struct Fetches<R> {
    pending: FuturesUnordered<Fetch<R>>,
}

impl<R> Default for Fetches<R> {
    fn default() -> Self {
        Self {
            pending: FuturesUnordered::new(),
        }
    }
}

impl<R> Fetches<R> {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fetch. `None` is ignored, so transition results can be pushed
    /// directly.
    pub fn push(&mut self, fetch: impl Into<Option<Fetch<R>>>) {
        if let Some(fetch) = fetch.into() {
            self.pending.push(fetch);
        }
    }

    /// Returns the number of fetches still pending.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Waits for the next fetch to finish.
    pub async fn next(&mut self) -> Option<Completion<R>> {
        self.pending.next().await
    }
}

impl<R: GridRow> Fetches<R> {
    /// Feeds every completion into `grid` as it arrives.
    ///
    /// Returns how many completions were applied; the rest were stale.
    pub async fn drain_into(&mut self, grid: &mut Grid<R>) -> usize {
        let mut applied = 0;
        while let Some(completion) = self.next().await {
            if grid.complete(completion) {
                applied += 1;
            }
        }
        applied
    }
}
