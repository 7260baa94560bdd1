//! Remote loader trait and closure adapter.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use super::Page;
use crate::error::LoaderError;
use crate::view::ViewState;

/// Trait for remote paged loaders.
///
/// A loader receives the full view (window, sort and filters) and returns
/// exactly the rows of that window together with the total number of
/// matching rows. The engine trusts both verbatim and never filters, sorts or
/// slices a remote page itself.
///
/// # Example
///
/// ```ignore
/// use datagrid_lib::source::{Page, RemoteLoader};
///
/// struct Accounts { client: HttpClient }
///
/// #[async_trait]
/// impl RemoteLoader<Account> for Accounts {
///     async fn load(&self, view: &ViewState) -> Result<Page<Account>, LoaderError> {
///         let response = self.client
///             .accounts(view.start_index(), view.rows_per_page(), view.sort_field())
///             .await
///             .map_err(LoaderError::other)?;
///         Ok(Page::new(response.items, response.total))
///     }
/// }
/// ```
#[async_trait]
pub trait RemoteLoader<R: Send>: Send + Sync {
    /// Loads the window described by `view`.
    async fn load(&self, view: &ViewState) -> Result<Page<R>, LoaderError>;
}

/// Adapts an async closure into a [`RemoteLoader`].
pub struct LoaderFn<F>(pub F);

#[async_trait]
impl<R, F, Fut> RemoteLoader<R> for LoaderFn<F>
where
    R: Send + 'static,
    F: Fn(ViewState) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<R>, LoaderError>> + Send,
{
    async fn load(&self, view: &ViewState) -> Result<Page<R>, LoaderError> {
        (self.0)(view.clone()).await
    }
}

#[async_trait]
impl<R, L> RemoteLoader<R> for Arc<L>
where
    R: Send + 'static,
    L: RemoteLoader<R> + ?Sized,
{
    async fn load(&self, view: &ViewState) -> Result<Page<R>, LoaderError> {
        (**self).load(view).await
    }
}
