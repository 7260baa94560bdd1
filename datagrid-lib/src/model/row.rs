//! Row contract

use std::sync::Arc;

use super::Value;

/// Stable, unique key of a row, produced by the caller's identity function.
pub type RowId = String;

/// Caller-supplied mapping from a row to its identity.
pub type IdentityFn<R> = Arc<dyn Fn(&R) -> RowId + Send + Sync>;

/// Trait for items that can be displayed as rows in a grid.
///
/// The engine only reads the declared column fields through [`value`](Self::value);
/// everything else about the row is opaque to it.
///
/// # Example
///
/// ```
/// use datagrid_lib::model::{GridRow, Value};
///
/// #[derive(Clone)]
/// struct User {
///     name: String,
///     age: i64,
/// }
///
/// impl GridRow for User {
///     fn value(&self, field: &str) -> Value {
///         match field {
///             "name" => self.name.clone().into(),
///             "age" => self.age.into(),
///             _ => Value::Null,
///         }
///     }
/// }
/// ```
pub trait GridRow: Clone + Send + Sync + 'static {
    /// Returns the value of a field, or [`Value::Null`] when the row has none.
    fn value(&self, field: &str) -> Value;
}
