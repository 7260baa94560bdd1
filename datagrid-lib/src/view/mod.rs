//! View parameters: pagination window, sorting and filtering.
//!
//! - [`ViewState`] - the immutable snapshot and its transitions
//! - [`ColumnFilter`] - what a user typed into a column filter cell
//! - [`Filter`] - the advanced predicate tree
//! - [`SortDirection`] - ascending or descending
//! - [`PageInfo`] - footer summary derived from a view and a row count

mod filter;
mod order;
mod state;

pub use filter::ColumnFilter;
pub use filter::Filter;
pub use order::SortDirection;
pub use state::PageInfo;
pub use state::ViewState;
