//! Load status of a grid.

use serde::Serialize;

/// Where the grid is in its load cycle.
///
/// `Idle` only exists between [`GridBuilder::build`](super::GridBuilder::build)
/// and [`Grid::mount`](super::Grid::mount). Every later transition goes through
/// `Loading` and ends in `Settled`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Settled,
}

impl LoadState {
    /// Returns `true` while a fetch is outstanding.
    pub fn is_loading(self) -> bool {
        self == Self::Loading
    }
}
