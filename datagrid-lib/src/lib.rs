//! Data grid engine
//!
//! Reconciles paginated, filterable and sortable tabular data from either a
//! static in-memory collection or a remote paged loader. Presentation layers
//! consume a [`GridSnapshot`](engine::GridSnapshot) per render cycle and drive
//! the grid through its `on_*` transition methods.

pub mod column;
pub mod engine;
pub mod error;
pub mod export;
pub mod mode;
pub mod model;
pub mod options;
pub mod selection;
pub mod source;
pub mod view;

pub use engine::Grid;
pub use engine::GridBuilder;
pub use engine::GridSnapshot;
pub use options::GridOptions;
