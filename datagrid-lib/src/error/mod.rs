//! Error types

mod config;
mod field;
mod grid;
mod loader;

pub use config::*;
pub use field::*;
pub use grid::*;
pub use loader::*;
