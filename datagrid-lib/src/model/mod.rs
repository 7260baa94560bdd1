//! Row model: the row contract, dynamic values and a ready-made record type.

mod record;
mod row;
mod value;

pub use record::Record;
pub use row::GridRow;
pub use row::IdentityFn;
pub use row::RowId;
pub use value::Value;
