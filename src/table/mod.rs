mod id;
mod table;
mod value;

pub use id::AreaId;
pub use table::{GeoTable, Row, RowId};
pub use value::Value;
