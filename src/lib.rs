#![doc = "Dyadmender public API"]
pub mod cli;
pub mod commands;
mod crosswalk;
mod dyads;
mod io;
mod table;
mod ties;

#[doc(inline)]
pub use table::{AreaId, GeoTable, Row, RowId, Value};

#[doc(inline)]
pub use crosswalk::{Crosswalk, ZctaSet, annotate_zcta, apply_crosswalk, state_subset};

#[doc(inline)]
pub use dyads::{CheckReport, ReconcileReport, build_dyads, missing_ids, reconcile};

#[doc(inline)]
pub use ties::{
    Centroids, EARTH_RADIUS_MILES, NeighborTable, TieGroup, filter_resolved, great_circle_miles,
    resolve, tie_groups,
};

#[doc(inline)]
pub use io::{read_table, sniff_delimiter, write_table};
