mod centroids;
mod distance;
mod neighbors;
mod resolve;

pub use centroids::Centroids;
pub use distance::{EARTH_RADIUS_MILES, great_circle_miles};
pub use neighbors::NeighborTable;
pub use resolve::{TieGroup, filter_resolved, resolve, tie_groups};
