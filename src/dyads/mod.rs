mod build;
mod check;
mod reconcile;

pub use build::build_dyads;
pub use check::{CheckReport, missing_ids};
pub use reconcile::{ReconcileReport, reconcile};
