use clap::{Args, Parser, Subcommand, ValueHint};
use std::path::PathBuf;

/// Dyad reconciliation CLI (argument schema only)
#[derive(Parser, Debug)]
#[command(name = "dyadmender", version, about, propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Aggregate raw visit events into a dyad table
    Build(BuildArgs),

    /// Report dyad identifiers missing from the boundary table
    Check(CheckArgs),

    /// Cut a state subset from a national ZIP-to-ZCTA crosswalk
    Crosswalk(CrosswalkArgs),

    /// Resolve invalid dyad identifiers through the crosswalk
    Reconcile(ReconcileArgs),

    /// Resolve tied provider candidates to a single provider each
    Ties(TiesArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Visit events table (one row per visit)
    #[arg(value_hint = ValueHint::FilePath)]
    pub visits: PathBuf,

    /// Output dyad table
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: PathBuf,

    /// Field holding the member (recipient) ZIP
    #[arg(short, long)]
    pub member_field: String,

    /// Field holding the provider ZIP
    #[arg(short, long)]
    pub provider_field: String,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Dyad table to check
    #[arg(value_hint = ValueHint::FilePath)]
    pub dyads: PathBuf,

    /// Boundary table holding the valid ZCTAs
    #[arg(value_hint = ValueHint::FilePath)]
    pub boundary: PathBuf,

    /// Write the missing-identifier report as JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct CrosswalkArgs {
    /// National crosswalk table
    #[arg(value_hint = ValueHint::FilePath)]
    pub input: PathBuf,

    /// Output crosswalk table
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: PathBuf,

    /// State tokens to keep, e.g. --state IA --state Iowa
    #[arg(long = "state", required = true)]
    pub states: Vec<String>,

    /// ZIP table to annotate with a ZCTA column from the subset crosswalk
    #[arg(long, value_hint = ValueHint::FilePath, requires = "zips_out")]
    pub zips: Option<PathBuf>,

    /// Where to write the annotated ZIP table
    #[arg(long, value_hint = ValueHint::FilePath, requires = "zips")]
    pub zips_out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ReconcileArgs {
    /// Dyad table
    #[arg(value_hint = ValueHint::FilePath)]
    pub dyads: PathBuf,

    /// Boundary table holding the valid ZCTAs
    #[arg(value_hint = ValueHint::FilePath)]
    pub boundary: PathBuf,

    /// ZIP-to-ZCTA crosswalk table
    #[arg(value_hint = ValueHint::FilePath)]
    pub crosswalk: PathBuf,

    /// Name of the dyad visits field
    #[arg(long, default_value = "VISITS_DYAD")]
    pub visits_field: String,

    /// Where to write the reconciled dyad table
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub out_dyads: PathBuf,

    /// Where to write the rewritten boundary table
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub out_boundary: PathBuf,

    /// Write the reconciliation report as JSON
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub report: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct TiesArgs {
    /// Table of tied recipient/provider rows
    #[arg(value_hint = ValueHint::FilePath)]
    pub ties: PathBuf,

    /// Polygon neighbor table (source, neighbor, shared boundary length)
    #[arg(value_hint = ValueHint::FilePath)]
    pub neighbors: PathBuf,

    /// Centroid table (identifier, longitude, latitude)
    #[arg(value_hint = ValueHint::FilePath)]
    pub centroids: PathBuf,

    /// Output table with losing candidate rows dropped
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    pub out: PathBuf,
}
