use anyhow::Result;

use crate::cli::{Cli, TiesArgs};
use crate::io::{read_table, write_table};
use crate::ties::{Centroids, NeighborTable, filter_resolved, resolve};

pub fn run(cli: &Cli, args: &TiesArgs) -> Result<()> {
    let (ties, delim) = read_table(&args.ties)?;
    let (neighbor_table, _) = read_table(&args.neighbors)?;
    let (centroid_table, _) = read_table(&args.centroids)?;

    let neighbors = NeighborTable::from_table(&neighbor_table)?;
    let centroids = Centroids::from_table(&centroid_table)?;
    if cli.verbose > 0 {
        eprintln!(
            "[ties] {} rows, {} neighbor edges, {} centroids",
            ties.len(),
            neighbors.len(),
            centroids.len()
        );
    }

    let resolved = resolve(&ties, &neighbors, &centroids)?;
    let out = filter_resolved(&ties, &resolved)?;
    write_table(&out, &args.out, delim)?;

    eprintln!(
        "[ties] {} ties resolved, {} of {} rows kept -> {}",
        resolved.len(),
        out.len(),
        ties.len(),
        args.out.display()
    );
    Ok(())
}
