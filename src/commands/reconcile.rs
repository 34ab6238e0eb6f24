use anyhow::{Context, Result};

use crate::cli::{Cli, ReconcileArgs};
use crate::crosswalk::{Crosswalk, ZctaSet, apply_crosswalk};
use crate::dyads::reconcile;
use crate::io::{read_table, write_table};

pub fn run(cli: &Cli, args: &ReconcileArgs) -> Result<()> {
    let (mut dyads, dyads_delim) = read_table(&args.dyads)?;
    let (mut boundary, boundary_delim) = read_table(&args.boundary)?;
    let (crosswalk_table, _) = read_table(&args.crosswalk)?;

    let crosswalk = Crosswalk::from_table(&crosswalk_table)?;
    let zctas = ZctaSet::from_table(&boundary)?;
    if cli.verbose > 0 {
        eprintln!(
            "[reconcile] {} dyad rows, {} ZCTAs, {} crosswalk entries",
            dyads.len(),
            zctas.len(),
            crosswalk.len()
        );
    }

    let report = reconcile(&mut dyads, &crosswalk, &zctas, &args.visits_field)?;
    let rewritten = apply_crosswalk(&mut boundary, &crosswalk)?;

    write_table(&dyads, &args.out_dyads, dyads_delim)?;
    write_table(&boundary, &args.out_boundary, boundary_delim)?;

    eprintln!(
        "[reconcile] {} recipient / {} provider identifiers resolved",
        report.rec_resolved.len(),
        report.prov_resolved.len()
    );
    eprintln!(
        "[reconcile] {} recipient / {} provider identifiers not in the crosswalk",
        report.rec_unresolved.len(),
        report.prov_unresolved.len()
    );
    eprintln!(
        "[reconcile] {} duplicate rows merged, {} boundary identifiers rewritten",
        report.rows_merged, rewritten
    );
    match report.missed_fraction {
        Some(fraction) => {
            eprintln!("[reconcile] {:.4}% of visits will be unaccounted for", fraction * 100.0)
        }
        None => eprintln!("[reconcile] table has no visits; unaccounted fraction is undefined"),
    }

    if let Some(path) = &args.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("[reconcile] failed to write report to {}", path.display()))?;
    }
    Ok(())
}
