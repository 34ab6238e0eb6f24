use anyhow::{Context, Result};

use crate::cli::{CheckArgs, Cli};
use crate::crosswalk::ZctaSet;
use crate::dyads::missing_ids;
use crate::io::read_table;

pub fn run(cli: &Cli, args: &CheckArgs) -> Result<()> {
    let (dyads, _) = read_table(&args.dyads)?;
    let (boundary, _) = read_table(&args.boundary)?;
    let zctas = ZctaSet::from_table(&boundary)?;

    if cli.verbose > 0 {
        eprintln!("[check] {} dyad rows against {} ZCTAs", dyads.len(), zctas.len());
    }

    let report = missing_ids(&dyads, &zctas)?;
    if report.is_clean() {
        eprintln!("[check] every identifier in the dyad table is a known ZCTA");
    } else {
        eprintln!(
            "[check] {} recipient / {} provider identifiers are not in the boundary table",
            report.rec_missing.len(),
            report.prov_missing.len()
        );
        if cli.verbose > 0 {
            for id in report.missing() {
                eprintln!("[check]   missing {id}");
            }
        }
    }

    if let Some(path) = &args.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("[check] failed to write report to {}", path.display()))?;
    }
    Ok(())
}
