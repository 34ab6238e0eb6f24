use anyhow::Result;

use crate::cli::{Cli, CrosswalkArgs};
use crate::crosswalk::{Crosswalk, annotate_zcta, state_subset};
use crate::io::{read_table, write_table};

pub fn run(cli: &Cli, args: &CrosswalkArgs) -> Result<()> {
    let (national, delim) = read_table(&args.input)?;
    if cli.verbose > 0 {
        eprintln!("[crosswalk] {} rows in national table", national.len());
    }

    let subset = state_subset(&national, &args.states)?;
    write_table(&subset, &args.out, delim)?;
    if cli.verbose > 0 {
        eprintln!(
            "[crosswalk] {} rows kept for {} -> {}",
            subset.len(),
            args.states.join("/"),
            args.out.display()
        );
    }

    // Optionally push the subset's assignments onto a ZIP table.
    if let (Some(zips_path), Some(out_path)) = (&args.zips, &args.zips_out) {
        let crosswalk = Crosswalk::from_table(&subset)?;
        let (mut zips, zips_delim) = read_table(zips_path)?;
        let annotated = annotate_zcta(&mut zips, &crosswalk)?;
        write_table(&zips, out_path, zips_delim)?;
        if cli.verbose > 0 {
            eprintln!(
                "[crosswalk] {annotated} of {} ZIP rows annotated -> {}",
                zips.len(),
                out_path.display()
            );
        }
    }
    Ok(())
}
