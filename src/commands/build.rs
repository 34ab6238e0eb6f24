use anyhow::Result;

use crate::cli::{BuildArgs, Cli};
use crate::dyads::build_dyads;
use crate::io::{read_table, write_table};

pub fn run(cli: &Cli, args: &BuildArgs) -> Result<()> {
    let (events, delim) = read_table(&args.visits)?;
    if cli.verbose > 0 {
        eprintln!("[build] {} visit events from {}", events.len(), args.visits.display());
    }

    let dyads = build_dyads(&events, &args.member_field, &args.provider_field)?;
    write_table(&dyads, &args.out, delim)?;

    if cli.verbose > 0 {
        eprintln!("[build] {} dyad rows -> {}", dyads.len(), args.out.display());
    }
    Ok(())
}
