//! Delimited-text reading and writing.

use std::{fs::File, io::Cursor, path::Path};

use anyhow::{Context, Result, ensure};
use polars::{
    frame::DataFrame,
    io::{SerReader, SerWriter},
    prelude::{Column, CsvReadOptions, CsvWriter, NamedFrom},
    series::Series,
};

use crate::table::{GeoTable, Value};

/// Delimiters tried, in order, when sniffing a file.
const CANDIDATES: [u8; 4] = [b',', b'\t', b';', b'|'];

/// Guess the delimiter from the header line of a file.
///
/// The candidate that splits the header into the most fields wins; a file
/// with no recognizable delimiter is treated as comma-separated.
pub fn sniff_delimiter(sample: &str) -> u8 {
    let header = sample.lines().next().unwrap_or("");
    let mut best = (b',', header.matches(',').count());
    for delim in &CANDIDATES[1..] {
        let count = header.matches(*delim as char).count();
        if count > best.1 {
            best = (*delim, count);
        }
    }
    best.0
}

/// Read a delimited-text file with a header row into a [`GeoTable`].
///
/// Every cell is ingested as text so ZIP/ZCTA identifiers keep their leading
/// zeros; blank cells become [`Value::Null`]. Returns the table together with
/// the sniffed delimiter so output can be written back in the same dialect.
pub fn read_table(path: &Path) -> Result<(GeoTable, u8)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("[io::csv] failed to open {}", path.display()))?;
    let delim = sniff_delimiter(&text);

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .map_parse_options(|po| po.with_separator(delim))
        .with_infer_schema_length(Some(0))
        .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
        .finish()
        .with_context(|| format!("[io::csv] failed to read {}", path.display()))?;

    Ok((dataframe_to_table(&df)?, delim))
}

/// Write a [`GeoTable`] to `path` using `delim` as the field separator,
/// header first, rows in table order. Null cells are written empty.
pub fn write_table(table: &GeoTable, path: &Path, delim: u8) -> Result<()> {
    let columns = table
        .fields()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<Option<String>> =
                table.rows().map(|row| row.get(idx).to_csv()).collect();
            Series::new(name.as_str().into(), cells).into()
        })
        .collect::<Vec<Column>>();

    let mut df = DataFrame::new(columns)
        .with_context(|| format!("[io::csv] failed to assemble output for {}", path.display()))?;

    let file = File::create(path)
        .with_context(|| format!("[io::csv] failed to create {}", path.display()))?;
    CsvWriter::new(file)
        .with_separator(delim)
        .finish(&mut df)
        .with_context(|| format!("[io::csv] failed to write {}", path.display()))
}

fn dataframe_to_table(df: &DataFrame) -> Result<GeoTable> {
    ensure!(df.width() > 0, "[io::csv] input has no columns");

    let fields = df.get_column_names().iter().map(|name| name.to_string()).collect();
    let mut columns = Vec::with_capacity(df.width());
    for col in df.get_columns() {
        let chunked = col
            .str()
            .with_context(|| format!("[io::csv] field {:?} did not read as text", col.name()))?;
        columns.push(chunked.into_iter().collect::<Vec<Option<&str>>>());
    }

    let mut table = GeoTable::new(fields)?;
    for i in 0..df.height() {
        let cells = columns
            .iter()
            .map(|col| match col[i] {
                Some(text) if !text.trim().is_empty() => Value::from(text),
                _ => Value::Null,
            })
            .collect();
        table.push_row(cells)?;
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_common_delimiters() {
        assert_eq!(sniff_delimiter("rec,prov,visits\n1,2,3"), b',');
        assert_eq!(sniff_delimiter("rec\tprov\tvisits"), b'\t');
        assert_eq!(sniff_delimiter("rec;prov;visits"), b';');
        assert_eq!(sniff_delimiter("rec|prov|visits"), b'|');
    }

    #[test]
    fn sniff_defaults_to_comma() {
        assert_eq!(sniff_delimiter("justonefield"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    #[test]
    fn sniff_only_reads_the_header_line() {
        // Semicolons in the body must not outvote the header's commas.
        assert_eq!(sniff_delimiter("a,b\nx;y;z;w\nx;y;z;w"), b',');
    }

    #[test]
    fn round_trip_preserves_dialect_and_leading_zeros() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ties.txt");
        std::fs::write(&path, "REC_ZCTA|PROV_ZCTA|VISITS\n00601|52240|12\n52240||3\n").unwrap();

        let (table, delim) = read_table(&path).unwrap();
        assert_eq!(delim, b'|');
        assert_eq!(table.fields(), &["REC_ZCTA", "PROV_ZCTA", "VISITS"]);
        assert_eq!(table.len(), 2);

        let rows: Vec<_> = table.rows().collect();
        assert_eq!(rows[0].get(0).as_str(), Some("00601"));
        assert!(rows[1].get(1).is_null());
        assert_eq!(rows[1].int(2), Some(3));

        let out = dir.path().join("out.txt");
        write_table(&table, &out, delim).unwrap();
        let written = std::fs::read_to_string(&out).unwrap();
        assert_eq!(written, "REC_ZCTA|PROV_ZCTA|VISITS\n00601|52240|12\n52240||3\n");
    }

    #[test]
    fn missing_file_reports_path() {
        let err = read_table(Path::new("/no/such/table.csv")).unwrap_err();
        assert!(err.to_string().contains("/no/such/table.csv"));
    }
}
