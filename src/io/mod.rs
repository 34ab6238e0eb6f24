mod csv;

pub use csv::{read_table, sniff_delimiter, write_table};
