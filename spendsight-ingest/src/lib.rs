//! spendsight-ingest: raw ledger-row descriptors, markup-fragment helpers,
//! locale-tolerant field parsers, and the record extractor.

pub mod extractor;
pub mod fields;
pub mod markup;
pub mod types;

pub use extractor::{extract_row, extract_rows};
pub use fields::{extract_currency, parse_amount, parse_date};
pub use types::RawRow;
