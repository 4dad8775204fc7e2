//! Export documents: a JSON snapshot of the filtered view and a
//! fixed-column CSV of the transaction list.

use std::io::Write;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use spendsight_core::{FilterState, Transaction};

/// JSON export payload: timestamp, the filter that produced the view, and
/// the transactions themselves. Plain data throughout; `sequence_id` is
/// the only row correlation that survives export.
#[derive(Debug, Serialize)]
pub struct ExportDocument<'a> {
    pub export_date: String,
    pub filter_state: &'a FilterState,
    pub transactions: &'a [Transaction],
}

/// Render the JSON export document, pretty-printed.
pub fn json_document(
    transactions: &[Transaction],
    filter_state: &FilterState,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    let doc = ExportDocument {
        export_date: exported_at.to_rfc3339(),
        filter_state,
        transactions,
    };
    Ok(serde_json::to_string_pretty(&doc)?)
}

/// CSV column order is fixed; the date column carries the raw source text
/// and the gift column folds gift-sent and gift-purchase together.
const CSV_HEADERS: [&str; 10] = [
    "Date",
    "Game",
    "Item",
    "Type",
    "Payment Method",
    "Total",
    "Wallet Change",
    "Is Refund",
    "Is Gift",
    "Is Market",
];

/// Write the transaction list as CSV (RFC-4180 quoting).
pub fn write_csv<W: Write>(writer: W, transactions: &[Transaction]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADERS)?;
    for t in transactions {
        out.write_record(&[
            t.date_text.clone(),
            t.game_name.clone(),
            t.item_name.clone(),
            t.transaction_type.clone(),
            t.payment_method.clone(),
            t.total.to_string(),
            t.wallet_change.to_string(),
            t.is_refund.to_string(),
            t.counts_as_gift().to_string(),
            t.is_market_transaction.to_string(),
        ])?;
    }
    out.flush()?;
    Ok(())
}
