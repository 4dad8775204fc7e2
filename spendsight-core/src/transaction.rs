//! Transaction record types for the purchase-history ledger

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Fallback currency symbol when none can be detected from the source text.
pub const FALLBACK_CURRENCY: char = '€';

/// One classified row of the purchase-history ledger.
///
/// Immutable once built by the extractor. Raw source text is retained next
/// to every parsed value so exports can reproduce the ledger verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Parsed calendar date; `None` when the source text was unparseable.
    pub date: Option<NaiveDate>,
    pub date_text: String,
    /// Whitespace-normalized; may be empty.
    pub game_name: String,
    /// Whitespace-normalized; may be empty.
    pub item_name: String,
    /// Free-text type label from the source (e.g. "Kauf", "Purchase").
    pub transaction_type: String,
    pub payment_method: String,
    /// Magnitude as printed in the total column.
    pub total: f64,
    pub total_text: String,
    /// Signed wallet delta; positive means credit in.
    pub wallet_change: f64,
    pub wallet_change_text: String,
    pub wallet_balance: f64,
    pub currency: char,
    pub is_refund: bool,
    pub is_wallet_funding: bool,
    pub is_gift: bool,
    pub is_market_transaction: bool,
    pub is_market_sale: bool,
    pub is_market_purchase: bool,
    pub is_in_game: bool,
    pub is_gift_purchase: bool,
    pub gift_recipient: String,
    /// Number of marketplace trades folded into this row (>= 1).
    pub market_transaction_count: u32,
    /// Stable position among parsed rows; UI row correlation only.
    pub sequence_id: usize,
}

impl Transaction {
    /// Amount used for price filtering: the printed total, or the absolute
    /// wallet delta when the total column was zero/empty.
    pub fn filter_amount(&self) -> f64 {
        if self.total != 0.0 {
            self.total
        } else {
            self.wallet_change.abs()
        }
    }

    /// Money going out: everything except wallet funding, refunds, and
    /// market sales, with a nonzero printed total.
    pub fn is_spending(&self) -> bool {
        !self.is_wallet_funding && !self.is_refund && !self.is_market_sale && self.total > 0.0
    }

    /// Plain store purchase: spending that is none of the special facets.
    pub fn is_game_purchase(&self) -> bool {
        !self.is_wallet_funding
            && !self.is_refund
            && !self.is_market_transaction
            && !self.is_gift_purchase
            && !self.is_in_game
            && self.total > 0.0
    }

    /// Gift-sent rows and gift-purchase rows both count as gifts.
    pub fn counts_as_gift(&self) -> bool {
        self.is_gift || self.is_gift_purchase
    }

    /// "YYYY-MM" bucket key, if dated.
    pub fn month_key(&self) -> Option<String> {
        self.date.map(|d| format!("{:04}-{:02}", d.year(), d.month()))
    }

    /// "YYYY" bucket key, if dated.
    pub fn year_key(&self) -> Option<String> {
        self.date.map(|d| d.year().to_string())
    }
}
