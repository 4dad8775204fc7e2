//! Filter state and the transaction predicate.
//!
//! `FilterState` is a plain value object owned by whatever drives the
//! dashboard; the core only ever reads it. Groups combine with AND, the
//! type set combines with OR.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::transaction::Transaction;

/// Selectable transaction type facets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeTag {
    Purchases,
    Refunds,
    Market,
    Gifts,
    InGame,
    Wallet,
}

impl TypeTag {
    /// Facet predicate for this tag.
    pub fn matches(&self, t: &Transaction) -> bool {
        match self {
            TypeTag::Purchases => t.is_game_purchase(),
            TypeTag::Refunds => t.is_refund,
            TypeTag::Market => t.is_market_transaction,
            TypeTag::Gifts => t.counts_as_gift(),
            TypeTag::InGame => t.is_in_game,
            TypeTag::Wallet => t.is_wallet_funding,
        }
    }
}

impl std::str::FromStr for TypeTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "purchases" => Ok(TypeTag::Purchases),
            "refunds" => Ok(TypeTag::Refunds),
            "market" => Ok(TypeTag::Market),
            "gifts" => Ok(TypeTag::Gifts),
            "ingame" => Ok(TypeTag::InGame),
            "wallet" => Ok(TypeTag::Wallet),
            other => Err(format!("unknown transaction type: {other}")),
        }
    }
}

/// Active filter configuration. All fields unset means "match everything".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub types: Vec<TypeTag>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    /// Case-insensitive substring over game and item name.
    pub search: String,
}

impl FilterState {
    /// True when no constraint is set.
    pub fn is_empty(&self) -> bool {
        *self == FilterState::default()
    }

    /// Does `t` satisfy every active filter group?
    ///
    /// Undated records bypass the date bounds: a missing date is a parse
    /// gap, not evidence the row is out of range.
    pub fn matches(&self, t: &Transaction) -> bool {
        if let (Some(from), Some(date)) = (self.date_from, t.date) {
            if date < from {
                return false;
            }
        }
        if let (Some(to), Some(date)) = (self.date_to, t.date) {
            if date > to {
                return false;
            }
        }

        if !self.types.is_empty() && !self.types.iter().any(|tag| tag.matches(t)) {
            return false;
        }

        let amount = t.filter_amount();
        if let Some(min) = self.price_min {
            if amount < min {
                return false;
            }
        }
        if let Some(max) = self.price_max {
            if amount > max {
                return false;
            }
        }

        if !self.search.is_empty() {
            let needle = self.search.to_lowercase();
            let game = t.game_name.to_lowercase();
            let item = t.item_name.to_lowercase();
            if !game.contains(&needle) && !item.contains(&needle) {
                return false;
            }
        }

        true
    }

    /// Apply this filter to a collection.
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions.iter().filter(|t| self.matches(t)).collect()
    }
}
