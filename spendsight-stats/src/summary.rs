//! Summary statistics over a (filtered) transaction collection.
//!
//! Pure and recomputed in full on every call: same input, same output. An
//! empty collection yields a well-formed all-zero result, and undated
//! records stay in the money totals while dropping out of anything
//! time-bucketed.

use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use spendsight_core::{FALLBACK_CURRENCY, Transaction};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStats {
    pub currency: char,
    pub total_transactions: usize,
    /// Gross spend: everything but funding, refunds, and market sales.
    pub total_spent: f64,
    /// total_spent minus refunds and market earnings.
    pub net_spent: f64,
    pub total_wallet_funded: f64,
    pub total_refunded: f64,
    pub refund_count: usize,
    pub total_game_purchases: f64,
    pub game_purchase_count: usize,
    pub total_in_game: f64,
    pub in_game_count: usize,
    pub total_market_spent: f64,
    pub total_market_earned: f64,
    pub market_net: f64,
    pub market_transaction_count: usize,
    pub total_gift_value: f64,
    pub gift_count: usize,
    /// Purchase-size stats over non-market spending with a positive total.
    pub avg_purchase: f64,
    pub median_purchase: f64,
    pub largest_purchase: f64,
    pub largest_purchase_game: String,
    pub largest_purchase_date: Option<NaiveDate>,
    pub smallest_purchase: f64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub account_age_days: i64,
    pub account_age: String,
    pub avg_per_day: f64,
    pub avg_per_week: f64,
    pub avg_per_month: f64,
    pub avg_per_year: f64,
    pub days_since_last_purchase: i64,
    pub avg_days_between_purchases: i64,
    /// "YYYY-MM" with the highest spend. Ties resolve in map-iteration
    /// order, i.e. non-deterministically.
    pub peak_month: Option<String>,
    pub peak_month_amount: f64,
    pub unique_games: usize,
}

/// Median with mean-of-two-middles on even counts. Input need not be sorted.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let n = sorted.len();
    if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    }
}

/// Compute summary statistics. `today` anchors the days-since-last metric.
pub fn summarize(transactions: &[Transaction], today: NaiveDate) -> SummaryStats {
    let spending: Vec<&Transaction> = transactions.iter().filter(|t| t.is_spending()).collect();
    let refunds: Vec<&Transaction> = transactions.iter().filter(|t| t.is_refund).collect();
    let market_sales: Vec<&Transaction> =
        transactions.iter().filter(|t| t.is_market_sale).collect();
    let market_purchases: Vec<&Transaction> =
        transactions.iter().filter(|t| t.is_market_purchase).collect();
    let gifts: Vec<&Transaction> = transactions.iter().filter(|t| t.counts_as_gift()).collect();
    let in_game: Vec<&Transaction> = transactions.iter().filter(|t| t.is_in_game).collect();
    let game_purchases: Vec<&Transaction> =
        transactions.iter().filter(|t| t.is_game_purchase()).collect();

    let total_spent: f64 = spending.iter().map(|t| t.total).sum();
    let total_wallet_funded: f64 = transactions
        .iter()
        .filter(|t| t.is_wallet_funding)
        .map(|t| t.total)
        .sum();
    let total_refunded: f64 = refunds.iter().map(|t| t.wallet_change.abs()).sum();
    let total_market_earned: f64 = market_sales.iter().map(|t| t.wallet_change.abs()).sum();
    let total_market_spent: f64 = market_purchases.iter().map(|t| t.total).sum();
    let total_gift_value: f64 = gifts.iter().map(|t| t.total).sum();
    let total_in_game: f64 = in_game.iter().map(|t| t.total).sum();
    let total_game_purchases: f64 = game_purchases.iter().map(|t| t.total).sum();

    let purchase_amounts: Vec<f64> = spending
        .iter()
        .filter(|t| !t.is_market_transaction)
        .map(|t| t.total)
        .collect();

    let avg_purchase = if purchase_amounts.is_empty() {
        0.0
    } else {
        purchase_amounts.iter().sum::<f64>() / purchase_amounts.len() as f64
    };
    let median_purchase = median(&purchase_amounts);
    let largest_purchase = purchase_amounts.iter().copied().fold(0.0, f64::max);
    let smallest_purchase = purchase_amounts
        .iter()
        .copied()
        .fold(f64::INFINITY, f64::min);
    let smallest_purchase = if smallest_purchase.is_finite() {
        smallest_purchase
    } else {
        0.0
    };

    let mut largest_purchase_game = String::new();
    let mut largest_purchase_date = None;
    for t in spending.iter().filter(|t| !t.is_market_transaction) {
        if t.total == largest_purchase && largest_purchase > 0.0 {
            largest_purchase_game = if t.game_name.is_empty() {
                "Unknown".to_string()
            } else {
                t.game_name.clone()
            };
            largest_purchase_date = t.date;
        }
    }

    let mut dated: Vec<NaiveDate> = transactions.iter().filter_map(|t| t.date).collect();
    dated.sort();
    let first_date = dated.first().copied();
    let last_date = dated.last().copied();

    let mut months_span = 1i64;
    let mut years_span = 1i64;
    let mut weeks_span = 1i64;
    let mut account_age_days = 0i64;
    if let (Some(first), Some(last)) = (first_date, last_date) {
        months_span = ((last.year() - first.year()) as i64 * 12
            + (last.month() as i64 - first.month() as i64)
            + 1)
        .max(1);
        years_span = ((last.year() - first.year()) as i64 + 1).max(1);
        account_age_days = (last - first).num_days();
        weeks_span = ((account_age_days + 6) / 7).max(1);
    }

    let avg_per_month = total_spent / months_span as f64;
    let avg_per_year = total_spent / years_span as f64;
    let avg_per_week = total_spent / weeks_span as f64;
    let avg_per_day = if account_age_days > 0 {
        total_spent / account_age_days as f64
    } else {
        total_spent
    };

    let age_years = account_age_days / 365;
    let age_months = (account_age_days % 365) / 30;
    let account_age = if age_years > 0 {
        format!("{age_years}y {age_months}m")
    } else {
        format!("{age_months} months")
    };

    let days_since_last_purchase = last_date.map_or(0, |d| (today - d).num_days());

    let mut purchase_dates: Vec<NaiveDate> = spending.iter().filter_map(|t| t.date).collect();
    purchase_dates.sort();
    let avg_days_between_purchases = if purchase_dates.len() > 1 {
        let total_gap: i64 = purchase_dates
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).num_days())
            .sum();
        ((total_gap as f64) / (purchase_dates.len() - 1) as f64).round() as i64
    } else {
        0
    };

    let mut monthly_spend: HashMap<String, f64> = HashMap::new();
    for t in &spending {
        if let Some(key) = t.month_key() {
            *monthly_spend.entry(key).or_insert(0.0) += t.total;
        }
    }
    let (peak_month, peak_month_amount) = monthly_spend
        .iter()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(key, amount)| (Some(key.clone()), *amount))
        .unwrap_or((None, 0.0));

    let unique_games = spending
        .iter()
        .filter(|t| !t.is_market_transaction && !t.game_name.is_empty())
        .map(|t| t.game_name.as_str())
        .collect::<HashSet<_>>()
        .len();

    SummaryStats {
        currency: transactions
            .first()
            .map_or(FALLBACK_CURRENCY, |t| t.currency),
        total_transactions: transactions.len(),
        total_spent,
        net_spent: total_spent - total_refunded - total_market_earned,
        total_wallet_funded,
        total_refunded,
        refund_count: refunds.len(),
        total_game_purchases,
        game_purchase_count: game_purchases.len(),
        total_in_game,
        in_game_count: in_game.len(),
        total_market_spent,
        total_market_earned,
        market_net: total_market_earned - total_market_spent,
        market_transaction_count: market_sales.len() + market_purchases.len(),
        total_gift_value,
        gift_count: gifts.len(),
        avg_purchase,
        median_purchase,
        largest_purchase,
        largest_purchase_game,
        largest_purchase_date,
        smallest_purchase,
        first_date,
        last_date,
        account_age_days,
        account_age,
        avg_per_day,
        avg_per_week,
        avg_per_month,
        avg_per_year,
        days_since_last_purchase,
        avg_days_between_purchases,
        peak_month,
        peak_month_amount,
        unique_games,
    }
}
