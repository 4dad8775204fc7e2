//! Time-series bucketing and chart feeds.
//!
//! Buckets carry spend (non-funding, non-refund, non-market-sale rows),
//! market-sale earnings, and their difference. The monthly label range is
//! generated gap-free between the first and last dated transaction so a
//! quiet month shows up as zero instead of vanishing from the series.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use spendsight_core::Transaction;

const DAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    Month,
    Year,
}

/// Labels plus per-bucket amounts, parallel by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    pub labels: Vec<String>,
    pub spent: Vec<f64>,
    pub earned: Vec<f64>,
    pub profit: Vec<f64>,
}

fn bucket_key(t: &Transaction, group_by: GroupBy) -> Option<String> {
    match group_by {
        GroupBy::Month => t.month_key(),
        GroupBy::Year => t.year_key(),
    }
}

/// Every bucket label between the first and last dated transaction,
/// inclusive, regardless of whether anything was spent in it.
fn label_range(transactions: &[Transaction], group_by: GroupBy) -> Vec<String> {
    let mut dated: Vec<_> = transactions.iter().filter_map(|t| t.date).collect();
    dated.sort();
    let (Some(first), Some(last)) = (dated.first(), dated.last()) else {
        return Vec::new();
    };

    match group_by {
        GroupBy::Year => (first.year()..=last.year()).map(|y| y.to_string()).collect(),
        GroupBy::Month => {
            let mut labels = Vec::new();
            let (mut year, mut month) = (first.year(), first.month());
            loop {
                labels.push(format!("{year:04}-{month:02}"));
                if (year, month) == (last.year(), last.month()) {
                    break;
                }
                if month == 12 {
                    year += 1;
                    month = 1;
                } else {
                    month += 1;
                }
            }
            labels
        }
    }
}

/// Bucket spend and market earnings over time.
pub fn time_series(transactions: &[Transaction], group_by: GroupBy) -> TimeSeries {
    let labels = label_range(transactions, group_by);
    if labels.is_empty() {
        return TimeSeries::default();
    }

    let mut spent_by_key: HashMap<String, f64> = HashMap::new();
    let mut earned_by_key: HashMap<String, f64> = HashMap::new();
    for t in transactions {
        let Some(key) = bucket_key(t, group_by) else {
            continue;
        };
        if t.is_spending() {
            *spent_by_key.entry(key.clone()).or_insert(0.0) += t.total;
        }
        if t.is_market_sale {
            *earned_by_key.entry(key).or_insert(0.0) += t.wallet_change.abs();
        }
    }

    let spent: Vec<f64> = labels
        .iter()
        .map(|k| spent_by_key.get(k).copied().unwrap_or(0.0))
        .collect();
    let earned: Vec<f64> = labels
        .iter()
        .map(|k| earned_by_key.get(k).copied().unwrap_or(0.0))
        .collect();
    let profit: Vec<f64> = spent
        .iter()
        .zip(&earned)
        .map(|(s, e)| e - s)
        .collect();

    TimeSeries {
        labels,
        spent,
        earned,
        profit,
    }
}

/// Spend per category: plain game purchases, in-game, market purchases,
/// gifts. Shape matches what a category chart consumes.
pub fn category_totals(transactions: &[Transaction]) -> (Vec<&'static str>, Vec<f64>) {
    let mut games = 0.0;
    let mut in_game = 0.0;
    let mut market = 0.0;
    let mut gifts = 0.0;
    for t in transactions {
        if t.is_game_purchase() {
            games += t.total;
        }
        if t.is_in_game {
            in_game += t.total;
        }
        if t.is_market_purchase {
            market += t.total;
        }
        if t.counts_as_gift() {
            gifts += t.total;
        }
    }
    (
        vec!["Games", "In-Game", "Market", "Gifts"],
        vec![games, in_game, market, gifts],
    )
}

/// Top games by non-market spend, descending, at most `limit` entries.
pub fn top_games(transactions: &[Transaction], limit: usize) -> Vec<(String, f64)> {
    let mut by_game: HashMap<&str, f64> = HashMap::new();
    for t in transactions {
        if t.is_spending() && !t.is_market_transaction && !t.game_name.is_empty() {
            *by_game.entry(t.game_name.as_str()).or_insert(0.0) += t.total;
        }
    }
    let mut ranked: Vec<(String, f64)> = by_game
        .into_iter()
        .map(|(name, total)| (name.to_string(), total))
        .collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(limit);
    ranked
}

/// Day-of-week by calendar-month spending grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingHeatmap {
    pub day_labels: [&'static str; 7],
    pub month_labels: [&'static str; 12],
    /// `grid[day][month]`, day 0 = Sunday, month 0 = January.
    pub grid: Vec<Vec<f64>>,
}

/// Bucket spend into a 7x12 weekday/month grid. Undated rows are left out.
pub fn spending_heatmap(transactions: &[Transaction]) -> SpendingHeatmap {
    let mut grid = vec![vec![0.0; 12]; 7];
    for t in transactions.iter().filter(|t| t.is_spending()) {
        if let Some(d) = t.date {
            let day = d.weekday().num_days_from_sunday() as usize;
            grid[day][d.month0() as usize] += t.total;
        }
    }
    SpendingHeatmap {
        day_labels: DAY_LABELS,
        month_labels: MONTH_LABELS,
        grid,
    }
}

/// One row of a keyed total-plus-count breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub total: f64,
    pub count: usize,
}

fn collect_entries(buckets: HashMap<String, (f64, usize)>) -> Vec<BreakdownEntry> {
    buckets
        .into_iter()
        .map(|(label, (total, count))| BreakdownEntry {
            label,
            total,
            count,
        })
        .collect()
}

/// Spend total and purchase count per calendar year, newest year first.
/// Undated rows are left out.
pub fn yearly_breakdown(transactions: &[Transaction]) -> Vec<BreakdownEntry> {
    let mut by_year: HashMap<String, (f64, usize)> = HashMap::new();
    for t in transactions.iter().filter(|t| t.is_spending()) {
        if let Some(key) = t.year_key() {
            let entry = by_year.entry(key).or_insert((0.0, 0));
            entry.0 += t.total;
            entry.1 += 1;
        }
    }
    let mut entries = collect_entries(by_year);
    entries.sort_by(|a, b| b.label.cmp(&a.label));
    entries
}

/// Amount and row count per type label over every transaction, largest
/// total first. Rows with an empty type label land in "Unknown"; a zero
/// total falls back to the wallet delta.
pub fn type_breakdown(transactions: &[Transaction]) -> Vec<BreakdownEntry> {
    let mut by_type: HashMap<String, (f64, usize)> = HashMap::new();
    for t in transactions {
        let label = if t.transaction_type.is_empty() {
            "Unknown".to_string()
        } else {
            t.transaction_type.clone()
        };
        let entry = by_type.entry(label).or_insert((0.0, 0));
        entry.0 += t.filter_amount();
        entry.1 += 1;
    }
    let mut entries = collect_entries(by_type);
    entries.sort_by(|a, b| {
        b.total
            .total_cmp(&a.total)
            .then_with(|| a.label.cmp(&b.label))
    });
    entries
}

/// One row of the largest-purchases list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPurchase {
    pub game_name: String,
    pub item_name: String,
    pub total: f64,
    pub date: Option<NaiveDate>,
}

/// Largest individual non-market purchases, descending, at most `limit`
/// entries. Ranks rows, not games; repeat buys of one game stay separate.
pub fn top_purchases(transactions: &[Transaction], limit: usize) -> Vec<TopPurchase> {
    let mut rows: Vec<TopPurchase> = transactions
        .iter()
        .filter(|t| t.is_spending() && !t.is_market_transaction)
        .map(|t| TopPurchase {
            game_name: if t.game_name.is_empty() {
                "Unknown".to_string()
            } else {
                t.game_name.clone()
            },
            item_name: t.item_name.clone(),
            total: t.total,
            date: t.date,
        })
        .collect();
    rows.sort_by(|a, b| b.total.total_cmp(&a.total));
    rows.truncate(limit);
    rows
}
