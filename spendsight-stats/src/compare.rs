//! Now-relative comparisons: month over month, trailing 30 days, year over
//! year, and a naive annual projection.
//!
//! `today` is an explicit argument; nothing here reads the clock, so the
//! same input always yields the same output.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use spendsight_core::Transaction;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparativeMetrics {
    pub current_month: f64,
    pub previous_month: f64,
    /// Percent change vs. the previous month; 0 when that month had no
    /// spend (no "infinite growth" from an empty baseline).
    pub mom_change: f64,
    /// Trailing 30-day spend divided by 30, not by the transaction count.
    pub thirty_day_avg: f64,
    /// Same calendar month last year vs. now, as a percentage.
    pub yoy_growth: f64,
    /// Year-to-date monthly average times twelve.
    pub projected_annual: f64,
}

fn month_total(spending: &[&Transaction], year: i32, month: u32) -> f64 {
    spending
        .iter()
        .filter(|t| {
            t.date
                .is_some_and(|d| d.year() == year && d.month() == month)
        })
        .map(|t| t.total)
        .sum()
}

pub fn comparative_metrics(transactions: &[Transaction], today: NaiveDate) -> ComparativeMetrics {
    let spending: Vec<&Transaction> = transactions.iter().filter(|t| t.is_spending()).collect();

    let year = today.year();
    let month = today.month();
    let (prev_year, prev_month) = if month == 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    };

    let current_month = month_total(&spending, year, month);
    let previous_month = month_total(&spending, prev_year, prev_month);
    let mom_change = if previous_month > 0.0 {
        (current_month - previous_month) / previous_month * 100.0
    } else {
        0.0
    };

    let thirty_days_ago = today - Days::new(30);
    let thirty_day_total: f64 = spending
        .iter()
        .filter(|t| t.date.is_some_and(|d| d >= thirty_days_ago))
        .map(|t| t.total)
        .sum();

    let last_year_same_month = month_total(&spending, year - 1, month);
    let yoy_growth = if last_year_same_month > 0.0 {
        (current_month - last_year_same_month) / last_year_same_month * 100.0
    } else {
        0.0
    };

    let year_to_date: f64 = spending
        .iter()
        .filter(|t| t.date.is_some_and(|d| d.year() == year))
        .map(|t| t.total)
        .sum();
    let months_elapsed = month as f64;
    let projected_annual = year_to_date / months_elapsed * 12.0;

    ComparativeMetrics {
        current_month,
        previous_month,
        mom_change,
        thirty_day_avg: thirty_day_total / 30.0,
        yoy_growth,
        projected_annual,
    }
}
