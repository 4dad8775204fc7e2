//! Full pipeline: raw ledger rows → extraction/classification → filter →
//! aggregation.

use chrono::NaiveDate;

use spendsight_core::{FilterState, TypeTag};
use spendsight_ingest::{RawRow, extract_rows};
use spendsight_stats::{GroupBy, aggregate, time_series};

fn row(date: &str, items: &str, kind: &str, total: &str, wallet_change: &str) -> RawRow {
    RawRow {
        date: Some(date.to_string()),
        items: Some(items.to_string()),
        kind: Some(kind.to_string()),
        total: Some(total.to_string()),
        wallet_change: Some(wallet_change.to_string()),
        wallet_balance: None,
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 1, 15).unwrap()
}

#[test]
fn test_german_ledger_purchase_and_market_sale() {
    let rows = vec![
        row("7. Dez. 2025", "Half-Life 3", "Kauf", "59,99€", "-59,99€"),
        row(
            "8. Dez. 2025",
            "Steam-Communitymarkt: Widget",
            "1 Markttransaktion",
            "5,00€",
            "+5,00€",
        ),
    ];

    let txns = extract_rows(&rows);
    assert_eq!(txns.len(), 2);

    let purchase = &txns[0];
    assert!(!purchase.is_market_transaction);
    assert!(purchase.is_game_purchase());
    assert_eq!(purchase.total, 59.99);

    let sale = &txns[1];
    assert!(sale.is_market_sale);
    assert!(!sale.is_market_purchase);
    assert_eq!(sale.wallet_change, 5.00);

    let stats = aggregate(&txns, today());
    assert_eq!(stats.summary.total_spent, 59.99);
    assert_eq!(stats.summary.market_net, 5.00);
    assert_eq!(stats.summary.total_market_earned, 5.00);
    assert_eq!(stats.summary.currency, '€');
    assert_eq!(stats.profit.win_rate, 100.0);
}

#[test]
fn test_classification_invariants_hold_for_mixed_batch() {
    let rows = vec![
        row("1. Jan. 2025", "Steam-Guthaben gekauft", "Kauf", "20,--€", "+20,00€"),
        row("2. Jan. 2025", "Portal 2", "Kauf", "9,99€", "-9,99€"),
        row("3. Jan. 2025", "Portal 2", "Rückerstattung", "9,99€", "+9,99€"),
        row("4. Jan. 2025", "Community Market", "3 Market Transactions", "2,10€", "-2,10€"),
        row("Feb 1, 2025", "Community Market", "Market Transaction", "1,00€", "+1,00€"),
    ];
    let txns = extract_rows(&rows);
    assert_eq!(txns.len(), 5);

    for t in &txns {
        assert!(!(t.is_market_sale && t.is_market_purchase));
        if t.is_market_sale || t.is_market_purchase {
            assert!(t.is_market_transaction);
        }
        // Priority chain keeps these pairwise exclusive.
        let exclusive =
            [t.is_refund, t.is_wallet_funding, t.is_market_transaction];
        assert!(exclusive.iter().filter(|flag| **flag).count() <= 1);
    }

    let stats = aggregate(&txns, today());
    assert_eq!(stats.summary.total_wallet_funded, 20.0);
    assert_eq!(stats.summary.refund_count, 1);
    assert_eq!(stats.summary.total_refunded, 9.99);
    assert_eq!(stats.summary.total_market_spent, 2.10);
    assert_eq!(stats.summary.total_market_earned, 1.00);
}

#[test]
fn test_filtered_view_feeds_aggregation() {
    let rows = vec![
        row("1. Jan. 2025", "Half-Life 3", "Kauf", "59,99€", "-59,99€"),
        row("1. Mär. 2025", "Portal 2", "Kauf", "9,99€", "-9,99€"),
        row("2. Mär. 2025", "Portal 2", "Rückerstattung", "9,99€", "+9,99€"),
    ];
    let txns = extract_rows(&rows);

    let filter = FilterState {
        types: vec![TypeTag::Purchases],
        search: "portal".to_string(),
        ..Default::default()
    };
    let filtered: Vec<_> = filter.apply(&txns).into_iter().cloned().collect();
    assert_eq!(filtered.len(), 1);

    let stats = aggregate(&filtered, today());
    assert_eq!(stats.summary.total_spent, 9.99);
    assert_eq!(stats.summary.total_transactions, 1);
    assert_eq!(stats.summary.unique_games, 1);
}

#[test]
fn test_monthly_series_zero_fills_between_sparse_rows() {
    let rows = vec![
        row("5. Jan. 2025", "Half-Life 3", "Kauf", "59,99€", "-59,99€"),
        row("5. Mär. 2025", "Portal 2", "Kauf", "9,99€", "-9,99€"),
    ];
    let txns = extract_rows(&rows);
    let series = time_series(&txns, GroupBy::Month);
    assert_eq!(series.labels, vec!["2025-01", "2025-02", "2025-03"]);
    assert_eq!(series.spent[1], 0.0);
}
