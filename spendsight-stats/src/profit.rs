//! Marketplace profitability: account-wide metrics and the per-game
//! breakdown. Every ratio defaults to 0 on a zero denominator.

use std::collections::HashMap;

use serde::Serialize;

use spendsight_core::Transaction;

/// Bucket for market rows that carry no game name.
pub const MARKET_ITEMS_BUCKET: &str = "Market Items";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfitMetrics {
    /// Sales as a percentage of all market trades.
    pub win_rate: f64,
    pub avg_profit_per_sale: f64,
    pub avg_cost_per_purchase: f64,
    /// Net market profit over market spend, as a percentage.
    pub roi: f64,
    /// Spend per unit earned; how much buying each earned unit cost.
    pub breakeven_ratio: f64,
}

/// Per-game profitability: store spend vs. marketplace results.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GameProfit {
    pub game_name: String,
    pub total_spent: f64,
    pub market_earned: f64,
    pub market_spent: f64,
    pub net_profit: f64,
    pub roi: f64,
    pub transaction_count: usize,
}

/// Account-wide market metrics.
pub fn profit_metrics(transactions: &[Transaction]) -> ProfitMetrics {
    let sales = transactions.iter().filter(|t| t.is_market_sale).count();
    let purchases = transactions.iter().filter(|t| t.is_market_purchase).count();
    let earned: f64 = transactions
        .iter()
        .filter(|t| t.is_market_sale)
        .map(|t| t.wallet_change.abs())
        .sum();
    let spent: f64 = transactions
        .iter()
        .filter(|t| t.is_market_purchase)
        .map(|t| t.total)
        .sum();
    let net = earned - spent;
    let trades = sales + purchases;

    ProfitMetrics {
        win_rate: if trades > 0 {
            sales as f64 / trades as f64 * 100.0
        } else {
            0.0
        },
        avg_profit_per_sale: if sales > 0 { earned / sales as f64 } else { 0.0 },
        avg_cost_per_purchase: if purchases > 0 {
            spent / purchases as f64
        } else {
            0.0
        },
        roi: if spent > 0.0 { net / spent * 100.0 } else { 0.0 },
        breakeven_ratio: if earned > 0.0 { spent / earned } else { 0.0 },
    }
}

/// Group spend and market results by game, sorted by ROI descending.
pub fn game_profit_breakdown(transactions: &[Transaction]) -> Vec<GameProfit> {
    let mut by_game: HashMap<String, GameProfit> = HashMap::new();

    for t in transactions {
        if t.is_game_purchase() || t.is_in_game {
            let key = bucket_key(&t.game_name, "Unknown");
            let game = by_game.entry(key.clone()).or_insert_with(|| named(&key));
            game.total_spent += t.total;
            game.transaction_count += 1;
        }
        if t.is_market_sale {
            let key = bucket_key(&t.game_name, MARKET_ITEMS_BUCKET);
            let game = by_game.entry(key.clone()).or_insert_with(|| named(&key));
            game.market_earned += t.wallet_change.abs();
            game.transaction_count += 1;
        }
        if t.is_market_purchase {
            let key = bucket_key(&t.game_name, MARKET_ITEMS_BUCKET);
            let game = by_game.entry(key.clone()).or_insert_with(|| named(&key));
            game.market_spent += t.total;
            game.transaction_count += 1;
        }
    }

    let mut breakdown: Vec<GameProfit> = by_game.into_values().collect();
    for game in &mut breakdown {
        game.net_profit = game.market_earned - (game.total_spent + game.market_spent);
        game.roi = if game.total_spent > 0.0 {
            game.net_profit / game.total_spent * 100.0
        } else {
            0.0
        };
    }
    // Name tiebreak keeps equal-ROI rows in a stable order.
    breakdown.sort_by(|a, b| {
        b.roi
            .total_cmp(&a.roi)
            .then_with(|| a.game_name.cmp(&b.game_name))
    });
    breakdown
}

fn bucket_key(name: &str, fallback: &str) -> String {
    if name.is_empty() {
        fallback.to_string()
    } else {
        name.to_string()
    }
}

fn named(key: &str) -> GameProfit {
    GameProfit {
        game_name: key.to_string(),
        ..Default::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::purchase;

    #[test]
    fn test_profit_metrics_empty_is_zero() {
        let metrics = profit_metrics(&[]);
        assert_eq!(metrics.win_rate, 0.0);
        assert_eq!(metrics.roi, 0.0);
        assert_eq!(metrics.breakeven_ratio, 0.0);
    }

    #[test]
    fn test_profit_metrics_ratios() {
        let mut sale = purchase("", 0.0, 2025, 1, 1);
        sale.is_market_transaction = true;
        sale.is_market_sale = true;
        sale.wallet_change = 9.0;

        let mut buy = purchase("", 6.0, 2025, 1, 2);
        buy.is_market_transaction = true;
        buy.is_market_purchase = true;
        buy.wallet_change = -6.0;

        let metrics = profit_metrics(&[sale, buy]);
        assert_eq!(metrics.win_rate, 50.0);
        assert_eq!(metrics.avg_profit_per_sale, 9.0);
        assert_eq!(metrics.avg_cost_per_purchase, 6.0);
        assert_eq!(metrics.roi, 50.0);
        assert!((metrics.breakeven_ratio - 6.0 / 9.0).abs() < 1e-9);
    }

    #[test]
    fn test_roi_zero_spend_is_zero_not_infinite() {
        let mut sale = purchase("", 0.0, 2025, 1, 1);
        sale.is_market_transaction = true;
        sale.is_market_sale = true;
        sale.wallet_change = 12.0;

        let metrics = profit_metrics(&[sale.clone()]);
        assert_eq!(metrics.roi, 0.0);
        assert!(metrics.roi.is_finite());

        // Same rule per game: earned income with no purchase cost.
        sale.game_name = "CS2".to_string();
        let breakdown = game_profit_breakdown(&[sale]);
        assert_eq!(breakdown.len(), 1);
        assert_eq!(breakdown[0].roi, 0.0);
        assert_eq!(breakdown[0].net_profit, 12.0);
    }

    #[test]
    fn test_breakdown_buckets_and_sort() {
        let winner_buy = purchase("CS2", 10.0, 2025, 1, 1);
        let mut winner_sale = purchase("CS2", 0.0, 2025, 2, 1);
        winner_sale.is_market_transaction = true;
        winner_sale.is_market_sale = true;
        winner_sale.wallet_change = 30.0;

        let loser = purchase("Anthem", 60.0, 2025, 1, 1);

        let mut anonymous_sale = purchase("", 0.0, 2025, 3, 1);
        anonymous_sale.is_market_transaction = true;
        anonymous_sale.is_market_sale = true;
        anonymous_sale.wallet_change = 1.0;

        let breakdown =
            game_profit_breakdown(&[winner_buy, winner_sale, loser, anonymous_sale]);
        assert_eq!(breakdown.len(), 3);
        // CS2: net 30 - 10 = 20, roi 200%, first after the ROI sort.
        assert_eq!(breakdown[0].game_name, "CS2");
        assert_eq!(breakdown[0].net_profit, 20.0);
        assert_eq!(breakdown[0].roi, 200.0);
        assert!(breakdown.iter().any(|g| g.game_name == MARKET_ITEMS_BUCKET));
        let anthem = breakdown.iter().find(|g| g.game_name == "Anthem").unwrap();
        assert_eq!(anthem.roi, -100.0);
    }
}
