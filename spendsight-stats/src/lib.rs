//! spendsight-stats: the derived-analytics engine over classified
//! transactions. Summary statistics, profitability, comparative metrics,
//! time-series buckets, and export documents.

pub mod compare;
pub mod export;
pub mod profit;
pub mod series;
pub mod summary;

use chrono::NaiveDate;
use serde::Serialize;

use spendsight_core::Transaction;

pub use compare::{ComparativeMetrics, comparative_metrics};
pub use export::{json_document, write_csv};
pub use profit::{GameProfit, ProfitMetrics, game_profit_breakdown, profit_metrics};
pub use series::{
    BreakdownEntry, GroupBy, SpendingHeatmap, TimeSeries, TopPurchase, category_totals,
    spending_heatmap, time_series, top_games, top_purchases, type_breakdown, yearly_breakdown,
};
pub use summary::{SummaryStats, median, summarize};

/// Everything the dashboard shows, rebuilt in full from one collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStats {
    pub summary: SummaryStats,
    pub profit: ProfitMetrics,
    pub comparative: ComparativeMetrics,
    pub game_profit: Vec<GameProfit>,
    pub monthly: TimeSeries,
    pub yearly: TimeSeries,
}

/// Run the whole aggregation suite. Pure: `today` is passed in, nothing is
/// cached, and an empty collection yields a well-formed all-zero result.
pub fn aggregate(transactions: &[Transaction], today: NaiveDate) -> AggregateStats {
    AggregateStats {
        summary: summarize(transactions, today),
        profit: profit_metrics(transactions),
        comparative: comparative_metrics(transactions, today),
        game_profit: game_profit_breakdown(transactions),
        monthly: time_series(transactions, GroupBy::Month),
        yearly: time_series(transactions, GroupBy::Year),
    }
}
