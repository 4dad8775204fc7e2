use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};

use spendsight_core::{FilterState, Transaction, TypeTag};
use spendsight_ingest::{RawRow, extract_rows};
use spendsight_stats::{
    aggregate, json_document, top_games, top_purchases, write_csv, yearly_breakdown,
};

#[derive(Parser, Debug)]
#[command(name = "spendsight", version, about = "Purchase-history ledger analytics")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract, filter, and print a full statistics report
    Report {
        /// Path to a JSON dump of raw ledger rows
        #[arg(long)]
        rows: PathBuf,

        #[command(flatten)]
        filter: FilterArgs,

        /// Anchor date for now-relative metrics (default: today)
        #[arg(long)]
        today: Option<NaiveDate>,
    },

    /// Write the filtered transaction list as JSON or CSV
    Export {
        /// Output format
        #[arg(value_enum)]
        format: ExportFormat,

        /// Path to a JSON dump of raw ledger rows
        #[arg(long)]
        rows: PathBuf,

        /// Output file (stdout when omitted)
        #[arg(short, long)]
        out: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ExportFormat {
    Json,
    Csv,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Earliest date to include (inclusive)
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Latest date to include (inclusive)
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Transaction type facet; repeatable
    /// (purchases|refunds|market|gifts|ingame|wallet)
    #[arg(long = "type")]
    types: Vec<String>,

    /// Minimum amount
    #[arg(long)]
    min: Option<f64>,

    /// Maximum amount
    #[arg(long)]
    max: Option<f64>,

    /// Case-insensitive game/item search
    #[arg(long, default_value = "")]
    search: String,
}

impl FilterArgs {
    fn into_filter_state(self) -> Result<FilterState> {
        let types = self
            .types
            .iter()
            .map(|s| s.parse::<TypeTag>().map_err(anyhow::Error::msg))
            .collect::<Result<Vec<_>>>()?;
        Ok(FilterState {
            date_from: self.from,
            date_to: self.to,
            types,
            price_min: self.min,
            price_max: self.max,
            search: self.search,
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report {
            rows,
            filter,
            today,
        } => {
            let filter = filter.into_filter_state()?;
            let transactions = load_filtered(&rows, &filter)?;
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            print_report(&transactions, today);
        }

        Command::Export {
            format,
            rows,
            out,
            filter,
        } => {
            let filter = filter.into_filter_state()?;
            let transactions = load_filtered(&rows, &filter)?;
            let rendered = match format {
                ExportFormat::Json => {
                    json_document(&transactions, &filter, Utc::now())?.into_bytes()
                }
                ExportFormat::Csv => {
                    let mut buf = Vec::new();
                    write_csv(&mut buf, &transactions)?;
                    buf
                }
            };
            match out {
                Some(path) => fs::write(&path, rendered)
                    .with_context(|| format!("writing {}", path.display()))?,
                None => io::Write::write_all(&mut io::stdout(), &rendered)?,
            }
        }
    }

    Ok(())
}

fn load_filtered(path: &PathBuf, filter: &FilterState) -> Result<Vec<Transaction>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let rows: Vec<RawRow> = serde_json::from_str(&text)
        .with_context(|| format!("parsing rows from {}", path.display()))?;
    let transactions = extract_rows(&rows);
    Ok(filter.apply(&transactions).into_iter().cloned().collect())
}

fn money(amount: f64, currency: char) -> String {
    format!("{amount:.2}{currency}")
}

fn print_report(transactions: &[Transaction], today: NaiveDate) {
    let stats = aggregate(transactions, today);
    let s = &stats.summary;
    let c = s.currency;

    println!("Transactions: {}", s.total_transactions);
    println!(
        "Total spent: {}   Net: {}",
        money(s.total_spent, c),
        money(s.net_spent, c)
    );
    println!(
        "Games: {} ({})   In-Game: {} ({})   Gifts: {} ({})",
        money(s.total_game_purchases, c),
        s.game_purchase_count,
        money(s.total_in_game, c),
        s.in_game_count,
        money(s.total_gift_value, c),
        s.gift_count
    );
    println!(
        "Wallet funded: {}   Refunds: {} ({})",
        money(s.total_wallet_funded, c),
        money(s.total_refunded, c),
        s.refund_count
    );
    println!(
        "Market: spent {} / earned {} / net {} over {} trades",
        money(s.total_market_spent, c),
        money(s.total_market_earned, c),
        money(s.market_net, c),
        s.market_transaction_count
    );
    println!(
        "Purchase sizes: avg {} / median {} / min {} / max {} ({})",
        money(s.avg_purchase, c),
        money(s.median_purchase, c),
        money(s.smallest_purchase, c),
        money(s.largest_purchase, c),
        if s.largest_purchase_game.is_empty() {
            "-"
        } else {
            s.largest_purchase_game.as_str()
        }
    );
    println!(
        "Rates: {}/day  {}/week  {}/month  {}/year",
        money(s.avg_per_day, c),
        money(s.avg_per_week, c),
        money(s.avg_per_month, c),
        money(s.avg_per_year, c)
    );
    if let Some(peak) = &s.peak_month {
        println!("Peak month: {} ({})", peak, money(s.peak_month_amount, c));
    }
    println!(
        "Span: {} ({} days)   Unique games: {}",
        s.account_age, s.account_age_days, s.unique_games
    );

    let p = &stats.profit;
    println!(
        "\nMarket performance: win rate {:.1}%  ROI {:.2}%  breakeven {:.2}x",
        p.win_rate, p.roi, p.breakeven_ratio
    );

    let cm = &stats.comparative;
    println!(
        "This month: {} ({:+.1}% MoM, {:+.1}% YoY)   30-day avg: {}/day   Projected year: {}",
        money(cm.current_month, c),
        cm.mom_change,
        cm.yoy_growth,
        money(cm.thirty_day_avg, c),
        money(cm.projected_annual, c)
    );

    let years = yearly_breakdown(transactions);
    if !years.is_empty() {
        println!("\nPer year:");
        for year in &years {
            println!(
                "  {}: {} over {} purchases",
                year.label,
                money(year.total, c),
                year.count
            );
        }
    }

    let top = top_games(transactions, 10);
    if !top.is_empty() {
        println!("\nTop games:");
        for (rank, (name, total)) in top.iter().enumerate() {
            println!("  {}. {} ({})", rank + 1, name, money(*total, c));
        }
    }

    let biggest = top_purchases(transactions, 5);
    if !biggest.is_empty() {
        println!("\nLargest purchases:");
        for (rank, p) in biggest.iter().enumerate() {
            let label = if p.item_name.is_empty() {
                p.game_name.clone()
            } else {
                format!("{} - {}", p.game_name, p.item_name)
            };
            let when = p.date.map_or_else(|| "undated".to_string(), |d| d.to_string());
            println!("  {}. {} {} ({})", rank + 1, label, money(p.total, c), when);
        }
    }

    if !stats.game_profit.is_empty() {
        println!("\nPer-game profitability (by ROI):");
        for game in stats.game_profit.iter().take(10) {
            println!(
                "  {}: spent {} / earned {} / net {} ({:.1}%)",
                game.game_name,
                money(game.total_spent + game.market_spent, c),
                money(game.market_earned, c),
                money(game.net_profit, c),
                game.roi
            );
        }
    }
}
