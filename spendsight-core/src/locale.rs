//! Locale phrase tables for heuristic row classification.
//!
//! The source ledger renders in the account's locale and never declares
//! which one. Classification works off marker phrases observed in German
//! and English renderings; adding a locale means adding phrases here, the
//! extractor's control flow never changes.

use regex::Regex;

/// Semantic marker detected via locale phrases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// Row describes a gift sent to another account.
    GiftSent,
    /// Any gift-related phrasing; such a fragment is label noise, never a
    /// game name.
    GiftMention,
    /// Items column names the peer marketplace.
    MarketName,
    /// Row credits purchased wallet funds.
    WalletFunding,
    /// Type column marks an in-game purchase.
    InGame,
    /// Type column marks a gift purchase.
    GiftPurchase,
}

/// Phrases whose presence (substring match) signals the marker.
pub fn phrases(marker: Marker) -> &'static [&'static str] {
    match marker {
        Marker::GiftSent => &["Geschenk gesendet", "Gift sent"],
        // German uses the bare stem; the English side stays phrase-level so
        // titles containing "Gift" survive as game names.
        Marker::GiftMention => &["Geschenk", "Gift sent", "Gift purchase"],
        Marker::MarketName => &["Steam-Communitymarkt", "Community Market"],
        Marker::WalletFunding => &["Steam-Guthaben gekauft", "Wallet Credit", "Funds"],
        Marker::InGame => &["im Spiel", "In-Game"],
        Marker::GiftPurchase => &["Geschenkeinkauf", "Gift purchase"],
    }
}

/// True if any locale phrase for `marker` occurs in `text`.
pub fn matches_marker(text: &str, marker: Marker) -> bool {
    phrases(marker).iter().any(|p| text.contains(p))
}

/// Parse a "N market transactions" phrase from a type label.
///
/// Returns the captured count (defaulting to 1 when the phrase appears
/// unnumbered), or `None` when the label is not a marketplace row.
pub fn market_transaction_count(text: &str) -> Option<u32> {
    let counted = Regex::new(r"(?i)(\d+)\s*(?:markttransaktion|market transaction)")
        .expect("static pattern");
    if let Some(caps) = counted.captures(text) {
        return Some(caps[1].parse().unwrap_or(1));
    }
    if text.contains("Markttransaktion") || text.contains("Market Transaction") {
        return Some(1);
    }
    None
}
