//! Row extraction and transaction classification.
//!
//! Turns one raw ledger row into a classified [`Transaction`]. Extraction
//! order matters: gift and marketplace detection read the items text before
//! the fragment walk, and the wallet-change direction gates the
//! funding/refund/sale/purchase priority chain.

use anyhow::{Result, bail};
use tracing::{debug, warn};

use spendsight_core::{Marker, Transaction, market_transaction_count, matches_marker};

use crate::fields::{extract_currency, parse_amount, parse_date};
use crate::markup::{first_link_text, fragments, visible_text};
use crate::types::RawRow;

/// Extract a whole batch. Malformed rows are logged and skipped; one bad
/// row never aborts the rest.
pub fn extract_rows(rows: &[RawRow]) -> Vec<Transaction> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match extract_row(row, index) {
            Ok(txn) => Some(txn),
            Err(err) => {
                warn!(row = index, error = %err, "skipping unparseable ledger row");
                None
            }
        })
        .collect()
}

/// Extract and classify a single row.
///
/// Cells that carry no labeled fragments are treated as one plain-text
/// fragment, so a dump of already-flattened text works the same as markup.
pub fn extract_row(row: &RawRow, sequence_id: usize) -> Result<Transaction> {
    if row.is_blank() {
        bail!("row has no usable sub-fields");
    }

    let items_markup = row.items.as_deref().unwrap_or("");
    let items_text = visible_text(items_markup);

    let is_gift = matches_marker(&items_text, Marker::GiftSent);
    let gift_recipient = if is_gift {
        first_link_text(items_markup).unwrap_or_default()
    } else {
        String::new()
    };

    let mut is_market_transaction = matches_marker(&items_text, Marker::MarketName);
    let mut market_count = 1u32;

    // Fragment walk: a payment-styled fragment is the item name; the first
    // non-decorative fragment free of gift phrasing is the game name.
    let mut game_name = String::new();
    let mut item_name = String::new();
    for frag in fragments(items_markup) {
        if frag.is_payment {
            item_name = frag.text;
        } else if !frag.is_decorative
            && !frag.text.is_empty()
            && !matches_marker(&frag.text, Marker::GiftMention)
            && game_name.is_empty()
        {
            game_name = frag.text;
        }
    }
    if game_name.is_empty() && !is_market_transaction && !is_gift {
        game_name = items_text.clone();
    }

    let kind_markup = row.kind.as_deref().unwrap_or("");
    let mut transaction_type = String::new();
    let mut payment_method = String::new();
    let kind_fragments = fragments(kind_markup);
    if kind_fragments.is_empty() {
        transaction_type = visible_text(kind_markup);
    } else {
        for frag in kind_fragments {
            if frag.is_payment {
                payment_method = frag.text;
            } else if !frag.text.is_empty() {
                transaction_type = frag.text;
            }
        }
    }
    if let Some(count) = market_transaction_count(&transaction_type) {
        is_market_transaction = true;
        market_count = count;
    }

    let date_text = row.date.as_deref().map(visible_text).unwrap_or_default();

    // The total amount is sometimes nested one fragment down.
    let total_markup = row.total.as_deref().unwrap_or("");
    let total_text = match fragments(total_markup).into_iter().next() {
        Some(frag) => frag.text,
        None => visible_text(total_markup),
    };

    let wallet_change_text = row.wallet_change.as_deref().map(visible_text).unwrap_or_default();
    let wallet_balance_text = row.wallet_balance.as_deref().map(visible_text).unwrap_or_default();

    let wallet_change = parse_amount(&wallet_change_text);
    let is_positive_change = wallet_change_text.contains('+') || wallet_change > 0.0;

    // Priority chain; first match wins.
    let is_wallet_funding =
        matches_marker(&items_text, Marker::WalletFunding) && is_positive_change;
    let is_refund = is_positive_change && !is_wallet_funding && !is_market_transaction;
    let is_market_sale = is_market_transaction && is_positive_change;
    let is_market_purchase = is_market_transaction && !is_positive_change;

    // Independent flags; deliberately not folded into the chain above.
    let is_in_game = matches_marker(&transaction_type, Marker::InGame);
    let is_gift_purchase = matches_marker(&transaction_type, Marker::GiftPurchase);

    let credit_expected = is_refund || is_market_sale;
    if (credit_expected && wallet_change < 0.0) || (is_market_purchase && wallet_change > 0.0) {
        debug!(
            row = sequence_id,
            wallet_change, "wallet change sign disagrees with classification"
        );
    }

    let currency_source = if total_text.is_empty() {
        &wallet_change_text
    } else {
        &total_text
    };
    let currency = extract_currency(currency_source);

    Ok(Transaction {
        date: parse_date(&date_text),
        date_text,
        game_name,
        item_name,
        transaction_type,
        payment_method,
        total: parse_amount(&total_text),
        total_text,
        wallet_change,
        wallet_change_text,
        wallet_balance: parse_amount(&wallet_balance_text),
        currency,
        is_refund,
        is_wallet_funding,
        is_gift,
        is_market_transaction,
        is_market_sale,
        is_market_purchase,
        is_in_game,
        is_gift_purchase,
        gift_recipient,
        market_transaction_count: market_count,
        sequence_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(
        date: &str,
        items: &str,
        kind: &str,
        total: &str,
        wallet_change: &str,
    ) -> RawRow {
        RawRow {
            date: Some(date.to_string()),
            items: Some(items.to_string()),
            kind: Some(kind.to_string()),
            total: Some(total.to_string()),
            wallet_change: Some(wallet_change.to_string()),
            wallet_balance: Some(String::new()),
        }
    }

    #[test]
    fn test_plain_german_purchase() {
        let t = extract_row(
            &row("7. Dez. 2025", "Half-Life 3", "Kauf", "59,99€", "-59,99€"),
            0,
        )
        .unwrap();

        assert_eq!(t.date, NaiveDate::from_ymd_opt(2025, 12, 7));
        assert_eq!(t.game_name, "Half-Life 3");
        assert_eq!(t.total, 59.99);
        assert_eq!(t.wallet_change, -59.99);
        assert_eq!(t.currency, '€');
        assert!(!t.is_refund && !t.is_market_transaction && !t.is_wallet_funding);
        assert!(t.is_game_purchase());
    }

    #[test]
    fn test_market_sale_from_type_count() {
        let t = extract_row(
            &row(
                "8. Dez. 2025",
                "Steam-Communitymarkt: Widget",
                "1 Markttransaktion",
                "5,00€",
                "+5,00€",
            ),
            1,
        )
        .unwrap();

        assert!(t.is_market_transaction);
        assert!(t.is_market_sale);
        assert!(!t.is_market_purchase);
        assert!(!t.is_refund);
        assert_eq!(t.market_transaction_count, 1);
        // Market rows don't inherit the items text as a game name.
        assert_eq!(t.game_name, "");
    }

    #[test]
    fn test_market_purchase_counts_trades() {
        let t = extract_row(
            &row(
                "Jan 5, 2024",
                "Community Market",
                "17 Market Transactions",
                "3,40€",
                "-3,40€",
            ),
            0,
        )
        .unwrap();

        assert!(t.is_market_purchase);
        assert!(!t.is_market_sale);
        assert_eq!(t.market_transaction_count, 17);
    }

    #[test]
    fn test_gift_row_captures_recipient_link() {
        let items = r#"<div>Geschenk gesendet</div><a href="/profiles/1">Alex</a>"#;
        let t = extract_row(&row("1. Mai 2024", items, "Geschenkeinkauf", "19,99€", "-19,99€"), 0)
            .unwrap();

        assert!(t.is_gift);
        assert!(t.is_gift_purchase);
        assert_eq!(t.gift_recipient, "Alex");
        assert!(t.counts_as_gift());
        // The gift marker fragment never becomes the game name.
        assert_eq!(t.game_name, "");
    }

    #[test]
    fn test_gift_label_fragment_is_not_a_game_name() {
        let items = "<div>Geschenkeinkauf</div><div>Portal 2</div>";
        let t = extract_row(
            &row("2. Jan. 2025", items, "Geschenkeinkauf", "9,99€", "-9,99€"),
            0,
        )
        .unwrap();
        assert_eq!(t.game_name, "Portal 2");
        assert!(t.is_gift_purchase);
    }

    #[test]
    fn test_sign_conflict_row_is_kept_with_flags() {
        // The wallet cell both prints a plus and parses negative; the row
        // still classifies as a sale and stays in the batch.
        let rows = vec![row(
            "9. Dez. 2025",
            "Steam-Communitymarkt: Widget",
            "1 Markttransaktion",
            "5,00€",
            "-5,00€+",
        )];
        let txns = extract_rows(&rows);
        assert_eq!(txns.len(), 1);
        assert!(txns[0].is_market_sale);
        assert!(!txns[0].is_market_purchase);
        assert_eq!(txns[0].wallet_change, -5.0);
    }

    #[test]
    fn test_fragment_walk_labels_game_and_item() {
        let items = concat!(
            r#"<div class="help_purchase_img"><img src="i.png"></div>"#,
            r#"<div>Dota 2</div>"#,
            r#"<div class="wth_payment">Arcana Bundle</div>"#,
        );
        let kind = concat!(
            r#"<div>Kauf im Spiel</div>"#,
            r#"<div class="wth_payment">Guthaben</div>"#,
        );
        let t = extract_row(&row("2. Okt. 2023", items, kind, "12,50€", "-12,50€"), 0).unwrap();

        assert_eq!(t.game_name, "Dota 2");
        assert_eq!(t.item_name, "Arcana Bundle");
        assert_eq!(t.transaction_type, "Kauf im Spiel");
        assert_eq!(t.payment_method, "Guthaben");
        assert!(t.is_in_game);
    }

    #[test]
    fn test_wallet_funding_beats_refund() {
        let t = extract_row(
            &row("3. Jan. 2025", "Steam-Guthaben gekauft", "Kauf", "20,--€", "+20,00€"),
            0,
        )
        .unwrap();

        assert!(t.is_wallet_funding);
        assert!(!t.is_refund);
        assert_eq!(t.total, 20.0);
    }

    #[test]
    fn test_positive_change_without_markers_is_refund() {
        let t = extract_row(
            &row("4. Feb. 2025", "Half-Life 3", "Rückerstattung", "59,99€", "+59,99€"),
            0,
        )
        .unwrap();

        assert!(t.is_refund);
        assert!(!t.is_wallet_funding);
        assert!(!t.is_market_transaction);
    }

    #[test]
    fn test_sale_and_purchase_are_exclusive_and_imply_market() {
        for change in ["+5,00€", "-5,00€"] {
            let t = extract_row(
                &row("5. Jun. 2024", "Community Market", "Market Transaction", "5,00€", change),
                0,
            )
            .unwrap();
            assert!(t.is_market_transaction);
            assert!(!(t.is_market_sale && t.is_market_purchase));
            assert!(t.is_market_sale || t.is_market_purchase);
        }
    }

    #[test]
    fn test_unparseable_date_is_recorded_not_fatal() {
        let t = extract_row(&row("sometime", "Portal 2", "Kauf", "9,99€", "-9,99€"), 3).unwrap();
        assert_eq!(t.date, None);
        assert_eq!(t.date_text, "sometime");
        assert_eq!(t.sequence_id, 3);
    }

    #[test]
    fn test_blank_row_is_skipped_batch_continues() {
        let rows = vec![
            row("7. Dez. 2025", "Half-Life 3", "Kauf", "59,99€", "-59,99€"),
            RawRow::default(),
            row("8. Dez. 2025", "Portal 2", "Kauf", "9,99€", "-9,99€"),
        ];
        let txns = extract_rows(&rows);
        assert_eq!(txns.len(), 2);
        // Sequence ids keep their source positions.
        assert_eq!(txns[0].sequence_id, 0);
        assert_eq!(txns[1].sequence_id, 2);
    }

    #[test]
    fn test_currency_falls_back_to_wallet_change_text() {
        let t = extract_row(&row("Jan 2, 2024", "Refund", "Refund", "", "+$5.00"), 0).unwrap();
        assert_eq!(t.currency, '$');
    }
}
