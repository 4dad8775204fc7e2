//! Raw row descriptors handed over by the scraping layer.

use serde::{Deserialize, Serialize};

/// One unparsed ledger row: the named sub-fields of a history table row,
/// as text/markup fragments. `None` mirrors a missing cell in the source.
///
/// The scraping layer (browser side) is an external collaborator; it dumps
/// rows in this shape and the extractor takes it from there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    /// Date cell text, e.g. "7. Dez. 2025" or "Dec 7, 2025".
    #[serde(default)]
    pub date: Option<String>,
    /// Items block; may contain nested labeled fragments and a recipient link.
    #[serde(default)]
    pub items: Option<String>,
    /// Type block; may contain a payment-method fragment.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    /// Total cell; the amount is sometimes nested one level down.
    #[serde(default)]
    pub total: Option<String>,
    #[serde(default)]
    pub wallet_change: Option<String>,
    #[serde(default)]
    pub wallet_balance: Option<String>,
}

impl RawRow {
    /// A row with no usable sub-field at all cannot be extracted.
    pub fn is_blank(&self) -> bool {
        let empty = |f: &Option<String>| f.as_deref().map_or(true, |s| s.trim().is_empty());
        empty(&self.date)
            && empty(&self.items)
            && empty(&self.kind)
            && empty(&self.total)
            && empty(&self.wallet_change)
            && empty(&self.wallet_balance)
    }
}
