use std::collections::HashSet;

use crate::model::MarketMode;

/// Quote suffix used by the storage form (`BTCUSDT`); the query form is the
/// bare base asset (`BTC`).
const QUOTE_SUFFIX: &str = "USDT";

/// Built-in seed watchlist used whenever the store is unreachable or empty,
/// so the page is never symbol-less.
pub const SEED_SYMBOLS: [&str; 3] = ["BTCUSDT", "ETHUSDT", "SOLUSDT"];

/// Convert any user/upstream spelling to the storage form.
pub fn to_storage(symbol: &str) -> String {
    let s = symbol.trim().to_uppercase();
    if s.ends_with(QUOTE_SUFFIX) {
        s
    } else {
        format!("{s}{QUOTE_SUFFIX}")
    }
}

/// Convert a storage-form symbol to the query form used for upstream calls.
pub fn to_query(symbol: &str) -> String {
    let s = symbol.trim().to_uppercase();
    s.strip_suffix(QUOTE_SUFFIX).unwrap_or(&s).to_string()
}

pub fn seed_watchlist() -> Vec<String> {
    SEED_SYMBOLS.iter().map(|s| s.to_string()).collect()
}

// ── Market-mode categories ───────────────────────────────────────────────

/// Lookup from market mode to category membership.  Injectable so the
/// category universe can change without touching composition ordering.
pub trait CategoryLookup {
    /// Storage-form members for a mode; `None` means "no filtering".
    fn members(&self, mode: MarketMode) -> Option<&[&'static str]>;
}

/// Static membership table for the built-in categories.
#[derive(Debug, Default, Clone)]
pub struct StaticCategories;

const LARGE_CAP: [&str; 10] = [
    "BTCUSDT", "ETHUSDT", "SOLUSDT", "BNBUSDT", "XRPUSDT", "ADAUSDT", "AVAXUSDT", "DOTUSDT",
    "LINKUSDT", "LTCUSDT",
];

const DEFI: [&str; 8] = [
    "UNIUSDT", "AAVEUSDT", "LINKUSDT", "MKRUSDT", "CRVUSDT", "COMPUSDT", "SNXUSDT", "LDOUSDT",
];

const MEME: [&str; 6] = ["DOGEUSDT", "SHIBUSDT", "PEPEUSDT", "WIFUSDT", "BONKUSDT", "FLOKIUSDT"];

impl CategoryLookup for StaticCategories {
    fn members(&self, mode: MarketMode) -> Option<&[&'static str]> {
        match mode {
            MarketMode::All => None,
            MarketMode::LargeCap => Some(&LARGE_CAP),
            MarketMode::Defi => Some(&DEFI),
            MarketMode::Meme => Some(&MEME),
        }
    }
}

// ── Symbol Composer ──────────────────────────────────────────────────────

/// Output of the composer: the full filtered, pinned-first list (for
/// display/count purposes) and the truncated prefix actually analyzed.
#[derive(Debug, Clone)]
pub struct ComposedSymbols {
    pub full: Vec<String>,
    pub page: Vec<String>,
}

/// Derive the effective, ordered symbol list for one render cycle.
///
/// 1. Empty watchlist ⇒ seed set.
/// 2. mode ≠ all ⇒ intersect with the category membership table.
/// 3. Pinned symbols move to the front; both partitions keep their original
///    relative order.  Pinned symbols filtered out by the mode stay out —
///    pins do not override mode filtering.
/// 4. The analyzed page is the first `page_size` entries.
pub fn compose(
    watchlist: &[String],
    pins: &[String],
    mode: MarketMode,
    page_size: usize,
    categories: &dyn CategoryLookup,
) -> ComposedSymbols {
    let base: Vec<String> = if watchlist.is_empty() {
        seed_watchlist()
    } else {
        watchlist.iter().map(|s| to_storage(s)).collect()
    };

    let filtered: Vec<String> = match categories.members(mode) {
        None => base,
        Some(members) => {
            let allowed: HashSet<&str> = members.iter().copied().collect();
            base.into_iter().filter(|s| allowed.contains(s.as_str())).collect()
        }
    };

    let pinned: HashSet<String> = pins.iter().map(|s| to_storage(s)).collect();

    let mut full: Vec<String> = Vec::with_capacity(filtered.len());
    let mut seen: HashSet<String> = HashSet::with_capacity(filtered.len());
    for s in filtered.iter().filter(|s| pinned.contains(*s)) {
        if seen.insert(s.clone()) {
            full.push(s.clone());
        }
    }
    for s in filtered.iter().filter(|s| !pinned.contains(*s)) {
        if seen.insert(s.clone()) {
            full.push(s.clone());
        }
    }

    let mut page = full.clone();
    page.truncate(page_size);

    ComposedSymbols { full, page }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn storage_and_query_forms_round_trip() {
        assert_eq!(to_storage("btc"), "BTCUSDT");
        assert_eq!(to_storage("BTCUSDT"), "BTCUSDT");
        assert_eq!(to_query("BTCUSDT"), "BTC");
        assert_eq!(to_query("eth"), "ETH");
    }

    #[test]
    fn empty_watchlist_substitutes_seed_set() {
        let out = compose(&[], &[], MarketMode::All, 24, &StaticCategories);
        assert_eq!(out.full, list(&["BTCUSDT", "ETHUSDT", "SOLUSDT"]));
        assert_eq!(out.page, out.full);
    }

    #[test]
    fn pinned_symbols_form_an_ordered_prefix() {
        let watch = list(&["BTCUSDT", "ETHUSDT", "SOLUSDT", "ADAUSDT"]);
        let pins = list(&["SOLUSDT", "ETHUSDT"]);
        let out = compose(&watch, &pins, MarketMode::All, 24, &StaticCategories);
        // Pinned keep watchlist order among themselves, then the rest.
        assert_eq!(out.full, list(&["ETHUSDT", "SOLUSDT", "BTCUSDT", "ADAUSDT"]));
    }

    #[test]
    fn mode_filter_excludes_non_members_including_pins() {
        let watch = list(&["BTCUSDT", "DOGEUSDT", "UNIUSDT", "ETHUSDT"]);
        let pins = list(&["DOGEUSDT"]);
        let out = compose(&watch, &pins, MarketMode::LargeCap, 24, &StaticCategories);
        // DOGE is pinned but not large-cap: dropped, not forced in.
        assert_eq!(out.full, list(&["BTCUSDT", "ETHUSDT"]));
    }

    #[test]
    fn page_truncates_but_full_list_is_retained() {
        let watch = list(&["BTCUSDT", "ETHUSDT", "SOLUSDT", "ADAUSDT"]);
        let out = compose(&watch, &[], MarketMode::All, 2, &StaticCategories);
        assert_eq!(out.page, list(&["BTCUSDT", "ETHUSDT"]));
        assert_eq!(out.full.len(), 4);
    }

    #[test]
    fn duplicates_never_appear_in_output() {
        let watch = list(&["btc", "BTCUSDT", "eth"]);
        let out = compose(&watch, &[], MarketMode::All, 24, &StaticCategories);
        assert_eq!(out.full, list(&["BTCUSDT", "ETHUSDT"]));
    }

    #[test]
    fn mode_filter_may_legitimately_empty_the_list() {
        let watch = list(&["BTCUSDT", "ETHUSDT"]);
        let out = compose(&watch, &[], MarketMode::Meme, 24, &StaticCategories);
        assert!(out.full.is_empty());
        assert!(out.page.is_empty());
    }
}
