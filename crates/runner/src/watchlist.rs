use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Watchlist config file (TOML). Keeps the run loop ticker-agnostic: both
/// the ticker list and the display names are data, not code.
///
/// Example `config/watchlist.toml`:
/// ```toml
/// [[ticker]]
/// symbol = "SBER"
/// name = "Sberbank"
///
/// [[ticker]]
/// symbol = "GAZP"
/// name = "Gazprom"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WatchlistConfig {
    #[serde(rename = "ticker")]
    pub tickers: Vec<TickerEntry>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TickerEntry {
    /// Exchange symbol, e.g. "SBER".
    pub symbol: String,
    /// Optional human display name shown in messages.
    pub name: Option<String>,
}

impl WatchlistConfig {
    /// Load from a TOML file. Exits process on error.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path)
            .unwrap_or_else(|e| panic!("Failed to read watchlist at '{path}': {e}"));
        Self::parse(&content)
            .unwrap_or_else(|e| panic!("Failed to parse watchlist at '{path}': {e}"))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Ticker symbols in configured order.
    pub fn symbols(&self) -> Vec<String> {
        self.tickers.iter().map(|t| t.symbol.clone()).collect()
    }

    /// Symbol → display name table for the formatter. Entries without a
    /// name are omitted so the formatter falls back to the raw symbol.
    pub fn names(&self) -> HashMap<String, String> {
        self.tickers
            .iter()
            .filter_map(|t| t.name.clone().map(|n| (t.symbol.clone(), n)))
            .collect()
    }
}
