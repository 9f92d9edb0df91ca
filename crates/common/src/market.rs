use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{Candle, Result};

/// Abstraction over the market data source.
///
/// `MoexClient` in `crates/feed` implements this against the MOEX ISS API.
/// Tests inject in-memory stubs.
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Fetch daily candles for `ticker` over `[from, till]`, sorted
    /// ascending by date. The caller takes the last two.
    async fn daily_candles(
        &self,
        ticker: &str,
        from: NaiveDate,
        till: NaiveDate,
    ) -> Result<Vec<Candle>>;
}
