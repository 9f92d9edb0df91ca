use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use common::{Candle, Error, MarketData, Result};

const BASE_URL: &str = "https://iss.moex.com/iss";
/// ISS interval code for daily candles.
const DAILY_INTERVAL: u32 = 24;

/// MOEX ISS market data client. Fetches daily candles for stock-market
/// securities.
pub struct MoexClient {
    http: Client,
}

impl MoexClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .timeout(Duration::from_secs(10))
                .build()
                .expect("Failed to build HTTP client"),
        }
    }
}

impl Default for MoexClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MarketData for MoexClient {
    async fn daily_candles(
        &self,
        ticker: &str,
        from: NaiveDate,
        till: NaiveDate,
    ) -> Result<Vec<Candle>> {
        let url =
            format!("{BASE_URL}/engines/stock/markets/shares/securities/{ticker}/candles.json");

        debug!(ticker, %from, %till, "Requesting MOEX candles");
        let resp = self
            .http
            .get(&url)
            .query(&[
                ("interval", DAILY_INTERVAL.to_string()),
                ("from", from.format("%Y-%m-%d").to_string()),
                ("till", till.format("%Y-%m-%d").to_string()),
                ("iss.meta", "off".to_string()),
            ])
            .send()
            .await
            .map_err(|e| Error::Http(e.to_string()))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| Error::Http(e.to_string()))?;
        if !status.is_success() {
            return Err(Error::Feed(format!("ISS returned HTTP {status} for {ticker}")));
        }

        let candles = parse_candles(&body)?;
        debug!(ticker, count = candles.len(), "Received MOEX candles");
        Ok(candles)
    }
}

// ─── ISS response parsing ─────────────────────────────────────────────────────

/// ISS serves tabular blocks as a `columns` name list plus row arrays; the
/// column order is not contractual, so cells are addressed by name.
#[derive(Deserialize)]
struct IssResponse {
    candles: IssTable,
}

#[derive(Deserialize)]
struct IssTable {
    columns: Vec<String>,
    data: Vec<Vec<serde_json::Value>>,
}

fn parse_candles(body: &str) -> Result<Vec<Candle>> {
    let resp: IssResponse =
        serde_json::from_str(body).map_err(|e| Error::Feed(format!("malformed ISS body: {e}")))?;
    let table = resp.candles;

    let col = |name: &str| -> Result<usize> {
        table
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| Error::Feed(format!("ISS response missing '{name}' column")))
    };
    let (i_open, i_high, i_low, i_close, i_begin) =
        (col("open")?, col("high")?, col("low")?, col("close")?, col("begin")?);

    if table.data.is_empty() {
        return Err(Error::Feed("ISS returned an empty candle table".to_string()));
    }

    let mut candles = Vec::with_capacity(table.data.len());
    for row in &table.data {
        candles.push(Candle {
            date: date_cell(row, i_begin)?,
            open: price_cell(row, i_open)?,
            high: price_cell(row, i_high)?,
            low: price_cell(row, i_low)?,
            close: price_cell(row, i_close)?,
        });
    }

    // ISS serves rows oldest-first already; sort anyway to uphold the
    // ascending-by-date contract.
    candles.sort_by_key(|c| c.date);
    Ok(candles)
}

fn price_cell(row: &[serde_json::Value], idx: usize) -> Result<f64> {
    row.get(idx)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| Error::Feed(format!("non-numeric price cell at column {idx}")))
}

fn date_cell(row: &[serde_json::Value], idx: usize) -> Result<NaiveDate> {
    let raw = row
        .get(idx)
        .and_then(|v| v.as_str())
        .ok_or_else(|| Error::Feed(format!("missing 'begin' cell at column {idx}")))?;
    // ISS formats candle timestamps as "2024-06-03 00:00:00"
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .map_err(|e| Error::Feed(format!("bad candle timestamp '{raw}': {e}")))
}
