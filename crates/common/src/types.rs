use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One completed daily trading session for an instrument.
/// Immutable once retrieved; series are ordered ascending by date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Direction of a breakout signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalKind {
    Buy,
    Sell,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Buy => write!(f, "BUY"),
            SignalKind::Sell => write!(f, "SELL"),
        }
    }
}

/// A breakout event: the latest close crossed a threshold derived from the
/// previous candle. Computed fresh on every check, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakoutSignal {
    pub kind: SignalKind,
    pub ticker: String,
    /// Close price of the current candle.
    pub price: f64,
    /// The breached threshold level.
    pub threshold: f64,
    /// Previous candle's high (BUY) or low (SELL) the threshold came from.
    pub reference_price: f64,
    /// How far past the threshold the close landed, in percent (> 0).
    pub change_percent: f64,
    /// Date of the candle that triggered the signal.
    pub date: NaiveDate,
}

/// Distance to both thresholds for a ticker that produced no signal.
/// Both diffs are signed: negative means the threshold is not yet breached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdStatus {
    pub ticker: String,
    pub close: f64,
    pub buy_diff_pct: f64,
    pub sell_diff_pct: f64,
}

/// Per-side breakout thresholds in percent. Applied symmetrically by
/// default; the two sides can be configured independently.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub buy_pct: f64,
    pub sell_pct: f64,
}

impl Thresholds {
    pub const DEFAULT_PERCENT: f64 = 0.5;

    pub fn symmetric(pct: f64) -> Self {
        Self {
            buy_pct: pct,
            sell_pct: pct,
        }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::symmetric(Self::DEFAULT_PERCENT)
    }
}

/// Counters for the daily digest. Held in memory only and reset on restart;
/// owned by the worker task and passed explicitly into each run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    pub total_checks: u64,
    pub signals_found: u64,
    pub last_check: Option<DateTime<Utc>>,
}

impl RunStats {
    /// Record one completed check that produced `signals` signals.
    pub fn record_check(&mut self, signals: usize, at: DateTime<Utc>) {
        self.total_checks += 1;
        self.signals_found += signals as u64;
        self.last_check = Some(at);
    }
}
