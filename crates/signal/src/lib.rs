use common::{BreakoutSignal, Candle, SignalKind, ThresholdStatus, Thresholds};
use tracing::debug;

/// Outcome of evaluating one ticker's candle series.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The latest close crossed a breakout threshold.
    Signal(BreakoutSignal),
    /// No breakout; distances to both thresholds for display.
    Status(ThresholdStatus),
    /// Fewer than two candles — nothing can be computed.
    InsufficientData,
}

/// Evaluate breakout conditions for one ticker.
///
/// Looks only at the last two candles of `candles` (oldest first):
/// a BUY fires when the current close is strictly above the previous high
/// raised by `buy_pct` percent, a SELL when it is strictly below the
/// previous low lowered by `sell_pct` percent. The two conditions are
/// mutually exclusive for non-negative thresholds and `high >= low`, so at
/// most one signal is produced per check.
///
/// Pure arithmetic over already-validated input; prices are not range-checked.
pub fn evaluate(ticker: &str, candles: &[Candle], thresholds: &Thresholds) -> Evaluation {
    if candles.len() < 2 {
        debug!(ticker, candles = candles.len(), "Not enough candles for evaluation");
        return Evaluation::InsufficientData;
    }
    let previous = &candles[candles.len() - 2];
    let current = &candles[candles.len() - 1];

    let buy_threshold = previous.high * (1.0 + thresholds.buy_pct / 100.0);
    let sell_threshold = previous.low * (1.0 - thresholds.sell_pct / 100.0);

    if current.close > buy_threshold {
        let change_percent = (current.close - buy_threshold) / buy_threshold * 100.0;
        debug!(
            ticker,
            close = current.close,
            threshold = buy_threshold,
            change_percent,
            "BUY breakout"
        );
        return Evaluation::Signal(BreakoutSignal {
            kind: SignalKind::Buy,
            ticker: ticker.to_string(),
            price: current.close,
            threshold: buy_threshold,
            reference_price: previous.high,
            change_percent,
            date: current.date,
        });
    }

    if current.close < sell_threshold {
        let change_percent = (sell_threshold - current.close) / sell_threshold * 100.0;
        debug!(
            ticker,
            close = current.close,
            threshold = sell_threshold,
            change_percent,
            "SELL breakout"
        );
        return Evaluation::Signal(BreakoutSignal {
            kind: SignalKind::Sell,
            ticker: ticker.to_string(),
            price: current.close,
            threshold: sell_threshold,
            reference_price: previous.low,
            change_percent,
            date: current.date,
        });
    }

    Evaluation::Status(ThresholdStatus {
        ticker: ticker.to_string(),
        close: current.close,
        buy_diff_pct: (current.close - buy_threshold) / buy_threshold * 100.0,
        sell_diff_pct: (sell_threshold - current.close) / sell_threshold * 100.0,
    })
}
