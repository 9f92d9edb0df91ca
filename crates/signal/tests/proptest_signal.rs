use chrono::NaiveDate;
use common::{Candle, SignalKind, Thresholds};
use proptest::prelude::*;
use signal::{evaluate, Evaluation};

fn candle(high: f64, low: f64, close: f64) -> Candle {
    Candle {
        date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
        open: (high + low) / 2.0,
        high,
        low,
        close,
    }
}

proptest! {
    /// Evaluation must never panic on arbitrary finite positive prices.
    #[test]
    fn never_panics_on_arbitrary_prices(
        prev_high in 0.0001f64..1_000_000.0f64,
        prev_low in 0.0001f64..1_000_000.0f64,
        close in 0.0001f64..1_000_000.0f64,
        pct in 0.0f64..50.0f64,
    ) {
        let candles = [candle(prev_high, prev_low, prev_high), candle(close, close, close)];
        let _ = evaluate("TEST", &candles, &Thresholds::symmetric(pct));
    }

    /// With high >= low and non-negative thresholds, a single check can
    /// never satisfy both breakout conditions, so the emitted signal (if
    /// any) is unambiguous: above the buy threshold it is always BUY.
    #[test]
    fn buy_and_sell_are_mutually_exclusive(
        low in 1.0f64..10_000.0f64,
        spread in 0.0f64..1_000.0f64,
        close in 0.0001f64..100_000.0f64,
        pct in 0.0f64..10.0f64,
    ) {
        let high = low + spread;
        let thresholds = Thresholds::symmetric(pct);
        let candles = [candle(high, low, (high + low) / 2.0), candle(close, close, close)];

        let buy_threshold = high * (1.0 + pct / 100.0);
        let sell_threshold = low * (1.0 - pct / 100.0);
        prop_assert!(buy_threshold >= sell_threshold);

        match evaluate("TEST", &candles, &thresholds) {
            Evaluation::Signal(s) => {
                match s.kind {
                    SignalKind::Buy => prop_assert!(close > buy_threshold),
                    SignalKind::Sell => {
                        prop_assert!(close < sell_threshold);
                        // the buy condition must not also hold
                        prop_assert!(close <= buy_threshold);
                    }
                }
                prop_assert!(s.change_percent > 0.0);
            }
            Evaluation::Status(s) => {
                prop_assert!(close <= buy_threshold);
                prop_assert!(close >= sell_threshold);
                prop_assert!(s.buy_diff_pct <= 0.0);
                prop_assert!(s.sell_diff_pct <= 0.0);
            }
            Evaluation::InsufficientData => prop_assert!(false, "two candles were supplied"),
        }
    }

    /// Closing exactly on a threshold never fires (strict inequality).
    #[test]
    fn exact_threshold_never_fires(
        high in 1.0f64..10_000.0f64,
        pct in 0.0f64..10.0f64,
    ) {
        let low = high * 0.9;
        let thresholds = Thresholds::symmetric(pct);

        let on_buy_edge = high * (1.0 + pct / 100.0);
        let candles = [candle(high, low, high), candle(on_buy_edge, on_buy_edge, on_buy_edge)];
        prop_assert!(!matches!(
            evaluate("TEST", &candles, &thresholds),
            Evaluation::Signal(_)
        ));

        let on_sell_edge = low * (1.0 - pct / 100.0);
        let candles = [candle(high, low, high), candle(on_sell_edge, on_sell_edge, on_sell_edge)];
        prop_assert!(!matches!(
            evaluate("TEST", &candles, &thresholds),
            Evaluation::Signal(_)
        ));
    }
}
