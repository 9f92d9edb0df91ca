use std::collections::HashMap;

use chrono::{DateTime, Local};

use common::{BreakoutSignal, RunStats, SignalKind, ThresholdStatus, Thresholds};

/// Renders signals, status lines, and service messages into fixed-layout
/// text blocks. Pure templating; the only state is the ticker display-name
/// table and the configured thresholds (shown in the condition line).
pub struct MessageFormatter {
    /// Ticker symbol → human display name. Unknown tickers fall back to
    /// the raw symbol.
    names: HashMap<String, String>,
    thresholds: Thresholds,
}

impl MessageFormatter {
    pub fn new(names: HashMap<String, String>, thresholds: Thresholds) -> Self {
        Self { names, thresholds }
    }

    /// "Sberbank (SBER)" when a display name is configured, else "SBER".
    fn display(&self, ticker: &str) -> String {
        match self.names.get(ticker) {
            Some(name) => format!("{name} ({ticker})"),
            None => ticker.to_string(),
        }
    }

    /// One message per breakout signal.
    pub fn signal(&self, s: &BreakoutSignal) -> String {
        let name = self.display(&s.ticker);
        let date = s.date.format("%Y-%m-%d");
        match s.kind {
            SignalKind::Buy => format!(
                "🚀 BUY SIGNAL 🚀\n\
                 📈 Instrument: {name}\n\
                 💰 Close: {:.2}\n\
                 🎯 Broke level: {:.2}\n\
                 📊 Previous high: {:.2}\n\
                 📈 Above threshold: +{:.2}%\n\
                 🕒 Candle date: {date}\n\
                 🔔 Condition: close > previous high + {}%",
                s.price, s.threshold, s.reference_price, s.change_percent, self.thresholds.buy_pct
            ),
            SignalKind::Sell => format!(
                "🔻 SELL SIGNAL 🔻\n\
                 📉 Instrument: {name}\n\
                 💰 Close: {:.2}\n\
                 🎯 Broke level: {:.2}\n\
                 📊 Previous low: {:.2}\n\
                 📉 Below threshold: -{:.2}%\n\
                 🕒 Candle date: {date}\n\
                 🔔 Condition: close < previous low - {}%",
                s.price, s.threshold, s.reference_price, s.change_percent, self.thresholds.sell_pct
            ),
        }
    }

    /// Header sent before a non-empty batch of signal messages.
    pub fn signal_header(&self, count: usize, at: DateTime<Local>) -> String {
        format!(
            "🚨 BREAKOUT SIGNALS: {count}\n🕒 {}",
            at.format("%Y-%m-%d %H:%M")
        )
    }

    /// One status line for a ticker that produced no signal.
    pub fn status_line(&self, s: &ThresholdStatus) -> String {
        format!(
            "📈 {}:\n   💰 {:.2} | 🔼 {:+.1}% | 🔽 {:+.1}%",
            self.display(&s.ticker),
            s.close,
            s.buy_diff_pct,
            s.sell_diff_pct
        )
    }

    /// Status line for a ticker whose data could not be retrieved.
    pub fn unavailable_line(&self, ticker: &str) -> String {
        format!("❌ {}: data unavailable", self.display(ticker))
    }

    /// Status line for a ticker with fewer than two candles.
    pub fn insufficient_line(&self, ticker: &str) -> String {
        format!("⚠️ {}: not enough candles for evaluation", self.display(ticker))
    }

    /// The combined per-ticker status message sent once at the end of a run.
    pub fn status_report(&self, lines: &[String], at: DateTime<Local>) -> String {
        let mut out = format!(
            "📊 STATUS REPORT\n🕒 Checked: {}\n────────────────────",
            at.format("%Y-%m-%d %H:%M")
        );
        for line in lines {
            out.push('\n');
            out.push_str(line);
        }
        out
    }

    /// Greeting sent once at startup.
    pub fn startup(&self, tickers: &[String], check_times: &str) -> String {
        let watched: Vec<String> = tickers.iter().map(|t| self.display(t)).collect();
        format!(
            "🤖 Breakout signal bot started!\n\
             📊 Watching: {}\n\
             ⏰ Checks daily at {check_times}",
            watched.join(", ")
        )
    }

    /// Daily digest built from the run counters.
    pub fn digest(&self, stats: &RunStats, at: DateTime<Local>) -> String {
        let last_check = match stats.last_check {
            Some(t) => t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
            None => "never".to_string(),
        };
        format!(
            "📊 DAILY DIGEST — {}\n\
             • Checks run: {}\n\
             • Signals found: {}\n\
             • Last check: {last_check}",
            at.format("%Y-%m-%d"),
            stats.total_checks,
            stats.signals_found
        )
    }
}
