use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, Utc};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use common::{MarketData, Notifier, Result, RunStats, Thresholds};
use notify::MessageFormatter;
use signal::Evaluation;

/// Unit of work placed on the job queue by the scheduler and drained by a
/// single worker, so runs can never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Check the whole watchlist and send signal/status messages.
    Check,
    /// Send the daily digest built from the run counters.
    Digest,
}

/// Sequences fetch → evaluate → format → send across the watchlist, one
/// ticker at a time. Holds no mutable state of its own; the run counters
/// are passed in by the worker.
pub struct SignalRunner {
    feed: Arc<dyn MarketData>,
    notifier: Arc<dyn Notifier>,
    tickers: Vec<String>,
    formatter: MessageFormatter,
    thresholds: Thresholds,
    lookback_days: i64,
    /// Pause between consecutive messages of one batch, for the Bot API
    /// rate limit.
    message_delay: Duration,
}

impl SignalRunner {
    pub const MESSAGE_DELAY: Duration = Duration::from_secs(1);

    pub fn new(
        feed: Arc<dyn MarketData>,
        notifier: Arc<dyn Notifier>,
        tickers: Vec<String>,
        formatter: MessageFormatter,
        thresholds: Thresholds,
        lookback_days: i64,
    ) -> Self {
        Self {
            feed,
            notifier,
            tickers,
            formatter,
            thresholds,
            lookback_days,
            message_delay: Self::MESSAGE_DELAY,
        }
    }

    /// Override the inter-message delay (tests use zero).
    pub fn with_message_delay(mut self, delay: Duration) -> Self {
        self.message_delay = delay;
        self
    }

    /// One scheduled check across the watchlist.
    ///
    /// A failed ticker contributes a "data unavailable" status line and the
    /// run continues; there is no retry. Signals go out first (header plus
    /// one message per signal), the combined status report last, so
    /// actionable messages are not buried under routine status noise.
    ///
    /// Feed and delivery failures are absorbed per ticker / per message, so
    /// today no code path returns `Err`. The `Result` is the run-level
    /// error seam: anything a future step cannot absorb propagates here and
    /// is caught by the worker, which logs it and best-effort reports it
    /// without unsettling the schedule.
    pub async fn run_check(&self, stats: &mut RunStats) -> Result<()> {
        info!(tickers = self.tickers.len(), "Running breakout check");

        let till = Local::now().date_naive();
        let from = till - chrono::Duration::days(self.lookback_days);

        let mut signals = Vec::new();
        let mut status_lines = Vec::new();

        for ticker in &self.tickers {
            match self.feed.daily_candles(ticker, from, till).await {
                Ok(candles) => match signal::evaluate(ticker, &candles, &self.thresholds) {
                    Evaluation::Signal(s) => {
                        info!(
                            ticker,
                            kind = %s.kind,
                            price = s.price,
                            threshold = s.threshold,
                            "Breakout signal"
                        );
                        signals.push(s);
                    }
                    Evaluation::Status(st) => {
                        status_lines.push(self.formatter.status_line(&st));
                    }
                    Evaluation::InsufficientData => {
                        warn!(ticker, "Not enough candles for evaluation");
                        status_lines.push(self.formatter.insufficient_line(ticker));
                    }
                },
                Err(e) => {
                    warn!(ticker, error = %e, "Candle retrieval failed");
                    status_lines.push(self.formatter.unavailable_line(ticker));
                }
            }
        }

        let now = Local::now();

        if !signals.is_empty() {
            self.send(&self.formatter.signal_header(signals.len(), now)).await;
            for s in &signals {
                tokio::time::sleep(self.message_delay).await;
                self.send(&self.formatter.signal(s)).await;
            }
            tokio::time::sleep(self.message_delay).await;
        }

        if !status_lines.is_empty() {
            self.send(&self.formatter.status_report(&status_lines, now)).await;
        }

        stats.record_check(signals.len(), Utc::now());
        info!(signals = signals.len(), "Check complete");
        Ok(())
    }

    /// Send the daily digest.
    pub async fn send_digest(&self, stats: &RunStats) {
        self.send(&self.formatter.digest(stats, Local::now())).await;
    }

    /// Greeting sent once at startup, before the first check.
    pub async fn send_startup(&self, check_times: &str) {
        self.send(&self.formatter.startup(&self.tickers, check_times)).await;
    }

    /// Delivery failures are logged, never retried.
    async fn send(&self, text: &str) {
        if let Err(e) = self.notifier.send(text).await {
            error!(error = %e, "Notification delivery failed");
        }
    }
}

/// Drain the job queue sequentially. Owns the run counters, so every run
/// sees the stats of all previous runs and no two runs execute at once.
/// A failed run is logged and best-effort reported; the worker keeps going.
pub async fn run_worker(runner: SignalRunner, mut job_rx: mpsc::Receiver<Job>) {
    let mut stats = RunStats::default();
    info!("Worker running");

    while let Some(job) = job_rx.recv().await {
        match job {
            Job::Check => {
                // Catch-all for run-level errors (see `run_check`); keeps
                // the worker alive no matter what a run returns.
                if let Err(e) = runner.run_check(&mut stats).await {
                    error!(error = %e, "Check run failed");
                    runner.send(&format!("❌ Check run failed: {e}")).await;
                }
            }
            Job::Digest => runner.send_digest(&stats).await,
        }
    }

    warn!("Worker: job channel closed");
}
