use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::Config;
use feed::MoexClient;
use notify::{MessageFormatter, TelegramNotifier};
use runner::{run_scheduler, run_worker, Job, SignalRunner, Trigger, WatchlistConfig};

#[tokio::main]
async fn main() {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse().unwrap()))
        .init();

    // ── Config ───────────────────────────────────────────────────────────────
    let cfg = Config::from_env();
    let watchlist = WatchlistConfig::load(&cfg.watchlist_path);
    info!(
        tickers = watchlist.tickers.len(),
        buy_pct = cfg.thresholds.buy_pct,
        sell_pct = cfg.thresholds.sell_pct,
        "SignalBot starting"
    );

    // ── Collaborators ────────────────────────────────────────────────────────
    let feed = Arc::new(MoexClient::new());
    let notifier = Arc::new(TelegramNotifier::new(
        cfg.telegram_token.clone(),
        cfg.telegram_chat_id,
    ));
    let formatter = MessageFormatter::new(watchlist.names(), cfg.thresholds);

    let runner = SignalRunner::new(
        feed,
        notifier,
        watchlist.symbols(),
        formatter,
        cfg.thresholds,
        cfg.lookback_days,
    );

    // ── Startup greeting ─────────────────────────────────────────────────────
    let check_times: Vec<String> = cfg
        .check_times
        .iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();
    runner.send_startup(&check_times.join(", ")).await;

    // ── Scheduler + worker ───────────────────────────────────────────────────
    let (job_tx, job_rx) = mpsc::channel::<Job>(8);

    // One immediate check before entering the schedule
    let _ = job_tx.send(Job::Check).await;

    let mut triggers: Vec<Trigger> = cfg
        .check_times
        .iter()
        .map(|&time| Trigger {
            time,
            job: Job::Check,
        })
        .collect();
    triggers.push(Trigger {
        time: cfg.digest_time,
        job: Job::Digest,
    });

    tokio::spawn(run_scheduler(triggers, job_tx));
    tokio::spawn(run_worker(runner, job_rx));

    info!("All subsystems started. Waiting for shutdown signal.");
    tokio::signal::ctrl_c().await.unwrap();
    info!("Shutdown signal received. Exiting.");
}
