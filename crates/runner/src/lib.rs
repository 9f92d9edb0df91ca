pub mod runner;
pub mod schedule;
pub mod watchlist;

pub use runner::{run_worker, Job, SignalRunner};
pub use schedule::{due_jobs, next_occurrence, run_scheduler, Trigger};
pub use watchlist::{TickerEntry, WatchlistConfig};
