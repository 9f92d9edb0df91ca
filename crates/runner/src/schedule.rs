use chrono::{Duration, Local, NaiveDateTime, NaiveTime};
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::Job;

/// One daily trigger: enqueue `job` at `time` (local wall clock).
#[derive(Debug, Clone, Copy)]
pub struct Trigger {
    pub time: NaiveTime,
    pub job: Job,
}

/// Next wall-clock occurrence of `time` strictly after `now`.
pub fn next_occurrence(now: NaiveDateTime, time: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(time);
    if today > now {
        today
    } else {
        today + Duration::days(1)
    }
}

/// The earliest upcoming occurrence and every job due at exactly that
/// moment. Triggers configured for the same wall-clock time fire together
/// instead of shadowing each other for a day.
pub fn due_jobs(triggers: &[Trigger], now: NaiveDateTime) -> Option<(NaiveDateTime, Vec<Job>)> {
    let occurrences: Vec<(NaiveDateTime, Job)> = triggers
        .iter()
        .map(|t| (next_occurrence(now, t.time), t.job))
        .collect();
    let earliest = occurrences.iter().map(|(at, _)| *at).min()?;
    let jobs = occurrences
        .into_iter()
        .filter(|(at, _)| *at == earliest)
        .map(|(_, job)| job)
        .collect();
    Some((earliest, jobs))
}

/// Daily scheduler loop: sleep until the earliest trigger, enqueue every
/// job due at that moment, repeat forever. Fire-and-continue — a full
/// queue or a failed run never unregisters a trigger; only a closed queue
/// stops the loop.
pub async fn run_scheduler(triggers: Vec<Trigger>, job_tx: mpsc::Sender<Job>) {
    loop {
        let now = Local::now().naive_local();
        let Some((at, jobs)) = due_jobs(&triggers, now) else {
            warn!("Scheduler started with no triggers — exiting");
            return;
        };

        let wait = (at - now).to_std().unwrap_or(std::time::Duration::ZERO);
        info!(jobs = ?jobs, at = %at, "Next trigger scheduled");
        tokio::time::sleep(wait).await;

        for job in jobs {
            if job_tx.send(job).await.is_err() {
                warn!("Job channel closed — scheduler exiting");
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn later_today_when_time_not_passed() {
        let next = next_occurrence(at(9, 0), hm(19, 0));
        assert_eq!(next, at(19, 0));
    }

    #[test]
    fn tomorrow_when_time_already_passed() {
        let next = next_occurrence(at(20, 0), hm(19, 0));
        assert_eq!(
            next,
            NaiveDate::from_ymd_opt(2024, 6, 4)
                .unwrap()
                .and_hms_opt(19, 0, 0)
                .unwrap()
        );
    }

    #[test]
    fn coinciding_triggers_fire_together() {
        // A check time configured equal to the digest time must enqueue
        // both jobs, not shadow one of them for a day.
        let triggers = vec![
            Trigger { time: hm(19, 0), job: Job::Check },
            Trigger { time: hm(19, 0), job: Job::Digest },
            Trigger { time: hm(21, 0), job: Job::Check },
        ];
        let (when, jobs) = due_jobs(&triggers, at(9, 0)).unwrap();
        assert_eq!(when, at(19, 0));
        assert_eq!(jobs, vec![Job::Check, Job::Digest]);
    }

    #[test]
    fn distinct_triggers_fire_earliest_only() {
        let triggers = vec![
            Trigger { time: hm(10, 0), job: Job::Check },
            Trigger { time: hm(21, 0), job: Job::Digest },
        ];
        let (when, jobs) = due_jobs(&triggers, at(9, 0)).unwrap();
        assert_eq!(when, at(10, 0));
        assert_eq!(jobs, vec![Job::Check]);
    }

    #[test]
    fn no_triggers_yields_nothing() {
        assert!(due_jobs(&[], at(9, 0)).is_none());
    }

    #[test]
    fn exact_trigger_moment_rolls_to_tomorrow() {
        // Strictly after `now`, so firing at 19:00 schedules tomorrow's run.
        let next = next_occurrence(at(19, 0), hm(19, 0));
        assert_eq!(next.date(), NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
    }
}
