// src/scheduler.rs
//! Once-a-day trigger for the screening pass.
//!
//! The loop wakes every `poll` interval and runs the job when the wall clock
//! has reached the next scheduled time. Days the process was not running are
//! not caught up; a job that overruns the next slot simply runs late once.

use std::future::Future;
use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use tokio::time::MissedTickBehavior;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailySchedule {
    at: NaiveTime,
    next_run: NaiveDateTime,
}

impl DailySchedule {
    /// First run is today at `at` if that is still ahead of `now`, else tomorrow.
    pub fn new(at: NaiveTime, now: NaiveDateTime) -> Self {
        Self {
            at,
            next_run: next_occurrence(at, now),
        }
    }

    pub fn next_run(&self) -> NaiveDateTime {
        self.next_run
    }

    pub fn is_due(&self, now: NaiveDateTime) -> bool {
        now >= self.next_run
    }

    /// Advance to the first slot strictly after `now`.
    pub fn mark_ran(&mut self, now: NaiveDateTime) {
        self.next_run = next_occurrence(self.at, now);
    }
}

fn next_occurrence(at: NaiveTime, now: NaiveDateTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

/// Local wall-clock time.
pub fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

/// Poll forever, running `job` whenever the schedule is due. The job runs
/// inline, so polling pauses until it returns.
pub async fn run_daily<C, F, Fut>(mut schedule: DailySchedule, poll: Duration, clock: C, mut job: F)
where
    C: Fn() -> NaiveDateTime,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tracing::info!(next_run = %schedule.next_run(), poll_secs = poll.as_secs(), "daily schedule armed");
    let mut ticker = tokio::time::interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        if !schedule.is_due(clock()) {
            tracing::trace!("not due yet");
            continue;
        }
        job().await;
        schedule.mark_ran(clock());
        tracing::info!(next_run = %schedule.next_run(), "scheduled pass done");
    }
}

/// Arm the schedule from `clock()` before anything else, then run the job
/// once if `run_on_start`, then poll. A startup pass that runs past `at`
/// still leaves today's slot due.
pub async fn run_daily_after_startup<C, F, Fut>(
    at: NaiveTime,
    run_on_start: bool,
    poll: Duration,
    clock: C,
    mut job: F,
) where
    C: Fn() -> NaiveDateTime,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    let schedule = DailySchedule::new(at, clock());
    if run_on_start {
        tracing::info!("startup pass");
        job().await;
    }
    run_daily(schedule, poll, clock, job).await
}
