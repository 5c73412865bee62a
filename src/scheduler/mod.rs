//! Countdown scheduler module
//!
//! Owns one recurring daily trigger per group. Each job is a spawned task
//! that sleeps until the next configured fire instant (UTC wall clock),
//! delivers the countdown for its group, and repeats. Replacing a group's
//! job always aborts the old handle before inserting the new one, so two
//! live jobs for the same group never coexist.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::ScheduleConfig;
use crate::controller::cache::DeadlineCache;
use crate::messages;
use crate::transport::Transport;

pub struct CountdownScheduler {
    /// One live job per group. The mutex serializes replacements for the
    /// same group; distinct groups only contend on the map itself.
    jobs: Mutex<HashMap<i64, JoinHandle<()>>>,
    cache: DeadlineCache,
    transport: Arc<dyn Transport>,
    schedule: ScheduleConfig,
}

impl CountdownScheduler {
    pub fn new(cache: DeadlineCache, transport: Arc<dyn Transport>, schedule: ScheduleConfig) -> Self {
        Self {
            jobs: Mutex::new(HashMap::new()),
            cache,
            transport,
            schedule,
        }
    }

    /// Install the recurring daily job for a group, replacing any existing
    /// one. The old handle is aborted before the new task is inserted, so
    /// a superseded trigger can never fire afterwards.
    pub async fn schedule(&self, group_id: i64) {
        let mut jobs = self.jobs.lock().await;

        if let Some(old) = jobs.remove(&group_id) {
            old.abort();
            debug!(group_id = group_id, "Replaced existing countdown job");
        }

        let cache = self.cache.clone();
        let transport = Arc::clone(&self.transport);
        let schedule = self.schedule;

        let handle = tokio::spawn(async move {
            loop {
                let wait = until_next_fire(&schedule, Utc::now());
                tokio::time::sleep(wait).await;
                deliver_countdown(&cache, transport.as_ref(), group_id).await;
            }
        });

        jobs.insert(group_id, handle);
        info!(group_id = group_id, "Scheduled daily countdown job");
    }

    /// Remove the job for a group if present; no-op otherwise.
    pub async fn cancel(&self, group_id: i64) {
        let mut jobs = self.jobs.lock().await;
        if let Some(handle) = jobs.remove(&group_id) {
            handle.abort();
            info!(group_id = group_id, "Cancelled countdown job");
        }
    }

    /// Teardown: abort every live job.
    pub async fn cancel_all(&self) {
        let mut jobs = self.jobs.lock().await;
        let count = jobs.len();
        for (_, handle) in jobs.drain() {
            handle.abort();
        }
        if count > 0 {
            info!(count = count, "Cancelled all countdown jobs");
        }
    }

    /// Run one delivery immediately, outside the daily cadence. Used for
    /// the first reminder right after a deadline is confirmed.
    pub async fn trigger_now(&self, group_id: i64) {
        deliver_countdown(&self.cache, self.transport.as_ref(), group_id).await;
    }

    pub async fn has_job(&self, group_id: i64) -> bool {
        self.jobs.lock().await.contains_key(&group_id)
    }

    pub async fn job_count(&self) -> usize {
        self.jobs.lock().await.len()
    }
}

/// Deliver one countdown message for a group.
///
/// A group missing from the cache is skipped silently (it may have been
/// removed between scheduling and firing). Delivery failures are logged
/// and swallowed; they must not kill the job loop.
async fn deliver_countdown(cache: &DeadlineCache, transport: &dyn Transport, group_id: i64) {
    let Some(deadline_date) = cache.get(group_id).await else {
        debug!(group_id = group_id, "No cached deadline, skipping fire");
        return;
    };

    let days_left = (deadline_date - Utc::now().date_naive()).num_days();
    let text = messages::compose(days_left);

    if let Err(e) = transport.send_markdown(group_id, text).await {
        error!(
            group_id = group_id,
            days_left = days_left,
            error = %e,
            "Failed to deliver countdown message"
        );
    }
}

/// Time until the next daily fire instant, strictly in the future.
fn until_next_fire(schedule: &ScheduleConfig, now: DateTime<Utc>) -> std::time::Duration {
    let mut next = now.date_naive().and_time(schedule.fire_time()).and_utc();
    if next <= now {
        next += chrono::Duration::days(1);
    }

    (next - now)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn seven_utc() -> ScheduleConfig {
        ScheduleConfig {
            fire_hour: 7,
            fire_minute: 0,
        }
    }

    #[test]
    fn test_until_next_fire_before_fire_time() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 5, 0, 0).unwrap();
        let wait = until_next_fire(&seven_utc(), now);
        assert_eq!(wait, std::time::Duration::from_secs(2 * 3600));
    }

    #[test]
    fn test_until_next_fire_after_fire_time_rolls_to_tomorrow() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
        let wait = until_next_fire(&seven_utc(), now);
        assert_eq!(wait, std::time::Duration::from_secs((24 - 1) * 3600 - 1800));
    }

    #[test]
    fn test_until_next_fire_exactly_at_fire_time_is_a_full_day() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 7, 0, 0).unwrap();
        let wait = until_next_fire(&seven_utc(), now);
        assert_eq!(wait, std::time::Duration::from_secs(24 * 3600));
    }
}
