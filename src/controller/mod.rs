//! Group lifecycle controller module
//!
//! Orchestrates the store, scheduler and transport in response to the two
//! inbound events: the bot joining a group and a deadline submission.
//! Owns the in-memory deadline cache and is the only writer to it.

pub mod cache;

pub use cache::DeadlineCache;

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use chrono::{NaiveDate, Utc};
use regex::Regex;
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::config::ScheduleConfig;
use crate::database::DeadlineRepository;
use crate::messages;
use crate::scheduler::CountdownScheduler;
use crate::transport::Transport;
use crate::utils::errors::{DeadlineBuddyError, Result};

/// Strict literal deadline format accepted from groups.
const DATE_FORMAT: &str = "%Y-%m-%d";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"))
}

/// Parse submitted text as a `YYYY-MM-DD` calendar date.
///
/// The regex pre-check keeps chrono's lenient parsing from accepting
/// unpadded variants like `2025-1-1`.
pub fn parse_deadline(text: &str) -> Result<NaiveDate> {
    let text = text.trim();
    if !date_pattern().is_match(text) {
        return Err(DeadlineBuddyError::InvalidDateFormat(text.to_string()));
    }

    NaiveDate::parse_from_str(text, DATE_FORMAT)
        .map_err(|_| DeadlineBuddyError::InvalidDateFormat(text.to_string()))
}

pub struct GroupLifecycleController {
    cache: DeadlineCache,
    store: Arc<dyn DeadlineRepository>,
    scheduler: Arc<CountdownScheduler>,
    transport: Arc<dyn Transport>,
    schedule: ScheduleConfig,
    /// Per-group exclusion for the update-cache / persist / replace-job
    /// sequence, so two submissions for one group can never interleave
    /// and apply out of arrival order.
    group_locks: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl GroupLifecycleController {
    pub fn new(
        cache: DeadlineCache,
        store: Arc<dyn DeadlineRepository>,
        scheduler: Arc<CountdownScheduler>,
        transport: Arc<dyn Transport>,
        schedule: ScheduleConfig,
    ) -> Self {
        Self {
            cache,
            store,
            scheduler,
            transport,
            schedule,
            group_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Reconstruct cache and jobs from durable storage after a restart.
    /// Fires missed while the process was down are not replayed.
    pub async fn rehydrate(&self) -> Result<()> {
        let deadlines = self.store.list().await?;
        let count = deadlines.len();

        for deadline in deadlines {
            self.cache
                .insert(deadline.group_id, deadline.deadline_date)
                .await;
            self.scheduler.schedule(deadline.group_id).await;
        }

        info!(count = count, "Rehydrated countdown jobs from storage");
        Ok(())
    }

    /// Handle the bot joining (or rejoining) a group.
    ///
    /// Idempotent: a second join for an already-tracked group just
    /// replaces its job in place and sends nothing.
    pub async fn on_group_joined(&self, group_id: i64) -> Result<()> {
        match self.store.get(group_id).await {
            Ok(Some(deadline_date)) => {
                let lock = self.group_lock(group_id).await;
                let _guard = lock.lock().await;

                self.cache.insert(group_id, deadline_date).await;
                self.scheduler.schedule(group_id).await;
                info!(
                    group_id = group_id,
                    deadline = %deadline_date,
                    "Restored deadline for rejoined group"
                );
            }
            Ok(None) => {
                debug!(group_id = group_id, "New group, sending onboarding prompt");
                self.reply(group_id, messages::onboarding_prompt()).await;
            }
            Err(e) => {
                error!(group_id = group_id, operation = "get", error = %e, "Storage unavailable during group join");
            }
        }

        Ok(())
    }

    /// Handle a text submission in a group.
    ///
    /// Invalid or past dates get a specific reply and change nothing. A
    /// valid date is cached, persisted, scheduled and confirmed, followed
    /// by one immediate countdown delivery.
    pub async fn on_deadline_submitted(&self, group_id: i64, text: &str) -> Result<()> {
        let deadline_date = match parse_deadline(text) {
            Ok(date) => date,
            Err(_) => {
                debug!(group_id = group_id, "Rejected malformed deadline text");
                self.reply(group_id, messages::format_error()).await;
                return Ok(());
            }
        };

        let today = Utc::now().date_naive();
        if deadline_date < today {
            debug!(group_id = group_id, deadline = %deadline_date, "Rejected past deadline");
            self.reply(group_id, messages::date_passed()).await;
            return Ok(());
        }

        let lock = self.group_lock(group_id).await;
        let _guard = lock.lock().await;

        let previous = self.cache.insert(group_id, deadline_date).await;

        if let Err(e) = self.store.upsert(group_id, deadline_date).await {
            error!(group_id = group_id, operation = "upsert", error = %e, "Failed to persist deadline");

            // Keep cache and store consistent: undo the optimistic insert.
            match previous {
                Some(old) => {
                    self.cache.insert(group_id, old).await;
                }
                None => {
                    self.cache.remove(group_id).await;
                }
            }

            self.reply(group_id, messages::storage_failure()).await;
            return Ok(());
        }

        self.scheduler.schedule(group_id).await;

        let days_left = (deadline_date - today).num_days();
        info!(
            group_id = group_id,
            deadline = %deadline_date,
            days_left = days_left,
            "Deadline set"
        );

        self.reply(
            group_id,
            messages::confirmation(deadline_date, days_left, &self.schedule.display()),
        )
        .await;

        // First reminder is visible immediately, not at the next fire.
        self.scheduler.trigger_now(group_id).await;

        Ok(())
    }

    /// Cancel all jobs; called on shutdown.
    pub async fn shutdown(&self) {
        self.scheduler.cancel_all().await;
    }

    /// Current cached deadline for a group, if any.
    pub async fn deadline_for(&self, group_id: i64) -> Option<NaiveDate> {
        self.cache.get(group_id).await
    }

    async fn group_lock(&self, group_id: i64) -> Arc<Mutex<()>> {
        let mut locks = self.group_locks.lock().await;
        Arc::clone(locks.entry(group_id).or_default())
    }

    /// Send a reply, logging delivery failure without surfacing it.
    async fn reply(&self, group_id: i64, text: String) {
        if let Err(e) = self.transport.send_markdown(group_id, text).await {
            error!(group_id = group_id, error = %e, "Failed to send reply");
        }
    }
}
