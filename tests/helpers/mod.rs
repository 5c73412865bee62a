//! Test helpers: in-memory fakes for the transport and store seams

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use DeadlineBuddy::config::ScheduleConfig;
use DeadlineBuddy::controller::{DeadlineCache, GroupLifecycleController};
use DeadlineBuddy::database::DeadlineRepository;
use DeadlineBuddy::models::GroupDeadline;
use DeadlineBuddy::scheduler::CountdownScheduler;
use DeadlineBuddy::transport::Transport;
use DeadlineBuddy::utils::errors::{DeadlineBuddyError, Result};

/// Transport fake that records every outgoing message and can be switched
/// into a failing mode.
#[derive(Default)]
pub struct FakeTransport {
    sent: Mutex<Vec<(i64, String)>>,
    fail: AtomicBool,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().await.clone()
    }

    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send_markdown(&self, group_id: i64, text: String) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeadlineBuddyError::Io(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                "simulated delivery failure",
            )));
        }
        self.sent.lock().await.push((group_id, text));
        Ok(())
    }
}

/// In-memory deadline store with a switchable failure mode standing in for
/// an unreachable database.
#[derive(Default)]
pub struct FakeStore {
    rows: Mutex<HashMap<i64, NaiveDate>>,
    fail: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn with_deadline(self: Arc<Self>, group_id: i64, date: NaiveDate) -> Arc<Self> {
        self.rows.lock().await.insert(group_id, date);
        self
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub async fn stored(&self, group_id: i64) -> Option<NaiveDate> {
        self.rows.lock().await.get(&group_id).copied()
    }

    fn check_available(&self) -> Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DeadlineBuddyError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl DeadlineRepository for FakeStore {
    async fn get(&self, group_id: i64) -> Result<Option<NaiveDate>> {
        self.check_available()?;
        Ok(self.rows.lock().await.get(&group_id).copied())
    }

    async fn upsert(&self, group_id: i64, deadline_date: NaiveDate) -> Result<()> {
        self.check_available()?;
        self.rows.lock().await.insert(group_id, deadline_date);
        Ok(())
    }

    async fn list(&self) -> Result<Vec<GroupDeadline>> {
        self.check_available()?;
        Ok(self
            .rows
            .lock()
            .await
            .iter()
            .map(|(&group_id, &deadline_date)| GroupDeadline::new(group_id, deadline_date))
            .collect())
    }
}

/// Fully wired controller over fakes.
pub struct TestHarness {
    pub controller: GroupLifecycleController,
    pub scheduler: Arc<CountdownScheduler>,
    pub transport: Arc<FakeTransport>,
    pub store: Arc<FakeStore>,
}

pub fn build_harness(store: Arc<FakeStore>) -> TestHarness {
    let schedule = ScheduleConfig {
        fire_hour: 7,
        fire_minute: 0,
    };
    let transport = FakeTransport::new();
    let cache = DeadlineCache::new();
    let scheduler = Arc::new(CountdownScheduler::new(
        cache.clone(),
        transport.clone() as Arc<dyn Transport>,
        schedule,
    ));
    let controller = GroupLifecycleController::new(
        cache,
        store.clone() as Arc<dyn DeadlineRepository>,
        Arc::clone(&scheduler),
        transport.clone() as Arc<dyn Transport>,
        schedule,
    );

    TestHarness {
        controller,
        scheduler,
        transport,
        store,
    }
}
