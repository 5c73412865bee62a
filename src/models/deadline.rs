//! Group deadline row model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One tracked deadline, keyed by the Telegram group id.
///
/// At most one row exists per group; submitting a new deadline overwrites
/// the old one rather than appending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct GroupDeadline {
    pub group_id: i64,
    pub deadline_date: NaiveDate,
}

impl GroupDeadline {
    pub fn new(group_id: i64, deadline_date: NaiveDate) -> Self {
        Self {
            group_id,
            deadline_date,
        }
    }

    /// Whole days between `today` and the deadline. Negative once the
    /// deadline has passed.
    pub fn days_left(&self, today: NaiveDate) -> i64 {
        (self.deadline_date - today).num_days()
    }
}
