//! Daily login streak

use chrono::{DateTime, Days, Utc};
use serde::{Deserialize, Serialize};

/// Consecutive-day login counter, compared on UTC calendar dates
///
/// Serialized as the flat `streak` / `lastLoginDate` pair used by stored
/// application documents.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Streak {
    #[serde(default, rename = "streak")]
    pub count: u32,
    #[serde(default, rename = "lastLoginDate")]
    pub last_login: Option<DateTime<Utc>>,
}

/// Outcome of a streak check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakChange {
    /// Already checked in today
    Unchanged,
    /// First login ever
    Started,
    /// Last login was yesterday
    Extended,
    /// Last login was before yesterday
    Reset,
}

impl Streak {
    /// Record a login at `now` and update the counter
    pub fn check_in(&mut self, now: DateTime<Utc>) -> StreakChange {
        let today = now.date_naive();
        let change = match self.last_login.map(|t| t.date_naive()) {
            Some(last) if last == today => return StreakChange::Unchanged,
            Some(last) if today.checked_sub_days(Days::new(1)) == Some(last) => {
                self.count += 1;
                StreakChange::Extended
            }
            Some(_) => {
                self.count = 1;
                StreakChange::Reset
            }
            None => {
                self.count = 1;
                StreakChange::Started
            }
        };
        self.last_login = Some(now);
        change
    }
}
