use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One subjective self-report per calendar date. Upserts replace the whole
/// record for that date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub screen_time: u32,
    pub mood: u8,
    pub energy: u8,
    pub achievement: Option<String>,
}

impl DailyMetric {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            screen_time: 0,
            mood: 5,
            energy: 5,
            achievement: None,
        }
    }
}
