use serde::{Deserialize, Serialize};

/// One bucket of the trailing-window chart: tasks created on that day vs.
/// tasks completed on that day. The two counts are independent populations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: String,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LifetimeStats {
    pub total: usize,
    pub completed: usize,
    pub completion_rate: u32,
}

/// Habit completions matching one day of the trailing week, keyed by bare
/// day-of-month number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayFrequency {
    pub label: String,
    pub day: u32,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TodayCompliance {
    pub completed: usize,
    pub total: usize,
}
