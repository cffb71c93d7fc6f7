use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_CATEGORY: &str = "General";
pub const DEFAULT_HABIT_GOAL: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" | "med" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    pub completed: bool,
    pub priority: Priority,
    pub category: String,
    pub created_at: i64,
    pub completed_at: Option<i64>,
}

impl Task {
    pub fn new(text: String, priority: Priority, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            text,
            completed: false,
            priority,
            category: DEFAULT_CATEGORY.to_string(),
            created_at,
            completed_at: None,
        }
    }
}

/// Habit completions are tracked per day-of-month (1..=31) against the
/// current month's goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: Uuid,
    pub name: String,
    pub goal: u32,
    pub completed_days: Vec<u32>,
    pub category: String,
    pub created_at: i64,
}

impl Habit {
    pub fn new(name: String, goal: u32, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            goal: goal.max(1),
            completed_days: Vec::new(),
            category: DEFAULT_CATEGORY.to_string(),
            created_at,
        }
    }

    pub fn is_done_on(&self, day: u32) -> bool {
        self.completed_days.contains(&day)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Item {
    Task(Task),
    Habit(Habit),
}

impl Item {
    pub fn id(&self) -> Uuid {
        match self {
            Item::Task(t) => t.id,
            Item::Habit(h) => h.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Item::Task(t) => &t.text,
            Item::Habit(h) => &h.name,
        }
    }

    pub fn category(&self) -> &str {
        match self {
            Item::Task(t) => &t.category,
            Item::Habit(h) => &h.category,
        }
    }

    pub fn created_at(&self) -> i64 {
        match self {
            Item::Task(t) => t.created_at,
            Item::Habit(h) => h.created_at,
        }
    }

    pub fn as_task(&self) -> Option<&Task> {
        match self {
            Item::Task(t) => Some(t),
            Item::Habit(_) => None,
        }
    }

    pub fn as_habit(&self) -> Option<&Habit> {
        match self {
            Item::Habit(h) => Some(h),
            Item::Task(_) => None,
        }
    }
}
