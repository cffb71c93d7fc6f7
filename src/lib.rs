pub mod cli;
pub mod commands;
pub mod database;
pub mod models;
pub mod services;
pub mod utils;

pub use database::{MemoryStorage, SqliteStorage, Storage};
pub use models::{AIInsights, DailyMetric, Habit, Item, Priority, Task, User};
pub use services::session::Session;
