use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::database::Storage;
use crate::models::{DailyMetric, Habit, Item, Priority, Task, User};
use crate::utils::clock::Clock;

const ITEMS_KIND: &str = "items";
const METRICS_KIND: &str = "daily_metrics";
const USER_KEY: &str = "auth/current_user";

/// Owns the item collection and metric series for one user scope.
///
/// Every mutation is write-through: the whole collection is re-persisted via
/// the injected storage adapter. Mutations on unknown ids are silent no-ops
/// and persist failures are absorbed (logged, never surfaced), so the caller
/// never sees a broken state.
pub struct Session {
    items: Vec<Item>,
    metrics: Vec<DailyMetric>,
    user: Option<User>,
    storage: Box<dyn Storage>,
    clock: Box<dyn Clock>,
}

impl Session {
    pub fn open(storage: Box<dyn Storage>, clock: Box<dyn Clock>) -> Self {
        let mut session = Self {
            items: Vec::new(),
            metrics: Vec::new(),
            user: None,
            storage,
            clock,
        };
        session.user = session.load_value(USER_KEY);
        session.reload();
        session
    }

    // ─── Accessors ───

    /// Current collection, newest first.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.items.iter().filter_map(Item::as_task)
    }

    pub fn habits(&self) -> impl Iterator<Item = &Habit> {
        self.items.iter().filter_map(Item::as_habit)
    }

    pub fn metrics(&self) -> &[DailyMetric] {
        &self.metrics
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn today(&self) -> chrono::NaiveDate {
        self.clock.today()
    }

    // ─── Item store mutations ───

    /// Empty or whitespace-only text is rejected before it reaches the
    /// collection.
    pub fn add_task(&mut self, text: &str, priority: Priority) -> Option<Item> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        let task = Task::new(text.to_string(), priority, self.clock.timestamp());
        self.items.insert(0, Item::Task(task));
        self.persist_items();
        self.items.first().cloned()
    }

    pub fn add_habit(&mut self, name: &str, goal: u32) -> Option<Item> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        let habit = Habit::new(name.to_string(), goal, self.clock.timestamp());
        self.items.insert(0, Item::Habit(habit));
        self.persist_items();
        self.items.first().cloned()
    }

    /// Flips completion; `completed_at` is set on the transition to done and
    /// cleared on the way back. Applying it twice restores the prior state.
    pub fn toggle_task(&mut self, id: Uuid) -> Option<Item> {
        let now = self.clock.timestamp();
        let updated = self.items.iter_mut().find_map(|item| match item {
            Item::Task(t) if t.id == id => {
                t.completed = !t.completed;
                t.completed_at = if t.completed { Some(now) } else { None };
                Some(item.clone())
            }
            _ => None,
        })?;
        self.persist_items();
        Some(updated)
    }

    /// Adds `day` to the habit's completed set if absent, removes it
    /// otherwise. Days outside 1..=31 are ignored.
    pub fn toggle_habit_day(&mut self, id: Uuid, day: u32) -> Option<Item> {
        if !(1..=31).contains(&day) {
            return None;
        }
        let updated = self.items.iter_mut().find_map(|item| match item {
            Item::Habit(h) if h.id == id => {
                match h.completed_days.iter().position(|&d| d == day) {
                    Some(pos) => {
                        h.completed_days.remove(pos);
                    }
                    None => {
                        h.completed_days.push(day);
                        h.completed_days.sort_unstable();
                    }
                }
                Some(item.clone())
            }
            _ => None,
        })?;
        self.persist_items();
        Some(updated)
    }

    /// Replaces the text or name in place; timestamps are untouched.
    pub fn edit_item(&mut self, id: Uuid, new_text: &str) -> Option<Item> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return None;
        }
        let updated = self.items.iter_mut().find_map(|item| {
            if item.id() != id {
                return None;
            }
            match item {
                Item::Task(t) => t.text = new_text.to_string(),
                Item::Habit(h) => h.name = new_text.to_string(),
            }
            Some(item.clone())
        })?;
        self.persist_items();
        Some(updated)
    }

    /// Idempotent: deleting an absent id changes nothing.
    pub fn delete_item(&mut self, id: Uuid) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id() != id);
        if self.items.len() == before {
            return false;
        }
        self.persist_items();
        true
    }

    pub fn clear_completed(&mut self) -> usize {
        let before = self.items.len();
        self.items
            .retain(|item| !matches!(item, Item::Task(t) if t.completed));
        let removed = before - self.items.len();
        if removed > 0 {
            self.persist_items();
        }
        removed
    }

    // ─── Daily metrics ───

    /// At most one record per calendar date; an upsert replaces it whole.
    pub fn upsert_metric(&mut self, metric: DailyMetric) {
        match self.metrics.iter_mut().find(|m| m.date == metric.date) {
            Some(existing) => *existing = metric,
            None => {
                self.metrics.push(metric);
                self.metrics.sort_by_key(|m| m.date);
            }
        }
        self.persist_metrics();
    }

    // ─── Identity & scope ───

    /// Mocked login: records the user and swaps to their scope. Guest and
    /// per-user collections are disjoint; switching never merges.
    pub fn login(&mut self, user: User) {
        if let Ok(value) = serde_json::to_value(&user) {
            if let Err(e) = self.storage.set(USER_KEY, &value) {
                log::error!("failed to persist current user: {}", e);
            }
        }
        self.user = Some(user);
        self.reload();
    }

    pub fn logout(&mut self) {
        if let Err(e) = self.storage.remove(USER_KEY) {
            log::error!("failed to clear current user: {}", e);
        }
        self.user = None;
        self.reload();
    }

    // ─── Persistence ───

    fn scope(&self) -> String {
        match &self.user {
            Some(user) => format!("user:{}", user.id),
            None => "guest".to_string(),
        }
    }

    fn scoped_key(&self, kind: &str) -> String {
        format!("{}/{}", self.scope(), kind)
    }

    fn reload(&mut self) {
        self.items = self.load_collection(&self.scoped_key(ITEMS_KIND));
        self.metrics = self.load_collection(&self.scoped_key(METRICS_KIND));
    }

    fn load_value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.storage.get(key) {
            Ok(Some(value)) => serde_json::from_value(value).ok(),
            Ok(None) => None,
            Err(e) => {
                log::warn!("failed to read {}: {}", key, e);
                None
            }
        }
    }

    /// Malformed persisted state resets to an empty collection rather than
    /// failing the whole session.
    fn load_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        match self.storage.get(key) {
            Ok(Some(value)) => match serde_json::from_value(value) {
                Ok(parsed) => parsed,
                Err(e) => {
                    log::warn!("corrupt state under {}, resetting: {}", key, e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("corrupt state under {}, resetting: {}", key, e);
                Vec::new()
            }
        }
    }

    fn persist_items(&mut self) {
        let key = self.scoped_key(ITEMS_KIND);
        let json = serde_json::to_value(&self.items);
        self.write_value(&key, json);
    }

    fn persist_metrics(&mut self) {
        let key = self.scoped_key(METRICS_KIND);
        let json = serde_json::to_value(&self.metrics);
        self.write_value(&key, json);
    }

    fn write_value(&mut self, key: &str, json: Result<serde_json::Value, serde_json::Error>) {
        match json {
            Ok(value) => {
                if let Err(e) = self.storage.set(key, &value) {
                    log::error!("failed to persist {}: {}", key, e);
                }
            }
            Err(e) => log::error!("failed to serialize {}: {}", key, e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use chrono::TimeZone;
    use serde_json::json;

    use super::*;
    use crate::database::{MemoryStorage, StorageError};
    use crate::utils::clock::FixedClock;

    /// Handle onto a MemoryStorage that outlives the session, so tests can
    /// inspect what was persisted and reopen over the same data.
    #[derive(Clone, Default)]
    struct SharedStorage(Rc<RefCell<MemoryStorage>>);

    impl Storage for SharedStorage {
        fn get(&self, key: &str) -> Result<Option<serde_json::Value>, StorageError> {
            self.0.borrow().get(key)
        }

        fn set(&mut self, key: &str, value: &serde_json::Value) -> Result<(), StorageError> {
            self.0.borrow_mut().set(key, value)
        }

        fn remove(&mut self, key: &str) -> Result<(), StorageError> {
            self.0.borrow_mut().remove(key)
        }
    }

    fn fixed_clock() -> Box<FixedClock> {
        let instant = chrono::Local
            .with_ymd_and_hms(2024, 3, 15, 12, 0, 0)
            .single()
            .expect("valid test instant");
        Box::new(FixedClock(instant))
    }

    fn open_session() -> Session {
        Session::open(Box::new(MemoryStorage::new()), fixed_clock())
    }

    #[test]
    fn add_rejects_blank_text() {
        let mut session = open_session();
        assert!(session.add_task("", Priority::Low).is_none());
        assert!(session.add_task("   ", Priority::Low).is_none());
        assert!(session.add_habit("\t", 20).is_none());
        assert!(session.items().is_empty());

        assert!(session.add_task("Buy milk", Priority::Low).is_some());
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn add_inserts_newest_first() {
        let mut session = open_session();
        session.add_task("first", Priority::Medium);
        session.add_task("second", Priority::Medium);
        assert_eq!(session.items()[0].label(), "second");
        assert_eq!(session.items()[1].label(), "first");
    }

    #[test]
    fn toggle_task_is_self_inverse() {
        let mut session = open_session();
        let id = session.add_task("report", Priority::High).map(|i| i.id()).unwrap();

        let toggled = session.toggle_task(id).unwrap();
        let task = toggled.as_task().unwrap();
        assert!(task.completed);
        assert!(task.completed_at.is_some());

        let reverted = session.toggle_task(id).unwrap();
        let task = reverted.as_task().unwrap();
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn mutations_on_unknown_id_are_no_ops() {
        let mut session = open_session();
        session.add_task("keep me", Priority::Medium);
        let ghost = Uuid::new_v4();

        assert!(session.toggle_task(ghost).is_none());
        assert!(session.edit_item(ghost, "new").is_none());
        assert!(session.toggle_habit_day(ghost, 5).is_none());
        assert!(!session.delete_item(ghost));
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].label(), "keep me");
    }

    #[test]
    fn habit_day_double_toggle_restores_empty_set() {
        let mut session = open_session();
        let id = session.add_habit("Morning run", 20).map(|i| i.id()).unwrap();

        session.toggle_habit_day(id, 5);
        let habit = session.habits().next().unwrap();
        assert_eq!(habit.completed_days, vec![5]);

        session.toggle_habit_day(id, 5);
        let habit = session.habits().next().unwrap();
        assert!(habit.completed_days.is_empty());
    }

    #[test]
    fn habit_days_stay_sorted_and_bounded() {
        let mut session = open_session();
        let id = session.add_habit("Read", 10).map(|i| i.id()).unwrap();

        session.toggle_habit_day(id, 9);
        session.toggle_habit_day(id, 2);
        session.toggle_habit_day(id, 31);
        assert!(session.toggle_habit_day(id, 0).is_none());
        assert!(session.toggle_habit_day(id, 32).is_none());

        let habit = session.habits().next().unwrap();
        assert_eq!(habit.completed_days, vec![2, 9, 31]);
    }

    #[test]
    fn edit_keeps_timestamps() {
        let mut session = open_session();
        let id = session.add_task("draft", Priority::Low).map(|i| i.id()).unwrap();
        session.toggle_task(id);
        let before = session.tasks().next().unwrap().clone();

        let edited = session.edit_item(id, "final draft").unwrap();
        let task = edited.as_task().unwrap();
        assert_eq!(task.text, "final draft");
        assert_eq!(task.created_at, before.created_at);
        assert_eq!(task.completed_at, before.completed_at);

        // blank edits are dropped before the store
        assert!(session.edit_item(id, "  ").is_none());
        assert_eq!(session.tasks().next().unwrap().text, "final draft");
    }

    #[test]
    fn clear_completed_removes_only_done_tasks() {
        let mut session = open_session();
        let a = session.add_task("a", Priority::Low).map(|i| i.id()).unwrap();
        session.add_task("b", Priority::Low);
        session.add_habit("stretch", 20);
        session.toggle_task(a);

        assert_eq!(session.clear_completed(), 1);
        assert_eq!(session.items().len(), 2);
        assert_eq!(session.clear_completed(), 0);
    }

    #[test]
    fn upsert_metric_replaces_same_date() {
        let mut session = open_session();
        let date = chrono::NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut metric = DailyMetric::new(date);
        metric.mood = 4;
        session.upsert_metric(metric.clone());

        metric.mood = 9;
        metric.achievement = Some("shipped".to_string());
        session.upsert_metric(metric);

        assert_eq!(session.metrics().len(), 1);
        assert_eq!(session.metrics()[0].mood, 9);
        assert_eq!(session.metrics()[0].achievement.as_deref(), Some("shipped"));
    }

    #[test]
    fn mutations_write_through_to_storage() {
        let storage = SharedStorage::default();
        let mut session = Session::open(Box::new(storage.clone()), fixed_clock());
        session.add_task("persisted", Priority::Medium);
        drop(session);

        let reopened = Session::open(Box::new(storage), fixed_clock());
        assert_eq!(reopened.items().len(), 1);
        assert_eq!(reopened.items()[0].label(), "persisted");
    }

    #[test]
    fn corrupt_state_resets_to_empty() {
        let storage = SharedStorage::default();
        storage
            .0
            .borrow_mut()
            .set("guest/items", &json!({"not": "a collection"}))
            .unwrap();

        let session = Session::open(Box::new(storage), fixed_clock());
        assert!(session.items().is_empty());
    }

    #[test]
    fn login_swaps_scope_and_logout_restores_it() {
        let storage = SharedStorage::default();
        let mut session = Session::open(Box::new(storage.clone()), fixed_clock());
        session.add_task("guest task", Priority::Low);

        session.login(User {
            id: "u-1".to_string(),
            name: "Alex".to_string(),
            email: "alex@example.com".to_string(),
            picture: "https://picsum.photos/id/64/100/100".to_string(),
        });
        assert!(session.items().is_empty());
        session.add_task("alex task", Priority::High);
        assert_eq!(session.items().len(), 1);

        session.logout();
        assert_eq!(session.items().len(), 1);
        assert_eq!(session.items()[0].label(), "guest task");

        // the signed-in scope survives untouched
        let relogged = Session::open(Box::new(storage), fixed_clock());
        assert!(relogged.user().is_none());
    }

    #[test]
    fn session_restores_persisted_user() {
        let storage = SharedStorage::default();
        let mut session = Session::open(Box::new(storage.clone()), fixed_clock());
        session.login(User {
            id: "u-2".to_string(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            picture: String::new(),
        });
        session.add_task("mine", Priority::Medium);
        drop(session);

        let reopened = Session::open(Box::new(storage), fixed_clock());
        assert_eq!(reopened.user().map(|u| u.id.as_str()), Some("u-2"));
        assert_eq!(reopened.items().len(), 1);
    }
}
