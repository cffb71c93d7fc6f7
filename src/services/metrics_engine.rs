use chrono::{Datelike, Duration, Local, NaiveDate, TimeZone};

use crate::models::{DailyStat, DayFrequency, Item, LifetimeStats, TodayCompliance};

pub const TRAILING_DAYS: i64 = 7;

/// Calendar day a unix timestamp falls on, in local time.
pub fn local_date(ts: i64) -> Option<NaiveDate> {
    Local.timestamp_opt(ts, 0).single().map(|dt| dt.date_naive())
}

/// One bucket per trailing calendar day, oldest first, today last.
///
/// `total` counts tasks created on that day and `completed` counts tasks
/// completed on that day, wherever they were created. The two counts are
/// independent populations, not a subset relation.
pub fn daily_stats(items: &[Item], today: NaiveDate, days: i64) -> Vec<DailyStat> {
    (0..days)
        .rev()
        .map(|offset| {
            let day = today - Duration::days(offset);
            let total = items
                .iter()
                .filter_map(Item::as_task)
                .filter(|t| local_date(t.created_at) == Some(day))
                .count();
            let completed = items
                .iter()
                .filter_map(Item::as_task)
                .filter(|t| t.completed_at.and_then(local_date) == Some(day))
                .count();
            DailyStat {
                date: day.format("%a").to_string(),
                completed,
                total,
            }
        })
        .collect()
}

pub fn lifetime_stats(items: &[Item]) -> LifetimeStats {
    let total = items.iter().filter_map(Item::as_task).count();
    let completed = items
        .iter()
        .filter_map(Item::as_task)
        .filter(|t| t.completed)
        .count();
    LifetimeStats {
        total,
        completed,
        completion_rate: rounded_percent(completed, total),
    }
}

/// Days in the trailing window with at least one completion.
pub fn active_streak(daily: &[DailyStat]) -> usize {
    daily.iter().filter(|d| d.completed > 0).count()
}

/// Done day-marks over the month's expected total across all habits.
pub fn monthly_compliance(items: &[Item], days_in_month: u32) -> u32 {
    let habits: Vec<_> = items.iter().filter_map(Item::as_habit).collect();
    let expected = habits.len() * days_in_month as usize;
    let done: usize = habits.iter().map(|h| h.completed_days.len()).sum();
    rounded_percent(done, expected)
}

/// For each of the last 7 calendar days, the number of habits whose
/// completed set contains that day-of-month number. Bare day numbers alias
/// across month boundaries; that matches the persisted data model and is
/// kept as-is.
pub fn weekly_frequency(items: &[Item], today: NaiveDate) -> Vec<DayFrequency> {
    (0..TRAILING_DAYS)
        .rev()
        .map(|offset| {
            let date = today - Duration::days(offset);
            let day = date.day();
            let count = items
                .iter()
                .filter_map(Item::as_habit)
                .filter(|h| h.is_done_on(day))
                .count();
            DayFrequency {
                label: date.format("%a").to_string(),
                day,
                count,
            }
        })
        .collect()
}

pub fn today_compliance(items: &[Item], today: NaiveDate) -> TodayCompliance {
    let day = today.day();
    let total = items.iter().filter_map(Item::as_habit).count();
    let completed = items
        .iter()
        .filter_map(Item::as_habit)
        .filter(|h| h.is_done_on(day))
        .count();
    TodayCompliance { completed, total }
}

pub fn days_in_month(date: NaiveDate) -> u32 {
    let (year, month) = (date.year(), date.month());
    let next_month = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };
    next_month
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(30)
}

fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    (100.0 * part as f64 / whole as f64).round() as u32
}
