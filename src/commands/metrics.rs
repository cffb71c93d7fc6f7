use anyhow::Result;
use chrono::NaiveDate;

use crate::models::DailyMetric;
use crate::services::session::Session;

pub struct LogArgs {
    pub date: Option<NaiveDate>,
    pub screen_time: Option<u32>,
    pub mood: Option<u8>,
    pub energy: Option<u8>,
    pub achievement: Option<String>,
}

/// Upserts the record for the date, starting from the existing one so a
/// partial log keeps earlier fields.
pub fn log(session: &mut Session, args: LogArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(|| session.today());
    let mut metric = session
        .metrics()
        .iter()
        .find(|m| m.date == date)
        .cloned()
        .unwrap_or_else(|| DailyMetric::new(date));

    if let Some(screen_time) = args.screen_time {
        metric.screen_time = screen_time;
    }
    if let Some(mood) = args.mood {
        metric.mood = mood;
    }
    if let Some(energy) = args.energy {
        metric.energy = energy;
    }
    if let Some(achievement) = args.achievement {
        let achievement = achievement.trim().to_string();
        metric.achievement = (!achievement.is_empty()).then_some(achievement);
    }

    session.upsert_metric(metric);
    println!("Logged metrics for {}.", date);
    Ok(())
}

pub fn show(session: &Session) -> Result<()> {
    let recent: Vec<_> = session.metrics().iter().rev().take(7).collect();
    if recent.is_empty() {
        println!("No metrics logged yet. Use `zenith metrics log`.");
        return Ok(());
    }
    for metric in recent.into_iter().rev() {
        let achievement = metric.achievement.as_deref().unwrap_or("-");
        println!(
            "{}  screen {:>4}min  mood {:>2}/10  energy {:>2}/10  {}",
            metric.date, metric.screen_time, metric.mood, metric.energy, achievement
        );
    }
    Ok(())
}
