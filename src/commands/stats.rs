use anyhow::Result;

use crate::services::metrics_engine;
use crate::services::session::Session;

pub fn show(session: &Session) -> Result<()> {
    let items = session.items();
    let today = session.today();

    let lifetime = metrics_engine::lifetime_stats(items);
    let daily = metrics_engine::daily_stats(items, today, metrics_engine::TRAILING_DAYS);

    println!("Lifetime: {}/{} done ({}%)", lifetime.completed, lifetime.total, lifetime.completion_rate);
    println!("Active streak: {} of the last 7 days", metrics_engine::active_streak(&daily));
    println!();
    println!("Last 7 days (created / completed):");
    for stat in &daily {
        println!(
            "  {:3}  {:>2} created  {:>2} completed  {}",
            stat.date,
            stat.total,
            stat.completed,
            "#".repeat(stat.completed)
        );
    }

    let habit_count = session.habits().count();
    if habit_count > 0 {
        let days = metrics_engine::days_in_month(today);
        let compliance = metrics_engine::monthly_compliance(items, days);
        let today_c = metrics_engine::today_compliance(items, today);
        println!();
        println!("Habits: {}/{} done today, {}% monthly compliance", today_c.completed, today_c.total, compliance);
        println!("Weekly frequency:");
        for freq in metrics_engine::weekly_frequency(items, today) {
            println!("  {:3} {:>2}  {}", freq.label, freq.day, "#".repeat(freq.count));
        }
    }

    Ok(())
}
