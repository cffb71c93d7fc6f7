use anyhow::Result;
use chrono::Datelike;

use crate::models::Item;
use crate::services::session::Session;

use super::{find_item, short_id};

pub fn add(session: &mut Session, name: &str, goal: u32) -> Result<()> {
    match session.add_habit(name, goal) {
        Some(item) => println!("Added habit {} ({})", item.label(), short_id(item.id())),
        None => println!("Nothing to add: habit name is empty."),
    }
    Ok(())
}

pub fn list(session: &Session) -> Result<()> {
    let today = session.today().day();
    let mut any = false;
    for habit in session.habits() {
        any = true;
        let marker = if habit.is_done_on(today) { "[x]" } else { "[ ]" };
        println!(
            "{} {:8} {:2}/{:2} days  {}",
            marker,
            short_id(habit.id),
            habit.completed_days.len(),
            habit.goal,
            habit.name
        );
    }
    if !any {
        println!("No habits yet. Add one with `zenith habit add`.");
    }
    Ok(())
}

pub fn check(session: &mut Session, selector: &str, day: Option<u32>) -> Result<()> {
    let Some(id) = find_item(session, selector, |i| matches!(i, Item::Habit(_))) else {
        println!("No habit matches '{}'.", selector);
        return Ok(());
    };
    let day = day.unwrap_or_else(|| session.today().day());
    match session.toggle_habit_day(id, day) {
        Some(Item::Habit(habit)) => {
            if habit.is_done_on(day) {
                println!("Marked {} done on day {}.", habit.name, day);
            } else {
                println!("Unmarked {} on day {}.", habit.name, day);
            }
        }
        _ => println!("Day {} is out of range.", day),
    }
    Ok(())
}

pub fn delete(session: &mut Session, selector: &str) -> Result<()> {
    let Some(id) = find_item(session, selector, |i| matches!(i, Item::Habit(_))) else {
        println!("No habit matches '{}'.", selector);
        return Ok(());
    };
    session.delete_item(id);
    println!("Deleted.");
    Ok(())
}
