use anyhow::Result;

use crate::models::{Item, Priority};
use crate::services::session::Session;

use super::{find_item, short_id};

pub fn add(session: &mut Session, text: &str, priority: Priority) -> Result<()> {
    match session.add_task(text, priority) {
        Some(item) => println!("Added task {} ({})", item.label(), short_id(item.id())),
        None => println!("Nothing to add: task text is empty."),
    }
    Ok(())
}

pub fn list(session: &Session) -> Result<()> {
    let mut any = false;
    for task in session.tasks() {
        any = true;
        let marker = if task.completed { "[x]" } else { "[ ]" };
        println!(
            "{} {:8} {:6} {}",
            marker,
            short_id(task.id),
            task.priority.to_string(),
            task.text
        );
    }
    if !any {
        println!("No tasks yet. Add one with `zenith task add`.");
    }
    Ok(())
}

pub fn toggle(session: &mut Session, selector: &str) -> Result<()> {
    let Some(id) = find_item(session, selector, |i| matches!(i, Item::Task(_))) else {
        println!("No task matches '{}'.", selector);
        return Ok(());
    };
    if let Some(Item::Task(task)) = session.toggle_task(id) {
        if task.completed {
            println!("Done: {}", task.text);
        } else {
            println!("Reopened: {}", task.text);
        }
    }
    Ok(())
}

pub fn edit(session: &mut Session, selector: &str, text: &str) -> Result<()> {
    let Some(id) = find_item(session, selector, |i| matches!(i, Item::Task(_))) else {
        println!("No task matches '{}'.", selector);
        return Ok(());
    };
    match session.edit_item(id, text) {
        Some(item) => println!("Updated: {}", item.label()),
        None => println!("Nothing to update: new text is empty."),
    }
    Ok(())
}

pub fn delete(session: &mut Session, selector: &str) -> Result<()> {
    let Some(id) = find_item(session, selector, |i| matches!(i, Item::Task(_))) else {
        println!("No task matches '{}'.", selector);
        return Ok(());
    };
    session.delete_item(id);
    println!("Deleted.");
    Ok(())
}

pub fn clear_done(session: &mut Session) -> Result<()> {
    let removed = session.clear_completed();
    println!("Removed {} completed task(s).", removed);
    Ok(())
}
