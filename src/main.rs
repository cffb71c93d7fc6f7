use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;

use zenith::cli::{Cli, Command, HabitAction, MetricsAction, TaskAction};
use zenith::commands;
use zenith::database::SqliteStorage;
use zenith::services::session::Session;
use zenith::utils::clock::SystemClock;
use zenith::utils::config;

#[tokio::main]
async fn main() -> Result<()> {
    config::load_dotenv();
    env_logger::init();

    let cli = Cli::parse();

    let data_dir = resolve_data_dir(cli.data_dir)?;
    std::fs::create_dir_all(&data_dir)?;

    let storage = SqliteStorage::open(&data_dir.join("zenith.db"))?;
    let mut session = Session::open(Box::new(storage), Box::new(SystemClock));
    let settings = config::load_settings(&data_dir);

    match cli.command {
        Command::Task { action } => match action {
            TaskAction::Add { text, priority } => commands::task::add(&mut session, &text, priority)?,
            TaskAction::List => commands::task::list(&session)?,
            TaskAction::Toggle { selector } => commands::task::toggle(&mut session, &selector)?,
            TaskAction::Edit { selector, text } => commands::task::edit(&mut session, &selector, &text)?,
            TaskAction::Delete { selector } => commands::task::delete(&mut session, &selector)?,
            TaskAction::ClearDone => commands::task::clear_done(&mut session)?,
        },
        Command::Habit { action } => match action {
            HabitAction::Add { name, goal } => commands::habit::add(&mut session, &name, goal)?,
            HabitAction::List => commands::habit::list(&session)?,
            HabitAction::Check { selector, day } => commands::habit::check(&mut session, &selector, day)?,
            HabitAction::Delete { selector } => commands::habit::delete(&mut session, &selector)?,
        },
        Command::Metrics { action } => match action {
            MetricsAction::Log {
                date,
                screen_time,
                mood,
                energy,
                achievement,
            } => commands::metrics::log(
                &mut session,
                commands::metrics::LogArgs {
                    date,
                    screen_time,
                    mood,
                    energy,
                    achievement,
                },
            )?,
            MetricsAction::Show => commands::metrics::show(&session)?,
        },
        Command::Stats => commands::stats::show(&session)?,
        Command::Coach { model } => commands::coach::consult(&session, &settings, model).await?,
        Command::Login { name, email } => commands::account::login(&mut session, &name, email)?,
        Command::Logout => commands::account::logout(&mut session)?,
        Command::Whoami => commands::account::whoami(&session)?,
    }

    Ok(())
}

fn resolve_data_dir(overridden: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(dir) = overridden {
        return Ok(dir);
    }
    directories::ProjectDirs::from("com", "Zenith", "zenith")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| anyhow!("could not determine a data directory"))
}
