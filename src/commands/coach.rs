use anyhow::Result;

use crate::models::Settings;
use crate::services::insight_engine::{self, InsightPanel, InsightSnapshot, PanelState};
use crate::services::session::Session;

pub async fn consult(session: &Session, settings: &Settings, model: Option<String>) -> Result<()> {
    let mut settings = settings.clone();
    if let Some(model) = model.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
        settings.ai.model = model.to_string();
    }

    let mut panel = InsightPanel::new();
    let generation = panel.open();
    let snapshot = InsightSnapshot::capture(session);

    println!("Analyzing your streaks...");
    let outcome = insight_engine::fetch_insights(&snapshot, &settings).await;
    panel.apply(generation, outcome);

    match panel.state() {
        PanelState::Ready(insights) | PanelState::FailedFallback(insights) => {
            println!();
            println!("Compliance score: {:.0}%", insights.productivity_score);
            println!();
            println!("Coach's summary:");
            println!("  \"{}\"", insights.summary);
            if !insights.suggestions.is_empty() {
                println!();
                println!("Suggestions:");
                for (i, suggestion) in insights.suggestions.iter().enumerate() {
                    println!("  {}. {}", i + 1, suggestion);
                }
            }
        }
        _ => {}
    }

    Ok(())
}
