use serde::{Deserialize, Serialize};

use crate::models::{AIInsights, DailyMetric, Item, Settings};
use crate::services::session::Session;

// ─── Wire types ───

#[derive(Debug, Clone, Serialize)]
struct CoachChatRequest {
    model: String,
    messages: Vec<CoachChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
struct CoachChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Clone, Deserialize)]
struct CoachChatResponse {
    choices: Vec<CoachChoice>,
}

#[derive(Debug, Clone, Deserialize)]
struct CoachChoice {
    message: CoachMessage,
}

#[derive(Debug, Clone, Deserialize)]
struct CoachMessage {
    content: Option<String>,
}

// ─── Snapshot ───

/// Immutable copy of the collection handed to the coach. Mutations made
/// while a request is in flight do not affect it.
#[derive(Debug, Clone, Serialize)]
pub struct InsightSnapshot {
    pub items: Vec<Item>,
    pub metrics: Vec<DailyMetric>,
}

impl InsightSnapshot {
    pub fn capture(session: &Session) -> Self {
        Self {
            items: session.items().to_vec(),
            metrics: session.metrics().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InsightOutcome {
    Ready(AIInsights),
    Fallback(AIInsights),
}

impl InsightOutcome {
    pub fn insights(&self) -> &AIInsights {
        match self {
            InsightOutcome::Ready(i) | InsightOutcome::Fallback(i) => i,
        }
    }
}

// ─── Public API ───

/// Never fails: an empty collection short-circuits to the onboarding
/// payload without a remote call, a missing key or any transport/parse
/// failure degrades to the canned offline payload.
pub async fn fetch_insights(snapshot: &InsightSnapshot, settings: &Settings) -> InsightOutcome {
    if snapshot.items.is_empty() {
        return InsightOutcome::Ready(onboarding_insights());
    }

    let api_key = crate::utils::config::resolve_api_key(&settings.ai.api_key);
    if !settings.ai.enabled || api_key.is_empty() {
        return InsightOutcome::Fallback(offline_insights());
    }

    match request_insights(snapshot, settings, &api_key).await {
        Ok(insights) => InsightOutcome::Ready(insights),
        Err(e) => {
            log::warn!("coach request failed: {}", e);
            InsightOutcome::Fallback(offline_insights())
        }
    }
}

async fn request_insights(
    snapshot: &InsightSnapshot,
    settings: &Settings,
    api_key: &str,
) -> Result<AIInsights, String> {
    let request = CoachChatRequest {
        model: settings.ai.model.clone(),
        messages: vec![
            CoachChatMessage {
                role: "system".to_string(),
                content: "You are a high-performance life coach that outputs strict JSON only."
                    .to_string(),
            },
            CoachChatMessage {
                role: "user".to_string(),
                content: build_prompt(snapshot),
            },
        ],
        temperature: 0.2,
        max_tokens: 600,
    };

    let client = reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(settings.ai.timeout_secs))
        .build()
        .map_err(|e| e.to_string())?;

    let response = client
        .post(&settings.ai.base_url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("Content-Type", "application/json")
        .json(&request)
        .send()
        .await
        .map_err(|e| format!("coach API request failed: {}", e))?;

    let status = response.status();
    let text = response.text().await.map_err(|e| e.to_string())?;
    if !status.is_success() {
        return Err(format!("coach API error {}: {}", status, text));
    }

    let parsed: CoachChatResponse = serde_json::from_str(&text).map_err(|e| e.to_string())?;
    let content = parsed
        .choices
        .first()
        .and_then(|c| c.message.content.clone())
        .ok_or_else(|| "coach returned empty content".to_string())?;

    parse_insights(&content)
}

fn build_prompt(snapshot: &InsightSnapshot) -> String {
    let task_summary = snapshot
        .items
        .iter()
        .filter_map(Item::as_task)
        .map(|t| {
            format!(
                "{} [{}, {}]",
                t.text,
                t.priority,
                if t.completed { "done" } else { "open" }
            )
        })
        .collect::<Vec<_>>()
        .join(", ");

    let habit_summary = snapshot
        .items
        .iter()
        .filter_map(Item::as_habit)
        .map(|h| format!("{}: {}/{} days", h.name, h.completed_days.len(), h.goal))
        .collect::<Vec<_>>()
        .join(", ");

    let metric_summary = snapshot
        .metrics
        .iter()
        .rev()
        .take(7)
        .rev()
        .map(|m| {
            format!(
                "Date: {}, Screen: {}min, Mood: {}/10, Energy: {}/10",
                m.date, m.screen_time, m.mood, m.energy
            )
        })
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        "Analyze this month's tasks, habits and daily metrics.\n\
Return strict JSON with keys: productivityScore (number 0-100), summary (string), \
suggestions (string[] of 3 actionable self-correction suggestions).\n\
Tasks: {}\n\
Habits: {}\n\
Recent Metrics: {}",
        task_summary, habit_summary, metric_summary
    )
}

/// Models wrap JSON in markdown fences often enough that we strip them
/// before parsing. A score outside 0..=100 is clamped.
fn parse_insights(content: &str) -> Result<AIInsights, String> {
    let clean = content
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim();
    let mut insights: AIInsights = serde_json::from_str(clean)
        .map_err(|e| format!("JSON parse error: {} - Content: {}", e, clean))?;
    insights.productivity_score = insights.productivity_score.clamp(0.0, 100.0);
    Ok(insights)
}

fn onboarding_insights() -> AIInsights {
    AIInsights {
        productivity_score: 0.0,
        summary: "Add your first tasks and protocols to start your journey.".to_string(),
        suggestions: vec![
            "Set a screen time limit.".to_string(),
            "Add a morning routine.".to_string(),
        ],
    }
}

fn offline_insights() -> AIInsights {
    AIInsights {
        productivity_score: 0.0,
        summary: "Coach is offline. Keep pushing through your protocols!".to_string(),
        suggestions: vec![
            "Drink more water.".to_string(),
            "Review your monthly goals manually.".to_string(),
        ],
    }
}

// ─── Panel state machine ───

#[derive(Debug, Clone, PartialEq)]
pub enum PanelState {
    Idle,
    Loading,
    Ready(AIInsights),
    FailedFallback(AIInsights),
}

/// Coach panel lifecycle. Requests carry a generation; a response applied
/// with a stale generation, or after the panel closed, is dropped. Both
/// terminal states render identically.
pub struct InsightPanel {
    state: PanelState,
    generation: u64,
    open: bool,
}

impl Default for InsightPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl InsightPanel {
    pub fn new() -> Self {
        Self {
            state: PanelState::Idle,
            generation: 0,
            open: false,
        }
    }

    /// Opens the panel and starts a new request generation.
    pub fn open(&mut self) -> u64 {
        self.open = true;
        self.generation += 1;
        self.state = PanelState::Loading;
        self.generation
    }

    pub fn close(&mut self) {
        self.open = false;
        self.state = PanelState::Idle;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    /// Applies a resolved outcome; returns false when it was dropped as
    /// stale or the panel is no longer open.
    pub fn apply(&mut self, generation: u64, outcome: InsightOutcome) -> bool {
        if !self.open || generation != self.generation {
            return false;
        }
        self.state = match outcome {
            InsightOutcome::Ready(insights) => PanelState::Ready(insights),
            InsightOutcome::Fallback(insights) => PanelState::FailedFallback(insights),
        };
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AISettings, Habit, Priority, Task};

    fn unreachable_settings() -> Settings {
        Settings {
            ai: AISettings {
                enabled: true,
                api_key: "test-key".to_string(),
                base_url: "http://127.0.0.1:9/v1/chat/completions".to_string(),
                timeout_secs: 2,
                ..AISettings::default()
            },
            ..Settings::default()
        }
    }

    fn snapshot_with_items() -> InsightSnapshot {
        InsightSnapshot {
            items: vec![
                Item::Task(Task::new("ship it".to_string(), Priority::High, 0)),
                Item::Habit(Habit::new("run".to_string(), 20, 0)),
            ],
            metrics: Vec::new(),
        }
    }

    #[tokio::test]
    async fn empty_collection_short_circuits_to_onboarding() {
        let snapshot = InsightSnapshot {
            items: Vec::new(),
            metrics: Vec::new(),
        };
        // the endpoint is unreachable, so reaching it would surface as a
        // fallback instead of the onboarding payload
        let outcome = fetch_insights(&snapshot, &unreachable_settings()).await;
        assert_eq!(outcome, InsightOutcome::Ready(onboarding_insights()));
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_offline_fallback() {
        let outcome = fetch_insights(&snapshot_with_items(), &unreachable_settings()).await;
        assert_eq!(outcome, InsightOutcome::Fallback(offline_insights()));
        assert_eq!(outcome.insights().productivity_score, 0.0);
    }

    #[tokio::test]
    async fn disabled_ai_falls_back_without_network() {
        let mut settings = unreachable_settings();
        settings.ai.enabled = false;
        let outcome = fetch_insights(&snapshot_with_items(), &settings).await;
        assert_eq!(outcome, InsightOutcome::Fallback(offline_insights()));
    }

    #[test]
    fn parse_strips_fences_and_clamps_score() {
        let content = "```json\n{\"productivityScore\": 140, \"summary\": \"Strong month.\", \"suggestions\": [\"Sleep earlier.\"]}\n```";
        let insights = parse_insights(content).unwrap();
        assert_eq!(insights.productivity_score, 100.0);
        assert_eq!(insights.summary, "Strong month.");
        assert_eq!(insights.suggestions.len(), 1);

        assert!(parse_insights("not json").is_err());
        // missing required field is a failure, not a partial payload
        assert!(parse_insights("{\"summary\": \"x\", \"suggestions\": []}").is_err());
    }

    #[test]
    fn panel_drops_stale_and_closed_responses() {
        let mut panel = InsightPanel::new();
        assert_eq!(*panel.state(), PanelState::Idle);

        let first = panel.open();
        assert_eq!(*panel.state(), PanelState::Loading);

        // a second open supersedes the first request
        let second = panel.open();
        assert!(!panel.apply(first, InsightOutcome::Ready(onboarding_insights())));
        assert_eq!(*panel.state(), PanelState::Loading);

        assert!(panel.apply(second, InsightOutcome::Fallback(offline_insights())));
        assert_eq!(
            *panel.state(),
            PanelState::FailedFallback(offline_insights())
        );

        // responses landing after close are no-ops
        let third = panel.open();
        panel.close();
        assert!(!panel.apply(third, InsightOutcome::Ready(onboarding_insights())));
        assert_eq!(*panel.state(), PanelState::Idle);
        assert!(!panel.is_open());
    }
}
