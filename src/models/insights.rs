use serde::{Deserialize, Serialize};

/// Coach payload. Field names follow the fixed response schema of the
/// insight service, so a successful reply deserializes directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AIInsights {
    pub productivity_score: f64,
    pub summary: String,
    pub suggestions: Vec<String>,
}
