use serde::Serialize;

use crate::scoring::ConfidenceScore;

/// Body of a successful `POST /analyze`.
#[derive(Serialize, Debug, Clone, Copy)]
pub struct AnalyzeResponse {
    pub confidence: ConfidenceScore,
}
