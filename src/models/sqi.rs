// src/models/sqi.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::{attempt::Attempt, lenient};

/// Topic-level SQI, aggregated over every attempt in the topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TopicScore {
    pub topic: String,
    pub sqi: f64,
}

/// SQI of a single attempt. Repeated attempts on one concept each get a row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConceptScore {
    pub topic: String,
    pub concept: String,
    pub sqi: f64,
}

/// Why a concept was put on the review list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ReviewReason {
    #[serde(rename = "Wrong answer")]
    WrongAnswer,
    #[serde(rename = "High Importance (A)")]
    HighImportance,
    #[serde(rename = "Rushed answer")]
    RushedAnswer,
    #[serde(rename = "High priority for review")]
    HighPriority,
}

/// One entry of the remedial review list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RankedConcept {
    pub topic: String,
    pub concept: String,
    /// Priority in [0, 1]; higher means review sooner.
    pub weight: f64,
    pub reasons: Vec<ReviewReason>,
}

/// Everything the scoring engine derives from one student's attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SqiReport {
    pub overall_sqi: f64,
    pub topic_scores: Vec<TopicScore>,
    pub concept_scores: Vec<ConceptScore>,
    pub ranked_concepts_for_summary: Vec<RankedConcept>,
}

/// DTO for `POST /api/compute-sqi`.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ComputeSqiRequest {
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub student_id: Option<String>,

    #[serde(default, deserialize_with = "lenient::attempt_list")]
    #[validate(
        required(message = "The 'attempts' field is required and must be an array."),
        length(min = 1, message = "The 'attempts' array cannot be empty.")
    )]
    pub attempts: Option<Vec<Attempt>>,

    /// Accepted for the downstream summary generator; not used for scoring.
    #[serde(default, deserialize_with = "lenient::optional_text")]
    pub diagnostic_prompt: Option<String>,
}

/// Provenance attached to every computed report.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportMetadata {
    pub diagnostic_prompt_version: String,
    /// Time the response was assembled, not when scoring ran.
    pub computed_at: chrono::DateTime<chrono::Utc>,
    pub engine: String,
}

/// Response body for `POST /api/compute-sqi`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ComputeSqiResponse {
    pub student_id: String,
    #[serde(flatten)]
    pub report: SqiReport,
    pub metadata: ReportMetadata,
}
