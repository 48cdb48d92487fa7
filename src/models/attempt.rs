// src/models/attempt.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::lenient;

/// One recorded answer to one question.
///
/// Every field decodes leniently: a malformed value falls back to its default
/// instead of rejecting the whole request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Attempt {
    /// Grouping key for topic-level aggregation.
    #[serde(default, deserialize_with = "lenient::text")]
    pub topic: String,

    /// Grouping key for concept-level rows (finer than topic).
    #[serde(default, deserialize_with = "lenient::text")]
    pub concept: String,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub correct: bool,

    /// Full credit available for a correct answer.
    #[serde(default, deserialize_with = "lenient::number")]
    pub marks: f64,

    /// Penalty magnitude for an incorrect answer. The sign is discarded.
    #[serde(default, deserialize_with = "lenient::number")]
    pub neg_marks: f64,

    #[serde(default, deserialize_with = "lenient::tier")]
    pub importance: Importance,

    #[serde(default, deserialize_with = "lenient::tier")]
    pub difficulty: Difficulty,

    /// Question type. Mapped from the JSON key `type`, a reserved keyword in Rust.
    #[serde(rename = "type", default, deserialize_with = "lenient::tier")]
    pub question_type: QuestionType,

    #[serde(default, deserialize_with = "lenient::number")]
    pub time_spent_sec: f64,

    /// Benchmark time. Zero or less means the time ratio is undefined.
    #[serde(default, deserialize_with = "lenient::number")]
    pub expected_time_sec: f64,

    #[serde(default, deserialize_with = "lenient::flag")]
    pub marked_review: bool,

    #[serde(default, deserialize_with = "lenient::count")]
    pub revisits: u32,
}

impl Attempt {
    /// Whether the benchmark time is usable for time-based rules.
    pub fn is_timed(&self) -> bool {
        self.expected_time_sec > 0.0
    }

    /// `time_spent / expected_time`, or `None` when the benchmark is not positive.
    pub fn time_ratio(&self) -> Option<f64> {
        if self.is_timed() {
            Some(self.time_spent_sec / self.expected_time_sec)
        } else {
            None
        }
    }
}

/// Enumerations decoded from an exact, case-sensitive label.
pub trait Tier: Default {
    fn from_label(label: &str) -> Self;
}

/// Curriculum importance tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum Importance {
    A,
    B,
    C,
    #[default]
    Unknown,
}

impl Tier for Importance {
    fn from_label(label: &str) -> Self {
        match label {
            "A" => Importance::A,
            "B" => Importance::B,
            "C" => Importance::C,
            _ => Importance::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Unknown,
}

impl Tier for Difficulty {
    fn from_label(label: &str) -> Self {
        match label {
            "Easy" => Difficulty::Easy,
            "Medium" => Difficulty::Medium,
            "Hard" => Difficulty::Hard,
            _ => Difficulty::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, ToSchema)]
pub enum QuestionType {
    Practical,
    Theory,
    #[default]
    Unknown,
}

impl Tier for QuestionType {
    fn from_label(label: &str) -> Self {
        match label {
            "Practical" => QuestionType::Practical,
            "Theory" => QuestionType::Theory,
            _ => QuestionType::Unknown,
        }
    }
}
