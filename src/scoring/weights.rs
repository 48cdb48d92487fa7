// src/scoring/weights.rs

use std::collections::HashMap;

use crate::models::attempt::{Difficulty, Importance, QuestionType};

/// Weight used for any tier missing from a scoring table.
pub const SCORING_DEFAULT_WEIGHT: f64 = 1.0;

/// Importance weight used for ranking when the tier is unknown.
/// Lower than the scoring default: unknown importance is neutral for the
/// score but low priority for review.
pub const RANKING_IMPORTANCE_DEFAULT: f64 = 0.5;

/// Fixed multiplier tables applied to every attempt.
///
/// Built once at startup and shared read-only by the engine.
#[derive(Debug, Clone)]
pub struct WeightTables {
    importance: HashMap<Importance, f64>,
    difficulty: HashMap<Difficulty, f64>,
    question_type: HashMap<QuestionType, f64>,
}

impl WeightTables {
    pub fn standard() -> Self {
        Self {
            importance: HashMap::from([
                (Importance::A, 1.0),
                (Importance::B, 0.7),
                (Importance::C, 0.5),
            ]),
            difficulty: HashMap::from([
                (Difficulty::Easy, 0.6),
                (Difficulty::Medium, 1.0),
                (Difficulty::Hard, 1.4),
            ]),
            question_type: HashMap::from([
                (QuestionType::Practical, 1.1),
                (QuestionType::Theory, 1.0),
            ]),
        }
    }

    pub fn importance(&self, tier: Importance) -> f64 {
        self.importance
            .get(&tier)
            .copied()
            .unwrap_or(SCORING_DEFAULT_WEIGHT)
    }

    /// Same table as [`Self::importance`] with the ranking default.
    pub fn ranking_importance(&self, tier: Importance) -> f64 {
        self.importance
            .get(&tier)
            .copied()
            .unwrap_or(RANKING_IMPORTANCE_DEFAULT)
    }

    pub fn difficulty(&self, tier: Difficulty) -> f64 {
        self.difficulty
            .get(&tier)
            .copied()
            .unwrap_or(SCORING_DEFAULT_WEIGHT)
    }

    pub fn question_type(&self, tier: QuestionType) -> f64 {
        self.question_type
            .get(&tier)
            .copied()
            .unwrap_or(SCORING_DEFAULT_WEIGHT)
    }
}

impl Default for WeightTables {
    fn default() -> Self {
        Self::standard()
    }
}
