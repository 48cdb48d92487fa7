// src/scoring/engine.rs

use std::collections::HashMap;
use std::fmt;

use super::weights::WeightTables;
use crate::models::{
    attempt::{Attempt, Importance},
    sqi::{ConceptScore, RankedConcept, ReviewReason, SqiReport, TopicScore},
};
use crate::utils::math::{percentage, round2};

// Time-ratio thresholds.
const SLOW_RATIO: f64 = 1.5;
const VERY_SLOW_RATIO: f64 = 2.0;
const RUSHED_RATIO: f64 = 0.7;
const OVERTIME_RATIO: f64 = 1.2;

// Priority blend; sums to 1.0.
const PRIORITY_WRONG: f64 = 0.4;
const PRIORITY_IMPORTANCE: f64 = 0.25;
const PRIORITY_TIME: f64 = 0.20;
const PRIORITY_QUALITY: f64 = 0.15;

const HIGH_PRIORITY_THRESHOLD: f64 = 0.8;

/// Errors produced while turning attempts into a report.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A presented number came out as NaN or infinite (e.g. float overflow on extreme marks).
    NonFinite { field: &'static str },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::NonFinite { field } => {
                write!(f, "computed a non-finite value for '{}'", field)
            }
        }
    }
}

impl std::error::Error for EngineError {}

/// Weighted credit of one attempt.
#[derive(Debug, Clone, Copy, PartialEq)]
struct AttemptScore {
    weighted: f64,
    max_weighted: f64,
}

#[derive(Debug, Default)]
struct Totals {
    earned: f64,
    max: f64,
}

impl Totals {
    fn add(&mut self, score: AttemptScore) {
        self.earned += score.weighted;
        self.max += score.max_weighted;
    }

    fn sqi(&self) -> f64 {
        round2(percentage(self.earned, self.max))
    }
}

/// Computes the Student Quality Index from a list of attempts.
///
/// Stateless apart from the read-only weight tables, so one instance can be
/// shared across threads.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    tables: WeightTables,
}

impl ScoringEngine {
    pub fn new(tables: WeightTables) -> Self {
        Self { tables }
    }

    /// Scores every attempt, aggregates per topic and overall, and ranks
    /// the attempts for review.
    ///
    /// Totals are accumulated unrounded; only presented numbers are rounded.
    /// An empty slice yields an overall SQI of 0 and empty lists.
    pub fn compute(&self, attempts: &[Attempt]) -> Result<SqiReport, EngineError> {
        let mut overall = Totals::default();
        // Topics keep the order in which they first appear.
        let mut topics: Vec<(&str, Totals)> = Vec::new();
        let mut topic_index: HashMap<&str, usize> = HashMap::new();

        let mut concept_scores = Vec::with_capacity(attempts.len());
        let mut ranked = Vec::with_capacity(attempts.len());

        for attempt in attempts {
            let score = self.score_attempt(attempt);
            overall.add(score);

            let idx = *topic_index.entry(attempt.topic.as_str()).or_insert_with(|| {
                topics.push((attempt.topic.as_str(), Totals::default()));
                topics.len() - 1
            });
            topics[idx].1.add(score);

            let concept_sqi = percentage(score.weighted, score.max_weighted);
            concept_scores.push(ConceptScore {
                topic: attempt.topic.clone(),
                concept: attempt.concept.clone(),
                sqi: finite(round2(concept_sqi), "concept_scores")?,
            });

            let priority = self.priority(attempt, concept_sqi);
            ranked.push(RankedConcept {
                topic: attempt.topic.clone(),
                concept: attempt.concept.clone(),
                weight: finite(round2(priority), "ranked_concepts_for_summary")?,
                reasons: review_reasons(attempt, priority),
            });
        }

        let topic_scores = topics
            .into_iter()
            .map(|(topic, totals)| {
                Ok(TopicScore {
                    topic: topic.to_string(),
                    sqi: finite(totals.sqi(), "topic_scores")?,
                })
            })
            .collect::<Result<Vec<_>, EngineError>>()?;

        // Stable: equal weights keep input order.
        ranked.sort_by(|a, b| b.weight.total_cmp(&a.weight));

        Ok(SqiReport {
            overall_sqi: finite(overall.sqi(), "overall_sqi")?,
            topic_scores,
            concept_scores,
            ranked_concepts_for_summary: ranked,
        })
    }

    fn score_attempt(&self, attempt: &Attempt) -> AttemptScore {
        let base = if attempt.correct {
            attempt.marks
        } else {
            -attempt.neg_marks.abs()
        };

        let multiplier = self.tables.importance(attempt.importance)
            * self.tables.difficulty(attempt.difficulty)
            * self.tables.question_type(attempt.question_type);

        let mut weighted = base * multiplier;
        let max_weighted = attempt.marks * multiplier;

        // Both discounts stack when the attempt ran past twice the benchmark.
        // Compared against a scaled benchmark, not the divided ratio.
        if attempt.is_timed() {
            if attempt.time_spent_sec > SLOW_RATIO * attempt.expected_time_sec {
                weighted *= 0.9;
            }
            if attempt.time_spent_sec > VERY_SLOW_RATIO * attempt.expected_time_sec {
                weighted *= 0.8;
            }
        }

        if attempt.marked_review && !attempt.correct {
            weighted *= 0.9;
        }

        if attempt.revisits > 0 && attempt.correct {
            weighted += 0.2 * attempt.marks;
        }

        AttemptScore {
            weighted,
            max_weighted,
        }
    }

    /// Unrounded review priority in [0, 1].
    fn priority(&self, attempt: &Attempt, concept_sqi: f64) -> f64 {
        let w_wrong = if attempt.correct { 0.0 } else { 1.0 };
        let w_importance = self.tables.ranking_importance(attempt.importance);
        let w_time = match attempt.time_ratio() {
            Some(ratio) if ratio < RUSHED_RATIO => 1.0,
            Some(ratio) if ratio > OVERTIME_RATIO => 0.4,
            _ => 0.7,
        };
        let w_quality = 1.0 - concept_sqi.clamp(0.0, 100.0) / 100.0;

        PRIORITY_WRONG * w_wrong
            + PRIORITY_IMPORTANCE * w_importance
            + PRIORITY_TIME * w_time
            + PRIORITY_QUALITY * w_quality
    }
}

/// Tags in a fixed order. `priority` must be the unrounded value.
fn review_reasons(attempt: &Attempt, priority: f64) -> Vec<ReviewReason> {
    let mut reasons = Vec::new();
    if !attempt.correct {
        reasons.push(ReviewReason::WrongAnswer);
    }
    if attempt.importance == Importance::A {
        reasons.push(ReviewReason::HighImportance);
    }
    if attempt.is_timed() && attempt.time_spent_sec < attempt.expected_time_sec * RUSHED_RATIO {
        reasons.push(ReviewReason::RushedAnswer);
    }
    if priority > HIGH_PRIORITY_THRESHOLD {
        reasons.push(ReviewReason::HighPriority);
    }
    reasons
}

fn finite(value: f64, field: &'static str) -> Result<f64, EngineError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(EngineError::NonFinite { field })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::attempt::{Difficulty, QuestionType};

    fn engine() -> ScoringEngine {
        ScoringEngine::new(WeightTables::standard())
    }

    /// The attempt from the reference walkthrough: a correct, quick Algebra answer.
    fn algebra_attempt() -> Attempt {
        Attempt {
            topic: "Math".to_string(),
            concept: "Algebra".to_string(),
            correct: true,
            marks: 10.0,
            neg_marks: 2.0,
            importance: Importance::A,
            difficulty: Difficulty::Medium,
            question_type: QuestionType::Theory,
            time_spent_sec: 60.0,
            expected_time_sec: 100.0,
            marked_review: false,
            revisits: 0,
        }
    }

    fn attempt(topic: &str, concept: &str, correct: bool) -> Attempt {
        Attempt {
            topic: topic.to_string(),
            concept: concept.to_string(),
            correct,
            time_spent_sec: 100.0,
            ..algebra_attempt()
        }
    }

    fn sqi_of(a: Attempt) -> f64 {
        engine().compute(&[a]).unwrap().concept_scores[0].sqi
    }

    #[test]
    fn test_single_correct_attempt() {
        let report = engine().compute(&[algebra_attempt()]).unwrap();

        assert_eq!(report.overall_sqi, 100.0);
        assert_eq!(
            report.topic_scores,
            vec![TopicScore {
                topic: "Math".to_string(),
                sqi: 100.0
            }]
        );
        assert_eq!(report.concept_scores[0].concept, "Algebra");
        assert_eq!(report.concept_scores[0].sqi, 100.0);

        let ranked = &report.ranked_concepts_for_summary[0];
        assert_eq!(ranked.weight, 0.45);
        assert_eq!(
            ranked.reasons,
            vec![ReviewReason::HighImportance, ReviewReason::RushedAnswer]
        );
    }

    #[test]
    fn test_single_wrong_attempt() {
        let wrong = Attempt {
            correct: false,
            ..algebra_attempt()
        };
        let report = engine().compute(&[wrong]).unwrap();

        assert_eq!(report.overall_sqi, 0.0);
        assert_eq!(report.topic_scores[0].sqi, 0.0);
        assert_eq!(report.concept_scores[0].sqi, 0.0);

        let ranked = &report.ranked_concepts_for_summary[0];
        assert_eq!(ranked.weight, 1.0);
        assert_eq!(
            ranked.reasons,
            vec![
                ReviewReason::WrongAnswer,
                ReviewReason::HighImportance,
                ReviewReason::RushedAnswer,
                ReviewReason::HighPriority,
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let report = engine().compute(&[]).unwrap();
        assert_eq!(report.overall_sqi, 0.0);
        assert!(report.topic_scores.is_empty());
        assert!(report.concept_scores.is_empty());
        assert!(report.ranked_concepts_for_summary.is_empty());
    }

    #[test]
    fn test_tier_weights_scale_max_and_earned_alike() {
        let hard_practical = Attempt {
            difficulty: Difficulty::Hard,
            question_type: QuestionType::Practical,
            importance: Importance::C,
            ..algebra_attempt()
        };
        assert_eq!(sqi_of(hard_practical), 100.0);
    }

    #[test]
    fn test_time_discounts_compound() {
        let slow = Attempt {
            time_spent_sec: 160.0,
            ..algebra_attempt()
        };
        assert_eq!(sqi_of(slow), 90.0);

        let very_slow = Attempt {
            time_spent_sec: 250.0,
            ..algebra_attempt()
        };
        // 0.9 * 0.8
        assert_eq!(sqi_of(very_slow), 72.0);
    }

    #[test]
    fn test_slow_discount_uses_scaled_benchmark() {
        // 1.5 * 9.1 rounds just below 13.65, while 13.65 / 9.1 is exactly 1.5.
        let slow = Attempt {
            time_spent_sec: 13.65,
            expected_time_sec: 9.1,
            ..algebra_attempt()
        };
        assert_eq!(sqi_of(slow), 90.0);
    }

    #[test]
    fn test_rushed_tag_uses_scaled_benchmark() {
        // 19.1 * 0.7 is just above 13.37, while 13.37 / 19.1 rounds to 0.7.
        let borderline = Attempt {
            time_spent_sec: 13.37,
            expected_time_sec: 19.1,
            ..algebra_attempt()
        };
        let report = engine().compute(&[borderline]).unwrap();
        let ranked = &report.ranked_concepts_for_summary[0];

        assert_eq!(
            ranked.reasons,
            vec![ReviewReason::HighImportance, ReviewReason::RushedAnswer]
        );
        // The ranking bucket still reads the divided ratio: 0.25 + 0.20 * 0.7
        assert_eq!(ranked.weight, 0.39);
    }

    #[test]
    fn test_weight_rounds_from_stored_value() {
        // 0.4 + 0.175 + 0.2 + 0.15 sums to 0.92499999...
        let wrong_b = Attempt {
            correct: false,
            importance: Importance::B,
            ..algebra_attempt()
        };
        let report = engine().compute(&[wrong_b]).unwrap();
        let ranked = &report.ranked_concepts_for_summary[0];

        assert_eq!(ranked.weight, 0.92);
        assert_eq!(
            ranked.reasons,
            vec![
                ReviewReason::WrongAnswer,
                ReviewReason::RushedAnswer,
                ReviewReason::HighPriority,
            ]
        );
    }

    #[test]
    fn test_revisit_bonus_is_added_after_discounts() {
        let revisited = Attempt {
            time_spent_sec: 250.0,
            revisits: 1,
            ..algebra_attempt()
        };
        // 10 * 0.72 + 0.2 * 10
        assert_eq!(sqi_of(revisited), 92.0);

        let capped = Attempt {
            revisits: 3,
            ..algebra_attempt()
        };
        assert_eq!(sqi_of(capped), 100.0);
    }

    #[test]
    fn test_marked_review_discounts_wrong_answers() {
        let right = algebra_attempt();
        let flagged_wrong = Attempt {
            concept: "Geometry".to_string(),
            correct: false,
            neg_marks: 5.0,
            marked_review: true,
            ..algebra_attempt()
        };
        let report = engine().compute(&[right, flagged_wrong]).unwrap();

        // (10 - 5 * 0.9) / 20
        assert_eq!(report.topic_scores[0].sqi, 27.5);
        assert_eq!(report.overall_sqi, 27.5);
    }

    #[test]
    fn test_negative_marks_sign_is_ignored() {
        let positive = Attempt {
            correct: false,
            neg_marks: 5.0,
            ..algebra_attempt()
        };
        let negative = Attempt {
            neg_marks: -5.0,
            ..positive.clone()
        };
        let other = attempt("Math", "Algebra", true);

        let a = engine().compute(&[other.clone(), positive]).unwrap();
        let b = engine().compute(&[other, negative]).unwrap();
        assert_eq!(a.overall_sqi, 25.0);
        assert_eq!(a.overall_sqi, b.overall_sqi);
    }

    #[test]
    fn test_zero_marks_yields_zero_sqi() {
        let free = Attempt {
            topic: "Art".to_string(),
            marks: 0.0,
            ..algebra_attempt()
        };
        let report = engine().compute(&[free]).unwrap();

        assert_eq!(report.concept_scores[0].sqi, 0.0);
        assert_eq!(report.topic_scores[0].sqi, 0.0);
        assert_eq!(report.overall_sqi, 0.0);
    }

    #[test]
    fn test_zero_expected_time_skips_time_rules() {
        let untimed = Attempt {
            time_spent_sec: 500.0,
            expected_time_sec: 0.0,
            ..algebra_attempt()
        };
        let report = engine().compute(&[untimed]).unwrap();

        assert_eq!(report.concept_scores[0].sqi, 100.0);
        let ranked = &report.ranked_concepts_for_summary[0];
        // 0.25 * 1.0 + 0.20 * 0.7
        assert_eq!(ranked.weight, 0.39);
        assert_eq!(ranked.reasons, vec![ReviewReason::HighImportance]);
    }

    #[test]
    fn test_unknown_importance_is_neutral_for_score_but_low_for_ranking() {
        let known = algebra_attempt();
        let unknown = Attempt {
            importance: Importance::Unknown,
            ..algebra_attempt()
        };
        let report = engine().compute(&[known, unknown]).unwrap();

        assert_eq!(report.concept_scores[0].sqi, report.concept_scores[1].sqi);
        let ranked = &report.ranked_concepts_for_summary;
        assert_eq!(ranked[0].weight, 0.45);
        assert!(ranked[1].weight < ranked[0].weight);
        assert!(!ranked[1].reasons.contains(&ReviewReason::HighImportance));
    }

    #[test]
    fn test_high_priority_threshold() {
        let wrong_low_importance = Attempt {
            correct: false,
            importance: Importance::C,
            ..algebra_attempt()
        };

        // 0.4 + 0.125 + 0.14 + 0.15
        let on_time = Attempt {
            time_spent_sec: 100.0,
            ..wrong_low_importance.clone()
        };
        // 0.4 + 0.125 + 0.08 + 0.15
        let overtime = Attempt {
            time_spent_sec: 130.0,
            ..wrong_low_importance
        };

        let report = engine().compute(&[on_time, overtime]).unwrap();
        let ranked = &report.ranked_concepts_for_summary;
        assert!(ranked[0].reasons.contains(&ReviewReason::HighPriority));
        assert!(!ranked[1].reasons.contains(&ReviewReason::HighPriority));
        assert!(ranked[1].weight < 0.8);
    }

    #[test]
    fn test_topics_keep_first_appearance_order() {
        let attempts = vec![
            attempt("Physics", "Optics", true),
            attempt("Math", "Algebra", false),
            attempt("Physics", "Kinematics", false),
            attempt("Chemistry", "Bonds", true),
        ];
        let report = engine().compute(&attempts).unwrap();

        let topics: Vec<&str> = report
            .topic_scores
            .iter()
            .map(|t| t.topic.as_str())
            .collect();
        assert_eq!(topics, vec!["Physics", "Math", "Chemistry"]);
        // (10 - 2) / 20
        assert_eq!(report.topic_scores[0].sqi, 40.0);
        assert_eq!(report.concept_scores.len(), 4);
    }

    #[test]
    fn test_repeated_concept_is_not_merged() {
        let attempts = vec![
            attempt("Math", "Algebra", false),
            attempt("Math", "Algebra", true),
        ];
        let report = engine().compute(&attempts).unwrap();

        assert_eq!(report.concept_scores.len(), 2);
        assert_eq!(report.concept_scores[0].sqi, 0.0);
        assert_eq!(report.concept_scores[1].sqi, 100.0);
    }

    #[test]
    fn test_ranking_is_descending_and_stable() {
        let attempts = vec![
            attempt("Math", "First", true),
            attempt("Math", "Wrong", false),
            attempt("Math", "Second", true),
            attempt("Math", "Third", true),
        ];
        let report = engine().compute(&attempts).unwrap();
        let ranked = &report.ranked_concepts_for_summary;

        let concepts: Vec<&str> = ranked.iter().map(|r| r.concept.as_str()).collect();
        assert_eq!(concepts, vec!["Wrong", "First", "Second", "Third"]);
        assert!(ranked.windows(2).all(|w| w[0].weight >= w[1].weight));
    }

    #[test]
    fn test_values_stay_in_range() {
        let mut attempts = Vec::new();
        for (i, (correct, importance, difficulty)) in [
            (true, Importance::A, Difficulty::Easy),
            (false, Importance::B, Difficulty::Hard),
            (true, Importance::C, Difficulty::Unknown),
            (false, Importance::Unknown, Difficulty::Medium),
        ]
        .into_iter()
        .enumerate()
        {
            attempts.push(Attempt {
                topic: format!("T{}", i % 2),
                concept: format!("C{}", i),
                correct,
                importance,
                difficulty,
                marks: 4.0 * i as f64,
                neg_marks: 3.0,
                time_spent_sec: 40.0 * (i + 1) as f64,
                expected_time_sec: 50.0,
                marked_review: i % 2 == 1,
                revisits: i as u32,
                ..algebra_attempt()
            });
        }
        let report = engine().compute(&attempts).unwrap();

        assert!((0.0..=100.0).contains(&report.overall_sqi));
        assert!(report.topic_scores.iter().all(|t| (0.0..=100.0).contains(&t.sqi)));
        assert!(report.concept_scores.iter().all(|c| (0.0..=100.0).contains(&c.sqi)));
        assert!(
            report
                .ranked_concepts_for_summary
                .iter()
                .all(|r| (0.0..=1.0).contains(&r.weight))
        );
    }

    #[test]
    fn test_compute_is_deterministic() {
        let attempts = vec![
            algebra_attempt(),
            attempt("Physics", "Optics", false),
            attempt("Math", "Algebra", true),
        ];
        let first = engine().compute(&attempts).unwrap();
        let second = engine().compute(&attempts).unwrap();

        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let huge = Attempt {
            marks: f64::MAX,
            difficulty: Difficulty::Hard,
            ..algebra_attempt()
        };
        let err = engine().compute(&[huge]).unwrap_err();
        assert!(matches!(err, EngineError::NonFinite { .. }));
    }
}
