// src/scoring/mod.rs

pub mod engine;
pub mod weights;

pub use engine::{EngineError, ScoringEngine};
pub use weights::WeightTables;
