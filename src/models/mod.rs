// src/models/mod.rs

pub mod attempt;
pub mod lenient;
pub mod sqi;
