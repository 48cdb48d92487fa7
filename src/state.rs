// src/state.rs

use std::sync::Arc;

use crate::config::Config;
use crate::scoring::ScoringEngine;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    /// Built once at startup; shared read-only by every request.
    pub engine: Arc<ScoringEngine>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<ScoringEngine> {
    fn from_ref(state: &AppState) -> Self {
        state.engine.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}
