// src/openapi.rs

use utoipa::OpenApi;

use crate::{
    error::ErrorResponse,
    handlers::{health, sqi},
    models::{
        attempt::{Attempt, Difficulty, Importance, QuestionType},
        sqi::{
            ComputeSqiRequest, ComputeSqiResponse, ConceptScore, RankedConcept, ReportMetadata,
            ReviewReason, SqiReport, TopicScore,
        },
    },
};

#[derive(OpenApi)]
#[openapi(
    info(title = "SQI Engine", description = "Student Quality Index computation"),
    paths(sqi::compute_sqi, health::index),
    components(schemas(
        Attempt,
        Importance,
        Difficulty,
        QuestionType,
        ComputeSqiRequest,
        ComputeSqiResponse,
        SqiReport,
        TopicScore,
        ConceptScore,
        RankedConcept,
        ReviewReason,
        ReportMetadata,
        ErrorResponse
    ))
)]
pub struct ApiDoc;
