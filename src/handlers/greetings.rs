// Greeting handlers
// HTTP handlers for greeting management operations

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateGreetingRequest, GreetingByLanguageResponse, UpdateGreetingRequest},
    routes::AppState,
};

/// Query parameters for the by-language lookup
#[derive(Debug, Deserialize)]
pub struct ByLanguageParams {
    pub formal: Option<bool>,
}

/// Get all greetings, ordered by text
/// GET /api/greetings
pub async fn get_all_greetings(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Retrieving all greetings");

    let greetings = state.greetings.get_all().await?;

    info!("Retrieved {} greetings", greetings.len());
    Ok((StatusCode::OK, Json(greetings)))
}

/// Get greeting by ID
/// GET /api/greetings/:id
pub async fn get_greeting_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Retrieving greeting with id: {}", id);

    let greeting = state
        .greetings
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Greeting with id {}", id)))?;

    Ok((StatusCode::OK, Json(greeting)))
}

/// Get one greeting for a language code, optionally filtered by formality.
/// Ties are broken informal-first by the formality ordering.
/// GET /api/greetings/by-language/:code?formal=bool
pub async fn get_greeting_by_language(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Query(params): Query<ByLanguageParams>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        "Retrieving greeting for language code: {}, formal: {:?}",
        code, params.formal
    );

    let greeting = state
        .greetings
        .get_by_language_code(&code, params.formal)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Greeting for language {}", code)))?;

    // Second read for the denormalized language fields. The two reads share no
    // transaction, so the language can vanish in between; that reads as not-found.
    let language = state
        .languages
        .get_by_id(greeting.language_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Language with code {}", code)))?;

    let response = GreetingByLanguageResponse {
        language: language.name,
        language_code: language.code,
        greeting_text: greeting.greeting_text,
        formal: greeting.formal,
    };

    Ok((StatusCode::OK, Json(response)))
}

/// Create a new greeting
/// POST /api/greetings
pub async fn create_greeting(
    State(state): State<AppState>,
    Json(request): Json<CreateGreetingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate().map_err(ApiError::Validation)?;

    info!("Creating greeting for language id: {}", request.language_id);

    let id = state.greetings.create(&request).await?;

    let greeting = state
        .greetings
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::Database("Failed to load created greeting".to_string()))?;

    let location = format!("/api/greetings/{}", id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(greeting),
    ))
}

/// Update greeting by ID
/// PUT /api/greetings/:id
pub async fn update_greeting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateGreetingRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate().map_err(ApiError::Validation)?;

    info!("Updating greeting with id: {}", id);

    let updated = state.greetings.update(id, &request).await?;

    if !updated {
        warn!("Greeting with id {} not found for update", id);
        return Err(ApiError::not_found(format!("Greeting with id {}", id)));
    }

    let greeting = state
        .greetings
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::Database("Failed to load updated greeting".to_string()))?;

    Ok((StatusCode::OK, Json(greeting)))
}

/// Delete greeting by ID
/// DELETE /api/greetings/:id
pub async fn delete_greeting(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting greeting with id: {}", id);

    let deleted = state.greetings.delete(id).await?;

    if !deleted {
        warn!("Greeting with id {} not found for deletion", id);
        return Err(ApiError::not_found(format!("Greeting with id {}", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
