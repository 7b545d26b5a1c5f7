// Language handlers
// HTTP handlers for language management operations

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{CreateLanguageRequest, UpdateLanguageRequest},
    routes::AppState,
};

/// Get all languages, ordered by name
/// GET /api/languages
pub async fn get_all_languages(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Retrieving all languages");

    let languages = state.languages.get_all().await?;

    info!("Retrieved {} languages", languages.len());
    Ok((StatusCode::OK, Json(languages)))
}

/// Get language by ID
/// GET /api/languages/:id
pub async fn get_language_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Retrieving language with id: {}", id);

    let language = state
        .languages
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Language with id {}", id)))?;

    Ok((StatusCode::OK, Json(language)))
}

/// Create a new language
/// POST /api/languages
pub async fn create_language(
    State(state): State<AppState>,
    Json(request): Json<CreateLanguageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate().map_err(ApiError::Validation)?;

    info!("Creating language with code: {}", request.code);

    let id = state.languages.create(&request).await?;

    // Re-read so the response carries the server-assigned timestamps
    let language = state
        .languages
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::Database("Failed to load created language".to_string()))?;

    let location = format!("/api/languages/{}", id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(language),
    ))
}

/// Update language by ID
/// PUT /api/languages/:id
pub async fn update_language(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLanguageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    request.validate().map_err(ApiError::Validation)?;

    info!("Updating language with id: {}", id);

    let updated = state.languages.update(id, &request).await?;

    if !updated {
        warn!("Language with id {} not found for update", id);
        return Err(ApiError::not_found(format!("Language with id {}", id)));
    }

    let language = state
        .languages
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::Database("Failed to load updated language".to_string()))?;

    Ok((StatusCode::OK, Json(language)))
}

/// Delete language by ID, cascading to its greetings
/// DELETE /api/languages/:id
pub async fn delete_language(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Deleting language with id: {}", id);

    let deleted = state.languages.delete(id).await?;

    if !deleted {
        warn!("Language with id {} not found for deletion", id);
        return Err(ApiError::not_found(format!("Language with id {}", id)));
    }

    Ok(StatusCode::NO_CONTENT)
}
