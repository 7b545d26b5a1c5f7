// Application state and routing

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

use crate::db::Database;
use crate::handlers::{
    greetings::{
        create_greeting, delete_greeting, get_all_greetings, get_greeting_by_id,
        get_greeting_by_language, update_greeting,
    },
    health_check,
    languages::{
        create_language, delete_language, get_all_languages, get_language_by_id, update_language,
    },
};
use crate::middleware::apply_middleware;
use crate::repositories::{
    GreetingRepository, LanguageRepository, PgGreetingRepository, PgLanguageRepository,
};

/// Shared application state: the connection provider plus the
/// repository interfaces, injected at construction.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub languages: Arc<dyn LanguageRepository>,
    pub greetings: Arc<dyn GreetingRepository>,
}

impl AppState {
    /// Wires the Postgres-backed repositories over one shared pool.
    pub fn new(db: Database) -> Self {
        let languages: Arc<dyn LanguageRepository> =
            Arc::new(PgLanguageRepository::new(db.clone()));
        let greetings: Arc<dyn GreetingRepository> =
            Arc::new(PgGreetingRepository::new(db.clone()));

        AppState {
            db,
            languages,
            greetings,
        }
    }
}

/// Create the axum router with all endpoints and middleware
pub fn create_router(state: AppState) -> Router {
    let router = Router::new()
        // Health check endpoint
        .route("/api/health", get(health_check))
        // Language management endpoints
        .route("/api/languages", post(create_language))
        .route("/api/languages", get(get_all_languages))
        .route("/api/languages/:id", get(get_language_by_id))
        .route("/api/languages/:id", put(update_language))
        .route("/api/languages/:id", delete(delete_language))
        // Greeting management endpoints
        .route("/api/greetings", post(create_greeting))
        .route("/api/greetings", get(get_all_greetings))
        .route("/api/greetings/by-language/:code", get(get_greeting_by_language))
        .route("/api/greetings/:id", get(get_greeting_by_id))
        .route("/api/greetings/:id", put(update_greeting))
        .route("/api/greetings/:id", delete(delete_greeting))
        // Add shared state (connection provider + repositories)
        .with_state(state);

    apply_middleware(router)
}
