// Router-level tests.
//
// Requests are sent straight into the axum router with
// `tower::ServiceExt::oneshot`, no network server involved. The language and
// greeting repositories are swapped for in-memory fakes implementing the same
// capability traits the Postgres repositories implement, so every handler
// contract (status codes, validation, ordering, the by-language tie-break) is
// exercised end to end. The health endpoint is tested against a pool pointing
// at a port nothing listens on.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use chrono::Utc;
use serde_json::{json, Value};
use tokio_test::assert_ok;
use tower::ServiceExt;
use uuid::Uuid;

use greetings_api::config::DatabaseConfig;
use greetings_api::db::Database;
use greetings_api::error::ApiError;
use greetings_api::models::{
    CreateGreetingRequest, CreateLanguageRequest, Greeting, Language, UpdateGreetingRequest,
    UpdateLanguageRequest,
};
use greetings_api::repositories::{GreetingRepository, LanguageRepository};
use greetings_api::routes::{create_router, AppState};

// ---------------------------------------------------------------------------
// In-memory fakes
// ---------------------------------------------------------------------------

/// Shared backing store so the greeting fake can enforce the FK to languages
/// and resolve the join by language code.
#[derive(Default)]
struct TestStore {
    languages: Mutex<Vec<Language>>,
    greetings: Mutex<Vec<Greeting>>,
}

impl TestStore {
    fn seed_language(&self, name: &str, code: &str) -> Uuid {
        let now = Utc::now();
        let language = Language {
            id: Uuid::new_v4(),
            name: name.to_string(),
            code: code.to_string(),
            created_at: now,
            updated_at: now,
        };
        let id = language.id;
        self.languages.lock().unwrap().push(language);
        id
    }

    fn seed_greeting(&self, language_id: Uuid, text: &str, formal: bool) -> Uuid {
        let now = Utc::now();
        let greeting = Greeting {
            id: Uuid::new_v4(),
            language_id,
            greeting_text: text.to_string(),
            formal,
            created_at: now,
            updated_at: now,
        };
        let id = greeting.id;
        self.greetings.lock().unwrap().push(greeting);
        id
    }
}

struct FakeLanguageRepository {
    store: Arc<TestStore>,
}

#[async_trait]
impl LanguageRepository for FakeLanguageRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Language>, ApiError> {
        let languages = self.store.languages.lock().unwrap();
        Ok(languages.iter().find(|l| l.id == id).cloned())
    }

    async fn get_by_code(&self, code: &str) -> Result<Option<Language>, ApiError> {
        let languages = self.store.languages.lock().unwrap();
        Ok(languages.iter().find(|l| l.code == code).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Language>, ApiError> {
        let mut languages = self.store.languages.lock().unwrap().clone();
        languages.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(languages)
    }

    async fn create(&self, request: &CreateLanguageRequest) -> Result<Uuid, ApiError> {
        let mut languages = self.store.languages.lock().unwrap();
        if languages.iter().any(|l| l.code == request.normalized_code()) {
            return Err(ApiError::conflict("A language with this code already exists"));
        }

        let now = Utc::now();
        let language = Language {
            id: Uuid::new_v4(),
            name: request.normalized_name(),
            code: request.normalized_code(),
            created_at: now,
            updated_at: now,
        };
        let id = language.id;
        languages.push(language);
        Ok(id)
    }

    async fn update(&self, id: Uuid, request: &UpdateLanguageRequest) -> Result<bool, ApiError> {
        let mut languages = self.store.languages.lock().unwrap();
        if languages
            .iter()
            .any(|l| l.id != id && l.code == request.normalized_code())
        {
            return Err(ApiError::conflict("A language with this code already exists"));
        }

        match languages.iter_mut().find(|l| l.id == id) {
            Some(language) => {
                language.name = request.normalized_name();
                language.code = request.normalized_code();
                language.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut languages = self.store.languages.lock().unwrap();
        let before = languages.len();
        languages.retain(|l| l.id != id);
        let deleted = languages.len() < before;

        if deleted {
            // Same behavior as the FK cascade in Postgres
            self.store
                .greetings
                .lock()
                .unwrap()
                .retain(|g| g.language_id != id);
        }

        Ok(deleted)
    }
}

struct FakeGreetingRepository {
    store: Arc<TestStore>,
}

#[async_trait]
impl GreetingRepository for FakeGreetingRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Greeting>, ApiError> {
        let greetings = self.store.greetings.lock().unwrap();
        Ok(greetings.iter().find(|g| g.id == id).cloned())
    }

    async fn get_all(&self) -> Result<Vec<Greeting>, ApiError> {
        let mut greetings = self.store.greetings.lock().unwrap().clone();
        greetings.sort_by(|a, b| a.greeting_text.cmp(&b.greeting_text));
        Ok(greetings)
    }

    async fn get_by_language_id(&self, language_id: Uuid) -> Result<Vec<Greeting>, ApiError> {
        let mut greetings: Vec<Greeting> = self
            .store
            .greetings
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.language_id == language_id)
            .cloned()
            .collect();
        greetings.sort_by(|a, b| a.greeting_text.cmp(&b.greeting_text));
        Ok(greetings)
    }

    async fn get_by_language_code(
        &self,
        code: &str,
        formal: Option<bool>,
    ) -> Result<Option<Greeting>, ApiError> {
        let language_id = {
            let languages = self.store.languages.lock().unwrap();
            match languages.iter().find(|l| l.code == code) {
                Some(language) => language.id,
                None => return Ok(None),
            }
        };

        let mut matches: Vec<Greeting> = self
            .store
            .greetings
            .lock()
            .unwrap()
            .iter()
            .filter(|g| g.language_id == language_id)
            .filter(|g| formal.map_or(true, |flag| g.formal == flag))
            .cloned()
            .collect();

        // ORDER BY formal: informal (false) ranks first
        matches.sort_by_key(|g| g.formal);
        Ok(matches.into_iter().next())
    }

    async fn create(&self, request: &CreateGreetingRequest) -> Result<Uuid, ApiError> {
        let language_exists = self
            .store
            .languages
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.id == request.language_id);
        if !language_exists {
            return Err(ApiError::validation("Referenced language does not exist"));
        }

        let now = Utc::now();
        let greeting = Greeting {
            id: Uuid::new_v4(),
            language_id: request.language_id,
            greeting_text: request.normalized_text(),
            formal: request.formal,
            created_at: now,
            updated_at: now,
        };
        let id = greeting.id;
        self.store.greetings.lock().unwrap().push(greeting);
        Ok(id)
    }

    async fn update(&self, id: Uuid, request: &UpdateGreetingRequest) -> Result<bool, ApiError> {
        let language_exists = self
            .store
            .languages
            .lock()
            .unwrap()
            .iter()
            .any(|l| l.id == request.language_id);
        if !language_exists {
            return Err(ApiError::validation("Referenced language does not exist"));
        }

        let mut greetings = self.store.greetings.lock().unwrap();
        match greetings.iter_mut().find(|g| g.id == id) {
            Some(greeting) => {
                greeting.language_id = request.language_id;
                greeting.greeting_text = request.normalized_text();
                greeting.formal = request.formal;
                greeting.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let mut greetings = self.store.greetings.lock().unwrap();
        let before = greetings.len();
        greetings.retain(|g| g.id != id);
        Ok(greetings.len() < before)
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Pool config pointing at a port nothing listens on. Pool creation is lazy,
/// so this only fails once a connection is actually requested.
fn unreachable_database_config() -> DatabaseConfig {
    DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        database: "greetings".to_string(),
        username: "postgres".to_string(),
        password: "postgres".to_string(),
        ssl_mode: "disable".to_string(),
        max_connections: 2,
        connection_timeout: Duration::from_secs(5),
    }
}

async fn test_app() -> (Router, Arc<TestStore>) {
    let store = Arc::new(TestStore::default());
    let db = Database::new(unreachable_database_config())
        .await
        .expect("failed to create lazy pool");

    let state = AppState {
        db,
        languages: Arc::new(FakeLanguageRepository {
            store: store.clone(),
        }),
        greetings: Arc::new(FakeGreetingRepository {
            store: store.clone(),
        }),
    };

    (create_router(state), store)
}

async fn send(
    app: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> axum::response::Response {
    let request = match body {
        Some(json_body) => Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&json_body).unwrap()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(path)
            .body(Body::empty())
            .unwrap(),
    };

    app.clone().oneshot(request).await.unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return json!(null);
    }
    assert_ok!(serde_json::from_slice(&bytes))
}

// ---------------------------------------------------------------------------
// Languages
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_all_languages_returns_name_ordered_list() {
    let (app, store) = test_app().await;
    store.seed_language("Spanish", "es");
    store.seed_language("French", "fr");

    let response = send(&app, "GET", "/api/languages", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["French", "Spanish"]);
}

#[tokio::test]
async fn get_language_by_id_returns_404_when_missing() {
    let (app, _store) = test_app().await;

    let response = send(&app, "GET", &format!("/api/languages/{}", Uuid::new_v4()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_language_returns_201_with_location_header() {
    let (app, _store) = test_app().await;

    let response = send(
        &app,
        "POST",
        "/api/languages",
        Some(json!({"name": "Spanish", "code": "es"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string();

    let body = body_json(response).await;
    assert_eq!(body["name"], "Spanish");
    assert_eq!(body["code"], "es");
    assert_eq!(location, format!("/api/languages/{}", body["id"].as_str().unwrap()));
    assert!(body["createdAt"].is_string());
    assert_eq!(body["createdAt"], body["updatedAt"]);
}

#[tokio::test]
async fn create_language_with_blank_fields_returns_400() {
    let (app, store) = test_app().await;

    let response = send(
        &app,
        "POST",
        "/api/languages",
        Some(json!({"name": "   ", "code": "es"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(
        &app,
        "POST",
        "/api/languages",
        Some(json!({"name": "Spanish", "code": ""})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was stored
    assert!(store.languages.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_language_with_duplicate_code_returns_400() {
    let (app, store) = test_app().await;
    store.seed_language("Spanish", "es");

    let response = send(
        &app,
        "POST",
        "/api/languages",
        Some(json!({"name": "Espanol", "code": "es"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.languages.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn update_language_returns_404_when_missing() {
    let (app, _store) = test_app().await;

    let response = send(
        &app,
        "PUT",
        &format!("/api/languages/{}", Uuid::new_v4()),
        Some(json!({"name": "Spanish", "code": "es"})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_language_roundtrip_refreshes_updated_at() {
    let (app, store) = test_app().await;
    let id = store.seed_language("Spanish", "es");

    // Ensure the refreshed timestamp is strictly greater
    tokio::time::sleep(Duration::from_millis(5)).await;

    let response = send(
        &app,
        "PUT",
        &format!("/api/languages/{}", id),
        Some(json!({"name": "Castilian Spanish", "code": "es-ES"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = send(&app, "GET", &format!("/api/languages/{}", id), None).await;
    let body = body_json(response).await;
    assert_eq!(body["name"], "Castilian Spanish");
    assert_eq!(body["code"], "es-ES");

    let created_at =
        chrono::DateTime::parse_from_rfc3339(body["createdAt"].as_str().unwrap()).unwrap();
    let updated_at =
        chrono::DateTime::parse_from_rfc3339(body["updatedAt"].as_str().unwrap()).unwrap();
    assert!(updated_at > created_at);
}

#[tokio::test]
async fn update_language_to_taken_code_returns_400_and_changes_nothing() {
    let (app, store) = test_app().await;
    let spanish = store.seed_language("Spanish", "es");
    store.seed_language("French", "fr");

    let response = send(
        &app,
        "PUT",
        &format!("/api/languages/{}", spanish),
        Some(json!({"name": "Spanish", "code": "fr"})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let languages = store.languages.lock().unwrap();
    assert_eq!(languages.iter().filter(|l| l.code == "es").count(), 1);
    assert_eq!(languages.iter().filter(|l| l.code == "fr").count(), 1);
}

#[tokio::test]
async fn delete_language_cascades_to_greetings() {
    let (app, store) = test_app().await;
    let language_id = store.seed_language("Spanish", "es");
    let greeting_id = store.seed_greeting(language_id, "Hola", false);

    let response = send(&app, "DELETE", &format!("/api/languages/{}", language_id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "GET", &format!("/api/greetings/{}", greeting_id), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_language_returns_404_when_missing() {
    let (app, _store) = test_app().await;

    let response = send(&app, "DELETE", &format!("/api/languages/{}", Uuid::new_v4()), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Greetings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_greeting_returns_201_with_location_header() {
    let (app, store) = test_app().await;
    let language_id = store.seed_language("Spanish", "es");

    let response = send(
        &app,
        "POST",
        "/api/greetings",
        Some(json!({"languageId": language_id, "greetingText": "Hola", "formal": false})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let location = response
        .headers()
        .get(header::LOCATION)
        .expect("missing Location header")
        .to_str()
        .unwrap()
        .to_string();

    let body = body_json(response).await;
    assert_eq!(body["greetingText"], "Hola");
    assert_eq!(body["languageId"], language_id.to_string());
    assert_eq!(location, format!("/api/greetings/{}", body["id"].as_str().unwrap()));
}

#[tokio::test]
async fn create_greeting_with_blank_text_returns_400() {
    let (app, store) = test_app().await;
    let language_id = store.seed_language("Spanish", "es");

    let response = send(
        &app,
        "POST",
        "/api/greetings",
        Some(json!({"languageId": language_id, "greetingText": "  ", "formal": false})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.greetings.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_greeting_for_unknown_language_returns_400() {
    let (app, store) = test_app().await;

    let response = send(
        &app,
        "POST",
        "/api/greetings",
        Some(json!({"languageId": Uuid::new_v4(), "greetingText": "Hola", "formal": false})),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(store.greetings.lock().unwrap().is_empty());
}

#[tokio::test]
async fn get_all_greetings_returns_text_ordered_list() {
    let (app, store) = test_app().await;
    let language_id = store.seed_language("Spanish", "es");
    store.seed_greeting(language_id, "Hola", false);
    store.seed_greeting(language_id, "Buenos dias", true);

    let response = send(&app, "GET", "/api/greetings", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let texts: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["greetingText"].as_str().unwrap())
        .collect();
    assert_eq!(texts, vec!["Buenos dias", "Hola"]);
}

#[tokio::test]
async fn by_language_prefers_informal_on_ties() {
    let (app, store) = test_app().await;
    let language_id = store.seed_language("Spanish", "es");
    store.seed_greeting(language_id, "Buenos dias", true);
    store.seed_greeting(language_id, "Hola", false);

    let response = send(&app, "GET", "/api/greetings/by-language/es", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["language"], "Spanish");
    assert_eq!(body["languageCode"], "es");
    assert_eq!(body["greetingText"], "Hola");
    assert_eq!(body["formal"], false);
}

#[tokio::test]
async fn by_language_formal_filter_selects_formal_greeting() {
    let (app, store) = test_app().await;
    let language_id = store.seed_language("Spanish", "es");
    store.seed_greeting(language_id, "Hola", false);
    store.seed_greeting(language_id, "Buenos dias", true);

    let response = send(&app, "GET", "/api/greetings/by-language/es?formal=true", None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["greetingText"], "Buenos dias");
    assert_eq!(body["formal"], true);
}

#[tokio::test]
async fn by_language_formal_filter_returns_404_when_no_match() {
    let (app, store) = test_app().await;
    let language_id = store.seed_language("Spanish", "es");
    store.seed_greeting(language_id, "Hola", false);

    let response = send(&app, "GET", "/api/greetings/by-language/es?formal=true", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn by_language_returns_404_for_unknown_code() {
    let (app, _store) = test_app().await;

    let response = send(&app, "GET", "/api/greetings/by-language/xx", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_greeting_roundtrip() {
    let (app, store) = test_app().await;
    let language_id = store.seed_language("Spanish", "es");
    let id = store.seed_greeting(language_id, "Hola", false);

    let response = send(
        &app,
        "PUT",
        &format!("/api/greetings/{}", id),
        Some(json!({"languageId": language_id, "greetingText": "Buenas tardes", "formal": true})),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["greetingText"], "Buenas tardes");
    assert_eq!(body["formal"], true);
}

#[tokio::test]
async fn delete_greeting_returns_204_then_404() {
    let (app, store) = test_app().await;
    let language_id = store.seed_language("Spanish", "es");
    let id = store.seed_greeting(language_id, "Hola", false);

    let response = send(&app, "DELETE", &format!("/api/greetings/{}", id), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = send(&app, "DELETE", &format!("/api/greetings/{}", id), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_returns_503_when_database_unreachable() {
    let (app, _store) = test_app().await;

    let response = send(&app, "GET", "/api/health", None).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = body_json(response).await;
    assert_eq!(body["status"], "Unhealthy");
    assert!(body["timestamp"].is_string());
}
