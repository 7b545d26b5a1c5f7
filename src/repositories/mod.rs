// Repositories module
// Capability interfaces per entity, injected by construction

pub mod greetings;
pub mod languages;

use crate::error::ApiError;
use crate::models::{
    CreateGreetingRequest, CreateLanguageRequest, Greeting, Language, UpdateGreetingRequest,
    UpdateLanguageRequest,
};
use async_trait::async_trait;
use uuid::Uuid;

pub use greetings::PgGreetingRepository;
pub use languages::PgLanguageRepository;

/// CRUD operations over the `languages` table.
/// Absent rows are `Ok(None)` / `Ok(false)`, never an error.
#[async_trait]
pub trait LanguageRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Language>, ApiError>;
    async fn get_by_code(&self, code: &str) -> Result<Option<Language>, ApiError>;
    async fn get_all(&self) -> Result<Vec<Language>, ApiError>;
    async fn create(&self, request: &CreateLanguageRequest) -> Result<Uuid, ApiError>;
    async fn update(&self, id: Uuid, request: &UpdateLanguageRequest) -> Result<bool, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}

/// CRUD operations over the `greetings` table, plus the joined
/// lookup by language code with an optional formality filter.
#[async_trait]
pub trait GreetingRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Greeting>, ApiError>;
    async fn get_all(&self) -> Result<Vec<Greeting>, ApiError>;
    async fn get_by_language_id(&self, language_id: Uuid) -> Result<Vec<Greeting>, ApiError>;
    async fn get_by_language_code(
        &self,
        code: &str,
        formal: Option<bool>,
    ) -> Result<Option<Greeting>, ApiError>;
    async fn create(&self, request: &CreateGreetingRequest) -> Result<Uuid, ApiError>;
    async fn update(&self, id: Uuid, request: &UpdateGreetingRequest) -> Result<bool, ApiError>;
    async fn delete(&self, id: Uuid) -> Result<bool, ApiError>;
}
