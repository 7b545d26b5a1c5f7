use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Greeting entity: a phrase tied to one language, flagged formal or informal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Greeting {
    pub id: Uuid,
    pub language_id: Uuid,
    pub greeting_text: String,
    pub formal: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request structure for creating a new greeting
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGreetingRequest {
    pub language_id: Uuid,
    pub greeting_text: String,
    #[serde(default)]
    pub formal: bool,
}

/// Request structure for updating a greeting; all fields are rewritten
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateGreetingRequest {
    pub language_id: Uuid,
    pub greeting_text: String,
    #[serde(default)]
    pub formal: bool,
}

/// Denormalized response for the greeting-by-language-code lookup
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GreetingByLanguageResponse {
    pub language: String,
    pub language_code: String,
    pub greeting_text: String,
    pub formal: bool,
}

impl CreateGreetingRequest {
    /// Validate the create greeting request
    pub fn validate(&self) -> Result<(), String> {
        validate_greeting_text(&self.greeting_text)
    }

    /// Get normalized greeting text (trimmed)
    pub fn normalized_text(&self) -> String {
        self.greeting_text.trim().to_string()
    }
}

impl UpdateGreetingRequest {
    /// Validate the update greeting request
    pub fn validate(&self) -> Result<(), String> {
        validate_greeting_text(&self.greeting_text)
    }

    /// Get normalized greeting text (trimmed)
    pub fn normalized_text(&self) -> String {
        self.greeting_text.trim().to_string()
    }
}

fn validate_greeting_text(greeting_text: &str) -> Result<(), String> {
    if greeting_text.trim().is_empty() {
        return Err("GreetingText cannot be empty".to_string());
    }

    if greeting_text.len() > 500 {
        return Err("GreetingText cannot exceed 500 characters".to_string());
    }

    Ok(())
}
