// Library root for the greetings REST API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;

// Re-export commonly used types
pub use db::Database;
pub use error::ApiError;
pub use models::{
    CreateGreetingRequest, CreateLanguageRequest, Greeting, Language, UpdateGreetingRequest,
    UpdateLanguageRequest,
};
pub use routes::AppState;
