// Models module

pub mod greeting;
pub mod language;

// Re-export commonly used types
pub use greeting::{
    CreateGreetingRequest, Greeting, GreetingByLanguageResponse, UpdateGreetingRequest,
};
pub use language::{CreateLanguageRequest, Language, UpdateLanguageRequest};
