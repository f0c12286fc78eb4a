use thiserror::Error;

mod domain_types;
mod ids;
mod rich_text;

pub use domain_types::*;
pub use ids::*;
pub use rich_text::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("No Notion object reference found in: {0}")]
    InvalidReference(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid property assignment '{0}': expected key=value")]
    InvalidAssignment(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}
