//! Error type shared by the scraping and publishing stages.
//!
//! Components keep these errors internal and convert them into the signals
//! their callers act on (`Option` for a dropped listing, `bool` for a failed
//! publish). Only configuration errors and "nothing scraped" reach `main`.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid service account credentials: {0}")]
    Credentials(String),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to sign token assertion: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("Token exchange failed: {0}")]
    TokenExchange(String),

    #[error("Docs API {stage} failed with HTTP {status}: {body}")]
    Api {
        stage: &'static str,
        status: u16,
        body: String,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No job listings were scraped")]
    NoListings,

    #[error("Publishing to document {document_id} failed")]
    Publish { document_id: String },
}

impl AppError {
    pub fn config(message: impl Into<String>) -> Self {
        AppError::Config {
            message: message.into(),
        }
    }

    pub fn transport(url: &str, source: reqwest::Error) -> Self {
        AppError::Transport {
            url: url.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
