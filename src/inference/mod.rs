//! Optional external inference collaborators
//!
//! The engine only sees these traits; HTTP-backed implementations live in `http`.

pub mod http;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Polarity label and its score as returned by a sentiment classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentPrediction {
    pub label: String,
    pub score: f64,
}

impl SentimentPrediction {
    pub fn is_positive(&self) -> bool {
        self.label.eq_ignore_ascii_case("positive")
    }
}

#[async_trait]
pub trait SentimentService: Send + Sync {
    async fn classify(&self, text: &str) -> Result<SentimentPrediction>;
}

#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// One vector per input text, in input order.
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

pub use http::{HttpEmbeddingClient, HttpSentimentClient};
