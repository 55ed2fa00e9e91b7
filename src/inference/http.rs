//! HTTP clients for hosted sentiment and embedding endpoints

use crate::error::{Result, ResumeScorerError};
use crate::inference::{EmbeddingService, SentimentPrediction, SentimentService};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

#[derive(Clone)]
struct EndpointClient {
    client: Client,
    url: String,
    api_token: Option<String>,
}

impl EndpointClient {
    fn new(url: &str, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
            api_token,
        })
    }

    async fn post(&self, inputs: Value) -> Result<Value> {
        let mut request = self.client.post(&self.url).json(&json!({ "inputs": inputs }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ResumeScorerError::ExternalService(format!(
                "{} returned status {}: {}",
                self.url,
                status.as_u16(),
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ResumeScorerError::ExternalService(format!("Unparsable response: {}", e)))
    }
}

/// Text-classification endpoint answering `[[{label, score}, ...]]`.
#[derive(Clone)]
pub struct HttpSentimentClient {
    endpoint: EndpointClient,
}

impl HttpSentimentClient {
    pub fn new(url: &str, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: EndpointClient::new(url, api_token, timeout)?,
        })
    }
}

#[async_trait]
impl SentimentService for HttpSentimentClient {
    async fn classify(&self, text: &str) -> Result<SentimentPrediction> {
        let payload = self.endpoint.post(json!(text)).await?;
        parse_sentiment_payload(&payload)
    }
}

/// Feature-extraction endpoint answering one vector per input.
#[derive(Clone)]
pub struct HttpEmbeddingClient {
    endpoint: EndpointClient,
}

impl HttpEmbeddingClient {
    pub fn new(url: &str, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            endpoint: EndpointClient::new(url, api_token, timeout)?,
        })
    }
}

#[async_trait]
impl EmbeddingService for HttpEmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let payload = self.endpoint.post(json!(texts)).await?;
        parse_embedding_payload(&payload, texts.len())
    }
}

/// Highest-scoring prediction from either `[{..}]` or `[[{..}]]`.
pub fn parse_sentiment_payload(payload: &Value) -> Result<SentimentPrediction> {
    let unparsable =
        || ResumeScorerError::ExternalService(format!("Unparsable sentiment payload: {}", payload));

    let candidates = match payload {
        Value::Array(outer) => match outer.first() {
            Some(Value::Array(inner)) => inner.clone(),
            Some(Value::Object(_)) => outer.clone(),
            _ => return Err(unparsable()),
        },
        _ => return Err(unparsable()),
    };

    candidates
        .into_iter()
        .filter_map(|item| serde_json::from_value::<SentimentPrediction>(item).ok())
        .filter(|p| p.score.is_finite())
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .ok_or_else(unparsable)
}

pub fn parse_embedding_payload(payload: &Value, expected: usize) -> Result<Vec<Vec<f32>>> {
    let vectors: Vec<Vec<f32>> = serde_json::from_value(payload.clone()).map_err(|e| {
        ResumeScorerError::ExternalService(format!("Unparsable embedding payload: {}", e))
    })?;

    if vectors.len() != expected {
        return Err(ResumeScorerError::ExternalService(format!(
            "Expected {} embeddings, got {}",
            expected,
            vectors.len()
        )));
    }
    if vectors.iter().any(|v| v.is_empty() || v.len() != vectors[0].len()) {
        return Err(ResumeScorerError::ExternalService(
            "Embedding vectors are empty or of differing dimensions".to_string(),
        ));
    }

    Ok(vectors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_sentiment_payload() {
        let payload = json!([[
            {"label": "NEGATIVE", "score": 0.1},
            {"label": "POSITIVE", "score": 0.9}
        ]]);
        let prediction = parse_sentiment_payload(&payload).unwrap();

        assert_eq!(prediction.label, "POSITIVE");
        assert!(prediction.is_positive());
        assert_eq!(prediction.score, 0.9);
    }

    #[test]
    fn test_parse_flat_sentiment_payload() {
        let payload = json!([{"label": "NEGATIVE", "score": 0.8}]);
        let prediction = parse_sentiment_payload(&payload).unwrap();

        assert!(!prediction.is_positive());
    }

    #[test]
    fn test_unparsable_sentiment_payload() {
        let payload = json!({"error": "Model is loading"});
        let err = parse_sentiment_payload(&payload).unwrap_err();

        assert!(err.is_transient());
    }

    #[test]
    fn test_parse_embeddings() {
        let payload = json!([[0.1, 0.2], [0.3, 0.4]]);
        let vectors = parse_embedding_payload(&payload, 2).unwrap();

        assert_eq!(vectors.len(), 2);
        assert_eq!(vectors[1], vec![0.3, 0.4]);
    }

    #[test]
    fn test_embedding_count_mismatch() {
        let payload = json!([[0.1, 0.2]]);
        assert!(parse_embedding_payload(&payload, 2).is_err());

        let ragged = json!([[0.1, 0.2], [0.3]]);
        assert!(parse_embedding_payload(&ragged, 2).is_err());
    }

    #[test]
    fn test_client_construction() {
        let client = HttpSentimentClient::new(
            "http://localhost:1/sentiment",
            Some("token".to_string()),
            Duration::from_millis(500),
        );
        assert!(client.is_ok());
    }
}
