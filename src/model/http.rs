//! HTTP text generation against an OpenAI-compatible completions endpoint.
//!
//! Sends `POST {endpoint}` with `{model, prompt, max_tokens, n, temperature}`
//! and reads `choices[0].text`.

use serde::{Deserialize, Serialize};
use tokio::runtime::Runtime;

use super::{GenerationParams, ModelError, TextGenerator};

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
    n: usize,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    #[serde(default)]
    text: String,
}

/// Blocking completion client.
pub struct HttpGenerator {
    http: reqwest::Client,
    runtime: Runtime,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpGenerator {
    /// Create a client for `endpoint` using model `model`.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("trucode/", env!("CARGO_PKG_VERSION")))
            .build()?;
        let runtime = Runtime::new().map_err(ModelError::Runtime)?;

        Ok(Self {
            http,
            runtime,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn complete(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError> {
        let body = CompletionRequest {
            model: &self.model,
            prompt,
            max_tokens: params.max_tokens,
            n: params.n,
            temperature: params.temperature,
        };

        let mut request = self.http.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ModelError::Status(status.as_u16()));
        }

        let parsed: CompletionResponse = response.json().await?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.text)
            .filter(|text| !text.trim().is_empty())
            .ok_or(ModelError::EmptyResponse)
    }
}

impl TextGenerator for HttpGenerator {
    fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String, ModelError> {
        self.runtime.block_on(self.complete(prompt, params))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let body = CompletionRequest {
            model: "m",
            prompt: "p",
            max_tokens: 200,
            n: 1,
            temperature: 0.5,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "m");
        assert_eq!(json["max_tokens"], 200);
        assert_eq!(json["n"], 1);
    }

    #[test]
    fn test_response_parsing_tolerates_missing_fields() {
        let parsed: CompletionResponse = serde_json::from_str(r#"{"choices":[{"text":"hi"}]}"#).unwrap();
        assert_eq!(parsed.choices[0].text, "hi");
        let empty: CompletionResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.choices.is_empty());
    }

    #[test]
    fn test_unreachable_endpoint_is_an_error() {
        let generator =
            HttpGenerator::new("http://127.0.0.1:9/v1/completions", "m", None).unwrap();
        assert_eq!(generator.endpoint(), "http://127.0.0.1:9/v1/completions");
        let result = generator.generate("prompt", &GenerationParams::default());
        assert!(result.is_err());
    }
}
