use crate::error::ProviderError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GenerateOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
///
/// Holds no per-request state, so one instance is shared by all requests.
pub struct LlmClient {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    extra_headers: Vec<(String, String)>,
}

impl LlmClient {
    pub fn new(
        api_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
        extra_headers: Vec<(String, String)>,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(LlmClient {
            client,
            api_url: api_url.into(),
            api_key: api_key.into(),
            extra_headers,
        })
    }

    pub async fn generate_text(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        options: &GenerateOptions,
    ) -> Result<String, ProviderError> {
        let mut request_builder = self
            .client
            .post(&self.api_url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&json!({
                "model": options.model,
                "messages": [
                    { "role": "system", "content": system_prompt },
                    { "role": "user", "content": user_prompt },
                ],
                "temperature": options.temperature,
                "max_tokens": options.max_tokens,
            }));

        for (name, value) in &self.extra_headers {
            request_builder = request_builder.header(name.as_str(), value.as_str());
        }

        tracing::debug!(model = %options.model, url = %self.api_url, "calling provider");
        let response = request_builder.send().await?;
        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(ProviderError::Http {
                status: status.as_u16(),
                body: response_text,
            });
        }

        let completion: ChatCompletion = serde_json::from_str(&response_text)
            .map_err(|e| ProviderError::Parse(e.to_string()))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ProviderError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn options() -> GenerateOptions {
        GenerateOptions {
            model: "openai/gpt-4o-mini".to_string(),
            temperature: 0.7,
            max_tokens: 4096,
        }
    }

    fn client(server: &MockServer, timeout: Duration) -> LlmClient {
        LlmClient::new(
            format!("{}/chat/completions", server.uri()),
            "test-key-1234567890",
            timeout,
            vec![("X-Title".to_string(), "Resumen".to_string())],
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_text_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer test-key-1234567890"))
            .and(header("X-Title", "Resumen"))
            .and(body_partial_json(json!({ "model": "openai/gpt-4o-mini", "max_tokens": 4096 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": "## Resumen\nTexto" } }]
            })))
            .mount(&server)
            .await;

        let text = client(&server, Duration::from_secs(5))
            .generate_text("system", "user", &options())
            .await
            .unwrap();
        assert_eq!(text, "## Resumen\nTexto");
    }

    #[tokio::test]
    async fn test_non_success_status_keeps_status_and_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .generate_text("system", "user", &options())
            .await
            .unwrap_err();
        match err {
            ProviderError::Http { status, body } => {
                assert_eq!(status, 429);
                assert_eq!(body, "rate limited");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .generate_text("system", "user", &options())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Parse(_)));
    }

    #[tokio::test]
    async fn test_empty_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_secs(5))
            .generate_text("system", "user", &options())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_slow_provider_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "choices": [] }))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let err = client(&server, Duration::from_millis(50))
            .generate_text("system", "user", &options())
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Timeout));
    }
}
