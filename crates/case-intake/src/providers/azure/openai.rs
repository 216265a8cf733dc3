//! Azure OpenAI chat completion client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::providers::llm::{ChatProvider, ChatRequest};

/// Chat completions against one Azure OpenAI deployment
pub struct AzureOpenAiClient {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    api_version: String,
    deployment: String,
}

impl AzureOpenAiClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `endpoint` - Resource endpoint, e.g. `https://name.openai.azure.com/`
    /// * `deployment` - Deployment name the requests are routed to
    pub fn new(
        client: reqwest::Client,
        endpoint: &str,
        api_key: String,
        api_version: String,
        deployment: String,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            api_version,
            deployment,
        }
    }

    /// Get the API endpoint URL
    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint,
            urlencoding::encode(&self.deployment),
            urlencoding::encode(&self.api_version)
        )
    }
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    messages: [Message<'a>; 2],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[async_trait]
impl ChatProvider for AzureOpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<String> {
        let body = CompletionRequest {
            messages: [
                Message { role: "system", content: &request.system },
                Message { role: "user", content: &request.user },
            ],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let response = self
            .client
            .post(self.url())
            .header("api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::llm(format!("Azure OpenAI request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::llm(format!(
                "Azure OpenAI completion failed ({}): {}",
                status, body
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse completion: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| Error::llm("No content in completion response"))
    }

    fn name(&self) -> &str {
        "azure-openai"
    }

    fn model(&self) -> &str {
        &self.deployment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url() {
        let client = AzureOpenAiClient::new(
            reqwest::Client::new(),
            "https://fraud-ai.openai.azure.com/",
            "key".into(),
            "2024-08-01-preview".into(),
            "gpt-4o-mini".into(),
        );
        assert_eq!(
            client.url(),
            "https://fraud-ai.openai.azure.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2024-08-01-preview"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = CompletionRequest {
            messages: [
                Message { role: "system", content: "sys" },
                Message { role: "user", content: "hi" },
            ],
            temperature: 0.0,
            max_tokens: 400,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "hi");
        assert_eq!(value["max_tokens"], 400);
    }

    #[test]
    fn test_null_content_parses() {
        let parsed: CompletionResponse =
            serde_json::from_str(r#"{"choices":[{"index":0,"message":{"role":"assistant","content":null}}]}"#)
                .unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }
}
