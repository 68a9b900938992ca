use async_trait::async_trait;
use reqwest::Client;

use crate::{
    bridge::{parser::parse_generation_response, transport::GenerationTransport},
    config::GeminiConfig,
    error::{Result, SwapError},
    models::{
        ApiErrorBody, Content, GenerateContentRequest, GenerateContentResponse,
        GenerationConfig, GenerationRequest, GenerationResult, Part,
    },
};

/// Calls the Gemini `generateContent` endpoint directly.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    /// Builds the model payload: person image, clothing image, instruction.
    pub fn build_request(&self, request: &GenerationRequest) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::inline(&request.person.mime_type, &request.person.data),
                    Part::inline(&request.clothing.mime_type, &request.clothing.data),
                    Part::text(request.prompt),
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: self.config.response_modalities.clone(),
            },
        }
    }

    fn api_key(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                SwapError::Config("GEMINI_API_KEY environment variable is missing.".into())
            })
    }
}

#[async_trait]
impl GenerationTransport for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn check_config(&self) -> Result<()> {
        self.api_key().map(|_| ())
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let api_key = self.api_key()?;
        let payload = self.build_request(request);

        log::info!(
            "Invoking model: {} (person: {}, clothing: {})",
            self.config.model,
            request.person.mime_type,
            request.clothing.mime_type
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {:?}", e);
                SwapError::Transport(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| match b.error.status {
                    Some(code) => format!("{} - {}", code, b.error.message),
                    None => b.error.message,
                })
                .unwrap_or(body);
            log::error!("Gemini service error {}: {}", status.as_u16(), message);
            return Err(SwapError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| SwapError::Response(format!("Invalid Gemini response: {}", e)))?;

        log::debug!(
            "Gemini answered with {} candidates (model version: {})",
            parsed.candidates.len(),
            parsed.model_version.as_deref().unwrap_or("unknown")
        );

        Ok(parse_generation_response(&parsed))
    }
}
