use async_trait::async_trait;
use reqwest::Client;

use crate::{
    bridge::{relay_client::wire_request, transport::GenerationTransport},
    config::CallableConfig,
    error::{Result, SwapError},
    models::{CallableRequest, CallableResponse, GenerationRequest, GenerationResult},
};

/// Invokes a managed callable function (`{"data": ..}` in, `{"result": ..}` out).
#[derive(Clone)]
pub struct CallableClient {
    client: Client,
    config: CallableConfig,
}

impl CallableClient {
    pub fn new(config: CallableConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn url(&self) -> Result<&str> {
        self.config
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| SwapError::Config("CALLABLE_URL is not configured.".into()))
    }
}

fn error_from_status(status: &str, message: String, http_status: u16) -> SwapError {
    match status {
        "INVALID_ARGUMENT" => SwapError::Validation(message),
        "UNAVAILABLE" | "FAILED_PRECONDITION" => SwapError::Config(message),
        other => SwapError::Api {
            status: http_status,
            message: format!("{}: {}", other, message),
        },
    }
}

#[async_trait]
impl GenerationTransport for CallableClient {
    fn name(&self) -> &'static str {
        "callable"
    }

    fn check_config(&self) -> Result<()> {
        self.url().map(|_| ())
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let url = self.url()?;
        log::info!("Invoking callable function: {}", url);

        let mut builder = self.client.post(url).json(&CallableRequest {
            data: wire_request(request),
        });
        if let Some(token) = &self.config.id_token {
            builder = builder.bearer_auth(token);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| SwapError::Transport(format!("Callable request failed: {}", e)))?;

        let http_status = response.status().as_u16();
        let body = response.text().await?;
        let parsed: CallableResponse = serde_json::from_str(&body).map_err(|e| {
            log::error!("Callable returned an unreadable body (status {}): {}", http_status, body);
            SwapError::Response(format!("Invalid callable response: {}", e))
        })?;

        if let Some(error) = parsed.error {
            log::error!("Callable failed with {}: {}", error.status, error.message);
            return Err(error_from_status(&error.status, error.message, http_status));
        }

        let result = parsed
            .result
            .ok_or_else(|| SwapError::Response("Callable response has no result".into()))?;

        Ok(match result.image_url {
            Some(image_url) => GenerationResult::Generated {
                image_url,
                text: result.text,
            },
            None => GenerationResult::no_image(result.text, 0),
        })
    }
}
