use async_trait::async_trait;
use reqwest::Client;

use crate::{
    bridge::transport::GenerationTransport,
    config::RelayConfig,
    error::{Result, SwapError},
    models::{GenerationRequest, GenerationResult, ImageFile, SwapRequest, SwapResponse},
};

/// Forwards the two images to a relay server speaking the `/swap-clothes` contract.
#[derive(Clone)]
pub struct RelayClient {
    client: Client,
    config: RelayConfig,
}

impl RelayClient {
    pub fn new(config: RelayConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn base_url(&self) -> Result<&str> {
        self.config
            .base_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| SwapError::Config("RELAY_URL is not configured.".into()))
    }

    pub fn endpoint(&self) -> Result<String> {
        Ok(format!("{}/swap-clothes", self.base_url()?.trim_end_matches('/')))
    }
}

/// Rebuilds the wire request from already-stripped inline images.
pub(crate) fn wire_request(request: &GenerationRequest) -> SwapRequest {
    SwapRequest::new(
        ImageFile::new(&request.person.data, &request.person.mime_type, "person"),
        ImageFile::new(&request.clothing.data, &request.clothing.mime_type, "clothing"),
    )
}

#[async_trait]
impl GenerationTransport for RelayClient {
    fn name(&self) -> &'static str {
        "relay"
    }

    fn check_config(&self) -> Result<()> {
        self.base_url().map(|_| ())
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult> {
        let endpoint = self.endpoint()?;
        log::info!("Forwarding swap request to relay: {}", endpoint);

        let response = self
            .client
            .post(&endpoint)
            .json(&wire_request(request))
            .send()
            .await
            .map_err(|e| SwapError::Transport(format!("Relay request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        let parsed: SwapResponse = serde_json::from_str(&body).map_err(|e| {
            log::error!("Relay returned an unreadable body (status {}): {}", status, body);
            SwapError::Response(format!("Invalid relay response: {}", e))
        })?;

        let failed = parsed.is_failure();
        match status {
            200..=299 => match parsed.image_url {
                Some(image_url) if !failed => Ok(GenerationResult::Generated {
                    image_url,
                    text: parsed.text,
                }),
                _ => Ok(GenerationResult::no_image(parsed.error.or(parsed.text), 0)),
            },
            502 => Ok(GenerationResult::no_image(parsed.error, 0)),
            400 => Err(SwapError::Validation(
                parsed.error.unwrap_or_else(|| "Relay rejected the request.".into()),
            )),
            _ => {
                let mut message = parsed.error.unwrap_or_else(|| "Relay request failed".into());
                if let Some(details) = parsed.details {
                    message = format!("{} ({})", message, details);
                }
                Err(SwapError::Api { status, message })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn sample_request() -> GenerationRequest {
        let person = ImageFile::new("P".repeat(120), "image/jpeg", "me.jpg");
        let clothing = ImageFile::new("C".repeat(120), "image/png", "shirt.png");
        GenerationRequest::from_images(&person, &clothing)
    }

    async fn relay_answering(status: u16, body: serde_json::Value) -> (MockServer, RelayClient) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/swap-clothes"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&server)
            .await;
        let client = RelayClient::new(RelayConfig::new().with_base_url(server.uri()));
        (server, client)
    }

    #[test]
    fn test_missing_base_url_is_config_error() {
        let client = RelayClient::new(RelayConfig::new());
        assert!(matches!(client.check_config(), Err(SwapError::Config(_))));
    }

    #[tokio::test]
    async fn test_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/swap-clothes"))
            .and(body_partial_json(serde_json::json!({
                "personImage": {"mimeType": "image/jpeg"},
                "clothingImage": {"mimeType": "image/png"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "imageUrl": "data:image/png;base64,XYZ",
                "text": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = RelayClient::new(RelayConfig::new().with_base_url(format!("{}/", server.uri())));
        let result = client.generate(&sample_request()).await.unwrap();
        assert_eq!(
            result,
            GenerationResult::Generated {
                image_url: "data:image/png;base64,XYZ".into(),
                text: None,
            }
        );
    }

    #[tokio::test]
    async fn test_bad_gateway_is_soft_failure() {
        let (_server, client) = relay_answering(
            502,
            serde_json::json!({"success": false, "error": "Model refused"}),
        )
        .await;

        let result = client.generate(&sample_request()).await.unwrap();
        assert_eq!(result.text(), Some("Model refused"));
        assert!(!result.is_success());
    }

    #[tokio::test]
    async fn test_bad_request_is_validation_error() {
        let (_server, client) = relay_answering(
            400,
            serde_json::json!({"success": false, "error": "too small"}),
        )
        .await;

        let err = client.generate(&sample_request()).await.unwrap_err();
        assert!(matches!(err, SwapError::Validation(msg) if msg == "too small"));
    }

    #[tokio::test]
    async fn test_server_error_is_api_error() {
        let (_server, client) = relay_answering(
            500,
            serde_json::json!({"success": false, "error": "failed", "details": "quota"}),
        )
        .await;

        let err = client.generate(&sample_request()).await.unwrap_err();
        match err {
            SwapError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "failed (quota)");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
