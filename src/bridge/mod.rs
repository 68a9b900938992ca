pub mod callable_client;
pub mod gemini_client;
pub mod parser;
pub mod relay_client;
pub mod transport;

use crate::{
    config::{Config, TransportKind},
    error::{Result, SwapError},
    models::{GenerationRequest, GenerationResult, ImageFile, SwapRequest},
};
use std::sync::Arc;

pub use callable_client::CallableClient;
pub use gemini_client::GeminiClient;
pub use parser::parse_generation_response;
pub use relay_client::RelayClient;
pub use transport::GenerationTransport;

pub const MISSING_IMAGES: &str = "Both a person image and a clothing image must be provided.";
pub const IMPLAUSIBLE_IMAGES: &str = "The submitted images are missing or too small.";

/// Stateless front door for a clothing swap. Cheap to clone and share across
/// request handlers; all clones use the same transport.
#[derive(Clone)]
pub struct SwapBridge {
    transport: Arc<dyn GenerationTransport>,
}

impl SwapBridge {
    pub fn new(transport: Arc<dyn GenerationTransport>) -> Self {
        Self { transport }
    }

    /// Builds the transport selected by `config.transport`.
    pub fn from_config(config: &Config) -> Self {
        let transport: Arc<dyn GenerationTransport> = match config.transport {
            TransportKind::Direct => Arc::new(GeminiClient::new(config.gemini.clone())),
            TransportKind::Relay => Arc::new(RelayClient::new(config.relay.clone())),
            TransportKind::Callable => Arc::new(CallableClient::new(config.callable.clone())),
        };
        log::info!("Swap bridge using {} transport", transport.name());
        Self::new(transport)
    }

    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }

    pub fn check_config(&self) -> Result<()> {
        self.transport.check_config()
    }

    pub async fn swap_images(
        &self,
        person: &ImageFile,
        clothing: &ImageFile,
    ) -> Result<GenerationResult> {
        self.transport.check_config()?;
        validate(person, clothing)?;
        self.transport
            .generate(&GenerationRequest::from_images(person, clothing))
            .await
    }

    /// Configuration is checked first, then input, and only then is the
    /// transport called.
    pub async fn swap(&self, request: &SwapRequest) -> Result<GenerationResult> {
        self.transport.check_config()?;

        let (person, clothing) = match (&request.person_image, &request.clothing_image) {
            (Some(person), Some(clothing)) => (person, clothing),
            _ => return Err(SwapError::Validation(MISSING_IMAGES.into())),
        };

        log::debug!(
            "Swap requested; person: {} ({}), clothing: {} ({})",
            person.name,
            person.mime_type,
            clothing.name,
            clothing.mime_type
        );

        self.swap_images(person, clothing).await
    }
}

fn validate(person: &ImageFile, clothing: &ImageFile) -> Result<()> {
    if !person.is_plausible() || !clothing.is_plausible() {
        return Err(SwapError::Validation(IMPLAUSIBLE_IMAGES.into()));
    }
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[tokio::test]
    async fn test_swap_passes_stripped_images_to_transport() {
        let fake = FakeTransport::answering(Ok(generated()));
        let bridge = SwapBridge::new(fake.clone());

        let request = SwapRequest::new(plausible_image("image/jpeg"), plausible_image("image/png"));
        let result = bridge.swap(&request).await.unwrap();

        assert!(result.is_success());
        assert_eq!(fake.calls(), 1);
        let sent = fake.last_request.lock().unwrap().clone().unwrap();
        assert_eq!(sent.person.data, "Q".repeat(150));
        assert_eq!(sent.person.mime_type, "image/jpeg");
        assert_eq!(sent.clothing.mime_type, "image/png");
    }

    #[tokio::test]
    async fn test_short_payload_rejected_before_call() {
        let fake = FakeTransport::answering(Ok(generated()));
        let bridge = SwapBridge::new(fake.clone());

        let request = SwapRequest::new(
            plausible_image("image/jpeg"),
            ImageFile::new("0123456789", "image/png", "tiny.png"),
        );
        let err = bridge.swap(&request).await.unwrap_err();

        assert!(matches!(err, SwapError::Validation(ref msg) if msg == IMPLAUSIBLE_IMAGES));
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_short_person_payload_rejected_before_call() {
        let fake = FakeTransport::answering(Ok(generated()));
        let bridge = SwapBridge::new(fake.clone());

        let request = SwapRequest::new(
            ImageFile::new("data:image/jpeg;base64,QUJD", "image/jpeg", "tiny.jpg"),
            plausible_image("image/png"),
        );
        let err = bridge.swap(&request).await.unwrap_err();

        assert!(matches!(err, SwapError::Validation(ref msg) if msg == IMPLAUSIBLE_IMAGES));
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_image_rejected_before_call() {
        let fake = FakeTransport::answering(Ok(generated()));
        let bridge = SwapBridge::new(fake.clone());

        let request = SwapRequest {
            person_image: Some(plausible_image("image/jpeg")),
            clothing_image: None,
        };
        let err = bridge.swap(&request).await.unwrap_err();

        assert!(matches!(err, SwapError::Validation(ref msg) if msg == MISSING_IMAGES));
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_missing_credentials_checked_first() {
        let fake = FakeTransport::unconfigured();
        let bridge = SwapBridge::new(fake.clone());

        // Even an empty request reports the configuration problem.
        let err = bridge.swap(&SwapRequest::default()).await.unwrap_err();
        assert!(matches!(err, SwapError::Config(_)));
        assert_eq!(fake.calls(), 0);
    }

    #[tokio::test]
    async fn test_soft_failure_passes_through() {
        let fake = FakeTransport::answering(Ok(GenerationResult::no_image(
            Some("policy".into()),
            1,
        )));
        let bridge = SwapBridge::new(fake);

        let result = bridge
            .swap_images(&plausible_image("image/jpeg"), &plausible_image("image/png"))
            .await
            .unwrap();
        assert_eq!(result.text(), Some("policy"));
        assert!(!result.is_success());
    }

    #[test]
    fn test_from_config_selects_transport() {
        let config = Config::new().with_transport(TransportKind::Relay);
        let bridge = SwapBridge::from_config(&config);
        assert_eq!(bridge.transport_name(), "relay");
        assert!(matches!(bridge.check_config(), Err(SwapError::Config(_))));

        let config = Config::new().with_transport(TransportKind::Callable);
        assert_eq!(SwapBridge::from_config(&config).transport_name(), "callable");
    }
}
