use async_trait::async_trait;

use crate::{
    error::Result,
    models::{GenerationRequest, GenerationResult},
};

/// A way of getting a [`GenerationRequest`] to the model and a result back.
///
/// Implementations must not touch the network in `check_config`; the bridge
/// calls it before validating input so that missing credentials fail fast.
#[async_trait]
pub trait GenerationTransport: Send + Sync {
    fn name(&self) -> &'static str;

    fn check_config(&self) -> Result<()>;

    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;
}
