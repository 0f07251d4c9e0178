use crate::{
    error::Result,
    models::{GenerationRequest, GenerationResult, HealthStatus},
};
use async_trait::async_trait;

/// The image generation service the controller talks to.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult>;

    async fn health(&self) -> Result<HealthStatus>;
}
