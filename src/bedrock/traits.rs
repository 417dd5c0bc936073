use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Text-to-image backend consumed by the request handler.
#[async_trait]
pub trait ImageService: Send + Sync {
    /// Returns the first generated image as base64 text.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<T: ImageService + ?Sized> ImageService for Arc<T> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}
