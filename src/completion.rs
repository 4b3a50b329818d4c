//! The completion seam between a chat session and the assistant backend.

use std::sync::Arc;

use crate::error::Result;

/// Produces an assistant reply for one user message.
///
/// Implementations resolve to the reply's markdown text, or fail with an error
/// whose [`message`](crate::Error::message) is shown to the user.
#[async_trait::async_trait]
pub trait Completion: Send + Sync {
    /// Sends `text` on behalf of the class identified by `class_code`.
    async fn complete(&self, text: &str, class_code: &str) -> Result<String>;
}

#[async_trait::async_trait]
impl<C: Completion + ?Sized> Completion for Arc<C> {
    async fn complete(&self, text: &str, class_code: &str) -> Result<String> {
        (**self).complete(text, class_code).await
    }
}

#[async_trait::async_trait]
impl<C: Completion + ?Sized> Completion for Box<C> {
    async fn complete(&self, text: &str, class_code: &str) -> Result<String> {
        (**self).complete(text, class_code).await
    }
}
