//! Injected "ask the user for a string" capability.
//!
//! Link and image commands need a URL. How that URL is obtained (a modal, a
//! command palette, a test fixture) is up to the shell; the dispatcher only
//! awaits the answer.

use std::future::Future;

/// Prompt shown when a link URL is needed.
pub const LINK_PROMPT: &str = "Enter URL:";
/// Prompt shown when an image URL is needed.
pub const IMAGE_PROMPT: &str = "Enter image URL:";

/// Something that can ask the user for a line of text.
///
/// `None` means the user dismissed the request.
pub trait TextRequester: Send + Sync {
    fn request_text(&self, prompt: &str) -> impl Future<Output = Option<String>> + Send;
}

impl<R: TextRequester> TextRequester for &R {
    fn request_text(&self, prompt: &str) -> impl Future<Output = Option<String>> + Send {
        (**self).request_text(prompt)
    }
}

/// Never answers. For shells without any input affordance.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRequester;

impl TextRequester for NoRequester {
    fn request_text(&self, _prompt: &str) -> impl Future<Output = Option<String>> + Send {
        std::future::ready(None)
    }
}

/// Always answers with the same value.
#[derive(Debug, Clone, Default)]
pub struct FixedRequester {
    answer: Option<String>,
}

impl FixedRequester {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: Some(answer.into()),
        }
    }

    /// A requester whose user always cancels.
    pub fn cancelled() -> Self {
        Self { answer: None }
    }
}

impl TextRequester for FixedRequester {
    fn request_text(&self, _prompt: &str) -> impl Future<Output = Option<String>> + Send {
        std::future::ready(self.answer.clone())
    }
}
