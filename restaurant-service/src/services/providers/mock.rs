//! Scripted provider for unit tests.

use super::{FinishReason, GenerationParams, ProviderError, ProviderResponse, TextProvider};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

enum Script {
    Respond(Option<String>),
    Fail,
}

/// Mock text provider: returns a fixed answer (or fails) and records prompts.
pub struct MockTextProvider {
    script: Script,
    calls: AtomicUsize,
    last_prompt: Mutex<Option<String>>,
}

impl MockTextProvider {
    fn with_script(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_prompt: Mutex::new(None),
        }
    }

    pub fn responding(text: &str) -> Self {
        Self::with_script(Script::Respond(Some(text.to_string())))
    }

    /// Succeeds without any text, like a candidate with no parts.
    pub fn silent() -> Self {
        Self::with_script(Script::Respond(None))
    }

    pub fn failing() -> Self {
        Self::with_script(Script::Fail)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.last_prompt.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextProvider for MockTextProvider {
    async fn generate(
        &self,
        prompt: &str,
        _params: &GenerationParams,
    ) -> Result<ProviderResponse, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_prompt.lock().unwrap() = Some(prompt.to_string());

        match &self.script {
            Script::Respond(text) => Ok(ProviderResponse {
                text: text.clone(),
                input_tokens: prompt.len() as i32 / 4,
                output_tokens: 10,
                finish_reason: FinishReason::Complete,
            }),
            Script::Fail => Err(ProviderError::NetworkError(
                "connection reset by mock".to_string(),
            )),
        }
    }
}
