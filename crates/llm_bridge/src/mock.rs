//! Canned backend for tests and offline runs

use crate::error::BridgeError;
use crate::media::ImageAttachment;
use crate::provider::TextGenerator;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Debug, Default)]
struct Recorded {
    system: Option<String>,
    user: Option<String>,
    image_count: Option<usize>,
    calls: usize,
}

/// Returns a fixed reply and records what it was asked
///
/// Clones share the recording, so a test can keep one handle and give the
/// other to the code under test.
#[derive(Clone)]
pub struct MockGenerator {
    reply: Result<String, BridgeError>,
    recorded: Arc<Mutex<Recorded>>,
}

impl MockGenerator {
    pub fn with_reply(reply: impl Into<String>) -> Self {
        Self {
            reply: Ok(reply.into()),
            recorded: Arc::default(),
        }
    }

    pub fn with_error(error: BridgeError) -> Self {
        Self {
            reply: Err(error),
            recorded: Arc::default(),
        }
    }

    pub fn last_system_prompt(&self) -> Option<String> {
        self.recorded.lock().ok()?.system.clone()
    }

    pub fn last_user_prompt(&self) -> Option<String> {
        self.recorded.lock().ok()?.user.clone()
    }

    pub fn last_image_count(&self) -> Option<usize> {
        self.recorded.lock().ok()?.image_count
    }

    pub fn calls(&self) -> usize {
        self.recorded.lock().map(|r| r.calls).unwrap_or(0)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    fn name(&self) -> &str {
        "Mock"
    }

    async fn generate(
        &self,
        system: &str,
        user: &str,
        images: &[ImageAttachment],
    ) -> Result<String, BridgeError> {
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.system = Some(system.to_string());
            recorded.user = Some(user.to_string());
            recorded.image_count = Some(images.len());
            recorded.calls += 1;
        }
        self.reply.clone()
    }
}
