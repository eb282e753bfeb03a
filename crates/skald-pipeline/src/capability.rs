use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use skald_deck::{SlideRecord, ValidationResult};

use crate::error::CapabilityError;
use crate::format::format_slide;
use crate::validate::validate_slide;

/// One generation request: the fully built prompt text for one segment.
#[derive(Debug, Clone)]
pub struct SlideRequest {
    pub prompt: String,
}

/// The pipeline's seam to the external generation capability.
///
/// `generate` is the unreliable remote call; `format` and `validate`
/// default to the deterministic local passes so every adapter inherits the
/// same safety layer. Implementations may override them to add remote
/// refinement, but must keep the contracts: format output is free of the
/// breaking-pattern class, validate never mutates.
#[async_trait]
pub trait SlideCapability: Send + Sync {
    async fn generate(&self, request: &SlideRequest) -> Result<SlideRecord, CapabilityError>;

    fn format(&self, slide: &SlideRecord) -> Result<SlideRecord, CapabilityError> {
        Ok(format_slide(slide))
    }

    fn validate(&self, slide: &SlideRecord) -> Result<ValidationResult, CapabilityError> {
        Ok(validate_slide(slide))
    }
}

// ── Mock (tests) ─────────────────────────────────────────────────────

/// Scripted outcome for one `generate` call.
#[derive(Debug, Clone)]
pub enum MockOutcome {
    Slide(SlideRecord),
    CallError(String),
    SchemaError(String),
}

/// Scripted capability for tests: pops one outcome per call, repeating the
/// last outcome once the script runs out.
#[derive(Default)]
pub struct MockCapability {
    script: Mutex<VecDeque<MockOutcome>>,
    last: Mutex<Option<MockOutcome>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockCapability {
    pub fn new(outcomes: Vec<MockOutcome>) -> Self {
        MockCapability {
            script: Mutex::new(outcomes.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// A capability that always returns the same slide.
    pub fn always(slide: SlideRecord) -> Self {
        Self::new(vec![MockOutcome::Slide(slide)])
    }

    /// A capability whose every call fails.
    pub fn always_failing(message: &str) -> Self {
        Self::new(vec![MockOutcome::CallError(message.to_string())])
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order.
    pub fn recorded_prompts(&self) -> Vec<String> {
        self.prompts.lock().expect("mock prompts lock").clone()
    }
}

#[async_trait]
impl SlideCapability for MockCapability {
    async fn generate(&self, request: &SlideRequest) -> Result<SlideRecord, CapabilityError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .expect("mock prompts lock")
            .push(request.prompt.clone());
        let outcome = {
            let mut script = self.script.lock().expect("mock script lock");
            match script.pop_front() {
                Some(outcome) => {
                    *self.last.lock().expect("mock last lock") = Some(outcome.clone());
                    outcome
                }
                None => self
                    .last
                    .lock()
                    .expect("mock last lock")
                    .clone()
                    .unwrap_or_else(|| MockOutcome::CallError("mock script empty".into())),
            }
        };
        match outcome {
            MockOutcome::Slide(slide) => Ok(slide),
            MockOutcome::CallError(message) => Err(CapabilityError::Call(message)),
            MockOutcome::SchemaError(message) => Err(CapabilityError::Schema(message)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn good_slide() -> SlideRecord {
        SlideRecord::new("Mock", "A perfectly reasonable body.")
    }

    #[tokio::test]
    async fn mock_pops_in_order_then_repeats() {
        let mock = MockCapability::new(vec![
            MockOutcome::CallError("first".into()),
            MockOutcome::Slide(good_slide()),
        ]);
        let request = SlideRequest {
            prompt: "p".into(),
        };
        assert!(mock.generate(&request).await.is_err());
        assert!(mock.generate(&request).await.is_ok());
        // script exhausted: repeats the last outcome
        assert!(mock.generate(&request).await.is_ok());
        assert_eq!(mock.calls(), 3);
    }

    #[tokio::test]
    async fn default_format_and_validate_are_wired() {
        let mock = MockCapability::always(good_slide());
        let slide = SlideRecord::new("T", "left a *stray marker here");
        let formatted = mock.format(&slide).unwrap();
        assert!(formatted.content.contains("\\*stray"));
        let result = mock.validate(&formatted).unwrap();
        assert!(result.is_valid, "issues: {:?}", result.issues);
    }
}
