pub mod capability;
pub mod claude;
pub mod error;
pub mod format;
pub mod orchestrator;
pub mod state;
pub mod validate;

pub use capability::{MockCapability, MockOutcome, SlideCapability, SlideRequest};
pub use claude::ClaudeCapability;
pub use error::CapabilityError;
pub use format::{format_slide, sanitize_markup};
pub use orchestrator::{Orchestrator, MAX_ATTEMPTS};
pub use validate::validate_slide;
