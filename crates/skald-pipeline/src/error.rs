use thiserror::Error;

/// Errors from the generation capability. All of these are contained at the
/// segment level: the orchestrator retries up to the bound and then
/// substitutes a placeholder, so none of them ever abort a deck —
/// `Unavailable` alone is detected before the pipeline starts and routes
/// the whole deck to the fallback renderer instead.
#[derive(Debug, Error)]
pub enum CapabilityError {
    #[error("capability unavailable: {0}")]
    Unavailable(String),

    #[error("capability call failed: {0}")]
    Call(String),

    #[error("response did not match the slide schema: {0}")]
    Schema(String),
}
