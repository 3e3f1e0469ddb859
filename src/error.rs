/// Message shown to the user when a prediction fails for any reason.
///
/// Raw service errors carry auth keys, quota details and model internals;
/// they go to the diagnostic log, never to the form.
pub const GENERIC_ERROR_MSG: &str =
    "The model could not complete the estimate. Please check the values and try again.";

#[derive(Debug, thiserror::Error)]
pub enum PredictError {
    #[error("invalid input: {0}")]
    Validation(String),

    #[error("operation not allowed in the current phase: {0}")]
    InvalidPhase(&'static str),

    #[error("predictor service unreachable: {0}")]
    Transport(String),

    #[error("predictor response did not match the expected schema: {0}")]
    Schema(String),
}
