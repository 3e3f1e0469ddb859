use async_trait::async_trait;

use crate::error::PredictError;
use crate::models::prediction::{PredictionInput, PredictionResult};

/// Interface for turning validated biomarkers into a structured HOMA-IR
/// estimate.
///
/// Implementors own transport, serialization and vendor-specific API
/// details; the [`Controller`](crate::controller::Controller) stays
/// decoupled from any particular provider.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Issue a single estimation request. No retries: the one attempt
    /// either yields a complete [`PredictionResult`] or an error.
    async fn predict(&self, input: &PredictionInput)
        -> Result<PredictionResult, PredictError>;
}
