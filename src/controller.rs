use tracing::{debug, error, warn};

use crate::error::{PredictError, GENERIC_ERROR_MSG};
use crate::models::prediction::{PredictionInput, PredictionResult};
use crate::predictor::Predictor;

/// Lifecycle of a prediction session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Analyzing,
    Success,
    Error,
}

/// Owns the single session record and the idle → analyzing →
/// success/error state machine around one outstanding predictor call.
///
/// The state machine is split into [`begin`](Controller::begin) and
/// [`resolve`](Controller::resolve) so transitions can be driven (and
/// tested) without a live predictor; [`submit`](Controller::submit)
/// wires the two around a single awaited call. Exactly one call can be
/// in flight: `submit` holds the controller exclusively across the
/// await, and `begin` rejects re-entry while Analyzing.
#[derive(Debug, Default)]
pub struct Controller {
    phase: Phase,
    input: Option<PredictionInput>,
    result: Option<PredictionResult>,
    error_message: Option<String>,
}

impl Controller {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input(&self) -> Option<&PredictionInput> {
        self.input.as_ref()
    }

    pub fn result(&self) -> Option<&PredictionResult> {
        self.result.as_ref()
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Validate and accept a submission, moving to Analyzing.
    ///
    /// Allowed from Idle and from Error (resubmitting after a failure is
    /// reset-then-submit). A validation failure leaves the phase
    /// untouched so the form simply does not submit.
    pub fn begin(&mut self, input: PredictionInput) -> Result<(), PredictError> {
        match self.phase {
            Phase::Idle => {}
            Phase::Error => self.clear(),
            Phase::Analyzing => {
                return Err(PredictError::InvalidPhase(
                    "a submission is already in flight",
                ))
            }
            Phase::Success => {
                return Err(PredictError::InvalidPhase(
                    "reset before submitting new values",
                ))
            }
        }
        input.validate()?;
        self.input = Some(input);
        self.phase = Phase::Analyzing;
        Ok(())
    }

    /// Complete the in-flight call. On failure the user sees only
    /// [`GENERIC_ERROR_MSG`]; the underlying detail goes to the log,
    /// with schema violations kept distinguishable from transport noise.
    pub fn resolve(&mut self, outcome: Result<PredictionResult, PredictError>) {
        if self.phase != Phase::Analyzing {
            warn!(phase = ?self.phase, "resolve called with no submission in flight");
            return;
        }
        match outcome {
            Ok(result) => {
                self.result = Some(result);
                self.error_message = None;
                self.phase = Phase::Success;
            }
            Err(PredictError::Schema(detail)) => {
                error!(%detail, "prediction response rejected");
                self.fail();
            }
            Err(err) => {
                warn!(error = %err, "prediction failed");
                self.fail();
            }
        }
    }

    /// Clear the session back to Idle. Ignored while a call is in
    /// flight: the session is settled only by [`resolve`](Controller::resolve).
    pub fn reset(&mut self) {
        if self.phase == Phase::Analyzing {
            debug!("reset ignored while a submission is in flight");
            return;
        }
        self.clear();
    }

    /// Run one full submission: validate, call the predictor once, and
    /// settle the session. Returns `Err` only when the submission was
    /// rejected up front; the outcome of an accepted call is read from
    /// the session state.
    pub async fn submit(
        &mut self,
        input: PredictionInput,
        predictor: &dyn Predictor,
    ) -> Result<(), PredictError> {
        self.begin(input)?;
        let outcome = predictor.predict(&input).await;
        self.resolve(outcome);
        Ok(())
    }

    fn fail(&mut self) {
        self.result = None;
        self.error_message = Some(GENERIC_ERROR_MSG.to_string());
        self.phase = Phase::Error;
    }

    fn clear(&mut self) {
        self.phase = Phase::Idle;
        self.input = None;
        self.result = None;
        self.error_message = None;
    }
}
