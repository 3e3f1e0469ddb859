//! HOMA-IR prediction core.
//!
//! Collects three biomarkers (sex, fasting glucose, BMI), asks the Gemini
//! generative API for a structured insulin-resistance estimate, and drives
//! an idle → analyzing → success/error session state machine around that
//! single call. No medical modeling happens locally; the external model is
//! treated as an opaque estimation oracle.

pub mod controller;
pub mod display;
pub mod error;
pub mod gemini;
pub mod models;
pub mod predictor;

pub use controller::{Controller, Phase};
pub use display::{gauge_reading, GaugeReading, GAUGE_MAX};
pub use error::{PredictError, GENERIC_ERROR_MSG};
pub use gemini::GeminiClient;
pub use models::prediction::{PredictionInput, PredictionResult, RiskLevel, Sex};
pub use predictor::Predictor;
