use crate::models::prediction::PredictionResult;

/// Upper bound of the gauge arc. Clamping is purely visual; the raw
/// index is still shown as the numeric label.
pub const GAUGE_MAX: f64 = 10.0;

/// Needle position and label value for the gauge widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    /// Clamped to `0.0..=GAUGE_MAX`.
    pub value: f64,
    /// Unclamped index for the numeric label.
    pub raw: f64,
}

impl GaugeReading {
    /// Unfilled portion of the arc.
    pub fn remaining(&self) -> f64 {
        GAUGE_MAX - self.value
    }
}

pub fn gauge_reading(homa_index: f64) -> GaugeReading {
    GaugeReading {
        value: homa_index.clamp(0.0, GAUGE_MAX),
        raw: homa_index,
    }
}

/// Everything the results view needs from a finished prediction.
pub fn reading_for(result: &PredictionResult) -> (GaugeReading, &'static str) {
    (gauge_reading(result.homa_index), result.risk_level.color())
}
