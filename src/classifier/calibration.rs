//! Temperature calibration sidecar.
//!
//! A checkpoint directory may carry a `temperature.json` with shape
//! `{"temperature": <float>}`. The value is loaded once at startup and is
//! read-only afterwards.

use serde::Deserialize;
use std::path::Path;
use tracing::warn;

use crate::constants::DEFAULT_TEMPERATURE;

/// Sidecar filename, colocated with the model weights.
pub const TEMPERATURE_FILE: &str = "temperature.json";

#[derive(Debug, Deserialize)]
struct TemperatureFile {
    #[serde(default)]
    temperature: Option<f64>,
}

/// Reads the calibration temperature from a checkpoint directory.
///
/// A missing sidecar, malformed JSON, or a non-positive/non-finite value all
/// fall back to [`DEFAULT_TEMPERATURE`]; startup never fails on a bad
/// calibration artifact.
pub fn load_temperature(model_dir: &Path) -> f64 {
    let path = model_dir.join(TEMPERATURE_FILE);
    if !path.exists() {
        return DEFAULT_TEMPERATURE;
    }

    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read temperature sidecar");
            return DEFAULT_TEMPERATURE;
        }
    };

    let parsed: TemperatureFile = match serde_json::from_str(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "malformed temperature sidecar");
            return DEFAULT_TEMPERATURE;
        }
    };

    match parsed.temperature {
        Some(t) if t.is_finite() && t > 0.0 => t,
        Some(t) => {
            warn!(value = t, "ignoring non-positive temperature");
            DEFAULT_TEMPERATURE
        }
        None => DEFAULT_TEMPERATURE,
    }
}
