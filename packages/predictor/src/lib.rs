#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Outbreak prediction client.
//!
//! The trained outbreak model lives outside this process. [`Predictor`] is
//! the seam the rest of the workspace talks to; [`SubprocessPredictor`]
//! is the bundled backend, which launches the model as a short-lived child
//! process per call and exchanges one JSON message each way over its
//! standard streams.

pub mod subprocess;

use std::time::Duration;

use async_trait::async_trait;
use civic_risk_analytics_models::{FeatureVector, PredictionResult};

pub use subprocess::SubprocessPredictor;

/// Maximum number of characters of raw predictor output kept in error
/// messages.
const RAW_PREVIEW_LEN: usize = 500;

fn preview(raw: &str) -> &str {
    match raw.char_indices().nth(RAW_PREVIEW_LEN) {
        Some((idx, _)) => &raw[..idx],
        None => raw,
    }
}

#[allow(clippy::ref_option)]
fn exit_label(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

/// Errors that can occur while obtaining a prediction.
#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    /// The predictor process could not be started.
    #[error("Failed to start predictor '{program}': {source}")]
    Spawn {
        /// Program that failed to launch.
        program: String,
        /// Underlying launch error.
        source: std::io::Error,
    },

    /// Talking to the predictor process failed.
    #[error("Predictor I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The feature vector could not be encoded.
    #[error("Failed to encode features: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The predictor exited unsuccessfully.
    #[error("Predictor exited with {}: {}", exit_label(.code), .stderr.trim())]
    Exit {
        /// Exit code, `None` if terminated by a signal.
        code: Option<i32>,
        /// Everything the predictor wrote to its error stream.
        stderr: String,
    },

    /// The predictor's output was not a valid response.
    #[error("Predictor returned malformed output ({reason}): {}", preview(.raw))]
    MalformedOutput {
        /// Why the output was rejected.
        reason: String,
        /// Everything the predictor wrote to its output stream.
        raw: String,
    },

    /// The predictor reported an error of its own.
    #[error("Predictor reported an error: {message}")]
    Upstream {
        /// The predictor's error message.
        message: String,
    },

    /// The predictor did not finish in time and was killed.
    #[error("Predictor timed out after {after:?}")]
    Timeout {
        /// The bound that was exceeded.
        after: Duration,
    },
}

/// Something that can turn a feature vector into an outbreak verdict.
///
/// Implementations must be safe to call concurrently; every call is an
/// independent request.
#[async_trait]
pub trait Predictor: Send + Sync {
    /// Predicts outbreak risk for one area's features.
    ///
    /// # Errors
    ///
    /// Returns [`PredictionError`] if the prediction cannot be obtained or
    /// the response cannot be interpreted.
    async fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictionError>;
}
