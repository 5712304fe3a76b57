//! Child-process predictor backend.
//!
//! Each call launches the configured program, writes the feature vector as
//! a single JSON object to its stdin, closes stdin, and collects stdout and
//! stderr until the process exits. Exit status 0 means stdout holds one
//! JSON response:
//!
//! ```json
//! { "probability": 0.73, "risk_level": "HIGH", "top_drivers": ["PM2.5 Spike"] }
//! ```
//!
//! Any other status is a failure, with diagnostics on stderr. A response
//! carrying an `error` field is a failure reported by the model itself.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::process::{Output, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use civic_risk_analytics_models::{FeatureVector, PredictionResult, RiskLevel};
use serde::Deserialize;
use tokio::io::AsyncWriteExt as _;
use tokio::process::Command;

use crate::{PredictionError, Predictor};

/// Default bound on a single predictor run.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Response shape written by the predictor on stdout.
#[derive(Debug, Deserialize)]
struct PredictorResponse {
    #[serde(default)]
    error: Option<serde_json::Value>,
    probability: Option<f64>,
    risk_level: Option<String>,
    top_drivers: Option<Vec<String>>,
}

/// Runs the outbreak model as a child process, once per prediction.
#[derive(Debug, Clone)]
pub struct SubprocessPredictor {
    program: PathBuf,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl SubprocessPredictor {
    /// Creates a predictor that runs `program` with no arguments and the
    /// [`DEFAULT_TIMEOUT`].
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }

    /// Sets the arguments passed to the program.
    #[must_use]
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Sets how long a run may take before the child is killed. `None`
    /// waits indefinitely.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Launches the child, feeds it `payload`, and waits for it to exit.
    ///
    /// The child is spawned with `kill_on_drop`, so abandoning this future
    /// (timeout or caller cancellation) terminates the process.
    async fn run(&self, payload: Vec<u8>) -> Result<Output, PredictionError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| PredictionError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| std::io::Error::other("predictor stdin was not captured"))?;

        let write = async move {
            let result = stdin.write_all(&payload).await;
            // Dropping stdin closes the pipe, which is the end-of-message
            // signal for the child.
            drop(stdin);
            result
        };

        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            return Err(PredictionError::Exit {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        match written {
            Err(e) if e.kind() == ErrorKind::BrokenPipe => {
                log::debug!("Predictor exited before reading all input: {e}");
            }
            Err(e) => return Err(e.into()),
            Ok(()) => {}
        }

        Ok(output)
    }
}

/// Whether an `error` value marks the response as failed. `null`, `false`,
/// `0` and `""` count as absent.
fn reports_failure(error: &serde_json::Value) -> bool {
    match error {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(flag) => *flag,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// Interprets the predictor's stdout.
fn interpret(stdout: &[u8]) -> Result<PredictionResult, PredictionError> {
    let raw = String::from_utf8_lossy(stdout);
    let malformed = |reason: String| PredictionError::MalformedOutput {
        reason,
        raw: raw.clone().into_owned(),
    };

    let response: PredictorResponse =
        serde_json::from_str(raw.trim()).map_err(|e| malformed(e.to_string()))?;

    if let Some(error) = response.error.filter(reports_failure) {
        let message = error
            .as_str()
            .map_or_else(|| error.to_string(), ToString::to_string);
        return Err(PredictionError::Upstream { message });
    }

    let probability = response
        .probability
        .ok_or_else(|| malformed("missing `probability`".to_string()))?;
    if !(0.0..=1.0).contains(&probability) {
        return Err(malformed(format!(
            "probability {probability} is outside [0, 1]"
        )));
    }

    let label = response
        .risk_level
        .ok_or_else(|| malformed("missing `risk_level`".to_string()))?;
    let risk_level: RiskLevel = label
        .parse()
        .map_err(|_| malformed(format!("unknown risk level '{label}'")))?;

    let top_drivers = response
        .top_drivers
        .ok_or_else(|| malformed("missing `top_drivers`".to_string()))?;

    Ok(PredictionResult {
        probability,
        risk_level,
        top_drivers,
    })
}

#[async_trait]
impl Predictor for SubprocessPredictor {
    async fn predict(&self, features: &FeatureVector) -> Result<PredictionResult, PredictionError> {
        let payload = serde_json::to_vec(features)?;

        log::debug!(
            "Running predictor {} {:?}",
            self.program.display(),
            self.args
        );

        let output = match self.timeout {
            Some(after) => tokio::time::timeout(after, self.run(payload))
                .await
                .map_err(|_| PredictionError::Timeout { after })??,
            None => self.run(payload).await?,
        };

        interpret(&output.stdout)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn features() -> FeatureVector {
        FeatureVector {
            health_incidents_last_7d: 5,
            health_incidents_last_14d: 8,
            dengue_incidents_last_7d: 2,
            malaria_incidents_last_7d: 0,
            open_sanitation_complaints: 7,
            total_sanitation_complaints_last_7d: 4,
            avg_pm25_last_7d: 95.5,
            avg_pm10_last_7d: 140.25,
            max_pm25_last_7d: 180.0,
        }
    }

    fn shell(script: &str) -> SubprocessPredictor {
        SubprocessPredictor::new("sh")
            .with_args(["-c", script])
            .with_timeout(Some(Duration::from_secs(10)))
    }

    #[tokio::test]
    async fn parses_successful_response() {
        let predictor = shell(
            r#"cat > /dev/null; echo '{"probability": 0.73, "risk_level": "HIGH", "top_drivers": ["PM2.5 Spike", "Dengue Detected"]}'"#,
        );

        let result = predictor.predict(&features()).await.unwrap();
        assert!((result.probability - 0.73).abs() < f64::EPSILON);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.top_drivers, vec!["PM2.5 Spike", "Dengue Detected"]);
    }

    #[tokio::test]
    async fn sends_features_in_column_order() {
        let capture = std::env::temp_dir().join(format!(
            "civic_risk_predictor_capture_{}.json",
            std::process::id()
        ));
        let _ = std::fs::remove_file(&capture);

        let predictor = SubprocessPredictor::new("sh")
            .with_args([
                "-c".to_string(),
                r#"cat > "$1"; echo '{"probability": 0.1, "risk_level": "low", "top_drivers": []}'"#
                    .to_string(),
                "sh".to_string(),
                capture.display().to_string(),
            ])
            .with_timeout(Some(Duration::from_secs(10)));

        let result = predictor.predict(&features()).await.unwrap();
        assert_eq!(result.risk_level, RiskLevel::Low);
        assert!(result.top_drivers.is_empty());

        let sent = std::fs::read_to_string(&capture).unwrap();
        let mut last = 0;
        for name in FeatureVector::FIELD_NAMES {
            let pos = sent.find(&format!("\"{name}\"")).unwrap();
            assert!(pos >= last, "{name} out of order in {sent}");
            last = pos;
        }
        assert_eq!(
            serde_json::from_str::<FeatureVector>(&sent).unwrap(),
            features()
        );

        let _ = std::fs::remove_file(&capture);
    }

    #[tokio::test]
    async fn nonzero_exit_carries_stderr() {
        let predictor = shell("echo boom >&2; exit 2");

        let err = predictor.predict(&features()).await.unwrap_err();
        match &err {
            PredictionError::Exit { code, stderr } => {
                assert_eq!(*code, Some(2));
                assert!(stderr.contains("boom"));
            }
            other => panic!("expected Exit, got {other:?}"),
        }
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn unparseable_output_is_malformed() {
        let predictor = shell("echo 'Traceback: not json'");

        let err = predictor.predict(&features()).await.unwrap_err();
        match err {
            PredictionError::MalformedOutput { raw, .. } => {
                assert!(raw.contains("Traceback: not json"));
            }
            other => panic!("expected MalformedOutput, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn explicit_error_field_is_upstream_failure() {
        let predictor = shell(r#"echo '{"error": "Failed to load artifacts"}'"#);

        let err = predictor.predict(&features()).await.unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Upstream { ref message } if message == "Failed to load artifacts"
        ));
    }

    #[tokio::test]
    async fn falsy_error_field_is_ignored() {
        for error in ["false", r#""""#, "0", "null"] {
            let predictor = shell(&format!(
                r#"echo '{{"error": {error}, "probability": 0.2, "risk_level": "LOW", "top_drivers": []}}'"#
            ));

            let result = predictor.predict(&features()).await.unwrap();
            assert_eq!(result.risk_level, RiskLevel::Low, "error = {error}");
            assert!((result.probability - 0.2).abs() < f64::EPSILON);
        }
    }

    #[tokio::test]
    async fn non_string_error_field_is_upstream_failure() {
        let predictor = shell(r#"echo '{"error": {"code": 7}}'"#);

        let err = predictor.predict(&features()).await.unwrap_err();
        assert!(matches!(
            err,
            PredictionError::Upstream { ref message } if message.contains(r#""code":7"#)
        ));
    }

    #[tokio::test]
    async fn out_of_range_probability_is_rejected() {
        let predictor = shell(
            r#"echo '{"probability": 1.5, "risk_level": "HIGH", "top_drivers": []}'"#,
        );

        let err = predictor.predict(&features()).await.unwrap_err();
        assert!(matches!(err, PredictionError::MalformedOutput { .. }));
    }

    #[tokio::test]
    async fn unknown_risk_label_is_rejected() {
        let predictor = shell(
            r#"echo '{"probability": 0.5, "risk_level": "SEVERE", "top_drivers": []}'"#,
        );

        let err = predictor.predict(&features()).await.unwrap_err();
        assert!(err.to_string().contains("SEVERE"));
    }

    #[tokio::test]
    async fn missing_program_is_spawn_failure() {
        let predictor = SubprocessPredictor::new("/nonexistent/civic-risk-predictor");

        let err = predictor.predict(&features()).await.unwrap_err();
        assert!(matches!(err, PredictionError::Spawn { .. }));
    }

    #[tokio::test]
    async fn slow_predictor_times_out() {
        let predictor =
            shell("sleep 30").with_timeout(Some(Duration::from_millis(200)));

        let started = std::time::Instant::now();
        let err = predictor.predict(&features()).await.unwrap_err();
        assert!(matches!(err, PredictionError::Timeout { .. }));
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
