// =============================================================================
// Error types
// =============================================================================
//
// Two layers:
//   - `ProviderError` is what an upstream adapter reports.
//   - `AnalysisError` is what the orchestrator reasons about. It never leaves
//     the orchestrator: every variant is converted into the fallback report.
//
// The numeric layer has no error type. Degenerate inputs there resolve to
// documented sentinel values (50 for oscillators, 0 for unscaled metrics,
// 1 for ratios).
// =============================================================================

use thiserror::Error;

/// Failure reported by an external collaborator (history, news, narrative).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The upstream does not know the requested asset.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("failed to decode upstream response: {0}")]
    Decode(String),

    /// A required credential or endpoint is missing.
    #[error("provider not configured: {0}")]
    NotConfigured(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Every way a single analysis run can fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("insufficient historical data: need {required} samples, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("invalid price series: {0}")]
    InvalidSeries(String),

    #[error("upstream fetch from {source_name} failed: {message}")]
    UpstreamFetch {
        source_name: &'static str,
        message: String,
    },

    #[error("narrative generation failed: {0}")]
    NarrativeGeneration(String),

    #[error("analysis deadline exceeded while {stage}")]
    DeadlineExceeded { stage: &'static str },
}

impl AnalysisError {
    pub fn upstream(source_name: &'static str, err: ProviderError) -> Self {
        Self::UpstreamFetch {
            source_name,
            message: err.to_string(),
        }
    }
}
