//! Fetch outcomes and the fetch operation seam

use crate::api::error::ApiError;
use crate::error_classifier::{ErrorClassifier, LogLevel};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;

/// Why a poll attempt failed.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, strum::Display)]
pub enum ErrorKind {
    /// Transport or connection level failure.
    NetworkFailure,
    /// Non-success HTTP status or a payload that violates the endpoint contract.
    ProtocolFailure,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchFailure {
    pub kind: ErrorKind,
    pub message: String,
    /// Activity-log level, classified from the underlying error where one exists.
    pub level: LogLevel,
}

impl FetchFailure {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            level: ErrorClassifier::new().classify_failure_kind(kind),
        }
    }

    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkFailure, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ProtocolFailure, message)
    }
}

impl Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl From<ApiError> for FetchFailure {
    fn from(error: ApiError) -> Self {
        let level = ErrorClassifier::new().classify_api_error(&error);
        Self::new(error.kind(), error.to_string()).with_level(level)
    }
}

/// Outcome of one poll attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum FetchResult<T> {
    #[serde(rename_all = "camelCase")]
    Success { value: T, observed_at: DateTime<Utc> },
    #[serde(rename_all = "camelCase")]
    Failure {
        reason: FetchFailure,
        observed_at: DateTime<Utc>,
    },
}

impl<T> FetchResult<T> {
    pub fn success(value: T, observed_at: DateTime<Utc>) -> Self {
        FetchResult::Success { value, observed_at }
    }

    pub fn failure(reason: FetchFailure, observed_at: DateTime<Utc>) -> Self {
        FetchResult::Failure {
            reason,
            observed_at,
        }
    }

    /// Stamp a raw fetch outcome with the current time
    pub fn observe(outcome: Result<T, FetchFailure>) -> Self {
        let now = Utc::now();
        match outcome {
            Ok(value) => Self::success(value, now),
            Err(reason) => Self::failure(reason, now),
        }
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        match self {
            FetchResult::Success { observed_at, .. } | FetchResult::Failure { observed_at, .. } => {
                *observed_at
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FetchResult::Success { .. })
    }

    pub fn failure_reason(&self) -> Option<&FetchFailure> {
        match self {
            FetchResult::Success { .. } => None,
            FetchResult::Failure { reason, .. } => Some(reason),
        }
    }
}

/// A poll operation. Must be idempotent and leave caller-side state untouched.
#[async_trait::async_trait]
pub trait Fetcher<T>: Send + Sync {
    async fn fetch(&self) -> Result<T, FetchFailure>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_observe_maps_outcomes() {
        let ok: FetchResult<u32> = FetchResult::observe(Ok(7));
        assert!(ok.is_success());
        assert!(ok.failure_reason().is_none());

        let err: FetchResult<u32> = FetchResult::observe(Err(FetchFailure::network("refused")));
        assert!(!err.is_success());
        assert_eq!(
            err.failure_reason().map(|r| r.kind),
            Some(ErrorKind::NetworkFailure)
        );
    }

    #[test]
    fn test_api_errors_keep_their_kind() {
        let failure = FetchFailure::from(ApiError::Http {
            status: 502,
            message: "bad gateway".to_string(),
        });
        assert_eq!(failure.kind, ErrorKind::ProtocolFailure);
        assert_eq!(failure.level, LogLevel::Warn);
        assert!(failure.message.contains("502"));

        let throttled = FetchFailure::from(ApiError::Http {
            status: 429,
            message: "slow down".to_string(),
        });
        assert_eq!(throttled.kind, ErrorKind::ProtocolFailure);
        assert_eq!(throttled.level, LogLevel::Debug);
    }

    #[test]
    fn test_result_serializes_with_outcome_tag() {
        let result: FetchResult<u32> =
            FetchResult::failure(FetchFailure::protocol("bad shape"), Utc::now());
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["outcome"], "failure");
        assert_eq!(json["reason"]["kind"], "ProtocolFailure");
        assert!(json.get("observedAt").is_some());
    }
}
