use crate::api::error::ApiError;
use crate::polling::ErrorKind;
use log::LevelFilter;
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::Trace,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Error => LevelFilter::Error,
        }
    }
}

impl From<LogLevel> for log::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => log::Level::Trace,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Error => log::Level::Error,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ErrorClassifier;

impl ErrorClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify_api_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Non-critical: Temporary server issues
            ApiError::Http { status, .. } if *status == 429 => LogLevel::Debug,
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // Critical: Auth, malformed responses
            ApiError::Http { status, .. } if *status == 401 => LogLevel::Error,
            ApiError::Http { status, .. } if *status == 403 => LogLevel::Error,
            ApiError::Decode(_) | ApiError::Shape(_) => LogLevel::Error,

            // Network issues - usually temporary
            _ => LogLevel::Warn,
        }
    }

    /// Level for a failure once it has been reduced to its kind at the polling boundary
    pub fn classify_failure_kind(&self, kind: ErrorKind) -> LogLevel {
        match kind {
            ErrorKind::NetworkFailure => LogLevel::Warn,
            ErrorKind::ProtocolFailure => LogLevel::Error,
        }
    }
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> ApiError {
        ApiError::Http {
            status,
            message: String::new(),
        }
    }

    #[test]
    fn test_classify_http_statuses() {
        let classifier = ErrorClassifier::new();
        assert_eq!(classifier.classify_api_error(&http(429)), LogLevel::Debug);
        assert_eq!(classifier.classify_api_error(&http(503)), LogLevel::Warn);
        assert_eq!(classifier.classify_api_error(&http(401)), LogLevel::Error);
        assert_eq!(classifier.classify_api_error(&http(403)), LogLevel::Error);
        assert_eq!(classifier.classify_api_error(&http(404)), LogLevel::Warn);
    }

    #[test]
    fn test_malformed_payloads_are_critical() {
        let classifier = ErrorClassifier::new();
        let shape = ApiError::Shape("expected an array".to_string());
        assert_eq!(classifier.classify_api_error(&shape), LogLevel::Error);
        assert_eq!(
            classifier.classify_failure_kind(ErrorKind::ProtocolFailure),
            LogLevel::Error
        );
        assert_eq!(
            classifier.classify_failure_kind(ErrorKind::NetworkFailure),
            LogLevel::Warn
        );
    }
}
