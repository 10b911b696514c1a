//! Last-known-good display state
//!
//! Folds each fetch result into what a widget shows. A failure never erases a
//! value that an earlier success delivered; it only annotates it.

use super::fetch::{FetchFailure, FetchResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayState<T> {
    pub value: T,
    /// Error of the most recent fetch, if it failed.
    pub error: Option<FetchFailure>,
    /// Time of the success that produced `value`; `None` until one arrives.
    pub last_updated: Option<DateTime<Utc>>,
}

impl<T> DisplayState<T> {
    /// At least one success has been observed.
    pub fn has_data(&self) -> bool {
        self.last_updated.is_some()
    }

    /// Previously good data shown alongside a current error.
    pub fn is_stale(&self) -> bool {
        self.has_data() && self.error.is_some()
    }

    /// First load failed: nothing valid to show, offer a manual retry.
    pub fn needs_retry(&self) -> bool {
        !self.has_data() && self.error.is_some()
    }
}

impl<I> DisplayState<Vec<I>> {
    /// A successful response that carried zero items. Not an error.
    pub fn is_empty_result(&self) -> bool {
        self.has_data() && self.value.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct FallbackPolicy<T> {
    fallback: T,
}

impl<T: Clone> FallbackPolicy<T> {
    /// `fallback` is what the widget shows before its first success.
    pub fn new(fallback: T) -> Self {
        Self { fallback }
    }

    pub fn initial(&self) -> DisplayState<T> {
        DisplayState {
            value: self.fallback.clone(),
            error: None,
            last_updated: None,
        }
    }

    pub fn apply(&self, previous: &DisplayState<T>, result: &FetchResult<T>) -> DisplayState<T> {
        match result {
            FetchResult::Success { value, observed_at } => DisplayState {
                value: value.clone(),
                error: None,
                last_updated: Some(*observed_at),
            },
            FetchResult::Failure { reason, .. } => match previous.last_updated {
                Some(last_updated) => DisplayState {
                    value: previous.value.clone(),
                    error: Some(reason.clone()),
                    last_updated: Some(last_updated),
                },
                None => DisplayState {
                    value: self.fallback.clone(),
                    error: Some(reason.clone()),
                    last_updated: None,
                },
            },
        }
    }
}

impl<T: Clone + Default> Default for FallbackPolicy<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polling::fetch::ErrorKind;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn ok(value: &str, secs: i64) -> FetchResult<String> {
        FetchResult::success(value.to_string(), at(secs))
    }

    fn network_down(secs: i64) -> FetchResult<String> {
        FetchResult::failure(FetchFailure::network("connection refused"), at(secs))
    }

    #[test]
    fn test_success_replaces_value_and_clears_error() {
        let policy = FallbackPolicy::new("--".to_string());
        let failed = policy.apply(&policy.initial(), &network_down(0));
        let next = policy.apply(&failed, &ok("A", 5));

        assert_eq!(next.value, "A");
        assert_eq!(next.error, None);
        assert_eq!(next.last_updated, Some(at(5)));
    }

    #[test]
    fn test_failure_keeps_last_known_good() {
        let policy = FallbackPolicy::new("--".to_string());
        let ready = policy.apply(&policy.initial(), &ok("A", 0));
        let stale = policy.apply(&ready, &network_down(30));

        assert_eq!(stale.value, "A");
        assert_eq!(
            stale.error.as_ref().map(|e| e.kind),
            Some(ErrorKind::NetworkFailure)
        );
        assert_eq!(stale.last_updated, Some(at(0)));
        assert!(stale.is_stale());
        assert!(!stale.needs_retry());
    }

    #[test]
    fn test_first_load_failure_uses_fallback() {
        let policy = FallbackPolicy::new("--".to_string());
        let state = policy.apply(&policy.initial(), &network_down(0));

        assert_eq!(state.value, "--");
        assert_eq!(state.last_updated, None);
        assert!(state.needs_retry());
    }

    #[test]
    fn test_value_is_always_fallback_or_a_delivered_success() {
        // Walk every sequence of length 6 over {success, failure}
        let policy = FallbackPolicy::new("initial".to_string());
        for mask in 0u32..(1 << 6) {
            let mut state = policy.initial();
            let mut delivered = vec!["initial".to_string()];
            let mut seen_success = false;
            for step in 0..6 {
                let result = if mask & (1 << step) != 0 {
                    let value = format!("v{}", step);
                    delivered.push(value.clone());
                    seen_success = true;
                    ok(&value, step as i64)
                } else {
                    network_down(step as i64)
                };
                state = policy.apply(&state, &result);
                assert!(delivered.contains(&state.value));
                assert_eq!(state.has_data(), seen_success);
                if seen_success {
                    assert_ne!(state.value, "initial");
                }
            }
        }
    }

    #[test]
    fn test_empty_collection_is_not_an_error() {
        let policy: FallbackPolicy<Vec<u8>> = FallbackPolicy::default();
        assert!(!policy.initial().is_empty_result());

        let state = policy.apply(&policy.initial(), &FetchResult::success(Vec::new(), at(0)));
        assert!(state.is_empty_result());
        assert_eq!(state.error, None);
    }
}
