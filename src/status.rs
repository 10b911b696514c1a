//! Integration health and its aggregate.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Health of one integration, ordered by severity.
#[derive(
    Debug,
    Copy,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ConnectionState {
    Connected,
    Warning,
    Error,
}

/// Raw `status` values accepted from the status endpoint.
const STATUS_NAMES: [(&str, ConnectionState); 3] = [
    ("connected", ConnectionState::Connected),
    ("warning", ConnectionState::Warning),
    ("error", ConnectionState::Error),
];

impl ConnectionState {
    /// Map a raw `status` field. Missing or unrecognised values count as errors.
    pub fn from_status_field(raw: Option<&str>) -> Self {
        raw.and_then(|raw| {
            STATUS_NAMES
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(raw.trim()))
        })
        .map(|(_, state)| *state)
        .unwrap_or(ConnectionState::Error)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubStatus {
    pub name: String,
    pub state: ConnectionState,
    #[serde(default)]
    pub detail: BTreeMap<String, String>,
}

impl SubStatus {
    pub fn new(name: impl Into<String>, state: ConnectionState) -> Self {
        Self {
            name: name.into(),
            state,
            detail: BTreeMap::new(),
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.detail.insert(key.into(), value.into());
        self
    }

    /// Placeholder for a source whose first result has not arrived.
    pub fn loading(name: impl Into<String>) -> Self {
        Self::new(name, ConnectionState::Warning).with_detail("message", "loading")
    }
}

/// Worst state present; `Warning` when there is nothing to judge yet.
pub fn aggregate(sub_statuses: &[SubStatus]) -> ConnectionState {
    sub_statuses
        .iter()
        .map(|status| status.state)
        .max()
        .unwrap_or(ConnectionState::Warning)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    pub overall: ConnectionState,
    pub connected: usize,
    pub warning: usize,
    pub error: usize,
}

pub fn summarize(sub_statuses: &[SubStatus]) -> StatusSummary {
    let count = |state| sub_statuses.iter().filter(|s| s.state == state).count();
    StatusSummary {
        overall: aggregate(sub_statuses),
        connected: count(ConnectionState::Connected),
        warning: count(ConnectionState::Warning),
        error: count(ConnectionState::Error),
    }
}
