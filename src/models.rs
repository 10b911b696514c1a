//! Domain records delivered by the back office api.

use crate::consts::cli_consts::DEFAULT_METRICS_WINDOW_DAYS;
use crate::selection::Selectable;
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShiftState {
    OnShift,
    OnBreak,
    OffShift,
    #[default]
    Unknown,
}

const SHIFT_NAMES: [(&str, ShiftState); 6] = [
    ("on_shift", ShiftState::OnShift),
    ("active", ShiftState::OnShift),
    ("on_break", ShiftState::OnBreak),
    ("break", ShiftState::OnBreak),
    ("off_shift", ShiftState::OffShift),
    ("inactive", ShiftState::OffShift),
];

impl ShiftState {
    pub fn from_raw(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        SHIFT_NAMES
            .iter()
            .find(|(name, _)| *name == normalized)
            .map(|(_, state)| *state)
            .unwrap_or(ShiftState::Unknown)
    }
}

impl<'de> Deserialize<'de> for ShiftState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(ShiftState::from_raw).unwrap_or_default())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cashier {
    #[serde(alias = "_id", deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "status")]
    pub shift: ShiftState,
    /// Whatever else the backend sent, kept for display.
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Selectable for Cashier {
    fn identity(&self) -> &str {
        &self.id
    }
}

fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number id, got {}",
            other
        ))),
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("start date {start} is after end date {end}")]
    Inverted { start: NaiveDate, end: NaiveDate },
}

/// Inclusive reporting window sent to the metrics endpoint.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    start_date: NaiveDate,
    end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Result<Self, DateRangeError> {
        if start_date > end_date {
            return Err(DateRangeError::Inverted {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
        })
    }

    /// The `days` days ending on `end_date`, both ends included.
    pub fn trailing_days(end_date: NaiveDate, days: i64) -> Self {
        let start_date = end_date - Duration::days(days.max(1) - 1);
        Self {
            start_date,
            end_date,
        }
    }

    pub fn default_window(today: NaiveDate) -> Self {
        Self::trailing_days(today, DEFAULT_METRICS_WINDOW_DAYS)
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end_date
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} .. {}", self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub name: String,
    pub value: f64,
    /// Period-over-period delta in percent, when the backend reports one.
    pub change_pct: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KpiReport {
    /// Window the figures cover; set by whoever requested them.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
    pub kpis: Vec<Kpi>,
}

impl KpiReport {
    pub fn get(&self, name: &str) -> Option<&Kpi> {
        self.kpis.iter().find(|kpi| kpi.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.kpis.is_empty()
    }
}
