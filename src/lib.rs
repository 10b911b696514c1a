//! Live data core of the store back office dashboard.
//!
//! Polled widgets with last-known-good fallback, integration health
//! aggregation, cashier selection and role-gated navigation. The
//! `pos-dashboard` binary drives these against a live backend.

pub mod api;
pub mod cli_messages;
pub mod config;
pub mod consts;
pub mod dashboard;
pub mod environment;
pub mod error_classifier;
pub mod events;
pub mod logging;
pub mod models;
pub mod navigation;
pub mod polling;
pub mod report;
pub mod selection;
pub mod session;
pub mod status;
pub mod widgets;
