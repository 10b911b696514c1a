//! Event System
//!
//! Activity-log events emitted by the polling widgets and the session

use crate::logging::{LogLevel, should_log_with_env};
use chrono::Local;
use serde::Serialize;
use std::fmt::Display;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, strum::Display)]
pub enum Source {
    /// Integration health panel.
    IntegrationStatus,
    /// Cashier roster panel.
    Cashiers,
    /// KPI metrics panel.
    Metrics,
    /// Session lifecycle (startup, shutdown).
    Session,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, strum::Display)]
pub enum EventType {
    Success,
    Error,
    StateChange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub source: Source,
    pub msg: String,
    pub timestamp: String,
    pub event_type: EventType,
    pub log_level: LogLevel,
}

impl Event {
    pub fn new(source: Source, msg: String, event_type: EventType, log_level: LogLevel) -> Self {
        Self {
            source,
            msg,
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            event_type,
            log_level,
        }
    }

    pub fn session(msg: String) -> Self {
        Self::new(Source::Session, msg, EventType::StateChange, LogLevel::Info)
    }

    pub fn should_display(&self) -> bool {
        // Always show success events and info level events
        if self.event_type == EventType::Success || self.log_level >= LogLevel::Info {
            return true;
        }
        should_log_with_env(self.log_level)
    }
}

impl Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.event_type, self.timestamp, self.source, self.msg
        )
    }
}

/// Common event sending utilities for widgets
#[derive(Clone, Debug)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Channel pair sized for the activity log
    pub fn channel() -> (Self, mpsc::Receiver<Event>) {
        let (sender, receiver) =
            mpsc::channel(crate::consts::cli_consts::EVENT_QUEUE_SIZE);
        (Self::new(sender), receiver)
    }

    pub async fn send_event(&self, event: Event) {
        crate::logging::forward_to_log(&event);
        let _ = self.sender.send(event).await;
    }

    pub async fn send(
        &self,
        source: Source,
        message: String,
        event_type: EventType,
        log_level: LogLevel,
    ) {
        self.send_event(Event::new(source, message, event_type, log_level))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_events_display_at_warn() {
        let event = Event::new(
            Source::Cashiers,
            "Fetch failed".to_string(),
            EventType::Error,
            LogLevel::Warn,
        );
        assert!(event.should_display());
        assert!(event.to_string().contains("Cashiers: Fetch failed"));
    }

    #[tokio::test]
    async fn test_sender_preserves_order() {
        let (sender, mut receiver) = EventSender::channel();
        for i in 0..3 {
            sender
                .send(
                    Source::Metrics,
                    format!("event {}", i),
                    EventType::StateChange,
                    LogLevel::Debug,
                )
                .await;
        }
        for i in 0..3 {
            let event = receiver.recv().await.unwrap();
            assert_eq!(event.msg, format!("event {}", i));
        }
    }
}
