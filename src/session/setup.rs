//! Session setup and initialization

use crate::api::ApiClient;
use crate::config::Config;
use crate::dashboard::{Dashboard, DashboardSettings};
use crate::events::{Event, EventSender};
use crate::navigation::Role;
use std::error::Error;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

/// Session data for headless mode
pub struct SessionData {
    /// Activity events from every widget
    pub event_receiver: mpsc::Receiver<Event>,
    /// Running widgets
    pub dashboard: Dashboard,
    /// Shutdown sender to stop the session
    pub shutdown_sender: broadcast::Sender<()>,
    /// Backend the widgets poll
    pub api_url: String,
    /// Viewer role the navigation is filtered for
    pub role: Option<Role>,
}

/// Sets up a dashboard session
///
/// 1. Creates the api client for `api_url`
/// 2. Resolves widget settings from the config (navigation file included)
/// 3. Starts every widget reporting to one activity channel
///
/// # Errors
/// Fails when the HTTP client cannot be built or the navigation file cannot be loaded.
pub async fn setup_session(
    config: Config,
    api_url: String,
) -> Result<SessionData, Box<dyn Error>> {
    let api = ApiClient::new(api_url.clone())?;
    let settings = DashboardSettings::from_config(&config)?;
    let role = settings.role;

    let (events, event_receiver) = EventSender::channel();
    events
        .send_event(Event::session(format!("Connecting to {}", api_url)))
        .await;

    let dashboard = Dashboard::start(Arc::new(api), settings, Some(events));

    // Create shutdown channel - only one shutdown signal needed
    let (shutdown_sender, _) = broadcast::channel(1);

    Ok(SessionData {
        event_receiver,
        dashboard,
        shutdown_sender,
        api_url,
        role,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[tokio::test]
    async fn test_missing_navigation_file_fails_setup() {
        let config = Config {
            navigation_file: Some(PathBuf::from("/definitely/not/here/nav.json")),
            ..Config::default()
        };
        let result = setup_session(config, "http://127.0.0.1:9".to_string()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_session_announces_itself_first() {
        let config = Config {
            role: Some(Role::Admin),
            ..Config::default()
        };
        let mut session = setup_session(config, "http://127.0.0.1:9".to_string())
            .await
            .unwrap();

        let first = session.event_receiver.recv().await.unwrap();
        assert!(first.msg.contains("127.0.0.1:9"));
        assert_eq!(session.role, Some(Role::Admin));
        session.dashboard.shutdown().await;
    }
}
