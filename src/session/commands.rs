//! Interactive commands for a running dashboard
//!
//! `watch` reads one command per line from stdin and applies it to the live
//! widgets: manual refresh, cashier selection, navigation and the metrics window.

use crate::dashboard::Dashboard;
use crate::models::DateRange;
use crate::navigation::NavigationAction;
use crate::polling::{DisplayState, PollingError};
use crate::report::{freshness, navigation_lines, snapshot_lines};
use crate::selection::SelectionAction;
use chrono::NaiveDate;
use std::io::BufRead;
use tokio::sync::mpsc;

#[derive(Debug, Copy, Clone, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum RefreshTarget {
    All,
    Status,
    Cashiers,
    Metrics,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchCommand {
    Refresh(RefreshTarget),
    Select(SelectionAction),
    Navigate(NavigationAction),
    Go(String),
    Range(DateRange),
    Nav,
    Snapshot,
    Help,
    Quit,
}

const HELP: &[&str] = &[
    "refresh [status|cashiers|metrics]  fetch now (alias: retry)",
    "toggle <cashier id>                 select or deselect a cashier",
    "select-all | clear                  select every cashier, or none",
    "section <id>                        expand or collapse a navigation section",
    "collapse                            toggle the iconified navigation",
    "go <path>                           move to another page",
    "range <start> <end>                 metrics window, YYYY-MM-DD",
    "nav | snapshot                      show the navigation, or every widget",
    "quit                                stop watching",
];

/// Parse one input line. Blank lines are `None`.
pub fn parse_command(line: &str) -> Result<Option<WatchCommand>, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let args: Vec<&str> = words.collect();

    let command = match (name.to_ascii_lowercase().as_str(), args.as_slice()) {
        ("refresh" | "retry", []) => WatchCommand::Refresh(RefreshTarget::All),
        ("refresh" | "retry", [target]) => WatchCommand::Refresh(match *target {
            "status" | "integrations" => RefreshTarget::Status,
            "cashiers" => RefreshTarget::Cashiers,
            "metrics" => RefreshTarget::Metrics,
            other => return Err(format!("Unknown widget: {}", other)),
        }),
        ("toggle", [id]) => WatchCommand::Select(SelectionAction::Toggle(id.to_string())),
        ("select-all", []) => WatchCommand::Select(SelectionAction::SelectAll),
        ("clear", []) => WatchCommand::Select(SelectionAction::Clear),
        ("section", [id]) => WatchCommand::Navigate(NavigationAction::ToggleSection(id.to_string())),
        ("collapse", []) => WatchCommand::Navigate(NavigationAction::ToggleCollapsed),
        ("go", [path]) => WatchCommand::Go(path.to_string()),
        ("range", [start, end]) => {
            let start = parse_date(start)?;
            let end = parse_date(end)?;
            WatchCommand::Range(DateRange::new(start, end).map_err(|e| e.to_string())?)
        }
        ("nav", []) => WatchCommand::Nav,
        ("snapshot", []) => WatchCommand::Snapshot,
        ("help" | "?", []) => WatchCommand::Help,
        ("quit" | "exit", []) => WatchCommand::Quit,
        (other, _) => {
            return Err(format!(
                "Unknown command or wrong arguments: {} (type `help`)",
                other
            ));
        }
    };
    Ok(Some(command))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    raw.parse::<NaiveDate>()
        .map_err(|e| format!("Invalid date {}: {}", raw, e))
}

/// Apply a command and return what to print.
pub async fn execute(dashboard: &mut Dashboard, command: WatchCommand) -> Vec<String> {
    match command {
        WatchCommand::Refresh(RefreshTarget::All) => {
            let (status, cashiers, metrics) = tokio::join!(
                dashboard.integrations.refresh(),
                dashboard.cashiers.refresh(),
                dashboard.metrics.refresh(),
            );
            vec![
                refreshed(RefreshTarget::Status, status),
                refreshed(RefreshTarget::Cashiers, cashiers),
                refreshed(RefreshTarget::Metrics, metrics),
            ]
        }
        WatchCommand::Refresh(RefreshTarget::Status) => {
            vec![refreshed(RefreshTarget::Status, dashboard.integrations.refresh().await)]
        }
        WatchCommand::Refresh(RefreshTarget::Cashiers) => {
            vec![refreshed(RefreshTarget::Cashiers, dashboard.cashiers.refresh().await)]
        }
        WatchCommand::Refresh(RefreshTarget::Metrics) => {
            vec![refreshed(RefreshTarget::Metrics, dashboard.metrics.refresh().await)]
        }
        WatchCommand::Select(action) => {
            dashboard.cashiers.reduce(action);
            let selected: Vec<String> = dashboard
                .cashiers
                .selected()
                .into_iter()
                .map(|cashier| cashier.id)
                .collect();
            let mut line = if selected.is_empty() {
                "Selected: none".to_string()
            } else {
                format!("Selected: {}", selected.join(", "))
            };
            if dashboard.cashiers.is_all_selected() {
                line.push_str(" (all)");
            }
            vec![line]
        }
        WatchCommand::Navigate(action) => {
            dashboard.dispatch(action);
            navigation_lines(&dashboard.navigation())
        }
        WatchCommand::Go(path) => {
            dashboard.navigate(path);
            navigation_lines(&dashboard.navigation())
        }
        WatchCommand::Range(range) => {
            let result = dashboard.metrics.set_range(range).await;
            vec![format!("Range {}", range), refreshed(RefreshTarget::Metrics, result)]
        }
        WatchCommand::Nav => navigation_lines(&dashboard.navigation()),
        WatchCommand::Snapshot => snapshot_lines(&dashboard.snapshot().await),
        WatchCommand::Help => HELP.iter().map(|line| line.to_string()).collect(),
        WatchCommand::Quit => Vec::new(),
    }
}

fn refreshed<T>(target: RefreshTarget, result: Result<DisplayState<T>, PollingError>) -> String {
    match result {
        Ok(display) if display.needs_retry() => format!(
            "{}: still unavailable ({}), try `refresh {}` again",
            target,
            display
                .error
                .as_ref()
                .map(|error| error.kind.to_string())
                .unwrap_or_default(),
            target
        ),
        Ok(display) => format!("{}: {}", target, freshness(&display)),
        Err(e) => format!("{}: {}", target, e),
    }
}

/// Forward stdin lines onto a channel. The channel closes at end of input.
///
/// Reading happens on a plain thread: a blocked stdin read must not hold up
/// runtime shutdown.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (sender, receiver) = mpsc::channel(16);
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            let Ok(line) = line else {
                break;
            };
            if sender.blocking_send(line).is_err() {
                break;
            }
        }
    });
    receiver
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockDashboardApi;
    use crate::api::error::ApiError;
    use crate::config::PollSettings;
    use crate::dashboard::DashboardSettings;
    use crate::navigation::{Role, catalog};
    use crate::status::{ConnectionState, SubStatus};
    use crate::widgets::test_support::roster;
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dashboard() -> Dashboard {
        let mut api = MockDashboardApi::new();
        api.expect_base_url().return_const("http://test".to_string());
        api.expect_integration_status().returning(|| {
            Ok(vec![SubStatus::new("payments", ConnectionState::Connected)])
        });
        api.expect_list_cashiers()
            .returning(|| Ok(roster(&["A", "B"])));
        api.expect_kpi_report().returning(|_| {
            Err(ApiError::Http {
                status: 503,
                message: "warming up".to_string(),
            })
        });
        Dashboard::start(
            Arc::new(api),
            DashboardSettings {
                role: Some(Role::Manager),
                polling: PollSettings {
                    status_secs: 0,
                    cashiers_secs: 0,
                    metrics_secs: 0,
                },
                metrics_range: DateRange::default_window(date(2024, 6, 30)),
                sections: catalog::default_sections(),
                location: "/".to_string(),
            },
            None,
        )
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("   "), Ok(None));
        assert_eq!(
            parse_command("retry metrics"),
            Ok(Some(WatchCommand::Refresh(RefreshTarget::Metrics)))
        );
        assert_eq!(
            parse_command("toggle c-17"),
            Ok(Some(WatchCommand::Select(SelectionAction::Toggle(
                "c-17".to_string()
            ))))
        );
        assert_eq!(
            parse_command("range 2024-05-01 2024-05-31"),
            Ok(Some(WatchCommand::Range(
                DateRange::new(date(2024, 5, 1), date(2024, 5, 31)).unwrap()
            )))
        );
        assert_eq!(parse_command("QUIT"), Ok(Some(WatchCommand::Quit)));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(parse_command("refresh weather").is_err());
        assert!(parse_command("toggle").is_err());
        assert!(parse_command("range 2024-06-01 2024-05-01").is_err());
        assert!(parse_command("range yesterday today").is_err());
        assert!(parse_command("dance").is_err());
    }

    #[tokio::test]
    async fn test_selection_commands_follow_the_roster() {
        let mut dashboard = dashboard();
        dashboard.cashiers.handle().loaded().await.unwrap();

        let lines = execute(&mut dashboard, parse_command("toggle A").unwrap().unwrap()).await;
        assert_eq!(lines, vec!["Selected: A".to_string()]);

        let lines = execute(&mut dashboard, WatchCommand::Select(SelectionAction::SelectAll)).await;
        assert_eq!(lines, vec!["Selected: A, B (all)".to_string()]);

        let lines = execute(&mut dashboard, WatchCommand::Select(SelectionAction::Clear)).await;
        assert_eq!(lines, vec!["Selected: none".to_string()]);
        dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_failed_first_load_offers_retry() {
        let mut dashboard = dashboard();
        dashboard.metrics.handle().loaded().await.unwrap();

        let lines = execute(&mut dashboard, WatchCommand::Refresh(RefreshTarget::Metrics)).await;
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("metrics: still unavailable"));
        assert!(lines[0].contains("try `refresh metrics` again"));

        let lines = execute(&mut dashboard, WatchCommand::Refresh(RefreshTarget::Status)).await;
        assert!(lines[0].starts_with("status: updated"));
        dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_navigation_commands() {
        let mut dashboard = dashboard();

        let lines = execute(&mut dashboard, parse_command("section sales").unwrap().unwrap()).await;
        assert!(lines.contains(&"> Sales".to_string()));

        let lines = execute(&mut dashboard, WatchCommand::Go("/stock".to_string())).await;
        assert!(lines.iter().any(|line| line.contains("* Stock lookup")));

        let lines = execute(&mut dashboard, WatchCommand::Navigate(NavigationAction::ToggleCollapsed)).await;
        assert!(lines.contains(&"v Sales".to_string()));
        dashboard.shutdown().await;
    }

    #[tokio::test]
    async fn test_range_command_moves_the_metrics_window() {
        let mut dashboard = dashboard();
        let range = DateRange::new(date(2024, 5, 1), date(2024, 5, 7)).unwrap();

        let lines = execute(&mut dashboard, WatchCommand::Range(range)).await;
        assert_eq!(lines[0], "Range 2024-05-01 .. 2024-05-07");
        assert_eq!(dashboard.metrics.range().await, range);
        dashboard.shutdown().await;
    }
}
