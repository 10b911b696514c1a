//! Headless mode execution

use super::{
    SessionData,
    commands::{WatchCommand, execute, parse_command, spawn_stdin_reader},
    messages::{print_session_exit_success, print_session_shutdown, print_session_starting},
};
use crate::report::snapshot_lines;
use std::error::Error;
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};

#[derive(Debug, Clone, Copy)]
pub struct HeadlessOptions {
    /// How often to print a dashboard snapshot; zero prints none.
    pub snapshot_interval: Duration,
    /// Print events and snapshots as JSON lines.
    pub json: bool,
}

/// Runs the dashboard in headless mode
///
/// This function handles:
/// 1. Console event logging
/// 2. Periodic snapshots
/// 3. Commands read from stdin, until `quit` or end of input
/// 4. Ctrl+C shutdown handling, tearing down every poller
pub async fn run_headless_mode(
    mut session: SessionData,
    options: HeadlessOptions,
) -> Result<(), Box<dyn Error>> {
    if !options.json {
        print_session_starting(&session.api_url, session.role);
    }

    // Trigger shutdown on Ctrl+C
    let shutdown_sender_clone = session.shutdown_sender.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_sender_clone.send(());
        }
    });

    let mut shutdown_receiver = session.shutdown_sender.subscribe();
    let snapshots_enabled = !options.snapshot_interval.is_zero();
    let mut snapshot_timer = interval(if snapshots_enabled {
        options.snapshot_interval
    } else {
        Duration::from_secs(3600)
    });
    snapshot_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick fires at once; widgets have nothing to show yet
    snapshot_timer.tick().await;

    let mut stdin_lines = spawn_stdin_reader();
    let mut stdin_open = true;

    // Event loop: log events to console until shutdown
    loop {
        tokio::select! {
            Some(event) = session.event_receiver.recv() => {
                if !event.should_display() {
                    continue;
                }
                if options.json {
                    println!("{}", serde_json::to_string(&event)?);
                } else {
                    println!("{}", event);
                }
            }
            _ = snapshot_timer.tick(), if snapshots_enabled => {
                let snapshot = session.dashboard.snapshot().await;
                if options.json {
                    println!("{}", serde_json::to_string(&snapshot)?);
                } else {
                    for line in snapshot_lines(&snapshot) {
                        println!("{}", line);
                    }
                }
            }
            line = stdin_lines.recv(), if stdin_open => {
                let Some(line) = line else {
                    // End of input: keep polling until Ctrl+C
                    stdin_open = false;
                    continue;
                };
                let output = match parse_command(&line) {
                    Ok(None) => continue,
                    Ok(Some(WatchCommand::Quit)) => break,
                    Ok(Some(command)) => execute(&mut session.dashboard, command).await,
                    Err(message) => vec![message],
                };
                if options.json {
                    println!(
                        "{}",
                        serde_json::json!({ "command": line.trim(), "output": output })
                    );
                } else {
                    for line in output {
                        println!("{}", line);
                    }
                }
            }
            _ = shutdown_receiver.recv() => {
                break;
            }
        }
    }

    if !options.json {
        print_session_shutdown();
    }
    session.dashboard.shutdown().await;
    if !options.json {
        print_session_exit_success();
    }

    Ok(())
}
