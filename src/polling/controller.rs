//! Polling Controller
//!
//! Owns the fetch-on-interval lifecycle of one data source:
//! - fetches immediately on activation, then every `interval` measured from fetch start
//! - coalesces manual refreshes into the fetch already in flight
//! - discards anything that resolves after deactivation
//!
//! Each controller runs as one tokio task. The task is the only writer of the
//! widget state; readers observe it through a watch channel.

use super::fallback::{DisplayState, FallbackPolicy};
use super::fetch::{FetchFailure, FetchResult, Fetcher};
use crate::consts::cli_consts::polling::{REFRESH_QUEUE_SIZE, RESULT_CHANNEL_CAPACITY};
use crate::events::{EventSender, EventType, Source};
use crate::logging::LogLevel;
use futures::FutureExt;
use log::{debug, warn};
use serde::Serialize;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;

/// An endpoint plus its polling cadence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub source: Source,
    pub endpoint: String,
    /// Zero disables periodic refresh; manual refresh still works.
    pub interval: Duration,
}

impl DataSource {
    pub fn new(source: Source, endpoint: impl Into<String>, interval: Duration) -> Self {
        Self {
            source,
            endpoint: endpoint.into(),
            interval,
        }
    }

    pub fn is_periodic(&self) -> bool {
        !self.interval.is_zero()
    }
}

/// Widget lifecycle
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, strum::Display)]
pub enum WidgetPhase {
    Inactive,
    /// First fetch in flight, nothing to show yet.
    Loading,
    /// Has a display state, no fetch in flight.
    Ready,
    /// Background fetch in flight, previous display state still shown.
    Refreshing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WidgetState<T> {
    pub phase: WidgetPhase,
    pub display: DisplayState<T>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PollingError {
    #[error("data source {0} is no longer active")]
    Deactivated(String),
}

type Responder<T> = oneshot::Sender<DisplayState<T>>;

/// Generic poller reused by every widget.
pub struct PollingController<T> {
    source: DataSource,
    fetcher: Arc<dyn Fetcher<T>>,
    policy: FallbackPolicy<T>,
    events: Option<EventSender>,
}

impl<T> PollingController<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(source: DataSource, fetcher: Arc<dyn Fetcher<T>>, policy: FallbackPolicy<T>) -> Self {
        Self {
            source,
            fetcher,
            policy,
            events: None,
        }
    }

    /// Report every applied result on the shared activity log.
    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    /// Spawn the polling task. The first fetch starts without waiting for a tick.
    ///
    /// Must be called from within a tokio runtime.
    pub fn activate(self) -> PollingHandle<T> {
        let (state_tx, state_rx) = watch::channel(WidgetState {
            phase: WidgetPhase::Loading,
            display: self.policy.initial(),
        });
        let state_tx = Arc::new(state_tx);
        let (results_tx, _) = broadcast::channel(RESULT_CHANNEL_CAPACITY);
        let (refresh_tx, refresh_rx) = mpsc::channel(REFRESH_QUEUE_SIZE);
        let token = CancellationToken::new();

        debug!(
            "Activating {} poller for {} every {:?}",
            self.source.source, self.source.endpoint, self.source.interval
        );

        let task = PollTask {
            source: self.source.clone(),
            fetcher: self.fetcher,
            policy: self.policy,
            events: self.events,
            state: Arc::clone(&state_tx),
            results: results_tx.clone(),
            refresh_rx,
            token: token.clone(),
        };
        let join = tokio::spawn(task.run());

        PollingHandle {
            source: self.source,
            state_tx,
            state_rx,
            results_tx,
            refresh_tx,
            token,
            join: Some(join),
        }
    }
}

/// Widget-side handle to a running poller. Dropping it deactivates the poller.
pub struct PollingHandle<T> {
    source: DataSource,
    state_tx: Arc<watch::Sender<WidgetState<T>>>,
    state_rx: watch::Receiver<WidgetState<T>>,
    results_tx: broadcast::Sender<FetchResult<T>>,
    refresh_tx: mpsc::Sender<Responder<T>>,
    token: CancellationToken,
    join: Option<JoinHandle<()>>,
}

impl<T: Clone> PollingHandle<T> {
    pub fn state(&self) -> WidgetState<T> {
        self.state_rx.borrow().clone()
    }

    pub fn display(&self) -> DisplayState<T> {
        self.state_rx.borrow().display.clone()
    }

    pub fn phase(&self) -> WidgetPhase {
        self.state_rx.borrow().phase
    }

    /// Receiver that wakes on every state change.
    pub fn watch(&self) -> watch::Receiver<WidgetState<T>> {
        self.state_rx.clone()
    }

    /// Ordered stream of applied fetch results from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<FetchResult<T>> {
        self.results_tx.subscribe()
    }

    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Request a fetch now. Joins the in-flight fetch if there is one and resolves
    /// with the display state that fetch produced.
    pub async fn refresh(&self) -> Result<DisplayState<T>, PollingError> {
        if !self.is_active() {
            return Err(self.deactivated());
        }
        let (responder, response) = oneshot::channel();
        self.refresh_tx
            .send(responder)
            .await
            .map_err(|_| self.deactivated())?;
        response.await.map_err(|_| self.deactivated())
    }

    /// Wait until the first fetch has been applied and return what it produced.
    pub async fn loaded(&self) -> Result<DisplayState<T>, PollingError> {
        let mut state_rx = self.state_rx.clone();
        let state = state_rx
            .wait_for(|state| state.phase != WidgetPhase::Loading)
            .await
            .map_err(|_| self.deactivated())?;
        if state.phase == WidgetPhase::Inactive {
            return Err(self.deactivated());
        }
        Ok(state.display.clone())
    }

    /// Stop polling. Effective immediately: no later result reaches the state.
    pub fn deactivate(&self) {
        deactivate(&self.token, &self.state_tx);
    }

    /// Deactivate and wait for the polling task to exit.
    pub async fn shutdown(mut self) {
        self.deactivate();
        if let Some(join) = self.join.take() {
            let _ = join.await;
        }
    }

    fn deactivated(&self) -> PollingError {
        PollingError::Deactivated(self.source.endpoint.clone())
    }
}

impl<T> Drop for PollingHandle<T> {
    fn drop(&mut self) {
        deactivate(&self.token, &self.state_tx);
    }
}

fn deactivate<T>(token: &CancellationToken, state: &watch::Sender<WidgetState<T>>) {
    token.cancel();
    // The phase flip shares the watch lock with result application, so a
    // result is either applied before this point or not at all.
    state.send_if_modified(|current| {
        if current.phase == WidgetPhase::Inactive {
            return false;
        }
        current.phase = WidgetPhase::Inactive;
        true
    });
}

struct PollTask<T> {
    source: DataSource,
    fetcher: Arc<dyn Fetcher<T>>,
    policy: FallbackPolicy<T>,
    events: Option<EventSender>,
    state: Arc<watch::Sender<WidgetState<T>>>,
    results: broadcast::Sender<FetchResult<T>>,
    refresh_rx: mpsc::Receiver<Responder<T>>,
    token: CancellationToken,
}

impl<T> PollTask<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn run(mut self) {
        let mut waiters: Vec<Responder<T>> = Vec::new();

        loop {
            let started = Instant::now();
            self.mark_in_flight();

            // Refresh requests arriving now join this fetch instead of starting another.
            // Deactivation does not abort the request; its result is dropped in `apply`.
            let outcome = {
                let fetch = AssertUnwindSafe(self.fetcher.fetch()).catch_unwind();
                tokio::pin!(fetch);
                loop {
                    tokio::select! {
                        outcome = &mut fetch => break outcome,
                        Some(waiter) = self.refresh_rx.recv() => waiters.push(waiter),
                    }
                }
            };
            // Requests queued in the same instant the fetch resolved still join it
            while let Ok(waiter) = self.refresh_rx.try_recv() {
                waiters.push(waiter);
            }
            let outcome = outcome.unwrap_or_else(|_| {
                Err(FetchFailure::protocol(format!(
                    "fetch for {} panicked",
                    self.source.endpoint
                )))
            });

            let result = FetchResult::observe(outcome);
            let Some(display) = self.apply(&result) else {
                debug!(
                    "Discarding {} result that resolved after deactivation",
                    self.source.endpoint
                );
                return;
            };
            self.report(&result).await;
            for waiter in waiters.drain(..) {
                let _ = waiter.send(display.clone());
            }

            // Next trigger: interval after this fetch *started*. A deadline already in
            // the past fires at once, and only once.
            let deadline = self
                .source
                .is_periodic()
                .then(|| started + self.source.interval);
            tokio::select! {
                biased;
                _ = self.token.cancelled() => return,
                _ = wait_until(deadline) => {}
                waiter = self.refresh_rx.recv() => match waiter {
                    Some(waiter) => waiters.push(waiter),
                    None => return,
                },
            }
        }
    }

    fn mark_in_flight(&self) {
        self.state.send_if_modified(|current| {
            if current.phase == WidgetPhase::Ready {
                current.phase = WidgetPhase::Refreshing;
                true
            } else {
                false
            }
        });
    }

    /// Fold the result into the display state unless the widget was torn down.
    fn apply(&self, result: &FetchResult<T>) -> Option<DisplayState<T>> {
        let mut applied = None;
        self.state.send_if_modified(|current| {
            if current.phase == WidgetPhase::Inactive {
                return false;
            }
            current.display = self.policy.apply(&current.display, result);
            current.phase = WidgetPhase::Ready;
            applied = Some(current.display.clone());
            true
        });
        if applied.is_some() {
            // No subscribers is fine
            let _ = self.results.send(result.clone());
        }
        applied
    }

    async fn report(&self, result: &FetchResult<T>) {
        let (message, event_type, level) = match result {
            FetchResult::Success { .. } => (
                format!("Refreshed {}", self.source.endpoint),
                EventType::Success,
                LogLevel::Info,
            ),
            FetchResult::Failure { reason, .. } => {
                warn!("Fetch of {} failed: {}", self.source.endpoint, reason);
                (
                    format!("Failed to refresh {}: {}", self.source.endpoint, reason),
                    EventType::Error,
                    reason.level,
                )
            }
        };
        if let Some(events) = &self.events {
            events
                .send(self.source.source, message, event_type, level)
                .await;
        }
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
