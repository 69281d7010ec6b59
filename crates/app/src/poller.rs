//! Dashboard poller — refreshes the energy snapshot on a fixed interval.
//!
//! [`DashboardPoller::start`] spawns a background task that queries the
//! [`DashboardSource`] immediately and then once per interval, publishing
//! every outcome through a [`watch`] channel. The returned [`PollerHandle`]
//! owns the task: dropping it (or calling [`PollerHandle::stop`]) cancels
//! polling, so no result is published after teardown.
//!
//! A failed poll keeps the last good data on screen and sets the error. When
//! [`PollerConfig::max_consecutive_failures`] is set, reaching that many
//! failures in a row halts polling with [`TERMINAL_ERROR`].

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use wattdesk_domain::energy::DashboardData;
use wattdesk_domain::time::{self, Timestamp};

use crate::dashboard::FlowBreakdown;
use crate::ports::DashboardSource;

/// Refresh interval used when none is configured.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(5000);

/// Failure cap of the legacy dashboard profile.
pub const LEGACY_MAX_CONSECUTIVE_FAILURES: u32 = 3;

/// Error shown once polling has given up.
pub const TERMINAL_ERROR: &str = "Unable to connect to server. Please refresh the page.";

const MIN_INTERVAL: Duration = Duration::from_millis(1);

/// Poller behaviour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
    pub interval: Duration,
    /// Halt after this many failures in a row. `None` retries forever.
    pub max_consecutive_failures: Option<u32>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_REFRESH_INTERVAL,
            max_consecutive_failures: None,
        }
    }
}

impl PollerConfig {
    /// Default interval, halting after three consecutive failures.
    #[must_use]
    pub fn legacy() -> Self {
        Self {
            max_consecutive_failures: Some(LEGACY_MAX_CONSECUTIVE_FAILURES),
            ..Self::default()
        }
    }
}

/// Lifecycle of the poller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PollPhase {
    /// No poll has completed yet.
    #[default]
    Loading,
    /// At least one poll has completed and polling continues.
    Polling,
    /// Polling gave up after too many failures.
    Halted,
}

/// Everything the dashboard renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardState {
    pub phase: PollPhase,
    /// Last successfully fetched data. Kept across failures.
    pub data: Option<DashboardData>,
    pub error: Option<String>,
    pub last_updated: Option<Timestamp>,
    pub consecutive_failures: u32,
}

impl DashboardState {
    pub fn is_loading(&self) -> bool {
        self.phase == PollPhase::Loading
    }

    /// Heuristic per-kind breakdown of the current snapshot.
    #[must_use]
    pub fn flow(&self) -> Option<FlowBreakdown> {
        self.data
            .as_ref()
            .map(|data| FlowBreakdown::heuristic(&data.snapshot))
    }

    fn record_success(&mut self, data: DashboardData) {
        self.phase = PollPhase::Polling;
        self.data = Some(data);
        self.error = None;
        self.last_updated = Some(time::now());
        self.consecutive_failures = 0;
    }

    /// Returns whether polling should continue.
    fn record_failure(&mut self, message: String, cap: Option<u32>) -> bool {
        self.consecutive_failures += 1;
        if cap.is_some_and(|cap| self.consecutive_failures >= cap) {
            self.phase = PollPhase::Halted;
            self.error = Some(TERMINAL_ERROR.to_string());
            return false;
        }
        self.phase = PollPhase::Polling;
        self.error = Some(message);
        true
    }
}

/// Background refresh loop over a [`DashboardSource`].
pub struct DashboardPoller<D> {
    source: D,
    config: PollerConfig,
    state: watch::Sender<DashboardState>,
    refresh: Arc<Notify>,
}

impl<D: DashboardSource + 'static> DashboardPoller<D> {
    /// Spawn the poll loop. The first poll runs immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(source: D, config: PollerConfig) -> PollerHandle {
        let (state, receiver) = watch::channel(DashboardState::default());
        let refresh = Arc::new(Notify::new());
        let poller = Self {
            source,
            config,
            state,
            refresh: Arc::clone(&refresh),
        };
        let task = tokio::spawn(poller.run());
        PollerHandle {
            state: receiver,
            refresh,
            task,
        }
    }

    async fn run(self) {
        let mut ticker = tokio::time::interval(self.config.interval.max(MIN_INTERVAL));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                () = self.refresh.notified() => {
                    tracing::debug!("manual dashboard refresh");
                    ticker.reset();
                }
            }
            if !self.iterate().await {
                tracing::warn!(
                    failures = self.state.borrow().consecutive_failures,
                    "dashboard polling halted"
                );
                break;
            }
        }
    }

    /// Run one poll and publish its outcome. Returns whether to keep going.
    #[tracing::instrument(skip(self))]
    async fn iterate(&self) -> bool {
        let result = self.source.fetch_dashboard().await;
        let cap = self.config.max_consecutive_failures;
        let mut keep_going = true;
        self.state.send_modify(|state| match result {
            Ok(data) => {
                tracing::debug!(devices = data.devices.len(), "dashboard refreshed");
                state.record_success(data);
            }
            Err(err) => {
                tracing::warn!(error = %err, "dashboard refresh failed");
                keep_going = state.record_failure(err.user_message(), cap);
            }
        });
        keep_going
    }
}

/// Owner of a running poller. Dropping it stops polling.
pub struct PollerHandle {
    state: watch::Receiver<DashboardState>,
    refresh: Arc<Notify>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// A snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    /// A receiver notified on every published state.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    /// Poll now and restart the interval from this moment.
    ///
    /// Returns `false` without doing anything once the loop has halted or
    /// been stopped; a halted poller never resumes.
    pub fn refresh(&self) -> bool {
        if self.task.is_finished() {
            return false;
        }
        self.refresh.notify_one();
        true
    }

    /// Whether the loop is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Cancel polling.
    pub fn stop(self) {
        self.task.abort();
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use wattdesk_domain::energy::EnergySnapshot;
    use wattdesk_domain::error::{HttpError, WattdeskError};

    #[derive(Default)]
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<DashboardData, WattdeskError>>>,
        calls: AtomicUsize,
        /// Returned once the script is exhausted.
        fail_after_script: bool,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<DashboardData, WattdeskError>>) -> Arc<Self> {
            Arc::new(Self {
                script: Mutex::new(script.into()),
                ..Self::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail_after_script: true,
                ..Self::default()
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn server_error() -> WattdeskError {
        HttpError {
            status: 503,
            detail: None,
        }
        .into()
    }

    fn data(production: f64) -> DashboardData {
        DashboardData {
            snapshot: EnergySnapshot {
                current_production_w: production,
                ..EnergySnapshot::default()
            },
            devices: Vec::new(),
        }
    }

    impl DashboardSource for ScriptedSource {
        fn fetch_dashboard(&self) -> impl Future<Output = Result<DashboardData, WattdeskError>> + Send {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.script.lock().unwrap().pop_front();
            let result = match next {
                Some(result) => result,
                None if self.fail_after_script => Err(server_error()),
                None => Ok(data(0.0)),
            };
            async { result }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn should_poll_immediately_then_on_interval() {
        let source = ScriptedSource::new(vec![Ok(data(1200.0))]);
        let handle = DashboardPoller::start(Arc::clone(&source), PollerConfig::default());
        let mut rx = handle.subscribe();

        let state = rx.wait_for(|s| s.phase == PollPhase::Polling).await.unwrap().clone();
        assert_eq!(source.calls(), 1);
        assert!(state.last_updated.is_some());
        assert!(state.error.is_none());

        tokio::time::sleep(Duration::from_millis(5000 * 3 + 10)).await;
        assert_eq!(source.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn should_keep_last_good_data_when_poll_fails() {
        let source = ScriptedSource::new(vec![Ok(data(1200.0)), Err(server_error())]);
        let handle = DashboardPoller::start(Arc::clone(&source), PollerConfig::default());
        let mut rx = handle.subscribe();

        let state = rx
            .wait_for(|s| s.consecutive_failures == 1)
            .await
            .unwrap()
            .clone();
        assert_eq!(state.data, Some(data(1200.0)));
        assert_eq!(state.error.as_deref(), Some("Request failed with status 503"));
        assert_eq!(state.phase, PollPhase::Polling);
    }

    #[tokio::test(start_paused = true)]
    async fn should_reset_failure_count_after_success() {
        let source = ScriptedSource::new(vec![Err(server_error()), Err(server_error()), Ok(data(1.0))]);
        let handle = DashboardPoller::start(Arc::clone(&source), PollerConfig::legacy());
        let mut rx = handle.subscribe();

        let state = rx.wait_for(|s| s.data.is_some()).await.unwrap().clone();
        assert_eq!(state.consecutive_failures, 0);
        assert!(state.error.is_none());
        assert!(handle.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn should_halt_after_legacy_failure_cap() {
        let source = ScriptedSource::failing();
        let handle = DashboardPoller::start(Arc::clone(&source), PollerConfig::legacy());
        let mut rx = handle.subscribe();

        let state = rx
            .wait_for(|s| s.phase == PollPhase::Halted)
            .await
            .unwrap()
            .clone();
        assert_eq!(state.error.as_deref(), Some(TERMINAL_ERROR));
        assert_eq!(source.calls(), 3);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls(), 3);
        assert!(!handle.is_running());
        assert!(!handle.refresh());
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn should_retry_forever_without_cap() {
        let source = ScriptedSource::failing();
        let handle = DashboardPoller::start(Arc::clone(&source), PollerConfig::default());

        tokio::time::sleep(Duration::from_millis(5000 * 9 + 10)).await;
        assert_eq!(source.calls(), 10);
        let state = handle.state();
        assert_eq!(state.phase, PollPhase::Polling);
        assert_eq!(state.consecutive_failures, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_polling_when_handle_dropped() {
        let source = ScriptedSource::new(Vec::new());
        let handle = DashboardPoller::start(Arc::clone(&source), PollerConfig::default());
        let mut rx = handle.subscribe();
        rx.wait_for(|s| s.phase == PollPhase::Polling).await.unwrap();

        drop(handle);
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(source.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn should_poll_at_once_on_manual_refresh() {
        let source = ScriptedSource::new(Vec::new());
        let handle = DashboardPoller::start(Arc::clone(&source), PollerConfig::default());
        let mut rx = handle.subscribe();
        rx.wait_for(|s| s.phase == PollPhase::Polling).await.unwrap();

        let before = tokio::time::Instant::now();
        assert!(handle.refresh());
        rx.changed().await.unwrap();
        assert_eq!(source.calls(), 2);
        assert!(before.elapsed() < DEFAULT_REFRESH_INTERVAL);
    }

    #[test]
    fn should_break_down_flow_only_with_data() {
        assert!(DashboardState::default().flow().is_none());

        let state = DashboardState {
            phase: PollPhase::Polling,
            data: Some(data(1000.0)),
            ..DashboardState::default()
        };
        let flow = state.flow().unwrap();
        assert_eq!(flow, FlowBreakdown::heuristic(&data(1000.0).snapshot));
        assert!(flow.solar_w > 0.0);
        assert_eq!(flow.hvac_w, 0.0);
    }

    #[test]
    fn should_expose_legacy_profile() {
        assert_eq!(PollerConfig::default().max_consecutive_failures, None);
        assert_eq!(PollerConfig::legacy().max_consecutive_failures, Some(3));
        assert_eq!(PollerConfig::legacy().interval, Duration::from_millis(5000));
    }
}
