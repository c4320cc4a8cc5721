//! Request controller
//!
//! Owns the single logical "current datetime" query: triggers the call,
//! tracks lifecycle state, exposes the latest result or error to
//! observers, and guards against overlapping duplicate invocations.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use timeview_domain::{DateTimePayload, RequestState};
use tokio::sync::{mpsc, watch};

use crate::ports::{TimeService, TimeServiceError};

/// Controller for the single "current datetime" query.
///
/// State is published through a `watch` channel so any number of
/// observers can follow transitions; failures are additionally pushed on
/// a one-shot alert channel so a frontend can raise an immediate
/// notification separate from the persisted error state.
///
/// At most one request is ever in flight: a trigger while `Loading` is a
/// no-op. The guard check and the transition into `Loading` happen as one
/// atomic step under the watch channel's lock, so racing triggers cannot
/// both start.
///
/// `trigger` spawns the fetch on the ambient Tokio runtime, so the
/// controller must be used from within one.
pub struct RequestController {
    inner: Arc<Inner>,
    alerts: Mutex<Option<mpsc::UnboundedReceiver<String>>>,
}

struct Inner {
    service: Arc<dyn TimeService>,
    state: watch::Sender<RequestState>,
    alert_tx: mpsc::UnboundedSender<String>,
    // Bumped on every started trigger and on shutdown. A resolution whose
    // generation no longer matches is discarded instead of mutating state.
    generation: AtomicU64,
}

impl RequestController {
    /// Creates a controller in the `Idle` state backed by the given
    /// service.
    #[must_use]
    pub fn new(service: Arc<dyn TimeService>) -> Self {
        let (state, _) = watch::channel(RequestState::Idle);
        let (alert_tx, alert_rx) = mpsc::unbounded_channel();
        Self {
            inner: Arc::new(Inner {
                service,
                state,
                alert_tx,
                generation: AtomicU64::new(0),
            }),
            alerts: Mutex::new(Some(alert_rx)),
        }
    }

    /// Returns a receiver following every state transition.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<RequestState> {
        self.inner.state.subscribe()
    }

    /// Returns a snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> RequestState {
        self.inner.state.borrow().clone()
    }

    /// Takes the one-shot failure notification channel.
    ///
    /// Each request that resolves to `Failure` pushes exactly one
    /// human-readable message here, in addition to the persisted error
    /// state. Returns `None` after the first call.
    pub fn alerts(&self) -> Option<mpsc::UnboundedReceiver<String>> {
        self.alerts.lock().ok().and_then(|mut slot| slot.take())
    }

    /// Starts a new request attempt.
    ///
    /// If a request is already in flight this is a no-op and returns
    /// `false`: no second outbound call is made and no state changes.
    /// Otherwise the state transitions to `Loading` (clearing any previous
    /// error, carrying the last successful timestamp forward) and the
    /// fetch is spawned; returns `true`.
    pub fn trigger(&self) -> bool {
        let inner = &self.inner;
        let mut generation = 0;
        let started = inner.state.send_if_modified(|state| {
            if state.is_loading() {
                return false;
            }
            generation = inner.generation.fetch_add(1, Ordering::AcqRel) + 1;
            *state = RequestState::loading(state.result().map(ToOwned::to_owned));
            true
        });
        if !started {
            tracing::debug!("trigger ignored, a request is already in flight");
            return false;
        }

        tracing::debug!(generation, "starting datetime fetch");
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let outcome = inner.service.fetch_current().await;
            inner.apply(generation, outcome);
        });
        true
    }

    /// Invalidates the in-flight request, if any.
    ///
    /// The request itself cannot be aborted; its eventual resolution is
    /// discarded instead of mutating state. Called automatically on drop.
    pub fn shutdown(&self) {
        self.inner.generation.fetch_add(1, Ordering::AcqRel);
    }
}

impl Drop for RequestController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl Inner {
    /// Applies a resolved outcome, unless a newer trigger or a shutdown
    /// superseded it.
    fn apply(&self, generation: u64, outcome: Result<DateTimePayload, TimeServiceError>) {
        if self.generation.load(Ordering::Acquire) != generation {
            tracing::warn!(generation, "discarding resolution of a superseded request");
            return;
        }
        match outcome {
            Ok(payload) => {
                tracing::debug!(timestamp = %payload.current_date_time, "datetime fetch succeeded");
                self.state
                    .send_modify(|state| *state = RequestState::success(payload.current_date_time));
            }
            Err(err) => {
                let message = err.to_string();
                tracing::debug!(kind = ?err.kind(), %message, "datetime fetch failed");
                self.state.send_modify(|state| {
                    let last_known = state.result().map(ToOwned::to_owned);
                    *state = RequestState::failure(err.kind(), message.clone(), last_known);
                });
                // Observer may be gone; the persisted state still has the error.
                let _ = self.alert_tx.send(message);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use timeview_domain::RequestErrorKind;
    use tokio::sync::Notify;

    /// Mock time service replaying scripted outcomes, optionally gated so
    /// a test can hold a request in flight.
    struct MockTimeService {
        outcomes: Mutex<VecDeque<Result<DateTimePayload, TimeServiceError>>>,
        calls: AtomicUsize,
        gate: Option<Arc<Notify>>,
    }

    impl MockTimeService {
        fn scripted(
            outcomes: impl IntoIterator<Item = Result<DateTimePayload, TimeServiceError>>,
        ) -> Self {
            Self {
                outcomes: Mutex::new(outcomes.into_iter().collect()),
                calls: AtomicUsize::new(0),
                gate: None,
            }
        }

        fn gated(
            outcomes: impl IntoIterator<Item = Result<DateTimePayload, TimeServiceError>>,
        ) -> (Self, Arc<Notify>) {
            let gate = Arc::new(Notify::new());
            let mut service = Self::scripted(outcomes);
            service.gate = Some(Arc::clone(&gate));
            (service, gate)
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    fn payload(timestamp: &str) -> DateTimePayload {
        DateTimePayload {
            current_date_time: timestamp.to_string(),
        }
    }

    #[async_trait]
    impl TimeService for MockTimeService {
        async fn fetch_current(&self) -> Result<DateTimePayload, TimeServiceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.outcomes
                .lock()
                .expect("outcomes lock")
                .pop_front()
                .expect("unexpected extra fetch")
        }
    }

    async fn wait_settled(rx: &mut watch::Receiver<RequestState>) -> RequestState {
        rx.wait_for(RequestState::is_settled)
            .await
            .expect("controller dropped")
            .clone()
    }

    #[tokio::test]
    async fn test_success_path_publishes_timestamp() {
        let service = Arc::new(MockTimeService::scripted([Ok(payload(
            "2024-01-01T00:00:00Z",
        ))]));
        let controller = RequestController::new(service);
        let mut rx = controller.subscribe();

        assert!(controller.state().is_idle());
        assert!(controller.trigger());

        let state = wait_settled(&mut rx).await;
        assert!(state.is_success());
        assert_eq!(state.result(), Some("2024-01-01T00:00:00Z"));
        assert_eq!(state.error_message(), None);
    }

    #[tokio::test]
    async fn test_trigger_while_loading_is_a_no_op() {
        let (service, gate) = MockTimeService::gated([Ok(payload("2024-01-01T00:00:00Z"))]);
        let service = Arc::new(service);
        let controller = RequestController::new(Arc::clone(&service) as Arc<dyn TimeService>);
        let mut rx = controller.subscribe();

        assert!(controller.trigger());
        assert!(controller.state().is_loading());

        // Second trigger while in flight: suppressed, state untouched.
        assert!(!controller.trigger());
        assert!(controller.state().is_loading());

        gate.notify_one();
        let state = wait_settled(&mut rx).await;
        assert!(state.is_success());

        // Exactly one outbound call and exactly one terminal transition.
        assert_eq!(service.call_count(), 1);
        assert!(!rx.has_changed().expect("controller alive"));
    }

    #[tokio::test]
    async fn test_failure_retains_previous_result() {
        let service = Arc::new(MockTimeService::scripted([
            Ok(payload("2024-01-01T00:00:00Z")),
            Err(TimeServiceError::Protocol { status: 500 }),
        ]));
        let controller = RequestController::new(service);
        let mut rx = controller.subscribe();

        assert!(controller.trigger());
        assert!(wait_settled(&mut rx).await.is_success());

        assert!(controller.trigger());
        let state = wait_settled(&mut rx).await;
        assert!(state.is_failure());
        assert_eq!(state.error_kind(), Some(RequestErrorKind::Protocol));
        assert_eq!(state.error_message(), Some("service responded with status 500"));
        // The stale timestamp survives the failed retry.
        assert_eq!(state.result(), Some("2024-01-01T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_format_error_becomes_failure() {
        let service = Arc::new(MockTimeService::scripted([Err(TimeServiceError::Format {
            message: "missing field `currentDateTime`".to_string(),
        })]));
        let controller = RequestController::new(service);
        let mut rx = controller.subscribe();

        assert!(controller.trigger());
        let state = wait_settled(&mut rx).await;
        assert!(state.is_failure());
        assert_eq!(state.error_kind(), Some(RequestErrorKind::Format));
        assert_eq!(state.result(), None);
    }

    #[tokio::test]
    async fn test_retrigger_from_failure_clears_error_immediately() {
        let (service, gate) = MockTimeService::gated([
            Err(TimeServiceError::Network {
                message: "connection refused".to_string(),
            }),
            Ok(payload("2024-01-01T00:00:00Z")),
        ]);
        let controller = RequestController::new(Arc::new(service));
        let mut rx = controller.subscribe();

        assert!(controller.trigger());
        gate.notify_one();
        assert!(wait_settled(&mut rx).await.is_failure());

        // Retrigger: synchronously Loading, error structurally gone,
        // before the new call resolves.
        assert!(controller.trigger());
        let state = controller.state();
        assert!(state.is_loading());
        assert_eq!(state.error_message(), None);

        gate.notify_one();
        assert!(wait_settled(&mut rx).await.is_success());
    }

    #[tokio::test]
    async fn test_each_failure_emits_one_alert() {
        let service = Arc::new(MockTimeService::scripted([Err(
            TimeServiceError::Network {
                message: "connection refused".to_string(),
            },
        )]));
        let controller = RequestController::new(service);
        let mut alerts = controller.alerts().expect("first take");
        assert!(controller.alerts().is_none());
        let mut rx = controller.subscribe();

        assert!(controller.trigger());
        assert!(wait_settled(&mut rx).await.is_failure());

        let message = alerts.recv().await.expect("one alert");
        assert_eq!(message, "network error: connection refused");
        assert!(alerts.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolution_after_shutdown_is_discarded() {
        let (service, gate) = MockTimeService::gated([Ok(payload("2024-01-01T00:00:00Z"))]);
        let controller = RequestController::new(Arc::new(service));
        let mut alerts = controller.alerts().expect("first take");

        assert!(controller.trigger());
        controller.shutdown();
        gate.notify_one();

        // Give the spawned fetch time to resolve; the outcome must not be
        // applied against the torn-down session.
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(controller.state().is_loading());
        assert!(alerts.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_controller_is_reusable_after_failure() {
        let service = Arc::new(MockTimeService::scripted([
            Err(TimeServiceError::Protocol { status: 503 }),
            Ok(payload("2024-01-02T00:00:00Z")),
        ]));
        let controller = RequestController::new(service);
        let mut rx = controller.subscribe();

        assert!(controller.trigger());
        assert!(wait_settled(&mut rx).await.is_failure());

        assert!(controller.trigger());
        let state = wait_settled(&mut rx).await;
        assert_eq!(state.result(), Some("2024-01-02T00:00:00Z"));
        assert_eq!(state.error_message(), None);
    }
}
