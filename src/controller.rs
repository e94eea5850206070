use crate::errors::{ErrorReport, FetchError};
use crate::fetch::DashboardSource;
use crate::models::{DashboardRequest, ViewModel};
use crate::projection::build_view_model;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

/// What the rendering layer sees. `stale` is set when a load failed but an
/// earlier view model is still available. A disposed view never reports
/// `loading`, even if a load was cut short.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub status: ViewStatus,
    pub loading: bool,
    pub stale: bool,
    pub disposed: bool,
    pub view_model: Option<ViewModel>,
    pub error: Option<ErrorReport>,
}

#[derive(Debug)]
pub enum Trigger {
    Started(LoadHandle),
    AlreadyLoading,
    AlreadyActive,
    Disposed,
}

#[derive(Debug)]
pub struct LoadHandle(JoinHandle<()>);

impl LoadHandle {
    /// Waits until the load has applied its result or been discarded.
    pub async fn settled(self) {
        if let Err(err) = self.0.await {
            warn!("dashboard load task failed: {err}");
        }
    }
}

#[derive(Debug)]
struct Inner {
    status: ViewStatus,
    view_model: Option<ViewModel>,
    error: Option<FetchError>,
    generation: u64,
    cancel: Option<CancellationToken>,
    disposed: bool,
}

pub struct DashboardController<S> {
    source: Arc<S>,
    request: DashboardRequest,
    inner: Arc<Mutex<Inner>>,
}

impl<S> Clone for DashboardController<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            request: self.request,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: DashboardSource> DashboardController<S> {
    pub fn new(source: S, request: DashboardRequest) -> Self {
        Self {
            source: Arc::new(source),
            request,
            inner: Arc::new(Mutex::new(Inner {
                status: ViewStatus::Idle,
                view_model: None,
                error: None,
                generation: 0,
                cancel: None,
                disposed: false,
            })),
        }
    }

    pub fn request(&self) -> DashboardRequest {
        self.request
    }

    /// `idle -> loading`. Does nothing once the view has loaded at least once.
    pub async fn activate(&self) -> Trigger {
        let mut inner = self.inner.lock().await;
        if inner.disposed {
            return Trigger::Disposed;
        }
        let status = inner.status;
        match status {
            ViewStatus::Idle => self.start(&mut inner),
            ViewStatus::Loading => Trigger::AlreadyLoading,
            ViewStatus::Ready | ViewStatus::Error => Trigger::AlreadyActive,
        }
    }

    /// `idle | ready | error -> loading`. Ignored while a load is in flight.
    pub async fn refresh(&self) -> Trigger {
        let mut inner = self.inner.lock().await;
        if inner.disposed {
            return Trigger::Disposed;
        }
        let status = inner.status;
        match status {
            ViewStatus::Loading => Trigger::AlreadyLoading,
            _ => self.start(&mut inner),
        }
    }

    /// Tears the view down. The in-flight load is cancelled and no further
    /// transition happens.
    pub async fn dispose(&self) {
        let mut inner = self.inner.lock().await;
        inner.disposed = true;
        if let Some(token) = inner.cancel.take() {
            token.cancel();
        }
        info!("dashboard view disposed");
    }

    pub async fn snapshot(&self) -> ViewState {
        let inner = self.inner.lock().await;
        ViewState {
            status: inner.status,
            loading: inner.status == ViewStatus::Loading && !inner.disposed,
            stale: inner.status == ViewStatus::Error && inner.view_model.is_some(),
            disposed: inner.disposed,
            view_model: inner.view_model.clone(),
            error: inner.error.as_ref().map(FetchError::report),
        }
    }

    fn start(&self, inner: &mut Inner) -> Trigger {
        inner.generation += 1;
        let generation = inner.generation;
        let token = CancellationToken::new();
        inner.cancel = Some(token.clone());
        inner.status = ViewStatus::Loading;
        inner.error = None;

        let source = Arc::clone(&self.source);
        let shared = Arc::clone(&self.inner);
        let request = self.request;
        info!(
            "dashboard load #{generation} started (days={}, limit={})",
            request.window_days, request.recent_limit
        );

        let handle = tokio::spawn(async move {
            let outcome = source.fetch_bundle(request, &token).await;
            if let Err(FetchError::Cancelled) = outcome {
                debug!("dashboard load #{generation} cancelled");
                return;
            }
            let projected = outcome.map(|bundle| build_view_model(&bundle));

            let mut inner = shared.lock().await;
            if inner.disposed || token.is_cancelled() || inner.generation != generation {
                debug!("discarding result of dashboard load #{generation}");
                return;
            }
            inner.cancel = None;
            match projected {
                Ok(view_model) => {
                    inner.view_model = Some(view_model);
                    inner.error = None;
                    inner.status = ViewStatus::Ready;
                    info!("dashboard load #{generation} ready");
                }
                Err(err) => {
                    warn!("dashboard load #{generation} failed: {err}");
                    inner.error = Some(err);
                    inner.status = ViewStatus::Error;
                }
            }
        });

        Trigger::Started(LoadHandle(handle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Endpoint;
    use crate::models::{MetricsSummary, RawBundle};
    use std::collections::VecDeque;
    use tokio::sync::Semaphore;

    struct GatedSource {
        gate: Arc<Semaphore>,
        responses: std::sync::Mutex<VecDeque<Result<RawBundle, FetchError>>>,
    }

    impl DashboardSource for GatedSource {
        async fn fetch_bundle(
            &self,
            _request: DashboardRequest,
            cancel: &CancellationToken,
        ) -> Result<RawBundle, FetchError> {
            tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                permit = self.gate.acquire() => permit.expect("gate closed").forget(),
            }
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Ok(RawBundle::default()))
        }
    }

    fn controller(
        permits: usize,
        responses: Vec<Result<RawBundle, FetchError>>,
    ) -> (DashboardController<GatedSource>, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(permits));
        let source = GatedSource {
            gate: Arc::clone(&gate),
            responses: std::sync::Mutex::new(responses.into()),
        };
        (DashboardController::new(source, DashboardRequest::default()), gate)
    }

    fn bundle_with_leads(total_leads: u64) -> RawBundle {
        RawBundle {
            summary: MetricsSummary {
                total_leads,
                ..MetricsSummary::default()
            },
            ..RawBundle::default()
        }
    }

    fn started(trigger: Trigger) -> LoadHandle {
        match trigger {
            Trigger::Started(handle) => handle,
            other => panic!("expected a load to start, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn starts_idle_with_nothing_to_show() {
        let (controller, _gate) = controller(0, vec![]);
        let state = controller.snapshot().await;
        assert_eq!(state.status, ViewStatus::Idle);
        assert!(!state.loading);
        assert!(state.view_model.is_none());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn activation_loads_and_becomes_ready() {
        let (controller, gate) = controller(0, vec![Ok(bundle_with_leads(40))]);
        let handle = started(controller.activate().await);
        assert!(controller.snapshot().await.loading);

        gate.add_permits(1);
        handle.settled().await;
        let state = controller.snapshot().await;
        assert_eq!(state.status, ViewStatus::Ready);
        assert!(!state.loading);
        assert_eq!(state.view_model.unwrap().summary.total_leads, 40);
        assert!(matches!(controller.activate().await, Trigger::AlreadyActive));
    }

    #[tokio::test]
    async fn refresh_while_loading_is_ignored() {
        let (controller, gate) = controller(0, vec![Ok(bundle_with_leads(1))]);
        let handle = started(controller.activate().await);
        assert!(matches!(controller.refresh().await, Trigger::AlreadyLoading));
        assert!(matches!(controller.activate().await, Trigger::AlreadyLoading));

        gate.add_permits(1);
        handle.settled().await;
        assert_eq!(controller.snapshot().await.status, ViewStatus::Ready);
    }

    #[tokio::test]
    async fn dispose_mid_flight_suppresses_the_result() {
        let (controller, gate) = controller(0, vec![Ok(bundle_with_leads(1))]);
        let handle = started(controller.activate().await);
        controller.dispose().await;
        gate.add_permits(1);
        handle.settled().await;

        let state = controller.snapshot().await;
        assert!(state.disposed);
        assert!(!state.loading);
        assert_ne!(state.status, ViewStatus::Ready);
        assert!(state.view_model.is_none());
        assert!(state.error.is_none());
        assert!(matches!(controller.refresh().await, Trigger::Disposed));
        assert!(matches!(controller.activate().await, Trigger::Disposed));
    }

    #[tokio::test]
    async fn disposing_a_pending_load_stops_reporting_loading() {
        let (controller, _gate) = controller(0, vec![]);
        let handle = started(controller.activate().await);
        assert!(controller.snapshot().await.loading);

        controller.dispose().await;
        let state = controller.snapshot().await;
        assert!(state.disposed);
        assert!(!state.loading);

        handle.settled().await;
        assert!(!controller.snapshot().await.loading);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_previous_view_model_as_stale() {
        let failure = FetchError::Http {
            endpoint: Endpoint::LeadsPerDay,
            status: 500,
        };
        let (controller, _gate) = controller(2, vec![Ok(bundle_with_leads(40)), Err(failure)]);
        started(controller.activate().await).settled().await;
        let ready = controller.snapshot().await.view_model;

        started(controller.refresh().await).settled().await;
        let state = controller.snapshot().await;
        assert_eq!(state.status, ViewStatus::Error);
        assert!(state.stale);
        assert_eq!(state.view_model, ready);
        let error = state.error.unwrap();
        assert_eq!(error.kind, "http");
        assert_eq!(error.status, Some(500));
        assert_eq!(error.endpoint, Some(Endpoint::LeadsPerDay));
    }

    #[tokio::test]
    async fn first_failure_is_not_stale_and_retry_recovers() {
        let failure = FetchError::Timeout {
            endpoint: Endpoint::Stats,
            after_ms: 10,
        };
        let (controller, _gate) = controller(2, vec![Err(failure)]);
        started(controller.activate().await).settled().await;

        let state = controller.snapshot().await;
        assert_eq!(state.status, ViewStatus::Error);
        assert!(!state.stale);
        assert!(state.view_model.is_none());

        let retry = controller.clone();
        started(retry.refresh().await).settled().await;
        let state = controller.snapshot().await;
        assert_eq!(state.status, ViewStatus::Ready);
        assert!(state.error.is_none());
    }
}
