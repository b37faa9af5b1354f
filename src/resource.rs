//! Request-tracked query state.
//!
//! Every load of a [`Resource`] is tagged with a monotonically increasing
//! [`RequestToken`]. A completion is applied only when its token is still
//! the latest one issued, so a slow response can never overwrite the result
//! of a newer request.

use std::fmt::Display;
use std::future::Future;
use std::sync::Arc;

use futures::future::BoxFuture;
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};

use crate::errors::AppError;
use crate::models::pagination::Pagination;
use crate::remote::DataClient;

/// Lifecycle of one query: `Idle → Loading → Success | Failure`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum QueryState<T> {
    Idle,
    Loading,
    Success(T),
    Failure(String),
}

impl<T> QueryState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, QueryState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            QueryState::Success(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            QueryState::Failure(message) => Some(message),
            _ => None,
        }
    }
}

/// Identifies one issued load of a [`Resource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestToken(u64);

/// What a failed load does to the visible state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Show the failure; no data remains visible.
    Replace,
    /// Log the failure and go back to the last settled state.
    KeepPrior,
}

#[derive(Debug)]
struct Slots<T> {
    latest: u64,
    current: QueryState<T>,
    /// Last non-loading state.
    settled: QueryState<T>,
}

#[derive(Debug)]
pub struct Resource<T> {
    policy: FailurePolicy,
    slots: RwLock<Slots<T>>,
}

impl<T: Clone> Resource<T> {
    pub fn new(policy: FailurePolicy) -> Self {
        Self {
            policy,
            slots: RwLock::new(Slots {
                latest: 0,
                current: QueryState::Idle,
                settled: QueryState::Idle,
            }),
        }
    }

    pub fn replace() -> Self {
        Self::new(FailurePolicy::Replace)
    }

    pub fn keep_prior() -> Self {
        Self::new(FailurePolicy::KeepPrior)
    }

    /// Issue a new token and mark the resource as loading.
    pub async fn begin(&self) -> RequestToken {
        let mut slots = self.slots.write().await;
        slots.latest += 1;
        slots.current = QueryState::Loading;
        RequestToken(slots.latest)
    }

    /// Apply a completion. Returns `false` when `token` is stale and the result was dropped.
    pub async fn finish<E: Display>(&self, token: RequestToken, result: Result<T, E>) -> bool {
        let mut slots = self.slots.write().await;
        if token.0 != slots.latest {
            tracing::debug!(
                token = token.0,
                latest = slots.latest,
                "Discarding stale query result"
            );
            return false;
        }

        match result {
            Ok(data) => {
                slots.current = QueryState::Success(data.clone());
                slots.settled = QueryState::Success(data);
            }
            Err(e) => match self.policy {
                FailurePolicy::Replace => {
                    slots.current = QueryState::Failure(e.to_string());
                    slots.settled = QueryState::Failure(e.to_string());
                }
                FailurePolicy::KeepPrior => {
                    tracing::error!(error = %e, "Query failed; keeping previous state");
                    slots.current = slots.settled.clone();
                }
            },
        }
        true
    }

    /// Run `fut` as a tracked load and hand its own result back to the caller.
    pub async fn load<E, Fut>(&self, fut: Fut) -> Result<T, E>
    where
        E: Display,
        Fut: Future<Output = Result<T, E>>,
    {
        let token = self.begin().await;
        match fut.await {
            Ok(data) => {
                self.finish::<E>(token, Ok(data.clone())).await;
                Ok(data)
            }
            Err(e) => {
                self.finish::<&E>(token, Err(&e)).await;
                Err(e)
            }
        }
    }

    /// Like [`Resource::load`], but a failure falls back to the last successful data.
    pub async fn load_or_prior<E, Fut>(&self, fut: Fut) -> Result<T, E>
    where
        E: Display,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.load(fut).await {
            Ok(data) => Ok(data),
            Err(e) => self.last_success().await.ok_or(e),
        }
    }

    pub async fn state(&self) -> QueryState<T> {
        self.slots.read().await.current.clone()
    }

    pub async fn last_success(&self) -> Option<T> {
        self.slots.read().await.settled.data().cloned()
    }
}

/// Loads one page of a list for the given filters.
pub type ListFetcher<F, T> =
    fn(Arc<dyn DataClient>, F, Pagination) -> BoxFuture<'static, Result<T, AppError>>;

/// Point-in-time view of a [`ListView`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub page: u32,
    pub limit: u32,
}

/// A filtered, paginated list that reloads whenever its filters, page or
/// limit change, and on explicit [`ListView::refetch`].
pub struct ListView<F, T> {
    client: Arc<dyn DataClient>,
    fetch: ListFetcher<F, T>,
    params: Mutex<(F, Pagination)>,
    resource: Resource<T>,
}

impl<F, T> ListView<F, T>
where
    F: Clone + PartialEq + Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        client: Arc<dyn DataClient>,
        fetch: ListFetcher<F, T>,
        filters: F,
        pagination: Pagination,
    ) -> Self {
        Self {
            client,
            fetch,
            params: Mutex::new((filters, pagination)),
            resource: Resource::replace(),
        }
    }

    /// Construct and run the initial load.
    pub async fn mount(
        client: Arc<dyn DataClient>,
        fetch: ListFetcher<F, T>,
        filters: F,
        pagination: Pagination,
    ) -> Self {
        let view = Self::new(client, fetch, filters, pagination);
        view.reload().await;
        view
    }

    /// Replace the filters; reloads only when they actually changed.
    pub async fn set_filters(&self, filters: F) -> bool {
        self.reload_with(|params| {
            if params.0 == filters {
                return false;
            }
            params.0 = filters;
            true
        })
        .await
    }

    pub async fn set_page(&self, page: u32) -> bool {
        self.refetch(Some(page), None).await
    }

    pub async fn set_limit(&self, limit: u32) -> bool {
        self.refetch(None, Some(limit)).await
    }

    /// Force a reload, optionally moving to another page or page size.
    pub async fn refetch(&self, page: Option<u32>, limit: Option<u32>) -> bool {
        self.reload_with(|params| {
            if let Some(page) = page {
                params.1.page = Some(page);
            }
            if let Some(limit) = limit {
                params.1.limit = Some(limit);
            }
            true
        })
        .await
    }

    async fn reload(&self) -> bool {
        self.reload_with(|_| true).await
    }

    /// Apply `change` and issue the request token under one `params` lock,
    /// so the newest token always carries the newest parameters.
    async fn reload_with(&self, change: impl FnOnce(&mut (F, Pagination)) -> bool) -> bool {
        let (token, filters, pagination) = {
            let mut params = self.params.lock().await;
            if !change(&mut params) {
                return false;
            }
            let token = self.resource.begin().await;
            let (filters, pagination) = params.clone();
            (token, filters, pagination)
        };
        let result = (self.fetch)(Arc::clone(&self.client), filters, pagination).await;
        self.resource.finish(token, result).await
    }

    pub async fn snapshot(&self) -> ListSnapshot<T> {
        let pagination = self.params.lock().await.1;
        let state = self.resource.state().await;
        ListSnapshot {
            loading: state.is_loading(),
            error: state.error().map(str::to_string),
            data: state.data().cloned(),
            page: pagination.current_page(),
            limit: pagination.limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn success_then_failure_replaces_data() {
        let resource: Resource<u32> = Resource::replace();
        assert_eq!(resource.state().await, QueryState::Idle);

        let token = resource.begin().await;
        assert!(resource.state().await.is_loading());
        assert!(resource.finish::<String>(token, Ok(7)).await);
        assert_eq!(resource.state().await, QueryState::Success(7));

        let token = resource.begin().await;
        assert!(resource.finish(token, Err("boom")).await);
        let state = resource.state().await;
        assert_eq!(state.error(), Some("boom"));
        assert!(state.data().is_none());
    }

    #[tokio::test]
    async fn stale_completion_is_discarded() {
        let resource: Resource<&'static str> = Resource::replace();

        let slow = resource.begin().await;
        let fast = resource.begin().await;

        assert!(resource.finish::<String>(fast, Ok("new filters")).await);
        assert!(!resource.finish::<String>(slow, Ok("old filters")).await);
        assert_eq!(resource.state().await, QueryState::Success("new filters"));
    }

    #[tokio::test]
    async fn stale_completion_is_discarded_across_tasks() {
        let resource = Arc::new(Resource::<u32>::replace());
        let (release_slow, slow_gate) = oneshot::channel::<()>();

        let slow = {
            let resource = Arc::clone(&resource);
            tokio::spawn(async move {
                resource
                    .load(async move {
                        slow_gate.await.ok();
                        Ok::<u32, String>(1)
                    })
                    .await
            })
        };
        tokio::task::yield_now().await;
        // Make sure the slow request has been issued before the fast one.
        while !resource.state().await.is_loading() {
            tokio::task::yield_now().await;
        }

        let fast = resource.load(async { Ok::<u32, String>(2) }).await;
        assert_eq!(fast, Ok(2));

        release_slow.send(()).ok();
        assert_eq!(slow.await.unwrap(), Ok(1));
        assert_eq!(resource.state().await, QueryState::Success(2));
    }

    #[tokio::test]
    async fn keep_prior_restores_last_success() {
        let resource: Resource<u32> = Resource::keep_prior();
        resource.load(async { Ok::<u32, String>(5) }).await.unwrap();

        let err = resource
            .load(async { Err::<u32, String>("remote down".to_string()) })
            .await
            .unwrap_err();
        assert_eq!(err, "remote down");
        assert_eq!(resource.state().await, QueryState::Success(5));

        let fallback = resource
            .load_or_prior(async { Err::<u32, String>("remote down".to_string()) })
            .await;
        assert_eq!(fallback, Ok(5));
    }

    #[tokio::test]
    async fn keep_prior_without_history_reports_error() {
        let resource: Resource<u32> = Resource::keep_prior();
        let result = resource
            .load_or_prior(async { Err::<u32, String>("remote down".to_string()) })
            .await;
        assert_eq!(result, Err("remote down".to_string()));
        assert_eq!(resource.state().await, QueryState::Idle);
    }

    #[test]
    fn query_state_serializes_with_status_tag() {
        let json = serde_json::to_value(QueryState::Success(3)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["data"], 3);
        let json = serde_json::to_value(QueryState::<u32>::Loading).unwrap();
        assert_eq!(json["status"], "loading");
    }

    fn echo_page(
        _client: Arc<dyn DataClient>,
        filters: String,
        pagination: Pagination,
    ) -> BoxFuture<'static, Result<(String, u32), AppError>> {
        async move {
            if filters == "broken" {
                return Err(AppError::Internal("fetch failed".to_string()));
            }
            Ok((filters, pagination.current_page()))
        }
        .boxed()
    }

    #[tokio::test]
    async fn list_view_reloads_on_changes() {
        let client: Arc<dyn DataClient> = Arc::new(crate::remote::MemoryClient::new());
        let view = ListView::mount(client, echo_page, "All".to_string(), Pagination::default()).await;

        let snapshot = view.snapshot().await;
        assert_eq!(snapshot.data, Some(("All".to_string(), 1)));
        assert!(!snapshot.loading);

        assert!(!view.set_filters("All".to_string()).await);
        assert!(view.set_page(3).await);
        assert_eq!(view.snapshot().await.data, Some(("All".to_string(), 3)));

        assert!(view.refetch(None, Some(25)).await);
        let snapshot = view.snapshot().await;
        assert_eq!(snapshot.limit, 25);
        assert_eq!(snapshot.page, 3);
    }

    #[tokio::test]
    async fn list_view_failure_leaves_no_data() {
        let client: Arc<dyn DataClient> = Arc::new(crate::remote::MemoryClient::new());
        let view = ListView::mount(client, echo_page, "All".to_string(), Pagination::default()).await;
        assert!(view.set_filters("broken".to_string()).await);

        let snapshot = view.snapshot().await;
        assert!(snapshot.data.is_none());
        assert!(!snapshot.loading);
        assert_eq!(snapshot.error.as_deref(), Some("Internal error: fetch failed"));
    }

    fn echo_after_yield(
        _client: Arc<dyn DataClient>,
        filters: String,
        _pagination: Pagination,
    ) -> BoxFuture<'static, Result<String, AppError>> {
        async move {
            tokio::task::yield_now().await;
            Ok(filters)
        }
        .boxed()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_filter_changes_settle_on_the_latest_filters() {
        let client: Arc<dyn DataClient> = Arc::new(crate::remote::MemoryClient::new());
        for round in 0..200 {
            let view = Arc::new(
                ListView::mount(
                    Arc::clone(&client),
                    echo_after_yield,
                    "start".to_string(),
                    Pagination::default(),
                )
                .await,
            );
            let first = tokio::spawn({
                let view = Arc::clone(&view);
                async move { view.set_filters("a".to_string()).await }
            });
            let second = tokio::spawn({
                let view = Arc::clone(&view);
                async move { view.set_filters("b".to_string()).await }
            });
            first.await.unwrap();
            second.await.unwrap();

            let filters = view.params.lock().await.0.clone();
            assert_eq!(view.snapshot().await.data, Some(filters), "round {round}");
        }
    }
}
