use crate::dsl::{HybridParams, NavigationFormat, NavigationOptions, NavigationRequest};
use crate::error::NavigationError;
use crate::planner::{NavigationPlanner, NavigationStrategy};
use crate::projector::{NavigationPath, Projection};
use crate::scope::QueryScope;
use crate::score::filter_links;
use crate::{exploratory, hybrid, shortest, weighted};
use ctxnav_core::config::NavigationConfig;
use ctxnav_core::error::{CtxnavError, ErrorCode};
use ctxnav_core::metrics::{MetricsCollector, MetricsSnapshot, QueryKind, QueryOutcome};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use storage::{ContextStore, LinkStore};
use tracing::{debug, info, warn};

/// Result of a navigation query that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum PathOutcome {
    Found(NavigationPath),
    /// Both endpoints exist but no admissible path connects them.
    NoPath { start_id: String, target_id: String },
}

/// Wire shape of every navigation answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<NavigationPath>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<ErrorCode>,
}

impl PathOutcome {
    pub fn path(&self) -> Option<&NavigationPath> {
        match self {
            PathOutcome::Found(path) => Some(path),
            PathOutcome::NoPath { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, PathOutcome::Found(_))
    }

    pub fn into_response(self) -> NavigationResponse {
        match self {
            PathOutcome::Found(path) => NavigationResponse {
                success: true,
                path: Some(path),
                error: None,
                error_code: None,
            },
            PathOutcome::NoPath {
                start_id,
                target_id,
            } => NavigationResponse {
                success: false,
                path: None,
                error: Some(format!("no path found between {start_id} and {target_id}")),
                error_code: None,
            },
        }
    }

    fn query_outcome(&self) -> QueryOutcome {
        match self {
            PathOutcome::Found(_) => QueryOutcome::Found,
            PathOutcome::NoPath { .. } => QueryOutcome::NoPath,
        }
    }
}

impl NavigationError {
    pub fn to_response(&self) -> NavigationResponse {
        NavigationResponse {
            success: false,
            path: None,
            error: Some(self.to_string()),
            error_code: Some(self.error_code()),
        }
    }
}

pub struct NavigationEngine {
    contexts: Arc<dyn ContextStore>,
    links: Arc<dyn LinkStore>,
    query_timeout: Option<Duration>,
    hybrid_defaults: HybridParams,
    metrics: MetricsCollector,
}

impl NavigationEngine {
    pub fn new(contexts: Arc<dyn ContextStore>, links: Arc<dyn LinkStore>) -> Self {
        Self {
            contexts,
            links,
            query_timeout: None,
            hybrid_defaults: HybridParams::default(),
            metrics: MetricsCollector::default(),
        }
    }

    /// Engine over a single store serving both contexts and links.
    pub fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ContextStore + LinkStore + 'static,
    {
        Self::new(store.clone(), store)
    }

    pub fn with_config(mut self, config: &NavigationConfig) -> Self {
        self.query_timeout = config.query_timeout_ms.map(Duration::from_millis);
        self.hybrid_defaults = HybridParams::from(&config.hybrid);
        self.metrics = MetricsCollector::new(config.metrics_history);
        self
    }

    pub fn with_query_timeout(mut self, timeout: Duration) -> Self {
        self.query_timeout = Some(timeout);
        self
    }

    pub fn with_hybrid_defaults(mut self, params: HybridParams) -> Self {
        self.hybrid_defaults = params;
        self
    }

    pub fn hybrid_defaults(&self) -> &HybridParams {
        &self.hybrid_defaults
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Fewest-hop path, ignoring link scores.
    pub async fn unweighted_path(
        &self,
        start_id: &str,
        target_id: &str,
        options: &NavigationOptions,
        projection: Projection,
    ) -> Result<PathOutcome, NavigationError> {
        let started = Instant::now();
        let result = self
            .point_to_point(QueryKind::Unweighted, start_id, target_id, options, projection)
            .await;
        self.record(QueryKind::Unweighted, &result, started);
        result
    }

    /// Most relevant path by link score.
    pub async fn weighted_path(
        &self,
        start_id: &str,
        target_id: &str,
        options: &NavigationOptions,
        projection: Projection,
    ) -> Result<PathOutcome, NavigationError> {
        let started = Instant::now();
        let result = self
            .point_to_point(QueryKind::Weighted, start_id, target_id, options, projection)
            .await;
        self.record(QueryKind::Weighted, &result, started);
        result
    }

    pub async fn exploratory_path(
        &self,
        start_id: &str,
        options: &NavigationOptions,
        projection: Projection,
        format: NavigationFormat,
    ) -> Result<PathOutcome, NavigationError> {
        let started = Instant::now();
        let result = self
            .explore(start_id, options, projection, format)
            .await;
        self.record(QueryKind::Exploratory, &result, started);
        result
    }

    pub async fn hybrid_path(
        &self,
        start_id: &str,
        target_id: &str,
        options: &NavigationOptions,
        params: &HybridParams,
        projection: Projection,
    ) -> Result<PathOutcome, NavigationError> {
        let started = Instant::now();
        let result = self
            .hybrid(start_id, target_id, options, params, projection)
            .await;
        self.record(QueryKind::Hybrid, &result, started);
        result
    }

    /// Plan and run a request, folding every outcome into a response.
    pub async fn execute(&self, request: &NavigationRequest) -> NavigationResponse {
        let strategy = match NavigationPlanner::plan(request, &self.hybrid_defaults) {
            Ok(strategy) => strategy,
            Err(err) => {
                let err = NavigationError::from(err);
                warn!(error = %err, "rejected navigation request");
                return err.to_response();
            }
        };
        debug!(start_id = %request.start_id, kind = ?strategy.kind(), "planned navigation");

        let projection = request.projection();
        let options = &request.strategy;
        let result = match &strategy {
            NavigationStrategy::Unweighted { target } => {
                self.unweighted_path(&request.start_id, target, options, projection)
                    .await
            }
            NavigationStrategy::Weighted { target } => {
                self.weighted_path(&request.start_id, target, options, projection)
                    .await
            }
            NavigationStrategy::Exploratory { format } => {
                self.exploratory_path(&request.start_id, options, projection, *format)
                    .await
            }
            NavigationStrategy::Hybrid { target, params } => {
                self.hybrid_path(&request.start_id, target, options, params, projection)
                    .await
            }
        };

        match result {
            Ok(outcome) => outcome.into_response(),
            Err(err) => {
                warn!(error = %err, code = %err.error_code(), "navigation failed");
                err.to_response()
            }
        }
    }

    pub async fn execute_json(&self, raw: &str) -> NavigationResponse {
        match NavigationRequest::parse_json(raw) {
            Ok(request) => self.execute(&request).await,
            Err(err) => NavigationError::InvalidRequest(err.to_string()).to_response(),
        }
    }

    fn scope(&self) -> QueryScope<'_> {
        let deadline = self
            .query_timeout
            .map(|timeout| tokio::time::Instant::now() + timeout);
        QueryScope::new(self.contexts.as_ref(), self.links.as_ref(), deadline)
    }

    async fn point_to_point(
        &self,
        kind: QueryKind,
        start_id: &str,
        target_id: &str,
        options: &NavigationOptions,
        projection: Projection,
    ) -> Result<PathOutcome, NavigationError> {
        options.validate()?;
        let mut scope = self.scope();
        let start = scope.require(start_id).await?;
        scope.require(target_id).await?;
        let links = filter_links(&scope.link_snapshot().await?, options);

        let found = match kind {
            QueryKind::Unweighted => {
                shortest::find(&mut scope, &links, start, target_id, options).await?
            }
            _ => weighted::find(&mut scope, &links, start, target_id, options).await?,
        };

        Ok(match found {
            Some(raw) => PathOutcome::Found(raw.project(projection)),
            None => no_path(start_id, target_id),
        })
    }

    async fn explore(
        &self,
        start_id: &str,
        options: &NavigationOptions,
        projection: Projection,
        format: NavigationFormat,
    ) -> Result<PathOutcome, NavigationError> {
        options.validate()?;
        let mut scope = self.scope();
        let start = scope.require(start_id).await?;
        let links = filter_links(&scope.link_snapshot().await?, options);

        let raw = exploratory::traverse(&mut scope, &links, start, options, format).await?;
        Ok(PathOutcome::Found(raw.project(projection)))
    }

    async fn hybrid(
        &self,
        start_id: &str,
        target_id: &str,
        options: &NavigationOptions,
        params: &HybridParams,
        projection: Projection,
    ) -> Result<PathOutcome, NavigationError> {
        options.validate()?;
        params.validate()?;
        let mut scope = self.scope();
        let start = scope.require(start_id).await?;
        scope.require(target_id).await?;
        let links = filter_links(&scope.link_snapshot().await?, options);

        let outcome =
            hybrid::find(&mut scope, &links, start, target_id, options, params).await?;
        if outcome.fallback {
            self.metrics.record_hybrid_fallback(outcome.target_reached);
        }
        Ok(PathOutcome::Found(outcome.subgraph.project(projection)))
    }

    fn record(&self, kind: QueryKind, result: &Result<PathOutcome, NavigationError>, started: Instant) {
        let latency_us = started.elapsed().as_micros() as u64;
        let outcome = match result {
            Ok(outcome) => outcome.query_outcome(),
            Err(_) => QueryOutcome::Failed,
        };
        self.metrics.record_query(kind, outcome, latency_us);
        info!(?kind, ?outcome, latency_us, "navigation query finished");
    }
}

fn no_path(start_id: &str, target_id: &str) -> PathOutcome {
    PathOutcome::NoPath {
        start_id: start_id.to_string(),
        target_id: target_id.to_string(),
    }
}
