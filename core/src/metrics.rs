use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    Unweighted,
    Weighted,
    Exploratory,
    Hybrid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryOutcome {
    Found,
    NoPath,
    Failed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KindCounters {
    pub unweighted: u64,
    pub weighted: u64,
    pub exploratory: u64,
    pub hybrid: u64,
}

impl KindCounters {
    fn bump(&mut self, kind: QueryKind) {
        match kind {
            QueryKind::Unweighted => self.unweighted += 1,
            QueryKind::Weighted => self.weighted += 1,
            QueryKind::Exploratory => self.exploratory += 1,
            QueryKind::Hybrid => self.hybrid += 1,
        }
    }
}

#[derive(Debug, Clone, Default)]
struct NavigationMetrics {
    total_queries: u64,
    per_kind: KindCounters,
    no_path: u64,
    failures: u64,
    hybrid_fallbacks: u64,
    unreached_targets: u64,
    latencies: VecDeque<u64>, // microseconds
}

pub struct MetricsCollector {
    state: Arc<Mutex<MetricsState>>,
}

struct MetricsState {
    metrics: NavigationMetrics,
    max_history: usize,
}

impl MetricsCollector {
    pub fn new(max_history: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(MetricsState {
                metrics: NavigationMetrics::default(),
                max_history: max_history.max(1),
            })),
        }
    }

    // Poisoning is ignored: the state is plain counters.
    fn lock(&self) -> MutexGuard<'_, MetricsState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn record_query(&self, kind: QueryKind, outcome: QueryOutcome, latency_us: u64) {
        let mut state = self.lock();
        let max_history = state.max_history;
        let m = &mut state.metrics;
        m.total_queries += 1;
        m.per_kind.bump(kind);
        match outcome {
            QueryOutcome::Found => {}
            QueryOutcome::NoPath => m.no_path += 1,
            QueryOutcome::Failed => m.failures += 1,
        }
        m.latencies.push_back(latency_us);
        if m.latencies.len() > max_history {
            m.latencies.pop_front();
        }
    }

    pub fn record_hybrid_fallback(&self, target_reached: bool) {
        let mut state = self.lock();
        state.metrics.hybrid_fallbacks += 1;
        if !target_reached {
            state.metrics.unreached_targets += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let state = self.lock();
        let m = &state.metrics;

        let mut sorted_latencies: Vec<u64> = m.latencies.iter().copied().collect();
        sorted_latencies.sort_unstable();

        MetricsSnapshot {
            total_queries: m.total_queries,
            per_kind: m.per_kind,
            no_path: m.no_path,
            failures: m.failures,
            hybrid_fallbacks: m.hybrid_fallbacks,
            unreached_targets: m.unreached_targets,
            p50: percentile(&sorted_latencies, 50.0),
            p95: percentile(&sorted_latencies, 95.0),
            p99: percentile(&sorted_latencies, 99.0),
            history_count: m.latencies.len(),
        }
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(1_024)
    }
}

fn percentile(sorted: &[u64], p: f32) -> u64 {
    if sorted.is_empty() {
        return 0;
    }
    let idx = ((p / 100.0) * (sorted.len() as f32)).ceil() as usize;
    sorted[idx.saturating_sub(1).min(sorted.len() - 1)]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub total_queries: u64,
    pub per_kind: KindCounters,
    pub no_path: u64,
    pub failures: u64,
    pub hybrid_fallbacks: u64,
    pub unreached_targets: u64,
    pub p50: u64,
    pub p95: u64,
    pub p99: u64,
    pub history_count: usize,
}
