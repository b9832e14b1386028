//! Decision metrics with Prometheus text export

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// How a single evaluator call ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// Granted by the user/app grant scan
    Allowed,
    /// Rejected with the generic denial
    Denied,
    /// Internal context, no checks
    Bypassed,
    /// Decided by an object type's `permissible` hook and granted
    OverrideAllowed,
    /// Decided by an object type's `permissible` hook and rejected
    OverrideDenied,
    /// Failed for any reason other than a denial
    Error,
}

/// Engine decision metrics
#[derive(Debug, Clone, Default)]
pub struct EngineMetrics {
    /// Total evaluator calls
    pub total_checks: u64,

    /// Calls granted by grant scan
    pub allowed_decisions: u64,

    /// Calls denied by grant scan
    pub denied_decisions: u64,

    /// Internal bypasses
    pub internal_bypasses: u64,

    /// Calls decided by a `permissible` hook
    pub override_decisions: u64,

    /// Errors other than denials
    pub error_count: u64,

    /// Latency percentiles
    pub latency_p50_ms: f64,
    pub latency_p90_ms: f64,
    pub latency_p99_ms: f64,

    /// Average latency
    pub avg_latency_ms: f64,
}

impl EngineMetrics {
    /// Share of decided calls (granted or denied, hook included) that were
    /// granted
    pub fn allow_rate(&self) -> f64 {
        let total = self.allowed_decisions + self.denied_decisions;
        if total == 0 {
            0.0
        } else {
            self.allowed_decisions as f64 / total as f64
        }
    }
}

/// Metrics collector shared by every query of an authorizer
///
/// Counters are lock-free. Latency samples go into a bounded ring;
/// percentiles are computed only when metrics are read.
pub struct MetricsCollector {
    total_checks: AtomicU64,
    allowed_decisions: AtomicU64,
    denied_decisions: AtomicU64,
    internal_bypasses: AtomicU64,
    override_decisions: AtomicU64,
    error_count: AtomicU64,

    /// Recent latency samples (ms), oldest first
    latency_samples: Mutex<VecDeque<f64>>,

    max_samples: usize,
}

impl MetricsCollector {
    /// Create a new metrics collector keeping the last 10,000 samples
    pub fn new() -> Self {
        Self::with_max_samples(10_000)
    }

    /// Create a collector keeping at most `max_samples` latency samples
    pub fn with_max_samples(max_samples: usize) -> Self {
        let max_samples = max_samples.max(1);
        Self {
            total_checks: AtomicU64::new(0),
            allowed_decisions: AtomicU64::new(0),
            denied_decisions: AtomicU64::new(0),
            internal_bypasses: AtomicU64::new(0),
            override_decisions: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
            latency_samples: Mutex::new(VecDeque::with_capacity(max_samples)),
            max_samples,
        }
    }

    /// Record the outcome of one evaluator call
    pub fn record_outcome(&self, outcome: DecisionOutcome) {
        self.total_checks.fetch_add(1, Ordering::Relaxed);

        match outcome {
            DecisionOutcome::Allowed => self.allowed_decisions.fetch_add(1, Ordering::Relaxed),
            DecisionOutcome::Denied => self.denied_decisions.fetch_add(1, Ordering::Relaxed),
            DecisionOutcome::Bypassed => self.internal_bypasses.fetch_add(1, Ordering::Relaxed),
            DecisionOutcome::OverrideAllowed => {
                self.override_decisions.fetch_add(1, Ordering::Relaxed);
                self.allowed_decisions.fetch_add(1, Ordering::Relaxed)
            }
            DecisionOutcome::OverrideDenied => {
                self.override_decisions.fetch_add(1, Ordering::Relaxed);
                self.denied_decisions.fetch_add(1, Ordering::Relaxed)
            }
            DecisionOutcome::Error => self.error_count.fetch_add(1, Ordering::Relaxed),
        };
    }

    /// Record call latency
    pub fn record_latency(&self, latency: Duration) {
        let latency_ms = latency.as_secs_f64() * 1000.0;

        let mut samples = self.latency_samples.lock();
        while samples.len() >= self.max_samples {
            samples.pop_front();
        }
        samples.push_back(latency_ms);
    }

    /// Number of latency samples currently retained
    pub fn sample_count(&self) -> usize {
        self.latency_samples.lock().len()
    }

    /// Get current metrics snapshot
    pub fn get_metrics(&self) -> EngineMetrics {
        // Copy out under the lock, sort outside it
        let mut sorted: Vec<f64> = self.latency_samples.lock().iter().copied().collect();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let avg_latency_ms = if sorted.is_empty() {
            0.0
        } else {
            sorted.iter().sum::<f64>() / sorted.len() as f64
        };

        EngineMetrics {
            total_checks: self.total_checks.load(Ordering::Relaxed),
            allowed_decisions: self.allowed_decisions.load(Ordering::Relaxed),
            denied_decisions: self.denied_decisions.load(Ordering::Relaxed),
            internal_bypasses: self.internal_bypasses.load(Ordering::Relaxed),
            override_decisions: self.override_decisions.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
            latency_p50_ms: Self::percentile(&sorted, 0.50),
            latency_p90_ms: Self::percentile(&sorted, 0.90),
            latency_p99_ms: Self::percentile(&sorted, 0.99),
            avg_latency_ms,
        }
    }

    /// Reset all metrics
    pub fn reset(&self) {
        for counter in [
            &self.total_checks,
            &self.allowed_decisions,
            &self.denied_decisions,
            &self.internal_bypasses,
            &self.override_decisions,
            &self.error_count,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        self.latency_samples.lock().clear();
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let metrics = self.get_metrics();

        format!(
            r#"# HELP authz_checks_total Total number of authorization checks
# TYPE authz_checks_total counter
authz_checks_total {}

# HELP authz_allowed_total Number of allowed decisions
# TYPE authz_allowed_total counter
authz_allowed_total {}

# HELP authz_denied_total Number of denied decisions
# TYPE authz_denied_total counter
authz_denied_total {}

# HELP authz_internal_bypass_total Internal context bypasses
# TYPE authz_internal_bypass_total counter
authz_internal_bypass_total {}

# HELP authz_override_total Decisions made by permissible hooks
# TYPE authz_override_total counter
authz_override_total {}

# HELP authz_latency_seconds Check latency percentiles
# TYPE authz_latency_seconds summary
authz_latency_seconds{{quantile="0.5"}} {}
authz_latency_seconds{{quantile="0.9"}} {}
authz_latency_seconds{{quantile="0.99"}} {}

# HELP authz_errors_total Error count
# TYPE authz_errors_total counter
authz_errors_total {}
"#,
            metrics.total_checks,
            metrics.allowed_decisions,
            metrics.denied_decisions,
            metrics.internal_bypasses,
            metrics.override_decisions,
            metrics.latency_p50_ms / 1000.0,
            metrics.latency_p90_ms / 1000.0,
            metrics.latency_p99_ms / 1000.0,
            metrics.error_count,
        )
    }

    fn percentile(sorted: &[f64], p: f64) -> f64 {
        if sorted.is_empty() {
            return 0.0;
        }

        let idx = ((sorted.len() as f64) * p) as usize;
        let idx = idx.min(sorted.len() - 1);
        sorted[idx]
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}
