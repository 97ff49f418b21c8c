//! Logging and planning metrics for fuelroute
//!
//! This crate provides:
//! - Structured logging with tracing (compact text or JSON lines)
//! - A session id for correlating log lines from one run
//! - Planning counters and latency statistics

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global planning metrics
static METRICS: Lazy<PlanMetrics> = Lazy::new(PlanMetrics::new);

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize logging with defaults
pub fn init() -> anyhow::Result<()> {
    init_with_config(TelemetryConfig::default())
}

/// Initialize logging with custom configuration
///
/// `RUST_LOG` takes precedence over `log_level` when set.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    // Logs go to stderr so JSON reports on stdout stay machine-readable.
    let result = if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr).with_target(config.show_target))
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(config.show_target)
                    .with_file(config.show_file)
                    .with_line_number(config.show_line_number)
                    .compact(),
            )
            .try_init()
    };

    result.map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(())
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
    pub json: bool,
    pub show_target: bool,
    pub show_file: bool,
    pub show_line_number: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            show_target: false,
            show_file: false,
            show_line_number: false,
        }
    }
}

/// Counters and latency samples for route planning
pub struct PlanMetrics {
    plans: AtomicU64,
    failed_plans: AtomicU64,
    waypoints: AtomicU64,
    stops: AtomicU64,
    widened_searches: AtomicU64,
    missed_waypoints: AtomicU64,
    latencies_ms: RwLock<Vec<f64>>,
    start_time: Instant,
}

/// Outcome of one planning call, as fed to [`PlanMetrics::record_plan`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PlanSample {
    pub waypoints: usize,
    pub stops: usize,
    pub widened_searches: usize,
    pub missed_waypoints: usize,
}

impl PlanMetrics {
    fn new() -> Self {
        Self {
            plans: AtomicU64::new(0),
            failed_plans: AtomicU64::new(0),
            waypoints: AtomicU64::new(0),
            stops: AtomicU64::new(0),
            widened_searches: AtomicU64::new(0),
            missed_waypoints: AtomicU64::new(0),
            latencies_ms: RwLock::new(Vec::new()),
            start_time: Instant::now(),
        }
    }

    /// Record a successful planning call
    pub fn record_plan(&self, sample: PlanSample) {
        self.plans.fetch_add(1, Ordering::Relaxed);
        self.waypoints.fetch_add(sample.waypoints as u64, Ordering::Relaxed);
        self.stops.fetch_add(sample.stops as u64, Ordering::Relaxed);
        self.widened_searches
            .fetch_add(sample.widened_searches as u64, Ordering::Relaxed);
        self.missed_waypoints
            .fetch_add(sample.missed_waypoints as u64, Ordering::Relaxed);
    }

    /// Record a planning call rejected for bad input
    pub fn record_failure(&self) {
        self.failed_plans.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one planning latency
    pub fn record_latency(&self, duration: Duration) {
        if let Ok(mut samples) = self.latencies_ms.write() {
            samples.push(duration.as_secs_f64() * 1000.0);
        }
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Snapshot the current values
    pub fn snapshot(&self) -> MetricsSnapshot {
        let latency = self
            .latencies_ms
            .read()
            .map(|samples| LatencyStats::from_values(&samples))
            .unwrap_or_default();

        MetricsSnapshot {
            session_id: session_id().to_string(),
            uptime_secs: self.uptime_secs(),
            plans: self.plans.load(Ordering::Relaxed),
            failed_plans: self.failed_plans.load(Ordering::Relaxed),
            waypoints: self.waypoints.load(Ordering::Relaxed),
            stops: self.stops.load(Ordering::Relaxed),
            widened_searches: self.widened_searches.load(Ordering::Relaxed),
            missed_waypoints: self.missed_waypoints.load(Ordering::Relaxed),
            latency_ms: latency,
        }
    }

    /// Export metrics as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::to_value(self.snapshot()).unwrap_or(serde_json::Value::Null)
    }
}

/// Point-in-time copy of [`PlanMetrics`]
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub session_id: String,
    pub uptime_secs: u64,
    pub plans: u64,
    pub failed_plans: u64,
    pub waypoints: u64,
    pub stops: u64,
    pub widened_searches: u64,
    pub missed_waypoints: u64,
    pub latency_ms: LatencyStats,
}

/// Latency statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct LatencyStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

impl LatencyStats {
    fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let sum: f64 = sorted.iter().sum();

        Self {
            count,
            min: sorted[0],
            max: sorted[count - 1],
            mean: sum / count as f64,
            p50: percentile(&sorted, 50.0),
            p95: percentile(&sorted, 95.0),
            p99: percentile(&sorted, 99.0),
        }
    }
}

fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = ((p / 100.0) * (sorted.len() - 1) as f64).round() as usize;
    sorted[idx.min(sorted.len() - 1)]
}

/// Get the global planning metrics
pub fn metrics() -> &'static PlanMetrics {
    &METRICS
}

/// Timer for measuring planning latency
pub struct Timer {
    name: &'static str,
    start: Instant,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    /// Stop the timer and record the duration
    pub fn stop(self) -> Duration {
        let duration = self.start.elapsed();
        metrics().record_latency(duration);
        tracing::debug!(
            operation = self.name,
            duration_ms = duration.as_millis() as u64,
            "Timer completed"
        );
        duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_plan() {
        let registry = PlanMetrics::new();
        registry.record_plan(PlanSample { waypoints: 3, stops: 2, widened_searches: 1, missed_waypoints: 1 });
        registry.record_plan(PlanSample { waypoints: 1, stops: 1, ..PlanSample::default() });
        registry.record_failure();

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.plans, 2);
        assert_eq!(snapshot.failed_plans, 1);
        assert_eq!(snapshot.waypoints, 4);
        assert_eq!(snapshot.stops, 3);
        assert_eq!(snapshot.widened_searches, 1);
        assert_eq!(snapshot.missed_waypoints, 1);
    }

    #[test]
    fn test_latency_stats() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let stats = LatencyStats::from_values(&values);

        assert_eq!(stats.count, 10);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 10.0);
        assert_eq!(stats.mean, 5.5);
        assert_eq!(LatencyStats::from_values(&[]).count, 0);
    }

    #[test]
    fn test_export_json() {
        let registry = PlanMetrics::new();
        registry.record_latency(Duration::from_millis(4));
        let json = registry.export_json();
        assert_eq!(json["latency_ms"]["count"], 1);
        assert_eq!(json["plans"], 0);
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start("test_operation");
        std::thread::sleep(std::time::Duration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_session_id() {
        let id = session_id();
        assert!(!id.is_empty());
        assert!(Uuid::parse_str(id).is_ok());
    }
}
