//! Status and health check handlers.
//!
//! - `/status` - Server status with extraction counters and latency
//! - `/health` - Simple liveness check
//!
//! # Architecture
//!
//! ```text
//! HTTP Request ──> Axum Router ──> status_handler ──> AppState.stats
//!                                        │                 │
//!                                        ▼                 ▼
//!                              StatusResponse    LatencyHistogram
//!                                        │        + method counters
//!                                        ▼
//!                                   JSON Response
//! ```
//!
//! # Example Response
//!
//! ```json
//! {
//!   "version": "0.1.0",
//!   "name": "rsvp-extract",
//!   "uptime_seconds": 3600,
//!   "extractions": { "total": 40, "fast": 31, "render": 7, "failed": 2 },
//!   "latency": {
//!     "p50_ms": 412.0,
//!     "p95_ms": 6150.2,
//!     "p99_ms": 9800.7,
//!     "total_requests": 40,
//!     "mean_ms": 1320.4,
//!     "max_ms": 11002.0
//!   },
//!   "status": "running",
//!   "timestamp": "2026-01-01T12:00:00+00:00"
//! }
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use hdrhistogram::Histogram;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::AppState;
use crate::types::ExtractionMethod;

/// Server version from Cargo.toml
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Server name from Cargo.toml
pub const SERVER_NAME: &str = env!("CARGO_PKG_NAME");

/// Largest latency the histogram tracks (120 seconds, in microseconds)
const MAX_TRACKED_LATENCY_US: u64 = 120_000_000;

// ============================================================================
// Response Types
// ============================================================================

/// Health check response for liveness probes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Health status (always "ok" if responding)
    pub status: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
        }
    }
}

/// Server status response with extraction statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server version (from Cargo.toml)
    pub version: String,

    /// Server name
    pub name: String,

    /// Server uptime in seconds
    pub uptime_seconds: u64,

    /// Extraction counts by method
    pub extractions: ExtractionCounts,

    /// Extraction latency statistics (percentiles)
    pub latency: LatencyMetrics,

    /// Server status (always "running" if responding)
    pub status: String,

    /// RFC 3339 timestamp of when status was generated
    pub timestamp: String,
}

/// Extraction counts by outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionCounts {
    /// All extractions
    pub total: u64,
    /// Accepted from the fast path
    pub fast: u64,
    /// Accepted from the render path
    pub render: u64,
    /// Failed on both paths
    pub failed: u64,
}

/// Latency percentile metrics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LatencyMetrics {
    /// 50th percentile (median) latency in milliseconds
    pub p50_ms: f64,

    /// 95th percentile latency in milliseconds
    pub p95_ms: f64,

    /// 99th percentile latency in milliseconds
    pub p99_ms: f64,

    /// Total number of requests recorded
    pub total_requests: u64,

    /// Mean latency in milliseconds
    pub mean_ms: f64,

    /// Maximum latency recorded in milliseconds
    pub max_ms: f64,
}

// ============================================================================
// Latency Histogram
// ============================================================================

/// Thread-safe latency histogram.
///
/// Tracks latencies from 1 microsecond to 120 seconds with 3 significant
/// figures; a render fallback can take tens of seconds.
#[derive(Debug)]
pub struct LatencyHistogram {
    inner: RwLock<Histogram<u64>>,
}

impl LatencyHistogram {
    /// Create a new latency histogram.
    pub fn new() -> Self {
        let histogram = Histogram::new_with_bounds(1, MAX_TRACKED_LATENCY_US, 3)
            .expect("constant histogram bounds are valid");
        Self {
            inner: RwLock::new(histogram),
        }
    }

    /// Record a latency value in microseconds.
    ///
    /// Values above the tracked range are clamped to it.
    pub fn record(&self, latency_us: u64) {
        let mut hist = self.inner.write();
        let _ = hist.record(latency_us.clamp(1, MAX_TRACKED_LATENCY_US));
    }

    /// Record a latency duration.
    pub fn record_duration(&self, duration: Duration) {
        self.record(duration.as_micros().min(u64::MAX as u128) as u64);
    }

    /// Get the total count of recorded values.
    pub fn count(&self) -> u64 {
        self.inner.read().len()
    }

    /// Get the maximum recorded latency in microseconds.
    pub fn max(&self) -> u64 {
        self.inner.read().max()
    }

    /// Get complete latency metrics in milliseconds.
    pub fn metrics(&self) -> LatencyMetrics {
        let hist = self.inner.read();
        LatencyMetrics {
            p50_ms: hist.value_at_percentile(50.0) as f64 / 1000.0,
            p95_ms: hist.value_at_percentile(95.0) as f64 / 1000.0,
            p99_ms: hist.value_at_percentile(99.0) as f64 / 1000.0,
            total_requests: hist.len(),
            mean_ms: hist.mean() / 1000.0,
            max_ms: hist.max() as f64 / 1000.0,
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Extraction Statistics
// ============================================================================

/// Counters and latencies of served extractions.
///
/// Observability only; the extraction pipeline never reads them.
#[derive(Debug)]
pub struct ExtractionStats {
    start_time: Instant,
    fast: AtomicU64,
    render: AtomicU64,
    failed: AtomicU64,
    latency: LatencyHistogram,
}

impl ExtractionStats {
    /// Create empty statistics; uptime starts now.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            fast: AtomicU64::new(0),
            render: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            latency: LatencyHistogram::new(),
        }
    }

    /// Get the server uptime in seconds.
    #[inline]
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Record one finished extraction.
    pub fn record(&self, method: ExtractionMethod, elapsed: Duration) {
        let counter = match method {
            ExtractionMethod::Fast => &self.fast,
            ExtractionMethod::Render => &self.render,
            ExtractionMethod::Failed => &self.failed,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        self.latency.record_duration(elapsed);
    }

    /// Snapshot of the per-method counters.
    pub fn counts(&self) -> ExtractionCounts {
        let fast = self.fast.load(Ordering::Relaxed);
        let render = self.render.load(Ordering::Relaxed);
        let failed = self.failed.load(Ordering::Relaxed);
        ExtractionCounts {
            total: fast + render + failed,
            fast,
            render,
            failed,
        }
    }

    /// Get the latency metrics.
    #[inline]
    pub fn latency_metrics(&self) -> LatencyMetrics {
        self.latency.metrics()
    }
}

impl Default for ExtractionStats {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HTTP Handlers
// ============================================================================

/// Health check endpoint handler.
///
/// # Route
/// `GET /health`
///
/// # Response
/// - `200 OK` with `{"status":"ok"}`
#[instrument(skip_all)]
pub async fn health_handler() -> impl IntoResponse {
    debug!("Health check requested");
    (StatusCode::OK, Json(HealthResponse::default()))
}

/// Status endpoint handler.
///
/// # Route
/// `GET /status`
///
/// # Example
///
/// ```bash
/// curl http://localhost:8000/status
/// ```
#[instrument(skip_all)]
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Status check requested");

    let response = StatusResponse {
        version: SERVER_VERSION.to_string(),
        name: SERVER_NAME.to_string(),
        uptime_seconds: state.stats.uptime_seconds(),
        extractions: state.stats.counts(),
        latency: state.stats.latency_metrics(),
        status: "running".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(response))
}

// ============================================================================
// Tests
// ============================================================================
