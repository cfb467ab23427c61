//! HTTP handlers for the extraction API
//!
//! - `POST /extract` - run the extraction pipeline for one URL
//! - `GET /health` - liveness check
//! - `GET /status` - uptime, extraction counts and latency

pub mod extract;
pub mod status;

use std::sync::Arc;

use crate::orchestrator::Extract;

pub use extract::{extract_handler, ErrorResponse, ExtractBody};
pub use status::{
    health_handler, status_handler, ExtractionCounts, ExtractionStats, HealthResponse,
    LatencyHistogram, LatencyMetrics, StatusResponse, SERVER_NAME, SERVER_VERSION,
};

/// Shared state of the HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// The extraction pipeline
    pub extractor: Arc<dyn Extract>,
    /// Served extraction statistics
    pub stats: Arc<ExtractionStats>,
}

impl AppState {
    /// Create state around an extractor, with fresh statistics
    pub fn new(extractor: Arc<dyn Extract>) -> Self {
        Self {
            extractor,
            stats: Arc::new(ExtractionStats::new()),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
