use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Request and cache counters exposed at `/metrics`.
#[derive(Clone)]
pub struct Metrics {
    pub reports_rendered: Arc<AtomicU64>,
    pub text_reports: Arc<AtomicU64>,
    pub not_found: Arc<AtomicU64>,
    pub snapshots_parsed: Arc<AtomicU64>,
    pub snapshot_cache_hits: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            reports_rendered: Arc::new(AtomicU64::new(0)),
            text_reports: Arc::new(AtomicU64::new(0)),
            not_found: Arc::new(AtomicU64::new(0)),
            snapshots_parsed: Arc::new(AtomicU64::new(0)),
            snapshot_cache_hits: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_reports_rendered(&self) {
        self.reports_rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_text_reports(&self) {
        self.text_reports.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_snapshots_parsed(&self) {
        self.snapshots_parsed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_snapshot_cache_hits(&self) {
        self.snapshot_cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            reports_rendered: self.reports_rendered.load(Ordering::Relaxed),
            text_reports: self.text_reports.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            snapshots_parsed: self.snapshots_parsed.load(Ordering::Relaxed),
            snapshot_cache_hits: self.snapshot_cache_hits.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub reports_rendered: u64,
    pub text_reports: u64,
    pub not_found: u64,
    pub snapshots_parsed: u64,
    pub snapshot_cache_hits: u64,
    pub uptime_seconds: u64,
}
