// Usage metrics module
//
// Lightweight counters for what the widget did during a session

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Session metrics
///
/// Atomic counters so the controller can record through a shared reference.
/// Logged once on shutdown.
#[derive(Debug)]
pub struct Metrics {
    /// Events handed to the router
    pub events_dispatched: AtomicU64,

    /// Events that ended in a committed snapshot
    pub commits: AtomicU64,

    /// Deletes the user declined
    pub declined: AtomicU64,

    /// Renders pushed to the surface
    pub renders: AtomicU64,

    /// Successful writes to the store
    pub saves: AtomicU64,

    /// Failed writes to the store
    pub save_errors: AtomicU64,

    /// Total time spent rendering in microseconds
    pub total_render_time_us: AtomicU64,

    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            events_dispatched: AtomicU64::new(0),
            commits: AtomicU64::new(0),
            declined: AtomicU64::new(0),
            renders: AtomicU64::new(0),
            saves: AtomicU64::new(0),
            save_errors: AtomicU64::new(0),
            total_render_time_us: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    pub fn record_event(&self) {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_commit(&self) {
        self.commits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_declined(&self) {
        self.declined.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a render and how long building the markup took
    pub fn record_render(&self, duration: Duration) {
        self.renders.fetch_add(1, Ordering::Relaxed);
        self.total_render_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_save(&self) {
        self.saves.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save_error(&self) {
        self.save_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    /// Average render time in microseconds
    pub fn avg_render_time_us(&self) -> f64 {
        let total = self.total_render_time_us.load(Ordering::Relaxed);
        let count = self.renders.load(Ordering::Relaxed);
        if count > 0 {
            total as f64 / count as f64
        } else {
            0.0
        }
    }

    /// Log metrics summary
    pub fn log_summary(&self) {
        tracing::info!("=== Session Metrics Summary ===");
        tracing::info!("Uptime: {:.2}s", self.uptime().as_secs_f64());
        tracing::info!(
            "Events: {} dispatched, {} committed, {} declined",
            self.events_dispatched.load(Ordering::Relaxed),
            self.commits.load(Ordering::Relaxed),
            self.declined.load(Ordering::Relaxed)
        );
        tracing::info!(
            "Renders: {} (avg: {:.1}us)",
            self.renders.load(Ordering::Relaxed),
            self.avg_render_time_us()
        );
        tracing::info!(
            "Saves: {}, errors: {}",
            self.saves.load(Ordering::Relaxed),
            self.save_errors.load(Ordering::Relaxed)
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new();
        assert_eq!(metrics.events_dispatched.load(Ordering::Relaxed), 0);
        assert_eq!(metrics.renders.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn test_event_counters() {
        let metrics = Metrics::new();

        metrics.record_event();
        metrics.record_event();
        metrics.record_commit();
        metrics.record_declined();
        metrics.record_save();
        metrics.record_save_error();

        assert_eq!(metrics.events_dispatched.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.commits.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.declined.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.saves.load(Ordering::Relaxed), 1);
        assert_eq!(metrics.save_errors.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_render_time() {
        let metrics = Metrics::new();

        metrics.record_render(Duration::from_micros(100));
        metrics.record_render(Duration::from_micros(300));

        assert_eq!(metrics.renders.load(Ordering::Relaxed), 2);
        assert_eq!(metrics.avg_render_time_us(), 200.0);
    }

    #[test]
    fn test_avg_render_time_no_renders() {
        let metrics = Metrics::new();
        assert_eq!(metrics.avg_render_time_us(), 0.0);
    }

    #[test]
    fn test_uptime() {
        let metrics = Metrics::new();
        thread::sleep(Duration::from_millis(10));
        assert!(metrics.uptime().as_millis() >= 10);
    }
}
