//! Metrics collection and registry.

use crate::protection::AvailabilityTracker;
use prometheus::{Encoder, IntCounter, IntGauge, Registry, TextEncoder};
use thiserror::Error;

/// Errors that can occur during metrics operations.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),
}

/// A snapshot of tracker state for metrics update.
#[derive(Debug, Clone, Default)]
pub struct MetricsSnapshot {
    /// Whether protection is currently shown.
    pub is_active: bool,
    /// Whether a logical camera is open.
    pub camera_open: bool,
    /// Physical sensors currently unavailable.
    pub unavailable_physical: usize,
    /// Total events handled.
    pub events_processed: u64,
    /// Total activations.
    pub activations: u64,
    /// Total deactivations.
    pub deactivations: u64,
    /// Total opens by excluded packages.
    pub excluded_opens: u64,
}

impl MetricsSnapshot {
    /// Creates a snapshot from the current tracker state.
    pub fn from_tracker<R: Clone>(tracker: &AvailabilityTracker<R>) -> Self {
        let stats = tracker.stats();
        Self {
            is_active: tracker.is_protecting(),
            camera_open: tracker.open_camera().is_some(),
            unavailable_physical: tracker.unavailable_count(),
            events_processed: stats.events_processed,
            activations: stats.activations,
            deactivations: stats.deactivations,
            excluded_opens: stats.excluded_opens,
        }
    }
}

/// Prometheus metrics registry for camera protection.
pub struct MetricsRegistry {
    registry: Registry,

    // State
    active: IntGauge,
    camera_open: IntGauge,
    unavailable_physical: IntGauge,

    // Counters
    events_total: IntCounter,
    activations_total: IntCounter,
    deactivations_total: IntCounter,
    excluded_opens_total: IntCounter,
}

impl MetricsRegistry {
    /// Creates a new registry with all protection metrics registered.
    pub fn new() -> Result<Self, MetricsError> {
        let registry = Registry::new();

        let active = IntGauge::new(
            "camera_protection_active",
            "Camera protection currently shown (1=shown, 0=hidden)",
        )?;
        let camera_open = IntGauge::new(
            "camera_protection_camera_open",
            "Whether a logical camera is currently open",
        )?;
        let unavailable_physical = IntGauge::new(
            "camera_protection_unavailable_physical_cameras",
            "Number of physical cameras reported unavailable",
        )?;

        let events_total = IntCounter::new(
            "camera_protection_events_total",
            "Total camera availability events handled",
        )?;
        let activations_total = IntCounter::new(
            "camera_protection_activations_total",
            "Total times camera protection was shown",
        )?;
        let deactivations_total = IntCounter::new(
            "camera_protection_deactivations_total",
            "Total times camera protection was hidden",
        )?;
        let excluded_opens_total = IntCounter::new(
            "camera_protection_excluded_opens_total",
            "Total camera opens ignored because the package is excluded",
        )?;

        registry.register(Box::new(active.clone()))?;
        registry.register(Box::new(camera_open.clone()))?;
        registry.register(Box::new(unavailable_physical.clone()))?;
        registry.register(Box::new(events_total.clone()))?;
        registry.register(Box::new(activations_total.clone()))?;
        registry.register(Box::new(deactivations_total.clone()))?;
        registry.register(Box::new(excluded_opens_total.clone()))?;

        Ok(Self {
            registry,
            active,
            camera_open,
            unavailable_physical,
            events_total,
            activations_total,
            deactivations_total,
            excluded_opens_total,
        })
    }

    /// Updates all metrics from a snapshot of tracker state.
    pub fn update(&self, snapshot: &MetricsSnapshot) {
        self.active.set(i64::from(snapshot.is_active));
        self.camera_open.set(i64::from(snapshot.camera_open));
        self.unavailable_physical
            .set(snapshot.unavailable_physical as i64);

        // Counters only move forward, so apply the difference.
        advance(&self.events_total, snapshot.events_processed);
        advance(&self.activations_total, snapshot.activations);
        advance(&self.deactivations_total, snapshot.deactivations);
        advance(&self.excluded_opens_total, snapshot.excluded_opens);
    }

    /// Returns the underlying Prometheus registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Encodes all metrics in Prometheus text format.
    pub fn encode(&self) -> Result<String, MetricsError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

fn advance(counter: &IntCounter, total: u64) {
    let current = counter.get();
    if total > current {
        counter.inc_by(total - current);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protection::{ProtectionRule, ProtectionTable};

    #[test]
    fn test_registry_creation() {
        let registry = MetricsRegistry::new();
        assert!(registry.is_ok());
    }

    #[test]
    fn test_metrics_update() {
        let registry = MetricsRegistry::new().unwrap();

        let snapshot = MetricsSnapshot {
            is_active: true,
            camera_open: true,
            unavailable_physical: 2,
            events_processed: 5,
            activations: 2,
            deactivations: 1,
            excluded_opens: 1,
        };

        registry.update(&snapshot);
        // Re-applying the same totals must not double count.
        registry.update(&snapshot);

        let output = registry.encode().unwrap();
        assert!(output.contains("camera_protection_active 1"));
        assert!(output.contains("camera_protection_unavailable_physical_cameras 2"));
        assert!(output.contains("camera_protection_events_total 5"));
        assert!(output.contains("camera_protection_activations_total 2"));
        assert!(output.contains("camera_protection_excluded_opens_total 1"));
    }

    #[test]
    fn test_snapshot_from_tracker() {
        let table = ProtectionTable::new(vec![ProtectionRule::logical("0", ())]);
        let mut tracker = AvailabilityTracker::new(table);
        tracker.on_physical_unavailable("0", "3");
        tracker.on_camera_opened("0", "pkg.ok");

        let snapshot = MetricsSnapshot::from_tracker(&tracker);
        assert!(snapshot.is_active);
        assert!(snapshot.camera_open);
        assert_eq!(snapshot.unavailable_physical, 1);
        assert_eq!(snapshot.events_processed, 2);
        assert_eq!(snapshot.activations, 1);
    }

    #[test]
    fn test_metrics_encode() {
        let registry = MetricsRegistry::new().unwrap();
        let output = registry.encode().unwrap();

        assert!(output.contains("camera_protection_active"));
        assert!(output.contains("camera_protection_deactivations_total"));
    }
}
