//! Camera availability state machine.
//!
//! Consumes availability events and decides whether cutout protection
//! should be shown, and for which configured rule. Every handler is
//! infallible and yields at most one notification.

use super::rule::{ProtectionRule, ProtectionTable};
use crate::camera::CameraEvent;
use std::collections::HashSet;

/// Outcome of a handled event that listeners must hear about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification<R> {
    /// Protection should be shown for this region.
    Activated(R),
    /// Protection should be hidden.
    Deactivated,
}

/// The logical camera currently open and the client that opened it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCamera {
    pub logical_id: String,
    pub package_id: String,
}

/// Running counters kept by the tracker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Total events handled.
    pub events_processed: u64,
    /// Activated notifications produced.
    pub activations: u64,
    /// Deactivated notifications produced.
    pub deactivations: u64,
    /// Opens ignored because the package is excluded.
    pub excluded_opens: u64,
}

/// Point-in-time copy of the tracker state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerSnapshot<R> {
    pub open_camera: Option<OpenCamera>,
    pub active_region: Option<R>,
    /// Sorted for stable output.
    pub unavailable_physical: Vec<String>,
    pub stats: TrackerStats,
}

/// Tracks open cameras and sensor availability against a rule table.
///
/// Initial state: no open camera, no unavailable sensors, no active
/// protection. The unavailable set reflects hardware state and survives
/// open/close cycles.
#[derive(Debug)]
pub struct AvailabilityTracker<R> {
    table: ProtectionTable<R>,
    open_camera: Option<OpenCamera>,
    unavailable_physical: HashSet<String>,
    /// Index into `table.rules()`.
    active: Option<usize>,
    stats: TrackerStats,
}

impl<R: Clone> AvailabilityTracker<R> {
    pub fn new(table: ProtectionTable<R>) -> Self {
        Self {
            table,
            open_camera: None,
            unavailable_physical: HashSet::new(),
            active: None,
            stats: TrackerStats::default(),
        }
    }

    /// Dispatches an event to its handler.
    pub fn handle(&mut self, event: &CameraEvent) -> Option<Notification<R>> {
        match event {
            CameraEvent::CameraClosed { logical_id } => self.on_camera_closed(logical_id),
            CameraEvent::CameraOpened {
                logical_id,
                package_id,
            } => self.on_camera_opened(logical_id, package_id),
            CameraEvent::PhysicalCameraAvailable {
                logical_id,
                physical_id,
            } => self.on_physical_available(logical_id, physical_id),
            CameraEvent::PhysicalCameraUnavailable {
                logical_id,
                physical_id,
            } => self.on_physical_unavailable(logical_id, physical_id),
        }
    }

    pub fn on_camera_closed(&mut self, logical_id: &str) -> Option<Notification<R>> {
        self.stats.events_processed += 1;
        tracing::debug!(logical_id, "Camera closed");

        self.open_camera = None;

        // Protection never outlives the session that owns it.
        let owned = self
            .active_rule()
            .is_some_and(|rule| rule.logical_id() == logical_id);
        owned.then(|| self.deactivate())
    }

    pub fn on_camera_opened(
        &mut self,
        logical_id: &str,
        package_id: &str,
    ) -> Option<Notification<R>> {
        self.stats.events_processed += 1;
        tracing::debug!(logical_id, package_id, "Camera opened");

        self.open_camera = Some(OpenCamera {
            logical_id: logical_id.to_string(),
            package_id: package_id.to_string(),
        });

        if self.table.is_excluded(package_id) {
            self.stats.excluded_opens += 1;
            tracing::debug!(package_id, "Package excluded from camera protection");
            return None;
        }

        // A miss leaves any existing selection alone, even one owned by
        // another logical camera.
        let index = self
            .table
            .rules()
            .iter()
            .position(|rule| rule.eligible_on_open(logical_id, &self.unavailable_physical))?;
        Some(self.activate(index))
    }

    pub fn on_physical_available(
        &mut self,
        logical_id: &str,
        physical_id: &str,
    ) -> Option<Notification<R>> {
        self.stats.events_processed += 1;
        tracing::debug!(logical_id, physical_id, "Physical camera available");

        self.unavailable_physical.remove(physical_id);

        let open = self.open_camera.as_ref()?;
        if open.logical_id != logical_id || self.table.is_excluded(&open.package_id) {
            return None;
        }

        let index = self
            .table
            .rules()
            .iter()
            .position(|rule| rule.matches_sensor(logical_id, physical_id))?;
        Some(self.activate(index))
    }

    pub fn on_physical_unavailable(
        &mut self,
        logical_id: &str,
        physical_id: &str,
    ) -> Option<Notification<R>> {
        self.stats.events_processed += 1;
        tracing::debug!(logical_id, physical_id, "Physical camera unavailable");

        self.unavailable_physical.insert(physical_id.to_string());

        let backing = self
            .active_rule()
            .is_some_and(|rule| rule.matches_sensor(logical_id, physical_id));
        backing.then(|| self.deactivate())
    }

    fn activate(&mut self, index: usize) -> Notification<R> {
        self.active = Some(index);
        self.stats.activations += 1;

        let rule = &self.table.rules()[index];
        tracing::info!(
            logical_id = rule.logical_id(),
            physical_id = rule.physical_id(),
            "Camera protection activated"
        );
        Notification::Activated(rule.region().clone())
    }

    fn deactivate(&mut self) -> Notification<R> {
        self.active = None;
        self.stats.deactivations += 1;
        tracing::info!("Camera protection deactivated");
        Notification::Deactivated
    }

    /// Rule currently driving protection, if any.
    pub fn active_rule(&self) -> Option<&ProtectionRule<R>> {
        self.active.map(|index| &self.table.rules()[index])
    }

    pub fn is_protecting(&self) -> bool {
        self.active.is_some()
    }

    pub fn open_camera(&self) -> Option<&OpenCamera> {
        self.open_camera.as_ref()
    }

    pub fn is_physical_unavailable(&self, physical_id: &str) -> bool {
        self.unavailable_physical.contains(physical_id)
    }

    pub fn unavailable_count(&self) -> usize {
        self.unavailable_physical.len()
    }

    pub fn stats(&self) -> &TrackerStats {
        &self.stats
    }

    pub fn table(&self) -> &ProtectionTable<R> {
        &self.table
    }

    pub fn snapshot(&self) -> TrackerSnapshot<R> {
        let mut unavailable_physical: Vec<String> =
            self.unavailable_physical.iter().cloned().collect();
        unavailable_physical.sort();

        TrackerSnapshot {
            open_camera: self.open_camera.clone(),
            active_region: self.active_rule().map(|rule| rule.region().clone()),
            unavailable_physical,
            stats: self.stats.clone(),
        }
    }
}
