//! Camera service abstraction for availability subscriptions.
//!
//! This module provides a trait-based abstraction over the host camera
//! service, allowing for both a platform binding and an in-memory mock
//! that tests and the CLI drive by hand.

use super::CameraEvent;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur while subscribing to the camera service.
#[derive(Debug, Error)]
pub enum CameraServiceError {
    #[error("camera service unavailable: {0}")]
    ServiceUnavailable(String),
    #[error("availability callback already registered")]
    AlreadyRegistered,
}

/// Handle through which a camera service pushes events to a subscriber.
///
/// Cheap to clone and safe to call from any thread. Delivery only enqueues
/// the event; handling happens on the subscriber's own context.
#[derive(Clone)]
pub struct EventSink {
    deliver: Arc<dyn Fn(CameraEvent) -> bool + Send + Sync>,
}

impl EventSink {
    /// Wraps a delivery function. It returns `false` once the receiving
    /// side has gone away.
    pub fn new<F>(deliver: F) -> Self
    where
        F: Fn(CameraEvent) -> bool + Send + Sync + 'static,
    {
        Self {
            deliver: Arc::new(deliver),
        }
    }

    /// Pushes one event. Returns `false` if it was dropped.
    pub fn deliver(&self, event: CameraEvent) -> bool {
        (self.deliver)(event)
    }
}

impl fmt::Debug for EventSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventSink").finish_non_exhaustive()
    }
}

/// Trait for camera service implementations.
///
/// A service holds at most one availability callback at a time.
pub trait CameraService {
    /// Starts delivering availability events to `sink`.
    fn register_availability_callback(&mut self, sink: EventSink)
        -> Result<(), CameraServiceError>;

    /// Stops delivering events. A no-op when nothing is registered.
    fn unregister_availability_callback(&mut self);

    /// Checks if a callback is currently registered.
    fn is_registered(&self) -> bool;
}

/// In-memory camera service whose events are injected by the caller.
#[derive(Debug, Default)]
pub struct MockCameraService {
    sink: Option<EventSink>,
    unavailable: bool,
    delivered: u64,
}

impl MockCameraService {
    pub fn new() -> Self {
        Self::default()
    }

    /// A service that refuses every registration, as when the host
    /// camera service cannot be reached.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Number of events handed to a registered sink.
    pub fn delivered(&self) -> u64 {
        self.delivered
    }

    pub fn open_camera(&mut self, logical_id: &str, package_id: &str) -> bool {
        self.emit(CameraEvent::opened(logical_id, package_id))
    }

    pub fn close_camera(&mut self, logical_id: &str) -> bool {
        self.emit(CameraEvent::closed(logical_id))
    }

    pub fn set_physical_available(&mut self, logical_id: &str, physical_id: &str) -> bool {
        self.emit(CameraEvent::physical_available(logical_id, physical_id))
    }

    pub fn set_physical_unavailable(&mut self, logical_id: &str, physical_id: &str) -> bool {
        self.emit(CameraEvent::physical_unavailable(logical_id, physical_id))
    }

    /// Delivers an arbitrary event. Returns `false` when no callback is
    /// registered or the subscriber is gone.
    pub fn emit(&mut self, event: CameraEvent) -> bool {
        let Some(sink) = self.sink.as_ref() else {
            tracing::trace!(kind = event.kind(), "No availability callback, event dropped");
            return false;
        };
        let accepted = sink.deliver(event);
        if accepted {
            self.delivered += 1;
        }
        accepted
    }
}

impl CameraService for MockCameraService {
    fn register_availability_callback(
        &mut self,
        sink: EventSink,
    ) -> Result<(), CameraServiceError> {
        if self.unavailable {
            return Err(CameraServiceError::ServiceUnavailable(
                "mock service configured as unavailable".into(),
            ));
        }
        if self.sink.is_some() {
            return Err(CameraServiceError::AlreadyRegistered);
        }
        self.sink = Some(sink);
        tracing::info!("MockCameraService availability callback registered");
        Ok(())
    }

    fn unregister_availability_callback(&mut self) {
        if self.sink.take().is_some() {
            tracing::info!("MockCameraService availability callback unregistered");
        }
    }

    fn is_registered(&self) -> bool {
        self.sink.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recording_sink() -> (EventSink, Arc<Mutex<Vec<CameraEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let store = Arc::clone(&seen);
        let sink = EventSink::new(move |event| {
            store.lock().unwrap().push(event);
            true
        });
        (sink, seen)
    }

    #[test]
    fn test_mock_service_lifecycle() {
        let mut service = MockCameraService::new();
        let (sink, seen) = recording_sink();

        assert!(!service.is_registered());
        assert!(!service.open_camera("0", "pkg"));

        service.register_availability_callback(sink).unwrap();
        assert!(service.is_registered());

        assert!(service.open_camera("0", "pkg"));
        assert!(service.set_physical_unavailable("0", "2"));
        assert!(service.close_camera("0"));
        assert_eq!(service.delivered(), 3);

        service.unregister_availability_callback();
        assert!(!service.is_registered());
        assert!(!service.close_camera("0"));

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                CameraEvent::opened("0", "pkg"),
                CameraEvent::physical_unavailable("0", "2"),
                CameraEvent::closed("0"),
            ]
        );
    }

    #[test]
    fn test_double_registration_rejected() {
        let mut service = MockCameraService::new();
        let (sink, _) = recording_sink();

        service.register_availability_callback(sink.clone()).unwrap();
        assert!(matches!(
            service.register_availability_callback(sink),
            Err(CameraServiceError::AlreadyRegistered)
        ));
    }

    #[test]
    fn test_unavailable_service() {
        let mut service = MockCameraService::unavailable();
        let (sink, _) = recording_sink();

        assert!(matches!(
            service.register_availability_callback(sink),
            Err(CameraServiceError::ServiceUnavailable(_))
        ));
        assert!(!service.is_registered());
    }

    #[test]
    fn test_rejected_delivery_not_counted() {
        let mut service = MockCameraService::new();
        service
            .register_availability_callback(EventSink::new(|_| false))
            .unwrap();

        assert!(!service.open_camera("0", "pkg"));
        assert_eq!(service.delivered(), 0);
    }
}
