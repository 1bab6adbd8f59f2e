//! Camera availability events and the host service seam.
//!
//! The host camera service reports which logical cameras are open and
//! which physical sensors behind them are usable. This module types those
//! reports and abstracts the subscription so the protection logic never
//! talks to a platform API directly.

mod event;
mod service;

pub use event::CameraEvent;
pub use service::{CameraService, CameraServiceError, EventSink, MockCameraService};
