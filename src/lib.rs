//! Camera Cutout Protection Library
//!
//! Watches camera availability and decides when a display overlay should
//! draw extra protection around a lens cutout, and for which configured
//! region. Drawing the overlay is left to listeners.
//!
//! # Architecture
//!
//! ```text
//! camera service → EventSink → controller worker → tracker → listeners
//!                                     ↓
//!                                  metrics
//! ```
//!
//! # Design Principles
//!
//! - **Serialized**: every event and listener change runs on one worker, in order
//! - **Session-bound**: protection never outlives the camera session that raised it
//! - **Infallible core**: unknown ids simply match nothing
//! - **Opaque regions**: the tracker forwards region handles, it never inspects them
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use camera_protection::{
//!     camera::MockCameraService,
//!     config::{FileConfig, ProtectionRegion},
//!     protection::{ProtectionController, ProtectionListener},
//! };
//!
//! struct Overlay;
//!
//! impl ProtectionListener<ProtectionRegion> for Overlay {
//!     fn on_apply_protection(&self, region: &ProtectionRegion) {
//!         println!("show {}", region);
//!     }
//!
//!     fn on_hide_protection(&self) {
//!         println!("hide");
//!     }
//! }
//!
//! let config = FileConfig::from_file("camera-protection.toml").unwrap();
//! let mut controller = ProtectionController::new(config.protection_table().unwrap()).unwrap();
//! controller.add_listener(Arc::new(Overlay));
//!
//! let mut service = MockCameraService::new();
//! controller.start_listening(&mut service).unwrap();
//!
//! service.open_camera("1", "com.example.camera");
//! service.close_camera("1");
//! controller.sync().unwrap();
//! ```

#![warn(rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod camera;
pub mod config;
pub mod metrics;
pub mod protection;

// Re-export commonly used types at crate root
pub use camera::{CameraEvent, CameraService, EventSink, MockCameraService};
pub use config::{ConfigError, FileConfig, ProtectionRegion};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use protection::{
    AvailabilityTracker, Notification, ProtectionController, ProtectionListener, ProtectionRule,
    ProtectionTable,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
