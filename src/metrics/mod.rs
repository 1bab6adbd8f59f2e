//! Prometheus metrics exporter for camera protection.
//!
//! Exposes the tracker's state and counters so dashboards can see how
//! often protection is shown and whether sensors are dropping out.
//!
//! # Metrics Exposed
//!
//! ## State
//! - `camera_protection_active` - Protection currently shown (1) or hidden (0)
//! - `camera_protection_camera_open` - A logical camera is open (1) or not (0)
//! - `camera_protection_unavailable_physical_cameras` - Physical sensors reported unavailable
//!
//! ## Counters
//! - `camera_protection_events_total` - Availability events handled
//! - `camera_protection_activations_total` - Protection shown notifications
//! - `camera_protection_deactivations_total` - Protection hidden notifications
//! - `camera_protection_excluded_opens_total` - Opens ignored for excluded packages
//!
//! # Example
//!
//! ```no_run
//! use camera_protection::metrics::{MetricsRegistry, MetricsSnapshot};
//!
//! let registry = MetricsRegistry::new().expect("Failed to create registry");
//!
//! let snapshot = MetricsSnapshot {
//!     is_active: true,
//!     camera_open: true,
//!     unavailable_physical: 1,
//!     events_processed: 4,
//!     activations: 1,
//!     deactivations: 0,
//!     excluded_opens: 0,
//! };
//!
//! registry.update(&snapshot);
//! ```

mod collector;
#[cfg(feature = "metrics")]
mod server;

pub use collector::{MetricsError, MetricsRegistry, MetricsSnapshot};
#[cfg(feature = "metrics")]
pub use server::{MetricsServer, MetricsServerConfig, ServerError};
