//! Camera protection state machine and its execution context.
//!
//! The [`AvailabilityTracker`] turns availability events into at most one
//! [`Notification`] each. The [`ProtectionController`] runs it on a single
//! worker thread and fans notifications out to [`ProtectionListener`]s.

mod controller;
mod listener;
mod rule;
mod tracker;

#[cfg(test)]
mod proptests;

pub use controller::{ControllerError, ProtectionController};
pub use listener::{ListenerSet, ProtectionListener};
pub use rule::{ProtectionRule, ProtectionTable};
pub use tracker::{AvailabilityTracker, Notification, OpenCamera, TrackerSnapshot, TrackerStats};
