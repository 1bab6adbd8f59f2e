//! Property-based tests for the availability tracker.
//!
//! Ids are drawn from tiny alphabets so that generated events actually
//! collide with the generated rules.

use proptest::prelude::*;

use super::rule::{ProtectionRule, ProtectionTable};
use super::tracker::{AvailabilityTracker, Notification};
use crate::camera::CameraEvent;

const EXCLUDED: &str = "pkg.bad";

fn logical_id() -> impl Strategy<Value = String> {
    prop_oneof![Just("0".to_string()), Just("1".to_string())]
}

fn physical_id() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("2".to_string()),
        Just("3".to_string()),
        Just("4".to_string())
    ]
}

fn package_id() -> impl Strategy<Value = String> {
    prop_oneof![
        3 => Just("pkg.ok".to_string()),
        1 => Just(EXCLUDED.to_string())
    ]
}

/// Rules whose region is their index in the table.
fn table_strategy() -> impl Strategy<Value = ProtectionTable<usize>> {
    prop::collection::vec((logical_id(), prop::option::of(physical_id())), 0..4).prop_map(
        |entries| {
            let rules = entries
                .into_iter()
                .enumerate()
                .map(|(region, (logical, physical))| match physical {
                    Some(physical) => ProtectionRule::physical(logical, physical, region),
                    None => ProtectionRule::logical(logical, region),
                })
                .collect();
            ProtectionTable::new(rules).with_excluded_packages([EXCLUDED])
        },
    )
}

fn event_strategy() -> impl Strategy<Value = CameraEvent> {
    prop_oneof![
        logical_id().prop_map(CameraEvent::closed),
        (logical_id(), package_id()).prop_map(|(l, p)| CameraEvent::opened(l, p)),
        (logical_id(), physical_id()).prop_map(|(l, p)| CameraEvent::physical_available(l, p)),
        (logical_id(), physical_id()).prop_map(|(l, p)| CameraEvent::physical_unavailable(l, p)),
    ]
}

proptest! {
    /// Property: the active region is always the last one activated, and
    /// protection only changes through a notification.
    #[test]
    fn prop_active_region_is_last_activated(
        table in table_strategy(),
        events in prop::collection::vec(event_strategy(), 0..40),
    ) {
        let mut tracker = AvailabilityTracker::new(table);
        let mut shown: Option<usize> = None;
        let mut activated_by = String::new();

        for event in &events {
            let was_active = tracker.is_protecting();
            match tracker.handle(event) {
                Some(Notification::Activated(region)) => {
                    shown = Some(region);
                    activated_by = event.logical_id().to_string();
                }
                Some(Notification::Deactivated) => {
                    prop_assert!(was_active);
                    shown = None;
                }
                None => {}
            }

            let active = tracker.active_rule().map(|rule| *rule.region());
            prop_assert_eq!(active, shown);

            if let Some(rule) = tracker.active_rule() {
                prop_assert_eq!(rule.logical_id(), activated_by.as_str());
            }
        }
    }

    /// Property: closing a camera never leaves its protection active.
    #[test]
    fn prop_close_clears_owned_protection(
        table in table_strategy(),
        events in prop::collection::vec(event_strategy(), 0..40),
        closed in logical_id(),
    ) {
        let mut tracker = AvailabilityTracker::new(table);
        for event in &events {
            tracker.handle(event);
        }

        let owned = tracker
            .active_rule()
            .is_some_and(|rule| rule.logical_id() == closed);
        let notification = tracker.on_camera_closed(&closed);

        prop_assert_eq!(notification.is_some(), owned);
        prop_assert!(tracker.open_camera().is_none());
        if let Some(rule) = tracker.active_rule() {
            prop_assert_ne!(rule.logical_id(), closed.as_str());
        }
    }

    /// Property: an excluded package's open never activates protection.
    #[test]
    fn prop_excluded_open_never_activates(
        table in table_strategy(),
        events in prop::collection::vec(event_strategy(), 0..40),
        opened in logical_id(),
    ) {
        let mut tracker = AvailabilityTracker::new(table);
        for event in &events {
            tracker.handle(event);
        }

        let before = tracker.active_rule().map(|rule| *rule.region());
        prop_assert_eq!(tracker.on_camera_opened(&opened, EXCLUDED), None);
        prop_assert_eq!(tracker.active_rule().map(|rule| *rule.region()), before);
    }

    /// Property: a repeated available report changes nothing further.
    #[test]
    fn prop_available_twice_is_idempotent(
        table in table_strategy(),
        events in prop::collection::vec(event_strategy(), 0..40),
        logical in logical_id(),
        physical in physical_id(),
    ) {
        let mut once = AvailabilityTracker::new(table.clone());
        let mut twice = AvailabilityTracker::new(table);
        for event in &events {
            once.handle(event);
            twice.handle(event);
        }

        let first = once.on_physical_available(&logical, &physical);
        twice.on_physical_available(&logical, &physical);
        let second = twice.on_physical_available(&logical, &physical);

        let (a, b) = (once.snapshot(), twice.snapshot());
        prop_assert_eq!(a.active_region, b.active_region);
        prop_assert_eq!(a.open_camera, b.open_camera);
        prop_assert_eq!(a.unavailable_physical, b.unavailable_physical);
        prop_assert_eq!(&second, &first);
        if once.open_camera().is_none() {
            prop_assert_eq!(second, None);
        }
    }
}
