//! Protection rules and the static rule table.

use std::collections::HashSet;

/// One configured protected sensor.
///
/// A rule without a physical id covers its logical camera no matter which
/// sensor backs it. A rule with one only applies while that sensor is
/// usable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionRule<R> {
    logical_id: String,
    physical_id: Option<String>,
    region: R,
}

impl<R> ProtectionRule<R> {
    /// Rule covering a whole logical camera.
    pub fn logical(logical_id: impl Into<String>, region: R) -> Self {
        Self {
            logical_id: logical_id.into(),
            physical_id: None,
            region,
        }
    }

    /// Rule tied to one physical sensor of a logical camera.
    pub fn physical(
        logical_id: impl Into<String>,
        physical_id: impl Into<String>,
        region: R,
    ) -> Self {
        Self {
            logical_id: logical_id.into(),
            physical_id: Some(physical_id.into()),
            region,
        }
    }

    #[inline]
    pub fn logical_id(&self) -> &str {
        &self.logical_id
    }

    #[inline]
    pub fn physical_id(&self) -> Option<&str> {
        self.physical_id.as_deref()
    }

    #[inline]
    pub fn region(&self) -> &R {
        &self.region
    }

    /// Eligible when `logical_id` opens: the logical id matches and the
    /// named sensor, if any, is not unavailable.
    pub(crate) fn eligible_on_open(&self, logical_id: &str, unavailable: &HashSet<String>) -> bool {
        self.logical_id == logical_id
            && self
                .physical_id
                .as_ref()
                .map_or(true, |physical| !unavailable.contains(physical))
    }

    /// Exact match on both ids. Rules without a physical id never match.
    pub(crate) fn matches_sensor(&self, logical_id: &str, physical_id: &str) -> bool {
        self.logical_id == logical_id && self.physical_id.as_deref() == Some(physical_id)
    }
}

/// Ordered rules plus the packages whose sessions never trigger protection.
///
/// Fixed once built; the tracker only ever reads it.
#[derive(Debug, Clone)]
pub struct ProtectionTable<R> {
    rules: Vec<ProtectionRule<R>>,
    excluded_packages: HashSet<String>,
}

impl<R> ProtectionTable<R> {
    pub fn new(rules: Vec<ProtectionRule<R>>) -> Self {
        Self {
            rules,
            excluded_packages: HashSet::new(),
        }
    }

    /// Replaces the excluded package set.
    pub fn with_excluded_packages<I, S>(mut self, packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.excluded_packages = packages.into_iter().map(Into::into).collect();
        self
    }

    pub fn rules(&self) -> &[ProtectionRule<R>] {
        &self.rules
    }

    pub fn excluded_packages(&self) -> &HashSet<String> {
        &self.excluded_packages
    }

    pub fn is_excluded(&self, package_id: &str) -> bool {
        self.excluded_packages.contains(package_id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<R> Default for ProtectionTable<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
