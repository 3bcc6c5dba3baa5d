//! Data models for bundle index compilation.
//!
//! This module contains the typed records read from the pipeline's JSON
//! documents and the ordered bundle map that flows through aggregation.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;

/// One entry of the base `results.json` document.
///
/// Only `indices` is required; every other field is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BundleEntry {
    /// Indices currently attributed to the bundle. Order is significant.
    pub indices: Vec<i64>,
}

/// Contents of a single cleaning report document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CleaningReport {
    /// Positions into the bundle's *current* index sequence that survived cleaning.
    pub inliers: Vec<i64>,
}

/// A cleaning report paired with the bundle it applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleReport {
    /// Bundle identifier the report filters.
    pub bundle: String,
    /// Positions to keep, in output order.
    pub inliers: Vec<i64>,
    /// Where the report came from, for diagnostics.
    pub origin: String,
}

impl BundleReport {
    pub fn new(bundle: impl Into<String>, report: CleaningReport, origin: impl Into<String>) -> Self {
        Self {
            bundle: bundle.into(),
            inliers: report.inliers,
            origin: origin.into(),
        }
    }
}

/// Ordered mapping of bundle name to index sequence.
///
/// Keeps the insertion order of the base document so the compiled output
/// lists bundles the same way the input did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BundleIndexMap {
    entries: Vec<(String, Vec<i64>)>,
    positions: HashMap<String, usize>,
}

impl BundleIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a bundle. A replaced bundle keeps its original position.
    pub fn insert(&mut self, bundle: impl Into<String>, indices: Vec<i64>) {
        let bundle = bundle.into();
        match self.positions.get(&bundle) {
            Some(&pos) => self.entries[pos].1 = indices,
            None => {
                self.positions.insert(bundle.clone(), self.entries.len());
                self.entries.push((bundle, indices));
            }
        }
    }

    pub fn get(&self, bundle: &str) -> Option<&[i64]> {
        self.positions
            .get(bundle)
            .map(|&pos| self.entries[pos].1.as_slice())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn from_pairs(pairs: &[(&str, &[i64])]) -> Self {
        pairs
            .iter()
            .map(|(bundle, indices)| (*bundle, indices.to_vec()))
            .collect()
    }

    /// Iterate bundles in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[i64])> {
        self.entries
            .iter()
            .map(|(name, indices)| (name.as_str(), indices.as_slice()))
    }
}

impl<S: Into<String>> FromIterator<(S, Vec<i64>)> for BundleIndexMap {
    fn from_iter<I: IntoIterator<Item = (S, Vec<i64>)>>(iter: I) -> Self {
        let mut map = BundleIndexMap::new();
        for (bundle, indices) in iter {
            map.insert(bundle, indices);
        }
        map
    }
}

impl Serialize for BundleIndexMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (bundle, indices) in &self.entries {
            map.serialize_entry(bundle, indices)?;
        }
        map.end()
    }
}

/// Per-bundle outcome of a compilation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleSummary {
    pub bundle: String,
    /// Length of the base index sequence.
    pub original: usize,
    /// Length after every applicable report.
    pub retained: usize,
    /// Number of cleaning reports applied to this bundle.
    pub reports_applied: usize,
}

impl BundleSummary {
    /// Number of indices removed by cleaning.
    pub fn removed(&self) -> usize {
        self.original.saturating_sub(self.retained)
    }
}
