//! Sequential inlier filtering of bundle index lists.
//!
//! Each cleaning report selects positions from the bundle's *current*
//! sequence. Reports on the same bundle therefore compose: the second one
//! indexes into what the first one kept.

use crate::error::{CompileError, Result};
use crate::models::{BundleIndexMap, BundleReport, BundleSummary};
use std::collections::HashMap;
use tracing::debug;

/// Owns the working bundle map for the duration of a compilation run.
#[derive(Debug, Clone)]
pub struct IndexAggregator {
    working: BundleIndexMap,
    original_counts: HashMap<String, usize>,
    applied: HashMap<String, usize>,
}

impl IndexAggregator {
    pub fn new(base: BundleIndexMap) -> Self {
        let original_counts = base
            .iter()
            .map(|(bundle, indices)| (bundle.to_string(), indices.len()))
            .collect();

        Self {
            working: base,
            original_counts,
            applied: HashMap::new(),
        }
    }

    /// Apply one report, replacing the bundle's sequence with the selected entries.
    ///
    /// On error the working map is left as it was.
    pub fn apply(&mut self, report: &BundleReport) -> Result<()> {
        let current =
            self.working
                .get(&report.bundle)
                .ok_or_else(|| CompileError::UnknownBundle {
                    bundle: report.bundle.clone(),
                    origin: report.origin.clone(),
                })?;

        let selected = select_inliers(current, &report.inliers).map_err(|(position, len)| {
            CompileError::IndexOutOfRange {
                bundle: report.bundle.clone(),
                position,
                len,
                origin: report.origin.clone(),
            }
        })?;

        debug!(
            "{}: {} -> {} indices ({})",
            report.bundle,
            current.len(),
            selected.len(),
            report.origin
        );

        self.working.insert(report.bundle.clone(), selected);
        *self.applied.entry(report.bundle.clone()).or_default() += 1;
        Ok(())
    }

    /// Apply reports strictly in the given order, stopping at the first failure.
    pub fn apply_all(&mut self, reports: &[BundleReport]) -> Result<()> {
        reports.iter().try_for_each(|report| self.apply(report))
    }

    #[cfg(test)]
    pub fn current(&self, bundle: &str) -> Option<&[i64]> {
        self.working.get(bundle)
    }

    /// Per-bundle counts, in base document order.
    pub fn summary(&self) -> Vec<BundleSummary> {
        self.working
            .iter()
            .map(|(bundle, indices)| BundleSummary {
                bundle: bundle.to_string(),
                original: self.original_counts.get(bundle).copied().unwrap_or(0),
                retained: indices.len(),
                reports_applied: self.applied.get(bundle).copied().unwrap_or(0),
            })
            .collect()
    }

    pub fn finish(self) -> BundleIndexMap {
        self.working
    }
}

/// Build the sequence `current[i]` for every `i` in `inliers`, in inlier order.
///
/// Fails with `(position, len)` for the first position outside `current`.
pub fn select_inliers(
    current: &[i64],
    inliers: &[i64],
) -> std::result::Result<Vec<i64>, (i64, usize)> {
    inliers
        .iter()
        .map(|&position| {
            usize::try_from(position)
                .ok()
                .and_then(|pos| current.get(pos))
                .copied()
                .ok_or((position, current.len()))
        })
        .collect()
}
