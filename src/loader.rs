//! Reading and validating the pipeline's JSON documents.
//!
//! Every document is fully parsed into its typed record here, before any
//! filtering starts, so a bad input fails with the file it came from.

use crate::error::{CompileError, Result};
use crate::models::{BundleEntry, BundleIndexMap, BundleReport, CleaningReport};
use crate::naming::ReportNaming;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a JSON document from disk into `T`.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        std::fs::read_to_string(path).map_err(|source| CompileError::from_read(source, path))?;

    serde_json::from_str(&content).map_err(|e| CompileError::MalformedDocument {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Load the base results document into an ordered bundle map.
///
/// Each bundle object must carry an `indices` array of integers.
pub fn load_results(path: &Path) -> Result<BundleIndexMap> {
    let document: Map<String, Value> = read_json(path)?;
    let mut bundles = BundleIndexMap::new();

    for (bundle, value) in document {
        let entry: BundleEntry =
            serde_json::from_value(value).map_err(|e| CompileError::MalformedDocument {
                path: path.to_path_buf(),
                reason: format!("bundle '{}': {}", bundle, e),
            })?;
        debug!("Bundle {} has {} indices", bundle, entry.indices.len());
        bundles.insert(bundle, entry.indices);
    }

    Ok(bundles)
}

/// Load one cleaning report for an already known bundle.
pub fn load_cleaning_report(bundle: &str, path: &Path) -> Result<BundleReport> {
    let report: CleaningReport = read_json(path)?;
    debug!(
        "Report {} keeps {} positions of bundle {}",
        path.display(),
        report.inliers.len(),
        bundle
    );
    Ok(BundleReport::new(bundle, report, path.display().to_string()))
}

/// Load reports whose bundle name is encoded in the file name.
pub fn load_named_reports(paths: &[PathBuf], naming: &ReportNaming) -> Result<Vec<BundleReport>> {
    paths
        .iter()
        .map(|path| {
            let bundle = naming.bundle_id(path)?;
            load_cleaning_report(&bundle, path)
        })
        .collect()
}

/// Load reports given as explicit `(bundle, path)` pairs.
pub fn load_explicit_reports(pairs: &[(String, PathBuf)]) -> Result<Vec<BundleReport>> {
    pairs
        .iter()
        .map(|(bundle, path)| load_cleaning_report(bundle, path))
        .collect()
}
