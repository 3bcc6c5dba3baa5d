//! Plain-text summary of a compilation run.

use crate::models::BundleSummary;

/// Render a per-bundle table of original, retained and removed counts.
pub fn render_summary(summaries: &[BundleSummary]) -> String {
    let width = summaries
        .iter()
        .map(|s| s.bundle.len())
        .chain(std::iter::once("Bundle".len()))
        .max()
        .unwrap_or(0);

    let mut lines = Vec::with_capacity(summaries.len() + 3);
    lines.push(format!(
        "{:<width$}  {:>9}  {:>9}  {:>9}  {:>7}",
        "Bundle", "Original", "Retained", "Removed", "Reports"
    ));

    for s in summaries {
        lines.push(format!(
            "{:<width$}  {:>9}  {:>9}  {:>9}  {:>7}",
            s.bundle,
            s.original,
            s.retained,
            s.removed(),
            s.reports_applied
        ));
    }

    let original: usize = summaries.iter().map(|s| s.original).sum();
    let retained: usize = summaries.iter().map(|s| s.retained).sum();
    let cleaned = summaries.iter().filter(|s| s.reports_applied > 0).count();
    lines.push(String::new());
    lines.push(format!(
        "{} bundles ({} cleaned): {} of {} indices retained",
        summaries.len(),
        cleaned,
        retained,
        original
    ));

    lines.join("\n")
}
