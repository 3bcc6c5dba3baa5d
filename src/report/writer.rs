//! JSON rendering and atomic output writes.

use crate::models::BundleIndexMap;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::Write;
use std::path::Path;
use tempfile::{Builder, NamedTempFile};
use tracing::debug;

/// Render the compiled map as pretty JSON with `indent` spaces per level.
pub fn render_json(bundles: &BundleIndexMap, indent: usize) -> Result<String> {
    let indent = " ".repeat(indent);
    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));

    bundles
        .serialize(&mut serializer)
        .context("Failed to serialize compiled bundles")?;

    String::from_utf8(buffer).context("Serialized bundles are not valid UTF-8")
}

/// Write the compiled map to `path`.
///
/// The document is written to a temporary file next to `path` and moved
/// into place, so a failed run never leaves a partial output behind.
pub fn write_report(bundles: &BundleIndexMap, path: &Path, indent: usize) -> Result<()> {
    let content = render_json(bundles, indent)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = output_temp_file(dir, path)?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report to {}", path.display()))?;
    file.persist(path)
        .with_context(|| format!("Failed to write report to {}", path.display()))?;

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

/// Temporary file in `dir` that will end up with the permissions `path` should have.
///
/// A new output gets 0o666 minus the umask, like a plain `File::create`; an
/// existing output keeps its mode.
fn output_temp_file(dir: &Path, path: &Path) -> Result<NamedTempFile> {
    #[allow(unused_mut)]
    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(std::fs::Permissions::from_mode(0o666));
    }

    let file = builder
        .tempfile_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;

    if let Ok(existing) = std::fs::metadata(path) {
        file.as_file()
            .set_permissions(existing.permissions())
            .with_context(|| format!("Failed to copy permissions of {}", path.display()))?;
    }

    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_json_indent_four() {
        let bundles = BundleIndexMap::from_pairs(&[("AF_L", &[30, 10]), ("CST_R", &[])]);
        let json = render_json(&bundles, 4).unwrap();

        let expected = "{\n    \"AF_L\": [\n        30,\n        10\n    ],\n    \"CST_R\": []\n}";
        assert_eq!(json, expected);
    }

    #[test]
    fn test_render_json_custom_indent() {
        let bundles = BundleIndexMap::from_pairs(&[("OR_L", &[1])]);
        let json = render_json(&bundles, 2).unwrap();
        assert_eq!(json, "{\n  \"OR_L\": [\n    1\n  ]\n}");
    }

    #[test]
    fn test_render_json_empty_map() {
        let json = render_json(&BundleIndexMap::new(), 4).unwrap();
        assert_eq!(json, "{}");
    }

    #[test]
    fn test_write_report_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compiled.json");
        let bundles = BundleIndexMap::from_pairs(&[("UF_R", &[7, 3]), ("AF_L", &[2])]);

        write_report(&bundles, &path, 4).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&written).unwrap();
        assert_eq!(parsed["UF_R"], serde_json::json!([7, 3]));
        assert!(written.find("UF_R").unwrap() < written.find("AF_L").unwrap());
    }

    #[test]
    fn test_write_report_replaces_existing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compiled.json");
        std::fs::write(&path, "stale").unwrap();

        write_report(&BundleIndexMap::from_pairs(&[("A", &[1])]), &path, 4).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains("\"A\""));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_report_new_file_follows_umask() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compiled.json");
        let plain = dir.path().join("plain.txt");
        std::fs::File::create(&plain).unwrap();

        write_report(&BundleIndexMap::from_pairs(&[("A", &[1])]), &path, 4).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(path.as_path()), mode(plain.as_path()));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_report_keeps_existing_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compiled.json");
        std::fs::write(&path, "stale").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_report(&BundleIndexMap::from_pairs(&[("A", &[1])]), &path, 4).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn test_write_report_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("compiled.json");

        assert!(write_report(&BundleIndexMap::new(), &path, 4).is_err());
        assert!(!path.exists());
    }
}
