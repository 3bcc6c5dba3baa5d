//! Bundle identifiers encoded in cleaning report filenames.
//!
//! The cleaning stage names its outputs `<subject>__<bundle>_report.json`.
//! `ReportNaming` recovers `<bundle>` from such a path.

use crate::config::NamingConfig;
use crate::error::{CompileError, Result};
use std::path::Path;

/// Separator and suffix tokens framing the bundle name in a report filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportNaming {
    pub separator: String,
    pub suffix: String,
}

impl Default for ReportNaming {
    fn default() -> Self {
        Self {
            separator: "__".to_string(),
            suffix: "_report".to_string(),
        }
    }
}

impl From<&NamingConfig> for ReportNaming {
    fn from(config: &NamingConfig) -> Self {
        Self {
            separator: config.separator.clone(),
            suffix: config.suffix.clone(),
        }
    }
}

impl ReportNaming {
    /// Extract the bundle identifier from a report path.
    ///
    /// Only the final path component is inspected. The name is split on the
    /// first separator; in what follows, the last suffix occurrence must be
    /// followed by nothing or by an extension.
    pub fn bundle_id(&self, path: &Path) -> Result<String> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| CompileError::MalformedFilename {
                file_name: path.display().to_string(),
                reason: "not a valid UTF-8 file name".to_string(),
            })?;

        let malformed = |reason: String| CompileError::MalformedFilename {
            file_name: file_name.to_string(),
            reason,
        };

        let (_, rest) = file_name
            .split_once(self.separator.as_str())
            .ok_or_else(|| malformed(format!("missing separator '{}'", self.separator)))?;

        let (bundle, tail) = rest
            .rsplit_once(self.suffix.as_str())
            .ok_or_else(|| malformed(format!("missing suffix '{}'", self.suffix)))?;

        if !tail.is_empty() && !tail.starts_with('.') {
            return Err(malformed(format!(
                "unexpected '{}' after suffix '{}'",
                tail, self.suffix
            )));
        }

        if bundle.is_empty() {
            return Err(malformed("empty bundle name".to_string()));
        }

        Ok(bundle.to_string())
    }
}
