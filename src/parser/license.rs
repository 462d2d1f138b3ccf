//! License document decoding.

use crate::error::{CompendiumError, Result};
use crate::types::LicenseInfo;

/// Parse a license document.
///
/// The document is a YAML or JSON mapping with `organization` and `url`
/// keys (JSON parses as YAML, so one code path covers both).
pub fn parse_license(raw: &str) -> Result<LicenseInfo> {
    serde_yaml::from_str(raw).map_err(|e| CompendiumError::MalformedSource {
        message: format!("Invalid license document: {}", e),
        line: e.location().map(|l| l.line()),
        help: Some("Expected a mapping with `organization` and `url`".to_string()),
    })
}
