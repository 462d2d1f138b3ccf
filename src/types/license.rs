//! License attribution shared by every component of one source.

use serde::{Deserialize, Serialize};

/// Publisher and license location for a source.
///
/// Decoded once per source and shared (via `Arc`) by all of its components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseInfo {
    /// Publishing organization (becomes the component's publisher name).
    pub organization: String,

    /// Where the license text lives (becomes the component's license URL).
    pub url: String,
}

impl LicenseInfo {
    pub fn new(organization: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            url: url.into(),
        }
    }
}
