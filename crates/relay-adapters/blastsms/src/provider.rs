//! Provider name normalization.

use std::collections::HashMap;

use tracing::warn;

/// Static raw → canonical provider table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderMap {
    mappings: HashMap<String, String>,
}

impl ProviderMap {
    /// Creates a table from configured mappings.
    pub fn new(mappings: HashMap<String, String>) -> Self {
        Self { mappings }
    }

    /// Returns the canonical name for `raw`.
    ///
    /// Unknown providers pass through unchanged and are logged.
    pub fn normalize(&self, raw: &str) -> String {
        match self.mappings.get(raw) {
            Some(canonical) => canonical.clone(),
            None => {
                warn!(provider = %raw, "No mapping exists for provider, using it unchanged");
                raw.to_string()
            }
        }
    }

    /// Number of configured mappings.
    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    /// Returns true if no mapping is configured.
    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}
