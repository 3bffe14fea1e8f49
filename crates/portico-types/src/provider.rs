//! AI provider credential and generation types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Stored credentials for a single provider.
///
/// The key document is free-form beyond `api_key`; extra fields (org ids,
/// project ids) are kept verbatim so a round-trip through the store never
/// drops them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderCredentials {
    #[serde(default)]
    pub api_key: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl ProviderCredentials {
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Presence-only view of a provider's credentials. Never carries key
/// material.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyStatus {
    pub configured: bool,
    pub additional_fields: BTreeMap<String, bool>,
}

/// A completed text generation from an upstream provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    pub model: String,
    pub provider: String,
}
