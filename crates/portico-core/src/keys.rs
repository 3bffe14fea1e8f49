//! Whole-document JSON store for AI provider credentials.
//!
//! The document maps provider name to `{ "api_key": ..., ...extra }` and is
//! always loaded and written as a unit; there are no partial updates. Writes
//! go through a store-level mutex so two concurrent updates can't clobber
//! each other's read-then-write.

use crate::Result;
use portico_types::{KeyStatus, ProviderCredentials};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{info, warn};

/// Providers seeded into a fresh key document, each with an empty key.
pub const DEFAULT_PROVIDERS: [&str; 4] = ["openai", "google", "azure", "anthropic"];

const KEYS_FILE: &str = "api_keys.json";

type KeyDocument = BTreeMap<String, ProviderCredentials>;

/// File-backed credential store, one JSON document per archive.
pub struct ProviderKeyStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl ProviderKeyStore {
    /// Open the store under `archive_dir`, seeding a default document with
    /// the known providers if none exists.
    pub fn open(archive_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(archive_dir)?;
        let path = archive_dir.join(KEYS_FILE);

        if !path.exists() {
            let defaults: KeyDocument = DEFAULT_PROVIDERS
                .iter()
                .map(|name| (name.to_string(), ProviderCredentials::default()))
                .collect();
            std::fs::write(&path, serde_json::to_vec_pretty(&defaults)?)?;
            info!(
                target: "portico::keys",
                "Created new API keys file at {}",
                path.display()
            );
        }

        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Credentials for one provider; empty credentials when the provider is
    /// unknown or the document is unreadable.
    pub fn get(&self, provider: &str) -> ProviderCredentials {
        self.all().remove(provider).unwrap_or_default()
    }

    /// Merge a key (and any extra fields) into the provider's entry,
    /// creating the entry if absent, and write the document back whole.
    ///
    /// Returns `false` on write failure. Last writer wins.
    pub fn set(
        &self,
        provider: &str,
        api_key: &str,
        extra: BTreeMap<String, serde_json::Value>,
    ) -> bool {
        let _guard = self.write_lock.lock().unwrap();
        let mut document = self.all();
        let entry = document.entry(provider.to_string()).or_default();
        entry.api_key = api_key.to_string();
        entry.extra.extend(extra);

        match self.save(&document) {
            Ok(()) => true,
            Err(e) => {
                warn!(target: "portico::keys", "Error saving API keys: {e}");
                false
            }
        }
    }

    /// Presence-only status per provider. Key material never leaves the
    /// store through this call.
    pub fn list_status(&self) -> BTreeMap<String, KeyStatus> {
        self.all()
            .into_iter()
            .map(|(provider, credentials)| {
                let additional_fields = credentials
                    .extra
                    .iter()
                    .map(|(field, value)| (field.clone(), value_is_present(value)))
                    .collect();
                (
                    provider,
                    KeyStatus {
                        configured: credentials.is_configured(),
                        additional_fields,
                    },
                )
            })
            .collect()
    }

    /// The whole document; empty when missing or unreadable.
    pub fn all(&self) -> KeyDocument {
        match self.load() {
            Ok(document) => document,
            Err(e) => {
                warn!(target: "portico::keys", "Error loading API keys: {e}");
                KeyDocument::new()
            }
        }
    }

    fn load(&self) -> Result<KeyDocument> {
        if !self.path.exists() {
            return Ok(KeyDocument::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, document: &KeyDocument) -> Result<()> {
        std::fs::write(&self.path, serde_json::to_vec_pretty(document)?)?;
        Ok(())
    }
}

fn value_is_present(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Bool(b) => *b,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn open_store() -> (ProviderKeyStore, TempDir) {
        let temp = TempDir::new().unwrap();
        let store = ProviderKeyStore::open(temp.path()).unwrap();
        (store, temp)
    }

    #[test]
    fn fresh_store_seeds_default_providers() {
        let (store, _temp) = open_store();
        let document = store.all();
        for provider in DEFAULT_PROVIDERS {
            assert!(document.contains_key(provider), "missing {provider}");
            assert!(!document[provider].is_configured());
        }
    }

    #[test]
    fn set_and_get_round_trip() {
        let (store, _temp) = open_store();
        assert!(store.set("openai", "sk-test", BTreeMap::new()));
        assert_eq!(store.get("openai").api_key, "sk-test");
        // Unrelated providers are untouched.
        assert_eq!(store.get("google").api_key, "");
    }

    #[test]
    fn set_merges_extra_fields_and_creates_unknown_providers() {
        let (store, _temp) = open_store();
        let extra = BTreeMap::from([("org_id".to_string(), json!("org-1"))]);
        assert!(store.set("mistral", "key-1", extra));

        let credentials = store.get("mistral");
        assert_eq!(credentials.api_key, "key-1");
        assert_eq!(credentials.extra["org_id"], json!("org-1"));

        // A later update keeps fields it doesn't mention.
        assert!(store.set("mistral", "key-2", BTreeMap::new()));
        assert_eq!(store.get("mistral").extra["org_id"], json!("org-1"));
    }

    #[test]
    fn status_reports_presence_without_key_material() {
        let (store, _temp) = open_store();
        let extra = BTreeMap::from([
            ("org_id".to_string(), json!("org-1")),
            ("project_id".to_string(), json!("")),
        ]);
        store.set("openai", "sk-secret", extra);

        let status = store.list_status();
        assert!(status["openai"].configured);
        assert_eq!(status["openai"].additional_fields["org_id"], true);
        assert_eq!(status["openai"].additional_fields["project_id"], false);

        let rendered = serde_json::to_string(&status).unwrap();
        assert!(!rendered.contains("sk-secret"));
        assert!(!rendered.contains("org-1"));
    }

    #[test]
    fn unreadable_document_degrades_to_empty() {
        let (store, temp) = open_store();
        std::fs::write(temp.path().join(KEYS_FILE), "{not json").unwrap();
        assert!(store.all().is_empty());
        assert_eq!(store.get("openai").api_key, "");
    }
}
