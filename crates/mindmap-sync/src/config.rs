//! Sync configuration.
//!
//! Built once at startup and handed to the client; nothing below this
//! module reads the environment.

use crate::store::DocumentPath;

/// Application instance used when none is configured.
pub const DEFAULT_APP_ID: &str = "default-app-id";
/// Name of the singleton document.
pub const DEFAULT_DOCUMENT: &str = "sharedMindMap";

pub const ENV_APP_ID: &str = "MINDMAP_APP_ID";
pub const ENV_DOCUMENT: &str = "MINDMAP_DOCUMENT";
pub const ENV_AUTH_TOKEN: &str = "MINDMAP_AUTH_TOKEN";
pub const ENV_STORE_URL: &str = "MINDMAP_STORE_URL";

/// Where the shared document lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    /// Application instance identifier, first component of the document path.
    pub app_id: String,
    /// Document name within the instance.
    pub document: String,
    /// Pre-issued sign-in token. Anonymous identity when absent.
    pub auth_token: Option<String>,
    /// Base URL of a remote document host. In-process store when absent.
    pub store_url: Option<String>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            document: DEFAULT_DOCUMENT.to_string(),
            auth_token: None,
            store_url: None,
        }
    }
}

impl SyncConfig {
    /// Load from a `.env` file (if present) and the process environment.
    pub fn load() -> Self {
        // Load .env file if present (silently ignore if missing)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let mut config = Self::default();
        if let Some(app_id) = read(ENV_APP_ID) {
            config.app_id = app_id;
        }
        if let Some(document) = read(ENV_DOCUMENT) {
            config.document = document;
        }
        config.auth_token = read(ENV_AUTH_TOKEN);
        config.store_url = read(ENV_STORE_URL);
        config
    }

    pub fn with_app_id(mut self, app_id: impl Into<String>) -> Self {
        self.app_id = app_id.into();
        self
    }

    pub fn with_store_url(mut self, store_url: impl Into<String>) -> Self {
        self.store_url = Some(store_url.into());
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// `artifacts/{app_id}/public/data/mindMaps/{document}`
    pub fn document_path(&self) -> DocumentPath {
        DocumentPath::singleton(&self.app_id, &self.document)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_point_at_the_shared_document() {
        let config = SyncConfig::from_lookup(|_| None);
        assert_eq!(config, SyncConfig::default());
        assert_eq!(
            config.document_path().as_str(),
            "artifacts/default-app-id/public/data/mindMaps/sharedMindMap"
        );
    }

    #[test]
    fn variables_override_defaults_and_blanks_are_ignored() {
        let vars: HashMap<&str, &str> = [
            (ENV_APP_ID, "research"),
            (ENV_AUTH_TOKEN, "  "),
            (ENV_STORE_URL, "http://localhost:4300"),
        ]
        .into_iter()
        .collect();
        let config = SyncConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.app_id, "research");
        assert_eq!(config.document, DEFAULT_DOCUMENT);
        assert_eq!(config.auth_token, None);
        assert_eq!(config.store_url.as_deref(), Some("http://localhost:4300"));
        assert_eq!(
            config.document_path().as_str(),
            "artifacts/research/public/data/mindMaps/sharedMindMap"
        );
    }
}
