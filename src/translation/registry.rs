//! Supported-language catalogs: the built-in table plus per-provider live
//! catalogs cached on disk.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use super::language::{self, Language};
use crate::fs::atomic_write;
use crate::provider::ProviderAdapter;

/// How long a fetched provider catalog stays fresh.
pub const CATALOG_TTL_HOURS: i64 = 24;

#[derive(Debug, Default, Serialize, Deserialize)]
struct CatalogCache {
    #[serde(default)]
    providers: BTreeMap<String, CachedCatalog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedCatalog {
    fetched_at: DateTime<Utc>,
    languages: Vec<Language>,
}

/// Validates codes and serves language catalogs.
pub struct LanguageRegistry {
    cache_path: Option<PathBuf>,
    ttl: Duration,
}

impl LanguageRegistry {
    /// A registry that caches live catalogs at `cache_path`.
    pub fn new(cache_path: PathBuf) -> Self {
        Self {
            cache_path: Some(cache_path),
            ttl: Duration::hours(CATALOG_TTL_HOURS),
        }
    }

    /// A registry that never touches the disk.
    pub fn without_cache() -> Self {
        Self {
            cache_path: None,
            ttl: Duration::hours(CATALOG_TTL_HOURS),
        }
    }

    /// Case-insensitive check against the built-in catalog. `auto` is accepted.
    pub fn validate(&self, code: &str) -> bool {
        language::validate(code)
    }

    /// Returns the supported languages sorted by English name.
    ///
    /// Without an adapter this is the built-in catalog. With one, the
    /// provider's live catalog is served from cache while fresh, refreshed
    /// when stale, and replaced by the built-in catalog if fetching fails.
    pub async fn supported_languages(&self, adapter: Option<&dyn ProviderAdapter>) -> Vec<Language> {
        self.supported_languages_at(adapter, Utc::now()).await
    }

    async fn supported_languages_at(
        &self,
        adapter: Option<&dyn ProviderAdapter>,
        now: DateTime<Utc>,
    ) -> Vec<Language> {
        let Some(adapter) = adapter else {
            return language::static_catalog();
        };
        let key = adapter.kind().as_str();
        let mut cache = self.load_cache();

        if let Some(entry) = cache.providers.get(key)
            && now - entry.fetched_at < self.ttl
        {
            debug!(provider = key, "serving cached language catalog");
            return entry.languages.clone();
        }

        match adapter.fetch_languages().await {
            Ok(mut languages) if !languages.is_empty() => {
                languages.sort_by(|a, b| a.name.cmp(&b.name));
                cache.providers.insert(
                    key.to_string(),
                    CachedCatalog {
                        fetched_at: now,
                        languages: languages.clone(),
                    },
                );
                self.store_cache(&cache);
                languages
            }
            Ok(_) => {
                warn!(provider = key, "provider returned an empty language catalog; using built-in list");
                language::static_catalog()
            }
            Err(e) => {
                warn!(provider = key, error = %e, "failed to fetch language catalog; using built-in list");
                language::static_catalog()
            }
        }
    }

    fn load_cache(&self) -> CatalogCache {
        let Some(path) = &self.cache_path else {
            return CatalogCache::default();
        };
        fs::read_to_string(path)
            .ok()
            .and_then(|contents| serde_json::from_str(&contents).ok())
            .unwrap_or_default()
    }

    fn store_cache(&self, cache: &CatalogCache) {
        let Some(path) = &self.cache_path else {
            return;
        };
        let result = serde_json::to_string(cache)
            .map_err(anyhow::Error::from)
            .and_then(|contents| atomic_write(path, &contents));
        if let Err(e) = result {
            warn!(path = %path.display(), error = %e, "failed to write language catalog cache");
        }
    }
}
