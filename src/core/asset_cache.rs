//! Named on-disk cache for a fixed allowlist of server assets, so the
//! console keeps its localization bundle when the server is unreachable.

use super::api::ApiClient;
use eyre::{Context, Report, eyre};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Where assets come from on a cache miss.
pub trait AssetSource {
    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, Report>;
}

impl AssetSource for ApiClient {
    async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, Report> {
        ApiClient::get_bytes(self, path).await
    }
}

#[derive(Debug, Clone)]
pub struct AssetCache {
    dir: PathBuf,
    allowlist: Vec<String>,
}

impl AssetCache {
    /// Opens the cache `name` under the platform cache directory.
    pub fn open(name: &str, allowlist: Vec<String>) -> Result<Self, Report> {
        let dir = dirs::cache_dir()
            .ok_or_else(|| eyre!("Could not find a cache directory"))?
            .join(env!("CARGO_PKG_NAME"))
            .join(name);
        Ok(Self::at(dir, allowlist))
    }

    pub fn at(dir: impl Into<PathBuf>, allowlist: Vec<String>) -> Self {
        Self {
            dir: dir.into(),
            allowlist,
        }
    }

    fn is_allowed(&self, path: &str) -> bool {
        self.allowlist.iter().any(|p| p == path)
    }

    fn entry_path(&self, path: &str) -> PathBuf {
        let name: String = path
            .trim_start_matches('/')
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(name)
    }

    async fn store(&self, path: &str, bytes: &[u8]) -> Result<(), Report> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context("Failed to create cache directory")?;
        tokio::fs::write(self.entry_path(path), bytes)
            .await
            .with_context(|| format!("Failed to cache {}", path))
    }

    /// Downloads every allowlisted asset. Returns how many were stored; a
    /// failing asset is logged and skipped.
    pub async fn install(&self, source: &impl AssetSource) -> usize {
        let mut stored = 0;
        for path in &self.allowlist {
            match source.get_bytes(path).await {
                Ok(bytes) => match self.store(path, &bytes).await {
                    Ok(()) => stored += 1,
                    Err(e) => tracing::warn!("{:#}", e),
                },
                Err(e) => tracing::warn!("Could not download {} for the cache: {:#}", path, e),
            }
        }
        tracing::info!(
            "Asset cache {:?}: {}/{} assets installed",
            self.dir,
            stored,
            self.allowlist.len()
        );
        stored
    }

    /// Serves `path` from the cache, falling back to the network on a miss.
    /// Allowlisted assets fetched from the network are written through.
    pub async fn fetch(&self, source: &impl AssetSource, path: &str) -> Result<Vec<u8>, Report> {
        let entry = self.entry_path(path);
        if self.is_allowed(path) {
            if let Ok(bytes) = tokio::fs::read(&entry).await {
                tracing::debug!("Cache hit for {}", path);
                return Ok(bytes);
            }
        }

        let bytes = source.get_bytes(path).await?;
        if self.is_allowed(path) {
            if let Err(e) = self.store(path, &bytes).await {
                tracing::warn!("{:#}", e);
            }
        }
        Ok(bytes)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

/// Labels for the chats table, read from a DataTables-style i18n bundle.
/// Both the legacy (`sSearch`) and current (`search`) key styles are
/// understood.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct TableLocale {
    #[serde(alias = "sSearch")]
    pub search: String,
    #[serde(alias = "sEmptyTable", rename = "emptyTable")]
    pub empty_table: String,
    #[serde(alias = "sZeroRecords", rename = "zeroRecords")]
    pub zero_records: String,
    #[serde(alias = "sInfo")]
    pub info: String,
    #[serde(alias = "sLoadingRecords", rename = "loadingRecords")]
    pub loading: String,
    #[serde(alias = "oPaginate")]
    pub paginate: Paginate,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Paginate {
    #[serde(alias = "sNext")]
    pub next: String,
    #[serde(alias = "sPrevious")]
    pub previous: String,
}

impl Default for TableLocale {
    fn default() -> Self {
        Self {
            search: "Search:".to_string(),
            empty_table: "No data available in table".to_string(),
            zero_records: "No matching records found".to_string(),
            info: "Showing _START_ to _END_ of _TOTAL_ entries".to_string(),
            loading: "Loading...".to_string(),
            paginate: Paginate::default(),
        }
    }
}

impl Default for Paginate {
    fn default() -> Self {
        Self {
            next: "Next".to_string(),
            previous: "Previous".to_string(),
        }
    }
}

impl TableLocale {
    pub const BUNDLE_PATH: &'static str = "/static/i18n/ru.json";

    pub fn parse(bytes: &[u8]) -> Result<Self, Report> {
        serde_json::from_slice(bytes).context("Malformed localization bundle")
    }

    pub fn info_line(&self, first: usize, last: usize, total: usize) -> String {
        self.info
            .replace("_START_", &first.to_string())
            .replace("_END_", &last.to_string())
            .replace("_TOTAL_", &total.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, sync::Mutex};

    #[derive(Default)]
    struct FakeServer {
        assets: HashMap<String, Vec<u8>>,
        hits: Mutex<Vec<String>>,
    }

    impl AssetSource for FakeServer {
        async fn get_bytes(&self, path: &str) -> Result<Vec<u8>, Report> {
            self.hits.lock().unwrap().push(path.to_string());
            self.assets
                .get(path)
                .cloned()
                .ok_or_else(|| eyre!("404 {}", path))
        }
    }

    fn scratch_dir(test: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "{}-cache-{}-{}",
            env!("CARGO_PKG_NAME"),
            test,
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    fn server() -> FakeServer {
        let mut assets = HashMap::new();
        assets.insert("/static/i18n/ru.json".to_string(), br#"{"sSearch": "Poisk:"}"#.to_vec());
        assets.insert("/login".to_string(), b"<html>".to_vec());
        FakeServer {
            assets,
            ..FakeServer::default()
        }
    }

    #[tokio::test]
    async fn install_then_serve_offline() {
        let dir = scratch_dir("offline");
        let cache = AssetCache::at(
            &dir,
            vec!["/static/i18n/ru.json".to_string(), "/static/missing.css".to_string()],
        );

        assert_eq!(cache.install(&server()).await, 1);

        let offline = FakeServer::default();
        let bytes = cache.fetch(&offline, "/static/i18n/ru.json").await.unwrap();
        assert_eq!(bytes, br#"{"sSearch": "Poisk:"}"#.to_vec());
        assert!(offline.hits.lock().unwrap().is_empty());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn miss_falls_back_to_network_and_writes_through() {
        let dir = scratch_dir("miss");
        let cache = AssetCache::at(&dir, vec!["/static/i18n/ru.json".to_string()]);
        let online = server();

        cache.fetch(&online, "/static/i18n/ru.json").await.unwrap();
        cache.fetch(&online, "/static/i18n/ru.json").await.unwrap();
        assert_eq!(online.hits.lock().unwrap().len(), 1);

        // Paths outside the allowlist always go to the network.
        cache.fetch(&online, "/login").await.unwrap();
        cache.fetch(&online, "/login").await.unwrap();
        assert_eq!(online.hits.lock().unwrap().len(), 3);

        assert!(cache.fetch(&FakeServer::default(), "/nope").await.is_err());
        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn locale_accepts_both_key_styles() {
        let legacy = TableLocale::parse(
            r#"{"sSearch": "Поиск:", "oPaginate": {"sNext": "След.", "sPrevious": "Пред."},
                "sInfo": "Записи с _START_ до _END_ из _TOTAL_ записей"}"#
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(legacy.search, "Поиск:");
        assert_eq!(legacy.paginate.next, "След.");
        assert_eq!(legacy.info_line(1, 10, 57), "Записи с 1 до 10 из 57 записей");
        assert_eq!(legacy.zero_records, TableLocale::default().zero_records);

        let current = TableLocale::parse(br#"{"emptyTable": "Empty", "paginate": {"next": ">"}}"#)
            .unwrap();
        assert_eq!(current.empty_table, "Empty");
        assert_eq!(current.paginate.next, ">");
        assert_eq!(current.paginate.previous, "Previous");
    }
}
