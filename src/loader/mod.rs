use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::dataset::{Dataset, DatasetError};
use crate::utils;

/// Resource path of the dataset, relative to the site root.
pub const DEFAULT_DATA_PATH: &str = "data/rolls.json";

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("dataset unavailable from {resource}: {reason}")]
    DataUnavailable { resource: String, reason: String },

    #[error("malformed dataset from {resource}: expected at least {expected} headers, found {found}")]
    MalformedDataset {
        resource: String,
        expected: usize,
        found: usize,
    },

    #[error("invalid data source '{value}': {reason}")]
    InvalidSource { value: String, reason: String },

    #[error("failed to build HTTP client: {source}")]
    HttpClientBuild {
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to setup proxy: {proxy}: {source}")]
    ProxySetup {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },
}

impl LoadError {
    fn unavailable(resource: &str, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            resource: resource.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    FilePath(PathBuf),
    Inline(String),
}

impl DataSource {
    /// Joins `data_path` onto `base`, which is either an `http(s)://` site
    /// root or a local directory.
    pub fn resolve(base: &str, data_path: &str) -> Result<Self, LoadError> {
        let base = base.trim();
        let data_path = data_path.trim().trim_start_matches("./");
        if utils::is_http_url(base) {
            let mut root = reqwest::Url::parse(base).map_err(|e| LoadError::InvalidSource {
                value: base.to_string(),
                reason: e.to_string(),
            })?;
            if !root.path().ends_with('/') {
                let path = format!("{}/", root.path());
                root.set_path(&path);
            }
            let url = root.join(data_path).map_err(|e| LoadError::InvalidSource {
                value: data_path.to_string(),
                reason: e.to_string(),
            })?;
            return Ok(Self::Url(url.to_string()));
        }
        if base.is_empty() {
            return Ok(Self::FilePath(PathBuf::from(data_path)));
        }
        Ok(Self::FilePath(Path::new(base).join(data_path)))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => url.clone(),
            Self::FilePath(path) => path.display().to_string(),
            Self::Inline(_) => "<inline>".to_string(),
        }
    }

    async fn fetch(&self, client: Option<&reqwest::Client>) -> Result<Vec<u8>, LoadError> {
        let resource = self.describe();
        match self {
            Self::Url(url) => {
                let client = client.ok_or_else(|| LoadError::InvalidSource {
                    value: url.clone(),
                    reason: "no HTTP client configured".to_string(),
                })?;
                let response = client
                    .get(url.as_str())
                    .send()
                    .await
                    .map_err(|e| LoadError::unavailable(&resource, e.to_string()))?;
                let status = response.status();
                debug!(url = %url, status = status.as_u16(), "dataset response");
                if !status.is_success() {
                    return Err(LoadError::unavailable(
                        &resource,
                        format!("HTTP {}", status.as_u16()),
                    ));
                }
                let body = response
                    .bytes()
                    .await
                    .map_err(|e| LoadError::unavailable(&resource, e.to_string()))?;
                Ok(body.to_vec())
            }
            Self::FilePath(path) => tokio::fs::read(path)
                .await
                .map_err(|e| LoadError::unavailable(&resource, e.to_string())),
            Self::Inline(body) => Ok(body.clone().into_bytes()),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct LoaderOptions {
    /// `None` waits on the fetch indefinitely.
    pub timeout: Option<Duration>,
    pub proxy: Option<String>,
    /// Ignore proxies from the environment (`HTTP_PROXY` and friends).
    pub no_proxy: bool,
}

fn build_client(options: &LoaderOptions) -> Result<reqwest::Client, LoadError> {
    let mut headers = reqwest::header::HeaderMap::new();
    headers.insert(
        reqwest::header::ACCEPT,
        reqwest::header::HeaderValue::from_static("application/json"),
    );
    let mut builder = reqwest::Client::builder().default_headers(headers);
    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }
    if let Some(proxy) = options.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
        let proxy_cfg = reqwest::Proxy::all(proxy).map_err(|source| LoadError::ProxySetup {
            proxy: proxy.to_string(),
            source,
        })?;
        builder = builder.proxy(proxy_cfg);
    } else if options.no_proxy {
        builder = builder.no_proxy();
    }
    builder
        .build()
        .map_err(|source| LoadError::HttpClientBuild { source })
}

/// Per-session dataset cache. The first successful [`DatasetCache::load`]
/// fetches and parses; later calls return the same `Arc` without fetching.
/// A failed load leaves the cache empty.
#[derive(Debug)]
pub struct DatasetCache {
    source: DataSource,
    client: Option<reqwest::Client>,
    cell: OnceCell<Arc<Dataset>>,
    fetches: AtomicUsize,
}

impl DatasetCache {
    pub fn new(source: DataSource) -> Result<Self, LoadError> {
        Self::with_options(source, &LoaderOptions::default())
    }

    pub fn with_options(source: DataSource, options: &LoaderOptions) -> Result<Self, LoadError> {
        let client = match source {
            DataSource::Url(_) => Some(build_client(options)?),
            _ => None,
        };
        Ok(Self {
            source,
            client,
            cell: OnceCell::new(),
            fetches: AtomicUsize::new(0),
        })
    }

    pub async fn load(&self) -> Result<Arc<Dataset>, LoadError> {
        if let Some(dataset) = self.cell.get() {
            debug!(source = %self.source.describe(), "dataset cache hit");
            return Ok(dataset.clone());
        }
        self.cell
            .get_or_try_init(|| self.fetch_and_parse())
            .await
            .cloned()
    }

    /// The cached dataset, if a load has completed.
    pub fn get(&self) -> Option<Arc<Dataset>> {
        self.cell.get().cloned()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn source(&self) -> &DataSource {
        &self.source
    }

    async fn fetch_and_parse(&self) -> Result<Arc<Dataset>, LoadError> {
        let resource = self.source.describe();
        info!(source = %resource, "fetching dataset");
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let body = self.source.fetch(self.client.as_ref()).await?;
        let dataset = Dataset::from_json(&body).map_err(|e| match e {
            DatasetError::TooFewHeaders { expected, found } => LoadError::MalformedDataset {
                resource: resource.clone(),
                expected,
                found,
            },
            other => LoadError::unavailable(&resource, other.to_string()),
        })?;
        info!(rows = dataset.len(), headers = dataset.headers().len(), "dataset loaded");
        Ok(Arc::new(dataset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_relative_path_against_url_root() {
        let src = DataSource::resolve("https://example.com/rolls", DEFAULT_DATA_PATH).unwrap();
        assert_eq!(
            src,
            DataSource::Url("https://example.com/rolls/data/rolls.json".to_string())
        );
        let src = DataSource::resolve("https://example.com/", "./data/rolls.json").unwrap();
        assert_eq!(
            src,
            DataSource::Url("https://example.com/data/rolls.json".to_string())
        );
    }

    #[test]
    fn resolves_relative_path_against_directory() {
        let src = DataSource::resolve("docs", DEFAULT_DATA_PATH).unwrap();
        assert_eq!(
            src,
            DataSource::FilePath(Path::new("docs").join("data/rolls.json"))
        );
    }

    #[test]
    fn rejects_unparsable_url_base() {
        assert!(matches!(
            DataSource::resolve("http://[::1", DEFAULT_DATA_PATH),
            Err(LoadError::InvalidSource { .. })
        ));
    }
}
