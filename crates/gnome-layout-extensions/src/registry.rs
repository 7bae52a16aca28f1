//! extensions.gnome.org client
//!
//! Resolving an archive takes two requests:
//! 1. `extension-query/?shell_version=all&search=<id>` gives candidate primary keys
//! 2. `extension-info/?pk=<pk>&shell_version=<version>` gives a relative `download_url`
//!
//! Archives are cached under `<cache_dir>/<id>`; a cached archive is reused
//! without touching the network.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gnome_layout_core::types::NetworkConfig;
use gnome_layout_core::{ExtensionId, ShellVersion};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::RegistryError;

/// Where an archive came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fetched from the registry and written to the cache
    Downloaded(PathBuf),
    /// Already present in the cache
    Cached(PathBuf),
}

impl DownloadOutcome {
    /// Path of the archive on disk
    pub fn path(&self) -> &Path {
        match self {
            Self::Downloaded(path) | Self::Cached(path) => path,
        }
    }

    pub fn is_cached(&self) -> bool {
        matches!(self, Self::Cached(_))
    }
}

/// Supplies extension archives to the reconciler
pub trait ExtensionSource {
    /// Make the archive for `id` available under `cache_dir`
    fn download_extension(
        &self,
        cache_dir: &Path,
        id: &ExtensionId,
        shell_version: &ShellVersion,
    ) -> Result<DownloadOutcome, RegistryError>;
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    extensions: Vec<QueryHit>,
}

#[derive(Debug, Deserialize)]
struct QueryHit {
    pk: u64,
    #[serde(default)]
    uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct InfoResponse {
    #[serde(default)]
    download_url: Option<String>,
}

/// Blocking HTTP client for the extension registry
pub struct ExtensionRegistryClient {
    client: Client,
    base_url: Url,
}

impl ExtensionRegistryClient {
    /// Create a client for the registry described by the network config
    pub fn from_config(config: &NetworkConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Self::with_client(client, &config.registry_url)
    }

    /// Create a client for `base_url` with default network settings
    pub fn new(base_url: &str) -> Result<Self, RegistryError> {
        let config = NetworkConfig {
            registry_url: base_url.to_string(),
            ..NetworkConfig::default()
        };
        Self::from_config(&config)
    }

    fn with_client(client: Client, base_url: &str) -> Result<Self, RegistryError> {
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { client, base_url })
    }

    /// Registry base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve the download URL of `id` for a shell version
    pub fn resolve_download(
        &self,
        id: &ExtensionId,
        shell_version: &ShellVersion,
    ) -> Result<Url, RegistryError> {
        let pk = self.search(id)?;

        let mut url = self.base_url.join("extension-info/")?;
        url.query_pairs_mut()
            .append_pair("pk", &pk.to_string())
            .append_pair("shell_version", shell_version.as_str());
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(RegistryError::link_unavailable(id.as_str(), shell_version.as_str()));
        }
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let info: InfoResponse = response.json()?;
        let download_path = info
            .download_url
            .filter(|path| !path.trim().is_empty())
            .ok_or_else(|| {
                RegistryError::link_unavailable(id.as_str(), shell_version.as_str())
            })?;

        // The registry answers with a host-absolute path; keep the base prefix
        Ok(self.base_url.join(download_path.trim_start_matches('/'))?)
    }

    /// Fetch an archive in full
    pub fn fetch_archive(&self, url: &Url) -> Result<Vec<u8>, RegistryError> {
        debug!("GET {}", url);
        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response.bytes()?.to_vec())
    }

    fn search(&self, id: &ExtensionId) -> Result<u64, RegistryError> {
        let mut url = self.base_url.join("extension-query/")?;
        url.query_pairs_mut()
            .append_pair("shell_version", "all")
            .append_pair("search", id.as_str());
        debug!("GET {}", url);

        let response = self.client.get(url.clone()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let query: QueryResponse = response.json()?;
        let exact = query
            .extensions
            .iter()
            .find(|hit| hit.uuid.as_deref() == Some(id.as_str()));

        match exact.or_else(|| query.extensions.first()) {
            Some(hit) => {
                if hit.uuid.as_deref() != Some(id.as_str()) {
                    warn!(
                        "Registry search for {} returned {}; using it anyway",
                        id,
                        hit.uuid.as_deref().unwrap_or("an unnamed extension")
                    );
                }
                Ok(hit.pk)
            }
            None => Err(RegistryError::not_found(id.as_str())),
        }
    }
}

impl ExtensionSource for ExtensionRegistryClient {
    fn download_extension(
        &self,
        cache_dir: &Path,
        id: &ExtensionId,
        shell_version: &ShellVersion,
    ) -> Result<DownloadOutcome, RegistryError> {
        let target = archive_path(cache_dir, id)?;
        if target.exists() {
            debug!("Using cached archive {}", target.display());
            return Ok(DownloadOutcome::Cached(target));
        }

        let url = self.resolve_download(id, shell_version)?;
        info!("Downloading {} from {}", id, url);
        let bytes = self.fetch_archive(&url)?;

        write_archive(cache_dir, &target, &bytes)?;
        Ok(DownloadOutcome::Downloaded(target))
    }
}

/// Cache location of the archive for `id`
pub fn archive_path(cache_dir: &Path, id: &ExtensionId) -> Result<PathBuf, RegistryError> {
    let name = id.as_str();
    if name.contains('/') || name.contains('\\') || name.starts_with('.') {
        return Err(RegistryError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            format!("extension id {name:?} cannot be used as a file name"),
        )));
    }
    Ok(cache_dir.join(name))
}

fn write_archive(cache_dir: &Path, target: &Path, bytes: &[u8]) -> Result<(), RegistryError> {
    fs::create_dir_all(cache_dir)?;
    let mut temp = NamedTempFile::new_in(cache_dir)?;
    temp.write_all(bytes)?;
    temp.persist(target).map_err(|e| RegistryError::Io(e.error))?;
    Ok(())
}
