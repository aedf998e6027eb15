use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, info};

/// Mojang's version manifest.
pub const VERSION_MANIFEST_URL: &str = "https://launchermeta.mojang.com/mc/game/version_manifest.json";

/// Fabric Meta list of installer releases, newest first.
pub const FABRIC_INSTALLERS_URL: &str = "https://meta.fabricmc.net/v2/versions/installer";

/// Errors raised while talking to the version catalogs.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the body was not valid JSON.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
    /// The version metadata has no server jar to download.
    #[error("Unable to download Minecraft server: no server download for version {version}")]
    MissingServerDownload { version: String },
    /// Fabric Meta returned an empty installer list.
    #[error("Fabric Meta returned no installer")]
    NoFabricInstaller,
}

/// Where the catalogs are fetched from.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub version_manifest: String,
    pub fabric_installers: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            version_manifest: VERSION_MANIFEST_URL.to_string(),
            fabric_installers: FABRIC_INSTALLERS_URL.to_string(),
        }
    }
}

/// Top-level version manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionManifest {
    pub versions: Vec<VersionEntry>,
}

/// One version of the manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct VersionEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    /// URL of the per-version metadata document.
    pub url: String,
}

/// Which manifest entries are offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseFilter {
    ReleasesOnly,
    All,
}

impl ReleaseFilter {
    /// Maps the answer of the version-type question: index 0 is "Release".
    pub fn from_index(index: usize) -> Self {
        if index == 0 {
            ReleaseFilter::ReleasesOnly
        } else {
            ReleaseFilter::All
        }
    }
}

impl VersionManifest {
    /// Entries passing `filter`, in manifest order.
    pub fn filtered(&self, filter: ReleaseFilter) -> Vec<&VersionEntry> {
        self.versions
            .iter()
            .filter(|v| filter == ReleaseFilter::All || v.kind == "release")
            .collect()
    }

    pub fn ids(&self, filter: ReleaseFilter) -> Vec<String> {
        self.filtered(filter).into_iter().map(|v| v.id.clone()).collect()
    }
}

#[derive(Debug, Deserialize)]
struct VersionDetail {
    #[serde(default)]
    downloads: Option<VersionDownloads>,
}

#[derive(Debug, Deserialize)]
struct VersionDownloads {
    #[serde(default)]
    server: Option<DownloadInfo>,
}

/// A downloadable artifact from the per-version metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct DownloadInfo {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
}

/// A Fabric installer release.
#[derive(Debug, Clone, Deserialize)]
pub struct FabricInstaller {
    pub url: String,
    pub version: String,
}

/// Client for the Mojang and Fabric catalogs.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    endpoints: Endpoints,
}

impl CatalogClient {
    /// Creates a catalog client.
    ///
    /// # Arguments
    ///
    /// * `client` - HTTP client shared with the downloads.
    /// * `endpoints` - Catalog URLs, usually [`Endpoints::default`].
    pub fn new(client: Client, endpoints: Endpoints) -> Self {
        Self { client, endpoints }
    }

    /// The underlying HTTP client, reused for jar downloads.
    pub fn http(&self) -> &Client {
        &self.client
    }

    /// Fetches the version manifest.
    ///
    /// # Returns
    ///
    /// * `Ok(VersionManifest)` - Every version, newest first as Mojang lists them.
    /// * `Err(CatalogError)` - The request failed or returned a non-success status.
    pub async fn fetch_manifest(&self) -> Result<VersionManifest, CatalogError> {
        info!("Fetching Minecraft version manifest");
        let manifest: VersionManifest = self.get_json(&self.endpoints.version_manifest).await?;
        info!("Loaded {} versions from manifest", manifest.versions.len());
        Ok(manifest)
    }

    /// Resolves the server jar of `entry`.
    ///
    /// Fails with [`CatalogError::MissingServerDownload`] when the metadata has no server URL.
    pub async fn server_download(&self, entry: &VersionEntry) -> Result<DownloadInfo, CatalogError> {
        debug!(version = %entry.id, url = %entry.url, "Fetching version metadata");
        let detail: VersionDetail = self.get_json(&entry.url).await?;
        detail
            .downloads
            .and_then(|d| d.server)
            .filter(|server| server.url.as_deref().is_some_and(|u| !u.is_empty()))
            .ok_or_else(|| CatalogError::MissingServerDownload {
                version: entry.id.clone(),
            })
    }

    /// The newest Fabric installer (first entry of the list).
    pub async fn latest_fabric_installer(&self) -> Result<FabricInstaller, CatalogError> {
        let installers: Vec<FabricInstaller> = self.get_json(&self.endpoints.fabric_installers).await?;
        let latest = installers.into_iter().next().ok_or(CatalogError::NoFabricInstaller)?;
        debug!(version = %latest.version, "Selected Fabric installer");
        Ok(latest)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(CatalogError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }
        Ok(response.json::<T>().await?)
    }
}
