// ─── Version File ───
// Parses the per-version Mojang detail document.

use serde::Deserialize;
use tracing::debug;

use crate::core::error::{BuilderError, BuilderResult};

/// Detail document for one version id. Only the fields this workflow reads are modelled.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VersionDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub downloads: Option<VersionDownloads>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VersionDownloads {
    #[serde(default)]
    pub client: Option<DownloadArtifact>,
    #[serde(default)]
    pub server: Option<DownloadArtifact>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub url: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub sha1: Option<String>,
}

impl VersionDetail {
    /// Fetch and parse a version detail document from the given URL.
    pub async fn fetch(client: &reqwest::Client, url: &str) -> BuilderResult<Self> {
        debug!("GET {}", url);
        let response = client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(BuilderError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let raw = response.text().await?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The dedicated server artifact. Old versions publish no server jar.
    pub fn server_download(&self) -> BuilderResult<&DownloadArtifact> {
        self.downloads
            .as_ref()
            .and_then(|d| d.server.as_ref())
            .ok_or_else(|| BuilderError::MissingField {
                document: format!(
                    "version detail for {}",
                    self.id.as_deref().unwrap_or("<unknown>")
                ),
                field: "downloads.server.url",
            })
    }
}
