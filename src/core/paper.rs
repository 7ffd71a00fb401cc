// ─── PaperMC API ───
// Build-number lookup and download URL templating against the PaperMC v1 API.

use serde::{Deserialize, Deserializer};
use tracing::{debug, info};

use crate::core::error::{BuilderError, BuilderResult};

/// Response of `GET {base}/paper/{version}/`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BuildInfo {
    #[serde(default)]
    pub version: Option<String>,
    pub builds: Builds,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Builds {
    #[serde(deserialize_with = "build_number")]
    pub latest: u64,
}

/// The v1 API encodes build numbers as strings; accept integers as well.
fn build_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(u64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(n) => Ok(n),
        Raw::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

pub struct PaperApi {
    client: reqwest::Client,
    base: String,
}

impl PaperApi {
    pub fn new(client: reqwest::Client, base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            client,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_info_url(&self, version: &str) -> String {
        format!("{}/paper/{}/", self.base, version)
    }

    /// Always re-queried: the latest build moves between calls.
    pub async fn latest_build(&self, version: &str) -> BuilderResult<u64> {
        let url = self.build_info_url(version);
        debug!("GET {}", url);

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(BuilderError::HttpStatus {
                url,
                status: status.as_u16(),
            });
        }

        let raw = resp.text().await?;
        let info: BuildInfo = serde_json::from_str(&raw)?;

        info!("Latest Paper build for {} is {}", version, info.builds.latest);
        Ok(info.builds.latest)
    }

    pub fn download_url(&self, version: &str, build: u64) -> String {
        format!("{}/paper/{}/{}/download", self.base, version, build)
    }
}
