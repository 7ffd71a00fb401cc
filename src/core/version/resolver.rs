// ─── Version Resolver ───
// Maps a build argument to a concrete version id and its detail document,
// memoizing both network documents for the lifetime of one resolver.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};
use tracing::{debug, info};

use crate::core::error::{BuilderError, BuilderResult};

use super::manifest::VersionManifest;
use super::version_file::VersionDetail;

pub const LATEST_SENTINEL: &str = "latest";
pub const LATEST_SNAPSHOT_SENTINEL: &str = "latest-snapshot";

/// A parsed build argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildArg {
    LatestRelease,
    LatestSnapshot,
    Exact(String),
}

impl BuildArg {
    /// Surrounding whitespace is stripped from literal ids as well as sentinels.
    pub fn parse(raw: &str) -> BuilderResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(BuilderError::InvalidBuildArg(raw.to_string()));
        }
        if trimmed.eq_ignore_ascii_case(LATEST_SENTINEL) {
            Ok(Self::LatestRelease)
        } else if trimmed.eq_ignore_ascii_case(LATEST_SNAPSHOT_SENTINEL) {
            Ok(Self::LatestSnapshot)
        } else {
            Ok(Self::Exact(trimmed.to_string()))
        }
    }
}

/// Per-build-run resolver. Dropping it discards the memoized documents.
pub struct VersionResolver {
    client: reqwest::Client,
    manifest_url: String,
    manifest: OnceCell<Arc<VersionManifest>>,
    details: Mutex<HashMap<String, Arc<VersionDetail>>>,
}

impl VersionResolver {
    pub fn new(client: reqwest::Client, manifest_url: impl Into<String>) -> Self {
        Self {
            client,
            manifest_url: manifest_url.into(),
            manifest: OnceCell::new(),
            details: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch the manifest once; later calls return the same `Arc`.
    pub async fn fetch_manifest(&self) -> BuilderResult<Arc<VersionManifest>> {
        let manifest = self
            .manifest
            .get_or_try_init(|| async {
                VersionManifest::fetch(&self.client, &self.manifest_url)
                    .await
                    .map(Arc::new)
            })
            .await?;
        Ok(Arc::clone(manifest))
    }

    /// Look `id` up in the manifest and fetch its detail document once.
    ///
    /// An unknown id fails without touching any detail endpoint.
    pub async fn resolve_version(&self, id: &str) -> BuilderResult<Arc<VersionDetail>> {
        // Held across the fetch so a detail document is requested at most once.
        let mut details = self.details.lock().await;
        if let Some(detail) = details.get(id) {
            debug!("Version {} served from run cache", id);
            return Ok(Arc::clone(detail));
        }

        let manifest = self.fetch_manifest().await?;
        let entry = manifest
            .find_version(id)
            .ok_or_else(|| BuilderError::VersionNotFound(id.to_string()))?;

        info!("Resolving version {}", id);
        let detail = Arc::new(VersionDetail::fetch(&self.client, &entry.url).await?);
        details.insert(id.to_string(), Arc::clone(&detail));
        Ok(detail)
    }

    /// Substitute the "latest" sentinels; literal ids pass through without a fetch.
    pub async fn normalize_version_arg(&self, raw: &str) -> BuilderResult<String> {
        let id = match BuildArg::parse(raw)? {
            BuildArg::Exact(id) => return Ok(id),
            BuildArg::LatestRelease => self.fetch_manifest().await?.latest.release.clone(),
            BuildArg::LatestSnapshot => self.fetch_manifest().await?.latest.snapshot.clone(),
        };
        info!("Build argument {:?} resolved to {}", raw.trim(), id);
        Ok(id)
    }
}
