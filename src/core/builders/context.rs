use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::core::downloader::Downloader;
use crate::core::error::BuilderResult;
use crate::core::version::VersionResolver;

/// State of one build run.
///
/// Owns its `VersionResolver`, so memoized metadata is created with the run and
/// discarded with it; two runs never share a cache.
pub struct BuildContext<'a> {
    pub requested_version: String,
    pub root: PathBuf,
    pub downloader: &'a Downloader,
    pub resolver: VersionResolver,
    resolved_version: Option<String>,
    source_url: Option<String>,
    volumes: BTreeSet<String>,
}

impl<'a> BuildContext<'a> {
    pub fn new(
        requested_version: impl Into<String>,
        root: impl Into<PathBuf>,
        downloader: &'a Downloader,
        resolver: VersionResolver,
    ) -> Self {
        Self {
            requested_version: requested_version.into(),
            root: root.into(),
            downloader,
            resolver,
            resolved_version: None,
            source_url: None,
            volumes: BTreeSet::new(),
        }
    }

    /// Concrete version id for this run; the build argument is normalized once.
    pub async fn version(&mut self) -> BuilderResult<String> {
        if let Some(id) = &self.resolved_version {
            return Ok(id.clone());
        }
        let id = self
            .resolver
            .normalize_version_arg(&self.requested_version)
            .await?;
        self.resolved_version = Some(id.clone());
        Ok(id)
    }

    pub fn resolved_version(&self) -> Option<&str> {
        self.resolved_version.as_deref()
    }

    /// Absolute location of a path declared relative to the build root.
    pub fn path_in_root(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn record_source(&mut self, url: impl Into<String>) {
        self.source_url = Some(url.into());
    }

    pub fn source_url(&self) -> Option<&str> {
        self.source_url.as_deref()
    }

    /// Mark paths as externally mutable. Nothing is written to them.
    pub fn declare_volumes<I, S>(&mut self, paths: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.volumes.extend(paths.into_iter().map(Into::into));
    }

    pub fn volumes(&self) -> &BTreeSet<String> {
        &self.volumes
    }
}
