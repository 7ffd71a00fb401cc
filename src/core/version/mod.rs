pub mod manifest;
pub mod resolver;
pub mod version_file;

pub use manifest::{LatestVersions, VersionEntry, VersionManifest};
pub use resolver::{BuildArg, VersionResolver};
pub use version_file::{DownloadArtifact, VersionDetail, VersionDownloads};
