use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

use crate::core::error::{BuilderError, BuilderResult};

/// Outcome of a completed download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadReport {
    pub path: PathBuf,
    pub bytes: u64,
}

/// Streaming downloader. The body is copied chunk by chunk and never held whole in memory.
pub struct Downloader {
    client: Client,
    show_progress: bool,
}

impl Downloader {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            show_progress: false,
        }
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Stream `url` into `dest`, replacing any existing file.
    ///
    /// The status is checked before the filesystem is touched. Bytes land in a
    /// sibling `.part` file that is renamed over `dest` only once the body is
    /// complete, so a failed download leaves `dest` as it was.
    pub async fn stream_download(&self, url: &str, dest: &Path) -> BuilderResult<DownloadReport> {
        debug!("GET {}", url);
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BuilderError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BuilderError::io(parent, e))?;
        }

        let part = part_path(dest);
        let progress = self.progress_bar(response.content_length(), dest);

        let result = copy_body(response, &part, &progress).await;
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                progress.abandon();
                discard_part(&part).await;
                return Err(e);
            }
        };

        if let Err(e) = tokio::fs::rename(&part, dest).await {
            discard_part(&part).await;
            return Err(BuilderError::io(dest, e));
        }

        progress.finish_and_clear();
        info!("Downloaded {} bytes -> {:?}", bytes, dest);
        Ok(DownloadReport {
            path: dest.to_path_buf(),
            bytes,
        })
    }

    fn progress_bar(&self, total: Option<u64>, dest: &Path) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let pb = ProgressBar::new(total.unwrap_or(0));
        if let Ok(style) =
            ProgressStyle::default_bar().template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})")
        {
            pb.set_style(style.progress_chars("=> "));
        }
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        pb.set_message(format!("Downloading {name}"));
        pb
    }
}

async fn copy_body(
    response: reqwest::Response,
    part: &Path,
    progress: &ProgressBar,
) -> BuilderResult<u64> {
    // Scoped so the handle is closed before the rename.
    let mut file = tokio::fs::File::create(part)
        .await
        .map_err(|e| BuilderError::io(part, e))?;

    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk)
            .await
            .map_err(|e| BuilderError::io(part, e))?;
        written += chunk.len() as u64;
        progress.inc(chunk.len() as u64);
    }

    file.flush().await.map_err(|e| BuilderError::io(part, e))?;
    file.sync_all().await.map_err(|e| BuilderError::io(part, e))?;
    Ok(written)
}

async fn discard_part(part: &Path) {
    if let Err(e) = tokio::fs::remove_file(part).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!("Could not remove partial download {:?}: {}", part, e);
        }
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    dest.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::testing::FixtureServer;
    use axum::http::StatusCode;

    fn jar_bytes(len: usize) -> Vec<u8> {
        (0..len).map(|i| (i % 251) as u8).collect()
    }

    #[test]
    fn part_path_is_a_sibling() {
        assert_eq!(
            part_path(Path::new("/mc/server.jar")),
            PathBuf::from("/mc/server.jar.part")
        );
    }

    #[tokio::test]
    async fn writes_full_body() {
        let server = FixtureServer::start().await;
        let body = jar_bytes(3 * 1024 * 1024 + 17);
        server.serve_bytes("/server.jar", &body);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("server.jar");

        let report = Downloader::new(Client::new())
            .stream_download(&server.url("/server.jar"), &dest)
            .await
            .unwrap();

        assert_eq!(report.bytes, body.len() as u64);
        assert_eq!(std::fs::read(&dest).unwrap(), body);
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn overwrites_longer_existing_file() {
        let server = FixtureServer::start().await;
        server.serve_bytes("/server.jar", b"new jar");
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("server.jar");
        std::fs::write(&dest, vec![0xAA; 4096]).unwrap();

        Downloader::new(Client::new())
            .stream_download(&server.url("/server.jar"), &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"new jar");
    }

    #[tokio::test]
    async fn not_found_creates_no_file() {
        let server = FixtureServer::start().await;
        server.serve_status("/missing.jar", StatusCode::NOT_FOUND);
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("server.jar");

        let err = Downloader::new(Client::new())
            .stream_download(&server.url("/missing.jar"), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, BuilderError::HttpStatus { status: 404, .. }));
        assert!(!dest.exists());
        assert!(!part_path(&dest).exists());
    }

    #[tokio::test]
    async fn not_found_keeps_existing_file() {
        let server = FixtureServer::start().await;
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("server.jar");
        std::fs::write(&dest, b"previous build").unwrap();

        let err = Downloader::new(Client::new())
            .stream_download(&server.url("/missing.jar"), &dest)
            .await
            .unwrap_err();

        assert!(err.is_http());
        assert_eq!(std::fs::read(&dest).unwrap(), b"previous build");
    }

    #[tokio::test]
    async fn creates_missing_parent_directories() {
        let server = FixtureServer::start().await;
        server.serve_bytes("/server.jar", b"jar");
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("image").join("mc").join("server.jar");

        Downloader::new(Client::new())
            .stream_download(&server.url("/server.jar"), &dest)
            .await
            .unwrap();

        assert_eq!(std::fs::read(&dest).unwrap(), b"jar");
    }

    #[tokio::test]
    async fn unwritable_destination_is_io_error() {
        let server = FixtureServer::start().await;
        server.serve_bytes("/server.jar", b"jar");
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the parent directory should be.
        let blocker = dir.path().join("mc");
        std::fs::write(&blocker, b"not a directory").unwrap();
        let dest = blocker.join("server.jar");

        let err = Downloader::new(Client::new())
            .stream_download(&server.url("/server.jar"), &dest)
            .await
            .unwrap_err();

        assert!(matches!(err, BuilderError::Io { .. }));
    }

    #[tokio::test]
    async fn truncated_body_keeps_existing_file() {
        use tokio::io::AsyncReadExt;

        // Advertises 1000 bytes, sends ten, then hangs up.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await.unwrap();
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 1000\r\n\r\nonly ten b")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("server.jar");
        std::fs::write(&dest, b"previous build").unwrap();

        let err = Downloader::new(Client::new())
            .stream_download(&format!("http://{addr}/server.jar"), &dest)
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(matches!(err, BuilderError::Http(_)));
        assert_eq!(std::fs::read(&dest).unwrap(), b"previous build");
        assert!(!part_path(&dest).exists());
    }
}
