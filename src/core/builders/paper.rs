use async_trait::async_trait;
use tracing::info;

use crate::core::error::BuilderResult;
use crate::core::paper::PaperApi;

use super::builder::{ServerBuilder, Step};
use super::context::BuildContext;

/// Server-written files that must survive container restarts.
pub const PAPER_VOLUMES: [&str; 4] = ["paper.yml", "bukkit.yml", "spigot.yml", "cache"];

/// PaperMC server — picks the newest build for the version and downloads it.
pub struct PaperBuilder {
    api: PaperApi,
}

impl PaperBuilder {
    pub fn new(api: PaperApi) -> Self {
        Self { api }
    }
}

#[async_trait]
impl ServerBuilder for PaperBuilder {
    fn steps(&self) -> &'static [Step] {
        &[Step::DownloadServer, Step::UpdateVolumes]
    }

    async fn run_step(&self, step: Step, ctx: &mut BuildContext<'_>) -> BuilderResult<()> {
        match step {
            Step::DownloadServer => {
                let version = ctx.version().await?;
                let build = self.api.latest_build(&version).await?;
                let url = self.api.download_url(&version, build);

                let dest = ctx.path_in_root(self.jar_name());
                info!("Fetching Paper {} build {}", version, build);
                ctx.downloader.stream_download(&url, &dest).await?;
                ctx.record_source(url);
                Ok(())
            }
            Step::UpdateVolumes => {
                ctx.declare_volumes(PAPER_VOLUMES);
                Ok(())
            }
        }
    }
}
