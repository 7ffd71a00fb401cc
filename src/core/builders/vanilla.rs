use async_trait::async_trait;
use tracing::info;

use crate::core::error::BuilderResult;

use super::builder::{unsupported_step, ServerBuilder, ServerFlavor, Step};
use super::context::BuildContext;

/// Vanilla server — resolves the official Mojang version document
/// and downloads its server jar.
pub struct VanillaBuilder;

#[async_trait]
impl ServerBuilder for VanillaBuilder {
    fn steps(&self) -> &'static [Step] {
        &[Step::DownloadServer]
    }

    async fn run_step(&self, step: Step, ctx: &mut BuildContext<'_>) -> BuilderResult<()> {
        match step {
            Step::DownloadServer => {
                let version = ctx.version().await?;
                let detail = ctx.resolver.resolve_version(&version).await?;
                let url = detail.server_download()?.url.clone();

                let dest = ctx.path_in_root(self.jar_name());
                info!("Fetching Vanilla {} server from {}", version, url);
                ctx.downloader.stream_download(&url, &dest).await?;
                ctx.record_source(url);
                Ok(())
            }
            other => Err(unsupported_step(ServerFlavor::Vanilla, other)),
        }
    }
}
