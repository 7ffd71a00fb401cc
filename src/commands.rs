use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use crate::core::builders::{BuildContext, BuildOutput, BuildPipeline, Builder, ServerFlavor};
use crate::core::config::{find_server_dir, FetcherSettings};
use crate::core::downloader::Downloader;
use crate::core::error::BuilderResult;
use crate::core::http::build_http_client;
use crate::core::paper::PaperApi;
use crate::core::version::resolver::LATEST_SENTINEL;
use crate::core::version::VersionResolver;

#[derive(Debug, Parser)]
#[command(name = "mcserver-fetch", version, about = "Fetch Minecraft server jars into a build root")]
pub struct Cli {
    /// Settings file (JSON). Defaults to the user config directory.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging for this crate.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download a server jar and report the jar path and volumes.
    Build {
        /// vanilla or paper
        flavor: ServerFlavor,

        /// Version id, `latest` or `latest-snapshot`.
        #[arg(long, default_value = LATEST_SENTINEL, env = "MINECRAFT_VERSION")]
        version: String,

        /// Server directory; falls back to MINECRAFT_ROOT, then /mc.
        #[arg(long)]
        server_dir: Option<PathBuf>,

        #[arg(long)]
        json: bool,

        /// Show a download progress bar.
        #[arg(long)]
        progress: bool,
    },
    /// Print the Vanilla server download URL for a version.
    Resolve {
        #[arg(default_value = LATEST_SENTINEL)]
        version: String,
    },
    /// Print the latest PaperMC build and its download URL.
    PaperBuild {
        #[arg(default_value = LATEST_SENTINEL)]
        version: String,
    },
    /// List versions published in the manifest.
    Versions {
        /// Include snapshots and old alpha/beta versions.
        #[arg(long)]
        all: bool,
    },
}

impl Command {
    pub fn name(&self) -> &'static str {
        match self {
            Command::Build { .. } => "build",
            Command::Resolve { .. } => "resolve",
            Command::PaperBuild { .. } => "paper-build",
            Command::Versions { .. } => "versions",
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedServer {
    pub version: String,
    pub url: String,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PaperBuildInfo {
    pub version: String,
    pub build: u64,
    pub url: String,
}

/// Entry point of the binary once arguments are parsed.
pub async fn run(cli: Cli) -> BuilderResult<()> {
    let settings = FetcherSettings::load(cli.config.as_deref())?;
    let client = build_http_client(&settings)?;

    match cli.command {
        Command::Build {
            flavor,
            version,
            server_dir,
            json,
            progress,
        } => {
            let root = find_server_dir(server_dir);
            let output = build_server(&settings, client, flavor, &version, root, progress).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                println!("jar: {}", output.jar_path.display());
                for volume in &output.volumes {
                    println!("volume: {volume}");
                }
            }
        }
        Command::Resolve { version } => {
            let resolved = resolve_vanilla(&settings, client, &version).await?;
            println!("{} {}", resolved.version, resolved.url);
        }
        Command::PaperBuild { version } => {
            let info = paper_build(&settings, client, &version).await?;
            println!("{} build {} {}", info.version, info.build, info.url);
        }
        Command::Versions { all } => {
            for id in list_versions(&settings, client, all).await? {
                println!("{id}");
            }
        }
    }

    Ok(())
}

/// Run one complete build into `root`. The resolver cache lives only for this call.
pub async fn build_server(
    settings: &FetcherSettings,
    client: reqwest::Client,
    flavor: ServerFlavor,
    version: &str,
    root: PathBuf,
    progress: bool,
) -> BuilderResult<BuildOutput> {
    let downloader = Downloader::new(client.clone()).with_progress(progress);
    let builder = Builder::new(flavor, client.clone(), settings);
    let resolver = VersionResolver::new(client, &settings.manifest_url);
    let mut ctx = BuildContext::new(version, root, &downloader, resolver);

    let output = BuildPipeline::new(&builder).run(&mut ctx).await?;
    info!("Built {} {} into {:?}", output.flavor, output.version, output.jar_path);
    Ok(output)
}

pub async fn resolve_vanilla(
    settings: &FetcherSettings,
    client: reqwest::Client,
    version: &str,
) -> BuilderResult<ResolvedServer> {
    let resolver = VersionResolver::new(client, &settings.manifest_url);
    let id = resolver.normalize_version_arg(version).await?;
    let detail = resolver.resolve_version(&id).await?;
    let server = detail.server_download()?;

    Ok(ResolvedServer {
        version: id,
        url: server.url.clone(),
        size: server.size,
    })
}

pub async fn paper_build(
    settings: &FetcherSettings,
    client: reqwest::Client,
    version: &str,
) -> BuilderResult<PaperBuildInfo> {
    let resolver = VersionResolver::new(client.clone(), &settings.manifest_url);
    let id = resolver.normalize_version_arg(version).await?;
    let api = PaperApi::new(client, &settings.paper_api_base);
    let build = api.latest_build(&id).await?;

    Ok(PaperBuildInfo {
        url: api.download_url(&id, build),
        version: id,
        build,
    })
}

pub async fn list_versions(
    settings: &FetcherSettings,
    client: reqwest::Client,
    all: bool,
) -> BuilderResult<Vec<String>> {
    let resolver = VersionResolver::new(client, &settings.manifest_url);
    let manifest = resolver.fetch_manifest().await?;

    let ids = if all {
        manifest.versions.iter().map(|v| v.id.clone()).collect()
    } else {
        manifest.releases().into_iter().map(|v| v.id.clone()).collect()
    };
    Ok(ids)
}
