use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::config::FetcherSettings;
use crate::core::error::{BuilderError, BuilderResult};
use crate::core::paper::PaperApi;

use super::{context::BuildContext, paper::PaperBuilder, vanilla::VanillaBuilder};

/// Jar location every builder declares, relative to the build root.
pub const SERVER_JAR: &str = "server.jar";

/// Supported server distributions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ServerFlavor {
    Vanilla,
    Paper,
}

impl fmt::Display for ServerFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerFlavor::Vanilla => write!(f, "vanilla"),
            ServerFlavor::Paper => write!(f, "paper"),
        }
    }
}

impl FromStr for ServerFlavor {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "vanilla" => Ok(Self::Vanilla),
            "paper" | "papermc" => Ok(Self::Paper),
            other => Err(BuilderError::Other(format!(
                "unknown server flavor {other:?} (expected vanilla or paper)"
            ))),
        }
    }
}

/// A named unit of work in a builder's sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    DownloadServer,
    UpdateVolumes,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Step::DownloadServer => "download_server",
            Step::UpdateVolumes => "update_volumes",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Step::DownloadServer => "Downloading server",
            Step::UpdateVolumes => "Declaring volumes",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[async_trait]
pub trait ServerBuilder: Send + Sync {
    /// Ordered steps; the host runs them one after another.
    fn steps(&self) -> &'static [Step];

    async fn run_step(&self, step: Step, ctx: &mut BuildContext<'_>) -> BuilderResult<()>;

    fn jar_name(&self) -> &'static str {
        SERVER_JAR
    }
}

pub(crate) fn unsupported_step(flavor: ServerFlavor, step: Step) -> BuilderError {
    BuilderError::Other(format!("{flavor} builder has no step {step}"))
}

/// Dispatcher without `Box<dyn>`.
pub enum Builder {
    Vanilla(VanillaBuilder),
    Paper(PaperBuilder),
}

impl Builder {
    pub fn new(flavor: ServerFlavor, client: reqwest::Client, settings: &FetcherSettings) -> Self {
        match flavor {
            ServerFlavor::Vanilla => Self::Vanilla(VanillaBuilder),
            ServerFlavor::Paper => {
                Self::Paper(PaperBuilder::new(PaperApi::new(client, &settings.paper_api_base)))
            }
        }
    }

    pub fn flavor(&self) -> ServerFlavor {
        match self {
            Builder::Vanilla(_) => ServerFlavor::Vanilla,
            Builder::Paper(_) => ServerFlavor::Paper,
        }
    }

    pub fn steps(&self) -> &'static [Step] {
        match self {
            Builder::Vanilla(b) => b.steps(),
            Builder::Paper(b) => b.steps(),
        }
    }

    pub fn jar_name(&self) -> &'static str {
        match self {
            Builder::Vanilla(b) => b.jar_name(),
            Builder::Paper(b) => b.jar_name(),
        }
    }

    pub async fn run_step(&self, step: Step, ctx: &mut BuildContext<'_>) -> BuilderResult<()> {
        match self {
            Builder::Vanilla(b) => b.run_step(step, ctx).await,
            Builder::Paper(b) => b.run_step(step, ctx).await,
        }
    }
}
