// ─── Build Pipeline ───
// Runs a builder's declared steps in order and reports what the host needs
// to finish the image: the jar path and the declared volumes.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;
use tracing::{error, info};

use crate::core::error::BuilderResult;

use super::builder::{Builder, ServerFlavor, Step};
use super::context::BuildContext;

/// Linear lifecycle of one build. `Complete` and `Failed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    NotStarted,
    Running { completed: usize },
    Complete,
    Failed { step: Step },
}

/// What the host reads once every step succeeded.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BuildOutput {
    pub flavor: ServerFlavor,
    pub version: String,
    pub jar_name: String,
    pub jar_path: PathBuf,
    pub source_url: Option<String>,
    pub volumes: BTreeSet<String>,
}

pub struct BuildPipeline<'b> {
    builder: &'b Builder,
    state: BuildState,
}

impl<'b> BuildPipeline<'b> {
    pub fn new(builder: &'b Builder) -> Self {
        Self {
            builder,
            state: BuildState::NotStarted,
        }
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    /// Run every step once. The first error aborts the remaining steps.
    pub async fn run(&mut self, ctx: &mut BuildContext<'_>) -> BuilderResult<BuildOutput> {
        let flavor = self.builder.flavor();
        let steps = self.builder.steps();
        info!(
            "Building {} server {} ({} steps)",
            flavor,
            ctx.requested_version,
            steps.len()
        );

        for (index, step) in steps.iter().copied().enumerate() {
            self.state = BuildState::Running { completed: index };
            info!("[{}/{}] {}", index + 1, steps.len(), step.description());

            if let Err(e) = self.builder.run_step(step, ctx).await {
                if e.is_http() {
                    error!("Step {} failed talking to a remote endpoint: {}", step, e);
                } else {
                    error!("Step {} failed: {}", step, e);
                }
                self.state = BuildState::Failed { step };
                return Err(e);
            }
        }
        self.state = BuildState::Complete;

        let jar_name = self.builder.jar_name();
        Ok(BuildOutput {
            flavor,
            version: ctx
                .resolved_version()
                .unwrap_or(ctx.requested_version.as_str())
                .to_string(),
            jar_name: jar_name.to_string(),
            jar_path: ctx.path_in_root(jar_name),
            source_url: ctx.source_url().map(str::to_string),
            volumes: ctx.volumes().clone(),
        })
    }
}
