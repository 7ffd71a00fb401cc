pub mod builder;
pub mod context;
pub mod paper;
pub mod pipeline;
pub mod vanilla;

pub use builder::{Builder, ServerBuilder, ServerFlavor, Step, SERVER_JAR};
pub use context::BuildContext;
pub use paper::{PaperBuilder, PAPER_VOLUMES};
pub use pipeline::{BuildOutput, BuildPipeline, BuildState};
pub use vanilla::VanillaBuilder;
