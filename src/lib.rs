pub mod commands;
pub mod core;

use tracing_subscriber::EnvFilter;

pub use crate::core::builders::{BuildOutput, Builder, ServerFlavor};
pub use crate::core::error::{BuilderError, BuilderResult};

/// Initialize structured logging on stderr.
///
/// `RUST_LOG` wins when set; otherwise `verbose` raises this crate to debug.
pub fn init_tracing(verbose: bool) {
    let default = if verbose {
        "info,mcserver_fetch=debug"
    } else {
        "warn,mcserver_fetch=info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
