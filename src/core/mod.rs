// ─── mcserver-fetch Core ───
// Fetches Minecraft server jars into a container build root.
//
// Architecture:
//   core/
//     version/    — Mojang manifest, version detail, per-run resolver
//     paper       — PaperMC build lookup + download URL
//     downloader/ — Streaming download with atomic replace
//     builders/   — Vanilla and Paper step sequences + pipeline
//     config      — Endpoint settings and server directory discovery
//     http        — Shared HTTP client

pub mod builders;
pub mod config;
pub mod downloader;
pub mod error;
pub mod http;
pub mod paper;
pub mod version;

#[cfg(test)]
pub(crate) mod testing;
