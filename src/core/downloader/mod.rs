pub mod client;

pub use client::{DownloadReport, Downloader};
