//! 🪣 bkt -- put a folder in a bucket, one file at a time, and say so.
//!
//! 🧠 Knowledge graph:
//! - `app_config`: figment-backed `AppConfig` (env → TOML → CLI overrides)
//! - `common`: `UploadJob`, `FileEntry`, `ObjectKey`, `UploadOutcome`, `RunStatus`
//! - `backends`: the `ObjectStore` seam and its S3 implementation
//! - `uploader`: the walk-name-ship-log loop
//! - `report`: `RunReport` and its summary table

pub mod app_config;
pub mod backends;
pub mod common;
pub mod report;
pub mod uploader;

use anyhow::Result;

pub use app_config::{AppConfig, ConfigOverrides, RuntimeConfig, load_config};
pub use backends::{ObjectStore, S3Store, S3StoreConfig};
pub use common::{FileEntry, ObjectKey, RunStatus, UploadJob, UploadOutcome};
pub use report::RunReport;
pub use uploader::Uploader;

/// 🚀 Build the S3 client once, run the job, hand back the receipts.
pub async fn run(app_config: AppConfig) -> Result<RunReport> {
    let store = S3Store::new(&app_config.s3).await;
    let uploader = Uploader::new(store).follow_links(app_config.runtime.follow_links);
    uploader.upload(&app_config.job).await
}
