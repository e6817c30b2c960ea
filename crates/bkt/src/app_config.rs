//! 🔧 App Configuration -- the sacred TOML-to-struct pipeline.
//!
//! 📡 "Config not found: We looked everywhere. Under the couch. Behind the fridge.
//! In the junk drawer. Nothing." -- every developer at 3am 🦆
//!
//! 🏗️ Powered by Figment. Three layers, later ones win:
//! 1. `BKT_*` environment variables, nested with `__` (`BKT_JOB__BUCKET_NAME=...`)
//! 2. an optional TOML file
//! 3. command-line overrides

use std::path::Path;

use anyhow::Context;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::backends::S3StoreConfig;
use crate::common::UploadJob;

/// 📦 Everything the app needs to know about itself, which is more
/// self-awareness than most apps achieve in their lifetime.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// 🎯 Which folder goes to which bucket under which prefix. Required.
    pub job: UploadJob,
    #[serde(default)]
    pub s3: S3StoreConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// 🎛️ How the run behaves, as opposed to what it uploads.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// 🔗 Descend into symlinked directories.
    #[serde(default)]
    pub follow_links: bool,
    /// 🚨 Exit non-zero when the root is missing or any file failed.
    #[serde(default)]
    pub strict: bool,
    /// 🍽️ Print the summary table when the run ends.
    #[serde(default = "default_summary")]
    pub summary: bool,
}

fn default_summary() -> bool {
    true
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            follow_links: false,
            strict: false,
            summary: default_summary(),
        }
    }
}

/// 🎚️ Values from the command line. `None` means "no opinion, ask the layers below".
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub folder_path: Option<String>,
    pub bucket_name: Option<String>,
    pub prefix: Option<String>,
    pub region: Option<String>,
    pub follow_links: Option<bool>,
    pub strict: Option<bool>,
    pub summary: Option<bool>,
}

impl ConfigOverrides {
    fn layer_onto(&self, figment: Figment) -> Figment {
        let figment = layer(figment, "job.folder_path", &self.folder_path);
        let figment = layer(figment, "job.bucket_name", &self.bucket_name);
        let figment = layer(figment, "job.prefix", &self.prefix);
        let figment = layer(figment, "s3.region", &self.region);
        let figment = layer(figment, "runtime.follow_links", &self.follow_links);
        let figment = layer(figment, "runtime.strict", &self.strict);
        layer(figment, "runtime.summary", &self.summary)
    }
}

fn layer<T: Serialize>(figment: Figment, key: &str, value: &Option<T>) -> Figment {
    match value {
        Some(value) => figment.merge(Serialized::default(key, value)),
        None => figment,
    }
}

/// 🚀 Load the config -- from env vars, an optional file, and whatever the CLI insisted on.
///
/// 📐 No file means env vars plus overrides only. No "config.toml" fallback,
/// no assumptions, no pizza defaults.
///
/// 💀 Returns an error if the merged result doesn't deserialize, which in
/// practice means somebody forgot the bucket.
pub fn load_config(
    config_file_name: Option<&Path>,
    overrides: &ConfigOverrides,
) -> anyhow::Result<AppConfig> {
    debug!(
        "🔧 Loading configuration: {:#?}",
        config_file_name.unwrap_or(Path::new(""))
    );

    let config = Figment::new().merge(Env::prefixed("BKT_").split("__"));
    let config = match config_file_name {
        Some(file_name) => config.merge(Toml::file(file_name)),
        None => config,
    };
    let config = overrides.layer_onto(config);

    let context_msg = match config_file_name {
        Some(path) => format!(
            "💀 Failed to build configuration from '{}', environment variables (BKT_*) and \
             command-line flags. Did the [job] table get its folder_path and bucket_name?",
            path.display()
        ),
        None => "💀 Failed to build configuration from environment variables (BKT_*) and \
                 command-line flags. No file was provided, so --folder and --bucket have to \
                 come from somewhere."
            .to_string(),
    };

    config.extract().context(context_msg)
}
