//! 🚀 bkt-cli -- the front door, the bouncer, the maitre d' of bkt.
//!
//! 🎬 *[narrator voice]* "It all started with a simple main() function..."
//! 📦 This binary is the thin CLI wrapper that parses flags, sets up logging,
//! loads config, and then lets the library do the heavy lifting.
//! Like a manager. 🦆

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// 🪣 Upload a local folder to an S3 bucket, keeping relative paths as keys.
#[derive(Debug, Parser)]
#[command(name = "bkt", version)]
struct Cli {
    /// TOML config file. Optional; flags and BKT_* env vars also work.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Local folder to upload.
    #[arg(long)]
    folder: Option<String>,

    /// Destination bucket.
    #[arg(long)]
    bucket: Option<String>,

    /// Key prefix. Pass an empty string to upload to the bucket root.
    #[arg(long)]
    prefix: Option<String>,

    /// AWS region override. Defaults to the ambient AWS configuration.
    #[arg(long)]
    region: Option<String>,

    /// Descend into symlinked directories.
    #[arg(long)]
    follow_links: bool,

    /// Exit 1 if the folder is missing or any upload fails.
    #[arg(long)]
    strict: bool,

    /// Skip the summary table at the end.
    #[arg(long)]
    no_summary: bool,
}

impl Cli {
    /// 🎚️ Only flags that were actually passed get an opinion.
    fn overrides(&self) -> bkt::ConfigOverrides {
        bkt::ConfigOverrides {
            folder_path: self.folder.clone(),
            bucket_name: self.bucket.clone(),
            prefix: self.prefix.clone(),
            region: self.region.clone(),
            follow_links: self.follow_links.then_some(true),
            strict: self.strict.then_some(true),
            summary: self.no_summary.then_some(false),
        }
    }
}

/// 🚀 main() -- where it all begins.
///
/// 🔧 Steps:
/// 1. Init tracing (so we can see what goes wrong, and when)
/// 2. Parse args
/// 3. Load config
/// 4. Upload
/// 5. Summarize, pick an exit code
#[tokio::main]
async fn main() -> Result<()> {
    // 📡 RUST_LOG wins if set; otherwise info, so every per-file line shows up
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    let result = async {
        let app_config = bkt::load_config(cli.config.as_deref(), &cli.overrides())
            .context("💀 In bkt-cli, main, we couldn't load the configuration. Check the file, the flags, and the BKT_* env vars.")?;
        let runtime = app_config.runtime.clone();
        let report = bkt::run(app_config).await?;
        Ok::<_, anyhow::Error>((runtime, report))
    }
    .await;

    let (runtime, report) = match result {
        Ok(done) => done,
        Err(err) => {
            error!("💀 error: {}", err);
            // -- 🧅 peel the onion of sadness, one layer at a time
            for cause in err.chain().skip(1) {
                error!("⚠️  cause: {}", cause);
            }
            std::process::exit(1);
        }
    };

    // -- 👻 a missing root already said everything in its one error line
    if runtime.summary && report.has_anything_to_summarize() {
        info!("📊 run summary\n{}", report.summary_table());
    }

    // 🚨 by default a bad run still exits 0, same as a good one. strict mode disagrees.
    if runtime.strict && !report.is_clean() {
        error!(
            "🚨 strict mode: {} of {} upload(s) failed, status: {}",
            report.failed(),
            report.attempted(),
            report.status
        );
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_clap_agrees_with_itself() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn the_one_where_unset_flags_have_no_opinion() {
        let cli = Cli::parse_from(["bkt", "--bucket", "my-bucket"]);
        let overrides = cli.overrides();
        assert_eq!(overrides.bucket_name.as_deref(), Some("my-bucket"));
        assert!(overrides.folder_path.is_none());
        assert!(overrides.strict.is_none());
        assert!(overrides.summary.is_none());
    }

    #[test]
    fn the_one_where_switches_turn_into_overrides() {
        let cli = Cli::parse_from([
            "bkt",
            "--folder",
            "scripts/spec-sheets",
            "--prefix",
            "",
            "--strict",
            "--no-summary",
            "--follow-links",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.folder_path.as_deref(), Some("scripts/spec-sheets"));
        assert_eq!(overrides.prefix.as_deref(), Some(""));
        assert_eq!(overrides.strict, Some(true));
        assert_eq!(overrides.summary, Some(false));
        assert_eq!(overrides.follow_links, Some(true));
    }
}
