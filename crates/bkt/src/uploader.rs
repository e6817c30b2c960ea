//! 🚚 Uploader -- walk a folder, name every file, ship it, write it down.
//!
//! 🎬 *[a folder sits on disk. a bucket sits in the cloud.]*
//! *["I'll carry them over," said the Uploader. "One at a time."]*
//! *["Why not all at once?" asked the folder.]*
//! *["Because then I'd need a retry policy," it said, and began walking.]*
//!
//! 🧠 Knowledge graph:
//! - Root check first: missing or not-a-directory → one error line, `RunStatus::MissingRoot`, done.
//! - Traversal: `walkdir` on tokio's blocking pool, sorted by file name, unreadable entries skipped with a warning.
//! - Upload loop: strictly sequential. One `put_file`, one log line, next file.
//! - Per-file failures become `UploadOutcome::Failed` and the loop keeps going. Nobody aborts.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{debug, error, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::backends::ObjectStore;
use crate::common::{FileEntry, ObjectKey, RunStatus, UploadJob, UploadOutcome};
use crate::report::RunReport;

/// 🚚 Carries one [`UploadJob`] from disk to an [`ObjectStore`].
///
/// Owns its store for the whole run. Build it once, call [`Uploader::upload`]
/// as many times as you have jobs.
#[derive(Debug)]
pub struct Uploader<S> {
    store: S,
    follow_links: bool,
}

impl<S: ObjectStore> Uploader<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            follow_links: false,
        }
    }

    /// 🔗 Descend into symlinked directories too. Off by default, like the
    /// tool this one grew up next to.
    pub fn follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    /// 🚀 Upload every file under `job.folder_path` to `job.bucket_name`.
    ///
    /// Returns a [`RunReport`] whatever happened to the files. The `Err` side is
    /// only for the run itself falling over (the traversal task panicking); a
    /// missing root or a rejected upload is a normal, reported outcome.
    pub async fn upload(&self, job: &UploadJob) -> Result<RunReport> {
        let started = Instant::now();
        let root = PathBuf::from(&job.folder_path);

        if let Some(complaint) = root_complaint(&root).await {
            // -- 👻 the one and only line a missing root gets
            error!("💀 {complaint}");
            return Ok(RunReport::new(
                job.clone(),
                RunStatus::MissingRoot,
                Vec::new(),
                started.elapsed(),
            ));
        }

        let follow_links = self.follow_links;
        let walk_root = root.clone();
        // -- 📡 the blocking pool has no subscriber of its own; lend it ours so skip warnings land with the rest
        let dispatch = tracing::dispatcher::get_default(|current| current.clone());
        let entries = tokio::task::spawn_blocking(move || {
            tracing::dispatcher::with_default(&dispatch, || {
                discover_files(&walk_root, follow_links)
            })
        })
        .await
        .context("💀 the directory walk fell over mid-stride. It was not the files' fault.")?;
        debug!(
            "🚶 found {} file(s) under '{}'",
            entries.len(),
            root.display()
        );

        let mut outcomes = Vec::with_capacity(entries.len());
        for entry in &entries {
            let outcome = self.upload_one(job, entry).await;
            if outcome.is_uploaded() {
                info!("✅ {outcome}");
            } else {
                error!("💀 {outcome}");
            }
            outcomes.push(outcome);
        }

        Ok(RunReport::new(
            job.clone(),
            RunStatus::Completed,
            outcomes,
            started.elapsed(),
        ))
    }

    /// 📦 One file, one attempt, one outcome. Errors stop here and become data.
    async fn upload_one(&self, job: &UploadJob, entry: &FileEntry) -> UploadOutcome {
        let relative_path = entry.display_relative();
        let attempt = async {
            let key = ObjectKey::from_relative_path(&job.prefix, &entry.relative_path)?;
            self.store
                .put_file(&entry.local_path, &job.bucket_name, &key)
                .await?;
            Ok::<_, anyhow::Error>(key)
        }
        .await;

        match attempt {
            Ok(key) => UploadOutcome::Uploaded {
                relative_path,
                bucket: job.bucket_name.clone(),
                key,
                bytes: entry.size_bytes,
            },
            Err(err) => UploadOutcome::Failed {
                relative_path,
                detail: format!("{err:#}"),
            },
        }
    }
}

/// 🔍 Why `root` can't be uploaded, or `None` if it's a directory we can walk.
///
/// Anything that stops us reading its metadata counts as "does not exist",
/// permission errors included. From where we stand, the difference is academic.
async fn root_complaint(root: &Path) -> Option<String> {
    match tokio::fs::metadata(root).await {
        Ok(metadata) if metadata.is_dir() => None,
        Ok(_) => Some(format!(
            "Error: The folder '{}' is not a directory.",
            root.display()
        )),
        Err(_) => Some(format!(
            "Error: The folder '{}' does not exist.",
            root.display()
        )),
    }
}

/// 🚶 Every uploadable file under `root`, depth-first, sorted by name per directory.
///
/// Blocking. Call it from `spawn_blocking`, not from the middle of an async task.
fn discover_files(root: &Path, follow_links: bool) -> Vec<FileEntry> {
    let mut entries = Vec::new();
    for walked in WalkDir::new(root)
        .follow_links(follow_links)
        .sort_by_file_name()
    {
        let dir_entry = match walked {
            Ok(dir_entry) => dir_entry,
            Err(err) => {
                warn!("⚠️ skipping an entry we could not read: {err}");
                continue;
            }
        };
        if !is_uploadable(&dir_entry) {
            continue;
        }

        let relative_path = match dir_entry.path().strip_prefix(root) {
            Ok(relative_path) => relative_path.to_path_buf(),
            Err(err) => {
                warn!(
                    "⚠️ '{}' is somehow not under '{}': {err}",
                    dir_entry.path().display(),
                    root.display()
                );
                continue;
            }
        };
        // -- 📏 follows symlinks, so a linked file reports the target's size
        let size_bytes = fs::metadata(dir_entry.path())
            .map(|metadata| metadata.len())
            .unwrap_or(0);

        entries.push(FileEntry {
            local_path: dir_entry.into_path(),
            relative_path,
            size_bytes,
        });
    }
    entries
}

/// 📄 Regular files, plus unfollowed symlinks that point at regular files.
fn is_uploadable(dir_entry: &DirEntry) -> bool {
    let file_type = dir_entry.file_type();
    if file_type.is_file() {
        return true;
    }
    file_type.is_symlink()
        && fs::metadata(dir_entry.path())
            .map(|metadata| metadata.is_file())
            .unwrap_or(false)
}
