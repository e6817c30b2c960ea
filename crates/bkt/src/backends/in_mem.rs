//! # Previously, on bkt...
//!
//! 🎬 The bucket was far away. The tests were impatient. Nobody wanted to wait
//! on a network round trip just to find out whether `docs/sub/b.txt` had the
//! right slashes in it. So we built a bucket out of RAM.
//!
//! `InMemoryStore` records every `put_file` call behind an `Arc<Mutex<...>>`
//! and can be told to fail on specific keys, so the "one file fails, the rest
//! carry on" story can be told without an actual outage.
//!
//! ⚠️ Test-only. If you're deploying this to prod, please also deploy a therapist.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Result, bail};
use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::backends::ObjectStore;
use crate::common::ObjectKey;

/// 📬 One recorded call: which file, which bucket, which key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RecordedPut {
    pub(crate) local_path: PathBuf,
    pub(crate) bucket: String,
    pub(crate) key: String,
}

/// 📦 A bucket that never forgets, and occasionally refuses on purpose.
///
/// Clone-able so tests can keep a handle to `calls` after lending the store to
/// the uploader. The `Arc` means everyone shares the same Vec.
#[derive(Debug, Default, Clone)]
pub(crate) struct InMemoryStore {
    /// 🔒 Every attempt, successful or not, in call order.
    pub(crate) calls: Arc<Mutex<Vec<RecordedPut>>>,
    /// 💀 Keys that should fail with an access-denied flavoured error.
    failing_keys: HashSet<String>,
}

impl InMemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// 🎯 Make `key` fail every time it's uploaded. Chaos engineering, artisanal edition.
    pub(crate) fn failing_on(mut self, key: impl Into<String>) -> Self {
        self.failing_keys.insert(key.into());
        self
    }

    pub(crate) async fn recorded_keys(&self) -> Vec<String> {
        self.calls
            .lock()
            .await
            .iter()
            .map(|call| call.key.clone())
            .collect()
    }
}

#[async_trait]
impl ObjectStore for InMemoryStore {
    async fn put_file(&self, local_path: &Path, bucket: &str, key: &ObjectKey) -> Result<()> {
        // -- 🔒 record first, so failed attempts still count as attempts
        self.calls.lock().await.push(RecordedPut {
            local_path: local_path.to_path_buf(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        });

        if self.failing_keys.contains(key.as_str()) {
            bail!("AccessDenied: the in-memory bucket said no to {bucket}/{key}");
        }
        Ok(())
    }
}
