//! 🔌 Backends -- where the real I/O happens.
//!
//! 🪣 The uploader decides *what* goes *where*. A backend decides *how* the
//! bytes actually leave the building. Today that's S3. In tests it's a Vec
//! behind a Mutex, which is honestly the more reliable of the two.
//!
//! 🦆 The duck is here because every file must have one. This is law.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::common::ObjectKey;

pub mod s3;

#[cfg(test)]
pub(crate) mod in_mem;

pub use s3::{S3Store, S3StoreConfig};

/// 🕳️ Something that can take a local file and put it at `bucket/key`.
///
/// # Contract 📜
/// - `put_file` uploads the whole file in one call. No retries, no multipart
///   choreography, no checksums. One attempt, one answer.
/// - `Err(...)` carries a human-readable diagnostic. The caller logs it and
///   moves on to the next file; it never aborts the run.
/// - `&self` because the client handle is read-only for the duration of a run.
///   Fakes that need to remember things bring their own interior mutability.
#[async_trait]
pub trait ObjectStore: std::fmt::Debug + Send + Sync {
    /// 📡 Upload `local_path` to `bucket` under `key`.
    async fn put_file(&self, local_path: &Path, bucket: &str, key: &ObjectKey) -> Result<()>;
}
