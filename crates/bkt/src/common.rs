//! 📦 Common data structures -- the building blocks of bkt.
//!
//! 🎬 COLD OPEN -- INT. LAPTOP -- 11:58 PM
//!
//! A folder full of spec sheets sits on a laptop. The demo is at nine. The
//! bucket is in the cloud. Between them: one `UploadJob`, a handful of
//! `FileEntry`s, and an `ObjectKey` per file that does not care whether the
//! laptop runs Windows, Linux, or a toaster with a POSIX layer.
//!
//! These types carry the run from "here is a folder" to "here is what happened".
//! They do not do I/O. They do not have opinions about the network. They are
//! the postal workers of this codebase. Please tip your postal workers. 🦆

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// 🎯 One invocation's worth of intent: which folder, which bucket, which prefix.
///
/// Built once, never mutated. If you want a different bucket, make a different job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UploadJob {
    /// 📂 Local root folder. Must exist and be a directory, or the run ends before it starts.
    pub folder_path: String,
    /// 🪣 Destination bucket. Not validated here -- S3 gets to be the judge of that.
    pub bucket_name: String,
    /// 🏷️ Prepended to every key. Empty means "drop it at the bucket root".
    #[serde(default)]
    pub prefix: String,
}

impl UploadJob {
    pub fn new(
        folder_path: impl Into<String>,
        bucket_name: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            folder_path: folder_path.into(),
            bucket_name: bucket_name.into(),
            prefix: prefix.into(),
        }
    }
}

/// 📄 A file found under the root folder during traversal.
///
/// `relative_path` is always relative to the job's `folder_path`, so it never
/// starts with a separator. `size_bytes` is whatever the filesystem said at
/// discovery time; if the file grows between walk and upload, S3 gets the new size
/// and the summary gets the old one. We are at peace with this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub local_path: PathBuf,
    pub relative_path: PathBuf,
    pub size_bytes: u64,
}

impl FileEntry {
    /// 🏷️ The relative path the way a human wants to read it in a log line.
    pub fn display_relative(&self) -> String {
        self.relative_path.display().to_string()
    }
}

/// 🗝️ The destination key of one object, always `/`-separated.
///
/// Only constructible through [`ObjectKey::compose`] and friends, so a key with
/// a backslash in it is a type error waiting to not happen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// 🔗 Join `prefix` and `relative_path`, then flatten every `\` into `/`.
    ///
    /// - empty prefix: the key is just the relative path, no leading `/`
    /// - prefix already ending in a separator: glued on directly
    /// - anything else: joined with a single `/`
    pub fn compose(prefix: &str, relative_path: &str) -> Self {
        let joined = if prefix.is_empty() {
            relative_path.to_string()
        } else if prefix.ends_with('/') || prefix.ends_with('\\') {
            format!("{prefix}{relative_path}")
        } else {
            format!("{prefix}/{relative_path}")
        };
        Self(joined.replace('\\', "/"))
    }

    /// 🧭 Build a key from a native relative path, one component at a time.
    ///
    /// Components are joined with `/` no matter what the host separator is.
    /// 💀 Fails when a component is not valid UTF-8, because S3 keys are strings
    /// and we refuse to guess what your filesystem meant.
    pub fn from_relative_path(prefix: &str, relative_path: &Path) -> Result<Self> {
        let mut segments = Vec::new();
        for component in relative_path.components() {
            let segment = component.as_os_str().to_str().with_context(|| {
                format!(
                    "💀 '{}' is not valid UTF-8, so it cannot become an object key",
                    relative_path.display()
                )
            })?;
            segments.push(segment);
        }
        Ok(Self::compose(prefix, &segments.join("/")))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 🎭 What happened to one file. Exactly one of these per upload attempt.
///
/// The `Display` impl is the log line. Tests read it, humans read it, and the
/// summary counts it. Three audiences, one format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// ✅ S3 said yes.
    Uploaded {
        relative_path: String,
        bucket: String,
        key: ObjectKey,
        bytes: u64,
    },
    /// 💀 Something said no. `detail` carries the whole error chain, flattened.
    Failed {
        relative_path: String,
        detail: String,
    },
}

impl UploadOutcome {
    pub fn is_uploaded(&self) -> bool {
        matches!(self, Self::Uploaded { .. })
    }

    pub fn relative_path(&self) -> &str {
        match self {
            Self::Uploaded { relative_path, .. } | Self::Failed { relative_path, .. } => {
                relative_path
            }
        }
    }

    /// 📍 `bucket/key` for uploads, `None` for failures.
    pub fn destination(&self) -> Option<String> {
        match self {
            Self::Uploaded { bucket, key, .. } => Some(format!("{bucket}/{key}")),
            Self::Failed { .. } => None,
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded {
                relative_path,
                bucket,
                key,
                ..
            } => write!(f, "Successfully uploaded {relative_path} to {bucket}/{key}"),
            Self::Failed {
                relative_path,
                detail,
            } => write!(f, "Error uploading {relative_path}: {detail}"),
        }
    }
}

/// 🚦 How the run as a whole went, separate from how each file went.
///
/// `MissingRoot` exists so "the folder wasn't there" and "everything uploaded"
/// stop looking identical to the caller. The process exit code still treats them
/// the same unless strict mode is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// 🏁 The root existed and every discovered file got its attempt.
    Completed,
    /// 👻 The root folder was missing or not a directory. Zero uploads.
    MissingRoot,
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::MissingRoot => f.write_str("missing root"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_one_where_the_prefix_and_path_hold_hands_with_a_slash() {
        assert_eq!(ObjectKey::compose("docs", "a.txt").as_str(), "docs/a.txt");
        assert_eq!(
            ObjectKey::compose("docs", "sub/b.txt").as_str(),
            "docs/sub/b.txt"
        );
    }

    #[test]
    fn the_one_where_an_empty_prefix_leaves_no_leading_slash() {
        let key = ObjectKey::compose("", "sub/b.txt");
        assert_eq!(key.as_str(), "sub/b.txt");
        assert!(!key.as_str().starts_with('/'));
    }

    #[test]
    fn the_one_where_backslashes_get_deported() {
        assert_eq!(
            ObjectKey::compose("docs", r"sub\deeper\b.txt").as_str(),
            "docs/sub/deeper/b.txt"
        );
        assert_eq!(
            ObjectKey::compose(r"docs\", r"sub\b.txt").as_str(),
            "docs/sub/b.txt"
        );
    }

    #[test]
    fn the_one_where_a_trailing_slash_prefix_does_not_double_up() {
        assert_eq!(
            ObjectKey::compose("spec-sheets/", "a.pdf").as_str(),
            "spec-sheets/a.pdf"
        );
    }

    #[test]
    fn the_one_where_native_paths_become_slash_keys() {
        let relative = Path::new("sub").join("nested").join("b.txt");
        let key = ObjectKey::from_relative_path("docs", &relative)
            .expect("💀 plain UTF-8 path should always make a key");
        assert_eq!(key.as_str(), "docs/sub/nested/b.txt");
        assert_eq!(key.to_string(), "docs/sub/nested/b.txt");
    }

    #[cfg(unix)]
    #[test]
    fn the_one_where_non_utf8_names_are_turned_away_at_the_door() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let relative = Path::new(OsStr::from_bytes(b"bad\xffname.txt"));
        let result = ObjectKey::from_relative_path("docs", relative);
        assert!(result.is_err(), "non-UTF-8 names must not become keys");
    }

    #[test]
    fn the_one_where_outcomes_read_like_log_lines() {
        let uploaded = UploadOutcome::Uploaded {
            relative_path: "sub/b.txt".to_string(),
            bucket: "my-bucket".to_string(),
            key: ObjectKey::compose("docs", "sub/b.txt"),
            bytes: 3,
        };
        assert_eq!(
            uploaded.to_string(),
            "Successfully uploaded sub/b.txt to my-bucket/docs/sub/b.txt"
        );
        assert_eq!(
            uploaded.destination().as_deref(),
            Some("my-bucket/docs/sub/b.txt")
        );

        let failed = UploadOutcome::Failed {
            relative_path: "a.txt".to_string(),
            detail: "AccessDenied".to_string(),
        };
        assert_eq!(failed.to_string(), "Error uploading a.txt: AccessDenied");
        assert!(failed.destination().is_none());
        assert!(!failed.is_uploaded());
    }
}
