//! 📊 report.rs -- "So... did it work?" -- every operator, every run, forever.
//!
//! 🚀 The per-file log lines already told the story one file at a time. This
//! module keeps the receipts: every outcome, the run status, how long it took,
//! and a comfy table to squint at when it's over.
//!
//! 🦆 The duck counted the files too. The duck got a different number. We trust the table.

use std::time::Duration;

use comfy_table::{Cell, CellAlignment, ContentArrangement, Table, presets::NOTHING};

use crate::common::{RunStatus, UploadJob, UploadOutcome};

// -- 📏 one mebibyte. not a megabyte, pedants. there's a difference and I will die on this hill.
const MIB: u64 = 1024 * 1024;

/// 🧾 Everything one run produced, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub job: UploadJob,
    pub status: RunStatus,
    pub outcomes: Vec<UploadOutcome>,
    pub elapsed: Duration,
}

impl RunReport {
    pub fn new(
        job: UploadJob,
        status: RunStatus,
        outcomes: Vec<UploadOutcome>,
        elapsed: Duration,
    ) -> Self {
        Self {
            job,
            status,
            outcomes,
            elapsed,
        }
    }

    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn uploaded(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| outcome.is_uploaded())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.uploaded()
    }

    pub fn bytes_uploaded(&self) -> u64 {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                UploadOutcome::Uploaded { bytes, .. } => *bytes,
                UploadOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    /// ✅ Root was there and nothing failed. The only answer strict mode accepts.
    pub fn is_clean(&self) -> bool {
        self.status == RunStatus::Completed && self.failed() == 0
    }

    /// 🪑 Only a run that actually walked a folder gets a table. A missing root gets its one line and that's it.
    pub fn has_anything_to_summarize(&self) -> bool {
        self.status != RunStatus::MissingRoot
    }

    /// 🍽️ Two columns, no borders, right-aligned numbers.
    ///
    /// ```text
    ///   folder     scripts/spec-sheets
    ///   target     s3://my-bucket/spec-sheets
    ///   status     completed
    ///   ...
    /// ```
    pub fn summary_table(&self) -> Table {
        let mut table = Table::new();
        table.load_preset(NOTHING);
        table.set_content_arrangement(ContentArrangement::Disabled);

        let target = if self.job.prefix.is_empty() {
            format!("s3://{}", self.job.bucket_name)
        } else {
            format!("s3://{}/{}", self.job.bucket_name, self.job.prefix)
        };

        let rows = [
            ("folder", self.job.folder_path.clone()),
            ("target", target),
            ("status", self.status.to_string()),
            ("attempted", format_number(self.attempted() as u64)),
            ("uploaded", format_number(self.uploaded() as u64)),
            ("failed", format_number(self.failed() as u64)),
            ("bytes", format_bytes(self.bytes_uploaded())),
            ("elapsed", format_duration(self.elapsed)),
        ];
        for (label, value) in rows {
            table.add_row(vec![
                Cell::new(label),
                Cell::new(value).set_alignment(CellAlignment::Right),
            ]);
        }
        table
    }
}

/// 📦 Bytes for humans. "1073741824 bytes" is a war crime in a UI.
fn format_bytes(bytes: u64) -> String {
    if bytes >= MIB {
        format!("{:.2} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= 1024 {
        format!("{:.2} KiB", bytes as f64 / 1024.0)
    } else {
        // -- 🐛 raw bytes mode. small uploads need love too.
        format!("{} bytes", bytes)
    }
}

/// 🔢 "1000000" → "1,000,000" -- you're welcome, eyes.
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result
}

/// ⏱️ MM:SS, or HH:MM:SS if you uploaded a data lake over hotel wifi.
fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}
