use chrono::{DateTime, NaiveDateTime, Utc};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::domain::SubmissionRecord;
use crate::utils::paths::ensure_dir;

use super::{check_identity, Result, SinkReceipt, StorageKind, SubmissionSink};

const RECORD_EXTENSION: &str = "json";
const RECORD_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";

/// Durable backend: one pretty-printed JSON file per accepted record,
/// pruned to a retention cap (oldest first).
#[derive(Debug, Clone)]
pub struct JsonSink {
    dir: PathBuf,
    retention: usize,
}

impl JsonSink {
    pub fn new(dir: PathBuf, retention: usize) -> Result<Self> {
        ensure_dir(&dir)?;
        Ok(Self {
            dir,
            retention: retention.max(1),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Stored record file names, newest first.
    pub fn list(&self) -> Result<Vec<String>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| parse_record_timestamp(b).cmp(&parse_record_timestamp(a)));
        Ok(entries)
    }

    fn record_path(&self, record: &SubmissionRecord) -> PathBuf {
        let timestamp = record.created_at.format(RECORD_TIMESTAMP_FORMAT);
        let mut short_id = record.id.simple().to_string();
        short_id.truncate(8);
        self.dir
            .join(format!("signup_{}_{}.{}", timestamp, short_id, RECORD_EXTENSION))
    }

    fn prune(&self) -> Result<()> {
        let entries = self.list()?;
        if entries.len() <= self.retention {
            return Ok(());
        }
        for name in entries.iter().skip(self.retention) {
            let _ = fs::remove_file(self.dir.join(name));
        }
        Ok(())
    }
}

impl SubmissionSink for JsonSink {
    fn record(&self, record: &SubmissionRecord) -> Result<SinkReceipt> {
        check_identity(record)?;
        let path = self.record_path(record);
        let json = serde_json::to_string_pretty(record)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &path)?;
        self.prune()?;
        tracing::debug!(target: "funnel_core::sink", path = %path.display(), "stored signup record");
        Ok(SinkReceipt {
            storage: StorageKind::Durable,
        })
    }
}

fn parse_record_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", RECORD_EXTENSION))?;
    let parts: Vec<&str> = stem.split('_').collect();
    if parts.len() < 3 {
        return None;
    }
    let date_part = parts.get(1)?;
    let time_part = parts.get(2)?;
    if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
        return None;
    }
    let raw = format!("{}{}", date_part, time_part);
    NaiveDateTime::parse_from_str(&raw, "%Y%m%d%H%M%S")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
