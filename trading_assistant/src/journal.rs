//! Append-only JSON Lines record of cycle outcomes. Written, never read back.

use std::path::{Path, PathBuf};

use tokio::{fs::OpenOptions, io::AsyncWriteExt};

use crate::trading_loop::CycleReport;

#[derive(Debug, thiserror::Error)]
pub enum JournalError {
    #[error("could not write journal {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not encode cycle report: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct CycleJournal {
    path: PathBuf,
}

impl CycleJournal {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one report as a single line, creating the file on first use.
    pub async fn append(&self, report: &CycleReport) -> Result<(), JournalError> {
        let mut line = serde_json::to_vec(report)?;
        line.push(b'\n');

        let io_err = |source| JournalError::Io {
            path: self.path.clone(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(io_err)?;
        file.write_all(&line).await.map_err(io_err)?;
        file.flush().await.map_err(io_err)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use tempfile::tempdir;

    use super::*;
    use crate::trading_loop::{CycleOutcome, Stage};

    fn report(reason: &str) -> CycleReport {
        CycleReport {
            cycle_started_at: Utc.with_ymd_and_hms(2025, 5, 1, 9, 30, 0).unwrap(),
            symbol: "AAPL".into(),
            analysis: None,
            trend: None,
            outcome: CycleOutcome::Skipped {
                stage: Stage::Parsing,
                error: reason.into(),
            },
        }
    }

    #[tokio::test]
    async fn appends_one_line_per_report() {
        let dir = tempdir().unwrap();
        let journal = CycleJournal::new(dir.path().join("cycles.jsonl"));

        journal.append(&report("first")).await.unwrap();
        journal.append(&report("second")).await.unwrap();

        let text = std::fs::read_to_string(journal.path()).unwrap();
        let lines: Vec<serde_json::Value> = text
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["outcome"]["status"], "skipped");
        assert_eq!(lines[0]["outcome"]["stage"], "parsing");
        assert_eq!(lines[1]["outcome"]["error"], "second");
        assert_eq!(lines[1]["symbol"], "AAPL");
    }

    #[tokio::test]
    async fn missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let journal = CycleJournal::new(dir.path().join("nope").join("cycles.jsonl"));
        assert!(matches!(
            journal.append(&report("x")).await,
            Err(JournalError::Io { .. })
        ));
    }
}
