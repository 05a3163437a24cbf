use crate::app_dirs::AppDirs;
use crate::session::SessionResult;
use chrono::Local;
use std::fs::OpenOptions;
use std::io;
use std::path::{Path, PathBuf};

/// Append-only CSV log of finished sessions, one row per session.
#[derive(Debug, Clone)]
pub struct ProgressLog {
    path: PathBuf,
}

/// Totals folded from the whole log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressSummary {
    pub sessions: u32,
    pub questions: u32,
    pub mean_accuracy: f64,
}

impl ProgressLog {
    pub fn new() -> Option<Self> {
        AppDirs::progress_log_path().map(|path| Self { path })
    }

    pub fn with_path<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Append one session row, emitting the header on first use.
    pub fn append(&self, result: &SessionResult) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let needs_header = !self.path.exists();

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        if needs_header {
            writer
                .write_record([
                    "date",
                    "exercise",
                    "total",
                    "correct",
                    "accuracy",
                    "hints",
                    "elapsed_secs",
                ])
                .map_err(io::Error::other)?;
        }
        writer
            .write_record([
                Local::now().to_rfc3339(),
                result.exercise.to_string(),
                result.total.to_string(),
                result.correct.to_string(),
                result.accuracy.to_string(),
                result.hints_used.to_string(),
                format!("{:.2}", result.elapsed_seconds),
            ])
            .map_err(io::Error::other)?;
        writer.flush()
    }

    /// Fold the log into totals. A missing or unreadable log is an empty
    /// summary; malformed rows are skipped.
    pub fn summary(&self) -> ProgressSummary {
        let Ok(mut reader) = csv::Reader::from_path(&self.path) else {
            return ProgressSummary::default();
        };

        let mut sessions = 0u32;
        let mut questions = 0u32;
        let mut accuracy_sum = 0f64;
        for record in reader.records().flatten() {
            let (Some(total), Some(accuracy)) = (record.get(2), record.get(4)) else {
                continue;
            };
            let (Ok(total), Ok(accuracy)) = (total.parse::<u32>(), accuracy.parse::<f64>()) else {
                continue;
            };
            sessions += 1;
            questions += total;
            accuracy_sum += accuracy;
        }

        ProgressSummary {
            sessions,
            questions,
            mean_accuracy: if sessions > 0 {
                accuracy_sum / sessions as f64
            } else {
                0.0
            },
        }
    }
}
