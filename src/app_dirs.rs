use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    pub fn db_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("words.db"))
    }

    pub fn progress_log_path() -> Option<PathBuf> {
        Self::state_dir().map(|dir| dir.join("progress.csv"))
    }

    fn state_dir() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            Some(
                PathBuf::from(home)
                    .join(".local")
                    .join("state")
                    .join("wordbridge"),
            )
        } else {
            ProjectDirs::from("", "", "wordbridge")
                .map(|proj_dirs| proj_dirs.data_local_dir().to_path_buf())
        }
    }
}
