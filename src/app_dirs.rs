use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Default log file, used when `RUST_LOG` is set but no `--log-file` given
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("clamtap");
            Some(state_dir.join("clamtap.log"))
        } else {
            ProjectDirs::from("", "", "clamtap")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("clamtap.log"))
        }
    }
}
