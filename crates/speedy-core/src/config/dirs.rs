use directories::ProjectDirs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "config.json";
const USAGE_FILE: &str = "usage.json";

/// Where speedy keeps its files on this machine.
#[derive(Debug, Clone)]
pub struct Directories {
    /// `config.json`, under the XDG config dir on Linux
    pub config_file: PathBuf,

    /// Activation history, under the XDG data dir on Linux
    pub usage_file: PathBuf,
}

impl Directories {
    /// Platform paths for the `speedy` project, or a `speedy` directory under
    /// the system temp dir when there is no home directory.
    #[must_use]
    pub fn new() -> Self {
        match ProjectDirs::from("", "", "speedy") {
            Some(project) => Self {
                config_file: project.config_dir().join(CONFIG_FILE),
                usage_file: project.data_dir().join(USAGE_FILE),
            },
            None => Self::with_base(&std::env::temp_dir().join("speedy")),
        }
    }

    /// Keep every file directly under `base`.
    #[must_use]
    pub fn with_base(base: &Path) -> Self {
        Self {
            config_file: base.join(CONFIG_FILE),
            usage_file: base.join(USAGE_FILE),
        }
    }
}

impl Default for Directories {
    fn default() -> Self {
        Self::new()
    }
}
