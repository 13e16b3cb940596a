use std::path::PathBuf;

/// Per-user directories for the autohost (XDG on Unix, APPDATA on Windows)
pub struct ProjectPaths {
    name: String,
    home: PathBuf,
}

impl ProjectPaths {
    /// Returns None when no home directory can be determined
    pub fn new(name: &str) -> Option<Self> {
        let home = home_dir()?;
        Some(ProjectPaths {
            name: name.to_string(),
            home,
        })
    }

    /// Directory holding `config.toml`
    pub fn config_dir(&self) -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            env_dir("APPDATA")
                .unwrap_or_else(|| self.home.join("AppData").join("Roaming"))
                .join(&self.name)
        }

        #[cfg(not(target_os = "windows"))]
        {
            env_dir("XDG_CONFIG_HOME")
                .unwrap_or_else(|| self.home.join(".config"))
                .join(&self.name)
        }
    }

    /// Directory holding log files
    pub fn data_dir(&self) -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            env_dir("LOCALAPPDATA")
                .unwrap_or_else(|| self.home.join("AppData").join("Local"))
                .join(&self.name)
        }

        #[cfg(not(target_os = "windows"))]
        {
            env_dir("XDG_DATA_HOME")
                .unwrap_or_else(|| self.home.join(".local").join("share"))
                .join(&self.name)
        }
    }
}

fn home_dir() -> Option<PathBuf> {
    env_dir("HOME").or_else(|| env_dir("USERPROFILE"))
}

fn env_dir(var: &str) -> Option<PathBuf> {
    std::env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}
