use std::path::PathBuf;

/// File locations used by the Ambxst helpers
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub dock_config: PathBuf,
    pub palette: PathBuf,
    pub wallpaper_config: PathBuf,
    pub palette_shader: PathBuf,
    pub cache_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl ConfigPaths {
    pub fn new() -> Self {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        let cache_dir = dirs::cache_dir().unwrap_or_else(|| PathBuf::from(".cache"));
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from(".local/share"));

        Self {
            dock_config: config_dir.join("ambxst/dock.json"),
            palette: config_dir.join("ambxst/palette.json"),
            wallpaper_config: config_dir.join("ambxst/wallpapers.json"),
            palette_shader: config_dir.join("mpv/shaders/ambxst_palette.glsl"),
            cache_dir: cache_dir.join("quickshell"),
            data_dir: data_dir.join("quickshell"),
        }
    }

    /// Directory holding extracted lockscreen frames
    pub fn lockscreen_dir(&self) -> PathBuf {
        self.data_dir.join("lockscreen")
    }
}

impl Default for ConfigPaths {
    fn default() -> Self {
        Self::new()
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    }
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(rest),
        None => PathBuf::from(path),
    }
}
