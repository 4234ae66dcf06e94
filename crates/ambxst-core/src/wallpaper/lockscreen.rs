use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::process::run_tool;
use super::MediaKind;
use crate::error::{Error, Result};

const EXTRACT_TIMEOUT: Duration = Duration::from_secs(30);

/// What happened to the lockscreen background
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LockscreenOutcome {
    /// First frame written to this path
    Extracted(PathBuf),
    /// Still image; the lockscreen can use the wallpaper directly
    NotNeeded,
}

/// Still frame for the lockscreen when the wallpaper is a video or GIF
#[derive(Debug, Clone)]
pub struct LockscreenFrame {
    wallpaper: PathBuf,
    lockscreen_dir: PathBuf,
}

impl LockscreenFrame {
    /// Frames are written to `lockscreen_dir`, usually
    /// [`ConfigPaths::lockscreen_dir`](crate::ConfigPaths::lockscreen_dir)
    pub fn new(wallpaper: impl Into<PathBuf>, lockscreen_dir: impl Into<PathBuf>) -> Self {
        Self {
            wallpaper: wallpaper.into(),
            lockscreen_dir: lockscreen_dir.into(),
        }
    }

    pub fn lockscreen_dir(&self) -> &Path {
        &self.lockscreen_dir
    }

    /// `<data>/lockscreen/<wallpaper file name>.jpg`
    pub fn output_path(&self) -> PathBuf {
        let mut name = self.wallpaper.file_name().unwrap_or_default().to_os_string();
        name.push(".jpg");
        self.lockscreen_dir.join(name)
    }

    pub fn needs_frame(&self) -> bool {
        MediaKind::from_path(&self.wallpaper).is_some_and(|kind| kind.is_animated())
    }

    fn ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-y".to_string(),
            "-i".to_string(),
            self.wallpaper.to_string_lossy().into_owned(),
            "-vframes".to_string(),
            "1".to_string(),
            "-q:v".to_string(),
            "2".to_string(),
            "-f".to_string(),
            "image2".to_string(),
            self.output_path().to_string_lossy().into_owned(),
        ]
    }

    /// Remove previously extracted frames; failures are only logged
    fn clean(&self) {
        let entries = match std::fs::read_dir(&self.lockscreen_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Failed to clean {:?}: {}", self.lockscreen_dir, e);
                return;
            }
        };

        for path in entries.filter_map(|e| e.ok()).map(|e| e.path()) {
            if !path.is_file() {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => debug!("Removed old frame {:?}", path),
                Err(e) => warn!("Failed to remove {:?}: {}", path, e),
            }
        }
    }

    pub async fn extract(&self) -> Result<LockscreenOutcome> {
        if !self.wallpaper.exists() {
            return Err(Error::NotFound(self.wallpaper.clone()));
        }
        std::fs::create_dir_all(&self.lockscreen_dir)
            .map_err(|e| Error::io(&self.lockscreen_dir, e))?;

        if !self.needs_frame() {
            info!("Wallpaper {:?} is a still image, no frame needed", self.wallpaper);
            return Ok(LockscreenOutcome::NotNeeded);
        }

        self.clean();

        let output = self.output_path();
        run_tool("ffmpeg", &self.ffmpeg_args(), EXTRACT_TIMEOUT).await?;
        if !output.exists() {
            return Err(Error::Command {
                program: "ffmpeg".to_string(),
                reason: "Unknown error".to_string(),
            });
        }

        info!("Lockscreen frame saved to {:?}", output);
        Ok(LockscreenOutcome::Extracted(output))
    }
}
