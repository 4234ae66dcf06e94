use std::path::Path;
use std::time::Duration;

const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov", "avi", "mkv"];
const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tif", "tiff", "bmp"];
const GIF_EXTENSIONS: &[&str] = &["gif"];

/// Wallpaper file categories, decided by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Video,
    Image,
    Gif,
}

impl MediaKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let ext = ext.as_str();

        if VIDEO_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Video)
        } else if IMAGE_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Image)
        } else if GIF_EXTENSIONS.contains(&ext) {
            Some(MediaKind::Gif)
        } else {
            None
        }
    }

    /// Videos and GIFs need a frame extracted before they can be shown still
    pub fn is_animated(&self) -> bool {
        matches!(self, MediaKind::Video | MediaKind::Gif)
    }

    /// Name of the thumbnail cache subdirectory
    pub fn cache_dir_name(&self) -> &'static str {
        match self {
            MediaKind::Video => "video_thumbnails",
            MediaKind::Image => "image_thumbnails",
            MediaKind::Gif => "gif_thumbnails",
        }
    }

    /// Upper bound for one thumbnail command
    pub fn thumbnail_timeout(&self) -> Duration {
        match self {
            MediaKind::Video => Duration::from_secs(30),
            MediaKind::Image | MediaKind::Gif => Duration::from_secs(15),
        }
    }
}
