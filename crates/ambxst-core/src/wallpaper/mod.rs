//! Wallpaper media helpers: thumbnail cache and lockscreen frames.
//!
//! The heavy lifting is done by `ffmpeg` and ImageMagick's `convert`.

mod lockscreen;
mod media;
mod process;
mod thumbnails;

pub use lockscreen::{LockscreenFrame, LockscreenOutcome};
pub use media::MediaKind;
pub use thumbnails::{
    default_workers, generate_thumbnails, ThumbnailCache, ThumbnailJob, ThumbnailReport,
    WallpaperConfig,
};
