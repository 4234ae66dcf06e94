pub mod config;
pub mod error;
pub mod notifications;
pub mod shader;
pub mod wallpaper;

pub use config::{AppMatcher, ConfigPaths, DockConfig, DockPosition};
pub use error::{Error, Result};
pub use notifications::{clean_notification_body, format_relative_time, relative_time_between};
pub use shader::{generate_shader, generate_shader_opt, write_shader, Palette, PaletteColor};
pub use wallpaper::{
    generate_thumbnails, LockscreenFrame, LockscreenOutcome, MediaKind, ThumbnailCache,
    ThumbnailJob, ThumbnailReport, WallpaperConfig,
};
