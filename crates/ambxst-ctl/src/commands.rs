use std::path::PathBuf;

use anyhow::Context;
use tracing::{info, warn};

use ambxst_core::wallpaper::default_workers;
use ambxst_core::{
    clean_notification_body, format_relative_time, generate_shader, generate_thumbnails,
    write_shader, ConfigPaths, DockConfig, LockscreenFrame, LockscreenOutcome, Palette,
    PaletteColor, ThumbnailCache, WallpaperConfig,
};

fn load_dock_config(config: Option<PathBuf>) -> DockConfig {
    let path = config.unwrap_or_else(|| ConfigPaths::new().dock_config);
    DockConfig::load(&path)
}

pub fn dock_defaults(defaults_only: bool, config: Option<PathBuf>) -> anyhow::Result<()> {
    let dock = if defaults_only {
        DockConfig::default()
    } else {
        load_dock_config(config)
    };
    println!("{}", serde_json::to_string_pretty(&dock)?);
    Ok(())
}

pub fn dock_check(app_id: &str, config: Option<PathBuf>) -> anyhow::Result<()> {
    let dock = load_dock_config(config);

    match dock.pin_index(app_id) {
        Some(index) => println!("pinned: yes (position {})", index + 1),
        None => println!("pinned: no"),
    }
    match dock.ignored_app_matcher().matching_pattern(app_id) {
        Some(pattern) => println!("ignored: yes (matches '{}')", pattern),
        None => println!("ignored: no"),
    }
    Ok(())
}

pub fn notif_time(millis: i64) -> String {
    format_relative_time(Some(millis))
}

pub fn notif_body(body: &str, app: Option<&str>) -> String {
    clean_notification_body(Some(body), app)
}

/// Palette file to read: the one given, otherwise the user's palette when
/// no colors were passed on the command line
fn palette_source(
    paths: &ConfigPaths,
    palette: Option<PathBuf>,
    colors: &[String],
) -> Option<PathBuf> {
    palette.or_else(|| (colors.is_empty() && paths.palette.exists()).then(|| paths.palette.clone()))
}

pub fn shader(
    paths: &ConfigPaths,
    palette: Option<PathBuf>,
    colors: &[String],
    output: Option<PathBuf>,
    stdout: bool,
) -> anyhow::Result<()> {
    let mut entries = match palette_source(paths, palette, colors) {
        Some(path) => Palette::load(&path)
            .with_context(|| format!("Failed to load palette {:?}", path))?
            .0,
        None => Vec::new(),
    };
    for hex in colors {
        entries.push(PaletteColor::from_hex(hex)?);
    }

    if entries.is_empty() {
        warn!("Empty palette, emitting passthrough shader");
    }

    if stdout {
        print!("{}", generate_shader(&entries));
    } else {
        let path = output.unwrap_or_else(|| paths.palette_shader.clone());
        write_shader(&path, &entries)?;
    }
    Ok(())
}

pub fn thumbnails(config: Option<PathBuf>) -> anyhow::Result<()> {
    let paths = ConfigPaths::new();
    let config_path = config.unwrap_or(paths.wallpaper_config);

    let wall_dir = WallpaperConfig::load(&config_path)?.wall_dir()?;
    info!("Wallpaper directory: {:?}", wall_dir);

    let cache = ThumbnailCache::new(paths.cache_dir);
    cache.ensure_dirs()?;

    let jobs = cache.pending_jobs(&wall_dir)?;
    let workers = default_workers(jobs.len());

    let runtime = tokio::runtime::Runtime::new()?;
    let report = runtime.block_on(generate_thumbnails(jobs, workers));

    info!("Success: {}/{}", report.succeeded, report.total());
    for (path, reason) in report.failed.iter().take(3) {
        warn!("{:?}: {}", path, reason);
    }
    if report.failed.len() > 3 {
        warn!("... and {} more", report.failed.len() - 3);
    }

    if report.failed.is_empty() {
        Ok(())
    } else {
        anyhow::bail!("{} thumbnails failed", report.failed.len())
    }
}

pub fn lockscreen(wallpaper: PathBuf, data_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut paths = ConfigPaths::new();
    if let Some(dir) = data_dir {
        paths.data_dir = dir;
    }
    let frame = LockscreenFrame::new(wallpaper, paths.lockscreen_dir());

    let runtime = tokio::runtime::Runtime::new()?;
    match runtime.block_on(frame.extract())? {
        LockscreenOutcome::Extracted(path) => println!("{}", path.display()),
        LockscreenOutcome::NotNeeded => info!("No processing needed, use the wallpaper directly"),
    }
    Ok(())
}
