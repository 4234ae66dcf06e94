use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use super::process::run_tool;
use super::MediaKind;
use crate::config::expand_home;
use crate::error::{Error, Result};

const THUMBNAIL_SCALE: &str = "scale=320:240:force_original_aspect_ratio=increase,crop=320:240";
const MAX_WORKERS: usize = 4;

/// Wallpaper settings file; only `wallPath` is read here
#[derive(Debug, Clone, Deserialize)]
pub struct WallpaperConfig {
    #[serde(rename = "wallPath", default)]
    wall_path: String,
}

impl WallpaperConfig {
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|source| Error::Parse {
            what: "wallpaper config",
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::NotFound(path.to_path_buf()),
            _ => Error::io(path, e),
        })?;
        Self::from_json(&data)
    }

    /// Wallpaper directory with `~` expanded; must exist
    pub fn wall_dir(&self) -> Result<PathBuf> {
        if self.wall_path.is_empty() {
            return Err(Error::MissingWallPath);
        }
        let dir = expand_home(&self.wall_path);
        if !dir.is_dir() {
            return Err(Error::NotFound(dir));
        }
        Ok(dir)
    }
}

/// One file to thumbnail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThumbnailJob {
    pub source: PathBuf,
    pub kind: MediaKind,
    pub output: PathBuf,
}

impl ThumbnailJob {
    /// Program and arguments that render this thumbnail
    pub fn command(&self) -> (&'static str, Vec<String>) {
        let src = self.source.to_string_lossy().into_owned();
        let dst = self.output.to_string_lossy().into_owned();

        let args: Vec<&str> = match self.kind {
            MediaKind::Video => vec![
                "-y", "-i", src.as_str(), "-ss", "00:00:01", "-vframes", "1", "-vf", THUMBNAIL_SCALE,
                "-q:v", "2", "-f", "image2", dst.as_str(),
            ],
            MediaKind::Gif => vec![
                "-y", "-i", src.as_str(), "-vframes", "1", "-vf", THUMBNAIL_SCALE, "-q:v", "2", "-f",
                "image2", dst.as_str(),
            ],
            MediaKind::Image => vec![
                src.as_str(), "-resize", "320x240^", "-gravity", "center", "-extent", "320x240",
                "-quality", "85", dst.as_str(),
            ],
        };
        let program = match self.kind {
            MediaKind::Image => "convert",
            MediaKind::Video | MediaKind::Gif => "ffmpeg",
        };

        (program, args.into_iter().map(String::from).collect())
    }

    async fn run(&self) -> Result<()> {
        let (program, args) = self.command();
        run_tool(program, &args, self.kind.thumbnail_timeout()).await?;
        if !self.output.exists() {
            return Err(Error::Command {
                program: program.to_string(),
                reason: "Unknown error".to_string(),
            });
        }
        Ok(())
    }
}

/// Thumbnail cache with one subdirectory per media kind
#[derive(Debug, Clone)]
pub struct ThumbnailCache {
    root: PathBuf,
}

impl ThumbnailCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn dir(&self, kind: MediaKind) -> PathBuf {
        self.root.join(kind.cache_dir_name())
    }

    pub fn ensure_dirs(&self) -> Result<()> {
        for kind in [MediaKind::Video, MediaKind::Image, MediaKind::Gif] {
            let dir = self.dir(kind);
            std::fs::create_dir_all(&dir).map_err(|e| Error::io(&dir, e))?;
        }
        Ok(())
    }

    /// `<cache>/<kind dir>/<file name>.jpg`; keeping the source extension
    /// avoids collisions between e.g. `a.png` and `a.jpg`
    pub fn thumbnail_path(&self, file: &Path, kind: MediaKind) -> PathBuf {
        let mut name = file.file_name().unwrap_or_default().to_os_string();
        name.push(".jpg");
        self.dir(kind).join(name)
    }

    /// Missing thumbnails and thumbnails older than their source are stale
    pub fn needs_thumbnail(&self, file: &Path, kind: MediaKind) -> bool {
        let thumb = self.thumbnail_path(file, kind);
        let modified = |p: &Path| std::fs::metadata(p).and_then(|m| m.modified());

        match (modified(file), modified(thumb.as_path())) {
            (Ok(source), Ok(thumbnail)) => source > thumbnail,
            _ => true,
        }
    }

    /// Media files directly inside `wall_dir`: videos, then images, then
    /// GIFs, each group sorted by path
    pub fn scan(wall_dir: &Path) -> Result<Vec<(PathBuf, MediaKind)>> {
        let entries = std::fs::read_dir(wall_dir).map_err(|e| Error::io(wall_dir, e))?;

        let mut files: Vec<(PathBuf, MediaKind)> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter_map(|path| MediaKind::from_path(&path).map(|kind| (path, kind)))
            .collect();

        files.sort_by(|a, b| kind_rank(a.1).cmp(&kind_rank(b.1)).then_with(|| a.0.cmp(&b.0)));
        Ok(files)
    }

    /// Jobs for every stale thumbnail in `wall_dir`
    pub fn pending_jobs(&self, wall_dir: &Path) -> Result<Vec<ThumbnailJob>> {
        let files = Self::scan(wall_dir)?;
        debug!("Found {} media files in {:?}", files.len(), wall_dir);

        Ok(files
            .into_iter()
            .filter(|(path, kind)| self.needs_thumbnail(path, *kind))
            .map(|(source, kind)| ThumbnailJob {
                output: self.thumbnail_path(&source, kind),
                source,
                kind,
            })
            .collect())
    }
}

fn kind_rank(kind: MediaKind) -> u8 {
    match kind {
        MediaKind::Video => 0,
        MediaKind::Image => 1,
        MediaKind::Gif => 2,
    }
}

/// Outcome of a thumbnail run
#[derive(Debug, Default)]
pub struct ThumbnailReport {
    pub succeeded: usize,
    pub failed: Vec<(PathBuf, String)>,
}

impl ThumbnailReport {
    pub fn total(&self) -> usize {
        self.succeeded + self.failed.len()
    }
}

/// Worker count for `jobs` thumbnails: at most four, at most one per CPU
pub fn default_workers(jobs: usize) -> usize {
    let cpus = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    MAX_WORKERS.min(cpus).min(jobs).max(1)
}

/// Render thumbnails with at most `workers` tools running at once
pub async fn generate_thumbnails(jobs: Vec<ThumbnailJob>, workers: usize) -> ThumbnailReport {
    run_jobs(jobs, workers, |job| async move { job.run().await }).await
}

/// Every job ends up in the report, including ones whose task panicked
async fn run_jobs<F, Fut>(jobs: Vec<ThumbnailJob>, workers: usize, run: F) -> ThumbnailReport
where
    F: Fn(ThumbnailJob) -> Fut,
    Fut: Future<Output = Result<()>> + Send + 'static,
{
    let mut report = ThumbnailReport::default();
    let total = jobs.len();
    if total == 0 {
        info!("All thumbnails are up to date");
        return report;
    }

    info!("Processing {} files with {} workers", total, workers);
    let permits = Arc::new(Semaphore::new(workers.max(1)));
    let finished = Arc::new(AtomicUsize::new(0));
    let mut handles = Vec::with_capacity(total);

    for job in jobs {
        let source = job.source.clone();
        let name = source.file_name().unwrap_or_default().to_string_lossy().into_owned();
        let permits = permits.clone();
        let finished = finished.clone();
        let work = run(job);

        let handle = tokio::spawn(async move {
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return Err(Error::Command {
                        program: "thumbnail worker".to_string(),
                        reason: "worker pool closed".to_string(),
                    })
                }
            };
            let result = work.await;

            let done = finished.fetch_add(1, Ordering::Relaxed) + 1;
            match &result {
                Ok(()) => info!("[{}/{}] ✓ {}", done, total, name),
                Err(_) => info!("[{}/{}] ✗ {}", done, total, name),
            }
            result
        });
        handles.push((source, handle));
    }

    for (source, handle) in handles {
        match handle.await {
            Ok(Ok(())) => report.succeeded += 1,
            Ok(Err(e)) => report.failed.push((source, e.to_string())),
            Err(e) => {
                warn!("Thumbnail task for {:?} failed: {}", source, e);
                report.failed.push((source, e.to_string()));
            }
        }
    }

    if !report.failed.is_empty() {
        warn!("{} of {} thumbnails failed", report.failed.len(), total);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::{Duration, SystemTime};

    fn touch(path: &Path, modified: SystemTime) {
        let file = File::create(path).unwrap();
        file.set_modified(modified).unwrap();
    }

    #[test]
    fn thumbnail_keeps_source_extension() {
        let cache = ThumbnailCache::new("/cache");
        assert_eq!(
            cache.thumbnail_path(Path::new("/walls/beach.mp4"), MediaKind::Video),
            PathBuf::from("/cache/video_thumbnails/beach.mp4.jpg")
        );
        assert_eq!(
            cache.thumbnail_path(Path::new("/walls/a.png"), MediaKind::Image),
            PathBuf::from("/cache/image_thumbnails/a.png.jpg")
        );
    }

    #[test]
    fn staleness_follows_modification_time() {
        let walls = tempfile::tempdir().unwrap();
        let cache_root = tempfile::tempdir().unwrap();
        let cache = ThumbnailCache::new(cache_root.path());
        cache.ensure_dirs().unwrap();

        let source = walls.path().join("forest.jpg");
        let base = SystemTime::now() - Duration::from_secs(3600);
        touch(&source, base);
        assert!(cache.needs_thumbnail(&source, MediaKind::Image));

        let thumb = cache.thumbnail_path(&source, MediaKind::Image);
        touch(&thumb, base + Duration::from_secs(10));
        assert!(!cache.needs_thumbnail(&source, MediaKind::Image));

        touch(&source, base + Duration::from_secs(20));
        assert!(cache.needs_thumbnail(&source, MediaKind::Image));
    }

    #[test]
    fn scan_groups_and_sorts() {
        let walls = tempfile::tempdir().unwrap();
        for name in ["b.png", "a.PNG", "z.mp4", "loop.gif", "notes.txt", "c.webm"] {
            File::create(walls.path().join(name)).unwrap();
        }
        std::fs::create_dir(walls.path().join("sub.png")).unwrap();

        let names: Vec<String> = ThumbnailCache::scan(walls.path())
            .unwrap()
            .into_iter()
            .map(|(p, _)| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["c.webm", "z.mp4", "a.PNG", "b.png", "loop.gif"]);
    }

    #[test]
    fn pending_jobs_skip_fresh_thumbnails() {
        let walls = tempfile::tempdir().unwrap();
        let cache_root = tempfile::tempdir().unwrap();
        let cache = ThumbnailCache::new(cache_root.path());
        cache.ensure_dirs().unwrap();

        let old = SystemTime::now() - Duration::from_secs(600);
        touch(&walls.path().join("done.png"), old);
        touch(&walls.path().join("new.png"), old);
        touch(
            &cache.thumbnail_path(&walls.path().join("done.png"), MediaKind::Image),
            SystemTime::now(),
        );

        let jobs = cache.pending_jobs(walls.path()).unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].source, walls.path().join("new.png"));
        assert_eq!(jobs[0].output, cache.dir(MediaKind::Image).join("new.png.jpg"));
    }

    #[test]
    fn commands_per_kind() {
        let job = ThumbnailJob {
            source: PathBuf::from("/w/clip.mp4"),
            kind: MediaKind::Video,
            output: PathBuf::from("/c/clip.mp4.jpg"),
        };
        let (program, args) = job.command();
        assert_eq!(program, "ffmpeg");
        assert_eq!(&args[..5], ["-y", "-i", "/w/clip.mp4", "-ss", "00:00:01"]);
        assert_eq!(args.last().map(String::as_str), Some("/c/clip.mp4.jpg"));

        let gif = ThumbnailJob { kind: MediaKind::Gif, ..job.clone() };
        assert!(!gif.command().1.contains(&"-ss".to_string()));

        let image = ThumbnailJob { kind: MediaKind::Image, ..job };
        let (program, args) = image.command();
        assert_eq!(program, "convert");
        assert_eq!(args[0], "/w/clip.mp4");
        assert!(args.contains(&"320x240^".to_string()));
    }

    #[test]
    fn wallpaper_config_requires_wall_path() {
        let config = WallpaperConfig::from_json(r#"{ "wallPath": "" }"#).unwrap();
        assert!(matches!(config.wall_dir(), Err(Error::MissingWallPath)));
        let config = WallpaperConfig::from_json("{}").unwrap();
        assert!(matches!(config.wall_dir(), Err(Error::MissingWallPath)));

        let walls = tempfile::tempdir().unwrap();
        let json = serde_json::json!({ "wallPath": walls.path() }).to_string();
        let config = WallpaperConfig::from_json(&json).unwrap();
        assert_eq!(config.wall_dir().unwrap(), walls.path());

        let missing = WallpaperConfig::load(&walls.path().join("nope.json"));
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[test]
    fn worker_count_is_bounded() {
        assert_eq!(default_workers(0), 1);
        assert_eq!(default_workers(1), 1);
        assert!(default_workers(100) <= MAX_WORKERS);
    }

    #[tokio::test]
    async fn empty_run_reports_nothing() {
        let report = generate_thumbnails(Vec::new(), 4).await;
        assert_eq!(report.total(), 0);
    }

    #[tokio::test]
    async fn unreadable_source_is_reported_as_failure() {
        let cache_root = tempfile::tempdir().unwrap();
        let job = ThumbnailJob {
            source: cache_root.path().join("missing.webm"),
            kind: MediaKind::Video,
            output: cache_root.path().join("missing.webm.jpg"),
        };
        let report = generate_thumbnails(vec![job], 1).await;
        assert_eq!(report.succeeded, 0);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, cache_root.path().join("missing.webm"));
    }

    #[tokio::test]
    async fn panicking_job_still_counts_as_failed() {
        let image_job = |name: &str| ThumbnailJob {
            source: PathBuf::from("/walls").join(name),
            kind: MediaKind::Image,
            output: PathBuf::from("/cache").join(format!("{}.jpg", name)),
        };
        let jobs = vec![image_job("broken.png"), image_job("fine.png")];

        let report = run_jobs(jobs, 2, |job| async move {
            if job.source.ends_with("broken.png") {
                panic!("decoder crashed");
            }
            Ok::<(), Error>(())
        })
        .await;

        assert_eq!(report.total(), 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, PathBuf::from("/walls/broken.png"));
    }
}
