mod commands;

use std::path::PathBuf;

use ambxst_core::ConfigPaths;
use clap::{Parser, Subcommand};
use tracing::debug;

#[derive(Parser)]
#[command(name = "ambxst-ctl")]
#[command(about = "Dock defaults, notification text and wallpaper helpers for Ambxst")]
#[command(version)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the effective dock config as JSON
    DockDefaults {
        /// Ignore the user's dock.json
        #[arg(long)]
        defaults_only: bool,
        /// Read overrides from this file instead of the default location
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Show whether an app is pinned or hidden from the dock
    DockCheck {
        /// Window app id / class
        app_id: String,
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Format a notification timestamp relative to now
    NotifTime {
        /// Milliseconds since the Unix epoch (0 means none)
        millis: i64,
    },
    /// Clean up a notification body for display
    NotifBody {
        /// Name of the sending application
        #[arg(long)]
        app: Option<String>,
        body: String,
    },
    /// Generate the palette tint shader for mpv
    Shader {
        /// JSON palette file (array of {r,g,b} or "#rrggbb"); defaults to
        /// ~/.config/ambxst/palette.json when no --color is given
        #[arg(long)]
        palette: Option<PathBuf>,
        /// Palette entry as #rrggbb; may be repeated
        #[arg(long = "color")]
        colors: Vec<String>,
        /// Output file (default: ~/.config/mpv/shaders/ambxst_palette.glsl)
        #[arg(long, conflicts_with = "stdout")]
        output: Option<PathBuf>,
        /// Print the shader instead of writing it
        #[arg(long)]
        stdout: bool,
    },
    /// Generate missing or stale wallpaper thumbnails
    Thumbnails {
        /// Wallpaper config file containing wallPath
        config: Option<PathBuf>,
    },
    /// Extract a still lockscreen frame from a video or GIF wallpaper
    Lockscreen {
        wallpaper: PathBuf,
        /// Shell data directory (default: ~/.local/share/quickshell)
        data_dir: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(format!("ambxst_ctl={}", level).parse()?)
                .add_directive(format!("ambxst_core={}", level).parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    debug!("ambxst-ctl {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::DockDefaults {
            defaults_only,
            config,
        } => commands::dock_defaults(defaults_only, config),
        Command::DockCheck { app_id, config } => commands::dock_check(&app_id, config),
        Command::NotifTime { millis } => {
            println!("{}", commands::notif_time(millis));
            Ok(())
        }
        Command::NotifBody { app, body } => {
            println!("{}", commands::notif_body(&body, app.as_deref()));
            Ok(())
        }
        Command::Shader {
            palette,
            colors,
            output,
            stdout,
        } => commands::shader(&ConfigPaths::new(), palette, &colors, output, stdout),
        Command::Thumbnails { config } => commands::thumbnails(config),
        Command::Lockscreen {
            wallpaper,
            data_dir,
        } => commands::lockscreen(wallpaper, data_dir),
    }
}
