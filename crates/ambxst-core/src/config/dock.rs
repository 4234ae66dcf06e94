use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, warn};

use super::AppMatcher;
use crate::error::{Error, Result};

/// Screen edge the dock is anchored to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DockPosition {
    Top,
    #[default]
    Bottom,
    Left,
    Right,
}

impl DockPosition {
    pub fn is_vertical(&self) -> bool {
        matches!(self, DockPosition::Left | DockPosition::Right)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DockPosition::Top => "top",
            DockPosition::Bottom => "bottom",
            DockPosition::Left => "left",
            DockPosition::Right => "right",
        }
    }
}

/// Dock configuration (dock.json).
///
/// `DockConfig::default()` is the built-in default set. A user file is
/// overlaid on it key by key: anything the file leaves out keeps its default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DockConfig {
    pub enabled: bool,
    pub theme: String,
    pub position: DockPosition,
    pub height: i32,
    pub icon_size: i32,
    pub spacing: i32,
    pub margin: i32,
    pub hover_region_height: i32,
    pub pinned_on_startup: bool,
    pub hover_to_reveal: bool,

    // Only present in one of the two historical default sets
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monochrome_icons: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_on_fullscreen: Option<bool>,

    pub show_running_indicators: bool,
    pub show_pin_button: bool,
    pub show_overview_button: bool,

    /// App ids in pin order
    pub pinned_apps: Vec<CompactString>,
    /// Checked in order; the first match wins
    pub ignored_app_regexes: Vec<String>,
    /// Empty means every screen
    pub screen_list: Vec<String>,
}

impl Default for DockConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            theme: "default".to_string(),
            position: DockPosition::Bottom,
            height: 56,
            icon_size: 40,
            spacing: 4,
            margin: 8,
            hover_region_height: 4,
            pinned_on_startup: false,
            hover_to_reveal: true,
            monochrome_icons: Some(false),
            available_on_fullscreen: None,
            show_running_indicators: true,
            show_pin_button: true,
            show_overview_button: true,
            pinned_apps: vec![
                "org.gnome.Nautilus".into(),
                "firefox".into(),
                "kitty".into(),
            ],
            ignored_app_regexes: vec![
                "quickshell.*".to_string(),
                "xdg-desktop-portal.*".to_string(),
            ],
            screen_list: Vec::new(),
        }
    }
}

impl DockConfig {
    /// Parse a user override document on top of the defaults
    pub fn from_json(data: &str) -> Result<Self> {
        serde_json::from_str(data).map_err(|source| Error::Parse {
            what: "dock config",
            source,
        })
    }

    /// Read and overlay a dock config file, reporting every failure
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::from_json(&data)
    }

    /// Read a dock config file, falling back to the defaults when it is
    /// missing or unreadable
    pub fn load(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => {
                info!(
                    "Dock config loaded with {} pinned apps",
                    config.pinned_apps.len()
                );
                config
            }
            Err(Error::Io { source, .. }) if source.kind() == std::io::ErrorKind::NotFound => {
                debug!("No dock config at {:?}, using defaults", path);
                Self::default()
            }
            Err(e) => {
                warn!("Failed to load dock config: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))?;
        }
        let data = serde_json::to_string_pretty(self).map_err(|source| Error::Serialize {
            what: "dock config",
            source,
        })?;
        std::fs::write(path, data).map_err(|e| Error::io(path, e))
    }

    pub fn monochrome_icons(&self) -> bool {
        self.monochrome_icons.unwrap_or(false)
    }

    pub fn available_on_fullscreen(&self) -> bool {
        self.available_on_fullscreen.unwrap_or(false)
    }

    pub fn is_pinned(&self, app_id: &str) -> bool {
        self.pin_index(app_id).is_some()
    }

    /// Position of an app in the pin order
    pub fn pin_index(&self, app_id: &str) -> Option<usize> {
        self.pinned_apps.iter().position(|id| id == app_id)
    }

    /// Compile `ignored_app_regexes` for matching window app ids
    pub fn ignored_app_matcher(&self) -> AppMatcher {
        AppMatcher::new(&self.ignored_app_regexes)
    }

    pub fn shows_on_screen(&self, screen: &str) -> bool {
        self.screen_list.is_empty() || self.screen_list.iter().any(|s| s == screen)
    }
}
