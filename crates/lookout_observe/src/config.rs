//! Observer configuration
//!
//! Everything has a default, so an empty file (or no file) is valid:
//!
//! ```toml
//! prefer_native_resize = true
//! track_pointer = true
//! track_scroll = true
//!
//! [viewability]
//! cushion = 0.0
//!
//! [viewability.offsets]
//! top = 0.0
//! bottom = 0.0
//!
//! [watchers]
//! resize_mode = "continuous"
//! scroll_mode = "continuous"
//! ```

use std::fs;
use std::path::Path;

use lookout_core::ViewabilityConfig;
use lookout_scheduler::ThrottleMode;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Configuration for [`crate::LayoutObserver`] and the watchers
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserveConfig {
    /// Use the host's per-element resize observation when it has one
    pub prefer_native_resize: bool,
    /// Track pointer position and hover
    pub track_pointer: bool,
    /// Re-measure on document scroll
    pub track_scroll: bool,
    /// Viewability tuning
    pub viewability: ViewabilityConfig,
    /// Callback watcher tuning
    pub watchers: WatcherConfig,
}

impl Default for ObserveConfig {
    fn default() -> Self {
        Self {
            prefer_native_resize: true,
            track_pointer: true,
            track_scroll: true,
            viewability: ViewabilityConfig::default(),
            watchers: WatcherConfig::default(),
        }
    }
}

/// Scheduling modes for [`crate::ResizeWatcher`] and [`crate::ScrollWatcher`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    pub resize_mode: ThrottleMode,
    pub scroll_mode: ThrottleMode,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        // Watchers keep polling every frame once started
        Self {
            resize_mode: ThrottleMode::Continuous,
            scroll_mode: ThrottleMode::Continuous,
        }
    }
}

impl ObserveConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: ObserveConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_toml_str(&text)?;
        tracing::debug!("Loaded observer config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !self.viewability.is_valid() {
            return Err(ConfigError::Invalid(format!(
                "viewability.cushion must be within 0..=1, got {}",
                self.viewability.cushion
            )));
        }
        Ok(())
    }

    /// Set the viewability tuning
    pub fn viewability(mut self, viewability: ViewabilityConfig) -> Self {
        self.viewability = viewability;
        self
    }

    /// Set whether native resize observation is preferred
    pub fn prefer_native_resize(mut self, prefer: bool) -> Self {
        self.prefer_native_resize = prefer;
        self
    }

    /// Set whether the pointer is tracked
    pub fn track_pointer(mut self, track: bool) -> Self {
        self.track_pointer = track;
        self
    }

    /// Set whether scrolling triggers re-measurement
    pub fn track_scroll(mut self, track: bool) -> Self {
        self.track_scroll = track;
        self
    }

    /// Set the watcher scheduling modes
    pub fn watchers(mut self, watchers: WatcherConfig) -> Self {
        self.watchers = watchers;
        self
    }
}
