//! Preload configuration

use std::path::PathBuf;
use std::time::Duration;

/// Heuristic limits below which a device is treated as low-performance
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionThresholds {
    /// Fewer logical cores than this selects low mode
    pub min_cpu_cores: usize,
    /// A narrower viewport than this (in CSS pixels) selects low mode
    pub min_viewport_width: u32,
    /// Case-insensitive user agent fragments that identify mobile devices
    pub mobile_markers: Vec<String>,
}

impl Default for DetectionThresholds {
    fn default() -> Self {
        Self {
            min_cpu_cores: 4,
            min_viewport_width: 768,
            mobile_markers: ["mobi", "android", "iphone", "ipad", "ipod"]
                .iter()
                .map(|m| m.to_string())
                .collect(),
        }
    }
}

/// Configuration for preloading and progress reporting
#[derive(Debug, Clone, PartialEq)]
pub struct PreloadConfig {
    /// Directory registry paths are resolved against
    pub asset_root: PathBuf,
    /// How often the progress subscription re-reads the store
    pub progress_poll_interval: Duration,
    /// How often a model binding re-evaluates its variant
    pub binding_poll_interval: Duration,
    /// Pause before fetches are issued so the first frame can render
    pub start_delay: Duration,
    pub thresholds: DetectionThresholds,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            asset_root: PathBuf::from("public"),
            progress_poll_interval: Duration::from_millis(100),
            binding_poll_interval: Duration::from_millis(500),
            start_delay: Duration::from_millis(100),
            thresholds: DetectionThresholds::default(),
        }
    }
}

impl PreloadConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_asset_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.asset_root = root.into();
        self
    }

    pub fn with_progress_poll_interval(mut self, interval: Duration) -> Self {
        self.progress_poll_interval = interval;
        self
    }

    pub fn with_binding_poll_interval(mut self, interval: Duration) -> Self {
        self.binding_poll_interval = interval;
        self
    }

    pub fn with_start_delay(mut self, delay: Duration) -> Self {
        self.start_delay = delay;
        self
    }

    pub fn with_thresholds(mut self, thresholds: DetectionThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }
}
