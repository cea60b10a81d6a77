//! Performance mode detection
//!
//! Decides once per session whether to go for low or high fidelity assets.
//! A saved preference always wins; otherwise CPU count, viewport width and
//! user agent decide, and the result is saved for next time.

pub mod preferences;

pub use preferences::{FilePreferences, MemoryPreferences, PreferenceStore};

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::DetectionThresholds;
use crate::error::{PreloadError, Result};

/// Preference key holding the saved mode
pub const PERFORMANCE_MODE_KEY: &str = "performanceMode";

/// Session-wide fidelity trade-off
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PerformanceMode {
    Low,
    #[default]
    High,
}

impl PerformanceMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceMode::Low => "low",
            PerformanceMode::High => "high",
        }
    }

    pub fn is_low(&self) -> bool {
        matches!(self, PerformanceMode::Low)
    }
}

impl fmt::Display for PerformanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceMode {
    type Err = PreloadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(PerformanceMode::Low),
            "high" => Ok(PerformanceMode::High),
            other => Err(PreloadError::Preference(format!(
                "unknown performance mode {other:?}"
            ))),
        }
    }
}

/// Viewport size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

/// What is known about the device running the experience
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceProfile {
    pub cpu_cores: usize,
    pub viewport: Option<Viewport>,
    pub user_agent: String,
}

impl DeviceProfile {
    /// Profile of the current process; viewport and user agent are unknown
    pub fn current() -> Self {
        let cpu_cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            cpu_cores,
            viewport: None,
            user_agent: String::new(),
        }
    }

    pub fn new(cpu_cores: usize) -> Self {
        Self {
            cpu_cores,
            viewport: None,
            user_agent: String::new(),
        }
    }

    pub fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport = Some(Viewport { width, height });
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Picks a [`PerformanceMode`] and remembers it
pub struct PerformanceDetector<P: PreferenceStore> {
    preferences: P,
    thresholds: DetectionThresholds,
}

impl<P: PreferenceStore> PerformanceDetector<P> {
    pub fn new(preferences: P, thresholds: DetectionThresholds) -> Self {
        Self {
            preferences,
            thresholds,
        }
    }

    pub fn preferences(&self) -> &P {
        &self.preferences
    }

    /// Mode saved by a previous session or by the user, if readable
    pub fn saved_mode(&self) -> Option<PerformanceMode> {
        saved_mode(&self.preferences)
    }

    /// Heuristic decision ignoring any saved preference
    pub fn classify(&self, profile: &DeviceProfile) -> PerformanceMode {
        let thresholds = &self.thresholds;

        if profile.cpu_cores < thresholds.min_cpu_cores {
            log::debug!("Low performance mode: {} cpu cores", profile.cpu_cores);
            return PerformanceMode::Low;
        }

        if let Some(viewport) = profile.viewport {
            if viewport.width < thresholds.min_viewport_width {
                log::debug!("Low performance mode: viewport {}px wide", viewport.width);
                return PerformanceMode::Low;
            }
        }

        let agent = profile.user_agent.to_ascii_lowercase();
        if thresholds
            .mobile_markers
            .iter()
            .any(|marker| agent.contains(&marker.to_ascii_lowercase()))
        {
            log::debug!("Low performance mode: mobile user agent");
            return PerformanceMode::Low;
        }

        PerformanceMode::High
    }

    /// Saved preference if any, heuristics otherwise
    pub fn detect(&self, profile: &DeviceProfile) -> PerformanceMode {
        self.saved_mode().unwrap_or_else(|| self.classify(profile))
    }

    /// Like [`detect`](Self::detect), saving a heuristic result for later sessions
    pub fn detect_and_persist(&self, profile: &DeviceProfile) -> Result<PerformanceMode> {
        if let Some(mode) = self.saved_mode() {
            return Ok(mode);
        }
        let mode = self.classify(profile);
        self.preferences.set(PERFORMANCE_MODE_KEY, mode.as_str())?;
        Ok(mode)
    }

    /// Record an explicit user choice
    pub fn set_override(&self, mode: PerformanceMode) -> Result<()> {
        self.preferences.set(PERFORMANCE_MODE_KEY, mode.as_str())
    }
}

/// Read the saved mode from any preference store.
///
/// Unreadable stores and unrecognised values count as "nothing saved".
pub fn saved_mode(preferences: &(impl PreferenceStore + ?Sized)) -> Option<PerformanceMode> {
    match preferences.get(PERFORMANCE_MODE_KEY) {
        Ok(Some(value)) => match value.parse() {
            Ok(mode) => Some(mode),
            Err(err) => {
                log::warn!("Ignoring saved performance mode: {err}");
                None
            }
        },
        Ok(None) => None,
        Err(err) => {
            log::warn!("Could not read performance preference: {err}");
            None
        }
    }
}
