//! Page configuration
//!
//! Defaults reproduce the production launch page. An override can be embedded
//! in the page as JSON (`<script id="launch-config" type="application/json">`)
//! or handed to the native preview as a file.

use chrono::{DateTime, FixedOffset, Offset, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where every exit path leads
pub const DEFAULT_REDIRECT_URL: &str = "https://ajanthaconsultancy.in/";

/// 2025-11-23T14:30:00+05:30
const DEFAULT_LAUNCH_MS: i64 = 1_763_888_400_000;
const DEFAULT_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("redirect url must be http(s), got {0:?}")]
    RedirectUrl(String),
    #[error("exit countdown must be at least one second")]
    ExitCountdown,
    #[error("{0} palette is empty")]
    EmptyPalette(&'static str),
    #[error("{0} per-burst count is zero")]
    EmptyBurst(&'static str),
    #[error("{what} cap {max} is below one burst of {burst}")]
    CapBelowBurst {
        what: &'static str,
        max: usize,
        burst: usize,
    },
    #[error("firework cue {index} is outside the viewport ({x}%, {y}%)")]
    CueOutOfRange { index: usize, x: f32, y: f32 },
}

/// What a confirmed click on the gate's entry button leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EntryAction {
    /// Hand over to the celebration screen, which redirects when it is done
    #[default]
    Celebrate,
    /// Redirect straight from the gate
    Redirect,
}

/// Top-level page configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    /// External site every exit path leads to
    pub redirect_url: String,
    /// Launch moment, RFC 3339 with offset
    pub launch_at: DateTime<FixedOffset>,
    /// LocalStorage key of the entry flag
    pub storage_key: String,
    pub entry_action: EntryAction,
    /// Exit animation length before the entry action runs
    pub exit_delay_ms: u32,
    pub show: ShowConfig,
}

/// Celebration screen timing and effects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ShowConfig {
    /// How long the curtains cover the screen
    pub curtain_ms: u32,
    /// Exit countdown start value
    pub exit_countdown_secs: u32,
    pub confetti: ConfettiConfig,
    pub fireworks: FireworkConfig,
    /// Cap on live confetti pieces
    pub max_confetti: usize,
    /// Cap on live firework bursts
    pub max_fireworks: usize,
}

/// Confetti cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfettiConfig {
    /// Burst times relative to mount
    pub bursts_ms: Vec<u32>,
    pub per_burst: usize,
    /// Launch speed range (pixels/step)
    pub speed: [f32; 2],
    /// Random upward lift range added to the launch speed
    pub lift: f32,
    /// Piece size range (pixels)
    pub size: [f32; 2],
    /// Full spin range (degrees/step), centered on zero
    pub spin: f32,
    pub palette: Vec<String>,
}

/// Fireworks show
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FireworkConfig {
    pub cues: Vec<FireworkCue>,
    pub per_burst: usize,
    /// Spark speed range (pixels/step)
    pub speed: [f32; 2],
    pub palette: Vec<String>,
}

/// One scheduled firework, positioned in viewport percentages
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FireworkCue {
    pub x_percent: f32,
    pub y_percent: f32,
    pub delay_ms: u32,
}

impl FireworkCue {
    pub const fn new(x_percent: f32, y_percent: f32, delay_ms: u32) -> Self {
        Self {
            x_percent,
            y_percent,
            delay_ms,
        }
    }
}

fn palette(colors: &[&str]) -> Vec<String> {
    colors.iter().map(|c| c.to_string()).collect()
}

fn default_launch_at() -> DateTime<FixedOffset> {
    let offset = FixedOffset::east_opt(DEFAULT_UTC_OFFSET_SECS).unwrap_or(Utc.fix());
    (DateTime::<Utc>::UNIX_EPOCH + TimeDelta::milliseconds(DEFAULT_LAUNCH_MS)).with_timezone(&offset)
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            redirect_url: DEFAULT_REDIRECT_URL.to_string(),
            launch_at: default_launch_at(),
            storage_key: "siteLaunched".to_string(),
            entry_action: EntryAction::Celebrate,
            exit_delay_ms: 1600,
            show: ShowConfig::default(),
        }
    }
}

impl Default for ShowConfig {
    fn default() -> Self {
        Self {
            curtain_ms: 1800,
            exit_countdown_secs: 25,
            confetti: ConfettiConfig::default(),
            fireworks: FireworkConfig::default(),
            max_confetti: 2000,
            max_fireworks: 16,
        }
    }
}

impl Default for ConfettiConfig {
    fn default() -> Self {
        Self {
            bursts_ms: vec![1500, 4000, 7000, 10000, 14000],
            per_burst: 250,
            speed: [10.0, 25.0],
            lift: 8.0,
            size: [10.0, 28.0],
            spin: 25.0,
            palette: palette(&[
                "#FFD700", "#FF1493", "#00FF7F", "#FF4500", "#8A2BE2", "#00CED1", "#FF69B4",
            ]),
        }
    }
}

impl Default for FireworkConfig {
    fn default() -> Self {
        Self {
            cues: vec![
                FireworkCue::new(25.0, 20.0, 2500),
                FireworkCue::new(75.0, 25.0, 4000),
                FireworkCue::new(50.0, 15.0, 6000),
                FireworkCue::new(35.0, 30.0, 8500),
                FireworkCue::new(65.0, 20.0, 11000),
            ],
            per_burst: 80,
            speed: [4.0, 10.0],
            palette: palette(&["#FF006E", "#8338EC", "#3A86FF", "#FFBE0B", "#FB5607"]),
        }
    }
}

impl LaunchConfig {
    /// Element holding an inline JSON override
    pub const ELEMENT_ID: &'static str = "launch-config";

    /// Parse and validate a JSON document. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = self.redirect_url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::RedirectUrl(self.redirect_url.clone()));
        }
        if self.show.exit_countdown_secs == 0 {
            return Err(ConfigError::ExitCountdown);
        }
        if self.show.confetti.palette.is_empty() {
            return Err(ConfigError::EmptyPalette("confetti"));
        }
        if self.show.fireworks.palette.is_empty() {
            return Err(ConfigError::EmptyPalette("firework"));
        }
        if self.show.confetti.per_burst == 0 {
            return Err(ConfigError::EmptyBurst("confetti"));
        }
        if self.show.fireworks.per_burst == 0 {
            return Err(ConfigError::EmptyBurst("firework"));
        }
        if self.show.max_confetti < self.show.confetti.per_burst {
            return Err(ConfigError::CapBelowBurst {
                what: "confetti",
                max: self.show.max_confetti,
                burst: self.show.confetti.per_burst,
            });
        }
        if self.show.max_fireworks == 0 {
            return Err(ConfigError::CapBelowBurst {
                what: "firework",
                max: 0,
                burst: 1,
            });
        }
        let in_range = |v: f32| (0.0..=100.0).contains(&v);
        for (index, cue) in self.show.fireworks.cues.iter().enumerate() {
            if !in_range(cue.x_percent) || !in_range(cue.y_percent) {
                return Err(ConfigError::CueOutOfRange {
                    index,
                    x: cue.x_percent,
                    y: cue.y_percent,
                });
            }
        }
        Ok(())
    }

    /// Launch moment in Unix milliseconds
    pub fn launch_at_ms(&self) -> i64 {
        self.launch_at.timestamp_millis()
    }

    /// Move the launch moment, keeping the configured UTC offset
    pub fn with_launch_at_ms(mut self, ms: i64) -> Self {
        if let Some(at) = DateTime::from_timestamp_millis(ms) {
            self.launch_at = at.with_timezone(&self.launch_at.timezone());
        }
        self
    }

    pub fn with_entry_action(mut self, action: EntryAction) -> Self {
        self.entry_action = action;
        self
    }

    /// Load the inline override (WASM only). Falls back to defaults.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(Self::ELEMENT_ID))
            .and_then(|el| el.text_content());

        match json.as_deref().map(str::trim) {
            Some(json) if !json.is_empty() => match Self::from_json(json) {
                Ok(config) => {
                    log::info!("Loaded page config (launch at {})", config.launch_at);
                    config
                }
                Err(e) => {
                    log::warn!("Ignoring page config: {}", e);
                    Self::default()
                }
            },
            _ => {
                log::info!("Using default page config");
                Self::default()
            }
        }
    }

    /// Read a config file (native preview)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Read a config file, falling back to defaults when it is missing or
    /// invalid (native preview)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path_or_default(path: impl AsRef<std::path::Path>) -> Self {
        let path = path.as_ref();
        match Self::from_path(path) {
            Ok(config) => {
                log::info!("Loaded {} (launch at {})", path.display(), config.launch_at);
                config
            }
            Err(e) => {
                log::warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
