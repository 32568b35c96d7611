use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

use crate::cli::Args;
use crate::color::ColorScheme;
use crate::display::DisplayMode;
use crate::viewport::{LayoutRules, Viewport};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub display: DisplayConfig,
    pub chart: ChartConfig,
    pub viewport: ViewportConfig,
    pub animation: AnimationConfig,
    pub markers: MarkerConfig,
    pub style: StyleConfig,
    pub watch: WatchConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub mode: DisplayMode,
}

/// Axis furniture and curve shape
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChartConfig {
    /// Boat speeds (kts) that get a concentric ring
    pub speed_rings: Vec<f64>,
    /// Rings above this speed are drawn without a label
    pub ring_label_max: f64,
    /// True wind angles (degrees) that get a spoke
    pub wind_angles: Vec<f64>,
    /// Boat speed mapped onto the full radius
    pub sog_domain_max: f64,
    /// Cardinal spline tension, 0 = smooth, 1 = straight segments
    pub curve_tension: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            speed_rings: vec![2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0],
            ring_label_max: 10.0,
            wind_angles: vec![
                0.0, 45.0, 52.0, 60.0, 75.0, 90.0, 110.0, 120.0, 135.0, 150.0, 165.0,
            ],
            sog_domain_max: 10.0,
            curve_tension: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ViewportConfig {
    pub container_width: f64,
    pub window_width: f64,
    pub window_height: f64,
    pub mobile_breakpoint: f64,
    pub margin_left: f64,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            container_width: 820.0,
            window_width: 1280.0,
            window_height: 900.0,
            mobile_breakpoint: 768.0,
            margin_left: 10.0,
        }
    }
}

impl ViewportConfig {
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.container_width, self.window_width, self.window_height)
    }

    pub fn rules(&self) -> LayoutRules {
        LayoutRules {
            mobile_breakpoint: self.mobile_breakpoint,
            margin_left: self.margin_left,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    pub render_ms: u64,
    pub highlight_ms: u64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            render_ms: 200,
            highlight_ms: 50,
        }
    }
}

impl AnimationConfig {
    pub fn render(&self) -> Duration {
        Duration::from_millis(self.render_ms)
    }

    pub fn highlight(&self) -> Duration {
        Duration::from_millis(self.highlight_ms)
    }
}

/// Symbol areas in square pixels
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MarkerConfig {
    pub run_size: f64,
    pub highlight_size: f64,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        Self {
            run_size: 32.0,
            highlight_size: 80.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct StyleConfig {
    pub color_scheme: ColorScheme,
    /// Write stroke/fill attributes into the SVG instead of relying on a stylesheet
    pub inline: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WatchConfig {
    pub poll_interval_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 500,
        }
    }
}

impl WatchConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        Ok(config)
    }

    /// Get the default XDG config path (~/.config/vpp-polar/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vpp-polar").join("config.toml"))
    }

    /// Load config from the default XDG path if it exists
    /// Returns None if file doesn't exist, logs warning on parse errors
    pub fn load_from_default_path() -> Option<Self> {
        let path = Self::default_path()?;
        if path.exists() {
            match Self::load(&path) {
                Ok(config) => Some(config),
                Err(e) => {
                    warn!("{:#}. Using defaults.", e);
                    None
                }
            }
        } else {
            None
        }
    }

    /// Initialize default config file at XDG path, returns the path
    pub fn init_default_config() -> Result<PathBuf> {
        let path = Self::default_path()
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Self::write_template(&path)?;
        Ok(path)
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, Self::generate_config_template())?;
        Ok(())
    }

    /// Store the color scheme in the config file, keeping the user's comments
    /// and formatting. Creates the file from the template when missing.
    pub fn persist_color_scheme(path: &Path, scheme: ColorScheme) -> Result<()> {
        if !path.exists() {
            Self::write_template(path)?;
            info!("Created config file at {}", path.display());
        }

        let content = std::fs::read_to_string(path)?;
        let mut doc = content
            .parse::<toml_edit::DocumentMut>()
            .context("Failed to parse config for save")?;

        // Ensure [style] section exists
        if !doc.contains_key("style") {
            doc["style"] = toml_edit::table();
        }
        doc["style"]["color_scheme"] = toml_edit::value(scheme.name());

        std::fs::write(path, doc.to_string())?;
        Ok(())
    }

    /// Generate a commented TOML config template
    pub fn generate_config_template() -> String {
        r#"# vpp-polar configuration
# This file is auto-generated. Edit as needed.

[display]
# Display mode: "svg" or "terminal"
mode = "svg"

[chart]
# Boat speeds (kts) drawn as concentric rings
speed_rings = [2, 4, 6, 8, 10, 12, 14, 16]
# Rings above this speed are drawn without a label
ring_label_max = 10
# True wind angles (degrees) drawn as spokes
wind_angles = [0, 45, 52, 60, 75, 90, 110, 120, 135, 150, 165]
# Boat speed reaching the full plot radius
sog_domain_max = 10
# Curve tension (0.0 = smooth cardinal spline, 1.0 = straight segments)
curve_tension = 0.0

[viewport]
# Width of the element the chart is drawn into (pixels)
container_width = 820
# Window size used for height rules
window_width = 1280
window_height = 900
# Windows narrower than this use the full window height
mobile_breakpoint = 768
# Horizontal offset of the plot origin
margin_left = 10

[animation]
# Transition duration for render and resize (ms)
render_ms = 200
# Transition duration for hover highlight (ms)
highlight_ms = 50

[markers]
# Symbol areas in square pixels
run_size = 32
highlight_size = 80

[style]
# Series colors: "spectrum", "rainbow", "fire", "ocean", "forest", "purple", "monochrome"
color_scheme = "spectrum"
# Write stroke/fill attributes into the SVG
inline = false

[watch]
# How often --watch checks the input file (ms)
poll_interval_ms = 500
"#
        .to_string()
    }

    /// Merge CLI arguments into config (CLI takes priority)
    pub fn merge_args(&mut self, args: &Args) {
        if let Some(mode) = args.mode {
            self.display.mode = mode;
        }

        if let Some(width) = args.width {
            self.viewport.container_width = width;
        }
        if let Some(width) = args.window_width {
            self.viewport.window_width = width;
        }
        if let Some(height) = args.window_height {
            self.viewport.window_height = height;
        }

        if let Some(scheme) = args.colors {
            self.style.color_scheme = scheme;
        }
        if args.inline_style {
            self.style.inline = true;
        }
        if args.no_inline_style {
            self.style.inline = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;

    #[test]
    fn template_parses_to_defaults() {
        let config: Config = toml::from_str(&Config::generate_config_template()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config: Config = toml::from_str("[animation]\nrender_ms = 400\n").unwrap();
        assert_eq!(config.animation.render_ms, 400);
        assert_eq!(config.animation.highlight_ms, 50);
        assert_eq!(config.chart, ChartConfig::default());
    }

    #[test]
    fn cli_overrides_file_values() {
        let mut config = Config::default();
        let args = Args::parse_from([
            "vpp-polar",
            "--width",
            "500",
            "--colors",
            "fire",
            "--inline-style",
            "-m",
            "terminal",
        ]);
        config.merge_args(&args);
        assert_eq!(config.viewport.container_width, 500.0);
        assert_eq!(config.style.color_scheme, ColorScheme::Fire);
        assert!(config.style.inline);
        assert_eq!(config.display.mode, DisplayMode::Terminal);
    }

    #[test]
    fn persist_keeps_comments() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        Config::persist_color_scheme(&path, ColorScheme::Ocean).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("# Series colors"));
        assert_eq!(Config::load(&path).unwrap().style.color_scheme, ColorScheme::Ocean);
    }
}
