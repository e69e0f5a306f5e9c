//! Configuration management with environment variable support.
//!
//! This module provides centralized configuration for exports, supporting:
//! - Environment variables for all configurable values
//! - Defaults matching the builder's export behavior (2x scale, best JPEG quality)
//! - Builder pattern for programmatic configuration
//!
//! # Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `RESUME_EXPORT_OUTPUT_DIR` | Directory finished PDFs are saved to | `.` |
//! | `RESUME_EXPORT_SCALE` | Capture scale factor | `2` |
//! | `RESUME_EXPORT_FILENAME` | Fallback file name (without `.pdf`) | `resume` |
//! | `RESUME_EXPORT_JPEG_QUALITY` | Snapshot JPEG quality (1-100) | `100` |
//! | `RESUME_EXPORT_TEMPLATE` | Default template | `modern` |
//!
//! # Example
//!
//! ```bash
//! export RESUME_EXPORT_OUTPUT_DIR="$HOME/Downloads"
//! export RESUME_EXPORT_SCALE=3
//! ```

use std::env;
use std::path::PathBuf;
use std::sync::OnceLock;

use crate::resume::TemplateKind;

// ============================================================================
// Default Values
// ============================================================================

/// Default directory for saved PDFs
pub const DEFAULT_OUTPUT_DIR: &str = ".";

/// Default capture scale factor
pub const DEFAULT_SCALE: f64 = 2.0;

/// Default file name when none is given
pub const DEFAULT_FILENAME: &str = "resume";

/// Default JPEG quality
pub const DEFAULT_JPEG_QUALITY: u8 = 100;

/// Default template name
pub const DEFAULT_TEMPLATE: &str = "modern";

/// Default mock surface width (pixels)
pub const DEFAULT_MOCK_WIDTH: u32 = 595;

/// Default mock surface height (pixels)
pub const DEFAULT_MOCK_HEIGHT: u32 = 842;

// ============================================================================
// Environment Variable Names
// ============================================================================

/// Environment variable for the output directory
pub const ENV_OUTPUT_DIR: &str = "RESUME_EXPORT_OUTPUT_DIR";

/// Environment variable for the capture scale
pub const ENV_SCALE: &str = "RESUME_EXPORT_SCALE";

/// Environment variable for the fallback file name
pub const ENV_FILENAME: &str = "RESUME_EXPORT_FILENAME";

/// Environment variable for JPEG quality
pub const ENV_JPEG_QUALITY: &str = "RESUME_EXPORT_JPEG_QUALITY";

/// Environment variable for the default template
pub const ENV_TEMPLATE: &str = "RESUME_EXPORT_TEMPLATE";

// ============================================================================
// Configuration Getters (with caching)
// ============================================================================

static CONFIG: OnceLock<Config> = OnceLock::new();

/// Get the global configuration (initialized from environment on first access)
pub fn get() -> &'static Config {
    CONFIG.get_or_init(Config::from_env)
}

/// Centralized export configuration
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Export settings
    pub export: ExportSettings,
    /// Rendering settings
    pub render: RenderSettings,
}

/// Export-related settings
#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Directory finished PDFs are written to
    pub output_dir: PathBuf,
    /// Capture scale factor
    pub scale: f64,
    /// File name used when the requested one is empty
    pub default_filename: String,
    /// Snapshot JPEG quality
    pub jpeg_quality: u8,
}

/// Rendering-related settings
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    /// Template used when the résumé does not pick one
    pub template: TemplateKind,
}

impl Config {
    /// Create configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        Self {
            export: ExportSettings::from_env(),
            render: RenderSettings::from_env(),
        }
    }

    /// Create configuration with all defaults (ignoring environment)
    pub fn defaults() -> Self {
        Self {
            export: ExportSettings::defaults(),
            render: RenderSettings::defaults(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

impl ExportSettings {
    /// Create export settings from environment variables
    pub fn from_env() -> Self {
        Self {
            output_dir: env::var(ENV_OUTPUT_DIR)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_OUTPUT_DIR)),
            scale: env::var(ENV_SCALE)
                .ok()
                .and_then(|s| parse_scale(&s))
                .unwrap_or(DEFAULT_SCALE),
            default_filename: env::var(ENV_FILENAME)
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_FILENAME.to_string()),
            jpeg_quality: env::var(ENV_JPEG_QUALITY)
                .ok()
                .and_then(|s| parse_jpeg_quality(&s))
                .unwrap_or(DEFAULT_JPEG_QUALITY),
        }
    }

    /// Create export settings with defaults
    pub fn defaults() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            scale: DEFAULT_SCALE,
            default_filename: DEFAULT_FILENAME.to_string(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    /// Set the output directory
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the capture scale
    pub fn scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }
}

impl RenderSettings {
    /// Create render settings from environment variables
    pub fn from_env() -> Self {
        Self {
            template: env::var(ENV_TEMPLATE)
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
        }
    }

    /// Create render settings with defaults
    pub fn defaults() -> Self {
        Self {
            template: TemplateKind::default(),
        }
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse a scale factor, accepting only finite positive numbers
fn parse_scale(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite() && *s > 0.0)
}

/// Parse a JPEG quality in 1..=100
fn parse_jpeg_quality(value: &str) -> Option<u8> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|q| (1..=100).contains(q))
}

/// Get the output directory (convenience function)
pub fn output_dir() -> PathBuf {
    get().export.output_dir.clone()
}

/// Get the capture scale (convenience function)
pub fn scale() -> f64 {
    get().export.scale
}

/// Get the fallback file name (convenience function)
pub fn default_filename() -> String {
    get().export.default_filename.clone()
}

/// Get the snapshot JPEG quality (convenience function)
pub fn jpeg_quality() -> u8 {
    get().export.jpeg_quality
}

/// Get the default template (convenience function)
pub fn template() -> TemplateKind {
    get().render.template
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scale() {
        assert_eq!(parse_scale("2"), Some(2.0));
        assert_eq!(parse_scale(" 1.5 "), Some(1.5));
        assert_eq!(parse_scale("0"), None);
        assert_eq!(parse_scale("-3"), None);
        assert_eq!(parse_scale("inf"), None);
        assert_eq!(parse_scale("NaN"), None);
        assert_eq!(parse_scale("big"), None);
    }

    #[test]
    fn test_parse_jpeg_quality() {
        assert_eq!(parse_jpeg_quality("100"), Some(100));
        assert_eq!(parse_jpeg_quality("1"), Some(1));
        assert_eq!(parse_jpeg_quality("0"), None);
        assert_eq!(parse_jpeg_quality("101"), None);
        assert_eq!(parse_jpeg_quality("high"), None);
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::defaults();
        assert_eq!(config.export.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(config.export.scale, DEFAULT_SCALE);
        assert_eq!(config.export.default_filename, DEFAULT_FILENAME);
        assert_eq!(config.export.jpeg_quality, 100);
        assert_eq!(config.render.template, TemplateKind::Modern);
    }

    #[test]
    fn test_export_settings_builder() {
        let settings = ExportSettings::defaults().output_dir("/tmp/out").scale(3.0);
        assert_eq!(settings.output_dir, PathBuf::from("/tmp/out"));
        assert_eq!(settings.scale, 3.0);
    }
}
