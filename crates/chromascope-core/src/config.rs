//! Visualizer configuration management.
//!
//! Persisted settings for the capture visualizer: which stages run, their
//! mode selections, and the capture rectangle. Configuration is YAML on
//! disk; loading is tolerant, falling back to defaults and reporting
//! warnings instead of failing.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::capture::CaptureRect;
use crate::math::Matrix;
use crate::models::{ColorSpace, HistogramMode};

/// Candidate config file names searched in the working directory.
const CONFIG_FILENAMES: &[&str] = &["chromascope.yml", "chromascope.yaml"];

/// Persisted visualizer settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualizerConfig {
    pub enable_color_cloud: bool,
    pub color_cloud_space: ColorSpace,
    pub enable_histogram: bool,
    pub histogram_mode: HistogramMode,
    pub histogram_scale: f32,
    pub show_grid: bool,
    pub bg_opacity: f32,
    pub capture: CaptureRect,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            enable_color_cloud: false,
            color_cloud_space: ColorSpace::default(),
            enable_histogram: false,
            histogram_mode: HistogramMode::default(),
            histogram_scale: 0.5,
            show_grid: false,
            bg_opacity: 1.0,
            capture: CaptureRect::new(100, 100, 1280, 720),
        }
    }
}

impl VisualizerConfig {
    /// Placement transform for the cloud: the caller's rotation, scaled to
    /// fit the capture aspect and pushed into the depth range.
    pub fn projection_matrix(&self, rotation: &Matrix) -> Matrix {
        let (width, height) = (self.capture.width as f32, self.capture.height as f32);
        let scale = 0.9 * width.min(height) / width.max(height).max(1.0);

        rotation
            .mul(&Matrix::scale(scale, scale, 0.25))
            .mul(&Matrix::translate(0.0, 0.0, 0.5))
    }

    /// Save to a YAML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let yaml = serde_yaml::to_string(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        fs::write(path.as_ref(), yaml).map_err(|e| format!("Failed to write config file: {}", e))
    }
}

/// Loaded configuration plus its provenance.
pub struct ConfigHandle {
    pub config: VisualizerConfig,
    pub source: Option<PathBuf>,
    pub warnings: Vec<String>,
}

/// Load configuration from disk, optionally forcing a specific path.
///
/// Unreadable or unparsable candidates produce warnings and the search
/// continues; when nothing loads, the defaults apply.
pub fn load_config(custom_path: Option<&Path>) -> ConfigHandle {
    let mut warnings = Vec::new();

    let candidates: Vec<PathBuf> = match custom_path {
        Some(path) => vec![path.to_path_buf()],
        None => CONFIG_FILENAMES.iter().map(PathBuf::from).collect(),
    };

    for candidate in candidates {
        if !candidate.is_file() {
            continue;
        }

        match fs::read_to_string(&candidate) {
            Ok(contents) => match serde_yaml::from_str::<VisualizerConfig>(&contents) {
                Ok(config) => {
                    log::debug!("Loaded config from {}", candidate.display());
                    let source = fs::canonicalize(&candidate).unwrap_or(candidate);
                    return ConfigHandle {
                        config,
                        source: Some(source),
                        warnings,
                    };
                }
                Err(e) => {
                    warnings.push(format!("Failed to parse {}: {}", candidate.display(), e));
                }
            },
            Err(e) => {
                warnings.push(format!("Failed to read {}: {}", candidate.display(), e));
            }
        }
    }

    ConfigHandle {
        config: VisualizerConfig::default(),
        source: None,
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VisualizerConfig::default();
        assert!(!config.enable_color_cloud);
        assert_eq!(config.histogram_scale, 0.5);
        assert_eq!(config.capture.width, 1280);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = VisualizerConfig::default();
        config.enable_histogram = true;
        config.histogram_mode = HistogramMode::Hue;
        config.color_cloud_space = ColorSpace::Cylinder;

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed: VisualizerConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let parsed: VisualizerConfig = serde_yaml::from_str("enable_histogram: true\n").unwrap();
        assert!(parsed.enable_histogram);
        assert_eq!(parsed.histogram_scale, 0.5);
    }

    #[test]
    fn test_missing_config_falls_back_to_defaults() {
        let handle = load_config(Some(Path::new("/nonexistent/chromascope.yml")));
        assert!(handle.source.is_none());
        assert_eq!(handle.config, VisualizerConfig::default());
    }

    #[test]
    fn test_projection_matrix_scales_to_square() {
        let mut config = VisualizerConfig::default();
        config.capture = CaptureRect::new(0, 0, 200, 100);

        let m = config.projection_matrix(&Matrix::identity());
        // X/Y scale is 0.9 * min/max = 0.45, depth compressed and recentered
        let p = m.transform_point([1.0, 1.0, 0.0]);
        assert!((p[0] - 0.45).abs() < 1e-6);
        assert!((p[1] - 0.45).abs() < 1e-6);
        assert!((p[2] - 0.125).abs() < 1e-6);
    }
}
