mod preset;

pub use preset::{builtin_presets, EulerDegrees, Preset, RenderItem, RenderableKind};

use std::collections::BTreeMap;
use std::ops::RangeInclusive;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ConfigError, GeometryError, Result};
use crate::placement::{Orientation, PlacementPipeline};

/// Slack values accepted from users.
pub const SLACK_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Segment counts accepted from users.
pub const SEGMENT_RANGE: RangeInclusive<usize> = 2..=100;

/// Element spacings accepted from users.
pub const SPACING_RANGE: RangeInclusive<f64> = 0.1..=10.0;

/// Checks a slack value against [`SLACK_RANGE`].
///
/// # Errors
///
/// Returns [`GeometryError::ParameterOutOfRange`] if the value is outside the range.
pub fn validate_slack(slack: f64) -> std::result::Result<f64, GeometryError> {
    check_range("slack", slack, &SLACK_RANGE)
}

/// Checks a segment count against [`SEGMENT_RANGE`].
///
/// # Errors
///
/// Returns [`GeometryError::ParameterOutOfRange`] if the value is outside the range.
#[allow(clippy::cast_precision_loss)]
pub fn validate_segments(segments: usize) -> std::result::Result<usize, GeometryError> {
    if SEGMENT_RANGE.contains(&segments) {
        Ok(segments)
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter: "segments",
            value: segments as f64,
            min: *SEGMENT_RANGE.start() as f64,
            max: *SEGMENT_RANGE.end() as f64,
        })
    }
}

/// Checks a spacing against [`SPACING_RANGE`].
///
/// # Errors
///
/// Returns [`GeometryError::ParameterOutOfRange`] if the value is outside the range.
pub fn validate_spacing(spacing: f64) -> std::result::Result<f64, GeometryError> {
    check_range("spacing", spacing, &SPACING_RANGE)
}

fn check_range(
    parameter: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> std::result::Result<f64, GeometryError> {
    // `contains` is false for NaN.
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(GeometryError::ParameterOutOfRange {
            parameter,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// Slack, segment count and spacing of a structure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementParams {
    pub slack: f64,
    pub segments: usize,
    pub spacing: f64,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            slack: 0.3,
            segments: 10,
            spacing: 0.5,
        }
    }
}

impl PlacementParams {
    /// Creates a new parameter set.
    #[must_use]
    pub fn new(slack: f64, segments: usize, spacing: f64) -> Self {
        Self {
            slack,
            segments,
            spacing,
        }
    }

    /// Checks every parameter against its accepted range.
    ///
    /// # Errors
    ///
    /// Returns the first parameter found out of range.
    pub fn validate(&self) -> std::result::Result<(), GeometryError> {
        validate_slack(self.slack)?;
        validate_segments(self.segments)?;
        validate_spacing(self.spacing)?;
        Ok(())
    }
}

/// Orientation settings for placed elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// The element's own facing relative to its model, in degrees.
    pub element_offset: EulerDegrees,
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            element_offset: EulerDegrees::new(0.0, 0.0, 90.0),
        }
    }
}

/// Top-level configuration.
///
/// ```toml
/// [defaults]
/// slack = 0.3
/// segments = 10
/// spacing = 0.5
///
/// [orientation]
/// element_offset = { x = 0.0, y = 0.0, z = 90.0 }
///
/// [presets.chain]
/// name = "Chain"
/// material = "CHAIN"
/// kind = "item"
/// slack = 0.3
/// ```
///
/// A configuration without presets gets the built-in ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatenaryConfig {
    /// Parameters for structures created without a preset.
    pub defaults: PlacementParams,
    pub orientation: OrientationConfig,
    /// Presets by id.
    pub presets: BTreeMap<String, Preset>,
}

impl Default for CatenaryConfig {
    fn default() -> Self {
        Self {
            defaults: PlacementParams::default(),
            orientation: OrientationConfig::default(),
            presets: builtin_presets().into_iter().collect(),
        }
    }
}

impl CatenaryConfig {
    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or any value is out of range.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        if config.presets.is_empty() {
            warn!("no presets configured, installing built-in presets");
            config.presets = builtin_presets().into_iter().collect();
        }
        config.validate()?;
        debug!(presets = config.presets.len(), "loaded configuration");
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or fails to parse or validate.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::from)?;
        debug!(path = %path.display(), "reading configuration");
        Self::from_toml_str(&content)
    }

    /// Serializes the configuration as pretty TOML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::from(e).into())
    }

    /// Checks defaults and presets against the accepted ranges.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending section.
    pub fn validate(&self) -> Result<()> {
        self.defaults
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("defaults: {e}")))?;

        for (id, preset) in &self.presets {
            preset
                .params
                .validate()
                .map_err(|e| ConfigError::Invalid(format!("preset {id}: {e}")))?;
            let scale = preset.render_item.scale;
            if !(scale.is_finite() && scale > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "preset {id}: scale must be positive, got {scale}"
                ))
                .into());
            }
        }
        Ok(())
    }

    /// Looks up a preset by id.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] if no preset has this id.
    pub fn preset(&self, id: &str) -> Result<&Preset> {
        self.presets
            .get(id)
            .ok_or_else(|| ConfigError::UnknownPreset(id.to_owned()).into())
    }

    /// Builds the orientation calculator for placed elements.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        Orientation::new(self.orientation.element_offset.to_rotation())
    }

    /// Builds a placement pipeline using this configuration's orientation.
    #[must_use]
    pub fn pipeline(&self) -> PlacementPipeline {
        PlacementPipeline::new(self.orientation())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::error::CatenaryError;

    #[test]
    fn empty_config_uses_defaults_and_builtins() {
        let config = CatenaryConfig::from_toml_str("").unwrap();
        assert_eq!(config, CatenaryConfig::default());
        assert!(config.preset("chain").is_ok());
        assert!(config.preset("lantern").is_ok());
        assert!(config.preset("powerline").is_ok());
    }

    #[test]
    fn parses_presets_with_missing_fields() {
        let config = CatenaryConfig::from_toml_str(
            r#"
            [defaults]
            slack = 0.5
            segments = 20
            spacing = 1.0

            [presets.bunting]
            name = "Bunting"
            material = "RED_BANNER"
            kind = "block"
            rotation = { y = 45.0 }
            spacing = 0.75
            require_permission = true
            "#,
        )
        .unwrap();

        assert_eq!(config.defaults, PlacementParams::new(0.5, 20, 1.0));
        assert_eq!(config.presets.len(), 1);

        let bunting = config.preset("bunting").unwrap();
        assert_eq!(bunting.name, "Bunting");
        assert_eq!(bunting.render_item.material, "RED_BANNER");
        assert_eq!(bunting.render_item.kind, RenderableKind::Block);
        assert_eq!(bunting.render_item.rotation, EulerDegrees::new(0.0, 45.0, 0.0));
        assert!((bunting.render_item.scale - 1.0).abs() < f64::EPSILON);
        assert_eq!(bunting.params, PlacementParams::new(0.3, 10, 0.75));
        assert_eq!(bunting.icon(), "RED_BANNER");
        assert!(bunting.require_permission);
    }

    #[test]
    fn rejects_out_of_range_preset() {
        let err = CatenaryConfig::from_toml_str(
            r"
            [presets.taut]
            segments = 500
            ",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            CatenaryError::Config(ConfigError::Invalid(ref msg)) if msg.contains("taut")
        ));
    }

    #[test]
    fn rejects_out_of_range_defaults() {
        let err = CatenaryConfig::from_toml_str("[defaults]\nspacing = 0.01\n").unwrap_err();
        assert!(matches!(err, CatenaryError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn rejects_non_positive_scale() {
        let err = CatenaryConfig::from_toml_str("[presets.flat]\nscale = 0.0\n").unwrap_err();
        assert!(matches!(err, CatenaryError::Config(ConfigError::Invalid(_))));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = CatenaryConfig::from_toml_str("[defaults\nslack = ").unwrap_err();
        assert!(matches!(err, CatenaryError::Config(ConfigError::Parse(_))));
    }

    #[test]
    fn unknown_preset() {
        let config = CatenaryConfig::default();
        let err = config.preset("rope").unwrap_err();
        assert!(matches!(
            err,
            CatenaryError::Config(ConfigError::UnknownPreset(ref id)) if id == "rope"
        ));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = CatenaryConfig::from_path(Path::new("/nonexistent/catenary.toml")).unwrap_err();
        assert!(matches!(err, CatenaryError::Config(ConfigError::Io(_))));
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = CatenaryConfig::default();
        let text = config.to_toml_string().unwrap();
        assert_eq!(CatenaryConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn orientation_offset_from_degrees() {
        let config = CatenaryConfig::default();
        let expected = Orientation::default();
        assert_abs_diff_eq!(
            *config.orientation().element_offset(),
            *expected.element_offset(),
            epsilon = 1e-12
        );
    }

    #[test]
    fn range_validators() {
        assert!(validate_slack(0.0).is_ok());
        assert!(validate_slack(1.0).is_ok());
        assert!(validate_slack(1.01).is_err());
        assert!(validate_slack(f64::NAN).is_err());
        assert!(validate_segments(2).is_ok());
        assert!(validate_segments(101).is_err());
        assert!(validate_spacing(10.0).is_ok());
        assert!(validate_spacing(0.05).is_err());
    }
}
