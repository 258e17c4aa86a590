use std::path::Path;

use dataug_io::error::IoError;
use serde::{Deserialize, Serialize};

use crate::error::AugmentError;

/// Parameters of an augmentation run.
///
/// Angles are in degrees, slides are relative to the region size and noise is
/// in pixel value units. Every field but `generate_num` defaults to zero.
///
/// # Examples
///
/// ```
/// use dataug_augment::config::AugmentationConfig;
///
/// let config: AugmentationConfig =
///     serde_json::from_str(r#"{ "generate_num": 3, "roll_sigma": 10.0 }"#).unwrap();
///
/// assert_eq!(config.generate_num, 3);
/// assert_eq!(config.roll_sigma, 10.0);
/// assert_eq!(config.seed, None);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AugmentationConfig {
    /// Number of variants generated per labeled region.
    pub generate_num: usize,
    /// Sigma of the in-plane rotation angle.
    #[serde(default)]
    pub yaw_sigma: f64,
    /// Sigma of the rotation around the vertical axis.
    #[serde(default)]
    pub pitch_sigma: f64,
    /// Sigma of the rotation around the horizontal axis.
    #[serde(default)]
    pub roll_sigma: f64,
    /// Maximum sigma of the gaussian blur, in pixels.
    #[serde(default)]
    pub blur_max_sigma: f64,
    /// Maximum sigma of the gaussian noise.
    #[serde(default)]
    pub noise_max_sigma: f64,
    /// Sigma of the horizontal slide, as a ratio of the region width.
    #[serde(default)]
    pub x_slide_sigma: f64,
    /// Sigma of the vertical slide, as a ratio of the region height.
    #[serde(default)]
    pub y_slide_sigma: f64,
    /// Sigma of the aspect ratio change.
    #[serde(default)]
    pub aspect_ratio_sigma: f64,
    /// Probability of a left-right flip. Accepted but not applied.
    #[serde(default)]
    pub horizontal_flip: f64,
    /// Probability of an up-down flip. Accepted but not applied.
    #[serde(default)]
    pub vertical_flip: f64,
    /// Seed of the random generator, drawn from the OS when missing.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl AugmentationConfig {
    /// Load and validate a configuration file.
    ///
    /// Files with a `.json` extension are read as JSON, anything else as
    /// `key=value` lines (see [`AugmentationConfig::from_key_value_str`]).
    pub fn from_file(file_path: impl AsRef<Path>) -> Result<Self, AugmentError> {
        let file_path = file_path.as_ref();
        let is_json = file_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let content = read_config(file_path)?;
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_key_value_str(&content)
        }
    }

    /// Load and validate a configuration from a JSON file.
    pub fn from_json_file(file_path: impl AsRef<Path>) -> Result<Self, AugmentError> {
        Self::from_json_str(&read_config(file_path.as_ref())?)
    }

    /// Parse and validate a configuration from a JSON string.
    pub fn from_json_str(content: &str) -> Result<Self, AugmentError> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a configuration from `key=value` lines.
    ///
    /// Blank lines and `#` comments are skipped. Values are read as JSON
    /// scalars, so the keys and types are the same as in the JSON format.
    ///
    /// # Examples
    ///
    /// ```
    /// use dataug_augment::config::AugmentationConfig;
    ///
    /// let config = AugmentationConfig::from_key_value_str(
    ///     "# 10 variants per region\ngenerate_num=10\nyaw_sigma = 2.5\n",
    /// ).unwrap();
    ///
    /// assert_eq!(config.generate_num, 10);
    /// assert_eq!(config.yaw_sigma, 2.5);
    /// ```
    pub fn from_key_value_str(content: &str) -> Result<Self, AugmentError> {
        let mut fields = serde_json::Map::new();

        for (line_number, line) in content.lines().enumerate() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(AugmentError::InvalidConfig(format!(
                    "line {}: expected key=value, got \"{line}\"",
                    line_number + 1
                )));
            };
            let key = key.trim();
            let value: serde_json::Value = serde_json::from_str(value.trim())?;

            if fields.insert(key.to_string(), value).is_some() {
                return Err(AugmentError::InvalidConfig(format!(
                    "\"{key}\" is given more than once"
                )));
            }
        }

        let config: Self = serde_json::from_value(serde_json::Value::Object(fields))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the sigmas are non-negative and the flip probabilities lie in `[0, 1]`.
    pub fn validate(&self) -> Result<(), AugmentError> {
        let sigmas = [
            ("yaw_sigma", self.yaw_sigma),
            ("pitch_sigma", self.pitch_sigma),
            ("roll_sigma", self.roll_sigma),
            ("blur_max_sigma", self.blur_max_sigma),
            ("noise_max_sigma", self.noise_max_sigma),
            ("x_slide_sigma", self.x_slide_sigma),
            ("y_slide_sigma", self.y_slide_sigma),
            ("aspect_ratio_sigma", self.aspect_ratio_sigma),
        ];
        for (name, value) in sigmas {
            if !value.is_finite() || value < 0.0 {
                return Err(AugmentError::InvalidConfig(format!(
                    "\"{name}\" must be a non-negative number, got {value}"
                )));
            }
        }

        for (name, value) in [
            ("horizontal_flip", self.horizontal_flip),
            ("vertical_flip", self.vertical_flip),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(AugmentError::InvalidConfig(format!(
                    "\"{name}\" must be between 0 and 1, got {value}"
                )));
            }
        }

        Ok(())
    }
}

fn read_config(file_path: &Path) -> Result<String, AugmentError> {
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()).into());
    }
    Ok(std::fs::read_to_string(file_path).map_err(IoError::from)?)
}
