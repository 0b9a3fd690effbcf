use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::regression::TrainParams;

/// Environment variable naming an optional JSON config file.
pub const CONFIG_ENV: &str = "RUSTY_LAB_CONFIG";

// ---------------------------------------------------------------------------
// LabConfig – tunables shared by every tab
// ---------------------------------------------------------------------------

/// Runtime tunables. Every field has a default, so a config file only needs
/// to name what it overrides:
///
/// ```json
/// { "histogram_bins": 50, "preview_rows": 20 }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LabConfig {
    /// Default bin count for 2D histograms.
    pub histogram_bins: usize,
    /// Fraction of complete rows held out for evaluation.
    pub test_fraction: f64,
    /// Seed of the train/holdout shuffle.
    pub split_seed: u64,
    /// Ridge L2 penalty.
    pub ridge_alpha: f64,
    /// Rows shown in the table preview.
    pub preview_rows: usize,
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            histogram_bins: 30,
            test_fraction: 0.2,
            split_seed: 42,
            ridge_alpha: 1.0,
            preview_rows: 10,
        }
    }
}

impl LabConfig {
    /// Load from the file named by `RUSTY_LAB_CONFIG`, or fall back to defaults.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_path(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: LabConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config file {}", path.display()))?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values that would make a view or a training run meaningless.
    pub fn validate(&self) -> Result<()> {
        if self.histogram_bins == 0 {
            bail!("histogram_bins must be at least 1");
        }
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            bail!(
                "test_fraction must lie strictly between 0 and 1, got {}",
                self.test_fraction
            );
        }
        if !self.ridge_alpha.is_finite() || self.ridge_alpha < 0.0 {
            bail!(
                "ridge_alpha must be finite and non-negative, got {}",
                self.ridge_alpha
            );
        }
        Ok(())
    }

    /// Training parameters derived from this config.
    pub fn train_params(&self) -> TrainParams {
        TrainParams {
            test_fraction: self.test_fraction,
            seed: self.split_seed,
            alpha: self.ridge_alpha,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_match_training_contract() {
        let params = LabConfig::default().train_params();
        assert_eq!(params, TrainParams::default());
        assert_eq!(LabConfig::default().histogram_bins, 30);
    }

    #[test]
    fn partial_file_overrides_only_named_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "histogram_bins": 12 }}"#).unwrap();

        let config = LabConfig::from_path(file.path()).unwrap();
        assert_eq!(config.histogram_bins, 12);
        assert_eq!(config.split_seed, 42);
        assert_eq!(config.preview_rows, 10);
    }

    fn load_json(json: &str) -> Result<LabConfig> {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        LabConfig::from_path(file.path())
    }

    fn assert_invalid(json: &str, field: &str) {
        let err = load_json(json).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("invalid config file"), "{msg}");
        assert!(msg.contains(field), "{msg}");
    }

    #[test]
    fn negative_or_non_finite_alpha_is_rejected() {
        assert_invalid(r#"{ "ridge_alpha": -0.5 }"#, "ridge_alpha");
        let err = LabConfig {
            ridge_alpha: f64::INFINITY,
            ..LabConfig::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("ridge_alpha"));
        assert!(load_json(r#"{ "ridge_alpha": 0.0 }"#).is_ok());
    }

    #[test]
    fn test_fraction_outside_unit_interval_is_rejected() {
        assert_invalid(r#"{ "test_fraction": 0.0 }"#, "test_fraction");
        assert_invalid(r#"{ "test_fraction": 1.0 }"#, "test_fraction");
        assert_invalid(r#"{ "test_fraction": 1.5 }"#, "test_fraction");
        let err = LabConfig {
            test_fraction: f64::NAN,
            ..LabConfig::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("test_fraction"));
    }

    #[test]
    fn zero_histogram_bins_is_rejected() {
        assert_invalid(r#"{ "histogram_bins": 0 }"#, "histogram_bins");
    }

    #[test]
    fn defaults_are_valid() {
        LabConfig::default().validate().unwrap();
    }

    #[test]
    fn unknown_field_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "bins": 12 }}"#).unwrap();

        let err = LabConfig::from_path(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("parsing config file"));
    }
}
