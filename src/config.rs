//! Loading alignment parameters from files and overlaying CLI overrides.

use std::path::Path;

use thiserror::Error;

use crate::models::{AlignmentParams, BoundaryMode, SplitterKind};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid parameters: {0}")]
    Invalid(String),
}

/// Read parameters from a TOML file, or JSON when the extension is `.json`.
///
/// Fields missing from the file keep their defaults.
pub fn load_params(path: &Path) -> Result<AlignmentParams, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let params = if is_json {
        parse_params_json(&content)?
    } else {
        parse_params_toml(&content)?
    };

    log::debug!("Loaded parameters from {}: {:?}", path.display(), params);
    Ok(params)
}

pub fn parse_params_toml(content: &str) -> Result<AlignmentParams, ConfigError> {
    let params: AlignmentParams = toml::from_str(content)?;
    params.validate().map_err(ConfigError::Invalid)?;
    Ok(params)
}

pub fn parse_params_json(content: &str) -> Result<AlignmentParams, ConfigError> {
    let params: AlignmentParams = serde_json::from_str(content)?;
    params.validate().map_err(ConfigError::Invalid)?;
    Ok(params)
}

/// Per-field overrides, `None` meaning "keep the base value".
#[derive(Debug, Clone, Default)]
pub struct ParamOverrides {
    pub fuzzy_threshold: Option<f64>,
    pub max_expansion: Option<usize>,
    pub max_contraction: Option<f64>,
    pub boundary_mode: Option<BoundaryMode>,
    pub splitter: Option<SplitterKind>,
}

impl ParamOverrides {
    /// Overlay these overrides onto `base`.
    pub fn apply(&self, base: AlignmentParams) -> AlignmentParams {
        AlignmentParams {
            fuzzy_threshold: self.fuzzy_threshold.unwrap_or(base.fuzzy_threshold),
            max_expansion: self.max_expansion.unwrap_or(base.max_expansion),
            max_contraction: self.max_contraction.unwrap_or(base.max_contraction),
            boundary_mode: self.boundary_mode.unwrap_or(base.boundary_mode),
            splitter: self.splitter.unwrap_or(base.splitter),
        }
    }
}

/// Parameters from an optional file (defaults otherwise) with overrides applied.
pub fn resolve_params(
    config_path: Option<&Path>,
    overrides: &ParamOverrides,
) -> Result<AlignmentParams, ConfigError> {
    let base = match config_path {
        Some(path) => load_params(path)?,
        None => AlignmentParams::default(),
    };

    let params = overrides.apply(base);
    params.validate().map_err(ConfigError::Invalid)?;
    Ok(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_toml_partial() {
        let params = parse_params_toml("fuzzy_threshold = 0.55\nboundary_mode = \"word\"\n").unwrap();
        assert_eq!(params.fuzzy_threshold, 0.55);
        assert_eq!(params.boundary_mode, BoundaryMode::Word);
        assert_eq!(params.max_expansion, 200);
        assert_eq!(params.splitter, SplitterKind::Auto);
    }

    #[test]
    fn test_parse_toml_rejects_invalid_range() {
        let err = parse_params_toml("max_contraction = 1.5\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_parse_json() {
        let params = parse_params_json(r#"{"max_expansion": 160, "splitter": "punctuation"}"#).unwrap();
        assert_eq!(params.max_expansion, 160);
        assert_eq!(params.splitter, SplitterKind::Punctuation);
    }

    #[test]
    fn test_load_params_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let toml_path = dir.path().join("params.toml");
        let mut file = std::fs::File::create(&toml_path).unwrap();
        writeln!(file, "max_contraction = 0.45").unwrap();
        assert_eq!(load_params(&toml_path).unwrap().max_contraction, 0.45);

        let json_path = dir.path().join("params.json");
        std::fs::write(&json_path, r#"{"fuzzy_threshold": 0.7}"#).unwrap();
        assert_eq!(load_params(&json_path).unwrap().fuzzy_threshold, 0.7);
    }

    #[test]
    fn test_load_params_missing_file() {
        let err = load_params(Path::new("/nonexistent/params.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_overrides_apply() {
        let overrides = ParamOverrides {
            fuzzy_threshold: Some(0.55),
            boundary_mode: Some(BoundaryMode::Word),
            ..Default::default()
        };
        let params = overrides.apply(AlignmentParams::default());
        assert_eq!(params.fuzzy_threshold, 0.55);
        assert_eq!(params.boundary_mode, BoundaryMode::Word);
        assert_eq!(params.max_expansion, 200);
    }

    #[test]
    fn test_resolve_params_validates_overrides() {
        let overrides = ParamOverrides {
            fuzzy_threshold: Some(2.0),
            ..Default::default()
        };
        assert!(resolve_params(None, &overrides).is_err());
        assert_eq!(
            resolve_params(None, &ParamOverrides::default()).unwrap(),
            AlignmentParams::default()
        );
    }
}
