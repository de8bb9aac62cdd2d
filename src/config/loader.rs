//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::RouterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading and registry construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("remote health strategy configured but no remote health provider supplied")]
    MissingRemoteProvider,
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Document format, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` selects TOML; everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Parse and validate a configuration document from a string.
pub fn parse_config(content: &str, format: ConfigFormat) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a JSON or TOML file.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content, ConfigFormat::from_path(path))?;

    tracing::info!(
        path = %path.display(),
        endpoints = config.endpoints.len(),
        "Configuration loaded"
    );
    Ok(config)
}

/// Write configuration back as pretty-printed JSON.
///
/// Used after provisioning health checks so the new identifiers persist.
pub fn save_config(path: &Path, config: &RouterConfig) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(path, content)?;
    tracing::info!(path = %path.display(), "Configuration saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const JSON: &str = r#"{
        "endpoints": [
            {"cluster_id": "east", "region": "us-east-1", "hostname": "east.dsql.us-east-1.on.aws", "priority": 1},
            {"cluster_id": "west", "region": "us-west-2", "hostname": "west.dsql.us-west-2.on.aws", "port": 5433}
        ],
        "connection_settings": {"connect_timeout": 3, "keepalives": 1}
    }"#;

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(JSON.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.endpoints.len(), 2);
        assert_eq!(config.endpoints[0].priority, Some(1));
        assert_eq!(config.endpoints[1].port, 5433);
        assert_eq!(config.connection_settings.connect_timeout, 3);
        assert!(config.connection_settings.keepalives);
    }

    #[test]
    fn test_load_toml_file() {
        let toml = r#"
            [[endpoints]]
            cluster_id = "east"
            region = "us-east-1"
            hostname = "east.example"

            [health]
            strategy = "remote"
            ttl_secs = 0
        "#;
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.endpoints[0].cluster_id, "east");
        assert_eq!(config.health.ttl_secs, 0);
    }

    #[test]
    fn test_validation_failure_is_reported() {
        let err = parse_config(r#"{"endpoints": []}"#, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("no endpoints configured"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/dsql_config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_save_round_trips_health_check_ids() {
        let mut config = parse_config(JSON, ConfigFormat::Json).unwrap();
        config.endpoints[0].health_check_id = Some("hc-123".into());

        let file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        save_config(file.path(), &config).unwrap();

        let reloaded = load_config(file.path()).unwrap();
        assert_eq!(reloaded.endpoints[0].health_check_id.as_deref(), Some("hc-123"));
        assert_eq!(reloaded.endpoints[1].health_check_id, None);
    }
}
