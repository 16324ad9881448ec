//! Server configuration.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use motor_core::vehicle::ProductCategoryTableMap;
use motor_core::{Error, Result};

/// Product category code → motor tables/categories holding its parts.
pub type PartsCategoryMapping = BTreeMap<String, Vec<ProductCategoryTableMap>>;

/// Configuration for the motor API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server port.
    pub http_port: u16,

    /// Enable debug mode.
    ///
    /// When enabled the server may start without fixtures and accepts a
    /// wildcard CORS origin.
    pub debug: bool,

    /// CORS configuration.
    #[serde(default)]
    pub cors: CorsConfig,

    /// Product category mapping used by the parts route.
    #[serde(default)]
    pub parts_category_mapping: PartsCategoryMapping,

    /// JSON fixtures loaded into the in-memory collaborator.
    #[serde(default)]
    pub fixtures_path: Option<String>,
}

/// CORS configuration for browser-based access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Allowed origins. Use `["*"]` to allow all origins (development only).
    /// Empty list disables CORS entirely.
    pub allowed_origins: Vec<String>,

    /// Max age for preflight cache (seconds).
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 3600,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            http_port: 8080,
            debug: false,
            cors: CorsConfig::default(),
            parts_category_mapping: PartsCategoryMapping::new(),
            fixtures_path: None,
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// Supported env vars:
    /// - `MOTOR_HTTP_PORT`
    /// - `MOTOR_DEBUG`
    /// - `MOTOR_CORS_ALLOWED_ORIGINS` (comma-separated, or `*`)
    /// - `MOTOR_CORS_MAX_AGE_SECONDS`
    /// - `MOTOR_PARTS_CATEGORY_MAPPING` (inline JSON object)
    /// - `MOTOR_PARTS_CATEGORY_MAPPING_PATH` (JSON file)
    /// - `MOTOR_FIXTURES_PATH`
    ///
    /// # Errors
    ///
    /// Returns an error if any environment variable is present but cannot be
    /// parsed, or if both parts mapping sources are set.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Some(port) = env_u16("MOTOR_HTTP_PORT")? {
            config.http_port = port;
        }
        if let Some(debug) = env_bool("MOTOR_DEBUG")? {
            config.debug = debug;
        }
        if let Some(origins) = env_string("MOTOR_CORS_ALLOWED_ORIGINS") {
            config.cors.allowed_origins = parse_cors_allowed_origins(&origins);
        }
        if let Some(max_age) = env_u64("MOTOR_CORS_MAX_AGE_SECONDS")? {
            config.cors.max_age_seconds = max_age;
        }

        let inline = env_string("MOTOR_PARTS_CATEGORY_MAPPING");
        let path = env_string("MOTOR_PARTS_CATEGORY_MAPPING_PATH");
        match (inline, path) {
            (Some(_), Some(_)) => {
                return Err(Error::InvalidInput(
                    "MOTOR_PARTS_CATEGORY_MAPPING and MOTOR_PARTS_CATEGORY_MAPPING_PATH are mutually exclusive"
                        .to_string(),
                ));
            }
            (Some(raw), None) => {
                config.parts_category_mapping =
                    parse_parts_category_mapping("MOTOR_PARTS_CATEGORY_MAPPING", &raw)?;
            }
            (None, Some(path)) => {
                let raw = std::fs::read_to_string(&path).map_err(|e| {
                    Error::InvalidInput(format!(
                        "MOTOR_PARTS_CATEGORY_MAPPING_PATH could not be read ({path}): {e}"
                    ))
                })?;
                config.parts_category_mapping =
                    parse_parts_category_mapping("MOTOR_PARTS_CATEGORY_MAPPING_PATH", &raw)?;
            }
            (None, None) => {}
        }

        config.fixtures_path = env_string("MOTOR_FIXTURES_PATH");

        Ok(config)
    }
}

fn env_string(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn env_u16(name: &str) -> Result<Option<u16>> {
    let Some(v) = env_string(name) else {
        return Ok(None);
    };
    v.parse::<u16>()
        .map(Some)
        .map_err(|e| Error::InvalidInput(format!("{name} must be a u16: {e}")))
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    let Some(v) = env_string(name) else {
        return Ok(None);
    };
    v.parse::<u64>()
        .map(Some)
        .map_err(|e| Error::InvalidInput(format!("{name} must be a u64: {e}")))
}

fn parse_bool(name: &str, value: &str) -> Result<bool> {
    let value = value.trim().to_ascii_lowercase();
    match value.as_str() {
        "true" | "1" | "yes" | "y" => Ok(true),
        "false" | "0" | "no" | "n" => Ok(false),
        _ => Err(Error::InvalidInput(format!(
            "{name} must be a boolean (true/false/1/0)"
        ))),
    }
}

fn env_bool(name: &str) -> Result<Option<bool>> {
    let Some(v) = env_string(name) else {
        return Ok(None);
    };
    parse_bool(name, &v).map(Some)
}

fn parse_cors_allowed_origins(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }
    if trimmed == "*" {
        return vec!["*".to_string()];
    }

    trimmed
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_parts_category_mapping(name: &str, raw: &str) -> Result<PartsCategoryMapping> {
    serde_json::from_str(raw).map_err(|e| {
        Error::InvalidInput(format!(
            "{name} must be a JSON object of category -> [{{table, motorCategory}}]: {e}"
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.http_port, 8080);
        assert!(!config.debug);
        assert!(config.cors.allowed_origins.is_empty());
        assert_eq!(config.cors.max_age_seconds, 3600);
        assert!(config.parts_category_mapping.is_empty());
    }

    #[test]
    fn parse_bool_accepts_true_values() {
        assert!(parse_bool("TEST", "true").unwrap());
        assert!(parse_bool("TEST", "1").unwrap());
        assert!(parse_bool("TEST", "yes").unwrap());
        assert!(parse_bool("TEST", "TRUE").unwrap());
    }

    #[test]
    fn parse_bool_accepts_false_values() {
        assert!(!parse_bool("TEST", "false").unwrap());
        assert!(!parse_bool("TEST", "0").unwrap());
        assert!(!parse_bool("TEST", "no").unwrap());
    }

    #[test]
    fn parse_bool_rejects_invalid_values() {
        let err = parse_bool("MOTOR_DEBUG", "maybe").unwrap_err();
        assert!(err.to_string().contains("MOTOR_DEBUG"));
        assert!(parse_bool("TEST", "").is_err());
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        assert_eq!(
            parse_cors_allowed_origins(" https://a.example , ,https://b.example"),
            vec!["https://a.example", "https://b.example"]
        );
        assert_eq!(parse_cors_allowed_origins("*"), vec!["*"]);
        assert!(parse_cors_allowed_origins("  ").is_empty());
    }

    #[test]
    fn parts_mapping_parses_camel_case_table_maps() -> Result<()> {
        let mapping = parse_parts_category_mapping(
            "TEST",
            r#"{"OIL_FILTER": [{"table": "Filters", "motorCategory": "Oil Filter"}]}"#,
        )?;
        assert_eq!(
            mapping.get("OIL_FILTER"),
            Some(&vec![ProductCategoryTableMap {
                table: "Filters".into(),
                motor_category: "Oil Filter".into(),
            }])
        );
        Ok(())
    }

    #[test]
    fn parts_mapping_rejects_malformed_json() {
        let err = parse_parts_category_mapping("MOTOR_PARTS_CATEGORY_MAPPING", "[1, 2]")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(err.to_string().contains("MOTOR_PARTS_CATEGORY_MAPPING"));
    }
}
