use crate::error::AppError;
use serde::Deserialize;
use std::env;

/// The original form UI capped uploads at 16 MB; invoice requests are far
/// smaller, but the same ceiling is kept for the JSON body.
const DEFAULT_MAX_BODY_BYTES: &str = "16777216";

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub port: u16,
    pub max_body_bytes: usize,
}

impl ServiceConfig {
    pub fn load() -> Result<Self, AppError> {
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        Ok(ServiceConfig {
            port: get_env("PORT", Some("8080"), is_prod)?
                .parse()
                .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Invalid PORT: {}", e)))?,
            max_body_bytes: get_env("MAX_BODY_BYTES", Some(DEFAULT_MAX_BODY_BYTES), is_prod)?
                .parse()
                .map_err(|e| {
                    AppError::ConfigError(anyhow::anyhow!("Invalid MAX_BODY_BYTES: {}", e))
                })?,
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}
