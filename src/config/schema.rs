//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the registry service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RegistryConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Where route records are persisted.
    pub storage: StorageConfig,

    /// Multipart upload handling.
    pub uploads: UploadConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Logging and metrics.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Route record storage.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one JSON file per route record.
    pub routes_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            routes_dir: PathBuf::from("routes"),
        }
    }
}

/// Upload handling for multipart route creation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory for temporary upload files (OS temp dir when unset).
    pub temp_dir: Option<PathBuf>,

    /// Maximum accepted multipart body size in bytes.
    pub max_upload_bytes: usize,
}

impl UploadConfig {
    pub fn resolved_temp_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            temp_dir: None,
            max_upload_bytes: 5 * 1024 * 1024, // 5MB
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,

    /// Maximum JSON body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_body_bytes: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter, used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Emit JSON log lines instead of human-readable output.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "route_registry=info,tower_http=info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: RegistryConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:3000");
        assert_eq!(config.storage.routes_dir, PathBuf::from("routes"));
        assert_eq!(config.limits.request_timeout_secs, 30);
        assert!(!config.observability.metrics_enabled);
        assert!(config.uploads.temp_dir.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config: RegistryConfig = toml::from_str(
            r#"
            [storage]
            routes_dir = "/var/lib/registry"

            [uploads]
            temp_dir = "/tmp/uploads"

            [observability]
            json_logs = true
            "#,
        )
        .unwrap();
        assert_eq!(config.storage.routes_dir, PathBuf::from("/var/lib/registry"));
        assert_eq!(config.uploads.resolved_temp_dir(), PathBuf::from("/tmp/uploads"));
        assert_eq!(config.uploads.max_upload_bytes, 5 * 1024 * 1024);
        assert!(config.observability.json_logs);
        assert_eq!(config.observability.log_filter, "route_registry=info,tower_http=info");
    }
}
