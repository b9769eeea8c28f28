use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_MAX_FILE_SIZE_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_MAX_JSON_BYTES: usize = 32 * 1024 * 1024;

const DEFAULT_CONFIG: &str = r#"
[cors]
allowed_origins = ["http://localhost:3000"]

[server]
host = "127.0.0.1"
port = 8080

[upload]
# Largest accepted ledger file
max_file_size_bytes = 10485760
# Largest accepted calculate request body
max_json_bytes = 33554432
# WHATWG encoding label of the uploaded ledger
encoding = "Shift_JIS"
"#;

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ApiConfig {
    pub cors: Option<CorsConfig>,
    pub server: Option<ServerConfig>,
    pub upload: Option<UploadConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct UploadConfig {
    pub max_file_size_bytes: usize,
    pub max_json_bytes: usize,
    pub encoding: String,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size_bytes: DEFAULT_MAX_FILE_SIZE_BYTES,
            max_json_bytes: DEFAULT_MAX_JSON_BYTES,
            encoding: "Shift_JIS".to_string(),
        }
    }
}

impl ApiConfig {
    /// Loads the config file, writing a default one to the standard
    /// location on first start. `WARIKAN__SECTION__KEY` variables override
    /// file values.
    pub fn load(path_override: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = match path_override {
            Some(path) => path.to_path_buf(),
            None => {
                let path = get_config_path();
                write_default_config(&path)?;
                path
            }
        };

        let config = Self::from_sources(&config_path)?;
        Ok((config, config_path))
    }

    fn from_sources(config_path: &Path) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()))
            .add_source(
                Environment::with_prefix("WARIKAN")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors.allowed_origins"),
            )
            .build()?;

        builder.try_deserialize()
    }

    pub fn server(&self) -> ServerConfig {
        self.server.clone().unwrap_or_default()
    }

    pub fn cors(&self) -> CorsConfig {
        self.cors.clone().unwrap_or_default()
    }

    pub fn upload(&self) -> UploadConfig {
        self.upload.clone().unwrap_or_default()
    }
}

fn write_default_config(config_path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::Message(format!("Failed to create config directory: {e}"))
        })?;
    }

    if !config_path.exists() {
        std::fs::write(config_path, DEFAULT_CONFIG).map_err(|e| {
            ConfigError::Message(format!("Failed to write default config: {e}"))
        })?;
    }

    Ok(())
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("warikan").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
