use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub cors: Option<CorsConfig>,
    #[serde(default)]
    pub import: ImportConfig,
    pub admin: Option<AdminConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ImportConfig {
    /// Workbook imported at startup. Nothing is seeded when unset.
    pub seed_file: Option<PathBuf>,
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    #[serde(default = "default_keep_uploads")]
    pub keep_uploads: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            seed_file: None,
            upload_dir: default_upload_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            keep_uploads: default_keep_uploads(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AdminConfig {
    pub username: String,
    /// Argon2 PHC string, see `checklist-api hash-password`
    pub password_hash: String,
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    pub directory: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            database: DatabaseConfig {
                path: get_default_db_path(),
            },
            cors: Some(CorsConfig {
                allowed_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://127.0.0.1:3000".to_string(),
                ],
            }),
            import: ImportConfig::default(),
            admin: None,
            logging: None,
        }
    }
}

impl ApiConfig {
    /// Load the TOML config, writing a default file first when none exists.
    /// `CHECKLIST__SECTION__KEY` environment variables override file values.
    pub fn load(path_override: Option<PathBuf>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = path_override.unwrap_or_else(get_config_path);

        if let Some(parent) = config_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    ConfigError::Message(format!("Failed to create config directory: {e}"))
                })?;
            }
        }

        if !config_path.exists() {
            let default_config = format!(
                r#"
[server]
host = "127.0.0.1"
port = 5000

[database]
path = "{}"

[cors]
allowed_origins = ["http://localhost:3000", "http://127.0.0.1:3000"]

[import]
# seed_file = "~/checklist/SE_Success_Criteria_Checklist_Eng_Bahasa.xlsx"
upload_dir = "{}"
max_upload_bytes = {}
keep_uploads = {}

# [admin]
# username = "admin"
# password_hash = "$argon2id$..."   # checklist-api hash-password <password>
# jwt_secret = "change-me"
# token_ttl_hours = 24

# [logging]
# directory = "~/.local/share/checklist/logs"
"#,
                get_default_db_path().display(),
                default_upload_dir().display(),
                default_max_upload_bytes(),
                default_keep_uploads(),
            );
            std::fs::write(&config_path, default_config).map_err(|e| {
                ConfigError::Message(format!("Failed to write default config: {e}"))
            })?;
        }

        let builder = Config::builder()
            .add_source(File::from(config_path.clone()))
            .add_source(
                Environment::with_prefix("CHECKLIST")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: ApiConfig = builder.try_deserialize()?;

        config.database.path = expand_tilde(&config.database.path);
        config.import.upload_dir = expand_tilde(&config.import.upload_dir);
        config.import.seed_file = config.import.seed_file.as_deref().map(expand_tilde);
        if let Some(logging) = config.logging.as_mut() {
            logging.directory = logging.directory.as_deref().map(expand_tilde);
        }

        Ok((config, config_path))
    }
}

fn expand_tilde(path: &Path) -> PathBuf {
    if path.starts_with("~") {
        if let Some(home) = home::home_dir() {
            let path_str = path.to_string_lossy();
            let expanded = path_str.replacen('~', &home.to_string_lossy(), 1);
            return PathBuf::from(expanded);
        }
    }
    path.to_path_buf()
}

fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("checklist/api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}

fn get_default_db_path() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("checklist/checklist.db")
    } else {
        PathBuf::from("checklist.db")
    }
}

fn default_upload_dir() -> PathBuf {
    if let Some(data_dir) = dirs::data_local_dir() {
        data_dir.join("checklist/uploads")
    } else {
        PathBuf::from("uploads")
    }
}

fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}

fn default_keep_uploads() -> usize {
    3
}

fn default_token_ttl_hours() -> i64 {
    24
}
