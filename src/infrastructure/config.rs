use crate::domain::{
    config::{ApiConfig, WfDocsConfig},
    error::{WfDocsError, WfDocsResult},
};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_API_TOKEN: &str = "WEBFLOW_API_TOKEN";
pub const ENV_SITE_ID: &str = "WEBFLOW_SITE_ID";
pub const ENV_COLLECTION_ID: &str = "WEBFLOW_COLLECTION_ID";
pub const ENV_API_BASE_URL: &str = "WEBFLOW_API_BASE_URL";

const PROJECT_DIR: &str = ".wfdocs";
const CONFIG_FILE: &str = "config.toml";

/// Configuration manager
pub struct ConfigManager {
    global_config_path: PathBuf,
    project_config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Create new configuration manager
    pub fn new() -> WfDocsResult<Self> {
        let global_config_path = Self::get_global_config_path()?;
        let project_config_path = Self::find_project_config_path();

        Ok(Self {
            global_config_path,
            project_config_path,
        })
    }

    /// Create a manager over explicit paths
    pub fn with_paths(global_config_path: PathBuf, project_config_path: Option<PathBuf>) -> Self {
        Self {
            global_config_path,
            project_config_path,
        }
    }

    /// Load configuration: defaults, then global file, then project file
    pub fn load_config(&self) -> WfDocsResult<WfDocsConfig> {
        let mut layers = Vec::new();

        if self.global_config_path.exists() {
            layers.push(self.read_layer(&self.global_config_path)?);
        }

        if let Some(project_path) = &self.project_config_path {
            if project_path.exists() {
                layers.push(self.read_layer(project_path)?);
            }
        }

        WfDocsConfig::from_layers(layers).map_err(|e| WfDocsError::Config {
            message: format!("Failed to combine configuration files: {}", e),
        })
    }

    /// Read one file as a raw table after checking it is a valid configuration
    fn read_layer(&self, path: &Path) -> WfDocsResult<toml::Table> {
        self.load_config_from_path(path)?;
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| WfDocsError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Get global configuration path
    fn get_global_config_path() -> WfDocsResult<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| WfDocsError::Config {
            message: "Could not determine home directory".to_string(),
        })?;

        Ok(home.join(".config").join("wfdocs").join(CONFIG_FILE))
    }

    /// Find project configuration path by walking up directory tree
    fn find_project_config_path() -> Option<PathBuf> {
        let current_dir = std::env::current_dir().ok()?;
        let mut path = current_dir.as_path();

        loop {
            let config_path = path.join(PROJECT_DIR).join(CONFIG_FILE);
            if config_path.exists() {
                return Some(config_path);
            }

            path = path.parent()?;
        }
    }

    /// Load configuration from specific path
    pub fn load_config_from_path(&self, path: &Path) -> WfDocsResult<WfDocsConfig> {
        let content = fs::read_to_string(path).map_err(|e| WfDocsError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        toml::from_str(&content).map_err(|e| WfDocsError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })
    }

    /// Save configuration to specific path, creating parent directories
    pub fn save_config_to_path(&self, path: &Path, config: &WfDocsConfig) -> WfDocsResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| WfDocsError::Config {
                message: format!("Failed to create config directory: {}", e),
            })?;
        }

        let content = toml::to_string_pretty(config).map_err(|e| WfDocsError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        fs::write(path, content).map_err(|e| WfDocsError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })
    }

    /// Create default project configuration under `path/.wfdocs`
    pub fn init_project_config(&self, path: &Path) -> WfDocsResult<PathBuf> {
        let config_file = path.join(PROJECT_DIR).join(CONFIG_FILE);

        if config_file.exists() {
            return Err(WfDocsError::Config {
                message: "Project configuration already exists".to_string(),
            });
        }

        self.save_config_to_path(&config_file, &WfDocsConfig::default())?;
        Ok(config_file)
    }

    pub fn get_project_config_path(&self) -> Option<&PathBuf> {
        self.project_config_path.as_ref()
    }

    pub fn get_global_config_path_ref(&self) -> &PathBuf {
        &self.global_config_path
    }
}

/// Load a `.env` file from the working directory or one of its parents.
///
/// Variables already present in the process environment keep their values.
pub fn load_dotenv() -> WfDocsResult<Option<PathBuf>> {
    match dotenvy::dotenv() {
        Ok(path) => Ok(Some(path)),
        Err(e) if e.not_found() => Ok(None),
        Err(e) => Err(WfDocsError::Config {
            message: format!("Failed to load .env file: {}", e),
        }),
    }
}

/// Apply environment overrides that are not credentials
pub fn apply_env_overrides<F>(config: &mut WfDocsConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = non_empty(lookup(ENV_API_BASE_URL)) {
        config.api.base_url = base_url;
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// API credentials required for every request
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub token: String,
    pub site_id: String,
    pub collection_id: String,
}

impl Credentials {
    /// Resolve credentials from the environment, falling back to the config file.
    ///
    /// Every missing variable is reported at once.
    pub fn resolve<F>(api: &ApiConfig, lookup: F) -> WfDocsResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let token = non_empty(lookup(ENV_API_TOKEN)).or_else(|| non_empty(api.token.clone()));
        let site_id = non_empty(lookup(ENV_SITE_ID)).or_else(|| non_empty(api.site_id.clone()));
        let collection_id = non_empty(lookup(ENV_COLLECTION_ID))
            .or_else(|| non_empty(api.collection_id.clone()));

        match (token, site_id, collection_id) {
            (Some(token), Some(site_id), Some(collection_id)) => Ok(Self {
                token,
                site_id,
                collection_id,
            }),
            (token, site_id, collection_id) => {
                let mut missing = Vec::new();
                if token.is_none() {
                    missing.push(ENV_API_TOKEN);
                }
                if site_id.is_none() {
                    missing.push(ENV_SITE_ID);
                }
                if collection_id.is_none() {
                    missing.push(ENV_COLLECTION_ID);
                }
                Err(WfDocsError::MissingCredentials { missing })
            }
        }
    }

    /// Resolve from the process environment
    pub fn from_env(api: &ApiConfig) -> WfDocsResult<Self> {
        Self::resolve(api, |key| std::env::var(key).ok())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("token", &"<redacted>")
            .field("site_id", &self.site_id)
            .field("collection_id", &self.collection_id)
            .finish()
    }
}
