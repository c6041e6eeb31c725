use serde::{Deserialize, Serialize};

/// Default Webflow Data API root
pub const DEFAULT_API_BASE_URL: &str = "https://api.webflow.com/v2";

/// wfdocs configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WfDocsConfig {
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// API connection settings
    #[serde(default)]
    pub api: ApiConfig,
    /// File output settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API root, without trailing slash
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Fallback for `WEBFLOW_API_TOKEN`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Fallback for `WEBFLOW_SITE_ID`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    /// Fallback for `WEBFLOW_COLLECTION_ID`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

/// File output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory saved items and extracts are written to
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    /// Filename used by `list --save`
    #[serde(default = "default_list_filename")]
    pub list_filename: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_output_dir() -> String {
    "collection_items".to_string()
}

fn default_list_filename() -> String {
    "all_items.json".to_string()
}

impl Default for WfDocsConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            api: ApiConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            token: None,
            site_id: None,
            collection_id: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            list_filename: default_list_filename(),
        }
    }
}

impl WfDocsConfig {
    /// Build a configuration from TOML layers, later layers winning.
    ///
    /// Only keys written in a layer override earlier ones, so a later file
    /// can set a value back to its default.
    pub fn from_layers<I>(layers: I) -> Result<Self, toml::de::Error>
    where
        I: IntoIterator<Item = toml::Table>,
    {
        let mut merged = toml::Table::new();
        for layer in layers {
            merge_tables(&mut merged, layer);
        }
        toml::Value::Table(merged).try_into()
    }
}

fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
                continue;
            }
            base.insert(key, toml::Value::Table(incoming));
        } else {
            base.insert(key, value);
        }
    }
}
