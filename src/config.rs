use serde::Deserialize;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    /// Used to build download URLs when a request carries no Host header
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub fme_server: FmeServerConfig,
    #[serde(default)]
    pub qgis: QgisConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            base_url: default_base_url(),
            fme_server: FmeServerConfig::default(),
            qgis: QgisConfig::default(),
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("base_url", &self.base_url)
            .field("fme_server", &self.fme_server)
            .field("qgis", &self.qgis)
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8888".to_string()
}

#[derive(Clone, Deserialize)]
pub struct FmeServerConfig {
    #[serde(default = "default_fme_port")]
    pub port: u16,
    #[serde(default = "default_fme_username")]
    pub username: String,
    #[serde(default = "default_fme_password")]
    pub password: String,
    /// API tokens are accepted when they start with this prefix
    #[serde(default = "default_token_prefix")]
    pub token_prefix: String,
}

impl Default for FmeServerConfig {
    fn default() -> Self {
        Self {
            port: default_fme_port(),
            username: default_fme_username(),
            password: default_fme_password(),
            token_prefix: default_token_prefix(),
        }
    }
}

// Custom Debug implementation to redact the password
impl fmt::Debug for FmeServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FmeServerConfig")
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("token_prefix", &self.token_prefix)
            .finish()
    }
}

fn default_fme_port() -> u16 {
    8888
}

fn default_fme_username() -> String {
    "testuser".to_string()
}

fn default_fme_password() -> String {
    "testpass".to_string()
}

fn default_token_prefix() -> String {
    "valid_".to_string()
}

#[derive(Clone, Deserialize)]
pub struct QgisConfig {
    #[serde(default = "default_qgis_port")]
    pub port: u16,
    #[serde(default = "default_qgis_username")]
    pub username: String,
    #[serde(default = "default_qgis_password")]
    pub password: String,
    #[serde(default = "default_template_name")]
    pub template_name: String,
    #[serde(default = "default_coverage_layer")]
    pub coverage_layer: String,
}

impl Default for QgisConfig {
    fn default() -> Self {
        Self {
            port: default_qgis_port(),
            username: default_qgis_username(),
            password: default_qgis_password(),
            template_name: default_template_name(),
            coverage_layer: default_coverage_layer(),
        }
    }
}

// Custom Debug implementation to redact the password
impl fmt::Debug for QgisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QgisConfig")
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("template_name", &self.template_name)
            .field("coverage_layer", &self.coverage_layer)
            .finish()
    }
}

fn default_qgis_port() -> u16 {
    8889
}

fn default_qgis_username() -> String {
    "qgisuser".to_string()
}

fn default_qgis_password() -> String {
    "qgispass".to_string()
}

fn default_template_name() -> String {
    "Atlas".to_string()
}

fn default_coverage_layer() -> String {
    "parcels".to_string()
}

impl Config {
    pub fn load() -> Result<Arc<Self>, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(
                config::Environment::with_prefix("GEODOUBLES")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Config = config.try_deserialize()?;
        Ok(Arc::new(settings))
    }
}
