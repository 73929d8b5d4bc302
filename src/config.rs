use eyre::{Context, Result};
use rota::gateway::{HttpGatewayConfig, StaticOrigin};
use rota::regen::ProgressConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: BackendConfig,
    pub static_origin: StaticOriginConfig,
    pub regeneration: RegenerationConfig,
    pub proxy: ProxyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Send regeneration requests here instead of `{base_url}/api/generate`
    pub generate_url: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            timeout_ms: 300000,
            generate_url: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticOriginConfig {
    pub base_url: String,
    /// Local directory with the static files; wins over `base_url`
    pub dir: Option<PathBuf>,
}

impl Default for StaticOriginConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            dir: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegenerationConfig {
    pub progress_tick_ms: u64,
    pub progress_step: u8,
    pub progress_cap: u8,
}

impl Default for RegenerationConfig {
    fn default() -> Self {
        Self {
            progress_tick_ms: 500,
            progress_step: 10,
            progress_cap: 90,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
    pub bind: String,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try primary location: ~/.config/<project>/<project>.yml
        let project_name = env!("CARGO_PKG_NAME");
        if let Some(config_dir) = dirs::config_dir() {
            let primary_config = config_dir.join(project_name).join(format!("{}.yml", project_name));
            if primary_config.exists() {
                match Self::load_from_file(&primary_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", primary_config.display(), e);
                    }
                }
            }
        }

        // Try fallback location: ./<project>.yml
        let fallback_config = PathBuf::from(format!("{}.yml", project_name));
        if fallback_config.exists() {
            match Self::load_from_file(&fallback_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", fallback_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn gateway_config(&self) -> HttpGatewayConfig {
        let static_origin = match &self.static_origin.dir {
            Some(dir) => StaticOrigin::Dir(dir.clone()),
            None => StaticOrigin::Http(self.static_origin.base_url.clone()),
        };
        HttpGatewayConfig {
            backend_url: self.backend.base_url.clone(),
            generate_url: self.backend.generate_url.clone(),
            static_origin,
            timeout: self.backend_timeout(),
        }
    }

    pub fn backend_timeout(&self) -> Duration {
        Duration::from_millis(self.backend.timeout_ms)
    }

    /// Backend generate endpoint, ignoring any proxy override
    pub fn backend_generate_url(&self) -> String {
        format!("{}/api/generate", self.backend.base_url.trim_end_matches('/'))
    }

    pub fn progress_config(&self) -> ProgressConfig {
        ProgressConfig::new(
            Duration::from_millis(self.regeneration.progress_tick_ms),
            self.regeneration.progress_step,
            self.regeneration.progress_cap,
        )
    }

    pub fn proxy_bind(&self) -> Result<SocketAddr> {
        self.proxy
            .bind
            .parse()
            .context(format!("Invalid proxy bind address: {}", self.proxy.bind))
    }
}
