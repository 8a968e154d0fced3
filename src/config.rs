use std::path::PathBuf;

use serde::Deserialize;

const DEFAULTS: &str = include_str!("../config/default.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Prefix the app is mounted under; empty or `/something` without a
    /// trailing slash.
    pub base_path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// Holds one sub-directory per location with `du-YYYY-MM-DD.gz` snapshots.
    pub directory: PathBuf,
    pub static_dir: PathBuf,
    pub static_prefix: String,
    pub cache_capacity: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct SecurityConfig {
    pub enable_hsts: Option<bool>,
    pub hsts_max_age: Option<u64>,
    pub hsts_include_subdomains: Option<bool>,
    pub csp: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reports: ReportsConfig,
    pub logging: LoggingConfig,
    pub security: Option<SecurityConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        // The embedded defaults are part of the binary; failing here is a build defect.
        match ::config::Config::builder()
            .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
            .build()
            .and_then(|cfg| cfg.try_deserialize())
        {
            Ok(app_cfg) => app_cfg,
            Err(e) => panic!("Failed to load embedded default config: {}", e),
        }
    }
}

/// Loads the configuration: embedded defaults -> `dudiff.toml` in the CWD ->
/// file named by `DUDIFF_CONFIG` -> `DUDIFF__SECTION__KEY` environment variables.
pub fn load() -> anyhow::Result<AppConfig> {
    // Load .env first (optional)
    let _ = dotenvy::dotenv();

    let mut builder = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        .add_source(::config::File::with_name("dudiff").required(false));

    if let Ok(custom_path) = std::env::var("DUDIFF_CONFIG") {
        builder = builder.add_source(::config::File::with_name(&custom_path).required(false));
    }
    // Environment variables last to have highest precedence
    builder = builder.add_source(::config::Environment::with_prefix("DUDIFF").separator("__"));

    let app_cfg: AppConfig = builder.build()?.try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

/// Defaults overlaid with a TOML fragment, validated like [`load`].
pub fn from_toml(overrides: &str) -> anyhow::Result<AppConfig> {
    let app_cfg: AppConfig = ::config::Config::builder()
        .add_source(::config::File::from_str(DEFAULTS, ::config::FileFormat::Toml))
        .add_source(::config::File::from_str(overrides, ::config::FileFormat::Toml))
        .build()?
        .try_deserialize()?;
    validate(&app_cfg)?;
    Ok(app_cfg)
}

pub fn validate(cfg: &AppConfig) -> anyhow::Result<()> {
    if cfg.server.port == 0 {
        return Err(anyhow::anyhow!("invalid server.port: {}", cfg.server.port));
    }
    #[cfg(unix)]
    if cfg.server.port < 1024 {
        tracing::warn!("Using privileged port {} - may require elevated permissions", cfg.server.port);
    }

    let base = &cfg.server.base_path;
    if !base.is_empty() && (!base.starts_with('/') || base.ends_with('/')) {
        return Err(anyhow::anyhow!(
            "server.base_path must be empty or start with '/' and not end with '/': {:?}",
            base
        ));
    }
    let static_prefix = &cfg.reports.static_prefix;
    if !static_prefix.starts_with('/') || static_prefix.ends_with('/') {
        return Err(anyhow::anyhow!(
            "reports.static_prefix must start with '/' and not end with '/': {:?}",
            static_prefix
        ));
    }
    if cfg.reports.cache_capacity == 0 || cfg.reports.cache_capacity > 4096 {
        return Err(anyhow::anyhow!("reports.cache_capacity must be in 1..=4096"));
    }
    if cfg.logging.file_name.trim().is_empty() {
        return Err(anyhow::anyhow!("logging.file_name must not be empty"));
    }
    Ok(())
}
