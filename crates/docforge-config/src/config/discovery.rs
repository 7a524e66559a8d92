use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{
    CliArgs, Config, ConfigSource, ExportConfig, GeminiConfig, LlmConfig, RateLimitConfig,
};

/// Directory (relative to a project root) holding `config.toml`
pub const CONFIG_DIR: &str = ".docforge";

/// Points at a directory containing `config.toml`; beats upward discovery
pub const HOME_ENV_VAR: &str = "DOCFORGE_HOME";

/// Overrides `[llm] provider`
pub const PROVIDER_ENV_VAR: &str = "DOCFORGE_LLM_PROVIDER";

/// Overrides `[llm] max_retries`
pub const MAX_RETRIES_ENV_VAR: &str = "DOCFORGE_MAX_RETRIES";

/// TOML configuration file structure; every section is optional
#[derive(Debug, Default, Deserialize, Serialize)]
struct TomlConfig {
    llm: Option<TomlLlmConfig>,
    rate_limit: Option<TomlRateLimitConfig>,
    export: Option<TomlExportConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlLlmConfig {
    provider: Option<String>,
    max_retries: Option<u32>,
    retry_base_delay_ms: Option<u64>,
    request_timeout_secs: Option<u64>,
    gemini: Option<GeminiConfig>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlRateLimitConfig {
    window_ms: Option<u64>,
    max_requests: Option<u32>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct TomlExportConfig {
    output_dir: Option<PathBuf>,
}

impl Config {
    /// Discover and load configuration with precedence: CLI > env > file > defaults
    ///
    /// Uses the current working directory for config file discovery when no
    /// explicit path is provided in `cli_args`.
    pub fn discover(cli_args: &CliArgs) -> Result<Self> {
        let start_dir = std::env::current_dir().context("Failed to get current directory")?;
        Self::discover_from(&start_dir, cli_args)
    }

    /// Discover and load configuration starting from a specific directory,
    /// reading `DOCFORGE_*` variables from the process environment.
    pub fn discover_from(start_dir: &Path, cli_args: &CliArgs) -> Result<Self> {
        Self::discover_with_env(start_dir, cli_args, |key| std::env::var(key).ok())
    }

    /// Path-and-environment-driven variant used by tests to avoid process-global state.
    pub fn discover_with_env<F>(start_dir: &Path, cli_args: &CliArgs, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::defaults();

        let config_path = match &cli_args.config_path {
            Some(explicit) => Some(explicit.clone()),
            None => match env(HOME_ENV_VAR).filter(|v| !v.is_empty()) {
                Some(home) => {
                    let candidate = PathBuf::from(home).join("config.toml");
                    candidate.exists().then_some(candidate)
                }
                None => Self::discover_config_file_from(start_dir)?,
            },
        };

        if let Some(path) = &config_path {
            let file_config = Self::load_config_file(path)
                .with_context(|| format!("Failed to load config file: {}", path.display()))?;
            config.apply_file(file_config, ConfigSource::ConfigFile(path.clone()));
        }

        if let Some(provider) = env(PROVIDER_ENV_VAR).filter(|v| !v.is_empty()) {
            config.llm.provider = Some(provider);
            config.attribute("llm_provider", ConfigSource::Env);
        }
        if let Some(raw) = env(MAX_RETRIES_ENV_VAR).filter(|v| !v.is_empty()) {
            let retries = raw.trim().parse::<u32>().with_context(|| {
                format!("{MAX_RETRIES_ENV_VAR} must be a positive integer, got '{raw}'")
            })?;
            config.llm.max_retries = Some(retries);
            config.attribute("max_retries", ConfigSource::Env);
        }

        if let Some(provider) = &cli_args.llm_provider {
            config.llm.provider = Some(provider.clone());
            config.attribute("llm_provider", ConfigSource::Cli);
        }
        if let Some(retries) = cli_args.max_retries {
            config.llm.max_retries = Some(retries);
            config.attribute("max_retries", ConfigSource::Cli);
        }
        if let Some(dir) = &cli_args.output_dir {
            config.export.output_dir = Some(dir.clone());
            config.attribute("output_dir", ConfigSource::Cli);
        }

        config.validate()?;

        Ok(config)
    }

    /// Discover config file by searching upward from a given directory
    ///
    /// Walks up the directory tree looking for `.docforge/config.toml`, stopping
    /// at repository root markers (.git, .hg, .svn) or the filesystem root.
    pub fn discover_config_file_from(start_dir: &Path) -> Result<Option<PathBuf>> {
        let mut current_dir = Some(start_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(CONFIG_DIR).join("config.toml");
            if config_path.exists() {
                return Ok(Some(config_path));
            }

            if dir.join(".git").exists() || dir.join(".hg").exists() || dir.join(".svn").exists()
            {
                break;
            }

            current_dir = dir.parent();
        }

        Ok(None)
    }

    /// Load configuration from a TOML file; a missing file is treated as empty
    fn load_config_file(path: &Path) -> Result<TomlConfig> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let config: TomlConfig = toml::from_str(&content).with_context(|| {
                    format!("Failed to parse TOML config file: {}", path.display())
                })?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(TomlConfig::default()),
            Err(e) => Err(anyhow::anyhow!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            )),
        }
    }

    fn apply_file(&mut self, file: TomlConfig, source: ConfigSource) {
        if let Some(llm) = file.llm {
            let LlmConfig {
                provider,
                max_retries,
                retry_base_delay_ms,
                request_timeout_secs,
                gemini,
            } = &mut self.llm;
            if llm.provider.is_some() {
                *provider = llm.provider;
                self.source_attribution
                    .insert("llm_provider".to_string(), source.clone());
            }
            if llm.max_retries.is_some() {
                *max_retries = llm.max_retries;
                self.source_attribution
                    .insert("max_retries".to_string(), source.clone());
            }
            if llm.retry_base_delay_ms.is_some() {
                *retry_base_delay_ms = llm.retry_base_delay_ms;
                self.source_attribution
                    .insert("retry_base_delay_ms".to_string(), source.clone());
            }
            if llm.request_timeout_secs.is_some() {
                *request_timeout_secs = llm.request_timeout_secs;
                self.source_attribution
                    .insert("request_timeout_secs".to_string(), source.clone());
            }
            if let Some(file_gemini) = llm.gemini {
                if file_gemini.api_key_env.is_some() {
                    self.source_attribution
                        .insert("gemini_api_key_env".to_string(), source.clone());
                }
                if file_gemini.endpoint.is_some() {
                    self.source_attribution
                        .insert("gemini_endpoint".to_string(), source.clone());
                }
                *gemini = Some(file_gemini);
            }
        }

        if let Some(rate_limit) = file.rate_limit {
            let RateLimitConfig {
                window_ms,
                max_requests,
            } = &mut self.rate_limit;
            if rate_limit.window_ms.is_some() {
                *window_ms = rate_limit.window_ms;
                self.source_attribution
                    .insert("rate_limit_window_ms".to_string(), source.clone());
            }
            if rate_limit.max_requests.is_some() {
                *max_requests = rate_limit.max_requests;
                self.source_attribution
                    .insert("rate_limit_max_requests".to_string(), source.clone());
            }
        }

        if let Some(export) = file.export {
            let ExportConfig { output_dir } = &mut self.export;
            if export.output_dir.is_some() {
                *output_dir = export.output_dir;
                self.source_attribution
                    .insert("output_dir".to_string(), source);
            }
        }
    }

    pub(crate) fn attribute(&mut self, key: &str, source: ConfigSource) {
        self.source_attribution.insert(key.to_string(), source);
    }
}
