//! Configuration management for docforge
//!
//! Hierarchical configuration with discovery and precedence:
//! CLI > environment > file > defaults. The file is TOML with `[llm]`,
//! `[llm.gemini]`, `[rate_limit]` and `[export]` sections.

mod builder;
mod cli_args;
mod discovery;
mod model;
mod sources;
mod validation;

pub use builder::ConfigBuilder;
pub use cli_args::CliArgs;
pub use discovery::{CONFIG_DIR, HOME_ENV_VAR, MAX_RETRIES_ENV_VAR, PROVIDER_ENV_VAR};
pub use docforge_utils::types::ConfigSource;
pub use model::*;

/// Keys tracked in `Config::source_attribution`
pub(crate) const ATTRIBUTED_KEYS: &[&str] = &[
    "llm_provider",
    "max_retries",
    "retry_base_delay_ms",
    "request_timeout_secs",
    "gemini_api_key_env",
    "gemini_endpoint",
    "rate_limit_window_ms",
    "rate_limit_max_requests",
    "output_dir",
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::{Path, PathBuf};
    use std::time::Duration;
    use tempfile::TempDir;

    fn create_test_config_file(dir: &Path, content: &str) -> PathBuf {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        let config_path = config_dir.join("config.toml");
        fs::write(&config_path, content).unwrap();
        config_path
    }

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> + use<> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::defaults();
        assert_eq!(config.provider_kind(), ProviderKind::Auto);
        assert_eq!(config.max_retries(), 3);
        assert_eq!(config.retry_base_delay(), Duration::from_millis(1000));
        assert_eq!(config.request_timeout(), Duration::from_secs(60));
        assert_eq!(config.rate_limit_window(), Duration::from_secs(60));
        assert_eq!(config.rate_limit_max_requests(), 10);
        assert_eq!(config.gemini_api_key_env(), "GEMINI_API_KEY");
        assert_eq!(
            config.source_attribution.get("max_retries"),
            Some(&ConfigSource::Defaults)
        );
    }

    #[test]
    fn test_discover_without_file_uses_defaults() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();

        let config =
            Config::discover_with_env(temp.path(), &CliArgs::default(), no_env).unwrap();
        assert_eq!(config.max_retries(), DEFAULT_MAX_RETRIES);
        assert_eq!(
            config.source_attribution.get("llm_provider"),
            Some(&ConfigSource::Defaults)
        );
    }

    #[test]
    fn test_config_file_values_are_applied() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let path = create_test_config_file(
            temp.path(),
            r#"
[llm]
provider = "mock"
max_retries = 5

[rate_limit]
window_ms = 1000
max_requests = 2
"#,
        );

        let config =
            Config::discover_with_env(temp.path(), &CliArgs::default(), no_env).unwrap();
        assert_eq!(config.provider_kind(), ProviderKind::Mock);
        assert_eq!(config.max_retries(), 5);
        assert_eq!(config.rate_limit_max_requests(), 2);
        assert_eq!(config.rate_limit_window(), Duration::from_secs(1));
        assert_eq!(
            config.source_attribution.get("max_retries"),
            Some(&ConfigSource::ConfigFile(path))
        );
        assert_eq!(
            config.source_attribution.get("request_timeout_secs"),
            Some(&ConfigSource::Defaults)
        );
    }

    #[test]
    fn test_discovery_walks_up_to_parent() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        create_test_config_file(temp.path(), "[llm]\nmax_retries = 4\n");
        let nested = temp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();

        let found = Config::discover_config_file_from(&nested).unwrap();
        assert!(found.is_some());

        let config = Config::discover_with_env(&nested, &CliArgs::default(), no_env).unwrap();
        assert_eq!(config.max_retries(), 4);
    }

    #[test]
    fn test_discovery_stops_at_repo_root() {
        let temp = TempDir::new().unwrap();
        create_test_config_file(temp.path(), "[llm]\nmax_retries = 4\n");
        let repo = temp.path().join("repo");
        fs::create_dir_all(repo.join(".git")).unwrap();

        assert!(Config::discover_config_file_from(&repo).unwrap().is_none());
    }

    #[test]
    fn test_precedence_cli_over_env_over_file() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        create_test_config_file(temp.path(), "[llm]\nprovider = \"gemini\"\nmax_retries = 5\n");

        let env = env_from(&[(PROVIDER_ENV_VAR, "mock"), (MAX_RETRIES_ENV_VAR, "6")]);
        let config = Config::discover_with_env(temp.path(), &CliArgs::default(), &env).unwrap();
        assert_eq!(config.provider_kind(), ProviderKind::Mock);
        assert_eq!(config.max_retries(), 6);
        assert_eq!(
            config.source_attribution.get("max_retries"),
            Some(&ConfigSource::Env)
        );

        let cli = CliArgs {
            max_retries: Some(2),
            ..CliArgs::default()
        };
        let config = Config::discover_with_env(temp.path(), &cli, &env).unwrap();
        assert_eq!(config.max_retries(), 2);
        assert_eq!(
            config.source_attribution.get("max_retries"),
            Some(&ConfigSource::Cli)
        );
        assert_eq!(
            config.source_attribution.get("llm_provider"),
            Some(&ConfigSource::Env)
        );
    }

    #[test]
    fn test_home_env_var_points_at_config_dir() {
        let home = TempDir::new().unwrap();
        fs::write(home.path().join("config.toml"), "[llm]\nmax_retries = 7\n").unwrap();
        let start = TempDir::new().unwrap();
        fs::create_dir(start.path().join(".git")).unwrap();

        let home_str = home.path().to_string_lossy().to_string();
        let env = env_from(&[(HOME_ENV_VAR, home_str.as_str())]);
        let config = Config::discover_with_env(start.path(), &CliArgs::default(), env).unwrap();
        assert_eq!(config.max_retries(), 7);
    }

    #[test]
    fn test_explicit_config_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("custom.toml");
        fs::write(&path, "[export]\noutput_dir = \"out\"\n").unwrap();

        let cli = CliArgs {
            config_path: Some(path),
            ..CliArgs::default()
        };
        let config = Config::discover_with_env(temp.path(), &cli, no_env).unwrap();
        assert_eq!(config.output_dir(), PathBuf::from("out"));
    }

    #[test]
    fn test_invalid_toml_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        create_test_config_file(temp.path(), "[llm\nprovider = ");

        let err = Config::discover_with_env(temp.path(), &CliArgs::default(), no_env)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse TOML"));
    }

    #[test]
    fn test_unknown_llm_key_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        create_test_config_file(temp.path(), "[llm]\nretries = 3\n");

        assert!(Config::discover_with_env(temp.path(), &CliArgs::default(), no_env).is_err());
    }

    #[test]
    fn test_invalid_env_retries_is_rejected() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(".git")).unwrap();
        let env = env_from(&[(MAX_RETRIES_ENV_VAR, "many")]);

        let err = Config::discover_with_env(temp.path(), &CliArgs::default(), env).unwrap_err();
        assert!(err.to_string().contains(MAX_RETRIES_ENV_VAR));
    }

    #[test]
    fn test_validation_rejects_out_of_range_values() {
        assert!(Config::builder().max_retries(0).build().is_err());
        assert!(Config::builder().max_retries(11).build().is_err());
        assert!(Config::builder().provider("openai").build().is_err());
        assert!(Config::builder().rate_limit_max_requests(0).build().is_err());
        assert!(
            Config::builder()
                .rate_limit_window(Duration::ZERO)
                .build()
                .is_err()
        );
        assert!(
            Config::builder()
                .request_timeout(Duration::from_secs(601))
                .build()
                .is_err()
        );
        assert!(Config::builder().gemini_endpoint("ftp://x").build().is_err());
    }

    #[test]
    fn test_builder_attributes_programmatic_source() {
        let config = Config::builder()
            .provider("MOCK")
            .retry_base_delay(Duration::from_millis(5))
            .build()
            .unwrap();
        assert_eq!(config.provider_kind(), ProviderKind::Mock);
        assert_eq!(config.retry_base_delay(), Duration::from_millis(5));
        assert_eq!(
            config.source_attribution.get("retry_base_delay_ms"),
            Some(&ConfigSource::Programmatic)
        );
        assert_eq!(
            config.source_attribution.get("max_retries"),
            Some(&ConfigSource::Defaults)
        );
    }

    #[test]
    fn test_effective_config_lists_every_key() {
        let config = Config::builder().max_retries(4).build().unwrap();
        let effective = config.effective_config();
        for key in ATTRIBUTED_KEYS {
            assert!(effective.contains_key(*key), "missing {key}");
        }
        assert_eq!(
            effective.get("max_retries"),
            Some(&("4".to_string(), "programmatic".to_string()))
        );
        assert_eq!(
            effective.get("llm_provider"),
            Some(&("auto".to_string(), "default".to_string()))
        );
    }
}
