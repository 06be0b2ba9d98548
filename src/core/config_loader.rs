//! Configuration file loader for release-publisher
//!
//! This module provides configuration loading, validation, and merging capabilities.

use super::config::*;
use crate::core::error::ReleaseError;
use crate::security::is_allowed_command;
use lazy_static::lazy_static;
use log::{debug, warn};
use regex::Regex;
use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Configuration file name
pub const CONFIG_FILENAME: &str = ".release-publisher.yaml";

lazy_static! {
    /// Environment variable pattern (${VAR_NAME})
    static ref ENV_VAR_PATTERN: Regex =
        Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern is valid");
}

/// Configuration load options
#[derive(Debug, Clone, Default)]
pub struct ConfigLoadOptions {
    /// Project path to load config from
    pub project_path: PathBuf,

    /// Explicit config file; replaces the project config when set
    pub config_file: Option<PathBuf>,

    /// CLI arguments (highest priority)
    pub cli_args: Option<ReleaseConfig>,

    /// Environment variables
    pub env: HashMap<String, String>,

    /// Skip ~/.release-publisher.yaml
    pub skip_global: bool,
}

/// Configuration validation result
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationResult {
    /// Is configuration valid?
    pub valid: bool,

    /// Validation errors
    pub errors: Vec<ConfigValidationError>,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Field path (e.g., "commands.build")
    pub field: String,

    /// Error message
    pub message: String,
}

/// Configuration file loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from multiple sources with priority
    ///
    /// Priority (high to low):
    /// 1. CLI arguments
    /// 2. Environment variables
    /// 3. Project config (./.release-publisher.yaml) or the explicit config file
    /// 4. Global config (~/.release-publisher.yaml)
    /// 5. Default values
    pub async fn load(options: ConfigLoadOptions) -> Result<ReleaseConfig, ReleaseError> {
        let mut configs: Vec<ReleaseConfig> = Vec::new();

        // 5. Default values (lowest priority)
        configs.push(ReleaseConfig::default());

        // 4. Global config
        if !options.skip_global
            && let Some(global_config) = Self::load_global_config(&options.env).await?
        {
            configs.push(global_config);
        }

        // 3. Project config
        let project_config = match &options.config_file {
            Some(path) => Some(Self::load_config_file(path).await?.ok_or_else(|| {
                ReleaseError::Config(format!("Config file not found: {}", path.display()))
            })?),
            None => Self::load_config_file(&options.project_path.join(CONFIG_FILENAME)).await?,
        };
        if let Some(project_config) = project_config {
            configs.push(project_config);
        }

        // 2. Environment variables
        if let Some(env_config) = Self::load_env_config(&options.env) {
            configs.push(env_config);
        }

        // 1. CLI arguments (highest priority)
        if let Some(cli_config) = options.cli_args {
            configs.push(cli_config);
        }

        let merged_config = Self::merge_configs(configs);
        let expanded_config = Self::expand_env_vars(merged_config, &options.env);

        let validation = Self::validate(&expanded_config);
        if !validation.valid {
            return Err(ReleaseError::Config(Self::format_validation_result(
                &validation,
            )));
        }

        Ok(expanded_config)
    }

    /// Load global configuration from ~/.release-publisher.yaml
    async fn load_global_config(
        env: &HashMap<String, String>,
    ) -> Result<Option<ReleaseConfig>, ReleaseError> {
        let Some(home_dir) = env.get("HOME").cloned().or_else(|| env::var("HOME").ok()) else {
            debug!("HOME is not set, skipping global config");
            return Ok(None);
        };

        Self::load_config_file(&PathBuf::from(home_dir).join(CONFIG_FILENAME)).await
    }

    /// Load configuration from YAML file
    async fn load_config_file(file_path: &Path) -> Result<Option<ReleaseConfig>, ReleaseError> {
        Self::load_config_chain(file_path.to_path_buf(), Vec::new()).await
    }

    /// Load a config file and its `extends` ancestors.
    ///
    /// `visited` holds the canonical paths already on the chain; meeting one
    /// again is a circular `extends`.
    fn load_config_chain(
        file_path: PathBuf,
        mut visited: Vec<PathBuf>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Option<ReleaseConfig>, ReleaseError>> + Send>,
    > {
        Box::pin(async move {
            if !file_path.exists() {
                return Ok(None);
            }
            debug!("loading config from {}", file_path.display());

            let canonical = fs::canonicalize(&file_path).await.map_err(|e| {
                ReleaseError::Config(format!(
                    "Failed to resolve config file {}: {}",
                    file_path.display(),
                    e
                ))
            })?;
            if visited.contains(&canonical) {
                let chain: Vec<String> = visited
                    .iter()
                    .chain(std::iter::once(&canonical))
                    .map(|p| p.display().to_string())
                    .collect();
                return Err(ReleaseError::Config(format!(
                    "circular extends: {}",
                    chain.join(" -> ")
                )));
            }

            let content = fs::read_to_string(&file_path).await.map_err(|e| {
                ReleaseError::Config(format!(
                    "Failed to read config file {}: {}",
                    file_path.display(),
                    e
                ))
            })?;

            let config: ReleaseConfig = serde_yaml::from_str(&content).map_err(|e| {
                ReleaseError::Config(format!(
                    "Failed to parse YAML config {}: {}",
                    file_path.display(),
                    e
                ))
            })?;

            // Handle extends if present
            if let Some(extends_path) = &config.extends {
                let base_path = file_path
                    .parent()
                    .ok_or_else(|| ReleaseError::Config("Invalid config file path".to_string()))?
                    .join(extends_path);

                visited.push(canonical);
                match Self::load_config_chain(base_path.clone(), visited).await? {
                    Some(base_config) => {
                        return Ok(Some(Self::merge_configs(vec![base_config, config])));
                    }
                    None => {
                        return Err(ReleaseError::Config(format!(
                            "Extended config file not found: {}",
                            base_path.display()
                        )));
                    }
                }
            }

            Ok(Some(config))
        })
    }

    /// Load configuration from environment variables
    fn load_env_config(env: &HashMap<String, String>) -> Option<ReleaseConfig> {
        let mut config = ReleaseConfig::default();
        let mut has_changes = false;

        // RELEASE_REGISTRY_URL -> registry.indexUrl
        if let Some(url) = env.get("RELEASE_REGISTRY_URL") {
            config.registry = Some(RegistryConfig {
                index_url: Some(url.clone()),
                timeout_secs: None,
            });
            has_changes = true;
        }

        // RELEASE_DIST_DIR -> project.distDir
        if let Some(dist_dir) = env.get("RELEASE_DIST_DIR") {
            config.project = Some(ProjectConfig {
                dist_dir: Some(dist_dir.clone()),
                ..Default::default()
            });
            has_changes = true;
        }

        // RELEASE_DOCS_ENABLED -> docs.enabled
        if let Some(enabled) = env.get("RELEASE_DOCS_ENABLED") {
            match enabled.as_str() {
                "true" | "1" => {
                    config.docs = Some(DocsConfig {
                        enabled: Some(true),
                        latest_alias: None,
                    });
                    has_changes = true;
                }
                "false" | "0" => {
                    config.docs = Some(DocsConfig {
                        enabled: Some(false),
                        latest_alias: None,
                    });
                    has_changes = true;
                }
                other => warn!("ignoring RELEASE_DOCS_ENABLED={}", other),
            }
        }

        // RELEASE_NO_COLOR -> output.color
        if env.get("RELEASE_NO_COLOR").is_some_and(|v| !v.is_empty()) {
            config.output = Some(OutputConfig { color: Some(false) });
            has_changes = true;
        }

        if has_changes { Some(config) } else { None }
    }

    /// Merge multiple configurations with priority
    fn merge_configs(configs: Vec<ReleaseConfig>) -> ReleaseConfig {
        let mut result = ReleaseConfig::default();

        for config in configs {
            Self::merge_into(&mut result, config);
        }

        result
    }

    /// Merge source config into target, field by field
    fn merge_into(target: &mut ReleaseConfig, source: ReleaseConfig) {
        if source.extends.is_some() {
            target.extends = source.extends;
        }

        if let Some(source_project) = source.project {
            let target_project = target.project.get_or_insert_with(Default::default);
            if source_project.manifest.is_some() {
                target_project.manifest = source_project.manifest;
            }
            if source_project.dist_dir.is_some() {
                target_project.dist_dir = source_project.dist_dir;
            }
            if source_project.license_file.is_some() {
                target_project.license_file = source_project.license_file;
            }
        }

        if let Some(source_registry) = source.registry {
            let target_registry = target.registry.get_or_insert_with(Default::default);
            if source_registry.index_url.is_some() {
                target_registry.index_url = source_registry.index_url;
            }
            if source_registry.timeout_secs.is_some() {
                target_registry.timeout_secs = source_registry.timeout_secs;
            }
        }

        if let Some(source_commands) = source.commands {
            let target_commands = target.commands.get_or_insert_with(Default::default);
            if source_commands.build.is_some() {
                target_commands.build = source_commands.build;
            }
            if source_commands.release.is_some() {
                target_commands.release = source_commands.release;
            }
            if source_commands.publish.is_some() {
                target_commands.publish = source_commands.publish;
            }
            if source_commands.docs.is_some() {
                target_commands.docs = source_commands.docs;
            }
            if source_commands.skip.is_some() {
                target_commands.skip = source_commands.skip;
            }
        }

        if let Some(source_docs) = source.docs {
            let target_docs = target.docs.get_or_insert_with(Default::default);
            if source_docs.enabled.is_some() {
                target_docs.enabled = source_docs.enabled;
            }
            if source_docs.latest_alias.is_some() {
                target_docs.latest_alias = source_docs.latest_alias;
            }
        }

        if let Some(source_output) = source.output
            && source_output.color.is_some()
        {
            target.output = Some(source_output);
        }
    }

    /// Expand ${VAR} references in command templates
    fn expand_env_vars(mut config: ReleaseConfig, env: &HashMap<String, String>) -> ReleaseConfig {
        if let Some(commands) = &mut config.commands {
            for template in [
                &mut commands.build,
                &mut commands.release,
                &mut commands.publish,
                &mut commands.docs,
            ]
            .into_iter()
            .flatten()
            {
                for word in template.iter_mut() {
                    *word = Self::expand_string(word, env);
                }
            }
        }

        config
    }

    /// Expand environment variables in a single string
    fn expand_string(input: &str, env: &HashMap<String, String>) -> String {
        let mut result = input.to_string();
        for cap in ENV_VAR_PATTERN.captures_iter(input) {
            let var_name = &cap[1];

            match env.get(var_name) {
                Some(value) => {
                    result = result.replace(&format!("${{{}}}", var_name), value);
                }
                None => warn!("environment variable {} not found", var_name),
            }
        }

        result
    }

    /// Validate configuration
    pub fn validate(config: &ReleaseConfig) -> ConfigValidationResult {
        let mut errors = Vec::new();

        let templates = [
            ("commands.build", config.build_command()),
            ("commands.release", config.release_command()),
            ("commands.publish", config.publish_command()),
            ("commands.docs", config.docs_command()),
        ];
        for (field, template) in templates {
            match template.first() {
                Some(program) if !program.trim().is_empty() => {
                    if !is_allowed_command(program) {
                        errors.push(ConfigValidationError {
                            field: field.to_string(),
                            message: format!("'{}' is not an allowed release command", program),
                        });
                    }
                }
                _ => errors.push(ConfigValidationError {
                    field: field.to_string(),
                    message: "command must name a program".to_string(),
                }),
            }
        }

        if config.registry_timeout().is_zero() {
            errors.push(ConfigValidationError {
                field: "registry.timeoutSecs".to_string(),
                message: "timeout must be greater than zero".to_string(),
            });
        }

        let index_url = config.index_url();
        if !index_url.starts_with("https://") && !index_url.starts_with("http://") {
            errors.push(ConfigValidationError {
                field: "registry.indexUrl".to_string(),
                message: format!("expected an http(s) URL, got '{}'", index_url),
            });
        }

        if config.latest_alias().trim().is_empty() {
            errors.push(ConfigValidationError {
                field: "docs.latestAlias".to_string(),
                message: "alias must not be empty".to_string(),
            });
        }

        ConfigValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Format validation result as human-readable string
    pub fn format_validation_result(result: &ConfigValidationResult) -> String {
        let mut lines = Vec::new();

        if result.valid {
            lines.push("Configuration is valid".to_string());
        } else {
            lines.push("Configuration has errors:".to_string());
        }

        for error in &result.errors {
            lines.push(format!("  - [{}] {}", error.field, error.message));
        }

        lines.join("\n")
    }
}
