use serde::Deserialize;
use std::collections::HashMap;

use crate::analysis::{AnalysisOptions, DocumentationConfig, MatchPolicy};
use crate::errors::ConfigError;

pub const CONFIG_DIR_NAME: &str = "team-review";
pub const CONFIG_FILE_NAME: &str = "config.toml";

pub const ENV_CONCURRENCY: &str = "TEAM_REVIEW_CONCURRENCY";
pub const ENV_DOCS_DIR: &str = "TEAM_REVIEW_DOCS_DIR";

/// Main Application Configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AppConfig {
    pub analysis: AnalysisOptions,
    pub documentation: DocumentationConfig,
    pub matching: MatchPolicy,
}

/// 配置文件中的分析开关，缺省字段回落到默认值
#[derive(Deserialize, Debug, Default)]
pub struct PartialAnalysisConfig {
    include_risk_analysis: Option<bool>,
    include_optimization_suggestions: Option<bool>,
    concurrency: Option<usize>,
}

#[derive(Deserialize, Debug, Default)]
pub struct PartialDocumentationConfig {
    directory: Option<String>,
    extensions: Option<Vec<String>>,
    excerpt_chars: Option<usize>,
}

/// Partial Application Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialAppConfig {
    analysis: Option<PartialAnalysisConfig>,
    documentation: Option<PartialDocumentationConfig>,
    matching: Option<MatchPolicy>,
}

impl AppConfig {
    /// Create AppConfig from partial config and environment
    pub fn from_partial_and_env(
        partial: Option<PartialAppConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();

        let defaults = AnalysisOptions::default();
        let analysis = partial
            .analysis
            .map(|a| AnalysisOptions {
                include_risk_analysis: a
                    .include_risk_analysis
                    .unwrap_or(defaults.include_risk_analysis),
                include_optimization_suggestions: a
                    .include_optimization_suggestions
                    .unwrap_or(defaults.include_optimization_suggestions),
                concurrency: a.concurrency.unwrap_or(defaults.concurrency),
            })
            .unwrap_or(defaults);

        let doc_defaults = DocumentationConfig::default();
        let documentation = partial
            .documentation
            .map(|d| DocumentationConfig {
                directory: d.directory.unwrap_or(doc_defaults.directory.clone()),
                extensions: d.extensions.unwrap_or(doc_defaults.extensions.clone()),
                excerpt_chars: d.excerpt_chars.unwrap_or(doc_defaults.excerpt_chars),
            })
            .unwrap_or(doc_defaults);

        let mut config = AppConfig {
            analysis,
            documentation,
            matching: partial.matching.unwrap_or_default(),
        };
        config.apply_env_overrides(env_map)?;
        config.validate()?;
        Ok(config)
    }

    /// 环境变量优先于配置文件
    pub fn apply_env_overrides(&mut self, env_map: &HashMap<String, String>) -> Result<(), ConfigError> {
        if let Some(raw) = env_map.get(ENV_CONCURRENCY) {
            self.analysis.concurrency = raw.trim().parse().map_err(|_| {
                ConfigError::Other(format!(
                    "{} must be a non-negative integer, got '{}'",
                    ENV_CONCURRENCY, raw
                ))
            })?;
        }
        if let Some(dir) = env_map.get(ENV_DOCS_DIR) {
            if !dir.trim().is_empty() {
                self.documentation.directory = dir.trim().to_string();
            }
        }
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.documentation.directory.trim().is_empty() {
            return Err(ConfigError::Other(
                "documentation.directory must not be empty".to_string(),
            ));
        }
        if self.documentation.extensions.is_empty() {
            return Err(ConfigError::Other(
                "documentation.extensions must list at least one extension".to_string(),
            ));
        }
        Ok(())
    }
}
