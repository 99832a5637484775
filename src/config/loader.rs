use serde::de::DeserializeOwned;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use super::app_config::{
    AppConfig, PartialAppConfig, CONFIG_DIR_NAME, CONFIG_FILE_NAME, ENV_CONCURRENCY, ENV_DOCS_DIR,
};
use crate::errors::ConfigError;

/// 支持的配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    /// Chosen by file extension.
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => Ok(FileFormat::Json),
            Some("toml") => Ok(FileFormat::Toml),
            _ => Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// 读取并解析 JSON 或 TOML 文件
pub fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = FileFormat::from_path(path)?;
    let display = path.display().to_string();
    let content =
        fs::read_to_string(path).map_err(|e| ConfigError::FileRead(display.clone(), e))?;

    match format {
        FileFormat::Json => {
            serde_json::from_str(&content).map_err(|e| ConfigError::JsonParse(display, e))
        }
        FileFormat::Toml => toml::from_str(&content).map_err(|e| ConfigError::TomlParse(display, e)),
    }
}

/// Configuration loader responsible for loading config from files and environment
pub struct ConfigLoader {
    base_path: Option<PathBuf>,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    /// Create a new config loader with default paths
    pub fn new() -> Self {
        Self { base_path: None }
    }

    /// Create a config loader with custom base path (for testing)
    pub fn with_base_path(base_path: PathBuf) -> Self {
        Self {
            base_path: Some(base_path),
        }
    }

    /// `<config_dir>/team-review/config.toml`
    pub fn default_config_path(&self) -> Option<PathBuf> {
        let base = match &self.base_path {
            Some(base) => Some(base.clone()),
            None => dirs::config_dir(),
        };
        base.map(|b| b.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load complete application configuration
    ///
    /// An explicit path must exist. The default location is optional and
    /// falls back to built-in defaults when absent.
    pub fn load_config(&self, explicit: Option<&Path>) -> Result<AppConfig, ConfigError> {
        let partial = match explicit {
            Some(path) => Some(self.load_partial_config(path)?),
            None => match self.default_config_path() {
                Some(path) if path.exists() => Some(self.load_partial_config(&path)?),
                Some(path) => {
                    tracing::debug!("未找到配置文件 {}，使用默认配置", path.display());
                    None
                }
                None => None,
            },
        };

        AppConfig::from_partial_and_env(partial, &self.collect_env_vars())
    }

    fn load_partial_config(&self, path: &Path) -> Result<PartialAppConfig, ConfigError> {
        tracing::debug!("加载配置文件: {}", path.display());
        let display = path.display().to_string();
        let content =
            fs::read_to_string(path).map_err(|e| ConfigError::FileRead(display.clone(), e))?;
        toml::from_str(&content).map_err(|e| ConfigError::TomlParse(display, e))
    }

    fn collect_env_vars(&self) -> HashMap<String, String> {
        [ENV_CONCURRENCY, ENV_DOCS_DIR]
            .iter()
            .filter_map(|key| env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect()
    }
}

impl AppConfig {
    /// Load configuration from the default location or an explicit file
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        ConfigLoader::new().load_config(explicit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_file_format_by_extension() {
        assert_eq!(FileFormat::from_path(Path::new("p.json")).unwrap(), FileFormat::Json);
        assert_eq!(FileFormat::from_path(Path::new("p.TOML")).unwrap(), FileFormat::Toml);
        assert!(matches!(
            FileFormat::from_path(Path::new("p.yaml")),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_missing_default_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_path(temp_dir.path().to_path_buf());
        let config = loader.load_config(None).unwrap();
        assert_eq!(config.documentation.directory, AppConfig::default().documentation.directory);
    }

    #[test]
    fn test_loads_default_location() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join(CONFIG_DIR_NAME);
        fs::create_dir_all(&dir).unwrap();
        let mut file = fs::File::create(dir.join(CONFIG_FILE_NAME)).unwrap();
        writeln!(file, "[analysis]\ninclude_risk_analysis = false").unwrap();

        let loader = ConfigLoader::with_base_path(temp_dir.path().to_path_buf());
        let config = loader.load_config(None).unwrap();
        assert!(!config.analysis.include_risk_analysis);
    }

    #[test]
    fn test_explicit_path_errors() {
        let temp_dir = TempDir::new().unwrap();
        let loader = ConfigLoader::with_base_path(temp_dir.path().to_path_buf());

        let missing = temp_dir.path().join("nope.toml");
        assert!(matches!(
            loader.load_config(Some(&missing)),
            Err(ConfigError::FileRead(..))
        ));

        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "[analysis\n").unwrap();
        assert!(matches!(
            loader.load_config(Some(&broken)),
            Err(ConfigError::TomlParse(..))
        ));
    }

    #[test]
    fn test_read_structured_json() {
        #[derive(serde::Deserialize)]
        struct Doc {
            value: u32,
        }

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("doc.json");
        fs::write(&path, r#"{"value": 7}"#).unwrap();
        let doc: Doc = read_structured(&path).unwrap();
        assert_eq!(doc.value, 7);

        fs::write(&path, "{").unwrap();
        assert!(matches!(
            read_structured::<Doc>(&path),
            Err(ConfigError::JsonParse(..))
        ));
    }
}
