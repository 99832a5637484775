//! 项目注册表持久化
//!
//! `setup` / `add` / `remove` 写入用户主目录下的 JSON 文件，
//! 之后的 `list` / `analyze` / `validate` 直接读取该文件。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use super::registry::ProjectRegistry;
use crate::errors::ConfigError;
use crate::types::Project;

/// 保存在主目录下的注册表文件名
pub const REGISTRY_FILE_NAME: &str = ".team-code-review-config.json";

/// 默认的项目文件（`setup --from file` 未指定路径时）
pub const DEFAULT_SETUP_FILE: &str = "./team-projects-config.json";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StoredRegistryRef<'a> {
    projects: &'a [Project],
    last_updated: DateTime<Utc>,
}

#[derive(Deserialize)]
struct StoredRegistry {
    #[serde(default)]
    projects: Vec<Project>,
}

/// 注册表的初始化来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupSource {
    /// `TEAM_PROJECTS` / `PROJECTS`
    Env,
    /// JSON 或 TOML 项目文件
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct SetupOutcome {
    pub registry: ProjectRegistry,
    pub message: String,
}

/// 已保存注册表所在的文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStore {
    path: PathBuf,
}

impl RegistryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.team-code-review-config.json`
    pub fn default_location() -> Result<Self, ConfigError> {
        dirs::home_dir()
            .map(|home| Self::new(home.join(REGISTRY_FILE_NAME)))
            .ok_or_else(|| ConfigError::Other("Cannot determine home directory".to_string()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取已保存的注册表
    ///
    /// A missing file is an empty registry. An unreadable or malformed file is
    /// logged and also treated as empty.
    pub fn load(&self) -> ProjectRegistry {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("注册表文件不存在: {}", self.path.display());
                return ProjectRegistry::default();
            }
            Err(e) => {
                tracing::warn!("Failed to load configuration {}: {}", self.path.display(), e);
                return ProjectRegistry::default();
            }
        };

        match serde_json::from_str::<StoredRegistry>(&content) {
            Ok(stored) => {
                tracing::debug!(
                    "从 {} 读取了 {} 个项目",
                    self.path.display(),
                    stored.projects.len()
                );
                ProjectRegistry::new(stored.projects)
            }
            Err(e) => {
                tracing::warn!("Failed to load configuration {}: {}", self.path.display(), e);
                ProjectRegistry::default()
            }
        }
    }

    /// 写入注册表，父目录不存在时自动创建
    pub fn save(&self, registry: &ProjectRegistry) -> Result<(), ConfigError> {
        let display = self.path.display().to_string();
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| ConfigError::FileWrite(display.clone(), e))?;
        }

        let stored = StoredRegistryRef {
            projects: registry.projects(),
            last_updated: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&stored)
            .map_err(|e| ConfigError::Other(format!("Failed to serialize registry: {}", e)))?;
        fs::write(&self.path, content).map_err(|e| ConfigError::FileWrite(display, e))?;

        tracing::info!(
            "已保存 {} 个项目到 {}",
            registry.projects().len(),
            self.path.display()
        );
        Ok(())
    }

    /// 从环境变量或项目文件初始化并保存注册表
    pub fn setup(&self, source: &SetupSource) -> Result<SetupOutcome, ConfigError> {
        let (registry, message) = match source {
            SetupSource::Env => {
                let registry = ProjectRegistry::from_env()?;
                let message = format!(
                    "Successfully configured {} projects from environment variables",
                    registry.projects().len()
                );
                (registry, message)
            }
            SetupSource::File(path) => {
                let registry = ProjectRegistry::from_file(path)?;
                let message = format!(
                    "Successfully loaded {} projects from configuration file",
                    registry.projects().len()
                );
                (registry, message)
            }
        };

        self.save(&registry)?;
        Ok(SetupOutcome { registry, message })
    }

    /// 新增或按名称替换一个项目并保存
    pub fn add(&self, project: Project) -> Result<ProjectRegistry, ConfigError> {
        let mut registry = self.load();
        let replaced = registry.upsert(project)?;
        tracing::debug!("项目{}", if replaced { "已替换" } else { "已新增" });
        self.save(&registry)?;
        Ok(registry)
    }

    /// 按名称删除项目并保存；名称不存在时报错且不写文件
    pub fn remove(&self, name: &str) -> Result<Project, ConfigError> {
        let mut registry = self.load();
        let removed = registry.remove(name)?;
        self.save(&registry)?;
        Ok(removed)
    }

    /// 已保存的项目；为空时返回 [`ConfigError::EmptyRegistry`]
    pub fn load_non_empty(&self) -> Result<ProjectRegistry, ConfigError> {
        let registry = self.load();
        if registry.is_empty() {
            return Err(ConfigError::EmptyRegistry);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(temp_dir: &TempDir) -> RegistryStore {
        RegistryStore::new(temp_dir.path().join("home").join(REGISTRY_FILE_NAME))
    }

    #[test]
    fn test_missing_file_is_empty_registry() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        assert!(store.load().is_empty());
        assert!(matches!(
            store.load_non_empty(),
            Err(ConfigError::EmptyRegistry)
        ));
    }

    #[test]
    fn test_save_and_load_round_trip_keeps_order() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let registry = ProjectRegistry::new(vec![
            Project::new("web", "/srv/web", "main", "develop"),
            Project::new("api", "/srv/api", "release", "next"),
        ]);

        store.save(&registry).unwrap();
        assert_eq!(store.load(), registry);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["projects"][1]["baseBranch"], "release");
        assert!(raw["lastUpdated"].is_string());
    }

    #[test]
    fn test_malformed_file_is_treated_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = RegistryStore::new(temp_dir.path().join(REGISTRY_FILE_NAME));
        fs::write(store.path(), "{ not json").unwrap();

        assert!(store.load().is_empty());
    }

    #[test]
    fn test_add_upserts_and_remove_persists() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let web = temp_dir.path().join("web");
        fs::create_dir(&web).unwrap();

        store.add(Project::new("web", &web, "main", "develop")).unwrap();
        store.add(Project::new("web", &web, "main", "feature/x")).unwrap();

        let saved = store.load();
        assert_eq!(saved.projects().len(), 1);
        assert_eq!(saved.projects()[0].target_branch, "feature/x");

        assert!(matches!(
            store.remove("api"),
            Err(ConfigError::ProjectNotFound(_))
        ));
        assert_eq!(store.load().projects().len(), 1);

        store.remove("web").unwrap();
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_setup_from_file_saves_registry() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let repo = temp_dir.path().join("repo");
        fs::create_dir(&repo).unwrap();
        let file = temp_dir.path().join("team-projects-config.json");
        fs::write(
            &file,
            format!(
                r#"{{"projects": [{{"name": "repo", "path": "{}"}}]}}"#,
                repo.display()
            ),
        )
        .unwrap();

        let outcome = store.setup(&SetupSource::File(file)).unwrap();

        assert_eq!(
            outcome.message,
            "Successfully loaded 1 projects from configuration file"
        );
        assert_eq!(store.load(), outcome.registry);
        assert_eq!(store.load().projects()[0].target_branch, "develop");
    }
}
