//! 项目注册表：从环境变量或项目文件加载需要分析的项目列表

use serde::{Deserialize, Serialize};
use std::{
    collections::HashMap,
    env,
    path::{Path, PathBuf},
};

use super::loader::read_structured;
use crate::errors::ConfigError;
use crate::git::is_repository_root;
use crate::types::Project;

pub const ENV_PROJECTS: [&str; 2] = ["TEAM_PROJECTS", "PROJECTS"];
pub const ENV_BASE_BRANCH: [&str; 2] = ["TEAM_BASE_BRANCH", "BASE_BRANCH"];
pub const ENV_TARGET_BRANCH: [&str; 2] = ["TEAM_TARGET_BRANCH", "TARGET_BRANCH"];

pub const DEFAULT_BASE_BRANCH: &str = "main";
pub const DEFAULT_TARGET_BRANCH: &str = "develop";

const ENTRY_SEPARATOR: char = '|';
const FIELD_SEPARATOR: char = ':';

/// 项目文件中的单个条目
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectEntry {
    name: Option<String>,
    path: Option<String>,
    #[serde(alias = "base_branch")]
    base_branch: Option<String>,
    #[serde(alias = "target_branch")]
    target_branch: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ProjectFile {
    #[serde(default)]
    projects: Vec<ProjectEntry>,
}

/// 单个项目的校验问题
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectIssue {
    pub project: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub valid_projects: Vec<Project>,
    pub issues: Vec<ProjectIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn message(&self) -> String {
        self.summary(true)
    }

    /// 校验结论；`show_details` 为 true 时附带每个项目的问题
    pub fn summary(&self, show_details: bool) -> String {
        let total = self.valid_projects.len() + self.issues.len();
        let mut message = format!(
            "Validation completed. {}/{} projects are valid.",
            self.valid_projects.len(),
            total
        );
        if show_details && !self.issues.is_empty() {
            message.push_str("\n\nIssues found:");
            for issue in &self.issues {
                message.push_str(&format!("\n- {}: {}", issue.project, issue.issues.join(", ")));
            }
        }
        message
    }
}

/// The ordered project list fed to the multi-project analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectRegistry {
    projects: Vec<Project>,
}

fn first_set(env_map: &HashMap<String, String>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env_map.get(*k))
        .map(|v| v.trim())
        .find(|v| !v.is_empty())
        .map(str::to_string)
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.map(str::trim).filter(|f| !f.is_empty())
}

fn resolve_path(raw: &str, cwd: &Path) -> PathBuf {
    let path = Path::new(raw.trim());
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

fn current_dir() -> Result<PathBuf, ConfigError> {
    env::current_dir()
        .map_err(|e| ConfigError::Other(format!("Cannot determine current directory: {}", e)))
}

/// 相对路径按当前目录解析
pub fn absolute_path(raw: &str) -> Result<PathBuf, ConfigError> {
    Ok(resolve_path(raw, &current_dir()?))
}

impl ProjectRegistry {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn into_projects(self) -> Vec<Project> {
        self.projects
    }

    pub fn find(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// 按名称新增或替换项目，返回是否替换了已有条目
    ///
    /// The project path must exist; replaced entries keep their position.
    pub fn upsert(&mut self, project: Project) -> Result<bool, ConfigError> {
        if project.name.trim().is_empty() {
            return Err(ConfigError::InvalidProject {
                entry: project.path.display().to_string(),
                reason: "name must not be empty".to_string(),
            });
        }
        if !project.path.exists() {
            return Err(ConfigError::InvalidProject {
                entry: project.name.clone(),
                reason: format!("Project path not found: {}", project.path.display()),
            });
        }

        match self.projects.iter_mut().find(|p| p.name == project.name) {
            Some(existing) => {
                *existing = project;
                Ok(true)
            }
            None => {
                self.projects.push(project);
                Ok(false)
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Result<Project, ConfigError> {
        let index = self
            .projects
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| ConfigError::ProjectNotFound(name.to_string()))?;
        Ok(self.projects.remove(index))
    }

    /// `TEAM_PROJECTS` 或 `PROJECTS` 是否已设置
    pub fn env_configured() -> bool {
        ENV_PROJECTS
            .iter()
            .any(|key| env::var(key).map(|v| !v.trim().is_empty()).unwrap_or(false))
    }

    /// 从进程环境变量加载
    pub fn from_env() -> Result<Self, ConfigError> {
        let env_map: HashMap<String, String> = ENV_PROJECTS
            .iter()
            .chain(ENV_BASE_BRANCH.iter())
            .chain(ENV_TARGET_BRANCH.iter())
            .filter_map(|key| env::var(key).ok().map(|v| (key.to_string(), v)))
            .collect();
        Self::from_env_map(&env_map, &current_dir()?)
    }

    /// `name:path[:base[:target]]` entries separated by `|`.
    ///
    /// Entries with fewer than two fields or a path that does not exist are
    /// skipped with a warning.
    pub fn from_env_map(env_map: &HashMap<String, String>, cwd: &Path) -> Result<Self, ConfigError> {
        let raw = first_set(env_map, &ENV_PROJECTS).ok_or(ConfigError::NoProjects)?;
        let default_base =
            first_set(env_map, &ENV_BASE_BRANCH).unwrap_or_else(|| DEFAULT_BASE_BRANCH.to_string());
        let default_target = first_set(env_map, &ENV_TARGET_BRANCH)
            .unwrap_or_else(|| DEFAULT_TARGET_BRANCH.to_string());

        let mut projects = Vec::new();
        for entry in raw.split(ENTRY_SEPARATOR).filter(|e| !e.trim().is_empty()) {
            let parts: Vec<&str> = entry.split(FIELD_SEPARATOR).collect();
            let (Some(name), Some(path)) = (
                non_empty(parts.first().copied()),
                non_empty(parts.get(1).copied()),
            ) else {
                tracing::warn!("Invalid project entry: {}. Skipping.", entry);
                continue;
            };

            let full_path = resolve_path(path, cwd);
            if !full_path.exists() {
                tracing::warn!(
                    "Project path not found: {}. Skipping {}.",
                    full_path.display(),
                    name
                );
                continue;
            }

            let base = non_empty(parts.get(2).copied()).unwrap_or(default_base.as_str());
            let target = non_empty(parts.get(3).copied()).unwrap_or(default_target.as_str());
            projects.push(Project::new(name, full_path, base, target));
        }

        if projects.is_empty() {
            return Err(ConfigError::NoProjects);
        }

        tracing::info!("从环境变量加载了 {} 个项目", projects.len());
        Ok(Self { projects })
    }

    /// 从 JSON (`{"projects": [...]}`) 或 TOML (`[[projects]]`) 项目文件加载
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_file_in(path, &current_dir()?)
    }

    pub fn from_file_in(path: &Path, cwd: &Path) -> Result<Self, ConfigError> {
        let file: ProjectFile = read_structured(path)?;

        let mut projects = Vec::new();
        for entry in file.projects {
            let (Some(name), Some(raw_path)) =
                (non_empty(entry.name.as_deref()), non_empty(entry.path.as_deref()))
            else {
                tracing::warn!("Invalid project configuration: {:?}. Skipping.", entry);
                continue;
            };

            let full_path = resolve_path(raw_path, cwd);
            if !full_path.exists() {
                tracing::warn!(
                    "Project path not found: {}. Skipping {}.",
                    full_path.display(),
                    name
                );
                continue;
            }

            projects.push(Project::new(
                name,
                full_path,
                non_empty(entry.base_branch.as_deref()).unwrap_or(DEFAULT_BASE_BRANCH),
                non_empty(entry.target_branch.as_deref()).unwrap_or(DEFAULT_TARGET_BRANCH),
            ));
        }

        if projects.is_empty() {
            return Err(ConfigError::NoProjects);
        }

        tracing::info!("从 {} 加载了 {} 个项目", path.display(), projects.len());
        Ok(Self { projects })
    }

    /// 检查每个项目路径存在且是 Git 仓库
    pub fn validate(&self) -> ValidationReport {
        let (valid_projects, issues) = self.projects.iter().fold(
            (Vec::new(), Vec::new()),
            |(mut valid, mut issues), project| {
                let problem = if !project.path.exists() {
                    Some(format!("Path not found: {}", project.path.display()))
                } else if !is_repository_root(&project.path) {
                    Some("Not a Git repository".to_string())
                } else {
                    None
                };

                match problem {
                    Some(problem) => issues.push(ProjectIssue {
                        project: project.name.clone(),
                        issues: vec![problem],
                    }),
                    None => valid.push(project.clone()),
                }
                (valid, issues)
            },
        );

        ValidationReport {
            valid_projects,
            issues,
        }
    }
}
