use std::path::PathBuf;

use thiserror::Error;

use crate::types::general::CommandOutput;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Git analysis failed: {0}")]
    Git(#[from] GitError),
    #[error("I/O error while {0}: {1}")]
    IO(String, #[source] std::io::Error), // For generic I/O errors not covered by specific types
    #[error("Application error: {0}")]
    Generic(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No projects configured. Set TEAM_PROJECTS=\"name1:path1:base1:target1|name2:path2\" or pass a project file")]
    NoProjects,
    #[error("No projects configured. Run setup or add a project first")]
    EmptyRegistry,
    #[error("Invalid project entry '{entry}': {reason}")]
    InvalidProject { entry: String, reason: String },
    #[error("Project not found: {0}")]
    ProjectNotFound(String),
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to write file '{0}': {1}")]
    FileWrite(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Failed to parse JSON from file '{0}': {1}")]
    JsonParse(String, #[source] serde_json::Error),
    #[error("Unsupported configuration format for '{0}' (expected .json or .toml)")]
    UnsupportedFormat(String),
    #[error("Other Config Error: {0}")]
    Other(String),
}

/// 分支在对比中的角色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BranchRole {
    Base,
    Target,
}

impl std::fmt::Display for BranchRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BranchRole::Base => write!(f, "Base"),
            BranchRole::Target => write!(f, "Target"),
        }
    }
}

#[derive(Debug)]
pub enum GitError {
    CommandFailed {
        command: String,
        status_code: Option<i32>,
        stdout: String,
        stderr: String,
    },
    /// The `git` binary could not be started at all.
    Spawn(String, std::io::Error),
    NotARepository(PathBuf),
    BranchNotFound { role: BranchRole, branch: String },
    Other(String),
}

impl GitError {
    /// True when the failure is a missing local branch rather than a generic VCS failure.
    pub fn is_missing_branch(&self) -> bool {
        matches!(self, GitError::BranchNotFound { .. })
    }
}

impl std::fmt::Display for GitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GitError::CommandFailed {
                command,
                status_code,
                stdout,
                stderr,
            } => {
                write!(f, "Git command '{}' failed", command)?;
                if let Some(c) = status_code {
                    write!(f, " with exit code {}", c)?;
                }
                if !stdout.is_empty() {
                    write!(f, "\nStdout:\n{}", stdout)?;
                }
                if !stderr.is_empty() {
                    write!(f, "\nStderr:\n{}", stderr)?;
                }
                Ok(())
            }
            GitError::Spawn(command, e) => write!(f, "Failed to run '{}': {}", command, e),
            GitError::NotARepository(path) => {
                write!(f, "Not a git repository: {}", path.display())
            }
            GitError::BranchNotFound { role, branch } => {
                write!(f, "{} branch '{}' not found", role, branch)
            }
            GitError::Other(s) => write!(f, "Git error: {}", s),
        }
    }
}

impl std::error::Error for GitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GitError::Spawn(_, e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    /// Converts a `std::io::Error` into an `AppError::IO` with a default context message.
    fn from(err: std::io::Error) -> Self {
        AppError::IO("I/O operation failed".to_string(), err)
    }
}

/// Converts a captured `CommandOutput` into a `GitError::CommandFailed`.
///
/// If the process was terminated by a signal, `status_code` will be `None`.
pub fn map_command_output_error(cmd_str: &str, output: CommandOutput) -> GitError {
    GitError::CommandFailed {
        command: cmd_str.to_string(),
        status_code: output.status.code(),
        stdout: output.stdout,
        stderr: output.stderr,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_toml_error() -> toml::de::Error {
        toml::from_str::<toml::Value>("invalid_toml").err().unwrap()
    }

    #[test]
    fn test_config_error_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err_file_read = ConfigError::FileRead("projects.json".to_string(), io_err);
        assert_eq!(
            format!("{}", err_file_read),
            "Failed to read file 'projects.json': file not found"
        );

        let err_toml_parse = ConfigError::TomlParse("config.toml".to_string(), mock_toml_error());
        assert!(format!("{}", err_toml_parse)
            .starts_with("Failed to parse TOML from file 'config.toml': "));

        let err_invalid = ConfigError::InvalidProject {
            entry: "web".to_string(),
            reason: "name must not be empty".to_string(),
        };
        assert_eq!(
            format!("{}", err_invalid),
            "Invalid project entry 'web': name must not be empty"
        );

        assert!(format!("{}", ConfigError::NoProjects).starts_with("No projects configured"));
        assert_eq!(
            format!("{}", ConfigError::ProjectNotFound("web".to_string())),
            "Project not found: web"
        );
    }

    #[test]
    fn test_git_error_display() {
        let err_branch = GitError::BranchNotFound {
            role: BranchRole::Target,
            branch: "develop".to_string(),
        };
        assert_eq!(format!("{}", err_branch), "Target branch 'develop' not found");
        assert!(err_branch.is_missing_branch());

        let err_not_repo = GitError::NotARepository(PathBuf::from("/tmp/nowhere"));
        assert_eq!(format!("{}", err_not_repo), "Not a git repository: /tmp/nowhere");
        assert!(!err_not_repo.is_missing_branch());

        let err_cmd_failed = GitError::CommandFailed {
            command: "git status".to_string(),
            status_code: Some(128),
            stdout: "".to_string(),
            stderr: "fatal error".to_string(),
        };
        assert_eq!(
            format!("{}", err_cmd_failed),
            "Git command 'git status' failed with exit code 128\nStderr:\nfatal error"
        );

        // Process terminated by signal
        let err_no_status = GitError::CommandFailed {
            command: "git diff".to_string(),
            status_code: None,
            stdout: "partial".to_string(),
            stderr: "Terminated".to_string(),
        };
        assert_eq!(
            format!("{}", err_no_status),
            "Git command 'git diff' failed\nStdout:\npartial\nStderr:\nTerminated"
        );

        let err_other = GitError::Other("Some other issue".to_string());
        assert_eq!(format!("{}", err_other), "Git error: Some other issue");
    }

    #[test]
    fn test_app_error_display() {
        let app_config_err = AppError::from(ConfigError::NoProjects);
        assert!(format!("{}", app_config_err).starts_with("Configuration error: No projects"));

        let app_git_err = AppError::from(GitError::BranchNotFound {
            role: BranchRole::Base,
            branch: "main".to_string(),
        });
        assert_eq!(
            format!("{}", app_git_err),
            "Git analysis failed: Base branch 'main' not found"
        );

        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe broke");
        let app_io_err: AppError = io_err.into();
        assert_eq!(
            format!("{}", app_io_err),
            "I/O error while I/O operation failed: pipe broke"
        );

        let app_generic_err = AppError::Generic("Something went wrong".to_string());
        assert_eq!(
            format!("{}", app_generic_err),
            "Application error: Something went wrong"
        );
    }
}
