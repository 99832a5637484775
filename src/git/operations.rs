use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

use super::{diff::parse_numstat, VcsClient};
use crate::errors::{map_command_output_error, GitError};
use crate::types::{CommandOutput, DiffFileStat, DiffRange, GitStatusSnapshot};

/// 基于 `git` 命令行的 [`VcsClient`] 实现
#[derive(Debug, Clone)]
pub struct GitCli {
    binary: String,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    pub fn new() -> Self {
        Self {
            binary: "git".to_string(),
        }
    }

    /// 使用指定的 git 可执行文件
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// 在仓库目录中执行 Git 命令
    async fn execute(&self, repo: &Path, args: &[&str]) -> Result<CommandOutput, GitError> {
        if !repo.is_dir() {
            return Err(GitError::NotARepository(repo.to_path_buf()));
        }

        let cmd_str = format!("git {}", args.join(" "));
        tracing::debug!("执行 Git 命令: {} (in {})", cmd_str, repo.display());

        let output = Command::new(&self.binary)
            .current_dir(repo)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| GitError::Spawn(cmd_str.clone(), e))?;

        let output = CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            status: output.status,
        };

        if !output.is_success() {
            if output.stderr.to_lowercase().contains("not a git repository") {
                return Err(GitError::NotARepository(repo.to_path_buf()));
            }
            tracing::warn!("Git 命令 '{}' 执行失败: {}", cmd_str, output.status);
            return Err(map_command_output_error(&cmd_str, output));
        }

        Ok(output)
    }
}

#[async_trait]
impl VcsClient for GitCli {
    async fn status(&self, repo: &Path) -> Result<GitStatusSnapshot, GitError> {
        let output = self.execute(repo, &["status", "--porcelain", "-b"]).await?;
        Ok(parse_status_porcelain(&output.stdout))
    }

    async fn local_branches(&self, repo: &Path) -> Result<BTreeSet<String>, GitError> {
        let output = self
            .execute(repo, &["branch", "--format=%(refname:short)"])
            .await?;
        Ok(parse_branch_list(&output.stdout))
    }

    async fn diff_summary(
        &self,
        repo: &Path,
        range: &DiffRange,
    ) -> Result<Vec<DiffFileStat>, GitError> {
        let range_arg = range.to_string();
        let output = self
            .execute(
                repo,
                &["-c", "core.quotePath=false", "diff", "--numstat", "-z", &range_arg, "--"],
            )
            .await?;
        Ok(parse_numstat(&output.stdout))
    }

    async fn diff_text(&self, repo: &Path, range: &DiffRange) -> Result<String, GitError> {
        let range_arg = range.to_string();
        let output = self
            .execute(repo, &["-c", "core.quotePath=false", "diff", &range_arg, "--"])
            .await?;
        Ok(output.stdout)
    }
}

/// 从 `git branch` 输出解析本地分支
///
/// Accepts both `--format=%(refname:short)` output and the default
/// `* main` listing; detached-HEAD markers and `remotes/` refs are dropped.
pub fn parse_branch_list(output: &str) -> BTreeSet<String> {
    output
        .lines()
        .map(|line| line.trim_start_matches(['*', '+']).trim())
        .filter(|name| !name.is_empty())
        .filter(|name| !name.starts_with('(') && !name.starts_with("remotes/"))
        .map(str::to_string)
        .collect()
}

/// 从 `git status --porcelain -b` 输出解析状态
pub fn parse_status_porcelain(output: &str) -> GitStatusSnapshot {
    let mut status = GitStatusSnapshot::default();

    for line in output.lines() {
        if let Some(header) = line.strip_prefix("## ") {
            let (current, ahead, behind) = parse_branch_header(header);
            status.current = current;
            status.ahead = ahead;
            status.behind = behind;
            continue;
        }

        if line.len() < 3 {
            continue;
        }

        let mut chars = line.chars();
        let index_status = chars.next().unwrap_or(' ');
        let worktree_status = chars.next().unwrap_or(' ');

        match (index_status, worktree_status) {
            ('?', '?') | ('!', '!') => {}
            (x, y) => {
                if "MADRCT".contains(x) {
                    status.staged += 1;
                }
                if x == 'M' || y == 'M' {
                    status.modified += 1;
                }
            }
        }
    }

    status
}

/// `main...origin/main [ahead 1, behind 2]`
fn parse_branch_header(header: &str) -> (Option<String>, u32, u32) {
    if header.starts_with("HEAD (no branch)") {
        return (None, 0, 0);
    }
    if let Some(branch) = header
        .strip_prefix("No commits yet on ")
        .or_else(|| header.strip_prefix("Initial commit on "))
    {
        return (Some(branch.trim().to_string()), 0, 0);
    }

    let (refs, tracking) = match header.find(" [") {
        Some(idx) => (&header[..idx], Some(&header[idx + 2..])),
        None => (header, None),
    };
    let current = refs.split("...").next().map(|b| b.trim().to_string());

    let mut ahead = 0;
    let mut behind = 0;
    if let Some(tracking) = tracking {
        for part in tracking.trim_end_matches(']').split(", ") {
            if let Some(n) = part.strip_prefix("ahead ") {
                ahead = n.trim().parse().unwrap_or(0);
            } else if let Some(n) = part.strip_prefix("behind ") {
                behind = n.trim().parse().unwrap_or(0);
            }
        }
    }

    (current.filter(|b| !b.is_empty()), ahead, behind)
}
