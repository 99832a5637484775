//! 版本控制适配层
//!
//! 分析引擎只依赖 [`VcsClient`]，默认实现 [`GitCli`] 通过 `git` 命令行获取数据。

pub mod diff;
pub mod operations;
pub mod repository;

pub use diff::parse_numstat;
pub use operations::{parse_branch_list, parse_status_porcelain, GitCli};
pub use repository::is_repository_root;

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;

use crate::errors::GitError;
use crate::types::{DiffFileStat, DiffRange, GitStatusSnapshot};

/// 分析引擎所需的 VCS 能力
#[async_trait]
pub trait VcsClient: Send + Sync {
    /// 获取工作区状态
    async fn status(&self, repo: &Path) -> Result<GitStatusSnapshot, GitError>;

    /// 本地分支名称（不含 remotes/）
    async fn local_branches(&self, repo: &Path) -> Result<BTreeSet<String>, GitError>;

    /// 每个文件的增删行数
    async fn diff_summary(
        &self,
        repo: &Path,
        range: &DiffRange,
    ) -> Result<Vec<DiffFileStat>, GitError>;

    /// 原始 diff 文本
    async fn diff_text(&self, repo: &Path, range: &DiffRange) -> Result<String, GitError>;
}
