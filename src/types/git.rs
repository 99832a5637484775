use serde::{Deserialize, Serialize};

/// 两个分支之间的对比范围（三点语法，基于 merge-base）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRange {
    pub base: String,
    pub target: String,
}

impl DiffRange {
    pub fn new(base: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            target: target.into(),
        }
    }
}

impl std::fmt::Display for DiffRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}...{}", self.base, self.target)
    }
}

/// 单个文件的 diff 统计
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffFileStat {
    pub path: String,
    pub insertions: u64,
    pub deletions: u64,
}

impl DiffFileStat {
    pub fn new(path: impl Into<String>, insertions: u64, deletions: u64) -> Self {
        Self {
            path: path.into(),
            insertions,
            deletions,
        }
    }
}

/// 工作区状态快照
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitStatusSnapshot {
    /// 当前分支，detached HEAD 时为 None
    pub current: Option<String>,
    pub ahead: u32,
    pub behind: u32,
    pub modified: u32,
    pub staged: u32,
}
