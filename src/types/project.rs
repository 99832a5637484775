use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// 项目描述：仓库名称、路径以及需要对比的两个分支
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    pub path: PathBuf,
    pub base_branch: String,
    pub target_branch: String,
}

impl Project {
    pub fn new(
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        base_branch: impl Into<String>,
        target_branch: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            base_branch: base_branch.into(),
            target_branch: target_branch.into(),
        }
    }

    /// `base -> target`, as shown in summary rows
    pub fn branch_label(&self) -> String {
        format!("{} -> {}", self.base_branch, self.target_branch)
    }
}
