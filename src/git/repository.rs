// Git 仓库检测

use std::path::Path;

/// 路径本身是否为仓库根目录（存在 `.git` 目录或 worktree 的 `.git` 文件）
pub fn is_repository_root(path: &Path) -> bool {
    path.join(".git").exists()
}
