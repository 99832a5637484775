//! 变更分类：把 diff 统计转换为带风险等级的 [`FileChange`]

use crate::types::{DiffFileStat, FileChange, FileType, Level};

/// 超过该行数为 medium
pub const MEDIUM_RISK_THRESHOLD: u64 = 50;
/// 超过该行数为 high
pub const HIGH_RISK_THRESHOLD: u64 = 100;

/// Case-sensitive path markers that force a change to `high`.
const SENSITIVE_PATH_MARKERS: &[&str] = &["config", "env"];

/// 根据路径和变更行数计算风险等级
pub fn risk_level_for(path: &str, changes: u64) -> Level {
    if SENSITIVE_PATH_MARKERS.iter().any(|marker| path.contains(marker)) {
        return Level::High;
    }
    if changes > HIGH_RISK_THRESHOLD {
        Level::High
    } else if changes > MEDIUM_RISK_THRESHOLD {
        Level::Medium
    } else {
        Level::Low
    }
}

pub fn classify(stat: &DiffFileStat) -> FileChange {
    let changes = stat.insertions + stat.deletions;
    FileChange {
        file: stat.path.clone(),
        additions: stat.insertions,
        deletions: stat.deletions,
        changes,
        file_type: FileType::from_path(&stat.path),
        risk_level: risk_level_for(&stat.path, changes),
    }
}

/// Classifies every file and orders the result by `changes`, largest first.
/// Ties keep their input order.
pub fn classify_changes(stats: &[DiffFileStat]) -> Vec<FileChange> {
    let mut changes: Vec<FileChange> = stats.iter().map(classify).collect();
    changes.sort_by(|a, b| b.changes.cmp(&a.changes));
    changes
}
