use serde::{Deserialize, Serialize};

use crate::types::DocumentEntry;

/// 文档与变更文件之间的关联策略
///
/// A document is related to a changed path when its file stem occurs in the
/// path, or when its text mentions the path. Both directions can be switched
/// off, and stems shorter than `min_name_len` characters never match by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchPolicy {
    pub name_in_path: bool,
    pub path_in_content: bool,
    pub min_name_len: usize,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            name_in_path: true,
            path_in_content: true,
            min_name_len: 1,
        }
    }
}

impl MatchPolicy {
    /// `needle` is the lowercased text searched for in the document body.
    pub fn is_related(&self, doc: &DocumentEntry, path: &str, needle: &str) -> bool {
        let stem = doc.stem();
        let by_name =
            self.name_in_path && stem.chars().count() >= self.min_name_len && path.contains(stem);
        if by_name {
            return true;
        }
        self.path_in_content && !needle.is_empty() && doc.full_text.to_lowercase().contains(needle)
    }

    pub fn count_related<'a>(
        &self,
        docs: impl Iterator<Item = &'a DocumentEntry>,
        path: &str,
        needle: &str,
    ) -> usize {
        docs.filter(|doc| self.is_related(doc, path, needle)).count()
    }
}
