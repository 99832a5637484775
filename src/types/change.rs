use serde::{Deserialize, Serialize};
use std::path::Path;

use super::general::Level;

/// 根据扩展名推断的文件类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    Javascript,
    Typescript,
    Vue,
    Python,
    Java,
    Stylesheet,
    Markup,
    Data,
    Documentation,
    Other,
}

impl FileType {
    /// Looks up the type from the file extension (case-insensitive).
    pub fn from_path(path: &str) -> Self {
        let ext = Path::new(path)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match ext.as_deref() {
            Some("js") | Some("jsx") => FileType::Javascript,
            Some("ts") | Some("tsx") => FileType::Typescript,
            Some("vue") => FileType::Vue,
            Some("py") => FileType::Python,
            Some("java") => FileType::Java,
            Some("css") => FileType::Stylesheet,
            Some("html") => FileType::Markup,
            Some("json") => FileType::Data,
            Some("md") => FileType::Documentation,
            _ => FileType::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FileType::Javascript => "javascript",
            FileType::Typescript => "typescript",
            FileType::Vue => "vue",
            FileType::Python => "python",
            FileType::Java => "java",
            FileType::Stylesheet => "stylesheet",
            FileType::Markup => "markup",
            FileType::Data => "data",
            FileType::Documentation => "documentation",
            FileType::Other => "other",
        }
    }
}

/// 单个文件的变更记录，创建后不再修改
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileChange {
    pub file: String,
    pub additions: u64,
    pub deletions: u64,
    pub changes: u64,
    #[serde(rename = "type")]
    pub file_type: FileType,
    pub risk_level: Level,
}
