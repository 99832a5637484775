//! 文档索引：读取项目文档目录并按主题分类

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::diagnostics::{Diagnostic, DiagnosticKind, DiagnosticSink};
use crate::types::{DocCategory, DocumentEntry, DocumentationCorpus};

/// 文档目录配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentationConfig {
    /// 相对项目根目录的文档目录
    pub directory: String,
    /// 参与索引的扩展名（不含点，大小写不敏感）
    pub extensions: Vec<String>,
    /// 摘要保留的字符数
    pub excerpt_chars: usize,
}

impl Default for DocumentationConfig {
    fn default() -> Self {
        Self {
            directory: ".document".to_string(),
            extensions: vec!["md".to_string(), "txt".to_string()],
            excerpt_chars: 1000,
        }
    }
}

/// One `(predicate, category)` pair; the predicate matches when the lowercased
/// file name contains a name term or the lowercased content contains a content term.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: DocCategory,
    pub name_terms: &'static [&'static str],
    pub content_terms: &'static [&'static str],
}

impl CategoryRule {
    fn matches(&self, lower_name: &str, lower_content: &str) -> bool {
        self.name_terms.iter().any(|t| lower_name.contains(t))
            || self.content_terms.iter().any(|t| lower_content.contains(t))
    }
}

/// Evaluated in order; the first match wins.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: DocCategory::Requirements,
        name_terms: &["require", "需求"],
        content_terms: &["requirement", "需求"],
    },
    CategoryRule {
        category: DocCategory::Architecture,
        name_terms: &["arch", "设计"],
        content_terms: &["architecture", "design"],
    },
    CategoryRule {
        category: DocCategory::Api,
        name_terms: &["api"],
        content_terms: &["endpoint", "接口"],
    },
];

/// 根据文件名和内容分类，纯函数
pub fn categorize(filename: &str, content: &str) -> DocCategory {
    let lower_name = filename.to_lowercase();
    let lower_content = content.to_lowercase();

    CATEGORY_RULES
        .iter()
        .find(|rule| rule.matches(&lower_name, &lower_content))
        .map(|rule| rule.category)
        .unwrap_or(DocCategory::General)
}

#[derive(Debug, Clone, Default)]
pub struct DocumentationIndexer {
    config: DocumentationConfig,
}

impl DocumentationIndexer {
    pub fn new(config: DocumentationConfig) -> Self {
        Self { config }
    }

    pub fn docs_dir(&self, project_root: &Path) -> PathBuf {
        project_root.join(&self.config.directory)
    }

    /// 索引项目文档。任何读取失败都只会降级为空/部分结果，并通过诊断通道报告。
    pub async fn index(
        &self,
        project_root: &Path,
        diagnostics: &dyn DiagnosticSink,
    ) -> DocumentationCorpus {
        let docs_dir = self.docs_dir(project_root);

        match tokio::fs::metadata(&docs_dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                tracing::debug!("文档路径不是目录: {}", docs_dir.display());
                return DocumentationCorpus::empty();
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("文档目录不存在: {}", docs_dir.display());
                return DocumentationCorpus::empty();
            }
            Err(e) => {
                diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticKind::DocumentationUnavailable,
                        format!("Failed to analyze documentation: {}", e),
                    )
                    .with_subject(&docs_dir),
                );
                return DocumentationCorpus::empty();
            }
        }

        let files = match self.list_candidates(&docs_dir, diagnostics).await {
            Some(files) => files,
            None => return DocumentationCorpus::empty(),
        };

        let mut documents = Vec::with_capacity(files.len());
        for (name, path) in files {
            match tokio::fs::read_to_string(&path).await {
                Ok(content) => documents.push(self.entry(name, content)),
                Err(e) => diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticKind::DocumentSkipped,
                        format!("Skipping unreadable document {}: {}", name, e),
                    )
                    .with_subject(&path),
                ),
            }
        }

        tracing::debug!(
            "已索引 {} 个文档: {}",
            documents.len(),
            docs_dir.display()
        );
        DocumentationCorpus::new(documents)
    }

    /// Direct child files with an accepted extension, sorted by name.
    /// `None` when the directory itself cannot be listed.
    async fn list_candidates(
        &self,
        docs_dir: &Path,
        diagnostics: &dyn DiagnosticSink,
    ) -> Option<Vec<(String, PathBuf)>> {
        let mut read_dir = match tokio::fs::read_dir(docs_dir).await {
            Ok(rd) => rd,
            Err(e) => {
                diagnostics.emit(
                    Diagnostic::new(
                        DiagnosticKind::DocumentationUnavailable,
                        format!("Failed to analyze documentation: {}", e),
                    )
                    .with_subject(docs_dir),
                );
                return None;
            }
        };

        let mut files = Vec::new();
        loop {
            let entry = match read_dir.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    diagnostics.emit(
                        Diagnostic::new(
                            DiagnosticKind::DocumentationUnavailable,
                            format!("Documentation listing interrupted: {}", e),
                        )
                        .with_subject(docs_dir),
                    );
                    break;
                }
            };

            let is_file = entry
                .file_type()
                .await
                .map(|ft| ft.is_file())
                .unwrap_or(false);
            let name = entry.file_name().to_string_lossy().to_string();
            if is_file && self.accepts(&name) {
                files.push((name, entry.path()));
            }
        }

        files.sort_by(|a, b| a.0.cmp(&b.0));
        Some(files)
    }

    fn accepts(&self, name: &str) -> bool {
        Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                self.config
                    .extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
            .unwrap_or(false)
    }

    fn entry(&self, name: String, content: String) -> DocumentEntry {
        DocumentEntry {
            category: categorize(&name, &content),
            excerpt: content.chars().take(self.config.excerpt_chars).collect(),
            full_text: content,
            name,
        }
    }
}
