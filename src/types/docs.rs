use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// 文档主题分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocCategory {
    Requirements,
    Architecture,
    Api,
    General,
}

impl DocCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocCategory::Requirements => "requirements",
            DocCategory::Architecture => "architecture",
            DocCategory::Api => "api",
            DocCategory::General => "general",
        }
    }
}

/// 文档目录下的一个文档
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentEntry {
    pub name: String,
    pub category: DocCategory,
    /// 前 N 个字符，供报告展示
    pub excerpt: String,
    pub full_text: String,
}

impl DocumentEntry {
    /// File name without its last extension (`api-v2.md` -> `api-v2`).
    pub fn stem(&self) -> &str {
        strip_extension(&self.name)
    }

    /// Case-insensitive search over the full text.
    pub fn mentions_any(&self, terms: &[&str]) -> bool {
        let lower = self.full_text.to_lowercase();
        terms.iter().any(|term| lower.contains(term))
    }
}

/// Removes a trailing `.ext` where `ext` contains neither `/` nor `.`.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx + 1..].contains('/') => &name[..idx],
        _ => name,
    }
}

/// 项目文档集合
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentationCorpus {
    pub has_documents: bool,
    pub documents: Vec<DocumentEntry>,
}

impl DocumentationCorpus {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn new(documents: Vec<DocumentEntry>) -> Self {
        Self {
            has_documents: true,
            documents,
        }
    }

    pub fn by_category(&self, category: DocCategory) -> impl Iterator<Item = &DocumentEntry> {
        self.documents.iter().filter(move |doc| doc.category == category)
    }

    pub fn requirements(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.by_category(DocCategory::Requirements)
    }

    pub fn architecture(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.by_category(DocCategory::Architecture)
    }

    pub fn apis(&self) -> impl Iterator<Item = &DocumentEntry> {
        self.by_category(DocCategory::Api)
    }

    /// Number of documents (of any category) whose text mentions one of `terms`.
    pub fn count_mentioning(&self, terms: &[&str]) -> usize {
        self.documents.iter().filter(|doc| doc.mentions_any(terms)).count()
    }
}

// The filtered views are emitted as their own sequences so report consumers
// see `requirements` / `architecture` / `apis` without recomputing them.
impl Serialize for DocumentationCorpus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("DocumentationCorpus", 5)?;
        state.serialize_field("hasDocuments", &self.has_documents)?;
        state.serialize_field("documents", &self.documents)?;
        state.serialize_field("requirements", &self.requirements().collect::<Vec<_>>())?;
        state.serialize_field("architecture", &self.architecture().collect::<Vec<_>>())?;
        state.serialize_field("apis", &self.apis().collect::<Vec<_>>())?;
        state.end()
    }
}
