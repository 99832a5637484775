//! 可恢复错误的诊断通道
//!
//! 引擎在降级处理时（文档不可读、单个项目失败）向 [`DiagnosticSink`] 报告，
//! 返回的数据本身不受影响。

use parking_lot::Mutex;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// 文档目录存在但无法读取
    DocumentationUnavailable,
    /// 单个文档被跳过
    DocumentSkipped,
    /// 单个项目分析失败
    ProjectFailed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub project: Option<String>,
    pub subject: Option<PathBuf>,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            project: None,
            subject: None,
            message: message.into(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<PathBuf>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }
}

pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// 默认实现：转发到 tracing
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = ?diagnostic.kind,
            project = diagnostic.project.as_deref().unwrap_or("-"),
            subject = ?diagnostic.subject,
            "{}",
            diagnostic.message
        );
    }
}

/// 收集到内存中，便于测试断言
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.lock().iter().filter(|d| d.kind == kind).count()
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}

/// Tags every diagnostic passing through with the project it belongs to.
pub struct ProjectScope<'a> {
    inner: &'a dyn DiagnosticSink,
    project: &'a str,
}

impl<'a> ProjectScope<'a> {
    pub fn new(inner: &'a dyn DiagnosticSink, project: &'a str) -> Self {
        Self { inner, project }
    }
}

impl DiagnosticSink for ProjectScope<'_> {
    fn emit(&self, diagnostic: Diagnostic) {
        self.inner.emit(diagnostic.with_project(self.project));
    }
}
