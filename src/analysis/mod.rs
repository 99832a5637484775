//! 多项目分支差异分析引擎
//!
//! 流程：[`ProjectAnalyzer::analyze_multiple_projects`] 依次（或有限并发）调用
//! [`ProjectAnalyzer::analyze_project`]，后者负责 VCS 数据获取、变更分类、
//! 文档索引以及风险与优化建议的生成。

pub mod classifier;
pub mod diagnostics;
pub mod docs;
pub mod matching;
pub mod multi;
pub mod optimization;
pub mod project;
pub mod risk;

pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticKind, DiagnosticSink, TracingSink};
pub use docs::{DocumentationConfig, DocumentationIndexer};
pub use matching::MatchPolicy;
pub use multi::{aggregate, validate_projects};
pub use optimization::{OptimizationEngine, OptimizationRule};
pub use project::{AnalysisOptions, ProjectAnalyzer};
pub use risk::{RiskEngine, RiskRule};
