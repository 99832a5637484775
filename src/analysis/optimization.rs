//! 优化建议生成，同一文件的多条建议相互独立、可叠加

use super::matching::MatchPolicy;
use crate::types::{
    docs::strip_extension, DocumentationCorpus, FileChange, FileType, Level,
    OptimizationSuggestion, OptimizationType,
};

/// 组件拆分建议的行数阈值
pub const LARGE_COMPONENT_THRESHOLD: u64 = 50;

pub trait OptimizationRule: Send + Sync {
    fn name(&self) -> &'static str;

    fn evaluate(
        &self,
        change: &FileChange,
        docs: &DocumentationCorpus,
    ) -> Option<OptimizationSuggestion>;
}

fn architecture_mentions(docs: &DocumentationCorpus, terms: &[&str]) -> bool {
    docs.architecture().any(|doc| doc.mentions_any(terms))
}

pub struct ModernJavascriptRule;

impl OptimizationRule for ModernJavascriptRule {
    fn name(&self) -> &'static str {
        "modern-javascript"
    }

    fn evaluate(
        &self,
        change: &FileChange,
        docs: &DocumentationCorpus,
    ) -> Option<OptimizationSuggestion> {
        if change.file_type != FileType::Javascript {
            return None;
        }

        let mut reasoning =
            "Modern JavaScript features improve code readability and performance".to_string();
        if architecture_mentions(docs, &["javascript", "frontend", "前端"]) {
            reasoning.push_str(". Architecture documentation suggests following modern JS patterns.");
        }

        Some(OptimizationSuggestion {
            file: change.file.clone(),
            suggestion_type: OptimizationType::CodeQuality,
            suggestion: "Consider using modern ES6+ features".to_string(),
            reasoning,
            priority: Level::Medium,
        })
    }
}

pub struct ComponentSizeRule {
    pub threshold: u64,
}

impl Default for ComponentSizeRule {
    fn default() -> Self {
        Self {
            threshold: LARGE_COMPONENT_THRESHOLD,
        }
    }
}

impl OptimizationRule for ComponentSizeRule {
    fn name(&self) -> &'static str {
        "component-size"
    }

    fn evaluate(
        &self,
        change: &FileChange,
        docs: &DocumentationCorpus,
    ) -> Option<OptimizationSuggestion> {
        if !(change.file.contains("component") && change.changes > self.threshold) {
            return None;
        }

        let mut reasoning = "Smaller components are easier to maintain and test".to_string();
        if architecture_mentions(docs, &["component", "module", "组件"]) {
            reasoning
                .push_str(". Architecture documentation may contain component design guidelines.");
        }

        Some(OptimizationSuggestion {
            file: change.file.clone(),
            suggestion_type: OptimizationType::Architecture,
            suggestion: "Consider breaking large components into smaller ones".to_string(),
            reasoning,
            priority: Level::High,
        })
    }
}

/// 变更文件与需求文档相关时提示核对需求
pub struct RequirementsAlignmentRule {
    pub policy: MatchPolicy,
}

impl OptimizationRule for RequirementsAlignmentRule {
    fn name(&self) -> &'static str {
        "requirements-alignment"
    }

    fn evaluate(
        &self,
        change: &FileChange,
        docs: &DocumentationCorpus,
    ) -> Option<OptimizationSuggestion> {
        let lower = change.file.to_lowercase();
        let needle = strip_extension(&lower);
        let related = self
            .policy
            .count_related(docs.requirements(), &change.file, needle);
        if related == 0 {
            return None;
        }

        Some(OptimizationSuggestion {
            file: change.file.clone(),
            suggestion_type: OptimizationType::RequirementsAlignment,
            suggestion: "Verify implementation aligns with documented requirements".to_string(),
            reasoning: format!(
                "Found {} related requirement documents. Ensure implementation meets all specified criteria.",
                related
            ),
            priority: Level::High,
        })
    }
}

pub struct OptimizationEngine {
    rules: Vec<Box<dyn OptimizationRule>>,
}

impl OptimizationEngine {
    pub fn new(policy: MatchPolicy) -> Self {
        Self::with_rules(vec![
            Box::new(ModernJavascriptRule),
            Box::new(ComponentSizeRule::default()),
            Box::new(RequirementsAlignmentRule { policy }),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn OptimizationRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn suggest(
        &self,
        changes: &[FileChange],
        docs: &DocumentationCorpus,
    ) -> Vec<OptimizationSuggestion> {
        changes
            .iter()
            .flat_map(|change| {
                self.rules
                    .iter()
                    .filter_map(move |rule| rule.evaluate(change, docs))
            })
            .collect()
    }
}

impl Default for OptimizationEngine {
    fn default() -> Self {
        Self::new(MatchPolicy::default())
    }
}
