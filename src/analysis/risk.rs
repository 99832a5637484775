//! 风险识别
//!
//! 每条规则独立评估单个文件，文档只用于补充 `context_info`，
//! 不会抑制基础风险。

use super::matching::MatchPolicy;
use crate::types::{
    DocumentationCorpus, FileChange, Level, RiskBucket, RiskFinding, RiskReport, RiskType,
};

/// 超过该行数视为大规模变更
pub const LARGE_CHANGE_THRESHOLD: u64 = 100;

pub trait RiskRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// 规则产出归属的分组
    fn bucket(&self) -> RiskBucket;

    fn evaluate(&self, change: &FileChange, docs: &DocumentationCorpus) -> Option<RiskFinding>;
}

fn finding(
    change: &FileChange,
    risk_type: RiskType,
    message: String,
    context_info: String,
    severity: Level,
) -> RiskFinding {
    RiskFinding {
        file: change.file.clone(),
        risk_type,
        message,
        context_info,
        severity,
    }
}

/// 认证/登录相关文件
pub struct AuthenticationRule;

impl RiskRule for AuthenticationRule {
    fn name(&self) -> &'static str {
        "authentication"
    }

    fn bucket(&self) -> RiskBucket {
        RiskBucket::Security
    }

    fn evaluate(&self, change: &FileChange, docs: &DocumentationCorpus) -> Option<RiskFinding> {
        if !(change.file.contains("auth") || change.file.contains("login")) {
            return None;
        }

        let related = docs.count_mentioning(&["auth", "security", "login"]);
        let context_info = if related > 0 {
            format!(
                "Found {} security-related documents. Please ensure changes align with documented security requirements.",
                related
            )
        } else {
            String::new()
        };

        Some(finding(
            change,
            RiskType::Authentication,
            "Authentication related changes detected".to_string(),
            context_info,
            Level::High,
        ))
    }
}

pub struct LargeChangeRule {
    pub threshold: u64,
}

impl Default for LargeChangeRule {
    fn default() -> Self {
        Self {
            threshold: LARGE_CHANGE_THRESHOLD,
        }
    }
}

impl RiskRule for LargeChangeRule {
    fn name(&self) -> &'static str {
        "large-change"
    }

    fn bucket(&self) -> RiskBucket {
        RiskBucket::Performance
    }

    fn evaluate(&self, change: &FileChange, docs: &DocumentationCorpus) -> Option<RiskFinding> {
        if change.changes <= self.threshold {
            return None;
        }

        let related = docs.count_mentioning(&["performance", "optimization", "性能"]);
        let context_info = if related > 0 {
            format!(
                "Found {} performance-related documents. Consider reviewing performance requirements before deploying large changes.",
                related
            )
        } else {
            String::new()
        };

        Some(finding(
            change,
            RiskType::LargeChange,
            format!("Large changes ({} lines) may affect performance", change.changes),
            context_info,
            Level::Medium,
        ))
    }
}

/// 测试文件删除多于新增
pub struct TestReductionRule;

impl RiskRule for TestReductionRule {
    fn name(&self) -> &'static str {
        "test-reduction"
    }

    fn bucket(&self) -> RiskBucket {
        RiskBucket::CodeQuality
    }

    fn evaluate(&self, change: &FileChange, docs: &DocumentationCorpus) -> Option<RiskFinding> {
        if !(change.file.contains("test") && change.deletions > change.additions) {
            return None;
        }

        let related = docs.count_mentioning(&["test", "testing", "测试"]);
        let context_info = if related > 0 {
            format!(
                "Found {} testing documents. Please ensure test coverage requirements are maintained.",
                related
            )
        } else {
            String::new()
        };

        Some(finding(
            change,
            RiskType::TestReduction,
            "Test code reduction detected".to_string(),
            context_info,
            Level::High,
        ))
    }
}

/// API 文件变更且存在对应的 API 文档
pub struct ApiChangeRule {
    pub policy: MatchPolicy,
}

impl RiskRule for ApiChangeRule {
    fn name(&self) -> &'static str {
        "api-change"
    }

    fn bucket(&self) -> RiskBucket {
        RiskBucket::Security
    }

    fn evaluate(&self, change: &FileChange, docs: &DocumentationCorpus) -> Option<RiskFinding> {
        if !change.file.contains("api") {
            return None;
        }

        let needle = change.file.to_lowercase();
        let related = self.policy.count_related(docs.apis(), &change.file, &needle);
        if related == 0 {
            return None;
        }

        Some(finding(
            change,
            RiskType::ApiChange,
            "API changes detected with existing documentation".to_string(),
            format!(
                "Found {} related API documents. Ensure changes are backward compatible and documented.",
                related
            ),
            Level::Medium,
        ))
    }
}

pub struct RiskEngine {
    rules: Vec<Box<dyn RiskRule>>,
}

impl RiskEngine {
    /// 默认规则集
    pub fn new(policy: MatchPolicy) -> Self {
        Self::with_rules(vec![
            Box::new(AuthenticationRule),
            Box::new(LargeChangeRule::default()),
            Box::new(TestReductionRule),
            Box::new(ApiChangeRule { policy }),
        ])
    }

    pub fn with_rules(rules: Vec<Box<dyn RiskRule>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn analyze(&self, changes: &[FileChange], docs: &DocumentationCorpus) -> RiskReport {
        RiskReport::from_findings(changes.iter().flat_map(|change| {
            self.rules.iter().filter_map(move |rule| {
                rule.evaluate(change, docs)
                    .map(|finding| (rule.bucket(), finding))
            })
        }))
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(MatchPolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::classifier::classify;
    use crate::types::{DiffFileStat, DocCategory, DocumentEntry};

    fn change(path: &str, insertions: u64, deletions: u64) -> FileChange {
        classify(&DiffFileStat::new(path, insertions, deletions))
    }

    fn doc(name: &str, category: DocCategory, text: &str) -> DocumentEntry {
        DocumentEntry {
            name: name.to_string(),
            category,
            excerpt: text.to_string(),
            full_text: text.to_string(),
        }
    }

    #[test]
    fn test_auth_and_large_change_on_same_file() {
        let report = RiskEngine::default().analyze(
            &[change("src/auth/login.js", 120, 10)],
            &DocumentationCorpus::empty(),
        );

        assert_eq!(report.security.len(), 1);
        assert_eq!(report.security[0].risk_type, RiskType::Authentication);
        assert_eq!(report.security[0].severity, Level::High);
        assert!(report.security[0].context_info.is_empty());

        assert_eq!(report.performance.len(), 1);
        assert_eq!(report.performance[0].message, "Large changes (130 lines) may affect performance");
        assert_eq!(report.total, 2);
    }

    #[test]
    fn test_context_info_from_documents() {
        let docs = DocumentationCorpus::new(vec![
            doc("security.md", DocCategory::General, "Security policy"),
            doc("perf.md", DocCategory::General, "Performance budget"),
            doc("qa.md", DocCategory::General, "Testing strategy"),
        ]);
        let report = RiskEngine::default().analyze(
            &[change("src/login.js", 150, 1), change("tests/login_test.js", 1, 20)],
            &docs,
        );

        // both files match the login marker
        assert_eq!(report.security.len(), 2);
        assert!(report.security[0].context_info.contains("Found 1 security-related"));
        assert!(report.performance[0].context_info.contains("Found 1 performance-related"));
        assert_eq!(report.code_quality.len(), 1);
        assert_eq!(report.code_quality[0].file, "tests/login_test.js");
        assert!(report.code_quality[0].context_info.contains("testing documents"));
    }

    #[test]
    fn test_test_reduction_requires_more_deletions() {
        let engine = RiskEngine::default();
        let docs = DocumentationCorpus::empty();
        assert_eq!(engine.analyze(&[change("test/a.py", 5, 5)], &docs).total, 0);
        assert_eq!(engine.analyze(&[change("test/a.py", 4, 5)], &docs).code_quality.len(), 1);
        // case-sensitive marker
        assert_eq!(engine.analyze(&[change("Test/a.py", 0, 5)], &docs).total, 0);
    }

    #[test]
    fn test_api_change_needs_related_api_doc() {
        let engine = RiskEngine::default();
        let file = change("src/api/users.js", 3, 1);

        let unrelated = DocumentationCorpus::new(vec![doc("orders.md", DocCategory::Api, "orders endpoint")]);
        assert_eq!(engine.analyze(std::slice::from_ref(&file), &unrelated).total, 0);

        let by_name = DocumentationCorpus::new(vec![
            doc("users.md", DocCategory::Api, "users endpoint"),
            doc("users-req.md", DocCategory::Requirements, "users"),
        ]);
        let report = engine.analyze(std::slice::from_ref(&file), &by_name);
        assert_eq!(report.security.len(), 1);
        assert_eq!(report.security[0].risk_type, RiskType::ApiChange);
        assert_eq!(report.security[0].severity, Level::Medium);
        assert!(report.security[0].context_info.starts_with("Found 1 related API documents"));

        let by_content = DocumentationCorpus::new(vec![doc(
            "reference.md",
            DocCategory::Api,
            "Handlers live in SRC/API/USERS.JS",
        )]);
        assert_eq!(engine.analyze(&[file], &by_content).security.len(), 1);
    }

    #[test]
    fn test_total_is_sum_of_buckets() {
        let changes = vec![
            change("src/auth/api/token_test.js", 10, 200),
            change("src/component/Big.vue", 90, 30),
        ];
        let docs = DocumentationCorpus::new(vec![doc("token_test.md", DocCategory::Api, "")]);
        let report = RiskEngine::default().analyze(&changes, &docs);
        assert_eq!(
            report.total,
            report.security.len() + report.performance.len() + report.code_quality.len()
        );
        // auth, api-change, 2x large-change, test-reduction
        assert_eq!(report.total, 5);
        assert_eq!(report.security[0].risk_type, RiskType::Authentication);
        assert_eq!(report.security[1].risk_type, RiskType::ApiChange);
    }

    #[test]
    fn test_custom_rule_set() {
        let engine = RiskEngine::with_rules(vec![Box::new(LargeChangeRule { threshold: 5 })]);
        assert_eq!(engine.rule_names(), vec!["large-change"]);
        let report = engine.analyze(&[change("src/auth.js", 3, 3)], &DocumentationCorpus::empty());
        assert_eq!(report.total, 1);
        assert!(report.security.is_empty());
    }
}
