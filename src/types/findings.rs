use serde::{Deserialize, Serialize};

use super::general::Level;

/// 风险类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskType {
    Authentication,
    LargeChange,
    TestReduction,
    ApiChange,
}

impl RiskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskType::Authentication => "authentication",
            RiskType::LargeChange => "large-change",
            RiskType::TestReduction => "test-reduction",
            RiskType::ApiChange => "api-change",
        }
    }
}

/// 风险分组
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskBucket {
    Security,
    Performance,
    CodeQuality,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskFinding {
    pub file: String,
    #[serde(rename = "type")]
    pub risk_type: RiskType,
    pub message: String,
    /// 没有相关文档佐证时为空字符串
    pub context_info: String,
    pub severity: Level,
}

/// 按来源分组的风险
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskReport {
    pub security: Vec<RiskFinding>,
    pub performance: Vec<RiskFinding>,
    pub code_quality: Vec<RiskFinding>,
    pub total: usize,
}

impl RiskReport {
    /// Builds a report from bucketed findings; `total` is always the sum of the buckets.
    pub fn from_findings(findings: impl IntoIterator<Item = (RiskBucket, RiskFinding)>) -> Self {
        let mut report = RiskReport::default();
        for (bucket, finding) in findings {
            match bucket {
                RiskBucket::Security => report.security.push(finding),
                RiskBucket::Performance => report.performance.push(finding),
                RiskBucket::CodeQuality => report.code_quality.push(finding),
            }
        }
        report.total = report.security.len() + report.performance.len() + report.code_quality.len();
        report
    }

    pub fn iter(&self) -> impl Iterator<Item = &RiskFinding> {
        self.security
            .iter()
            .chain(self.performance.iter())
            .chain(self.code_quality.iter())
    }
}

/// 优化建议类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OptimizationType {
    CodeQuality,
    Architecture,
    RequirementsAlignment,
}

impl OptimizationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptimizationType::CodeQuality => "code-quality",
            OptimizationType::Architecture => "architecture",
            OptimizationType::RequirementsAlignment => "requirements-alignment",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizationSuggestion {
    pub file: String,
    #[serde(rename = "type")]
    pub suggestion_type: OptimizationType,
    pub suggestion: String,
    pub reasoning: String,
    pub priority: Level,
}
