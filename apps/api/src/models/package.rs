//! Output data models — question and tip records, quality scoring structures,
//! per-agent performance records, and the final interview package.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Free-form document analysis produced once per request.
/// Read-only for every downstream generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub analysis: String,
    pub status: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Technical,
    Behavioral,
    Situational,
    CulturalFit,
}

impl QuestionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::Technical => "technical",
            QuestionType::Behavioral => "behavioral",
            QuestionType::Situational => "situational",
            QuestionType::CulturalFit => "cultural_fit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Basic,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Basic => "basic",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
            Difficulty::Expert => "expert",
        }
    }
}

/// Five-score quality rubric applied to every generated question and tip.
/// All scores live in [0,1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub relevance: f64,
    pub clarity: f64,
    pub completeness: f64,
    pub consistency: f64,
    pub overall: f64,
}

impl QualityMetrics {
    pub fn uniform(score: f64) -> Self {
        Self {
            relevance: score,
            clarity: score,
            completeness: score,
            consistency: score,
            overall: score,
        }
    }

    /// Per-item fallback: deliberately below the 0.7 "acceptable" bar to
    /// signal degraded confidence.
    pub fn neutral() -> Self {
        Self::uniform(0.5)
    }

    pub fn zeroed() -> Self {
        Self::uniform(0.0)
    }

    /// Clamps every field into [0,1]. Applied to anything parsed from
    /// service output.
    pub fn clamped(self) -> Self {
        let c = |v: f64| v.clamp(0.0, 1.0);
        Self {
            relevance: c(self.relevance),
            clarity: c(self.clarity),
            completeness: c(self.completeness),
            consistency: c(self.consistency),
            overall: c(self.overall),
        }
    }
}

/// A single interview question with metadata and quality scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub question_type: QuestionType,
    pub difficulty: Difficulty,
    pub expected_duration_minutes: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    #[serde(default = "QualityMetrics::neutral")]
    pub quality_metrics: QualityMetrics,
}

/// Interviewer evaluation guidance for one question. Mirrors the question
/// list in length and order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerTipRecord {
    pub question: String,
    pub evaluation_guidance: String,
    pub what_to_listen_for: Vec<String>,
    pub scoring_criteria: String,
    pub red_flags: Vec<String>,
    pub excellent_indicators: Vec<String>,
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    pub assessment_framework: String,
    pub time_management: String,
    #[serde(default = "QualityMetrics::neutral")]
    pub quality_metrics: QualityMetrics,
}

/// Wall-clock and usage accounting for one agent invocation.
/// The list is request-scoped and append-only during a run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentPerformanceRecord {
    pub agent_name: String,
    pub processing_time_seconds: f64,
    pub token_usage_estimate: u64,
    pub success_rate: f64,
    #[serde(default)]
    pub error_count: u32,
}

impl AgentPerformanceRecord {
    pub fn new(agent_name: &str, seconds: f64, tokens: u64, success: bool) -> Self {
        Self {
            agent_name: agent_name.to_string(),
            processing_time_seconds: seconds,
            token_usage_estimate: tokens,
            success_rate: if success { 1.0 } else { 0.0 },
            error_count: u32::from(!success),
        }
    }
}

/// Cross-content consistency validation output. `checks` maps each of the
/// six named checks to pass/fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsistencyReport {
    pub overall_consistency: f64,
    pub issues: Vec<String>,
    pub recommendations: Vec<String>,
    pub checks: BTreeMap<String, bool>,
}

/// The six consistency checks, in reporting order.
pub const CONSISTENCY_CHECKS: [&str; 6] = [
    "experience_level",
    "role_relevance",
    "round_focus",
    "difficulty_balance",
    "question_variety",
    "tip_alignment",
];

impl ConsistencyReport {
    pub fn with_all_checks(score: f64, passed: bool) -> Self {
        Self {
            overall_consistency: score,
            issues: Vec::new(),
            recommendations: Vec::new(),
            checks: CONSISTENCY_CHECKS
                .iter()
                .map(|c| (c.to_string(), passed))
                .collect(),
        }
    }

    /// Fallback report when the validation call itself fails.
    pub fn failed(reason: &str) -> Self {
        let mut report = Self::with_all_checks(0.5, false);
        report.issues.push(format!("Validation error: {reason}"));
        report
            .recommendations
            .push("Manual review recommended".to_string());
        report
    }
}

/// Aggregated quality report produced by the assessor. `overall_quality`
/// uses equal-thirds weighting; the formatter recomputes its own weighted
/// aggregate and both values are preserved in the final package.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityReport {
    pub overall_assessment: String,
    pub overall_quality: f64,
    pub question_quality: f64,
    pub tip_quality: f64,
    pub consistency: f64,
    pub improvement_suggestions: Vec<String>,
    pub checks: BTreeMap<String, bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub generated_at: DateTime<Utc>,
    pub total_processing_seconds: f64,
    pub total_token_estimate: u64,
    pub agents_used: Vec<String>,
    pub parallel_processing_enabled: bool,
    pub quality_assurance_enabled: bool,
    pub error: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Suggested interview timing structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewStructure {
    pub introduction: String,
    pub main_questions: String,
    pub candidate_questions: String,
    pub wrap_up: String,
}

impl Default for InterviewStructure {
    fn default() -> Self {
        Self {
            introduction: "5 minutes - Welcome and role overview".to_string(),
            main_questions: "30-40 minutes - Core interview questions".to_string(),
            candidate_questions: "10 minutes - Candidate's questions".to_string(),
            wrap_up: "5 minutes - Next steps and closing".to_string(),
        }
    }
}

/// 1-5 scoring rubric and hire/no-hire decision thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationFramework {
    pub scoring_rubric: BTreeMap<String, String>,
    pub decision_criteria: BTreeMap<String, String>,
}

impl Default for EvaluationFramework {
    fn default() -> Self {
        let scoring_rubric = [
            ("technical_skills", "1-5 scale based on depth and accuracy"),
            ("problem_solving", "1-5 scale based on approach and creativity"),
            ("communication", "1-5 scale based on clarity and engagement"),
            ("cultural_fit", "1-5 scale based on values alignment"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let decision_criteria = [
            ("strong_hire", "4.0+ average across all areas"),
            ("hire", "3.5+ average with no major red flags"),
            ("no_hire", "Below 3.5 average or major concerns"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            scoring_rubric,
            decision_criteria,
        }
    }
}

/// The terminal artifact returned to the caller. Assembled exactly once by
/// the formatter (or the coordinator's error path) and never mutated after.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalInterviewPackage {
    pub package_id: Uuid,
    pub questions: Vec<QuestionRecord>,
    pub answer_tips: Vec<AnswerTipRecord>,
    pub interview_focus: String,
    pub preparation_tips: Vec<String>,
    pub overall_quality_score: f64,
    pub processing_metrics: Vec<AgentPerformanceRecord>,
    pub quality_report: QualityReport,
    pub generation_metadata: GenerationMetadata,
    pub interview_structure: InterviewStructure,
    pub evaluation_framework: EvaluationFramework,
    pub candidate_assessment_guide: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_metrics_neutral_is_below_acceptable_bar() {
        let metrics = QualityMetrics::neutral();
        assert!(metrics.overall < 0.7);
        assert_eq!(metrics.overall, 0.5);
        assert_eq!(metrics.relevance, metrics.clarity);
    }

    #[test]
    fn test_quality_metrics_clamped_into_unit_interval() {
        let metrics = QualityMetrics {
            relevance: 1.4,
            clarity: -0.2,
            completeness: 0.5,
            consistency: 0.9,
            overall: 2.0,
        }
        .clamped();
        assert_eq!(metrics.relevance, 1.0);
        assert_eq!(metrics.clarity, 0.0);
        assert_eq!(metrics.overall, 1.0);
        assert_eq!(metrics.completeness, 0.5);
    }

    #[test]
    fn test_consistency_report_failed_sets_all_checks_false() {
        let report = ConsistencyReport::failed("service unavailable");
        assert_eq!(report.overall_consistency, 0.5);
        assert_eq!(report.checks.len(), 6);
        assert!(report.checks.values().all(|passed| !passed));
        assert!(report.issues[0].contains("service unavailable"));
    }

    #[test]
    fn test_performance_record_failure_counts_error() {
        let record = AgentPerformanceRecord::new("QuestionGenerator", 1.2, 2000, false);
        assert_eq!(record.success_rate, 0.0);
        assert_eq!(record.error_count, 1);
    }

    #[test]
    fn test_question_type_serde_snake_case() {
        let json = serde_json::to_string(&QuestionType::CulturalFit).unwrap();
        assert_eq!(json, "\"cultural_fit\"");
        let parsed: QuestionType = serde_json::from_str("\"situational\"").unwrap();
        assert_eq!(parsed, QuestionType::Situational);
    }

    #[test]
    fn test_default_evaluation_framework_thresholds() {
        let framework = EvaluationFramework::default();
        assert!(framework.decision_criteria["strong_hire"].contains("4.0+"));
        assert!(framework.decision_criteria["hire"].contains("3.5+"));
        assert!(framework.decision_criteria["no_hire"].contains("3.5"));
        assert_eq!(framework.scoring_rubric.len(), 4);
    }

    #[test]
    fn test_question_record_deserializes_without_optional_fields() {
        let json = r#"{
            "question": "Describe a system you designed.",
            "question_type": "technical",
            "difficulty": "advanced",
            "expected_duration_minutes": 8
        }"#;
        let record: QuestionRecord = serde_json::from_str(json).unwrap();
        assert!(record.tags.is_empty());
        assert!(record.follow_up_questions.is_empty());
        assert_eq!(record.quality_metrics, QualityMetrics::neutral());
    }
}
