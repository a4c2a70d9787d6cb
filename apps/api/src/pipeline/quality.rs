//! Quality assessment — rubric scoring for questions and tips, cross-content
//! consistency validation, and the aggregated quality report.
//!
//! Scoring scale (0-1): 0.9-1.0 excellent/ready-to-use, 0.7-0.89 good/minor
//! improvements, 0.5-0.69 acceptable/some improvements, 0.3-0.49 below
//! standard, 0.0-0.29 poor. The report combines question average, tip
//! average, and consistency with equal-thirds weighting; the formatter later
//! recomputes its own weighted aggregate and both values are preserved.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{call_json, strip_json_fences, TextGeneration};
use crate::models::package::{
    AnswerTipRecord, ConsistencyReport, QualityMetrics, QualityReport, QuestionRecord,
};
use crate::pipeline::prompts::{
    CONSISTENCY_PROMPT_TEMPLATE, FAIRNESS_INSTRUCTION, QUALITY_ITEM_PROMPT_TEMPLATE,
    QUALITY_SYSTEM,
};
use crate::pipeline::questions::GenerationContext;
use crate::pipeline::scrape::scrape_quality_metrics;

#[async_trait]
pub trait QualityAssessor: Send + Sync {
    async fn assess_questions(
        &self,
        questions: &[QuestionRecord],
        ctx: &GenerationContext,
    ) -> Result<Vec<QualityMetrics>, AppError>;

    async fn assess_answer_tips(
        &self,
        tips: &[AnswerTipRecord],
        questions: &[QuestionRecord],
        ctx: &GenerationContext,
    ) -> Result<Vec<QualityMetrics>, AppError>;

    async fn validate_consistency(
        &self,
        questions: &[QuestionRecord],
        tips: &[AnswerTipRecord],
        ctx: &GenerationContext,
    ) -> Result<ConsistencyReport, AppError>;
}

/// Maps an overall score to its assessment label.
pub fn assessment_label(score: f64) -> &'static str {
    if score >= 0.9 {
        "Excellent quality - Ready for immediate use"
    } else if score >= 0.7 {
        "Good quality - Minor improvements recommended"
    } else if score >= 0.5 {
        "Acceptable quality - Some improvements needed"
    } else if score >= 0.3 {
        "Below standard - Significant improvements required"
    } else {
        "Poor quality - Major revision needed"
    }
}

fn average_overall(metrics: &[QualityMetrics]) -> f64 {
    if metrics.is_empty() {
        return 0.5;
    }
    metrics.iter().map(|m| m.overall).sum::<f64>() / metrics.len() as f64
}

/// Combines per-item metrics and the consistency report into one graded
/// report with equal-thirds weighting. Pure; no service calls.
pub fn generate_quality_report(
    question_metrics: &[QualityMetrics],
    tip_metrics: &[QualityMetrics],
    consistency: &ConsistencyReport,
) -> QualityReport {
    let question_quality = average_overall(question_metrics);
    let tip_quality = average_overall(tip_metrics);
    let consistency_score = consistency.overall_consistency;
    let overall_quality = (question_quality + tip_quality + consistency_score) / 3.0;

    let mut improvement_suggestions = Vec::new();
    if question_quality < 0.7 {
        improvement_suggestions.push("Review question relevance and clarity".to_string());
    }
    if tip_quality < 0.7 {
        improvement_suggestions.push("Enhance evaluation tip depth and structure".to_string());
    }
    if consistency_score < 0.7 {
        improvement_suggestions.push("Improve consistency across content".to_string());
    }
    improvement_suggestions.extend(consistency.recommendations.iter().cloned());

    QualityReport {
        overall_assessment: assessment_label(overall_quality).to_string(),
        overall_quality,
        question_quality,
        tip_quality,
        consistency: consistency_score,
        improvement_suggestions,
        checks: consistency.checks.clone(),
    }
}

/// Everything the quality phase hands to the formatter: per-item metrics,
/// the consistency report, and the equal-thirds report derived from them.
#[derive(Debug, Clone)]
pub struct QualityPayload {
    pub question_metrics: Vec<QualityMetrics>,
    pub tip_metrics: Vec<QualityMetrics>,
    pub consistency: ConsistencyReport,
    pub report: QualityReport,
}

impl QualityPayload {
    pub fn from_parts(
        question_metrics: Vec<QualityMetrics>,
        tip_metrics: Vec<QualityMetrics>,
        consistency: ConsistencyReport,
    ) -> Self {
        let report = generate_quality_report(&question_metrics, &tip_metrics, &consistency);
        Self {
            question_metrics,
            tip_metrics,
            consistency,
            report,
        }
    }

    /// Payload used when the entire quality phase errors out: uniform 0.7
    /// metrics for every item and a passing consistency report.
    pub fn fallback(question_count: usize, tip_count: usize) -> Self {
        Self::from_parts(
            vec![QualityMetrics::uniform(0.7); question_count],
            vec![QualityMetrics::uniform(0.7); tip_count],
            ConsistencyReport::with_all_checks(0.7, true),
        )
    }

    /// Payload used when quality assurance is disabled for the request.
    /// Empty per-item metrics let the formatter fall back to its own 0.7
    /// leg defaults.
    pub fn skipped() -> Self {
        let consistency = ConsistencyReport::with_all_checks(0.7, true);
        Self {
            question_metrics: Vec::new(),
            tip_metrics: Vec::new(),
            report: QualityReport {
                overall_assessment: assessment_label(0.7).to_string(),
                overall_quality: 0.7,
                question_quality: 0.7,
                tip_quality: 0.7,
                consistency: 0.7,
                improvement_suggestions: Vec::new(),
                checks: consistency.checks.clone(),
            },
            consistency,
        }
    }
}

/// Production assessor backed by the text-generation service. Per-item
/// failures degrade to neutral 0.5 metrics; batch calls themselves never
/// fail.
pub struct LlmQualityAssessor {
    service: Arc<dyn TextGeneration>,
}

impl LlmQualityAssessor {
    pub fn new(service: Arc<dyn TextGeneration>) -> Self {
        Self { service }
    }

    async fn assess_item(&self, item_kind: &str, content: &str, ctx: &GenerationContext) -> QualityMetrics {
        let prompt = QUALITY_ITEM_PROMPT_TEMPLATE
            .replace("{item_kind}", item_kind)
            .replace("{content}", content)
            .replace("{role}", &ctx.role)
            .replace("{level}", ctx.level.as_str())
            .replace("{round_name}", ctx.round.name());

        let system = format!("{QUALITY_SYSTEM} {FAIRNESS_INSTRUCTION}");
        match self.service.generate(&prompt, &system).await {
            Ok(text) => {
                let stripped = strip_json_fences(&text);
                if let Ok(metrics) = serde_json::from_str::<QualityMetrics>(stripped) {
                    return metrics.clamped();
                }
                // Last-resort regex scrape before giving up on this item.
                if let Some(metrics) = scrape_quality_metrics(&text) {
                    warn!("Quality output was not JSON; scraped scores from prose");
                    return metrics;
                }
                warn!("Quality output unusable for one {item_kind}, using neutral metrics");
                QualityMetrics::neutral()
            }
            Err(e) => {
                warn!("Quality assessment failed for one {item_kind}: {e}");
                QualityMetrics::neutral()
            }
        }
    }

    fn questions_overview(questions: &[QuestionRecord]) -> String {
        questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                format!(
                    "{}. {} (Type: {}, Difficulty: {})",
                    i + 1,
                    q.question,
                    q.question_type.as_str(),
                    q.difficulty.as_str()
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl QualityAssessor for LlmQualityAssessor {
    async fn assess_questions(
        &self,
        questions: &[QuestionRecord],
        ctx: &GenerationContext,
    ) -> Result<Vec<QualityMetrics>, AppError> {
        let mut metrics = Vec::with_capacity(questions.len());
        for question in questions {
            let content = format!(
                "QUESTION: {}\nTYPE: {}\nDIFFICULTY: {}",
                question.question,
                question.question_type.as_str(),
                question.difficulty.as_str()
            );
            metrics.push(self.assess_item("question", &content, ctx).await);
        }
        Ok(metrics)
    }

    async fn assess_answer_tips(
        &self,
        tips: &[AnswerTipRecord],
        questions: &[QuestionRecord],
        ctx: &GenerationContext,
    ) -> Result<Vec<QualityMetrics>, AppError> {
        let mut metrics = Vec::with_capacity(tips.len());
        for (i, tip) in tips.iter().enumerate() {
            let question_text = questions
                .get(i)
                .map(|q| q.question.as_str())
                .unwrap_or(tip.question.as_str());
            let content = format!(
                "QUESTION: {}\nEVALUATION GUIDANCE: {}\nSCORING: {}",
                question_text, tip.evaluation_guidance, tip.scoring_criteria
            );
            metrics.push(self.assess_item("evaluation tip", &content, ctx).await);
        }
        Ok(metrics)
    }

    async fn validate_consistency(
        &self,
        questions: &[QuestionRecord],
        _tips: &[AnswerTipRecord],
        ctx: &GenerationContext,
    ) -> Result<ConsistencyReport, AppError> {
        let prompt = CONSISTENCY_PROMPT_TEMPLATE
            .replace("{role}", &ctx.role)
            .replace("{level}", ctx.level.as_str())
            .replace("{round_name}", ctx.round.name())
            .replace("{question_count}", &questions.len().to_string())
            .replace("{questions_overview}", &Self::questions_overview(questions));

        let system = format!("{QUALITY_SYSTEM} {FAIRNESS_INSTRUCTION}");
        match call_json::<ConsistencyReport>(self.service.as_ref(), &prompt, &system).await {
            Ok(mut report) => {
                report.overall_consistency = report.overall_consistency.clamp(0.0, 1.0);
                Ok(report)
            }
            Err(e) => {
                warn!("Consistency validation failed, using degraded report: {e}");
                Ok(ConsistencyReport::failed(&e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::package::{Difficulty, QuestionType, CONSISTENCY_CHECKS};
    use crate::models::request::{ExperienceLevel, InterviewRound};

    fn ctx() -> GenerationContext {
        GenerationContext {
            role: "Site Reliability Engineer".to_string(),
            level: ExperienceLevel::Lead,
            round: InterviewRound::Final,
            question_count: 2,
            custom_focus_areas: Vec::new(),
            difficulty_preference: None,
        }
    }

    fn question(text: &str) -> QuestionRecord {
        QuestionRecord {
            question: text.to_string(),
            question_type: QuestionType::Technical,
            difficulty: Difficulty::Advanced,
            expected_duration_minutes: 6,
            tags: Vec::new(),
            follow_up_questions: Vec::new(),
            quality_metrics: QualityMetrics::neutral(),
        }
    }

    struct CannedService(Result<String, ()>);

    #[async_trait]
    impl TextGeneration for CannedService {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            self.0
                .clone()
                .map_err(|_| LlmError::Service("down".to_string()))
        }
    }

    const METRICS_JSON: &str = r#"{
        "relevance": 0.9, "clarity": 0.8, "completeness": 0.85,
        "consistency": 0.9, "overall": 0.86
    }"#;

    #[tokio::test]
    async fn test_assess_questions_one_metric_per_question() {
        let assessor = LlmQualityAssessor::new(Arc::new(CannedService(Ok(
            METRICS_JSON.to_string(),
        ))));
        let questions = vec![question("Q1?"), question("Q2?")];
        let metrics = assessor.assess_questions(&questions, &ctx()).await.unwrap();
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics[0].overall, 0.86);
    }

    #[tokio::test]
    async fn test_per_item_failure_yields_neutral_metrics() {
        let assessor = LlmQualityAssessor::new(Arc::new(CannedService(Err(()))));
        let questions = vec![question("Q1?")];
        let metrics = assessor.assess_questions(&questions, &ctx()).await.unwrap();
        assert_eq!(metrics[0], QualityMetrics::neutral());
    }

    #[tokio::test]
    async fn test_prose_output_is_scraped_before_giving_up() {
        let assessor = LlmQualityAssessor::new(Arc::new(CannedService(Ok(
            "Relevance: 0.9, clarity: 0.9, completeness: 0.9, consistency: 0.9, overall: 0.9"
                .to_string(),
        ))));
        let metrics = assessor
            .assess_questions(&[question("Q1?")], &ctx())
            .await
            .unwrap();
        assert_eq!(metrics[0].overall, 0.9);
    }

    #[tokio::test]
    async fn test_consistency_failure_sets_all_checks_false() {
        let assessor = LlmQualityAssessor::new(Arc::new(CannedService(Err(()))));
        let report = assessor
            .validate_consistency(&[question("Q1?")], &[], &ctx())
            .await
            .unwrap();
        assert_eq!(report.overall_consistency, 0.5);
        assert_eq!(report.checks.len(), CONSISTENCY_CHECKS.len());
        assert!(report.checks.values().all(|passed| !passed));
        assert!(!report.issues.is_empty());
    }

    #[test]
    fn test_assessment_label_thresholds() {
        assert!(assessment_label(0.95).starts_with("Excellent"));
        assert!(assessment_label(0.9).starts_with("Excellent"));
        assert!(assessment_label(0.89).starts_with("Good"));
        assert!(assessment_label(0.7).starts_with("Good"));
        assert!(assessment_label(0.69).starts_with("Acceptable"));
        assert!(assessment_label(0.5).starts_with("Acceptable"));
        assert!(assessment_label(0.49).starts_with("Below standard"));
        assert!(assessment_label(0.3).starts_with("Below standard"));
        assert!(assessment_label(0.29).starts_with("Poor"));
    }

    #[test]
    fn test_report_uses_equal_thirds_weighting() {
        let question_metrics = vec![QualityMetrics::uniform(0.9)];
        let tip_metrics = vec![QualityMetrics::uniform(0.6)];
        let consistency = ConsistencyReport::with_all_checks(0.3, true);

        let report = generate_quality_report(&question_metrics, &tip_metrics, &consistency);
        assert!((report.overall_quality - 0.6).abs() < 1e-9);
        assert_eq!(report.question_quality, 0.9);
        assert_eq!(report.tip_quality, 0.6);
        assert_eq!(report.consistency, 0.3);
    }

    #[test]
    fn test_report_suggests_improvements_below_good_bar() {
        let question_metrics = vec![QualityMetrics::uniform(0.6)];
        let tip_metrics = vec![QualityMetrics::uniform(0.8)];
        let consistency = ConsistencyReport::with_all_checks(0.9, true);

        let report = generate_quality_report(&question_metrics, &tip_metrics, &consistency);
        assert!(report
            .improvement_suggestions
            .iter()
            .any(|s| s.contains("question relevance")));
        assert!(!report
            .improvement_suggestions
            .iter()
            .any(|s| s.contains("tip depth")));
    }
}
