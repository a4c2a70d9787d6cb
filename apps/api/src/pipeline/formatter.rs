//! Final package assembly — attaches tags and follow-ups, recomputes the
//! weighted overall quality score, and synthesizes interviewer guidance and
//! the evaluation framework.
//!
//! The weighted composition (0.4 questions, 0.4 tips, 0.2 consistency) is
//! deliberately different from the assessor's equal-thirds report; both
//! values land in the final package and neither overwrites the other.

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::llm_client::{call_json, TextGeneration};
use crate::models::package::{
    AgentPerformanceRecord, AnswerTipRecord, EvaluationFramework, FinalInterviewPackage,
    GenerationMetadata, InterviewStructure, QuestionRecord, QuestionType,
};
use crate::models::request::GenerationRequest;
use crate::pipeline::prompts::{GUIDANCE_PROMPT_TEMPLATE, GUIDANCE_SYSTEM};
use crate::pipeline::quality::QualityPayload;

#[async_trait]
pub trait ResponseFormatter: Send + Sync {
    async fn format(
        &self,
        questions: Vec<QuestionRecord>,
        tips: Vec<AnswerTipRecord>,
        quality: &QualityPayload,
        metrics: Vec<AgentPerformanceRecord>,
        request: &GenerationRequest,
    ) -> Result<FinalInterviewPackage, AppError>;
}

/// Wire shape for the guidance synthesis call.
#[derive(Debug, Deserialize)]
struct RawGuidance {
    preparation_tips: Vec<String>,
    interview_structure: InterviewStructure,
    candidate_assessment_guide: Vec<String>,
}

/// Fixed type-specific follow-up templates. At most two are attached per
/// question.
pub fn follow_ups_for(question_type: QuestionType) -> [&'static str; 2] {
    match question_type {
        QuestionType::Behavioral => [
            "What would you do differently if you faced a similar situation again?",
            "How did this experience change your approach to similar challenges?",
        ],
        QuestionType::Technical => [
            "How would you optimize this solution for better performance?",
            "What are the potential drawbacks of this approach?",
        ],
        QuestionType::Situational => [
            "What factors would influence your decision-making process?",
            "How would you communicate this decision to stakeholders?",
        ],
        QuestionType::CulturalFit => [
            "Can you give me a specific example of this?",
            "How do you think this aligns with our company values?",
        ],
    }
}

fn question_tags(question: &QuestionRecord, request: &GenerationRequest) -> Vec<String> {
    let mut tags = vec![
        question.question_type.as_str().to_string(),
        question.difficulty.as_str().to_string(),
    ];

    let role = request.role.to_lowercase();
    if role.contains("engineer") {
        tags.push("engineering".to_string());
    } else if role.contains("manager") {
        tags.push("management".to_string());
    } else if role.contains("data") {
        tags.push("data".to_string());
    } else if role.contains("product") {
        tags.push("product".to_string());
    }

    tags.push(request.level.as_str().to_lowercase());
    tags
}

/// Weighted overall score: 0.4 questions, 0.4 tips, 0.2 consistency.
/// Missing per-item metrics default each leg to 0.7.
pub fn weighted_overall_quality(quality: &QualityPayload) -> f64 {
    let avg = |metrics: &[crate::models::package::QualityMetrics]| {
        if metrics.is_empty() {
            0.7
        } else {
            metrics.iter().map(|m| m.overall).sum::<f64>() / metrics.len() as f64
        }
    };
    let question_quality = avg(&quality.question_metrics);
    let tip_quality = avg(&quality.tip_metrics);
    let consistency = quality.consistency.overall_consistency;

    question_quality * 0.4 + tip_quality * 0.4 + consistency * 0.2
}

/// Production formatter. Guidance synthesis goes through the service but
/// falls back to the fixed defaults; only package assembly itself can fail.
pub struct LlmResponseFormatter {
    service: Arc<dyn TextGeneration>,
}

impl LlmResponseFormatter {
    pub fn new(service: Arc<dyn TextGeneration>) -> Self {
        Self { service }
    }

    async fn guidance(&self, request: &GenerationRequest, question_count: usize) -> RawGuidance {
        let prompt = GUIDANCE_PROMPT_TEMPLATE
            .replace("{role}", &request.role)
            .replace("{level}", request.level.as_str())
            .replace("{round_name}", request.round.name())
            .replace("{question_count}", &question_count.to_string());

        match call_json::<RawGuidance>(self.service.as_ref(), &prompt, GUIDANCE_SYSTEM).await {
            Ok(guidance) => guidance,
            Err(e) => {
                warn!("Interviewer guidance generation failed, using defaults: {e}");
                default_guidance()
            }
        }
    }
}

fn default_guidance() -> RawGuidance {
    RawGuidance {
        preparation_tips: vec![
            "Review job description and candidate resume".to_string(),
            "Prepare follow-up questions".to_string(),
            "Set up interview environment".to_string(),
            "Have evaluation criteria ready".to_string(),
        ],
        interview_structure: InterviewStructure::default(),
        candidate_assessment_guide: vec![
            "Focus on specific examples and outcomes".to_string(),
            "Assess both technical skills and cultural fit".to_string(),
            "Take detailed notes for comparison".to_string(),
            "Evaluate communication and problem-solving approach".to_string(),
        ],
    }
}

fn interview_focus(request: &GenerationRequest) -> String {
    format!(
        "{} for a {} {} position.",
        request.round.focus_summary(),
        request.level.as_str(),
        request.role
    )
}

fn build_metadata(
    metrics: &[AgentPerformanceRecord],
    request: &GenerationRequest,
) -> GenerationMetadata {
    GenerationMetadata {
        generated_at: Utc::now(),
        total_processing_seconds: metrics.iter().map(|m| m.processing_time_seconds).sum(),
        total_token_estimate: metrics.iter().map(|m| m.token_usage_estimate).sum(),
        agents_used: metrics.iter().map(|m| m.agent_name.clone()).collect(),
        parallel_processing_enabled: request.enable_parallel_processing,
        quality_assurance_enabled: request.enable_quality_assurance,
        error: false,
        error_message: None,
    }
}

#[async_trait]
impl ResponseFormatter for LlmResponseFormatter {
    async fn format(
        &self,
        mut questions: Vec<QuestionRecord>,
        mut tips: Vec<AnswerTipRecord>,
        quality: &QualityPayload,
        mut metrics: Vec<AgentPerformanceRecord>,
        request: &GenerationRequest,
    ) -> Result<FinalInterviewPackage, AppError> {
        let started = Instant::now();

        // Attach per-item assessor metrics where available.
        for (question, m) in questions.iter_mut().zip(quality.question_metrics.iter()) {
            question.quality_metrics = m.clone();
        }
        for (tip, m) in tips.iter_mut().zip(quality.tip_metrics.iter()) {
            tip.quality_metrics = m.clone();
        }

        // Tags always; follow-ups only when requested and not already present.
        for question in questions.iter_mut() {
            question.tags = question_tags(question, request);
            if request.include_follow_ups && question.follow_up_questions.is_empty() {
                question.follow_up_questions = follow_ups_for(question.question_type)
                    .iter()
                    .map(|s| s.to_string())
                    .collect();
            }
        }

        let guidance = self.guidance(request, questions.len()).await;
        let overall_quality_score = weighted_overall_quality(quality);
        metrics.push(AgentPerformanceRecord::new(
            "ResponseFormatter",
            started.elapsed().as_secs_f64(),
            800,
            true,
        ));
        let generation_metadata = build_metadata(&metrics, request);

        Ok(FinalInterviewPackage {
            package_id: Uuid::new_v4(),
            questions,
            answer_tips: tips,
            interview_focus: interview_focus(request),
            preparation_tips: guidance.preparation_tips,
            overall_quality_score,
            processing_metrics: metrics,
            quality_report: quality.report.clone(),
            generation_metadata,
            interview_structure: guidance.interview_structure,
            evaluation_framework: EvaluationFramework::default(),
            candidate_assessment_guide: guidance.candidate_assessment_guide,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::package::{ConsistencyReport, Difficulty, QualityMetrics};
    use crate::pipeline::quality::generate_quality_report;
    use serde_json::json;

    fn request() -> GenerationRequest {
        serde_json::from_value(json!({
            "job_description": "JD",
            "cv": "CV",
            "role": "Backend Engineer",
            "level": "Senior",
            "round": 2
        }))
        .unwrap()
    }

    fn question(question_type: QuestionType) -> QuestionRecord {
        QuestionRecord {
            question: "Sample?".to_string(),
            question_type,
            difficulty: Difficulty::Intermediate,
            expected_duration_minutes: 5,
            tags: Vec::new(),
            follow_up_questions: Vec::new(),
            quality_metrics: QualityMetrics::neutral(),
        }
    }

    fn payload(q: f64, t: f64, c: f64) -> QualityPayload {
        let question_metrics = vec![QualityMetrics::uniform(q)];
        let tip_metrics = vec![QualityMetrics::uniform(t)];
        let consistency = ConsistencyReport::with_all_checks(c, true);
        let report = generate_quality_report(&question_metrics, &tip_metrics, &consistency);
        QualityPayload {
            question_metrics,
            tip_metrics,
            consistency,
            report,
        }
    }

    struct FailingService;

    #[async_trait]
    impl TextGeneration for FailingService {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            Err(LlmError::Service("guidance service down".to_string()))
        }
    }

    #[test]
    fn test_weighted_composition_differs_from_equal_thirds() {
        let payload = payload(0.9, 0.6, 0.3);

        let weighted = weighted_overall_quality(&payload);
        assert!((weighted - 0.66).abs() < 1e-9);
        assert!((payload.report.overall_quality - 0.6).abs() < 1e-9);
        assert!((weighted - payload.report.overall_quality - 0.06).abs() < 1e-9);
    }

    #[test]
    fn test_empty_metrics_default_each_leg_to_good() {
        let consistency = ConsistencyReport::with_all_checks(0.7, true);
        let report = generate_quality_report(&[], &[], &consistency);
        let payload = QualityPayload {
            question_metrics: Vec::new(),
            tip_metrics: Vec::new(),
            consistency,
            report,
        };
        assert!((weighted_overall_quality(&payload) - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_follow_up_templates_are_type_specific() {
        assert!(follow_ups_for(QuestionType::Technical)[0].contains("optimize"));
        assert!(follow_ups_for(QuestionType::Behavioral)[0].contains("differently"));
        assert!(follow_ups_for(QuestionType::Situational)[1].contains("stakeholders"));
        assert!(follow_ups_for(QuestionType::CulturalFit)[1].contains("values"));
    }

    #[tokio::test]
    async fn test_format_succeeds_when_guidance_call_fails() {
        let formatter = LlmResponseFormatter::new(Arc::new(FailingService));
        let package = formatter
            .format(
                vec![question(QuestionType::Behavioral)],
                Vec::new(),
                &payload(0.8, 0.8, 0.8),
                vec![AgentPerformanceRecord::new("DocumentAnalyzer", 0.5, 1500, true)],
                &request(),
            )
            .await
            .unwrap();

        assert_eq!(package.preparation_tips.len(), 4);
        assert!(package.interview_structure.introduction.contains("5 minutes"));
        assert!(!package.candidate_assessment_guide.is_empty());
    }

    #[tokio::test]
    async fn test_format_attaches_tags_and_follow_ups() {
        let formatter = LlmResponseFormatter::new(Arc::new(FailingService));
        let package = formatter
            .format(
                vec![question(QuestionType::Technical)],
                Vec::new(),
                &payload(0.8, 0.8, 0.8),
                Vec::new(),
                &request(),
            )
            .await
            .unwrap();

        let q = &package.questions[0];
        assert!(q.tags.contains(&"technical".to_string()));
        assert!(q.tags.contains(&"engineering".to_string()));
        assert!(q.tags.contains(&"senior".to_string()));
        assert_eq!(q.follow_up_questions.len(), 2);
    }

    #[tokio::test]
    async fn test_follow_ups_omitted_when_disabled() {
        let mut req = request();
        req.include_follow_ups = false;
        let formatter = LlmResponseFormatter::new(Arc::new(FailingService));
        let package = formatter
            .format(
                vec![question(QuestionType::Technical)],
                Vec::new(),
                &payload(0.8, 0.8, 0.8),
                Vec::new(),
                &req,
            )
            .await
            .unwrap();
        assert!(package.questions[0].follow_up_questions.is_empty());
    }

    #[tokio::test]
    async fn test_per_item_metrics_are_attached_to_records() {
        let formatter = LlmResponseFormatter::new(Arc::new(FailingService));
        let package = formatter
            .format(
                vec![question(QuestionType::Technical)],
                Vec::new(),
                &payload(0.9, 0.8, 0.8),
                Vec::new(),
                &request(),
            )
            .await
            .unwrap();
        assert_eq!(package.questions[0].quality_metrics.overall, 0.9);
    }

    #[tokio::test]
    async fn test_metadata_totals_accumulate_metrics() {
        let formatter = LlmResponseFormatter::new(Arc::new(FailingService));
        let metrics = vec![
            AgentPerformanceRecord::new("DocumentAnalyzer", 1.0, 1500, true),
            AgentPerformanceRecord::new("QuestionGenerator", 2.0, 2000, true),
        ];
        let package = formatter
            .format(Vec::new(), Vec::new(), &payload(0.8, 0.8, 0.8), metrics, &request())
            .await
            .unwrap();
        let meta = &package.generation_metadata;
        assert!(meta.total_processing_seconds >= 3.0);
        assert_eq!(meta.total_token_estimate, 4300);
        assert_eq!(meta.agents_used.len(), 3);
        assert_eq!(meta.agents_used[2], "ResponseFormatter");
        assert!(!meta.error);
    }
}
