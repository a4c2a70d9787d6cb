//! Evaluation-tip generation. One tip per question, same order. A failure
//! for question *i* substitutes the fixed fallback tip at index *i* only —
//! a single bad call never aborts the batch.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{call_json, TextGeneration};
use crate::models::package::{AnswerTipRecord, QualityMetrics, QuestionRecord};
use crate::pipeline::prompts::{TIPS_PROMPT_TEMPLATE, TIPS_SYSTEM};
use crate::pipeline::questions::GenerationContext;

#[async_trait]
pub trait AnswerTipsGenerator: Send + Sync {
    async fn generate(
        &self,
        questions: &[QuestionRecord],
        ctx: &GenerationContext,
    ) -> Result<Vec<AnswerTipRecord>, AppError>;
}

/// Wire shape for one generated tip, keyed back to its question by position.
#[derive(Debug, Deserialize)]
struct RawTip {
    evaluation_guidance: String,
    what_to_listen_for: Vec<String>,
    scoring_criteria: String,
    red_flags: Vec<String>,
    excellent_indicators: Vec<String>,
    #[serde(default)]
    follow_up_questions: Vec<String>,
    assessment_framework: String,
    time_management: String,
}

/// The fixed per-question fallback tip.
pub fn fallback_tip(question: &str, role: &str) -> AnswerTipRecord {
    AnswerTipRecord {
        question: question.to_string(),
        evaluation_guidance: format!(
            "Evaluate candidate's response for relevance, specificity, and alignment \
             with {role} requirements"
        ),
        what_to_listen_for: vec![
            "Specific examples".to_string(),
            "Relevant experience".to_string(),
            "Problem-solving approach".to_string(),
        ],
        scoring_criteria: "Rate 1-5 based on relevance, depth, and clarity of response"
            .to_string(),
        red_flags: vec![
            "Vague answers".to_string(),
            "Lack of examples".to_string(),
            "Inconsistencies".to_string(),
        ],
        excellent_indicators: vec![
            "Concrete examples".to_string(),
            "Measurable results".to_string(),
            "Clear methodology".to_string(),
        ],
        follow_up_questions: vec![
            "Can you provide more details?".to_string(),
            "What was the outcome?".to_string(),
        ],
        assessment_framework: "Structure, Content, Delivery, Relevance".to_string(),
        time_management: "2-4 minutes expected response time".to_string(),
        quality_metrics: QualityMetrics::neutral(),
    }
}

/// Production generator backed by the text-generation service.
pub struct LlmAnswerTipsGenerator {
    service: Arc<dyn TextGeneration>,
}

impl LlmAnswerTipsGenerator {
    pub fn new(service: Arc<dyn TextGeneration>) -> Self {
        Self { service }
    }

    async fn tip_for(
        &self,
        question: &QuestionRecord,
        ctx: &GenerationContext,
    ) -> AnswerTipRecord {
        let prompt = TIPS_PROMPT_TEMPLATE
            .replace("{role}", &ctx.role)
            .replace("{level}", ctx.level.as_str())
            .replace("{round_name}", ctx.round.name())
            .replace("{question}", &question.question)
            .replace("{question_type}", question.question_type.as_str())
            .replace("{difficulty}", question.difficulty.as_str());

        match call_json::<RawTip>(self.service.as_ref(), &prompt, TIPS_SYSTEM).await {
            Ok(raw) => AnswerTipRecord {
                question: question.question.clone(),
                evaluation_guidance: raw.evaluation_guidance,
                what_to_listen_for: raw.what_to_listen_for,
                scoring_criteria: raw.scoring_criteria,
                red_flags: raw.red_flags,
                excellent_indicators: raw.excellent_indicators,
                follow_up_questions: raw.follow_up_questions,
                assessment_framework: raw.assessment_framework,
                time_management: raw.time_management,
                quality_metrics: QualityMetrics::neutral(),
            },
            Err(e) => {
                warn!(
                    "Tip generation failed for question '{}', substituting fallback: {e}",
                    question.question.chars().take(60).collect::<String>()
                );
                fallback_tip(&question.question, &ctx.role)
            }
        }
    }
}

#[async_trait]
impl AnswerTipsGenerator for LlmAnswerTipsGenerator {
    async fn generate(
        &self,
        questions: &[QuestionRecord],
        ctx: &GenerationContext,
    ) -> Result<Vec<AnswerTipRecord>, AppError> {
        let mut tips = Vec::with_capacity(questions.len());
        for question in questions {
            tips.push(self.tip_for(question, ctx).await);
        }
        Ok(tips)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::LlmError;
    use crate::models::package::{Difficulty, QuestionType};
    use crate::models::request::{ExperienceLevel, InterviewRound};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn ctx() -> GenerationContext {
        GenerationContext {
            role: "Data Engineer".to_string(),
            level: ExperienceLevel::Mid,
            round: InterviewRound::Behavioral,
            question_count: 5,
            custom_focus_areas: Vec::new(),
            difficulty_preference: None,
        }
    }

    fn question(text: &str) -> QuestionRecord {
        QuestionRecord {
            question: text.to_string(),
            question_type: QuestionType::Behavioral,
            difficulty: Difficulty::Intermediate,
            expected_duration_minutes: 5,
            tags: Vec::new(),
            follow_up_questions: Vec::new(),
            quality_metrics: QualityMetrics::neutral(),
        }
    }

    const TIP_JSON: &str = r#"{
        "evaluation_guidance": "Listen for structured storytelling.",
        "what_to_listen_for": ["STAR structure"],
        "scoring_criteria": "1-5 scale",
        "red_flags": ["Blaming others"],
        "excellent_indicators": ["Quantified impact"],
        "follow_up_questions": ["What would you change?"],
        "assessment_framework": "STAR",
        "time_management": "3 minutes"
    }"#;

    /// Fails on exactly one call index, succeeds otherwise.
    struct FailAtService {
        calls: AtomicUsize,
        fail_index: usize,
    }

    #[async_trait]
    impl TextGeneration for FailAtService {
        async fn generate(&self, _prompt: &str, _system: &str) -> Result<String, LlmError> {
            let index = self.calls.fetch_add(1, Ordering::SeqCst);
            if index == self.fail_index {
                Err(LlmError::Service("per-question blip".to_string()))
            } else {
                Ok(TIP_JSON.to_string())
            }
        }
    }

    #[tokio::test]
    async fn test_one_tip_per_question_in_order() {
        let service = Arc::new(FailAtService {
            calls: AtomicUsize::new(0),
            fail_index: usize::MAX,
        });
        let generator = LlmAnswerTipsGenerator::new(service);
        let questions: Vec<_> = (0..3).map(|i| question(&format!("Q{i}?"))).collect();
        let tips = generator.generate(&questions, &ctx()).await.unwrap();
        assert_eq!(tips.len(), 3);
        for (tip, q) in tips.iter().zip(&questions) {
            assert_eq!(tip.question, q.question);
        }
    }

    #[tokio::test]
    async fn test_single_failure_substitutes_fallback_at_that_index_only() {
        let service = Arc::new(FailAtService {
            calls: AtomicUsize::new(0),
            fail_index: 2,
        });
        let generator = LlmAnswerTipsGenerator::new(service);
        let questions: Vec<_> = (0..5).map(|i| question(&format!("Q{i}?"))).collect();
        let tips = generator.generate(&questions, &ctx()).await.unwrap();

        assert_eq!(tips.len(), 5);
        assert!(tips[2]
            .evaluation_guidance
            .contains("alignment with Data Engineer requirements"));
        for i in [0usize, 1, 3, 4] {
            assert_eq!(tips[i].evaluation_guidance, "Listen for structured storytelling.");
        }
    }

    #[tokio::test]
    async fn test_empty_question_list_yields_empty_tips() {
        let service = Arc::new(FailAtService {
            calls: AtomicUsize::new(0),
            fail_index: usize::MAX,
        });
        let generator = LlmAnswerTipsGenerator::new(service);
        let tips = generator.generate(&[], &ctx()).await.unwrap();
        assert!(tips.is_empty());
    }

    #[test]
    fn test_fallback_tip_carries_role_and_question() {
        let tip = fallback_tip("Why this company?", "Platform Engineer");
        assert_eq!(tip.question, "Why this company?");
        assert!(tip.evaluation_guidance.contains("Platform Engineer"));
        assert_eq!(tip.quality_metrics, QualityMetrics::neutral());
    }
}
