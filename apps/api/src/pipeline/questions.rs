//! Question generation. Produces at most `count` records; unparseable
//! service output falls back to a small deterministic default set so the
//! pipeline is never left without questions.

use async_trait::async_trait;
use serde::Deserialize;
use std::sync::Arc;
use tracing::warn;

use crate::errors::AppError;
use crate::llm_client::{call_json, TextGeneration};
use crate::models::package::{Difficulty, QualityMetrics, QuestionRecord, QuestionType};
use crate::models::request::{ExperienceLevel, InterviewRound};
use crate::pipeline::prompts::{QUESTION_PROMPT_TEMPLATE, QUESTION_SYSTEM};

/// Read-only generation context shared by every downstream agent.
#[derive(Debug, Clone)]
pub struct GenerationContext {
    pub role: String,
    pub level: ExperienceLevel,
    pub round: InterviewRound,
    pub question_count: usize,
    pub custom_focus_areas: Vec<String>,
    pub difficulty_preference: Option<String>,
}

#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    async fn generate(
        &self,
        analysis: &str,
        ctx: &GenerationContext,
    ) -> Result<Vec<QuestionRecord>, AppError>;
}

/// Wire shape for a generated question, before enrichment.
#[derive(Debug, Deserialize)]
struct RawQuestion {
    question: String,
    question_type: QuestionType,
    difficulty: Difficulty,
    #[serde(default = "default_duration")]
    expected_duration_minutes: u32,
}

fn default_duration() -> u32 {
    5
}

/// Deterministic default questions used when the service output cannot be
/// parsed. Downstream phases assume at least one question always exists.
pub fn default_questions(ctx: &GenerationContext) -> Vec<QuestionRecord> {
    vec![
        QuestionRecord {
            question: format!(
                "Tell me about your experience relevant to this {} {} position",
                ctx.level.as_str(),
                ctx.role
            ),
            question_type: QuestionType::Behavioral,
            difficulty: Difficulty::Intermediate,
            expected_duration_minutes: 5,
            tags: Vec::new(),
            follow_up_questions: Vec::new(),
            quality_metrics: QualityMetrics::neutral(),
        },
        QuestionRecord {
            question: "What interests you most about this role?".to_string(),
            question_type: QuestionType::CulturalFit,
            difficulty: Difficulty::Basic,
            expected_duration_minutes: 3,
            tags: Vec::new(),
            follow_up_questions: Vec::new(),
            quality_metrics: QualityMetrics::neutral(),
        },
    ]
}

/// Deterministic basic question set sized to the requested count. This is
/// what the tips phase runs against, so a healthy tips service produces one
/// real tip per final question; templates cycle if the count exceeds them.
pub fn basic_questions(ctx: &GenerationContext) -> Vec<QuestionRecord> {
    let role_lower = ctx.role.to_lowercase();
    let templates: [(String, QuestionType, Difficulty); 5] = [
        (
            format!("Tell me about your experience with {role_lower} responsibilities."),
            QuestionType::Behavioral,
            Difficulty::Intermediate,
        ),
        (
            "Describe a challenging project you worked on recently.".to_string(),
            QuestionType::Behavioral,
            Difficulty::Intermediate,
        ),
        (
            "How do you approach problem-solving in your work?".to_string(),
            QuestionType::Situational,
            Difficulty::Intermediate,
        ),
        (
            "What technologies or tools are you most comfortable with?".to_string(),
            QuestionType::Technical,
            Difficulty::Basic,
        ),
        (
            "How do you stay updated with industry trends and best practices?".to_string(),
            QuestionType::CulturalFit,
            Difficulty::Basic,
        ),
    ];

    (0..ctx.question_count)
        .map(|i| {
            let (question, question_type, difficulty) = templates[i % templates.len()].clone();
            QuestionRecord {
                question,
                question_type,
                difficulty,
                expected_duration_minutes: 5,
                tags: Vec::new(),
                follow_up_questions: Vec::new(),
                quality_metrics: QualityMetrics::neutral(),
            }
        })
        .collect()
}

/// Production generator backed by the text-generation service.
pub struct LlmQuestionGenerator {
    service: Arc<dyn TextGeneration>,
}

impl LlmQuestionGenerator {
    pub fn new(service: Arc<dyn TextGeneration>) -> Self {
        Self { service }
    }

    fn build_prompt(&self, analysis: &str, ctx: &GenerationContext) -> String {
        let focus_areas = if ctx.custom_focus_areas.is_empty() {
            "(none)".to_string()
        } else {
            ctx.custom_focus_areas.join(", ")
        };
        QUESTION_PROMPT_TEMPLATE
            .replace("{count}", &ctx.question_count.to_string())
            .replace("{level}", ctx.level.as_str())
            .replace("{role}", &ctx.role)
            .replace("{round_name}", ctx.round.name())
            .replace("{round_focus}", ctx.round.focus())
            .replace("{level_guidelines}", ctx.level.guidelines())
            .replace("{focus_areas}", &focus_areas)
            .replace(
                "{difficulty_preference}",
                ctx.difficulty_preference.as_deref().unwrap_or("auto"),
            )
            .replace("{analysis}", analysis)
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    async fn generate(
        &self,
        analysis: &str,
        ctx: &GenerationContext,
    ) -> Result<Vec<QuestionRecord>, AppError> {
        let prompt = self.build_prompt(analysis, ctx);

        let raw: Vec<RawQuestion> =
            match call_json(self.service.as_ref(), &prompt, QUESTION_SYSTEM).await {
                Ok(raw) => raw,
                Err(e) => {
                    warn!("Question generation output unparseable, using defaults: {e}");
                    return Ok(default_questions(ctx));
                }
            };

        if raw.is_empty() {
            warn!("Question generation returned an empty set, using defaults");
            return Ok(default_questions(ctx));
        }

        // Truncate to the requested count; never pad.
        let questions = raw
            .into_iter()
            .take(ctx.question_count)
            .map(|q| QuestionRecord {
                question: q.question,
                question_type: q.question_type,
                difficulty: q.difficulty,
                expected_duration_minutes: q.expected_duration_minutes,
                tags: Vec::new(),
                follow_up_questions: Vec::new(),
                quality_metrics: QualityMetrics::neutral(),
            })
            .collect();

        Ok(questions)
    }
}
