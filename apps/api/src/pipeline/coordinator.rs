//! Pipeline coordinator. Drives the phase machine
//! Idle → AnalyzingDocuments → Generating → AssuringQuality → Formatting →
//! Done, with Failed reachable from any running phase.
//!
//! Concurrency is cooperative: the generating phase fans out with
//! `tokio::join!` over plain futures, each arm catching its own error and
//! reporting (value, record, ok). Nothing is spawned and no state is shared
//! across arms; metrics live in a request-scoped vector merged after the
//! join so ordering is identical in parallel and sequential modes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::package::{
    AgentPerformanceRecord, AnswerTipRecord, ConsistencyReport, Difficulty, FinalInterviewPackage,
    GenerationMetadata, EvaluationFramework, InterviewStructure, QualityMetrics, QualityReport,
    QuestionRecord, QuestionType, CONSISTENCY_CHECKS,
};
use crate::models::request::GenerationRequest;
use crate::pipeline::analyzer::DocumentAnalyzer;
use crate::pipeline::formatter::ResponseFormatter;
use crate::pipeline::quality::{assessment_label, QualityAssessor, QualityPayload};
use crate::pipeline::questions::{
    basic_questions, default_questions, GenerationContext, QuestionGenerator,
};
use crate::pipeline::tips::{fallback_tip, AnswerTipsGenerator};

const ANALYZER_TOKEN_ESTIMATE: u64 = 1500;
const QUESTION_TOKEN_ESTIMATE: u64 = 2000;
const TIPS_TOKEN_ESTIMATE: u64 = 2500;
const QUALITY_PREP_TOKEN_ESTIMATE: u64 = 500;
const QUALITY_TOKEN_ESTIMATE: u64 = 1200;
const FORMATTER_TOKEN_ESTIMATE: u64 = 800;

/// Coordinator phases, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    AnalyzingDocuments,
    Generating,
    AssuringQuality,
    Formatting,
    Done,
    Failed,
}

pub struct InterviewCoordinator {
    analyzer: Arc<dyn DocumentAnalyzer>,
    questions: Arc<dyn QuestionGenerator>,
    tips: Arc<dyn AnswerTipsGenerator>,
    quality: Arc<dyn QualityAssessor>,
    formatter: Arc<dyn ResponseFormatter>,
}

fn context_for(request: &GenerationRequest) -> GenerationContext {
    GenerationContext {
        role: request.role.clone(),
        level: request.level,
        round: request.round,
        question_count: request.question_count,
        custom_focus_areas: request.custom_focus_areas.clone(),
        difficulty_preference: request.difficulty_preference.clone(),
    }
}

/// Resizes tips to mirror the final question list one-to-one, padding with
/// the fixed fallback tip and relabelling each tip with the question it now
/// accompanies.
fn align_tips(
    mut tips: Vec<AnswerTipRecord>,
    questions: &[QuestionRecord],
    role: &str,
) -> Vec<AnswerTipRecord> {
    tips.truncate(questions.len());
    while tips.len() < questions.len() {
        tips.push(fallback_tip(&questions[tips.len()].question, role));
    }
    for (tip, question) in tips.iter_mut().zip(questions.iter()) {
        tip.question = question.question.clone();
    }
    tips
}

impl InterviewCoordinator {
    pub fn new(
        analyzer: Arc<dyn DocumentAnalyzer>,
        questions: Arc<dyn QuestionGenerator>,
        tips: Arc<dyn AnswerTipsGenerator>,
        quality: Arc<dyn QualityAssessor>,
        formatter: Arc<dyn ResponseFormatter>,
    ) -> Self {
        Self {
            analyzer,
            questions,
            tips,
            quality,
            formatter,
        }
    }

    /// Runs the pipeline and always returns a schema-conformant package;
    /// fatal failures come back as an error-shaped package carrying every
    /// performance record accumulated before the failure.
    pub async fn generate(&self, request: &GenerationRequest) -> FinalInterviewPackage {
        let mut metrics: Vec<AgentPerformanceRecord> = Vec::new();
        match self.run(request, &mut metrics).await {
            Ok(package) => package,
            Err(e) => {
                warn!(phase = ?Phase::Failed, "Interview generation failed: {e}");
                if metrics.is_empty() {
                    // Rejected before any agent ran; the coordinator itself
                    // is the failing agent.
                    metrics.push(AgentPerformanceRecord::new("Coordinator", 0.0, 0, false));
                }
                error_package(request, &e, metrics)
            }
        }
    }

    /// Synchronous wrapper for callers without a runtime of their own.
    /// Builds a fresh runtime per call, so it must not be invoked from
    /// inside an async context.
    pub fn generate_blocking(
        &self,
        request: &GenerationRequest,
    ) -> Result<FinalInterviewPackage, AppError> {
        let runtime = tokio::runtime::Runtime::new().map_err(|e| AppError::Internal(e.into()))?;
        Ok(runtime.block_on(self.generate(request)))
    }

    /// Runs N requests concurrently with per-request isolation; output
    /// order matches input order and one bad request never affects its
    /// neighbours.
    pub async fn generate_batch(
        &self,
        requests: &[GenerationRequest],
    ) -> Vec<FinalInterviewPackage> {
        futures::future::join_all(requests.iter().map(|r| self.generate(r))).await
    }

    async fn run(
        &self,
        request: &GenerationRequest,
        metrics: &mut Vec<AgentPerformanceRecord>,
    ) -> Result<FinalInterviewPackage, AppError> {
        request.validate()?;
        let ctx = context_for(request);
        info!(phase = ?Phase::Idle, question_count = ctx.question_count, "Request accepted");

        // ── AnalyzingDocuments ──────────────────────────────────────────
        info!(phase = ?Phase::AnalyzingDocuments, role = %ctx.role, "Analyzing documents");
        let started = Instant::now();
        let analysis = match self
            .analyzer
            .analyze(&request.job_description, &request.cv)
            .await
        {
            Ok(analysis) => {
                metrics.push(AgentPerformanceRecord::new(
                    "DocumentAnalyzer",
                    started.elapsed().as_secs_f64(),
                    ANALYZER_TOKEN_ESTIMATE,
                    true,
                ));
                analysis
            }
            Err(e) => {
                metrics.push(AgentPerformanceRecord::new(
                    "DocumentAnalyzer",
                    started.elapsed().as_secs_f64(),
                    ANALYZER_TOKEN_ESTIMATE,
                    false,
                ));
                return Err(e);
            }
        };

        // ── Generating ──────────────────────────────────────────────────
        info!(
            phase = ?Phase::Generating,
            parallel = request.enable_parallel_processing,
            "Generating questions and evaluation tips"
        );
        // Tips are generated against the deterministic basic set in both
        // modes, then aligned to the final questions, so parallel and
        // sequential runs produce identical content. The basic set is sized
        // to the requested count so a healthy tips service covers every
        // final question.
        let basic = basic_questions(&ctx);

        let question_arm = async {
            let started = Instant::now();
            match self.questions.generate(&analysis.analysis, &ctx).await {
                Ok(questions) => {
                    let record = AgentPerformanceRecord::new(
                        "QuestionGenerator",
                        started.elapsed().as_secs_f64(),
                        QUESTION_TOKEN_ESTIMATE,
                        true,
                    );
                    (questions, record, true)
                }
                Err(e) => {
                    warn!("Question generation failed, using default set: {e}");
                    let record = AgentPerformanceRecord::new(
                        "QuestionGenerator",
                        started.elapsed().as_secs_f64(),
                        QUESTION_TOKEN_ESTIMATE,
                        false,
                    );
                    (default_questions(&ctx), record, false)
                }
            }
        };

        let tips_arm = async {
            let started = Instant::now();
            match self.tips.generate(&basic, &ctx).await {
                Ok(tips) => {
                    let record = AgentPerformanceRecord::new(
                        "AnswerTipsGenerator",
                        started.elapsed().as_secs_f64(),
                        TIPS_TOKEN_ESTIMATE,
                        true,
                    );
                    (tips, record, true)
                }
                Err(e) => {
                    warn!("Tip generation failed, using fallback tips: {e}");
                    let tips = basic
                        .iter()
                        .map(|q| fallback_tip(&q.question, &ctx.role))
                        .collect();
                    let record = AgentPerformanceRecord::new(
                        "AnswerTipsGenerator",
                        started.elapsed().as_secs_f64(),
                        TIPS_TOKEN_ESTIMATE,
                        false,
                    );
                    (tips, record, false)
                }
            }
        };

        let prep_arm = async {
            let started = Instant::now();
            // Assembles the assessment focus ahead of the quality phase;
            // purely local, so it cannot fail.
            let mut focus: Vec<String> =
                CONSISTENCY_CHECKS.iter().map(|c| c.to_string()).collect();
            focus.extend(ctx.custom_focus_areas.iter().cloned());
            let record = AgentPerformanceRecord::new(
                "QualityPreparation",
                started.elapsed().as_secs_f64(),
                QUALITY_PREP_TOKEN_ESTIMATE,
                true,
            );
            (focus, record, true)
        };

        let ((questions, q_record, q_ok), (tips, t_record, t_ok), (quality_focus, p_record, _)) =
            if request.enable_parallel_processing {
                tokio::join!(question_arm, tips_arm, prep_arm)
            } else {
                (question_arm.await, tips_arm.await, prep_arm.await)
            };

        let task_success: HashMap<&str, bool> = HashMap::from([
            ("question_generation", q_ok),
            ("tip_generation", t_ok),
            ("quality_preparation", true),
        ]);
        info!(?task_success, focus_checks = quality_focus.len(), "Generation phase complete");
        metrics.push(q_record);
        metrics.push(t_record);
        metrics.push(p_record);

        let tips = align_tips(tips, &questions, &ctx.role);

        // ── AssuringQuality ─────────────────────────────────────────────
        let quality = if request.enable_quality_assurance {
            info!(phase = ?Phase::AssuringQuality, "Assessing content quality");
            let started = Instant::now();
            match self.assure_quality(&questions, &tips, &ctx).await {
                Ok(payload) => {
                    metrics.push(AgentPerformanceRecord::new(
                        "QualityAssurance",
                        started.elapsed().as_secs_f64(),
                        QUALITY_TOKEN_ESTIMATE,
                        true,
                    ));
                    payload
                }
                Err(e) => {
                    warn!("Quality assurance failed, using fallback payload: {e}");
                    metrics.push(AgentPerformanceRecord::new(
                        "QualityAssurance",
                        started.elapsed().as_secs_f64(),
                        QUALITY_TOKEN_ESTIMATE,
                        false,
                    ));
                    QualityPayload::fallback(questions.len(), tips.len())
                }
            }
        } else {
            info!(phase = ?Phase::AssuringQuality, "Quality assurance disabled, skipping");
            QualityPayload::skipped()
        };

        // ── Formatting ──────────────────────────────────────────────────
        info!(phase = ?Phase::Formatting, "Assembling final package");
        let started = Instant::now();
        let package = match self
            .formatter
            .format(questions, tips, &quality, metrics.clone(), request)
            .await
        {
            Ok(package) => package,
            Err(e) => {
                metrics.push(AgentPerformanceRecord::new(
                    "ResponseFormatter",
                    started.elapsed().as_secs_f64(),
                    FORMATTER_TOKEN_ESTIMATE,
                    false,
                ));
                return Err(e);
            }
        };

        info!(
            phase = ?Phase::Done,
            package_id = %package.package_id,
            overall_quality = package.overall_quality_score,
            "Interview package ready"
        );
        Ok(package)
    }

    async fn assure_quality(
        &self,
        questions: &[QuestionRecord],
        tips: &[AnswerTipRecord],
        ctx: &GenerationContext,
    ) -> Result<QualityPayload, AppError> {
        let question_metrics = self.quality.assess_questions(questions, ctx).await?;
        let tip_metrics = self.quality.assess_answer_tips(tips, questions, ctx).await?;
        let consistency = self.quality.validate_consistency(questions, tips, ctx).await?;
        Ok(QualityPayload::from_parts(
            question_metrics,
            tip_metrics,
            consistency,
        ))
    }
}

/// Terminal-failure package. Always schema-conformant: one explanatory
/// question/tip pair carrying the error message, zeroed scores, the error
/// flag set in metadata, and every performance record accumulated before
/// the failure.
pub fn error_package(
    request: &GenerationRequest,
    error: &AppError,
    metrics: Vec<AgentPerformanceRecord>,
) -> FinalInterviewPackage {
    let message = error.to_string();
    let question = QuestionRecord {
        question: format!("Error occurred during generation: {message}"),
        question_type: QuestionType::Technical,
        difficulty: Difficulty::Basic,
        expected_duration_minutes: 1,
        tags: vec!["error".to_string()],
        follow_up_questions: Vec::new(),
        quality_metrics: QualityMetrics::zeroed(),
    };
    let mut tip = fallback_tip(&question.question, &request.role);
    tip.evaluation_guidance = format!("Generation failed: {message}");
    tip.quality_metrics = QualityMetrics::zeroed();

    let consistency = ConsistencyReport::with_all_checks(0.0, false);
    let quality_report = QualityReport {
        overall_assessment: assessment_label(0.0).to_string(),
        overall_quality: 0.0,
        question_quality: 0.0,
        tip_quality: 0.0,
        consistency: 0.0,
        improvement_suggestions: vec![
            "Regenerate the package after resolving the error".to_string()
        ],
        checks: consistency.checks,
    };

    FinalInterviewPackage {
        package_id: uuid::Uuid::new_v4(),
        questions: vec![question],
        answer_tips: vec![tip],
        interview_focus: format!(
            "{} for a {} {} position.",
            request.round.focus_summary(),
            request.level.as_str(),
            request.role
        ),
        preparation_tips: Vec::new(),
        overall_quality_score: 0.0,
        generation_metadata: GenerationMetadata {
            generated_at: chrono::Utc::now(),
            total_processing_seconds: metrics.iter().map(|m| m.processing_time_seconds).sum(),
            total_token_estimate: metrics.iter().map(|m| m.token_usage_estimate).sum(),
            agents_used: metrics.iter().map(|m| m.agent_name.clone()).collect(),
            parallel_processing_enabled: request.enable_parallel_processing,
            quality_assurance_enabled: request.enable_quality_assurance,
            error: true,
            error_message: Some(message),
        },
        processing_metrics: metrics,
        quality_report,
        interview_structure: InterviewStructure::default(),
        evaluation_framework: EvaluationFramework::default(),
        candidate_assessment_guide: Vec::new(),
    }
}
