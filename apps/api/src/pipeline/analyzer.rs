//! Document analysis — the required first phase. There is no fallback here:
//! every downstream generator consumes the analysis, so failure is fatal and
//! propagates to the coordinator as a typed generation error.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::AppError;
use crate::llm_client::TextGeneration;
use crate::models::package::AnalysisResult;
use crate::pipeline::prompts::{ANALYZER_PROMPT_TEMPLATE, ANALYZER_SYSTEM};

#[async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    async fn analyze(&self, jd_text: &str, cv_text: &str) -> Result<AnalysisResult, AppError>;
}

/// Production analyzer backed by the text-generation service.
pub struct LlmDocumentAnalyzer {
    service: Arc<dyn TextGeneration>,
}

impl LlmDocumentAnalyzer {
    pub fn new(service: Arc<dyn TextGeneration>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl DocumentAnalyzer for LlmDocumentAnalyzer {
    async fn analyze(&self, jd_text: &str, cv_text: &str) -> Result<AnalysisResult, AppError> {
        let prompt = ANALYZER_PROMPT_TEMPLATE
            .replace("{jd_text}", jd_text)
            .replace("{cv_text}", cv_text);

        let analysis = self
            .service
            .generate(&prompt, ANALYZER_SYSTEM)
            .await
            .map_err(|e| AppError::Generation(format!("Document analysis failed: {e}")))?;

        Ok(AnalysisResult {
            analysis,
            status: "completed".to_string(),
        })
    }
}
