//! Interview-package generation pipeline: document analysis, question and
//! tip generation, quality assurance, and final package assembly, driven by
//! the [`coordinator::InterviewCoordinator`].

pub mod analyzer;
pub mod coordinator;
pub mod formatter;
pub mod prompts;
pub mod quality;
pub mod questions;
pub mod scrape;
pub mod tips;
