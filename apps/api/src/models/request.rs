//! Generation request model and the enums that drive question depth and focus.

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// Candidate seniority tier. Drives question/answer depth expectations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExperienceLevel {
    Junior,
    Mid,
    Senior,
    Lead,
    Principal,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => "Junior",
            ExperienceLevel::Mid => "Mid",
            ExperienceLevel::Senior => "Senior",
            ExperienceLevel::Lead => "Lead",
            ExperienceLevel::Principal => "Principal",
        }
    }

    /// Level-specific guidance injected into generation prompts.
    pub fn guidelines(&self) -> &'static str {
        match self {
            ExperienceLevel::Junior => {
                "Focus on fundamentals, learning ability, potential, basic technical concepts"
            }
            ExperienceLevel::Mid => {
                "Balance technical depth with practical experience and independent work capability"
            }
            ExperienceLevel::Senior => {
                "Advanced technical concepts, leadership scenarios, architectural decisions, mentoring"
            }
            ExperienceLevel::Lead => {
                "Team leadership, mentoring capability, strategic thinking, cross-functional collaboration"
            }
            ExperienceLevel::Principal => {
                "Vision setting, technical strategy, organizational impact, thought leadership"
            }
        }
    }
}

/// Interview round. Serialized as its stage number (1-4) on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InterviewRound {
    Screening,
    Technical,
    Behavioral,
    Final,
}

impl TryFrom<u8> for InterviewRound {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(InterviewRound::Screening),
            2 => Ok(InterviewRound::Technical),
            3 => Ok(InterviewRound::Behavioral),
            4 => Ok(InterviewRound::Final),
            other => Err(format!("unknown interview round {other} (expected 1-4)")),
        }
    }
}

impl From<InterviewRound> for u8 {
    fn from(round: InterviewRound) -> u8 {
        match round {
            InterviewRound::Screening => 1,
            InterviewRound::Technical => 2,
            InterviewRound::Behavioral => 3,
            InterviewRound::Final => 4,
        }
    }
}

impl InterviewRound {
    pub fn number(&self) -> u8 {
        (*self).into()
    }

    pub fn name(&self) -> &'static str {
        match self {
            InterviewRound::Screening => "Screening",
            InterviewRound::Technical => "Technical",
            InterviewRound::Behavioral => "Behavioral",
            InterviewRound::Final => "Final",
        }
    }

    /// Round-specific focus areas injected into generation prompts.
    pub fn focus(&self) -> &'static str {
        match self {
            InterviewRound::Screening => {
                "Basic qualifications, cultural fit, motivation assessment, initial screening"
            }
            InterviewRound::Technical => {
                "Deep technical evaluation, problem-solving, hands-on challenges, technical depth"
            }
            InterviewRound::Behavioral => {
                "STAR method questions, leadership examples, team dynamics, behavioral competencies"
            }
            InterviewRound::Final => {
                "Strategic thinking, long-term vision, comprehensive cultural assessment"
            }
        }
    }

    /// One-line focus description used as the package's `interview_focus`.
    pub fn focus_summary(&self) -> &'static str {
        match self {
            InterviewRound::Screening => "Initial screening and basic qualification assessment",
            InterviewRound::Technical => "Deep technical evaluation and problem-solving skills",
            InterviewRound::Behavioral => "Behavioral assessment and cultural fit evaluation",
            InterviewRound::Final => "Final assessment and decision-making evaluation",
        }
    }
}

fn default_question_count() -> usize {
    5
}

fn default_true() -> bool {
    true
}

/// A single interview-package generation request. Immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub job_description: String,
    pub cv: String,
    pub role: String,
    pub level: ExperienceLevel,
    pub round: InterviewRound,
    #[serde(default = "default_question_count")]
    pub question_count: usize,
    #[serde(default = "default_true")]
    pub enable_parallel_processing: bool,
    #[serde(default = "default_true")]
    pub enable_quality_assurance: bool,
    #[serde(default = "default_true")]
    pub include_follow_ups: bool,
    #[serde(default)]
    pub custom_focus_areas: Vec<String>,
    #[serde(default)]
    pub difficulty_preference: Option<String>,
}

impl GenerationRequest {
    /// Rejects malformed requests before any phase starts.
    /// Unknown level/round values are already rejected at deserialization.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.role.trim().len() < 3 {
            return Err(AppError::Validation(
                "role must be at least 3 characters".to_string(),
            ));
        }
        if self.job_description.trim().is_empty() {
            return Err(AppError::Validation(
                "job_description cannot be empty".to_string(),
            ));
        }
        if self.cv.trim().is_empty() {
            return Err(AppError::Validation("cv cannot be empty".to_string()));
        }
        if self.question_count == 0 {
            return Err(AppError::Validation(
                "question_count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base_request() -> serde_json::Value {
        json!({
            "job_description": "We need a Rust engineer for our platform team.",
            "cv": "Five years of systems programming experience.",
            "role": "Backend Engineer",
            "level": "Senior",
            "round": 2
        })
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: GenerationRequest = serde_json::from_value(base_request()).unwrap();
        assert_eq!(request.question_count, 5);
        assert!(request.enable_parallel_processing);
        assert!(request.enable_quality_assurance);
        assert!(request.include_follow_ups);
        assert!(request.custom_focus_areas.is_empty());
        assert!(request.difficulty_preference.is_none());
    }

    #[test]
    fn test_unknown_level_rejected_at_deserialization() {
        let mut value = base_request();
        value["level"] = json!("Intern");
        let result: Result<GenerationRequest, _> = serde_json::from_value(value);
        assert!(result.is_err(), "level=Intern must fail deserialization");
    }

    #[test]
    fn test_unknown_round_rejected_at_deserialization() {
        let mut value = base_request();
        value["round"] = json!(9);
        let result: Result<GenerationRequest, _> = serde_json::from_value(value);
        assert!(result.is_err(), "round=9 must fail deserialization");
    }

    #[test]
    fn test_round_roundtrips_as_number() {
        assert_eq!(InterviewRound::try_from(3).unwrap(), InterviewRound::Behavioral);
        assert_eq!(InterviewRound::Final.number(), 4);
        let json = serde_json::to_value(InterviewRound::Technical).unwrap();
        assert_eq!(json, json!(2));
    }

    #[test]
    fn test_short_role_fails_validation() {
        let mut value = base_request();
        value["role"] = json!("QA");
        let request: GenerationRequest = serde_json::from_value(value).unwrap();
        let err = request.validate().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_empty_documents_fail_validation() {
        let mut value = base_request();
        value["cv"] = json!("   ");
        let request: GenerationRequest = serde_json::from_value(value).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_zero_question_count_fails_validation() {
        let mut value = base_request();
        value["question_count"] = json!(0);
        let request: GenerationRequest = serde_json::from_value(value).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_valid_request_passes_validation() {
        let request: GenerationRequest = serde_json::from_value(base_request()).unwrap();
        assert!(request.validate().is_ok());
    }
}
