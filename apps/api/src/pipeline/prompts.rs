// All LLM prompt constants for the pipeline agents.

/// System prompt for the document analyzer.
pub const ANALYZER_SYSTEM: &str =
    "You are an expert recruitment analyst. You compare a job description \
    against a candidate CV and produce a focused written analysis: matched \
    skills, missing skills, strong areas, potential red flags, and the areas \
    an interviewer should probe. Be specific and concise.";

/// Analyzer prompt template. Replace `{jd_text}` and `{cv_text}`.
pub const ANALYZER_PROMPT_TEMPLATE: &str = r#"Analyze the following job description and candidate CV for interview preparation.

Cover:
1. Skills required by the role and how well the CV evidences them
2. Experience gaps the interviewer should probe
3. Strong areas worth validating in depth
4. Any red flags or inconsistencies
5. Recommended interview focus areas

JOB DESCRIPTION:
{jd_text}

CANDIDATE CV:
{cv_text}"#;

/// System prompt for question generation — enforces JSON-only output.
pub const QUESTION_SYSTEM: &str =
    "You are an expert interviewer designing role-specific interview questions. \
    You MUST respond with valid JSON only — a JSON array of question objects. \
    Do NOT include any text outside the JSON array. \
    Do NOT use markdown code fences.";

/// Question generation prompt template.
/// Replace: {count}, {level}, {role}, {round_name}, {round_focus},
///          {level_guidelines}, {focus_areas}, {difficulty_preference}, {analysis}
pub const QUESTION_PROMPT_TEMPLATE: &str = r#"Generate exactly {count} interview questions for a {level} {role} candidate in the {round_name} round.

ROUND FOCUS:
{round_focus}

LEVEL GUIDELINES ({level}):
{level_guidelines}

CUSTOM FOCUS AREAS (incorporate if non-empty):
{focus_areas}

DIFFICULTY PREFERENCE: {difficulty_preference}

CANDIDATE ANALYSIS:
{analysis}

Return a JSON ARRAY with this EXACT schema per element:
[
  {
    "question": "Describe a distributed system you designed and the trade-offs you made.",
    "question_type": "technical",
    "difficulty": "advanced",
    "expected_duration_minutes": 8
  }
]

Rules:
- question_type is one of: "technical", "behavioral", "situational", "cultural_fit"
- difficulty is one of: "basic", "intermediate", "advanced", "expert"
- Vary question types; tailor difficulty to the {level} level
- Tailor content to the candidate's strengths and gaps from the analysis"#;

/// System prompt for evaluation-tip generation — enforces JSON-only output.
pub const TIPS_SYSTEM: &str =
    "You are an interview evaluation specialist helping interviewers assess \
    candidate responses fairly and effectively. \
    You MUST respond with valid JSON only — a single JSON object. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Per-question evaluation-tip prompt template.
/// Replace: {role}, {level}, {round_name}, {question}, {question_type}, {difficulty}
pub const TIPS_PROMPT_TEMPLATE: &str = r#"Create an evaluation guide for this interview question.

INTERVIEW CONTEXT:
- Role: {role}
- Experience Level: {level}
- Interview Round: {round_name}

QUESTION: {question}
TYPE: {question_type}
DIFFICULTY: {difficulty}

Return a JSON object with this EXACT schema:
{
  "evaluation_guidance": "One paragraph of overall assessment guidance",
  "what_to_listen_for": ["Specific examples", "Measurable outcomes"],
  "scoring_criteria": "1-5 scale description with concrete indicators",
  "red_flags": ["Vague answers without specifics"],
  "excellent_indicators": ["Quantified results with clear ownership"],
  "follow_up_questions": ["Probing question 1", "Probing question 2"],
  "assessment_framework": "Structure, Content, Delivery, Relevance",
  "time_management": "Expected response length and pacing"
}

Tailor the guidance to the question type: STAR usage for behavioral, technical
accuracy and trade-offs for technical, stakeholder reasoning for situational,
values alignment for cultural fit."#;

/// System prompt for quality assessment — enforces JSON-only output.
pub const QUALITY_SYSTEM: &str =
    "You are a quality assurance reviewer for interview content. \
    You score content on a 0-1 scale where 0.9-1.0 is excellent and ready to \
    use, 0.7-0.89 good with minor improvements possible, 0.5-0.69 acceptable \
    with some improvements needed, 0.3-0.49 below standard, 0.0-0.29 poor. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Appended to every assessment system prompt.
pub const FAIRNESS_INSTRUCTION: &str =
    "Maintain fairness and objectivity: assess content against the stated role, \
    experience level, and interview round only. Do NOT penalize or reward content \
    for attributes unrelated to job performance.";

/// Per-question quality assessment template.
/// Replace: {item_kind}, {content}, {role}, {level}, {round_name}
pub const QUALITY_ITEM_PROMPT_TEMPLATE: &str = r#"Assess the quality of this interview {item_kind}.

CONTENT:
{content}

CONTEXT:
- Role: {role}
- Experience Level: {level}
- Interview Round: {round_name}

Return a JSON object with scores in [0,1]:
{
  "relevance": 0.9,
  "clarity": 0.8,
  "completeness": 0.85,
  "consistency": 0.9,
  "overall": 0.86
}

Score relevance to the role and requirements, clarity and specificity,
completeness of coverage, and consistency with the experience level."#;

/// Consistency validation template.
/// Replace: {role}, {level}, {round_name}, {question_count}, {questions_overview}
pub const CONSISTENCY_PROMPT_TEMPLATE: &str = r#"Validate the consistency of this interview content set.

CONTEXT:
- Role: {role}
- Experience Level: {level}
- Interview Round: {round_name}
- Number of Questions: {question_count}

QUESTIONS OVERVIEW:
{questions_overview}

VALIDATION CHECKS:
1. experience_level: Are all questions appropriate for the {level} level?
2. role_relevance: Do all questions relate to {role} responsibilities?
3. round_focus: Do questions align with the {round_name} round objectives?
4. difficulty_balance: Is there an appropriate difficulty distribution?
5. question_variety: Is there good variety in question types?
6. tip_alignment: Do evaluation tips match their corresponding questions?

Return a JSON object with this EXACT schema:
{
  "overall_consistency": 0.85,
  "issues": ["Question 3 difficulty exceeds the stated level"],
  "recommendations": ["Rebalance difficulty toward intermediate"],
  "checks": {
    "experience_level": true,
    "role_relevance": true,
    "round_focus": true,
    "difficulty_balance": false,
    "question_variety": true,
    "tip_alignment": true
  }
}"#;

/// System prompt for interviewer-guidance synthesis — enforces JSON-only output.
pub const GUIDANCE_SYSTEM: &str =
    "You are an interview coach producing practical, actionable guidance for \
    interviewers. You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Interviewer guidance template.
/// Replace: {role}, {level}, {round_name}, {question_count}
pub const GUIDANCE_PROMPT_TEMPLATE: &str = r#"Create interviewer guidance for this interview.

CONTEXT:
- Role: {role}
- Experience Level: {level}
- Interview Round: {round_name}
- Number of Questions: {question_count}

Return a JSON object with this EXACT schema:
{
  "preparation_tips": ["Review the candidate's background thoroughly"],
  "interview_structure": {
    "introduction": "5 minutes - Welcome and role overview",
    "main_questions": "30-40 minutes - Core interview questions",
    "candidate_questions": "10 minutes - Candidate's questions",
    "wrap_up": "5 minutes - Next steps and closing"
  },
  "candidate_assessment_guide": ["Focus on specific examples and outcomes"]
}"#;
