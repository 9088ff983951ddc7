// All LLM prompt constants for the Generation module.
// Reuses cross-cutting fragments from llm_client::prompts.
// Output shapes are declared by llm_client::schemas, not repeated here.

/// System prompt for job research.
pub const JOB_RESEARCH_SYSTEM: &str = "You are an expert recruiter researching a job opening. \
    Report what the posting actually says and cite where the information came from. \
    Never invent requirements that the posting does not state.";

/// Job research prompt. Replace `{job_target}` before sending.
pub const JOB_RESEARCH_PROMPT_TEMPLATE: &str = r#"Find the job posting for the following target and return its full description.

JOB TARGET:
{job_target}

Rules:
- "description": the complete job description text (responsibilities, requirements, company context).
- "sources": the URLs or document names the description was taken from. Use an empty list if none."#;

/// System prompt for the applications-open check.
pub const OPEN_STATUS_SYSTEM: &str = "You are an expert recruiter. \
    Decide whether a job opening is still accepting applications, \
    and state how confident you are.";

/// Open-status prompt. Replace `{job_target}` and `{job_description}`.
pub const OPEN_STATUS_PROMPT_TEMPLATE: &str = r#"Is the following job currently accepting applications?

JOB TARGET:
{job_target}

JOB DESCRIPTION:
{job_description}

Rules:
- "open": true if applications are being accepted, false if the posting is closed, filled, or expired.
- "confidence": a number between 0.0 and 1.0."#;

/// System prompt for relevance scoring.
pub const RELEVANCE_SYSTEM: &str = "You are an expert hiring manager. \
    Rate how relevant one item from a candidate's CV is to a specific job. \
    Be strict and consistent.";

/// Relevance prompt. Replace `{item}` and `{job_description}`.
pub const RELEVANCE_PROMPT_TEMPLATE: &str = r#"Rate the relevance of this CV item to the job below.

CV ITEM:
{item}

JOB DESCRIPTION:
{job_description}

Rules:
- "score": an integer from 1 (irrelevant) to 10 (essential for this job).
- "rationale": exactly one sentence explaining the score."#;

/// System prompt for CV composition.
pub const CV_SYSTEM: &str = "You are an expert CV writer. \
    Turn structured candidate data into a polished, well-formatted Markdown CV. \
    Keep the order of skills, achievements, and roles exactly as given: they are ranked by relevance.";

/// CV prompt. Replace `{grounding_instruction}` and `{cv_json}`.
pub const CV_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

STRUCTURED CV DATA (source of truth, ONLY use facts from here):
{cv_json}

Write the complete CV in Markdown:
1. Name and contact details as a header
2. Qualifications
3. Skills, in the order given
4. Key achievements, in the order given
5. Experience, one entry per role; include a role's description only if one is provided

Return the Markdown in "cv_markdown"."#;

/// System prompt for the covering letter.
pub const COVERING_LETTER_SYSTEM: &str = "You are an expert career coach. \
    Write concise, specific, professional covering letters. \
    Avoid clichés and generic filler.";

/// Covering letter prompt.
/// Replace: {grounding_instruction}, {profile_json}, {tone_notes}, {job_description}
pub const COVERING_LETTER_PROMPT_TEMPLATE: &str = r#"{grounding_instruction}

CANDIDATE PROFILE:
{profile_json}

TONE AND NOTES FROM THE CANDIDATE:
{tone_notes}

JOB DESCRIPTION:
{job_description}

Write a one-page covering letter (250-400 words) for this job:
- Open with a specific hook tied to the role
- Highlight the three or four strengths that best match the job
- Follow the candidate's tone notes
- Close with a short call to action and sign with the candidate's name

Return the letter text in "covering_letter"."#;

/// Stand-in when the candidate supplied no tone notes.
pub const NO_TONE_NOTES: &str = "(none provided; use a confident, warm, professional tone)";
