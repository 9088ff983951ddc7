//! Orchestrator: sequences one application attempt and reapplies on a schedule.
//!
//! Pipeline per attempt:
//! 1. Load the candidate profile and tone notes
//! 2. Research the job and check it is still open (closed ends the attempt)
//! 3. Score, rank, and trim profile content; compose the CV
//! 4. Suggest edits, run the review loop, apply the approved edits (if any)
//! 5. Compose the covering letter and hand both documents to the reporter

pub mod schedule;

use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::composer::{compose_covering_letter, compose_cv};
use crate::generation::content_selector::select_content;
use crate::generation::job::{check_open, describe_job, OpenStatus};
use crate::models::job::JobTarget;
use crate::models::profile::CandidateProfile;
use crate::output::Operator;
use crate::review::applier::apply_edits;
use crate::review::session::run_review;
use crate::review::suggestions::suggest;
use crate::state::AppState;

use schedule::{RunMode, Scheduler, Sleeper};

/// Everything an attempt reads from outside the process.
#[derive(Debug, Clone)]
pub struct AttemptInputs {
    pub job: JobTarget,
    pub profile_path: PathBuf,
    pub notes_path: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DraftedApplication {
    pub cv_markdown: String,
    pub covering_letter: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Drafted(DraftedApplication),
    ApplicationsClosed(OpenStatus),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub attempts: u32,
    pub drafted: u32,
    pub closed: u32,
}

impl RunSummary {
    fn record(&mut self, outcome: &AttemptOutcome) {
        self.attempts += 1;
        match outcome {
            AttemptOutcome::Drafted(_) => self.drafted += 1,
            AttemptOutcome::ApplicationsClosed(_) => self.closed += 1,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Single attempt
// ────────────────────────────────────────────────────────────────────────────

pub async fn run_attempt(
    state: &AppState,
    inputs: &AttemptInputs,
    operator: &mut dyn Operator,
) -> Result<AttemptOutcome, AppError> {
    let reporter = state.reporter.as_ref();
    let llm = state.llm.as_ref();

    // Step 1: Local inputs
    let profile = CandidateProfile::load(&inputs.profile_path).await?;
    let tone_notes = load_notes(&inputs.notes_path).await?;

    // Step 2: Job research
    reporter.status(&format!("Researching {}", inputs.job));
    let job = describe_job(&inputs.job, llm).await?;
    info!("Job description: {} chars, {} source(s)", job.description.len(), job.sources.len());

    let status = check_open(&inputs.job, &job, llm).await?;
    if !status.open {
        reporter.status(&format!(
            "Applications for {} appear closed (confidence {:.2}); nothing drafted",
            inputs.job, status.confidence
        ));
        return Ok(AttemptOutcome::ApplicationsClosed(status));
    }

    // Step 3: Content selection and CV
    reporter.status("Scoring profile content against the job");
    let structured = select_content(&profile, &job, state.scorer.as_ref()).await?;
    reporter.status("Composing CV");
    let draft = compose_cv(&structured, llm).await?;

    // Step 4: Review
    reporter.status("Asking for suggested edits");
    let suggestions = suggest(&draft, llm).await?;
    let review = run_review(suggestions, operator, reporter).await?;
    let cv_markdown = if review.should_apply() {
        reporter.status(&format!("Applying {} approved edit(s)", review.approved.len()));
        apply_edits(&draft, &review.approved, llm).await?
    } else {
        info!("No approved edits; keeping the composed CV");
        draft
    };

    // Step 5: Covering letter
    reporter.status("Composing covering letter");
    let covering_letter = compose_covering_letter(&profile, &tone_notes, &job, llm).await?;

    reporter.document("Covering letter", &covering_letter);
    reporter.document("CV", &cv_markdown);

    Ok(AttemptOutcome::Drafted(DraftedApplication {
        cv_markdown,
        covering_letter,
    }))
}

/// Reads the tone notes; a missing file means no notes.
async fn load_notes(path: &Path) -> Result<String, AppError> {
    match tokio::fs::read_to_string(path).await {
        Ok(notes) => Ok(notes),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!("No tone notes at {}", path.display());
            Ok(String::new())
        }
        Err(e) => Err(AppError::Input(format!(
            "Failed to read tone notes {}: {e}",
            path.display()
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Reapply loop
// ────────────────────────────────────────────────────────────────────────────

/// Runs attempts until the mode's attempt budget is spent, sleeping a random
/// number of days between them. Any error ends the run.
pub async fn run<S: Sleeper>(
    state: &AppState,
    inputs: &AttemptInputs,
    mode: RunMode,
    scheduler: &mut Scheduler<S>,
    operator: &mut dyn Operator,
) -> Result<RunSummary, AppError> {
    let attempts = scheduler.policy().attempts_for(mode);
    let mut summary = RunSummary::default();

    for attempt in 1..=attempts {
        let attempt_id = Uuid::new_v4();
        let span = info_span!("attempt", %attempt_id, attempt, of = attempts);

        state
            .reporter
            .status(&format!("Attempt {attempt}/{attempts} for {}", inputs.job));
        let outcome = run_attempt(state, inputs, operator).instrument(span).await?;
        match &outcome {
            AttemptOutcome::Drafted(drafted) => info!(
                "Attempt {attempt} drafted: CV {} chars, covering letter {} chars",
                drafted.cv_markdown.len(),
                drafted.covering_letter.len()
            ),
            AttemptOutcome::ApplicationsClosed(status) => info!(
                confidence = status.confidence,
                "Attempt {attempt} found applications closed"
            ),
        }
        summary.record(&outcome);

        if attempt == attempts {
            break;
        }

        let next = scheduler.next_run_at(Utc::now());
        state
            .reporter
            .status(&format!("Next attempt scheduled for {}", next.to_rfc3339()));
        scheduler.sleep_until(next).await;
    }

    info!(
        "Run finished: {} attempt(s), {} drafted, {} closed",
        summary.attempts, summary.drafted, summary.closed
    );
    Ok(summary)
}
