//! Interactive Review Loop: the operator prunes and rewrites suggestions
//! before any of them reach the edit applier.
//!
//! States: `Reviewing` → `Applying` (`c`) | `Aborted` (`q`).
//! Nothing is committed until a terminal state: `c` forwards every surviving
//! suggestion, `q` forwards none.

use std::ops::RangeInclusive;

use tracing::{debug, info};

use crate::errors::AppError;
use crate::output::{Operator, Reporter};
use crate::review::suggestions::Suggestion;

/// Suggestions the operator approved, passed verbatim to the edit applier.
pub type ApprovedEditSet = Vec<Suggestion>;

const COMMAND_PROMPT: &str = "review> ";
const REPLACEMENT_PROMPT: &str = "New text (blank keeps current): ";

pub const HELP: &str = "Commands:
  d <n[,n...]>  delete suggestions (ranges like 2-4 allowed)
  d a           delete all suggestions
  e <n>         edit a suggestion's text
  c             continue and apply the remaining suggestions
  q             quit without applying any suggestion
  h             show this help";

// ────────────────────────────────────────────────────────────────────────────
// Commands
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewCommand {
    /// 1-based indices as typed; single numbers are one-element ranges.
    Delete(Vec<RangeInclusive<usize>>),
    DeleteAll,
    /// `None` when the index was missing or not a number.
    Edit(Option<usize>),
    Continue,
    Quit,
    Help,
    Unrecognized(String),
}

impl ReviewCommand {
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        let (verb, rest) = match input.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (input, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "d" if rest.eq_ignore_ascii_case("a") => ReviewCommand::DeleteAll,
            "d" => ReviewCommand::Delete(parse_indices(rest)),
            "e" => ReviewCommand::Edit(rest.parse().ok()),
            "c" if rest.is_empty() => ReviewCommand::Continue,
            "q" if rest.is_empty() => ReviewCommand::Quit,
            "h" | "?" if rest.is_empty() => ReviewCommand::Help,
            _ => ReviewCommand::Unrecognized(input.to_string()),
        }
    }
}

/// Parses `1,3-5 7` into ranges. Tokens that are not a number or an ascending
/// `a-b` range are skipped.
fn parse_indices(raw: &str) -> Vec<RangeInclusive<usize>> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .filter_map(|token| match token.split_once('-') {
            Some((start, end)) => {
                let start: usize = start.trim().parse().ok()?;
                let end: usize = end.trim().parse().ok()?;
                (start <= end).then_some(start..=end)
            }
            None => token.parse().ok().map(|n| n..=n),
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Session state
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Reviewing,
    Applying,
    Aborted,
}

/// How a review ended. `approved` is empty whenever `state` is `Aborted`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewOutcome {
    pub state: ReviewState,
    pub approved: ApprovedEditSet,
}

impl ReviewOutcome {
    /// True when there is something for the edit applier to do.
    pub fn should_apply(&self) -> bool {
        self.state == ReviewState::Applying && !self.approved.is_empty()
    }
}

/// The live suggestion list. Indices exposed to the operator are 1-based.
#[derive(Debug, Clone)]
pub struct ReviewSession {
    suggestions: Vec<Suggestion>,
    state: ReviewState,
}

impl ReviewSession {
    pub fn new(suggestions: Vec<Suggestion>) -> Self {
        Self {
            suggestions,
            state: ReviewState::Reviewing,
        }
    }

    pub fn state(&self) -> ReviewState {
        self.state
    }

    pub fn suggestions(&self) -> &[Suggestion] {
        &self.suggestions
    }

    pub fn len(&self) -> usize {
        self.suggestions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suggestions.is_empty()
    }

    /// Maps a 1-based operator index to a position, if it is in bounds.
    pub fn resolve(&self, index: usize) -> Option<usize> {
        (1..=self.suggestions.len())
            .contains(&index)
            .then(|| index - 1)
    }

    /// Removes every suggestion whose 1-based index falls in `ranges`.
    /// Out-of-bounds indices are ignored. Returns the number removed.
    pub fn delete(&mut self, ranges: &[RangeInclusive<usize>]) -> usize {
        let before = self.suggestions.len();
        let mut position = 0;
        self.suggestions.retain(|_| {
            position += 1;
            !ranges.iter().any(|r| r.contains(&position))
        });
        before - self.suggestions.len()
    }

    pub fn delete_all(&mut self) {
        self.suggestions.clear();
    }

    /// Replaces the text of suggestion `index` (1-based). Blank text keeps the
    /// current wording. Returns false if the index is out of bounds.
    pub fn replace(&mut self, index: usize, text: &str) -> bool {
        let Some(position) = self.resolve(index) else {
            return false;
        };
        let text = text.trim();
        if !text.is_empty() {
            self.suggestions[position].suggestion = text.to_string();
        }
        true
    }

    /// `c`: the surviving suggestions become the approved set.
    pub fn approve(&mut self) {
        self.state = ReviewState::Applying;
    }

    /// `q`: nothing is approved, whatever was edited before.
    pub fn abort(&mut self) {
        self.state = ReviewState::Aborted;
        self.suggestions.clear();
    }

    pub fn into_outcome(self) -> ReviewOutcome {
        ReviewOutcome {
            state: self.state,
            approved: self.suggestions,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Interactive loop
// ────────────────────────────────────────────────────────────────────────────

/// Runs the review loop until the operator continues or quits.
/// An empty suggestion list returns immediately without prompting; closed
/// input counts as quitting.
pub async fn run_review(
    suggestions: Vec<Suggestion>,
    operator: &mut dyn Operator,
    reporter: &dyn Reporter,
) -> Result<ReviewOutcome, AppError> {
    let mut session = ReviewSession::new(suggestions);

    if session.is_empty() {
        reporter.status("No suggestions to review; keeping the document as is");
        session.approve();
        return Ok(session.into_outcome());
    }

    render(&session, reporter);
    reporter.line(HELP);

    while session.state() == ReviewState::Reviewing {
        let Some(input) = operator.read_line(COMMAND_PROMPT).await? else {
            info!("Operator input closed during review; applying nothing");
            session.abort();
            break;
        };

        let command = ReviewCommand::parse(&input);
        debug!(?command, "Review command");

        match command {
            ReviewCommand::Delete(ranges) => {
                let removed = session.delete(&ranges);
                if removed == 0 {
                    reporter.line("No suggestions deleted.");
                } else {
                    reporter.line(&format!("Deleted {removed} suggestion(s)."));
                    render(&session, reporter);
                }
            }
            ReviewCommand::DeleteAll => {
                session.delete_all();
                reporter.line("All suggestions deleted.");
            }
            ReviewCommand::Edit(index) => {
                let Some(position) = index.and_then(|i| session.resolve(i)) else {
                    reporter.line(&invalid_index_message(session.len()));
                    continue;
                };
                let current = &session.suggestions()[position];
                reporter.line(&format!("Current: {}", current.suggestion));

                let replacement = operator
                    .read_line(REPLACEMENT_PROMPT)
                    .await?
                    .unwrap_or_default();
                session.replace(position + 1, &replacement);
                render(&session, reporter);
            }
            ReviewCommand::Continue => {
                info!("Operator approved {} suggestion(s)", session.len());
                session.approve();
            }
            ReviewCommand::Quit => {
                info!("Operator quit review; applying nothing");
                session.abort();
            }
            ReviewCommand::Help => reporter.line(HELP),
            ReviewCommand::Unrecognized(input) => {
                reporter.line(&format!("Unrecognized command: '{input}'. Type h for help."));
            }
        }
    }

    Ok(session.into_outcome())
}

fn invalid_index_message(len: usize) -> String {
    if len == 0 {
        "There are no suggestions left to edit.".to_string()
    } else {
        format!("Invalid suggestion number. Enter a number from 1 to {len}.")
    }
}

fn render(session: &ReviewSession, reporter: &dyn Reporter) {
    if session.is_empty() {
        reporter.line("No suggestions remaining.");
        return;
    }
    for (i, s) in session.suggestions().iter().enumerate() {
        reporter.line(&format!(
            "[{}] ({}) {}: {}",
            i + 1,
            s.category,
            s.location,
            s.suggestion
        ));
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::suggestions::SuggestionCategory;
    use crate::testing::{MemoryReporter, ScriptedOperator};

    fn suggestion(text: &str) -> Suggestion {
        Suggestion {
            category: SuggestionCategory::Clarity,
            location: "Summary".to_string(),
            suggestion: text.to_string(),
        }
    }

    fn five() -> Vec<Suggestion> {
        ["one", "two", "three", "four", "five"]
            .iter()
            .map(|t| suggestion(t))
            .collect()
    }

    fn texts(list: &[Suggestion]) -> Vec<&str> {
        list.iter().map(|s| s.suggestion.as_str()).collect()
    }

    async fn review(inputs: &[&str]) -> (ReviewOutcome, MemoryReporter) {
        let reporter = MemoryReporter::default();
        let mut operator = ScriptedOperator::new(inputs);
        let outcome = run_review(five(), &mut operator, &reporter).await.unwrap();
        (outcome, reporter)
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(ReviewCommand::parse("c"), ReviewCommand::Continue);
        assert_eq!(ReviewCommand::parse("  Q "), ReviewCommand::Quit);
        assert_eq!(ReviewCommand::parse("d a"), ReviewCommand::DeleteAll);
        assert_eq!(ReviewCommand::parse("D A"), ReviewCommand::DeleteAll);
        assert_eq!(ReviewCommand::parse("e 3"), ReviewCommand::Edit(Some(3)));
        assert_eq!(ReviewCommand::parse("e x"), ReviewCommand::Edit(None));
        assert_eq!(ReviewCommand::parse("h"), ReviewCommand::Help);
        assert_eq!(
            ReviewCommand::parse("apply"),
            ReviewCommand::Unrecognized("apply".to_string())
        );
        assert_eq!(
            ReviewCommand::parse("c now"),
            ReviewCommand::Unrecognized("c now".to_string())
        );
    }

    #[test]
    fn test_parse_delete_indices_and_ranges() {
        assert_eq!(
            ReviewCommand::parse("d 1,3-4, 7"),
            ReviewCommand::Delete(vec![1..=1, 3..=4, 7..=7])
        );
    }

    #[test]
    fn test_parse_delete_skips_malformed_tokens() {
        assert_eq!(
            ReviewCommand::parse("d x,5-2,2"),
            ReviewCommand::Delete(vec![2..=2])
        );
        assert_eq!(ReviewCommand::parse("d"), ReviewCommand::Delete(vec![]));
        assert_eq!(ReviewCommand::parse("d ,,"), ReviewCommand::Delete(vec![]));
    }

    #[test]
    fn test_delete_uses_one_based_indices() {
        let mut session = ReviewSession::new(five());
        assert_eq!(session.delete(&[1..=1, 3..=4]), 3);
        assert_eq!(texts(session.suggestions()), vec!["two", "five"]);
    }

    #[test]
    fn test_delete_ignores_out_of_bounds() {
        let mut session = ReviewSession::new(five());
        assert_eq!(session.delete(&[0..=0, 6..=6, 5..=9]), 1);
        assert_eq!(texts(session.suggestions()), vec!["one", "two", "three", "four"]);
    }

    #[test]
    fn test_delete_with_no_indices_is_a_no_op() {
        let mut session = ReviewSession::new(five());
        assert_eq!(session.delete(&[]), 0);
        assert_eq!(session.suggestions(), five().as_slice());
    }

    #[test]
    fn test_session_transitions() {
        let mut session = ReviewSession::new(five());
        assert_eq!(session.state(), ReviewState::Reviewing);
        session.abort();
        let outcome = session.into_outcome();
        assert_eq!(outcome.state, ReviewState::Aborted);
        assert!(outcome.approved.is_empty());

        let mut session = ReviewSession::new(five());
        session.approve();
        assert_eq!(session.into_outcome().approved.len(), 5);
    }

    #[test]
    fn test_resolve_bounds() {
        let session = ReviewSession::new(five());
        assert_eq!(session.resolve(0), None);
        assert_eq!(session.resolve(1), Some(0));
        assert_eq!(session.resolve(5), Some(4));
        assert_eq!(session.resolve(6), None);
    }

    #[test]
    fn test_replace_keeps_text_when_blank() {
        let mut session = ReviewSession::new(five());
        assert!(session.replace(2, "   "));
        assert_eq!(session.suggestions()[1].suggestion, "two");
        assert!(session.replace(2, "deux"));
        assert_eq!(session.suggestions()[1].suggestion, "deux");
        assert!(!session.replace(9, "nine"));
    }

    #[test]
    fn test_replace_changes_only_text() {
        let mut session = ReviewSession::new(five());
        session.replace(1, "uno");
        let edited = &session.suggestions()[0];
        assert_eq!(edited.category, SuggestionCategory::Clarity);
        assert_eq!(edited.location, "Summary");
    }

    #[tokio::test]
    async fn test_continue_returns_surviving_suggestions() {
        let (outcome, _) = review(&["d 2", "e 1", "uno", "c"]).await;
        assert_eq!(outcome.state, ReviewState::Applying);
        assert_eq!(texts(&outcome.approved), vec!["uno", "three", "four", "five"]);
        assert!(outcome.should_apply());
    }

    #[tokio::test]
    async fn test_quit_returns_empty_set_after_edits() {
        let (outcome, _) = review(&["d 1-2", "e 1", "changed", "q"]).await;
        assert_eq!(outcome.state, ReviewState::Aborted);
        assert!(outcome.approved.is_empty());
        assert!(!outcome.should_apply());
    }

    #[tokio::test]
    async fn test_delete_all_then_continue_matches_quit() {
        let (deleted, _) = review(&["d a", "c"]).await;
        let (quit, _) = review(&["q"]).await;
        assert!(deleted.approved.is_empty());
        assert_eq!(deleted.approved, quit.approved);
        assert!(!deleted.should_apply());
        assert!(!quit.should_apply());
    }

    #[tokio::test]
    async fn test_malformed_delete_leaves_list_unchanged() {
        let (outcome, reporter) = review(&["d", "d foo", "c"]).await;
        assert_eq!(outcome.approved, five());
        assert!(reporter.lines().iter().any(|l| l == "No suggestions deleted."));
    }

    #[tokio::test]
    async fn test_edit_out_of_range_reports_and_continues() {
        let (outcome, reporter) = review(&["e 9", "e", "c"]).await;
        assert_eq!(outcome.approved, five());
        let invalid = reporter
            .lines()
            .iter()
            .filter(|l| l.starts_with("Invalid suggestion number"))
            .count();
        assert_eq!(invalid, 2);
    }

    #[tokio::test]
    async fn test_indices_follow_live_list_after_delete() {
        // After deleting #1, "three" is shown as #2.
        let (outcome, _) = review(&["d 1", "e 2", "drei", "c"]).await;
        assert_eq!(texts(&outcome.approved), vec!["two", "drei", "four", "five"]);
    }

    #[tokio::test]
    async fn test_unrecognized_command_is_reported() {
        let (outcome, reporter) = review(&["apply all", "c"]).await;
        assert_eq!(outcome.approved.len(), 5);
        assert!(reporter
            .lines()
            .iter()
            .any(|l| l.starts_with("Unrecognized command: 'apply all'")));
    }

    #[tokio::test]
    async fn test_closed_input_aborts() {
        let (outcome, _) = review(&["d 1"]).await;
        assert_eq!(outcome.state, ReviewState::Aborted);
        assert!(outcome.approved.is_empty());
    }

    #[tokio::test]
    async fn test_empty_list_short_circuits_without_prompting() {
        let reporter = MemoryReporter::default();
        let mut operator = ScriptedOperator::new(&["q"]);
        let outcome = run_review(vec![], &mut operator, &reporter).await.unwrap();
        assert!(operator.prompts.is_empty());
        assert!(outcome.approved.is_empty());
        assert!(!outcome.should_apply());
    }

    #[tokio::test]
    async fn test_listing_is_one_based() {
        let (_, reporter) = review(&["q"]).await;
        let lines = reporter.lines();
        assert_eq!(lines[0], "[1] (clarity) Summary: one");
        assert_eq!(lines[4], "[5] (clarity) Summary: five");
    }
}
