use crate::models::errors::FormError;
use crate::models::{Decision, Field, TransactionInput, Verdict};
use crate::policy::ScoringError;
use crate::types::Generation;

/// Proof that a submission was accepted.
///
/// Carries the generation the form was in when it was submitted and a copy of the input
/// that was handed to scoring.
#[derive(Debug, Clone)]
pub struct Ticket {
    generation: Generation,
    input: TransactionInput
}

impl Ticket {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn input(&self) -> &TransactionInput {
        &self.input
    }
}

/// How a finished scoring run was applied to the form.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Completion {
    /// The verdict was stored and the form is idle again.
    Applied(Verdict),
    /// Scoring failed; the form is idle again and shows no verdict.
    Failed,
    /// The form was reset after submission, the result was discarded.
    Stale
}

/// A read-only copy of the form state.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Snapshot {
    pub input: TransactionInput,
    pub verdict: Verdict,
    pub busy: bool,
    pub generation: Generation
}

/// State of a single transaction form.
///
/// Holds the six field values, the verdict of the last analysis and the busy flag that
/// blocks a second submission while one is in flight. Each reset starts a new generation;
/// results of submissions from an earlier generation are never applied.
#[derive(Debug, Default)]
pub struct FormState {
    input: TransactionInput,
    verdict: Verdict,
    busy: bool,
    generation: Generation
}

impl FormState {
    /// Creates an empty, idle form.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &TransactionInput {
        &self.input
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Replaces one field's value. Always succeeds, also while an analysis is in flight.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.input.set(field, value.into());
    }

    /// Accepts the current input for analysis.
    ///
    /// On success the form becomes busy, the previous verdict is cleared and a [`Ticket`]
    /// for the scoring run is returned.
    ///
    /// # Errors
    /// Returns `FormError` if:
    /// - An analysis is already in progress.
    /// - Any field is blank.
    pub fn submit(&mut self) -> Result<Ticket, FormError> {
        if self.busy {
            return Err(FormError::Busy)
        }

        let missing = self.input.missing_fields();

        if !missing.is_empty() {
            return Err(FormError::Incomplete { missing })
        }

        self.busy = true;
        self.verdict = Verdict::Unset;

        Ok(Ticket {
            generation: self.generation,
            input: self.input.clone()
        })
    }

    /// Applies the result of a scoring run started by `ticket`.
    pub fn complete(&mut self, ticket: &Ticket, result: Result<Decision, ScoringError>) -> Completion {
        if ticket.generation != self.generation {
            return Completion::Stale
        }

        self.busy = false;

        match result {
            Ok(decision) => {
                self.verdict = decision.into();
                Completion::Applied(self.verdict)
            },
            Err(_) => {
                self.verdict = Verdict::Unset;
                Completion::Failed
            }
        }
    }

    /// Clears every field and the verdict, and orphans any analysis still in flight.
    pub fn reset(&mut self) {
        self.input.clear();
        self.verdict = Verdict::Unset;
        self.busy = false;
        self.generation += 1;
    }

    /// The result panel's way out: identical to [`FormState::reset`].
    pub fn analyze_another(&mut self) {
        self.reset();
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            input: self.input.clone(),
            verdict: self.verdict,
            busy: self.busy,
            generation: self.generation
        }
    }
}
