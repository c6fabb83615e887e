use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio::time::sleep;
use tokio::{select, spawn};
use tracing::{debug, error, info, warn};

use crate::models::{Completion, Decision, Field, FormError, FormState, Snapshot, Ticket};
use crate::policy::{Scorer, ScoringError};
use crate::types::Generation;

enum Command {
    SetField {
        field: Field,
        value: String
    },
    Submit {
        reply: oneshot::Sender<Result<Submission, FormError>>
    },
    Reset,
    Snapshot {
        reply: oneshot::Sender<Snapshot>
    }
}

type Scored = (Generation, Result<Decision, ScoringError>);

struct InFlight {
    ticket: Ticket,
    notify: oneshot::Sender<Completion>
}

/// An accepted submission whose verdict is still being produced.
#[derive(Debug)]
pub struct Submission {
    generation: Generation,
    completion: oneshot::Receiver<Completion>
}

impl Submission {
    /// The form generation the submission belongs to.
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Waits until the scoring run has finished and been applied to the form.
    pub async fn completed(self) -> Completion {
        self.completion.await.unwrap_or(Completion::Failed)
    }
}

/// Handle to a form session running on its own task.
///
/// All state lives on the actor task; field edits, submissions and resets are processed
/// in the order they were sent. Scoring runs on separate tasks that report back to the
/// actor, so a slow verdict never blocks editing or resetting the form.
pub struct SessionActor {
    sender: mpsc::UnboundedSender<Command>,
    handle: JoinHandle<()>
}

impl SessionActor {
    /// Spawns a new session with an empty form.
    pub fn spawn(scorer: Scorer) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();

        let task = SessionTask {
            state: FormState::new(),
            scorer,
            scoring: JoinSet::new(),
            in_flight: HashMap::new()
        };

        let handle = spawn(task.run(receiver));

        Self { sender, handle }
    }

    pub fn set_field(&self, field: Field, value: impl Into<String>) -> bool {
        self.sender.send(Command::SetField { field, value: value.into() }).is_ok()
    }

    /// Submits the current form for analysis.
    ///
    /// # Errors
    /// Returns `FormError` if an analysis is already in flight, a field is blank, or the
    /// session has stopped.
    pub async fn submit(&self) -> Result<Submission, FormError> {
        let (reply, response) = oneshot::channel();

        self.sender.send(Command::Submit { reply }).map_err(|_| FormError::SessionClosed)?;

        response.await.map_err(|_| FormError::SessionClosed)?
    }

    /// Clears the form. A verdict still in flight is discarded when it arrives.
    pub fn reset(&self) -> bool {
        self.sender.send(Command::Reset).is_ok()
    }

    pub fn analyze_another(&self) -> bool {
        self.reset()
    }

    pub async fn snapshot(&self) -> Result<Snapshot, FormError> {
        let (reply, response) = oneshot::channel();

        self.sender.send(Command::Snapshot { reply }).map_err(|_| FormError::SessionClosed)?;

        response.await.map_err(|_| FormError::SessionClosed)
    }

    /// Closes the session and waits for queued commands and in-flight scoring to finish.
    pub async fn despawn(self) -> Result<(), JoinError> {
        drop(self.sender);
        self.handle.await
    }
}

/// The actor side of a session.
///
/// Every accepted submission is tracked in `in_flight` until its scoring task reports.
/// An entry whose task is gone without reporting is completed as interrupted, so the form
/// never stays busy.
struct SessionTask {
    state: FormState,
    scorer: Scorer,
    scoring: JoinSet<Scored>,
    in_flight: HashMap<Generation, InFlight>
}

impl SessionTask {
    async fn run(mut self, mut receiver: mpsc::UnboundedReceiver<Command>) {
        loop {
            select! {
                command = receiver.recv() => {
                    let Some(command) = command else {
                        break;
                    };

                    self.handle_command(command);
                }
                Some(joined) = self.scoring.join_next() => {
                    self.finish(joined);
                }
            }
        }

        //NOTE: Every submission gets its completion, even when the handle is already gone
        while let Some(joined) = self.scoring.join_next().await {
            self.finish(joined);
        }

        self.interrupt_orphans();
    }

    fn handle_command(&mut self, command: Command) {
        match command {
            Command::SetField { field, value } => {
                debug!("Field [{field}] updated");
                self.state.set_field(field, value);
            },
            Command::Submit { reply } => {
                let result = self.state.submit().map(|ticket| self.spawn_scoring(ticket));

                match &result {
                    Ok(submission) => info!("Transaction [{}] submitted for analysis in generation [{}]", self.state.input().transaction_id, submission.generation),
                    Err(error) => warn!("{error}")
                }

                let _ = reply.send(result);
            },
            Command::Reset => {
                self.state.reset();
                debug!("Form reset, now in generation [{}]", self.state.generation());
            },
            Command::Snapshot { reply } => {
                let _ = reply.send(self.state.snapshot());
            }
        }
    }

    fn spawn_scoring(&mut self, ticket: Ticket) -> Submission {
        let (notify, completion) = oneshot::channel();
        let generation = ticket.generation();
        let scorer = self.scorer.clone();
        let input = ticket.input().clone();

        self.scoring.spawn(async move {
            let outcome = AssertUnwindSafe(async {
                sleep(scorer.delay()).await;
                scorer.score(&input)
            }).catch_unwind().await;

            let result = outcome.unwrap_or_else(|panic| Err(ScoringError::Interrupted(panic_message(panic.as_ref()))));

            (generation, result)
        });

        self.in_flight.insert(generation, InFlight { ticket, notify });

        Submission { generation, completion }
    }

    fn finish(&mut self, joined: Result<Scored, JoinError>) {
        match joined {
            Ok((generation, result)) => {
                if let Some(in_flight) = self.in_flight.remove(&generation) {
                    self.apply(in_flight, result);
                }
            },
            Err(error) => error!("Scoring task did not finish: {error}")
        }

        if self.scoring.is_empty() {
            self.interrupt_orphans();
        }
    }

    fn interrupt_orphans(&mut self) {
        let orphans: Vec<InFlight> = self.in_flight.drain().map(|(_, in_flight)| in_flight).collect();

        for in_flight in orphans {
            self.apply(in_flight, Err(ScoringError::Interrupted("scoring task was cancelled".to_string())));
        }
    }

    fn apply(&mut self, in_flight: InFlight, result: Result<Decision, ScoringError>) {
        let InFlight { ticket, notify } = in_flight;
        let completion = self.state.complete(&ticket, result.clone());
        let transaction_id = &ticket.input().transaction_id;

        match (completion, result) {
            (Completion::Applied(verdict), _) => debug!("Transaction [{transaction_id}] analyzed as [{verdict}]"),
            (Completion::Failed, Err(error)) => error!("Error analyzing transaction [{transaction_id}]: {error}"),
            (Completion::Stale, _) => warn!("Discarded verdict for transaction [{transaction_id}] from generation [{}], form was reset", ticket.generation()),
            (Completion::Failed, Ok(_)) => {}
        }

        let _ = notify.send(completion);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "scoring panicked".to_string()
    }
}
