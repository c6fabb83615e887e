use crate::actors::SessionActor;
use crate::models::{Completion, Field, TransactionInput, Verdict};
use crate::policy::Scorer;
use crate::storage::{RowOutcome, Storage, VerdictStorage};
use crate::types::RowIndex;
use csv::{ReaderBuilder, Trim};
use futures::stream;
use futures::StreamExt;
use std::fs::File;
use std::io::BufReader;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{spawn_blocking, JoinHandle};
use tracing::{debug, error, warn};

/// Runs every row of a CSV file through its own form session.
pub struct BatchEngine {
    storage: Arc<VerdictStorage>,
    scorer: Scorer,
    backpressure: usize
}

impl BatchEngine {
    /// Creates a new engine that scores with `scorer` and records verdicts in `storage`.
    pub fn new(storage: Arc<VerdictStorage>, scorer: Scorer) -> Self {
        Self {
            storage,
            scorer,
            backpressure: 256
        }
    }

    /// Limits how many rows are analyzed at once. Further rows wait in the channel, and the
    /// reader pauses once that is full too.
    pub fn with_backpressure(mut self, backpressure: usize) -> Self {
        self.backpressure = backpressure.max(1);
        self
    }

    /// Reads the CSV at `path`, analyzes each row and waits until every verdict is stored.
    pub async fn run(&self, path: &str) -> anyhow::Result<()> {
        let (sender, receiver) = mpsc::channel::<(RowIndex, TransactionInput)>(self.backpressure);
        let csv_handle = self.spawn_csv_reader(path.to_string(), sender);
        let processing_result = self.process_rows(receiver).await;

        if let Err(error) = csv_handle.await {
            error!("CSV ingestion failed: {error}");
        }

        processing_result
    }

    fn spawn_csv_reader(&self, path: String, sender: mpsc::Sender<(RowIndex, TransactionInput)>) -> JoinHandle<()> {
        spawn_blocking(move || {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(error) => {
                    error!("Error opening CSV at path: {path} | {error}");
                    return;
                }
            };

            let mut reader = ReaderBuilder::new()
                .trim(Trim::All)
                .flexible(true)
                .from_reader(BufReader::new(file));

            for (index, result) in reader.deserialize::<TransactionInput>().enumerate() {
                match result {
                    Ok(input) => {
                        if sender.blocking_send((index, input)).is_err() {
                            break;
                        }
                    }
                    Err(error) => {
                        error!("CSV deserialization error: {error}");
                    }
                }
            }
        })
    }

    async fn process_rows(&self, receiver: mpsc::Receiver<(RowIndex, TransactionInput)>) -> anyhow::Result<()> {
        let rows = stream::unfold(receiver, |mut receiver| async move {
            receiver.recv().await.map(|row| (row, receiver))
        });

        //NOTE: At most `backpressure` sessions are live at once; while they are, rows stay in the channel and the reader blocks
        rows.for_each_concurrent(self.backpressure, |(index, input)| {
            if let Some(transaction_type) = input.parsed_transaction_type() {
                if !self.scorer.policy().config().offers(transaction_type) {
                    warn!("Row [{index}] uses transaction type [{}] which this form does not offer", transaction_type.as_str());
                }
            }

            Self::analyze(index, input, self.scorer.clone(), self.storage.clone())
        }).await;

        Ok(())
    }

    async fn analyze(index: RowIndex, input: TransactionInput, scorer: Scorer, storage: Arc<VerdictStorage>) {
        let session = SessionActor::spawn(scorer);

        for field in Field::ALL {
            session.set_field(field, input.get(field));
        }

        match session.submit().await {
            Ok(submission) => {
                if let Completion::Failed = submission.completed().await {
                    warn!("Row [{index}] ({}) could not be scored", input.transaction_id);
                }
            },
            Err(error) => warn!("Row [{index}] ({}) was not analyzed: {error}", input.transaction_id)
        }

        let verdict = match session.snapshot().await {
            Ok(snapshot) => snapshot.verdict,
            Err(error) => {
                error!("Row [{index}] session stopped early: {error}");
                Verdict::Unset
            }
        };

        debug!("Row [{index}] ({}) finished as [{verdict}]", input.transaction_id);

        storage.save(index, RowOutcome {
            transaction_id: input.transaction_id.clone(),
            verdict
        });

        if let Err(error) = session.despawn().await {
            error!("Session for row [{index}] did not despawn gracefully: {error:?}");
        }
    }
}
