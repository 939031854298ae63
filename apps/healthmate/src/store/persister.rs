use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error};

use crate::storage::{KeyValueStorage, StorageKey};

pub(crate) enum PersistCommand {
    /// `None` removes the slot.
    Write {
        key: StorageKey,
        value: Option<String>,
    },
    Flush(oneshot::Sender<()>),
}

/// Handle to the background writer. Cloning shares the same queue.
#[derive(Clone)]
pub(crate) struct Persister {
    tx: mpsc::UnboundedSender<PersistCommand>,
}

impl Persister {
    /// Spawns the writer task on the current Tokio runtime.
    pub(crate) fn spawn(storage: Arc<dyn KeyValueStorage>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(storage, rx));
        Self { tx }
    }

    /// Queues a write and returns immediately.
    pub(crate) fn enqueue(&self, key: StorageKey, value: Option<String>) {
        if self.tx.send(PersistCommand::Write { key, value }).is_err() {
            error!("Persistence writer has stopped; dropping write to '{key}'");
        }
    }

    /// Resolves once every write queued before this call has been applied.
    pub(crate) async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(PersistCommand::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }
}

/// Applies queued writes in order until every sender is dropped.
async fn run_writer(
    storage: Arc<dyn KeyValueStorage>,
    mut rx: mpsc::UnboundedReceiver<PersistCommand>,
) {
    while let Some(command) = rx.recv().await {
        match command {
            PersistCommand::Write { key, value } => {
                let result = match &value {
                    Some(text) => storage.set_item(key, text).await,
                    None => storage.remove_item(key).await,
                };
                match result {
                    Ok(()) => debug!("Persisted slot '{key}'"),
                    Err(e) => error!("Failed to persist slot '{key}': {e}"),
                }
            }
            PersistCommand::Flush(done) => {
                let _ = done.send(());
            }
        }
    }
    debug!("Persistence writer stopped");
}
