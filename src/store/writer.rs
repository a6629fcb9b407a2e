use super::{Shared, StoreError, snapshot};
use std::sync::Weak;
use tokio::sync::mpsc;
use tracing::{debug, error};

/// Starts the background task that writes the snapshot whenever the store
/// signals it is dirty. Signals that arrive while a write is queued are
/// coalesced into that write.
pub(super) fn spawn(shared: Weak<Shared>, mut dirty: mpsc::Receiver<()>) {
    tokio::spawn(async move {
        while dirty.recv().await.is_some() {
            let Some(shared) = shared.upgrade() else {
                break;
            };

            // Nobody awaits this write, so a failure can only be reported here.
            if let Err(e) = persist(&shared).await {
                error!("Snapshot write failed: {}", e);
            }
        }

        debug!("Snapshot writer stopped");
    });
}

/// Serializes the current state and replaces the snapshot file with it.
/// Does nothing when every mutation is already on disk.
pub(super) async fn persist(shared: &Shared) -> Result<(), StoreError> {
    let Some(path) = shared.path.as_deref() else {
        return Ok(());
    };

    let _serial = shared.write_serial.lock().await;

    let (bytes, generation) = {
        let state = shared.state.read().map_err(|_| StoreError::Unavailable)?;
        if state.generation == state.persisted {
            return Ok(());
        }
        (state.snapshot.encode()?, state.generation)
    };

    snapshot::write_atomic(path, &bytes).await?;

    let mut state = shared.state.write().map_err(|_| StoreError::Unavailable)?;
    state.persisted = state.persisted.max(generation);
    debug!("Snapshot generation {} written to {}", generation, path.display());

    Ok(())
}
