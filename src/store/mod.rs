//! The record store: accounts, posts, password hashes and the live
//! refresh-token set behind one read/write lock, persisted as a single
//! snapshot file.
//!
//! Mutations take the exclusive lock only for the in-memory change and then
//! signal a background task to write the whole snapshot. That write is not
//! awaited by the caller, and a failure is logged and dropped. Listings
//! reload the file first, so another process replacing it is picked up.
//! A reload is skipped while a write is still pending, otherwise it would
//! roll back the unwritten mutation. Listings touch the disk, so async
//! callers run them on the blocking pool.

mod accounts;
mod error;
mod posts;
pub mod snapshot;
mod tokens;
mod writer;

pub use error::StoreError;
pub use snapshot::Snapshot;

use crate::vault::Vault;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct Store {
    shared: Arc<Shared>,
}

struct Shared {
    state: RwLock<State>,
    vault: Vault,
    path: Option<PathBuf>,
    dirty: Option<mpsc::Sender<()>>,
    /// Serializes whole-file writes so an older document never lands last.
    write_serial: tokio::sync::Mutex<()>,
}

struct State {
    snapshot: Snapshot,
    /// Bumped by every mutation.
    generation: u64,
    /// Highest generation known to be on disk.
    persisted: u64,
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("path", &self.shared.path)
            .finish()
    }
}

impl Store {
    /// A store with no backing file. Nothing is ever written or reloaded.
    pub fn in_memory(vault: Vault) -> Self {
        Self::from_snapshot(Snapshot::default(), vault)
    }

    /// An in-memory store seeded from an existing snapshot.
    pub fn from_snapshot(snapshot: Snapshot, vault: Vault) -> Self {
        Self::build(snapshot, vault, None)
    }

    /// Opens the snapshot at `path`, creating an empty one if the file does
    /// not exist yet. Must be called inside a tokio runtime.
    pub async fn open(path: impl AsRef<Path>, vault: Vault) -> Result<Self, StoreError> {
        let path = path.as_ref();

        if !tokio::fs::try_exists(path).await? {
            info!("No snapshot at {}, creating an empty one", path.display());
            snapshot::write_atomic(path, &Snapshot::default().encode()?).await?;
        }

        let snapshot = Snapshot::decode(&tokio::fs::read(path).await?)?;
        info!(
            "Loaded snapshot from {} ({} accounts, {} posts)",
            path.display(),
            snapshot.accounts.len(),
            snapshot.posts.len()
        );

        Ok(Self::build(snapshot, vault, Some(path.to_path_buf())))
    }

    /// Like [`Store::open`] but discards whatever the file holds.
    pub async fn open_fresh(path: impl AsRef<Path>, vault: Vault) -> Result<Self, StoreError> {
        let path = path.as_ref();
        warn!("Starting from an empty store, overwriting {}", path.display());
        snapshot::write_atomic(path, &Snapshot::default().encode()?).await?;

        Ok(Self::build(Snapshot::default(), vault, Some(path.to_path_buf())))
    }

    fn build(snapshot: Snapshot, vault: Vault, path: Option<PathBuf>) -> Self {
        let (dirty, receiver) = match path {
            Some(_) => {
                let (tx, rx) = mpsc::channel(1);
                (Some(tx), Some(rx))
            }
            None => (None, None),
        };

        let shared = Arc::new(Shared {
            state: RwLock::new(State {
                snapshot,
                generation: 0,
                persisted: 0,
            }),
            vault,
            path,
            dirty,
            write_serial: tokio::sync::Mutex::new(()),
        });

        if let Some(receiver) = receiver {
            writer::spawn(Arc::downgrade(&shared), receiver);
        }

        Self { shared }
    }

    pub fn path(&self) -> Option<&Path> {
        self.shared.path.as_deref()
    }

    /// Writes any unwritten changes now and waits for the write.
    pub async fn flush(&self) -> Result<(), StoreError> {
        writer::persist(&self.shared).await
    }

    /// A copy of the full in-memory state.
    pub fn snapshot(&self) -> Result<Snapshot, StoreError> {
        Ok(self.read()?.snapshot.clone())
    }

    fn vault(&self) -> &Vault {
        &self.shared.vault
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>, StoreError> {
        self.shared.state.read().map_err(|_| StoreError::Unavailable)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>, StoreError> {
        self.shared.state.write().map_err(|_| StoreError::Unavailable)
    }

    /// Records a mutation and asks the writer for a snapshot write.
    fn mark_dirty(&self, state: &mut State) {
        state.generation += 1;

        if let Some(dirty) = &self.shared.dirty {
            match dirty.try_send(()) {
                Ok(()) | Err(mpsc::error::TrySendError::Full(())) => {}
                Err(mpsc::error::TrySendError::Closed(())) => {
                    warn!("Snapshot writer is gone, change will not be persisted");
                }
            }
        }
    }

    /// Replaces the in-memory state with the file contents, unless a
    /// mutation has not reached the file yet. The file is read and parsed
    /// without holding the lock.
    fn reload(&self) -> Result<(), StoreError> {
        let Some(path) = self.shared.path.as_deref() else {
            return Ok(());
        };

        let seen = {
            let state = self.read()?;
            if state.generation != state.persisted {
                debug!(
                    "Skipping reload, generation {} not yet written",
                    state.generation
                );
                return Ok(());
            }
            state.generation
        };

        let snapshot = Snapshot::load(path)?;

        let mut state = self.write()?;
        if state.generation != seen || state.persisted != seen {
            debug!("Discarding reload, store changed while reading");
            return Ok(());
        }
        state.snapshot = snapshot;
        Ok(())
    }
}
