/**
 * Snapshot Sync Controller
 *
 * Keeps one open space's canvas in step with its stored snapshot.
 *
 * # Lifecycle
 *
 * ```text
 * Idle -> Loading -> Synced <-> Saving
 *                       |
 *                    Stopped (after stop() or drop)
 * ```
 *
 * 1. **Loading**: fetch the latest snapshot and load it into the canvas. A
 *    missing snapshot, a failed fetch or a rejected load all leave the canvas
 *    as it was. The session moves on to `Synced` in every case.
 * 2. **Synced**: the last-saved hash is seeded from the canvas, then every
 *    local mutation (re)starts the debounce timer. Only the trailing edge
 *    saves: a user who never pauses never saves.
 * 3. **Saving**: when the timer fires, the document is hashed. An unchanged
 *    hash skips the write. Otherwise a save task is spawned, and on success it
 *    records the new hash.
 *
 * # Failure Handling
 *
 * Load and save failures are logged and otherwise ignored. Nothing is retried.
 * Save tasks are not serialized: edits that keep pausing longer than the
 * debounce delay can have several upserts in flight at once, last write wins.
 *
 * # Teardown
 *
 * `stop()` (or dropping the session) aborts the driver task. That cancels a
 * pending debounce and detaches the mutation listener. There is no flush, so an
 * edit still inside the debounce window is not saved. Save tasks already
 * spawned run to completion.
 */

use crate::spaces::SpaceRepository;
use crate::sync::canvas::CanvasStore;
use crate::sync::hash::SnapshotHash;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Default quiet period before a save
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(1200);

/// Sync tuning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Quiet period after the last mutation before saving
    pub debounce: Duration,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
        }
    }
}

/// Where a sync session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncPhase {
    Idle,
    Loading,
    Synced,
    Saving,
    Stopped,
}

#[derive(Debug, Default)]
struct SaveState {
    last_saved: Option<SnapshotHash>,
    in_flight: usize,
}

/// State shared between the driver task and its save tasks
struct Shared {
    repository: SpaceRepository,
    canvas: Arc<dyn CanvasStore>,
    space_id: String,
    phase: watch::Sender<SyncPhase>,
    saves: Mutex<SaveState>,
}

impl Shared {
    /// Move to `phase` unless the session was stopped
    fn set_phase(&self, phase: SyncPhase) {
        self.phase.send_if_modified(|current| {
            if *current == SyncPhase::Stopped || *current == phase {
                return false;
            }
            *current = phase;
            true
        });
    }
}

/// Opens sync sessions for spaces of one repository
#[derive(Debug, Clone)]
pub struct SyncController {
    repository: SpaceRepository,
    config: SyncConfig,
}

impl SyncController {
    pub fn new(repository: SpaceRepository, config: SyncConfig) -> Self {
        Self { repository, config }
    }

    pub fn config(&self) -> SyncConfig {
        self.config
    }

    /// Start syncing `canvas` with the stored snapshot of `space_id`
    ///
    /// Must be called inside a tokio runtime. The returned session owns the
    /// background driver task.
    pub fn open(&self, space_id: impl Into<String>, canvas: Arc<dyn CanvasStore>) -> SyncSession {
        let space_id = space_id.into();
        let (phase, phase_rx) = watch::channel(SyncPhase::Idle);
        let shared = Arc::new(Shared {
            repository: self.repository.clone(),
            canvas,
            space_id: space_id.clone(),
            phase,
            saves: Mutex::new(SaveState::default()),
        });

        let driver = tokio::spawn(drive(shared.clone(), self.config.debounce));

        SyncSession {
            space_id,
            shared,
            phase: phase_rx,
            driver,
        }
    }
}

/// One open space being synced
///
/// Dropping the session stops it.
pub struct SyncSession {
    space_id: String,
    shared: Arc<Shared>,
    phase: watch::Receiver<SyncPhase>,
    driver: JoinHandle<()>,
}

impl SyncSession {
    pub fn space_id(&self) -> &str {
        &self.space_id
    }

    /// Current phase
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    /// Receiver notified on every phase change
    pub fn watch_phase(&self) -> watch::Receiver<SyncPhase> {
        self.phase.clone()
    }

    /// Wait until the session reaches `phase`
    ///
    /// Returns `false` if the session ended without reaching it.
    pub async fn wait_for(&self, phase: SyncPhase) -> bool {
        let mut rx = self.phase.clone();
        rx.wait_for(|current| *current == phase || *current == SyncPhase::Stopped)
            .await
            .map(|reached| *reached == phase)
            .unwrap_or(false)
    }

    /// Hash of the last document known to be stored
    pub async fn last_saved_hash(&self) -> Option<SnapshotHash> {
        self.shared.saves.lock().await.last_saved.clone()
    }

    /// Stop syncing, dropping any pending debounced save
    pub fn stop(&self) {
        if !self.driver.is_finished() {
            debug!(space_id = %self.space_id, "Stopping sync session");
        }
        self.driver.abort();
        self.shared.phase.send_replace(SyncPhase::Stopped);
    }
}

impl Drop for SyncSession {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for SyncSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncSession")
            .field("space_id", &self.space_id)
            .field("phase", &self.phase())
            .finish_non_exhaustive()
    }
}

async fn drive(shared: Arc<Shared>, debounce: Duration) {
    load(&shared).await;

    let mut changes = shared.canvas.subscribe();
    let seeded = SnapshotHash::of(&shared.canvas.snapshot());
    shared.saves.lock().await.last_saved = Some(seeded);
    shared.set_phase(SyncPhase::Synced);

    loop {
        if !next_change(&mut changes).await {
            break;
        }

        // Trailing-edge debounce: each new change restarts the timer
        loop {
            tokio::select! {
                _ = sleep(debounce) => break,
                changed = next_change(&mut changes) => {
                    if !changed {
                        return;
                    }
                }
            }
        }

        save_if_changed(&shared).await;
    }
}

/// Wait for the next mutation, `false` once the canvas is gone
async fn next_change(changes: &mut broadcast::Receiver<()>) -> bool {
    match changes.recv().await {
        Ok(()) => true,
        Err(RecvError::Lagged(_)) => true,
        Err(RecvError::Closed) => false,
    }
}

async fn load(shared: &Shared) {
    shared.set_phase(SyncPhase::Loading);

    match shared.repository.get_latest_snapshot(&shared.space_id).await {
        Ok(Some(snapshot)) => {
            if let Err(e) = shared.canvas.load_snapshot(snapshot) {
                warn!(space_id = %shared.space_id, "Failed to load snapshot into canvas: {}", e);
            } else {
                debug!(space_id = %shared.space_id, "Loaded stored snapshot");
            }
        }
        Ok(None) => debug!(space_id = %shared.space_id, "No stored snapshot, starting empty"),
        Err(e) => warn!(space_id = %shared.space_id, "Failed to fetch snapshot: {}", e),
    }
}

async fn save_if_changed(shared: &Arc<Shared>) {
    let snapshot = shared.canvas.snapshot();
    let hash = SnapshotHash::of(&snapshot);

    {
        let mut saves = shared.saves.lock().await;
        if saves.last_saved.as_ref() == Some(&hash) {
            debug!(space_id = %shared.space_id, "Document unchanged, skipping save");
            return;
        }
        saves.in_flight += 1;
    }
    shared.set_phase(SyncPhase::Saving);

    let task = shared.clone();
    tokio::spawn(async move {
        let result = task
            .repository
            .upsert_snapshot(&task.space_id, &snapshot)
            .await;

        let mut saves = task.saves.lock().await;
        match result {
            Ok(()) => {
                info!(space_id = %task.space_id, hash = %hash, "Saved snapshot");
                saves.last_saved = Some(hash);
            }
            Err(e) => warn!(space_id = %task.space_id, "Failed to save snapshot: {}", e),
        }
        saves.in_flight -= 1;
        if saves.in_flight == 0 {
            task.set_phase(SyncPhase::Synced);
        }
    });
}
