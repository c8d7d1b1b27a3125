//! Draft & entry store
//!
//! `JournalSession` owns the saved entries and the single in-progress draft.
//! Entries are persisted as one JSON array under [`ENTRIES_KEY`]; the draft is
//! checkpointed under [`DRAFT_KEY`] by a background timer so it survives a
//! restart.
//!
//! All storage writes go through one async lock and serialize the in-memory
//! state as it is when the write starts, so the stored value always follows
//! the latest in-memory change rather than a stale snapshot. Clearing the
//! draft bumps a generation counter; a checkpoint that finishes after its
//! draft was cleared never marks that draft as persisted, and the clearing
//! operation removes the checkpoint once the write lock is free.

use crate::application::outcome::{
    Checkpoint, DeleteOutcome, DiscardOutcome, LoadReport, Persistence, SaveOutcome,
};
use crate::domain::{dates, validate_content, Clock, Draft, DraftFields, Entry, SystemClock};
use crate::error::{JournalError, Result};
use crate::infrastructure::{
    Config, Confirmer, KeyValueStore, ShareOutcome, ShareTarget, DRAFT_KEY, ENTRIES_KEY,
};
use chrono::Utc;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

const SHARE_TITLE: &str = "Journal Entries Backup";
const DELETE_PROMPT: &str = "Are you sure you want to delete this entry?";
const DISCARD_PROMPT: &str = "Are you sure you want to discard your unsaved changes?";

/// External systems a session talks to
#[derive(Clone)]
pub struct Collaborators {
    pub store: Arc<dyn KeyValueStore>,
    pub confirmer: Arc<dyn Confirmer>,
    pub share: Arc<dyn ShareTarget>,
    pub clock: Arc<dyn Clock>,
}

impl Collaborators {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        confirmer: Arc<dyn Confirmer>,
        share: Arc<dyn ShareTarget>,
    ) -> Self {
        Collaborators {
            store,
            confirmer,
            share,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }
}

#[derive(Debug, Default)]
struct State {
    entries: Vec<Entry>,
    draft: DraftFields,
    /// Title and content of the last checkpoint written for the current draft
    persisted: Option<(String, String)>,
    /// Incremented every time the draft is cleared
    generation: u64,
    /// Generation of the draft whose checkpoint is currently in storage
    checkpoint_generation: Option<u64>,
    has_draft: bool,
    saving: usize,
    /// Entry ids with a save or delete still being persisted
    in_flight: HashSet<String>,
    viewing: Option<String>,
    /// Cleared generation of a committed draft whose entries write failed;
    /// its checkpoint goes once entries are durable
    uncommitted_checkpoint: Option<u64>,
}

impl State {
    fn draft_changed(&self) -> bool {
        match &self.persisted {
            Some((title, content)) => *title != self.draft.title || *content != self.draft.content,
            None => true,
        }
    }

    fn clear_draft(&mut self) -> u64 {
        self.draft = DraftFields::default();
        self.persisted = None;
        self.has_draft = false;
        self.generation += 1;
        self.generation
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.id == id)
    }
}

/// Journal entries plus the recoverable draft, with autosave
pub struct JournalSession {
    store: Arc<dyn KeyValueStore>,
    confirmer: Arc<dyn Confirmer>,
    share: Arc<dyn ShareTarget>,
    clock: Arc<dyn Clock>,
    title_format: String,
    autosave_interval: Duration,
    state: Mutex<State>,
    writes: tokio::sync::Mutex<()>,
    rearm: Arc<Notify>,
    autosave: Mutex<Option<JoinHandle<()>>>,
}

impl JournalSession {
    pub fn new(collaborators: Collaborators, config: &Config) -> Self {
        JournalSession {
            store: collaborators.store,
            confirmer: collaborators.confirmer,
            share: collaborators.share,
            clock: collaborators.clock,
            title_format: config.title_format.clone(),
            autosave_interval: config.autosave_interval(),
            state: Mutex::new(State::default()),
            writes: tokio::sync::Mutex::new(()),
            rearm: Arc::new(Notify::new()),
            autosave: Mutex::new(None),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Load persisted entries and any recoverable draft.
    ///
    /// An unreadable entry list leaves the session empty and is reported as a
    /// warning; an unreadable draft is logged and ignored.
    pub async fn initialize(&self) -> LoadReport {
        let (entries, warning) = match self.load_entries().await {
            Ok(entries) => (entries, None),
            Err(e) => {
                tracing::warn!("Failed to load journal entries, starting empty: {}", e);
                (Vec::new(), Some(e))
            }
        };

        let draft = match self.load_draft().await {
            Ok(draft) => draft,
            Err(e) => {
                tracing::error!("Error loading draft: {}", e);
                None
            }
        };

        let mut state = self.state();
        state.entries = entries;
        let draft_restored = match draft {
            Some(draft) => {
                state.persisted = Some((draft.title.clone(), draft.content.clone()));
                state.checkpoint_generation = Some(state.generation);
                state.has_draft = true;
                state.draft = draft.into();
                tracing::info!("Draft loaded");
                true
            }
            None => false,
        };

        LoadReport {
            entries: state.entries.len(),
            draft_restored,
            warning,
        }
    }

    async fn load_entries(&self) -> Result<Vec<Entry>> {
        match self.store.get(ENTRIES_KEY).await? {
            Some(text) => {
                let entries: Vec<Entry> = serde_json::from_str(&text)?;
                tracing::info!("Loaded {} entries", entries.len());
                Ok(entries)
            }
            None => {
                tracing::info!("No saved entries found, starting with an empty journal");
                Ok(Vec::new())
            }
        }
    }

    async fn load_draft(&self) -> Result<Option<Draft>> {
        match self.store.get(DRAFT_KEY).await? {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    /// Replace the draft text. Nothing is persisted until the next checkpoint.
    pub fn update_draft_text(&self, title: impl Into<String>, content: impl Into<String>) {
        let changed = {
            let mut state = self.state();
            let title = title.into();
            let content = content.into();
            let changed = state.draft.title != title || state.draft.content != content;
            state.draft.title = title;
            state.draft.content = content;
            changed
        };
        if changed {
            self.rearm.notify_one();
        }
    }

    /// Persist the draft if it has non-empty content that differs from the
    /// last checkpoint. Failures are logged and never returned.
    pub async fn checkpoint(&self) -> Checkpoint {
        self.write_checkpoint(false).await
    }

    async fn write_checkpoint(&self, force: bool) -> Checkpoint {
        let _writes = self.writes.lock().await;

        let (draft, generation) = {
            let state = self.state();
            if state.draft.content.trim().is_empty() {
                return Checkpoint::EmptyContent;
            }
            if !force && !state.draft_changed() {
                tracing::debug!("Draft unchanged since last checkpoint");
                return Checkpoint::Unchanged;
            }
            let timestamp = self.clock.now().with_timezone(&Utc);
            (state.draft.to_draft(timestamp), state.generation)
        };

        let json = match serde_json::to_string(&draft) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Error serializing draft: {}", e);
                return Checkpoint::Failed;
            }
        };
        if let Err(e) = self.store.set(DRAFT_KEY, &json).await {
            tracing::error!("Error saving draft: {}", e);
            return Checkpoint::Failed;
        }

        let mut state = self.state();
        state.checkpoint_generation = Some(generation);
        if state.generation != generation {
            tracing::debug!("Draft was cleared while its checkpoint was being written");
            return Checkpoint::Superseded;
        }
        state.persisted = Some((draft.title, draft.content));
        state.has_draft = true;
        tracing::debug!("Draft saved");
        Checkpoint::Written
    }

    /// Remove the stored checkpoint unless it belongs to a draft started
    /// after `cleared_generation`.
    async fn remove_checkpoint(&self, cleared_generation: u64) -> Result<()> {
        let _writes = self.writes.lock().await;

        let newer = self
            .state()
            .checkpoint_generation
            .is_some_and(|generation| generation >= cleared_generation);
        if newer {
            tracing::debug!("Keeping checkpoint of a newer draft");
            return Ok(());
        }

        if let Err(e) = self.store.remove(DRAFT_KEY).await {
            tracing::warn!("Error clearing draft: {}", e);
            return Err(e);
        }
        self.state().checkpoint_generation = None;
        tracing::debug!("Draft checkpoint cleared");
        Ok(())
    }

    async fn persist_entries(&self) -> Persistence {
        let _writes = self.writes.lock().await;

        let json = serde_json::to_string(&self.state().entries);
        let result = match json {
            Ok(json) => self.store.set(ENTRIES_KEY, &json).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                tracing::info!("Entries saved");
                Persistence::Durable
            }
            Err(e) => {
                tracing::warn!("Failed to save entries: {}", e);
                Persistence::Failed(e)
            }
        }
    }

    /// Persist entries, then drop the checkpoint of any draft that was
    /// committed while entries could not be written
    async fn persist_and_settle(&self) -> Persistence {
        let persistence = self.persist_entries().await;
        if !persistence.is_durable() {
            return persistence;
        }
        let pending = self.state().uncommitted_checkpoint.take();
        match pending {
            Some(generation) => {
                let removed = self.remove_checkpoint(generation).await;
                if removed.is_err() {
                    let mut state = self.state();
                    state.uncommitted_checkpoint =
                        state.uncommitted_checkpoint.max(Some(generation));
                }
                persistence.and(removed)
            }
            None => persistence,
        }
    }

    /// Write the current entries again, e.g. after a failed save
    pub async fn flush_entries(&self) -> Persistence {
        self.state().saving += 1;
        let persistence = self.persist_and_settle().await;
        self.state().saving -= 1;
        persistence
    }

    /// Commit the draft as a new entry, or into the entry it is editing.
    ///
    /// The in-memory collection is updated before the write. When the write
    /// fails the entry stays in memory and the draft checkpoint is kept so the
    /// text is still recoverable after a restart.
    pub async fn save_entry(&self) -> Result<SaveOutcome> {
        let now = self.clock.now();

        let (entry, created, cleared_generation) = {
            let mut guard = self.state();
            let state = &mut *guard;

            validate_content(&state.draft.content)?;
            if let Some(id) = &state.draft.editing_id {
                if state.in_flight.contains(id) {
                    return Err(JournalError::InProgress(format!("entry {}", id)));
                }
            }

            let title = dates::resolve_title(&state.draft.title, &now, &self.title_format);
            let content = state.draft.content.clone();
            let timestamp = now.with_timezone(&Utc);
            let existing = state
                .draft
                .editing_id
                .as_deref()
                .and_then(|id| state.position(id));

            let (entry, created) = match existing {
                Some(pos) => {
                    state.entries[pos].revise(title, content, timestamp);
                    (state.entries[pos].clone(), false)
                }
                None => {
                    if let Some(id) = &state.draft.editing_id {
                        tracing::warn!("Edited entry {} no longer exists, saving as new", id);
                    }
                    let entry = Entry::new(title, content, timestamp);
                    state.entries.insert(0, entry.clone());
                    (entry, true)
                }
            };

            state.in_flight.insert(entry.id.clone());
            state.saving += 1;
            let generation = state.clear_draft();
            (entry, created, generation)
        };
        tracing::info!(
            "{} entry {}",
            if created { "Created" } else { "Updated" },
            entry.id
        );

        let mut persistence = self.persist_entries().await;
        if persistence.is_durable() {
            // Covers any older uncommitted draft as well
            self.state().uncommitted_checkpoint = None;
            let removed = self.remove_checkpoint(cleared_generation).await;
            if removed.is_err() {
                self.state().uncommitted_checkpoint = Some(cleared_generation);
            }
            persistence = persistence.and(removed);
        } else {
            tracing::warn!("Keeping draft checkpoint until entries are saved");
            let mut state = self.state();
            state.uncommitted_checkpoint =
                state.uncommitted_checkpoint.max(Some(cleared_generation));
        }

        {
            let mut state = self.state();
            state.in_flight.remove(&entry.id);
            state.saving -= 1;
        }

        Ok(SaveOutcome {
            entry,
            created,
            persistence,
        })
    }

    /// Delete an entry after confirmation.
    ///
    /// Deleting the entry being edited clears the draft and its checkpoint;
    /// deleting the entry open in the detail view closes it.
    pub async fn delete_entry(&self, id: &str) -> Result<DeleteOutcome> {
        if self.state().position(id).is_none() {
            return Err(JournalError::NotFound(id.to_string()));
        }
        if self.state().in_flight.contains(id) {
            return Err(JournalError::InProgress(format!("entry {}", id)));
        }
        if !self.confirmer.confirm(DELETE_PROMPT).await {
            tracing::info!("Delete of entry {} cancelled", id);
            return Ok(DeleteOutcome::Cancelled);
        }

        let (entry, cleared_generation, closed_view) = {
            let mut guard = self.state();
            let state = &mut *guard;

            if state.in_flight.contains(id) {
                return Err(JournalError::InProgress(format!("entry {}", id)));
            }
            let pos = state
                .position(id)
                .ok_or_else(|| JournalError::NotFound(id.to_string()))?;
            let entry = state.entries.remove(pos);

            state.in_flight.insert(id.to_string());
            state.saving += 1;
            let cleared_generation = if state.draft.editing_id.as_deref() == Some(id) {
                Some(state.clear_draft())
            } else {
                None
            };
            let closed_view = state.viewing.as_deref() == Some(id);
            if closed_view {
                state.viewing = None;
            }
            (entry, cleared_generation, closed_view)
        };
        tracing::info!("Deleting entry with id: {}", id);

        let mut persistence = self.persist_and_settle().await;
        if let Some(generation) = cleared_generation {
            persistence = persistence.and(self.remove_checkpoint(generation).await);
        }

        {
            let mut state = self.state();
            state.in_flight.remove(id);
            state.saving -= 1;
        }

        Ok(DeleteOutcome::Deleted {
            entry,
            cleared_draft: cleared_generation.is_some(),
            closed_view,
            persistence,
        })
    }

    /// Throw away the draft and its checkpoint after confirmation
    pub async fn discard_draft(&self) -> DiscardOutcome {
        if !self.confirmer.confirm(DISCARD_PROMPT).await {
            return DiscardOutcome::Cancelled;
        }

        let generation = self.state().clear_draft();
        tracing::info!("Discarding draft");

        DiscardOutcome::Discarded {
            persistence: Persistence::Durable.and(self.remove_checkpoint(generation).await),
        }
    }

    /// Start editing `entry` and checkpoint it right away
    pub async fn begin_edit(&self, entry: &Entry) -> Result<Checkpoint> {
        {
            let mut state = self.state();
            if state.position(&entry.id).is_none() {
                return Err(JournalError::NotFound(entry.id.clone()));
            }
            state.draft = DraftFields::from_entry(entry);
        }
        self.rearm.notify_one();
        Ok(self.write_checkpoint(true).await)
    }

    /// Hand every entry, as pretty-printed JSON, to the share target
    pub async fn export_all(&self) -> Result<ShareOutcome> {
        let json = serde_json::to_string_pretty(&self.state().entries)
            .map_err(|e| JournalError::Export(e.to_string()))?;

        match self.share.share(SHARE_TITLE, &json).await {
            Ok(outcome) => {
                tracing::info!("Export finished: {:?}", outcome);
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!("Export error: {}", e);
                Err(match e {
                    JournalError::Export(_) => e,
                    other => JournalError::Export(other.to_string()),
                })
            }
        }
    }

    /// Open an entry in the detail view
    pub fn view_entry(&self, id: &str) -> Result<Entry> {
        let mut state = self.state();
        let pos = state
            .position(id)
            .ok_or_else(|| JournalError::NotFound(id.to_string()))?;
        state.viewing = Some(id.to_string());
        Ok(state.entries[pos].clone())
    }

    pub fn close_view(&self) {
        self.state().viewing = None;
    }

    /// Entry currently open in the detail view
    pub fn viewing(&self) -> Option<Entry> {
        let state = self.state();
        let id = state.viewing.as_deref()?;
        state.position(id).map(|pos| state.entries[pos].clone())
    }

    /// Entries, newest first
    pub fn entries(&self) -> Vec<Entry> {
        self.state().entries.clone()
    }

    pub fn entry(&self, id: &str) -> Option<Entry> {
        let state = self.state();
        state.position(id).map(|pos| state.entries[pos].clone())
    }

    pub fn draft(&self) -> DraftFields {
        self.state().draft.clone()
    }

    /// True while a checkpoint of the current draft is in storage
    pub fn has_draft(&self) -> bool {
        self.state().has_draft
    }

    /// True while an entries write is pending
    pub fn is_saving(&self) -> bool {
        self.state().saving > 0
    }

    /// Start the recurring checkpoint task.
    ///
    /// The task holds only a weak reference to the session. Each draft text
    /// change resets the interval instead of spawning a new task.
    pub fn start_autosave(self: &Arc<Self>) {
        let mut slot = self.autosave.lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            tracing::warn!("Autosave already running");
            return;
        }

        let session = Arc::downgrade(self);
        let rearm = Arc::clone(&self.rearm);
        let period = self.autosave_interval;

        *slot = Some(tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::debug!("Autosave started ({:?} interval)", period);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let Some(live) = session.upgrade() else {
                            break;
                        };
                        live.checkpoint().await;
                    }
                    _ = rearm.notified() => {
                        ticker.reset();
                    }
                }
            }
        }));
    }

    pub fn autosave_running(&self) -> bool {
        self.autosave
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Cancel the autosave task. Safe to call more than once.
    pub fn teardown(&self) {
        if let Some(handle) = self
            .autosave
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
        {
            handle.abort();
            tracing::debug!("Autosave stopped");
        }
    }
}

impl Drop for JournalSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
