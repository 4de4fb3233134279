//! Optimistic Sync Controller
//!
//! Applies reorders to the local course tree immediately, then persists them
//! in the background and reconciles with the server's answer.
//!
//! # Debounce
//!
//! Drag reorders are persisted after a quiet period. Every module has its own
//! timer in a map owned by the controller: a new drag on module A restarts
//! A's timer only, and whatever the local tree holds when the timer fires is
//! what gets sent. Intermediate states are never persisted. A timer that has
//! already fired is never cancelled; its request completes and a new timer
//! handles the newer change.
//!
//! Arrow moves on section lessons skip the debounce and persist immediately.
//!
//! # Reconciliation
//!
//! - Success: the server's copy replaces the local module (content order) or
//!   section (lesson order). A module with a newer pending timer keeps its
//!   local state, since that state is about to be persisted.
//! - Failure: the whole hierarchy is refetched and replaces the local tree,
//!   except modules that still have a pending timer. A failed refetch is
//!   logged and reported, never escalated.
//!
//! No request is retried automatically.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::SyncConfig;
use crate::models::{ContentItem, Course, Lesson, Module};
use crate::operations::{self, ArrowMove, Direction};
use crate::store::{ContentStore, ReorderContentRequest, ReorderLessonsRequest, StoreError};

use super::error::SyncError;
use super::events::{SyncEvent, SyncState};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// What a module's pending timer has to persist
#[derive(Debug, Default)]
struct PendingChanges {
    /// Flattened module content order changed
    content: bool,
    /// Sections whose lesson order changed
    sections: BTreeSet<String>,
}

struct DebounceTimer {
    generation: u64,
    changes: PendingChanges,
    handle: JoinHandle<()>,
}

enum PersistRequest {
    Content(ReorderContentRequest),
    Lessons {
        section_id: String,
        request: ReorderLessonsRequest,
    },
}

struct LocalState {
    course: Course,
    states: HashMap<String, SyncState>,
    timers: HashMap<String, DebounceTimer>,
    next_generation: u64,
}

impl LocalState {
    fn transition(&mut self, module_id: &str, state: SyncState) {
        let previous = self.states.insert(module_id.to_string(), state);
        tracing::debug!(
            "Module '{}' sync state {:?} -> {:?}",
            module_id,
            previous.unwrap_or_default(),
            state
        );
    }

    /// Build the requests for a timer already removed from `timers`
    ///
    /// Whoever removes the timer under the lock owns its persist.
    fn claim(&mut self, module_id: &str, changes: PendingChanges) -> Option<Vec<PersistRequest>> {
        let Some(module) = self.course.module(module_id) else {
            tracing::warn!("Module '{}' vanished before its order was persisted", module_id);
            self.transition(module_id, SyncState::Idle);
            return None;
        };

        let mut requests = Vec::new();
        if changes.content {
            requests.push(PersistRequest::Content(ReorderContentRequest {
                ordered_items: module.content_items(),
            }));
        }
        for section_id in changes.sections {
            if let Some(section) = module.section(&section_id) {
                requests.push(PersistRequest::Lessons {
                    request: ReorderLessonsRequest {
                        lessons: section.sorted_lessons(),
                    },
                    section_id,
                });
            }
        }

        self.transition(module_id, SyncState::Persisting);
        Some(requests)
    }

    /// State to settle in once a persist cycle finishes
    fn settled_state(&self, module_id: &str) -> SyncState {
        if self.timers.contains_key(module_id) {
            SyncState::LocalApplied
        } else {
            SyncState::Idle
        }
    }
}

/// Server copy of a module with the lists in `changes` taken from `local`
fn merge_pending(server: &Module, local: &Module, changes: &PendingChanges) -> Module {
    let mut merged = if changes.content {
        local.clone()
    } else {
        server.clone()
    };

    for section in merged.sections.iter_mut() {
        let source = if changes.sections.contains(&section.id) {
            local
        } else {
            server
        };
        if let Some(source_section) = source.section(&section.id) {
            section.lessons = source_section.lessons.clone();
        }
    }

    merged
}

struct Shared<S> {
    store: Arc<S>,
    course_id: String,
    debounce: Duration,
    local: Mutex<LocalState>,
    events: broadcast::Sender<SyncEvent>,
}

impl<S: ContentStore + 'static> Shared<S> {
    fn lock(&self) -> MutexGuard<'_, LocalState> {
        self.local.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: SyncEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    /// Fire the timer identified by `generation`, if it is still current
    async fn persist_pending(self: Arc<Self>, module_id: String, generation: u64) {
        let requests = {
            let mut local = self.lock();
            let is_current = local
                .timers
                .get(&module_id)
                .is_some_and(|timer| timer.generation == generation);
            if !is_current {
                return;
            }
            let Some(timer) = local.timers.remove(&module_id) else {
                return;
            };
            match local.claim(&module_id, timer.changes) {
                Some(requests) => requests,
                None => return,
            }
        };

        self.persist(&module_id, requests).await;
    }

    /// Send requests in order, then reconcile or revert
    async fn persist(&self, module_id: &str, requests: Vec<PersistRequest>) {
        self.emit(SyncEvent::Persisting {
            module_id: module_id.to_string(),
        });

        let mut last_answer = None;
        for request in requests {
            let result = match &request {
                PersistRequest::Content(body) => {
                    self.store
                        .persist_module_order(&self.course_id, module_id, body)
                        .await
                }
                PersistRequest::Lessons {
                    section_id,
                    request: body,
                } => {
                    self.store
                        .persist_section_lessons(&self.course_id, module_id, section_id, body)
                        .await
                }
            };

            match result {
                Ok(course) => {
                    self.reconcile(module_id, &request, &course);
                    last_answer = Some(course);
                }
                Err(err) => {
                    self.revert(module_id, err).await;
                    return;
                }
            }
        }

        let Some(course) = last_answer else {
            let mut local = self.lock();
            let settled = local.settled_state(module_id);
            local.transition(module_id, settled);
            return;
        };

        {
            let mut local = self.lock();
            local.transition(module_id, SyncState::Synced);
            let settled = local.settled_state(module_id);
            local.transition(module_id, settled);
        }
        tracing::info!("Order of module '{}' persisted", module_id);
        self.emit(SyncEvent::Synced {
            module_id: module_id.to_string(),
            course,
        });
    }

    /// Replace the persisted subtree with the server's copy
    fn reconcile(&self, module_id: &str, request: &PersistRequest, server: &Course) {
        let mut local = self.lock();
        if local.timers.contains_key(module_id) {
            tracing::debug!(
                "Module '{}' changed while persisting; keeping local order",
                module_id
            );
            return;
        }

        let Some(server_module) = server.module(module_id) else {
            tracing::warn!(
                "Server answer for course '{}' lacks module '{}'",
                server.id,
                module_id
            );
            return;
        };

        match request {
            PersistRequest::Content(_) => {
                local.course.replace_module(server_module.clone());
            }
            PersistRequest::Lessons { section_id, .. } => {
                let server_section = server_module.section(section_id).cloned();
                let local_section = local
                    .course
                    .module_mut(module_id)
                    .and_then(|module| module.section_mut(section_id));
                if let (Some(server_section), Some(local_section)) = (server_section, local_section)
                {
                    *local_section = server_section;
                }
            }
        }
        local.course.updated_at = server.updated_at;
    }

    /// Discard optimistic state by refetching the hierarchy
    async fn revert(&self, module_id: &str, err: StoreError) {
        tracing::warn!("Persisting order of module '{}' failed: {}", module_id, err);
        self.lock().transition(module_id, SyncState::Reverting);
        self.emit(SyncEvent::PersistFailed {
            module_id: module_id.to_string(),
            error: err.to_string(),
        });

        match self.refetch().await {
            Ok(()) => {
                self.emit(SyncEvent::Reverted {
                    module_id: module_id.to_string(),
                });
            }
            Err(refetch_err) => {
                tracing::error!(
                    "Refetching course '{}' after failed persist also failed: {}",
                    self.course_id,
                    refetch_err
                );
                self.emit(SyncEvent::RefetchFailed {
                    module_id: module_id.to_string(),
                    error: refetch_err.to_string(),
                });
            }
        }

        let mut local = self.lock();
        let settled = local.settled_state(module_id);
        local.transition(module_id, settled);
    }

    /// Replace the local tree with server truth
    ///
    /// Only the lists a pending timer is about to persist keep their local
    /// order; everything else, including a just rejected list in the same
    /// module, comes from the fetch.
    async fn refetch(&self) -> Result<(), StoreError> {
        let mut fresh = self.store.fetch_course(&self.course_id).await?;

        let mut local = self.lock();
        for (module_id, timer) in &local.timers {
            let (Some(pending), Some(server)) =
                (local.course.module(module_id), fresh.module(module_id))
            else {
                continue;
            };
            let merged = merge_pending(server, pending, &timer.changes);
            fresh.replace_module(merged);
        }
        local.course = fresh;
        Ok(())
    }
}

/// Owns the local course tree of one management view
///
/// Create with [`SyncController::open`] when the view opens and
/// [`close`](SyncController::close) it when the view goes away.
pub struct SyncController<S: ContentStore + 'static> {
    shared: Arc<Shared<S>>,
}

impl<S: ContentStore + 'static> SyncController<S> {
    /// Wrap an already fetched course
    pub fn new(store: Arc<S>, course: Course, config: &SyncConfig) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let shared = Shared {
            store,
            course_id: course.id.clone(),
            debounce: config.debounce(),
            local: Mutex::new(LocalState {
                course,
                states: HashMap::new(),
                timers: HashMap::new(),
                next_generation: 0,
            }),
            events,
        };

        Self {
            shared: Arc::new(shared),
        }
    }

    /// Fetch the course hierarchy and start managing it
    pub async fn open(
        store: Arc<S>,
        course_id: &str,
        config: &SyncConfig,
    ) -> Result<Self, SyncError> {
        config.validate().map_err(SyncError::Config)?;
        let course = store.fetch_course(course_id).await?;
        tracing::debug!(
            "Opened course '{}' with {} module(s)",
            course.id,
            course.modules.len()
        );
        Ok(Self::new(store, course, config))
    }

    /// Snapshot of the local tree, including unpersisted changes
    pub fn course(&self) -> Course {
        self.shared.lock().course.clone()
    }

    /// Flattened content list of one module in display order
    pub fn module_content(&self, module_id: &str) -> Option<Vec<ContentItem>> {
        self.shared
            .lock()
            .course
            .module(module_id)
            .map(|module| module.content_items())
    }

    /// Current sync state of a module
    pub fn state(&self, module_id: &str) -> SyncState {
        self.shared
            .lock()
            .states
            .get(module_id)
            .copied()
            .unwrap_or_default()
    }

    /// Whether a debounced persist is waiting for this module
    pub fn has_pending(&self, module_id: &str) -> bool {
        self.shared.lock().timers.contains_key(module_id)
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.shared.events.subscribe()
    }

    /// Drag-move within a module's content list
    ///
    /// Applies the move locally right away and (re)starts the module's
    /// debounce timer. Returns the new content list. Must be called from
    /// within a Tokio runtime, which runs the timer.
    pub fn reorder_module_content(
        &self,
        module_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> Result<Vec<ContentItem>, SyncError> {
        let items = {
            let mut local = self.shared.lock();
            let items = operations::reorder_module_content(
                &mut local.course,
                module_id,
                from_index,
                to_index,
            )?;
            self.schedule(&mut local, module_id, |changes| changes.content = true);
            items
        };

        self.shared.emit(SyncEvent::LocalApplied {
            module_id: module_id.to_string(),
        });
        Ok(items)
    }

    /// Drag-move of a lesson within one section, debounced like module drags
    pub fn reorder_section_lessons(
        &self,
        module_id: &str,
        section_id: &str,
        from_index: usize,
        to_index: usize,
    ) -> Result<Vec<Lesson>, SyncError> {
        let lessons = {
            let mut local = self.shared.lock();
            let lessons = operations::reorder_section_lessons(
                &mut local.course,
                module_id,
                section_id,
                from_index,
                to_index,
            )?;
            self.schedule(&mut local, module_id, |changes| {
                changes.sections.insert(section_id.to_string());
            });
            lessons
        };

        self.shared.emit(SyncEvent::LocalApplied {
            module_id: module_id.to_string(),
        });
        Ok(lessons)
    }

    /// Arrow move of a lesson within one section
    ///
    /// Persists immediately and returns once the server answered and the
    /// local tree was reconciled or reverted. A boundary move is a no-op and
    /// sends nothing.
    pub async fn move_section_lesson(
        &self,
        module_id: &str,
        section_id: &str,
        index: usize,
        direction: Direction,
    ) -> Result<ArrowMove<Lesson>, SyncError> {
        let (outcome, request) = {
            let mut local = self.shared.lock();
            let outcome = operations::move_section_lesson(
                &mut local.course,
                module_id,
                section_id,
                index,
                direction,
            )?;
            if outcome.is_boundary() {
                tracing::debug!(
                    "Lesson {} of section '{}' already at the {:?} boundary",
                    index,
                    section_id,
                    direction
                );
                return Ok(outcome);
            }

            let request = PersistRequest::Lessons {
                section_id: section_id.to_string(),
                request: ReorderLessonsRequest {
                    lessons: outcome.clone().into_items(),
                },
            };
            local.transition(module_id, SyncState::LocalApplied);
            local.transition(module_id, SyncState::Persisting);
            (outcome, request)
        };

        self.shared.emit(SyncEvent::LocalApplied {
            module_id: module_id.to_string(),
        });
        self.shared.persist(module_id, vec![request]).await;
        Ok(outcome)
    }

    /// Persist a module's pending changes now instead of waiting for its timer
    ///
    /// A timer that already fired is left to finish its own persist.
    pub async fn flush(&self, module_id: &str) {
        let requests = {
            let mut local = self.shared.lock();
            let Some(timer) = local.timers.remove(module_id) else {
                return;
            };
            timer.handle.abort();
            match local.claim(module_id, timer.changes) {
                Some(requests) => requests,
                None => return,
            }
        };

        self.shared.persist(module_id, requests).await;
    }

    /// Flush every module with a pending timer
    pub async fn flush_all(&self) {
        let module_ids: Vec<String> = self.shared.lock().timers.keys().cloned().collect();
        for module_id in module_ids {
            self.flush(&module_id).await;
        }
    }

    /// Replace the local tree with a fresh fetch
    ///
    /// Modules with a pending timer keep their local order.
    pub async fn refresh(&self) -> Result<(), SyncError> {
        self.shared.refetch().await?;
        Ok(())
    }

    /// Persist everything pending and release the tree
    pub async fn close(self) -> Course {
        self.flush_all().await;
        self.course()
    }

    /// Record the change and restart the module's debounce timer
    fn schedule(
        &self,
        local: &mut LocalState,
        module_id: &str,
        record: impl FnOnce(&mut PendingChanges),
    ) {
        let mut changes = match local.timers.remove(module_id) {
            Some(timer) => {
                timer.handle.abort();
                timer.changes
            }
            None => PendingChanges::default(),
        };
        record(&mut changes);

        local.next_generation += 1;
        let generation = local.next_generation;

        let shared = Arc::clone(&self.shared);
        let owned_id = module_id.to_string();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(shared.debounce).await;
            shared.persist_pending(owned_id, generation).await;
        });

        local.timers.insert(
            module_id.to_string(),
            DebounceTimer {
                generation,
                changes,
                handle,
            },
        );
        local.transition(module_id, SyncState::LocalApplied);
    }
}

impl<S: ContentStore + 'static> Drop for SyncController<S> {
    fn drop(&mut self) {
        let local = self.shared.lock();
        if !local.timers.is_empty() {
            tracing::warn!(
                "Dropping sync controller with {} unpersisted module order(s)",
                local.timers.len()
            );
        }
        for timer in local.timers.values() {
            timer.handle.abort();
        }
    }
}
