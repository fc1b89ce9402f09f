use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;

use crate::models::{Classroom, Course, Notice};
use crate::transport::ApiState;

/// WorkspaceStatus
///
/// Aggregate lifecycle of the workspace bundle. The status reflects the
/// **conjunction** of all member fetches: it is never `Ready` while any member
/// is outstanding or failed, so consumers can never observe a half-loaded
/// bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceStatus {
    Idle,
    Loading,
    Ready,
    Error,
}

/// WorkspacePayload
///
/// The role-scoped aggregate bundle shared by every leaf of the teacher
/// subtree: the teacher's classrooms and the courses they coordinate. Always
/// replaced wholesale, never merged, so both collections belong to the same
/// fetch generation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkspacePayload {
    pub classrooms: Vec<Classroom>,
    pub coordinated_courses: Vec<Course>,
}

/// WorkspaceSnapshot
///
/// The read surface handed to consumers: one consistent view of payload,
/// status and last error at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceSnapshot {
    pub payload: WorkspacePayload,
    pub status: WorkspaceStatus,
    pub last_error: Option<String>,
}

// Mutable core, reconciled only under the lock.
struct WorkspaceState {
    payload: WorkspacePayload,
    status: WorkspaceStatus,
    last_error: Option<String>,
    // Monotonically increasing fetch-cycle counter. Each cycle captures its
    // generation at issuance; a completion is applied only if its generation
    // is still the latest, so a superseded in-flight cycle cannot overwrite
    // newer data no matter when it lands.
    generation: u64,
}

/// WorkspaceCache
///
/// The per-mount cache of the teacher workspace bundle. One instance is
/// created by the subtree root when the workspace mounts and dropped when it
/// unmounts (role switch or logout); it is never shared across concurrently
/// mounted workspaces.
///
/// Member fetches run concurrently in flight but are reconciled as one atomic
/// step, and failed cycles leave the previous payload untouched. Fetch
/// failures are captured into the `Error` status; this cache never retries on
/// its own (retries belong to the transport layer) and never re-raises.
#[derive(Clone)]
pub struct WorkspaceCache {
    api: ApiState,
    state: Arc<Mutex<WorkspaceState>>,
    notices: mpsc::UnboundedSender<Notice>,
}

impl WorkspaceCache {
    pub fn new(api: ApiState, notices: mpsc::UnboundedSender<Notice>) -> Self {
        Self {
            api,
            state: Arc::new(Mutex::new(WorkspaceState {
                payload: WorkspacePayload::default(),
                status: WorkspaceStatus::Idle,
                last_error: None,
                generation: 0,
            })),
            notices,
        }
    }

    /// initialize
    ///
    /// Fires all member fetches concurrently: status is `Loading` immediately,
    /// `Ready` once every member resolves, `Error` (retaining the trigger
    /// error, without partial data) if any member fails.
    pub async fn initialize(&self) {
        self.run_fetch_cycle("initialize").await;
    }

    /// refetch
    ///
    /// Re-runs the whole cycle from a clean slate. There is no merge with
    /// stale data: consumers either keep seeing the previous complete bundle
    /// or the new complete bundle, never a mix of two session generations.
    /// A cycle superseded while in flight is discarded on completion rather
    /// than cancelled at the transport level.
    pub async fn refetch(&self) {
        self.run_fetch_cycle("refetch").await;
    }

    async fn run_fetch_cycle(&self, trigger: &str) {
        let generation = {
            let mut state = self.state.lock().expect("workspace state poisoned");
            state.generation += 1;
            state.status = WorkspaceStatus::Loading;
            state.generation
        };
        tracing::debug!(generation, trigger, "workspace fetch cycle started");

        let (classrooms, courses) = tokio::join!(
            self.api.get_classrooms(),
            self.api.get_coordinated_courses()
        );

        let mut state = self.state.lock().expect("workspace state poisoned");
        if state.generation != generation {
            tracing::debug!(
                generation,
                latest = state.generation,
                "discarding superseded workspace completion"
            );
            return;
        }

        match (classrooms, courses) {
            (Ok(classrooms), Ok(coordinated_courses)) => {
                state.payload = WorkspacePayload {
                    classrooms,
                    coordinated_courses,
                };
                state.status = WorkspaceStatus::Ready;
                state.last_error = None;
                tracing::info!(
                    generation,
                    classrooms = state.payload.classrooms.len(),
                    coordinated_courses = state.payload.coordinated_courses.len(),
                    "workspace ready"
                );
            }
            (Err(e), _) | (_, Err(e)) => {
                state.status = WorkspaceStatus::Error;
                state.last_error = Some(e.to_string());
                tracing::warn!(generation, error = %e, "workspace fetch cycle failed");
            }
        }
    }

    /// snapshot
    ///
    /// One consistent view of the cache. Cheap enough to call on every render.
    pub fn snapshot(&self) -> WorkspaceSnapshot {
        let state = self.state.lock().expect("workspace state poisoned");
        WorkspaceSnapshot {
            payload: state.payload.clone(),
            status: state.status,
            last_error: state.last_error.clone(),
        }
    }

    pub fn status(&self) -> WorkspaceStatus {
        self.state
            .lock()
            .expect("workspace state poisoned")
            .status
    }

    /// is_coordinator
    ///
    /// Convenience flag derived from the coordinated-courses member: the
    /// teacher coordinates at least one course.
    pub fn is_coordinator(&self) -> bool {
        !self
            .state
            .lock()
            .expect("workspace state poisoned")
            .payload
            .coordinated_courses
            .is_empty()
    }

    /// subscribe_invalidation
    ///
    /// Registers this cache on the transport's invalidation signal: each event
    /// raises one transient notice and triggers one `refetch`. The returned
    /// guard releases the registration when dropped, so an unmounted
    /// workspace can never be refreshed posthumously.
    pub fn subscribe_invalidation(&self) -> InvalidationSubscription {
        let mut rx = self.api.subscribe_invalidation();
        let cache = self.clone();
        let handle = tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(_) => {
                        tracing::info!("invalidation signal received, refreshing workspace");
                        cache.emit_notice(Notice::info(
                            "Your session was refreshed; reloading workspace data.",
                        ));
                        cache.refetch().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        // Missed signals collapse into a single refresh; the
                        // refetch always fetches the latest state anyway.
                        tracing::warn!(skipped, "invalidation receiver lagged, refreshing once");
                        cache.emit_notice(Notice::info(
                            "Your session was refreshed; reloading workspace data.",
                        ));
                        cache.refetch().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });
        InvalidationSubscription { handle }
    }

    fn emit_notice(&self, notice: Notice) {
        // The toast layer may already be gone during teardown; that is fine.
        if self.notices.send(notice).is_err() {
            tracing::debug!("notice receiver dropped, notice discarded");
        }
    }
}

/// InvalidationSubscription
///
/// Scoped registration guard: dropping it aborts the listener task, undoing
/// the subscription. Held by the workspace subtree root for exactly as long
/// as the cache itself is mounted.
pub struct InvalidationSubscription {
    handle: JoinHandle<()>,
}

impl Drop for InvalidationSubscription {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// TeacherWorkspace
///
/// Everything the teacher subtree root owns: the cache, its invalidation
/// registration, and the notice stream for the toast layer. The root passes
/// the cache down to its leaves explicitly; dropping this bundle on unmount
/// tears all of it down together.
pub struct TeacherWorkspace {
    pub cache: WorkspaceCache,
    pub invalidation: InvalidationSubscription,
    pub notices: mpsc::UnboundedReceiver<Notice>,
}

impl TeacherWorkspace {
    /// mount
    ///
    /// Constructs the workspace for a fresh subtree mount: subscribes to the
    /// invalidation signal first (so a refresh during the initial fetch is
    /// not lost), then runs the initial fetch cycle.
    pub async fn mount(api: ApiState) -> Self {
        let (notice_tx, notices) = mpsc::unbounded_channel();
        let cache = WorkspaceCache::new(api, notice_tx);
        let invalidation = cache.subscribe_invalidation();
        cache.initialize().await;
        Self {
            cache,
            invalidation,
            notices,
        }
    }
}
