use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokio::sync::broadcast;

use crate::auth::SessionContext;
use crate::config::AppConfig;
use crate::error::TransportError;
use crate::models::{Classroom, Course};

/// InvalidationEvent
///
/// Emitted by the transport layer when a response had to be retried after a
/// credential refresh: anything cached under the previous session generation
/// may no longer reflect the current entitlements. Fired exactly once per
/// detected refresh.
#[derive(Debug, Clone)]
pub struct InvalidationEvent;

/// InvalidationBus
///
/// Broadcast hub for invalidation events. The transport owns the sender;
/// caches subscribe and release their subscription on teardown.
#[derive(Clone)]
pub struct InvalidationBus {
    tx: broadcast::Sender<InvalidationEvent>,
}

impl InvalidationBus {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<InvalidationEvent> {
        self.tx.subscribe()
    }

    /// note_credential_refresh
    ///
    /// Called by the retry/interceptor layer after it refreshed the session
    /// credential and replayed a request. A send with no live subscribers is
    /// a no-op, not an error.
    pub fn note_credential_refresh(&self) {
        tracing::info!("credential refresh detected, broadcasting invalidation");
        let _ = self.tx.send(InvalidationEvent);
    }
}

impl Default for InvalidationBus {
    fn default() -> Self {
        Self::new(16)
    }
}

/// PortalApi Contract
///
/// Defines the abstract contract for every portal REST call the shell makes.
/// This trait allows swapping the concrete implementation, from the
/// reqwest-backed client (`HttpPortalApi`) in the real shell to the in-memory
/// mock (`MockPortalApi`) during testing, without affecting the workspace
/// cache.
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn PortalApi>`) safely shareable across the shell's async tasks.
#[async_trait]
pub trait PortalApi: Send + Sync {
    // --- Teacher Workspace Collections ---
    async fn get_classrooms(&self) -> Result<Vec<Classroom>, TransportError>;
    async fn get_coordinated_courses(&self) -> Result<Vec<Course>, TransportError>;

    /// Subscription point for the invalidation signal: one event per detected
    /// credential-refresh retry. Dropping the receiver is the unsubscribe.
    fn subscribe_invalidation(&self) -> broadcast::Receiver<InvalidationEvent>;
}

/// ApiState
///
/// The concrete type used to share the transport across the shell.
pub type ApiState = Arc<dyn PortalApi>;

/// HttpPortalApi
///
/// The real transport, built on `reqwest`. Each request carries the current
/// session credential as a bearer header, read fresh from the injected
/// `SessionContext` so a rotated credential is picked up without rebuilding
/// the client.
pub struct HttpPortalApi {
    client: reqwest::Client,
    base_url: String,
    session: SessionContext,
    bus: InvalidationBus,
}

impl HttpPortalApi {
    pub fn new(config: &AppConfig, session: SessionContext) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            session,
            bus: InvalidationBus::default(),
        })
    }

    /// Exposed to the retry/interceptor layer sitting outside this crate.
    pub fn invalidation_bus(&self) -> &InvalidationBus {
        &self.bus
    }

    /// get_json
    ///
    /// Shared GET-and-decode path for all typed calls. Non-success statuses
    /// and undecodable bodies surface as `TransportError`; the caller decides
    /// how to present them.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, TransportError> {
        let url = format!("{}{}", self.base_url, path);
        let mut request = self.client.get(&url);
        if let Some(credential) = self.session.credential() {
            request = request.bearer_auth(credential.as_str());
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(path, status = status.as_u16(), "portal API returned non-success");
            return Err(TransportError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl PortalApi for HttpPortalApi {
    async fn get_classrooms(&self) -> Result<Vec<Classroom>, TransportError> {
        self.get_json("/teacher/classrooms").await
    }

    async fn get_coordinated_courses(&self) -> Result<Vec<Course>, TransportError> {
        self.get_json("/teacher/coordinated-courses").await
    }

    fn subscribe_invalidation(&self) -> broadcast::Receiver<InvalidationEvent> {
        self.bus.subscribe()
    }
}

/// MockPortalApi
///
/// A mock transport used exclusively for unit and integration testing. It
/// serves canned collections, can simulate per-collection failures and
/// response latency, counts calls, and lets tests fire the invalidation
/// signal by hand.
pub struct MockPortalApi {
    classrooms: Mutex<Vec<Classroom>>,
    courses: Mutex<Vec<Course>>,
    fail_classrooms: Mutex<bool>,
    fail_courses: Mutex<bool>,
    response_delay: Mutex<Duration>,
    classroom_calls: AtomicUsize,
    course_calls: AtomicUsize,
    bus: InvalidationBus,
}

impl MockPortalApi {
    pub fn new() -> Self {
        Self {
            classrooms: Mutex::new(Vec::new()),
            courses: Mutex::new(Vec::new()),
            fail_classrooms: Mutex::new(false),
            fail_courses: Mutex::new(false),
            response_delay: Mutex::new(Duration::ZERO),
            classroom_calls: AtomicUsize::new(0),
            course_calls: AtomicUsize::new(0),
            bus: InvalidationBus::default(),
        }
    }

    pub fn with_data(classrooms: Vec<Classroom>, courses: Vec<Course>) -> Self {
        let mock = Self::new();
        mock.set_classrooms(classrooms);
        mock.set_courses(courses);
        mock
    }

    pub fn set_classrooms(&self, classrooms: Vec<Classroom>) {
        *self.classrooms.lock().expect("mock state poisoned") = classrooms;
    }

    pub fn set_courses(&self, courses: Vec<Course>) {
        *self.courses.lock().expect("mock state poisoned") = courses;
    }

    pub fn set_fail_classrooms(&self, fail: bool) {
        *self.fail_classrooms.lock().expect("mock state poisoned") = fail;
    }

    pub fn set_fail_courses(&self, fail: bool) {
        *self.fail_courses.lock().expect("mock state poisoned") = fail;
    }

    pub fn set_response_delay(&self, delay: Duration) {
        *self.response_delay.lock().expect("mock state poisoned") = delay;
    }

    pub fn classroom_calls(&self) -> usize {
        self.classroom_calls.load(Ordering::SeqCst)
    }

    pub fn course_calls(&self) -> usize {
        self.course_calls.load(Ordering::SeqCst)
    }

    /// Simulates the transport detecting a credential-refresh retry.
    pub fn fire_invalidation(&self) {
        self.bus.note_credential_refresh();
    }

    async fn simulate_latency(&self) {
        let delay = *self.response_delay.lock().expect("mock state poisoned");
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }
}

impl Default for MockPortalApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PortalApi for MockPortalApi {
    async fn get_classrooms(&self) -> Result<Vec<Classroom>, TransportError> {
        self.classroom_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if *self.fail_classrooms.lock().expect("mock state poisoned") {
            return Err(TransportError::Mock("classrooms fetch failed".to_string()));
        }
        Ok(self.classrooms.lock().expect("mock state poisoned").clone())
    }

    async fn get_coordinated_courses(&self) -> Result<Vec<Course>, TransportError> {
        self.course_calls.fetch_add(1, Ordering::SeqCst);
        self.simulate_latency().await;
        if *self.fail_courses.lock().expect("mock state poisoned") {
            return Err(TransportError::Mock("courses fetch failed".to_string()));
        }
        Ok(self.courses.lock().expect("mock state poisoned").clone())
    }

    fn subscribe_invalidation(&self) -> broadcast::Receiver<InvalidationEvent> {
        self.bus.subscribe()
    }
}
