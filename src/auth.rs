use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use crate::error::SessionStoreError;
use crate::router::{FlatRoute, Location};

/// SessionCredential
///
/// The opaque session token issued at login. The shell never inspects it:
/// its mere **presence** gates navigation, and validity is the backend's
/// concern. Non-empty by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionCredential(String);

impl SessionCredential {
    /// Wraps a raw token. Returns `None` for an empty string, which the shell
    /// treats the same as no credential at all.
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.is_empty() { None } else { Some(Self(raw)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// SessionStore Contract
///
/// Defines the abstract contract for the single well-known credential slot.
/// This trait allows swapping the concrete implementation, from the durable
/// file-backed slot (`FileSessionStore`) in the real shell to the in-memory
/// slot (`MemorySessionStore`) during testing, without affecting the gate.
///
/// The slot holds at most one credential; absence is the sole unauthenticated
/// signal.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Option<SessionCredential>, SessionStoreError>;
    fn store(&self, credential: &SessionCredential) -> Result<(), SessionStoreError>;
    fn clear(&self) -> Result<(), SessionStoreError>;
}

/// SessionStoreState
///
/// The concrete type used to share the credential slot across the shell.
pub type SessionStoreState = Arc<dyn SessionStore>;

// Serialized shape of the durable slot file.
#[derive(Serialize, Deserialize)]
struct SessionDocument {
    credential: SessionCredential,
}

/// FileSessionStore
///
/// The durable slot: a small JSON document on disk, surviving shell restarts
/// the way the browser's origin-scoped storage survives page reloads. A
/// missing file is the normal logged-out state, not an error.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<SessionCredential>, SessionStoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let doc: SessionDocument = serde_json::from_str(&raw)?;
        Ok(Some(doc.credential))
    }

    fn store(&self, credential: &SessionCredential) -> Result<(), SessionStoreError> {
        let doc = SessionDocument {
            credential: credential.clone(),
        };
        fs::write(&self.path, serde_json::to_string(&doc)?)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            // Clearing an already-empty slot is a no-op.
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// MemorySessionStore
///
/// Ephemeral slot used in tests and throwaway shells.
#[derive(Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<SessionCredential>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionCredential>, SessionStoreError> {
        Ok(self.slot.lock().expect("session slot poisoned").clone())
    }

    fn store(&self, credential: &SessionCredential) -> Result<(), SessionStoreError> {
        *self.slot.lock().expect("session slot poisoned") = Some(credential.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionStoreError> {
        *self.slot.lock().expect("session slot poisoned") = None;
        Ok(())
    }
}

/// SessionContext
///
/// The explicit session object injected into the gate and the transport
/// client; there is deliberately no ambient global credential lookup. One
/// context is created per shell; `login` and `logout` bound its lifecycle.
#[derive(Clone)]
pub struct SessionContext {
    store: SessionStoreState,
}

impl SessionContext {
    pub fn new(store: SessionStoreState) -> Self {
        Self { store }
    }

    /// login
    ///
    /// Writes the externally issued credential into the durable slot.
    pub fn login(&self, credential: SessionCredential) -> Result<(), SessionStoreError> {
        self.store.store(&credential)?;
        tracing::info!("session credential stored");
        Ok(())
    }

    /// logout
    ///
    /// Clears the slot. Subsequent gate evaluations redirect to login; the
    /// consumer tears down any mounted workspace alongside.
    pub fn logout(&self) -> Result<(), SessionStoreError> {
        self.store.clear()?;
        tracing::info!("session credential cleared");
        Ok(())
    }

    /// credential
    ///
    /// Reads the slot fresh on every call: credential presence can change
    /// between renders (e.g. a logout elsewhere), so the result must never be
    /// cached. A slot that cannot be read is reported as absent, since
    /// absence is the only unauthenticated signal the shell acts on.
    pub fn credential(&self) -> Option<SessionCredential> {
        match self.store.load() {
            Ok(credential) => credential,
            Err(e) => {
                tracing::warn!(error = %e, "session slot unreadable, treating as unauthenticated");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.credential().is_some()
    }
}

/// MountContext
///
/// Everything the shell forwards to a mounted leaf, unchanged: the resolved
/// route entry and the active location.
#[derive(Debug, Clone, PartialEq)]
pub struct MountContext {
    pub route: FlatRoute,
    pub location: Location,
}

/// GateDecision
///
/// Outcome of one gate evaluation: mount the leaf, or redirect to the login
/// entry point.
#[derive(Debug, Clone, PartialEq)]
pub enum GateDecision {
    Mount(MountContext),
    RedirectToLogin { target: String },
}

/// SessionGate
///
/// Decides mount-or-redirect for every protected leaf, on every render. The
/// decision is a pure function of one external boolean (credential presence),
/// so the gate holds no state of its own and is re-evaluated on each
/// navigation.
#[derive(Clone)]
pub struct SessionGate {
    session: SessionContext,
    login_path: String,
}

impl SessionGate {
    pub fn new(session: SessionContext, login_path: impl Into<String>) -> Self {
        Self {
            session,
            login_path: login_path.into(),
        }
    }

    /// evaluate
    ///
    /// - Credential present (any non-empty value; no signature or expiry check
    ///   at this layer): mount, forwarding route and location unchanged.
    /// - Credential absent: redirect to the login entry point. The redirect
    ///   target is the same for every requested path; the original path is
    ///   discarded rather than preserved for post-login restoration.
    pub fn evaluate(&self, route: &FlatRoute, location: &Location) -> GateDecision {
        if self.session.is_authenticated() {
            GateDecision::Mount(MountContext {
                route: route.clone(),
                location: location.clone(),
            })
        } else {
            tracing::debug!(path = %location.path, "no session credential, redirecting to login");
            GateDecision::RedirectToLogin {
                target: self.login_path.clone(),
            }
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }
}
